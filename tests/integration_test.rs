//! Integration tests over the analytics pipeline.
//!
//! Tests cover:
//! - Full analysis from a mock data source (no files)
//! - The documented numeric scenarios (RSI on a linear ramp, drawdown
//!   sequence, trailing streak, histogram widths)
//! - Short-input behavior across the whole indicator set
//! - Replay cursor semantics and replay-sliced metrics parity

mod common;

use approx::assert_relative_eq;
use common::*;
use retrospect::domain::analysis::BacktestAnalysis;
use retrospect::domain::distribution::histogram;
use retrospect::domain::equity::drawdown_curve;
use retrospect::domain::indicator::{
    calculate_atr, calculate_bollinger, calculate_ema, calculate_macd, calculate_rsi,
    calculate_sma, calculate_stochastic,
};
use retrospect::domain::metrics::{current_streak, MetricsSnapshot, Ratio, StreakKind};
use retrospect::domain::replay::ReplayController;
use retrospect::ports::data_port::DataPort;

mod full_pipeline {
    use super::*;

    #[test]
    fn analysis_from_mock_data_port() {
        let port = MockDataPort::new()
            .with_equity(make_equity_curve(&[100.0, 110.0, 90.0, 120.0, 125.0]))
            .with_trades(vec![
                make_trade("a", 10.0, 1),
                make_trade("b", -20.0, 2),
                make_trade("c", 30.0, 3),
                make_trade("d", 5.0, 4),
            ]);

        let equity = port.load_equity_curve().unwrap();
        let trades = port.load_trades().unwrap();
        let analysis = BacktestAnalysis::compute(&equity, &trades, 5);

        assert_eq!(analysis.completed_trades, 4);
        assert_relative_eq!(analysis.metrics.total_return_percent, 25.0);
        assert_relative_eq!(
            analysis.metrics.max_drawdown_percent,
            18.181818181818183,
            max_relative = 1e-9
        );
        assert_relative_eq!(analysis.metrics.win_rate_percent, 75.0);
        assert_eq!(analysis.metrics.streak.kind, StreakKind::Win);
        assert_eq!(analysis.metrics.streak.count, 2);
        assert_eq!(
            analysis.pnl_histogram.iter().map(|b| b.count).sum::<usize>(),
            4
        );
        assert_eq!(analysis.drawdown_zones.len(), 1);
    }

    #[test]
    fn failing_port_surfaces_error() {
        let port = MockDataPort::new().with_error("corrupt history");
        assert!(port.load_equity_curve().is_err());
    }

    #[test]
    fn snapshot_is_recomputed_wholesale() {
        let equity = make_equity_curve(&[100.0, 105.0, 103.0, 110.0]);
        let trades = vec![make_trade("a", 5.0, 2)];

        let first = MetricsSnapshot::compute(&equity, &trades);
        let second = MetricsSnapshot::compute(&equity, &trades);
        assert_eq!(first, second);
    }
}

mod documented_scenarios {
    use super::*;

    #[test]
    fn rsi_14_on_30_rising_closes_is_100() {
        let prices: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();
        let bars = make_bars(&prices);
        let series = calculate_rsi(&bars, 14);

        let last = series.points.last().unwrap();
        assert_relative_eq!(last.value.simple().unwrap(), 100.0);
        assert_eq!(last.time, bars[29].time);
    }

    #[test]
    fn drawdown_sequence_of_known_curve() {
        let equity = make_equity_curve(&[100.0, 110.0, 90.0, 120.0]);
        let dd = drawdown_curve(&equity);

        assert_relative_eq!(dd[0], 0.0);
        assert_relative_eq!(dd[1], 0.0);
        assert_relative_eq!(dd[2], -18.181818181818183, max_relative = 1e-9);
        assert_relative_eq!(dd[3], 0.0);
    }

    #[test]
    fn trailing_loss_streak_of_three() {
        let pnls = [10.0, 20.0, -5.0, -5.0, -5.0];
        let trades: Vec<_> = pnls
            .iter()
            .enumerate()
            .map(|(i, &pnl)| make_trade(&format!("t{}", i), pnl, i as i64))
            .collect();

        let streak = current_streak(&trades);
        assert_eq!(streak.kind, StreakKind::Loss);
        assert_eq!(streak.count, 3);
    }

    #[test]
    fn histogram_1_to_10_with_5_bins() {
        let values: Vec<f64> = (1..=10).map(|v| v as f64).collect();
        let bins = histogram(&values, 5);

        assert_eq!(bins.len(), 5);
        for bin in &bins {
            assert_relative_eq!(bin.end - bin.start, 1.8, max_relative = 1e-12);
        }
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 10);
    }

    #[test]
    fn profit_factor_sentinel_conditions() {
        let wins = vec![make_trade("a", 10.0, 1), make_trade("b", 5.0, 2)];
        let snapshot = MetricsSnapshot::compute(&[], &wins);
        assert!(snapshot.profit_factor.is_unbounded());

        let mixed = vec![make_trade("a", 10.0, 1), make_trade("b", -5.0, 2)];
        let snapshot = MetricsSnapshot::compute(&[], &mixed);
        assert_eq!(snapshot.profit_factor, Ratio::Value(2.0));
    }

    #[test]
    fn sortino_sentinel_without_downside() {
        let equity = make_equity_curve(&[100.0, 101.0, 102.0]);
        let snapshot = MetricsSnapshot::compute(&equity, &[]);
        assert!(snapshot.sortino.is_unbounded());

        let with_downside = make_equity_curve(&[100.0, 101.0, 100.5]);
        let snapshot = MetricsSnapshot::compute(&with_downside, &[]);
        assert!(!snapshot.sortino.is_unbounded());
    }
}

mod short_inputs {
    use super::*;

    #[test]
    fn every_indicator_returns_empty_on_short_input() {
        let bars = make_bars(&[100.0, 101.0, 102.0]);

        assert!(calculate_sma(&bars, 20).is_empty());
        assert!(calculate_ema(&bars, 20).is_empty());
        assert!(calculate_rsi(&bars, 14).is_empty());
        assert!(calculate_macd(&bars, 12, 26, 9).is_empty());
        assert!(calculate_bollinger(&bars, 20, 200).is_empty());
        assert!(calculate_atr(&bars, 14).is_empty());
        assert!(calculate_stochastic(&bars, 14, 3).is_empty());
    }

    #[test]
    fn every_indicator_returns_empty_on_no_input() {
        assert!(calculate_sma(&[], 20).is_empty());
        assert!(calculate_ema(&[], 20).is_empty());
        assert!(calculate_rsi(&[], 14).is_empty());
        assert!(calculate_macd(&[], 12, 26, 9).is_empty());
        assert!(calculate_bollinger(&[], 20, 200).is_empty());
        assert!(calculate_atr(&[], 14).is_empty());
        assert!(calculate_stochastic(&[], 14, 3).is_empty());
    }

    #[test]
    fn indicator_output_never_exceeds_input_length() {
        let bars = make_bars(&(0..40).map(|i| 100.0 + (i as f64).sin()).collect::<Vec<_>>());

        assert!(calculate_sma(&bars, 5).len() <= bars.len());
        assert!(calculate_ema(&bars, 5).len() <= bars.len());
        assert!(calculate_rsi(&bars, 14).len() <= bars.len());
        assert!(calculate_macd(&bars, 12, 26, 9).len() <= bars.len());
        assert!(calculate_bollinger(&bars, 20, 200).len() <= bars.len());
        assert!(calculate_atr(&bars, 14).len() <= bars.len());
        assert!(calculate_stochastic(&bars, 14, 3).len() <= bars.len());
    }
}

mod replay {
    use super::*;

    #[test]
    fn step_forward_at_end_is_noop() {
        let mut controller = ReplayController::new(5);
        controller.skip_to_end();
        let before = controller.current_step();
        controller.step_forward(1);
        assert_eq!(controller.current_step(), before);
    }

    #[test]
    fn skip_to_start_then_end_lands_on_last_step_paused() {
        let mut controller = ReplayController::new(12);
        controller.play();
        controller.tick();
        controller.skip_to_start();
        controller.skip_to_end();
        assert_eq!(controller.current_step(), 11);
        assert!(!controller.is_playing());
    }

    #[test]
    fn driven_playback_reaches_end_and_pauses() {
        let equity = make_equity_curve(&[100.0, 102.0, 101.0, 104.0, 108.0]);
        let mut controller = ReplayController::new(equity.len());
        controller.play();

        let mut ticks = 0;
        while controller.tick() {
            ticks += 1;
            assert!(controller.current_step() < equity.len());
        }

        assert_eq!(ticks, equity.len() - 1);
        assert_eq!(controller.current_step(), equity.len() - 1);
        assert!(!controller.is_playing());
        assert_relative_eq!(controller.progress_percent(), 100.0);
    }

    #[test]
    fn sliced_metrics_match_at_step_during_playback() {
        let equity = make_equity_curve(&[100.0, 110.0, 90.0, 120.0, 95.0, 130.0]);
        let trades = vec![
            make_trade("a", 10.0, 1),
            make_trade("b", -20.0, 2),
            make_trade("c", 30.0, 4),
        ];

        let mut controller = ReplayController::new(equity.len());
        controller.play();

        loop {
            let step = controller.current_step();
            let via_controller = {
                let visible = controller.visible(&equity);
                let cutoff = visible.last().unwrap().time;
                let completed = retrospect::domain::metrics::completed_until(&trades, cutoff);
                MetricsSnapshot::compute(visible, &completed)
            };
            let via_analysis = BacktestAnalysis::at_step(&equity, &trades, step, 5).metrics;
            assert_eq!(via_controller, via_analysis, "step {}", step);

            if !controller.tick() {
                break;
            }
        }

        // The cursor ended on the last step, so the final slice is the run.
        let final_metrics = BacktestAnalysis::at_step(&equity, &trades, equity.len() - 1, 5);
        let full = BacktestAnalysis::compute(&equity, &trades, 5);
        assert_eq!(final_metrics, full);
    }
}

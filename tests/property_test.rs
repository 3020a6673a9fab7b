//! Property tests for the invariants the calculators guarantee.

mod common;

use common::*;
use proptest::prelude::*;
use retrospect::domain::distribution::histogram;
use retrospect::domain::equity::max_drawdown;
use retrospect::domain::indicator::{calculate_ema, calculate_rsi, calculate_sma};
use retrospect::domain::replay::ReplayController;

proptest! {
    #[test]
    fn rsi_stays_within_bounds(
        prices in prop::collection::vec(1.0..10_000.0f64, 0..60),
        period in 1usize..20,
    ) {
        let bars = make_bars(&prices);
        let series = calculate_rsi(&bars, period);

        for point in &series.points {
            let rsi = point.value.simple().unwrap();
            prop_assert!((0.0..=100.0).contains(&rsi));
            prop_assert!(rsi.is_finite());
        }
    }

    #[test]
    fn histogram_counts_always_sum_to_input_length(
        values in prop::collection::vec(-1_000.0..1_000.0f64, 0..80),
        bin_count in 1usize..25,
    ) {
        let bins = histogram(&values, bin_count);
        let total: usize = bins.iter().map(|b| b.count).sum();
        prop_assert_eq!(total, values.len());
    }

    #[test]
    fn sma_and_ema_lengths_match(
        prices in prop::collection::vec(1.0..1_000.0f64, 0..50),
        period in 1usize..20,
    ) {
        let bars = make_bars(&prices);
        let sma = calculate_sma(&bars, period);
        let ema = calculate_ema(&bars, period);

        let expected = bars.len().saturating_sub(period - 1);
        prop_assert_eq!(sma.len(), expected);
        prop_assert_eq!(ema.len(), expected);
    }

    #[test]
    fn max_drawdown_is_nonnegative_and_finite(
        values in prop::collection::vec(1.0..1_000_000.0f64, 0..60),
    ) {
        let equity = make_equity_curve(&values);
        let dd = max_drawdown(&equity);
        prop_assert!(dd >= 0.0);
        prop_assert!(dd.is_finite());
    }

    #[test]
    fn replay_cursor_never_escapes_bounds(
        max_steps in 0usize..50,
        ops in prop::collection::vec(0u8..6, 0..100),
    ) {
        let mut controller = ReplayController::new(max_steps);

        for op in ops {
            match op {
                0 => controller.play(),
                1 => controller.pause(),
                2 => controller.step_forward(3),
                3 => controller.step_back(2),
                4 => controller.skip_to_end(),
                5 => { controller.tick(); }
                _ => unreachable!(),
            }

            if max_steps > 0 {
                prop_assert!(controller.current_step() < max_steps);
            } else {
                prop_assert_eq!(controller.current_step(), 0);
            }
        }
    }
}

//! RSI (Relative Strength Index) indicator.
//!
//! Trailing-window averages of gains and losses over the last n price
//! changes:
//! - losses == 0 and gains > 0 ⇒ RSI = 100
//! - gains == 0 and losses > 0 ⇒ RSI = 0
//! - both zero (flat window)   ⇒ RSI = 50
//! - otherwise RSI = 100 - 100/(1 + gains/losses)
//!
//! First output at bar n (n price changes need n+1 bars).

use crate::domain::bar::Bar;
use crate::domain::indicator::{IndicatorKind, IndicatorPoint, IndicatorSeries, IndicatorValue};

pub fn calculate_rsi(bars: &[Bar], period: usize) -> IndicatorSeries {
    let kind = IndicatorKind::Rsi(period);
    if period == 0 || bars.len() < period + 1 {
        return IndicatorSeries::empty(kind);
    }

    let changes: Vec<f64> = bars
        .windows(2)
        .map(|w| w[1].close - w[0].close)
        .collect();

    let mut points = Vec::with_capacity(bars.len() - period);
    for i in period..bars.len() {
        let window = &changes[i - period..i];
        let avg_gain: f64 =
            window.iter().filter(|&&c| c > 0.0).sum::<f64>() / period as f64;
        let avg_loss: f64 =
            -window.iter().filter(|&&c| c < 0.0).sum::<f64>() / period as f64;

        let rsi = if avg_loss == 0.0 && avg_gain == 0.0 {
            50.0
        } else if avg_loss == 0.0 {
            100.0
        } else if avg_gain == 0.0 {
            0.0
        } else {
            100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
        };

        points.push(IndicatorPoint {
            time: bars[i].time,
            value: IndicatorValue::Simple(rsi),
        });
    }

    IndicatorSeries { kind, points }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn make_bars(prices: &[f64]) -> Vec<Bar> {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        prices
            .iter()
            .enumerate()
            .map(|(i, &close)| Bar {
                time: start + Duration::days(i as i64),
                open: close,
                high: close,
                low: close,
                close,
                volume: 1000.0,
            })
            .collect()
    }

    #[test]
    fn rsi_empty_bars() {
        assert!(calculate_rsi(&[], 14).is_empty());
    }

    #[test]
    fn rsi_insufficient_bars() {
        let bars = make_bars(&[100.0; 14]);
        // 14 bars give only 13 changes.
        assert!(calculate_rsi(&bars, 14).is_empty());
    }

    #[test]
    fn rsi_first_point_needs_period_changes() {
        let bars = make_bars(&[100.0, 101.0, 102.0, 101.0, 103.0]);
        let series = calculate_rsi(&bars, 4);
        assert_eq!(series.len(), 1);
        assert_eq!(series.points[0].time, bars[4].time);
    }

    #[test]
    fn rsi_all_gains_is_100() {
        let prices: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();
        let bars = make_bars(&prices);
        let series = calculate_rsi(&bars, 14);

        let last = series.points.last().unwrap();
        assert!((last.value.simple().unwrap() - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn rsi_all_losses_is_0() {
        let prices: Vec<f64> = (0..30).map(|i| 100.0 - i as f64).collect();
        let bars = make_bars(&prices);
        let series = calculate_rsi(&bars, 14);

        let last = series.points.last().unwrap();
        assert!((last.value.simple().unwrap() - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn rsi_flat_window_is_50() {
        let bars = make_bars(&[100.0; 20]);
        let series = calculate_rsi(&bars, 14);

        for point in &series.points {
            assert!((point.value.simple().unwrap() - 50.0).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn rsi_in_range() {
        let prices: Vec<f64> = (1..=40)
            .map(|i| 100.0 + ((i as f64 % 7.0) - 3.0) * 2.0)
            .collect();
        let bars = make_bars(&prices);
        let series = calculate_rsi(&bars, 14);

        assert!(!series.is_empty());
        for point in &series.points {
            let rsi = point.value.simple().unwrap();
            assert!((0.0..=100.0).contains(&rsi), "RSI {} out of range", rsi);
        }
    }

    #[test]
    fn rsi_mixed_window_formula() {
        // Changes over period 3: [+2, -1, +1] → gains 3/3=1, losses 1/3.
        let bars = make_bars(&[100.0, 102.0, 101.0, 102.0]);
        let series = calculate_rsi(&bars, 3);

        assert_eq!(series.len(), 1);
        let rs = 1.0 / (1.0 / 3.0);
        let expected = 100.0 - 100.0 / (1.0 + rs);
        assert!((series.points[0].value.simple().unwrap() - expected).abs() < 1e-9);
    }

    #[test]
    fn rsi_zero_period() {
        let bars = make_bars(&[100.0, 101.0]);
        assert!(calculate_rsi(&bars, 0).is_empty());
    }
}

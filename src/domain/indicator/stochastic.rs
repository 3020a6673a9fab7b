//! Stochastic Oscillator indicator.
//!
//! %K = (close - lowest_low) / (highest_high - lowest_low) * 100 over the
//! %K window, or 50 when the window range is zero. %D = SMA(%K, d_period).
//! Output starts where %D exists; each point carries both lines.

use crate::domain::bar::Bar;
use crate::domain::indicator::{IndicatorKind, IndicatorPoint, IndicatorSeries, IndicatorValue};

pub fn calculate_stochastic(bars: &[Bar], k_period: usize, d_period: usize) -> IndicatorSeries {
    let kind = IndicatorKind::Stochastic { k_period, d_period };
    if k_period == 0 || d_period == 0 || bars.len() < k_period + d_period - 1 {
        return IndicatorSeries::empty(kind);
    }

    let k_values: Vec<f64> = ((k_period - 1)..bars.len())
        .map(|i| {
            let window = &bars[i + 1 - k_period..=i];
            let highest = window.iter().map(|b| b.high).fold(f64::MIN, f64::max);
            let lowest = window.iter().map(|b| b.low).fold(f64::MAX, f64::min);
            let range = highest - lowest;
            if range > 0.0 {
                (bars[i].close - lowest) / range * 100.0
            } else {
                50.0
            }
        })
        .collect();

    let points = ((d_period - 1)..k_values.len())
        .map(|j| {
            let d = k_values[j + 1 - d_period..=j].iter().sum::<f64>() / d_period as f64;
            IndicatorPoint {
                time: bars[k_period - 1 + j].time,
                value: IndicatorValue::Stochastic { k: k_values[j], d },
            }
        })
        .collect();

    IndicatorSeries { kind, points }
}

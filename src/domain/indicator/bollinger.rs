//! Bollinger Bands indicator.
//!
//! - Middle: Simple Moving Average over n closes
//! - Upper:  Middle + multiplier × StdDev
//! - Lower:  Middle - multiplier × StdDev
//!
//! StdDev is population standard deviation (divides by N, not N-1), so a
//! constant window collapses the bands onto the middle rather than
//! producing NaN. The multiplier arrives as hundredths (200 = 2.0σ).

use crate::domain::bar::Bar;
use crate::domain::indicator::{IndicatorKind, IndicatorPoint, IndicatorSeries, IndicatorValue};

pub fn calculate_bollinger(bars: &[Bar], period: usize, mult_x100: u32) -> IndicatorSeries {
    let kind = IndicatorKind::Bollinger { period, mult_x100 };
    if period == 0 || bars.len() < period {
        return IndicatorSeries::empty(kind);
    }

    let mult = mult_x100 as f64 / 100.0;
    let mut points = Vec::with_capacity(bars.len() - period + 1);

    for i in (period - 1)..bars.len() {
        let window = &bars[i + 1 - period..=i];
        let middle: f64 = window.iter().map(|b| b.close).sum::<f64>() / period as f64;
        let variance: f64 = window
            .iter()
            .map(|b| {
                let diff = b.close - middle;
                diff * diff
            })
            .sum::<f64>()
            / period as f64;
        let stddev = variance.sqrt();

        points.push(IndicatorPoint {
            time: bars[i].time,
            value: IndicatorValue::Bollinger {
                upper: middle + mult * stddev,
                middle,
                lower: middle - mult * stddev,
            },
        });
    }

    IndicatorSeries { kind, points }
}

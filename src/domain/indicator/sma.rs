//! Simple Moving Average indicator.
//!
//! SMA(n)[i] = mean(C[i-n+1..=i]). First output at bar n-1.

use crate::domain::bar::Bar;
use crate::domain::indicator::{IndicatorKind, IndicatorPoint, IndicatorSeries, IndicatorValue};

pub fn calculate_sma(bars: &[Bar], period: usize) -> IndicatorSeries {
    let kind = IndicatorKind::Sma(period);
    if period == 0 || bars.len() < period {
        return IndicatorSeries::empty(kind);
    }

    let mut points = Vec::with_capacity(bars.len() - period + 1);
    let mut sum: f64 = bars[..period].iter().map(|b| b.close).sum();
    points.push(IndicatorPoint {
        time: bars[period - 1].time,
        value: IndicatorValue::Simple(sum / period as f64),
    });

    for i in period..bars.len() {
        sum += bars[i].close - bars[i - period].close;
        points.push(IndicatorPoint {
            time: bars[i].time,
            value: IndicatorValue::Simple(sum / period as f64),
        });
    }

    IndicatorSeries { kind, points }
}

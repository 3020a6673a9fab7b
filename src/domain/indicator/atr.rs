//! ATR (Average True Range) indicator.
//!
//! True range = max(high-low, |high-prev_close|, |low-prev_close|); the
//! first true range needs a previous close, so n+1 bars produce the seed.
//! Seed ATR = SMA of the first n true ranges, then Wilder smoothing:
//! atr = (atr*(n-1) + tr) / n.

use crate::domain::bar::Bar;
use crate::domain::indicator::{IndicatorKind, IndicatorPoint, IndicatorSeries, IndicatorValue};

pub fn calculate_atr(bars: &[Bar], period: usize) -> IndicatorSeries {
    let kind = IndicatorKind::Atr(period);
    if period == 0 || bars.len() < period + 1 {
        return IndicatorSeries::empty(kind);
    }

    let true_ranges: Vec<f64> = (1..bars.len())
        .map(|i| bars[i].true_range(bars[i - 1].close))
        .collect();

    let mut points = Vec::with_capacity(true_ranges.len() - period + 1);
    let mut atr: f64 = true_ranges[..period].iter().sum::<f64>() / period as f64;
    points.push(IndicatorPoint {
        time: bars[period].time,
        value: IndicatorValue::Simple(atr),
    });

    for (i, &tr) in true_ranges.iter().enumerate().skip(period) {
        atr = (atr * (period - 1) as f64 + tr) / period as f64;
        points.push(IndicatorPoint {
            time: bars[i + 1].time,
            value: IndicatorValue::Simple(atr),
        });
    }

    IndicatorSeries { kind, points }
}

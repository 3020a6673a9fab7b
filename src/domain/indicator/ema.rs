//! Exponential Moving Average indicator.
//!
//! k = 2/(n+1), seed with the first SMA, then EMA[i] = C[i]*k + EMA[i-1]*(1-k).
//! First output at bar n-1; shorter input yields an empty series.

use crate::domain::bar::Bar;
use crate::domain::indicator::{IndicatorKind, IndicatorPoint, IndicatorSeries, IndicatorValue};

pub fn calculate_ema(bars: &[Bar], period: usize) -> IndicatorSeries {
    let kind = IndicatorKind::Ema(period);
    if period == 0 || bars.len() < period {
        return IndicatorSeries::empty(kind);
    }

    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let points = ema_values(&closes, period)
        .into_iter()
        .enumerate()
        .map(|(i, ema)| IndicatorPoint {
            time: bars[period - 1 + i].time,
            value: IndicatorValue::Simple(ema),
        })
        .collect();

    IndicatorSeries { kind, points }
}

/// Raw EMA over a plain value sequence. Result index 0 corresponds to input
/// index `period - 1`; empty when the input is shorter than `period`. Also
/// feeds the MACD signal line, which smooths MACD values rather than closes.
pub(crate) fn ema_values(values: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || values.len() < period {
        return Vec::new();
    }

    let k = 2.0 / (period as f64 + 1.0);
    let mut out = Vec::with_capacity(values.len() - period + 1);
    let mut ema: f64 = values[..period].iter().sum::<f64>() / period as f64;
    out.push(ema);

    for &value in &values[period..] {
        ema = value * k + ema * (1.0 - k);
        out.push(ema);
    }

    out
}

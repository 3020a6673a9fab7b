//! MACD (Moving Average Convergence Divergence) indicator.
//!
//! MACD Line = EMA(fast) - EMA(slow)
//! Signal Line = EMA(signal) of MACD Line
//! Histogram = MACD Line - Signal Line
//!
//! Output starts where the signal line exists: bar max(fast, slow) + signal - 2.

use crate::domain::bar::Bar;
use crate::domain::indicator::ema::ema_values;
use crate::domain::indicator::{IndicatorKind, IndicatorPoint, IndicatorSeries, IndicatorValue};

pub fn calculate_macd(
    bars: &[Bar],
    fast: usize,
    slow: usize,
    signal_period: usize,
) -> IndicatorSeries {
    let kind = IndicatorKind::Macd {
        fast,
        slow,
        signal: signal_period,
    };
    if fast == 0 || slow == 0 || signal_period == 0 {
        return IndicatorSeries::empty(kind);
    }

    // Both EMAs exist from this bar on.
    let macd_start = fast.max(slow) - 1;
    if bars.len() < macd_start + signal_period {
        return IndicatorSeries::empty(kind);
    }

    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let fast_ema = ema_values(&closes, fast);
    let slow_ema = ema_values(&closes, slow);

    let macd_line: Vec<f64> = (macd_start..bars.len())
        .map(|i| fast_ema[i - (fast - 1)] - slow_ema[i - (slow - 1)])
        .collect();

    let signal_line = ema_values(&macd_line, signal_period);
    let signal_start = macd_start + signal_period - 1;

    let points = signal_line
        .into_iter()
        .enumerate()
        .map(|(j, signal)| {
            let line = macd_line[signal_period - 1 + j];
            IndicatorPoint {
                time: bars[signal_start + j].time,
                value: IndicatorValue::Macd {
                    line,
                    signal,
                    histogram: line - signal,
                },
            }
        })
        .collect();

    IndicatorSeries { kind, points }
}

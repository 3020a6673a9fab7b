//! Equity curve and drawdown calculations.
//!
//! Drawdowns are measured against the running peak of the curve itself:
//! dd_i = (equity_i - peak) / peak * 100, so the underwater sequence is
//! zero at peaks and negative below them. Max drawdown is the magnitude of
//! the most negative value.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EquityPoint {
    pub time: DateTime<Utc>,
    pub equity: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drawdown_percent: Option<f64>,
}

impl EquityPoint {
    pub fn new(time: DateTime<Utc>, equity: f64) -> Self {
        EquityPoint {
            time,
            equity,
            drawdown_percent: None,
        }
    }
}

/// A contiguous stretch of the curve spent below a running peak.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawdownZone {
    /// Index of the first below-peak point.
    pub start: usize,
    /// Index of the last below-peak point.
    pub end: usize,
    /// Deepest drawdown within the zone, as a positive percentage.
    pub depth_percent: f64,
}

/// Underwater sequence: one value per equity point, 0 at peaks, negative
/// below them (percent).
pub fn drawdown_curve(equity: &[EquityPoint]) -> Vec<f64> {
    let mut curve = Vec::with_capacity(equity.len());
    let mut peak = match equity.first() {
        Some(p) => p.equity,
        None => return curve,
    };

    for point in equity {
        if point.equity > peak {
            peak = point.equity;
        }
        let dd = if peak > 0.0 {
            (point.equity - peak) / peak * 100.0
        } else {
            0.0
        };
        curve.push(dd);
    }

    curve
}

/// Magnitude of the deepest drawdown, as a positive percentage. Exactly 0
/// for a monotonically increasing curve.
pub fn max_drawdown(equity: &[EquityPoint]) -> f64 {
    drawdown_curve(equity)
        .into_iter()
        .fold(0.0_f64, |worst, dd| worst.max(-dd))
}

/// Copy of the curve with `drawdown_percent` filled in on every point.
pub fn annotate_drawdown(equity: &[EquityPoint]) -> Vec<EquityPoint> {
    let curve = drawdown_curve(equity);
    equity
        .iter()
        .zip(curve)
        .map(|(point, dd)| EquityPoint {
            drawdown_percent: Some(dd),
            ..point.clone()
        })
        .collect()
}

/// Index ranges spent below the running peak, each with its deepest point.
pub fn drawdown_zones(equity: &[EquityPoint]) -> Vec<DrawdownZone> {
    let mut zones = Vec::new();
    let mut peak = match equity.first() {
        Some(p) => p.equity,
        None => return zones,
    };
    let mut open: Option<(usize, f64)> = None;

    for (i, point) in equity.iter().enumerate() {
        if point.equity > peak {
            if let Some((start, depth)) = open.take() {
                zones.push(DrawdownZone {
                    start,
                    end: i - 1,
                    depth_percent: depth,
                });
            }
            peak = point.equity;
        } else if point.equity < peak && peak > 0.0 {
            let depth = (peak - point.equity) / peak * 100.0;
            open = match open {
                Some((start, worst)) => Some((start, worst.max(depth))),
                None => Some((i, depth)),
            };
        }
    }

    if let Some((start, depth)) = open {
        zones.push(DrawdownZone {
            start,
            end: equity.len() - 1,
            depth_percent: depth,
        });
    }

    zones
}

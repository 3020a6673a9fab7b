//! Composite analysis of a finished run.
//!
//! Bundles everything the dashboard shows at once (snapshot metrics,
//! annotated equity, drawdown zones, calendar heatmaps, and the pnl
//! histogram), recomputed wholesale from the inputs. The replay-sliced
//! variant feeds a cursor position through the same pure calculators.

use serde::{Deserialize, Serialize};

use super::distribution::{
    histogram, month_year_heatmap, weekday_hour_heatmap, HistogramBin, MonthYearCell,
    WeekdayHourHeatmap,
};
use super::equity::{annotate_drawdown, drawdown_zones, DrawdownZone, EquityPoint};
use super::metrics::{completed_until, hourly_performance, HourlyPerformance, MetricsSnapshot};
use super::trade::{sort_by_exit_time, Trade};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BacktestAnalysis {
    pub metrics: MetricsSnapshot,
    /// Input curve with `drawdown_percent` filled in.
    pub equity: Vec<EquityPoint>,
    pub drawdown_zones: Vec<DrawdownZone>,
    pub completed_trades: usize,
    pub hourly: HourlyPerformance,
    pub best_hour: Option<u32>,
    pub worst_hour: Option<u32>,
    pub weekday_hour: WeekdayHourHeatmap,
    pub month_year: Vec<MonthYearCell>,
    pub pnl_histogram: Vec<HistogramBin>,
}

impl BacktestAnalysis {
    /// Analyze the full run. Trades are ordered by exit time internally;
    /// callers may pass them in any order.
    pub fn compute(equity: &[EquityPoint], trades: &[Trade], histogram_bins: usize) -> Self {
        let mut trades = trades.to_vec();
        sort_by_exit_time(&mut trades);
        Self::from_sorted(equity, &trades, histogram_bins)
    }

    /// Analyze the run as visible at a replay cursor: equity is cut at
    /// `step` (inclusive) and only trades exited by the cut-off count.
    pub fn at_step(
        equity: &[EquityPoint],
        trades: &[Trade],
        step: usize,
        histogram_bins: usize,
    ) -> Self {
        let mut trades = trades.to_vec();
        sort_by_exit_time(&mut trades);

        let end = (step + 1).min(equity.len());
        let visible = &equity[..end];
        let completed = match visible.last() {
            Some(point) => completed_until(&trades, point.time),
            None => Vec::new(),
        };

        Self::from_sorted(visible, &completed, histogram_bins)
    }

    fn from_sorted(equity: &[EquityPoint], trades: &[Trade], histogram_bins: usize) -> Self {
        let pnls: Vec<f64> = trades.iter().map(|t| t.pnl).collect();
        let hourly = hourly_performance(trades);
        let best_hour = hourly.best_hour();
        let worst_hour = hourly.worst_hour();

        BacktestAnalysis {
            metrics: MetricsSnapshot::compute(equity, trades),
            equity: annotate_drawdown(equity),
            drawdown_zones: drawdown_zones(equity),
            completed_trades: trades.len(),
            hourly,
            best_hour,
            worst_hour,
            weekday_hour: weekday_hour_heatmap(trades),
            month_year: month_year_heatmap(trades),
            pnl_histogram: histogram(&pnls, histogram_bins),
        }
    }
}

//! Binned histograms and calendar heatmaps.
//!
//! Everything here is the same reduce-by-key shape as the hourly
//! performance buckets, keyed on composite calendar buckets instead of a
//! single hour.

use chrono::{Datelike, Timelike};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::metrics::PerformanceCell;
use super::trade::Trade;

/// Half-open [start, end) bin, except the last bin of a histogram which is
/// closed on both ends so the maximum value is captured.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

/// Bin `values` into `bin_count` equal-width bins spanning [min, max].
/// A degenerate range (all values equal) falls back to a width of 1.0 so
/// no division by zero occurs. Bin counts always sum to the input length.
pub fn histogram(values: &[f64], bin_count: usize) -> Vec<HistogramBin> {
    if values.is_empty() || bin_count == 0 {
        return Vec::new();
    }

    let min = values.iter().copied().fold(f64::MAX, f64::min);
    let max = values.iter().copied().fold(f64::MIN, f64::max);
    let raw_width = (max - min) / bin_count as f64;
    let width = if raw_width > 0.0 { raw_width } else { 1.0 };

    let mut bins: Vec<HistogramBin> = (0..bin_count)
        .map(|i| HistogramBin {
            start: min + i as f64 * width,
            end: min + (i + 1) as f64 * width,
            count: 0,
        })
        .collect();

    for &value in values {
        let idx = (((value - min) / width) as usize).min(bin_count - 1);
        bins[idx].count += 1;
    }

    bins
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekdayHourHeatmap {
    /// 7 weekday rows (Sunday = 0) of 24 hour cells each.
    pub cells: Vec<Vec<PerformanceCell>>,
}

impl WeekdayHourHeatmap {
    pub fn cell(&self, weekday: usize, hour: usize) -> &PerformanceCell {
        &self.cells[weekday][hour]
    }
}

/// Aggregate trade pnl by (weekday, hour) of the exit time.
pub fn weekday_hour_heatmap(trades: &[Trade]) -> WeekdayHourHeatmap {
    let mut cells = vec![vec![PerformanceCell::default(); 24]; 7];
    for trade in trades {
        let weekday = trade.exit_time.weekday().num_days_from_sunday() as usize;
        let hour = trade.exit_time.hour() as usize;
        let cell = &mut cells[weekday][hour];
        cell.trades += 1;
        cell.total_pnl += trade.pnl;
    }
    WeekdayHourHeatmap { cells }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthYearCell {
    pub year: i32,
    /// 1-12.
    pub month: u32,
    pub trades: usize,
    pub total_pnl: f64,
}

impl MonthYearCell {
    pub fn average_pnl(&self) -> f64 {
        if self.trades > 0 {
            self.total_pnl / self.trades as f64
        } else {
            0.0
        }
    }
}

/// Aggregate trade pnl by (year, month) of the exit time; rows come back
/// in calendar order and only for months that saw trades.
pub fn month_year_heatmap(trades: &[Trade]) -> Vec<MonthYearCell> {
    let mut buckets: BTreeMap<(i32, u32), PerformanceCell> = BTreeMap::new();
    for trade in trades {
        let key = (trade.exit_time.year(), trade.exit_time.month());
        let cell = buckets.entry(key).or_default();
        cell.trades += 1;
        cell.total_pnl += trade.pnl;
    }

    buckets
        .into_iter()
        .map(|((year, month), cell)| MonthYearCell {
            year,
            month,
            trades: cell.trades,
            total_pnl: cell.total_pnl,
        })
        .collect()
}

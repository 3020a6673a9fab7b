//! Performance metrics and statistics.
//!
//! All ratios that can divide by zero use the tagged [`Ratio`] sentinel so
//! a missing denominator is distinguishable from a computed zero and no
//! NaN/Infinity ever reaches a consumer. Returns and drawdowns are in
//! percent; Sharpe and Sortino are unannualized (callers annualize).

use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

use super::equity::{max_drawdown, EquityPoint};
use super::trade::Trade;

/// A ratio metric whose denominator may legitimately be zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum Ratio {
    Value(f64),
    Unbounded,
}

impl Ratio {
    pub fn is_unbounded(&self) -> bool {
        matches!(self, Ratio::Unbounded)
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            Ratio::Value(v) => Some(*v),
            Ratio::Unbounded => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreakKind {
    Win,
    Loss,
    None,
}

/// The run of consecutive same-outcome trades ending at the most recent
/// trade, not the historical maximum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakInfo {
    pub kind: StreakKind,
    pub count: usize,
}

impl StreakInfo {
    pub fn none() -> Self {
        StreakInfo {
            kind: StreakKind::None,
            count: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceCell {
    pub trades: usize,
    pub total_pnl: f64,
}

impl PerformanceCell {
    pub fn average_pnl(&self) -> f64 {
        if self.trades > 0 {
            self.total_pnl / self.trades as f64
        } else {
            0.0
        }
    }
}

/// Pnl bucketed by hour of day (0-23) of the trade exit time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HourlyPerformance {
    pub hours: Vec<PerformanceCell>,
}

impl HourlyPerformance {
    /// Hour with the highest average pnl among hours that saw trades.
    pub fn best_hour(&self) -> Option<u32> {
        self.argmax_by(1.0)
    }

    /// Hour with the lowest average pnl among hours that saw trades.
    pub fn worst_hour(&self) -> Option<u32> {
        self.argmax_by(-1.0)
    }

    fn argmax_by(&self, sign: f64) -> Option<u32> {
        self.hours
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.trades > 0)
            .max_by(|(_, a), (_, b)| {
                (sign * a.average_pnl())
                    .partial_cmp(&(sign * b.average_pnl()))
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|(hour, _)| hour as u32)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    pub sharpe: Ratio,
    pub sortino: Ratio,
    pub calmar: Ratio,
    pub profit_factor: Ratio,
    pub expectancy: f64,
    pub mean_return_percent: f64,
    pub std_dev_percent: f64,
    pub total_return_percent: f64,
    pub max_drawdown_percent: f64,
    pub win_rate_percent: f64,
    pub trades_won: usize,
    pub trades_lost: usize,
    pub gross_profit: f64,
    pub gross_loss: f64,
    pub avg_win: f64,
    pub avg_loss: f64,
    pub largest_win: f64,
    pub largest_loss: f64,
    pub avg_duration_days: f64,
    pub streak: StreakInfo,
}

impl MetricsSnapshot {
    fn zero() -> Self {
        MetricsSnapshot {
            sharpe: Ratio::Value(0.0),
            sortino: Ratio::Value(0.0),
            calmar: Ratio::Value(0.0),
            profit_factor: Ratio::Value(0.0),
            expectancy: 0.0,
            mean_return_percent: 0.0,
            std_dev_percent: 0.0,
            total_return_percent: 0.0,
            max_drawdown_percent: 0.0,
            win_rate_percent: 0.0,
            trades_won: 0,
            trades_lost: 0,
            gross_profit: 0.0,
            gross_loss: 0.0,
            avg_win: 0.0,
            avg_loss: 0.0,
            largest_win: 0.0,
            largest_loss: 0.0,
            avg_duration_days: 0.0,
            streak: StreakInfo::none(),
        }
    }

    /// Recomputed wholesale from an equity curve and the completed trades
    /// visible at the same cut-off; never mutated incrementally.
    pub fn compute(equity: &[EquityPoint], trades: &[Trade]) -> Self {
        let mut snapshot = Self::zero();
        snapshot.apply_trade_stats(trades);
        snapshot.streak = current_streak(trades);
        snapshot.win_rate_percent = win_rate(trades);

        if equity.len() < 2 {
            return snapshot;
        }

        let returns = step_returns(equity);
        let n = returns.len() as f64;
        let mean: f64 = returns.iter().sum::<f64>() / n;
        let variance: f64 = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / n;
        let std_dev = variance.sqrt();

        snapshot.mean_return_percent = mean;
        snapshot.std_dev_percent = std_dev;
        snapshot.sharpe = if std_dev > 0.0 {
            Ratio::Value(mean / std_dev)
        } else {
            Ratio::Unbounded
        };

        let negative: Vec<f64> = returns.iter().copied().filter(|&r| r < 0.0).collect();
        snapshot.sortino = if negative.is_empty() {
            Ratio::Unbounded
        } else {
            let downside =
                (negative.iter().map(|r| r * r).sum::<f64>() / negative.len() as f64).sqrt();
            Ratio::Value(mean / downside)
        };

        let initial = equity[0].equity;
        let last = equity[equity.len() - 1].equity;
        snapshot.total_return_percent = if initial > 0.0 {
            (last - initial) / initial * 100.0
        } else {
            0.0
        };

        snapshot.max_drawdown_percent = max_drawdown(equity);
        snapshot.calmar = if snapshot.max_drawdown_percent > 0.0 {
            Ratio::Value(snapshot.total_return_percent / snapshot.max_drawdown_percent)
        } else {
            Ratio::Unbounded
        };

        snapshot
    }

    fn apply_trade_stats(&mut self, trades: &[Trade]) {
        if trades.is_empty() {
            return;
        }

        let mut total_duration = 0.0;
        for trade in trades {
            total_duration += trade.duration_days;
            if trade.pnl > 0.0 {
                self.trades_won += 1;
                self.gross_profit += trade.pnl;
                self.largest_win = self.largest_win.max(trade.pnl);
            } else if trade.pnl < 0.0 {
                self.trades_lost += 1;
                self.gross_loss += trade.pnl.abs();
                self.largest_loss = self.largest_loss.max(trade.pnl.abs());
            }
        }

        self.profit_factor = if self.gross_loss > 0.0 {
            Ratio::Value(self.gross_profit / self.gross_loss)
        } else if self.gross_profit > 0.0 {
            Ratio::Unbounded
        } else {
            Ratio::Value(0.0)
        };

        self.expectancy = trades.iter().map(|t| t.pnl).sum::<f64>() / trades.len() as f64;
        self.avg_win = if self.trades_won > 0 {
            self.gross_profit / self.trades_won as f64
        } else {
            0.0
        };
        self.avg_loss = if self.trades_lost > 0 {
            self.gross_loss / self.trades_lost as f64
        } else {
            0.0
        };
        self.avg_duration_days = total_duration / trades.len() as f64;
    }
}

/// Percentage change of equity between consecutive points.
pub fn step_returns(equity: &[EquityPoint]) -> Vec<f64> {
    equity
        .windows(2)
        .map(|w| {
            if w[0].equity > 0.0 {
                (w[1].equity - w[0].equity) / w[0].equity * 100.0
            } else {
                0.0
            }
        })
        .collect()
}

/// Winning trades as a percentage of all completed trades.
pub fn win_rate(trades: &[Trade]) -> f64 {
    if trades.is_empty() {
        return 0.0;
    }
    let winners = trades.iter().filter(|t| t.is_win()).count();
    winners as f64 / trades.len() as f64 * 100.0
}

/// Run-length of same-outcome trades ending at the most recent trade.
/// Assumes exit-time order; a win is pnl > 0, anything else extends a
/// loss streak.
pub fn current_streak(trades: &[Trade]) -> StreakInfo {
    let last = match trades.last() {
        Some(t) => t,
        None => return StreakInfo::none(),
    };

    let winning = last.is_win();
    let count = trades
        .iter()
        .rev()
        .take_while(|t| t.is_win() == winning)
        .count();

    StreakInfo {
        kind: if winning {
            StreakKind::Win
        } else {
            StreakKind::Loss
        },
        count,
    }
}

/// Trades whose exit time is at or before the cut-off; drives the replay
/// consumer's "up to current step" slices.
pub fn completed_until(trades: &[Trade], cutoff: DateTime<Utc>) -> Vec<Trade> {
    trades
        .iter()
        .filter(|t| t.exit_time <= cutoff)
        .cloned()
        .collect()
}

/// Bucket (count, summed pnl) by hour of day of the trade exit time.
pub fn hourly_performance(trades: &[Trade]) -> HourlyPerformance {
    let mut hours = vec![PerformanceCell::default(); 24];
    for trade in trades {
        let cell = &mut hours[trade.exit_time.hour() as usize];
        cell.trades += 1;
        cell.total_pnl += trade.pnl;
    }
    HourlyPerformance { hours }
}

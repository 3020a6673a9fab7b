//! Completed trade records.
//!
//! Only closed trades feed the metrics; open positions never reach this
//! core. Field names serialize in the camelCase shape the dashboard's JSON
//! uses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Long,
    Short,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trade {
    pub id: String,
    pub side: Side,
    pub entry_time: DateTime<Utc>,
    pub exit_time: DateTime<Utc>,
    pub entry_price: f64,
    pub exit_price: f64,
    pub quantity: f64,
    pub pnl: f64,
    pub pnl_percent: f64,
    pub duration_days: f64,
}

impl Trade {
    pub fn is_win(&self) -> bool {
        self.pnl > 0.0
    }
}

/// Sort a trade log by exit time, ascending. Streaks and replay slicing
/// assume this order.
pub fn sort_by_exit_time(trades: &mut [Trade]) {
    trades.sort_by_key(|t| t.exit_time);
}

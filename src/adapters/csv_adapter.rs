//! CSV file history adapter.
//!
//! Expected column layouts (header row required):
//! - bars:   time,open,high,low,close,volume
//! - equity: time,equity
//! - trades: id,side,entry_time,exit_time,entry_price,exit_price,quantity,pnl,pnl_percent,duration_days
//!
//! Timestamps accept RFC 3339, `%Y-%m-%d %H:%M:%S`, or a bare date
//! (midnight UTC).

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use std::path::{Path, PathBuf};

use crate::domain::bar::Bar;
use crate::domain::equity::EquityPoint;
use crate::domain::error::RetrospectError;
use crate::domain::trade::{Side, Trade};
use crate::ports::data_port::DataPort;

pub struct CsvHistoryAdapter {
    bars_path: Option<PathBuf>,
    equity_path: Option<PathBuf>,
    trades_path: Option<PathBuf>,
}

impl CsvHistoryAdapter {
    pub fn new() -> Self {
        CsvHistoryAdapter {
            bars_path: None,
            equity_path: None,
            trades_path: None,
        }
    }

    pub fn with_bars<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.bars_path = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn with_equity<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.equity_path = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn with_trades<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.trades_path = Some(path.as_ref().to_path_buf());
        self
    }
}

impl Default for CsvHistoryAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl DataPort for CsvHistoryAdapter {
    fn load_bars(&self) -> Result<Vec<Bar>, RetrospectError> {
        let path = self.bars_path.as_ref().ok_or_else(|| RetrospectError::NoData {
            what: "bars file".into(),
        })?;
        let mut rdr = open_reader(path)?;
        let mut bars = Vec::new();

        for (i, result) in rdr.records().enumerate() {
            let record = read_record(result, path, i)?;
            bars.push(Bar {
                time: parse_time(get_field(&record, 0, "time", path)?, path)?,
                open: parse_f64(&record, 1, "open", path)?,
                high: parse_f64(&record, 2, "high", path)?,
                low: parse_f64(&record, 3, "low", path)?,
                close: parse_f64(&record, 4, "close", path)?,
                volume: parse_f64(&record, 5, "volume", path)?,
            });
        }

        Ok(bars)
    }

    fn load_equity_curve(&self) -> Result<Vec<EquityPoint>, RetrospectError> {
        let path = self
            .equity_path
            .as_ref()
            .ok_or_else(|| RetrospectError::NoData {
                what: "equity curve file".into(),
            })?;
        let mut rdr = open_reader(path)?;
        let mut points = Vec::new();

        for (i, result) in rdr.records().enumerate() {
            let record = read_record(result, path, i)?;
            points.push(EquityPoint::new(
                parse_time(get_field(&record, 0, "time", path)?, path)?,
                parse_f64(&record, 1, "equity", path)?,
            ));
        }

        Ok(points)
    }

    fn load_trades(&self) -> Result<Vec<Trade>, RetrospectError> {
        let path = self
            .trades_path
            .as_ref()
            .ok_or_else(|| RetrospectError::NoData {
                what: "trades file".into(),
            })?;
        let mut rdr = open_reader(path)?;
        let mut trades = Vec::new();

        for (i, result) in rdr.records().enumerate() {
            let record = read_record(result, path, i)?;
            trades.push(Trade {
                id: get_field(&record, 0, "id", path)?.to_string(),
                side: parse_side(get_field(&record, 1, "side", path)?, path)?,
                entry_time: parse_time(get_field(&record, 2, "entry_time", path)?, path)?,
                exit_time: parse_time(get_field(&record, 3, "exit_time", path)?, path)?,
                entry_price: parse_f64(&record, 4, "entry_price", path)?,
                exit_price: parse_f64(&record, 5, "exit_price", path)?,
                quantity: parse_f64(&record, 6, "quantity", path)?,
                pnl: parse_f64(&record, 7, "pnl", path)?,
                pnl_percent: parse_f64(&record, 8, "pnl_percent", path)?,
                duration_days: parse_f64(&record, 9, "duration_days", path)?,
            });
        }

        Ok(trades)
    }
}

fn data_error(path: &Path, reason: String) -> RetrospectError {
    RetrospectError::DataFormat {
        file: path.display().to_string(),
        reason,
    }
}

fn open_reader(path: &Path) -> Result<csv::Reader<std::fs::File>, RetrospectError> {
    csv::Reader::from_path(path)
        .map_err(|e| data_error(path, format!("failed to open: {}", e)))
}

fn read_record(
    result: Result<csv::StringRecord, csv::Error>,
    path: &Path,
    row: usize,
) -> Result<csv::StringRecord, RetrospectError> {
    result.map_err(|e| data_error(path, format!("row {}: {}", row + 1, e)))
}

fn get_field<'a>(
    record: &'a csv::StringRecord,
    idx: usize,
    name: &str,
    path: &Path,
) -> Result<&'a str, RetrospectError> {
    record
        .get(idx)
        .ok_or_else(|| data_error(path, format!("missing {} column", name)))
}

fn parse_f64(
    record: &csv::StringRecord,
    idx: usize,
    name: &str,
    path: &Path,
) -> Result<f64, RetrospectError> {
    get_field(record, idx, name, path)?
        .trim()
        .parse()
        .map_err(|e| data_error(path, format!("invalid {} value: {}", name, e)))
}

fn parse_side(value: &str, path: &Path) -> Result<Side, RetrospectError> {
    match value.trim().to_lowercase().as_str() {
        "long" => Ok(Side::Long),
        "short" => Ok(Side::Short),
        other => Err(data_error(path, format!("invalid side value: {}", other))),
    }
}

fn parse_time(value: &str, path: &Path) -> Result<DateTime<Utc>, RetrospectError> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S") {
        return Ok(naive.and_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(date.and_time(chrono::NaiveTime::MIN).and_utc());
    }
    Err(data_error(path, format!("invalid timestamp: {}", value)))
}

#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use retrospect::domain::bar::Bar;
use retrospect::domain::equity::EquityPoint;
use retrospect::domain::error::RetrospectError;
use retrospect::domain::trade::{Side, Trade};
use retrospect::ports::data_port::DataPort;

pub fn day(offset: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::days(offset)
}

pub fn make_bars(prices: &[f64]) -> Vec<Bar> {
    prices
        .iter()
        .enumerate()
        .map(|(i, &close)| Bar {
            time: day(i as i64),
            open: close,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume: 1000.0,
        })
        .collect()
}

pub fn make_equity_curve(values: &[f64]) -> Vec<EquityPoint> {
    values
        .iter()
        .enumerate()
        .map(|(i, &v)| EquityPoint::new(day(i as i64), v))
        .collect()
}

pub fn make_trade(id: &str, pnl: f64, exit_day: i64) -> Trade {
    Trade {
        id: id.to_string(),
        side: if pnl >= 0.0 { Side::Long } else { Side::Short },
        entry_time: day(exit_day - 1),
        exit_time: day(exit_day),
        entry_price: 100.0,
        exit_price: 100.0 + pnl,
        quantity: 1.0,
        pnl,
        pnl_percent: pnl,
        duration_days: 1.0,
    }
}

/// In-memory data source standing in for the CSV adapters.
pub struct MockDataPort {
    pub bars: Vec<Bar>,
    pub equity: Vec<EquityPoint>,
    pub trades: Vec<Trade>,
    pub error: Option<String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            bars: Vec::new(),
            equity: Vec::new(),
            trades: Vec::new(),
            error: None,
        }
    }

    pub fn with_bars(mut self, bars: Vec<Bar>) -> Self {
        self.bars = bars;
        self
    }

    pub fn with_equity(mut self, equity: Vec<EquityPoint>) -> Self {
        self.equity = equity;
        self
    }

    pub fn with_trades(mut self, trades: Vec<Trade>) -> Self {
        self.trades = trades;
        self
    }

    pub fn with_error(mut self, reason: &str) -> Self {
        self.error = Some(reason.to_string());
        self
    }

    fn check(&self) -> Result<(), RetrospectError> {
        match &self.error {
            Some(reason) => Err(RetrospectError::DataFormat {
                file: "<mock>".to_string(),
                reason: reason.clone(),
            }),
            None => Ok(()),
        }
    }
}

impl DataPort for MockDataPort {
    fn load_bars(&self) -> Result<Vec<Bar>, RetrospectError> {
        self.check()?;
        Ok(self.bars.clone())
    }

    fn load_equity_curve(&self) -> Result<Vec<EquityPoint>, RetrospectError> {
        self.check()?;
        Ok(self.equity.clone())
    }

    fn load_trades(&self) -> Result<Vec<Trade>, RetrospectError> {
        self.check()?;
        Ok(self.trades.clone())
    }
}

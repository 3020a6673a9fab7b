//! Named analytics parameters with documented defaults.
//!
//! Everything the calculators need arrives explicitly through this struct;
//! no global or implicit state reaches the pure functions.

use std::time::Duration;

use crate::domain::error::RetrospectError;
use crate::domain::indicator::{
    DEFAULT_ATR_PERIOD, DEFAULT_BOLLINGER_MULT_X100, DEFAULT_BOLLINGER_PERIOD, DEFAULT_MACD_FAST,
    DEFAULT_MACD_SIGNAL, DEFAULT_MACD_SLOW, DEFAULT_RSI_PERIOD, DEFAULT_STOCHASTIC_D,
    DEFAULT_STOCHASTIC_K,
};
use crate::domain::replay::{ReplayConfig, BASE_TICK_MS};
use crate::ports::config_port::ConfigPort;

pub const DEFAULT_HISTOGRAM_BINS: usize = 10;
pub const DEFAULT_MA_PERIOD: usize = 20;

#[derive(Debug, Clone, PartialEq)]
pub struct AnalyticsConfig {
    pub sma_period: usize,
    pub ema_period: usize,
    pub rsi_period: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub bollinger_period: usize,
    pub bollinger_mult_x100: u32,
    pub atr_period: usize,
    pub stochastic_k: usize,
    pub stochastic_d: usize,
    pub histogram_bins: usize,
    pub replay: ReplayConfig,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        AnalyticsConfig {
            sma_period: DEFAULT_MA_PERIOD,
            ema_period: DEFAULT_MA_PERIOD,
            rsi_period: DEFAULT_RSI_PERIOD,
            macd_fast: DEFAULT_MACD_FAST,
            macd_slow: DEFAULT_MACD_SLOW,
            macd_signal: DEFAULT_MACD_SIGNAL,
            bollinger_period: DEFAULT_BOLLINGER_PERIOD,
            bollinger_mult_x100: DEFAULT_BOLLINGER_MULT_X100,
            atr_period: DEFAULT_ATR_PERIOD,
            stochastic_k: DEFAULT_STOCHASTIC_K,
            stochastic_d: DEFAULT_STOCHASTIC_D,
            histogram_bins: DEFAULT_HISTOGRAM_BINS,
            replay: ReplayConfig::default(),
        }
    }
}

impl AnalyticsConfig {
    /// Read parameters from a config source, falling back to the defaults
    /// for anything unset.
    pub fn from_config(cfg: &dyn ConfigPort) -> Self {
        let defaults = Self::default();
        let bollinger_mult =
            cfg.get_double("indicators", "bollinger_mult", defaults.bollinger_mult_x100 as f64 / 100.0);
        let replay = ReplayConfig {
            base_interval: Duration::from_millis(cfg.get_int(
                "replay",
                "base_interval_ms",
                BASE_TICK_MS as i64,
            ) as u64),
            min_speed: cfg.get_double("replay", "min_speed", defaults.replay.min_speed),
            max_speed: cfg.get_double("replay", "max_speed", defaults.replay.max_speed),
        };

        AnalyticsConfig {
            sma_period: cfg.get_int("indicators", "sma_period", defaults.sma_period as i64) as usize,
            ema_period: cfg.get_int("indicators", "ema_period", defaults.ema_period as i64) as usize,
            rsi_period: cfg.get_int("indicators", "rsi_period", defaults.rsi_period as i64) as usize,
            macd_fast: cfg.get_int("indicators", "macd_fast", defaults.macd_fast as i64) as usize,
            macd_slow: cfg.get_int("indicators", "macd_slow", defaults.macd_slow as i64) as usize,
            macd_signal: cfg.get_int("indicators", "macd_signal", defaults.macd_signal as i64)
                as usize,
            bollinger_period: cfg.get_int(
                "indicators",
                "bollinger_period",
                defaults.bollinger_period as i64,
            ) as usize,
            bollinger_mult_x100: (bollinger_mult * 100.0).round() as u32,
            atr_period: cfg.get_int("indicators", "atr_period", defaults.atr_period as i64) as usize,
            stochastic_k: cfg.get_int("indicators", "stochastic_k", defaults.stochastic_k as i64)
                as usize,
            stochastic_d: cfg.get_int("indicators", "stochastic_d", defaults.stochastic_d as i64)
                as usize,
            histogram_bins: cfg.get_int(
                "distribution",
                "histogram_bins",
                defaults.histogram_bins as i64,
            ) as usize,
            replay,
        }
    }

    pub fn validate(&self) -> Result<(), RetrospectError> {
        let invalid = |section: &str, key: &str, reason: &str| RetrospectError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: reason.to_string(),
        };

        let periods = [
            ("sma_period", self.sma_period),
            ("ema_period", self.ema_period),
            ("rsi_period", self.rsi_period),
            ("macd_fast", self.macd_fast),
            ("macd_slow", self.macd_slow),
            ("macd_signal", self.macd_signal),
            ("bollinger_period", self.bollinger_period),
            ("atr_period", self.atr_period),
            ("stochastic_k", self.stochastic_k),
            ("stochastic_d", self.stochastic_d),
        ];
        for (key, value) in periods {
            if value == 0 {
                return Err(invalid("indicators", key, "period must be at least 1"));
            }
        }
        if self.macd_fast >= self.macd_slow {
            return Err(invalid(
                "indicators",
                "macd_fast",
                "fast period must be shorter than slow period",
            ));
        }
        if self.bollinger_mult_x100 == 0 {
            return Err(invalid(
                "indicators",
                "bollinger_mult",
                "multiplier must be positive",
            ));
        }
        if self.histogram_bins == 0 {
            return Err(invalid(
                "distribution",
                "histogram_bins",
                "bin count must be at least 1",
            ));
        }
        if self.replay.base_interval.is_zero() {
            return Err(invalid(
                "replay",
                "base_interval_ms",
                "interval must be positive",
            ));
        }
        if self.replay.min_speed <= 0.0 || self.replay.max_speed < self.replay.min_speed {
            return Err(invalid(
                "replay",
                "min_speed",
                "speed range must be positive with min <= max",
            ));
        }
        Ok(())
    }
}

//! retrospect: backtest analytics engine.
//!
//! Deterministic numeric routines behind a backtest results dashboard:
//! technical indicators, performance statistics, distribution aggregation,
//! and a cursor-driven replay of a finished run.
//!
//! Hexagonal architecture: domain logic in [`domain`], port traits in
//! [`ports`], concrete implementations in [`adapters`].

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod cli;

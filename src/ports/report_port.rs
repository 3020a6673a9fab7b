//! Report output port trait.

use crate::domain::analysis::BacktestAnalysis;
use crate::domain::error::RetrospectError;

/// Port for writing a finished analysis somewhere a consumer can read it.
pub trait ReportPort {
    fn write(&self, analysis: &BacktestAnalysis) -> Result<(), RetrospectError>;
}

//! JSON report adapter.
//!
//! Serializes a [`BacktestAnalysis`] to pretty-printed JSON, either to a
//! file or to stdout, so the analysis crosses a process boundary as plain
//! records.

use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::analysis::BacktestAnalysis;
use crate::domain::error::RetrospectError;
use crate::ports::report_port::ReportPort;

pub struct JsonReportAdapter {
    output: Option<PathBuf>,
}

impl JsonReportAdapter {
    /// Write to the given file.
    pub fn to_file<P: AsRef<Path>>(path: P) -> Self {
        JsonReportAdapter {
            output: Some(path.as_ref().to_path_buf()),
        }
    }

    /// Write to stdout.
    pub fn to_stdout() -> Self {
        JsonReportAdapter { output: None }
    }
}

impl ReportPort for JsonReportAdapter {
    fn write(&self, analysis: &BacktestAnalysis) -> Result<(), RetrospectError> {
        let json = serde_json::to_string_pretty(analysis)?;
        match &self.output {
            Some(path) => fs::write(path, json)?,
            None => println!("{}", json),
        }
        Ok(())
    }
}

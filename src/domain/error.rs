//! Domain error types.
//!
//! The analytics calculations are total functions and never fail; errors
//! exist only at the edges (file loading, config, report output).

/// Top-level error type for retrospect.
#[derive(Debug, thiserror::Error)]
pub enum RetrospectError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("data format error in {file}: {reason}")]
    DataFormat { file: String, reason: String },

    #[error("no {what} supplied")]
    NoData { what: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("report serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<&RetrospectError> for std::process::ExitCode {
    fn from(err: &RetrospectError) -> Self {
        let code: u8 = match err {
            RetrospectError::Io(_) => 1,
            RetrospectError::ConfigParse { .. } | RetrospectError::ConfigInvalid { .. } => 2,
            RetrospectError::DataFormat { .. } | RetrospectError::NoData { .. } => 3,
            RetrospectError::Json(_) => 4,
        };
        std::process::ExitCode::from(code)
    }
}

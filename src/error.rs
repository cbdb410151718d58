use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// Errors that abort a reconciliation run. Per-record match failures
/// are never errors; they land in the unmatched report instead.
#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("source '{source_name}' is missing required column '{column}'")]
    MissingColumn { source_name: String, column: String },
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

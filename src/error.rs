//! Error Types
//! Failure kinds shared by loading, filtering, aggregation and view dispatch.

use polars::prelude::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("Data unavailable at {path}: {reason}")]
    DataUnavailable { path: PathBuf, reason: String },

    #[error("Schema mismatch: {0}")]
    SchemaMismatch(String),

    #[error("No rows to summarize")]
    EmptyInput,

    #[error("Invalid selection '{value}' for {field} (expected one of: {})", allowed.join(", "))]
    InvalidSelection {
        field: String,
        value: String,
        allowed: Vec<String>,
    },

    #[error("Column '{0}' has no variance")]
    InsufficientVariance(String),

    #[error("Unknown column '{0}'")]
    UnknownColumn(String),

    #[error("Column '{0}' is not numeric")]
    NotNumeric(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
}

pub type Result<T> = std::result::Result<T, DashboardError>;

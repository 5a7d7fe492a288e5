//! CSV Data Loader Module
//! Reads a delimited-text sales file into a validated `Table` using Polars.

use crate::data::{DatasetProfile, Table};
use crate::error::{DashboardError, Result};
use polars::prelude::*;
use std::path::Path;
use tracing::{debug, info};

/// Rows sampled when inferring column dtypes.
pub const INFER_SCHEMA_ROWS: usize = 10_000;

/// Loads sales CSV files. Stateless: the caller owns the resulting `Table`.
pub struct DataLoader;

impl DataLoader {
    /// Load a CSV file with a header row and check it against `profile`.
    pub fn load(path: &Path, profile: &DatasetProfile) -> Result<Table> {
        if !path.is_file() {
            return Err(DashboardError::DataUnavailable {
                path: path.to_path_buf(),
                reason: "file not found".to_string(),
            });
        }

        debug!(path = %path.display(), profile = %profile.name, "reading CSV");

        let df = LazyCsvReader::new(path)
            .with_has_header(true)
            .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
            .finish()
            .and_then(|lazy| lazy.collect())
            .map_err(|e| DashboardError::DataUnavailable {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        let table = Table::from_frame(df, profile)?;
        info!(
            path = %path.display(),
            rows = table.height(),
            columns = table.schema().len(),
            "dataset loaded"
        );
        Ok(table)
    }
}

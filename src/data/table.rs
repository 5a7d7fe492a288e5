//! Table Module
//! Immutable, schema-checked view over a loaded polars DataFrame.

use crate::data::DatasetProfile;
use crate::error::{DashboardError, Result};
use polars::prelude::*;
use serde::Serialize;

/// Semantic type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    Categorical,
    Numeric,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnSpec {
    pub name: String,
    pub kind: ColumnKind,
}

/// One cell of a row slice handed to the rendering layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Number(f64),
    Text(String),
    Missing,
}

/// A head/tail extract of a table, materialized row by row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableSlice {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

/// Loaded dataset. Never mutated; filtering produces a new `Table`.
#[derive(Debug, Clone)]
pub struct Table {
    frame: DataFrame,
    schema: Vec<ColumnSpec>,
}

pub(crate) fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Float32
            | DataType::Float64
            | DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
    )
}

impl Table {
    /// Validate `frame` against `profile` and wrap it.
    ///
    /// Region/Channel are forced to string categories. Declared numeric columns
    /// must have a numeric dtype, and no declared column may contain nulls.
    /// An empty frame takes its declared numeric columns as `Float64`.
    pub fn from_frame(mut frame: DataFrame, profile: &DatasetProfile) -> Result<Self> {
        let names: Vec<String> = frame
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();

        let required_numeric = profile.required_numeric();
        let missing: Vec<String> = profile
            .required_categorical()
            .iter()
            .map(|s| s.to_string())
            .chain(required_numeric.iter().cloned())
            .filter(|col| !names.contains(col))
            .collect();
        if !missing.is_empty() {
            return Err(DashboardError::SchemaMismatch(format!(
                "missing columns: {}",
                missing.join(", ")
            )));
        }

        for name in profile.required_categorical() {
            let as_text = frame.column(name)?.cast(&DataType::String)?;
            frame.with_column(as_text)?;
        }

        // a header-only file carries no values to infer from
        if frame.height() == 0 {
            for name in &required_numeric {
                let as_number = frame.column(name)?.cast(&DataType::Float64)?;
                frame.with_column(as_number)?;
            }
        }

        for name in &required_numeric {
            let dtype = frame.column(name)?.dtype().clone();
            if !is_numeric_dtype(&dtype) {
                return Err(DashboardError::SchemaMismatch(format!(
                    "column '{name}' should be numeric but was read as {dtype}"
                )));
            }
        }

        for name in profile
            .required_categorical()
            .iter()
            .copied()
            .chain(required_numeric.iter().map(String::as_str))
        {
            let nulls = frame.column(name)?.null_count();
            if nulls > 0 {
                return Err(DashboardError::SchemaMismatch(format!(
                    "column '{name}' has {nulls} missing values"
                )));
            }
        }

        let categorical = profile.required_categorical();
        let schema = frame
            .get_columns()
            .iter()
            .map(|col| {
                let name = col.name().to_string();
                let kind = if !categorical.contains(&name.as_str()) && is_numeric_dtype(col.dtype())
                {
                    ColumnKind::Numeric
                } else {
                    ColumnKind::Categorical
                };
                ColumnSpec { name, kind }
            })
            .collect();

        Ok(Self { frame, schema })
    }

    /// Wrap a frame derived from this table (same columns, subset of rows).
    pub(crate) fn with_frame(&self, frame: DataFrame) -> Self {
        Self {
            frame,
            schema: self.schema.clone(),
        }
    }

    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    pub fn schema(&self) -> &[ColumnSpec] {
        &self.schema
    }

    pub fn height(&self) -> usize {
        self.frame.height()
    }

    pub fn is_empty(&self) -> bool {
        self.frame.height() == 0
    }

    pub fn column_names(&self) -> Vec<String> {
        self.schema.iter().map(|c| c.name.clone()).collect()
    }

    /// Names of numeric columns in file order.
    pub fn numeric_columns(&self) -> Vec<String> {
        self.schema
            .iter()
            .filter(|c| c.kind == ColumnKind::Numeric)
            .map(|c| c.name.clone())
            .collect()
    }

    pub fn kind_of(&self, column: &str) -> Result<ColumnKind> {
        self.schema
            .iter()
            .find(|c| c.name == column)
            .map(|c| c.kind)
            .ok_or_else(|| DashboardError::UnknownColumn(column.to_string()))
    }

    /// Numeric values of `column` as f64, nulls kept as `None`.
    pub fn values(&self, column: &str) -> Result<Vec<Option<f64>>> {
        if self.kind_of(column)? != ColumnKind::Numeric {
            return Err(DashboardError::NotNumeric(column.to_string()));
        }
        let as_f64 = self.frame.column(column)?.cast(&DataType::Float64)?;
        let values = as_f64.f64()?.into_iter().collect();
        Ok(values)
    }

    /// Non-null numeric values of `column`.
    pub fn present_values(&self, column: &str) -> Result<Vec<f64>> {
        Ok(self.values(column)?.into_iter().flatten().collect())
    }

    /// Values of `column` rendered as labels; nulls become empty strings.
    pub fn labels(&self, column: &str) -> Result<Vec<String>> {
        self.kind_of(column)?;
        let as_text = self.frame.column(column)?.cast(&DataType::String)?;
        let labels = as_text
            .as_materialized_series()
            .str()?
            .into_iter()
            .map(|v| v.unwrap_or_default().to_string())
            .collect();
        Ok(labels)
    }

    /// Sorted unique labels observed in `column`.
    pub fn distinct_values(&self, column: &str) -> Result<Vec<String>> {
        let mut labels = self.labels(column)?;
        labels.sort();
        labels.dedup();
        Ok(labels)
    }

    /// Same columns, same kinds and same cell values.
    pub fn same_content(&self, other: &Table) -> bool {
        self.schema == other.schema && self.frame.equals_missing(&other.frame)
    }

    pub fn head(&self, n: usize) -> Result<TableSlice> {
        self.with_frame(self.frame.head(Some(n))).to_slice()
    }

    pub fn tail(&self, n: usize) -> Result<TableSlice> {
        self.with_frame(self.frame.tail(Some(n))).to_slice()
    }

    fn to_slice(&self) -> Result<TableSlice> {
        let mut by_column: Vec<Vec<Cell>> = Vec::with_capacity(self.schema.len());
        for spec in &self.schema {
            let cells = match spec.kind {
                ColumnKind::Numeric => self
                    .values(&spec.name)?
                    .into_iter()
                    .map(|v| v.map(Cell::Number).unwrap_or(Cell::Missing))
                    .collect(),
                ColumnKind::Categorical => {
                    self.labels(&spec.name)?.into_iter().map(Cell::Text).collect()
                }
            };
            by_column.push(cells);
        }

        let rows = (0..self.height())
            .map(|i| by_column.iter().map(|cells| cells[i].clone()).collect())
            .collect();

        Ok(TableSlice {
            columns: self.column_names(),
            rows,
        })
    }
}

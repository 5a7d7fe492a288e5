//! Aggregator Module
//! Table-level summaries: describe, grouped reductions, correlation and counts.

use crate::data::{ColumnKind, Table};
use crate::error::{DashboardError, Result};
use crate::stats::calculator::{BoxStats, ColumnStats, Histogram, StatsCalculator};
use polars::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;

/// How values are reduced within a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Reduction {
    Mean,
    Sum,
}

impl Reduction {
    fn apply(self, expr: Expr) -> Expr {
        match self {
            Reduction::Mean => expr.mean(),
            Reduction::Sum => expr.sum(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupRow {
    pub key: String,
    pub values: Vec<f64>,
}

/// Grouped numeric summary keyed by category, one value per value column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregationResult {
    pub group_column: String,
    pub value_columns: Vec<String>,
    pub reduction: Reduction,
    pub groups: Vec<GroupRow>,
}

impl AggregationResult {
    pub fn keys(&self) -> Vec<&str> {
        self.groups.iter().map(|g| g.key.as_str()).collect()
    }

    pub fn get(&self, key: &str) -> Option<&[f64]> {
        self.groups
            .iter()
            .find(|g| g.key == key)
            .map(|g| g.values.as_slice())
    }

    pub fn value(&self, key: &str, column: &str) -> Option<f64> {
        let idx = self.value_columns.iter().position(|c| c == column)?;
        self.get(key).map(|values| values[idx])
    }

    /// Sum across value columns per group, ascending by total.
    pub fn row_totals(&self) -> Vec<(String, f64)> {
        let mut totals: Vec<(String, f64)> = self
            .groups
            .iter()
            .map(|g| (g.key.clone(), g.values.iter().sum()))
            .collect();
        totals.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
        totals
    }
}

/// Pearson coefficients for every pair of columns.
///
/// Entries are `None` where the coefficient is undefined (zero variance or fewer
/// than two paired observations).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    pub values: Vec<Vec<Option<f64>>>,
    pub undefined_columns: Vec<String>,
}

impl CorrelationMatrix {
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == a)?;
        let j = self.columns.iter().position(|c| c == b)?;
        self.values[i][j]
    }
}

/// Occurrences of one category label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryCount {
    pub label: String,
    pub count: usize,
    /// Percentage of all rows, 0-100.
    pub share: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnTotal {
    pub column: String,
    pub total: f64,
}

pub struct Aggregator;

impl Aggregator {
    fn require_numeric(table: &Table, columns: &[String]) -> Result<()> {
        for column in columns {
            if table.kind_of(column)? != ColumnKind::Numeric {
                return Err(DashboardError::NotNumeric(column.clone()));
            }
        }
        Ok(())
    }

    /// count, mean, std, min, quartiles and max per column.
    pub fn describe(table: &Table, columns: &[String]) -> Result<Vec<ColumnStats>> {
        if table.is_empty() {
            return Err(DashboardError::EmptyInput);
        }
        Self::require_numeric(table, columns)?;

        let mut stats = Vec::with_capacity(columns.len());
        for column in columns {
            let values = table.present_values(column)?;
            if let Some(s) = StatsCalculator::compute_descriptive_stats(column, &values) {
                stats.push(s);
            }
        }
        Ok(stats)
    }

    pub fn group_mean(
        table: &Table,
        group_column: &str,
        value_columns: &[String],
    ) -> Result<AggregationResult> {
        Self::grouped(table, group_column, value_columns, Reduction::Mean)
    }

    pub fn group_sum(
        table: &Table,
        group_column: &str,
        value_columns: &[String],
    ) -> Result<AggregationResult> {
        Self::grouped(table, group_column, value_columns, Reduction::Sum)
    }

    fn grouped(
        table: &Table,
        group_column: &str,
        value_columns: &[String],
        reduction: Reduction,
    ) -> Result<AggregationResult> {
        table.kind_of(group_column)?;
        Self::require_numeric(table, value_columns)?;

        let mut columns: Vec<String> = Vec::with_capacity(value_columns.len());
        for column in value_columns {
            if column != group_column && !columns.contains(column) {
                columns.push(column.clone());
            }
        }

        let aggs: Vec<Expr> = columns
            .iter()
            .map(|c| reduction.apply(col(c.as_str()).cast(DataType::Float64)))
            .collect();

        let out = table
            .frame()
            .clone()
            .lazy()
            .group_by_stable([col(group_column)])
            .agg(aggs)
            .collect()?;

        let keys_col = out.column(group_column)?.cast(&DataType::String)?;
        let keys: Vec<String> = keys_col
            .as_materialized_series()
            .str()?
            .into_iter()
            .map(|k| k.unwrap_or_default().to_string())
            .collect();

        let mut per_column: Vec<Vec<f64>> = Vec::with_capacity(columns.len());
        for column in &columns {
            let reduced = out.column(column)?.cast(&DataType::Float64)?;
            per_column.push(
                reduced
                    .f64()?
                    .into_iter()
                    .map(|v| v.unwrap_or(f64::NAN))
                    .collect(),
            );
        }

        let mut groups: Vec<GroupRow> = keys
            .into_iter()
            .enumerate()
            .map(|(i, key)| GroupRow {
                key,
                values: per_column.iter().map(|values| values[i]).collect(),
            })
            .collect();
        groups.sort_by(|a, b| a.key.cmp(&b.key));

        Ok(AggregationResult {
            group_column: group_column.to_string(),
            value_columns: columns,
            reduction,
            groups,
        })
    }

    fn paired(xs: &[Option<f64>], ys: &[Option<f64>]) -> (Vec<f64>, Vec<f64>) {
        xs.iter()
            .zip(ys.iter())
            .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
            .unzip()
    }

    /// Pearson correlation between two numeric columns.
    pub fn correlation(table: &Table, a: &str, b: &str) -> Result<f64> {
        if table.is_empty() {
            return Err(DashboardError::EmptyInput);
        }
        let xs = table.values(a)?;
        let ys = table.values(b)?;
        let (xs, ys) = Self::paired(&xs, &ys);

        for (name, sample) in [(a, &xs), (b, &ys)] {
            if StatsCalculator::pearson(sample, sample).is_none() {
                return Err(DashboardError::InsufficientVariance(name.to_string()));
            }
        }
        StatsCalculator::pearson(&xs, &ys)
            .ok_or_else(|| DashboardError::InsufficientVariance(format!("{a}/{b}")))
    }

    /// Symmetric Pearson matrix over `columns`, pairwise complete observations.
    pub fn correlation_matrix(table: &Table, columns: &[String]) -> Result<CorrelationMatrix> {
        if table.is_empty() {
            return Err(DashboardError::EmptyInput);
        }
        Self::require_numeric(table, columns)?;

        let samples: Vec<Vec<Option<f64>>> = columns
            .iter()
            .map(|c| table.values(c))
            .collect::<Result<_>>()?;

        let n = columns.len();
        let mut values = vec![vec![None; n]; n];
        for i in 0..n {
            for j in i..n {
                let (xs, ys) = Self::paired(&samples[i], &samples[j]);
                let r = if i == j {
                    StatsCalculator::pearson(&xs, &ys).map(|_| 1.0)
                } else {
                    StatsCalculator::pearson(&xs, &ys)
                };
                values[i][j] = r;
                values[j][i] = r;
            }
        }

        let undefined_columns = columns
            .iter()
            .enumerate()
            .filter(|(i, _)| values[*i][*i].is_none())
            .map(|(_, c)| c.clone())
            .collect();

        Ok(CorrelationMatrix {
            columns: columns.to_vec(),
            values,
            undefined_columns,
        })
    }

    /// Category counts ordered by descending count, then label.
    pub fn value_counts(table: &Table, column: &str) -> Result<Vec<CategoryCount>> {
        let labels = table.labels(column)?;
        let total = labels.len();

        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        for label in labels {
            *counts.entry(label).or_default() += 1;
        }

        let mut counts: Vec<CategoryCount> = counts
            .into_iter()
            .map(|(label, count)| CategoryCount {
                label,
                count,
                share: if total == 0 {
                    0.0
                } else {
                    100.0 * count as f64 / total as f64
                },
            })
            .collect();
        counts.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));
        Ok(counts)
    }

    /// Column sums, ascending by total.
    pub fn column_totals(table: &Table, columns: &[String]) -> Result<Vec<ColumnTotal>> {
        Self::require_numeric(table, columns)?;

        let mut totals = columns
            .iter()
            .map(|column| {
                Ok(ColumnTotal {
                    column: column.clone(),
                    total: table.present_values(column)?.iter().sum(),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        totals.sort_by(|a, b| {
            a.total
                .partial_cmp(&b.total)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        Ok(totals)
    }

    pub fn histograms(table: &Table, columns: &[String], bins: usize) -> Result<Vec<Histogram>> {
        Self::require_numeric(table, columns)?;
        columns
            .iter()
            .map(|column| {
                let values = table.present_values(column)?;
                Ok(StatsCalculator::histogram(column, &values, bins))
            })
            .collect()
    }

    /// Box summaries of `value_column` per category of `group_column`, sorted by group.
    pub fn box_summary(
        table: &Table,
        group_column: &str,
        value_column: &str,
    ) -> Result<Vec<BoxStats>> {
        let labels = table.labels(group_column)?;
        let values = table.values(value_column)?;

        let mut by_group: BTreeMap<String, Vec<f64>> = BTreeMap::new();
        for (label, value) in labels.into_iter().zip(values) {
            if let Some(v) = value {
                by_group.entry(label).or_default().push(v);
            }
        }

        Ok(by_group
            .iter()
            .filter_map(|(group, values)| StatsCalculator::box_stats(group, values))
            .collect())
    }
}

//! Filter Module
//! Narrows a table by optional Region and Channel selections.

use crate::data::{DatasetProfile, Table};
use crate::error::{DashboardError, Result};
use polars::prelude::*;
use serde::Serialize;
use std::fmt;
use tracing::debug;

/// Selector value for one categorical field.
///
/// `All` is a sentinel meaning "no constraint"; it never matches a category label.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Choice {
    #[default]
    All,
    Only(String),
}

impl Choice {
    pub fn only(value: impl Into<String>) -> Self {
        Choice::Only(value.into())
    }
}

/// An absent selection means no constraint. A given one is matched verbatim,
/// so a category literally named "All" stays selectable.
impl From<Option<String>> for Choice {
    fn from(value: Option<String>) -> Self {
        value.map_or(Choice::All, Choice::Only)
    }
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Choice::All => write!(f, "All"),
            Choice::Only(value) => write!(f, "{value}"),
        }
    }
}

/// Region/Channel filter bound to a dataset's category columns.
#[derive(Debug, Clone)]
pub struct Filter {
    region_column: String,
    channel_column: String,
}

impl Filter {
    pub fn for_profile(profile: &DatasetProfile) -> Self {
        Self {
            region_column: profile.region_column.clone(),
            channel_column: profile.channel_column.clone(),
        }
    }

    /// Reject a selection that is not an observed value of `column`.
    pub fn validate(table: &Table, column: &str, choice: &Choice) -> Result<()> {
        let Choice::Only(value) = choice else {
            return Ok(());
        };

        let allowed = table.distinct_values(column)?;
        if allowed.iter().any(|v| v == value) {
            Ok(())
        } else {
            Err(DashboardError::InvalidSelection {
                field: column.to_string(),
                value: value.clone(),
                allowed,
            })
        }
    }

    /// Rows matching every given constraint. An empty result is not an error.
    pub fn apply(&self, table: &Table, region: &Choice, channel: &Choice) -> Result<Table> {
        let mut predicate: Option<Expr> = None;

        for (column, choice) in [(&self.region_column, region), (&self.channel_column, channel)] {
            Self::validate(table, column, choice)?;
            if let Choice::Only(value) = choice {
                let cond = col(column.as_str()).eq(lit(value.as_str()));
                predicate = Some(match predicate {
                    Some(existing) => existing.and(cond),
                    None => cond,
                });
            }
        }

        let Some(predicate) = predicate else {
            return Ok(table.clone());
        };

        let frame = table.frame().clone().lazy().filter(predicate).collect()?;
        debug!(
            %region,
            %channel,
            before = table.height(),
            after = frame.height(),
            "filter applied"
        );
        Ok(table.with_frame(frame))
    }
}

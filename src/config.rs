//! Dashboard Configuration
//! Settings resolved from an optional JSON file, then overridden by CLI flags.

use crate::data::DatasetProfile;
use crate::error::{DashboardError, Result};
use crate::views::ViewSettings;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Which dataset profile to load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum DatasetKind {
    #[default]
    Beans,
    Health,
    /// Profile declared under `custom_profile` in the config file.
    Custom,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub dataset: DatasetKind,
    /// Defaults to the profile's file name in the working directory.
    pub data_path: Option<PathBuf>,
    pub preview_rows: usize,
    pub sample_rows: usize,
    pub histogram_bins: usize,
    pub custom_profile: Option<DatasetProfile>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        let settings = ViewSettings::default();
        Self {
            dataset: DatasetKind::default(),
            data_path: None,
            preview_rows: settings.preview_rows,
            sample_rows: settings.sample_rows,
            histogram_bins: settings.histogram_bins,
            custom_profile: None,
        }
    }
}

impl DashboardConfig {
    /// Read a JSON config file. Missing fields take their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .map_err(|e| DashboardError::Config(format!("{}: {e}", path.display())))?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(text).map_err(|e| DashboardError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.histogram_bins == 0 {
            return Err(DashboardError::Config(
                "histogram_bins must be at least 1".to_string(),
            ));
        }
        if self.dataset == DatasetKind::Custom {
            let profile = self.custom_profile.as_ref().ok_or_else(|| {
                DashboardError::Config("dataset 'custom' requires custom_profile".to_string())
            })?;
            if profile.product_columns.is_empty() {
                return Err(DashboardError::Config(
                    "custom_profile must declare at least one product column".to_string(),
                ));
            }
        }
        Ok(())
    }

    pub fn profile(&self) -> Result<DatasetProfile> {
        match self.dataset {
            DatasetKind::Beans => Ok(DatasetProfile::beans()),
            DatasetKind::Health => Ok(DatasetProfile::health()),
            DatasetKind::Custom => self.custom_profile.clone().ok_or_else(|| {
                DashboardError::Config("dataset 'custom' requires custom_profile".to_string())
            }),
        }
    }

    /// Explicit `data_path`, else the profile's default file name.
    pub fn data_path(&self, profile: &DatasetProfile) -> Result<PathBuf> {
        self.data_path
            .clone()
            .or_else(|| profile.default_file.as_ref().map(PathBuf::from))
            .ok_or_else(|| {
                DashboardError::Config(format!(
                    "no data_path given and profile '{}' has no default file",
                    profile.name
                ))
            })
    }

    pub fn view_settings(&self) -> ViewSettings {
        ViewSettings {
            preview_rows: self.preview_rows,
            sample_rows: self.sample_rows,
            histogram_bins: self.histogram_bins,
        }
    }
}

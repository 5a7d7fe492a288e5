//! Sales Dashboard - CSV sales dataset exploration and reporting
//!
//! Loads a sales table once, then answers navigation requests (home, exploration,
//! correlation, visualizations, performance, report) with computed payloads.

pub mod config;
pub mod data;
pub mod error;
pub mod stats;
pub mod views;

pub use config::{DashboardConfig, DatasetKind};
pub use data::{Choice, DataLoader, DatasetProfile, Filter, Table};
pub use error::{DashboardError, Result};
pub use stats::Aggregator;
pub use views::{Dashboard, Page, View, ViewRequest, ViewSettings};

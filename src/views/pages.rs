//! Display payloads produced by each navigation view.
//!
//! Payloads are plain owned values; the rendering layer decides how to draw them.

use crate::data::{Choice, ColumnSpec, ReportNotes, TableSlice};
use crate::stats::{
    AggregationResult, BoxStats, CategoryCount, ColumnStats, ColumnTotal, CorrelationMatrix,
    Histogram,
};
use crate::views::View;
use serde::Serialize;

/// Message attached to every "no data" outcome caused by filtering.
pub const NO_DATA_MESSAGE: &str = "No data available for the selected filters.";

/// A computed section, or an explicit "no data" signal with a user-facing message.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum Outcome<T> {
    Data(T),
    NoData(String),
}

impl<T> Outcome<T> {
    pub fn no_data() -> Self {
        Outcome::NoData(NO_DATA_MESSAGE.to_string())
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            Outcome::Data(value) => Some(value),
            Outcome::NoData(_) => None,
        }
    }

    pub fn is_no_data(&self) -> bool {
        matches!(self, Outcome::NoData(_))
    }
}

/// Summed sales attributed to one category label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub label: String,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HomePage {
    pub title: String,
    pub tagline: String,
    pub row_count: usize,
    pub columns: Vec<ColumnSpec>,
    pub preview: TableSlice,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExplorationPage {
    pub head: TableSlice,
    pub tail: TableSlice,
    pub stats: Outcome<Vec<ColumnStats>>,
    pub channel_shares: Vec<CategoryCount>,
    pub region_counts: Vec<CategoryCount>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationPage {
    pub matrix: Outcome<CorrelationMatrix>,
    pub region_means: AggregationResult,
    pub channel_means: AggregationResult,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisualizationsPage {
    pub product_options: Vec<String>,
    pub histograms: Vec<Histogram>,
    pub selected_product: String,
    pub box_by_region: Vec<BoxStats>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformancePage {
    pub region: Choice,
    pub channel: Choice,
    pub region_options: Vec<String>,
    pub channel_options: Vec<String>,
    pub matched_rows: usize,
    /// Total sales per product, ascending.
    pub product_totals: Outcome<Vec<ColumnTotal>>,
    /// Total sales of all products per region, ascending.
    pub region_totals: Outcome<Vec<CategoryTotal>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportPage {
    pub title: String,
    pub notes: ReportNotes,
    /// Products by total sales, best first.
    pub product_ranking: Vec<ColumnTotal>,
    pub leading_channel: Option<CategoryTotal>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "view", content = "payload", rename_all = "snake_case")]
pub enum Page {
    Home(HomePage),
    Exploration(ExplorationPage),
    CorrelationAnalysis(CorrelationPage),
    Visualizations(VisualizationsPage),
    PerformanceAnalysis(PerformancePage),
    Report(ReportPage),
}

impl Page {
    pub fn view(&self) -> View {
        match self {
            Page::Home(_) => View::Home,
            Page::Exploration(_) => View::Exploration,
            Page::CorrelationAnalysis(_) => View::CorrelationAnalysis,
            Page::Visualizations(_) => View::Visualizations,
            Page::PerformanceAnalysis(_) => View::PerformanceAnalysis,
            Page::Report(_) => View::Report,
        }
    }
}

//! Menu Dispatcher
//! Maps a navigation request to the view handler that builds its payload.

use crate::data::{Choice, DataLoader, DatasetProfile, Filter, Table};
use crate::error::{DashboardError, Result};
use crate::stats::Aggregator;
use crate::views::pages::*;
use serde::Serialize;
use std::path::Path;
use tracing::{debug, warn};

/// The six navigation entries, in menu order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    Home,
    Exploration,
    CorrelationAnalysis,
    Visualizations,
    PerformanceAnalysis,
    Report,
}

impl View {
    pub const ALL: [View; 6] = [
        View::Home,
        View::Exploration,
        View::CorrelationAnalysis,
        View::Visualizations,
        View::PerformanceAnalysis,
        View::Report,
    ];

    pub fn label(self) -> &'static str {
        match self {
            View::Home => "Home",
            View::Exploration => "Exploration",
            View::CorrelationAnalysis => "Correlation Analysis",
            View::Visualizations => "Visualizations",
            View::PerformanceAnalysis => "Performance Analysis",
            View::Report => "Report",
        }
    }
}

/// One user interaction: the selected view plus that view's selector state.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewRequest {
    Home,
    Exploration,
    CorrelationAnalysis,
    /// `None` selects the first product.
    Visualizations { product: Option<String> },
    PerformanceAnalysis { region: Choice, channel: Choice },
    Report,
}

impl ViewRequest {
    /// Request with every selector at its default.
    pub fn default_for(view: View) -> Self {
        match view {
            View::Home => ViewRequest::Home,
            View::Exploration => ViewRequest::Exploration,
            View::CorrelationAnalysis => ViewRequest::CorrelationAnalysis,
            View::Visualizations => ViewRequest::Visualizations { product: None },
            View::PerformanceAnalysis => ViewRequest::PerformanceAnalysis {
                region: Choice::All,
                channel: Choice::All,
            },
            View::Report => ViewRequest::Report,
        }
    }

    pub fn view(&self) -> View {
        match self {
            ViewRequest::Home => View::Home,
            ViewRequest::Exploration => View::Exploration,
            ViewRequest::CorrelationAnalysis => View::CorrelationAnalysis,
            ViewRequest::Visualizations { .. } => View::Visualizations,
            ViewRequest::PerformanceAnalysis { .. } => View::PerformanceAnalysis,
            ViewRequest::Report => View::Report,
        }
    }
}

/// Row counts and bin counts used by the views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewSettings {
    pub preview_rows: usize,
    pub sample_rows: usize,
    pub histogram_bins: usize,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            preview_rows: 5,
            sample_rows: 10,
            histogram_bins: 20,
        }
    }
}

/// A dashboard session: owns the loaded table and answers view requests.
pub struct Dashboard {
    table: Table,
    profile: DatasetProfile,
    filter: Filter,
    settings: ViewSettings,
}

impl Dashboard {
    pub fn new(table: Table, profile: DatasetProfile, settings: ViewSettings) -> Self {
        Self {
            filter: Filter::for_profile(&profile),
            table,
            profile,
            settings,
        }
    }

    /// Load `path` once and start a session over it.
    pub fn open(path: &Path, profile: DatasetProfile, settings: ViewSettings) -> Result<Self> {
        let table = DataLoader::load(path, &profile)?;
        Ok(Self::new(table, profile, settings))
    }

    pub fn menu(&self) -> Vec<&'static str> {
        View::ALL.iter().map(|v| v.label()).collect()
    }

    pub fn region_options(&self) -> Result<Vec<String>> {
        self.table.distinct_values(&self.profile.region_column)
    }

    pub fn channel_options(&self) -> Result<Vec<String>> {
        self.table.distinct_values(&self.profile.channel_column)
    }

    /// Build the payload for one request. Each call recomputes from the table.
    pub fn handle(&self, request: &ViewRequest) -> Result<Page> {
        debug!(view = request.view().label(), "dispatching view");
        let page = match request {
            ViewRequest::Home => Page::Home(self.home()?),
            ViewRequest::Exploration => Page::Exploration(self.exploration()?),
            ViewRequest::CorrelationAnalysis => Page::CorrelationAnalysis(self.correlation()?),
            ViewRequest::Visualizations { product } => {
                Page::Visualizations(self.visualizations(product.as_deref())?)
            }
            ViewRequest::PerformanceAnalysis { region, channel } => {
                Page::PerformanceAnalysis(self.performance(region, channel)?)
            }
            ViewRequest::Report => Page::Report(self.report()?),
        };
        Ok(page)
    }

    fn home(&self) -> Result<HomePage> {
        Ok(HomePage {
            title: self.profile.title.clone(),
            tagline: self.profile.tagline.clone(),
            row_count: self.table.height(),
            columns: self.table.schema().to_vec(),
            preview: self.table.head(self.settings.preview_rows)?,
        })
    }

    fn exploration(&self) -> Result<ExplorationPage> {
        let stats = match Aggregator::describe(&self.table, &self.table.numeric_columns()) {
            Ok(stats) => Outcome::Data(stats),
            Err(DashboardError::EmptyInput) => Outcome::no_data(),
            Err(e) => return Err(e),
        };

        Ok(ExplorationPage {
            head: self.table.head(self.settings.sample_rows)?,
            tail: self.table.tail(self.settings.sample_rows)?,
            stats,
            channel_shares: Aggregator::value_counts(&self.table, &self.profile.channel_column)?,
            region_counts: Aggregator::value_counts(&self.table, &self.profile.region_column)?,
        })
    }

    fn correlation(&self) -> Result<CorrelationPage> {
        let metrics = self.profile.metrics();
        let matrix = match Aggregator::correlation_matrix(&self.table, metrics) {
            Ok(matrix) => {
                if !matrix.undefined_columns.is_empty() {
                    warn!(columns = ?matrix.undefined_columns, "correlation undefined for constant columns");
                }
                Outcome::Data(matrix)
            }
            Err(DashboardError::EmptyInput) => Outcome::no_data(),
            Err(e) => return Err(e),
        };

        Ok(CorrelationPage {
            matrix,
            region_means: Aggregator::group_mean(
                &self.table,
                &self.profile.region_column,
                metrics,
            )?,
            channel_means: Aggregator::group_mean(
                &self.table,
                &self.profile.channel_column,
                metrics,
            )?,
        })
    }

    fn visualizations(&self, product: Option<&str>) -> Result<VisualizationsPage> {
        let products = &self.profile.product_columns;
        let selected = match product {
            Some(p) if products.iter().any(|c| c == p) => p.to_string(),
            Some(p) => {
                return Err(DashboardError::InvalidSelection {
                    field: "product".to_string(),
                    value: p.to_string(),
                    allowed: products.clone(),
                })
            }
            None => products
                .first()
                .cloned()
                .ok_or_else(|| DashboardError::Config("profile declares no products".into()))?,
        };

        Ok(VisualizationsPage {
            product_options: products.clone(),
            histograms: Aggregator::histograms(
                &self.table,
                products,
                self.settings.histogram_bins,
            )?,
            box_by_region: Aggregator::box_summary(
                &self.table,
                &self.profile.region_column,
                &selected,
            )?,
            selected_product: selected,
        })
    }

    fn performance(&self, region: &Choice, channel: &Choice) -> Result<PerformancePage> {
        let filtered = self.filter.apply(&self.table, region, channel)?;
        let products = &self.profile.product_columns;

        let (product_totals, region_totals) = if filtered.is_empty() {
            warn!(%region, %channel, "no rows match the selected filters");
            (Outcome::no_data(), Outcome::no_data())
        } else {
            let product_totals = Outcome::Data(Aggregator::column_totals(&filtered, products)?);

            let totals: Vec<CategoryTotal> =
                Aggregator::group_sum(&filtered, &self.profile.region_column, products)?
                    .row_totals()
                    .into_iter()
                    .map(|(label, total)| CategoryTotal { label, total })
                    .collect();
            let grand_total: f64 = totals.iter().map(|t| t.total).sum();
            let region_totals = if totals.is_empty() || grand_total <= 0.0 {
                warn!(%region, %channel, "region totals are empty");
                Outcome::no_data()
            } else {
                Outcome::Data(totals)
            };
            (product_totals, region_totals)
        };

        Ok(PerformancePage {
            region: region.clone(),
            channel: channel.clone(),
            region_options: self.region_options()?,
            channel_options: self.channel_options()?,
            matched_rows: filtered.height(),
            product_totals,
            region_totals,
        })
    }

    fn report(&self) -> Result<ReportPage> {
        let products = &self.profile.product_columns;
        let mut product_ranking = Aggregator::column_totals(&self.table, products)?;
        product_ranking.reverse();

        let leading_channel = Aggregator::group_sum(&self.table, &self.profile.channel_column, products)?
            .row_totals()
            .pop()
            .map(|(label, total)| CategoryTotal { label, total });

        Ok(ReportPage {
            title: self.profile.title.clone(),
            notes: self.profile.report.clone(),
            product_ranking,
            leading_channel,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;

    fn profile() -> DatasetProfile {
        DatasetProfile {
            name: "test".to_string(),
            title: "Test Sales".to_string(),
            tagline: "testing".to_string(),
            default_file: None,
            region_column: "Region".to_string(),
            channel_column: "Channel".to_string(),
            product_columns: vec!["ProductA".to_string(), "ProductB".to_string()],
            metric_columns: Vec::new(),
            report: Default::default(),
        }
    }

    fn dashboard() -> Dashboard {
        let df = df![
            "Region" => ["North", "South", "North", "South"],
            "Channel" => ["Online", "Retail", "Retail", "Online"],
            "ProductA" => [10.0, 20.0, 30.0, 40.0],
            "ProductB" => [1.0, 1.0, 2.0, 8.0]
        ]
        .unwrap();
        let table = Table::from_frame(df, &profile()).unwrap();
        Dashboard::new(table, profile(), ViewSettings::default())
    }

    #[test]
    fn menu_lists_every_view_once() {
        let dashboard = dashboard();
        let menu = dashboard.menu();
        assert_eq!(menu.len(), View::ALL.len());
        assert_eq!(menu[2], "Correlation Analysis");
        for view in View::ALL {
            assert_eq!(menu.iter().filter(|l| **l == view.label()).count(), 1);
            assert_eq!(ViewRequest::default_for(view).view(), view);
        }
    }

    #[test]
    fn home_previews_rows() {
        let Page::Home(home) = dashboard().handle(&ViewRequest::Home).unwrap() else {
            panic!("expected home page");
        };
        assert_eq!(home.row_count, 4);
        assert_eq!(home.preview.rows.len(), 4);
        assert_eq!(home.title, "Test Sales");
    }

    #[test]
    fn visualizations_defaults_to_first_product() {
        let request = ViewRequest::default_for(View::Visualizations);
        let Page::Visualizations(page) = dashboard().handle(&request).unwrap() else {
            panic!("expected visualizations page");
        };
        assert_eq!(page.selected_product, "ProductA");
        assert_eq!(page.histograms.len(), 2);
        assert_eq!(page.histograms[0].counts.iter().sum::<usize>(), 4);
        assert_eq!(page.box_by_region.len(), 2);
    }

    #[test]
    fn visualizations_rejects_unknown_product() {
        let request = ViewRequest::Visualizations {
            product: Some("Region".to_string()),
        };
        assert!(matches!(
            dashboard().handle(&request),
            Err(DashboardError::InvalidSelection { .. })
        ));
    }

    #[test]
    fn performance_totals_sorted_ascending() {
        let request = ViewRequest::PerformanceAnalysis {
            region: Choice::All,
            channel: Choice::only("Online"),
        };
        let Page::PerformanceAnalysis(page) = dashboard().handle(&request).unwrap() else {
            panic!("expected performance page");
        };
        assert_eq!(page.matched_rows, 2);
        let totals = page.product_totals.data().unwrap();
        assert_eq!(totals[0].column, "ProductB");
        assert_eq!(totals[0].total, 9.0);
        assert_eq!(totals[1].total, 50.0);

        let regions = page.region_totals.data().unwrap();
        assert_eq!(regions[0].label, "North");
        assert_eq!(regions[0].total, 11.0);
        assert_eq!(regions[1].total, 48.0);
        assert_eq!(page.region_options, vec!["North", "South"]);
    }

    #[test]
    fn performance_with_no_match_signals_no_data() {
        let df = df![
            "Region" => ["North", "South"],
            "Channel" => ["Online", "Retail"],
            "ProductA" => [10.0, 20.0],
            "ProductB" => [1.0, 2.0]
        ]
        .unwrap();
        let table = Table::from_frame(df, &profile()).unwrap();
        let dashboard = Dashboard::new(table, profile(), ViewSettings::default());

        let request = ViewRequest::PerformanceAnalysis {
            region: Choice::only("North"),
            channel: Choice::only("Retail"),
        };
        let Page::PerformanceAnalysis(page) = dashboard.handle(&request).unwrap() else {
            panic!("expected performance page");
        };
        assert_eq!(page.matched_rows, 0);
        assert!(page.product_totals.is_no_data());
        assert_eq!(page.region_totals, Outcome::NoData(NO_DATA_MESSAGE.to_string()));
    }

    #[test]
    fn performance_rejects_unknown_region() {
        let request = ViewRequest::PerformanceAnalysis {
            region: Choice::only("West"),
            channel: Choice::All,
        };
        assert!(matches!(
            dashboard().handle(&request),
            Err(DashboardError::InvalidSelection { .. })
        ));
    }

    #[test]
    fn report_ranks_products_and_channel() {
        let Page::Report(page) = dashboard().handle(&ViewRequest::Report).unwrap() else {
            panic!("expected report page");
        };
        assert_eq!(page.product_ranking[0].column, "ProductA");
        let channel = page.leading_channel.unwrap();
        assert_eq!(channel.label, "Online");
        assert_eq!(channel.total, 59.0);
    }
}

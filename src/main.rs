//! Sales Dashboard - CSV sales exploration from the command line
//!
//! Loads the dataset once and prints the payload of one navigation view.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sales_dashboard::{Choice, Dashboard, DashboardConfig, DatasetKind, View, ViewRequest};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sales-dashboard")]
#[command(about = "Descriptive statistics, correlations and sales performance for CSV sales data")]
struct Args {
    /// JSON config file (dataset, data_path, row counts, custom profile)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// CSV file to load (overrides the config file)
    #[arg(short, long)]
    data: Option<PathBuf>,

    /// Dataset profile (overrides the config file)
    #[arg(long, value_enum)]
    dataset: Option<DatasetKind>,

    /// Print the payload as JSON instead of text
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    view: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List navigation entries
    Menu,
    /// Title and data preview
    Home,
    /// Sample rows, descriptive statistics, channel and region counts
    Exploration,
    /// Correlation matrix and average sales per region and channel
    Correlation,
    /// Histograms and per-region box summary of one product
    Visualizations {
        /// Product column for the box summary (defaults to the first product)
        #[arg(long)]
        product: Option<String>,
    },
    /// Sales totals after filtering by region and channel
    Performance {
        /// Region to keep (all regions when omitted)
        #[arg(long)]
        region: Option<String>,
        /// Channel to keep (all channels when omitted)
        #[arg(long)]
        channel: Option<String>,
    },
    /// Trends, recommendations and product ranking
    Report,
}

impl Command {
    fn request(self) -> Option<ViewRequest> {
        let request = match self {
            Command::Menu => return None,
            Command::Home => ViewRequest::Home,
            Command::Exploration => ViewRequest::Exploration,
            Command::Correlation => ViewRequest::CorrelationAnalysis,
            Command::Visualizations { product } => ViewRequest::Visualizations { product },
            Command::Performance { region, channel } => {
                ViewRequest::PerformanceAnalysis {
                    region: Choice::from(region),
                    channel: Choice::from(channel),
                }
            }
            Command::Report => ViewRequest::Report,
        };
        Some(request)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let Some(request) = args.view.request() else {
        for view in View::ALL {
            println!("{}", view.label());
        }
        return Ok(());
    };

    let mut config = match &args.config {
        Some(path) => DashboardConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => DashboardConfig::default(),
    };
    if let Some(dataset) = args.dataset {
        config.dataset = dataset;
    }
    if let Some(data) = args.data {
        config.data_path = Some(data);
    }
    config.validate()?;

    let profile = config.profile()?;
    let path = config.data_path(&profile)?;
    info!(profile = %profile.name, path = %path.display(), "starting dashboard");

    let dashboard = Dashboard::open(&path, profile, config.view_settings())
        .with_context(|| format!("opening dataset {}", path.display()))?;

    let page = dashboard
        .handle(&request)
        .with_context(|| format!("building view '{}'", request.view().label()))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&page)?);
    } else {
        print!("{page}");
    }

    Ok(())
}

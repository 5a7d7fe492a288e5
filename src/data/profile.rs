//! Dataset Profiles
//! Expected schema and report text for each supported sales dataset.

use serde::{Deserialize, Serialize};

pub const DEFAULT_REGION_COLUMN: &str = "Region";
pub const DEFAULT_CHANNEL_COLUMN: &str = "Channel";

/// Static report text shown on the Report view.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportNotes {
    pub trends: Vec<String>,
    pub recommendations: Vec<String>,
    pub future_data: Vec<String>,
}

/// Describes one dataset: which columns must exist and how views use them.
///
/// `product_columns` drive sales totals, histograms and the box-plot selector.
/// `metric_columns` drive the correlation matrix and grouped means; they are a
/// superset of the products when the dataset carries extra numeric fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetProfile {
    pub name: String,
    pub title: String,
    #[serde(default)]
    pub tagline: String,
    #[serde(default)]
    pub default_file: Option<String>,
    #[serde(default = "default_region_column")]
    pub region_column: String,
    #[serde(default = "default_channel_column")]
    pub channel_column: String,
    pub product_columns: Vec<String>,
    #[serde(default)]
    pub metric_columns: Vec<String>,
    #[serde(default)]
    pub report: ReportNotes,
}

fn default_region_column() -> String {
    DEFAULT_REGION_COLUMN.to_string()
}

fn default_channel_column() -> String {
    DEFAULT_CHANNEL_COLUMN.to_string()
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl DatasetProfile {
    /// Coffee products sold by Beans & Pods.
    pub fn beans() -> Self {
        let products = owned(&[
            "Robusta",
            "Arabica",
            "Espresso",
            "Lungo",
            "Latte",
            "Cappuccino",
        ]);

        Self {
            name: "beans".to_string(),
            title: "Sales Dashboard - Beans & Pods".to_string(),
            tagline: "Coffee sales analysis to boost marketing.".to_string(),
            default_file: Some("beans_and_pods_v2.csv".to_string()),
            region_column: default_region_column(),
            channel_column: default_channel_column(),
            metric_columns: products.clone(),
            product_columns: products,
            report: ReportNotes {
                trends: owned(&[
                    "Arabica, Espresso and Latte are very popular.",
                    "The Online channel generates more sales overall.",
                    "Clear differences exist between regions.",
                ]),
                recommendations: owned(&[
                    "Strengthen online sales in the best performing regions.",
                    "Feature Latte and Espresso in marketing campaigns.",
                    "Analyse seasonality for each coffee type.",
                ]),
                future_data: owned(&[
                    "Time data (month, season)",
                    "Customer data (age, loyalty, satisfaction)",
                    "Cost price per product",
                ]),
            },
        }
    }

    /// Health products with customer age and purchase amount.
    pub fn health() -> Self {
        let products = owned(&["Product_A", "Product_B", "Product_C", "Product_D"]);
        let mut metrics = products.clone();
        metrics.extend(owned(&["Customer_Age", "Purchase_Amount"]));

        Self {
            name: "health".to_string(),
            title: "Sales Dashboard - Health Products".to_string(),
            tagline: "Sales and customer data analysis to optimise commercial strategy."
                .to_string(),
            default_file: Some("health_sales_data.csv".to_string()),
            region_column: default_region_column(),
            channel_column: default_channel_column(),
            product_columns: products,
            metric_columns: metrics,
            report: ReportNotes {
                trends: owned(&[
                    "The Online channel shows strong growth.",
                    "Product_B and Product_D are the most popular.",
                    "Young customers (under 30) buy more frequently.",
                ]),
                recommendations: owned(&[
                    "Strengthen online campaigns.",
                    "Target young customers with specific offers.",
                    "Optimise stock for the best performing products.",
                    "Analyse seasonal periods.",
                ]),
                future_data: owned(&[
                    "Customer satisfaction data",
                    "Purchase history per customer",
                    "Average price per product",
                ]),
            },
        }
    }

    /// Metric columns, falling back to the products when none are declared.
    pub fn metrics(&self) -> &[String] {
        if self.metric_columns.is_empty() {
            &self.product_columns
        } else {
            &self.metric_columns
        }
    }

    /// Every numeric column the loader must find, without duplicates.
    pub fn required_numeric(&self) -> Vec<String> {
        let mut cols = self.product_columns.clone();
        for metric in self.metrics() {
            if !cols.contains(metric) {
                cols.push(metric.clone());
            }
        }
        cols
    }

    pub fn required_categorical(&self) -> [&str; 2] {
        [self.region_column.as_str(), self.channel_column.as_str()]
    }
}

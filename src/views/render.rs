//! Plain-text rendering of view payloads for terminal output.

use crate::data::{Cell, TableSlice};
use crate::stats::{AggregationResult, CategoryCount, ColumnTotal};
use crate::views::pages::*;
use std::fmt;

/// Integers print without decimals, everything else with two.
fn num(v: f64) -> String {
    if v.is_nan() {
        "n/a".to_string()
    } else if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{v:.0}")
    } else {
        format!("{v:.2}")
    }
}

fn opt(v: Option<f64>) -> String {
    v.map(num).unwrap_or_else(|| "n/a".to_string())
}

/// Left-aligned text grid with a header rule.
fn grid(f: &mut fmt::Formatter<'_>, headers: &[String], rows: &[Vec<String>]) -> fmt::Result {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(cell.chars().count());
            }
        }
    }

    let line = |f: &mut fmt::Formatter<'_>, cells: &[String]| -> fmt::Result {
        let padded: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(c, &w)| format!("{c:<w$}"))
            .collect();
        writeln!(f, "  {}", padded.join("  ").trim_end())
    };

    line(f, headers)?;
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    line(f, &rule)?;
    for row in rows {
        line(f, row)?;
    }
    Ok(())
}

fn heading(f: &mut fmt::Formatter<'_>, text: &str) -> fmt::Result {
    writeln!(f)?;
    writeln!(f, "{text}")
}

fn slice(f: &mut fmt::Formatter<'_>, s: &TableSlice) -> fmt::Result {
    let rows: Vec<Vec<String>> = s
        .rows
        .iter()
        .map(|row| {
            row.iter()
                .map(|cell| match cell {
                    Cell::Number(v) => num(*v),
                    Cell::Text(t) => t.clone(),
                    Cell::Missing => String::new(),
                })
                .collect()
        })
        .collect();
    grid(f, &s.columns, &rows)
}

fn counts(f: &mut fmt::Formatter<'_>, label: &str, counts: &[CategoryCount]) -> fmt::Result {
    let headers = vec![label.to_string(), "count".to_string(), "share".to_string()];
    let rows: Vec<Vec<String>> = counts
        .iter()
        .map(|c| vec![c.label.clone(), c.count.to_string(), format!("{:.1}%", c.share)])
        .collect();
    grid(f, &headers, &rows)
}

fn aggregation(f: &mut fmt::Formatter<'_>, result: &AggregationResult) -> fmt::Result {
    let mut headers = vec![result.group_column.clone()];
    headers.extend(result.value_columns.iter().cloned());
    let rows: Vec<Vec<String>> = result
        .groups
        .iter()
        .map(|g| {
            std::iter::once(g.key.clone())
                .chain(g.values.iter().map(|v| num(*v)))
                .collect()
        })
        .collect();
    grid(f, &headers, &rows)
}

fn totals(f: &mut fmt::Formatter<'_>, label: &str, totals: &[ColumnTotal]) -> fmt::Result {
    let headers = vec![label.to_string(), "total".to_string()];
    let rows: Vec<Vec<String>> = totals
        .iter()
        .map(|t| vec![t.column.clone(), num(t.total)])
        .collect();
    grid(f, &headers, &rows)
}

fn no_data(f: &mut fmt::Formatter<'_>, message: &str) -> fmt::Result {
    writeln!(f, "  warning: {message}")
}

impl fmt::Display for HomePage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        if !self.tagline.is_empty() {
            writeln!(f, "{}", self.tagline)?;
        }
        writeln!(f, "{} rows, {} columns", self.row_count, self.columns.len())?;
        heading(f, "Data preview")?;
        slice(f, &self.preview)
    }
}

impl fmt::Display for ExplorationPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Data Exploration")?;
        heading(f, "First rows")?;
        slice(f, &self.head)?;
        heading(f, "Last rows")?;
        slice(f, &self.tail)?;

        heading(f, "Descriptive statistics")?;
        match &self.stats {
            Outcome::Data(stats) => {
                let headers: Vec<String> =
                    ["column", "count", "mean", "std", "min", "25%", "50%", "75%", "max"]
                        .iter()
                        .map(|s| s.to_string())
                        .collect();
                let rows: Vec<Vec<String>> = stats
                    .iter()
                    .map(|s| {
                        vec![
                            s.column.clone(),
                            s.count.to_string(),
                            num(s.mean),
                            opt(s.std),
                            num(s.min),
                            num(s.q25),
                            num(s.median),
                            num(s.q75),
                            num(s.max),
                        ]
                    })
                    .collect();
                grid(f, &headers, &rows)?;
            }
            Outcome::NoData(message) => no_data(f, message)?,
        }

        heading(f, "Sales channel breakdown")?;
        counts(f, "channel", &self.channel_shares)?;
        heading(f, "Rows per region")?;
        counts(f, "region", &self.region_counts)
    }
}

impl fmt::Display for CorrelationPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Correlation Analysis")?;
        heading(f, "Correlation matrix")?;
        match &self.matrix {
            Outcome::Data(matrix) => {
                let mut headers = vec![String::new()];
                headers.extend(matrix.columns.iter().cloned());
                let rows: Vec<Vec<String>> = matrix
                    .columns
                    .iter()
                    .zip(&matrix.values)
                    .map(|(name, row)| {
                        std::iter::once(name.clone())
                            .chain(row.iter().map(|v| opt(*v)))
                            .collect()
                    })
                    .collect();
                grid(f, &headers, &rows)?;
                if !matrix.undefined_columns.is_empty() {
                    writeln!(
                        f,
                        "  undefined (constant columns): {}",
                        matrix.undefined_columns.join(", ")
                    )?;
                }
            }
            Outcome::NoData(message) => no_data(f, message)?,
        }

        heading(f, "Average sales per region")?;
        aggregation(f, &self.region_means)?;
        heading(f, "Average sales per channel")?;
        aggregation(f, &self.channel_means)
    }
}

impl fmt::Display for VisualizationsPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Visualizations")?;
        heading(f, "Sales distribution per product")?;
        for hist in &self.histograms {
            writeln!(f, "  {}", hist.column)?;
            let headers = vec!["from".to_string(), "to".to_string(), "count".to_string()];
            let rows: Vec<Vec<String>> = hist
                .counts
                .iter()
                .enumerate()
                .map(|(i, c)| vec![num(hist.edges[i]), num(hist.edges[i + 1]), c.to_string()])
                .collect();
            grid(f, &headers, &rows)?;
        }

        heading(
            f,
            &format!(
                "{} by region (options: {})",
                self.selected_product,
                self.product_options.join(", ")
            ),
        )?;
        let headers: Vec<String> = [
            "region", "count", "low", "q1", "median", "q3", "high", "outliers",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        let rows: Vec<Vec<String>> = self
            .box_by_region
            .iter()
            .map(|b| {
                vec![
                    b.group.clone(),
                    b.count.to_string(),
                    num(b.lower_whisker),
                    num(b.q1),
                    num(b.median),
                    num(b.q3),
                    num(b.upper_whisker),
                    b.outliers.iter().map(|v| num(*v)).collect::<Vec<_>>().join(" "),
                ]
            })
            .collect();
        grid(f, &headers, &rows)
    }
}

impl fmt::Display for PerformancePage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Sales Performance")?;
        writeln!(
            f,
            "Region: {} (options: All, {})",
            self.region,
            self.region_options.join(", ")
        )?;
        writeln!(
            f,
            "Channel: {} (options: All, {})",
            self.channel,
            self.channel_options.join(", ")
        )?;
        writeln!(f, "{} matching rows", self.matched_rows)?;

        heading(f, "Total sales per product")?;
        match &self.product_totals {
            Outcome::Data(t) => totals(f, "product", t)?,
            Outcome::NoData(message) => no_data(f, message)?,
        }

        heading(f, "Total sales per region")?;
        match &self.region_totals {
            Outcome::Data(t) => {
                let headers = vec!["region".to_string(), "total".to_string()];
                let rows: Vec<Vec<String>> = t
                    .iter()
                    .map(|r| vec![r.label.clone(), num(r.total)])
                    .collect();
                grid(f, &headers, &rows)
            }
            Outcome::NoData(message) => no_data(f, message),
        }
    }
}

impl fmt::Display for ReportPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Report & Recommendations - {}", self.title)?;

        heading(f, "Top products")?;
        totals(f, "product", &self.product_ranking)?;
        if let Some(channel) = &self.leading_channel {
            writeln!(
                f,
                "  leading channel: {} ({})",
                channel.label,
                num(channel.total)
            )?;
        }

        for (title, items) in [
            ("Observed trends", &self.notes.trends),
            ("Recommendations", &self.notes.recommendations),
            ("Data to collect", &self.notes.future_data),
        ] {
            if items.is_empty() {
                continue;
            }
            heading(f, title)?;
            for item in items {
                writeln!(f, "  - {item}")?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Page::Home(p) => fmt::Display::fmt(p, f),
            Page::Exploration(p) => fmt::Display::fmt(p, f),
            Page::CorrelationAnalysis(p) => fmt::Display::fmt(p, f),
            Page::Visualizations(p) => fmt::Display::fmt(p, f),
            Page::PerformanceAnalysis(p) => fmt::Display::fmt(p, f),
            Page::Report(p) => fmt::Display::fmt(p, f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::ReportNotes;

    #[test]
    fn numbers_format_compactly() {
        assert_eq!(num(10.0), "10");
        assert_eq!(num(2.346), "2.35");
        assert_eq!(num(f64::NAN), "n/a");
        assert_eq!(opt(None), "n/a");
    }

    #[test]
    fn performance_no_data_prints_warning() {
        let page = PerformancePage {
            region: crate::data::Choice::only("North"),
            channel: crate::data::Choice::All,
            region_options: vec!["North".to_string()],
            channel_options: vec!["Online".to_string()],
            matched_rows: 0,
            product_totals: Outcome::no_data(),
            region_totals: Outcome::no_data(),
        };
        let text = page.to_string();
        assert!(text.contains("Region: North"));
        assert!(text.contains(&format!("warning: {NO_DATA_MESSAGE}")));
    }

    #[test]
    fn report_skips_empty_sections() {
        let page = ReportPage {
            title: "Tea".to_string(),
            notes: ReportNotes {
                trends: vec!["Green tea grows".to_string()],
                ..Default::default()
            },
            product_ranking: vec![ColumnTotal {
                column: "Green".to_string(),
                total: 12.0,
            }],
            leading_channel: None,
        };
        let text = page.to_string();
        assert!(text.contains("Observed trends"));
        assert!(text.contains("  - Green tea grows"));
        assert!(!text.contains("Recommendations"));
    }
}

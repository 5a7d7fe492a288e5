use polars::prelude::*;
use sales_dashboard::data::ReportNotes;
use sales_dashboard::views::Outcome;
use sales_dashboard::{
    Aggregator, Choice, Dashboard, DashboardError, DataLoader, DatasetProfile, Filter, Page,
    Table, View, ViewRequest, ViewSettings,
};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const BEANS_CSV: &str = "\
Channel,Region,Robusta,Arabica,Espresso,Lungo,Latte,Cappuccino
Online,North,120,300,250,80,310,150
Store,North,90,210,180,60,200,120
Online,South,150,340,260,95,330,170
Store,South,60,150,140,40,160,90
Online,Central,110,280,230,75,290,140
Store,Central,70,190,170,55,210,110
";

const HEALTH_CSV: &str = "\
Region,Channel,Product_A,Product_B,Product_C,Product_D,Customer_Age,Purchase_Amount
East,Online,12,30,8,25,24,120.5
East,Pharmacy,7,22,5,18,45,80.0
West,Online,15,35,9,28,29,150.25
West,Pharmacy,5,18,4,15,52,60.0
";

fn write_csv(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

fn north_south_profile() -> DatasetProfile {
    DatasetProfile {
        name: "north-south".to_string(),
        title: "North/South".to_string(),
        tagline: String::new(),
        default_file: None,
        region_column: "Region".to_string(),
        channel_column: "Channel".to_string(),
        product_columns: vec!["ProductA".to_string()],
        metric_columns: Vec::new(),
        report: ReportNotes::default(),
    }
}

#[test]
fn north_south_end_to_end() {
    let profile = north_south_profile();
    let df = df![
        "Region" => ["North", "South"],
        "Channel" => ["Online", "Retail"],
        "ProductA" => [10i64, 20]
    ]
    .unwrap();
    let table = Table::from_frame(df, &profile).unwrap();

    let north = Filter::for_profile(&profile)
        .apply(&table, &Choice::only("North"), &Choice::All)
        .unwrap();
    assert_eq!(north.height(), 1);
    assert_eq!(north.present_values("ProductA").unwrap(), vec![10.0]);

    let means = Aggregator::group_mean(&table, "Region", &profile.product_columns).unwrap();
    assert_eq!(means.value("North", "ProductA"), Some(10.0));
    assert_eq!(means.value("South", "ProductA"), Some(20.0));
}

#[test]
fn filter_output_is_subset_for_every_selection() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(&dir, "beans.csv", BEANS_CSV);
    let profile = DatasetProfile::beans();
    let table = DataLoader::load(&path, &profile).unwrap();
    let filter = Filter::for_profile(&profile);

    let mut regions = vec![Choice::All];
    regions.extend(table.distinct_values("Region").unwrap().into_iter().map(Choice::Only));
    let mut channels = vec![Choice::All];
    channels.extend(table.distinct_values("Channel").unwrap().into_iter().map(Choice::Only));

    for region in &regions {
        for channel in &channels {
            let filtered = filter.apply(&table, region, channel).unwrap();
            assert!(filtered.height() <= table.height());

            let rows_region = filtered.labels("Region").unwrap();
            let rows_channel = filtered.labels("Channel").unwrap();
            for (r, c) in rows_region.iter().zip(&rows_channel) {
                if let Choice::Only(want) = region {
                    assert_eq!(r, want);
                }
                if let Choice::Only(want) = channel {
                    assert_eq!(c, want);
                }
            }
        }
    }

    let all = filter.apply(&table, &Choice::All, &Choice::All).unwrap();
    assert!(all.same_content(&table));
}

#[test]
fn identical_rows_describe_with_zero_spread() {
    let profile = north_south_profile();
    let df = df![
        "Region" => ["North", "North", "North"],
        "Channel" => ["Online", "Online", "Online"],
        "ProductA" => [4.0, 4.0, 4.0]
    ]
    .unwrap();
    let table = Table::from_frame(df, &profile).unwrap();
    let stats = Aggregator::describe(&table, &profile.product_columns).unwrap();
    assert_eq!(stats[0].std, Some(0.0));
    assert_eq!(stats[0].min, 4.0);
    assert_eq!(stats[0].max, 4.0);
    assert_eq!(stats[0].count, 3);
}

#[test]
fn beans_views_from_csv() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(&dir, "beans.csv", BEANS_CSV);
    let dashboard =
        Dashboard::open(&path, DatasetProfile::beans(), ViewSettings::default()).unwrap();

    assert_eq!(dashboard.menu().len(), 6);
    assert_eq!(dashboard.region_options().unwrap(), vec!["Central", "North", "South"]);

    for view in View::ALL {
        let page = dashboard.handle(&ViewRequest::default_for(view)).unwrap();
        assert_eq!(page.view(), view);
        assert!(!page.to_string().is_empty());
    }

    let Page::Exploration(exploration) = dashboard.handle(&ViewRequest::Exploration).unwrap()
    else {
        panic!("expected exploration page");
    };
    assert_eq!(exploration.head.rows.len(), 6);
    let stats = exploration.stats.data().unwrap();
    assert_eq!(stats.len(), 6);
    assert_eq!(exploration.channel_shares.len(), 2);
    assert!((exploration.channel_shares[0].share - 50.0).abs() < 1e-9);

    let Page::CorrelationAnalysis(corr) =
        dashboard.handle(&ViewRequest::CorrelationAnalysis).unwrap()
    else {
        panic!("expected correlation page");
    };
    let matrix = corr.matrix.data().unwrap();
    assert_eq!(matrix.columns.len(), 6);
    assert_eq!(matrix.get("Latte", "Latte"), Some(1.0));
    assert_eq!(matrix.get("Latte", "Arabica"), matrix.get("Arabica", "Latte"));
    assert_eq!(corr.region_means.keys(), vec!["Central", "North", "South"]);
    assert_eq!(corr.channel_means.value("Online", "Robusta"), Some(380.0 / 3.0));
}

#[test]
fn beans_performance_filters() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(&dir, "beans.csv", BEANS_CSV);
    let dashboard =
        Dashboard::open(&path, DatasetProfile::beans(), ViewSettings::default()).unwrap();

    let request = ViewRequest::PerformanceAnalysis {
        region: Choice::only("South"),
        channel: Choice::only("Online"),
    };
    let Page::PerformanceAnalysis(page) = dashboard.handle(&request).unwrap() else {
        panic!("expected performance page");
    };
    assert_eq!(page.matched_rows, 1);
    let totals = page.product_totals.data().unwrap();
    assert_eq!(totals.first().unwrap().column, "Lungo");
    assert_eq!(totals.last().unwrap().column, "Arabica");

    let bad = ViewRequest::PerformanceAnalysis {
        region: Choice::All,
        channel: Choice::only("Phone"),
    };
    assert!(matches!(
        dashboard.handle(&bad),
        Err(DashboardError::InvalidSelection { .. })
    ));
}

#[test]
fn health_views_include_customer_metrics() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(&dir, "health.csv", HEALTH_CSV);
    let dashboard =
        Dashboard::open(&path, DatasetProfile::health(), ViewSettings::default()).unwrap();

    let Page::CorrelationAnalysis(corr) =
        dashboard.handle(&ViewRequest::CorrelationAnalysis).unwrap()
    else {
        panic!("expected correlation page");
    };
    assert!(corr.region_means.value_columns.contains(&"Customer_Age".to_string()));
    assert_eq!(corr.region_means.value("East", "Customer_Age"), Some(34.5));

    let request = ViewRequest::Visualizations {
        product: Some("Product_C".to_string()),
    };
    let Page::Visualizations(vis) = dashboard.handle(&request).unwrap() else {
        panic!("expected visualizations page");
    };
    assert_eq!(vis.histograms.len(), 4);
    assert_eq!(vis.histograms[0].counts.len(), 20);
    assert_eq!(vis.box_by_region.len(), 2);

    let request = ViewRequest::PerformanceAnalysis {
        region: Choice::only("West"),
        channel: Choice::All,
    };
    let Page::PerformanceAnalysis(perf) = dashboard.handle(&request).unwrap() else {
        panic!("expected performance page");
    };
    let regions = perf.region_totals.data().unwrap();
    assert_eq!(regions.len(), 1);
    assert_eq!(regions[0].total, 15.0 + 35.0 + 9.0 + 28.0 + 5.0 + 18.0 + 4.0 + 15.0);
}

#[test]
fn single_row_leaves_correlation_undefined() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(
        &dir,
        "single.csv",
        "Region,Channel,Product_A,Product_B,Product_C,Product_D,Customer_Age,Purchase_Amount\n\
         East,Online,1,1,1,1,30,10\n",
    );
    let dashboard =
        Dashboard::open(&path, DatasetProfile::health(), ViewSettings::default()).unwrap();

    // a single row makes every correlation undefined
    let Page::CorrelationAnalysis(corr) =
        dashboard.handle(&ViewRequest::CorrelationAnalysis).unwrap()
    else {
        panic!("expected correlation page");
    };
    let matrix = corr.matrix.data().unwrap();
    assert_eq!(matrix.undefined_columns.len(), 6);
    assert_eq!(matrix.get("Product_A", "Product_B"), None);

    let Page::Exploration(exploration) = dashboard.handle(&ViewRequest::Exploration).unwrap()
    else {
        panic!("expected exploration page");
    };
    assert_eq!(exploration.stats.data().unwrap()[0].std, None);
}

#[test]
fn header_only_file_yields_no_data_sections() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(&dir, "empty.csv", "Region,Channel,ProductA\n");
    let dashboard =
        Dashboard::open(&path, north_south_profile(), ViewSettings::default()).unwrap();

    let Page::Exploration(exploration) = dashboard.handle(&ViewRequest::Exploration).unwrap()
    else {
        panic!("expected exploration page");
    };
    assert!(exploration.stats.is_no_data());
    assert!(exploration.head.rows.is_empty());
    assert!(exploration.channel_shares.is_empty());

    let Page::CorrelationAnalysis(corr) =
        dashboard.handle(&ViewRequest::CorrelationAnalysis).unwrap()
    else {
        panic!("expected correlation page");
    };
    assert!(corr.matrix.is_no_data());
    assert!(corr.region_means.keys().is_empty());
}

#[test]
fn region_named_all_filters_like_any_other() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(
        &dir,
        "regions.csv",
        "Region,Channel,ProductA\nAll,Online,1\nNorth,Online,2\n",
    );
    let dashboard =
        Dashboard::open(&path, north_south_profile(), ViewSettings::default()).unwrap();

    let request = ViewRequest::PerformanceAnalysis {
        region: Choice::from(Some("All".to_string())),
        channel: Choice::from(None),
    };
    let Page::PerformanceAnalysis(page) = dashboard.handle(&request).unwrap() else {
        panic!("expected performance page");
    };
    assert_eq!(page.matched_rows, 1);
    assert_eq!(page.product_totals.data().unwrap()[0].total, 1.0);
}

#[test]
fn page_serializes_to_tagged_json() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(&dir, "health.csv", HEALTH_CSV);
    let dashboard =
        Dashboard::open(&path, DatasetProfile::health(), ViewSettings::default()).unwrap();

    let request = ViewRequest::PerformanceAnalysis {
        region: Choice::only("East"),
        channel: Choice::only("Online"),
    };
    let page = dashboard.handle(&request).unwrap();
    let json = serde_json::to_value(&page).unwrap();
    assert_eq!(json["view"], "performance_analysis");
    assert_eq!(json["payload"]["region"]["only"], "East");
    assert_eq!(json["payload"]["product_totals"]["status"], "data");

    let Page::PerformanceAnalysis(perf) = page else {
        panic!("expected performance page");
    };
    assert!(!perf.region_totals.is_no_data());
    assert!(matches!(perf.product_totals, Outcome::Data(_)));
}

#[test]
fn load_errors_are_typed() {
    let dir = TempDir::new().unwrap();
    let missing = DataLoader::load(&dir.path().join("nope.csv"), &DatasetProfile::health());
    assert!(matches!(missing, Err(DashboardError::DataUnavailable { .. })));

    let path = write_csv(&dir, "partial.csv", "Region,Product_A\nEast,1\n");
    let partial = DataLoader::load(&path, &DatasetProfile::health());
    assert!(matches!(partial, Err(DashboardError::SchemaMismatch(_))));
}

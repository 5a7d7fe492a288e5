//! Stats module - Descriptive statistics, grouped aggregation and correlation

mod aggregator;
mod calculator;

pub use aggregator::{
    AggregationResult, Aggregator, CategoryCount, ColumnTotal, CorrelationMatrix, GroupRow,
    Reduction,
};
pub use calculator::{BoxStats, ColumnStats, Histogram, StatsCalculator};

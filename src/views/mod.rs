//! Views module - Navigation menu, view payloads and text rendering

mod menu;
mod pages;
mod render;

pub use menu::{Dashboard, View, ViewRequest, ViewSettings};
pub use pages::{
    CategoryTotal, CorrelationPage, ExplorationPage, HomePage, Outcome, Page, PerformancePage,
    ReportPage, VisualizationsPage, NO_DATA_MESSAGE,
};

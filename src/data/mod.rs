//! Data module - CSV loading, dataset profiles and filtering

mod filter;
mod loader;
mod profile;
mod table;

pub use filter::{Choice, Filter};
pub use loader::DataLoader;
pub use profile::{DatasetProfile, ReportNotes};
pub use table::{Cell, ColumnKind, ColumnSpec, Table, TableSlice};

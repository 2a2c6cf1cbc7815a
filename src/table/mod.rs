//! Tabular input: cells, tables and the upload loader

mod data;
pub mod loader;

pub use data::{Cell, Table, from_excel_serial, to_excel_serial, DATETIME_TEXT_FORMAT};
pub use loader::{load_table, Upload};

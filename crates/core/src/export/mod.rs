//! Export module - CSV and spreadsheet sinks for query results.
//!
//! Exporters only read the tables they are given.

mod csv_export;
mod xlsx_export;

pub use csv_export::write_csv;
pub use xlsx_export::{sheet_names, write_workbook};

//! Tabular module - driver-agnostic query result types.

mod tabular_model;


pub use tabular_model::{Record, RecordRef, Table, Value};

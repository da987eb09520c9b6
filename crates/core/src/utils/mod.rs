pub mod date_utils;

pub use date_utils::{normalize_date, parse_date, validate_year};

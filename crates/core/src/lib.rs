//! fundread core - domain types, services, and exporters.
//!
//! This crate contains the reader's logic that does not depend on a database
//! driver. It defines the repository trait that the `storage-sqlite` crate
//! implements, the composite `FundService`, and the CSV/XLSX exporters.

pub mod constants;
pub mod errors;
pub mod export;
pub mod funds;
pub mod settings;
pub mod tabular;
pub mod utils;

pub use funds::*;
pub use settings::StoreSettings;
pub use tabular::{Record, Table, Value};

// Re-export error types
pub use errors::Error;
pub use errors::Result;

//! SQLite storage implementation for fundread.
//!
//! This crate is the only place that touches the database driver. It
//! implements the repository trait defined in `fundread-core` and contains:
//! - Locating the store artifact, plain or gzip-compressed
//! - Scoped read-only connections over a scratch copy of compressed stores
//! - Catalogue validation of table and column names
//! - The fund repository built on parameterized SELECTs
//!
//! # Architecture
//!
//! ```text
//!        cli
//!         │
//!         ▼
//!   core (domain, service, export)
//!         │  FundRepositoryTrait
//!         ▼
//!   storage-sqlite (this crate)
//!         │
//!         ▼
//!   aifm.db / aifm.db.gz
//! ```

pub mod db;
pub mod errors;
pub mod funds;
mod query;
mod schema;

#[cfg(test)]
mod test_support;

pub use db::{is_gzip, resolve_store, FundStore, StoreLocation};
pub use funds::FundRepository;

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, StorageError};

// Re-export from fundread-core for convenience
pub use fundread_core::errors::{Error, Result};

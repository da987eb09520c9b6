//! Store settings.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::constants::{DEFAULT_COMPRESSED_DB_FILE, DEFAULT_DATA_DIR, DEFAULT_DB_FILE};

/// Where to find the store and where to expand it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreSettings {
    /// Explicit artifact path. When set, defaults are never consulted.
    pub db_path: Option<PathBuf>,
    /// Directory holding the default artifacts.
    pub data_dir: PathBuf,
    /// Directory for decompressed scratch copies; the OS temp dir when unset.
    pub scratch_dir: Option<PathBuf>,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            db_path: None,
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            scratch_dir: None,
        }
    }
}

impl StoreSettings {
    pub fn with_db_path(path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: Some(path.into()),
            ..Default::default()
        }
    }

    pub fn default_compressed_path(&self) -> PathBuf {
        self.data_dir.join(DEFAULT_COMPRESSED_DB_FILE)
    }

    pub fn default_plain_path(&self) -> PathBuf {
        self.data_dir.join(DEFAULT_DB_FILE)
    }

    /// Candidate artifacts in resolution order.
    pub fn candidates(&self) -> Vec<PathBuf> {
        match &self.db_path {
            Some(path) => vec![path.clone()],
            None => vec![self.default_compressed_path(), self.default_plain_path()],
        }
    }
}

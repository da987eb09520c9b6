use log::{debug, warn};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use rusqlite::{Connection, OpenFlags};

use fundread_core::errors::{Error, Result};
use fundread_core::StoreSettings;

use crate::errors::StorageError;

mod scratch;

use scratch::ScratchCopy;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// A resolved on-disk artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreLocation {
    pub path: PathBuf,
    pub compressed: bool,
}

/// Resolves the artifact to read: the explicit path, else the default
/// compressed path, else the default plain path.
pub fn resolve_store(settings: &StoreSettings) -> Result<StoreLocation> {
    let candidates = settings.candidates();
    let path = candidates
        .iter()
        .find(|p| p.is_file())
        .cloned()
        .ok_or_else(|| {
            let searched: Vec<String> = candidates
                .iter()
                .map(|p| p.display().to_string())
                .collect();
            Error::NotFound(format!("searched {}", searched.join(", ")))
        })?;

    let compressed = is_gzip(&path);
    debug!(
        "Resolved store {} (compressed: {})",
        path.display(),
        compressed
    );
    Ok(StoreLocation { path, compressed })
}

/// A `.gz` extension or the gzip magic bytes mark a compressed artifact.
pub fn is_gzip(path: &Path) -> bool {
    if path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("gz"))
    {
        return true;
    }
    let mut magic = [0u8; 2];
    File::open(path)
        .and_then(|mut f| f.read_exact(&mut magic))
        .map(|_| magic == GZIP_MAGIC)
        .unwrap_or(false)
}

/// Read-only handle on the fund store.
///
/// Holds no connection between calls; every [`FundStore::with_connection`]
/// opens and tears down its own.
#[derive(Debug, Clone)]
pub struct FundStore {
    location: StoreLocation,
    scratch_dir: Option<PathBuf>,
}

impl FundStore {
    /// Resolves the artifact described by `settings`.
    pub fn open(settings: &StoreSettings) -> Result<Self> {
        let location = resolve_store(settings)?;
        Ok(Self {
            location,
            scratch_dir: settings.scratch_dir.clone(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.location.path
    }

    pub fn is_compressed(&self) -> bool {
        self.location.compressed
    }

    /// Runs `f` with a read-only connection to the store.
    ///
    /// A compressed artifact is expanded into a scratch file first. The
    /// connection is closed, and the scratch file removed, on every exit
    /// path including errors from `f` and panics.
    pub fn with_connection<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        if self.location.compressed {
            let scratch = ScratchCopy::expand(&self.location.path, self.scratch_dir.as_deref())?;
            let result = run_scoped(scratch.path(), f);
            scratch.remove();
            result
        } else {
            run_scoped(&self.location.path, f)
        }
    }
}

fn run_scoped<T, F>(path: &Path, f: F) -> Result<T>
where
    F: FnOnce(&Connection) -> Result<T>,
{
    let conn = open_read_only(path)?;
    let result = f(&conn);
    if let Err((_, e)) = conn.close() {
        warn!("Failed to close connection to {}: {}", path.display(), e);
    }
    result
}

fn open_read_only(path: &Path) -> std::result::Result<Connection, StorageError> {
    let flags = OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX;
    Connection::open_with_flags(path, flags).map_err(StorageError::ConnectionFailed)
}

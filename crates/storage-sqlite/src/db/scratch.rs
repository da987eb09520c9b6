//! Decompressed scratch copies of a gzip-compressed store.

use flate2::read::MultiGzDecoder;
use log::{debug, warn};
use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::Path;
use tempfile::{Builder, NamedTempFile};

use fundread_core::constants::SCRATCH_FILE_PREFIX;

use crate::errors::StorageError;

/// A uniquely named temporary file holding the expanded store.
///
/// The file is removed when the value is dropped, so every exit path of the
/// owning scope cleans it up. [`ScratchCopy::remove`] does the same but
/// reports a failure to delete.
pub(crate) struct ScratchCopy {
    file: NamedTempFile,
}

impl ScratchCopy {
    /// Expands `source` into a new scratch file in `dir` (or the OS temp dir).
    pub(crate) fn expand(source: &Path, dir: Option<&Path>) -> Result<Self, StorageError> {
        let mut builder = Builder::new();
        builder.prefix(SCRATCH_FILE_PREFIX).suffix(".db");
        let mut file = match dir {
            Some(dir) => builder.tempfile_in(dir),
            None => builder.tempfile(),
        }
        .map_err(|e| StorageError::Decompression(format!("cannot create scratch file: {}", e)))?;

        debug!(
            "Expanding {} into {}",
            source.display(),
            file.path().display()
        );

        let input = File::open(source).map_err(|e| {
            StorageError::Decompression(format!("cannot open {}: {}", source.display(), e))
        })?;
        let mut decoder = MultiGzDecoder::new(BufReader::new(input));
        let written = io::copy(&mut decoder, file.as_file_mut())
            .and_then(|n| file.as_file_mut().flush().map(|_| n))
            .map_err(|e| {
                StorageError::Decompression(format!("{}: {}", source.display(), e))
            })?;

        debug!("Expanded {} bytes", written);
        Ok(Self { file })
    }

    pub(crate) fn path(&self) -> &Path {
        self.file.path()
    }

    /// Deletes the scratch file now.
    pub(crate) fn remove(self) {
        let path = self.file.path().to_path_buf();
        if let Err(e) = self.file.close() {
            warn!("Failed to remove scratch file {}: {}", path.display(), e);
        }
    }
}

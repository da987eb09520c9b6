//! CSV export.

use log::info;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::errors::{ExportError, Result};
use crate::tabular::Table;

/// UTF-8 byte-order mark, so spreadsheet tools detect the encoding.
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Writes `table` to `path` as BOM-prefixed UTF-8 CSV with a header row.
///
/// Returns the number of data rows written.
pub fn write_csv(table: &Table, path: &Path) -> Result<usize> {
    let file = File::create(path).map_err(|e| ExportError::Unwritable {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let mut out = BufWriter::new(file);
    out.write_all(UTF8_BOM).map_err(|e| ExportError::Unwritable {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let mut writer = csv::Writer::from_writer(out);
    write_rows(&mut writer, table)?;
    writer
        .into_inner()
        .map_err(|e| ExportError::Serialization(e.to_string()))?
        .flush()
        .map_err(|e| ExportError::Unwritable {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    info!("Exported {} rows to {}", table.len(), path.display());
    Ok(table.len())
}

fn write_rows<W: Write>(writer: &mut csv::Writer<W>, table: &Table) -> Result<()> {
    writer
        .write_record(table.columns())
        .map_err(ExportError::from)?;
    for row in table.rows() {
        writer
            .write_record(row.iter().map(|value| value.to_string()))
            .map_err(ExportError::from)?;
    }
    Ok(())
}

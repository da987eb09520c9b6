//! Spreadsheet export, one worksheet per table.

use log::{debug, info};
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use std::collections::HashSet;
use std::path::Path;

use crate::constants::SHEET_NAME_MAX_LEN;
use crate::errors::{ExportError, Result};
use crate::funds::ExportSummary;
use crate::tabular::{Table, Value};

/// Characters rejected in worksheet names.
const FORBIDDEN_SHEET_CHARS: [char; 7] = ['[', ']', ':', '*', '?', '/', '\\'];

/// Derives a valid, unique worksheet name for each table name.
///
/// Names are truncated to the spreadsheet limit. When truncation makes two
/// names collide, later ones get a `~N` suffix that still fits the limit.
pub fn sheet_names(tables: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    tables
        .iter()
        .map(|table| {
            let cleaned: String = table
                .chars()
                .map(|c| if FORBIDDEN_SHEET_CHARS.contains(&c) { '_' } else { c })
                .collect();
            let cleaned = if cleaned.trim_matches('\'').is_empty() {
                "sheet".to_string()
            } else {
                cleaned.trim_matches('\'').to_string()
            };

            let mut name = truncate_chars(&cleaned, SHEET_NAME_MAX_LEN);
            let mut n = 1;
            while !seen.insert(name.to_lowercase()) {
                let suffix = format!("~{}", n);
                name = format!(
                    "{}{}",
                    truncate_chars(&cleaned, SHEET_NAME_MAX_LEN - suffix.len()),
                    suffix
                );
                n += 1;
            }
            name
        })
        .collect()
}

fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

/// Writes each `(name, table)` pair to its own worksheet of a new workbook.
pub fn write_workbook(sheets: &[(String, Table)], path: &Path) -> Result<ExportSummary> {
    let names: Vec<String> = sheets.iter().map(|(name, _)| name.clone()).collect();
    let sheet_names = sheet_names(&names);
    let header_format = Format::new().set_bold();

    let mut workbook = Workbook::new();
    let mut summary = Vec::with_capacity(sheets.len());
    for ((table_name, table), sheet_name) in sheets.iter().zip(sheet_names) {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&sheet_name).map_err(ExportError::from)?;
        write_sheet(worksheet, table, &header_format)?;
        debug!(
            "Wrote sheet '{}' for table {} ({} rows)",
            sheet_name,
            table_name,
            table.len()
        );
        summary.push((sheet_name, table.len()));
    }

    let buffer = workbook.save_to_buffer().map_err(ExportError::from)?;
    std::fs::write(path, buffer).map_err(|e| ExportError::Unwritable {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    info!("Workbook saved to {}", path.display());
    Ok(ExportSummary {
        path: path.display().to_string(),
        tables: summary,
    })
}

fn write_sheet(worksheet: &mut Worksheet, table: &Table, header_format: &Format) -> Result<()> {
    for (col, column) in table.columns().iter().enumerate() {
        worksheet
            .write_string_with_format(0, column_number(col)?, column, header_format)
            .map_err(ExportError::from)?;
    }

    for (i, row) in table.rows().iter().enumerate() {
        let row_number = u32::try_from(i + 1)
            .map_err(|_| ExportError::Serialization(format!("row {} out of range", i + 1)))?;
        for (col, value) in row.iter().enumerate() {
            let col = column_number(col)?;
            match value {
                Value::Null => {}
                Value::Integer(n) => {
                    worksheet
                        .write_number(row_number, col, *n as f64)
                        .map_err(ExportError::from)?;
                }
                Value::Real(r) => {
                    worksheet
                        .write_number(row_number, col, *r)
                        .map_err(ExportError::from)?;
                }
                Value::Text(_) | Value::Blob(_) => {
                    worksheet
                        .write_string(row_number, col, value.to_string())
                        .map_err(ExportError::from)?;
                }
            }
        }
    }
    Ok(())
}

fn column_number(col: usize) -> Result<u16> {
    Ok(u16::try_from(col)
        .map_err(|_| ExportError::Serialization(format!("column {} out of range", col)))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;
    use tempfile::tempdir;

    #[test]
    fn test_sheet_names_truncate_to_limit() {
        let long = "fund_portfolio_quarterly_holdings_detail".to_string();
        let names = sheet_names(&[long.clone(), "fund_nav".to_string()]);
        assert_eq!(names[0].chars().count(), SHEET_NAME_MAX_LEN);
        assert_eq!(names[0], long[..SHEET_NAME_MAX_LEN]);
        assert_eq!(names[1], "fund_nav");
    }

    #[test]
    fn test_sheet_names_deduplicate_after_truncation() {
        let a = format!("{}_a", "x".repeat(40));
        let b = format!("{}_b", "x".repeat(40));
        let names = sheet_names(&[a, b]);
        assert_eq!(names[0], "x".repeat(31));
        assert_eq!(names[1], format!("{}~1", "x".repeat(29)));
        assert!(names.iter().all(|n| n.chars().count() <= SHEET_NAME_MAX_LEN));
    }

    #[test]
    fn test_sheet_names_replace_forbidden_characters() {
        let names = sheet_names(&["a/b:c".to_string()]);
        assert_eq!(names[0], "a_b_c");
    }

    #[test]
    fn test_write_workbook_creates_xlsx() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("all.xlsx");
        let table = Table::with_rows(
            vec!["ts_code".to_string(), "unit_nav".to_string()],
            vec![vec!["000001.OF".into(), 1.5.into()]],
        );
        let summary = write_workbook(
            &[
                ("fund_nav".to_string(), table),
                ("fund_div".to_string(), Table::empty()),
            ],
            &path,
        )
        .unwrap();

        assert_eq!(summary.tables, vec![("fund_nav".to_string(), 1), ("fund_div".to_string(), 0)]);
        assert_eq!(summary.total_rows(), 1);
        let bytes = std::fs::read(&path).unwrap();
        // xlsx is a zip container
        assert_eq!(&bytes[..2], b"PK");
    }

    #[test]
    fn test_write_workbook_unwritable_destination() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("no_such_dir").join("all.xlsx");
        let err = write_workbook(&[("fund_nav".to_string(), Table::empty())], &path).unwrap_err();
        assert!(matches!(err, Error::Export(ExportError::Unwritable { .. })));
    }
}

//! Terminal rendering of query results.

use anyhow::Result;
use clap::ValueEnum;
use serde::Serialize;

use fundread_core::{Record, Table, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Aligned columns for reading in a terminal
    #[default]
    Text,
    /// JSON documents, tables as arrays of objects
    Json,
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn print_table(table: &Table, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => {
            print!("{}", format_table(table));
            Ok(())
        }
        OutputFormat::Json => print_json(table),
    }
}

/// Renders a table as left-aligned columns with a row count footer.
pub fn format_table(table: &Table) -> String {
    let cells: Vec<Vec<String>> = table
        .rows()
        .iter()
        .map(|row| row.iter().map(display_cell).collect())
        .collect();

    let mut widths: Vec<usize> = table.columns().iter().map(|c| c.chars().count()).collect();
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_line(&mut out, table.columns(), &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_line(&mut out, &rule, &widths);
    for row in &cells {
        push_line(&mut out, row, &widths);
    }
    let n = table.len();
    out.push_str(&format!("({} row{})\n", n, if n == 1 { "" } else { "s" }));
    out
}

fn push_line(out: &mut String, cells: &[String], widths: &[usize]) {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| {
            let pad = width.saturating_sub(cell.chars().count());
            format!("{}{}", cell, " ".repeat(pad))
        })
        .collect();
    out.push_str(padded.join("  ").trim_end());
    out.push('\n');
}

fn display_cell(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        other => other.to_string(),
    }
}

/// `key: value` lines, indented under a section heading.
pub fn format_record(record: &Record) -> String {
    let width = record.iter().map(|(k, _)| k.chars().count()).max().unwrap_or(0);
    record
        .iter()
        .map(|(key, value)| {
            let pad = width - key.chars().count();
            format!("  {}{}  {}\n", key, " ".repeat(pad), display_cell(value))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_table_aligns_columns() {
        let table = Table::with_rows(
            vec!["ts_code".into(), "unit_nav".into()],
            vec![
                vec![Value::from("000001.OF"), Value::Real(1.15)],
                vec![Value::from("X"), Value::Null],
            ],
        );
        let expected = "\
ts_code    unit_nav
---------  --------
000001.OF  1.15
X          NULL
(2 rows)
";
        assert_eq!(format_table(&table), expected);
    }

    #[test]
    fn test_format_empty_table() {
        let table = Table::new(vec!["name".into()]);
        assert_eq!(format_table(&table), "name\n----\n(0 rows)\n");
    }

    #[test]
    fn test_format_record() {
        let record: Record = vec![
            ("ts_code".to_string(), Value::from("000001.OF")),
            ("name".to_string(), Value::from("Alpha")),
        ]
        .into_iter()
        .collect();
        assert_eq!(
            format_record(&record),
            "  ts_code  000001.OF\n  name     Alpha\n"
        );
    }
}

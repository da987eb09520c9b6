use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::Serialize;

use fundread_core::export::write_workbook;
use fundread_core::funds::{ExportSummary, FundServiceTrait};

use super::App;
use crate::render::print_json;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AllDataReport {
    tables: Vec<(String, usize)>,
    export: Option<ExportSummary>,
}

pub fn all_data(app: &App, export_excel: Option<PathBuf>) -> Result<()> {
    let data = app.service.get_all_data()?;
    let export = match &export_excel {
        Some(path) => Some(write_workbook(&data.tables, path)?),
        None => None,
    };

    if app.json() {
        return print_json(&AllDataReport {
            tables: data
                .tables
                .iter()
                .map(|(name, table)| (name.clone(), table.len()))
                .collect(),
            export,
        });
    }

    println!("Tables read:");
    for (name, table) in &data.tables {
        println!("  {}: {} records", name, table.len());
    }
    if let Some(summary) = &export {
        println!();
        print_summary(summary);
    }
    Ok(())
}

pub fn csv(app: &App, table: &str, output: &Path, query: Option<String>) -> Result<()> {
    let rows = app.service.export_to_csv(table, output, query.as_deref())?;
    if app.json() {
        return print_json(&ExportSummary {
            path: output.display().to_string(),
            tables: vec![(table.to_string(), rows)],
        });
    }
    println!("Exported {} rows to {}", rows, output.display());
    Ok(())
}

pub fn excel(app: &App, output: &Path, tables: Option<Vec<String>>) -> Result<()> {
    let summary = app.service.export_to_excel(output, tables.as_deref())?;
    if app.json() {
        return print_json(&summary);
    }
    print_summary(&summary);
    Ok(())
}

fn print_summary(summary: &ExportSummary) {
    for (sheet, rows) in &summary.tables {
        println!("  sheet {} ({} rows)", sheet, rows);
    }
    println!(
        "Workbook saved to {} ({} rows total)",
        summary.path,
        summary.total_rows()
    );
}

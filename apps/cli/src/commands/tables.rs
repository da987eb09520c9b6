use std::path::PathBuf;

use anyhow::Result;
use serde::Serialize;

use fundread_core::export::write_csv;
use fundread_core::funds::{FundServiceTrait, Page};
use fundread_core::Table;

use super::App;
use crate::render::{print_json, print_table};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TableCount {
    table_name: String,
    record_count: u64,
}

pub fn list(app: &App) -> Result<()> {
    let counts: Vec<TableCount> = app
        .service
        .get_statistics()?
        .into_iter()
        .map(|s| TableCount {
            table_name: s.table_name,
            record_count: s.record_count,
        })
        .collect();

    if app.json() {
        return print_json(&counts);
    }
    println!("Tables:");
    for (i, table) in counts.iter().enumerate() {
        println!("  {}. {} ({} records)", i + 1, table.table_name, table.record_count);
    }
    Ok(())
}

pub fn info(app: &App, table: &str) -> Result<()> {
    let info = app.repository.table_info(table)?;
    if app.json() {
        return print_json(&info);
    }

    println!("Table: {}", info.table_name);
    println!("Records: {}", info.record_count);
    println!("\nColumns:");
    for column in &info.columns {
        let mut flags = Vec::new();
        if column.primary_key {
            flags.push("PRIMARY KEY");
        }
        if column.not_null {
            flags.push("NOT NULL");
        }
        let line = format!("  {:20} {:10} {}", column.name, column.decl_type, flags.join(" "));
        println!("{}", line.trim_end());
    }
    Ok(())
}

pub fn read(
    app: &App,
    table: &str,
    limit: Option<u32>,
    offset: Option<u32>,
    columns: Option<Vec<String>>,
    export: Option<PathBuf>,
) -> Result<()> {
    let data = app
        .repository
        .read_table(table, columns.as_deref(), Page { limit, offset })?;
    show_and_export(app, &data, export)
}

pub fn query(app: &App, sql: &str, limit: Option<usize>, export: Option<PathBuf>) -> Result<()> {
    let mut data = app.repository.execute_query(sql, &[])?;
    if let Some(limit) = limit {
        data.truncate(limit);
    }
    show_and_export(app, &data, export)
}

fn show_and_export(app: &App, data: &Table, export: Option<PathBuf>) -> Result<()> {
    print_table(data, app.format)?;
    if let Some(path) = export {
        let rows = write_csv(data, &path)?;
        eprintln!("Exported {} rows to {}", rows, path.display());
    }
    Ok(())
}

pub fn stats(app: &App) -> Result<()> {
    let stats = app.service.get_statistics()?;
    if app.json() {
        return print_json(&stats);
    }
    println!("Store statistics:");
    for s in &stats {
        println!(
            "  {}: {} records, {} columns",
            s.table_name, s.record_count, s.column_count
        );
    }
    Ok(())
}

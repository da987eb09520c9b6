use anyhow::Result;
use serde::Serialize;

use fundread_core::funds::{FundServiceTrait, TableOverview};

use super::App;
use crate::render::print_json;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Overview<'a> {
    path: String,
    compressed: bool,
    tables: &'a [TableOverview],
}

pub fn show(app: &App) -> Result<()> {
    let tables = app.service.get_overview()?;
    let path = app.store.path().display().to_string();
    let compressed = app.store.is_compressed();

    if app.json() {
        return print_json(&Overview {
            path,
            compressed,
            tables: &tables,
        });
    }

    let rule = "=".repeat(72);
    println!("{}", rule);
    println!("Store: {}", path);
    println!("Compressed: {}", if compressed { "yes" } else { "no" });
    println!();

    if tables.is_empty() {
        println!("The store has no data tables.");
    } else {
        println!("{} data tables:\n", tables.len());
        for table in &tables {
            match &table.error {
                Some(err) => println!("  [{}]: unreadable ({})\n", table.table_name, err),
                None => {
                    println!("  [{}]", table.table_name);
                    println!("    records: {}", table.record_count.unwrap_or(0));
                    match &table.date_span {
                        Some(span) => println!("    date range: {}", span),
                        None => println!("    date range: -"),
                    }
                    println!();
                }
            }
        }
    }

    println!("{}", rule);
    println!("Run `fundread stats` for per-table statistics, `fundread --help` for all commands.");
    Ok(())
}

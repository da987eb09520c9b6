use anyhow::Result;

use fundread_core::funds::{
    DateRange, FundBasicFilter, FundFullInfo, FundManagerFilter, FundServiceTrait,
};
use fundread_core::Record;

use super::App;
use crate::render::{format_record, format_table, print_json, print_table};

pub fn list(app: &App, filter: FundBasicFilter) -> Result<()> {
    let table = app.repository.get_fund_basic(&filter)?;
    print_table(&table, app.format)
}

pub fn full_info(app: &App, code: &str) -> Result<()> {
    let info = app.service.get_fund_full_info(code)?;
    if app.json() {
        return print_json(&info);
    }
    print!("{}", format_full_info(&info));
    Ok(())
}

/// Text view of a fund. Absent values print as `-`.
fn format_full_info(info: &FundFullInfo) -> String {
    let mut out = format!("Fund: {}\n", info.ts_code);
    if info.is_empty() {
        out.push_str("\nNo data found.\n");
        return out;
    }
    if let Some(basic) = &info.basic {
        out.push_str("\nBasic info:\n");
        out.push_str(&format_record(basic));
    }
    if let Some(nav) = &info.latest_nav {
        out.push_str("\nLatest NAV:\n");
        out.push_str(&format_record(nav));
    }
    if !info.current_managers.is_empty() {
        out.push_str("\nCurrent managers:\n");
        for manager in &info.current_managers {
            out.push_str(&format!(
                "  {} (since {})\n",
                text_or_dash(manager, "name"),
                text_or_dash(manager, "begin_date")
            ));
        }
    }
    if !info.latest_portfolio.is_empty() {
        out.push_str("\nLatest holdings:\n");
        for holding in &info.latest_portfolio {
            out.push_str(&format!(
                "  {} {} (market value {})\n",
                text_or_dash(holding, "end_date"),
                text_or_dash(holding, "symbol"),
                text_or_dash(holding, "mkv")
            ));
        }
    }
    out
}

fn text_or_dash(record: &Record, column: &str) -> String {
    record.text(column).unwrap_or_else(|| "-".to_string())
}

pub fn search(app: &App, keyword: &str) -> Result<()> {
    let table = app
        .repository
        .search_fund_by_name(keyword)?
        .project(&["ts_code", "name", "fund_type", "management"]);
    if !app.json() {
        println!("Results for '{}':", keyword);
    }
    print_table(&table, app.format)
}

pub fn nav(
    app: &App,
    code: &str,
    start: Option<String>,
    end: Option<String>,
    limit: Option<u32>,
) -> Result<()> {
    let range = DateRange::parse(start.as_deref(), end.as_deref())?;
    let table = app.repository.get_fund_nav(code, &range, limit)?;
    print_table(&table, app.format)
}

pub fn latest_nav(app: &App, code: Option<String>, top: u32) -> Result<()> {
    let table = app.repository.get_latest_nav(code.as_deref(), top)?;
    print_table(&table, app.format)
}

pub fn managers(
    app: &App,
    code: Option<String>,
    name: Option<String>,
    current_only: bool,
) -> Result<()> {
    let filter = FundManagerFilter {
        ts_code: code,
        name,
        current_only,
    };
    let table = app.repository.get_fund_manager(&filter)?;
    print_table(&table, app.format)
}

pub fn shares(app: &App, code: &str, start: Option<String>, end: Option<String>) -> Result<()> {
    let range = DateRange::parse(start.as_deref(), end.as_deref())?;
    let table = app.repository.get_fund_share(code, &range)?;
    print_table(&table, app.format)
}

pub fn dividends(app: &App, code: Option<String>, year: Option<String>) -> Result<()> {
    let table = app
        .repository
        .get_fund_div(code.as_deref(), year.as_deref())?;
    print_table(&table, app.format)
}

pub fn portfolio(app: &App, code: &str, end_date: Option<String>, latest: bool) -> Result<()> {
    let table = if latest {
        app.repository.get_latest_portfolio(code)?
    } else {
        app.repository.get_fund_portfolio(code, end_date.as_deref())?
    };
    print_table(&table, app.format)
}

pub fn compare(app: &App, codes: &[String]) -> Result<()> {
    let table = app.repository.compare_funds(codes)?;
    if app.json() {
        return print_json(&table);
    }
    let missing: Vec<&str> = codes
        .iter()
        .filter(|code| {
            !table
                .records()
                .any(|r| r.get("ts_code").and_then(|v| v.as_str()) == Some(code.as_str()))
        })
        .map(String::as_str)
        .collect();
    print!("{}", format_table(&table));
    if !missing.is_empty() {
        println!("Not found: {}", missing.join(", "));
    }
    Ok(())
}

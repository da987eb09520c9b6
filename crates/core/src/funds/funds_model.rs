//! Fund domain models, filters and composite results.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::METADATA_TABLE;
use crate::errors::{Error, Result, ValidationError};
use crate::tabular::{Record, Table};
use crate::utils::normalize_date;

/// The fixed set of fund tables written by the collector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FundTable {
    Basic,
    Nav,
    Manager,
    Share,
    Div,
    Portfolio,
}

impl FundTable {
    pub const ALL: [FundTable; 6] = [
        FundTable::Basic,
        FundTable::Nav,
        FundTable::Manager,
        FundTable::Share,
        FundTable::Div,
        FundTable::Portfolio,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            FundTable::Basic => "fund_basic",
            FundTable::Nav => "fund_nav",
            FundTable::Manager => "fund_manager",
            FundTable::Share => "fund_share",
            FundTable::Div => "fund_div",
            FundTable::Portfolio => "fund_portfolio",
        }
    }

    /// Column holding the row date, newest-first ordering uses it.
    pub fn date_column(&self) -> Option<&'static str> {
        match self {
            FundTable::Basic => None,
            FundTable::Nav => Some("nav_date"),
            FundTable::Manager => Some("begin_date"),
            FundTable::Share => Some("trade_date"),
            FundTable::Div => Some("ann_date"),
            FundTable::Portfolio => Some("end_date"),
        }
    }

    /// ORDER BY clause used when reading the whole table.
    pub fn full_order(&self) -> &'static str {
        match self {
            FundTable::Basic => "ts_code",
            FundTable::Nav => "ts_code, nav_date DESC",
            FundTable::Manager => "ts_code, begin_date DESC",
            FundTable::Share => "ts_code, trade_date DESC",
            FundTable::Div => "ts_code, ann_date DESC",
            FundTable::Portfolio => "ts_code, end_date DESC, mkv DESC",
        }
    }

    pub fn from_name(name: &str) -> Option<FundTable> {
        FundTable::ALL.into_iter().find(|t| t.name() == name)
    }
}

impl fmt::Display for FundTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FundTable {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        FundTable::from_name(s).ok_or_else(|| {
            ValidationError::InvalidInput(format!("'{}' is not a fund table", s)).into()
        })
    }
}

/// True for tables that take part in bulk reads and overviews.
pub fn is_data_table(name: &str) -> bool {
    name != METADATA_TABLE
}

fn required_text(record: &Record, column: &str) -> Result<String> {
    record
        .text(column)
        .ok_or_else(|| ValidationError::MissingField(column.to_string()).into())
}

/// Fund listing row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FundBasic {
    pub ts_code: String,
    pub name: Option<String>,
    pub management: Option<String>,
    pub fund_type: Option<String>,
    pub market: Option<String>,
    pub status: Option<String>,
}

impl TryFrom<&Record> for FundBasic {
    type Error = Error;

    fn try_from(record: &Record) -> Result<Self> {
        Ok(Self {
            ts_code: required_text(record, "ts_code")?,
            name: record.text("name"),
            management: record.text("management"),
            fund_type: record.text("fund_type"),
            market: record.text("market"),
            status: record.text("status"),
        })
    }
}

/// Net asset value on one date.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FundNav {
    pub ts_code: String,
    pub nav_date: String,
    pub unit_nav: Option<f64>,
    pub accum_nav: Option<f64>,
}

impl TryFrom<&Record> for FundNav {
    type Error = Error;

    fn try_from(record: &Record) -> Result<Self> {
        Ok(Self {
            ts_code: required_text(record, "ts_code")?,
            nav_date: required_text(record, "nav_date")?,
            unit_nav: record.real("unit_nav"),
            accum_nav: record.real("accum_nav"),
        })
    }
}

/// Manager tenure on a fund.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FundManager {
    pub ts_code: String,
    pub name: String,
    pub begin_date: Option<String>,
    pub end_date: Option<String>,
}

impl FundManager {
    /// A tenure with no end date is current.
    pub fn is_active(&self) -> bool {
        self.end_date.as_deref().map_or(true, str::is_empty)
    }
}

impl TryFrom<&Record> for FundManager {
    type Error = Error;

    fn try_from(record: &Record) -> Result<Self> {
        Ok(Self {
            ts_code: required_text(record, "ts_code")?,
            name: required_text(record, "name")?,
            begin_date: record.text("begin_date"),
            end_date: record.text("end_date"),
        })
    }
}

/// Outstanding shares on a trade date.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FundShare {
    pub ts_code: String,
    pub trade_date: String,
    pub fd_share: Option<f64>,
}

impl TryFrom<&Record> for FundShare {
    type Error = Error;

    fn try_from(record: &Record) -> Result<Self> {
        Ok(Self {
            ts_code: required_text(record, "ts_code")?,
            trade_date: required_text(record, "trade_date")?,
            fd_share: record.real("fd_share"),
        })
    }
}

/// Dividend announcement.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FundDiv {
    pub ts_code: String,
    pub ann_date: String,
    pub div_cash: Option<f64>,
}

impl TryFrom<&Record> for FundDiv {
    type Error = Error;

    fn try_from(record: &Record) -> Result<Self> {
        Ok(Self {
            ts_code: required_text(record, "ts_code")?,
            ann_date: required_text(record, "ann_date")?,
            div_cash: record.real("div_cash"),
        })
    }
}

/// Holding reported at a period end.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FundPortfolio {
    pub ts_code: String,
    pub end_date: String,
    pub symbol: String,
    pub mkv: Option<f64>,
}

impl TryFrom<&Record> for FundPortfolio {
    type Error = Error;

    fn try_from(record: &Record) -> Result<Self> {
        Ok(Self {
            ts_code: required_text(record, "ts_code")?,
            end_date: required_text(record, "end_date")?,
            symbol: required_text(record, "symbol")?,
            mkv: record.real("mkv"),
        })
    }
}

/// Inclusive date range, stored in `YYYYMMDD` form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<String>,
    pub end: Option<String>,
}

impl DateRange {
    pub fn all() -> Self {
        Self::default()
    }

    /// Builds a range from user input, normalizing both bounds.
    pub fn parse(start: Option<&str>, end: Option<&str>) -> Result<Self> {
        let start = start.map(normalize_date).transpose()?;
        let end = end.map(normalize_date).transpose()?;
        if let (Some(s), Some(e)) = (&start, &end) {
            if s > e {
                return Err(ValidationError::InvalidInput(format!(
                    "start date {} is after end date {}",
                    s, e
                ))
                .into());
            }
        }
        Ok(Self { start, end })
    }
}

/// Row window applied after filtering and ordering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Page {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl Page {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn limit(limit: u32) -> Self {
        Self {
            limit: Some(limit),
            offset: None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct FundBasicFilter {
    pub ts_code: Option<String>,
    pub market: Option<String>,
    pub status: Option<String>,
    pub fund_type: Option<String>,
    pub limit: Option<u32>,
}

impl FundBasicFilter {
    pub fn by_code(ts_code: impl Into<String>) -> Self {
        Self {
            ts_code: Some(ts_code.into()),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct FundManagerFilter {
    pub ts_code: Option<String>,
    /// Substring of the manager name.
    pub name: Option<String>,
    pub current_only: bool,
}

/// Column description from the table catalogue.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ColumnInfo {
    pub cid: i64,
    pub name: String,
    pub decl_type: String,
    pub not_null: bool,
    pub default_value: Option<String>,
    pub primary_key: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TableInfo {
    pub table_name: String,
    pub columns: Vec<ColumnInfo>,
    pub record_count: u64,
}

/// Earliest and latest value of a table's date column.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DateSpan {
    pub min: String,
    pub max: String,
}

impl fmt::Display for DateSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ~ {}", self.min, self.max)
    }
}

/// Everything known about one fund.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FundFullInfo {
    pub ts_code: String,
    pub basic: Option<Record>,
    pub latest_nav: Option<Record>,
    pub current_managers: Vec<Record>,
    pub latest_portfolio: Vec<Record>,
}

impl FundFullInfo {
    /// True when no table had a row for the code.
    pub fn is_empty(&self) -> bool {
        self.basic.is_none()
            && self.latest_nav.is_none()
            && self.current_managers.is_empty()
            && self.latest_portfolio.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TableStatistics {
    pub table_name: String,
    pub record_count: u64,
    pub column_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TableOverview {
    pub table_name: String,
    pub record_count: Option<u64>,
    pub date_span: Option<DateSpan>,
    /// Set when the table could not be inspected.
    pub error: Option<String>,
}

/// Result of reading every data table.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AllData {
    pub tables: Vec<(String, Table)>,
}

impl AllData {
    pub fn get(&self, name: &str) -> Option<&Table> {
        self.tables
            .iter()
            .find(|(table, _)| table == name)
            .map(|(_, data)| data)
    }

    pub fn table_names(&self) -> Vec<String> {
        self.tables.iter().map(|(name, _)| name.clone()).collect()
    }
}

/// What an export wrote.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExportSummary {
    pub path: String,
    /// Sheet or table name with its row count.
    pub tables: Vec<(String, usize)>,
}

impl ExportSummary {
    pub fn total_rows(&self) -> usize {
        self.tables.iter().map(|(_, rows)| rows).sum()
    }
}

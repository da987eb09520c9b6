//! Fund repository and service traits.
//!
//! These traits define the query surface without any driver-specific types,
//! so the service layer can be exercised against in-memory fakes.

use std::path::Path;

use super::funds_model::{
    AllData, DateRange, DateSpan, ExportSummary, FundBasicFilter, FundFullInfo,
    FundManagerFilter, FundTable, Page, TableInfo, TableOverview, TableStatistics,
};
use crate::errors::Result;
use crate::tabular::{Table, Value};

/// Read-only queries against the fund store.
///
/// Every call runs in its own connection scope. Implementations must never
/// modify the store.
pub trait FundRepositoryTrait: Send + Sync {
    /// Lists user tables, fund tables first in catalogue order.
    fn list_tables(&self) -> Result<Vec<String>>;

    /// Column catalogue and record count of a table.
    ///
    /// Fails with `QueryError::UnknownTable` when the table does not exist.
    fn table_info(&self, table: &str) -> Result<TableInfo>;

    /// Reads a table, optionally restricted to some columns.
    fn read_table(&self, table: &str, columns: Option<&[String]>, page: Page) -> Result<Table>;

    /// Runs arbitrary read-only SQL with bound parameters.
    fn execute_query(&self, sql: &str, params: &[Value]) -> Result<Table>;

    fn get_fund_basic(&self, filter: &FundBasicFilter) -> Result<Table>;

    /// Substring search on the fund name.
    fn search_fund_by_name(&self, keyword: &str) -> Result<Table>;

    fn get_fund_nav(&self, ts_code: &str, range: &DateRange, limit: Option<u32>)
        -> Result<Table>;

    /// Newest NAV rows.
    ///
    /// With a code, returns up to `top_n` rows for it. Without one, returns
    /// the newest row of every code and ignores `top_n`.
    fn get_latest_nav(&self, ts_code: Option<&str>, top_n: u32) -> Result<Table>;

    fn get_fund_manager(&self, filter: &FundManagerFilter) -> Result<Table>;

    fn get_fund_share(&self, ts_code: &str, range: &DateRange) -> Result<Table>;

    /// Dividends, optionally restricted to announcements in a four digit year.
    fn get_fund_div(&self, ts_code: Option<&str>, year: Option<&str>) -> Result<Table>;

    fn get_fund_portfolio(&self, ts_code: &str, end_date: Option<&str>) -> Result<Table>;

    /// Holdings at the code's most recent report date, largest first.
    fn get_latest_portfolio(&self, ts_code: &str) -> Result<Table>;

    /// Whole table in its catalogue order.
    fn read_full_table(&self, table: FundTable) -> Result<Table>;

    /// Basic info joined with each code's latest NAV.
    fn compare_funds(&self, ts_codes: &[String]) -> Result<Table>;

    /// Range of the table's date column; `None` if it has none or is empty.
    fn date_span(&self, table: FundTable) -> Result<Option<DateSpan>>;
}

/// Composite operations built on the repository.
pub trait FundServiceTrait: Send + Sync {
    fn get_fund_full_info(&self, ts_code: &str) -> Result<FundFullInfo>;

    /// Reads every data table. A table that fails to read is replaced by an
    /// empty table.
    fn get_all_data(&self) -> Result<AllData>;

    fn get_statistics(&self) -> Result<Vec<TableStatistics>>;

    fn get_overview(&self) -> Result<Vec<TableOverview>>;

    /// Writes a table, or the result of `query`, as CSV. Returns rows written.
    fn export_to_csv(&self, table: &str, path: &Path, query: Option<&str>) -> Result<usize>;

    /// Writes one worksheet per table. `None` exports every table.
    fn export_to_excel(&self, path: &Path, tables: Option<&[String]>) -> Result<ExportSummary>;
}

use log::debug;
use rusqlite::types::Value as SqlValue;
use rusqlite::fallible_iterator::FallibleIterator;
use rusqlite::Batch;
use std::collections::HashSet;
use std::sync::Arc;

use fundread_core::errors::{QueryError, Result};
use fundread_core::funds::{
    DateRange, DateSpan, FundBasicFilter, FundManagerFilter, FundRepositoryTrait, FundTable, Page,
    TableInfo,
};
use fundread_core::utils::{normalize_date, validate_year};
use fundread_core::{Table, Value};

use crate::db::FundStore;
use crate::errors::IntoCore;
use crate::query::{collect_rows, from_sql, run_select, to_sql, SelectQuery};
use crate::schema::{quote_identifier, require_columns, require_table, table_columns, user_tables};

/// Rows of `fund_nav` at each code's newest date.
const LATEST_NAV_SQL: &str = "SELECT n.* FROM fund_nav n \
     JOIN (SELECT ts_code, MAX(nav_date) AS max_date FROM fund_nav GROUP BY ts_code) latest \
     ON n.ts_code = latest.ts_code AND n.nav_date = latest.max_date";

const LATEST_PORTFOLIO_SQL: &str = "SELECT * FROM fund_portfolio \
     WHERE ts_code = ?1 \
     AND end_date = (SELECT MAX(end_date) FROM fund_portfolio WHERE ts_code = ?1) \
     ORDER BY mkv DESC";

const COMPARE_COLUMNS: [&str; 7] = [
    "ts_code",
    "name",
    "fund_type",
    "management",
    "nav_date",
    "unit_nav",
    "accum_nav",
];

pub struct FundRepository {
    store: Arc<FundStore>,
}

impl FundRepository {
    pub fn new(store: Arc<FundStore>) -> Self {
        FundRepository { store }
    }

    pub fn store(&self) -> &FundStore {
        &self.store
    }

    fn select(&self, query: SelectQuery) -> Result<Table> {
        self.store.with_connection(|conn| query.fetch(conn))
    }
}

/// Keeps the first row of each `ts_code`; the join can yield several rows
/// for a code whose newest date is duplicated.
fn first_row_per_code(table: Table) -> Table {
    let Some(idx) = table.column_index("ts_code") else {
        return table;
    };
    let mut seen = HashSet::new();
    let rows = table
        .rows()
        .iter()
        .filter(|row| seen.insert(row[idx].to_string()))
        .cloned()
        .collect();
    Table::with_rows(table.columns().to_vec(), rows)
}

impl FundRepositoryTrait for FundRepository {
    fn list_tables(&self) -> Result<Vec<String>> {
        self.store.with_connection(user_tables)
    }

    fn table_info(&self, table: &str) -> Result<TableInfo> {
        self.store.with_connection(|conn| {
            let table_name = require_table(conn, table)?;
            let columns = table_columns(conn, &table_name)?;
            let count: i64 = conn
                .query_row(
                    &format!("SELECT COUNT(*) FROM {}", quote_identifier(&table_name)),
                    [],
                    |row| row.get(0),
                )
                .into_core()?;
            Ok(TableInfo {
                table_name,
                columns,
                record_count: u64::try_from(count).unwrap_or_default(),
            })
        })
    }

    fn read_table(&self, table: &str, columns: Option<&[String]>, page: Page) -> Result<Table> {
        self.store.with_connection(|conn| {
            let table_name = require_table(conn, table)?;
            let mut query = SelectQuery::from_table(&table_name).page(page);
            if let Some(requested) = columns.filter(|c| !c.is_empty()) {
                query = query.columns(&require_columns(conn, &table_name, requested)?);
            }
            query.fetch(conn)
        })
    }

    fn execute_query(&self, sql: &str, params: &[Value]) -> Result<Table> {
        let params: Vec<SqlValue> = params.iter().map(to_sql).collect();
        self.store.with_connection(|conn| {
            debug!("Executing user SQL: {}", sql);
            let mut batch = Batch::new(conn, sql);
            let mut stmt = match batch.next().into_core()? {
                Some(stmt) => stmt,
                None => {
                    return Err(QueryError::Failed("No statement to execute".to_string()).into())
                }
            };
            // Anything after the first statement, even one that fails to prepare, is refused.
            if !matches!(batch.next(), Ok(None)) {
                return Err(QueryError::MultipleStatements(sql.trim().to_string()).into());
            }
            if !stmt.readonly() {
                return Err(QueryError::NotReadOnly(sql.trim().to_string()).into());
            }
            collect_rows(&mut stmt, &params)
        })
    }

    fn get_fund_basic(&self, filter: &FundBasicFilter) -> Result<Table> {
        self.select(
            SelectQuery::from_table(FundTable::Basic.name())
                .eq("ts_code", filter.ts_code.as_deref())
                .eq("market", filter.market.as_deref())
                .eq("status", filter.status.as_deref())
                .eq("fund_type", filter.fund_type.as_deref())
                .order_by("ts_code")
                .page(Page {
                    limit: filter.limit,
                    offset: None,
                }),
        )
    }

    fn search_fund_by_name(&self, keyword: &str) -> Result<Table> {
        self.select(
            SelectQuery::from_table(FundTable::Basic.name())
                .contains("name", Some(keyword))
                .order_by("ts_code"),
        )
    }

    fn get_fund_nav(
        &self,
        ts_code: &str,
        range: &DateRange,
        limit: Option<u32>,
    ) -> Result<Table> {
        self.select(
            SelectQuery::from_table(FundTable::Nav.name())
                .eq("ts_code", Some(ts_code))
                .between("nav_date", range)
                .order_by("nav_date DESC")
                .page(Page {
                    limit,
                    offset: None,
                }),
        )
    }

    fn get_latest_nav(&self, ts_code: Option<&str>, top_n: u32) -> Result<Table> {
        match ts_code {
            Some(code) => self.select(
                SelectQuery::from_table(FundTable::Nav.name())
                    .eq("ts_code", Some(code))
                    .order_by("nav_date DESC")
                    .page(Page::limit(top_n)),
            ),
            None => {
                let sql = format!("{} ORDER BY n.ts_code", LATEST_NAV_SQL);
                let table = self
                    .store
                    .with_connection(|conn| run_select(conn, &sql, &[]))?;
                Ok(first_row_per_code(table))
            }
        }
    }

    fn get_fund_manager(&self, filter: &FundManagerFilter) -> Result<Table> {
        let mut query = SelectQuery::from_table(FundTable::Manager.name())
            .eq("ts_code", filter.ts_code.as_deref())
            .contains("name", filter.name.as_deref());
        if filter.current_only {
            query = query.condition("(end_date IS NULL OR end_date = '')");
        }
        self.select(query.order_by("begin_date DESC"))
    }

    fn get_fund_share(&self, ts_code: &str, range: &DateRange) -> Result<Table> {
        self.select(
            SelectQuery::from_table(FundTable::Share.name())
                .eq("ts_code", Some(ts_code))
                .between("trade_date", range)
                .order_by("trade_date DESC"),
        )
    }

    fn get_fund_div(&self, ts_code: Option<&str>, year: Option<&str>) -> Result<Table> {
        let year = year.map(validate_year).transpose()?;
        self.select(
            SelectQuery::from_table(FundTable::Div.name())
                .eq("ts_code", ts_code)
                .starts_with("ann_date", year.as_deref())
                .order_by("ann_date DESC"),
        )
    }

    fn get_fund_portfolio(&self, ts_code: &str, end_date: Option<&str>) -> Result<Table> {
        let end_date = end_date.map(normalize_date).transpose()?;
        self.select(
            SelectQuery::from_table(FundTable::Portfolio.name())
                .eq("ts_code", Some(ts_code))
                .eq("end_date", end_date.as_deref())
                .order_by("end_date DESC, mkv DESC"),
        )
    }

    fn get_latest_portfolio(&self, ts_code: &str) -> Result<Table> {
        let params = [SqlValue::Text(ts_code.to_string())];
        self.store
            .with_connection(|conn| run_select(conn, LATEST_PORTFOLIO_SQL, &params))
    }

    fn read_full_table(&self, table: FundTable) -> Result<Table> {
        self.store.with_connection(|conn| {
            let table_name = require_table(conn, table.name())?;
            SelectQuery::from_table(&table_name)
                .order_by(table.full_order())
                .fetch(conn)
        })
    }

    fn compare_funds(&self, ts_codes: &[String]) -> Result<Table> {
        if ts_codes.is_empty() {
            return Ok(Table::new(
                COMPARE_COLUMNS.iter().map(|c| c.to_string()).collect(),
            ));
        }

        let placeholders = vec!["?"; ts_codes.len()].join(", ");
        let sql = format!(
            "SELECT b.ts_code, b.name, b.fund_type, b.management, \
             n.nav_date, n.unit_nav, n.accum_nav \
             FROM fund_basic b LEFT JOIN ({}) n ON b.ts_code = n.ts_code \
             WHERE b.ts_code IN ({}) ORDER BY b.ts_code",
            LATEST_NAV_SQL, placeholders
        );
        let params: Vec<SqlValue> = ts_codes
            .iter()
            .map(|code| SqlValue::Text(code.clone()))
            .collect();
        let table = self
            .store
            .with_connection(|conn| run_select(conn, &sql, &params))?;
        Ok(first_row_per_code(table))
    }

    fn date_span(&self, table: FundTable) -> Result<Option<DateSpan>> {
        let Some(column) = table.date_column() else {
            return Ok(None);
        };
        self.store.with_connection(|conn| {
            let table_name = require_table(conn, table.name())?;
            let column = quote_identifier(column);
            let sql = format!(
                "SELECT MIN({col}), MAX({col}) FROM {table} \
                 WHERE {col} IS NOT NULL AND {col} != ''",
                col = column,
                table = quote_identifier(&table_name)
            );
            let (min, max) = conn
                .query_row(&sql, [], |row| {
                    Ok((from_sql(row.get_ref(0)?), from_sql(row.get_ref(1)?)))
                })
                .into_core()?;
            if min.is_null() || max.is_null() {
                return Ok(None);
            }
            Ok(Some(DateSpan {
                min: min.to_string(),
                max: max.to_string(),
            }))
        })
    }
}

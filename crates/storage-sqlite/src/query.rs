//! Parameterized SELECT construction and row decoding.

use log::debug;
use rusqlite::types::{Value as SqlValue, ValueRef};
use rusqlite::{params_from_iter, Connection, Statement};

use fundread_core::errors::Result;
use fundread_core::{DateRange, Page, Table, Value};

use crate::errors::IntoCore;
use crate::schema::quote_identifier;

/// Builds a single-table `SELECT` whose values are all bound parameters.
///
/// Identifiers handed to the builder are quoted but not validated; callers
/// resolve user-supplied names through the catalogue first.
#[derive(Debug, Clone)]
pub(crate) struct SelectQuery {
    table: String,
    columns: Vec<String>,
    conditions: Vec<String>,
    params: Vec<SqlValue>,
    order: Option<&'static str>,
    page: Page,
}

impl SelectQuery {
    pub fn from_table(table: &str) -> Self {
        Self {
            table: quote_identifier(table),
            columns: Vec::new(),
            conditions: Vec::new(),
            params: Vec::new(),
            order: None,
            page: Page::all(),
        }
    }

    pub fn columns(mut self, columns: &[String]) -> Self {
        self.columns = columns.iter().map(|c| quote_identifier(c)).collect();
        self
    }

    /// `column = ?`, skipped when `value` is `None`.
    pub fn eq(mut self, column: &str, value: Option<&str>) -> Self {
        if let Some(value) = value {
            self.conditions
                .push(format!("{} = ?", quote_identifier(column)));
            self.params.push(SqlValue::Text(value.to_string()));
        }
        self
    }

    /// Substring match, with `%` and `_` in `value` taken literally.
    pub fn contains(self, column: &str, value: Option<&str>) -> Self {
        let pattern = value.map(|v| format!("%{}%", escape_like(v)));
        self.like(column, pattern)
    }

    pub fn starts_with(self, column: &str, value: Option<&str>) -> Self {
        let pattern = value.map(|v| format!("{}%", escape_like(v)));
        self.like(column, pattern)
    }

    fn like(mut self, column: &str, pattern: Option<String>) -> Self {
        if let Some(pattern) = pattern {
            self.conditions
                .push(format!("{} LIKE ? ESCAPE '\\'", quote_identifier(column)));
            self.params.push(SqlValue::Text(pattern));
        }
        self
    }

    /// Inclusive bounds on a `YYYYMMDD` column.
    pub fn between(mut self, column: &str, range: &DateRange) -> Self {
        let column = quote_identifier(column);
        if let Some(start) = &range.start {
            self.conditions.push(format!("{} >= ?", column));
            self.params.push(SqlValue::Text(start.clone()));
        }
        if let Some(end) = &range.end {
            self.conditions.push(format!("{} <= ?", column));
            self.params.push(SqlValue::Text(end.clone()));
        }
        self
    }

    /// A fixed predicate with no parameters.
    pub fn condition(mut self, predicate: &'static str) -> Self {
        self.conditions.push(predicate.to_string());
        self
    }

    pub fn order_by(mut self, order: &'static str) -> Self {
        self.order = Some(order);
        self
    }

    pub fn page(mut self, page: Page) -> Self {
        self.page = page;
        self
    }

    pub fn build(self) -> (String, Vec<SqlValue>) {
        let projection = if self.columns.is_empty() {
            "*".to_string()
        } else {
            self.columns.join(", ")
        };
        let mut sql = format!("SELECT {} FROM {}", projection, self.table);
        let mut params = self.params;

        if !self.conditions.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&self.conditions.join(" AND "));
        }
        if let Some(order) = self.order {
            sql.push_str(" ORDER BY ");
            sql.push_str(order);
        }
        match (self.page.limit, self.page.offset) {
            (None, None) => {}
            (limit, offset) => {
                // SQLite only accepts OFFSET after a LIMIT; -1 means unbounded.
                sql.push_str(" LIMIT ?");
                params.push(SqlValue::Integer(limit.map_or(-1, i64::from)));
                if let Some(offset) = offset {
                    sql.push_str(" OFFSET ?");
                    params.push(SqlValue::Integer(i64::from(offset)));
                }
            }
        }
        (sql, params)
    }

    /// Builds and runs the query.
    pub fn fetch(self, conn: &Connection) -> Result<Table> {
        let (sql, params) = self.build();
        run_select(conn, &sql, &params)
    }
}

fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Prepares `sql` and collects every row.
pub(crate) fn run_select(conn: &Connection, sql: &str, params: &[SqlValue]) -> Result<Table> {
    debug!("Executing SQL: {} ({} params)", sql, params.len());
    let mut stmt = conn.prepare(sql).into_core()?;
    collect_rows(&mut stmt, params)
}

/// Runs a prepared statement and decodes its rows in column order.
pub(crate) fn collect_rows(stmt: &mut Statement<'_>, params: &[SqlValue]) -> Result<Table> {
    let columns: Vec<String> = stmt
        .column_names()
        .into_iter()
        .map(String::from)
        .collect();
    let width = columns.len();
    let mut table = Table::new(columns);

    let mut rows = stmt.query(params_from_iter(params.iter())).into_core()?;
    while let Some(row) = rows.next().into_core()? {
        let mut values = Vec::with_capacity(width);
        for idx in 0..width {
            values.push(from_sql(row.get_ref(idx).into_core()?));
        }
        table.push_row(values);
    }
    Ok(table)
}

pub(crate) fn from_sql(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::Integer(i),
        ValueRef::Real(r) => Value::Real(r),
        ValueRef::Text(bytes) => Value::Text(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Blob(bytes) => Value::Blob(bytes.to_vec()),
    }
}

pub(crate) fn to_sql(value: &Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Integer(i) => SqlValue::Integer(*i),
        Value::Real(r) => SqlValue::Real(*r),
        Value::Text(s) => SqlValue::Text(s.clone()),
        Value::Blob(b) => SqlValue::Blob(b.clone()),
    }
}

//! Catalogue lookups and identifier validation.
//!
//! Table and column names cannot be bound as parameters, so any name that
//! reaches generated SQL must first be found in the store's own catalogue.

use rusqlite::Connection;

use fundread_core::errors::{QueryError, Result};
use fundread_core::{ColumnInfo, FundTable};

use crate::errors::IntoCore;

/// User tables, fund tables first in catalogue order, then the rest by name.
pub(crate) fn user_tables(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt = conn
        .prepare(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%'",
        )
        .into_core()?;
    let mut names = stmt
        .query_map([], |row| row.get::<_, String>(0))
        .into_core()?
        .collect::<std::result::Result<Vec<_>, _>>()
        .into_core()?;

    names.sort_by_key(|name| {
        let rank = FundTable::ALL
            .iter()
            .position(|t| t.name() == name.as_str())
            .unwrap_or(FundTable::ALL.len());
        (rank, name.clone())
    });
    Ok(names)
}

/// Returns the catalogue's spelling of `table`, or `UnknownTable`.
pub(crate) fn require_table(conn: &Connection, table: &str) -> Result<String> {
    let mut stmt = conn
        .prepare(
            "SELECT name FROM sqlite_master WHERE type IN ('table', 'view') AND name = ?1 \
             AND name NOT LIKE 'sqlite_%'",
        )
        .into_core()?;
    let mut rows = stmt.query([table]).into_core()?;
    let found = match rows.next().into_core()? {
        Some(row) => row.get::<_, String>(0).into_core()?,
        None => return Err(QueryError::UnknownTable(table.to_string()).into()),
    };
    Ok(found)
}

/// Column catalogue of an existing table.
pub(crate) fn table_columns(conn: &Connection, table: &str) -> Result<Vec<ColumnInfo>> {
    let mut stmt = conn
        .prepare(
            "SELECT cid, name, type, \"notnull\", dflt_value, pk FROM pragma_table_info(?1) ORDER BY cid",
        )
        .into_core()?;
    let columns = stmt
        .query_map([table], |row| {
            Ok(ColumnInfo {
                cid: row.get(0)?,
                name: row.get(1)?,
                decl_type: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
                not_null: row.get::<_, i64>(3)? != 0,
                default_value: row.get(4)?,
                primary_key: row.get::<_, i64>(5)? != 0,
            })
        })
        .into_core()?
        .collect::<std::result::Result<Vec<_>, _>>()
        .into_core()?;
    Ok(columns)
}

/// Checks every requested column against the table's catalogue.
pub(crate) fn require_columns(
    conn: &Connection,
    table: &str,
    requested: &[String],
) -> Result<Vec<String>> {
    let known = table_columns(conn, table)?;
    requested
        .iter()
        .map(|column| {
            known
                .iter()
                .find(|c| c.name.eq_ignore_ascii_case(column))
                .map(|c| c.name.clone())
                .ok_or_else(|| {
                    QueryError::UnknownColumn {
                        table: table.to_string(),
                        column: column.clone(),
                    }
                    .into()
                })
        })
        .collect()
}

/// Double-quotes an identifier for SQLite.
pub(crate) fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

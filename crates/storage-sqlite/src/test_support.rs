//! Fixture stores for tests.

use flate2::write::GzEncoder;
use flate2::Compression;
use rusqlite::{params, Connection};
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

const SCHEMA: &str = "
    CREATE TABLE fund_basic (
        ts_code TEXT PRIMARY KEY,
        name TEXT,
        management TEXT,
        custodian TEXT,
        fund_type TEXT,
        found_date TEXT,
        status TEXT,
        market TEXT
    );
    CREATE TABLE fund_nav (
        ts_code TEXT NOT NULL,
        ann_date TEXT,
        nav_date TEXT NOT NULL,
        unit_nav REAL,
        accum_nav REAL,
        PRIMARY KEY (ts_code, nav_date)
    );
    CREATE TABLE fund_manager (
        ts_code TEXT NOT NULL,
        ann_date TEXT,
        name TEXT NOT NULL,
        gender TEXT,
        begin_date TEXT,
        end_date TEXT
    );
    CREATE TABLE fund_share (
        ts_code TEXT NOT NULL,
        trade_date TEXT NOT NULL,
        fd_share REAL
    );
    CREATE TABLE fund_div (
        ts_code TEXT NOT NULL,
        ann_date TEXT NOT NULL,
        div_cash REAL
    );
    CREATE TABLE fund_portfolio (
        ts_code TEXT NOT NULL,
        ann_date TEXT,
        end_date TEXT NOT NULL,
        symbol TEXT NOT NULL,
        mkv REAL,
        amount REAL
    );
    CREATE TABLE collection_metadata (
        key TEXT PRIMARY KEY,
        value TEXT
    );
";

/// Writes a small but complete fund store to `path`.
///
/// Four funds; `000003.OF` is delisted and has no NAV or holdings.
pub(crate) fn create_fixture(path: &Path) {
    let conn = Connection::open(path).unwrap();
    conn.execute_batch(SCHEMA).unwrap();

    let basics = [
        ("000001.OF", "Alpha Growth Mixed", "Alpha AM", "Mixed", "L", "O"),
        ("000002.OF", "Beta Bond Income", "Beta AM", "Bond", "L", "O"),
        ("000003.OF", "Delta Legacy Growth", "Alpha AM", "Mixed", "D", "O"),
        ("159915.SZ", "ChiNext ETF", "Gamma AM", "Equity", "L", "E"),
    ];
    for (code, name, management, fund_type, status, market) in basics {
        conn.execute(
            "INSERT INTO fund_basic (ts_code, name, management, custodian, fund_type, found_date, status, market)
             VALUES (?1, ?2, ?3, 'Custodian Bank', ?4, '20100101', ?5, ?6)",
            params![code, name, management, fund_type, status, market],
        )
        .unwrap();
    }

    let navs = [
        ("000001.OF", "20240103", 1.10, 2.10),
        ("000001.OF", "20240104", 1.12, 2.12),
        ("000001.OF", "20240105", 1.15, 2.15),
        ("000002.OF", "20240104", 1.01, 1.31),
        ("000002.OF", "20240105", 1.02, 1.32),
        ("159915.SZ", "20240102", 2.50, 2.50),
    ];
    for (code, date, unit, accum) in navs {
        conn.execute(
            "INSERT INTO fund_nav (ts_code, ann_date, nav_date, unit_nav, accum_nav)
             VALUES (?1, ?2, ?2, ?3, ?4)",
            params![code, date, unit, accum],
        )
        .unwrap();
    }

    let managers: [(&str, &str, &str, Option<&str>); 5] = [
        ("000001.OF", "Zhang Wei", "20200101", None),
        ("000001.OF", "Li Na", "20150101", Some("20191231")),
        ("000002.OF", "Wang Fang", "20210601", Some("")),
        ("000002.OF", "Zhao Lei", "20160101", Some("20210531")),
        ("159915.SZ", "Chen Jing", "20180301", None),
    ];
    for (code, name, begin, end) in managers {
        conn.execute(
            "INSERT INTO fund_manager (ts_code, ann_date, name, gender, begin_date, end_date)
             VALUES (?1, ?3, ?2, 'F', ?3, ?4)",
            params![code, name, begin, end],
        )
        .unwrap();
    }

    let shares = [
        ("000001.OF", "20231231", 1000.0),
        ("000001.OF", "20240331", 1200.0),
        ("000002.OF", "20240331", 500.0),
    ];
    for (code, date, share) in shares {
        conn.execute(
            "INSERT INTO fund_share (ts_code, trade_date, fd_share) VALUES (?1, ?2, ?3)",
            params![code, date, share],
        )
        .unwrap();
    }

    let dividends = [
        ("000001.OF", "20230610", 0.05),
        ("000001.OF", "20240115", 0.06),
        ("000002.OF", "20220301", 0.02),
    ];
    for (code, date, cash) in dividends {
        conn.execute(
            "INSERT INTO fund_div (ts_code, ann_date, div_cash) VALUES (?1, ?2, ?3)",
            params![code, date, cash],
        )
        .unwrap();
    }

    let holdings = [
        ("000001.OF", "20230930", "600519.SH", 5.0e6),
        ("000001.OF", "20231231", "600519.SH", 6.0e6),
        ("000001.OF", "20231231", "000858.SZ", 8.0e6),
        ("000001.OF", "20231231", "300750.SZ", 1.0e6),
        ("000002.OF", "20231231", "019547.IB", 3.0e6),
    ];
    for (code, end_date, symbol, mkv) in holdings {
        conn.execute(
            "INSERT INTO fund_portfolio (ts_code, ann_date, end_date, symbol, mkv, amount)
             VALUES (?1, ?2, ?2, ?3, ?4, NULL)",
            params![code, end_date, symbol, mkv],
        )
        .unwrap();
    }

    conn.execute(
        "INSERT INTO collection_metadata (key, value) VALUES ('collected_at', '2024-01-06')",
        [],
    )
    .unwrap();
}

/// Runs extra DDL/DML against a fixture with a writable connection.
pub(crate) fn alter_fixture(path: &Path, sql: &str) {
    let conn = Connection::open(path).unwrap();
    conn.execute_batch(sql).unwrap();
}

/// Compresses `path` into `<path>.gz` next to it and returns the new path.
pub(crate) fn gzip_file(path: &Path) -> PathBuf {
    let mut target = path.as_os_str().to_owned();
    target.push(".gz");
    let target = PathBuf::from(target);

    let mut input = File::open(path).unwrap();
    let mut encoder = GzEncoder::new(File::create(&target).unwrap(), Compression::default());
    io::copy(&mut input, &mut encoder).unwrap();
    encoder.finish().unwrap();
    target
}

//! Subcommand handlers.

use std::sync::Arc;

use anyhow::Result;
use tracing::debug;

use fundread_core::funds::{FundBasicFilter, FundRepositoryTrait, FundService};
use fundread_storage_sqlite::{FundRepository, FundStore};

use crate::config::Config;
use crate::render::OutputFormat;
use crate::{Cli, Commands};

mod export;
mod funds;
mod overview;
mod tables;

/// Everything a handler needs, opened once per invocation.
pub struct App {
    pub store: Arc<FundStore>,
    pub repository: Arc<dyn FundRepositoryTrait>,
    pub service: FundService,
    pub format: OutputFormat,
}

impl App {
    pub fn open(cli: &Cli, config: &Config) -> Result<Self> {
        let settings = config.store_settings(cli.db.clone(), cli.data_dir.clone());
        let store = Arc::new(FundStore::open(&settings)?);
        debug!(
            "Opened store {} (compressed: {})",
            store.path().display(),
            store.is_compressed()
        );
        let repository: Arc<dyn FundRepositoryTrait> =
            Arc::new(FundRepository::new(store.clone()));
        let service = FundService::new(repository.clone());
        Ok(App {
            store,
            repository,
            service,
            format: cli.format,
        })
    }

    pub fn json(&self) -> bool {
        self.format == OutputFormat::Json
    }
}

pub fn run(cli: Cli, config: &Config) -> Result<()> {
    let app = App::open(&cli, config)?;

    match cli.command {
        None => overview::show(&app),
        Some(Commands::Tables) => tables::list(&app),
        Some(Commands::Info { table }) => tables::info(&app, &table),
        Some(Commands::Read {
            table,
            limit,
            offset,
            columns,
            export,
        }) => tables::read(&app, &table, limit, offset, columns, export),
        Some(Commands::Query { sql, limit, export }) => tables::query(&app, &sql, limit, export),
        Some(Commands::Stats) => tables::stats(&app),
        Some(Commands::Funds {
            code,
            market,
            status,
            fund_type,
            limit,
        }) => funds::list(
            &app,
            FundBasicFilter {
                ts_code: code,
                market,
                status,
                fund_type,
                limit,
            },
        ),
        Some(Commands::Fund { code }) => funds::full_info(&app, &code),
        Some(Commands::Search { keyword }) => funds::search(&app, &keyword),
        Some(Commands::Nav {
            code,
            start,
            end,
            limit,
        }) => funds::nav(&app, &code, start, end, limit),
        Some(Commands::LatestNav { code, top }) => funds::latest_nav(&app, code, top),
        Some(Commands::Managers {
            code,
            name,
            current,
        }) => funds::managers(&app, code, name, current),
        Some(Commands::Shares { code, start, end }) => funds::shares(&app, &code, start, end),
        Some(Commands::Dividends { code, year }) => funds::dividends(&app, code, year),
        Some(Commands::Portfolio {
            code,
            end_date,
            latest,
        }) => funds::portfolio(&app, &code, end_date, latest),
        Some(Commands::Compare { codes }) => funds::compare(&app, &codes),
        Some(Commands::AllData { export_excel }) => export::all_data(&app, export_excel),
        Some(Commands::ExportCsv {
            table,
            output,
            query,
        }) => export::csv(&app, &table, &output, query),
        Some(Commands::ExportExcel { output, tables }) => export::excel(&app, &output, tables),
    }
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use clap::Parser;
    use rusqlite::Connection;
    use tempfile::tempdir;

    use super::*;

    const STORE: &str = "
        CREATE TABLE fund_basic (ts_code TEXT PRIMARY KEY, name TEXT, management TEXT,
            fund_type TEXT, status TEXT, market TEXT);
        CREATE TABLE fund_nav (ts_code TEXT, ann_date TEXT, nav_date TEXT,
            unit_nav REAL, accum_nav REAL);
        CREATE TABLE fund_manager (ts_code TEXT, ann_date TEXT, name TEXT,
            begin_date TEXT, end_date TEXT);
        CREATE TABLE fund_portfolio (ts_code TEXT, ann_date TEXT, end_date TEXT,
            symbol TEXT, mkv REAL, amount REAL);
        CREATE TABLE collection_metadata (key TEXT, value TEXT);
        INSERT INTO fund_basic VALUES ('000001.OF', 'Alpha Growth', 'Alpha AM', 'Mixed', 'L', 'O');
        INSERT INTO fund_nav VALUES ('000001.OF', '20240104', '20240104', 1.12, 2.12);
        INSERT INTO fund_nav VALUES ('000001.OF', '20240105', '20240105', 1.15, 2.15);
        INSERT INTO fund_manager VALUES ('000001.OF', '20200101', NULL, '20200101', NULL);
        INSERT INTO fund_portfolio VALUES ('000001.OF', '20240120', '20231231', NULL, 8e6, NULL);
        INSERT INTO collection_metadata VALUES ('collected_at', '20240106');
    ";

    fn create_store(dir: &Path) -> PathBuf {
        let path = dir.join("aifm.db");
        Connection::open(&path).unwrap().execute_batch(STORE).unwrap();
        path
    }

    fn run_args(args: &[&str]) -> Result<()> {
        let cli = Cli::try_parse_from(args.iter().copied()).unwrap();
        run(cli, &Config::default())
    }

    #[test]
    fn test_commands_run_against_store() {
        let dir = tempdir().unwrap();
        let db = create_store(dir.path());
        let db = db.to_str().unwrap();

        run_args(&["fundread", "--db", db]).unwrap();
        run_args(&["fundread", "--db", db, "stats"]).unwrap();
        run_args(&["fundread", "--db", db, "info", "fund_nav"]).unwrap();
        run_args(&["fundread", "--db", db, "latest-nav", "--format", "json"]).unwrap();
        run_args(&["fundread", "--db", db, "compare", "000001.OF", "000009.OF"]).unwrap();
        // The current manager has no name and the holding has no symbol.
        run_args(&["fundread", "--db", db, "fund", "000001.OF"]).unwrap();
    }

    #[test]
    fn test_exports_write_files() {
        let dir = tempdir().unwrap();
        let db = create_store(dir.path());
        let db = db.to_str().unwrap();
        let csv = dir.path().join("nav.csv");
        let xlsx = dir.path().join("funds.xlsx");

        let csv_arg = csv.to_str().unwrap();
        run_args(&["fundread", "--db", db, "export-csv", "fund_nav", csv_arg]).unwrap();
        run_args(&["fundread", "--db", db, "export-excel", xlsx.to_str().unwrap()]).unwrap();

        let written = std::fs::read_to_string(&csv).unwrap();
        assert_eq!(written.lines().count(), 3);
        assert!(xlsx.is_file());
    }

    #[test]
    fn test_query_errors_fail_the_command() {
        let dir = tempdir().unwrap();
        let db = create_store(dir.path());
        let db = db.to_str().unwrap();

        let err =
            run_args(&["fundread", "--db", db, "query", "DELETE FROM fund_nav"]).unwrap_err();
        assert!(err
            .downcast_ref::<fundread_core::Error>()
            .is_some_and(|e| e.is_query()));
    }

    #[test]
    fn test_missing_store_fails() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("absent.db");

        let missing = missing.to_str().unwrap();
        let err = run_args(&["fundread", "--db", missing, "stats"]).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<fundread_core::Error>(),
            Some(fundread_core::Error::NotFound(_))
        ));
    }
}

//! Command line reader for fund record stores.
//!
//! # Examples
//!
//! ```bash
//! # Overview of data/aifm.db.gz (or data/aifm.db)
//! fundread
//!
//! # Latest NAV of one fund, as JSON
//! fundread --format json latest-nav 000001.OF
//!
//! # Export every table to a workbook
//! fundread --db /srv/aifm.db.gz export-excel funds.xlsx
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

mod commands;
mod config;
mod render;

use config::{Config, LogFormat};
use render::OutputFormat;

#[derive(Debug, Parser)]
#[command(name = "fundread")]
#[command(about = "Read fund data from a plain or gzip-compressed SQLite store", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Store file (.db or .db.gz); defaults to <data-dir>/aifm.db.gz, then <data-dir>/aifm.db
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Directory holding the default store files
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List tables with their record counts
    Tables,

    /// Show a table's columns and record count
    Info { table: String },

    /// Read rows from a table
    Read {
        table: String,

        #[arg(long)]
        limit: Option<u32>,

        #[arg(long)]
        offset: Option<u32>,

        /// Comma separated column names
        #[arg(long, value_delimiter = ',')]
        columns: Option<Vec<String>>,

        /// Also write the rows to this CSV file
        #[arg(long)]
        export: Option<PathBuf>,
    },

    /// Run a read-only SQL statement
    Query {
        sql: String,

        #[arg(long)]
        limit: Option<usize>,

        /// Also write the result to this CSV file
        #[arg(long)]
        export: Option<PathBuf>,
    },

    /// List funds from fund_basic
    Funds {
        #[arg(long)]
        code: Option<String>,

        /// Market code, e.g. O (over the counter) or E (exchange)
        #[arg(long)]
        market: Option<String>,

        /// Listing status, e.g. L (listed) or D (delisted)
        #[arg(long)]
        status: Option<String>,

        #[arg(long)]
        fund_type: Option<String>,

        #[arg(long)]
        limit: Option<u32>,
    },

    /// Everything known about one fund
    Fund { code: String },

    /// Search funds by name
    Search { keyword: String },

    /// NAV history of a fund, newest first
    Nav {
        code: String,

        /// YYYYMMDD or YYYY-MM-DD
        #[arg(long)]
        start: Option<String>,

        /// YYYYMMDD or YYYY-MM-DD
        #[arg(long)]
        end: Option<String>,

        #[arg(long)]
        limit: Option<u32>,
    },

    /// Latest NAV rows; one per fund when no code is given
    LatestNav {
        code: Option<String>,

        /// Rows to return for a single fund
        #[arg(long, default_value_t = 1)]
        top: u32,
    },

    /// Fund managers
    Managers {
        #[arg(long)]
        code: Option<String>,

        /// Substring of the manager name
        #[arg(long)]
        name: Option<String>,

        /// Only managers still in office
        #[arg(long)]
        current: bool,
    },

    /// Share history of a fund
    Shares {
        code: String,

        #[arg(long)]
        start: Option<String>,

        #[arg(long)]
        end: Option<String>,
    },

    /// Dividends, optionally for one fund or one year
    Dividends {
        #[arg(long)]
        code: Option<String>,

        /// Four digit announcement year
        #[arg(long)]
        year: Option<String>,
    },

    /// Portfolio holdings of a fund
    Portfolio {
        code: String,

        /// Report date, YYYYMMDD or YYYY-MM-DD
        #[arg(long, conflicts_with = "latest")]
        end_date: Option<String>,

        /// Only the most recent report
        #[arg(long)]
        latest: bool,
    },

    /// Compare funds side by side with their latest NAV
    Compare {
        #[arg(required = true, num_args = 1..)]
        codes: Vec<String>,
    },

    /// Record and column counts per table
    Stats,

    /// Read every data table
    AllData {
        /// Write all tables to this workbook
        #[arg(long)]
        export_excel: Option<PathBuf>,
    },

    /// Export a table, or a query result, to CSV
    ExportCsv {
        table: String,

        output: PathBuf,

        /// Export the result of this SQL instead of the whole table
        #[arg(long)]
        query: Option<String>,
    },

    /// Export tables to an XLSX workbook, one sheet per table
    ExportExcel {
        output: PathBuf,

        /// Comma separated table names; all tables when omitted
        #[arg(long, value_delimiter = ',')]
        tables: Option<Vec<String>>,
    },
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(false)
                    .with_writer(std::io::stderr),
            )
            .init(),
        LogFormat::Text => registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_line_number(true)
                    .with_writer(std::io::stderr),
            )
            .init(),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    init_tracing(config.log_format);

    match commands::run(cli, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!("Command failed: {:?}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_subcommand_is_overview() {
        let cli = Cli::try_parse_from(["fundread"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.format, OutputFormat::Text);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "fundread",
            "latest-nav",
            "000001.OF",
            "--db",
            "store.db.gz",
            "--format",
            "json",
        ])
        .unwrap();
        assert_eq!(cli.db, Some(PathBuf::from("store.db.gz")));
        assert_eq!(cli.format, OutputFormat::Json);
        match cli.command {
            Some(Commands::LatestNav { code, top }) => {
                assert_eq!(code.as_deref(), Some("000001.OF"));
                assert_eq!(top, 1);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_read_columns_are_comma_separated() {
        let cli = Cli::try_parse_from([
            "fundread", "read", "fund_nav", "--columns", "ts_code,unit_nav", "--offset", "5",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Read {
                columns, offset, limit, ..
            }) => {
                assert_eq!(columns, Some(vec!["ts_code".into(), "unit_nav".into()]));
                assert_eq!(offset, Some(5));
                assert_eq!(limit, None);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_compare_requires_codes() {
        assert!(Cli::try_parse_from(["fundread", "compare"]).is_err());
        let cli = Cli::try_parse_from(["fundread", "compare", "A", "B"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Compare { codes }) if codes.len() == 2));
    }

    #[test]
    fn test_portfolio_latest_conflicts_with_end_date() {
        let result = Cli::try_parse_from([
            "fundread",
            "portfolio",
            "000001.OF",
            "--latest",
            "--end-date",
            "20231231",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_funds_filters() {
        let cli = Cli::try_parse_from([
            "fundread", "funds", "--market", "E", "--fund-type", "Equity", "--limit", "3",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Funds {
                market,
                fund_type,
                limit,
                code,
                status,
            }) => {
                assert_eq!(market.as_deref(), Some("E"));
                assert_eq!(fund_type.as_deref(), Some("Equity"));
                assert_eq!(limit, Some(3));
                assert!(code.is_none() && status.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_invalid_format_rejected() {
        assert!(Cli::try_parse_from(["fundread", "--format", "yaml"]).is_err());
    }
}

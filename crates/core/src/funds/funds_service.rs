use log::{debug, info, warn};
use std::path::Path;
use std::sync::Arc;

use super::funds_model::{
    is_data_table, AllData, ExportSummary, FundBasicFilter, FundFullInfo, FundManagerFilter,
    FundTable, Page, TableOverview, TableStatistics,
};
use super::funds_traits::{FundRepositoryTrait, FundServiceTrait};
use crate::errors::Result;
use crate::export::{write_csv, write_workbook};
use crate::tabular::Table;

/// Composite fund operations over a repository.
pub struct FundService {
    repository: Arc<dyn FundRepositoryTrait>,
}

impl FundService {
    pub fn new(repository: Arc<dyn FundRepositoryTrait>) -> Self {
        Self { repository }
    }
}

/// One part of the full-info lookup. Query failures degrade to an empty
/// table; store-level failures propagate.
fn optional_part(part: &str, ts_code: &str, result: Result<Table>) -> Result<Table> {
    match result {
        Ok(table) => Ok(table),
        Err(e) if e.is_query() => {
            warn!("Skipping {} for {}: {}", part, ts_code, e);
            Ok(Table::empty())
        }
        Err(e) => Err(e),
    }
}

impl FundServiceTrait for FundService {
    fn get_fund_full_info(&self, ts_code: &str) -> Result<FundFullInfo> {
        debug!("Loading full info for {}", ts_code);

        let basic = optional_part(
            "basic info",
            ts_code,
            self.repository.get_fund_basic(&FundBasicFilter::by_code(ts_code)),
        )?;
        let latest_nav = optional_part(
            "latest nav",
            ts_code,
            self.repository.get_latest_nav(Some(ts_code), 1),
        )?;
        let managers = optional_part(
            "current managers",
            ts_code,
            self.repository.get_fund_manager(&FundManagerFilter {
                ts_code: Some(ts_code.to_string()),
                name: None,
                current_only: true,
            }),
        )?;
        let portfolio = optional_part(
            "latest portfolio",
            ts_code,
            self.repository.get_latest_portfolio(ts_code),
        )?;

        Ok(FundFullInfo {
            ts_code: ts_code.to_string(),
            basic: basic.first_record(),
            latest_nav: latest_nav.first_record(),
            current_managers: managers.into_records(),
            latest_portfolio: portfolio.into_records(),
        })
    }

    fn get_all_data(&self) -> Result<AllData> {
        let tables = self.repository.list_tables()?;
        let mut all = AllData::default();

        for table in tables.into_iter().filter(|t| is_data_table(t)) {
            let data = match FundTable::from_name(&table) {
                Some(fund_table) => self.repository.read_full_table(fund_table),
                None => self.repository.read_table(&table, None, Page::all()),
            };
            let data = data.unwrap_or_else(|e| {
                warn!("Failed to read table {}: {}", table, e);
                Table::empty()
            });
            all.tables.push((table, data));
        }

        Ok(all)
    }

    fn get_statistics(&self) -> Result<Vec<TableStatistics>> {
        self.repository
            .list_tables()?
            .into_iter()
            .map(|table| {
                let info = self.repository.table_info(&table)?;
                Ok(TableStatistics {
                    table_name: info.table_name,
                    record_count: info.record_count,
                    column_count: info.columns.len(),
                })
            })
            .collect()
    }

    fn get_overview(&self) -> Result<Vec<TableOverview>> {
        let tables = self.repository.list_tables()?;
        let mut overview = Vec::with_capacity(tables.len());

        for table in tables.into_iter().filter(|t| is_data_table(t)) {
            let info = match self.repository.table_info(&table) {
                Ok(info) => info,
                Err(e) => {
                    overview.push(TableOverview {
                        table_name: table,
                        record_count: None,
                        date_span: None,
                        error: Some(e.to_string()),
                    });
                    continue;
                }
            };

            let date_span = match FundTable::from_name(&table) {
                Some(fund_table) if info.record_count > 0 => {
                    self.repository.date_span(fund_table).unwrap_or_else(|e| {
                        debug!("No date span for {}: {}", table, e);
                        None
                    })
                }
                _ => None,
            };

            overview.push(TableOverview {
                table_name: table,
                record_count: Some(info.record_count),
                date_span,
                error: None,
            });
        }

        Ok(overview)
    }

    fn export_to_csv(&self, table: &str, path: &Path, query: Option<&str>) -> Result<usize> {
        let data = match query {
            Some(sql) => self.repository.execute_query(sql, &[])?,
            None => self.repository.read_table(table, None, Page::all())?,
        };
        write_csv(&data, path)
    }

    fn export_to_excel(&self, path: &Path, tables: Option<&[String]>) -> Result<ExportSummary> {
        let tables = match tables {
            Some(names) => names.to_vec(),
            None => self.repository.list_tables()?,
        };

        let mut sheets = Vec::with_capacity(tables.len());
        for table in tables {
            let data = self.repository.read_table(&table, None, Page::all())?;
            info!("Exporting table {} ({} rows)", table, data.len());
            sheets.push((table, data));
        }

        write_workbook(&sheets, path)
    }
}

//! Funds module - domain models, services, and traits.

mod funds_model;
mod funds_service;
mod funds_traits;

#[cfg(test)]
mod funds_model_tests;


pub use funds_model::{
    is_data_table, AllData, ColumnInfo, DateRange, DateSpan, ExportSummary, FundBasic,
    FundBasicFilter, FundDiv, FundFullInfo, FundManager, FundManagerFilter, FundNav,
    FundPortfolio, FundShare, FundTable, Page, TableInfo, TableOverview, TableStatistics,
};
pub use funds_service::FundService;
pub use funds_traits::{FundRepositoryTrait, FundServiceTrait};

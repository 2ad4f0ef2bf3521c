//! Core module: parameters, validation, statement building, rows and KPIs

pub mod error;
pub mod kpi;
pub mod params;
pub mod query;
pub mod row;
pub mod sql;
pub mod store;
pub mod validation;

pub use error::{DashboardError, DashboardResult, StorageError, ValidationError};
pub use kpi::{CardColor, KpiCard, Trend, TrendDirection};
pub use params::RawParams;
pub use query::{Pagination, PaginationMeta, SortDirection};
pub use row::Row;
pub use sql::{Column, QueryFragment, ReportQuery, SortColumn, SqlArg};
pub use store::{ReportPageResult, ReportStore, fetch_page};

//! # View Reports
//!
//! A read-only reporting dashboard over precomputed PostgreSQL views.
//!
//! Each request runs the same pipeline:
//!
//! 1. **Validation**: the raw query string becomes a typed filter; a bad
//!    field falls back to its default instead of failing the request.
//! 2. **Statement building**: the filter becomes a parameterized statement.
//!    Only allow-listed identifiers reach the SQL text, every value is bound.
//! 3. **Execution**: a [`ReportStore`](core::store::ReportStore) runs the
//!    data and count statements; failures surface as a generic error.
//! 4. **KPIs and tables**: summary cards and table cells are derived from
//!    the returned rows and rendered through HTML templates.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use view_reports::prelude::*;
//!
//! let config = DashboardConfig::load()?;
//! let pool = connect_pool(&config.database).await?;
//! ServerBuilder::new()
//!     .with_store(PostgresReportStore::new(pool))
//!     .serve(&config.server.listen_addr)
//!     .await?;
//! ```

pub mod config;
pub mod core;
pub mod render;
pub mod reports;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        error::{DashboardError, DashboardResult, StorageError},
        kpi::KpiCard,
        params::RawParams,
        query::{Pagination, PaginationMeta, SortDirection},
        row::Row,
        sql::{Column, QueryFragment, ReportQuery, SortColumn, SqlArg},
        store::{ReportStore, fetch_page},
    };

    // === Macros ===
    pub use crate::sort_columns;

    // === Reports ===
    pub use crate::reports::{Report, ReportFilter, ReportPage, ReportRegistry};

    // === Storage ===
    #[cfg(feature = "in-memory")]
    pub use crate::storage::InMemoryReportStore;
    #[cfg(feature = "postgres")]
    pub use crate::storage::{PostgresReportStore, connect_pool};

    // === Config ===
    pub use crate::config::DashboardConfig;

    // === Server ===
    pub use crate::server::{AppState, ServerBuilder};

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
}

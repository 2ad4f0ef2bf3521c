//! PostgreSQL report store using sqlx.
//!
//! Provides `PostgresReportStore`, the production [`ReportStore`] backed by a
//! `sqlx::PgPool`. Rows are decoded generically: every data statement is
//! wrapped in `row_to_json` so that whatever columns a view exposes arrive as
//! one JSON object per row.
//!
//! # Feature flag
//!
//! This module is gated behind the `postgres` feature flag (on by default).

use crate::config::DatabaseConfig;
use crate::core::error::StorageError;
use crate::core::row::Row;
use crate::core::sql::{QueryFragment, ReportQuery, SqlArg};
use crate::core::store::ReportStore;
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::time::Duration;

/// Open the shared connection pool
///
/// Called once at startup; the pool is closed on shutdown.
pub async fn connect_pool(config: &DatabaseConfig) -> Result<PgPool> {
    let url = config.connection_url()?;
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .connect(&url)
        .await
        .with_context(|| format!("Failed to connect to PostgreSQL at {}", config.display_target()))
}

/// Report store backed by PostgreSQL.
///
/// # Example
///
/// ```rust,ignore
/// let pool = connect_pool(&config.database).await?;
/// let store = PostgresReportStore::new(pool);
/// let rows = store.fetch(&query).await?;
/// ```
#[derive(Clone, Debug)]
pub struct PostgresReportStore {
    pool: PgPool,
}

impl PostgresReportStore {
    /// Create a new `PostgresReportStore` with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Run a data statement and decode every row as a JSON object
    ///
    /// The pooled connection is held only for this statement and goes back
    /// to the pool when the guard drops, whichever way this returns.
    pub async fn execute(&self, fragment: &QueryFragment) -> Result<Vec<Row>, StorageError> {
        let mut conn = self.pool.acquire().await.map_err(|e| {
            tracing::error!(error = %e, "failed to acquire database connection");
            StorageError::Unavailable
        })?;

        let sql = format!("SELECT row_to_json(r) AS row FROM ({}) AS r", fragment.sql);
        let mut query = sqlx::query_scalar::<_, serde_json::Value>(&sql);
        for arg in &fragment.args {
            query = match arg {
                SqlArg::Int(v) => query.bind(*v),
                SqlArg::Float(v) => query.bind(*v),
                SqlArg::Text(v) => query.bind(v.as_str()),
            };
        }

        tracing::debug!(sql = %fragment.sql, args = fragment.args.len(), "executing report statement");

        let values = query.fetch_all(&mut *conn).await.map_err(|e| {
            tracing::error!(error = %e, sql = %fragment.sql, "database query failed");
            StorageError::QueryFailed
        })?;

        Ok(values.into_iter().map(Row::from_value).collect())
    }

    /// Run a `COUNT(*)` statement
    pub async fn execute_count(&self, fragment: &QueryFragment) -> Result<i64, StorageError> {
        let mut conn = self.pool.acquire().await.map_err(|e| {
            tracing::error!(error = %e, "failed to acquire database connection");
            StorageError::Unavailable
        })?;

        let mut query = sqlx::query_scalar::<_, i64>(&fragment.sql);
        for arg in &fragment.args {
            query = match arg {
                SqlArg::Int(v) => query.bind(*v),
                SqlArg::Float(v) => query.bind(*v),
                SqlArg::Text(v) => query.bind(v.as_str()),
            };
        }

        query.fetch_one(&mut *conn).await.map_err(|e| {
            tracing::error!(error = %e, sql = %fragment.sql, "database count failed");
            StorageError::QueryFailed
        })
    }
}

#[async_trait]
impl ReportStore for PostgresReportStore {
    async fn fetch(&self, query: &ReportQuery) -> Result<Vec<Row>, StorageError> {
        self.execute(&query.data_fragment()).await
    }

    async fn count(&self, query: &ReportQuery) -> Result<i64, StorageError> {
        self.execute_count(&query.count_fragment()).await
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }
}

//! Store trait for querying report views

use crate::core::error::StorageError;
use crate::core::row::Row;
use crate::core::sql::ReportQuery;
use async_trait::async_trait;

/// Read-only access to report views
///
/// Implementations run the statements described by a [`ReportQuery`]. Each
/// call is one database round-trip and either returns its full result or a
/// sanitized [`StorageError`]; there is no retry and no partial result.
#[async_trait]
pub trait ReportStore: Send + Sync {
    /// Rows of the data statement (`query.data_fragment()`)
    async fn fetch(&self, query: &ReportQuery) -> Result<Vec<Row>, StorageError>;

    /// Total of the count statement (`query.count_fragment()`)
    async fn count(&self, query: &ReportQuery) -> Result<i64, StorageError>;

    /// Backend name, used in logs
    fn backend(&self) -> &'static str;
}

/// Rows of one page plus the total used to compute the page count
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportPageResult {
    pub rows: Vec<Row>,
    pub total: i64,
}

/// Run the count statement then the data statement of one query
///
/// Any failure aborts the whole page.
pub async fn fetch_page(
    store: &dyn ReportStore,
    query: &ReportQuery,
) -> Result<ReportPageResult, StorageError> {
    let total = store.count(query).await?;
    let rows = store.fetch(query).await?;
    Ok(ReportPageResult { rows, total })
}

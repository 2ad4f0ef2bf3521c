//! In-memory implementation of ReportStore for testing and development
//!
//! Views are plain vectors of rows. Queries are evaluated from their
//! structured form (predicates, ordering, window) with the same semantics the
//! SQL statements have in PostgreSQL, including `NULL` sorting last in
//! ascending order.

use crate::core::error::StorageError;
use crate::core::row::{Row, display_value, to_number};
use crate::core::sql::{Comparison, Predicate, Projection, QueryFragment, ReportQuery, SqlArg, Window};
use crate::core::store::ReportStore;
use crate::core::query::SortDirection;
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

#[derive(Default)]
struct Inner {
    views: HashMap<String, Vec<Row>>,
    failing: HashSet<String>,
    executed: Vec<QueryFragment>,
}

/// In-memory report store
///
/// Useful for testing and development. Uses RwLock for thread-safe access.
#[derive(Clone, Default)]
pub struct InMemoryReportStore {
    inner: Arc<RwLock<Inner>>,
}

impl InMemoryReportStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the rows of a view
    pub fn with_view(self, view: &str, rows: Vec<Row>) -> Self {
        self.set_view(view, rows);
        self
    }

    pub fn set_view(&self, view: &str, rows: Vec<Row>) {
        if let Ok(mut inner) = self.inner.write() {
            inner.views.insert(view.to_string(), rows);
        }
    }

    /// Make every statement against `view` fail, as a broken database would
    pub fn fail_view(&self, view: &str) {
        if let Ok(mut inner) = self.inner.write() {
            inner.failing.insert(view.to_string());
        }
    }

    /// Statements executed so far, in order
    pub fn executed(&self) -> Vec<QueryFragment> {
        self.inner
            .read()
            .map(|inner| inner.executed.clone())
            .unwrap_or_default()
    }

    fn matching_rows(&self, query: &ReportQuery, fragment: QueryFragment) -> Result<Vec<Row>, StorageError> {
        let mut inner = self.inner.write().map_err(|e| {
            tracing::error!(error = %e, "in-memory store lock poisoned");
            StorageError::Unavailable
        })?;
        inner.executed.push(fragment);

        if inner.failing.contains(query.view()) {
            tracing::error!(view = query.view(), "simulated failure for view");
            return Err(StorageError::QueryFailed);
        }

        let rows = inner
            .views
            .get(query.view())
            .ok_or_else(|| StorageError::UnknownView {
                view: query.view().to_string(),
            })?;

        Ok(rows
            .iter()
            .filter(|row| query.predicates().iter().all(|p| matches(row, p)))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ReportStore for InMemoryReportStore {
    async fn fetch(&self, query: &ReportQuery) -> Result<Vec<Row>, StorageError> {
        let mut rows = self.matching_rows(query, query.data_fragment())?;

        if let Projection::Distinct(column) = query.projection() {
            let mut seen = HashSet::new();
            rows = rows
                .into_iter()
                .filter_map(|row| {
                    let value = row.get(column.name()).clone();
                    let key = display_value(&value).unwrap_or_default();
                    seen.insert(key).then(|| {
                        let mut map = Map::new();
                        map.insert(column.name().to_string(), value);
                        Row::new(map)
                    })
                })
                .collect();
        }

        if let Some((column, direction)) = query.order() {
            rows.sort_by(|a, b| {
                let ordering = compare_values(a.get(column.name()), b.get(column.name()));
                match direction {
                    SortDirection::Asc => ordering,
                    SortDirection::Desc => ordering.reverse(),
                }
            });
        }

        let rows = match query.window() {
            Window::Unbounded => rows,
            Window::Limit(limit) => rows.into_iter().take(clamp_usize(limit)).collect(),
            Window::Page { limit, offset } => rows
                .into_iter()
                .skip(clamp_usize(offset))
                .take(clamp_usize(limit))
                .collect(),
        };
        Ok(rows)
    }

    async fn count(&self, query: &ReportQuery) -> Result<i64, StorageError> {
        let rows = self.matching_rows(query, query.count_fragment())?;
        Ok(rows.len() as i64)
    }

    fn backend(&self) -> &'static str {
        "in-memory"
    }
}

fn clamp_usize(value: i64) -> usize {
    usize::try_from(value.max(0)).unwrap_or(usize::MAX)
}

fn matches(row: &Row, predicate: &Predicate) -> bool {
    let value = row.get(predicate.column.name());
    if value.is_null() {
        return false;
    }
    match (&predicate.arg, predicate.comparison) {
        (SqlArg::Text(expected), Comparison::Eq) => display_value(value).as_deref() == Some(expected),
        (SqlArg::Text(expected), Comparison::Gte) => {
            display_value(value).is_some_and(|actual| actual.as_str() >= expected.as_str())
        }
        (numeric, comparison) => {
            let expected = match numeric {
                SqlArg::Int(i) => *i as f64,
                SqlArg::Float(f) => *f,
                SqlArg::Text(_) => return false,
            };
            let Some(actual) = to_number(value) else {
                return false;
            };
            match comparison {
                Comparison::Eq => actual == expected,
                Comparison::Gte => actual >= expected,
            }
        }
    }
}

/// Ascending order with `NULL` last
fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a.is_null(), b.is_null()) {
        (true, true) => return Ordering::Equal,
        (true, false) => return Ordering::Greater,
        (false, true) => return Ordering::Less,
        _ => {}
    }
    match (a, b) {
        (Value::Number(_), Value::Number(_)) => {
            let (x, y) = (to_number(a).unwrap_or(0.0), to_number(b).unwrap_or(0.0));
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        _ => display_value(a).cmp(&display_value(b)),
    }
}

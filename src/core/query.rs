//! Pagination and sort-direction utilities

use crate::core::params::RawParams;
use crate::core::validation::{field_or_default, validators::int_range};
use serde::Serialize;
use std::fmt;

/// Validated page request
///
/// `page` starts at 1 and `limit` is bounded per report (never above 100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
}

/// Hard ceiling for any report's page size
pub const MAX_PAGE_SIZE: i64 = 100;

impl Pagination {
    /// Read `page` and `limit` from the query string
    ///
    /// Invalid values fall back to page 1 and `default_limit`.
    pub fn from_params(params: &RawParams, default_limit: i64, max_limit: i64) -> Self {
        let max_limit = max_limit.clamp(1, MAX_PAGE_SIZE);
        let page = field_or_default(params, "page", 1, int_range(1, i64::MAX));
        let limit = field_or_default(params, "limit", default_limit, int_range(1, max_limit));
        Self { page, limit }
    }

    /// Number of rows to skip
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

/// Pagination metadata
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PaginationMeta {
    /// Current page number (starts at 1)
    pub page: i64,

    /// Number of items per page
    pub limit: i64,

    /// Total number of rows matching the filters
    pub total: i64,

    /// Total number of pages
    pub total_pages: i64,

    /// Whether there is a next page
    pub has_next: bool,

    /// Whether there is a previous page
    pub has_prev: bool,

    /// 1-based index of the first row shown (0 when there are no rows)
    pub first_row: i64,

    /// 1-based index of the last row shown
    pub last_row: i64,
}

impl PaginationMeta {
    /// Create pagination metadata from calculation
    pub fn new(pagination: Pagination, total: i64) -> Self {
        // Ensure limit is at least 1 to avoid division by zero
        let limit = pagination.limit.max(1);
        let page = pagination.page.max(1);
        let total = total.max(0);
        let total_pages = total_pages(total, limit);
        let start = (page - 1).saturating_mul(limit);
        let first_row = if start < total { start + 1 } else { 0 };

        Self {
            page,
            limit,
            total,
            total_pages,
            has_next: page < total_pages,
            has_prev: page > 1,
            first_row,
            last_row: (page.saturating_mul(limit)).min(total),
        }
    }
}

/// Ceiling division of rows by page size
pub fn total_pages(total: i64, limit: i64) -> i64 {
    if total <= 0 { 0 } else { (total + limit.max(1) - 1) / limit.max(1) }
}

/// Sort direction; the only two literals ever written into a statement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    /// Exact match on `ASC`; anything else is `DESC`
    pub fn from_param(raw: Option<&str>) -> Self {
        match raw {
            Some("ASC") => SortDirection::Asc,
            _ => SortDirection::Desc,
        }
    }

    pub fn from_params(params: &RawParams) -> Self {
        Self::from_param(params.get("orderDir"))
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

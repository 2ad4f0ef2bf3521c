//! Report definitions
//!
//! A report reads one view: it validates its own filter from the query
//! string, builds the statements, derives KPI cards from the returned page
//! and describes its table columns. [`ReportRegistry`] holds the five
//! reports served by the dashboard.

pub mod category_sales;
pub mod customer_analysis;
pub mod links;
pub mod monthly_trend;
pub mod product_ranking;
pub mod registry;
pub mod satisfaction;

pub use registry::{ReportRegistry, ReportSummary};

use crate::core::error::StorageError;
use crate::core::kpi::KpiCard;
use crate::core::params::RawParams;
use crate::core::store::ReportStore;
use crate::render::table::TableView;
use async_trait::async_trait;
use links::{FilterForm, LinkGroup, PageLinks, QueryPairs};
use serde::Serialize;

/// A typed, validated filter that can be written back as a query string
pub trait ReportFilter: Sized {
    /// Validate raw parameters; invalid fields take their defaults
    fn from_params(params: &RawParams) -> Self;

    /// Canonical parameters, in a fixed order
    fn to_pairs(&self) -> QueryPairs;

    fn to_query_string(&self) -> String {
        links::query_string(&self.to_pairs())
    }
}

/// One dashboard report
#[async_trait]
pub trait Report: Send + Sync {
    /// Numeric id used in the route (`/reports/{id}`)
    fn id(&self) -> u32;

    fn title(&self) -> &'static str;

    fn description(&self) -> &'static str;

    fn path(&self) -> String {
        format!("/reports/{}", self.id())
    }

    /// Validate the parameters, run the statements and assemble the page
    async fn build(&self, params: &RawParams, store: &dyn ReportStore) -> Result<ReportPage, StorageError>;
}

/// Everything the report template needs
#[derive(Debug, Clone, Serialize)]
pub struct ReportPage {
    pub id: u32,
    pub path: String,
    pub title: &'static str,
    pub description: &'static str,
    pub kpis: Vec<KpiCard>,
    pub controls: Vec<LinkGroup>,
    pub form: Option<FilterForm>,
    pub table_title: String,
    pub table: TableView,
    pub pagination: Option<PageLinks>,
}

impl ReportPage {
    pub fn new<R: Report + ?Sized>(report: &R, table_title: impl Into<String>, table: TableView) -> Self {
        Self {
            id: report.id(),
            path: report.path(),
            title: report.title(),
            description: report.description(),
            kpis: Vec::new(),
            controls: Vec::new(),
            form: None,
            table_title: table_title.into(),
            table,
            pagination: None,
        }
    }

    pub fn with_kpis(mut self, kpis: Vec<KpiCard>) -> Self {
        self.kpis = kpis;
        self
    }

    pub fn with_controls(mut self, controls: Vec<LinkGroup>) -> Self {
        self.controls = controls;
        self
    }

    pub fn with_form(mut self, form: FilterForm) -> Self {
        self.form = Some(form);
        self
    }

    pub fn with_pagination(mut self, pagination: PageLinks) -> Self {
        self.pagination = Some(pagination);
        self
    }
}

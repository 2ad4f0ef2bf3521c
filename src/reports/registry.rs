//! Registry of the dashboard reports

use super::Report;
use super::category_sales::CategorySalesReport;
use super::customer_analysis::CustomerAnalysisReport;
use super::monthly_trend::MonthlyTrendReport;
use super::product_ranking::ProductRankingReport;
use super::satisfaction::SatisfactionReport;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Index entry for one report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportSummary {
    pub id: u32,
    pub path: String,
    pub title: &'static str,
    pub description: &'static str,
}

/// Reports keyed by id, listed in id order
#[derive(Default, Clone)]
pub struct ReportRegistry {
    reports: BTreeMap<u32, Arc<dyn Report>>,
}

impl ReportRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// The five dashboard reports
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.register(CategorySalesReport);
        registry.register(CustomerAnalysisReport);
        registry.register(ProductRankingReport);
        registry.register(MonthlyTrendReport);
        registry.register(SatisfactionReport);
        registry
    }

    /// Register a report; a report with the same id is replaced
    pub fn register(&mut self, report: impl Report + 'static) {
        self.reports.insert(report.id(), Arc::new(report));
    }

    pub fn get(&self, id: u32) -> Option<Arc<dyn Report>> {
        self.reports.get(&id).cloned()
    }

    pub fn summaries(&self) -> Vec<ReportSummary> {
        self.reports
            .values()
            .map(|report| ReportSummary {
                id: report.id(),
                path: report.path(),
                title: report.title(),
                description: report.description(),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }
}

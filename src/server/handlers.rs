//! HTTP handlers

use super::state::AppState;
use crate::core::error::{DashboardError, DashboardResult};
use crate::core::params::RawParams;
use crate::render::templates::{INDEX_TEMPLATE, REPORT_TEMPLATE};
use crate::reports::{ReportPage, ReportSummary};
use axum::Json;
use axum::extract::{Path, State};
use axum::response::Html;
use serde::Serialize;
use serde_json::{Value, json};

/// Name reported by the health endpoints
pub const SERVICE_NAME: &str = "view-reports";

#[derive(Serialize)]
struct IndexContext {
    title: &'static str,
    reports: Vec<ReportSummary>,
}

#[derive(Serialize)]
struct ReportContext {
    title: &'static str,
    reports: Vec<ReportSummary>,
    page: ReportPage,
}

/// `GET /`
pub async fn index(State(state): State<AppState>) -> DashboardResult<Html<String>> {
    let context = IndexContext {
        title: "Reportes",
        reports: state.registry.summaries(),
    };
    Ok(Html(state.templates.render(INDEX_TEMPLATE, &context)?))
}

/// `GET /reports/{id}`
pub async fn report(
    State(state): State<AppState>,
    Path(id): Path<String>,
    params: RawParams,
) -> DashboardResult<Html<String>> {
    let report = id
        .parse::<u32>()
        .ok()
        .and_then(|id| state.registry.get(id))
        .ok_or_else(|| DashboardError::NotFound {
            what: format!("report '{}'", id),
        })?;

    let page = report
        .build(&params, state.store.as_ref())
        .await
        .inspect_err(|e| {
            tracing::warn!(report = report.id(), backend = state.store.backend(), error = %e, "report could not be built");
        })?;

    let context = ReportContext {
        title: report.title(),
        reports: state.registry.summaries(),
        page,
    };
    Ok(Html(state.templates.render(REPORT_TEMPLATE, &context)?))
}

/// `GET /health`, `GET /healthz`
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": SERVICE_NAME
    }))
}

/// Any other path
pub async fn not_found() -> DashboardError {
    DashboardError::NotFound {
        what: "page".to_string(),
    }
}

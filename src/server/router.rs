//! Route table

use super::handlers;
use super::state::AppState;
use axum::Router;
use axum::routing::get;
use tower_http::trace::TraceLayer;

/// Build the dashboard router
///
/// - `GET /` report index
/// - `GET /reports/{id}` one report, filters in the query string
/// - `GET /health`, `GET /healthz`
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/reports/{id}", get(handlers::report))
        .route("/health", get(handlers::health))
        .route("/healthz", get(handlers::health))
        .fallback(handlers::not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(all(test, feature = "in-memory"))]
mod tests {
    use super::*;
    use crate::render::Templates;
    use crate::reports::ReportRegistry;
    use crate::storage::InMemoryReportStore;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app() -> Router {
        let state = AppState::new(
            Arc::new(InMemoryReportStore::new()),
            ReportRegistry::standard(),
            Templates::new().unwrap(),
        );
        build_router(state)
    }

    async fn get(uri: &str) -> (StatusCode, String) {
        let response = app()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_healthz_alias() {
        let (status, body) = get("/healthz").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("\"service\":\"view-reports\""));
    }

    #[tokio::test]
    async fn test_fallback_is_html_not_found() {
        let (status, body) = get("/reports/1/extra").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.contains("page not found"));
    }

    #[tokio::test]
    async fn test_index_links_every_report() {
        let (status, body) = get("/").await;
        assert_eq!(status, StatusCode::OK);
        for id in 1..=5 {
            assert!(body.contains(&format!("href=\"/reports/{}\"", id)));
        }
    }
}

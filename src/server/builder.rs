//! ServerBuilder for fluent API to build the dashboard server

use super::router::build_router;
use super::state::AppState;
use crate::core::store::ReportStore;
use crate::render::Templates;
use crate::reports::ReportRegistry;
use anyhow::Result;
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Builder for the dashboard HTTP server
///
/// # Example
///
/// ```ignore
/// let pool = connect_pool(&config.database).await?;
/// ServerBuilder::new()
///     .with_store(PostgresReportStore::new(pool))
///     .serve("0.0.0.0:3000")
///     .await?;
/// ```
pub struct ServerBuilder {
    store: Option<Arc<dyn ReportStore>>,
    registry: ReportRegistry,
}

impl ServerBuilder {
    /// Create a builder serving the five standard reports
    pub fn new() -> Self {
        Self {
            store: None,
            registry: ReportRegistry::standard(),
        }
    }

    /// Set the report store (required)
    pub fn with_store(mut self, store: impl ReportStore + 'static) -> Self {
        self.store = Some(Arc::new(store));
        self
    }

    /// Set an already shared report store
    pub fn with_shared_store(mut self, store: Arc<dyn ReportStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Replace the report registry
    pub fn with_registry(mut self, registry: ReportRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Assemble the shared state (parses templates)
    pub fn build_state(self) -> Result<AppState> {
        let store = self
            .store
            .ok_or_else(|| anyhow::anyhow!("ReportStore is required. Call .with_store()"))?;
        let templates = Templates::new()?;
        Ok(AppState::new(store, self.registry, templates))
    }

    /// Build the router
    pub fn build(self) -> Result<Router> {
        Ok(build_router(self.build_state()?))
    }

    /// Serve the application with graceful shutdown
    ///
    /// This will:
    /// - Bind to the provided address
    /// - Start serving requests
    /// - Handle SIGTERM and SIGINT (Ctrl+C) for graceful shutdown
    pub async fn serve(self, addr: &str) -> Result<()> {
        let backend = self.store.as_ref().map(|s| s.backend()).unwrap_or("none");
        let app = self.build()?;
        let listener = TcpListener::bind(addr).await?;

        tracing::info!(backend, "Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Wait for Ctrl+C or SIGTERM
///
/// A handler that cannot be installed never fires; the other one still does.
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}

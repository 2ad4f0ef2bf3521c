//! Shared application state

use crate::core::store::ReportStore;
use crate::render::Templates;
use crate::reports::ReportRegistry;
use std::sync::Arc;

/// State handed to every handler
///
/// The store wraps the process-wide connection pool; it is created once at
/// startup and shared by reference.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ReportStore>,
    pub registry: Arc<ReportRegistry>,
    pub templates: Arc<Templates>,
}

impl AppState {
    pub fn new(store: Arc<dyn ReportStore>, registry: ReportRegistry, templates: Templates) -> Self {
        Self {
            store,
            registry: Arc::new(registry),
            templates: Arc::new(templates),
        }
    }
}

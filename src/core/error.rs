//! Typed error handling for the dashboard
//!
//! Request handling never forwards low-level failure text to the browser.
//! Database and template errors are logged where they happen and surface
//! here as opaque variants whose `Display` is safe to render.
//!
//! # Error Categories
//!
//! - [`ValidationError`]: a request parameter could not be used as given
//! - [`StorageError`]: the database could not answer a statement
//! - [`ConfigError`]: startup configuration is missing or out of bounds
//! - [`RenderError`]: an HTML template failed to render
//!
//! # Example
//!
//! ```rust,ignore
//! async fn handler(State(state): State<AppState>) -> Result<Html<String>, DashboardError> {
//!     let rows = state.store.fetch(&query).await?; // StorageError -> DashboardError
//!     Ok(Html(render(rows)?))
//! }
//! ```

use axum::Json;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use serde::Serialize;
use std::fmt;

/// Message shown to the caller for any database failure.
pub const GENERIC_QUERY_ERROR: &str = "Error executing the database query";

/// The main error type of the request pipeline
#[derive(Debug)]
pub enum DashboardError {
    /// A parameter could not be validated
    Validation(ValidationError),

    /// Database errors (already sanitized)
    Storage(StorageError),

    /// Configuration errors
    Config(ConfigError),

    /// Template rendering errors
    Render(RenderError),

    /// The requested report does not exist
    NotFound { what: String },

    /// Internal errors (should not happen in normal operation)
    Internal(String),
}

impl fmt::Display for DashboardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DashboardError::Validation(e) => write!(f, "{}", e),
            DashboardError::Storage(e) => write!(f, "{}", e),
            DashboardError::Config(e) => write!(f, "{}", e),
            DashboardError::Render(e) => write!(f, "{}", e),
            DashboardError::NotFound { what } => write!(f, "{} not found", what),
            DashboardError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for DashboardError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DashboardError::Validation(e) => Some(e),
            DashboardError::Storage(e) => Some(e),
            DashboardError::Config(e) => Some(e),
            DashboardError::Render(e) => Some(e),
            DashboardError::NotFound { .. } | DashboardError::Internal(_) => None,
        }
    }
}

/// Error body for JSON consumers (health checks, tests)
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable, sanitized message
    pub message: String,
}

impl DashboardError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            DashboardError::Validation(_) => StatusCode::BAD_REQUEST,
            DashboardError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            DashboardError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            DashboardError::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
            DashboardError::NotFound { .. } => StatusCode::NOT_FOUND,
            DashboardError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            DashboardError::Validation(_) => "VALIDATION_ERROR",
            DashboardError::Storage(_) => "STORAGE_ERROR",
            DashboardError::Config(_) => "CONFIG_ERROR",
            DashboardError::Render(_) => "RENDER_ERROR",
            DashboardError::NotFound { .. } => "NOT_FOUND",
            DashboardError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Message that may be shown to the caller
    ///
    /// Internal details are replaced by a generic text; the full error has
    /// already been logged at the point of failure.
    pub fn public_message(&self) -> String {
        match self {
            DashboardError::Storage(_) => GENERIC_QUERY_ERROR.to_string(),
            DashboardError::Render(_) | DashboardError::Internal(_) | DashboardError::Config(_) => {
                "Unexpected error while building the report".to_string()
            }
            other => other.to_string(),
        }
    }

    /// Convert to a JSON error body
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.error_code().to_string(),
            message: self.public_message(),
        }
    }

    /// Render as a minimal standalone HTML page
    pub fn to_html(&self) -> String {
        format!(
            "<!DOCTYPE html><html lang=\"es\"><head><meta charset=\"utf-8\"><title>Error</title></head>\
             <body><main class=\"container mx-auto p-6\"><h1>Error</h1><p>{}</p>\
             <p><a href=\"/\">Volver al inicio</a></p></main></body></html>",
            escape_html(&self.public_message())
        )
    }

    /// JSON variant of the response, for API-style callers
    pub fn into_json_response(self) -> Response {
        let status = self.status_code();
        (status, Json(self.to_response())).into_response()
    }
}

impl IntoResponse for DashboardError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (status, Html(self.to_html())).into_response()
    }
}

fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

// =============================================================================
// Validation Errors
// =============================================================================

/// A single parameter that was rejected
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("invalid value for '{field}': {message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl From<ValidationError> for DashboardError {
    fn from(err: ValidationError) -> Self {
        DashboardError::Validation(err)
    }
}

// =============================================================================
// Storage Errors
// =============================================================================

/// Errors raised by report stores
///
/// None of the variants carry the backend's own error text.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StorageError {
    /// No connection could be obtained from the pool
    #[error("Error executing the database query")]
    Unavailable,

    /// The statement failed to execute or a row could not be decoded
    #[error("Error executing the database query")]
    QueryFailed,

    /// The in-memory store has no data registered for a view
    #[error("unknown view '{view}'")]
    UnknownView { view: String },
}

impl From<StorageError> for DashboardError {
    fn from(err: StorageError) -> Self {
        DashboardError::Storage(err)
    }
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors related to loading configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("configuration file not found: {path}")]
    FileNotFound { path: String },

    #[error("failed to parse configuration: {message}")]
    ParseError { message: String },

    #[error("invalid configuration: {message}")]
    Invalid { message: String },

    #[error("missing database setting: {setting}")]
    MissingDatabaseSetting { setting: String },
}

impl From<ConfigError> for DashboardError {
    fn from(err: ConfigError) -> Self {
        DashboardError::Config(err)
    }
}

// =============================================================================
// Render Errors
// =============================================================================

/// Template failures
#[derive(Debug, thiserror::Error)]
#[error("failed to render template '{template}'")]
pub struct RenderError {
    pub template: String,
}

impl From<RenderError> for DashboardError {
    fn from(err: RenderError) -> Self {
        DashboardError::Render(err)
    }
}

/// A specialized Result type for the request pipeline
pub type DashboardResult<T> = Result<T, DashboardError>;

//! HTML templates
//!
//! Templates are compiled into the binary and parsed once at startup. Their
//! names end in `.html`, so tera escapes every interpolated value.

use crate::core::error::RenderError;
use serde::Serialize;
use tera::{Context, Tera};

pub const BASE_TEMPLATE: &str = "base.html";
pub const INDEX_TEMPLATE: &str = "index.html";
pub const REPORT_TEMPLATE: &str = "report.html";

/// Parsed template set
#[derive(Debug, Clone)]
pub struct Templates {
    tera: Tera,
}

impl Templates {
    /// Parse the built-in templates
    pub fn new() -> Result<Self, RenderError> {
        let mut tera = Tera::default();
        tera.add_raw_templates(vec![
            (BASE_TEMPLATE, include_str!("../../templates/base.html")),
            (INDEX_TEMPLATE, include_str!("../../templates/index.html")),
            (REPORT_TEMPLATE, include_str!("../../templates/report.html")),
        ])
        .map_err(|e| {
            tracing::error!(error = ?e, "failed to parse templates");
            RenderError {
                template: BASE_TEMPLATE.to_string(),
            }
        })?;
        Ok(Self { tera })
    }

    /// Render `name` with a serializable context
    pub fn render<T: Serialize>(&self, name: &str, context: &T) -> Result<String, RenderError> {
        let failed = || RenderError {
            template: name.to_string(),
        };
        let context = Context::from_serialize(context).map_err(|e| {
            tracing::error!(template = name, error = ?e, "invalid template context");
            failed()
        })?;
        self.tera.render(name, &context).map_err(|e| {
            tracing::error!(template = name, error = ?e, "template rendering failed");
            failed()
        })
    }
}

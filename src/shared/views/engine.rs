//! Page template engine using Jinja2 syntax.
//!
//! Page templates are compiled into the binary from `templates/pages/`. A
//! directory configured through `TEMPLATE_DIR` can override any of them by
//! file name, which lets a shop restyle pages without rebuilding.

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use minijinja::{Environment, Value};
use serde::Serialize;
use std::path::Path;
use std::sync::OnceLock;
use thiserror::Error;

use crate::core::config::ShopConfig;

/// Global template environment
static TEMPLATE_ENV: OnceLock<Environment<'static>> = OnceLock::new();

/// Built-in templates, keyed by their path relative to `templates/pages/`
const BUILTIN_TEMPLATES: &[(&str, &str)] = &[
    ("base.html", include_str!("../../../templates/pages/base.html")),
    ("error.html", include_str!("../../../templates/pages/error.html")),
    (
        "confirm_delete.html",
        include_str!("../../../templates/pages/confirm_delete.html"),
    ),
    (
        "categories/index.html",
        include_str!("../../../templates/pages/categories/index.html"),
    ),
    (
        "products/index.html",
        include_str!("../../../templates/pages/products/index.html"),
    ),
    (
        "sales/index.html",
        include_str!("../../../templates/pages/sales/index.html"),
    ),
    (
        "invoices/search.html",
        include_str!("../../../templates/pages/invoices/search.html"),
    ),
    (
        "invoices/print.html",
        include_str!("../../../templates/pages/invoices/print.html"),
    ),
];

/// Errors that can occur during template operations
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Template '{0}' not found")]
    NotFound(String),

    #[error("Failed to render template: {0}")]
    RenderError(String),
}

impl From<TemplateError> for crate::core::error::AppError {
    fn from(e: TemplateError) -> Self {
        crate::core::error::AppError::Internal(e.to_string())
    }
}

/// Initialize the template environment.
///
/// Must run before the first render to take effect; later calls are ignored
/// and return `false`.
pub fn init_views(shop: &ShopConfig, override_dir: Option<&Path>) -> bool {
    let env = build_environment(&shop.name, override_dir);
    TEMPLATE_ENV.set(env).is_ok()
}

fn build_environment(shop_name: &str, override_dir: Option<&Path>) -> Environment<'static> {
    let mut env = Environment::new();
    env.add_global("shop_name", Value::from(shop_name.to_string()));

    for (name, source) in BUILTIN_TEMPLATES {
        if let Err(e) = env.add_template(name, source) {
            tracing::error!("Built-in template {} is invalid: {}", name, e);
        }
    }

    if let Some(dir) = override_dir {
        if dir.exists() {
            load_overrides_recursive(&mut env, dir, dir);
        } else {
            tracing::warn!("Template override directory {} does not exist", dir.display());
        }
    }

    env
}

/// Recursively load all .html templates from a directory, replacing built-ins of the same name
fn load_overrides_recursive(env: &mut Environment<'static>, base_path: &Path, current_path: &Path) {
    if let Ok(entries) = std::fs::read_dir(current_path) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                load_overrides_recursive(env, base_path, &path);
            } else if path.extension().is_some_and(|ext| ext == "html") {
                if let Ok(relative) = path.strip_prefix(base_path) {
                    let template_name = relative.to_string_lossy().replace('\\', "/");
                    if let Ok(content) = std::fs::read_to_string(&path) {
                        // Overrides live for the whole process
                        let static_name: &'static str =
                            Box::leak(template_name.clone().into_boxed_str());
                        let static_content: &'static str = Box::leak(content.into_boxed_str());
                        if let Err(e) = env.add_template(static_name, static_content) {
                            tracing::warn!("Failed to load template {}: {}", template_name, e);
                        } else {
                            tracing::info!("Template override loaded: {}", template_name);
                        }
                    }
                }
            }
        }
    }
}

/// Get the global template environment
fn get_environment() -> &'static Environment<'static> {
    TEMPLATE_ENV.get_or_init(|| build_environment(&ShopConfig::default().name, None))
}

/// Render a page template with the given context
pub fn render_template<S: Serialize>(template_name: &str, ctx: &S) -> Result<String, TemplateError> {
    let template = get_environment()
        .get_template(template_name)
        .map_err(|_| TemplateError::NotFound(template_name.to_string()))?;

    template
        .render(ctx)
        .map_err(|e| TemplateError::RenderError(e.to_string()))
}

/// Render a page template into an HTML response body
pub fn render<S: Serialize>(template_name: &str, ctx: &S) -> crate::core::error::Result<Html<String>> {
    Ok(Html(render_template(template_name, ctx)?))
}

/// Render a page template with an explicit status, e.g. a form re-shown with a banner
pub fn render_with_status<S: Serialize>(
    status: StatusCode,
    template_name: &str,
    ctx: &S,
) -> crate::core::error::Result<Response> {
    Ok((status, render(template_name, ctx)?).into_response())
}

use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::categories::handlers;
use crate::features::categories::services::CategoryService;

/// Create routes for the categories feature
pub fn routes(service: Arc<CategoryService>) -> Router {
    Router::new()
        .route(
            "/categories",
            get(handlers::list_categories).post(handlers::save_category),
        )
        .route(
            "/categories/{id}/delete",
            get(handlers::confirm_delete_category).post(handlers::delete_category),
        )
        .with_state(service)
}

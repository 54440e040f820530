use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::features::products::handlers;
use crate::features::products::services::ProductService;

/// Create routes for the products feature
pub fn routes(service: Arc<ProductService>) -> Router {
    // Room for the image plus the other multipart fields
    let upload_limit = service.max_image_size() + 1024 * 1024;

    Router::new()
        .route(
            "/products",
            get(handlers::list_products)
                .post(handlers::save_product)
                .layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/products/{id}/price", post(handlers::update_price))
        .route(
            "/products/{id}/delete",
            get(handlers::confirm_delete_product).post(handlers::delete_product),
        )
        .with_state(service)
}

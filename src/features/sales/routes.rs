use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::features::sales::handlers;
use crate::features::sales::services::SaleService;

/// Create routes for the sales feature
pub fn routes(service: Arc<SaleService>) -> Router {
    Router::new()
        .route("/", get(handlers::new_sale))
        .route("/sales", get(handlers::new_sale))
        .route("/sales/new", get(handlers::new_sale))
        .route("/sales/new/items", post(handlers::add_item_to_new_sale))
        .route("/sales/new/customer", post(handlers::set_customer_on_new_sale))
        .route("/sales/new/checkout", post(handlers::checkout_new_sale))
        .route("/sales/{cart_id}", get(handlers::show_sale))
        .route("/sales/{cart_id}/items", post(handlers::add_item))
        .route(
            "/sales/{cart_id}/items/{product_id}/quantity",
            post(handlers::update_quantity),
        )
        .route(
            "/sales/{cart_id}/items/{product_id}/remove",
            post(handlers::remove_item),
        )
        .route("/sales/{cart_id}/customer", post(handlers::set_customer))
        .route("/sales/{cart_id}/checkout", post(handlers::checkout))
        .with_state(service)
}

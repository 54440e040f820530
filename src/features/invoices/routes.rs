use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::invoices::handlers;
use crate::features::invoices::services::InvoiceService;

/// Create routes for the invoices feature
pub fn routes(service: Arc<InvoiceService>) -> Router {
    Router::new()
        .route("/invoices", get(handlers::search_form))
        .route("/invoices/search", get(handlers::search_invoices))
        .route("/invoices/{code}/print", get(handlers::print_invoice))
        .route("/invoices/{code}/receipt.txt", get(handlers::download_receipt))
        .with_state(service)
}

//! The sales counter: build a cart from the product grid, name the customer
//! and check out into an invoice.

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod workers;

pub use services::SaleService;

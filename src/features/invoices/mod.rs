//! Invoice lookup by code or sale date, the printable invoice page and the
//! plain-text receipt.

pub mod dtos;
pub mod handlers;
pub mod routes;
pub mod services;

pub use services::InvoiceService;

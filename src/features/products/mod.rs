//! Product catalog: list, create, edit and delete products, change prices
//! in place and attach an image either by URL or by upload.

pub mod dtos;
pub mod handlers;
pub mod routes;
pub mod services;

pub use services::ProductService;

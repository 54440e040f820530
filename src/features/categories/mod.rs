//! Category management: list, create, rename and delete the labels products
//! are grouped under.

pub mod dtos;
pub mod handlers;
pub mod routes;
pub mod services;

pub use services::CategoryService;

mod cart_store;
mod sale_service;

pub use cart_store::CartStore;
pub use sale_service::SaleService;

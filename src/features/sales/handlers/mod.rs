mod sale_handler;

pub use sale_handler::*;

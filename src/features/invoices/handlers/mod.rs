mod invoice_handler;

pub use invoice_handler::*;

mod invoice_service;
pub mod receipt;

pub use invoice_service::InvoiceService;

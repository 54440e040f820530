pub mod categories;
pub mod invoices;
pub mod products;
pub mod sales;

//! REST backend integration
//!
//! The shop's data (categories, products, invoices) is owned by an external
//! REST API. Features talk to it through the [`PosBackend`] trait; production
//! code uses [`PosApiClient`], tests swap in an in-memory implementation.

mod client;
mod models;

pub use client::PosApiClient;
pub use models::{
    Category, CategoryRef, Invoice, InvoiceItem, NewInvoice, NewInvoiceLine, Product,
    ProductPayload,
};

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::core::error::Result;

#[async_trait]
pub trait PosBackend: Send + Sync {
    async fn list_categories(&self) -> Result<Vec<Category>>;
    async fn create_category(&self, name: &str) -> Result<()>;
    async fn update_category(&self, id: i64, name: &str) -> Result<()>;
    async fn delete_category(&self, id: i64) -> Result<()>;

    async fn list_products(&self) -> Result<Vec<Product>>;
    async fn get_product(&self, id: i64) -> Result<Product>;
    async fn create_product(&self, payload: &ProductPayload) -> Result<()>;
    async fn update_product(&self, id: i64, payload: &ProductPayload) -> Result<()>;
    /// Partial update touching only the price
    async fn update_product_price(&self, id: i64, price: Decimal) -> Result<()>;
    async fn delete_product(&self, id: i64) -> Result<()>;

    /// Create an invoice; `None` when the backend answers without a body
    async fn create_invoice(&self, invoice: &NewInvoice) -> Result<Option<Invoice>>;
    async fn find_invoice_by_code(&self, code: &str) -> Result<Invoice>;
    async fn list_invoices_by_date(&self, date: NaiveDate) -> Result<Vec<Invoice>>;
}

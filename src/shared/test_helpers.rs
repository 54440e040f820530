use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::core::error::{AppError, Result};
use crate::modules::backend::{
    Category, CategoryRef, Invoice, NewInvoice, PosBackend, Product, ProductPayload,
};

#[derive(Default)]
struct State {
    categories: Vec<Category>,
    products: Vec<Product>,
    invoices: Vec<Invoice>,
    created_invoices: Vec<NewInvoice>,
    next_id: i64,
    failing: bool,
    invoice_delay: Option<Duration>,
}

/// In-memory stand-in for the REST backend
#[derive(Clone, Default)]
pub struct InMemoryBackend {
    state: Arc<Mutex<State>>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        let backend = Self::default();
        backend.state.lock().unwrap().next_id = 100;
        backend
    }

    pub fn into_dyn(self) -> Arc<dyn PosBackend> {
        Arc::new(self)
    }

    pub fn with_category(self, id: i64, name: &str) -> Self {
        self.state.lock().unwrap().categories.push(Category {
            id,
            name: name.to_string(),
        });
        self
    }

    pub fn with_product(self, id: i64, name: &str, category_id: i64, price: i64) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            let category = state
                .categories
                .iter()
                .find(|c| c.id == category_id)
                .map(|c| CategoryRef {
                    id: Some(c.id),
                    name: c.name.clone(),
                });
            state.products.push(Product {
                id,
                name: name.to_string(),
                category_id: Some(category_id),
                category,
                price: Decimal::from(price),
                image_url: Some(format!("https://img.example.com/{}.png", id)),
            });
        }
        self
    }

    pub fn with_invoice(self, invoice: Invoice) -> Self {
        self.state.lock().unwrap().invoices.push(invoice);
        self
    }

    /// Make every call fail as if the backend were down
    pub fn failing(self) -> Self {
        self.state.lock().unwrap().failing = true;
        self
    }

    /// Overwrite a stored price, bypassing form validation
    pub fn set_price(&self, id: i64, price: Decimal) {
        let mut state = self.state.lock().unwrap();
        if let Some(product) = state.products.iter_mut().find(|p| p.id == id) {
            product.price = price;
        }
    }

    /// Make invoice creation take a while, like a slow backend
    pub fn with_invoice_delay(self, delay: Duration) -> Self {
        self.state.lock().unwrap().invoice_delay = Some(delay);
        self
    }

    pub fn categories(&self) -> Vec<Category> {
        self.state.lock().unwrap().categories.clone()
    }

    pub fn products(&self) -> Vec<Product> {
        self.state.lock().unwrap().products.clone()
    }

    pub fn created_invoices(&self) -> Vec<NewInvoice> {
        self.state.lock().unwrap().created_invoices.clone()
    }

    fn check(&self) -> Result<()> {
        if self.state.lock().unwrap().failing {
            Err(AppError::ExternalServiceError(
                "in-memory backend is down".to_string(),
            ))
        } else {
            Ok(())
        }
    }

    fn not_found() -> AppError {
        AppError::NotFound("Không tìm thấy dữ liệu".to_string())
    }

    fn product_from_payload(state: &State, id: i64, payload: &ProductPayload) -> Product {
        let category = state
            .categories
            .iter()
            .find(|c| c.id == payload.category_id)
            .map(|c| CategoryRef {
                id: Some(c.id),
                name: c.name.clone(),
            });
        Product {
            id,
            name: payload.name.clone(),
            category_id: Some(payload.category_id),
            category,
            price: payload.price,
            image_url: Some(payload.image_url.clone()),
        }
    }
}

#[async_trait]
impl PosBackend for InMemoryBackend {
    async fn list_categories(&self) -> Result<Vec<Category>> {
        self.check()?;
        Ok(self.categories())
    }

    async fn create_category(&self, name: &str) -> Result<()> {
        self.check()?;
        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        let id = state.next_id;
        state.categories.push(Category {
            id,
            name: name.to_string(),
        });
        Ok(())
    }

    async fn update_category(&self, id: i64, name: &str) -> Result<()> {
        self.check()?;
        let mut state = self.state.lock().unwrap();
        let category = state
            .categories
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(Self::not_found)?;
        category.name = name.to_string();
        Ok(())
    }

    async fn delete_category(&self, id: i64) -> Result<()> {
        self.check()?;
        let mut state = self.state.lock().unwrap();
        let before = state.categories.len();
        state.categories.retain(|c| c.id != id);
        if state.categories.len() == before {
            return Err(Self::not_found());
        }
        Ok(())
    }

    async fn list_products(&self) -> Result<Vec<Product>> {
        self.check()?;
        Ok(self.products())
    }

    async fn get_product(&self, id: i64) -> Result<Product> {
        self.check()?;
        self.products()
            .into_iter()
            .find(|p| p.id == id)
            .ok_or_else(Self::not_found)
    }

    async fn create_product(&self, payload: &ProductPayload) -> Result<()> {
        self.check()?;
        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        let id = state.next_id;
        let product = Self::product_from_payload(&state, id, payload);
        state.products.push(product);
        Ok(())
    }

    async fn update_product(&self, id: i64, payload: &ProductPayload) -> Result<()> {
        self.check()?;
        let mut state = self.state.lock().unwrap();
        let updated = Self::product_from_payload(&state, id, payload);
        let product = state
            .products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(Self::not_found)?;
        *product = updated;
        Ok(())
    }

    async fn update_product_price(&self, id: i64, price: Decimal) -> Result<()> {
        self.check()?;
        let mut state = self.state.lock().unwrap();
        let product = state
            .products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(Self::not_found)?;
        product.price = price;
        Ok(())
    }

    async fn delete_product(&self, id: i64) -> Result<()> {
        self.check()?;
        let mut state = self.state.lock().unwrap();
        let before = state.products.len();
        state.products.retain(|p| p.id != id);
        if state.products.len() == before {
            return Err(Self::not_found());
        }
        Ok(())
    }

    async fn create_invoice(&self, invoice: &NewInvoice) -> Result<Option<Invoice>> {
        self.check()?;
        let delay = self.state.lock().unwrap().invoice_delay;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        let id = state.next_id;
        state.created_invoices.push(invoice.clone());

        let sale_date = NaiveDate::from_ymd_opt(2026, 10, 19)
            .and_then(|d| d.and_hms_opt(10, 30, 0))
            .unwrap();
        let mut created = Invoice::from_request(invoice, sale_date);
        created.id = Some(id);
        created.invoice_code = Some(format!("HD{:04}", id));
        // The echo carries no totals; callers compute them
        created.total_invoice = None;
        state.invoices.push(created.clone());
        Ok(Some(created))
    }

    async fn find_invoice_by_code(&self, code: &str) -> Result<Invoice> {
        self.check()?;
        self.state
            .lock()
            .unwrap()
            .invoices
            .iter()
            .find(|i| i.invoice_code.as_deref() == Some(code))
            .cloned()
            .ok_or_else(Self::not_found)
    }

    async fn list_invoices_by_date(&self, date: NaiveDate) -> Result<Vec<Invoice>> {
        self.check()?;
        Ok(self
            .state
            .lock()
            .unwrap()
            .invoices
            .iter()
            .filter(|i| i.sale_date.map(|d| d.date()) == Some(date))
            .cloned()
            .collect())
    }
}

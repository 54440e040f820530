use std::sync::Arc;
use std::time::Duration;

use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::sales::models::Cart;
use crate::features::sales::services::CartStore;
use crate::modules::backend::{Invoice, PosBackend, Product};

const MAX_CUSTOMER_NAME_LENGTH: usize = 200;

fn cart_not_found() -> AppError {
    AppError::NotFound("Giỏ hàng không tồn tại hoặc đã hết hạn".to_string())
}

/// Fill what the backend left out of its response with the locally built invoice
fn merge_created(created: Option<Invoice>, local: Invoice) -> Invoice {
    let Some(mut invoice) = created else {
        return local;
    };
    if invoice.customer_name.is_empty() {
        invoice.customer_name = local.customer_name;
    }
    if invoice.sale_date.is_none() {
        invoice.sale_date = local.sale_date;
    }
    if invoice.items.is_empty() {
        invoice.items = local.items;
    }
    if invoice.total_invoice.is_none() {
        invoice.total_invoice = local.total_invoice;
    }
    invoice
}

/// Service for the sales counter: carts and checkout
pub struct SaleService {
    backend: Arc<dyn PosBackend>,
    carts: Arc<CartStore>,
}

impl SaleService {
    pub fn new(backend: Arc<dyn PosBackend>, cart_ttl: Duration) -> Self {
        Self {
            backend,
            carts: Arc::new(CartStore::new(cart_ttl)),
        }
    }

    /// Shared handle on the cart store, for the expiry sweeper
    pub fn cart_store(&self) -> Arc<CartStore> {
        Arc::clone(&self.carts)
    }

    pub async fn open_cart(&self) -> Uuid {
        let id = self.carts.create().await;
        tracing::debug!("Opened cart {}", id);
        id
    }

    pub async fn get_cart(&self, cart_id: Uuid) -> Result<Cart> {
        self.carts.get(cart_id).await.ok_or_else(cart_not_found)
    }

    /// Products offered on the sales screen
    pub async fn list_products(&self) -> Result<Vec<Product>> {
        self.backend.list_products().await.map_err(|e| {
            tracing::error!("Failed to list products: {}", e);
            e
        })
    }

    /// Add a product at its current backend price
    pub async fn add_item(&self, cart_id: Uuid, product_id: i64, quantity: u32) -> Result<()> {
        // Fail fast on an expired cart before calling the backend
        self.get_cart(cart_id).await?;

        let product = self.backend.get_product(product_id).await.map_err(|e| {
            if e.is_not_found() {
                AppError::NotFound("Không tìm thấy sản phẩm".to_string())
            } else {
                e
            }
        })?;

        self.carts
            .update(cart_id, |cart| cart.add(&product, quantity))
            .await
            .ok_or_else(cart_not_found)?
    }

    pub async fn set_quantity(&self, cart_id: Uuid, product_id: i64, quantity: u32) -> Result<()> {
        let found = self
            .carts
            .update(cart_id, |cart| cart.set_quantity(product_id, quantity))
            .await
            .ok_or_else(cart_not_found)??;
        if !found {
            return Err(AppError::NotFound(
                "Sản phẩm không có trong giỏ hàng".to_string(),
            ));
        }
        Ok(())
    }

    pub async fn remove_item(&self, cart_id: Uuid, product_id: i64) -> Result<()> {
        self.carts
            .update(cart_id, |cart| {
                cart.remove(product_id);
            })
            .await
            .ok_or_else(cart_not_found)
    }

    pub async fn set_customer(&self, cart_id: Uuid, name: &str) -> Result<()> {
        let name = name.trim();
        if name.chars().count() > MAX_CUSTOMER_NAME_LENGTH {
            return Err(AppError::Validation(
                "Tên khách hàng không được vượt quá 200 ký tự".to_string(),
            ));
        }
        self.carts
            .update(cart_id, |cart| cart.customer_name = name.to_string())
            .await
            .ok_or_else(cart_not_found)
    }

    /// Turn the cart into an invoice.
    ///
    /// The cart leaves the store for the duration of the call, so a second
    /// submit of the same cart finds nothing to check out. It is put back
    /// when the invoice could not be created.
    pub async fn checkout(&self, cart_id: Uuid) -> Result<Invoice> {
        let cart = self.carts.take(cart_id).await.ok_or_else(cart_not_found)?;

        match self.create_invoice(&cart).await {
            Ok(invoice) => {
                tracing::info!(
                    "Invoice {} created for '{}' ({} lines)",
                    invoice.display_code(),
                    invoice.customer_name,
                    invoice.items.len()
                );
                Ok(invoice)
            }
            Err(e) => {
                self.carts.restore(cart).await;
                Err(e)
            }
        }
    }

    async fn create_invoice(&self, cart: &Cart) -> Result<Invoice> {
        if cart.customer_name.trim().is_empty() {
            return Err(AppError::Validation(
                "Vui lòng nhập tên khách hàng".to_string(),
            ));
        }
        if cart.is_empty() {
            return Err(AppError::Validation(
                "Giỏ hàng đang trống. Vui lòng thêm sản phẩm".to_string(),
            ));
        }
        cart.total()?;

        let request = cart.to_invoice_request();
        let created = self.backend.create_invoice(&request).await.map_err(|e| {
            tracing::error!("Failed to create invoice for cart {}: {}", cart.id, e);
            e
        })?;

        let local = Invoice::from_request(&request, chrono::Local::now().naive_local());
        Ok(merge_created(created, local))
    }
}

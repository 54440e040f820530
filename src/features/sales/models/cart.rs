use rust_decimal::Decimal;
use std::time::Instant;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::modules::backend::{NewInvoice, NewInvoiceLine, Product};
use crate::shared::constants::MAX_QUANTITY;

fn amount_too_large() -> AppError {
    AppError::Validation("Tổng tiền vượt quá giới hạn cho phép".to_string())
}

/// One product in the cart
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
    pub product_id: i64,
    pub name: String,
    pub price: Decimal,
    pub quantity: u32,
    pub image_url: Option<String>,
}

impl CartLine {
    pub fn line_total(&self) -> Result<Decimal> {
        self.price
            .checked_mul(Decimal::from(self.quantity))
            .ok_or_else(amount_too_large)
    }
}

/// Sale in progress, kept until checkout or expiry
#[derive(Debug, Clone)]
pub struct Cart {
    pub id: Uuid,
    pub customer_name: String,
    pub lines: Vec<CartLine>,
    pub touched_at: Instant,
}

impl Cart {
    pub fn new() -> Self {
        Self {
            id: Uuid::now_v7(),
            customer_name: String::new(),
            lines: Vec::new(),
            touched_at: Instant::now(),
        }
    }

    /// Replace the lines unless their total no longer fits a `Decimal`
    fn commit(&mut self, lines: Vec<CartLine>) -> Result<()> {
        let previous = std::mem::replace(&mut self.lines, lines);
        if let Err(e) = self.total() {
            self.lines = previous;
            return Err(e);
        }
        Ok(())
    }

    /// Add a product; a product already in the cart gets its quantity raised
    pub fn add(&mut self, product: &Product, quantity: u32) -> Result<()> {
        let mut lines = self.lines.clone();
        match lines.iter_mut().find(|l| l.product_id == product.id) {
            Some(line) => {
                line.quantity = line.quantity.saturating_add(quantity).min(MAX_QUANTITY);
            }
            None => lines.push(CartLine {
                product_id: product.id,
                name: product.name.clone(),
                price: product.price,
                quantity: quantity.min(MAX_QUANTITY),
                image_url: product.image_url.clone(),
            }),
        }
        self.commit(lines)
    }

    /// Returns false when the product is not in the cart
    pub fn set_quantity(&mut self, product_id: i64, quantity: u32) -> Result<bool> {
        let mut lines = self.lines.clone();
        let Some(line) = lines.iter_mut().find(|l| l.product_id == product_id) else {
            return Ok(false);
        };
        line.quantity = quantity.min(MAX_QUANTITY);
        self.commit(lines)?;
        Ok(true)
    }

    pub fn remove(&mut self, product_id: i64) -> bool {
        let before = self.lines.len();
        self.lines.retain(|l| l.product_id != product_id);
        self.lines.len() != before
    }

    pub fn total(&self) -> Result<Decimal> {
        self.lines.iter().try_fold(Decimal::ZERO, |sum, line| {
            sum.checked_add(line.line_total()?)
                .ok_or_else(amount_too_large)
        })
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Body of the create-invoice call
    pub fn to_invoice_request(&self) -> NewInvoice {
        NewInvoice {
            customer_name: self.customer_name.trim().to_string(),
            products: self
                .lines
                .iter()
                .map(|line| NewInvoiceLine {
                    id: line.product_id,
                    name: line.name.clone(),
                    price: line.price,
                    quantity: line.quantity,
                })
                .collect(),
        }
    }
}

impl Default for Cart {
    fn default() -> Self {
        Self::new()
    }
}

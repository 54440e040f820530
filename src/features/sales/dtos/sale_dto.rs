use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::error::{AppError, Result};
use crate::features::sales::models::{Cart, CartLine};
use crate::modules::backend::Product;
use crate::shared::constants::{DEFAULT_QUANTITY, MAX_QUANTITY};
use crate::shared::money::{format_currency, format_vnd};
use crate::shared::types::Nav;

/// Path segment addressing a sale whose cart is created on first use
pub const NEW_SALE: &str = "new";

/// Quantity typed by the cashier; below 1 or unparsable counts as 1
pub fn parse_quantity(raw: Option<&str>) -> u32 {
    match raw.map(str::trim).and_then(|q| q.parse::<i64>().ok()) {
        Some(q) if q >= 1 => q.min(i64::from(MAX_QUANTITY)) as u32,
        _ => DEFAULT_QUANTITY,
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddItemDto {
    pub product_id: i64,
    #[serde(default)]
    pub quantity: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct QuantityDto {
    #[serde(default)]
    pub quantity: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDto {
    #[serde(default)]
    pub customer_name: String,
}

/// Checkout may carry the customer name from the same form
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutDto {
    #[serde(default)]
    pub customer_name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SaleProductView {
    pub id: i64,
    pub name: String,
    pub price: String,
    pub image_url: Option<String>,
}

impl From<Product> for SaleProductView {
    fn from(p: Product) -> Self {
        Self {
            id: p.id,
            name: p.name,
            price: format_currency(p.price),
            image_url: p.image_url.filter(|url| !url.is_empty()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CartLineView {
    pub product_id: i64,
    pub name: String,
    pub price: String,
    pub quantity: u32,
    pub line_total: String,
}

impl TryFrom<&CartLine> for CartLineView {
    type Error = AppError;

    fn try_from(line: &CartLine) -> Result<Self> {
        Ok(Self {
            product_id: line.product_id,
            name: line.name.clone(),
            price: format_currency(line.price),
            quantity: line.quantity,
            line_total: format_currency(line.line_total()?),
        })
    }
}

/// Context of `sales/index.html`
#[derive(Debug, Serialize)]
pub struct SalesPage {
    pub nav: Nav,
    /// Path segment after `/sales/`: the cart id, or `new` before a cart exists
    pub cart_ref: String,
    pub customer_name: String,
    pub products: Vec<SaleProductView>,
    pub lines: Vec<CartLineView>,
    pub total: String,
    pub error: Option<String>,
}

impl SalesPage {
    pub fn new(cart: &Cart, products: Vec<Product>, error: Option<String>) -> Result<Self> {
        Ok(Self {
            nav: Nav::Sales,
            cart_ref: cart.id.to_string(),
            customer_name: cart.customer_name.clone(),
            products: products.into_iter().map(Into::into).collect(),
            lines: cart
                .lines
                .iter()
                .map(CartLineView::try_from)
                .collect::<Result<_>>()?,
            total: format_vnd(cart.total()?),
            error,
        })
    }

    /// Sale that has no cart yet
    pub fn new_sale(products: Vec<Product>, error: Option<String>) -> Self {
        Self {
            nav: Nav::Sales,
            cart_ref: NEW_SALE.to_string(),
            customer_name: String::new(),
            products: products.into_iter().map(Into::into).collect(),
            lines: Vec::new(),
            total: format_vnd(Decimal::ZERO),
            error,
        }
    }
}

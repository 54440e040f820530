use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use crate::shared::dates::deserialize_optional_datetime;

/// Treat an explicit JSON `null` the same as a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// =============================================================================
// CATEGORIES
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
}

/// Body of `POST /Category` and `PUT /Category/{id}`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
}

// =============================================================================
// PRODUCTS
// =============================================================================

/// Category embedded in a product response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRef {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub category_id: Option<i64>,
    #[serde(default)]
    pub category: Option<CategoryRef>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub price: Decimal,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Body of `POST /Product` and `PUT /Product/{id}`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    pub category_id: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub image_url: String,
}

/// Body of `PATCH /Product/{id}`
#[derive(Debug, Clone, Serialize)]
pub struct PriceUpdate {
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
}

// =============================================================================
// INVOICES
// =============================================================================

/// Line of `POST /Invoice`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewInvoiceLine {
    pub id: i64,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub quantity: u32,
}

/// Body of `POST /Invoice`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewInvoice {
    pub customer_name: String,
    pub products: Vec<NewInvoiceLine>,
}

impl NewInvoice {
    pub fn total(&self) -> Decimal {
        self.products.iter().fold(Decimal::ZERO, |sum, line| {
            sum.saturating_add(line.price.saturating_mul(Decimal::from(line.quantity)))
        })
    }
}

/// Invoice line as returned by the backend.
///
/// The create endpoint echoes the request shape (`id`, `name`, `price`) while
/// lookups use `productId`, `productName`, `salePrice`; both are accepted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceItem {
    #[serde(default, alias = "id")]
    pub product_id: Option<i64>,
    #[serde(default, alias = "name")]
    pub product_name: Option<String>,
    #[serde(default, alias = "price")]
    pub sale_price: Option<Decimal>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub quantity: u32,
}

impl InvoiceItem {
    pub fn unit_price(&self) -> Decimal {
        self.sale_price.unwrap_or(Decimal::ZERO)
    }

    /// Saturates instead of overflowing on absurd backend amounts
    pub fn line_total(&self) -> Decimal {
        self.unit_price().saturating_mul(Decimal::from(self.quantity))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default, alias = "code")]
    pub invoice_code: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub customer_name: String,
    #[serde(default, deserialize_with = "deserialize_optional_datetime")]
    pub sale_date: Option<NaiveDateTime>,
    #[serde(default, alias = "products", deserialize_with = "null_as_default")]
    pub items: Vec<InvoiceItem>,
    #[serde(default)]
    pub total_invoice: Option<Decimal>,
    #[serde(default)]
    pub debt_amount: Option<Decimal>,
    #[serde(default, deserialize_with = "deserialize_optional_datetime")]
    pub debt_date: Option<NaiveDateTime>,
    #[serde(default)]
    pub total_amount: Option<Decimal>,
}

impl Invoice {
    /// Sum of line totals
    pub fn items_total(&self) -> Decimal {
        self.items
            .iter()
            .fold(Decimal::ZERO, |sum, item| sum.saturating_add(item.line_total()))
    }

    /// Invoice total as reported by the backend, or computed from the lines
    pub fn total(&self) -> Decimal {
        self.total_invoice.unwrap_or_else(|| self.items_total())
    }

    pub fn debt(&self) -> Decimal {
        self.debt_amount.unwrap_or(Decimal::ZERO)
    }

    /// What the customer owes overall: the invoice plus any carried debt
    pub fn amount_due(&self) -> Decimal {
        self.total_amount
            .unwrap_or_else(|| self.total().saturating_add(self.debt()))
    }

    /// Human-facing identifier: the invoice code, falling back to the numeric id
    pub fn display_code(&self) -> String {
        match (&self.invoice_code, self.id) {
            (Some(code), _) if !code.is_empty() => code.clone(),
            (_, Some(id)) => id.to_string(),
            _ => "-".to_string(),
        }
    }

    /// Build the local view of an invoice the backend accepted without echoing it
    pub fn from_request(request: &NewInvoice, sale_date: NaiveDateTime) -> Self {
        Self {
            customer_name: request.customer_name.clone(),
            sale_date: Some(sale_date),
            items: request
                .products
                .iter()
                .map(|line| InvoiceItem {
                    product_id: Some(line.id),
                    product_name: Some(line.name.clone()),
                    sale_price: Some(line.price),
                    quantity: line.quantity,
                })
                .collect(),
            total_invoice: Some(request.total()),
            ..Default::default()
        }
    }
}

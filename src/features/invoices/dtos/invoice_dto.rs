use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::modules::backend::{Invoice, InvoiceItem};
use crate::shared::dates::{format_date, format_optional_datetime};
use crate::shared::money::{format_currency, format_optional_currency, format_vnd};
use crate::shared::types::Nav;
use crate::shared::validation::validate_invoice_code;

/// Query of `/invoices/search`: either a code or a `YYYY-MM-DD` date
#[derive(Debug, Default, Deserialize)]
pub struct SearchInvoiceQuery {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
}

impl SearchInvoiceQuery {
    pub fn date(&self) -> Option<&str> {
        self.date.as_deref().map(str::trim).filter(|d| !d.is_empty())
    }

    pub fn code(&self) -> &str {
        self.code.as_deref().map(str::trim).unwrap_or_default()
    }
}

/// Invoice code typed into the search box
#[derive(Debug, Validate)]
pub struct InvoiceCodeDto {
    #[validate(
        length(max = 50, message = "Mã hóa đơn quá dài"),
        custom(function = "validate_invoice_code")
    )]
    pub code: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct InvoiceLineView {
    pub name: String,
    pub quantity: u32,
    pub price: String,
    pub line_total: String,
}

impl From<&InvoiceItem> for InvoiceLineView {
    fn from(item: &InvoiceItem) -> Self {
        Self {
            name: item
                .product_name
                .clone()
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| "-".to_string()),
            quantity: item.quantity,
            price: format_optional_currency(item.sale_price),
            line_total: format_currency(item.line_total()),
        }
    }
}

/// Invoice with every amount and date already formatted
#[derive(Debug, Clone, Serialize)]
pub struct InvoiceView {
    pub code: String,
    pub customer_name: String,
    pub sale_date: String,
    pub items: Vec<InvoiceLineView>,
    pub total: String,
    /// Only set when the customer carries a debt
    pub debt: Option<String>,
    pub debt_date: Option<String>,
    pub amount_due: String,
    pub print_url: Option<String>,
    pub receipt_url: Option<String>,
}

impl From<&Invoice> for InvoiceView {
    fn from(invoice: &Invoice) -> Self {
        let has_debt = invoice.debt() > Decimal::ZERO;
        let encoded = invoice
            .invoice_code
            .as_deref()
            .filter(|c| !c.is_empty())
            .map(|c| urlencoding::encode(c).into_owned());

        Self {
            code: invoice.display_code(),
            customer_name: invoice.customer_name.clone(),
            sale_date: format_optional_datetime(invoice.sale_date.as_ref()),
            items: invoice.items.iter().map(Into::into).collect(),
            total: format_vnd(invoice.total()),
            debt: has_debt.then(|| format_vnd(invoice.debt())),
            debt_date: invoice
                .debt_date
                .as_ref()
                .filter(|_| has_debt)
                .map(format_date),
            amount_due: format_vnd(invoice.amount_due()),
            print_url: encoded.as_ref().map(|c| format!("/invoices/{}/print", c)),
            receipt_url: encoded.map(|c| format!("/invoices/{}/receipt.txt", c)),
        }
    }
}

/// Context of `invoices/search.html`
#[derive(Debug, Serialize)]
pub struct InvoiceSearchPage {
    pub nav: Nav,
    pub code: String,
    pub date: String,
    pub invoice: Option<InvoiceView>,
    /// Result of a date search; `None` when no date search ran
    pub invoices: Option<Vec<InvoiceView>>,
    pub error: Option<String>,
}

impl InvoiceSearchPage {
    pub fn new(query: &SearchInvoiceQuery) -> Self {
        Self {
            nav: Nav::Invoices,
            code: query.code().to_string(),
            date: query.date().unwrap_or_default().to_string(),
            invoice: None,
            invoices: None,
            error: None,
        }
    }
}

/// Context of the standalone `invoices/print.html`
#[derive(Debug, Serialize)]
pub struct InvoicePrintPage {
    pub invoice: InvoiceView,
    pub back_url: String,
}

impl InvoicePrintPage {
    pub fn new(invoice: &Invoice, back_url: &str) -> Self {
        Self {
            invoice: invoice.into(),
            back_url: back_url.to_string(),
        }
    }
}

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

use crate::core::error::Result;
use crate::features::invoices::dtos::{
    InvoicePrintPage, InvoiceSearchPage, InvoiceView, SearchInvoiceQuery,
};
use crate::features::invoices::services::InvoiceService;
use crate::shared::views;

const INVOICES_PATH: &str = "/invoices";

/// Empty search form
pub async fn search_form() -> Result<Response> {
    let page = InvoiceSearchPage::new(&SearchInvoiceQuery::default());
    Ok(views::render("invoices/search.html", &page)?.into_response())
}

/// Search by code, or list a day's invoices when a date is given
pub async fn search_invoices(
    State(service): State<Arc<InvoiceService>>,
    Query(query): Query<SearchInvoiceQuery>,
) -> Result<Response> {
    let mut page = InvoiceSearchPage::new(&query);
    let mut status = StatusCode::OK;

    if let Some(date) = query.date() {
        match service.list_by_date(date).await {
            Ok(invoices) => page.invoices = Some(invoices.iter().map(InvoiceView::from).collect()),
            Err(e) => {
                status = e.status();
                page.error = Some(e.banner_or("Không tìm thấy hóa đơn hoặc có lỗi xảy ra"));
            }
        }
    } else {
        match service.find_by_code(query.code()).await {
            Ok(invoice) => page.invoice = Some(InvoiceView::from(&invoice)),
            Err(e) => {
                status = e.status();
                page.error = Some(e.banner_or("Không tìm thấy hóa đơn hoặc có lỗi xảy ra"));
            }
        }
    }

    views::render_with_status(status, "invoices/search.html", &page)
}

/// Printable invoice page
pub async fn print_invoice(
    State(service): State<Arc<InvoiceService>>,
    Path(code): Path<String>,
) -> Result<Response> {
    let invoice = service.find_by_code(&code).await?;
    let page = InvoicePrintPage::new(&invoice, INVOICES_PATH);
    Ok(views::render("invoices/print.html", &page)?.into_response())
}

/// Plain-text receipt for thermal printers
pub async fn download_receipt(
    State(service): State<Arc<InvoiceService>>,
    Path(code): Path<String>,
) -> Result<Response> {
    let receipt = service.receipt(&code).await?;
    Ok((
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        receipt,
    )
        .into_response())
}

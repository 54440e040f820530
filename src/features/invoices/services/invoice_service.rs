use std::sync::Arc;

use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::features::invoices::dtos::InvoiceCodeDto;
use crate::features::invoices::services::receipt::render_receipt;
use crate::modules::backend::{Invoice, PosBackend};
use crate::shared::dates::parse_search_date;
use crate::shared::validation::first_error_message;

/// Service for invoice lookup and printing
pub struct InvoiceService {
    backend: Arc<dyn PosBackend>,
    shop_name: String,
}

impl InvoiceService {
    pub fn new(backend: Arc<dyn PosBackend>, shop_name: &str) -> Self {
        Self {
            backend,
            shop_name: shop_name.to_string(),
        }
    }

    /// Look up an invoice by the code printed on it
    pub async fn find_by_code(&self, code: &str) -> Result<Invoice> {
        let code = code.trim();
        if code.is_empty() {
            return Err(AppError::Validation(
                "Vui lòng nhập mã hóa đơn để tìm kiếm".to_string(),
            ));
        }

        let dto = InvoiceCodeDto {
            code: code.to_string(),
        };
        dto.validate()
            .map_err(|e| AppError::Validation(first_error_message(&e)))?;

        self.backend
            .find_invoice_by_code(&dto.code)
            .await
            .map_err(|e| {
                if e.is_not_found() {
                    AppError::NotFound("Không tìm thấy hóa đơn".to_string())
                } else {
                    tracing::error!("Invoice lookup for '{}' failed: {}", dto.code, e);
                    e
                }
            })
    }

    /// Invoices sold on a `YYYY-MM-DD` day
    pub async fn list_by_date(&self, date: &str) -> Result<Vec<Invoice>> {
        let date = parse_search_date(date)
            .ok_or_else(|| AppError::Validation("Ngày tìm kiếm không hợp lệ".to_string()))?;

        self.backend.list_invoices_by_date(date).await.map_err(|e| {
            tracing::error!("Invoice lookup for {} failed: {}", date, e);
            e
        })
    }

    /// Fixed-width text receipt of an invoice
    pub async fn receipt(&self, code: &str) -> Result<String> {
        let invoice = self.find_by_code(code).await?;
        Ok(render_receipt(&invoice, &self.shop_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::backend::NewInvoice;
    use crate::shared::test_helpers::InMemoryBackend;

    async fn backend_with_invoice() -> InMemoryBackend {
        let backend = InMemoryBackend::new();
        backend
            .create_invoice(&NewInvoice {
                customer_name: "Anh Minh".to_string(),
                products: Vec::new(),
            })
            .await
            .unwrap();
        backend
    }

    #[tokio::test]
    async fn test_find_by_code() {
        let backend = backend_with_invoice().await;
        let service = InvoiceService::new(backend.into_dyn(), "Tạp hóa");

        let invoice = service.find_by_code(" HD0101 ").await.unwrap();
        assert_eq!(invoice.customer_name, "Anh Minh");
    }

    #[tokio::test]
    async fn test_find_by_code_messages() {
        let service = InvoiceService::new(InMemoryBackend::new().into_dyn(), "Tạp hóa");

        let err = service.find_by_code("  ").await.unwrap_err();
        assert_eq!(err.user_message(), "Vui lòng nhập mã hóa đơn để tìm kiếm");

        let err = service.find_by_code("HD\t01").await.unwrap_err();
        assert_eq!(err.user_message(), "Mã hóa đơn không hợp lệ");

        let err = service.find_by_code("HD9999").await.unwrap_err();
        assert_eq!(err.user_message(), "Không tìm thấy hóa đơn");
    }

    #[tokio::test]
    async fn test_find_by_code_with_space_and_slash() {
        let coded = |code: &str| Invoice {
            invoice_code: Some(code.to_string()),
            ..Default::default()
        };
        let backend = InMemoryBackend::new()
            .with_invoice(coded("HD 01"))
            .with_invoice(coded("HD/02"));
        let service = InvoiceService::new(backend.into_dyn(), "Tạp hóa");

        assert!(service.find_by_code("HD 01").await.is_ok());
        assert!(service.find_by_code("HD/02").await.is_ok());
    }

    #[tokio::test]
    async fn test_backend_failure_is_not_reported_as_missing() {
        let service = InvoiceService::new(InMemoryBackend::new().failing().into_dyn(), "Tạp hóa");
        let err = service.find_by_code("HD0001").await.unwrap_err();
        assert!(matches!(err, AppError::ExternalServiceError(_)));
    }

    #[tokio::test]
    async fn test_list_by_date() {
        let backend = backend_with_invoice().await;
        let service = InvoiceService::new(backend.into_dyn(), "Tạp hóa");

        assert_eq!(service.list_by_date("2026-10-19").await.unwrap().len(), 1);
        assert!(service.list_by_date("2026-10-20").await.unwrap().is_empty());
        assert!(matches!(
            service.list_by_date("19/10/2026").await,
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_receipt() {
        let backend = backend_with_invoice().await;
        let service = InvoiceService::new(backend.into_dyn(), "Tạp hóa Bình Minh");

        let receipt = service.receipt("HD0101").await.unwrap();
        assert!(receipt.contains("Tạp hóa Bình Minh"));
        assert!(receipt.contains("Anh Minh"));
    }
}

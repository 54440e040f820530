use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Method, Response, StatusCode};
use rust_decimal::Decimal;
use serde::{de::DeserializeOwned, Serialize};

use crate::core::config::BackendConfig;
use crate::core::error::{AppError, Result};

use super::models::{
    Category, CategoryPayload, Invoice, NewInvoice, PriceUpdate, Product, ProductPayload,
};
use super::PosBackend;

/// HTTP client for the shop's REST backend
pub struct PosApiClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl PosApiClient {
    pub fn new(config: &BackendConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(concat!("shop-pos/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<Response> {
        let url = self.url(path);
        tracing::debug!("Backend request: {} {}", method, url);

        let mut request = self.http_client.request(method.clone(), &url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            tracing::error!("Backend request {} {} failed: {}", method, url, e);
            AppError::ExternalServiceError(format!("{} {} failed: {}", method, path, e))
        })?;

        Self::check_status(method, path, response).await
    }

    /// Map non-2xx responses onto the error variants pages know how to show
    async fn check_status(method: Method, path: &str, response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        tracing::warn!("Backend {} {} returned HTTP {} - {}", method, path, status, body);

        Err(match status {
            StatusCode::NOT_FOUND => AppError::NotFound("Không tìm thấy dữ liệu".to_string()),
            StatusCode::CONFLICT => AppError::Conflict(
                "Dữ liệu bị trùng hoặc đang được sử dụng".to_string(),
            ),
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                AppError::BadRequest("Máy chủ từ chối dữ liệu gửi lên".to_string())
            }
            _ => AppError::ExternalServiceError(format!(
                "{} {} returned HTTP {} - {}",
                method, path, status, body
            )),
        })
    }

    async fn decode<T: DeserializeOwned>(path: &str, response: Response) -> Result<T> {
        response.json::<T>().await.map_err(|e| {
            tracing::error!("Failed to parse backend response for {}: {}", path, e);
            AppError::ExternalServiceError(format!("Failed to parse response for {}: {}", path, e))
        })
    }

    /// Decode a body that the backend may leave empty
    async fn decode_optional<T: DeserializeOwned>(path: &str, response: Response) -> Result<Option<T>> {
        let bytes = response.bytes().await.map_err(|e| {
            AppError::ExternalServiceError(format!("Failed to read response for {}: {}", path, e))
        })?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        serde_json::from_slice(&bytes).map(Some).map_err(|e| {
            tracing::error!("Failed to parse backend response for {}: {}", path, e);
            AppError::ExternalServiceError(format!("Failed to parse response for {}: {}", path, e))
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.send::<()>(Method::GET, path, None).await?;
        Self::decode(path, response).await
    }

    async fn send_json<B: Serialize + ?Sized>(&self, method: Method, path: &str, body: &B) -> Result<()> {
        self.send(method, path, Some(body)).await?;
        Ok(())
    }

    async fn delete(&self, path: &str) -> Result<()> {
        self.send::<()>(Method::DELETE, path, None).await?;
        Ok(())
    }
}

#[async_trait]
impl PosBackend for PosApiClient {
    async fn list_categories(&self) -> Result<Vec<Category>> {
        self.get_json("/Category").await
    }

    async fn create_category(&self, name: &str) -> Result<()> {
        let payload = CategoryPayload {
            id: None,
            name: name.to_string(),
        };
        self.send_json(Method::POST, "/Category", &payload).await?;
        tracing::info!("Category created: {}", name);
        Ok(())
    }

    async fn update_category(&self, id: i64, name: &str) -> Result<()> {
        let payload = CategoryPayload {
            id: Some(id),
            name: name.to_string(),
        };
        self.send_json(Method::PUT, &format!("/Category/{}", id), &payload)
            .await?;
        tracing::info!("Category updated: id={}", id);
        Ok(())
    }

    async fn delete_category(&self, id: i64) -> Result<()> {
        self.delete(&format!("/Category/{}", id)).await?;
        tracing::info!("Category deleted: id={}", id);
        Ok(())
    }

    async fn list_products(&self) -> Result<Vec<Product>> {
        self.get_json("/Product").await
    }

    async fn get_product(&self, id: i64) -> Result<Product> {
        self.get_json(&format!("/Product/{}", id)).await
    }

    async fn create_product(&self, payload: &ProductPayload) -> Result<()> {
        self.send_json(Method::POST, "/Product", payload).await?;
        tracing::info!("Product created: {}", payload.name);
        Ok(())
    }

    async fn update_product(&self, id: i64, payload: &ProductPayload) -> Result<()> {
        self.send_json(Method::PUT, &format!("/Product/{}", id), payload)
            .await?;
        tracing::info!("Product updated: id={}", id);
        Ok(())
    }

    async fn update_product_price(&self, id: i64, price: Decimal) -> Result<()> {
        self.send_json(Method::PATCH, &format!("/Product/{}", id), &PriceUpdate { price })
            .await?;
        tracing::info!("Product price updated: id={}, price={}", id, price);
        Ok(())
    }

    async fn delete_product(&self, id: i64) -> Result<()> {
        self.delete(&format!("/Product/{}", id)).await?;
        tracing::info!("Product deleted: id={}", id);
        Ok(())
    }

    async fn create_invoice(&self, invoice: &NewInvoice) -> Result<Option<Invoice>> {
        let response = self.send(Method::POST, "/Invoice", Some(invoice)).await?;
        let created = Self::decode_optional("/Invoice", response).await?;
        tracing::info!(
            "Invoice created for {} with {} line(s)",
            invoice.customer_name,
            invoice.products.len()
        );
        Ok(created)
    }

    async fn find_invoice_by_code(&self, code: &str) -> Result<Invoice> {
        self.get_json(&format!("/Invoices/by-code/{}", urlencoding::encode(code)))
            .await
    }

    async fn list_invoices_by_date(&self, date: NaiveDate) -> Result<Vec<Invoice>> {
        self.get_json(&format!("/Invoices/by-date/{}", date.format("%Y-%m-%d")))
            .await
    }
}

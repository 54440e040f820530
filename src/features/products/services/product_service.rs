use std::sync::Arc;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use validator::Validate;

use crate::core::config::ShopConfig;
use crate::core::error::{AppError, Result};
use crate::features::products::dtos::{ProductFormDto, UploadedImage};
use crate::modules::backend::{Category, PosBackend, Product, ProductPayload};
use crate::shared::constants::{is_image_type_allowed, ALLOWED_IMAGE_MIME_TYPES};
use crate::shared::money::parse_price;
use crate::shared::validation::{first_error_message, IMAGE_URL_REGEX};

/// Service for product operations
pub struct ProductService {
    backend: Arc<dyn PosBackend>,
    placeholder_image_url: String,
    max_image_size: usize,
}

impl ProductService {
    pub fn new(backend: Arc<dyn PosBackend>, shop: &ShopConfig) -> Self {
        Self {
            backend,
            placeholder_image_url: shop.placeholder_image_url.clone(),
            max_image_size: shop.max_image_size,
        }
    }

    pub fn max_image_size(&self) -> usize {
        self.max_image_size
    }

    pub async fn list(&self) -> Result<Vec<Product>> {
        self.backend.list_products().await.map_err(|e| {
            tracing::error!("Failed to list products: {}", e);
            e
        })
    }

    /// Categories for the product form's select box
    pub async fn list_categories(&self) -> Result<Vec<Category>> {
        self.backend.list_categories().await.map_err(|e| {
            tracing::error!("Failed to list categories: {}", e);
            e
        })
    }

    pub async fn get(&self, id: i64) -> Result<Product> {
        self.backend.get_product(id).await.map_err(|e| {
            if e.is_not_found() {
                AppError::NotFound("Không tìm thấy sản phẩm".to_string())
            } else {
                e
            }
        })
    }

    /// Create or update a product from the submitted form
    pub async fn save(&self, form: &ProductFormDto) -> Result<()> {
        let mut payload = self.build_payload(form)?;

        match form.id {
            Some(id) => {
                if payload.image_url.is_empty() {
                    payload.image_url = self
                        .get(id)
                        .await?
                        .image_url
                        .filter(|url| !url.is_empty())
                        .unwrap_or_else(|| self.placeholder_image_url.clone());
                }
                payload.id = Some(id);
                tracing::debug!("Updating product {}", id);
                self.backend.update_product(id, &payload).await
            }
            None => {
                if payload.image_url.is_empty() {
                    payload.image_url = self.placeholder_image_url.clone();
                }
                tracing::debug!("Creating product '{}'", payload.name);
                self.backend.create_product(&payload).await
            }
        }
    }

    /// Validate the form and build the backend payload.
    ///
    /// `image_url` is left empty when neither an upload nor a URL was given;
    /// [`save`](Self::save) fills it from the stored product or the placeholder.
    pub fn build_payload(&self, form: &ProductFormDto) -> Result<ProductPayload> {
        form.validate()
            .map_err(|e| AppError::Validation(first_error_message(&e)))?;
        let name = form.name.trim();

        let category_id = form
            .category_id
            .trim()
            .parse::<i64>()
            .ok()
            .filter(|id| *id > 0)
            .ok_or_else(|| {
                AppError::Validation("Vui lòng chọn một danh mục hợp lệ".to_string())
            })?;

        let price = parse_price(&form.price)
            .ok_or_else(|| AppError::Validation("Vui lòng nhập giá hợp lệ".to_string()))?;

        let image_url = match form.image.as_ref().filter(|image| !image.data.is_empty()) {
            Some(image) => self.embed_image(image)?,
            None => {
                let url = form.image_url.trim();
                if !url.is_empty() && !IMAGE_URL_REGEX.is_match(url) {
                    return Err(AppError::Validation(
                        "Đường dẫn ảnh không hợp lệ".to_string(),
                    ));
                }
                url.to_string()
            }
        };

        Ok(ProductPayload {
            id: None,
            name: name.to_string(),
            category_id,
            price,
            image_url,
        })
    }

    /// Turn an upload into a `data:` URL stored alongside the product
    fn embed_image(&self, image: &UploadedImage) -> Result<String> {
        if !is_image_type_allowed(&image.content_type) {
            return Err(AppError::Validation(format!(
                "Định dạng ảnh '{}' không được hỗ trợ. Chỉ chấp nhận: {}",
                image.content_type,
                ALLOWED_IMAGE_MIME_TYPES.join(", ")
            )));
        }
        if image.data.len() > self.max_image_size {
            return Err(AppError::Validation(format!(
                "Ảnh vượt quá dung lượng cho phép (tối đa {} MB)",
                self.max_image_size / 1024 / 1024
            )));
        }

        tracing::debug!(
            "Embedding image '{}' ({} bytes)",
            image.file_name,
            image.data.len()
        );
        Ok(format!(
            "data:{};base64,{}",
            image.content_type,
            BASE64.encode(&image.data)
        ))
    }

    /// Change only the price of a product
    pub async fn update_price(&self, id: i64, raw_price: &str) -> Result<()> {
        let price = parse_price(raw_price)
            .ok_or_else(|| AppError::Validation("Vui lòng nhập giá hợp lệ".to_string()))?;
        self.backend.update_product_price(id, price).await
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        self.backend.delete_product(id).await
    }
}

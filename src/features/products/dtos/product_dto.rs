use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::extractor::empty_string_as_none;
use crate::modules::backend::{Category, Product};
use crate::shared::constants::NOT_AVAILABLE;
use crate::shared::money::{format_currency, format_price_input};
use crate::shared::types::{Nav, SelectOption};
use crate::shared::validation::{validate_not_blank, IMAGE_URL_REGEX};

/// Query params for the product page
#[derive(Debug, Default, Deserialize)]
pub struct ListProductsQuery {
    /// Prefill the form with this product for editing
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub edit: Option<i64>,
}

/// Image file received with the product form
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub content_type: String,
    pub file_name: String,
    pub data: Vec<u8>,
}

/// Product form as submitted (multipart/form-data).
///
/// Numeric fields stay raw so a bad value can be shown back to the user
/// instead of rejecting the whole request.
#[derive(Debug, Clone, Default, Validate)]
pub struct ProductFormDto {
    pub id: Option<i64>,
    #[validate(
        custom(function = "validate_not_blank", message = "Vui lòng nhập tên sản phẩm"),
        length(max = 200, message = "Tên sản phẩm không được vượt quá 200 ký tự")
    )]
    pub name: String,
    pub category_id: String,
    pub price: String,
    pub image_url: String,
    pub image: Option<UploadedImage>,
}

/// Body of the quick price update form
#[derive(Debug, Deserialize)]
pub struct PriceFormDto {
    #[serde(default)]
    pub price: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProductRowView {
    pub id: i64,
    pub name: String,
    pub category_name: String,
    pub price: String,
    pub raw_price: String,
    pub image_url: Option<String>,
}

impl From<Product> for ProductRowView {
    fn from(p: Product) -> Self {
        let category_name = p
            .category
            .map(|c| c.name)
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| NOT_AVAILABLE.to_string());

        Self {
            id: p.id,
            name: p.name,
            category_name,
            price: format_currency(p.price),
            raw_price: format_price_input(p.price),
            image_url: p.image_url.filter(|url| !url.is_empty()),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ProductFormView {
    pub id: Option<i64>,
    pub name: String,
    pub category_id: String,
    pub price: String,
    /// Editable URL; embedded images are not put back into the text field
    pub image_url: String,
    /// What the preview shows
    pub preview_url: Option<String>,
}

impl From<&Product> for ProductFormView {
    fn from(p: &Product) -> Self {
        let image = p.image_url.clone().filter(|url| !url.is_empty());
        Self {
            id: Some(p.id),
            name: p.name.clone(),
            category_id: p.category_id.map(|id| id.to_string()).unwrap_or_default(),
            price: format_price_input(p.price),
            image_url: image
                .as_deref()
                .filter(|url| IMAGE_URL_REGEX.is_match(url))
                .unwrap_or_default()
                .to_string(),
            preview_url: image,
        }
    }
}

impl From<&ProductFormDto> for ProductFormView {
    fn from(form: &ProductFormDto) -> Self {
        let image_url = form.image_url.trim().to_string();
        Self {
            id: form.id,
            name: form.name.clone(),
            category_id: form.category_id.clone(),
            price: form.price.clone(),
            preview_url: Some(image_url.clone()).filter(|url| IMAGE_URL_REGEX.is_match(url)),
            image_url,
        }
    }
}

/// Context of `products/index.html`
#[derive(Debug, Serialize)]
pub struct ProductsPage {
    pub nav: Nav,
    pub products: Vec<ProductRowView>,
    pub categories: Vec<SelectOption>,
    pub form: ProductFormView,
    pub error: Option<String>,
}

impl ProductsPage {
    /// The category select falls back to the first category when the form has none
    pub fn new(
        products: Vec<Product>,
        categories: Vec<Category>,
        mut form: ProductFormView,
        error: Option<String>,
    ) -> Self {
        if form.category_id.is_empty() {
            if let Some(first) = categories.first() {
                form.category_id = first.id.to_string();
            }
        }

        let categories = categories
            .into_iter()
            .map(|c| {
                let value = c.id.to_string();
                SelectOption {
                    selected: value == form.category_id,
                    value,
                    label: c.name,
                }
            })
            .collect();

        Self {
            nav: Nav::Products,
            products: products.into_iter().map(Into::into).collect(),
            categories,
            form,
            error,
        }
    }
}

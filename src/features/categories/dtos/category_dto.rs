use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::extractor::empty_string_as_none;
use crate::modules::backend::Category;
use crate::shared::types::Nav;
use crate::shared::validation::validate_not_blank;

/// Query params for the category page
#[derive(Debug, Default, Deserialize)]
pub struct ListCategoriesQuery {
    /// Prefill the form with this category for renaming
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub edit: Option<i64>,
}

/// Submitted category form; `id` present means rename
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CategoryFormDto {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub id: Option<i64>,

    #[serde(default)]
    #[validate(
        custom(function = "validate_not_blank", message = "Vui lòng nhập tên loại hàng hóa"),
        length(max = 200, message = "Tên loại hàng hóa không được vượt quá 200 ký tự")
    )]
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryRowView {
    pub id: i64,
    pub name: String,
}

impl From<Category> for CategoryRowView {
    fn from(c: Category) -> Self {
        Self {
            id: c.id,
            name: c.name,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CategoryFormView {
    pub id: Option<i64>,
    pub name: String,
}

impl From<&CategoryFormDto> for CategoryFormView {
    fn from(form: &CategoryFormDto) -> Self {
        Self {
            id: form.id,
            name: form.name.clone(),
        }
    }
}

/// Context of `categories/index.html`
#[derive(Debug, Serialize)]
pub struct CategoriesPage {
    pub nav: Nav,
    pub categories: Vec<CategoryRowView>,
    pub form: CategoryFormView,
    pub error: Option<String>,
}

impl CategoriesPage {
    pub fn new(categories: Vec<Category>, form: CategoryFormView, error: Option<String>) -> Self {
        Self {
            nav: Nav::Categories,
            categories: categories.into_iter().map(Into::into).collect(),
            form,
            error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_name_rejected() {
        let form = CategoryFormDto {
            id: None,
            name: "   ".to_string(),
        };
        let errors = form.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("name"));
    }

    #[test]
    fn test_valid_name_accepted() {
        let form = CategoryFormDto {
            id: Some(3),
            name: "Đồ uống".to_string(),
        };
        assert!(form.validate().is_ok());
    }
}

use std::sync::Arc;

use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::features::categories::dtos::CategoryFormDto;
use crate::modules::backend::{Category, PosBackend};
use crate::shared::validation::first_error_message;

/// Service for category operations
pub struct CategoryService {
    backend: Arc<dyn PosBackend>,
}

impl CategoryService {
    pub fn new(backend: Arc<dyn PosBackend>) -> Self {
        Self { backend }
    }

    /// List all categories in backend order
    pub async fn list(&self) -> Result<Vec<Category>> {
        self.backend.list_categories().await.map_err(|e| {
            tracing::error!("Failed to list categories: {}", e);
            e
        })
    }

    /// Find a category by id; the backend only exposes the full list
    pub async fn get(&self, id: i64) -> Result<Category> {
        self.list()
            .await?
            .into_iter()
            .find(|c| c.id == id)
            .ok_or_else(|| AppError::NotFound("Không tìm thấy loại hàng hóa".to_string()))
    }

    /// Create or rename a category depending on whether the form carries an id
    pub async fn save(&self, form: &CategoryFormDto) -> Result<()> {
        form.validate()
            .map_err(|e| AppError::Validation(first_error_message(&e)))?;

        let name = form.name.trim();
        match form.id {
            Some(id) => self.backend.update_category(id, name).await,
            None => self.backend.create_category(name).await,
        }
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        self.backend.delete_category(id).await
    }
}

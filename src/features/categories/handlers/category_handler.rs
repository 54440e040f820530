use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};

use crate::core::error::Result;
use crate::core::extractor::AppForm;
use crate::features::categories::dtos::{
    CategoriesPage, CategoryFormDto, CategoryFormView, ListCategoriesQuery,
};
use crate::features::categories::services::CategoryService;
use crate::modules::backend::Category;
use crate::shared::types::{ConfirmDeletePage, Nav};
use crate::shared::views;

const CATEGORIES_PATH: &str = "/categories";

fn render_page(
    status: StatusCode,
    categories: Vec<Category>,
    form: CategoryFormView,
    error: Option<String>,
) -> Result<Response> {
    views::render_with_status(
        status,
        "categories/index.html",
        &CategoriesPage::new(categories, form, error),
    )
}

/// Category list with the create/rename form
pub async fn list_categories(
    State(service): State<Arc<CategoryService>>,
    Query(query): Query<ListCategoriesQuery>,
) -> Result<Response> {
    let categories = match service.list().await {
        Ok(categories) => categories,
        Err(e) => {
            return render_page(
                e.status(),
                Vec::new(),
                CategoryFormView::default(),
                Some(e.banner_or("Không thể tải danh sách loại hàng hóa")),
            )
        }
    };

    let mut error = None;
    let form = match query.edit {
        Some(id) => match categories.iter().find(|c| c.id == id) {
            Some(c) => CategoryFormView {
                id: Some(c.id),
                name: c.name.clone(),
            },
            None => {
                error = Some("Không tìm thấy loại hàng hóa cần sửa".to_string());
                CategoryFormView::default()
            }
        },
        None => CategoryFormView::default(),
    };

    render_page(StatusCode::OK, categories, form, error)
}

/// Create or rename a category, then return to the list
pub async fn save_category(
    State(service): State<Arc<CategoryService>>,
    AppForm(form): AppForm<CategoryFormDto>,
) -> Result<Response> {
    match service.save(&form).await {
        Ok(()) => Ok(Redirect::to(CATEGORIES_PATH).into_response()),
        Err(e) => {
            let categories = service.list().await.unwrap_or_default();
            render_page(
                e.status(),
                categories,
                CategoryFormView::from(&form),
                Some(e.banner_or("Lỗi khi lưu loại hàng hóa. Vui lòng thử lại.")),
            )
        }
    }
}

/// Ask before deleting
pub async fn confirm_delete_category(
    State(service): State<Arc<CategoryService>>,
    Path(id): Path<i64>,
) -> Result<Response> {
    let category = service.get(id).await?;
    let page = ConfirmDeletePage {
        nav: Nav::Categories,
        title: "Xóa loại hàng hóa".to_string(),
        message: format!("Bạn có chắc muốn xóa loại hàng hóa \"{}\"?", category.name),
        action: format!("{}/{}/delete", CATEGORIES_PATH, id),
        cancel: CATEGORIES_PATH.to_string(),
    };
    Ok(views::render("confirm_delete.html", &page)?.into_response())
}

pub async fn delete_category(
    State(service): State<Arc<CategoryService>>,
    Path(id): Path<i64>,
) -> Result<Response> {
    match service.delete(id).await {
        Ok(()) => Ok(Redirect::to(CATEGORIES_PATH).into_response()),
        Err(e) => {
            let categories = service.list().await.unwrap_or_default();
            render_page(
                e.status(),
                categories,
                CategoryFormView::default(),
                Some(e.banner_or("Lỗi khi xóa loại hàng hóa")),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::categories::routes;
    use crate::shared::test_helpers::InMemoryBackend;
    use axum_test::TestServer;

    fn server(backend: &InMemoryBackend) -> TestServer {
        let service = Arc::new(CategoryService::new(backend.clone().into_dyn()));
        TestServer::new(routes::routes(service)).expect("Failed to create test server")
    }

    #[tokio::test]
    async fn test_list_page_shows_categories() {
        let backend = InMemoryBackend::new()
            .with_category(1, "Đồ uống")
            .with_category(2, "Bánh kẹo");
        let response = server(&backend).get("/categories").await;

        response.assert_status_ok();
        let html = response.text();
        assert!(html.contains("Đồ uống"));
        assert!(html.contains("Bánh kẹo"));
        assert!(html.contains("Thêm"));
    }

    #[tokio::test]
    async fn test_edit_query_prefills_form() {
        let backend = InMemoryBackend::new().with_category(7, "Gia vị");
        let response = server(&backend).get("/categories?edit=7").await;

        response.assert_status_ok();
        let html = response.text();
        assert!(html.contains(r#"name="id" value="7""#));
        assert!(html.contains("Cập nhật"));
    }

    #[tokio::test]
    async fn test_create_redirects_back_to_list() {
        let backend = InMemoryBackend::new();
        let response = server(&backend)
            .post("/categories")
            .form(&[("id", ""), ("name", "Đồ uống")])
            .await;

        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(response.headers().get("location").unwrap(), "/categories");
        assert_eq!(backend.categories()[0].name, "Đồ uống");
    }

    #[tokio::test]
    async fn test_rename_existing_category() {
        let backend = InMemoryBackend::new().with_category(3, "Do uong");
        server(&backend)
            .post("/categories")
            .form(&[("id", "3"), ("name", "Đồ uống")])
            .await
            .assert_status(StatusCode::SEE_OTHER);

        assert_eq!(backend.categories()[0].name, "Đồ uống");
    }

    #[tokio::test]
    async fn test_blank_name_shows_banner() {
        let backend = InMemoryBackend::new();
        let response = server(&backend)
            .post("/categories")
            .form(&[("name", "  ")])
            .await;

        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        assert!(response.text().contains("Vui lòng nhập tên loại hàng hóa"));
        assert!(backend.categories().is_empty());
    }

    #[tokio::test]
    async fn test_delete_requires_confirmation() {
        let backend = InMemoryBackend::new().with_category(4, "Rau củ");
        let server = server(&backend);

        let confirm = server.get("/categories/4/delete").await;
        confirm.assert_status_ok();
        assert!(confirm.text().contains("Rau củ"));
        assert_eq!(backend.categories().len(), 1);

        server
            .post("/categories/4/delete")
            .await
            .assert_status(StatusCode::SEE_OTHER);
        assert!(backend.categories().is_empty());
    }

    #[tokio::test]
    async fn test_backend_down_shows_banner() {
        let backend = InMemoryBackend::new().failing();
        let response = server(&backend).get("/categories").await;

        response.assert_status(StatusCode::BAD_GATEWAY);
        assert!(response.text().contains("Không thể tải danh sách loại hàng hóa"));
    }
}

use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use tracing::debug;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppForm;
use crate::features::products::dtos::{
    ListProductsQuery, PriceFormDto, ProductFormDto, ProductFormView, ProductsPage,
    UploadedImage,
};
use crate::features::products::services::ProductService;
use crate::modules::backend::{Category, Product};
use crate::shared::types::{ConfirmDeletePage, Nav};
use crate::shared::views;

const PRODUCTS_PATH: &str = "/products";

fn render_page(
    status: StatusCode,
    products: Vec<Product>,
    categories: Vec<Category>,
    form: ProductFormView,
    error: Option<String>,
) -> Result<Response> {
    views::render_with_status(
        status,
        "products/index.html",
        &ProductsPage::new(products, categories, form, error),
    )
}

/// Re-render the page after a failed action, keeping what the user typed
async fn render_failure(
    service: &ProductService,
    err: AppError,
    form: ProductFormView,
    fallback: &str,
) -> Result<Response> {
    let (products, categories) = tokio::join!(service.list(), service.list_categories());
    render_page(
        err.status(),
        products.unwrap_or_default(),
        categories.unwrap_or_default(),
        form,
        Some(err.banner_or(fallback)),
    )
}

/// Product list with the create/edit form
pub async fn list_products(
    State(service): State<Arc<ProductService>>,
    Query(query): Query<ListProductsQuery>,
) -> Result<Response> {
    let (products, categories) = tokio::join!(service.list(), service.list_categories());

    let mut status = StatusCode::OK;
    let mut errors = Vec::new();

    let products = products.unwrap_or_else(|e| {
        status = e.status();
        errors.push(e.banner_or("Không thể tải danh sách sản phẩm"));
        Vec::new()
    });
    let categories = categories.unwrap_or_else(|e| {
        errors.push(e.banner_or("Không thể tải danh sách danh mục"));
        Vec::new()
    });

    let form = match query.edit {
        Some(id) => match service.get(id).await {
            Ok(product) => ProductFormView::from(&product),
            Err(e) => {
                errors.push(e.banner_or("Không thể tải sản phẩm cần sửa"));
                ProductFormView::default()
            }
        },
        None => ProductFormView::default(),
    };

    let error = (!errors.is_empty()).then(|| errors.join(". "));
    render_page(status, products, categories, form, error)
}

/// Read the multipart product form
async fn read_product_form(multipart: &mut Multipart) -> Result<ProductFormDto> {
    let mut form = ProductFormDto::default();

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        debug!("Failed to read multipart field: {}", e);
        AppError::BadRequest(format!("Không đọc được dữ liệu biểu mẫu: {}", e))
    })? {
        let field_name = field.name().unwrap_or("").to_string();

        if field_name == "image" {
            let content_type = field
                .content_type()
                .map(|s| s.to_string())
                .unwrap_or_else(|| "application/octet-stream".to_string());
            let file_name = field.file_name().unwrap_or("").to_string();
            let data = field.bytes().await.map_err(|e| {
                debug!("Failed to read image bytes: {}", e);
                AppError::BadRequest(format!("Không đọc được ảnh tải lên: {}", e))
            })?;

            // An untouched file input still submits an empty part
            if !data.is_empty() {
                form.image = Some(UploadedImage {
                    content_type,
                    file_name,
                    data: data.to_vec(),
                });
            }
            continue;
        }

        let text = field.text().await.map_err(|e| {
            AppError::BadRequest(format!("Không đọc được trường '{}': {}", field_name, e))
        })?;

        match field_name.as_str() {
            "id" => {
                let text = text.trim();
                if !text.is_empty() {
                    form.id = Some(text.parse().map_err(|_| {
                        AppError::BadRequest("Mã sản phẩm không hợp lệ".to_string())
                    })?);
                }
            }
            "name" => form.name = text,
            "categoryId" => form.category_id = text,
            "price" => form.price = text,
            "imageUrl" => form.image_url = text,
            _ => debug!("Ignoring unknown field: {}", field_name),
        }
    }

    Ok(form)
}

/// Create or update a product, then return to the list
pub async fn save_product(
    State(service): State<Arc<ProductService>>,
    mut multipart: Multipart,
) -> Result<Response> {
    let form = read_product_form(&mut multipart).await?;

    match service.save(&form).await {
        Ok(()) => Ok(Redirect::to(PRODUCTS_PATH).into_response()),
        Err(e) => {
            render_failure(
                &service,
                e,
                ProductFormView::from(&form),
                "Lỗi khi lưu sản phẩm. Vui lòng kiểm tra lại.",
            )
            .await
        }
    }
}

/// Quick price change from the product table
pub async fn update_price(
    State(service): State<Arc<ProductService>>,
    Path(id): Path<i64>,
    AppForm(form): AppForm<PriceFormDto>,
) -> Result<Response> {
    match service.update_price(id, &form.price).await {
        Ok(()) => Ok(Redirect::to(PRODUCTS_PATH).into_response()),
        Err(e) => {
            render_failure(
                &service,
                e,
                ProductFormView::default(),
                "Lỗi khi cập nhật giá sản phẩm",
            )
            .await
        }
    }
}

/// Ask before deleting
pub async fn confirm_delete_product(
    State(service): State<Arc<ProductService>>,
    Path(id): Path<i64>,
) -> Result<Response> {
    let product = service.get(id).await?;
    let page = ConfirmDeletePage {
        nav: Nav::Products,
        title: "Xóa sản phẩm".to_string(),
        message: format!("Bạn có chắc muốn xóa sản phẩm \"{}\"?", product.name),
        action: format!("{}/{}/delete", PRODUCTS_PATH, id),
        cancel: PRODUCTS_PATH.to_string(),
    };
    Ok(views::render("confirm_delete.html", &page)?.into_response())
}

pub async fn delete_product(
    State(service): State<Arc<ProductService>>,
    Path(id): Path<i64>,
) -> Result<Response> {
    match service.delete(id).await {
        Ok(()) => Ok(Redirect::to(PRODUCTS_PATH).into_response()),
        Err(e) => {
            render_failure(
                &service,
                e,
                ProductFormView::default(),
                "Lỗi khi xóa sản phẩm",
            )
            .await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::ShopConfig;
    use crate::features::products::routes;
    use crate::shared::test_helpers::InMemoryBackend;
    use axum_test::multipart::{MultipartForm, Part};
    use axum_test::TestServer;
    use rust_decimal::Decimal;

    fn server(backend: &InMemoryBackend) -> TestServer {
        let service = Arc::new(ProductService::new(
            backend.clone().into_dyn(),
            &ShopConfig::default(),
        ));
        TestServer::new(routes::routes(service)).expect("Failed to create test server")
    }

    fn seeded() -> InMemoryBackend {
        InMemoryBackend::new()
            .with_category(1, "Đồ uống")
            .with_category(2, "Bánh kẹo")
            .with_product(10, "Bia Hà Nội", 1, 15000)
    }

    #[tokio::test]
    async fn test_list_page_shows_products_and_categories() {
        let response = server(&seeded()).get("/products").await;

        response.assert_status_ok();
        let html = response.text();
        assert!(html.contains("Bia Hà Nội"));
        assert!(html.contains("15.000"));
        assert!(html.contains(r#"<option value="1" selected>Đồ uống</option>"#));
        assert!(html.contains(r#"<option value="2">Bánh kẹo</option>"#));
    }

    #[tokio::test]
    async fn test_product_without_category_still_listed() {
        let backend = InMemoryBackend::new().with_product(3, "Kẹo lạc", 42, 2000);
        let response = server(&backend).get("/products").await;

        response.assert_status_ok();
        let html = response.text();
        assert!(html.contains("Kẹo lạc"));
        assert!(html.contains("Chưa có danh mục"));
    }

    #[tokio::test]
    async fn test_edit_query_prefills_form() {
        let response = server(&seeded()).get("/products?edit=10").await;

        response.assert_status_ok();
        let html = response.text();
        assert!(html.contains(r#"name="id" value="10""#));
        assert!(html.contains(r#"name="price" value="15000""#));
        assert!(html.contains("Cập nhật"));
    }

    #[tokio::test]
    async fn test_create_with_uploaded_image() {
        let backend = seeded();
        let form = MultipartForm::new()
            .add_text("id", "")
            .add_text("name", "Nước cam")
            .add_text("categoryId", "1")
            .add_text("price", "12.000")
            .add_text("imageUrl", "")
            .add_part(
                "image",
                Part::bytes(vec![1u8, 2, 3])
                    .file_name("cam.png")
                    .mime_type("image/png"),
            );

        let response = server(&backend).post("/products").multipart(form).await;

        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(response.headers().get("location").unwrap(), "/products");

        let created = backend
            .products()
            .into_iter()
            .find(|p| p.name == "Nước cam")
            .unwrap();
        assert_eq!(created.price, Decimal::from(12000));
        assert_eq!(created.image_url.as_deref(), Some("data:image/png;base64,AQID"));
    }

    #[tokio::test]
    async fn test_invalid_category_keeps_input() {
        let backend = seeded();
        let form = MultipartForm::new()
            .add_text("name", "Nước cam")
            .add_text("categoryId", "")
            .add_text("price", "12000");

        let response = server(&backend).post("/products").multipart(form).await;

        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        let html = response.text();
        assert!(html.contains("Vui lòng chọn một danh mục hợp lệ"));
        assert!(html.contains(r#"value="Nước cam""#));
        assert_eq!(backend.products().len(), 1);
    }

    #[tokio::test]
    async fn test_update_price() {
        let backend = seeded();
        let response = server(&backend)
            .post("/products/10/price")
            .form(&[("price", "18000")])
            .await;

        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(backend.products()[0].price, Decimal::from(18000));
    }

    #[tokio::test]
    async fn test_delete_requires_confirmation() {
        let backend = seeded();
        let server = server(&backend);

        let confirm = server.get("/products/10/delete").await;
        confirm.assert_status_ok();
        assert!(confirm.text().contains("Bia Hà Nội"));

        server
            .post("/products/10/delete")
            .await
            .assert_status(StatusCode::SEE_OTHER);
        assert!(backend.products().is_empty());
    }

    #[tokio::test]
    async fn test_delete_failure_shows_banner() {
        let backend = seeded();
        let response = server(&backend).post("/products/99/delete").await;

        response.assert_status(StatusCode::NOT_FOUND);
        assert!(response.text().contains("Không tìm thấy dữ liệu"));
    }

    #[tokio::test]
    async fn test_backend_down_shows_banner() {
        let backend = InMemoryBackend::new().failing();
        let response = server(&backend).get("/products").await;

        response.assert_status(StatusCode::BAD_GATEWAY);
        let html = response.text();
        assert!(html.contains("Không thể tải danh sách sản phẩm"));
        assert!(html.contains("Không thể tải danh sách danh mục"));
    }
}

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppForm;
use crate::features::invoices::dtos::InvoicePrintPage;
use crate::features::sales::dtos::{
    parse_quantity, AddItemDto, CheckoutDto, CustomerDto, QuantityDto, SalesPage,
};
use crate::features::sales::models::Cart;
use crate::features::sales::services::SaleService;
use crate::shared::views;

const SALES_PATH: &str = "/sales";

fn to_cart(cart_id: Uuid) -> Response {
    Redirect::to(&format!("{}/{}", SALES_PATH, cart_id)).into_response()
}

async fn render_page(
    service: &SaleService,
    mut status: StatusCode,
    cart: Option<&Cart>,
    mut error: Option<String>,
) -> Result<Response> {
    let products = match service.list_products().await {
        Ok(products) => products,
        Err(e) => {
            if status.is_success() {
                status = e.status();
            }
            error.get_or_insert_with(|| e.banner_or("Không thể tải danh sách sản phẩm"));
            Vec::new()
        }
    };

    let page = match cart {
        Some(cart) => SalesPage::new(cart, products, error)?,
        None => SalesPage::new_sale(products, error),
    };
    views::render_with_status(status, "sales/index.html", &page)
}

/// Re-render the sale after a failed action on it
async fn render_failure(
    service: &SaleService,
    cart_id: Uuid,
    err: AppError,
    fallback: &str,
) -> Result<Response> {
    let cart = service.get_cart(cart_id).await?;
    render_page(service, err.status(), Some(&cart), Some(err.banner_or(fallback))).await
}

/// Blank sale page; its cart is only created by the first POST
pub async fn new_sale(State(service): State<Arc<SaleService>>) -> Result<Response> {
    render_page(&service, StatusCode::OK, None, None).await
}

/// Product grid and cart of one sale
pub async fn show_sale(
    State(service): State<Arc<SaleService>>,
    Path(cart_id): Path<Uuid>,
) -> Result<Response> {
    match service.get_cart(cart_id).await {
        Ok(cart) => render_page(&service, StatusCode::OK, Some(&cart), None).await,
        // Expired or unknown carts start over
        Err(e) if e.is_not_found() => Ok(Redirect::to(SALES_PATH).into_response()),
        Err(e) => Err(e),
    }
}

pub async fn add_item(
    State(service): State<Arc<SaleService>>,
    Path(cart_id): Path<Uuid>,
    AppForm(form): AppForm<AddItemDto>,
) -> Result<Response> {
    let quantity = parse_quantity(form.quantity.as_deref());
    match service.add_item(cart_id, form.product_id, quantity).await {
        Ok(()) => Ok(to_cart(cart_id)),
        Err(e) => render_failure(&service, cart_id, e, "Lỗi khi thêm sản phẩm vào giỏ hàng").await,
    }
}

pub async fn add_item_to_new_sale(
    State(service): State<Arc<SaleService>>,
    form: AppForm<AddItemDto>,
) -> Result<Response> {
    let cart_id = service.open_cart().await;
    add_item(State(service), Path(cart_id), form).await
}

pub async fn update_quantity(
    State(service): State<Arc<SaleService>>,
    Path((cart_id, product_id)): Path<(Uuid, i64)>,
    AppForm(form): AppForm<QuantityDto>,
) -> Result<Response> {
    let quantity = parse_quantity(form.quantity.as_deref());
    match service.set_quantity(cart_id, product_id, quantity).await {
        Ok(()) => Ok(to_cart(cart_id)),
        Err(e) => render_failure(&service, cart_id, e, "Lỗi khi cập nhật số lượng").await,
    }
}

pub async fn remove_item(
    State(service): State<Arc<SaleService>>,
    Path((cart_id, product_id)): Path<(Uuid, i64)>,
) -> Result<Response> {
    match service.remove_item(cart_id, product_id).await {
        Ok(()) => Ok(to_cart(cart_id)),
        Err(e) => render_failure(&service, cart_id, e, "Lỗi khi xóa sản phẩm khỏi giỏ hàng").await,
    }
}

pub async fn set_customer(
    State(service): State<Arc<SaleService>>,
    Path(cart_id): Path<Uuid>,
    AppForm(form): AppForm<CustomerDto>,
) -> Result<Response> {
    match service.set_customer(cart_id, &form.customer_name).await {
        Ok(()) => Ok(to_cart(cart_id)),
        Err(e) => render_failure(&service, cart_id, e, "Lỗi khi lưu tên khách hàng").await,
    }
}

pub async fn set_customer_on_new_sale(
    State(service): State<Arc<SaleService>>,
    form: AppForm<CustomerDto>,
) -> Result<Response> {
    let cart_id = service.open_cart().await;
    set_customer(State(service), Path(cart_id), form).await
}

/// Create the invoice and show it ready to print
pub async fn checkout(
    State(service): State<Arc<SaleService>>,
    Path(cart_id): Path<Uuid>,
    AppForm(form): AppForm<CheckoutDto>,
) -> Result<Response> {
    if let Some(name) = form.customer_name.as_deref() {
        if let Err(e) = service.set_customer(cart_id, name).await {
            return render_failure(&service, cart_id, e, "Lỗi khi lưu tên khách hàng").await;
        }
    }

    match service.checkout(cart_id).await {
        Ok(invoice) => {
            let page = InvoicePrintPage::new(&invoice, SALES_PATH);
            Ok(views::render("invoices/print.html", &page)?.into_response())
        }
        Err(e) => {
            render_failure(&service, cart_id, e, "Lỗi khi tạo hóa đơn. Vui lòng thử lại.").await
        }
    }
}

pub async fn checkout_new_sale(
    State(service): State<Arc<SaleService>>,
    form: AppForm<CheckoutDto>,
) -> Result<Response> {
    let cart_id = service.open_cart().await;
    checkout(State(service), Path(cart_id), form).await
}

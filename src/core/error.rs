use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;

use crate::shared::types::ErrorPage;
use crate::shared::views;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("External service error: {0}")]
    ExternalServiceError(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::ExternalServiceError(_) => StatusCode::BAD_GATEWAY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show in the page banner.
    ///
    /// Backend and internal failures carry technical detail that only goes to the log.
    pub fn user_message(&self) -> String {
        match self {
            AppError::NotFound(msg)
            | AppError::Validation(msg)
            | AppError::BadRequest(msg)
            | AppError::Conflict(msg) => msg.clone(),
            AppError::ExternalServiceError(_) => {
                "Không thể kết nối tới máy chủ dữ liệu hoặc máy chủ trả về lỗi".to_string()
            }
            AppError::Internal(_) => "Đã xảy ra lỗi hệ thống".to_string(),
        }
    }

    /// Banner text for a failed page action: specific messages pass through,
    /// backend and internal failures fall back to the action's own wording
    pub fn banner_or(&self, fallback: &str) -> String {
        match self {
            AppError::ExternalServiceError(_) | AppError::Internal(_) => fallback.to_string(),
            other => other.user_message(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::NotFound(_))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::ExternalServiceError(msg) => {
                tracing::error!("External service error: {}", msg)
            }
            AppError::Internal(msg) => tracing::error!("Internal error: {}", msg),
            other => tracing::debug!("Request failed: {}", other),
        }

        let status = self.status();
        let page = ErrorPage {
            status: status.as_u16(),
            message: self.user_message(),
        };

        match views::render("error.html", &page) {
            Ok(html) => (status, html).into_response(),
            Err(e) => {
                tracing::error!("Failed to render error page: {}", e);
                (status, Html(page.message)).into_response()
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

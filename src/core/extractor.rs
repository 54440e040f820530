use axum::{
    body::Body,
    extract::{rejection::FormRejection, FromRequest, Request},
    response::{IntoResponse, Response},
    Form,
};
use serde::{de::DeserializeOwned, Deserialize, Deserializer};
use std::str::FromStr;

use crate::core::error::AppError;

/// Form extractor that renders rejections through the regular error page
pub struct AppForm<T>(pub T);

impl<T, S> FromRequest<S> for AppForm<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppFormRejection;

    async fn from_request(req: Request<Body>, state: &S) -> Result<Self, Self::Rejection> {
        match Form::<T>::from_request(req, state).await {
            Ok(value) => Ok(Self(value.0)),
            Err(rejection) => Err(AppFormRejection(rejection)),
        }
    }
}

pub struct AppFormRejection(FormRejection);

impl IntoResponse for AppFormRejection {
    fn into_response(self) -> Response {
        let message = match self.0 {
            FormRejection::FailedToDeserializeForm(err) => {
                format!("Dữ liệu biểu mẫu không hợp lệ: {}", err)
            }
            FormRejection::FailedToDeserializeFormBody(err) => {
                format!("Dữ liệu biểu mẫu không hợp lệ: {}", err)
            }
            FormRejection::InvalidFormContentType(_) => {
                "Biểu mẫu phải được gửi dưới dạng application/x-www-form-urlencoded".to_string()
            }
            _ => "Không đọc được dữ liệu biểu mẫu".to_string(),
        };

        AppError::BadRequest(message).into_response()
    }
}

/// Deserialize an optional form field, treating an empty input as absent.
///
/// HTML forms submit `id=` for an untouched hidden input, which would otherwise
/// fail to parse as a number.
pub fn empty_string_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s.parse::<T>().map(Some).map_err(serde::de::Error::custom),
    }
}

// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

use crate::application::use_cases::price_lookup::LookupError;
use crate::domain::repositories::product_repository::RepositoryError;

/// 应用错误类型
///
/// 封装所有可能的应用层错误，提供统一的错误处理接口。
/// 响应体固定为 `{"error": "..."}`，状态码由具体错误类型决定。
#[derive(Debug)]
pub struct AppError(anyhow::Error);

impl AppError {
    /// 错误对应的 HTTP 状态码
    pub fn status_code(&self) -> StatusCode {
        if let Some(err) = self.0.downcast_ref::<LookupError>() {
            return match err {
                LookupError::Validation(_) | LookupError::Unsupported(_) => {
                    StatusCode::BAD_REQUEST
                }
                LookupError::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
            };
        }

        if let Some(err) = self.0.downcast_ref::<RepositoryError>() {
            return match err {
                RepositoryError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
                RepositoryError::NotFound => StatusCode::NOT_FOUND,
            };
        }

        if self.0.downcast_ref::<validator::ValidationErrors>().is_some() {
            return StatusCode::BAD_REQUEST;
        }

        StatusCode::INTERNAL_SERVER_ERROR
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_message = self.0.to_string();

        if status.is_server_error() {
            error!("Request failed: {:#}", self.0);
        }

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::traits::RenderError;
    use crate::engines::validators::UrlValidationError;
    use std::time::Duration;

    #[test]
    fn test_status_code_mapping() {
        let cases = vec![
            (
                AppError::from(LookupError::Validation(UrlValidationError::Missing)),
                StatusCode::BAD_REQUEST,
            ),
            (
                AppError::from(LookupError::Unsupported("https://ebay.example".into())),
                StatusCode::BAD_REQUEST,
            ),
            (
                AppError::from(LookupError::Render(RenderError::Timeout(Duration::from_secs(30)))),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                AppError::from(LookupError::Render(RenderError::Busy(4))),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (AppError::from(RepositoryError::NotFound), StatusCode::NOT_FOUND),
            (
                AppError::from(validator::ValidationErrors::new()),
                StatusCode::BAD_REQUEST,
            ),
            (
                AppError::from(anyhow::anyhow!("boom")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(error.status_code(), expected);
        }
    }
}

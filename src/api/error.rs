use crate::application::booking::{BookingApplicationError, ErrorKind};
use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::types::ErrorResponse;

/// API層のエラー型
///
/// アプリケーション層のエラーと、リクエスト自体の不備をまとめて扱う。
/// ステータスコードはエラーの種別から決まる。
#[derive(Debug)]
pub enum ApiError {
    Application(BookingApplicationError),
    InvalidRequest(String),
}

impl From<BookingApplicationError> for ApiError {
    fn from(err: BookingApplicationError) -> Self {
        ApiError::Application(err)
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::InvalidRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::InvalidRequest(rejection.body_text())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidRequest(rejection.body_text())
    }
}

fn status_for(kind: ErrorKind) -> (StatusCode, &'static str) {
    match kind {
        ErrorKind::NotFound => (StatusCode::NOT_FOUND, "NOT_FOUND"),
        ErrorKind::Validation => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
        ErrorKind::AccessDenied => (StatusCode::FORBIDDEN, "ACCESS_DENIED"),
        ErrorKind::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match self {
            ApiError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg),
            ApiError::Application(err) => {
                let (status, error_type) = status_for(err.kind());
                let message = if err.kind() == ErrorKind::Internal {
                    // 内部エラーの詳細はログに記録し、クライアントには一般的なメッセージのみを返す
                    match std::error::Error::source(&err) {
                        Some(source) => tracing::error!(error = %err, %source, "internal error"),
                        None => tracing::error!(error = %err, "internal error"),
                    }
                    "An unexpected error occurred".to_string()
                } else {
                    err.to_string()
                };
                (status, error_type, message)
            }
        };

        let body = Json(ErrorResponse::new(error_type, message));
        (status, body).into_response()
    }
}

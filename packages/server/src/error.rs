use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common::storage::StorageError;
use sea_orm::DbErr;
use serde::Serialize;

/// Structured error response returned by all endpoints on failure.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    /// Always `"error"`.
    #[schema(example = "error")]
    pub status: &'static str,
    /// Machine-readable error code. One of: `VALIDATION_ERROR`, `SPOOF_DETECTED`,
    /// `NOT_FOUND`, `INTERNAL_ERROR`.
    #[schema(example = "NOT_FOUND")]
    pub code: &'static str,
    /// Human-readable error description.
    #[schema(example = "Пользователь не найден")]
    pub error: String,
}

/// Application-level error type.
#[derive(Debug)]
pub enum AppError {
    Validation(String),
    SpoofDetected(String),
    NotFound(String),
    /// Internal failure. `message` goes to the client, `detail` only to the log.
    Internal { message: String, detail: String },
}

impl AppError {
    /// Internal error with the generic client message.
    pub fn internal(detail: impl Into<String>) -> Self {
        AppError::Internal {
            message: "An unexpected error occurred".into(),
            detail: detail.into(),
        }
    }

    fn status_and_body(self) -> (StatusCode, ErrorBody) {
        let (status, code, error) = match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg),
            AppError::SpoofDetected(msg) => (StatusCode::FORBIDDEN, "SPOOF_DETECTED", msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            AppError::Internal { message, detail } => {
                tracing::error!("Internal error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    message,
                )
            }
        };

        (
            status,
            ErrorBody {
                status: "error",
                code,
                error,
            },
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();
        (status, Json(body)).into_response()
    }
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        AppError::internal(err.to_string())
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::UnsupportedExtension(_) => {
                AppError::Validation("Неподдерживаемый формат файла".into())
            }
            StorageError::SizeLimitExceeded { limit, .. } => {
                AppError::Validation(format!("Файл превышает допустимый размер ({limit} байт)"))
            }
            StorageError::Io(e) => AppError::Internal {
                message: "Ошибка сохранения файла".into(),
                detail: format!("File saving error: {e}"),
            },
        }
    }
}

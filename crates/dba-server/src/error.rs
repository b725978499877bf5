use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

pub type Result<T, E = AppError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Missing 'message' field")]
    MissingMessage,

    #[error("Invalid session id: {0}")]
    InvalidSessionId(String),

    #[error("Storage error: {0}")]
    StorageError(#[from] std::io::Error),
}

#[derive(Serialize)]
struct JsonError {
    message: String,
    r#type: String,
}

#[derive(Serialize)]
struct JsonErrorWrapper {
    error: JsonError,
}

impl AppError {
    fn error_type(&self) -> &'static str {
        match self {
            AppError::MissingMessage | AppError::InvalidSessionId(_) => "invalid_request_error",
            AppError::StorageError(_) => "api_error",
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::MissingMessage => StatusCode::BAD_REQUEST,
            AppError::InvalidSessionId(_) => StatusCode::BAD_REQUEST,
            AppError::StorageError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status_code = self.status_code();
        let error_response = JsonErrorWrapper {
            error: JsonError {
                message: self.to_string(),
                r#type: self.error_type().to_string(),
            },
        };
        HttpResponse::build(status_code).json(error_response)
    }
}

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum AppError {
    NotFound(String),
    Unauthorized(String),
    PermissionDenied(String),
    Conflict(String),
    BadRequest(String),
    MalformedImport(String),
    PersistenceFailure(String),
    InternalServerError(String),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::PermissionDenied(msg) => write!(f, "Permission Denied: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            AppError::MalformedImport(msg) => write!(f, "Malformed Import: {}", msg),
            AppError::PersistenceFailure(msg) => write!(f, "Persistence Failure: {}", msg),
            AppError::InternalServerError(msg) => write!(f, "Internal Server Error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::PermissionDenied(_) => StatusCode::FORBIDDEN,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::BadRequest(_) | AppError::MalformedImport(_) => StatusCode::BAD_REQUEST,
            AppError::PersistenceFailure(_) | AppError::InternalServerError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            AppError::NotFound(msg)
            | AppError::Unauthorized(msg)
            | AppError::PermissionDenied(msg)
            | AppError::Conflict(msg)
            | AppError::BadRequest(msg)
            | AppError::MalformedImport(msg)
            | AppError::PersistenceFailure(msg)
            | AppError::InternalServerError(msg) => msg.clone(),
        };
        HttpResponse::build(self.status_code()).json(ErrorResponse { error: message })
    }
}

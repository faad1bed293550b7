//! HTTP-facing error type.
//!
//! Store errors are folded into three outcomes: a rejected request (400), a
//! missing record (404) and everything else (500). All of them render the
//! same `{"error": "<message>"}` body.

use crate::store::{FileStoreError, StoreError};
use actix_multipart::MultipartError;
use actix_web::error::BlockingError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use common::responses::ErrorResponse;
use log::error;
use thiserror::Error;

pub const NO_FILE_UPLOADED: &str = "No file uploaded.";
pub const MODEL_NOT_FOUND: &str = "Model not found";
pub const FILE_PATH_NOT_FOUND: &str = "File path not found for the model";
pub const INVALID_FILENAME: &str = "Invalid file name.";

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Fatal(String),
}

impl ServiceError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    fn fatal(cause: impl std::fmt::Display) -> Self {
        error!("Request failed: {}", cause);
        Self::Fatal(cause.to_string())
    }
}

impl ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Fatal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.to_string(),
        })
    }
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(_) => ServiceError::not_found(MODEL_NOT_FOUND),
            // Malformed ids are deliberately not a 404.
            other => ServiceError::fatal(other),
        }
    }
}

impl From<FileStoreError> for ServiceError {
    fn from(err: FileStoreError) -> Self {
        match err {
            FileStoreError::InvalidFilename(_) => ServiceError::validation(INVALID_FILENAME),
            other => ServiceError::fatal(other),
        }
    }
}

impl From<MultipartError> for ServiceError {
    fn from(err: MultipartError) -> Self {
        ServiceError::validation(format!("Malformed upload: {}", err))
    }
}

impl From<BlockingError> for ServiceError {
    fn from(err: BlockingError) -> Self {
        ServiceError::fatal(err)
    }
}

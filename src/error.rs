use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::services::classifier::ClassifyError;
use crate::services::extractor::ExtractError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("No file part")]
    MissingFilePart,

    #[error("No selected file")]
    EmptyFilename,

    #[error("Invalid file format. Only PDFs are allowed.")]
    InvalidFileFormat,

    #[error("File too large. Maximum size is {0} MB")]
    PayloadTooLarge(usize),

    #[error("Malformed multipart request: {0}")]
    Multipart(#[from] axum::extract::multipart::MultipartError),

    #[error(transparent)]
    Extraction(#[from] ExtractError),

    #[error(transparent)]
    Classification(#[from] ClassifyError),

    #[error("Failed to store upload: {0}")]
    Storage(#[from] std::io::Error),

    #[error("Template rendering failed: {0}")]
    Template(#[from] askama::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::MissingFilePart
            | AppError::EmptyFilename
            | AppError::InvalidFileFormat
            | AppError::Multipart(_) => (StatusCode::BAD_REQUEST, self.to_string()),

            AppError::PayloadTooLarge(_) => (StatusCode::PAYLOAD_TOO_LARGE, self.to_string()),

            // Document problems the client can act on
            AppError::Extraction(ExtractError::InvalidPdf(_) | ExtractError::Encrypted)
            | AppError::Classification(ClassifyError::EmptyDocument) => {
                (StatusCode::UNPROCESSABLE_ENTITY, self.to_string())
            }

            AppError::Extraction(ExtractError::Io(e)) => {
                tracing::error!("Extraction I/O error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
            AppError::Classification(e) => {
                tracing::error!("Classification error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Classification failed to complete".to_string(),
                )
            }
            AppError::Storage(e) => {
                tracing::error!("Storage error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
            AppError::Template(e) => {
                tracing::error!("Template rendering error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

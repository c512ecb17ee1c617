//! # Error Handling Middleware
//!
//! This module provides a standardized way to handle errors in the guidance
//! API. It maps domain-specific errors to appropriate HTTP status codes and
//! JSON error responses, ensuring a consistent error surface across the
//! entire API.
//!
//! All booking failures (wrong state, full or inactive slot, duplicate
//! slot, blocked delete) are client errors and map into the 4xx range;
//! store failures and data-integrity faults are reported as 500 without
//! leaking detail beyond the error message.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use guidance_core::errors::GuidanceError;

/// Application error wrapper that provides HTTP status code mapping.
///
/// `AppError` wraps domain-specific `GuidanceError` instances and implements
/// `IntoResponse` to convert them into HTTP responses with appropriate
/// status codes and JSON payloads, so handlers can use the `?` operator
/// with any function returning `GuidanceResult`.
#[derive(Debug)]
pub struct AppError(pub GuidanceError);

/// Converts application errors to HTTP responses.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Map error types to HTTP status codes
        let status = match &self.0 {
            GuidanceError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            GuidanceError::NotFound(_) => StatusCode::NOT_FOUND,
            GuidanceError::Conflict(_) => StatusCode::CONFLICT,
            GuidanceError::SlotUnavailable(_) => StatusCode::CONFLICT,
            GuidanceError::SlotFull(_) => StatusCode::CONFLICT,
            GuidanceError::InvalidStateTransition(_) => StatusCode::CONFLICT,
            GuidanceError::DataIntegrity(_) => StatusCode::INTERNAL_SERVER_ERROR,
            GuidanceError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            GuidanceError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Get the error message and format as JSON
        let message = self.0.to_string();
        let body = Json(json!({ "error": message }));

        // Combine status code and JSON body into a response
        (status, body).into_response()
    }
}

/// Automatic conversion from GuidanceError to AppError.
///
/// This implementation allows using the `?` operator with functions that
/// return `Result<T, GuidanceError>` in handler functions that return
/// `Result<T, AppError>`.
impl From<GuidanceError> for AppError {
    fn from(err: GuidanceError) -> Self {
        AppError(err)
    }
}

/// Automatic conversion from eyre::Report to AppError.
///
/// Infrastructure-level reports surface as the Database variant.
impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        AppError(GuidanceError::Database(err))
    }
}

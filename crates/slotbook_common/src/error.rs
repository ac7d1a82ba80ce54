// --- File: crates/slotbook_common/src/error.rs ---
use std::fmt;
use thiserror::Error;

/// The base error type shared by all slotbook crates.
///
/// Crates with their own error enums convert into this at the HTTP boundary.
#[derive(Error, Debug)]
pub enum SlotbookError {
    /// Error occurred during an HTTP request
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    /// Error occurred while parsing data
    #[error("Failed to parse data: {0}")]
    ParseError(String),

    /// Error occurred during validation
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Error occurred during external service call
    #[error("External service error: {service_name} - {message}")]
    ExternalServiceError {
        service_name: String,
        message: String,
    },

    /// A collaborator this request needs is switched off
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Error occurred due to an internal error
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Converts errors to HTTP status codes.
pub trait HttpStatusCode {
    /// Returns the HTTP status code for this error.
    fn status_code(&self) -> u16;
}

impl HttpStatusCode for SlotbookError {
    fn status_code(&self) -> u16 {
        match self {
            SlotbookError::HttpError(_) => 500,
            SlotbookError::ParseError(_) => 400,
            SlotbookError::ValidationError(_) => 400,
            SlotbookError::ExternalServiceError { .. } => 502,
            SlotbookError::ServiceUnavailable(_) => 503,
            SlotbookError::InternalError(_) => 500,
        }
    }
}

// Common error conversions
impl From<reqwest::Error> for SlotbookError {
    fn from(err: reqwest::Error) -> Self {
        SlotbookError::HttpError(err.to_string())
    }
}

impl From<serde_json::Error> for SlotbookError {
    fn from(err: serde_json::Error) -> Self {
        SlotbookError::ParseError(err.to_string())
    }
}

// Utility functions for error handling
pub fn validation_error<T: fmt::Display>(message: T) -> SlotbookError {
    SlotbookError::ValidationError(message.to_string())
}

pub fn external_service_error<T: fmt::Display>(service_name: &str, message: T) -> SlotbookError {
    SlotbookError::ExternalServiceError {
        service_name: service_name.to_string(),
        message: message.to_string(),
    }
}

pub fn internal_error<T: fmt::Display>(message: T) -> SlotbookError {
    SlotbookError::InternalError(message.to_string())
}

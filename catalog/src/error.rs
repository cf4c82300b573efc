//! Error types for the catalog client

use thiserror::Error;

/// Errors that can occur when talking to the product catalog
///
/// The `Display` output is what the storefront shows as a request's error
/// message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// HTTP request failed before a response arrived
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Response body was not the expected JSON
    #[error("Response parsing failed: {0}")]
    ResponseParseFailed(String),

    /// The requested resource does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Catalog returned a non-success status
    #[error("API error (status {status}): {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Response body
        message: String,
    },
}

//! HTTP-specific error types for the Resolwe SDK.
//!
//! - [`HttpResponseError`]: Non-2xx HTTP responses from the server
//! - [`InvalidHttpRequestError`]: A request failed validation before sending
//! - [`HttpError`]: Unified error type encompassing all HTTP-related errors
//! - [`UploadError`]: Chunked file upload failures
//!
//! # Example
//!
//! ```rust,ignore
//! use resolwe_sdk::clients::{HttpClient, HttpRequest, HttpMethod, HttpError};
//!
//! match client.request(request).await {
//!     Ok(response) => println!("Success: {}", response.body),
//!     Err(HttpError::Response(e)) => {
//!         println!("Server error {}: {}", e.code, e.message);
//!     }
//!     Err(HttpError::InvalidRequest(e)) => println!("Invalid request: {e}"),
//!     Err(HttpError::Network(e)) => println!("Network error: {e}"),
//! }
//! ```

use thiserror::Error;

/// Error returned when an HTTP request receives a non-successful response.
///
/// `message` holds the server's `detail` field when present, otherwise the
/// raw body serialized as JSON.
#[derive(Debug, Error)]
#[error("HTTP {code}: {message}")]
pub struct HttpResponseError {
    /// The HTTP status code of the response.
    pub code: u16,
    /// Error message reported by the server.
    pub message: String,
}

/// Error returned when an HTTP request fails validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidHttpRequestError {
    /// A request body was provided without specifying the body type.
    #[error("Cannot set a body without also setting body_type.")]
    MissingBodyType,

    /// A POST or PATCH request was made without a body.
    #[error("Cannot use {method} without specifying data.")]
    MissingBody {
        /// The HTTP method that requires a body.
        method: String,
    },
}

/// Unified error type for all HTTP-related errors.
#[derive(Debug, Error)]
pub enum HttpError {
    /// An HTTP response error (non-2xx status code).
    #[error(transparent)]
    Response(#[from] HttpResponseError),

    /// Request validation failed.
    #[error(transparent)]
    InvalidRequest(#[from] InvalidHttpRequestError),

    /// Network or connection error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl HttpError {
    /// Returns the HTTP status code when the server answered.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Response(e) => Some(e.code),
            _ => None,
        }
    }
}

/// Errors from the chunked upload path.
#[derive(Debug, Error)]
pub enum UploadError {
    /// The local file could not be read.
    #[error("Cannot read '{path}': {source}")]
    Io {
        /// The file being uploaded.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A chunk kept failing after every allowed attempt.
    #[error("Chunk {chunk} failed after {attempts} attempts: {reason}")]
    ChunkFailed {
        /// Zero-based chunk number.
        chunk: u64,
        /// How many attempts were made.
        attempts: u32,
        /// The last failure.
        reason: String,
    },

    /// The server accepted the upload but did not return a temporary file token.
    #[error("Upload response did not contain a temporary file token")]
    MissingToken,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_response_error_includes_status_code_in_message() {
        let error = HttpResponseError {
            code: 404,
            message: "Not found.".to_string(),
        };
        assert_eq!(error.to_string(), "HTTP 404: Not found.");
    }

    #[test]
    fn test_http_error_status() {
        let error = HttpError::from(HttpResponseError {
            code: 403,
            message: "denied".to_string(),
        });
        assert_eq!(error.status(), Some(403));

        let error = HttpError::from(InvalidHttpRequestError::MissingBodyType);
        assert_eq!(error.status(), None);
    }

    #[test]
    fn test_invalid_request_error_missing_body() {
        let error = InvalidHttpRequestError::MissingBody {
            method: "patch".to_string(),
        };
        assert_eq!(error.to_string(), "Cannot use patch without specifying data.");
    }

    #[test]
    fn test_upload_chunk_failed_message() {
        let error = UploadError::ChunkFailed {
            chunk: 2,
            attempts: 5,
            reason: "HTTP 502: bad gateway".to_string(),
        };
        let message = error.to_string();
        assert!(message.contains("Chunk 2"));
        assert!(message.contains("5 attempts"));
    }

    #[test]
    fn test_error_types_implement_std_error() {
        let http_error: &dyn std::error::Error = &HttpResponseError {
            code: 400,
            message: "test".to_string(),
        };
        let _ = http_error;

        let upload_error: &dyn std::error::Error = &UploadError::MissingToken;
        let _ = upload_error;
    }
}

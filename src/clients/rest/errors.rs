//! REST-specific error types for the Resolwe SDK.
//!
//! - [`RestError::InvalidPath`]: When a REST API path fails validation
//! - [`RestError::AuthenticationFailed`]: When login or the anonymous probe fails
//! - [`RestError::UnexpectedResponse`]: When a 2xx body has the wrong shape
//! - [`RestError::Http`]: Wraps underlying HTTP errors
//! - [`RestError::Config`]: Wraps invalid connection settings
//!
//! # Example
//!
//! ```rust,ignore
//! use resolwe_sdk::clients::rest::{RestClient, RestError};
//!
//! match client.get("data", Vec::new()).await {
//!     Ok(response) => println!("Data: {}", response.body),
//!     Err(RestError::Http(e)) => println!("HTTP error: {e}"),
//!     Err(other) => println!("{other}"),
//! }
//! ```

use crate::clients::HttpError;
use crate::error::ConfigError;
use thiserror::Error;

/// Error type for REST API operations.
///
/// # Example
///
/// ```rust
/// use resolwe_sdk::clients::rest::RestError;
///
/// let error = RestError::InvalidPath { path: "".to_string() };
/// assert!(error.to_string().contains("Invalid"));
/// ```
#[derive(Debug, Error)]
pub enum RestError {
    /// The REST API path is invalid.
    #[error("Invalid REST API path: {path}")]
    InvalidPath {
        /// The invalid path that was provided.
        path: String,
    },

    /// The server rejected the credentials or could not be reached while
    /// establishing a session.
    #[error("Authentication failed: {reason}")]
    AuthenticationFailed {
        /// Why authentication failed.
        reason: String,
    },

    /// The server answered with a body of an unexpected shape.
    #[error("Unexpected response from server: {reason}")]
    UnexpectedResponse {
        /// What was wrong with the body.
        reason: String,
    },

    /// An HTTP-level error occurred.
    #[error(transparent)]
    Http(#[from] HttpError),

    /// The connection settings are unusable.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl RestError {
    /// Returns the HTTP status code when the server answered with a non-2xx status.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Http(e) => e.status(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::HttpResponseError;

    #[test]
    fn test_invalid_path_error_includes_path_in_message() {
        let error = RestError::InvalidPath {
            path: "//".to_string(),
        };
        let message = error.to_string();

        assert!(message.contains("Invalid REST API path"));
        assert!(message.contains("//"));
    }

    #[test]
    fn test_authentication_failed_message() {
        let error = RestError::AuthenticationFailed {
            reason: "Response HTTP status code 400".to_string(),
        };
        assert!(error.to_string().starts_with("Authentication failed"));
    }

    #[test]
    fn test_from_http_error_conversion_keeps_status() {
        let http_error = HttpError::Response(HttpResponseError {
            code: 404,
            message: "Not found.".to_string(),
        });

        let rest_error: RestError = http_error.into();

        assert!(matches!(rest_error, RestError::Http(_)));
        assert_eq!(rest_error.status(), Some(404));
        assert!(rest_error.to_string().contains("Not found."));
    }

    #[test]
    fn test_status_is_none_for_local_errors() {
        let error = RestError::UnexpectedResponse {
            reason: "expected a list".to_string(),
        };
        assert_eq!(error.status(), None);
    }
}

//! Resource-specific error types.
//!
//! This module contains the error type returned by resource and query
//! operations, extending [`RestError`](crate::clients::RestError) with
//! resource semantics like `NotFound`, `AmbiguousResult` and `ImmutableField`.
//!
//! # Error Handling
//!
//! Caller-side contract violations (`InvalidArguments`, `ImmutableField`,
//! `StaleResource`) are detected before any request is sent. Server answers
//! are mapped as follows:
//!
//! - **404** on a lookup: [`ResourceError::NotFound`]
//! - **Other 4xx/5xx**: [`ResourceError::ServerRejected`] with status and message
//! - **Transport failures**: [`ResourceError::Rest`]
//!
//! Nothing at this layer is retried.
//!
//! # Example
//!
//! ```rust,ignore
//! use resolwe_sdk::rest::ResourceError;
//!
//! match client.sample().get_id(999).await {
//!     Ok(sample) => println!("Found: {}", sample.name),
//!     Err(ResourceError::NotFound { resource, lookup }) => {
//!         println!("{resource} {lookup} not found");
//!     }
//!     Err(e) => println!("Other error: {e}"),
//! }
//! ```

use crate::clients::{HttpError, RestError, UploadError};
use thiserror::Error;

/// Error type for resource and query operations.
///
/// # Example
///
/// ```rust
/// use resolwe_sdk::rest::ResourceError;
///
/// let error = ResourceError::NotFound {
///     resource: "Sample",
///     lookup: "id=123".to_string(),
/// };
/// assert!(error.to_string().contains("Sample"));
/// assert!(error.to_string().contains("id=123"));
/// ```
#[derive(Debug, Error)]
pub enum ResourceError {
    /// The caller violated an argument contract. No request was sent.
    #[error("Invalid arguments: {reason}")]
    InvalidArguments {
        /// What was wrong.
        reason: String,
    },

    /// No object matched where one was required.
    #[error("{resource} not found ({lookup}). It does not exist or you do not have access to it.")]
    NotFound {
        /// The resource type name (e.g. "Sample").
        resource: &'static str,
        /// The identifier or criteria used.
        lookup: String,
    },

    /// Several objects matched where exactly one was required.
    #[error("{count} {resource} objects match {lookup}, expected exactly one")]
    AmbiguousResult {
        /// The resource type name.
        resource: &'static str,
        /// The criteria used.
        lookup: String,
        /// How many objects matched.
        count: usize,
    },

    /// The requested index lies beyond the end of the result set.
    #[error("Index {index} out of range")]
    IndexOutOfRange {
        /// The requested index.
        index: u64,
    },

    /// The field cannot be changed in the resource's current state.
    #[error("Cannot set {resource}.{field}: {reason}")]
    ImmutableField {
        /// The resource type name.
        resource: &'static str,
        /// The field name.
        field: String,
        /// Why the field is immutable.
        reason: &'static str,
    },

    /// The resource was deleted or never saved.
    #[error("{resource} is stale: {reason}")]
    StaleResource {
        /// The resource type name.
        resource: &'static str,
        /// What makes it stale.
        reason: &'static str,
    },

    /// The server answered with a 4xx/5xx status.
    #[error("Server rejected {resource} request with HTTP {status}: {message}")]
    ServerRejected {
        /// The resource type name.
        resource: &'static str,
        /// The HTTP status code.
        status: u16,
        /// The server's error message, verbatim.
        message: String,
    },

    /// A server payload could not be mapped onto the resource's fields.
    #[error("Invalid {resource} payload: {reason}")]
    InvalidPayload {
        /// The resource type name.
        resource: &'static str,
        /// The deserialization failure.
        reason: String,
    },

    /// A REST-level error occurred.
    #[error(transparent)]
    Rest(#[from] RestError),

    /// A file upload failed.
    #[error(transparent)]
    Upload(#[from] UploadError),
}

impl ResourceError {
    /// Maps a REST client error onto a resource error.
    ///
    /// A 404 answer becomes [`NotFound`](Self::NotFound) when `lookup` names
    /// what was requested. Any other non-2xx answer becomes
    /// [`ServerRejected`](Self::ServerRejected). Transport failures are
    /// wrapped unchanged.
    ///
    /// # Example
    ///
    /// ```rust
    /// use resolwe_sdk::clients::{HttpError, HttpResponseError, RestError};
    /// use resolwe_sdk::rest::ResourceError;
    ///
    /// let error = RestError::Http(HttpError::Response(HttpResponseError {
    ///     code: 404,
    ///     message: "Not found.".to_string(),
    /// }));
    /// let error = ResourceError::from_rest(error, "Data", Some("id=7".to_string()));
    /// assert!(matches!(error, ResourceError::NotFound { .. }));
    /// ```
    #[must_use]
    pub fn from_rest(error: RestError, resource: &'static str, lookup: Option<String>) -> Self {
        match error {
            RestError::Http(HttpError::Response(response)) => match (response.code, lookup) {
                (404, Some(lookup)) => Self::NotFound { resource, lookup },
                (status, _) => Self::ServerRejected {
                    resource,
                    status,
                    message: response.message,
                },
            },
            other => Self::Rest(other),
        }
    }

    /// Returns the HTTP status code, if the error came from a server answer.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::ServerRejected { status, .. } => Some(*status),
            Self::Rest(e) => e.status(),
            _ => None,
        }
    }

    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidArguments {
            reason: reason.into(),
        }
    }
}

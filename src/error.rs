//! Error types for SDK configuration.
//!
//! All configuration constructors return `Result<T, ConfigError>` so invalid
//! values are rejected before a connection is attempted.
//!
//! # Example
//!
//! ```rust
//! use resolwe_sdk::{ConfigError, Username};
//!
//! let result = Username::new("");
//! assert!(matches!(result, Err(ConfigError::EmptyUsername)));
//! ```

use thiserror::Error;

/// Errors that can occur while building a [`ResolweConfig`](crate::ResolweConfig).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The server URL is not an absolute `http`/`https` URL.
    #[error("Invalid server URL '{url}'. Expected an absolute URL such as 'https://app.genialis.com'.")]
    InvalidUrl {
        /// The rejected URL.
        url: String,
    },

    /// Username cannot be empty.
    #[error("Username cannot be empty. Omit credentials to connect anonymously.")]
    EmptyUsername,

    /// Password cannot be empty.
    #[error("Password cannot be empty.")]
    EmptyPassword,

    /// A required field is missing.
    #[error("Missing required field: '{field}'. This field must be set before building the configuration.")]
    MissingRequiredField {
        /// The name of the missing field.
        field: &'static str,
    },

    /// An environment variable holds a value that cannot be used.
    #[error("Invalid value in environment variable {name}: {reason}")]
    InvalidEnvironment {
        /// The variable name.
        name: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
}

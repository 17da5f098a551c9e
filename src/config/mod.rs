//! Configuration types for the Resolwe SDK.
//!
//! # Overview
//!
//! - [`ResolweConfig`]: all settings needed to open a connection
//! - [`ResolweConfigBuilder`]: a builder for [`ResolweConfig`]
//! - [`ServerUrl`], [`Username`], [`Password`]: validated newtypes
//! - [`UploadSettings`]: chunk size and retry bounds for file uploads
//!
//! # Example
//!
//! ```rust
//! use resolwe_sdk::{ResolweConfig, ServerUrl, Username, Password};
//!
//! let config = ResolweConfig::builder()
//!     .url(ServerUrl::new("https://app.genialis.com").unwrap())
//!     .credentials(Username::new("admin").unwrap(), Password::new("admin").unwrap())
//!     .build()
//!     .unwrap();
//! assert!(config.credentials().is_some());
//! ```

mod newtypes;

pub use newtypes::{Credentials, Password, ServerUrl, Username};

use std::time::Duration;

use crate::error::ConfigError;

/// Server used when neither the builder nor the environment names one.
pub const DEFAULT_URL: &str = "http://localhost:8000";

/// Environment variable holding the server URL.
pub const ENV_URL: &str = "RESOLWE_HOST_URL";
/// Environment variable holding the username.
pub const ENV_USERNAME: &str = "RESOLWE_API_USERNAME";
/// Environment variable holding the password.
pub const ENV_PASSWORD: &str = "RESOLWE_API_PASSWORD";

/// Chunking and retry settings for file uploads.
///
/// Only the upload path retries; every other request is attempted once.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UploadSettings {
    /// Size of each uploaded chunk in bytes.
    pub chunk_size: u64,
    /// Attempts per chunk before the whole upload fails.
    pub max_attempts: u32,
    /// Pause between attempts of the same chunk.
    pub retry_delay: Duration,
}

impl UploadSettings {
    /// Checks that chunks are non-empty and each chunk gets at least one attempt.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] for a zero chunk size or
    /// zero attempts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chunk_size == 0 {
            return Err(ConfigError::MissingRequiredField {
                field: "upload.chunk_size",
            });
        }
        if self.max_attempts == 0 {
            return Err(ConfigError::MissingRequiredField {
                field: "upload.max_attempts",
            });
        }
        Ok(())
    }
}

impl Default for UploadSettings {
    fn default() -> Self {
        Self {
            chunk_size: 8_000_000,
            max_attempts: 5,
            retry_delay: Duration::from_secs(2),
        }
    }
}

/// Configuration for a Resolwe connection.
///
/// `ResolweConfig` is `Clone`, `Send` and `Sync`.
#[derive(Clone, Debug)]
pub struct ResolweConfig {
    url: ServerUrl,
    credentials: Option<Credentials>,
    user_agent_prefix: Option<String>,
    timeout: Option<Duration>,
    upload: UploadSettings,
}

impl ResolweConfig {
    /// Creates a new builder.
    #[must_use]
    pub fn builder() -> ResolweConfigBuilder {
        ResolweConfigBuilder::new()
    }

    /// Builds a configuration from `RESOLWE_HOST_URL`, `RESOLWE_API_USERNAME`
    /// and `RESOLWE_API_PASSWORD`.
    ///
    /// The URL defaults to [`DEFAULT_URL`]. Credentials are used only when
    /// both username and password are present.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEnvironment`] if a variable holds an
    /// unusable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let url_value = lookup(ENV_URL).unwrap_or_else(|| DEFAULT_URL.to_string());
        let url = ServerUrl::new(url_value).map_err(|e| ConfigError::InvalidEnvironment {
            name: ENV_URL,
            reason: e.to_string(),
        })?;

        let mut builder = Self::builder().url(url);

        if let (Some(username), Some(password)) = (lookup(ENV_USERNAME), lookup(ENV_PASSWORD)) {
            let username = Username::new(username).map_err(|e| ConfigError::InvalidEnvironment {
                name: ENV_USERNAME,
                reason: e.to_string(),
            })?;
            let password = Password::new(password).map_err(|e| ConfigError::InvalidEnvironment {
                name: ENV_PASSWORD,
                reason: e.to_string(),
            })?;
            builder = builder.credentials(username, password);
        }

        builder.build()
    }

    /// Returns the server URL.
    #[must_use]
    pub const fn url(&self) -> &ServerUrl {
        &self.url
    }

    /// Returns the login credentials, if any.
    ///
    /// `None` means the connection is anonymous (public objects only).
    #[must_use]
    pub const fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    /// Returns the user agent prefix, if configured.
    #[must_use]
    pub fn user_agent_prefix(&self) -> Option<&str> {
        self.user_agent_prefix.as_deref()
    }

    /// Returns the per-request timeout, if configured.
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Returns the upload settings.
    #[must_use]
    pub const fn upload(&self) -> &UploadSettings {
        &self.upload
    }
}

// Verify ResolweConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ResolweConfig>();
};

/// Builder for [`ResolweConfig`].
///
/// # Defaults
///
/// - `url`: required
/// - `credentials`: `None` (anonymous)
/// - `timeout`: `None` (no client-side timeout)
/// - `upload`: [`UploadSettings::default()`]
#[derive(Debug, Default)]
pub struct ResolweConfigBuilder {
    url: Option<ServerUrl>,
    credentials: Option<Credentials>,
    user_agent_prefix: Option<String>,
    timeout: Option<Duration>,
    upload: Option<UploadSettings>,
}

impl ResolweConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the server URL (required).
    #[must_use]
    pub fn url(mut self, url: ServerUrl) -> Self {
        self.url = Some(url);
        self
    }

    /// Sets the login credentials.
    #[must_use]
    pub fn credentials(mut self, username: Username, password: Password) -> Self {
        self.credentials = Some(Credentials::new(username, password));
        self
    }

    /// Sets the user agent prefix for HTTP requests.
    #[must_use]
    pub fn user_agent_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.user_agent_prefix = Some(prefix.into());
        self
    }

    /// Sets a timeout applied to every HTTP request.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Overrides the upload settings.
    #[must_use]
    pub const fn upload(mut self, upload: UploadSettings) -> Self {
        self.upload = Some(upload);
        self
    }

    /// Builds the [`ResolweConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] if `url` is not set or if
    /// the upload settings have a zero chunk size or zero attempts.
    pub fn build(self) -> Result<ResolweConfig, ConfigError> {
        let url = self
            .url
            .ok_or(ConfigError::MissingRequiredField { field: "url" })?;

        let upload = self.upload.unwrap_or_default();
        upload.validate()?;

        Ok(ResolweConfig {
            url,
            credentials: self.credentials,
            user_agent_prefix: self.user_agent_prefix,
            timeout: self.timeout,
            upload,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn url() -> ServerUrl {
        ServerUrl::new("http://localhost:8000").unwrap()
    }

    #[test]
    fn test_builder_requires_url() {
        let result = ResolweConfigBuilder::new().build();
        assert!(matches!(
            result,
            Err(ConfigError::MissingRequiredField { field: "url" })
        ));
    }

    #[test]
    fn test_builder_provides_sensible_defaults() {
        let config = ResolweConfig::builder().url(url()).build().unwrap();

        assert!(config.credentials().is_none());
        assert!(config.timeout().is_none());
        assert!(config.user_agent_prefix().is_none());
        assert_eq!(config.upload(), &UploadSettings::default());
        assert_eq!(config.upload().max_attempts, 5);
        assert_eq!(config.upload().chunk_size, 8_000_000);
    }

    #[test]
    fn test_builder_with_all_optional_fields() {
        let config = ResolweConfig::builder()
            .url(url())
            .credentials(Username::new("admin").unwrap(), Password::new("pw").unwrap())
            .user_agent_prefix("pipeline/1.0")
            .timeout(Duration::from_secs(30))
            .upload(UploadSettings {
                chunk_size: 1024,
                max_attempts: 3,
                retry_delay: Duration::ZERO,
            })
            .build()
            .unwrap();

        assert_eq!(
            config.credentials().map(|c| c.username.as_ref()),
            Some("admin")
        );
        assert_eq!(config.user_agent_prefix(), Some("pipeline/1.0"));
        assert_eq!(config.timeout(), Some(Duration::from_secs(30)));
        assert_eq!(config.upload().chunk_size, 1024);
    }

    #[test]
    fn test_upload_settings_validate() {
        assert!(UploadSettings::default().validate().is_ok());
        assert!(matches!(
            UploadSettings {
                max_attempts: 0,
                ..UploadSettings::default()
            }
            .validate(),
            Err(ConfigError::MissingRequiredField {
                field: "upload.max_attempts"
            })
        ));
    }

    #[test]
    fn test_builder_rejects_zero_chunk_size() {
        let result = ResolweConfig::builder()
            .url(url())
            .upload(UploadSettings {
                chunk_size: 0,
                ..UploadSettings::default()
            })
            .build();
        assert!(matches!(
            result,
            Err(ConfigError::MissingRequiredField {
                field: "upload.chunk_size"
            })
        ));
    }

    #[test]
    fn test_from_lookup_defaults_to_localhost() {
        let config = ResolweConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.url().as_ref(), DEFAULT_URL);
        assert!(config.credentials().is_none());
    }

    #[test]
    fn test_from_lookup_reads_credentials_pair() {
        let env: HashMap<&str, &str> = [
            (ENV_URL, "https://app.genialis.com"),
            (ENV_USERNAME, "admin"),
            (ENV_PASSWORD, "secret"),
        ]
        .into_iter()
        .collect();

        let config =
            ResolweConfig::from_lookup(|name| env.get(name).map(ToString::to_string)).unwrap();

        assert_eq!(config.url().as_ref(), "https://app.genialis.com");
        assert!(config.credentials().is_some());
    }

    #[test]
    fn test_from_lookup_ignores_username_without_password() {
        let config = ResolweConfig::from_lookup(|name| {
            (name == ENV_USERNAME).then(|| "admin".to_string())
        })
        .unwrap();
        assert!(config.credentials().is_none());
    }

    #[test]
    fn test_from_lookup_reports_bad_url() {
        let result =
            ResolweConfig::from_lookup(|name| (name == ENV_URL).then(|| "nowhere".to_string()));
        assert!(matches!(
            result,
            Err(ConfigError::InvalidEnvironment { name: ENV_URL, .. })
        ));
    }

    #[test]
    fn test_config_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ResolweConfig>();
    }
}

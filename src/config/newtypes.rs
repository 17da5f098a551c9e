//! Validated newtype wrappers for configuration values.
//!
//! These wrappers validate their contents on construction so that a built
//! [`ResolweConfig`](crate::ResolweConfig) never carries an unusable value.

use crate::error::ConfigError;
use std::fmt;

/// A validated Resolwe server URL.
///
/// Accepts absolute `http://` and `https://` URLs. Trailing slashes are
/// stripped so paths can be joined with a single `/`.
///
/// # Example
///
/// ```rust
/// use resolwe_sdk::ServerUrl;
///
/// let url = ServerUrl::new("https://app.genialis.com/").unwrap();
/// assert_eq!(url.as_ref(), "https://app.genialis.com");
/// assert_eq!(url.host(), "app.genialis.com");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerUrl(String);

impl ServerUrl {
    /// Creates a new validated server URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidUrl`] if the scheme is not `http` or
    /// `https`, or if the host part is empty.
    pub fn new(url: impl Into<String>) -> Result<Self, ConfigError> {
        let url = url.into();
        let trimmed = url.trim().trim_end_matches('/');

        let rest = trimmed
            .strip_prefix("https://")
            .or_else(|| trimmed.strip_prefix("http://"))
            .ok_or_else(|| ConfigError::InvalidUrl { url: url.clone() })?;

        let host = rest.split('/').next().unwrap_or_default();
        if host.is_empty() || host.contains(char::is_whitespace) {
            return Err(ConfigError::InvalidUrl { url });
        }

        Ok(Self(trimmed.to_string()))
    }

    /// Returns the host (and port, if any) portion of the URL.
    #[must_use]
    pub fn host(&self) -> &str {
        let rest = self
            .0
            .strip_prefix("https://")
            .or_else(|| self.0.strip_prefix("http://"))
            .unwrap_or(&self.0);
        rest.split('/').next().unwrap_or(rest)
    }

    /// Joins a relative path onto the URL.
    #[must_use]
    pub fn join(&self, path: &str) -> String {
        format!("{}/{}", self.0, path.trim_start_matches('/'))
    }
}

impl AsRef<str> for ServerUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ServerUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A validated, non-empty username.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Username(String);

impl Username {
    /// Creates a new validated username.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyUsername`] if the username is empty.
    pub fn new(username: impl Into<String>) -> Result<Self, ConfigError> {
        let username = username.into();
        if username.trim().is_empty() {
            return Err(ConfigError::EmptyUsername);
        }
        Ok(Self(username))
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A validated, non-empty password.
///
/// The `Debug` implementation masks the value, displaying only
/// `Password(*****)`.
///
/// ```rust
/// use resolwe_sdk::Password;
///
/// let password = Password::new("hunter2").unwrap();
/// assert_eq!(format!("{:?}", password), "Password(*****)");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    /// Creates a new validated password.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyPassword`] if the password is empty.
    pub fn new(password: impl Into<String>) -> Result<Self, ConfigError> {
        let password = password.into();
        if password.is_empty() {
            return Err(ConfigError::EmptyPassword);
        }
        Ok(Self(password))
    }
}

impl AsRef<str> for Password {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(*****)")
    }
}

/// Username and password used for the login handshake.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Credentials {
    /// The account username.
    pub username: Username,
    /// The account password.
    pub password: Password,
}

impl Credentials {
    /// Creates a credential pair.
    #[must_use]
    pub const fn new(username: Username, password: Password) -> Self {
        Self { username, password }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_url_accepts_http_and_https() {
        assert!(ServerUrl::new("http://localhost:8000").is_ok());
        assert!(ServerUrl::new("https://app.genialis.com").is_ok());
    }

    #[test]
    fn test_server_url_strips_trailing_slashes() {
        let url = ServerUrl::new("http://localhost:8000//").unwrap();
        assert_eq!(url.as_ref(), "http://localhost:8000");
    }

    #[test]
    fn test_server_url_rejects_other_schemes() {
        assert!(matches!(
            ServerUrl::new("ftp://example.com"),
            Err(ConfigError::InvalidUrl { .. })
        ));
        assert!(matches!(
            ServerUrl::new("localhost:8000"),
            Err(ConfigError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn test_server_url_rejects_empty_host() {
        assert!(matches!(
            ServerUrl::new("https://"),
            Err(ConfigError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn test_server_url_host_includes_port() {
        let url = ServerUrl::new("http://127.0.0.1:8000/").unwrap();
        assert_eq!(url.host(), "127.0.0.1:8000");
    }

    #[test]
    fn test_server_url_join() {
        let url = ServerUrl::new("http://localhost:8000").unwrap();
        assert_eq!(url.join("/api/data/"), "http://localhost:8000/api/data/");
        assert_eq!(url.join("upload/"), "http://localhost:8000/upload/");
    }

    #[test]
    fn test_username_rejects_blank() {
        assert!(matches!(Username::new(""), Err(ConfigError::EmptyUsername)));
        assert!(matches!(Username::new("   "), Err(ConfigError::EmptyUsername)));
        assert_eq!(Username::new("admin").unwrap().as_ref(), "admin");
    }

    #[test]
    fn test_password_debug_is_masked() {
        let password = Password::new("secret").unwrap();
        let debug = format!("{password:?}");
        assert!(!debug.contains("secret"));
        assert_eq!(debug, "Password(*****)");
    }

    #[test]
    fn test_password_rejects_empty() {
        assert!(matches!(Password::new(""), Err(ConfigError::EmptyPassword)));
    }
}

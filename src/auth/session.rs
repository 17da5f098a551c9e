//! Login session state.
//!
//! This module provides the [`AuthSession`] type holding the cookies the
//! server issues on a successful login.

use std::fmt;

/// Name of the session cookie set by the server.
pub const SESSION_COOKIE: &str = "sessionid";
/// Name of the CSRF cookie set by the server.
pub const CSRF_COOKIE: &str = "csrftoken";

/// An authenticated Resolwe session.
///
/// Holds the `sessionid` and `csrftoken` cookie values returned by the login
/// endpoint. The `Debug` implementation masks both values.
///
/// # Example
///
/// ```rust
/// use resolwe_sdk::AuthSession;
///
/// let session = AuthSession::new("abc", "xyz");
/// assert_eq!(session.cookie_header(), "sessionid=abc; csrftoken=xyz");
/// assert!(!format!("{session:?}").contains("abc"));
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct AuthSession {
    session_id: String,
    csrf_token: String,
}

impl AuthSession {
    /// Creates a session from the two cookie values.
    #[must_use]
    pub fn new(session_id: impl Into<String>, csrf_token: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            csrf_token: csrf_token.into(),
        }
    }

    /// Returns the session cookie value.
    #[must_use]
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Returns the CSRF token.
    #[must_use]
    pub fn csrf_token(&self) -> &str {
        &self.csrf_token
    }

    /// Returns the value of the `Cookie` request header for this session.
    #[must_use]
    pub fn cookie_header(&self) -> String {
        format!(
            "{SESSION_COOKIE}={}; {CSRF_COOKIE}={}",
            self.session_id, self.csrf_token
        )
    }
}

impl fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthSession")
            .field("session_id", &"*****")
            .field("csrf_token", &"*****")
            .finish()
    }
}

// Verify AuthSession is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<AuthSession>();
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cookie_header_contains_both_cookies() {
        let session = AuthSession::new("s1", "c1");
        assert_eq!(session.cookie_header(), "sessionid=s1; csrftoken=c1");
        assert_eq!(session.session_id(), "s1");
        assert_eq!(session.csrf_token(), "c1");
    }

    #[test]
    fn test_debug_masks_values() {
        let session = AuthSession::new("secret-session", "secret-token");
        let debug = format!("{session:?}");
        assert!(!debug.contains("secret-session"));
        assert!(!debug.contains("secret-token"));
        assert!(debug.contains("AuthSession"));
    }
}

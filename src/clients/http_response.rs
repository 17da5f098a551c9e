//! HTTP response types for the Resolwe SDK.
//!
//! This module provides the [`HttpResponse`] type for accessing status,
//! headers and the parsed JSON body of a server response.

use std::collections::HashMap;

/// An HTTP response from the Resolwe server.
///
/// Header names are stored lowercase. A header may carry several values
/// (`Set-Cookie` in particular).
#[derive(Clone, Debug)]
pub struct HttpResponse {
    /// The HTTP status code.
    pub code: u16,
    /// Response headers (headers may have multiple values).
    pub headers: HashMap<String, Vec<String>>,
    /// The parsed response body. Empty bodies are `Value::Null`.
    pub body: serde_json::Value,
}

impl HttpResponse {
    /// Creates a new `HttpResponse`.
    #[must_use]
    pub const fn new(
        code: u16,
        headers: HashMap<String, Vec<String>>,
        body: serde_json::Value,
    ) -> Self {
        Self {
            code,
            headers,
            body,
        }
    }

    /// Returns `true` if the response status code is in the 2xx range.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.code >= 200 && self.code <= 299
    }

    /// Returns the first value of a header, if present.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Returns the value of a cookie set by this response.
    ///
    /// Scans every `Set-Cookie` header and returns the value of the first
    /// cookie named `name`, ignoring attributes such as `Path` or `HttpOnly`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use resolwe_sdk::HttpResponse;
    /// use std::collections::HashMap;
    /// use serde_json::json;
    ///
    /// let mut headers = HashMap::new();
    /// headers.insert(
    ///     "set-cookie".to_string(),
    ///     vec!["sessionid=abc; Path=/; HttpOnly".to_string()],
    /// );
    /// let response = HttpResponse::new(200, headers, json!({}));
    /// assert_eq!(response.cookie("sessionid"), Some("abc"));
    /// ```
    #[must_use]
    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.headers
            .get("set-cookie")?
            .iter()
            .filter_map(|header| header.split(';').next())
            .filter_map(|pair| pair.split_once('='))
            .find(|(key, _)| key.trim() == name)
            .map(|(_, value)| value.trim())
    }

    /// Returns the error detail reported by the server, if any.
    ///
    /// Django REST Framework reports errors as `{"detail": "..."}`.
    #[must_use]
    pub fn detail(&self) -> Option<&str> {
        self.body.get("detail").and_then(serde_json::Value::as_str)
    }
}

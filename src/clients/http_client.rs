//! HTTP client for Resolwe server communication.
//!
//! This module provides the [`HttpClient`] type for making requests to a
//! Resolwe server, optionally authenticated with a login session.

use std::collections::HashMap;

use crate::auth::AuthSession;
use crate::clients::errors::{HttpError, HttpResponseError};
use crate::clients::http_request::{HttpMethod, HttpRequest};
use crate::clients::http_response::HttpResponse;
use crate::config::ResolweConfig;

/// SDK version from Cargo.toml.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// HTTP client for making requests to a Resolwe server.
///
/// The client handles:
/// - URL construction from the configured server URL
/// - Default headers including User-Agent and, after login, the session
///   cookie, CSRF token and Referer
/// - JSON body encoding and response parsing
///
/// Requests are attempted exactly once. Only the chunked upload path retries.
///
/// # Thread Safety
///
/// `HttpClient` is `Send + Sync`, making it safe to share across async tasks.
///
/// # Example
///
/// ```rust,ignore
/// use resolwe_sdk::{HttpClient, HttpRequest, HttpMethod, ResolweConfig, ServerUrl};
///
/// let config = ResolweConfig::builder()
///     .url(ServerUrl::new("http://localhost:8000")?)
///     .build()?;
/// let client = HttpClient::new(&config)?;
///
/// let request = HttpRequest::builder(HttpMethod::Get, "api/data/").build()?;
/// let response = client.request(request).await?;
/// ```
#[derive(Debug, Clone)]
pub struct HttpClient {
    /// The internal reqwest HTTP client.
    client: reqwest::Client,
    /// Server URL without a trailing slash.
    base_uri: String,
    /// Default headers to include in all requests.
    default_headers: HashMap<String, String>,
}

// Verify HttpClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpClient>();
};

impl HttpClient {
    /// Creates a new anonymous HTTP client for the configured server.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Network`] if the underlying reqwest client cannot
    /// be created (e.g. TLS initialization failure).
    pub fn new(config: &ResolweConfig) -> Result<Self, HttpError> {
        let user_agent_prefix = config
            .user_agent_prefix()
            .map_or(String::new(), |prefix| format!("{prefix} | "));
        let rust_version = env!("CARGO_PKG_RUST_VERSION");
        let user_agent =
            format!("{user_agent_prefix}Resolwe SDK for Rust v{SDK_VERSION} | Rust {rust_version}");

        let mut default_headers = HashMap::new();
        default_headers.insert("User-Agent".to_string(), user_agent);
        default_headers.insert("Accept".to_string(), "application/json".to_string());

        let mut builder = reqwest::Client::builder().use_rustls_tls();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            base_uri: config.url().to_string(),
            default_headers,
        })
    }

    /// Returns a client that sends the session cookie and CSRF headers
    /// with every request.
    #[must_use]
    pub fn with_session(mut self, session: &AuthSession) -> Self {
        self.default_headers
            .insert("Cookie".to_string(), session.cookie_header());
        self.default_headers
            .insert("X-CSRFToken".to_string(), session.csrf_token().to_string());
        self.default_headers
            .insert("Referer".to_string(), self.base_uri.clone());
        self
    }

    /// Returns the base URI for this client.
    #[must_use]
    pub fn base_uri(&self) -> &str {
        &self.base_uri
    }

    /// Returns the default headers for this client.
    #[must_use]
    pub const fn default_headers(&self) -> &HashMap<String, String> {
        &self.default_headers
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_uri, path.trim_start_matches('/'))
    }

    fn apply_headers(
        &self,
        mut req_builder: reqwest::RequestBuilder,
        extra: Option<&HashMap<String, String>>,
    ) -> reqwest::RequestBuilder {
        for (key, value) in &self.default_headers {
            req_builder = req_builder.header(key, value);
        }
        if let Some(extra) = extra {
            for (key, value) in extra {
                req_builder = req_builder.header(key, value);
            }
        }
        req_builder
    }

    /// Sends an HTTP request to the server.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if:
    /// - Request validation fails (`InvalidRequest`)
    /// - Network error occurs (`Network`)
    /// - Non-2xx response received (`Response`)
    pub async fn request(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
        request.verify()?;

        let url = self.url(&request.path);

        let req_builder = match request.http_method {
            HttpMethod::Get => self.client.get(&url),
            HttpMethod::Post => self.client.post(&url),
            HttpMethod::Patch => self.client.patch(&url),
            HttpMethod::Delete => self.client.delete(&url),
        };
        let mut req_builder = self.apply_headers(req_builder, request.extra_headers.as_ref());

        if let Some(body_type) = &request.body_type {
            req_builder = req_builder.header("Content-Type", body_type.as_content_type());
        }
        if !request.query.is_empty() {
            req_builder = req_builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            req_builder = req_builder.body(body.to_string());
        }

        tracing::trace!(method = %request.http_method, %url, "sending request");
        let res = req_builder.send().await?;
        Self::finish(res).await
    }

    /// Sends a `multipart/form-data` POST request.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Network`] on connection failure and
    /// [`HttpError::Response`] for non-2xx responses.
    pub async fn send_multipart(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
        extra_headers: &HashMap<String, String>,
    ) -> Result<HttpResponse, HttpError> {
        let url = self.url(path);
        let req_builder = self
            .apply_headers(self.client.post(&url), Some(extra_headers))
            .multipart(form);

        tracing::trace!(%url, "sending multipart request");
        let res = req_builder.send().await?;
        Self::finish(res).await
    }

    async fn finish(res: reqwest::Response) -> Result<HttpResponse, HttpError> {
        let code = res.status().as_u16();
        let headers = Self::parse_response_headers(res.headers());
        let body_text = res.text().await?;

        let body = if body_text.trim().is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_str(&body_text)
                .unwrap_or_else(|_| serde_json::Value::String(body_text))
        };

        let response = HttpResponse::new(code, headers, body);
        if response.is_ok() {
            return Ok(response);
        }

        Err(HttpError::Response(HttpResponseError {
            code,
            message: Self::error_message(&response),
        }))
    }

    /// Parses response headers into a `HashMap`.
    fn parse_response_headers(
        headers: &reqwest::header::HeaderMap,
    ) -> HashMap<String, Vec<String>> {
        let mut result: HashMap<String, Vec<String>> = HashMap::new();
        for (name, value) in headers {
            let key = name.as_str().to_lowercase();
            let value = value.to_str().unwrap_or_default().to_string();
            result.entry(key).or_default().push(value);
        }
        result
    }

    fn error_message(response: &HttpResponse) -> String {
        if let Some(detail) = response.detail() {
            return detail.to_string();
        }
        match &response.body {
            serde_json::Value::String(text) => text.clone(),
            serde_json::Value::Null => String::new(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServerUrl;
    use serde_json::json;

    fn config() -> ResolweConfig {
        ResolweConfig::builder()
            .url(ServerUrl::new("http://localhost:8000/").unwrap())
            .build()
            .unwrap()
    }

    #[test]
    fn test_client_construction() {
        let client = HttpClient::new(&config()).unwrap();
        assert_eq!(client.base_uri(), "http://localhost:8000");
        assert_eq!(client.url("/api/data/"), "http://localhost:8000/api/data/");
    }

    #[test]
    fn test_user_agent_header_format() {
        let client = HttpClient::new(&config()).unwrap();

        let user_agent = client.default_headers().get("User-Agent").unwrap();
        assert!(user_agent.contains("Resolwe SDK for Rust v"));
        assert!(user_agent.contains("Rust"));
    }

    #[test]
    fn test_user_agent_with_prefix() {
        let config = ResolweConfig::builder()
            .url(ServerUrl::new("http://localhost:8000").unwrap())
            .user_agent_prefix("MyPipeline/1.0")
            .build()
            .unwrap();
        let client = HttpClient::new(&config).unwrap();

        let user_agent = client.default_headers().get("User-Agent").unwrap();
        assert!(user_agent.starts_with("MyPipeline/1.0 | "));
    }

    #[test]
    fn test_anonymous_client_has_no_session_headers() {
        let client = HttpClient::new(&config()).unwrap();
        assert!(client.default_headers().get("Cookie").is_none());
        assert!(client.default_headers().get("X-CSRFToken").is_none());
    }

    #[test]
    fn test_with_session_adds_cookie_and_csrf_headers() {
        let session = AuthSession::new("sess", "tok");
        let client = HttpClient::new(&config()).unwrap().with_session(&session);

        assert_eq!(
            client.default_headers().get("Cookie"),
            Some(&"sessionid=sess; csrftoken=tok".to_string())
        );
        assert_eq!(
            client.default_headers().get("X-CSRFToken"),
            Some(&"tok".to_string())
        );
        assert_eq!(
            client.default_headers().get("Referer"),
            Some(&"http://localhost:8000".to_string())
        );
    }

    #[test]
    fn test_error_message_prefers_detail() {
        let response = HttpResponse::new(404, HashMap::new(), json!({"detail": "Not found."}));
        assert_eq!(HttpClient::error_message(&response), "Not found.");

        let response = HttpResponse::new(500, HashMap::new(), json!("Server Error"));
        assert_eq!(HttpClient::error_message(&response), "Server Error");

        let response = HttpResponse::new(400, HashMap::new(), json!({"name": ["required"]}));
        assert_eq!(
            HttpClient::error_message(&response),
            r#"{"name":["required"]}"#
        );
    }

    #[test]
    fn test_client_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<HttpClient>();
    }
}

//! REST client implementation for the Resolwe API.
//!
//! This module provides the [`RestClient`] type for making requests under
//! the server's `api/` prefix with path normalization and list-body parsing.

use serde_json::Value;

use crate::clients::rest::RestError;
use crate::clients::{DataType, HttpClient, HttpMethod, HttpRequest, HttpResponse};

/// Path prefix of every REST endpoint.
pub const API_PREFIX: &str = "api";

/// REST API client for a Resolwe server.
///
/// Provides `get`, `post`, `patch` and `delete` for raw responses plus the
/// record-level helpers used by resources and queries: [`list`](Self::list),
/// [`search`](Self::search), [`get_one`](Self::get_one),
/// [`create`](Self::create), [`update`](Self::update) and
/// [`destroy`](Self::destroy).
///
/// # Thread Safety
///
/// `RestClient` is `Send + Sync`, making it safe to share across async tasks.
///
/// # Example
///
/// ```rust,ignore
/// use resolwe_sdk::{HttpClient, RestClient};
///
/// let client = RestClient::new(HttpClient::new(&config)?);
///
/// let records = client
///     .list("data", vec![("slug".to_string(), "reads".to_string())])
///     .await?;
/// ```
#[derive(Debug, Clone)]
pub struct RestClient {
    /// The internal HTTP client for making requests.
    http_client: HttpClient,
}

// Verify RestClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<RestClient>();
};

impl RestClient {
    /// Creates a new REST client on top of an HTTP client.
    #[must_use]
    pub const fn new(http_client: HttpClient) -> Self {
        Self { http_client }
    }

    /// Returns the underlying HTTP client.
    #[must_use]
    pub const fn http_client(&self) -> &HttpClient {
        &self.http_client
    }

    /// Sends a GET request to the specified path.
    ///
    /// # Errors
    ///
    /// Returns [`RestError::InvalidPath`] if the path is invalid (e.g., empty).
    /// Returns [`RestError::Http`] for HTTP-level errors.
    pub async fn get(
        &self,
        path: &str,
        query: Vec<(String, String)>,
    ) -> Result<HttpResponse, RestError> {
        self.make_request(HttpMethod::Get, path, None, query).await
    }

    /// Sends a POST request with a JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`RestError::InvalidPath`] if the path is invalid.
    /// Returns [`RestError::Http`] for HTTP-level errors.
    pub async fn post(&self, path: &str, body: Value) -> Result<HttpResponse, RestError> {
        self.make_request(HttpMethod::Post, path, Some(body), Vec::new())
            .await
    }

    /// Sends a PATCH request with a JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`RestError::InvalidPath`] if the path is invalid.
    /// Returns [`RestError::Http`] for HTTP-level errors.
    pub async fn patch(&self, path: &str, body: Value) -> Result<HttpResponse, RestError> {
        self.make_request(HttpMethod::Patch, path, Some(body), Vec::new())
            .await
    }

    /// Sends a DELETE request to the specified path.
    ///
    /// # Errors
    ///
    /// Returns [`RestError::InvalidPath`] if the path is invalid.
    /// Returns [`RestError::Http`] for HTTP-level errors.
    pub async fn delete(&self, path: &str) -> Result<HttpResponse, RestError> {
        self.make_request(HttpMethod::Delete, path, None, Vec::new())
            .await
    }

    /// Lists records of an endpoint with a GET request.
    ///
    /// Accepts both a bare JSON array and a paginated `{"results": [...]}` body.
    ///
    /// # Errors
    ///
    /// Returns [`RestError::UnexpectedResponse`] if the body holds no list.
    pub async fn list(
        &self,
        endpoint: &str,
        query: Vec<(String, String)>,
    ) -> Result<Vec<Value>, RestError> {
        let response = self.get(endpoint, query).await?;
        records(response.body)
    }

    /// Lists records of a search endpoint with a POST request.
    ///
    /// # Errors
    ///
    /// Returns [`RestError::UnexpectedResponse`] if the body holds no list.
    pub async fn search(&self, endpoint: &str, body: Value) -> Result<Vec<Value>, RestError> {
        let response = self.post(endpoint, body).await?;
        records(response.body)
    }

    /// Fetches a single record by id.
    ///
    /// # Errors
    ///
    /// Returns [`RestError::Http`] with status 404 if no such record exists.
    pub async fn get_one(&self, endpoint: &str, id: u64) -> Result<Value, RestError> {
        let response = self.get(&detail_path(endpoint, id), Vec::new()).await?;
        object(response.body)
    }

    /// Creates a record and returns the server's representation of it.
    ///
    /// # Errors
    ///
    /// Returns [`RestError::Http`] if the server rejects the payload.
    pub async fn create(&self, endpoint: &str, payload: Value) -> Result<Value, RestError> {
        let response = self.post(endpoint, payload).await?;
        object(response.body)
    }

    /// Partially updates a record and returns the server's representation of it.
    ///
    /// # Errors
    ///
    /// Returns [`RestError::Http`] if the server rejects the payload.
    pub async fn update(
        &self,
        endpoint: &str,
        id: u64,
        payload: Value,
    ) -> Result<Value, RestError> {
        let response = self.patch(&detail_path(endpoint, id), payload).await?;
        object(response.body)
    }

    /// Deletes a record.
    ///
    /// # Errors
    ///
    /// Returns [`RestError::Http`] if the server refuses the deletion.
    pub async fn destroy(&self, endpoint: &str, id: u64) -> Result<(), RestError> {
        self.delete(&detail_path(endpoint, id)).await?;
        Ok(())
    }

    async fn make_request(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<Value>,
        query: Vec<(String, String)>,
    ) -> Result<HttpResponse, RestError> {
        let normalized_path = normalize_path(path)?;

        let mut builder =
            HttpRequest::builder(method, format!("{API_PREFIX}/{normalized_path}")).query(query);

        if let Some(body_value) = body {
            builder = builder.body(body_value).body_type(DataType::Json);
        }

        let request = builder.build().map_err(|e| RestError::Http(e.into()))?;

        self.http_client.request(request).await.map_err(Into::into)
    }
}

/// Builds the detail path of a record.
fn detail_path(endpoint: &str, id: u64) -> String {
    format!("{}/{id}", endpoint.trim_end_matches('/'))
}

/// Normalizes a REST API path.
///
/// Strips leading `/` characters, ensures exactly one trailing `/`, and
/// rejects paths that are empty after stripping.
///
/// ```rust,ignore
/// assert_eq!(normalize_path("data")?, "data/");
/// assert_eq!(normalize_path("/data/42/")?, "data/42/");
/// ```
fn normalize_path(path: &str) -> Result<String, RestError> {
    let trimmed = path.trim_matches('/');

    if trimmed.is_empty() {
        return Err(RestError::InvalidPath {
            path: path.to_string(),
        });
    }

    Ok(format!("{trimmed}/"))
}

/// Extracts the list of records from a list or search body.
fn records(body: Value) -> Result<Vec<Value>, RestError> {
    match body {
        Value::Array(items) => Ok(items),
        Value::Object(mut map) => match map.remove("results") {
            Some(Value::Array(items)) => Ok(items),
            _ => Err(RestError::UnexpectedResponse {
                reason: "expected a list or an object with 'results'".to_string(),
            }),
        },
        _ => Err(RestError::UnexpectedResponse {
            reason: "expected a list or an object with 'results'".to_string(),
        }),
    }
}

fn object(body: Value) -> Result<Value, RestError> {
    if body.is_object() {
        Ok(body)
    } else {
        Err(RestError::UnexpectedResponse {
            reason: "expected a JSON object".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // === Path Normalization Tests ===

    #[test]
    fn test_normalize_path_strips_leading_slash_and_adds_trailing() {
        assert_eq!(normalize_path("/data").unwrap(), "data/");
        assert_eq!(normalize_path("data/42").unwrap(), "data/42/");
        assert_eq!(normalize_path("/kb/feature/search/").unwrap(), "kb/feature/search/");
    }

    #[test]
    fn test_normalize_path_handles_double_slashes() {
        assert_eq!(normalize_path("//data//").unwrap(), "data/");
    }

    #[test]
    fn test_normalize_path_empty_path_returns_error() {
        assert!(matches!(
            normalize_path(""),
            Err(RestError::InvalidPath { path }) if path.is_empty()
        ));
        assert!(matches!(
            normalize_path("/"),
            Err(RestError::InvalidPath { .. })
        ));
    }

    #[test]
    fn test_detail_path() {
        assert_eq!(detail_path("data", 42), "data/42");
        assert_eq!(detail_path("kb/feature/", 7), "kb/feature/7");
    }

    // === Body Parsing Tests ===

    #[test]
    fn test_records_accepts_bare_array() {
        let items = records(json!([{"id": 1}, {"id": 2}])).unwrap();
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn test_records_accepts_paginated_object() {
        let items = records(json!({"count": 3, "results": [{"id": 1}]})).unwrap();
        assert_eq!(items, vec![json!({"id": 1})]);
    }

    #[test]
    fn test_records_rejects_other_shapes() {
        assert!(matches!(
            records(json!({"id": 1})),
            Err(RestError::UnexpectedResponse { .. })
        ));
        assert!(matches!(
            records(Value::Null),
            Err(RestError::UnexpectedResponse { .. })
        ));
    }

    #[test]
    fn test_object_rejects_non_objects() {
        assert!(object(json!({"id": 1})).is_ok());
        assert!(object(json!([1])).is_err());
    }

    #[test]
    fn test_rest_client_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RestClient>();
    }
}

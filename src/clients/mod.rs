//! HTTP client types for Resolwe server communication.
//!
//! This module provides the transport layer used by resources and queries.
//!
//! # Overview
//!
//! - [`HttpClient`]: The async HTTP client
//! - [`HttpRequest`]: A request to be sent to the server
//! - [`HttpResponse`]: A parsed response from the server
//! - [`HttpMethod`]: Supported HTTP methods (GET, POST, PATCH, DELETE)
//! - [`DataType`]: Content types for request bodies
//! - [`rest::RestClient`]: Record-level REST API client
//! - [`rest::RestError`]: REST-specific error types
//! - [`ChunkedUploader`]: Chunked file upload with bounded retry
//!
//! # Retry Behavior
//!
//! Regular requests are attempted once and every failure is returned to the
//! caller. Only [`ChunkedUploader`] retries, per chunk, up to
//! [`UploadSettings::max_attempts`](crate::UploadSettings::max_attempts).

mod errors;
mod http_client;
mod http_request;
mod http_response;
pub mod rest;
mod upload;

pub use errors::{HttpError, HttpResponseError, InvalidHttpRequestError, UploadError};
pub use http_client::{HttpClient, SDK_VERSION};
pub use http_request::{DataType, HttpMethod, HttpRequest, HttpRequestBuilder};
pub use http_response::HttpResponse;
pub use upload::{ChunkedUploader, UPLOAD_PATH};

pub use rest::{RestClient, RestError};

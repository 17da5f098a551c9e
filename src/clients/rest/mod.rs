//! REST API client for the Resolwe server.
//!
//! This module provides a higher-level REST client built on top of the
//! [`HttpClient`](crate::clients::HttpClient) for the endpoints under `api/`.
//!
//! # Overview
//!
//! - [`RestClient`]: The REST API client
//! - [`RestError`]: Error type for REST API operations
//!
//! # Path Normalization
//!
//! - Leading slashes are stripped: `/data` -> `data/`
//! - A single trailing slash is ensured: `data/42` -> `data/42/`
//! - Every path is prefixed with `api/`
//!
//! # List Bodies
//!
//! List and search endpoints may answer with a bare JSON array or with a
//! paginated object whose `results` field holds the array. Both are accepted.

mod client;
mod errors;

pub use client::{RestClient, API_PREFIX};
pub use errors::RestError;

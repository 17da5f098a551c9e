//! # Resolwe SDK for Rust
//!
//! A Rust SDK for the Resolwe bioinformatics data-management platform,
//! providing validated configuration, session authentication, typed
//! resources and lazy, cacheable queries over the REST API.
//!
//! ## Overview
//!
//! This SDK provides:
//! - Type-safe configuration via [`ResolweConfig`] and [`ResolweConfigBuilder`]
//! - Validated newtypes for the server URL and credentials
//! - Django session login with CSRF protection via [`auth`]
//! - Typed resources (Data, Sample, Collection, Process, ...) with dirty
//!   tracking and diff-based updates via [`rest`]
//! - Lazy, chainable queries that fetch each result set in one request
//! - Chunked file upload with bounded per-chunk retry
//! - A [`Resolwe::run`] helper that uploads input files and starts a process
//!
//! ## Quick Start
//!
//! ```rust
//! use resolwe_sdk::{Password, ResolweConfig, ServerUrl, Username};
//!
//! let config = ResolweConfig::builder()
//!     .url(ServerUrl::new("https://app.genialis.com").unwrap())
//!     .credentials(
//!         Username::new("jdoe").unwrap(),
//!         Password::new("secret").unwrap(),
//!     )
//!     .build()
//!     .unwrap();
//! ```
//!
//! Or from `RESOLWE_HOST_URL`, `RESOLWE_API_USERNAME` and
//! `RESOLWE_API_PASSWORD`:
//!
//! ```rust,ignore
//! let config = ResolweConfig::from_env()?;
//! ```
//!
//! ## Querying
//!
//! ```rust,ignore
//! use resolwe_sdk::{Resolwe, ResolweConfig};
//!
//! let client = Resolwe::connect(ResolweConfig::from_env()?).await?;
//!
//! // Nothing is sent until the first read
//! let base = client.data().filter("status", "OK");
//! let mut bams = base.filter("process__type__startswith", "data:alignment:bam:");
//!
//! // One request; later reads are served from the cache
//! println!("{} alignments", bams.len().await?);
//! for data in bams.iter().await? {
//!     println!("{}", data.name);
//! }
//!
//! // Exactly one match, or an error
//! let sample = client.sample().get_slug("liver-1").await?;
//! ```
//!
//! ## Modifying Resources
//!
//! ```rust,ignore
//! let mut sample = client.sample().get_id(42).await?;
//! sample.set("name", "Liver, replicate 2")?;
//! sample.save(&client).await?;   // PATCH {"name": ...}
//! sample.save(&client).await?;   // nothing changed, no request
//!
//! sample.set("id", 7)?;          // Err(ImmutableField)
//! ```
//!
//! ## Running Processes
//!
//! ```rust,ignore
//! use resolwe_sdk::RunRequest;
//! use serde_json::json;
//!
//! let reads = client
//!     .run(RunRequest::new("upload-fastq-single").input(json!({"src": ["reads.fastq.gz"]})))
//!     .await?;
//! ```
//!
//! ## Design Principles
//!
//! - **No global state**: Caches belong to the connection or the query
//! - **Fail-fast validation**: Contract violations are rejected before any request
//! - **Thread-safe**: All types are `Send + Sync`
//! - **Async, sequential**: Every operation awaits its requests one at a time
//! - **Logging**: Diagnostics go through `tracing`; no subscriber is installed

pub mod auth;
pub mod clients;
pub mod config;
pub mod error;
mod resolwe;
pub mod rest;

// Re-export public types at crate root for convenience
pub use auth::AuthSession;
pub use config::{
    Credentials, Password, ResolweConfig, ResolweConfigBuilder, ServerUrl, UploadSettings,
    Username,
};
pub use error::ConfigError;
pub use resolwe::{Resolwe, RunRequest};

// Re-export HTTP client types
pub use clients::{
    DataType, HttpClient, HttpError, HttpMethod, HttpRequest, HttpRequestBuilder, HttpResponse,
    HttpResponseError, InvalidHttpRequestError, RestClient, RestError, UploadError,
};

// Re-export resource types
pub use rest::resources::{
    Collection, Data, DescriptorSchema, Feature, Group, Mapping, Process, Relation, Sample, User,
};
pub use rest::{FilterValue, Filters, Identifier, Lookup, Query, Resource, ResourceError};

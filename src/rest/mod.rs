//! Resources and queries for the Resolwe REST API.
//!
//! This module provides:
//!
//! - **[`ResourceKind`] trait**: Declares an object type, its endpoint and the
//!   mutability class of each field
//! - **[`Resource<T>`]**: One object through its lifecycle (load, set, save,
//!   update, delete) with diff-based PATCH
//! - **[`Query<T>`]**: A lazy, chainable, cacheable cursor over a list endpoint
//! - **[`Filters`]**: Filter composition for query strings and search bodies
//! - **[`ResourceError`]**: Semantic error types for resource operations
//! - **[`resources`]**: The concrete types (Data, Sample, Collection, ...)
//!
//! # Example
//!
//! ```rust,ignore
//! use resolwe_sdk::{Resolwe, ResolweConfig};
//! use serde_json::json;
//!
//! let client = Resolwe::connect(ResolweConfig::from_env()?).await?;
//!
//! // One request, hydrating every match
//! let mut done = client.data().filter("status", "OK").filter("sample__name", "liver");
//! for data in done.iter().await? {
//!     println!("{}: {}", data.id.unwrap_or_default(), data.name);
//! }
//!
//! // Served from the cache
//! let first = done.at(0).await?;
//!
//! // Diff-based update: only "name" is sent
//! let mut sample = client.sample().get_slug("liver-1").await?;
//! sample.set("name", "Liver, replicate 1")?;
//! sample.save(&client).await?;
//!
//! // Create
//! let collection = client
//!     .collection()
//!     .create(json!({"name": "Experiment 12", "tags": ["rna-seq"]}))
//!     .await?;
//! ```

mod errors;
pub mod filters;
mod query;
mod resource;
pub mod resources;
pub mod tracking;

pub use errors::ResourceError;
pub use filters::{FilterValue, Filters};
pub use query::{Lookup, Query};
pub use resource::{FieldClass, Identifier, Resource, ResourceKind};

//! Knowledge-base resources: genomic features and identifier mappings.
//!
//! Both are served by search endpoints that take filters as a JSON body, so
//! repeated filter keys accumulate instead of replacing each other:
//!
//! ```rust,ignore
//! let genes = client
//!     .feature()
//!     .filter("source", "ENSEMBL")
//!     .filter("feature_id", "ENSG00000139618")
//!     .filter("feature_id", "ENSG00000141510")
//!     .into_vec()
//!     .await?;
//! ```
//!
//! The knowledge base is read-only for clients.

use serde::{Deserialize, Serialize};

use crate::clients::HttpMethod;
use crate::rest::ResourceKind;

/// A gene, transcript or other genomic feature.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Feature {
    /// The database the feature comes from.
    pub source: String,

    /// The identifier of the feature in its source database.
    pub feature_id: String,

    /// The species the feature belongs to.
    pub species: String,

    /// The kind of feature, for example `gene` or `transcript`.
    #[serde(rename = "type")]
    pub feature_type: String,

    /// The sub-type, for example `protein-coding`.
    pub sub_type: String,

    /// The name of the feature.
    pub name: String,

    /// The full descriptive name of the feature.
    pub full_name: String,

    /// A free-text description of the feature.
    pub description: String,

    /// Alternative names of the feature.
    pub aliases: Vec<String>,
}

impl ResourceKind for Feature {
    type Cache = ();

    const NAME: &'static str = "Feature";
    const ENDPOINT: &'static str = "kb/feature";
    const QUERY_ENDPOINT: Option<&'static str> = Some("kb/feature/search");
    const QUERY_METHOD: HttpMethod = HttpMethod::Post;
    const IMMUTABLE: bool = true;

    const WRITABLE_FIELDS: &'static [&'static str] = &[];
    const READ_ONLY_FIELDS: &'static [&'static str] = &[
        "source",
        "feature_id",
        "species",
        "type",
        "sub_type",
        "name",
        "full_name",
        "description",
        "aliases",
    ];

    fn id(&self) -> Option<u64> {
        None
    }

    fn clear_id(&mut self) {}
}

/// A mapping of a feature id between two databases.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Mapping {
    /// The kind of mapping, for example `crossdb`.
    pub relation_type: String,

    /// The database of the source feature.
    pub source_db: String,

    /// The identifier of the source feature.
    pub source_id: String,

    /// The species of the source feature.
    pub source_species: String,

    /// The database of the target feature.
    pub target_db: String,

    /// The identifier of the target feature.
    pub target_id: String,

    /// The species of the target feature.
    pub target_species: String,
}

impl ResourceKind for Mapping {
    type Cache = ();

    const NAME: &'static str = "Mapping";
    const ENDPOINT: &'static str = "kb/mapping";
    const QUERY_ENDPOINT: Option<&'static str> = Some("kb/mapping/search");
    const QUERY_METHOD: HttpMethod = HttpMethod::Post;
    const IMMUTABLE: bool = true;

    const WRITABLE_FIELDS: &'static [&'static str] = &[];
    const READ_ONLY_FIELDS: &'static [&'static str] = &[
        "relation_type",
        "source_db",
        "source_id",
        "source_species",
        "target_db",
        "target_id",
        "target_species",
    ];

    fn id(&self) -> Option<u64> {
        None
    }

    fn clear_id(&mut self) {}
}

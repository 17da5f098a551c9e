//! DescriptorSchema resource implementation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::rest::ResourceKind;

/// The schema of a sample, collection or data `descriptor`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DescriptorSchema {
    /// The unique identifier of the descriptor schema.
    /// Read-only field.
    pub id: Option<u64>,

    /// The URL-friendly unique name of the descriptor schema.
    pub slug: String,

    /// The name of the descriptor schema.
    pub name: String,

    /// The version of the descriptor schema, numeric or dotted.
    /// Update-protected after the first save.
    pub version: Value,

    /// The user who created the descriptor schema.
    /// Read-only field.
    pub contributor: Value,

    /// When the descriptor schema was created.
    /// Read-only field.
    pub created: Option<DateTime<Utc>>,

    /// When the descriptor schema was last modified.
    /// Read-only field.
    pub modified: Option<DateTime<Utc>>,

    /// A free-text description of the descriptor schema.
    pub description: String,

    /// Field definitions of the schema.
    pub schema: Vec<Value>,
}

impl ResourceKind for DescriptorSchema {
    type Cache = ();

    const NAME: &'static str = "DescriptorSchema";
    const ENDPOINT: &'static str = "descriptorschema";

    const WRITABLE_FIELDS: &'static [&'static str] = &["name", "slug", "description", "schema"];
    const UPDATE_PROTECTED_FIELDS: &'static [&'static str] = &["version"];
    const READ_ONLY_FIELDS: &'static [&'static str] = &["id", "contributor", "created", "modified"];

    fn id(&self) -> Option<u64> {
        self.id
    }

    fn clear_id(&mut self) {
        self.id = None;
    }
}

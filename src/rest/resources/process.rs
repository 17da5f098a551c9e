//! Process resource implementation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::rest::ResourceKind;

/// A versioned processing step that produces [`Data`](super::Data).
///
/// Several versions of one slug may coexist on the server. Loading by slug
/// always resolves to the highest version.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Process {
    /// The unique identifier of the process.
    /// Read-only field.
    pub id: Option<u64>,

    /// The URL-friendly unique name of the process.
    pub slug: String,

    /// The name of the process.
    pub name: String,

    /// The version of the process.
    /// Update-protected after the first save.
    pub version: Value,

    /// The user who created the process.
    /// Read-only field.
    pub contributor: Value,

    /// When the process was created.
    /// Read-only field.
    pub created: Option<DateTime<Utc>>,

    /// When the process was last modified.
    /// Read-only field.
    pub modified: Option<DateTime<Utc>>,

    /// Hierarchical type such as `data:alignment:bam:star:`.
    #[serde(rename = "type")]
    pub process_type: String,

    /// The category used to group processes.
    pub category: String,

    /// How long outputs are kept: `RAW`, `CACHED` or `TEMP`.
    pub persistence: String,

    /// A free-text description of the process.
    pub description: String,

    /// Template for the names of data objects the process creates.
    pub data_name: String,

    /// Whether the process runs interactively or in batch.
    pub scheduling_class: String,

    /// The type of sample the outputs are attached to.
    pub entity_type: String,

    /// Input field definitions.
    pub input_schema: Vec<Value>,

    /// Output field definitions.
    pub output_schema: Vec<Value>,

    /// Resource and executor requirements.
    pub requirements: Value,

    /// The program the process executes.
    pub run: Value,
}

impl Process {
    /// Finds the input schema entry with the given name.
    #[must_use]
    pub fn input_field(&self, name: &str) -> Option<&Value> {
        self.input_schema
            .iter()
            .find(|field| field.get("name").and_then(Value::as_str) == Some(name))
    }
}

impl ResourceKind for Process {
    type Cache = ();

    const NAME: &'static str = "Process";
    const ENDPOINT: &'static str = "process";

    const WRITABLE_FIELDS: &'static [&'static str] = &[
        "name",
        "slug",
        "type",
        "category",
        "persistence",
        "description",
        "data_name",
        "scheduling_class",
        "entity_type",
        "input_schema",
        "output_schema",
        "requirements",
        "run",
    ];
    const UPDATE_PROTECTED_FIELDS: &'static [&'static str] = &["version"];
    const READ_ONLY_FIELDS: &'static [&'static str] = &["id", "contributor", "created", "modified"];

    fn id(&self) -> Option<u64> {
        self.id
    }

    fn clear_id(&mut self) {
        self.id = None;
    }
}

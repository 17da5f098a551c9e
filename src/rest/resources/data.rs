//! Data resource implementation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::Sample;
use crate::rest::{Resource, ResourceError, ResourceKind};
use crate::Resolwe;

/// The output of one process run.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Data {
    /// The unique identifier of the data object.
    /// Read-only field.
    pub id: Option<u64>,

    /// The URL-friendly unique name of the data object.
    pub slug: String,

    /// The name of the data object.
    pub name: String,

    /// The version of the data object, numeric or dotted.
    /// Read-only field.
    pub version: Value,

    /// The user who created the data object.
    /// Read-only field.
    pub contributor: Value,

    /// When the data object was created.
    /// Read-only field.
    pub created: Option<DateTime<Utc>>,

    /// When the data object was last modified.
    /// Read-only field.
    pub modified: Option<DateTime<Utc>>,

    /// When processing started.
    /// Read-only field.
    pub started: Option<DateTime<Utc>>,

    /// When processing finished.
    /// Read-only field.
    pub finished: Option<DateTime<Utc>>,

    /// Checksum of the process inputs.
    /// Read-only field.
    pub checksum: String,

    /// Processing status: `UP`, `RE`, `WT`, `PP`, `PR`, `OK`, `ER` or `DR`.
    /// Read-only field.
    pub status: String,

    /// Total size of the output files in bytes.
    /// Read-only field.
    pub size: u64,

    /// Annotation values validated against the descriptor schema.
    pub descriptor: Value,

    /// The schema the descriptor is validated against.
    pub descriptor_schema: Value,

    /// The collection the data object belongs to.
    pub collection: Value,

    /// The sample the data object belongs to.
    /// Read-only field.
    pub entity: Value,

    /// Tags attached to the data object.
    pub tags: Vec<String>,

    /// The process that produced the data object.
    /// Update-protected after the first save.
    pub process: Value,

    /// Process inputs, keyed by input name.
    /// Update-protected after the first save.
    pub input: Value,

    /// Process outputs, keyed by output name.
    /// Read-only field.
    pub output: Value,

    /// Progress of the running process in percent.
    /// Read-only field.
    pub process_progress: u64,

    /// Return code of the finished process.
    /// Read-only field.
    pub process_rc: Option<i64>,

    /// Informational messages reported by the process.
    /// Read-only field.
    pub process_info: Vec<String>,

    /// Warnings reported by the process.
    /// Read-only field.
    pub process_warning: Vec<String>,

    /// Errors reported by the process.
    /// Read-only field.
    pub process_error: Vec<String>,
}

impl Data {
    /// Returns `true` once processing finished, successfully or not.
    #[must_use]
    pub fn is_done(&self) -> bool {
        matches!(self.status.as_str(), "OK" | "ER")
    }

    /// Returns the slug of the process that produced this object.
    #[must_use]
    pub fn process_slug(&self) -> Option<&str> {
        self.process.get("slug").and_then(Value::as_str)
    }
}

/// Related objects cached on a [`Resource<Data>`].
#[derive(Debug, Clone, Default)]
pub struct DataRelated {
    sample: Option<Option<Resource<Sample>>>,
}

impl ResourceKind for Data {
    type Cache = DataRelated;

    const NAME: &'static str = "Data";
    const ENDPOINT: &'static str = "data";

    const WRITABLE_FIELDS: &'static [&'static str] = &[
        "name",
        "slug",
        "descriptor",
        "descriptor_schema",
        "collection",
        "tags",
    ];
    const UPDATE_PROTECTED_FIELDS: &'static [&'static str] = &["process", "input"];
    const READ_ONLY_FIELDS: &'static [&'static str] = &[
        "id",
        "version",
        "contributor",
        "created",
        "modified",
        "started",
        "finished",
        "checksum",
        "status",
        "size",
        "entity",
        "output",
        "process_progress",
        "process_rc",
        "process_info",
        "process_warning",
        "process_error",
    ];

    fn id(&self) -> Option<u64> {
        self.id
    }

    fn clear_id(&mut self) {
        self.id = None;
    }
}

impl Resource<Data> {
    /// Returns the sample this data object belongs to, if any.
    ///
    /// Fetched on first access and cached until [`update`](Self::update).
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::StaleResource`] for unsaved or deleted
    /// objects, or the error of the underlying query.
    pub async fn sample(
        &mut self,
        client: &Resolwe,
    ) -> Result<Option<&Resource<Sample>>, ResourceError> {
        if self.cache_mut().sample.is_none() {
            let id = self.require_id()?;
            let sample = client
                .sample()
                .filter("data", id)
                .into_vec()
                .await?
                .into_iter()
                .next();
            self.cache_mut().sample = Some(sample);
        }
        Ok(self.cache_mut().sample.as_ref().and_then(Option::as_ref))
    }
}

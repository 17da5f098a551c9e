//! Collection resource implementation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{Data, Relation, Sample};
use crate::rest::{Resource, ResourceError, ResourceKind};
use crate::Resolwe;

/// A named group of samples and data objects.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Collection {
    /// The unique identifier of the collection.
    /// Read-only field.
    pub id: Option<u64>,

    /// The URL-friendly unique name of the collection.
    pub slug: String,

    /// The name of the collection.
    pub name: String,

    /// The version of the collection, numeric or dotted.
    /// Read-only field.
    pub version: Value,

    /// The user who created the collection.
    /// Read-only field.
    pub contributor: Value,

    /// When the collection was created.
    /// Read-only field.
    pub created: Option<DateTime<Utc>>,

    /// When the collection was last modified.
    /// Read-only field.
    pub modified: Option<DateTime<Utc>>,

    /// A free-text description of the collection.
    pub description: String,

    /// Free-form settings of the collection.
    pub settings: Value,

    /// Tags attached to the collection.
    pub tags: Vec<String>,

    /// Annotation values validated against the descriptor schema.
    pub descriptor: Value,

    /// The schema the descriptor is validated against.
    pub descriptor_schema: Value,
}

/// Related objects cached on a [`Resource<Collection>`].
#[derive(Debug, Clone, Default)]
pub struct CollectionRelated {
    data: Option<Vec<Resource<Data>>>,
    samples: Option<Vec<Resource<Sample>>>,
    relations: Option<Vec<Resource<Relation>>>,
}

impl ResourceKind for Collection {
    type Cache = CollectionRelated;

    const NAME: &'static str = "Collection";
    const ENDPOINT: &'static str = "collection";

    const WRITABLE_FIELDS: &'static [&'static str] = &[
        "name",
        "slug",
        "description",
        "settings",
        "tags",
        "descriptor",
        "descriptor_schema",
    ];
    const READ_ONLY_FIELDS: &'static [&'static str] =
        &["id", "version", "contributor", "created", "modified"];

    fn id(&self) -> Option<u64> {
        self.id
    }

    fn clear_id(&mut self) {
        self.id = None;
    }
}

impl Resource<Collection> {
    /// Returns the data objects in this collection.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::StaleResource`] for unsaved or deleted
    /// collections, or the error of the underlying query.
    pub async fn data(&mut self, client: &Resolwe) -> Result<&[Resource<Data>], ResourceError> {
        if self.cache_mut().data.is_none() {
            let id = self.require_id()?;
            let data = client.data().filter("collection", id).into_vec().await?;
            self.cache_mut().data = Some(data);
        }
        Ok(self.cache_mut().data.as_deref().unwrap_or_default())
    }

    /// Returns the samples in this collection.
    ///
    /// # Errors
    ///
    /// Same as [`data`](Self::data).
    pub async fn samples(
        &mut self,
        client: &Resolwe,
    ) -> Result<&[Resource<Sample>], ResourceError> {
        if self.cache_mut().samples.is_none() {
            let id = self.require_id()?;
            let samples = client.sample().filter("collection", id).into_vec().await?;
            self.cache_mut().samples = Some(samples);
        }
        Ok(self.cache_mut().samples.as_deref().unwrap_or_default())
    }

    /// Returns the relations defined in this collection.
    ///
    /// # Errors
    ///
    /// Same as [`data`](Self::data).
    pub async fn relations(
        &mut self,
        client: &Resolwe,
    ) -> Result<&[Resource<Relation>], ResourceError> {
        if self.cache_mut().relations.is_none() {
            let id = self.require_id()?;
            let relations = client.relation().filter("collection", id).into_vec().await?;
            self.cache_mut().relations = Some(relations);
        }
        Ok(self.cache_mut().relations.as_deref().unwrap_or_default())
    }
}

//! Sample resource implementation.
//!
//! The server calls samples "entities", so the endpoint is `entity` and
//! filters on `sample` are sent as `entity`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{Collection, Data};
use crate::rest::{Resource, ResourceError, ResourceKind};
use crate::Resolwe;

/// A biological sample grouping the data objects derived from it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Sample {
    /// The unique identifier of the sample.
    /// Read-only field.
    pub id: Option<u64>,

    /// The URL-friendly unique name of the sample.
    pub slug: String,

    /// The name of the sample.
    pub name: String,

    /// The version of the sample, numeric or dotted.
    /// Read-only field.
    pub version: Value,

    /// The user who created the sample.
    /// Read-only field.
    pub contributor: Value,

    /// When the sample was created.
    /// Read-only field.
    pub created: Option<DateTime<Utc>>,

    /// When the sample was last modified.
    /// Read-only field.
    pub modified: Option<DateTime<Utc>>,

    /// A free-text description of the sample.
    pub description: String,

    /// Free-form settings of the sample.
    pub settings: Value,

    /// Tags attached to the sample.
    pub tags: Vec<String>,

    /// Annotation values validated against the descriptor schema.
    pub descriptor: Value,

    /// The schema the descriptor is validated against.
    pub descriptor_schema: Value,

    /// The collection the sample belongs to.
    pub collection: Value,
}

/// Related objects cached on a [`Resource<Sample>`].
#[derive(Debug, Clone, Default)]
pub struct SampleRelated {
    data: Option<Vec<Resource<Data>>>,
    collections: Option<Vec<Resource<Collection>>>,
}

impl ResourceKind for Sample {
    type Cache = SampleRelated;

    const NAME: &'static str = "Sample";
    const ENDPOINT: &'static str = "entity";

    const WRITABLE_FIELDS: &'static [&'static str] = &[
        "name",
        "slug",
        "description",
        "settings",
        "tags",
        "descriptor",
        "descriptor_schema",
        "collection",
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

impl Resource<Sample> {
    /// Returns the data objects of this sample.
    ///
    /// Fetched on first access and cached until [`update`](Self::update).
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::StaleResource`] for unsaved or deleted
    /// samples, or the error of the underlying query.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let mut sample = client.sample().get_slug("liver-1").await?;
    /// for data in sample.data(&client).await? {
    ///     println!("{} ({})", data.name, data.status);
    /// }
    /// ```
    pub async fn data(&mut self, client: &Resolwe) -> Result<&[Resource<Data>], ResourceError> {
        if self.cache_mut().data.is_none() {
            let id = self.require_id()?;
            let data = client.data().filter("entity", id).into_vec().await?;
            self.cache_mut().data = Some(data);
        }
        Ok(self.cache_mut().data.as_deref().unwrap_or_default())
    }

    /// Returns the collections containing this sample.
    ///
    /// # Errors
    ///
    /// Same as [`data`](Self::data).
    pub async fn collections(
        &mut self,
        client: &Resolwe,
    ) -> Result<&[Resource<Collection>], ResourceError> {
        if self.cache_mut().collections.is_none() {
            let id = self.require_id()?;
            let collections = client.collection().filter("entity", id).into_vec().await?;
            self.cache_mut().collections = Some(collections);
        }
        Ok(self.cache_mut().collections.as_deref().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rest::resources::test_support::assert_field_sets;
    use serde_json::json;

    #[test]
    fn test_sample_field_classes_cover_all_fields() {
        assert_field_sets::<Sample>();
    }

    #[test]
    fn test_sample_descriptor_is_sent_whole() {
        let mut sample = Resource::<Sample>::from_payload(json!({
            "id": 3,
            "name": "liver",
            "descriptor": {"general": {"species": "Homo sapiens", "organ": "liver"}},
        }))
        .unwrap();

        sample
            .set(
                "descriptor",
                json!({"general": {"species": "Homo sapiens", "organ": "kidney"}}),
            )
            .unwrap();

        assert_eq!(
            serde_json::Value::Object(sample.changed_fields().unwrap()),
            json!({"descriptor": {"general": {"species": "Homo sapiens", "organ": "kidney"}}})
        );
    }
}

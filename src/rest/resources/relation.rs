//! Relation resource implementation.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::Sample;
use crate::rest::{Resource, ResourceError, ResourceKind};
use crate::Resolwe;

/// One sample's place in a [`Relation`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RelationPartition {
    /// The unique identifier of the partition.
    pub id: Option<u64>,

    /// Id of the sample.
    pub entity: u64,

    /// The position of the sample within the relation.
    pub position: Option<i64>,

    /// The label of the sample within the relation.
    pub label: Option<String>,
}

/// A typed grouping of samples within a collection, such as a replicate
/// group, a time series or a background/case pair.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Relation {
    /// The unique identifier of the relation.
    /// Read-only field.
    pub id: Option<u64>,

    /// The URL-friendly unique name of the relation.
    pub slug: String,

    /// The version of the relation, numeric or dotted.
    /// Read-only field.
    pub version: Value,

    /// The user who created the relation.
    /// Read-only field.
    pub contributor: Value,

    /// When the relation was created.
    /// Read-only field.
    pub created: Option<DateTime<Utc>>,

    /// When the relation was last modified.
    /// Read-only field.
    pub modified: Option<DateTime<Utc>>,

    /// The collection the relation belongs to.
    /// Update-protected after the first save.
    pub collection: Value,

    /// `group`, `series` or `background`.
    #[serde(rename = "type")]
    pub relation_type: String,

    /// The category of the relation.
    pub category: String,

    /// The unit of partition positions, for example `hr`.
    pub unit: Option<String>,

    /// The samples in the relation, in order.
    pub partitions: Vec<RelationPartition>,

    /// Annotation values validated against the descriptor schema.
    pub descriptor: Value,

    /// The schema the descriptor is validated against.
    pub descriptor_schema: Value,
}

impl Relation {
    /// Returns the sample ids in partition order.
    #[must_use]
    pub fn sample_ids(&self) -> Vec<u64> {
        self.partitions.iter().map(|p| p.entity).collect()
    }
}

/// Related objects cached on a [`Resource<Relation>`].
#[derive(Debug, Clone, Default)]
pub struct RelationRelated {
    samples: Option<Vec<Resource<Sample>>>,
}

impl ResourceKind for Relation {
    type Cache = RelationRelated;

    const NAME: &'static str = "Relation";
    const ENDPOINT: &'static str = "relation";

    const WRITABLE_FIELDS: &'static [&'static str] = &[
        "slug",
        "category",
        "unit",
        "partitions",
        "descriptor",
        "descriptor_schema",
    ];
    const UPDATE_PROTECTED_FIELDS: &'static [&'static str] = &["collection", "type"];
    const READ_ONLY_FIELDS: &'static [&'static str] =
        &["id", "version", "contributor", "created", "modified"];

    fn id(&self) -> Option<u64> {
        self.id
    }

    fn clear_id(&mut self) {
        self.id = None;
    }
}

impl Resource<Relation> {
    /// Returns the samples of this relation in partition order.
    ///
    /// A relation without partitions yields an empty list without a request.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::StaleResource`] for unsaved or deleted
    /// relations, or the error of the underlying query.
    pub async fn samples(
        &mut self,
        client: &Resolwe,
    ) -> Result<&[Resource<Sample>], ResourceError> {
        if self.cache_mut().samples.is_none() {
            self.require_id()?;
            let ids = self.sample_ids();
            let samples = if ids.is_empty() {
                Vec::new()
            } else {
                let fetched = client.sample().filter("id__in", ids.clone()).into_vec().await?;
                order_by_ids(fetched, &ids)
            };
            self.cache_mut().samples = Some(samples);
        }
        Ok(self.cache_mut().samples.as_deref().unwrap_or_default())
    }
}

fn order_by_ids(samples: Vec<Resource<Sample>>, ids: &[u64]) -> Vec<Resource<Sample>> {
    let mut by_id: HashMap<u64, Resource<Sample>> = samples
        .into_iter()
        .filter_map(|sample| sample.id.map(|id| (id, sample)))
        .collect();
    ids.iter().filter_map(|id| by_id.remove(id)).collect()
}

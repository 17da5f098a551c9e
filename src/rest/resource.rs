//! Resource lifecycle.
//!
//! This module defines the [`ResourceKind`] trait, which declares a Resolwe
//! object type (its endpoint and the mutability class of each field), and the
//! [`Resource<T>`] wrapper, which carries one object through its lifecycle:
//!
//! 1. created empty ([`Resource::new`]) or loaded by id, slug or payload
//!    ([`Resource::load`], [`Resource::from_payload`])
//! 2. mutated locally with [`Resource::set`]
//! 3. persisted with [`Resource::save`] (POST when new, PATCH of the changed
//!    fields otherwise)
//! 4. refreshed with [`Resource::update`] or removed with [`Resource::delete`]
//!
//! # Field classes
//!
//! Every field belongs to exactly one class:
//!
//! - **writable**: settable at any time and persisted on save
//! - **update-protected**: settable only before the first save
//! - **read-only**: assigned by the server, never settable
//!
//! # Implementing a Resource
//!
//! ```rust,ignore
//! use resolwe_sdk::rest::ResourceKind;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, Clone, Default, Serialize, Deserialize)]
//! #[serde(default)]
//! pub struct Tag {
//!     pub id: Option<u64>,
//!     pub name: String,
//! }
//!
//! impl ResourceKind for Tag {
//!     type Cache = ();
//!
//!     const NAME: &'static str = "Tag";
//!     const ENDPOINT: &'static str = "tag";
//!     const WRITABLE_FIELDS: &'static [&'static str] = &["name"];
//!     const READ_ONLY_FIELDS: &'static [&'static str] = &["id"];
//!
//!     fn id(&self) -> Option<u64> {
//!         self.id
//!     }
//!
//!     fn clear_id(&mut self) {
//!         self.id = None;
//!     }
//! }
//! ```

use std::cmp::Ordering;
use std::fmt::Debug;
use std::ops::Deref;

use chrono::{DateTime, FixedOffset};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};

use crate::clients::HttpMethod;
use crate::rest::{tracking, ResourceError};
use crate::Resolwe;

/// Mutability class of a resource field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldClass {
    /// Settable at any time.
    Writable,
    /// Settable only before the resource is first saved.
    UpdateProtected,
    /// Assigned by the server.
    ReadOnly,
}

/// A Resolwe object type.
///
/// Implementors are plain serde structs with `#[serde(default)]`, so that
/// payload keys missing on the server side hydrate to the field's empty
/// value. The three field lists must be disjoint and together name every
/// serialized field.
pub trait ResourceKind:
    Serialize + DeserializeOwned + Clone + Default + Debug + Send + Sync + 'static
{
    /// Related objects fetched lazily and cached on the resource.
    type Cache: Default + Clone + Debug + Send + Sync;

    /// Display name used in errors and logs (e.g. "Sample").
    const NAME: &'static str;

    /// Endpoint under `api/` (e.g. "entity").
    const ENDPOINT: &'static str;

    /// Alternate endpoint used for listing, if it differs from `ENDPOINT`.
    const QUERY_ENDPOINT: Option<&'static str> = None;

    /// Method of the list endpoint. `Post` marks a search endpoint taking
    /// filters in a JSON body.
    const QUERY_METHOD: HttpMethod = HttpMethod::Get;

    /// `true` for types the server never lets clients create or modify.
    const IMMUTABLE: bool = false;

    /// Fields the client may set and persist at any time.
    const WRITABLE_FIELDS: &'static [&'static str];

    /// Fields the client may set only before the first save.
    const UPDATE_PROTECTED_FIELDS: &'static [&'static str] = &[];

    /// Fields assigned by the server.
    const READ_ONLY_FIELDS: &'static [&'static str];

    /// Returns the server-assigned id, if any.
    fn id(&self) -> Option<u64>;

    /// Forgets the server-assigned id.
    fn clear_id(&mut self);

    /// Returns the endpoint used for listing.
    #[must_use]
    fn query_endpoint() -> &'static str {
        Self::QUERY_ENDPOINT.unwrap_or(Self::ENDPOINT)
    }

    /// Returns the class of a field, or `None` for unknown fields.
    #[must_use]
    fn field_class(field: &str) -> Option<FieldClass> {
        if Self::WRITABLE_FIELDS.contains(&field) {
            Some(FieldClass::Writable)
        } else if Self::UPDATE_PROTECTED_FIELDS.contains(&field) {
            Some(FieldClass::UpdateProtected)
        } else if Self::READ_ONLY_FIELDS.contains(&field) {
            Some(FieldClass::ReadOnly)
        } else {
            None
        }
    }

    /// Iterates over every declared field name.
    fn all_fields() -> impl Iterator<Item = &'static str> {
        Self::WRITABLE_FIELDS
            .iter()
            .chain(Self::UPDATE_PROTECTED_FIELDS)
            .chain(Self::READ_ONLY_FIELDS)
            .copied()
    }
}

/// Which single identifier to load a resource by.
///
/// At most one field may be set. An all-empty identifier yields a draft.
#[derive(Clone, Debug, Default)]
pub struct Identifier {
    /// Numeric id.
    pub id: Option<u64>,
    /// Slug; the latest version wins when several exist.
    pub slug: Option<String>,
    /// A payload already fetched from the server.
    pub payload: Option<Value>,
}

impl Identifier {
    /// Identifies by id.
    #[must_use]
    pub fn id(id: u64) -> Self {
        Self {
            id: Some(id),
            ..Self::default()
        }
    }

    /// Identifies by slug.
    #[must_use]
    pub fn slug(slug: impl Into<String>) -> Self {
        Self {
            slug: Some(slug.into()),
            ..Self::default()
        }
    }

    /// Wraps an existing payload.
    #[must_use]
    pub fn payload(payload: Value) -> Self {
        Self {
            payload: Some(payload),
            ..Self::default()
        }
    }
}

/// A local, typed mirror of one server-side object.
///
/// Fields are read through `Deref<Target = T>` and written through
/// [`set`](Self::set), which enforces the field classes of `T`.
///
/// A resource does not hold on to the connection. Every network operation
/// borrows a [`Resolwe`] for the duration of the call. Two resources loaded
/// from the same server object are independent snapshots.
#[derive(Clone, Debug)]
pub struct Resource<T: ResourceKind> {
    fields: T,
    /// Server state as of the last hydration; `Null` for drafts.
    original: Value,
    cache: T::Cache,
    deleted: bool,
}

impl<T: ResourceKind> Default for Resource<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ResourceKind> Resource<T> {
    /// Creates an empty draft.
    #[must_use]
    pub fn new() -> Self {
        Self {
            fields: T::default(),
            original: Value::Null,
            cache: T::Cache::default(),
            deleted: false,
        }
    }

    /// Hydrates a resource from a payload without any request.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidPayload`] if the payload is not a JSON
    /// object or a known field has the wrong type.
    pub fn from_payload(payload: Value) -> Result<Self, ResourceError> {
        let mut resource = Self::new();
        resource.hydrate(payload)?;
        Ok(resource)
    }

    /// Loads a resource by id, by slug, or from a payload.
    ///
    /// - by id: one GET of the detail endpoint
    /// - by slug: one GET of the list endpoint; when several versions exist
    ///   the highest `version` wins, ties going to the most recently
    ///   modified
    /// - by payload: no request
    /// - nothing given: an empty draft
    ///
    /// # Errors
    ///
    /// - [`ResourceError::InvalidArguments`] if more than one identifier is
    ///   given; no request is sent
    /// - [`ResourceError::NotFound`] if no object matches
    pub async fn load(client: &Resolwe, identifier: Identifier) -> Result<Self, ResourceError> {
        let given = [
            identifier.id.is_some(),
            identifier.slug.is_some(),
            identifier.payload.is_some(),
        ]
        .into_iter()
        .filter(|given| *given)
        .count();
        if given > 1 {
            return Err(ResourceError::invalid(format!(
                "only one of id, slug or payload may be given for {}",
                T::NAME
            )));
        }

        match identifier {
            Identifier { id: Some(id), .. } => Self::fetch_id(client, id).await,
            Identifier {
                slug: Some(slug), ..
            } => Self::fetch_slug(client, &slug).await,
            Identifier {
                payload: Some(payload),
                ..
            } => Self::from_payload(payload),
            _ => Ok(Self::new()),
        }
    }

    async fn fetch_id(client: &Resolwe, id: u64) -> Result<Self, ResourceError> {
        tracing::debug!(resource = T::NAME, id, "loading by id");
        let payload = client
            .rest()
            .get_one(T::ENDPOINT, id)
            .await
            .map_err(|e| ResourceError::from_rest(e, T::NAME, Some(format!("id={id}"))))?;
        Self::from_payload(payload)
    }

    async fn fetch_slug(client: &Resolwe, slug: &str) -> Result<Self, ResourceError> {
        tracing::debug!(resource = T::NAME, slug, "loading by slug");
        let mut payloads = client
            .rest()
            .list(T::ENDPOINT, vec![("slug".to_string(), slug.to_string())])
            .await
            .map_err(|e| ResourceError::from_rest(e, T::NAME, Some(format!("slug={slug}"))))?;

        let index = latest_version(&payloads).ok_or_else(|| ResourceError::NotFound {
            resource: T::NAME,
            lookup: format!("slug={slug}"),
        })?;
        Self::from_payload(payloads.swap_remove(index))
    }

    /// Replaces all fields with the payload and records it as server state.
    pub(crate) fn hydrate(&mut self, payload: Value) -> Result<(), ResourceError> {
        let payload = tracking::strip_nulls(payload);
        let Value::Object(map) = &payload else {
            return Err(ResourceError::InvalidPayload {
                resource: T::NAME,
                reason: "expected a JSON object".to_string(),
            });
        };

        for key in map.keys() {
            if T::field_class(key).is_none() {
                tracing::trace!(resource = T::NAME, key = key.as_str(), "ignoring unknown field");
            }
        }

        let fields: T =
            serde_json::from_value(payload).map_err(|e| ResourceError::InvalidPayload {
                resource: T::NAME,
                reason: e.to_string(),
            })?;
        self.original = snapshot_of(&fields)?;
        self.fields = fields;
        Ok(())
    }

    fn current(&self) -> Result<Value, ResourceError> {
        snapshot_of(&self.fields)
    }

    fn ensure_live(&self) -> Result<(), ResourceError> {
        if self.deleted {
            return Err(ResourceError::StaleResource {
                resource: T::NAME,
                reason: "it has been deleted",
            });
        }
        Ok(())
    }

    fn ensure_mutable(&self) -> Result<(), ResourceError> {
        if T::IMMUTABLE {
            return Err(ResourceError::invalid(format!(
                "{} objects are read-only",
                T::NAME
            )));
        }
        Ok(())
    }

    /// Returns the id of a live, saved resource.
    pub(crate) fn require_id(&self) -> Result<u64, ResourceError> {
        self.ensure_live()?;
        self.fields.id().ok_or(ResourceError::StaleResource {
            resource: T::NAME,
            reason: "it has never been saved",
        })
    }

    /// Sets a field locally.
    ///
    /// Setting a field to the value it already holds is always allowed and
    /// does nothing. The server state used for diffing is not touched.
    ///
    /// # Errors
    ///
    /// - [`ResourceError::InvalidArguments`] for unknown fields or values of
    ///   the wrong type
    /// - [`ResourceError::ImmutableField`] for read-only fields, and for
    ///   update-protected fields once the resource has an id
    /// - [`ResourceError::StaleResource`] if the resource was deleted
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let mut sample = client.sample().get_id(7).await?;
    /// sample.set("name", "liver, replicate 2")?;
    /// sample.save(&client).await?;
    /// ```
    pub fn set(&mut self, field: &str, value: impl Into<Value>) -> Result<(), ResourceError> {
        self.ensure_live()?;
        let value = value.into();

        let class = T::field_class(field).ok_or_else(|| {
            ResourceError::invalid(format!("{} has no field '{field}'", T::NAME))
        })?;

        let current = self.current()?;
        if current.get(field) == Some(&value) {
            return Ok(());
        }

        let mut candidate = current.clone();
        if let Value::Object(map) = &mut candidate {
            map.insert(field.to_string(), value);
        }
        let candidate = serde_json::from_value::<T>(candidate);

        // Compare in normalized form so "+00:00" and "Z" timestamps are equal.
        if let Ok(fields) = &candidate {
            if snapshot_of(fields)?.get(field) == current.get(field) {
                return Ok(());
            }
        }

        match class {
            FieldClass::ReadOnly => {
                return Err(ResourceError::ImmutableField {
                    resource: T::NAME,
                    field: field.to_string(),
                    reason: "the field is read-only",
                });
            }
            FieldClass::UpdateProtected if self.fields.id().is_some() => {
                return Err(ResourceError::ImmutableField {
                    resource: T::NAME,
                    field: field.to_string(),
                    reason: "the field cannot change after the first save",
                });
            }
            _ => {}
        }

        self.fields = candidate.map_err(|e| {
            ResourceError::invalid(format!("invalid value for {}.{field}: {e}", T::NAME))
        })?;
        Ok(())
    }

    /// Returns the writable fields changed since the last hydration.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidPayload`] if the fields cannot be serialized.
    pub fn changed_fields(&self) -> Result<Map<String, Value>, ResourceError> {
        Ok(tracking::changed_fields(
            &self.original,
            &self.current()?,
            T::WRITABLE_FIELDS,
        ))
    }

    /// Persists the resource.
    ///
    /// Without an id, POSTs every non-empty writable and update-protected
    /// field. With an id, PATCHes only the writable fields that changed; when
    /// nothing changed no request is sent. Either way the resource is
    /// re-hydrated from the server's answer.
    ///
    /// # Errors
    ///
    /// - [`ResourceError::StaleResource`] if the resource was deleted
    /// - [`ResourceError::ServerRejected`] if the server refuses the write
    pub async fn save(&mut self, client: &Resolwe) -> Result<(), ResourceError> {
        self.ensure_live()?;
        self.ensure_mutable()?;
        let current = self.current()?;

        let response = match self.fields.id() {
            None => {
                let payload = tracking::non_empty_fields(
                    &current,
                    T::WRITABLE_FIELDS
                        .iter()
                        .chain(T::UPDATE_PROTECTED_FIELDS)
                        .copied(),
                );
                tracing::debug!(resource = T::NAME, "creating");
                client
                    .rest()
                    .create(T::ENDPOINT, Value::Object(payload))
                    .await
                    .map_err(|e| ResourceError::from_rest(e, T::NAME, None))?
            }
            Some(id) => {
                let diff = tracking::changed_fields(&self.original, &current, T::WRITABLE_FIELDS);
                if diff.is_empty() {
                    tracing::debug!(resource = T::NAME, id, "nothing to save");
                    return Ok(());
                }
                tracing::debug!(
                    resource = T::NAME,
                    id,
                    fields = ?diff.keys().collect::<Vec<_>>(),
                    "saving changes"
                );
                client
                    .rest()
                    .update(T::ENDPOINT, id, Value::Object(diff))
                    .await
                    .map_err(|e| ResourceError::from_rest(e, T::NAME, Some(format!("id={id}"))))?
            }
        };

        self.hydrate(response)
    }

    /// Re-fetches the resource and discards cached related objects.
    ///
    /// # Errors
    ///
    /// - [`ResourceError::StaleResource`] if the resource was deleted or never saved
    /// - [`ResourceError::NotFound`] if it no longer exists on the server
    pub async fn update(&mut self, client: &Resolwe) -> Result<(), ResourceError> {
        let id = self.require_id()?;
        let payload = client
            .rest()
            .get_one(T::ENDPOINT, id)
            .await
            .map_err(|e| ResourceError::from_rest(e, T::NAME, Some(format!("id={id}"))))?;
        self.hydrate(payload)?;
        self.cache = T::Cache::default();
        Ok(())
    }

    /// Deletes the resource on the server.
    ///
    /// Afterwards the id is cleared and `save`, `update` and `delete` fail
    /// with [`ResourceError::StaleResource`].
    ///
    /// # Errors
    ///
    /// - [`ResourceError::StaleResource`] if the resource was deleted or never saved
    /// - [`ResourceError::ServerRejected`] if the server refuses the deletion
    pub async fn delete(&mut self, client: &Resolwe) -> Result<(), ResourceError> {
        let id = self.require_id()?;
        self.ensure_mutable()?;
        client
            .rest()
            .destroy(T::ENDPOINT, id)
            .await
            .map_err(|e| ResourceError::from_rest(e, T::NAME, Some(format!("id={id}"))))?;

        tracing::debug!(resource = T::NAME, id, "deleted");
        self.fields.clear_id();
        self.deleted = true;
        self.cache = T::Cache::default();
        Ok(())
    }

    /// Returns `true` once [`delete`](Self::delete) succeeded.
    #[must_use]
    pub const fn is_deleted(&self) -> bool {
        self.deleted
    }

    /// Returns the server state recorded at the last hydration.
    #[must_use]
    pub const fn original(&self) -> &Value {
        &self.original
    }

    /// Returns the typed fields.
    #[must_use]
    pub const fn fields(&self) -> &T {
        &self.fields
    }

    /// Consumes the resource and returns its fields.
    #[must_use]
    pub fn into_inner(self) -> T {
        self.fields
    }

    pub(crate) fn cache_mut(&mut self) -> &mut T::Cache {
        &mut self.cache
    }
}

impl<T: ResourceKind> Deref for Resource<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.fields
    }
}

// Verify Resource is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Resource<crate::rest::resources::Data>>();
};

fn snapshot_of<T: ResourceKind>(fields: &T) -> Result<Value, ResourceError> {
    tracking::snapshot(fields).map_err(|e| ResourceError::InvalidPayload {
        resource: T::NAME,
        reason: e.to_string(),
    })
}

/// Picks the payload with the highest version.
///
/// Versions compare component-wise (`"1.10.0"` > `"1.9.2"`, `3` > `2`). Ties
/// go to the latest `modified`, then the latest `created`, then the highest
/// `id`. Returns `None` for an empty list.
pub(crate) fn latest_version(payloads: &[Value]) -> Option<usize> {
    payloads
        .iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| compare_versions(a, b))
        .map(|(index, _)| index)
}

fn compare_versions(a: &Value, b: &Value) -> Ordering {
    version_key(a.get("version"))
        .cmp(&version_key(b.get("version")))
        .then_with(|| timestamp(a.get("modified")).cmp(&timestamp(b.get("modified"))))
        .then_with(|| timestamp(a.get("created")).cmp(&timestamp(b.get("created"))))
        .then_with(|| {
            let id = |v: &Value| v.get("id").and_then(Value::as_u64);
            id(a).cmp(&id(b))
        })
}

fn version_key(version: Option<&Value>) -> Vec<u64> {
    match version {
        Some(Value::Number(n)) => vec![n.as_u64().unwrap_or_default()],
        Some(Value::String(s)) => s
            .split('.')
            .map(|part| part.trim().parse().unwrap_or_default())
            .collect(),
        _ => Vec::new(),
    }
}

fn timestamp(value: Option<&Value>) -> Option<DateTime<FixedOffset>> {
    value
        .and_then(Value::as_str)
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
    #[serde(default)]
    struct Widget {
        id: Option<u64>,
        name: String,
        slug: String,
        kind: String,
        size: u64,
        tags: Vec<String>,
        created: Option<DateTime<chrono::Utc>>,
    }

    impl ResourceKind for Widget {
        type Cache = ();

        const NAME: &'static str = "Widget";
        const ENDPOINT: &'static str = "widget";
        const WRITABLE_FIELDS: &'static [&'static str] = &["name", "slug", "tags"];
        const UPDATE_PROTECTED_FIELDS: &'static [&'static str] = &["kind"];
        const READ_ONLY_FIELDS: &'static [&'static str] = &["id", "size", "created"];

        fn id(&self) -> Option<u64> {
            self.id
        }

        fn clear_id(&mut self) {
            self.id = None;
        }
    }

    fn widget(payload: Value) -> Resource<Widget> {
        Resource::from_payload(payload).unwrap()
    }

    // === Hydration Tests ===

    #[test]
    fn test_from_payload_fills_known_fields_and_ignores_unknown() {
        let resource = widget(json!({
            "id": 3,
            "name": "w",
            "size": 10,
            "unexpected": {"nested": true},
        }));

        assert_eq!(resource.id, Some(3));
        assert_eq!(resource.name, "w");
        assert_eq!(resource.size, 10);
        assert!(resource.tags.is_empty());
        assert_eq!(resource.slug, "");
    }

    #[test]
    fn test_from_payload_treats_null_as_missing() {
        let resource = widget(json!({"id": 1, "name": null, "tags": null}));
        assert_eq!(resource.name, "");
        assert!(resource.tags.is_empty());
    }

    #[test]
    fn test_from_payload_records_original_state() {
        let resource = widget(json!({"id": 1, "name": "w"}));
        assert_eq!(resource.original()["name"], json!("w"));
        assert!(resource.changed_fields().unwrap().is_empty());
    }

    #[test]
    fn test_from_payload_rejects_non_objects() {
        assert!(matches!(
            Resource::<Widget>::from_payload(json!([1, 2])),
            Err(ResourceError::InvalidPayload { .. })
        ));
        assert!(matches!(
            Resource::<Widget>::from_payload(json!({"size": "big"})),
            Err(ResourceError::InvalidPayload { .. })
        ));
    }

    // === set() Tests ===

    #[test]
    fn test_set_writable_field() {
        let mut resource = widget(json!({"id": 1, "name": "A", "slug": "s"}));
        resource.set("name", "B").unwrap();

        assert_eq!(resource.name, "B");
        assert_eq!(
            Value::Object(resource.changed_fields().unwrap()),
            json!({"name": "B"})
        );
    }

    #[test]
    fn test_set_read_only_field_to_other_value_fails() {
        let mut resource = widget(json!({"id": 1, "size": 10}));

        assert!(matches!(
            resource.set("size", 11),
            Err(ResourceError::ImmutableField { field, .. }) if field == "size"
        ));
        assert!(matches!(
            resource.set("id", 2),
            Err(ResourceError::ImmutableField { .. })
        ));
        assert_eq!(resource.size, 10);
    }

    #[test]
    fn test_set_read_only_field_to_same_value_is_noop() {
        let mut resource = widget(json!({"id": 1, "size": 10}));

        resource.set("size", 10).unwrap();
        resource.set("id", 1).unwrap();

        assert_eq!(resource.size, 10);
        assert!(resource.changed_fields().unwrap().is_empty());
    }

    #[test]
    fn test_set_read_only_timestamp_in_other_notation_is_noop() {
        let mut resource = widget(json!({"id": 1, "created": "2024-05-01T10:00:00Z"}));
        resource.set("created", "2024-05-01T10:00:00+00:00").unwrap();
        assert!(matches!(
            resource.set("created", "2024-05-02T10:00:00Z"),
            Err(ResourceError::ImmutableField { .. })
        ));
    }

    #[test]
    fn test_set_update_protected_before_and_after_save() {
        let mut draft = Resource::<Widget>::new();
        draft.set("kind", "round").unwrap();
        assert_eq!(draft.kind, "round");

        let mut saved = widget(json!({"id": 1, "kind": "round"}));
        saved.set("kind", "round").unwrap();
        assert!(matches!(
            saved.set("kind", "square"),
            Err(ResourceError::ImmutableField { .. })
        ));
    }

    #[test]
    fn test_set_unknown_field_fails() {
        let mut resource = Resource::<Widget>::new();
        assert!(matches!(
            resource.set("colour", "red"),
            Err(ResourceError::InvalidArguments { reason }) if reason.contains("colour")
        ));
    }

    #[test]
    fn test_set_wrong_type_fails_and_keeps_value() {
        let mut resource = widget(json!({"id": 1, "name": "A"}));
        assert!(matches!(
            resource.set("tags", "not-a-list"),
            Err(ResourceError::InvalidArguments { .. })
        ));
        assert!(resource.tags.is_empty());
    }

    #[test]
    fn test_set_does_not_touch_original() {
        let mut resource = widget(json!({"id": 1, "name": "A"}));
        resource.set("name", "B").unwrap();
        assert_eq!(resource.original()["name"], json!("A"));
    }

    #[test]
    fn test_require_id_for_draft_is_stale() {
        let resource = Resource::<Widget>::new();
        assert!(matches!(
            resource.require_id(),
            Err(ResourceError::StaleResource { .. })
        ));
    }

    #[test]
    fn test_field_class_lookup() {
        assert_eq!(Widget::field_class("name"), Some(FieldClass::Writable));
        assert_eq!(Widget::field_class("kind"), Some(FieldClass::UpdateProtected));
        assert_eq!(Widget::field_class("size"), Some(FieldClass::ReadOnly));
        assert_eq!(Widget::field_class("colour"), None);
        assert_eq!(Widget::all_fields().count(), 7);
    }

    // === Version Resolution Tests ===

    #[test]
    fn test_latest_version_numeric() {
        let payloads = vec![
            json!({"id": 1, "slug": "macs14", "version": 1}),
            json!({"id": 2, "slug": "macs14", "version": 3}),
            json!({"id": 3, "slug": "macs14", "version": 2}),
        ];
        assert_eq!(latest_version(&payloads), Some(1));
    }

    #[test]
    fn test_latest_version_dotted_compares_components() {
        let payloads = vec![
            json!({"id": 1, "version": "1.9.2"}),
            json!({"id": 2, "version": "1.10.0"}),
            json!({"id": 3, "version": "1.2.0"}),
        ];
        assert_eq!(latest_version(&payloads), Some(1));
    }

    #[test]
    fn test_latest_version_ties_go_to_most_recent() {
        let payloads = vec![
            json!({"id": 1, "version": "2.0.0", "modified": "2024-05-01T10:00:00Z"}),
            json!({"id": 2, "version": "2.0.0", "modified": "2024-06-01T10:00:00+02:00"}),
            json!({"id": 3, "version": "1.0.0", "modified": "2025-01-01T10:00:00Z"}),
        ];
        assert_eq!(latest_version(&payloads), Some(1));
    }

    #[test]
    fn test_latest_version_empty() {
        assert_eq!(latest_version(&[]), None);
    }
}

//! Lazy, chainable queries over list endpoints.
//!
//! A [`Query`] accumulates filters and an optional result window without
//! touching the network. The first read executes exactly one request and
//! caches the hydrated resources; later reads are served from that cache.
//!
//! Every filter or window operation returns a new query with an empty cache,
//! so a base query can be stored and specialized repeatedly:
//!
//! ```rust,ignore
//! let done = client.sample().filter("status", "OK");
//! let liver = done.filter("name__icontains", "liver");
//! let kidney = done.filter("name__icontains", "kidney");
//!
//! for sample in liver.into_vec().await? {
//!     println!("{}", sample.name);
//! }
//! ```
//!
//! Negative indices and steps other than 1 are rejected: the result set is
//! paged from the server, so its length is unknown until fetched.

use std::fmt;
use std::ops::{Bound, RangeBounds};

use serde_json::Value;

use crate::clients::HttpMethod;
use crate::rest::resource::{latest_version, Resource, ResourceKind};
use crate::rest::{FilterValue, Filters, ResourceError};
use crate::Resolwe;

/// A positional identifier for [`Query::get`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Lookup {
    /// Numeric id.
    Id(u64),
    /// Slug; the latest version wins when several exist.
    Slug(String),
}

impl From<u64> for Lookup {
    fn from(id: u64) -> Self {
        Self::Id(id)
    }
}

impl From<&str> for Lookup {
    fn from(slug: &str) -> Self {
        Self::Slug(slug.to_string())
    }
}

impl From<String> for Lookup {
    fn from(slug: String) -> Self {
        Self::Slug(slug)
    }
}

/// A lazy, cacheable cursor over the resources of one endpoint.
pub struct Query<'a, T: ResourceKind> {
    client: &'a Resolwe,
    filters: Filters,
    offset: Option<u64>,
    limit: Option<u64>,
    cache: Option<Vec<Resource<T>>>,
}

/// Clones never inherit the cache.
impl<T: ResourceKind> Clone for Query<'_, T> {
    fn clone(&self) -> Self {
        Self {
            client: self.client,
            filters: self.filters.clone(),
            offset: self.offset,
            limit: self.limit,
            cache: None,
        }
    }
}

impl<T: ResourceKind> fmt::Debug for Query<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Query")
            .field("resource", &T::NAME)
            .field("filters", &self.filters)
            .field("offset", &self.offset)
            .field("limit", &self.limit)
            .field("cached", &self.cache.as_ref().map(Vec::len))
            .finish()
    }
}

impl<'a, T: ResourceKind> Query<'a, T> {
    /// Creates an unfiltered query bound to a connection.
    #[must_use]
    pub fn new(client: &'a Resolwe) -> Self {
        Self {
            client,
            filters: Filters::new(),
            offset: None,
            limit: None,
            cache: None,
        }
    }

    /// Returns the accumulated filters.
    #[must_use]
    pub const fn filters(&self) -> &Filters {
        &self.filters
    }

    /// Returns the window offset, if any.
    #[must_use]
    pub const fn offset(&self) -> Option<u64> {
        self.offset
    }

    /// Returns the window limit, if any.
    #[must_use]
    pub const fn limit(&self) -> Option<u64> {
        self.limit
    }

    /// Returns `true` once the query has been executed.
    #[must_use]
    pub const fn is_cached(&self) -> bool {
        self.cache.is_some()
    }

    /// Drops cached results, keeping filters and window.
    pub fn clear_cache(&mut self) {
        self.cache = None;
    }

    fn repeats_keys() -> bool {
        matches!(T::QUERY_METHOD, HttpMethod::Post)
    }

    /// Returns a new query with one more criterion.
    ///
    /// On GET endpoints a key that is already set is replaced. On search
    /// endpoints the value is appended and all values of the key are sent.
    #[must_use]
    pub fn filter(&self, key: &str, value: impl Into<FilterValue>) -> Self {
        let mut query = self.clone();
        query.filters.insert(key, value, Self::repeats_keys());
        query
    }

    /// Returns a new query with several more criteria.
    #[must_use]
    pub fn filter_many<K, V>(&self, criteria: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: Into<FilterValue>,
    {
        let mut query = self.clone();
        for (key, value) in criteria {
            query
                .filters
                .insert(key.as_ref(), value, Self::repeats_keys());
        }
        query
    }

    /// Returns an uncached copy of this query.
    #[must_use]
    pub fn all(&self) -> Self {
        self.clone()
    }

    /// Returns the single resource matching a lookup or criteria.
    ///
    /// - `Lookup::Id` and criteria require exactly one match
    /// - `Lookup::Slug` resolves several versions to the latest one
    ///
    /// # Errors
    ///
    /// - [`ResourceError::InvalidArguments`] if both a lookup and criteria
    ///   are given; no request is sent
    /// - [`ResourceError::NotFound`] if nothing matches
    /// - [`ResourceError::AmbiguousResult`] if several objects match
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use resolwe_sdk::rest::Lookup;
    ///
    /// let sample = client.sample().get(Some(Lookup::Id(42)), Vec::new()).await?;
    /// let reads = client
    ///     .data()
    ///     .get(None, vec![("name".to_string(), "reads.fastq".into())])
    ///     .await?;
    /// ```
    pub async fn get(
        &self,
        lookup: Option<Lookup>,
        criteria: Vec<(String, FilterValue)>,
    ) -> Result<Resource<T>, ResourceError> {
        if lookup.is_some() && !criteria.is_empty() {
            return Err(ResourceError::invalid(
                "a positional identifier and filter criteria cannot be combined",
            ));
        }

        match lookup {
            Some(Lookup::Id(id)) => {
                let results = self.filter("id", id).into_vec().await?;
                exactly_one(results, format!("id={id}"))
            }
            Some(Lookup::Slug(slug)) => {
                let query = self.filter("slug", slug.as_str());
                let mut payloads = query.request_payloads().await?;
                let index = latest_version(&payloads).ok_or_else(|| ResourceError::NotFound {
                    resource: T::NAME,
                    lookup: format!("slug={slug}"),
                })?;
                Resource::from_payload(payloads.swap_remove(index))
            }
            None => {
                let lookup = describe(&criteria);
                let results = self.filter_many(criteria).into_vec().await?;
                exactly_one(results, lookup)
            }
        }
    }

    /// Shorthand for `get(Some(Lookup::Id(id)), Vec::new())`.
    ///
    /// # Errors
    ///
    /// See [`get`](Self::get).
    pub async fn get_id(&self, id: u64) -> Result<Resource<T>, ResourceError> {
        self.get(Some(Lookup::Id(id)), Vec::new()).await
    }

    /// Shorthand for `get(Some(Lookup::Slug(slug)), Vec::new())`.
    ///
    /// # Errors
    ///
    /// See [`get`](Self::get).
    pub async fn get_slug(&self, slug: &str) -> Result<Resource<T>, ResourceError> {
        self.get(Some(Lookup::from(slug)), Vec::new()).await
    }

    /// Returns the single resource matching all criteria.
    ///
    /// # Errors
    ///
    /// See [`get`](Self::get).
    pub async fn get_where<K, V>(
        &self,
        criteria: impl IntoIterator<Item = (K, V)>,
    ) -> Result<Resource<T>, ResourceError>
    where
        K: Into<String>,
        V: Into<FilterValue>,
    {
        let criteria = criteria
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect();
        self.get(None, criteria).await
    }

    /// Returns the resource at `index` within the current window.
    ///
    /// Served from the cache when the query has been executed; otherwise a
    /// single request for a one-element window is sent.
    ///
    /// # Errors
    ///
    /// - [`ResourceError::InvalidArguments`] for negative indices
    /// - [`ResourceError::IndexOutOfRange`] if there is no such element
    pub async fn at(&self, index: i64) -> Result<Resource<T>, ResourceError> {
        let index = u64::try_from(index)
            .map_err(|_| ResourceError::invalid(format!("negative index {index} is not supported")))?;

        if let Some(cache) = &self.cache {
            return usize::try_from(index)
                .ok()
                .and_then(|i| cache.get(i))
                .cloned()
                .ok_or(ResourceError::IndexOutOfRange { index });
        }

        let (offset, limit) = compose_window(self.offset, self.limit, index, Some(index + 1))?;
        if limit == Some(0) {
            return Err(ResourceError::IndexOutOfRange { index });
        }
        let query = self.windowed(offset, limit);
        query
            .into_vec()
            .await?
            .into_iter()
            .next()
            .ok_or(ResourceError::IndexOutOfRange { index })
    }

    /// Returns the resources in `range` within the current window.
    ///
    /// Served from the cache when the query has been executed, without
    /// touching this query's window. Otherwise a single request for the
    /// window is sent; an empty range sends nothing.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidArguments`] for negative bounds.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let first_ten = client.data().slice(..10).await?;
    /// let next_ten = client.data().slice(10..20).await?;
    /// ```
    pub async fn slice(
        &self,
        range: impl RangeBounds<i64>,
    ) -> Result<Vec<Resource<T>>, ResourceError> {
        let (start, stop) = parse_range(&range)?;

        if let Some(cache) = &self.cache {
            let len = cache.len() as u64;
            let end = stop.map_or(len, |stop| stop.min(len));
            if start >= end {
                return Ok(Vec::new());
            }
            return Ok(cache[to_index(start)..to_index(end)].to_vec());
        }

        let (offset, limit) = compose_window(self.offset, self.limit, start, stop)?;
        if limit == Some(0) {
            return Ok(Vec::new());
        }
        self.windowed(offset, limit).into_vec().await
    }

    /// Like [`slice`](Self::slice) with an explicit step, which must be 1.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidArguments`] for any other step or for
    /// negative bounds.
    pub async fn slice_by(
        &self,
        range: impl RangeBounds<i64>,
        step: i64,
    ) -> Result<Vec<Resource<T>>, ResourceError> {
        if step != 1 {
            return Err(ResourceError::invalid(format!(
                "slice step {step} is not supported, only 1"
            )));
        }
        self.slice(range).await
    }

    /// Returns a new lazy query restricted to `range` of the current window.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidArguments`] for negative bounds.
    pub fn window(&self, range: impl RangeBounds<i64>) -> Result<Self, ResourceError> {
        let (start, stop) = parse_range(&range)?;
        let (offset, limit) = compose_window(self.offset, self.limit, start, stop)?;
        Ok(self.windowed(offset, limit))
    }

    fn windowed(&self, offset: Option<u64>, limit: Option<u64>) -> Self {
        let mut query = self.clone();
        query.offset = offset;
        query.limit = limit;
        query
    }

    /// Executes the query if needed and returns the results.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or a payload cannot be hydrated.
    pub async fn fetch(&mut self) -> Result<&[Resource<T>], ResourceError> {
        if self.cache.is_none() {
            self.cache = Some(self.execute().await?);
        }
        Ok(self.cache.as_deref().unwrap_or_default())
    }

    /// Iterates over the results, executing the query if needed.
    ///
    /// # Errors
    ///
    /// See [`fetch`](Self::fetch).
    pub async fn iter(&mut self) -> Result<std::slice::Iter<'_, Resource<T>>, ResourceError> {
        Ok(self.fetch().await?.iter())
    }

    /// Returns the number of results, executing the query if needed.
    ///
    /// # Errors
    ///
    /// See [`fetch`](Self::fetch).
    pub async fn len(&mut self) -> Result<usize, ResourceError> {
        Ok(self.fetch().await?.len())
    }

    /// Returns `true` if there are no results, executing the query if needed.
    ///
    /// # Errors
    ///
    /// See [`fetch`](Self::fetch).
    pub async fn is_empty(&mut self) -> Result<bool, ResourceError> {
        Ok(self.len().await? == 0)
    }

    /// Consumes the query and returns its results.
    ///
    /// # Errors
    ///
    /// See [`fetch`](Self::fetch).
    pub async fn into_vec(mut self) -> Result<Vec<Resource<T>>, ResourceError> {
        match self.cache.take() {
            Some(cache) => Ok(cache),
            None => self.execute().await,
        }
    }

    /// Creates and saves a new resource from a JSON object of fields.
    ///
    /// # Errors
    ///
    /// - [`ResourceError::InvalidArguments`] if `fields` is not an object or
    ///   names a field that cannot be set
    /// - [`ResourceError::ServerRejected`] if the server refuses the object
    pub async fn create(&self, fields: Value) -> Result<Resource<T>, ResourceError> {
        let Value::Object(fields) = fields else {
            return Err(ResourceError::invalid(format!(
                "{} fields must be given as a JSON object",
                T::NAME
            )));
        };

        let mut resource = Resource::<T>::new();
        for (field, value) in fields {
            resource.set(&field, value)?;
        }
        resource.save(self.client).await?;
        Ok(resource)
    }

    async fn execute(&self) -> Result<Vec<Resource<T>>, ResourceError> {
        if self.limit == Some(0) {
            return Ok(Vec::new());
        }
        self.request_payloads()
            .await?
            .into_iter()
            .map(Resource::from_payload)
            .collect()
    }

    async fn request_payloads(&self) -> Result<Vec<Value>, ResourceError> {
        let endpoint = T::query_endpoint();
        tracing::debug!(
            resource = T::NAME,
            endpoint,
            filters = self.filters.len(),
            offset = ?self.offset,
            limit = ?self.limit,
            "executing query"
        );

        let rest = self.client.rest();
        let result = if Self::repeats_keys() {
            let mut body = self.filters.to_json_body();
            if let Some(limit) = self.limit {
                body.insert("limit".to_string(), Value::from(limit));
            }
            if let Some(offset) = self.offset {
                body.insert("offset".to_string(), Value::from(offset));
            }
            rest.search(endpoint, Value::Object(body)).await
        } else {
            let mut params = self.filters.to_query_params();
            if let Some(limit) = self.limit {
                params.push(("limit".to_string(), limit.to_string()));
            }
            if let Some(offset) = self.offset {
                params.push(("offset".to_string(), offset.to_string()));
            }
            rest.list(endpoint, params).await
        };

        result.map_err(|e| ResourceError::from_rest(e, T::NAME, None))
    }
}

fn exactly_one<T: ResourceKind>(
    mut results: Vec<Resource<T>>,
    lookup: String,
) -> Result<Resource<T>, ResourceError> {
    match results.len() {
        0 => Err(ResourceError::NotFound {
            resource: T::NAME,
            lookup,
        }),
        1 => Ok(results.remove(0)),
        count => Err(ResourceError::AmbiguousResult {
            resource: T::NAME,
            lookup,
            count,
        }),
    }
}

fn describe(criteria: &[(String, FilterValue)]) -> String {
    if criteria.is_empty() {
        return "no criteria".to_string();
    }
    criteria
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn to_index(value: u64) -> usize {
    usize::try_from(value).unwrap_or(usize::MAX)
}

/// Converts a range into a non-negative `(start, stop)` pair.
pub(crate) fn parse_range(range: &impl RangeBounds<i64>) -> Result<(u64, Option<u64>), ResourceError> {
    let non_negative = |value: i64| {
        u64::try_from(value).map_err(|_| {
            ResourceError::invalid(format!("negative slice bound {value} is not supported"))
        })
    };
    let successor = |value: i64| {
        non_negative(value)?
            .checked_add(1)
            .ok_or_else(|| ResourceError::invalid(format!("slice bound {value} is too large")))
    };

    let start = match range.start_bound() {
        Bound::Included(&start) => non_negative(start)?,
        Bound::Excluded(&start) => successor(start)?,
        Bound::Unbounded => 0,
    };
    let stop = match range.end_bound() {
        Bound::Included(&stop) => Some(successor(stop)?),
        Bound::Excluded(&stop) => Some(non_negative(stop)?),
        Bound::Unbounded => None,
    };
    Ok((start, stop))
}

/// Applies a relative `start..stop` window to an existing `offset`/`limit`.
///
/// Offsets add up and limits only ever shrink. A stop at or before the
/// start yields a limit of 0.
///
/// # Errors
///
/// Returns [`ResourceError::InvalidArguments`] if the combined offset does
/// not fit in a `u64`.
pub(crate) fn compose_window(
    offset: Option<u64>,
    limit: Option<u64>,
    start: u64,
    stop: Option<u64>,
) -> Result<(Option<u64>, Option<u64>), ResourceError> {
    let new_offset = offset.unwrap_or(0).checked_add(start).ok_or_else(|| {
        ResourceError::invalid(format!(
            "window start {start} past offset {} is too large",
            offset.unwrap_or(0)
        ))
    })?;
    let requested = stop.map(|stop| stop.saturating_sub(start));
    let available = limit.map(|limit| limit.saturating_sub(start));

    let new_limit = match (requested, available) {
        (Some(requested), Some(available)) => Some(requested.min(available)),
        (requested, available) => requested.or(available),
    };
    let new_offset = (new_offset > 0 || offset.is_some()).then_some(new_offset);
    Ok((new_offset, new_limit))
}

#[cfg(test)]
mod tests {
    use super::*;

    // === Range Parsing Tests ===

    #[test]
    fn test_parse_range_forms() {
        assert_eq!(parse_range(&(2..5)).unwrap(), (2, Some(5)));
        assert_eq!(parse_range(&(2..=5)).unwrap(), (2, Some(6)));
        assert_eq!(parse_range(&(..3)).unwrap(), (0, Some(3)));
        assert_eq!(parse_range(&(4..)).unwrap(), (4, None));
        assert_eq!(parse_range(&(..)).unwrap(), (0, None));
    }

    #[test]
    fn test_parse_range_rejects_negative_bounds() {
        assert!(matches!(
            parse_range(&(-2..)),
            Err(ResourceError::InvalidArguments { .. })
        ));
        assert!(matches!(
            parse_range(&(..-1)),
            Err(ResourceError::InvalidArguments { .. })
        ));
        assert!(matches!(
            parse_range(&(0..=-1)),
            Err(ResourceError::InvalidArguments { .. })
        ));
    }

    // === Window Composition Tests ===

    #[test]
    fn test_compose_window_on_unwindowed_query() {
        assert_eq!(compose_window(None, None, 0, Some(10)).unwrap(), (None, Some(10)));
        assert_eq!(compose_window(None, None, 5, Some(10)).unwrap(), (Some(5), Some(5)));
        assert_eq!(compose_window(None, None, 5, None).unwrap(), (Some(5), None));
        assert_eq!(compose_window(None, None, 0, None).unwrap(), (None, None));
    }

    #[test]
    fn test_compose_window_offsets_add_and_limits_shrink() {
        assert_eq!(
            compose_window(Some(10), Some(20), 5, Some(8)).unwrap(),
            (Some(15), Some(3))
        );
        assert_eq!(
            compose_window(Some(10), Some(20), 5, None).unwrap(),
            (Some(15), Some(15))
        );
        assert_eq!(
            compose_window(Some(10), Some(4), 2, Some(100)).unwrap(),
            (Some(12), Some(2))
        );
    }

    #[test]
    fn test_compose_window_rejects_offset_overflow() {
        let (start, stop) =
            parse_range(&(Bound::Excluded(i64::MAX), Bound::Unbounded)).unwrap();
        assert_eq!(start, 1 << 63);

        let (offset, limit) = compose_window(None, None, start, stop).unwrap();
        assert_eq!(offset, Some(1 << 63));

        assert!(matches!(
            compose_window(offset, limit, start, stop),
            Err(ResourceError::InvalidArguments { .. })
        ));
        assert!(matches!(
            compose_window(Some(u64::MAX), None, 1, None),
            Err(ResourceError::InvalidArguments { .. })
        ));
    }

    #[test]
    fn test_compose_window_empty_when_stop_not_after_start() {
        assert_eq!(compose_window(None, None, 5, Some(5)).unwrap().1, Some(0));
        assert_eq!(compose_window(None, None, 7, Some(3)).unwrap().1, Some(0));
        assert_eq!(compose_window(None, Some(3), 5, Some(6)).unwrap().1, Some(0));
    }

    #[test]
    fn test_describe_criteria() {
        let criteria = vec![
            ("name".to_string(), FilterValue::from("reads")),
            ("entity".to_string(), FilterValue::from(3_i64)),
        ];
        assert_eq!(describe(&criteria), "name=reads, entity=3");
        assert_eq!(describe(&[]), "no criteria");
    }

    #[test]
    fn test_lookup_conversions() {
        assert_eq!(Lookup::from(5_u64), Lookup::Id(5));
        assert_eq!(Lookup::from("macs14"), Lookup::Slug("macs14".to_string()));
    }
}

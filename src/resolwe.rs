//! The connection handle.
//!
//! [`Resolwe`] owns the REST client, the chunked uploader and the process
//! cache of one server connection. Queries and resources borrow it for the
//! duration of each call.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Mutex, PoisonError};

use serde_json::{Map, Value};

use crate::auth::{self, AuthSession};
use crate::clients::{ChunkedUploader, HttpClient, RestClient, RestError};
use crate::config::ResolweConfig;
use crate::rest::resources::{
    Collection, Data, DescriptorSchema, Feature, Group, Mapping, Process, Relation, Sample, User,
};
use crate::rest::{Query, Resource, ResourceError, ResourceKind};

/// A connection to a Resolwe server.
///
/// # Thread Safety
///
/// `Resolwe` is `Send + Sync`. Operations are still meant to be awaited one
/// after another; nothing is spawned in the background.
///
/// # Example
///
/// ```rust,ignore
/// use resolwe_sdk::{Password, Resolwe, ResolweConfig, ServerUrl, Username};
///
/// let config = ResolweConfig::builder()
///     .url(ServerUrl::new("https://app.genialis.com")?)
///     .credentials(Username::new("jdoe")?, Password::new("secret")?)
///     .build()?;
/// let client = Resolwe::connect(config).await?;
///
/// let samples = client.sample().filter("collection__slug", "exp-12").into_vec().await?;
/// ```
#[derive(Debug)]
pub struct Resolwe {
    config: ResolweConfig,
    rest: RestClient,
    uploader: ChunkedUploader,
    session: Option<AuthSession>,
    process_cache: Mutex<HashMap<String, Resource<Process>>>,
}

// Verify Resolwe is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Resolwe>();
};

impl Resolwe {
    /// Opens a connection.
    ///
    /// With credentials, logs in and attaches the session cookie and CSRF
    /// token to every later request. Without, only checks that the server
    /// answers.
    ///
    /// # Errors
    ///
    /// Returns [`RestError::AuthenticationFailed`] if the credentials are
    /// rejected or the server is unreachable.
    pub async fn connect(config: ResolweConfig) -> Result<Self, RestError> {
        let http_client = HttpClient::new(&config)?;

        let (http_client, session) = match config.credentials() {
            Some(credentials) => {
                let session = auth::login(&http_client, credentials).await?;
                (http_client.with_session(&session), Some(session))
            }
            None => {
                auth::probe(&http_client).await?;
                (http_client, None)
            }
        };

        tracing::debug!(
            url = %config.url(),
            authenticated = session.is_some(),
            "connected"
        );

        Ok(Self {
            uploader: ChunkedUploader::new(http_client.clone(), *config.upload())?,
            rest: RestClient::new(http_client),
            config,
            session,
            process_cache: Mutex::new(HashMap::new()),
        })
    }

    /// Returns the configuration the connection was opened with.
    #[must_use]
    pub const fn config(&self) -> &ResolweConfig {
        &self.config
    }

    /// Returns the login session, or `None` for anonymous connections.
    #[must_use]
    pub const fn session(&self) -> Option<&AuthSession> {
        self.session.as_ref()
    }

    /// Returns the underlying REST client.
    #[must_use]
    pub const fn rest(&self) -> &RestClient {
        &self.rest
    }

    /// Returns an unfiltered query over any resource type.
    #[must_use]
    pub fn query<T: ResourceKind>(&self) -> Query<'_, T> {
        Query::new(self)
    }

    /// Queries data objects.
    #[must_use]
    pub fn data(&self) -> Query<'_, Data> {
        self.query()
    }

    /// Queries collections.
    #[must_use]
    pub fn collection(&self) -> Query<'_, Collection> {
        self.query()
    }

    /// Queries samples.
    #[must_use]
    pub fn sample(&self) -> Query<'_, Sample> {
        self.query()
    }

    /// Queries processes.
    #[must_use]
    pub fn process(&self) -> Query<'_, Process> {
        self.query()
    }

    /// Queries relations.
    #[must_use]
    pub fn relation(&self) -> Query<'_, Relation> {
        self.query()
    }

    /// Queries users.
    #[must_use]
    pub fn user(&self) -> Query<'_, User> {
        self.query()
    }

    /// Queries groups.
    #[must_use]
    pub fn group(&self) -> Query<'_, Group> {
        self.query()
    }

    /// Queries descriptor schemas.
    #[must_use]
    pub fn descriptor_schema(&self) -> Query<'_, DescriptorSchema> {
        self.query()
    }

    /// Searches knowledge-base features.
    #[must_use]
    pub fn feature(&self) -> Query<'_, Feature> {
        self.query()
    }

    /// Searches knowledge-base mappings.
    #[must_use]
    pub fn mapping(&self) -> Query<'_, Mapping> {
        self.query()
    }

    /// Returns the latest version of a process.
    ///
    /// Results are cached per connection until [`clear_cache`](Self::clear_cache).
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::NotFound`] if no process has this slug.
    pub async fn latest_process(&self, slug: &str) -> Result<Resource<Process>, ResourceError> {
        let cached = self
            .process_cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(slug)
            .cloned();
        if let Some(process) = cached {
            return Ok(process);
        }

        let process = self.process().get_slug(slug).await?;
        self.process_cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(slug.to_string(), process.clone());
        Ok(process)
    }

    /// Forgets cached processes.
    pub fn clear_cache(&self) {
        self.process_cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Uploads a local file and returns its temporary file token.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Upload`] if reading the file or sending a
    /// chunk fails.
    pub async fn upload(&self, path: impl AsRef<Path>) -> Result<String, ResourceError> {
        Ok(self.uploader.upload(path.as_ref()).await?)
    }

    /// Runs a process by creating a data object for it.
    ///
    /// Local files named by `basic:file:` and `list:basic:file:` inputs,
    /// including inputs nested in groups, are uploaded first and replaced
    /// by references to their temporary tokens. URLs are passed through as
    /// remote files.
    ///
    /// # Errors
    ///
    /// - [`ResourceError::NotFound`] if the process does not exist
    /// - [`ResourceError::Upload`] if a file upload fails
    /// - [`ResourceError::ServerRejected`] if the server refuses the inputs
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use resolwe_sdk::RunRequest;
    /// use serde_json::json;
    ///
    /// let reads = client
    ///     .run(
    ///         RunRequest::new("upload-fastq-single")
    ///             .input(json!({"src": ["lane1.fastq.gz", "lane2.fastq.gz"]}))
    ///             .collection(12),
    ///     )
    ///     .await?;
    /// ```
    pub async fn run(&self, request: RunRequest) -> Result<Resource<Data>, ResourceError> {
        let process = self.latest_process(&request.slug).await?;

        let mut input = match request.input {
            Value::Null => Value::Object(Map::new()),
            Value::Object(map) => Value::Object(map),
            _ => {
                return Err(ResourceError::invalid(
                    "process inputs must be given as a JSON object",
                ))
            }
        };

        for pointer in file_inputs(&process.input_schema, &input, "") {
            let Some(Value::String(location)) = input.pointer(&pointer).cloned() else {
                continue;
            };
            let reference = self.file_reference(&location).await?;
            if let Some(slot) = input.pointer_mut(&pointer) {
                *slot = reference;
            }
        }

        let mut payload = Map::new();
        payload.insert("process".to_string(), serde_json::json!({"slug": request.slug}));
        payload.insert("input".to_string(), input);
        if let Some(descriptor) = request.descriptor {
            payload.insert("descriptor".to_string(), descriptor);
        }
        if let Some(schema) = request.descriptor_schema {
            payload.insert(
                "descriptor_schema".to_string(),
                serde_json::json!({"slug": schema}),
            );
        }
        if let Some(collection) = request.collection {
            payload.insert("collection".to_string(), serde_json::json!({"id": collection}));
        }
        if let Some(name) = request.data_name {
            payload.insert("name".to_string(), Value::String(name));
        }

        tracing::debug!(process = request.slug.as_str(), "running process");
        let response = self
            .rest
            .create(Data::ENDPOINT, Value::Object(payload))
            .await
            .map_err(|e| ResourceError::from_rest(e, Data::NAME, None))?;
        Resource::from_payload(response)
    }

    async fn file_reference(&self, location: &str) -> Result<Value, ResourceError> {
        let name = location
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(location)
            .to_string();

        if is_url(location) {
            return Ok(serde_json::json!({
                "file": name,
                "file_temp": location,
                "is_remote": true,
            }));
        }

        let token = self.upload(location).await?;
        Ok(serde_json::json!({"file": name, "file_temp": token}))
    }
}

/// Parameters of [`Resolwe::run`].
#[derive(Clone, Debug, Default)]
pub struct RunRequest {
    /// Slug of the process to run; the latest version is used.
    pub slug: String,
    /// Process inputs as a JSON object.
    pub input: Value,
    /// Annotation of the created data object.
    pub descriptor: Option<Value>,
    /// Slug of the descriptor schema.
    pub descriptor_schema: Option<String>,
    /// Id of the collection to add the result to.
    pub collection: Option<u64>,
    /// Name of the created data object.
    pub data_name: Option<String>,
}

impl RunRequest {
    /// Creates a request for a process slug with no inputs.
    #[must_use]
    pub fn new(slug: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            ..Self::default()
        }
    }

    /// Sets the process inputs.
    #[must_use]
    pub fn input(mut self, input: Value) -> Self {
        self.input = input;
        self
    }

    /// Sets the descriptor of the created data object.
    #[must_use]
    pub fn descriptor(mut self, descriptor: Value, schema: impl Into<String>) -> Self {
        self.descriptor = Some(descriptor);
        self.descriptor_schema = Some(schema.into());
        self
    }

    /// Adds the result to a collection.
    #[must_use]
    pub const fn collection(mut self, id: u64) -> Self {
        self.collection = Some(id);
        self
    }

    /// Names the created data object.
    #[must_use]
    pub fn data_name(mut self, name: impl Into<String>) -> Self {
        self.data_name = Some(name.into());
        self
    }
}

fn is_url(location: &str) -> bool {
    ["http://", "https://", "ftp://"]
        .iter()
        .any(|scheme| location.starts_with(scheme))
}

/// Returns JSON pointers to every string naming a file in `input`.
fn file_inputs(schema: &[Value], input: &Value, prefix: &str) -> Vec<String> {
    let mut pointers = Vec::new();

    for field in schema {
        let Some(name) = field.get("name").and_then(Value::as_str) else {
            continue;
        };
        let Some(value) = input.get(name) else {
            continue;
        };
        let pointer = format!("{prefix}/{}", escape_pointer(name));
        let field_type = field.get("type").and_then(Value::as_str).unwrap_or_default();

        if let Some(group) = field.get("group").and_then(Value::as_array) {
            pointers.extend(file_inputs(group, value, &pointer));
        } else if field_type.starts_with("basic:file:") {
            if value.is_string() {
                pointers.push(pointer);
            }
        } else if field_type.starts_with("list:basic:file:") {
            if let Some(items) = value.as_array() {
                pointers.extend(
                    items
                        .iter()
                        .enumerate()
                        .filter(|(_, item)| item.is_string())
                        .map(|(index, _)| format!("{pointer}/{index}")),
                );
            }
        }
    }

    pointers
}

fn escape_pointer(segment: &str) -> String {
    segment.replace('~', "~0").replace('/', "~1")
}

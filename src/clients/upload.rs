//! Chunked file upload.
//!
//! Files are split into fixed-size chunks and each chunk is POSTed as
//! `multipart/form-data` to `upload/`. All chunks of one file share a
//! `Session-Id` and an `X-File-Uuid` header. Each chunk is retried a bounded
//! number of times; exhausting the attempts fails the whole upload.

use std::collections::HashMap;
use std::path::Path;

use rand::distributions::Alphanumeric;
use rand::Rng;
use reqwest::multipart::{Form, Part};
use tokio::io::AsyncReadExt;

use crate::clients::errors::UploadError;
use crate::clients::HttpClient;
use crate::config::UploadSettings;
use crate::error::ConfigError;

/// Server path receiving upload chunks.
pub const UPLOAD_PATH: &str = "upload/";

/// Uploads local files to the server's temporary storage.
///
/// # Example
///
/// ```rust,ignore
/// let uploader = ChunkedUploader::new(http_client, UploadSettings::default())?;
/// let token = uploader.upload(Path::new("reads.fastq.gz")).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ChunkedUploader {
    http_client: HttpClient,
    settings: UploadSettings,
}

impl ChunkedUploader {
    /// Creates an uploader sending chunks through `http_client`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] if `settings` has a zero
    /// chunk size or zero attempts.
    pub fn new(http_client: HttpClient, settings: UploadSettings) -> Result<Self, ConfigError> {
        settings.validate()?;
        Ok(Self {
            http_client,
            settings,
        })
    }

    /// Returns the upload settings.
    #[must_use]
    pub const fn settings(&self) -> &UploadSettings {
        &self.settings
    }

    /// Uploads a file and returns the temporary file token.
    ///
    /// # Errors
    ///
    /// - [`UploadError::Io`] if the file cannot be opened or read
    /// - [`UploadError::ChunkFailed`] if a chunk fails on every attempt
    /// - [`UploadError::MissingToken`] if the final response has no token
    pub async fn upload(&self, path: &Path) -> Result<String, UploadError> {
        let io_error = |source| UploadError::Io {
            path: path.display().to_string(),
            source,
        };

        let mut file = tokio::fs::File::open(path).await.map_err(io_error)?;
        let total_size = file.metadata().await.map_err(io_error)?.len();
        let file_name = path
            .file_name()
            .map_or_else(|| "upload".to_string(), |name| name.to_string_lossy().into_owned());

        let mut headers = HashMap::new();
        headers.insert("Session-Id".to_string(), random_token(32));
        headers.insert("X-File-Uuid".to_string(), random_token(32));

        let chunks = chunk_count(total_size, self.settings.chunk_size);
        tracing::debug!(file = %file_name, total_size, chunks, "starting upload");

        let mut last_body = serde_json::Value::Null;
        for chunk in 0..chunks {
            let mut buffer = Vec::new();
            (&mut file)
                .take(self.settings.chunk_size)
                .read_to_end(&mut buffer)
                .await
                .map_err(io_error)?;

            let meta = ChunkMeta {
                number: chunk,
                chunk_size: self.settings.chunk_size,
                current_size: buffer.len() as u64,
                total_size,
            };
            last_body = self
                .send_chunk(&file_name, &buffer, &meta, &headers)
                .await?;
        }

        extract_token(&last_body).ok_or(UploadError::MissingToken)
    }

    async fn send_chunk(
        &self,
        file_name: &str,
        buffer: &[u8],
        meta: &ChunkMeta,
        headers: &HashMap<String, String>,
    ) -> Result<serde_json::Value, UploadError> {
        let max_attempts = self.settings.max_attempts;
        let mut attempt = 1;
        loop {
            match self
                .http_client
                .send_multipart(UPLOAD_PATH, meta.form(file_name, buffer), headers)
                .await
            {
                Ok(response) => return Ok(response.body),
                Err(e) if attempt >= max_attempts => {
                    return Err(UploadError::ChunkFailed {
                        chunk: meta.number,
                        attempts: attempt,
                        reason: e.to_string(),
                    });
                }
                Err(e) => {
                    tracing::warn!(
                        chunk = meta.number,
                        attempt,
                        max_attempts,
                        error = %e,
                        "chunk upload failed, retrying"
                    );
                    tokio::time::sleep(self.settings.retry_delay).await;
                    attempt += 1;
                }
            }
        }
    }
}

struct ChunkMeta {
    number: u64,
    chunk_size: u64,
    current_size: u64,
    total_size: u64,
}

impl ChunkMeta {
    fn form(&self, file_name: &str, buffer: &[u8]) -> Form {
        Form::new()
            .text("_chunkNumber", self.number.to_string())
            .text("_chunkSize", self.chunk_size.to_string())
            .text("_currentChunkSize", self.current_size.to_string())
            .text("_totalSize", self.total_size.to_string())
            .part(
                "file",
                Part::bytes(buffer.to_vec()).file_name(file_name.to_string()),
            )
    }
}

/// Number of chunks for a file; empty files still send one chunk.
const fn chunk_count(total_size: u64, chunk_size: u64) -> u64 {
    if total_size == 0 {
        1
    } else {
        total_size.div_ceil(chunk_size)
    }
}

fn extract_token(body: &serde_json::Value) -> Option<String> {
    body.get("files")?
        .get(0)?
        .get("temp")?
        .as_str()
        .map(ToString::to_string)
}

fn random_token(length: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

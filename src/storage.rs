//! Object storage seam: the [`ObjectStore`] trait and its S3 implementation.
//!
//! ## Why a trait?
//!
//! The handler's only collaborators are two storage calls (get one object,
//! put one object). Hiding them behind a trait keeps the storage client a
//! constructed dependency, handed to [`crate::handler::ConversionHandler`]
//! at build time, rather than module-level state, so tests can substitute
//! an in-memory store and exercise the full pipeline without a network.
//!
//! [`S3Store`] is the production implementation, built on the `rust-s3`
//! crate. It holds only region and credentials and constructs a `Bucket`
//! handle per request; nothing is cached or shared between calls.

use async_trait::async_trait;
use s3::creds::Credentials;
use s3::error::S3Error;
use s3::{Bucket, Region};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tracing::debug;

/// Errors surfaced by an [`ObjectStore`] implementation.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The requested object does not exist.
    #[error("object '{key}' not found in bucket '{bucket}'")]
    NotFound { bucket: String, key: String },

    /// The storage backend rejected or failed the request.
    #[error("storage request for '{bucket}/{key}' failed: {detail}")]
    Backend {
        bucket: String,
        key: String,
        detail: String,
    },

    /// A local file could not be created or written during a download.
    #[error("failed to write local file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The store itself could not be constructed (credentials, region).
    #[error("storage configuration error: {0}")]
    Config(String),
}

/// Minimal object-storage interface consumed by the pipeline.
///
/// Both operations are bucket-qualified because an invocation reads from one
/// bucket and writes to another.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Stream the object at `bucket`/`key` into the file at `dest`.
    ///
    /// Resolves only once the copy to local storage has completed or failed.
    async fn download(&self, bucket: &str, key: &str, dest: &Path) -> Result<(), StorageError>;

    /// Upload `body` to `bucket`/`key` with the given content type,
    /// overwriting any existing object.
    async fn upload(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError>;
}

// A shared handle is as good as the store itself; this is what lets a test
// keep an `Arc<MockStore>` and inspect it after handing a clone to the
// handler.
#[async_trait]
impl<T: ObjectStore + ?Sized> ObjectStore for std::sync::Arc<T> {
    async fn download(&self, bucket: &str, key: &str, dest: &Path) -> Result<(), StorageError> {
        (**self).download(bucket, key, dest).await
    }

    async fn upload(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError> {
        (**self).upload(bucket, key, body, content_type).await
    }
}

/// S3-backed [`ObjectStore`].
#[derive(Debug, Clone)]
pub struct S3Store {
    region: Region,
    credentials: Credentials,
    path_style: bool,
}

impl S3Store {
    /// Build a store from an explicit region and credentials.
    pub fn new(region: Region, credentials: Credentials) -> Self {
        Self {
            region,
            credentials,
            path_style: false,
        }
    }

    /// Use path-style addressing (`endpoint/bucket/key`), required by most
    /// non-AWS S3-compatible servers.
    pub fn with_path_style(mut self) -> Self {
        self.path_style = true;
        self
    }

    /// Build a store from the environment.
    ///
    /// Credentials come from the standard AWS variables (access key pair,
    /// session token, profile). `AWS_REGION` selects the region, defaulting
    /// to `us-east-1`. If `S3_ENDPOINT` is set, it overrides the endpoint
    /// and switches to path-style addressing so local S3-compatible stores
    /// work out of the box.
    pub fn from_env() -> Result<Self, StorageError> {
        let region_name =
            std::env::var("AWS_REGION").unwrap_or_else(|_| "us-east-1".to_string());

        let (region, path_style) = match std::env::var("S3_ENDPOINT") {
            Ok(endpoint) if !endpoint.is_empty() => (
                Region::Custom {
                    region: region_name,
                    endpoint,
                },
                true,
            ),
            _ => (
                region_name
                    .parse()
                    .map_err(|e| StorageError::Config(format!("invalid region: {e}")))?,
                false,
            ),
        };

        let credentials = Credentials::default()
            .map_err(|e| StorageError::Config(format!("credentials: {e}")))?;

        Ok(Self {
            region,
            credentials,
            path_style,
        })
    }

    /// Fresh bucket handle for one request.
    fn bucket(&self, name: &str) -> Result<Box<Bucket>, StorageError> {
        let bucket = Bucket::new(name, self.region.clone(), self.credentials.clone())
            .map_err(|e| StorageError::Config(format!("bucket '{name}': {e}")))?;
        Ok(if self.path_style {
            bucket.with_path_style()
        } else {
            bucket
        })
    }
}

/// Normalise an object key to the leading-slash form rust-s3 expects.
fn object_path(key: &str) -> String {
    format!("/{}", key.trim_start_matches('/'))
}

/// Map a request-level S3 error, folding HTTP 404 into [`StorageError::NotFound`].
fn request_error(bucket: &str, key: &str, err: S3Error) -> StorageError {
    match err {
        S3Error::HttpFailWithBody(404, _) => StorageError::NotFound {
            bucket: bucket.to_string(),
            key: key.to_string(),
        },
        other => StorageError::Backend {
            bucket: bucket.to_string(),
            key: key.to_string(),
            detail: other.to_string(),
        },
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn download(&self, bucket: &str, key: &str, dest: &Path) -> Result<(), StorageError> {
        let handle = self.bucket(bucket)?;

        let mut file = tokio::fs::File::create(dest)
            .await
            .map_err(|source| StorageError::Io {
                path: dest.to_path_buf(),
                source,
            })?;

        debug!("GET s3://{bucket}/{key} -> {}", dest.display());
        let status = handle
            .get_object_to_writer(object_path(key), &mut file)
            .await
            .map_err(|e| request_error(bucket, key, e))?;

        if !(200..300).contains(&status) {
            return Err(StorageError::Backend {
                bucket: bucket.to_string(),
                key: key.to_string(),
                detail: format!("HTTP {status}"),
            });
        }

        file.flush().await.map_err(|source| StorageError::Io {
            path: dest.to_path_buf(),
            source,
        })?;

        Ok(())
    }

    async fn upload(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError> {
        let handle = self.bucket(bucket)?;

        debug!("PUT s3://{bucket}/{key} ({} bytes, {content_type})", body.len());
        let response = handle
            .put_object_with_content_type(object_path(key), &body, content_type)
            .await
            .map_err(|e| request_error(bucket, key, e))?;

        let status = response.status_code();
        if !(200..300).contains(&status) {
            return Err(StorageError::Backend {
                bucket: bucket.to_string(),
                key: key.to_string(),
                detail: format!("HTTP {status}"),
            });
        }

        Ok(())
    }
}

//! Result publication: write the converted file to the destination bucket.

use crate::config::HandlerConfig;
use crate::error::Docx2PdfError;
use crate::storage::ObjectStore;
use std::path::Path;
use tracing::{debug, info};

/// Read the converted file once and upload it under the destination key.
///
/// Re-invocations overwrite the same key; the destination holds whatever the
/// latest successful run produced.
pub async fn upload_converted<S: ObjectStore + ?Sized>(
    store: &S,
    config: &HandlerConfig,
    path: &Path,
) -> Result<(), Docx2PdfError> {
    let body = tokio::fs::read(path)
        .await
        .map_err(|source| Docx2PdfError::OutputRead {
            path: path.to_path_buf(),
            source,
        })?;

    debug!(
        "uploading {} ({} bytes) -> s3://{}/{}",
        path.display(),
        body.len(),
        config.dest_bucket,
        config.dest_key
    );

    store
        .upload(&config.dest_bucket, &config.dest_key, body, &config.content_type)
        .await
        .map_err(|source| Docx2PdfError::Upload {
            bucket: config.dest_bucket.clone(),
            key: config.dest_key.clone(),
            source,
        })?;

    info!("{} written", config.dest_key);
    Ok(())
}

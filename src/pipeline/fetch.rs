//! Template acquisition: stream the source object into the workspace.
//!
//! The converter needs a file-system path, so the object is copied to local
//! storage rather than held in memory. The call resolves only once the
//! streamed copy has finished or errored; there is no partial-download
//! recovery.

use crate::config::{key_file_name, HandlerConfig};
use crate::error::Docx2PdfError;
use crate::storage::ObjectStore;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Download the template object into `dir` and return its local path.
///
/// The local file name is the terminal component of the source key, so
/// `docs/template.docx` lands as `<dir>/template.docx`.
pub async fn fetch_template<S: ObjectStore + ?Sized>(
    store: &S,
    config: &HandlerConfig,
    dir: &Path,
) -> Result<PathBuf, Docx2PdfError> {
    let file_name = key_file_name(&config.source_key).ok_or_else(|| {
        Docx2PdfError::InvalidConfig(format!(
            "source key '{}' has no file name component",
            config.source_key
        ))
    })?;
    let dest = dir.join(file_name);

    debug!(
        "fetching s3://{}/{} -> {}",
        config.source_bucket,
        config.source_key,
        dest.display()
    );

    store
        .download(&config.source_bucket, &config.source_key, &dest)
        .await
        .map_err(|source| Docx2PdfError::TemplateFetch {
            bucket: config.source_bucket.clone(),
            key: config.source_key.clone(),
            source,
        })?;

    info!("template fetched: {}", dest.display());
    Ok(dest)
}

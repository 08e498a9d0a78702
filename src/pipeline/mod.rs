//! Pipeline stages for storage-to-storage conversion.
//!
//! Each submodule implements exactly one step of the invocation. Keeping
//! stages separate makes each independently testable and lets us swap an
//! implementation (e.g. a different converter binary) without touching the
//! other stages.
//!
//! ## Data Flow
//!
//! ```text
//! fetch ──▶ soffice ──▶ upload
//! (object   (external   (local file
//!  storage   process)    → object
//!  → file)               storage)
//! ```
//!
//! 1. [`fetch`]   — stream the template object into the workspace
//! 2. [`soffice`] — run the headless converter; the only stage that leaves
//!    the process, via `spawn_blocking` since the wait is synchronous
//! 3. [`upload`]  — read the produced file once and write it to the
//!    destination bucket
//!
//! All three stages operate inside a [`Workspace`].

pub mod fetch;
pub mod soffice;
pub mod upload;

use crate::error::Docx2PdfError;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// The working directory an invocation downloads into and converts out of.
///
/// The ephemeral variant keeps the `TempDir` alive so cleanup happens
/// automatically when the invocation ends, even on panic. The fixed variant
/// is never cleaned up here; hosting platforms reset their ephemeral storage
/// between invocations.
pub enum Workspace {
    /// Fresh per-invocation temporary directory, removed on drop.
    Ephemeral(TempDir),
    /// Caller-pinned directory (e.g. `/tmp`), created if absent.
    Fixed(PathBuf),
}

impl Workspace {
    /// Materialise the workspace for this invocation.
    pub fn create(work_dir: Option<&Path>) -> Result<Self, Docx2PdfError> {
        match work_dir {
            Some(dir) => {
                std::fs::create_dir_all(dir).map_err(|source| Docx2PdfError::Workspace {
                    path: dir.to_path_buf(),
                    source,
                })?;
                Ok(Workspace::Fixed(dir.to_path_buf()))
            }
            None => TempDir::new()
                .map(Workspace::Ephemeral)
                .map_err(|source| Docx2PdfError::Workspace {
                    path: std::env::temp_dir(),
                    source,
                }),
        }
    }

    /// Path of the working directory regardless of how it was created.
    pub fn path(&self) -> &Path {
        match self {
            Workspace::Ephemeral(dir) => dir.path(),
            Workspace::Fixed(path) => path,
        }
    }
}

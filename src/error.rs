//! Error types for the docx2pdf library.
//!
//! Everything that can go wrong in an invocation lives in one enum,
//! [`Docx2PdfError`]. There is deliberately no transient/permanent split and
//! no retry classification: every variant collapses to the same 500 response
//! at the handler boundary, and the invoking platform owns any retry. The
//! variants exist so logs and tests can tell a missing template apart from a
//! crashed converter, not so callers can branch on them.

use crate::storage::StorageError;
use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

/// All errors produced by the docx2pdf library.
#[derive(Debug, Error)]
pub enum Docx2PdfError {
    // ── Fetch errors ──────────────────────────────────────────────────────
    /// The template object could not be retrieved into the workspace.
    #[error("failed to fetch template '{key}' from bucket '{bucket}': {source}")]
    TemplateFetch {
        bucket: String,
        key: String,
        #[source]
        source: StorageError,
    },

    /// The working directory could not be created.
    #[error("failed to prepare working directory '{path}': {source}")]
    Workspace {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Converter errors ──────────────────────────────────────────────────
    /// The conversion executable could not be started at all.
    #[error("failed to launch converter '{program}': {source}\nCheck the path exists and is executable.")]
    ConverterLaunch {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The conversion executable ran but exited unsuccessfully.
    #[error("converter exited unsuccessfully ({status}): {stderr}")]
    ConverterFailed { status: ExitStatus, stderr: String },

    /// The converter reported success but the expected output file is absent.
    #[error("converter produced no output at '{path}'")]
    OutputMissing { path: PathBuf },

    // ── Upload errors ─────────────────────────────────────────────────────
    /// The converted file could not be read back from the workspace.
    #[error("failed to read converted file '{path}': {source}")]
    OutputRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The converted file could not be written to the destination bucket.
    #[error("failed to upload '{key}' to bucket '{bucket}': {source}")]
    Upload {
        bucket: String,
        key: String,
        #[source]
        source: StorageError,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

//! # docx2pdf
//!
//! Fetch a document template from object storage, convert it to PDF with a
//! headless LibreOffice process, and upload the result back to object
//! storage.
//!
//! ## Why this crate?
//!
//! Producing a faithful PDF from a DOCX means rendering it with an engine
//! that actually understands the format. Rather than reimplement a layout
//! engine, this crate drives LibreOffice's battle-tested `--convert-to`
//! mode as a subprocess and confines itself to the plumbing around it:
//! getting the template onto local disk, running the converter, and
//! publishing the output, with one uniform error boundary.
//!
//! ## Pipeline Overview
//!
//! ```text
//! trigger event (ignored)
//!  │
//!  ├─ 1. Fetch    stream s3://<read bucket>/template.docx to a scoped workspace
//!  ├─ 2. Convert  soffice --headless --convert-to pdf --outdir <workspace>
//!  ├─ 3. Upload   put s3://<write bucket>/template.pdf  (application/pdf)
//!  └─ 4. Respond  { statusCode, body: {"message": …} }
//! ```
//!
//! Any error in steps 1–3 is caught once at the top level and reported as a
//! 500 with the error text in the body. A fully successful run currently
//! reports 404 / "File not found"; see [`handler::ConversionHandler::handle`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use docx2pdf::{ConversionHandler, HandlerConfig, S3Store};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Buckets come from READ_BUCKET_NAME / WRITE_BUCKET_NAME;
//!     // credentials and region from the standard AWS variables.
//!     let handler = ConversionHandler::new(S3Store::from_env()?, HandlerConfig::from_env()?);
//!     let response = handler.handle(&serde_json::json!({})).await;
//!     eprintln!("{} {}", response.status_code, response.body);
//!     Ok(())
//! }
//! ```
//!
//! The storage client is a constructed dependency behind the
//! [`storage::ObjectStore`] trait, so tests can run the whole pipeline
//! against an in-memory store.
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `docx2pdf` binary (clap + anyhow + tracing-subscriber) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! docx2pdf = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod handler;
pub mod pipeline;
pub mod response;
pub mod storage;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{HandlerConfig, HandlerConfigBuilder};
pub use error::Docx2PdfError;
pub use handler::ConversionHandler;
pub use response::Response;
pub use storage::{ObjectStore, S3Store, StorageError};

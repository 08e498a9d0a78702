//! Configuration for a conversion invocation.
//!
//! Every knob lives in [`HandlerConfig`], built via its
//! [`HandlerConfigBuilder`] or read from the platform environment with
//! [`HandlerConfig::from_env`]. Keeping the whole invocation in one
//! cloneable struct makes it trivial to construct in tests, log on
//! failure, and diff two deployments to understand why they behave
//! differently.

use crate::error::Docx2PdfError;
use std::path::{Path, PathBuf};

/// Environment variable naming the bucket the template is read from.
pub const READ_BUCKET_ENV: &str = "READ_BUCKET_NAME";
/// Environment variable naming the bucket the converted file is written to.
pub const WRITE_BUCKET_ENV: &str = "WRITE_BUCKET_NAME";
/// Environment variable overriding the conversion executable path.
pub const SOFFICE_PATH_ENV: &str = "SOFFICE_PATH";

/// Configuration for one storage-to-storage conversion.
///
/// # Example
/// ```rust
/// use docx2pdf::HandlerConfig;
///
/// let config = HandlerConfig::builder()
///     .source_bucket("templates")
///     .dest_bucket("rendered")
///     .build()
///     .unwrap();
/// assert_eq!(config.source_key, "template.docx");
/// ```
#[derive(Debug, Clone)]
pub struct HandlerConfig {
    /// Bucket the template is fetched from. Default: `"read_bucket_name"`
    /// (the literal fallback used when [`READ_BUCKET_ENV`] is unset).
    pub source_bucket: String,

    /// Object key of the template. Default: `"template.docx"`.
    pub source_key: String,

    /// Bucket the converted file is written to. Default: `""`.
    ///
    /// An empty name is accepted at build time and fails at upload instead;
    /// the response is the same 500 either way, and rejecting it early would
    /// change what a misconfigured deployment reports.
    pub dest_bucket: String,

    /// Object key of the converted file. Default: `"template.pdf"`.
    pub dest_key: String,

    /// Content type stamped on the uploaded object. Default: `"application/pdf"`.
    pub content_type: String,

    /// Path to the conversion executable.
    /// Default: `/opt/libreoffice/program/soffice`, where a function
    /// platform extracts a LibreOffice layer at runtime.
    pub converter_path: PathBuf,

    /// Argument passed to `--convert-to`. Default: `"pdf"`.
    ///
    /// May carry a LibreOffice filter suffix, e.g. `"pdf:writer_pdf_Export"`;
    /// the output file extension is the part before the first `:`.
    pub convert_to: String,

    /// Working directory for the downloaded template and converter output.
    ///
    /// `None` (default) creates a fresh temporary directory per invocation,
    /// removed when the invocation ends. `Some(dir)` pins a fixed directory
    /// such as `/tmp`, whose lifetime the hosting platform owns.
    pub work_dir: Option<PathBuf>,
}

impl Default for HandlerConfig {
    fn default() -> Self {
        Self {
            source_bucket: "read_bucket_name".to_string(),
            source_key: "template.docx".to_string(),
            dest_bucket: String::new(),
            dest_key: "template.pdf".to_string(),
            content_type: "application/pdf".to_string(),
            converter_path: PathBuf::from("/opt/libreoffice/program/soffice"),
            convert_to: "pdf".to_string(),
            work_dir: None,
        }
    }
}

impl HandlerConfig {
    /// Create a new builder for `HandlerConfig`.
    pub fn builder() -> HandlerConfigBuilder {
        HandlerConfigBuilder {
            config: Self::default(),
        }
    }

    /// Build a configuration from the platform environment.
    ///
    /// Reads [`READ_BUCKET_ENV`] and [`WRITE_BUCKET_ENV`] with their literal
    /// fallback defaults, and honours [`SOFFICE_PATH_ENV`] when set. All
    /// other fields keep their defaults.
    pub fn from_env() -> Result<Self, Docx2PdfError> {
        let mut builder = Self::builder();

        if let Ok(bucket) = std::env::var(READ_BUCKET_ENV) {
            builder = builder.source_bucket(bucket);
        }
        if let Ok(bucket) = std::env::var(WRITE_BUCKET_ENV) {
            builder = builder.dest_bucket(bucket);
        }
        if let Ok(path) = std::env::var(SOFFICE_PATH_ENV) {
            if !path.is_empty() {
                builder = builder.converter_path(path);
            }
        }

        builder.build()
    }
}

/// Builder for [`HandlerConfig`].
#[derive(Debug)]
pub struct HandlerConfigBuilder {
    config: HandlerConfig,
}

impl HandlerConfigBuilder {
    pub fn source_bucket(mut self, bucket: impl Into<String>) -> Self {
        self.config.source_bucket = bucket.into();
        self
    }

    pub fn source_key(mut self, key: impl Into<String>) -> Self {
        self.config.source_key = key.into();
        self
    }

    pub fn dest_bucket(mut self, bucket: impl Into<String>) -> Self {
        self.config.dest_bucket = bucket.into();
        self
    }

    pub fn dest_key(mut self, key: impl Into<String>) -> Self {
        self.config.dest_key = key.into();
        self
    }

    pub fn content_type(mut self, ct: impl Into<String>) -> Self {
        self.config.content_type = ct.into();
        self
    }

    pub fn converter_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.converter_path = path.into();
        self
    }

    pub fn convert_to(mut self, target: impl Into<String>) -> Self {
        self.config.convert_to = target.into();
        self
    }

    pub fn work_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.work_dir = Some(dir.into());
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<HandlerConfig, Docx2PdfError> {
        let c = &self.config;

        if key_file_name(&c.source_key).is_none() {
            return Err(Docx2PdfError::InvalidConfig(format!(
                "source key '{}' has no file name component",
                c.source_key
            )));
        }
        if key_file_name(&c.dest_key).is_none() {
            return Err(Docx2PdfError::InvalidConfig(format!(
                "destination key '{}' has no file name component",
                c.dest_key
            )));
        }
        if c.convert_to.is_empty() || c.convert_to.starts_with(':') {
            return Err(Docx2PdfError::InvalidConfig(format!(
                "conversion target '{}' names no output format",
                c.convert_to
            )));
        }

        Ok(self.config)
    }
}

/// Terminal file-name component of an object key, if it has one.
///
/// A trailing `/` names a prefix, not an object, and yields `None`.
pub(crate) fn key_file_name(key: &str) -> Option<&str> {
    if key.ends_with('/') {
        return None;
    }
    Path::new(key)
        .file_name()
        .and_then(|n| n.to_str())
        .filter(|n| !n.is_empty())
}

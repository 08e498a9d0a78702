//! End-to-end handler tests.
//!
//! The full pipeline runs against an in-memory [`ObjectStore`] and a fake
//! converter, an executable shell stub that fabricates `<stem>.pdf` the way
//! headless LibreOffice would. No network, no real LibreOffice.
//!
//! Unix-only: the fake converter is a `#!/bin/sh` script.

#![cfg(unix)]

use async_trait::async_trait;
use docx2pdf::{ConversionHandler, HandlerConfig, ObjectStore, StorageError};
use std::collections::HashMap;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

// ── Test doubles ─────────────────────────────────────────────────────────────

/// Object stored in the in-memory bucket map.
#[derive(Clone, Debug, PartialEq)]
struct StoredObject {
    body: Vec<u8>,
    content_type: String,
}

/// In-memory [`ObjectStore`]: a bucket/key map with optional upload failure.
#[derive(Default)]
struct MemoryStore {
    objects: Mutex<HashMap<(String, String), StoredObject>>,
    fail_uploads: bool,
}

impl MemoryStore {
    fn with_object(bucket: &str, key: &str, body: &[u8]) -> Self {
        let store = Self::default();
        store.objects.lock().unwrap().insert(
            (bucket.to_string(), key.to_string()),
            StoredObject {
                body: body.to_vec(),
                content_type: "application/octet-stream".to_string(),
            },
        );
        store
    }

    fn failing_uploads(mut self) -> Self {
        self.fail_uploads = true;
        self
    }

    fn object(&self, bucket: &str, key: &str) -> Option<StoredObject> {
        self.objects
            .lock()
            .unwrap()
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
    }

    fn len(&self) -> usize {
        self.objects.lock().unwrap().len()
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn download(&self, bucket: &str, key: &str, dest: &Path) -> Result<(), StorageError> {
        let object = self.object(bucket, key).ok_or_else(|| StorageError::NotFound {
            bucket: bucket.to_string(),
            key: key.to_string(),
        })?;
        std::fs::write(dest, &object.body).map_err(|source| StorageError::Io {
            path: dest.to_path_buf(),
            source,
        })
    }

    async fn upload(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError> {
        if self.fail_uploads {
            return Err(StorageError::Backend {
                bucket: bucket.to_string(),
                key: key.to_string(),
                detail: "HTTP 503".to_string(),
            });
        }
        self.objects.lock().unwrap().insert(
            (bucket.to_string(), key.to_string()),
            StoredObject {
                body,
                content_type: content_type.to_string(),
            },
        );
        Ok(())
    }
}

// ── Helpers ──────────────────────────────────────────────────────────────────

/// Write an executable stub standing in for soffice.
///
/// Mimics the real invocation contract: args are
/// `--headless --convert-to <fmt> --outdir <dir> <input>`, output lands at
/// `<dir>/<input stem>.<fmt>`. The output embeds the input bytes so tests can
/// check the converted object tracks the template.
fn fake_converter(dir: &Path) -> PathBuf {
    let path = dir.join("soffice");
    let script = r#"#!/bin/sh
fmt="$3"
outdir="$5"
input="$6"
base=$(basename "$input")
{ printf '%%PDF-1.4 '; cat "$input"; } > "$outdir/${base%.*}.$fmt"
"#;
    std::fs::write(&path, script).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

/// Stub that ignores its arguments and exits non-zero.
fn broken_converter(dir: &Path) -> PathBuf {
    let path = dir.join("soffice");
    std::fs::write(&path, "#!/bin/sh\necho 'conversion crashed' >&2\nexit 1\n").unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

fn test_config(converter: &Path) -> HandlerConfig {
    HandlerConfig::builder()
        .source_bucket("templates")
        .dest_bucket("rendered")
        .converter_path(converter)
        .build()
        .expect("valid config")
}

fn trigger() -> serde_json::Value {
    serde_json::json!({})
}

// ── Success path ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn success_writes_destination_object_as_pdf() {
    let tools = TempDir::new().unwrap();
    let converter = fake_converter(tools.path());

    let store = Arc::new(MemoryStore::with_object("templates", "template.docx", b"docx body"));
    let handler = ConversionHandler::new(Arc::clone(&store), test_config(&converter));

    let response = handler.handle(&trigger()).await;

    // The unconditional post-success return: 404, not 200.
    assert_eq!(response.status_code, 404);
    assert_eq!(response.message().as_deref(), Some("File not found"));

    // ...but the destination object exists with the right content type.
    let object = store
        .object("rendered", "template.pdf")
        .expect("destination object written");
    assert_eq!(object.content_type, "application/pdf");
    assert!(object.body.starts_with(b"%PDF-1.4"));
    assert!(
        object.body.ends_with(b"docx body"),
        "converted object must track the template"
    );
}

#[tokio::test]
async fn event_shape_is_irrelevant() {
    let tools = TempDir::new().unwrap();
    let converter = fake_converter(tools.path());

    let store = Arc::new(MemoryStore::with_object("templates", "template.docx", b"x"));
    let handler = ConversionHandler::new(Arc::clone(&store), test_config(&converter));

    // An arbitrarily-shaped event must not change the outcome.
    let event = serde_json::json!({
        "httpMethod": "POST",
        "headers": { "x-totally": ["unread"] },
        "body": null,
    });
    let response = handler.handle(&event).await;
    assert_eq!(response.status_code, 404);
    assert!(store.object("rendered", "template.pdf").is_some());
}

#[tokio::test]
async fn fixed_workdir_is_honoured() {
    let tools = TempDir::new().unwrap();
    let converter = fake_converter(tools.path());
    let workdir = tools.path().join("scratch");

    let store = Arc::new(MemoryStore::with_object("templates", "template.docx", b"x"));
    let config = HandlerConfig::builder()
        .source_bucket("templates")
        .dest_bucket("rendered")
        .converter_path(&converter)
        .work_dir(&workdir)
        .build()
        .unwrap();
    let handler = ConversionHandler::new(Arc::clone(&store), config);

    let response = handler.handle(&trigger()).await;
    assert_eq!(response.status_code, 404);

    // Intermediate files stay in the pinned directory after the run.
    assert!(workdir.join("template.docx").is_file());
    assert!(workdir.join("template.pdf").is_file());
}

// ── Failure paths: everything is a 500 ───────────────────────────────────────

#[tokio::test]
async fn missing_source_object_is_500_with_message() {
    let tools = TempDir::new().unwrap();
    let converter = fake_converter(tools.path());

    let store = Arc::new(MemoryStore::default()); // no template anywhere
    let handler = ConversionHandler::new(Arc::clone(&store), test_config(&converter));

    let response = handler.handle(&trigger()).await;

    assert_eq!(response.status_code, 500);
    let msg = response.message().expect("body has a message");
    assert!(msg.starts_with("some error happened"), "got: {msg}");
    assert!(msg.contains("template.docx"), "got: {msg}");

    // Nothing must have been written downstream.
    assert!(store.object("rendered", "template.pdf").is_none());
}

#[tokio::test]
async fn converter_failure_is_500() {
    let tools = TempDir::new().unwrap();
    let converter = broken_converter(tools.path());

    let store = Arc::new(MemoryStore::with_object("templates", "template.docx", b"x"));
    let handler = ConversionHandler::new(Arc::clone(&store), test_config(&converter));

    let response = handler.handle(&trigger()).await;

    assert_eq!(response.status_code, 500);
    let msg = response.message().unwrap();
    assert!(msg.contains("conversion crashed"), "got: {msg}");
    assert!(store.object("rendered", "template.pdf").is_none());
}

#[tokio::test]
async fn destination_write_failure_is_500() {
    let tools = TempDir::new().unwrap();
    let converter = fake_converter(tools.path());

    let store = Arc::new(
        MemoryStore::with_object("templates", "template.docx", b"x").failing_uploads(),
    );
    let handler = ConversionHandler::new(Arc::clone(&store), test_config(&converter));

    let response = handler.handle(&trigger()).await;

    assert_eq!(response.status_code, 500);
    let msg = response.message().unwrap();
    assert!(msg.contains("rendered"), "got: {msg}");
}

// ── Idempotency at the storage layer ─────────────────────────────────────────

#[tokio::test]
async fn reinvocation_overwrites_the_same_destination_key() {
    let tools = TempDir::new().unwrap();
    let converter = fake_converter(tools.path());

    let store = Arc::new(MemoryStore::with_object("templates", "template.docx", b"stable template"));
    let handler = ConversionHandler::new(Arc::clone(&store), test_config(&converter));

    let first = handler.handle(&trigger()).await;
    let after_first = store
        .object("rendered", "template.pdf")
        .expect("first run writes the object");

    let second = handler.handle(&trigger()).await;
    let after_second = store
        .object("rendered", "template.pdf")
        .expect("second run overwrites the object");

    assert_eq!(first, second);
    assert_eq!(after_first, after_second, "equivalent content both runs");
    // One template + one converted object; no extra keys accumulate.
    assert_eq!(store.len(), 2);
}

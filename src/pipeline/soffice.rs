//! External conversion: drive the headless LibreOffice process.
//!
//! ## Why spawn_blocking?
//!
//! The converter is waited on synchronously; the invocation cannot proceed
//! until the output file exists. `tokio::task::spawn_blocking` moves the
//! blocking wait onto the dedicated pool so the runtime's worker threads
//! are not stalled for the seconds a LibreOffice cold start can take.
//!
//! No timeout is imposed here; the hosting platform's invocation limit is
//! the only bound.

use crate::config::HandlerConfig;
use crate::error::Docx2PdfError;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info};

/// Convert `input` into `out_dir`, returning the path of the produced file.
///
/// Invokes `<converter> --headless --convert-to <target> --outdir <out_dir>
/// <input>` and verifies the expected output exists afterwards; LibreOffice
/// has failure modes (unsupported input, profile lock) where it exits 0
/// without producing anything.
pub async fn convert_document(
    config: &HandlerConfig,
    input: &Path,
    out_dir: &Path,
) -> Result<PathBuf, Docx2PdfError> {
    let program = config.converter_path.clone();
    let convert_to = config.convert_to.clone();
    let input_owned = input.to_path_buf();
    let out_dir_owned = out_dir.to_path_buf();

    debug!(
        "running {} --headless --convert-to {} --outdir {} {}",
        program.display(),
        convert_to,
        out_dir_owned.display(),
        input_owned.display()
    );

    let output = tokio::task::spawn_blocking(move || {
        Command::new(&program)
            .arg("--headless")
            .arg("--convert-to")
            .arg(&convert_to)
            .arg("--outdir")
            .arg(&out_dir_owned)
            .arg(&input_owned)
            .output()
    })
    .await
    .map_err(|e| Docx2PdfError::Internal(format!("converter task panicked: {e}")))?
    .map_err(|source| Docx2PdfError::ConverterLaunch {
        program: config.converter_path.clone(),
        source,
    })?;

    if !output.status.success() {
        return Err(Docx2PdfError::ConverterFailed {
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }

    let expected = expected_output_path(input, out_dir, &config.convert_to);
    if !expected.exists() {
        return Err(Docx2PdfError::OutputMissing { path: expected });
    }

    info!("conversion done: {}", expected.display());
    Ok(expected)
}

/// File extension produced by a `--convert-to` argument.
///
/// The argument may name a filter (`pdf:writer_pdf_Export`); the extension
/// is the part before the first `:`.
fn output_extension(convert_to: &str) -> &str {
    convert_to.split(':').next().unwrap_or(convert_to)
}

/// Where the converter writes its output: `<out_dir>/<input stem>.<ext>`.
fn expected_output_path(input: &Path, out_dir: &Path, convert_to: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    out_dir.join(format!("{stem}.{}", output_extension(convert_to)))
}

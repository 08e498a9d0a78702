//! CLI binary for docx2pdf.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `HandlerConfig`, performs one handler invocation, and prints the
//! structured response, the local stand-in for a platform trigger.

use anyhow::{Context, Result};
use clap::Parser;
use docx2pdf::{ConversionHandler, HandlerConfig, S3Store};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const AFTER_HELP: &str = r#"EXAMPLES:
  # Convert with buckets from the environment
  READ_BUCKET_NAME=templates WRITE_BUCKET_NAME=rendered docx2pdf

  # Explicit buckets and a local soffice
  docx2pdf --read-bucket templates --write-bucket rendered \
           --soffice /usr/bin/soffice

  # Replay a captured trigger event (the event is not inspected)
  docx2pdf --event trigger.json

  # Against a local S3-compatible server
  S3_ENDPOINT=http://localhost:9000 AWS_ACCESS_KEY_ID=minio \
  AWS_SECRET_ACCESS_KEY=minio123 docx2pdf --read-bucket in --write-bucket out

ENVIRONMENT VARIABLES:
  READ_BUCKET_NAME        Source bucket (default: read_bucket_name)
  WRITE_BUCKET_NAME       Destination bucket (default: empty)
  SOFFICE_PATH            Conversion executable path
  AWS_REGION              Storage region (default: us-east-1)
  S3_ENDPOINT             Custom S3-compatible endpoint (enables path style)
  AWS_ACCESS_KEY_ID / AWS_SECRET_ACCESS_KEY   Storage credentials

EXIT STATUS:
  0 when the handler responds below 500, 1 otherwise. Note that a fully
  successful conversion currently responds 404; see the library docs.
"#;

/// Convert a stored DOCX template to PDF via headless LibreOffice.
#[derive(Parser, Debug)]
#[command(
    name = "docx2pdf",
    version,
    about = "Fetch a DOCX template from object storage, convert it to PDF, upload the result",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Bucket the template is fetched from.
    #[arg(long, env = "READ_BUCKET_NAME", default_value = "read_bucket_name")]
    read_bucket: String,

    /// Bucket the converted file is written to.
    #[arg(long, env = "WRITE_BUCKET_NAME", default_value = "")]
    write_bucket: String,

    /// Object key of the template.
    #[arg(long, default_value = "template.docx")]
    source_key: String,

    /// Object key of the converted file.
    #[arg(long, default_value = "template.pdf")]
    dest_key: String,

    /// Path to the conversion executable.
    #[arg(
        long,
        env = "SOFFICE_PATH",
        default_value = "/opt/libreoffice/program/soffice"
    )]
    soffice: PathBuf,

    /// Conversion target passed to --convert-to (may carry a filter,
    /// e.g. pdf:writer_pdf_Export).
    #[arg(long, default_value = "pdf")]
    convert_to: String,

    /// Fixed working directory instead of a fresh temporary one.
    #[arg(long)]
    workdir: Option<PathBuf>,

    /// JSON file with a trigger event to forward (never inspected).
    #[arg(long)]
    event: Option<PathBuf>,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "DOCX2PDF_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "DOCX2PDF_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Trigger event ────────────────────────────────────────────────────
    let event: serde_json::Value = match cli.event {
        Some(ref path) => {
            let raw = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read event file {:?}", path))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("Event file {:?} is not valid JSON", path))?
        }
        None => serde_json::json!({}),
    };

    // ── Build config and dependencies ────────────────────────────────────
    let mut builder = HandlerConfig::builder()
        .source_bucket(cli.read_bucket)
        .source_key(cli.source_key)
        .dest_bucket(cli.write_bucket)
        .dest_key(cli.dest_key)
        .converter_path(cli.soffice)
        .convert_to(cli.convert_to);
    if let Some(dir) = cli.workdir {
        builder = builder.work_dir(dir);
    }
    let config = builder.build().context("Invalid configuration")?;

    let store = S3Store::from_env().context("Failed to initialise object storage")?;

    // ── Run the handler ──────────────────────────────────────────────────
    let response = ConversionHandler::new(store, config).handle(&event).await;

    println!(
        "{}",
        serde_json::to_string_pretty(&response).context("Failed to serialise response")?
    );

    if response.status_code >= 500 {
        std::process::exit(1);
    }
    Ok(())
}

//! The conversion handler: one trigger in, one structured response out.
//!
//! [`ConversionHandler`] owns its two dependencies (an [`ObjectStore`] and a
//! [`HandlerConfig`]) and runs the fixed three-step pipeline (fetch,
//! convert, upload) sequentially inside a scoped [`Workspace`]. There is no
//! retry, no partial-failure recovery, and no state carried between
//! invocations: calling [`ConversionHandler::handle`] twice just repeats the
//! steps and overwrites the destination object.
//!
//! Errors from any step propagate uncaught to the single match at the top of
//! `handle`, where they are logged and folded into one uniform 500 response.

use crate::config::HandlerConfig;
use crate::error::Docx2PdfError;
use crate::pipeline::{fetch, soffice, upload, Workspace};
use crate::response::Response;
use crate::storage::ObjectStore;
use tracing::{error, info};

/// Storage-to-storage document conversion handler.
///
/// # Example
/// ```rust,no_run
/// use docx2pdf::{ConversionHandler, HandlerConfig, S3Store};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let handler = ConversionHandler::new(S3Store::from_env()?, HandlerConfig::from_env()?);
///     let response = handler.handle(&serde_json::json!({})).await;
///     println!("{}", serde_json::to_string(&response)?);
///     Ok(())
/// }
/// ```
pub struct ConversionHandler<S> {
    store: S,
    config: HandlerConfig,
}

impl<S: ObjectStore> ConversionHandler<S> {
    /// Build a handler from its dependencies.
    pub fn new(store: S, config: HandlerConfig) -> Self {
        Self { store, config }
    }

    /// The configuration this handler runs with.
    pub fn config(&self) -> &HandlerConfig {
        &self.config
    }

    /// Process one trigger event.
    ///
    /// The event is accepted for parity with the invoking platform's
    /// contract and never inspected. This method does not fail: every error
    /// from the pipeline is caught here, logged, and reported as a 500.
    pub async fn handle(&self, _event: &serde_json::Value) -> Response {
        match self.run().await {
            Ok(()) => {
                // TODO: return 200 here once downstream consumers stop
                // keying on the 404 fallthrough.
                Response::not_found()
            }
            Err(err) => {
                error!("conversion failed: {err}");
                Response::server_error(&err)
            }
        }
    }

    /// The three-step pipeline. Strictly sequential; each step suspends
    /// until its I/O completes.
    async fn run(&self) -> Result<(), Docx2PdfError> {
        info!(
            "converting s3://{}/{} -> s3://{}/{}",
            self.config.source_bucket,
            self.config.source_key,
            self.config.dest_bucket,
            self.config.dest_key
        );

        let workspace = Workspace::create(self.config.work_dir.as_deref())?;

        let input = fetch::fetch_template(&self.store, &self.config, workspace.path()).await?;
        let converted = soffice::convert_document(&self.config, &input, workspace.path()).await?;
        upload::upload_converted(&self.store, &self.config, &converted).await?;

        Ok(())
    }
}

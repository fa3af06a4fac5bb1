//! Submit command: the full URL-to-navigation processing workflow.

use crate::backend::client::{BackendClient, ReviewBackend};
use crate::config::Config;
use crate::format::Formatter;
use crate::workflow::normalize::normalize;
use crate::workflow::orchestrator::{ExtractionOrchestrator, ExtractionOutcome, SubmissionRequest};
use crate::workflow::router::{route, Navigation, MISSING_URL_MESSAGE};
use crate::workflow::stages::StageSimulator;
use crate::workflow::EventSender;
use anyhow::{Context, Result};
use tracing::info;

/// Executes the product-submission workflow.
pub struct SubmitCommand {
    config: Config,
}

impl SubmitCommand {
    /// Creates a new submit command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Runs the workflow and returns formatted output.
    pub async fn execute(&self, raw_url: &str) -> Result<String> {
        let client = BackendClient::new(&self.config).context("Failed to create HTTP client")?;

        let (events, receiver) = super::event_channel();
        let printer = super::spawn_event_printer(receiver);

        let result = self.execute_with_client(&client, raw_url, events).await;
        let _ = printer.await;

        let navigation = result?;
        let formatter = Formatter::new(self.config.format);
        Ok(formatter.format_navigation(&navigation))
    }

    /// Runs the workflow with a provided backend (for testing).
    ///
    /// The stage progression and the extraction request run concurrently;
    /// they meet only at the forced-completion point on success. Validation
    /// failures other than a missing URL surface as errors before any
    /// network traffic.
    pub async fn execute_with_client(
        &self,
        client: &impl ReviewBackend,
        raw_url: &str,
        events: EventSender,
    ) -> Result<Navigation> {
        if raw_url.trim().is_empty() {
            return Ok(Navigation::ProcessingFailed {
                url: None,
                error: MISSING_URL_MESSAGE.to_string(),
            });
        }

        let url = normalize(raw_url)?;
        info!("Processing product URL: {}", url);

        let request = SubmissionRequest::new(url.clone());
        let orchestrator = ExtractionOrchestrator::new(client);
        let stages = StageSimulator::new(self.config.stage_interval()).start(events);

        let outcome = match orchestrator.submit(&request).await {
            Some(outcome) => outcome,
            None => anyhow::bail!("extraction already submitted for this workflow"),
        };

        match &outcome {
            ExtractionOutcome::Success { .. } => stages.force_complete(),
            _ => stages.stop(),
        }

        let navigation = route(outcome, &url, self.config.redirect_delay());

        if let Some(delay) = navigation.delay() {
            // Let the completed stage display linger before moving on
            tokio::time::sleep(delay).await;
        }

        Ok(navigation)
    }
}

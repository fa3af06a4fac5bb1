//! Watch command: runs the eventual-consistency poller until every pending
//! product has been observed.

use crate::backend::client::{BackendClient, ReviewBackend};
use crate::config::Config;
use crate::state::PendingStore;
use crate::workflow::poller::{PollOutcome, Poller};
use crate::workflow::EventSender;
use anyhow::{Context, Result};

/// Watches the pending set until it drains (or the timeout elapses).
pub struct WatchCommand {
    config: Config,
}

impl WatchCommand {
    /// Creates a new watch command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Runs the poller and returns a summary.
    pub async fn execute(&self) -> Result<String> {
        let client = BackendClient::new(&self.config).context("Failed to create HTTP client")?;
        let store = PendingStore::new(self.config.state_path());

        let (events, receiver) = super::event_channel();
        let printer = super::spawn_event_printer(receiver);

        let result = self.execute_with_client(&client, &store, events).await;
        let _ = printer.await;

        let outcome = result?;
        Ok(Self::summarize(&outcome))
    }

    /// Runs the poller with a provided backend and store (for testing).
    pub async fn execute_with_client(
        &self,
        client: &impl ReviewBackend,
        store: &PendingStore,
        events: EventSender,
    ) -> Result<PollOutcome> {
        let poller = Poller::new(
            client,
            store,
            self.config.poll_interval(),
            self.config.poll_timeout(),
            events,
        );

        Ok(poller.run().await?)
    }

    fn summarize(outcome: &PollOutcome) -> String {
        match outcome {
            PollOutcome::Drained { resolved } if resolved.is_empty() => {
                "No pending products to watch.".to_string()
            }
            PollOutcome::Drained { resolved } => {
                format!("All pending products are live: {}", resolved.join(", "))
            }
            PollOutcome::StillProcessing { pending } => format!(
                "Still processing, check back later: {}",
                pending.join(", ")
            ),
        }
    }
}

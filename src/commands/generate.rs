//! Generate command: triggers asynchronous review generation.

use crate::backend::client::{BackendClient, ReviewBackend};
use crate::config::Config;
use crate::state::PendingStore;
use crate::workflow::generation::{trigger_generation, ReviewGenerationRequest, TaskHandle};
use anyhow::{Context, Result};

/// Parameters collected from the CLI.
#[derive(Debug, Clone)]
pub struct GenerateArgs {
    pub product_id: String,
    pub count: u32,
    pub min_words: u32,
    pub max_words: u32,
    pub tones: Vec<String>,
    pub research_links: Vec<String>,
}

/// Triggers review generation and registers the product for watching.
pub struct GenerateCommand {
    config: Config,
}

impl GenerateCommand {
    /// Creates a new generate command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Triggers generation and returns formatted output.
    pub async fn execute(&self, args: GenerateArgs) -> Result<String> {
        let client = BackendClient::new(&self.config).context("Failed to create HTTP client")?;
        let store = PendingStore::new(self.config.state_path());

        let handle = self.execute_with_client(&client, &store, args).await?;
        Ok(format!(
            "Review generation started.\n  Task ID:    {}\n  Product ID: {}\n\nRun `frontrowmd watch` to be notified when the reviews are ready.",
            handle.task_id, handle.product_id
        ))
    }

    /// Triggers generation with a provided backend and store (for testing).
    pub async fn execute_with_client(
        &self,
        client: &impl ReviewBackend,
        store: &PendingStore,
        args: GenerateArgs,
    ) -> Result<TaskHandle> {
        let request = ReviewGenerationRequest::new(
            args.product_id,
            args.count,
            args.min_words,
            args.max_words,
            args.tones,
            args.research_links,
        );

        let handle = trigger_generation(client, store, &request).await?;
        Ok(handle)
    }
}

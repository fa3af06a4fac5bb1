//! Product command: single-record lookup with generated reviews.

use crate::backend::client::{BackendClient, ReviewBackend};
use crate::config::Config;
use crate::format::Formatter;
use anyhow::{Context, Result};
use tracing::info;

/// Looks up one product by id.
pub struct ProductCommand {
    config: Config,
}

impl ProductCommand {
    /// Creates a new product command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Fetches a product record and returns formatted output.
    pub async fn execute(&self, product_id: &str) -> Result<String> {
        let client = BackendClient::new(&self.config).context("Failed to create HTTP client")?;
        self.execute_with_client(&client, product_id).await
    }

    /// Fetches the record with a provided backend (for testing).
    pub async fn execute_with_client(
        &self,
        client: &impl ReviewBackend,
        product_id: &str,
    ) -> Result<String> {
        let product_id = product_id.trim();
        if product_id.is_empty() {
            anyhow::bail!("A product id is required.");
        }

        info!("Looking up product: {}", product_id);
        let detail = client.product_by_id(product_id).await?;

        let formatter = Formatter::new(self.config.format);
        Ok(formatter.format_detail(&detail))
    }
}

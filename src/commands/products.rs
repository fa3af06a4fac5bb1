//! Products command: the de-duplicated recent-product listing.

use crate::backend::client::{BackendClient, ReviewBackend};
use crate::backend::models::latest_unique_products;
use crate::config::Config;
use crate::format::Formatter;
use anyhow::{Context, Result};
use tracing::debug;

/// Lists recent products, most recent first.
pub struct ProductsCommand {
    config: Config,
}

impl ProductsCommand {
    /// Creates a new products command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Fetches and formats the product list.
    pub async fn execute(&self) -> Result<String> {
        let client = BackendClient::new(&self.config).context("Failed to create HTTP client")?;
        self.execute_with_client(&client).await
    }

    /// Fetches the list with a provided backend (for testing).
    pub async fn execute_with_client(&self, client: &impl ReviewBackend) -> Result<String> {
        let records = client.list_products().await?;
        debug!("Fetched {} raw product record(s)", records.len());

        let mut products = latest_unique_products(records);
        products.truncate(self.config.max_products);

        let formatter = Formatter::new(self.config.format);
        Ok(formatter.format_products(&products))
    }
}

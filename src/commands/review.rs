//! Review command: auxiliary mutations on generated reviews.

use crate::backend::client::{BackendClient, ReviewBackend};
use crate::backend::models::{
    HumanReviewPayload, RegeneratePayload, ReviewStatus, ReviewStatusPayload,
    SaveRegeneratedPayload,
};
use crate::config::Config;
use anyhow::{Context, Result};
use tracing::info;

/// Executes review mutations against the backend.
pub struct ReviewCommand {
    config: Config,
}

impl ReviewCommand {
    /// Creates a new review command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    fn client(&self) -> Result<BackendClient> {
        BackendClient::new(&self.config).context("Failed to create HTTP client")
    }

    /// Stores a human-written review.
    pub async fn add(
        &self,
        product_id: &str,
        title: &str,
        text: &str,
        doctor_name: Option<String>,
    ) -> Result<String> {
        let client = self.client()?;
        self.add_with_client(&client, product_id, title, text, doctor_name).await
    }

    pub async fn add_with_client(
        &self,
        client: &impl ReviewBackend,
        product_id: &str,
        title: &str,
        text: &str,
        doctor_name: Option<String>,
    ) -> Result<String> {
        if text.trim().is_empty() {
            anyhow::bail!("Review text must not be empty.");
        }

        let ack = client
            .add_human_review(&HumanReviewPayload {
                product_id: product_id.to_string(),
                review_title: title.to_string(),
                review_text: text.to_string(),
                doctor_name,
            })
            .await?;

        if !ack.success {
            anyhow::bail!(ack.message.unwrap_or_else(|| "Failed to add review.".to_string()));
        }
        Ok("Review added.".to_string())
    }

    /// Accepts or rejects a generated review.
    pub async fn set_status(
        &self,
        product_id: &str,
        review_id: &str,
        status: ReviewStatus,
    ) -> Result<String> {
        let client = self.client()?;
        self.set_status_with_client(&client, product_id, review_id, status).await
    }

    pub async fn set_status_with_client(
        &self,
        client: &impl ReviewBackend,
        product_id: &str,
        review_id: &str,
        status: ReviewStatus,
    ) -> Result<String> {
        info!("Marking review {} as {}", review_id, status);

        let ack = client
            .update_review_status(&ReviewStatusPayload {
                product_id: product_id.to_string(),
                review_id: review_id.to_string(),
                status,
            })
            .await?;

        if !ack.success {
            anyhow::bail!(ack
                .message
                .unwrap_or_else(|| "Failed to update review status.".to_string()));
        }
        Ok(format!("Review {} {}.", review_id, status))
    }

    /// Requests a rewritten version of a review and returns its text.
    pub async fn regenerate(
        &self,
        product_id: &str,
        review_id: &str,
        instructions: &str,
        target_word_count: Option<u32>,
    ) -> Result<String> {
        let client = self.client()?;
        self.regenerate_with_client(&client, product_id, review_id, instructions, target_word_count)
            .await
    }

    pub async fn regenerate_with_client(
        &self,
        client: &impl ReviewBackend,
        product_id: &str,
        review_id: &str,
        instructions: &str,
        target_word_count: Option<u32>,
    ) -> Result<String> {
        if instructions.trim().is_empty() {
            anyhow::bail!("Edit instructions must not be empty.");
        }

        let response = client
            .regenerate_review(&RegeneratePayload {
                product_id: product_id.to_string(),
                review_id: review_id.to_string(),
                edit_instructions: instructions.to_string(),
                target_word_count,
            })
            .await?;

        let review = match response.regenerated_review {
            Some(review) if response.success => review,
            _ => anyhow::bail!(response
                .error_message
                .unwrap_or_else(|| "Failed to regenerate review.".to_string())),
        };

        Ok(format!("{}\n\n{}", review.review_title, review.review_text))
    }

    /// Persists a regenerated review.
    pub async fn save(
        &self,
        product_id: &str,
        review_id: &str,
        title: Option<String>,
        text: &str,
    ) -> Result<String> {
        let client = self.client()?;
        self.save_with_client(&client, product_id, review_id, title, text).await
    }

    pub async fn save_with_client(
        &self,
        client: &impl ReviewBackend,
        product_id: &str,
        review_id: &str,
        title: Option<String>,
        text: &str,
    ) -> Result<String> {
        if text.trim().is_empty() {
            anyhow::bail!("Review text must not be empty.");
        }

        let ack = client
            .save_regenerated_review(&SaveRegeneratedPayload {
                product_id: product_id.to_string(),
                review_id: review_id.to_string(),
                review_title: title,
                review_text: text.to_string(),
            })
            .await?;

        if !ack.success {
            anyhow::bail!(ack.message.unwrap_or_else(|| "Failed to save review.".to_string()));
        }
        Ok("Review saved.".to_string())
    }
}

//! Review-generation trigger.
//!
//! Validates the configuration locally, submits the asynchronous generation
//! request, and registers the product id with the pending store so the
//! poller surfaces completion through the same mechanism as extraction.

use crate::backend::client::ReviewBackend;
use crate::backend::models::{GenerationPayload, WordLimits};
use crate::error::{ValidationError, WorkflowError};
use crate::state::PendingStore;
use std::collections::BTreeSet;
use tracing::info;

pub const MIN_REVIEWS: u32 = 1;
pub const MAX_REVIEWS: u32 = 20;
pub const MIN_WORDS: u32 = 10;
pub const MAX_WORDS: u32 = 200;

/// A validated-on-submit review-generation configuration.
#[derive(Debug, Clone)]
pub struct ReviewGenerationRequest {
    pub product_id: String,
    pub number_of_reviews: u32,
    pub word_limits: WordLimits,
    pub selected_tones: BTreeSet<String>,
    pub supporting_research_links: Vec<String>,
}

impl ReviewGenerationRequest {
    pub fn new(
        product_id: impl Into<String>,
        number_of_reviews: u32,
        min_words: u32,
        max_words: u32,
        tones: impl IntoIterator<Item = String>,
        research_links: Vec<String>,
    ) -> Self {
        Self {
            product_id: product_id.into(),
            number_of_reviews,
            word_limits: WordLimits { min: min_words, max: max_words },
            selected_tones: tones.into_iter().collect(),
            supporting_research_links: research_links,
        }
    }

    /// Checks every invariant before anything touches the network.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.product_id.trim().is_empty() {
            return Err(ValidationError::MissingProductId);
        }

        if self.selected_tones.is_empty() {
            return Err(ValidationError::NoTonesSelected);
        }

        if !(MIN_REVIEWS..=MAX_REVIEWS).contains(&self.number_of_reviews) {
            return Err(ValidationError::ReviewCountOutOfRange(self.number_of_reviews));
        }

        let WordLimits { min, max } = self.word_limits;
        if min >= max || min < MIN_WORDS || max > MAX_WORDS {
            return Err(ValidationError::InvalidWordRange { min, max });
        }

        Ok(())
    }

    /// Builds the wire payload, filtering blank research links.
    pub fn payload(&self) -> GenerationPayload {
        GenerationPayload {
            product_id: self.product_id.clone(),
            number_of_reviews: self.number_of_reviews,
            review_word_limits: self.word_limits,
            selected_review_tones: self.selected_tones.iter().cloned().collect(),
            supporting_research_links: self
                .supporting_research_links
                .iter()
                .filter(|link| !link.trim().is_empty())
                .cloned()
                .collect(),
        }
    }
}

/// Handle to a submitted generation task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskHandle {
    pub task_id: String,
    pub product_id: String,
}

/// Validates and submits a generation request. On success the product id is
/// registered as pending; on validation failure no network call is made.
pub async fn trigger_generation<B: ReviewBackend>(
    backend: &B,
    store: &PendingStore,
    request: &ReviewGenerationRequest,
) -> Result<TaskHandle, WorkflowError> {
    request.validate()?;

    let response = backend.generate_reviews(&request.payload()).await?;

    let task_id = match response.task_id {
        Some(id) if response.success && !id.trim().is_empty() => id,
        _ => return Err(WorkflowError::MissingTaskId),
    };

    store.register(&request.product_id).map_err(WorkflowError::State)?;
    info!(
        "Review generation started: task {} for product {}",
        task_id, request.product_id
    );

    Ok(TaskHandle { task_id, product_id: request.product_id.clone() })
}

//! Extraction request orchestrator: issues the metadata-extraction request
//! at most once per instance and classifies every possible outcome.
//!
//! Nothing escapes this boundary: transport errors, decode errors, and
//! backend-reported failures all collapse into `ExtractionOutcome`.

use crate::backend::client::ReviewBackend;
use crate::backend::models::{ExtractionResponse, ProductInfo};
use crate::workflow::normalize::CanonicalUrl;
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;
use tracing::{debug, info};

const EXTRACTION_FAILED_FALLBACK: &str = "Product extraction failed";
const MISSING_PRODUCT_ID_MESSAGE: &str =
    "Product extraction completed but no product ID was generated. Please try again.";

/// A submission captured at form-submit time. Immutable; discarded once
/// orchestration resolves.
#[derive(Debug, Clone)]
pub struct SubmissionRequest {
    pub product_url: CanonicalUrl,
    pub submitted_at: DateTime<Utc>,
}

impl SubmissionRequest {
    pub fn new(product_url: CanonicalUrl) -> Self {
        Self { product_url, submitted_at: Utc::now() }
    }
}

/// Terminal classification of an extraction attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractionOutcome {
    /// Extraction produced a product with at least one usable field.
    Success { product_id: String, product: ProductInfo },
    /// Extraction ran and produced an id, but no meaningful fields.
    EmptyResult { product_id: String },
    /// Extraction failed; `message` is ready for display.
    Failure { message: String },
}

/// Single-flight extraction driver. The guard is armed by the first
/// `submit` call and stays armed for the life of the instance: repeat
/// triggers on the same instance never reach the network. Tearing the
/// workflow down and building a new orchestrator is the only reset.
pub struct ExtractionOrchestrator<'a, B: ReviewBackend> {
    backend: &'a B,
    fired: AtomicBool,
}

impl<'a, B: ReviewBackend> ExtractionOrchestrator<'a, B> {
    pub fn new(backend: &'a B) -> Self {
        Self { backend, fired: AtomicBool::new(false) }
    }

    /// Whether this instance has already issued its request.
    pub fn has_fired(&self) -> bool {
        self.fired.load(Ordering::SeqCst)
    }

    /// Runs the extraction. Returns `None` when a request was already
    /// issued from this instance.
    pub async fn submit(&self, request: &SubmissionRequest) -> Option<ExtractionOutcome> {
        if self.fired.swap(true, Ordering::SeqCst) {
            debug!("Extraction already submitted from this workflow instance");
            return None;
        }

        Some(self.run(request).await)
    }

    async fn run(&self, request: &SubmissionRequest) -> ExtractionOutcome {
        info!("Submitting extraction for: {}", request.product_url);
        let started = Instant::now();

        let result = self.backend.extract_product_info(request.product_url.as_str()).await;
        debug!("Extraction request resolved in {}ms", started.elapsed().as_millis());

        match result {
            Ok(response) => classify(response),
            Err(err) => ExtractionOutcome::Failure { message: err.to_string() },
        }
    }
}

/// Classifies a well-formed extraction response.
///
/// Order matters: backend-reported failure first, then the missing-id check,
/// then the meaningful-data predicate.
pub fn classify(response: ExtractionResponse) -> ExtractionOutcome {
    if !response.product_extraction_succeed {
        let message = response
            .error_message
            .filter(|msg| !msg.trim().is_empty())
            .unwrap_or_else(|| EXTRACTION_FAILED_FALLBACK.to_string());
        return ExtractionOutcome::Failure { message };
    }

    let metadata = response.product_metadata;
    let product_id = metadata
        .as_ref()
        .and_then(|m| m.product_id.clone())
        .filter(|id| !id.trim().is_empty());

    let Some(product_id) = product_id else {
        return ExtractionOutcome::Failure { message: MISSING_PRODUCT_ID_MESSAGE.to_string() };
    };

    let product = metadata.and_then(|m| m.product_info).unwrap_or_default();
    if !product.has_meaningful_data() {
        return ExtractionOutcome::EmptyResult { product_id };
    }

    ExtractionOutcome::Success { product_id, product }
}

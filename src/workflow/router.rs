//! Completion router: the single place an extraction outcome becomes a
//! user-visible destination. Terminal; no retries here.

use super::normalize::CanonicalUrl;
use super::orchestrator::ExtractionOutcome;
use std::time::Duration;

/// Fixed explanation shown when extraction ran but yielded nothing usable.
pub const EMPTY_RESULT_MESSAGE: &str = "Product extraction completed but no meaningful product \
     data was found. This might be due to the website's structure or anti-bot protection. \
     Please try a different product URL.";

/// Shown when the workflow was entered without a URL at all.
pub const MISSING_URL_MESSAGE: &str = "No product URL was provided.";

/// A terminal navigation decision with the query parameters it carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// Confirmation destination; acted on after `delay` so the stage
    /// progression is visibly complete.
    ProcessingSuccess { url: CanonicalUrl, product_id: String, delay: Duration },
    /// Failure destination carrying a display-ready message. `url` is absent
    /// only when the workflow was entered without one.
    ProcessingFailed { url: Option<CanonicalUrl>, error: String },
}

impl Navigation {
    /// Destination path with url-encoded query parameters.
    pub fn path(&self) -> String {
        match self {
            Navigation::ProcessingSuccess { url, product_id, .. } => format!(
                "/processing-success?url={}&productId={}",
                urlencoding::encode(url.as_str()),
                product_id
            ),
            Navigation::ProcessingFailed { url: Some(url), error } => format!(
                "/processing-failed?url={}&error={}",
                urlencoding::encode(url.as_str()),
                urlencoding::encode(error)
            ),
            Navigation::ProcessingFailed { url: None, error } => {
                format!("/processing-failed?error={}", urlencoding::encode(error))
            }
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Navigation::ProcessingSuccess { .. })
    }

    /// The display delay, present only on success navigations.
    pub fn delay(&self) -> Option<Duration> {
        match self {
            Navigation::ProcessingSuccess { delay, .. } => Some(*delay),
            Navigation::ProcessingFailed { .. } => None,
        }
    }

    /// The carried error message, present only on failure navigations.
    pub fn error(&self) -> Option<&str> {
        match self {
            Navigation::ProcessingFailed { error, .. } => Some(error),
            Navigation::ProcessingSuccess { .. } => None,
        }
    }
}

/// Maps an outcome to its destination.
pub fn route(outcome: ExtractionOutcome, url: &CanonicalUrl, redirect_delay: Duration) -> Navigation {
    match outcome {
        ExtractionOutcome::Success { product_id, .. } => Navigation::ProcessingSuccess {
            url: url.clone(),
            product_id,
            delay: redirect_delay,
        },
        ExtractionOutcome::EmptyResult { .. } => Navigation::ProcessingFailed {
            url: Some(url.clone()),
            error: EMPTY_RESULT_MESSAGE.to_string(),
        },
        ExtractionOutcome::Failure { message } => {
            Navigation::ProcessingFailed { url: Some(url.clone()), error: message }
        }
    }
}

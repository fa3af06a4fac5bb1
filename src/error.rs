//! Error taxonomy for the review workflow.
//!
//! `ValidationError` covers local, pre-network failures and carries the
//! user-facing message verbatim. `BackendError` is produced by the HTTP
//! client with server messages already normalized. `WorkflowError` is the
//! umbrella the workflow components return; commands surface it via `anyhow`.

use thiserror::Error;

/// Local validation failures. Never reach the network.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Empty URL submitted.
    #[error("Please enter a URL")]
    EmptyUrl,

    /// URL could not be parsed, even after protocol defaulting.
    #[error("Please enter a valid URL")]
    InvalidUrl,

    /// Generation requested without a product id.
    #[error("Error: No product ID found. Please try again.")]
    MissingProductId,

    /// Generation requested with no review tones selected.
    #[error("Please select at least one review tone.")]
    NoTonesSelected,

    /// Review count outside the allowed range.
    #[error("number of reviews must be between 1 and 20, got {0}")]
    ReviewCountOutOfRange(u32),

    /// Word-count range violates min < max or the [10, 200] bounds.
    #[error("word count range must satisfy 10 <= min < max <= 200, got {min}..{max}")]
    InvalidWordRange { min: u32, max: u32 },
}

/// Failures reported by the backend client.
///
/// `Server` messages have already been through the error-body fallback
/// chain (explicit error field, raw body text, synthesized status line) and
/// are safe to show to the user as-is.
#[derive(Debug, Clone, Error)]
pub enum BackendError {
    /// Non-success HTTP status; message normalized from the response body.
    #[error("{0}")]
    Server(String),

    /// Network-level failure: connect, timeout, body read.
    #[error("request failed: {0}")]
    Transport(String),

    /// Success status but the body did not decode into the expected shape.
    #[error("unexpected response: {0}")]
    Malformed(String),
}

/// Umbrella error for workflow operations outside the extraction
/// orchestrator (which converts everything into an `ExtractionOutcome`).
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Backend(#[from] BackendError),

    /// Generation response missing `success`/`task_id`.
    #[error("Failed to get task ID from response")]
    MissingTaskId,

    /// Pending-store read or write failed.
    #[error("state store error: {0}")]
    State(anyhow::Error),
}

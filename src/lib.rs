//! frontrowmd-cli - review-generation workflow CLI for the FrontrowMD backend
//!
//! Drives the submit -> extract -> configure -> generate -> watch product
//! workflow against the FrontrowMD REST API.

pub mod backend;
pub mod commands;
pub mod config;
pub mod error;
pub mod format;
pub mod state;
pub mod workflow;

pub use backend::models::{ProductDetail, ProductInfo, ProductSummary};
pub use config::Config;
pub use workflow::normalize::CanonicalUrl;
pub use workflow::orchestrator::ExtractionOutcome;
pub use workflow::router::Navigation;

//! Backend modules for the HTTP client and wire data models.

pub mod client;
pub mod models;

#[cfg(test)]
pub mod testing;

pub use client::{BackendClient, ReviewBackend};
pub use models::{
    CreatedTime, ExtractionResponse, GeneratedReview, ProductDetail, ProductInfo, ProductSummary,
    RawProductRecord,
};

//! Wire models for the FrontrowMD backend, plus the adapters that normalize
//! its inconsistent response shapes.
//!
//! The backend is loose about where fields live: a product's name and image
//! may be top-level or nested under `product_info`, ingredients may be bare
//! strings or objects, and `created_time` may be an epoch number or an ISO
//! string. All of that ambiguity is resolved here, once, with a fixed field
//! priority; nothing downstream touches raw records.

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Placeholder name the extractor emits when it could not find a real one.
pub const PLACEHOLDER_PRODUCT_NAME: &str = "Unknown Product";

/// An ingredient entry: either a bare string or an object with a name field.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Ingredient {
    Name(String),
    Detailed { ingredient_name: String },
}

impl Ingredient {
    pub fn name(&self) -> &str {
        match self {
            Ingredient::Name(name) => name,
            Ingredient::Detailed { ingredient_name } => ingredient_name,
        }
    }
}

impl PartialEq for Ingredient {
    fn eq(&self, other: &Self) -> bool {
        self.name() == other.name()
    }
}

/// Structured product metadata produced by extraction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductInfo {
    #[serde(default)]
    pub product_name: String,
    #[serde(default)]
    pub product_description: String,
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
    #[serde(default)]
    pub product_image_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
}

impl ProductInfo {
    /// True when extraction produced at least one usable field: a real
    /// (non-placeholder) name, a description, ingredients, or an image URL.
    pub fn has_meaningful_data(&self) -> bool {
        let name = self.product_name.trim();
        (!name.is_empty() && name != PLACEHOLDER_PRODUCT_NAME)
            || !self.product_description.trim().is_empty()
            || !self.ingredients.is_empty()
            || !self.product_image_url.trim().is_empty()
    }
}

/// Response body of `extract_product_info`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractionResponse {
    #[serde(default)]
    pub product_extraction_succeed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_metadata: Option<ProductMetadata>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_info: Option<ProductInfo>,
}

/// A product's creation time as the backend serves it: epoch milliseconds
/// or an ISO-8601 string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CreatedTime {
    Millis(f64),
    Iso(String),
}

impl CreatedTime {
    /// Coerces either representation to epoch milliseconds. Unparseable ISO
    /// strings coerce to 0 so they always lose a recency comparison.
    pub fn epoch_millis(&self) -> i64 {
        match self {
            CreatedTime::Millis(ms) => *ms as i64,
            CreatedTime::Iso(s) => DateTime::parse_from_rfc3339(s)
                .map(|dt| dt.timestamp_millis())
                .or_else(|_| {
                    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
                        .map(|dt| dt.and_utc().timestamp_millis())
                })
                .unwrap_or(0),
        }
    }
}

impl std::fmt::Display for CreatedTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CreatedTime::Millis(ms) => write!(f, "{}", *ms as i64),
            CreatedTime::Iso(s) => write!(f, "{}", s),
        }
    }
}

/// A product record exactly as the list endpoint serves it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawProductRecord {
    #[serde(default)]
    pub product_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_info: Option<ProductInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_time: Option<CreatedTime>,
}

/// Response body of the product list endpoint. `products` is required: a
/// body without it is malformed, not an empty catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductsResponse {
    pub products: Vec<RawProductRecord>,
}

/// A normalized product record; the only shape the rest of the program
/// is allowed to display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSummary {
    pub product_id: String,
    pub product_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_time: Option<CreatedTime>,
}

impl ProductSummary {
    /// Normalizes a raw record. Field priority: top-level name, else the
    /// one nested under `product_info`; same for the image URL. Records
    /// without a name in either place are dropped (`None`).
    pub fn from_raw(raw: RawProductRecord) -> Option<Self> {
        let nested = raw.product_info;

        let product_name = raw
            .product_name
            .filter(|name| !name.trim().is_empty())
            .or_else(|| {
                nested
                    .as_ref()
                    .map(|info| info.product_name.clone())
                    .filter(|name| !name.trim().is_empty())
            })?;

        let product_image_url = raw
            .product_image_url
            .filter(|url| !url.trim().is_empty())
            .or_else(|| {
                nested
                    .as_ref()
                    .map(|info| info.product_image_url.clone())
                    .filter(|url| !url.trim().is_empty())
            });

        Some(Self {
            product_id: raw.product_id,
            product_name,
            product_image_url,
            created_time: raw.created_time,
        })
    }

    /// Key used for de-duplication: lowercased, trimmed name.
    pub fn normalized_name(&self) -> String {
        self.product_name.to_lowercase().trim().to_string()
    }

    /// Creation time in epoch milliseconds; 0 when absent.
    pub fn created_millis(&self) -> i64 {
        self.created_time.as_ref().map(CreatedTime::epoch_millis).unwrap_or(0)
    }
}

/// Reduces a raw product list to displayable summaries: drops nameless
/// records, keeps only the most recently created record per normalized
/// name (regardless of which time representation each record uses), and
/// orders the result most-recent-first.
pub fn latest_unique_products(records: Vec<RawProductRecord>) -> Vec<ProductSummary> {
    let mut unique: std::collections::HashMap<String, ProductSummary> =
        std::collections::HashMap::new();

    for record in records {
        let Some(summary) = ProductSummary::from_raw(record) else {
            continue;
        };

        let key = summary.normalized_name();
        let newer = match unique.get(&key) {
            Some(existing) => summary.created_millis() > existing.created_millis(),
            None => true,
        };
        if newer {
            unique.insert(key, summary);
        }
    }

    let mut products: Vec<ProductSummary> = unique.into_values().collect();
    products.sort_by(|a, b| {
        b.created_millis()
            .cmp(&a.created_millis())
            .then_with(|| a.product_name.cmp(&b.product_name))
    });
    products
}

/// One AI-generated review on a product record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneratedReview {
    #[serde(default)]
    pub review_id: String,
    #[serde(default)]
    pub review_title: String,
    #[serde(default)]
    pub review_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_tone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doctor_name: Option<String>,
}

/// Response body of `get_product_by_id`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductDetailResponse {
    #[serde(default)]
    pub product: ProductDetail,
}

/// A full product record with generated reviews and review bookkeeping.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductDetail {
    #[serde(default)]
    pub product_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_info: Option<ProductInfo>,
    #[serde(default)]
    pub enhanced_generated_reviews: Vec<GeneratedReview>,
    #[serde(default)]
    pub accepted_review_ids: Vec<String>,
    #[serde(default)]
    pub rejected_review_ids: Vec<String>,
}

impl ProductDetail {
    /// Review disposition as tracked by the accepted/rejected id sets.
    pub fn review_disposition(&self, review_id: &str) -> ReviewDisposition {
        if self.accepted_review_ids.iter().any(|id| id == review_id) {
            ReviewDisposition::Accepted
        } else if self.rejected_review_ids.iter().any(|id| id == review_id) {
            ReviewDisposition::Rejected
        } else {
            ReviewDisposition::Pending
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewDisposition {
    Pending,
    Accepted,
    Rejected,
}

impl std::fmt::Display for ReviewDisposition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReviewDisposition::Pending => write!(f, "pending"),
            ReviewDisposition::Accepted => write!(f, "accepted"),
            ReviewDisposition::Rejected => write!(f, "rejected"),
        }
    }
}

/// Wire payload of `generate_reviews_async`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationPayload {
    pub product_id: String,
    pub number_of_reviews: u32,
    pub review_word_limits: WordLimits,
    pub selected_review_tones: Vec<String>,
    pub supporting_research_links: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordLimits {
    pub min: u32,
    pub max: u32,
}

/// Response body of `generate_reviews_async`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerationResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
}

/// Status value accepted by `update_review_status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewStatus {
    Accepted,
    Rejected,
}

impl std::fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReviewStatus::Accepted => write!(f, "accepted"),
            ReviewStatus::Rejected => write!(f, "rejected"),
        }
    }
}

/// Wire payload of `add_human_review`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HumanReviewPayload {
    pub product_id: String,
    pub review_title: String,
    pub review_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doctor_name: Option<String>,
}

/// Wire payload of `update_review_status`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewStatusPayload {
    pub product_id: String,
    pub review_id: String,
    pub status: ReviewStatus,
}

/// Wire payload of `regenerate_review`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegeneratePayload {
    pub product_id: String,
    pub review_id: String,
    pub edit_instructions: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_word_count: Option<u32>,
}

/// Response body of `regenerate_review`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegenerateResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regenerated_review: Option<GeneratedReview>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

/// Wire payload of `save_regenerated_review`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveRegeneratedPayload {
    pub product_id: String,
    pub review_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_title: Option<String>,
    pub review_text: String,
}

/// Generic acknowledgement for the auxiliary mutation endpoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MutationAck {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

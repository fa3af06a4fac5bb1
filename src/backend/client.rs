//! HTTP client for the FrontrowMD backend.
//!
//! All endpoints speak JSON, but error bodies are unreliable: they may be a
//! JSON object with any of several message fields, a bare text blob, or
//! nothing at all. `server_error_message` implements the one fallback chain
//! every endpoint shares, so callers always get a human-readable message.

use crate::config::Config;
use crate::error::BackendError;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;
use wreq::{Client, StatusCode};

use super::models::{
    ExtractionResponse, GenerationPayload, GenerationResponse, HumanReviewPayload, MutationAck,
    ProductDetail, ProductDetailResponse, ProductsResponse, RawProductRecord, RegeneratePayload,
    RegenerateResponse, ReviewStatusPayload, SaveRegeneratedPayload,
};

/// Trait over the backend endpoints - enables mocking for tests.
#[async_trait]
pub trait ReviewBackend: Send + Sync {
    /// Submits a product URL for metadata extraction.
    async fn extract_product_info(
        &self,
        product_url: &str,
    ) -> Result<ExtractionResponse, BackendError>;

    /// Fetches the full product list (cache-busted).
    async fn list_products(&self) -> Result<Vec<RawProductRecord>, BackendError>;

    /// Fetches one product record with its generated reviews.
    async fn product_by_id(&self, product_id: &str) -> Result<ProductDetail, BackendError>;

    /// Triggers asynchronous review generation.
    async fn generate_reviews(
        &self,
        payload: &GenerationPayload,
    ) -> Result<GenerationResponse, BackendError>;

    /// Stores a human-written review.
    async fn add_human_review(
        &self,
        payload: &HumanReviewPayload,
    ) -> Result<MutationAck, BackendError>;

    /// Accepts or rejects a generated review.
    async fn update_review_status(
        &self,
        payload: &ReviewStatusPayload,
    ) -> Result<MutationAck, BackendError>;

    /// Requests a rewritten version of a generated review.
    async fn regenerate_review(
        &self,
        payload: &RegeneratePayload,
    ) -> Result<RegenerateResponse, BackendError>;

    /// Persists a regenerated review.
    async fn save_regenerated_review(
        &self,
        payload: &SaveRegeneratedPayload,
    ) -> Result<MutationAck, BackendError>;
}

/// Backend HTTP client over wreq.
pub struct BackendClient {
    client: Client,
    base_url: String,
}

impl BackendClient {
    /// Creates a new client from the configuration.
    pub fn new(config: &Config) -> Result<Self> {
        let mut builder = Client::builder()
            .gzip(true)
            .brotli(true)
            .timeout(config.request_timeout())
            .connect_timeout(config.connect_timeout());

        if let Some(proxy_url) = &config.proxy {
            debug!("Configuring proxy: {}", proxy_url);
            let proxy = wreq::Proxy::all(proxy_url).context("Failed to configure proxy")?;
            builder = builder.proxy(proxy);
        }

        let client = builder.build()?;

        Ok(Self { client, base_url: config.base_url.trim_end_matches('/').to_string() })
    }

    /// Returns the configured base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, BackendError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .header("Cache-Control", "no-cache, no-store, must-revalidate")
            .header("Pragma", "no-cache")
            .header("Expires", "0")
            .send()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;

        Self::decode(response).await
    }

    async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        payload: &impl Serialize,
    ) -> Result<T, BackendError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("POST {}", url);

        let body =
            serde_json::to_string(payload).map_err(|e| BackendError::Malformed(e.to_string()))?;

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
            .header("Cache-Control", "no-cache")
            .body(body)
            .send()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;

        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(response: wreq::Response) -> Result<T, BackendError> {
        let status = response.status();
        debug!("Response status: {}", status);

        let text =
            response.text().await.map_err(|e| BackendError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(BackendError::Server(server_error_message(status, &text)));
        }

        serde_json::from_str(&text).map_err(|e| BackendError::Malformed(e.to_string()))
    }
}

/// Normalizes a non-success response body into a display message.
///
/// Priority: explicit `error_message`, then `message`, then `detail` from a
/// JSON object body; then the default `HTTP <status>: <reason>` line for
/// JSON bodies with none of those fields; then the raw body text when the
/// body is not JSON; then a synthesized `Server error` line when the body is
/// blank.
fn server_error_message(status: StatusCode, body: &str) -> String {
    let reason = status.canonical_reason().unwrap_or("Unknown Error");

    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(value) => ["error_message", "message", "detail"]
            .iter()
            .find_map(|key| {
                value
                    .get(key)
                    .and_then(|v| v.as_str())
                    .map(str::trim)
                    .filter(|msg| !msg.is_empty())
                    .map(String::from)
            })
            .unwrap_or_else(|| format!("HTTP {}: {}", status.as_u16(), reason)),
        Err(_) if !body.trim().is_empty() => body.to_string(),
        Err(_) => format!("Server error ({}): {}", status.as_u16(), reason),
    }
}

#[async_trait]
impl ReviewBackend for BackendClient {
    async fn extract_product_info(
        &self,
        product_url: &str,
    ) -> Result<ExtractionResponse, BackendError> {
        let payload = serde_json::json!({ "product_url": product_url });
        self.post_json("/frontrowmd/product_metadata_extraction/extract_product_info", &payload)
            .await
    }

    async fn list_products(&self) -> Result<Vec<RawProductRecord>, BackendError> {
        // Cache-busted so intermediaries never serve a stale catalog to the poller.
        let path = format!("/frontrowmd/products?t={}", chrono::Utc::now().timestamp_millis());
        let response: ProductsResponse = self.get_json(&path).await?;
        Ok(response.products)
    }

    async fn product_by_id(&self, product_id: &str) -> Result<ProductDetail, BackendError> {
        let path = format!("/frontrowmd/get_product_by_id/{}", urlencoding::encode(product_id));
        let response: ProductDetailResponse = self.get_json(&path).await?;
        Ok(response.product)
    }

    async fn generate_reviews(
        &self,
        payload: &GenerationPayload,
    ) -> Result<GenerationResponse, BackendError> {
        self.post_json("/frontrowmd/generate_reviews_async", payload).await
    }

    async fn add_human_review(
        &self,
        payload: &HumanReviewPayload,
    ) -> Result<MutationAck, BackendError> {
        self.post_json("/frontrowmd/add_human_review", payload).await
    }

    async fn update_review_status(
        &self,
        payload: &ReviewStatusPayload,
    ) -> Result<MutationAck, BackendError> {
        self.post_json("/frontrowmd/update_review_status", payload).await
    }

    async fn regenerate_review(
        &self,
        payload: &RegeneratePayload,
    ) -> Result<RegenerateResponse, BackendError> {
        self.post_json("/frontrowmd/regenerate_review", payload).await
    }

    async fn save_regenerated_review(
        &self,
        payload: &SaveRegeneratedPayload,
    ) -> Result<MutationAck, BackendError> {
        self.post_json("/frontrowmd/save_regenerated_review", payload).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json_string, method, path, path_regex};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn make_test_config(base_url: String) -> Config {
        Config { base_url, ..Config::default() }
    }

    fn status(code: u16) -> StatusCode {
        StatusCode::from_u16(code).unwrap()
    }

    #[test]
    fn test_error_message_priority_order() {
        let body = r#"{"error_message": "primary", "message": "secondary", "detail": "tertiary"}"#;
        assert_eq!(server_error_message(status(500), body), "primary");

        let body = r#"{"message": "secondary", "detail": "tertiary"}"#;
        assert_eq!(server_error_message(status(500), body), "secondary");

        let body = r#"{"detail": "tertiary"}"#;
        assert_eq!(server_error_message(status(500), body), "tertiary");
    }

    #[test]
    fn test_error_message_json_without_known_fields() {
        let body = r#"{"unrelated": true}"#;
        assert_eq!(
            server_error_message(status(500), body),
            "HTTP 500: Internal Server Error"
        );
    }

    #[test]
    fn test_error_message_blank_json_fields_fall_through() {
        let body = r#"{"error_message": "  ", "message": "usable"}"#;
        assert_eq!(server_error_message(status(502), body), "usable");
    }

    #[test]
    fn test_error_message_raw_text_body() {
        assert_eq!(server_error_message(status(500), "oops"), "oops");
    }

    #[test]
    fn test_error_message_blank_body_synthesized() {
        assert_eq!(
            server_error_message(status(500), "   "),
            "Server error (500): Internal Server Error"
        );
        assert_eq!(server_error_message(status(404), ""), "Server error (404): Not Found");
    }

    #[tokio::test]
    async fn test_extract_success() {
        let mock_server = MockServer::start().await;

        let body = r#"{
            "product_extraction_succeed": true,
            "product_metadata": {
                "product_id": "abc",
                "product_info": {"product_name": "Widget"}
            }
        }"#;

        Mock::given(method("POST"))
            .and(path("/frontrowmd/product_metadata_extraction/extract_product_info"))
            .and(body_json_string(r#"{"product_url": "https://example.com/p"}"#))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(&mock_server)
            .await;

        let config = make_test_config(mock_server.uri());
        let client = BackendClient::new(&config).unwrap();

        let response = client.extract_product_info("https://example.com/p").await.unwrap();
        assert!(response.product_extraction_succeed);
        let metadata = response.product_metadata.unwrap();
        assert_eq!(metadata.product_id.as_deref(), Some("abc"));
    }

    #[tokio::test]
    async fn test_extract_server_error_json_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/frontrowmd/product_metadata_extraction/extract_product_info"))
            .respond_with(
                ResponseTemplate::new(500)
                    .set_body_string(r#"{"error_message": "extractor crashed"}"#),
            )
            .mount(&mock_server)
            .await;

        let config = make_test_config(mock_server.uri());
        let client = BackendClient::new(&config).unwrap();

        let err = client.extract_product_info("https://example.com/p").await.unwrap_err();
        assert_eq!(err.to_string(), "extractor crashed");
    }

    #[tokio::test]
    async fn test_extract_server_error_text_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/frontrowmd/product_metadata_extraction/extract_product_info"))
            .respond_with(ResponseTemplate::new(500).set_body_string("oops"))
            .mount(&mock_server)
            .await;

        let config = make_test_config(mock_server.uri());
        let client = BackendClient::new(&config).unwrap();

        let err = client.extract_product_info("https://example.com/p").await.unwrap_err();
        assert_eq!(err.to_string(), "oops");
    }

    #[tokio::test]
    async fn test_list_products_is_cache_busted() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/frontrowmd/products"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"{"products": [{"product_id": "p1", "product_name": "A"}]}"#),
            )
            .mount(&mock_server)
            .await;

        let config = make_test_config(mock_server.uri());
        let client = BackendClient::new(&config).unwrap();

        let products = client.list_products().await.unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].product_id, "p1");

        // The cache-busting query parameter must be present on the request.
        let requests = mock_server.received_requests().await.unwrap();
        assert!(requests[0].url.query().unwrap_or("").starts_with("t="));
    }

    #[tokio::test]
    async fn test_list_products_missing_key_is_malformed() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/frontrowmd/products"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
            .mount(&mock_server)
            .await;

        let config = make_test_config(mock_server.uri());
        let client = BackendClient::new(&config).unwrap();

        let err = client.list_products().await.unwrap_err();
        assert!(matches!(err, BackendError::Malformed(_)));
    }

    #[tokio::test]
    async fn test_product_by_id() {
        let mock_server = MockServer::start().await;

        let body = r#"{
            "product": {
                "product_id": "abc",
                "product_info": {"product_name": "Widget"},
                "enhanced_generated_reviews": [
                    {"review_id": "r1", "review_title": "Great", "review_text": "Works."}
                ],
                "accepted_review_ids": ["r1"]
            }
        }"#;

        Mock::given(method("GET"))
            .and(path_regex(r"^/frontrowmd/get_product_by_id/abc$"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(&mock_server)
            .await;

        let config = make_test_config(mock_server.uri());
        let client = BackendClient::new(&config).unwrap();

        let detail = client.product_by_id("abc").await.unwrap();
        assert_eq!(detail.product_id, "abc");
        assert_eq!(detail.enhanced_generated_reviews.len(), 1);
        assert_eq!(detail.accepted_review_ids, vec!["r1".to_string()]);
    }

    #[tokio::test]
    async fn test_generate_reviews_round_trip() {
        use crate::backend::models::WordLimits;

        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/frontrowmd/generate_reviews_async"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"{"success": true, "task_id": "task-9"}"#),
            )
            .mount(&mock_server)
            .await;

        let config = make_test_config(mock_server.uri());
        let client = BackendClient::new(&config).unwrap();

        let payload = GenerationPayload {
            product_id: "abc".to_string(),
            number_of_reviews: 5,
            review_word_limits: WordLimits { min: 80, max: 120 },
            selected_review_tones: vec!["clinical_authority".to_string()],
            supporting_research_links: vec![],
        };

        let response = client.generate_reviews(&payload).await.unwrap();
        assert!(response.success);
        assert_eq!(response.task_id.as_deref(), Some("task-9"));
    }

    #[tokio::test]
    async fn test_update_review_status() {
        use crate::backend::models::ReviewStatus;

        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/frontrowmd/update_review_status"))
            .and(body_json_string(
                r#"{"product_id": "abc", "review_id": "r1", "status": "accepted"}"#,
            ))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"success": true}"#))
            .mount(&mock_server)
            .await;

        let config = make_test_config(mock_server.uri());
        let client = BackendClient::new(&config).unwrap();

        let ack = client
            .update_review_status(&ReviewStatusPayload {
                product_id: "abc".to_string(),
                review_id: "r1".to_string(),
                status: ReviewStatus::Accepted,
            })
            .await
            .unwrap();
        assert!(ack.success);
    }

    #[tokio::test]
    async fn test_transport_error_is_not_server_error() {
        // Point at a port nothing listens on
        let config = make_test_config("http://127.0.0.1:1".to_string());
        let client = BackendClient::new(&config).unwrap();

        let err = client.list_products().await.unwrap_err();
        assert!(matches!(err, BackendError::Transport(_)));
    }

    #[tokio::test]
    async fn test_malformed_success_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/frontrowmd/generate_reviews_async"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&mock_server)
            .await;

        let config = make_test_config(mock_server.uri());
        let client = BackendClient::new(&config).unwrap();

        let payload = GenerationPayload {
            product_id: "abc".to_string(),
            number_of_reviews: 1,
            review_word_limits: crate::backend::models::WordLimits { min: 10, max: 20 },
            selected_review_tones: vec!["t".to_string()],
            supporting_research_links: vec![],
        };

        let err = client.generate_reviews(&payload).await.unwrap_err();
        assert!(matches!(err, BackendError::Malformed(_)));
    }

    #[tokio::test]
    async fn test_base_url_trailing_slash_trimmed() {
        let config = make_test_config("http://backend:5001/".to_string());
        let client = BackendClient::new(&config).unwrap();
        assert_eq!(client.base_url(), "http://backend:5001");
    }
}

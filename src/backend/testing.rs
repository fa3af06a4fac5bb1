//! Configurable mock backend shared by the unit tests.

use super::client::ReviewBackend;
use super::models::{
    ExtractionResponse, GenerationPayload, GenerationResponse, HumanReviewPayload, MutationAck,
    ProductDetail, RawProductRecord, RegeneratePayload, RegenerateResponse, ReviewStatusPayload,
    SaveRegeneratedPayload,
};
use crate::error::BackendError;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

type BackendResult<T> = Result<T, BackendError>;

/// Mock `ReviewBackend` with per-endpoint scripting and call counters.
///
/// `list_products` pops from a scripted sequence first (one entry per call)
/// and falls back to a fixed response once the script is exhausted, which is
/// what poller tests need to model eventually-consistent catalogs.
pub struct MockBackend {
    extract_result: Mutex<BackendResult<ExtractionResponse>>,
    list_script: Mutex<VecDeque<BackendResult<Vec<RawProductRecord>>>>,
    list_fallback: Mutex<BackendResult<Vec<RawProductRecord>>>,
    detail_result: Mutex<BackendResult<ProductDetail>>,
    generate_result: Mutex<BackendResult<GenerationResponse>>,
    extract_calls: AtomicU32,
    list_calls: AtomicU32,
    generate_calls: AtomicU32,
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            extract_result: Mutex::new(Ok(ExtractionResponse::default())),
            list_script: Mutex::new(VecDeque::new()),
            list_fallback: Mutex::new(Ok(Vec::new())),
            detail_result: Mutex::new(Ok(ProductDetail::default())),
            generate_result: Mutex::new(Ok(GenerationResponse::default())),
            extract_calls: AtomicU32::new(0),
            list_calls: AtomicU32::new(0),
            generate_calls: AtomicU32::new(0),
        }
    }

    pub fn with_extraction(self, result: BackendResult<ExtractionResponse>) -> Self {
        *self.extract_result.lock().unwrap() = result;
        self
    }

    pub fn with_list(self, result: BackendResult<Vec<RawProductRecord>>) -> Self {
        *self.list_fallback.lock().unwrap() = result;
        self
    }

    pub fn with_list_sequence(
        self,
        sequence: Vec<BackendResult<Vec<RawProductRecord>>>,
    ) -> Self {
        *self.list_script.lock().unwrap() = sequence.into();
        self
    }

    pub fn with_detail(self, result: BackendResult<ProductDetail>) -> Self {
        *self.detail_result.lock().unwrap() = result;
        self
    }

    pub fn with_generation(self, result: BackendResult<GenerationResponse>) -> Self {
        *self.generate_result.lock().unwrap() = result;
        self
    }

    pub fn extract_calls(&self) -> u32 {
        self.extract_calls.load(Ordering::SeqCst)
    }

    pub fn list_calls(&self) -> u32 {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn generate_calls(&self) -> u32 {
        self.generate_calls.load(Ordering::SeqCst)
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReviewBackend for MockBackend {
    async fn extract_product_info(
        &self,
        _product_url: &str,
    ) -> BackendResult<ExtractionResponse> {
        self.extract_calls.fetch_add(1, Ordering::SeqCst);
        self.extract_result.lock().unwrap().clone()
    }

    async fn list_products(&self) -> BackendResult<Vec<RawProductRecord>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(result) = self.list_script.lock().unwrap().pop_front() {
            return result;
        }
        self.list_fallback.lock().unwrap().clone()
    }

    async fn product_by_id(&self, _product_id: &str) -> BackendResult<ProductDetail> {
        self.detail_result.lock().unwrap().clone()
    }

    async fn generate_reviews(
        &self,
        _payload: &GenerationPayload,
    ) -> BackendResult<GenerationResponse> {
        self.generate_calls.fetch_add(1, Ordering::SeqCst);
        self.generate_result.lock().unwrap().clone()
    }

    async fn add_human_review(
        &self,
        _payload: &HumanReviewPayload,
    ) -> BackendResult<MutationAck> {
        Ok(MutationAck { success: true, message: None })
    }

    async fn update_review_status(
        &self,
        _payload: &ReviewStatusPayload,
    ) -> BackendResult<MutationAck> {
        Ok(MutationAck { success: true, message: None })
    }

    async fn regenerate_review(
        &self,
        _payload: &RegeneratePayload,
    ) -> BackendResult<RegenerateResponse> {
        Ok(RegenerateResponse::default())
    }

    async fn save_regenerated_review(
        &self,
        _payload: &SaveRegeneratedPayload,
    ) -> BackendResult<MutationAck> {
        Ok(MutationAck { success: true, message: None })
    }
}

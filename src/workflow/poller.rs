//! Eventual-consistency poller.
//!
//! Products registered as pending exist server-side before they show up in
//! the product list. The poller re-fetches the list on a fixed cadence,
//! reconciles it against the durable pending set, announces each arrival,
//! and stops itself once the set drains. One loop means one timer and one
//! fetch in flight; a failed fetch is logged and retried on the next tick.

use super::{EventSender, WorkflowEvent};
use crate::backend::client::ReviewBackend;
use crate::backend::models::latest_unique_products;
use crate::error::WorkflowError;
use crate::state::PendingStore;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// How a `run` ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// Every pending product was observed; `resolved` lists them in arrival
    /// order.
    Drained { resolved: Vec<String> },
    /// The configured timeout elapsed with products still pending. The
    /// pending set is left intact so a later run resumes.
    StillProcessing { pending: Vec<String> },
}

/// Polls the product list until the pending set drains.
pub struct Poller<'a, B: ReviewBackend> {
    backend: &'a B,
    store: &'a PendingStore,
    interval: Duration,
    timeout: Option<Duration>,
    events: EventSender,
}

impl<'a, B: ReviewBackend> Poller<'a, B> {
    pub fn new(
        backend: &'a B,
        store: &'a PendingStore,
        interval: Duration,
        timeout: Option<Duration>,
        events: EventSender,
    ) -> Self {
        Self { backend, store, interval, timeout, events }
    }

    /// One reconcile pass: fetch, de-duplicate, intersect with the pending
    /// set, persist the removal. Returns the ids that just became live.
    pub async fn tick(&self) -> Result<Vec<String>, WorkflowError> {
        let pending = self.store.load();
        if pending.is_empty() {
            return Ok(Vec::new());
        }

        let records = self.backend.list_products().await?;
        let products = latest_unique_products(records);

        let arrived: Vec<String> = pending
            .into_iter()
            .filter(|id| products.iter().any(|p| &p.product_id == id))
            .collect();

        if arrived.is_empty() {
            return Ok(Vec::new());
        }

        self.store.remove_many(&arrived).map_err(WorkflowError::State)?;
        for product_id in &arrived {
            info!("Pending product is now live: {}", product_id);
            let _ = self
                .events
                .send(WorkflowEvent::ProductLive { product_id: product_id.clone() });
        }

        Ok(arrived)
    }

    /// Runs the poll loop until the pending set drains or the optional
    /// timeout elapses. Returns immediately when nothing is pending.
    pub async fn run(&self) -> Result<PollOutcome, WorkflowError> {
        let mut resolved = Vec::new();

        if self.store.load().is_empty() {
            return Ok(PollOutcome::Drained { resolved });
        }

        let started = Instant::now();
        loop {
            match self.tick().await {
                Ok(arrived) => resolved.extend(arrived),
                // The poller itself is the retry mechanism: log and keep going
                Err(err) => warn!("Product list fetch failed: {}", err),
            }

            let pending = self.store.load();
            if pending.is_empty() {
                return Ok(PollOutcome::Drained { resolved });
            }

            if let Some(timeout) = self.timeout {
                if started.elapsed() >= timeout {
                    debug!("Poll timeout elapsed with {} product(s) pending", pending.len());
                    return Ok(PollOutcome::StillProcessing { pending });
                }
            }

            let _ = self.events.send(WorkflowEvent::PollWaiting { pending: pending.len() });
            tokio::time::sleep(self.interval).await;
        }
    }
}

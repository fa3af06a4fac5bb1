//! The product-processing workflow core: URL normalization, single-flight
//! extraction, cosmetic stage progression, terminal routing, the
//! eventual-consistency poller, and the review-generation trigger.

pub mod generation;
pub mod normalize;
pub mod orchestrator;
pub mod poller;
pub mod router;
pub mod stages;

use stages::Stage;
use tokio::sync::mpsc;

/// Progress notifications emitted by workflow components for the CLI to
/// render. Rendering never happens inside the workflow itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowEvent {
    /// A stage of the cosmetic progression became active.
    StageStarted(Stage),
    /// A stage of the cosmetic progression finished.
    StageCompleted(Stage),
    /// The progression was force-completed because extraction succeeded.
    StagesForceCompleted,
    /// A pending product was observed in the product list.
    ProductLive { product_id: String },
    /// The poller is waiting for pending products to appear.
    PollWaiting { pending: usize },
}

pub type EventSender = mpsc::UnboundedSender<WorkflowEvent>;

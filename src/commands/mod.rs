//! Command implementations for the CLI.

pub mod generate;
pub mod product;
pub mod products;
pub mod review;
pub mod submit;
pub mod watch;

pub use generate::{GenerateArgs, GenerateCommand};
pub use product::ProductCommand;
pub use products::ProductsCommand;
pub use review::ReviewCommand;
pub use submit::SubmitCommand;
pub use watch::WatchCommand;

use crate::workflow::WorkflowEvent;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tokio::task::JoinHandle;

/// Renders a workflow event as a progress line.
pub(crate) fn render_event(event: &WorkflowEvent) -> String {
    match event {
        WorkflowEvent::StageStarted(stage) => format!("-> {}", stage.message()),
        WorkflowEvent::StageCompleted(stage) => format!("   {} done", stage.label()),
        WorkflowEvent::StagesForceCompleted => {
            "Analysis complete! Redirecting to review page...".to_string()
        }
        WorkflowEvent::ProductLive { product_id } => {
            format!("Your new product is now live! ({})", product_id)
        }
        WorkflowEvent::PollWaiting { .. } => {
            "We're processing your new product(s). They'll appear shortly.".to_string()
        }
    }
}

/// Spawns a task that prints workflow events as they arrive. The task ends
/// when every sender is dropped.
pub(crate) fn spawn_event_printer(
    mut events: UnboundedReceiver<WorkflowEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            println!("{}", render_event(&event));
        }
    })
}

/// Convenience pair used by every command that streams progress.
pub(crate) fn event_channel(
) -> (mpsc::UnboundedSender<WorkflowEvent>, UnboundedReceiver<WorkflowEvent>) {
    mpsc::unbounded_channel()
}

//! Outbound events to the host UI

use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

use crate::models::{Artifact, CompletionReason, DeployOutcome};

/// Receiver of everything the deployer reports to its host
pub trait EventSink: Send + Sync {
    /// The package was resolved and its artifacts listed
    fn on_artifact_list_ready(&self, artifacts: &[Artifact]);

    /// A deployment is about to start
    fn on_deploy_progress(&self, artifact_id: &str);

    /// A deployment attempt finished
    fn on_deploy_result(&self, outcome: &DeployOutcome);

    /// The batch loop ended
    fn on_batch_complete(&self, processed: usize, reason: CompletionReason);

    /// Package resolution failed, nothing can be deployed
    fn on_fatal_error(&self, message: &str);
}

/// Owned form of the sink callbacks, for channel based hosts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeployEvent {
    ArtifactListReady(Vec<Artifact>),
    DeployProgress(String),
    DeployResult(DeployOutcome),
    BatchComplete {
        processed: usize,
        reason: CompletionReason,
    },
    FatalError(String),
}

impl EventSink for UnboundedSender<DeployEvent> {
    fn on_artifact_list_ready(&self, artifacts: &[Artifact]) {
        forward(self, DeployEvent::ArtifactListReady(artifacts.to_vec()));
    }

    fn on_deploy_progress(&self, artifact_id: &str) {
        forward(self, DeployEvent::DeployProgress(artifact_id.to_string()));
    }

    fn on_deploy_result(&self, outcome: &DeployOutcome) {
        forward(self, DeployEvent::DeployResult(outcome.clone()));
    }

    fn on_batch_complete(&self, processed: usize, reason: CompletionReason) {
        forward(self, DeployEvent::BatchComplete { processed, reason });
    }

    fn on_fatal_error(&self, message: &str) {
        forward(self, DeployEvent::FatalError(message.to_string()));
    }
}

fn forward(sender: &UnboundedSender<DeployEvent>, event: DeployEvent) {
    if sender.send(event).is_err() {
        debug!("Event receiver dropped");
    }
}

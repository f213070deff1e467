//! Batch orchestration
//!
//! Works through a caller-selected list of artifact ids strictly in order,
//! one deployment at a time. Individual failures are reported as outcomes and
//! never stop the loop.

use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::app::events::EventSink;
use crate::app::session::Session;
use crate::deploy::executor::DeployExecutor;
use crate::deploy::fsm::{BatchEvent, BatchFsm};
use crate::errors::DeployerError;
use crate::models::{BatchSummary, CompletionReason, DeployOutcome};

/// Batch FSM shared between the running batch and cancel requests
pub type SharedFsm = Arc<Mutex<BatchFsm>>;

/// Lock the FSM, recovering it if a holder panicked
pub(crate) fn lock(fsm: &Mutex<BatchFsm>) -> MutexGuard<'_, BatchFsm> {
    fsm.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Handle for requesting cancellation of the running batch
#[derive(Debug, Clone)]
pub struct CancelHandle {
    fsm: SharedFsm,
}

impl CancelHandle {
    pub fn new(fsm: SharedFsm) -> Self {
        Self { fsm }
    }

    /// Ask the running batch to stop before its next artifact.
    ///
    /// Returns false when no batch is running.
    pub fn cancel(&self) -> bool {
        lock(&self.fsm).process(BatchEvent::Cancel).is_ok()
    }
}

/// Claim on the batch FSM, released when dropped
pub struct BatchGuard {
    fsm: SharedFsm,
}

impl BatchGuard {
    /// Move the FSM to running, or fail if a batch already holds it
    pub fn acquire(fsm: &SharedFsm) -> Result<Self, DeployerError> {
        lock(fsm)
            .process(BatchEvent::Start)
            .map_err(|_| DeployerError::AlreadyRunning)?;

        Ok(Self { fsm: fsm.clone() })
    }

    pub fn cancel_requested(&self) -> bool {
        lock(&self.fsm).is_cancel_requested()
    }
}

impl Drop for BatchGuard {
    fn drop(&mut self) {
        if let Err(e) = lock(&self.fsm).process(BatchEvent::Finish) {
            error!("Failed to release batch state: {}", e);
        }
    }
}

/// Run one batch over `artifact_ids` in the given order
pub async fn run(
    guard: &BatchGuard,
    session: &Session,
    artifact_ids: &[String],
    executor: &DeployExecutor,
    events: &dyn EventSink,
) -> BatchSummary {
    let batch_id = Uuid::new_v4();
    let span = info_span!("batch", %batch_id, package = %session.package().name);

    async move {
        info!("Starting batch of {} artifacts", artifact_ids.len());

        let mut summary = BatchSummary {
            processed: 0,
            succeeded: 0,
            failed: 0,
            reason: CompletionReason::Completed,
        };

        for artifact_id in artifact_ids {
            if guard.cancel_requested() {
                info!("Batch cancelled after {} artifacts", summary.processed);
                summary.reason = CompletionReason::Cancelled;
                break;
            }

            events.on_deploy_progress(artifact_id);

            let outcome = match session.artifact(artifact_id) {
                Some(artifact) => executor.deploy(session.package(), artifact).await,
                None => {
                    let err = DeployerError::UnknownArtifact(artifact_id.clone());
                    warn!("Skipping {}: {}", artifact_id, err);
                    DeployOutcome::failed(artifact_id, err.to_string())
                }
            };

            summary.processed += 1;
            if outcome.succeeded {
                summary.succeeded += 1;
            } else {
                summary.failed += 1;
            }

            events.on_deploy_result(&outcome);
        }

        info!(
            "Batch {}: {} processed, {} succeeded, {} failed",
            summary.reason, summary.processed, summary.succeeded, summary.failed
        );
        events.on_batch_complete(summary.processed, summary.reason);

        summary
    }
    .instrument(span)
    .await
}

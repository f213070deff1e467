//! Finite State Machine for batch deployment

use serde::{Deserialize, Serialize};

/// Batch state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BatchState {
    /// No batch running
    Idle,

    /// A batch is working through its artifact list
    Running,

    /// Cancel requested, the batch stops before its next artifact
    Cancelling,
}

/// Batch event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchEvent {
    /// Start a batch
    Start,

    /// Request cooperative cancellation
    Cancel,

    /// Batch loop ended
    Finish,
}

/// Batch FSM
#[derive(Debug, Clone)]
pub struct BatchFsm {
    state: BatchState,
}

impl BatchFsm {
    /// Create a new FSM in idle state
    pub fn new() -> Self {
        Self {
            state: BatchState::Idle,
        }
    }

    /// Get current state
    pub fn state(&self) -> BatchState {
        self.state
    }

    /// Whether a batch currently holds the machine
    pub fn is_busy(&self) -> bool {
        self.state != BatchState::Idle
    }

    /// Whether the running batch was asked to stop
    pub fn is_cancel_requested(&self) -> bool {
        self.state == BatchState::Cancelling
    }

    /// Process an event and transition state
    pub fn process(&mut self, event: BatchEvent) -> Result<(), String> {
        let new_state = match (self.state, event) {
            (BatchState::Idle, BatchEvent::Start) => BatchState::Running,

            (BatchState::Running, BatchEvent::Cancel) => BatchState::Cancelling,
            (BatchState::Cancelling, BatchEvent::Cancel) => BatchState::Cancelling,

            (BatchState::Running, BatchEvent::Finish) => BatchState::Idle,
            (BatchState::Cancelling, BatchEvent::Finish) => BatchState::Idle,

            // Invalid transitions
            (state, event) => {
                return Err(format!("Invalid transition: {:?} -> {:?}", state, event));
            }
        };

        self.state = new_state;
        Ok(())
    }
}

impl Default for BatchFsm {
    fn default() -> Self {
        Self::new()
    }
}

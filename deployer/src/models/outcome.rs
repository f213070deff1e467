//! Deployment outcome and batch summary

use std::fmt;

use serde::{Deserialize, Serialize};

/// Result of one deployment attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployOutcome {
    /// Artifact the attempt was made for
    pub artifact_id: String,

    /// Whether the service accepted the deployment
    pub succeeded: bool,

    /// HTTP status of the deploy call, when one was received
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_status: Option<u16>,

    /// Reason the call could not complete
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl DeployOutcome {
    /// Build an outcome from the status code of a completed deploy call
    pub fn from_status(artifact_id: impl Into<String>, status: u16) -> Self {
        Self {
            artifact_id: artifact_id.into(),
            succeeded: (200..300).contains(&status),
            http_status: Some(status),
            error_message: None,
        }
    }

    /// Outcome for an attempt that never got a response
    pub fn failed(artifact_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            artifact_id: artifact_id.into(),
            succeeded: false,
            http_status: None,
            error_message: Some(message.into()),
        }
    }
}

/// Why a batch stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompletionReason {
    /// Every requested id was processed
    Completed,

    /// A cancel was requested before the list was exhausted
    Cancelled,
}

impl CompletionReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompletionReason::Completed => "completed",
            CompletionReason::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for CompletionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Totals of a finished batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub processed: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub reason: CompletionReason,
}

impl BatchSummary {
    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }
}

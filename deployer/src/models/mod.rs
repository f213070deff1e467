//! Domain models

pub mod artifact;
pub mod outcome;
pub mod package;

pub use artifact::Artifact;
pub use outcome::{BatchSummary, CompletionReason, DeployOutcome};
pub use package::PackageRef;

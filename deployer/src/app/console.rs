//! Terminal reporter for the command line host

use colored::Colorize;

use crate::app::events::EventSink;
use crate::models::{Artifact, CompletionReason, DeployOutcome};

/// Prints deployer events to stdout, fatal errors to stderr
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleReporter;

impl ConsoleReporter {
    pub fn new() -> Self {
        Self
    }
}

/// One line describing an outcome, without colour
pub fn describe_outcome(outcome: &DeployOutcome) -> String {
    match (&outcome.http_status, &outcome.error_message) {
        (Some(status), _) => format!("{} (HTTP {})", outcome.artifact_id, status),
        (None, Some(message)) => format!("{} ({})", outcome.artifact_id, message),
        (None, None) => outcome.artifact_id.clone(),
    }
}

impl EventSink for ConsoleReporter {
    fn on_artifact_list_ready(&self, artifacts: &[Artifact]) {
        for artifact in artifacts {
            println!(
                "  {:<40} {} {}",
                artifact.id,
                artifact.display_name,
                format!("[{}]", artifact.kind).dimmed()
            );
        }
        println!("Ready: {} artifacts.", artifacts.len());
    }

    fn on_deploy_progress(&self, artifact_id: &str) {
        println!("Deploying {}...", artifact_id);
    }

    fn on_deploy_result(&self, outcome: &DeployOutcome) {
        let line = describe_outcome(outcome);
        if outcome.succeeded {
            println!("  {} {}", "✔".green().bold(), line.green());
        } else {
            println!("  {} {}", "✘".red().bold(), line.red());
        }
    }

    fn on_batch_complete(&self, processed: usize, reason: CompletionReason) {
        let line = format!("Finished: {} processed ({}).", processed, reason);
        match reason {
            CompletionReason::Completed => println!("{}", line.bold()),
            CompletionReason::Cancelled => println!("{}", line.yellow().bold()),
        }
    }

    fn on_fatal_error(&self, message: &str) {
        eprintln!("{} {}", " ERROR ".white().on_red().bold(), message.red());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_outcome() {
        assert_eq!(
            describe_outcome(&DeployOutcome::from_status("IFlow1", 500)),
            "IFlow1 (HTTP 500)"
        );
        assert_eq!(
            describe_outcome(&DeployOutcome::failed("IFlow2", "timed out")),
            "IFlow2 (timed out)"
        );
    }
}

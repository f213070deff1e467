//! Deploy executor
//!
//! Runs the token-then-deploy sequence for a single artifact and folds every
//! way it can go wrong into a [`DeployOutcome`].

use std::sync::Arc;

use tracing::{info, warn};

use crate::authn::csrf::TokenProvider;
use crate::http::client::HttpClient;
use crate::models::{Artifact, DeployOutcome, PackageRef};

/// Path of the deploy endpoint for one artifact
pub fn deploy_path(
    package_registry_id: &str,
    artifact_registry_id: &str,
    artifact_id: &str,
) -> String {
    format!(
        "/api/1.0/workspace/{}/artifacts/{}/entities/{}/iflows/{}?runtimeProfile=iflmap&webdav=DEPLOY",
        package_registry_id, artifact_registry_id, artifact_registry_id, artifact_id
    )
}

/// Deploy executor
pub struct DeployExecutor {
    http_client: Arc<HttpClient>,
    tokens: Arc<dyn TokenProvider>,
}

impl DeployExecutor {
    /// Create a new deploy executor
    pub fn new(http_client: Arc<HttpClient>, tokens: Arc<dyn TokenProvider>) -> Self {
        Self {
            http_client,
            tokens,
        }
    }

    /// Deploy one artifact. Never fails: errors become unsuccessful outcomes.
    pub async fn deploy(&self, package: &PackageRef, artifact: &Artifact) -> DeployOutcome {
        if !artifact.has_registry_id() {
            warn!("Cannot deploy {}: no registry identifier", artifact.id);
            return DeployOutcome::failed(&artifact.id, "Artifact has no registry identifier");
        }

        let path = deploy_path(&package.registry_id, &artifact.registry_id, &artifact.id);

        let token = match self.tokens.acquire_token().await {
            Ok(token) => token,
            Err(e) => {
                warn!("Skipping deploy of {}: {}", artifact.id, e);
                return DeployOutcome::failed(&artifact.id, e.to_string());
            }
        };

        match self.http_client.put_empty(&path, &token).await {
            Ok(status) => {
                let outcome = DeployOutcome::from_status(&artifact.id, status.as_u16());
                if outcome.succeeded {
                    info!("Deployed {} ({})", artifact.id, status);
                } else {
                    warn!("Deploy of {} rejected ({})", artifact.id, status);
                }
                outcome
            }
            Err(e) => {
                warn!("Deploy of {} failed: {}", artifact.id, e);
                DeployOutcome::failed(&artifact.id, e.to_string())
            }
        }
    }
}

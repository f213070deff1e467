//! Workspace API client

use std::collections::HashSet;

use odata_models::{ArtifactEntry, CollectionEnvelope, ContentPackage, Entity};
use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::errors::DeployerError;
use crate::http::client::HttpClient;
use crate::models::{Artifact, PackageRef};

const WORKSPACE_SVC: &str = "/odata/1.0/workspace.svc";

/// Path of the content package entity
pub fn package_path(name: &str) -> String {
    format!(
        "{}/ContentEntities.ContentPackages('{}')?&$format=json",
        WORKSPACE_SVC, name
    )
}

/// Path of the artifacts belonging to a content package
pub fn artifacts_path(name: &str) -> String {
    format!(
        "{}/ContentEntities.ContentPackages('{}')/Artifacts?&$format=json",
        WORKSPACE_SVC, name
    )
}

impl HttpClient {
    /// Resolve a package name to its registry identifier
    pub async fn resolve_package(&self, name: &str) -> Result<PackageRef, DeployerError> {
        let response = self.get(&package_path(name), true).await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Package lookup failed: {} - {}", status, body);
            return Err(DeployerError::NotFound(format!(
                "Package '{}' not found in workspace ({})",
                name, status
            )));
        }

        let body = response.text().await?;
        let entity: Entity<ContentPackage> = serde_json::from_str(&body).map_err(|e| {
            DeployerError::NotFound(format!("Unexpected payload for package '{}': {}", name, e))
        })?;

        let registry_id = entity
            .d
            .reg_id
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| {
                DeployerError::NotFound(format!(
                    "Package '{}' has no registry identifier",
                    name
                ))
            })?;

        debug!("Resolved package {} to {}", name, registry_id);
        Ok(PackageRef::new(name, registry_id))
    }

    /// List the artifacts of a resolved package
    pub async fn list_artifacts(
        &self,
        package: &PackageRef,
    ) -> Result<Vec<Artifact>, DeployerError> {
        let response = self.get(&artifacts_path(&package.name), false).await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Artifact listing failed: {} - {}", status, body);
            return Err(DeployerError::NotFound(format!(
                "Artifacts of package '{}' could not be listed ({})",
                package.name, status
            )));
        }

        let body = response.text().await?;
        // Entries are decoded one by one so a malformed entry only drops itself
        let envelope: CollectionEnvelope<Value> =
            serde_json::from_str(&body).map_err(|e| {
                DeployerError::NotFound(format!(
                    "Unexpected artifact listing for package '{}': {}",
                    package.name, e
                ))
            })?;

        let artifacts = normalize_artifacts(envelope.into_entries());
        info!("Package {} has {} artifacts", package.name, artifacts.len());
        Ok(artifacts)
    }
}

/// Map raw entries to artifacts, dropping malformed, unnamed and duplicate entries
fn normalize_artifacts(entries: Vec<Value>) -> Vec<Artifact> {
    let mut seen = HashSet::new();
    let mut artifacts = Vec::with_capacity(entries.len());

    for (index, raw) in entries.into_iter().enumerate() {
        let entry: ArtifactEntry = match serde_json::from_value(raw) {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Dropping malformed artifact entry #{}: {}", index, e);
                continue;
            }
        };

        let Some(artifact) = Artifact::from_entry(entry) else {
            warn!("Dropping artifact entry #{} without a name", index);
            continue;
        };

        if !seen.insert(artifact.id.clone()) {
            warn!("Dropping duplicate artifact entry {}", artifact.id);
            continue;
        }

        if !artifact.has_registry_id() {
            warn!("Artifact {} has no registry identifier", artifact.id);
        }

        artifacts.push(artifact);
    }

    artifacts
}

//! Artifact model

use odata_models::ArtifactEntry;
use serde::{Deserialize, Serialize};

/// A deployable artifact belonging to a content package
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    /// Stable artifact name, unique within the package
    pub id: String,

    /// Human readable label
    pub display_name: String,

    /// Artifact type tag (informational only)
    pub kind: String,

    /// Registry identifier used in the deploy URL
    pub registry_id: String,
}

impl Artifact {
    /// Build an artifact from a raw listing entry.
    ///
    /// Returns `None` when the entry has no usable name.
    pub fn from_entry(entry: ArtifactEntry) -> Option<Self> {
        let id = entry.name.filter(|name| !name.trim().is_empty())?;
        let display_name = entry
            .display_name
            .filter(|label| !label.is_empty())
            .unwrap_or_else(|| id.clone());

        Some(Self {
            id,
            display_name,
            kind: entry.artifact_type.unwrap_or_default(),
            registry_id: entry.reg_id.unwrap_or_default(),
        })
    }

    /// Whether the artifact carries a registry identifier
    pub fn has_registry_id(&self) -> bool {
        !self.registry_id.trim().is_empty()
    }
}

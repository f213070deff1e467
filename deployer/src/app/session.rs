//! Session state for one resolved package

use std::collections::HashMap;

use crate::models::{Artifact, PackageRef};

/// A resolved package and its artifacts.
///
/// Immutable once built; a re-sync replaces the whole session.
#[derive(Debug, Clone)]
pub struct Session {
    package: PackageRef,
    artifacts: Vec<Artifact>,
    index: HashMap<String, usize>,
}

impl Session {
    pub fn new(package: PackageRef, artifacts: Vec<Artifact>) -> Self {
        let mut index = HashMap::with_capacity(artifacts.len());
        for (position, artifact) in artifacts.iter().enumerate() {
            index.entry(artifact.id.clone()).or_insert(position);
        }

        Self {
            package,
            artifacts,
            index,
        }
    }

    pub fn package(&self) -> &PackageRef {
        &self.package
    }

    /// Artifacts in listing order
    pub fn artifacts(&self) -> &[Artifact] {
        &self.artifacts
    }

    /// Look up an artifact by id
    pub fn artifact(&self, id: &str) -> Option<&Artifact> {
        self.index.get(id).map(|&position| &self.artifacts[position])
    }

    /// All artifact ids in listing order
    pub fn artifact_ids(&self) -> Vec<String> {
        self.artifacts.iter().map(|a| a.id.clone()).collect()
    }
}

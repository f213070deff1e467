//! Content package reference

use serde::{Deserialize, Serialize};

/// A resolved content package
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageRef {
    /// Package name as it appears in workspace URLs
    pub name: String,

    /// Opaque registry identifier assigned by the workspace service
    pub registry_id: String,
}

impl PackageRef {
    pub fn new(name: impl Into<String>, registry_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            registry_id: registry_id.into(),
        }
    }
}

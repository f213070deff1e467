//! Wire models for the workspace OData service
//!
//! The service wraps every payload in a `d` member. Collections come back either
//! as `{ "d": { "results": [...] } }` or as `{ "d": [...] }` depending on the
//! protocol version the tenant runs; [`Collection`] accepts both.

use serde::{Deserialize, Serialize};

/// Single entity envelope: `{ "d": { ... } }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity<T> {
    pub d: T,
}

/// Collection envelope, `d` may be missing altogether
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionEnvelope<T> {
    #[serde(default)]
    pub d: Option<Collection<T>>,
}

impl<T> CollectionEnvelope<T> {
    /// Flatten the envelope into a plain list of entries
    pub fn into_entries(self) -> Vec<T> {
        self.d.map(Collection::into_vec).unwrap_or_default()
    }
}

/// The two collection shapes returned by the service
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Collection<T> {
    Wrapped { results: Vec<T> },
    Bare(Vec<T>),
}

impl<T> Collection<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Collection::Wrapped { results } => results,
            Collection::Bare(entries) => entries,
        }
    }
}

/// Content package as returned by `ContentEntities.ContentPackages('<name>')`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContentPackage {
    #[serde(rename = "Id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(rename = "DisplayName", default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    #[serde(rename = "reg_id", default, skip_serializing_if = "Option::is_none")]
    pub reg_id: Option<String>,
}

/// Artifact entry of a content package
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArtifactEntry {
    #[serde(rename = "Name", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(rename = "DisplayName", default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    #[serde(rename = "Type", default, skip_serializing_if = "Option::is_none")]
    pub artifact_type: Option<String>,

    #[serde(rename = "reg_id", default, skip_serializing_if = "Option::is_none")]
    pub reg_id: Option<String>,
}

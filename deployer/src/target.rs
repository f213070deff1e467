//! Package page detection
//!
//! Hosts that start from a browser URL of a package page (for example
//! `https://tenant.example.com/itspaces/shell/design/contentpackage/Demo?section=ARTIFACTS`)
//! use [`PageTarget::parse`] to get the tenant origin and the package name.

use url::Url;

use crate::errors::DeployerError;

/// Tenant origin and package name taken from a page URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageTarget {
    pub origin: String,
    pub package_name: String,
}

impl PageTarget {
    pub fn parse(page_url: &str) -> Result<Self, DeployerError> {
        let url = Url::parse(page_url).map_err(|e| {
            DeployerError::ConfigError(format!("Invalid page URL '{}': {}", page_url, e))
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(DeployerError::ConfigError(format!(
                "Unsupported URL scheme '{}'",
                url.scheme()
            )));
        }

        let mut rest = url.path().to_string();
        if let Some(query) = url.query() {
            rest.push('?');
            rest.push_str(query);
        }
        if let Some(fragment) = url.fragment() {
            rest.push('#');
            rest.push_str(fragment);
        }

        let package_name = package_segment(&rest).ok_or_else(|| {
            DeployerError::ConfigError(format!("No content package in URL '{}'", page_url))
        })?;

        Ok(Self {
            origin: url.origin().ascii_serialization(),
            package_name: package_name.to_string(),
        })
    }
}

/// Find the name following `content/` or `contentpackage/`
fn package_segment(rest: &str) -> Option<&str> {
    const MARKER: &str = "content";

    for (index, _) in rest.match_indices(MARKER) {
        let after = &rest[index + MARKER.len()..];
        let after = after.strip_prefix("package").unwrap_or(after);

        if let Some(tail) = after.strip_prefix('/') {
            let name = tail.split(['/', '?', '#']).next().unwrap_or_default();
            if !name.is_empty() {
                return Some(name);
            }
        }
    }

    None
}

//! Anti-forgery token provider
//!
//! Every mutating call to the workspace service must carry a token obtained
//! right before the call. Tokens are never cached: a stale token makes the
//! following call fail with an authorization error.

use std::sync::Arc;

use async_trait::async_trait;
use http::HeaderValue;
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use crate::errors::DeployerError;
use crate::http::client::HttpClient;

/// Header value asking the service to issue a token
pub const TOKEN_FETCH: &str = "Fetch";

/// Header value the service sends back when no token was issued
const TOKEN_REQUIRED: &str = "Required";

/// A single-use anti-forgery token
#[derive(Debug)]
pub struct CsrfToken(SecretString);

impl CsrfToken {
    /// Parse a token from a response header value.
    ///
    /// Empty values and the `Required` marker are not tokens.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() || raw.eq_ignore_ascii_case(TOKEN_REQUIRED) {
            return None;
        }
        Some(Self(SecretString::from(raw.to_string())))
    }

    /// Header value presenting this token, marked sensitive
    pub fn header_value(&self) -> Result<HeaderValue, DeployerError> {
        let mut value = HeaderValue::from_str(self.0.expose_secret()).map_err(|e| {
            DeployerError::TokenUnavailable(format!("Token is not a valid header value: {}", e))
        })?;
        value.set_sensitive(true);
        Ok(value)
    }
}

/// Token provider trait for testability
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Acquire a fresh token for the next mutating call
    async fn acquire_token(&self) -> Result<CsrfToken, DeployerError>;
}

/// Token provider backed by the workspace metadata token fetch
pub struct CsrfTokenProvider {
    http_client: Arc<HttpClient>,
}

impl CsrfTokenProvider {
    pub fn new(http_client: Arc<HttpClient>) -> Self {
        Self { http_client }
    }
}

#[async_trait]
impl TokenProvider for CsrfTokenProvider {
    async fn acquire_token(&self) -> Result<CsrfToken, DeployerError> {
        let token = self
            .http_client
            .fetch_csrf_token()
            .await
            .map_err(|e| match e {
                DeployerError::TokenUnavailable(_) => e,
                other => DeployerError::TokenUnavailable(other.to_string()),
            })?;

        debug!("Acquired anti-forgery token from {}", self.http_client.origin());
        Ok(token)
    }
}

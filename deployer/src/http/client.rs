//! HTTP client implementation

use std::time::Duration;

use http::{HeaderName, HeaderValue, StatusCode};
use reqwest::{header, Client, Response};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, warn};

use crate::authn::csrf::{CsrfToken, TOKEN_FETCH};
use crate::errors::DeployerError;

/// Anti-forgery token header, used both to request and to present a token
pub const CSRF_TOKEN_HEADER: HeaderName = HeaderName::from_static("x-csrf-token");

/// Marks every call as an XHR so the service answers with data instead of a login page
pub const REQUESTED_WITH_HEADER: HeaderName = HeaderName::from_static("x-requested-with");

/// Request used to obtain a fresh anti-forgery token
pub const METADATA_PATH: &str = "/odata/1.0/workspace.svc/$metadata";

/// Options for building an [`HttpClient`]
#[derive(Debug)]
pub struct ClientOptions {
    /// Tenant origin, e.g. `https://tenant.example.com`
    pub origin: String,

    /// Cookie header of an already authenticated session
    pub session_cookie: Option<SecretString>,

    /// Timeout applied to every request
    pub timeout: Duration,
}

impl ClientOptions {
    pub fn new(origin: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            session_cookie: None,
            timeout: Duration::from_secs(30),
        }
    }
}

/// HTTP client for the workspace service of one tenant
pub struct HttpClient {
    client: Client,
    origin: String,
}

impl HttpClient {
    /// Create a new HTTP client
    pub fn new(options: ClientOptions) -> Result<Self, DeployerError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            REQUESTED_WITH_HEADER,
            HeaderValue::from_static("XMLHttpRequest"),
        );

        if let Some(cookie) = &options.session_cookie {
            let mut value = HeaderValue::from_str(cookie.expose_secret())
                .map_err(|e| DeployerError::ConfigError(format!("Invalid session cookie: {}", e)))?;
            value.set_sensitive(true);
            headers.insert(header::COOKIE, value);
        }

        let client = Client::builder()
            .timeout(options.timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            origin: options.origin.trim_end_matches('/').to_string(),
        })
    }

    /// Get the tenant origin
    pub fn origin(&self) -> &str {
        &self.origin
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.origin, path)
    }

    /// Make a GET request, optionally asking for an anti-forgery token.
    ///
    /// The response is returned whatever its status.
    pub async fn get(&self, path: &str, fetch_token: bool) -> Result<Response, DeployerError> {
        let url = self.url(path);
        debug!("GET {}", url);

        let mut request = self.client.get(&url);
        if fetch_token {
            request = request.header(CSRF_TOKEN_HEADER, TOKEN_FETCH);
        }

        Ok(request.send().await?)
    }

    /// Fetch a fresh anti-forgery token from the metadata endpoint
    pub async fn fetch_csrf_token(&self) -> Result<CsrfToken, DeployerError> {
        let url = self.url(METADATA_PATH);
        debug!("GET {} (token fetch)", url);

        let response = self
            .client
            .get(&url)
            .header(CSRF_TOKEN_HEADER, TOKEN_FETCH)
            .send()
            .await
            .map_err(|e| DeployerError::TokenUnavailable(format!("Token fetch failed: {}", e)))?;

        let status = response.status();
        let token = response
            .headers()
            .get(&CSRF_TOKEN_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(CsrfToken::parse);

        token.ok_or_else(|| {
            warn!("Token fetch returned {} without a usable token", status);
            DeployerError::TokenUnavailable(format!(
                "No anti-forgery token in token fetch response ({})",
                status
            ))
        })
    }

    /// Make a PUT request with an empty body and the given token.
    ///
    /// Any completed exchange yields its status code; only transport failures are errors.
    pub async fn put_empty(
        &self,
        path: &str,
        token: &CsrfToken,
    ) -> Result<StatusCode, DeployerError> {
        let url = self.url(path);
        debug!("PUT {}", url);

        let response = self
            .client
            .put(&url)
            .header(CSRF_TOKEN_HEADER, token.header_value()?)
            .body("")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("HTTP PUT failed: {} - {}", status, body);
        }

        Ok(status)
    }
}

//! Deployer facade used by host UIs

use std::sync::{Arc, Mutex};

use tokio::sync::RwLock;
use tracing::{error, info};

use crate::app::events::EventSink;
use crate::app::session::Session;
use crate::authn::csrf::{CsrfTokenProvider, TokenProvider};
use crate::deploy::batch::{self, BatchGuard, CancelHandle, SharedFsm};
use crate::deploy::executor::DeployExecutor;
use crate::deploy::fsm::BatchFsm;
use crate::errors::DeployerError;
use crate::http::client::HttpClient;
use crate::models::BatchSummary;

/// Entry point for resolving a package and deploying its artifacts
pub struct Deployer {
    http_client: Arc<HttpClient>,
    executor: DeployExecutor,
    session: RwLock<Option<Arc<Session>>>,
    batch: SharedFsm,
    events: Arc<dyn EventSink>,
}

impl Deployer {
    /// Create a deployer that fetches tokens from the workspace service
    pub fn new(http_client: Arc<HttpClient>, events: Arc<dyn EventSink>) -> Self {
        let tokens = Arc::new(CsrfTokenProvider::new(http_client.clone()));
        Self::with_token_provider(http_client, tokens, events)
    }

    /// Create a deployer with a custom token provider
    pub fn with_token_provider(
        http_client: Arc<HttpClient>,
        tokens: Arc<dyn TokenProvider>,
        events: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            executor: DeployExecutor::new(http_client.clone(), tokens),
            http_client,
            session: RwLock::new(None),
            batch: Arc::new(Mutex::new(BatchFsm::new())),
            events,
        }
    }

    /// Resolve a package and list its artifacts, replacing the current session.
    ///
    /// Failures are reported through `on_fatal_error` and clear the session.
    pub async fn resolve_and_list(
        &self,
        package_name: &str,
    ) -> Result<Arc<Session>, DeployerError> {
        if self.is_running() {
            return Err(DeployerError::AlreadyRunning);
        }

        info!("Resolving package {}", package_name);

        match self.load_session(package_name).await {
            Ok(session) => {
                let session = Arc::new(session);
                *self.session.write().await = Some(session.clone());
                self.events.on_artifact_list_ready(session.artifacts());
                Ok(session)
            }
            Err(e) => {
                error!("Sync error for package {}: {}", package_name, e);
                *self.session.write().await = None;
                self.events.on_fatal_error(&format!("Sync error: {}", e));
                Err(e)
            }
        }
    }

    async fn load_session(&self, package_name: &str) -> Result<Session, DeployerError> {
        let package = self.http_client.resolve_package(package_name).await?;
        let artifacts = self.http_client.list_artifacts(&package).await?;
        Ok(Session::new(package, artifacts))
    }

    /// Deploy the given artifacts in order, one at a time.
    ///
    /// Rejected with `AlreadyRunning` while another batch runs.
    pub async fn start_batch(
        &self,
        artifact_ids: &[String],
    ) -> Result<BatchSummary, DeployerError> {
        let guard = BatchGuard::acquire(&self.batch)?;

        let session = self.session.read().await.clone();
        let Some(session) = session else {
            return Err(DeployerError::NoSession);
        };

        let summary = batch::run(
            &guard,
            &session,
            artifact_ids,
            &self.executor,
            self.events.as_ref(),
        )
        .await;

        Ok(summary)
    }

    /// Request cancellation of the running batch, if any
    pub fn cancel_batch(&self) -> bool {
        self.cancel_handle().cancel()
    }

    /// Handle that can cancel batches from another task
    pub fn cancel_handle(&self) -> CancelHandle {
        CancelHandle::new(self.batch.clone())
    }

    /// Whether a batch is in progress
    pub fn is_running(&self) -> bool {
        batch::lock(&self.batch).is_busy()
    }

    /// The current session, if a package has been resolved
    pub async fn session(&self) -> Option<Arc<Session>> {
        self.session.read().await.clone()
    }
}

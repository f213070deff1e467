//! Shared fixtures for integration tests
#![allow(dead_code)]

use std::sync::{Arc, Mutex, OnceLock};

use serde_json::{json, Value};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use cpi_deployer::app::events::{DeployEvent, EventSink};
use cpi_deployer::deploy::batch::CancelHandle;
use cpi_deployer::http::client::{ClientOptions, HttpClient};
use cpi_deployer::models::{Artifact, CompletionReason, DeployOutcome};

pub const PACKAGE: &str = "Demo";
pub const PACKAGE_REG_ID: &str = "PKG123";
pub const TOKEN: &str = "tok-123";

pub fn client_for(server: &MockServer) -> Arc<HttpClient> {
    Arc::new(HttpClient::new(ClientOptions::new(server.uri())).unwrap())
}

pub fn artifact_json(name: &str, reg_id: &str) -> Value {
    json!({
        "Name": name,
        "DisplayName": format!("{} flow", name),
        "Type": "IntegrationFlow",
        "reg_id": reg_id,
    })
}

pub async fn mount_package(server: &MockServer, name: &str, reg_id: &str) {
    Mock::given(method("GET"))
        .and(path(format!(
            "/odata/1.0/workspace.svc/ContentEntities.ContentPackages('{}')",
            name
        )))
        .and(query_param("$format", "json"))
        .and(header("X-CSRF-Token", "Fetch"))
        .and(header("X-Requested-With", "XMLHttpRequest"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "d": { "Id": name, "reg_id": reg_id, "Version": "1.0.0" }
        })))
        .mount(server)
        .await;
}

pub async fn mount_artifacts(server: &MockServer, name: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(format!(
            "/odata/1.0/workspace.svc/ContentEntities.ContentPackages('{}')/Artifacts",
            name
        )))
        .and(query_param("$format", "json"))
        .and(header("X-Requested-With", "XMLHttpRequest"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Package `Demo` with the given `(name, reg_id)` artifacts, listed under `results`
pub async fn mount_demo_package(server: &MockServer, artifacts: &[(&str, &str)]) {
    mount_package(server, PACKAGE, PACKAGE_REG_ID).await;
    let results: Vec<Value> = artifacts
        .iter()
        .map(|(name, reg_id)| artifact_json(name, reg_id))
        .collect();
    mount_artifacts(server, PACKAGE, json!({ "d": { "results": results } })).await;
}

pub async fn mount_token(server: &MockServer, expected_calls: u64) {
    Mock::given(method("GET"))
        .and(path("/odata/1.0/workspace.svc/$metadata"))
        .and(header("X-CSRF-Token", "Fetch"))
        .and(header("X-Requested-With", "XMLHttpRequest"))
        .respond_with(ResponseTemplate::new(200).insert_header("x-csrf-token", TOKEN))
        .expect(expected_calls)
        .mount(server)
        .await;
}

pub fn deploy_mock(reg_id: &str, artifact_id: &str, response: ResponseTemplate) -> Mock {
    Mock::given(method("PUT"))
        .and(path(format!(
            "/api/1.0/workspace/{}/artifacts/{}/entities/{}/iflows/{}",
            PACKAGE_REG_ID, reg_id, reg_id, artifact_id
        )))
        .and(query_param("runtimeProfile", "iflmap"))
        .and(query_param("webdav", "DEPLOY"))
        .and(header("X-CSRF-Token", TOKEN))
        .and(header("X-Requested-With", "XMLHttpRequest"))
        .respond_with(response)
}

pub async fn mount_deploy(server: &MockServer, reg_id: &str, artifact_id: &str, status: u16) {
    deploy_mock(reg_id, artifact_id, ResponseTemplate::new(status))
        .expect(1)
        .mount(server)
        .await;
}

pub fn ids(raw: &[&str]) -> Vec<String> {
    raw.iter().map(|id| id.to_string()).collect()
}

/// Sink recording every event, optionally cancelling after a number of results
#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<DeployEvent>>,
    cancel_after: Option<usize>,
    cancel: OnceLock<CancelHandle>,
}

impl RecordingSink {
    pub fn cancelling_after(results: usize) -> Self {
        Self {
            cancel_after: Some(results),
            ..Default::default()
        }
    }

    pub fn arm(&self, handle: CancelHandle) {
        let _ = self.cancel.set(handle);
    }

    pub fn events(&self) -> Vec<DeployEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn outcomes(&self) -> Vec<DeployOutcome> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                DeployEvent::DeployResult(outcome) => Some(outcome),
                _ => None,
            })
            .collect()
    }

    fn push(&self, event: DeployEvent) -> usize {
        let mut events = self.events.lock().unwrap();
        events.push(event);
        events
            .iter()
            .filter(|e| matches!(e, DeployEvent::DeployResult(_)))
            .count()
    }
}

impl EventSink for RecordingSink {
    fn on_artifact_list_ready(&self, artifacts: &[Artifact]) {
        self.push(DeployEvent::ArtifactListReady(artifacts.to_vec()));
    }

    fn on_deploy_progress(&self, artifact_id: &str) {
        self.push(DeployEvent::DeployProgress(artifact_id.to_string()));
    }

    fn on_deploy_result(&self, outcome: &DeployOutcome) {
        let results = self.push(DeployEvent::DeployResult(outcome.clone()));
        if self.cancel_after == Some(results) {
            if let Some(handle) = self.cancel.get() {
                handle.cancel();
            }
        }
    }

    fn on_batch_complete(&self, processed: usize, reason: CompletionReason) {
        self.push(DeployEvent::BatchComplete { processed, reason });
    }

    fn on_fatal_error(&self, message: &str) {
        self.push(DeployEvent::FatalError(message.to_string()));
    }
}

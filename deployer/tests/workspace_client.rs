//! Workspace client integration tests

mod common;

use std::time::Duration;

use cpi_deployer::errors::DeployerError;
use cpi_deployer::http::client::{ClientOptions, HttpClient};
use cpi_deployer::models::PackageRef;
use secrecy::SecretString;
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::*;

#[tokio::test]
async fn test_resolve_package() {
    let server = MockServer::start().await;
    mount_package(&server, PACKAGE, PACKAGE_REG_ID).await;

    let client = client_for(&server);
    let package = client.resolve_package(PACKAGE).await.unwrap();

    assert_eq!(package, PackageRef::new("Demo", "PKG123"));
}

#[tokio::test]
async fn test_resolve_package_is_idempotent() {
    let server = MockServer::start().await;
    mount_package(&server, PACKAGE, PACKAGE_REG_ID).await;

    let client = client_for(&server);
    let first = client.resolve_package(PACKAGE).await.unwrap();
    let second = client.resolve_package(PACKAGE).await.unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_resolve_unknown_package() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
        .mount(&server)
        .await;

    let result = client_for(&server).resolve_package("Missing").await;
    assert!(matches!(result, Err(DeployerError::NotFound(_))));
}

#[tokio::test]
async fn test_resolve_package_without_registry_id() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(
            "/odata/1.0/workspace.svc/ContentEntities.ContentPackages('Demo')",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "d": { "Id": "Demo" } })))
        .mount(&server)
        .await;

    let result = client_for(&server).resolve_package(PACKAGE).await;
    assert!(matches!(result, Err(DeployerError::NotFound(_))));
}

#[tokio::test]
async fn test_resolve_package_with_unexpected_payload() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>login</html>"))
        .mount(&server)
        .await;

    let result = client_for(&server).resolve_package(PACKAGE).await;
    assert!(matches!(result, Err(DeployerError::NotFound(_))));
}

#[tokio::test]
async fn test_list_artifacts_wrapped_in_results() {
    let server = MockServer::start().await;
    mount_artifacts(
        &server,
        PACKAGE,
        json!({ "d": { "results": [
            artifact_json("IFlow1", "A1"),
            artifact_json("IFlow2", "A2"),
        ] } }),
    )
    .await;

    let package = PackageRef::new(PACKAGE, PACKAGE_REG_ID);
    let artifacts = client_for(&server).list_artifacts(&package).await.unwrap();

    assert_eq!(artifacts.len(), 2);
    assert_eq!(artifacts[0].id, "IFlow1");
    assert_eq!(artifacts[0].display_name, "IFlow1 flow");
    assert_eq!(artifacts[0].kind, "IntegrationFlow");
    assert_eq!(artifacts[1].registry_id, "A2");
}

#[tokio::test]
async fn test_list_artifacts_bare_list() {
    let server = MockServer::start().await;
    mount_artifacts(
        &server,
        PACKAGE,
        json!({ "d": [
            artifact_json("IFlow1", "A1"),
            artifact_json("IFlow2", "A2"),
            artifact_json("IFlow3", "A3"),
        ] }),
    )
    .await;

    let package = PackageRef::new(PACKAGE, PACKAGE_REG_ID);
    let artifacts = client_for(&server).list_artifacts(&package).await.unwrap();

    let ids: Vec<&str> = artifacts.iter().map(|a| a.id.as_str()).collect();
    assert_eq!(ids, vec!["IFlow1", "IFlow2", "IFlow3"]);
}

#[tokio::test]
async fn test_list_artifacts_empty_package() {
    let server = MockServer::start().await;
    mount_artifacts(&server, PACKAGE, json!({ "d": { "results": [] } })).await;

    let package = PackageRef::new(PACKAGE, PACKAGE_REG_ID);
    let artifacts = client_for(&server).list_artifacts(&package).await.unwrap();

    assert!(artifacts.is_empty());
}

#[tokio::test]
async fn test_list_artifacts_drops_entries_without_name() {
    let server = MockServer::start().await;
    mount_artifacts(
        &server,
        PACKAGE,
        json!({ "d": { "results": [
            artifact_json("IFlow1", "A1"),
            { "DisplayName": "Broken", "reg_id": "A9" },
            artifact_json("IFlow2", "A2"),
        ] } }),
    )
    .await;

    let package = PackageRef::new(PACKAGE, PACKAGE_REG_ID);
    let artifacts = client_for(&server).list_artifacts(&package).await.unwrap();

    assert_eq!(artifacts.len(), 2);
    assert!(artifacts.iter().all(|a| !a.id.is_empty()));
}

#[tokio::test]
async fn test_list_artifacts_drops_malformed_entries() {
    let server = MockServer::start().await;
    mount_artifacts(
        &server,
        PACKAGE,
        json!({ "d": { "results": [
            artifact_json("IFlow1", "A1"),
            { "Name": 42, "reg_id": "A9" },
            artifact_json("IFlow2", "A2"),
        ] } }),
    )
    .await;

    let package = PackageRef::new(PACKAGE, PACKAGE_REG_ID);
    let artifacts = client_for(&server).list_artifacts(&package).await.unwrap();

    let ids: Vec<&str> = artifacts.iter().map(|a| a.id.as_str()).collect();
    assert_eq!(ids, vec!["IFlow1", "IFlow2"]);
}

#[tokio::test]
async fn test_list_artifacts_failure_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let package = PackageRef::new(PACKAGE, PACKAGE_REG_ID);
    let result = client_for(&server).list_artifacts(&package).await;

    assert!(matches!(result, Err(DeployerError::NotFound(_))));
}

#[tokio::test]
async fn test_session_cookie_is_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(header("Cookie", "JSESSIONID=abc"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "d": { "reg_id": PACKAGE_REG_ID } })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpClient::new(ClientOptions {
        origin: format!("{}/", server.uri()),
        session_cookie: Some(SecretString::from("JSESSIONID=abc".to_string())),
        timeout: Duration::from_secs(5),
    })
    .unwrap();

    assert_eq!(client.origin(), server.uri());
    let package = client.resolve_package(PACKAGE).await.unwrap();
    assert_eq!(package.registry_id, PACKAGE_REG_ID);
}

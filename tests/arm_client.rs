// tests/arm_client.rs
mod helpers;

use acr_classic_repro::azure::{
    ArmClient, ArmError, PollConfig, ServicePrincipalToken, StaticToken, TokenCredential,
};
use helpers::*;
use reqwest::Client;
use serde_json::json;
use std::sync::Arc;
use std::time::{Duration, Instant};
use wiremock::matchers::{body_partial_json, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn service_principal(server: &MockServer) -> ServicePrincipalToken {
    ServicePrincipalToken::new(
        Client::new(),
        &mock_environment(server),
        TENANT,
        "client-id",
        "client-secret",
    )
}

#[tokio::test]
async fn service_principal_token_is_cached() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("/{}/oauth2/token", TENANT)))
        .and(body_string_contains("grant_type=client_credentials"))
        .and(body_string_contains("client_id=client-id"))
        .and(body_string_contains("client_secret=client-secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token_type": "Bearer",
            "expires_in": "3599",
            "access_token": "sp-token"
        })))
        .expect(1)
        .mount(&server)
        .await;

    arm_request("GET", &group_path(RESOURCE_GROUP), GROUPS_API)
        .and(header("authorization", "Bearer sp-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(group_body()))
        .expect(2)
        .mount(&server)
        .await;

    let arm = ArmClient::new(
        Client::new(),
        &mock_environment(&server),
        SUBSCRIPTION,
        Arc::new(service_principal(&server)),
    );

    let group = arm.resource_groups().get(RESOURCE_GROUP).await.unwrap();
    assert_eq!(group.name, RESOURCE_GROUP);
    assert!(arm.resource_groups().exists(RESOURCE_GROUP).await.unwrap());

    server.verify().await;
}

#[tokio::test]
async fn token_inside_refresh_margin_is_fetched_again() {
    let server = MockServer::start().await;

    // Expires in one minute, already inside the refresh margin
    Mock::given(method("POST"))
        .and(path(format!("/{}/oauth2/token", TENANT)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token_type": "Bearer",
            "expires_in": "60",
            "access_token": "short-lived"
        })))
        .expect(2)
        .mount(&server)
        .await;

    arm_request("GET", &group_path(RESOURCE_GROUP), GROUPS_API)
        .and(header("authorization", "Bearer short-lived"))
        .respond_with(ResponseTemplate::new(200).set_body_json(group_body()))
        .expect(2)
        .mount(&server)
        .await;

    let arm = ArmClient::new(
        Client::new(),
        &mock_environment(&server),
        SUBSCRIPTION,
        Arc::new(service_principal(&server)),
    );

    arm.resource_groups().get(RESOURCE_GROUP).await.unwrap();
    arm.resource_groups().get(RESOURCE_GROUP).await.unwrap();

    server.verify().await;
}

#[tokio::test]
async fn rejected_client_secret_is_auth_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("/{}/oauth2/token", TENANT)))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": "invalid_client",
            "error_description": "AADSTS7000215: Invalid client secret provided."
        })))
        .mount(&server)
        .await;

    let err = service_principal(&server).token().await.unwrap_err();
    match err {
        ArmError::Auth(msg) => {
            assert!(msg.contains("invalid_client"), "{}", msg);
            assert!(msg.contains("AADSTS7000215"), "{}", msg);
        }
        other => panic!("expected auth error, got {:?}", other),
    }
}

#[tokio::test]
async fn create_resource_group_sends_location() {
    let server = MockServer::start().await;

    arm_request("PUT", &group_path(RESOURCE_GROUP), GROUPS_API)
        .and(header("authorization", "Bearer test-token"))
        .and(body_partial_json(json!({ "location": LOCATION })))
        .respond_with(ResponseTemplate::new(201).set_body_json(group_body()))
        .expect(1)
        .mount(&server)
        .await;

    let group = arm_client(&server)
        .resource_groups()
        .create_or_update(RESOURCE_GROUP, LOCATION)
        .await
        .unwrap();

    assert_eq!(group.id, group_path(RESOURCE_GROUP));
}

#[tokio::test]
async fn storage_create_follows_location_header() {
    let server = MockServer::start().await;
    let accepted = mount_location_operation(&server, "/operations/storage-create").await;

    arm_request("PUT", &storage_path(STORAGE_ACCOUNT), STORAGE_API)
        .and(body_partial_json(json!({
            "location": LOCATION,
            "kind": "Storage",
            "sku": { "name": "Standard_LRS", "tier": "Standard" }
        })))
        .respond_with(accepted)
        .expect(1)
        .mount(&server)
        .await;

    arm_client(&server)
        .storage_accounts()
        .create(STORAGE_ACCOUNT, RESOURCE_GROUP, LOCATION)
        .await
        .unwrap();

    let polls = server
        .received_requests()
        .await
        .unwrap()
        .into_iter()
        .filter(|r| r.url.path() == "/operations/storage-create")
        .count();
    assert_eq!(polls, 2);
}

#[tokio::test]
async fn registry_create_polls_async_operation() {
    let server = MockServer::start().await;
    let op_url = format!("{}/operations/registry-create", server.uri());

    Mock::given(method("GET"))
        .and(path("/operations/registry-create"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "InProgress" })))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/operations/registry-create"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "Succeeded" })))
        .expect(1)
        .mount(&server)
        .await;

    arm_request("PUT", &registry_path(REGISTRY), REGISTRY_API)
        .and(body_partial_json(json!({
            "location": LOCATION,
            "sku": { "name": "Classic", "tier": "Classic" },
            "properties": { "storageAccount": { "id": storage_account_id() } }
        })))
        .respond_with(
            ResponseTemplate::new(201)
                .insert_header("Azure-AsyncOperation", op_url.as_str())
                .set_body_json(registry_body(&storage_account_id(), "Creating")),
        )
        .expect(1)
        .mount(&server)
        .await;

    arm_client(&server)
        .registries()
        .create_classic(REGISTRY, &storage_account_id(), RESOURCE_GROUP, LOCATION)
        .await
        .unwrap();

    server.verify().await;
}

#[tokio::test]
async fn failed_async_operation_surfaces_error() {
    let server = MockServer::start().await;
    let op_url = format!("{}/operations/registry-failed", server.uri());

    Mock::given(method("GET"))
        .and(path("/operations/registry-failed"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "Failed",
            "error": {
                "code": "ClassicSkuNotSupported",
                "message": "Classic SKU is no longer supported."
            }
        })))
        .mount(&server)
        .await;

    arm_request("PUT", &registry_path(REGISTRY), REGISTRY_API)
        .respond_with(ResponseTemplate::new(201).insert_header("Azure-AsyncOperation", op_url.as_str()))
        .mount(&server)
        .await;

    let err = arm_client(&server)
        .registries()
        .create_classic(REGISTRY, &storage_account_id(), RESOURCE_GROUP, LOCATION)
        .await
        .unwrap_err();

    match err {
        ArmError::OperationFailed { status, code, .. } => {
            assert_eq!(status, "Failed");
            assert_eq!(code, "ClassicSkuNotSupported");
        }
        other => panic!("expected operation failure, got {:?}", other),
    }
}

#[tokio::test]
async fn provisioning_state_is_polled_without_headers() {
    let server = MockServer::start().await;

    arm_request("PUT", &registry_path(REGISTRY), REGISTRY_API)
        .respond_with(
            ResponseTemplate::new(201).set_body_json(registry_body(&storage_account_id(), "Creating")),
        )
        .mount(&server)
        .await;
    arm_request("GET", &registry_path(REGISTRY), REGISTRY_API)
        .respond_with(
            ResponseTemplate::new(200).set_body_json(registry_body(&storage_account_id(), "Updating")),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;
    arm_request("GET", &registry_path(REGISTRY), REGISTRY_API)
        .respond_with(
            ResponseTemplate::new(200).set_body_json(registry_body(&storage_account_id(), "Succeeded")),
        )
        .expect(1)
        .mount(&server)
        .await;

    arm_client(&server)
        .registries()
        .create_classic(REGISTRY, &storage_account_id(), RESOURCE_GROUP, LOCATION)
        .await
        .unwrap();

    server.verify().await;
}

#[tokio::test]
async fn operation_that_never_finishes_times_out() {
    let server = MockServer::start().await;
    let op_url = format!("{}/operations/stuck", server.uri());

    Mock::given(method("GET"))
        .and(path("/operations/stuck"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "InProgress" })))
        .mount(&server)
        .await;
    arm_request("DELETE", &registry_path(REGISTRY), REGISTRY_API)
        .respond_with(ResponseTemplate::new(202).insert_header("Azure-AsyncOperation", op_url.as_str()))
        .mount(&server)
        .await;

    let arm = arm_client(&server).with_polling(PollConfig {
        interval: Duration::from_millis(5),
        timeout: Duration::from_millis(50),
    });

    let err = arm
        .registries()
        .delete(REGISTRY, RESOURCE_GROUP)
        .await
        .unwrap_err();
    assert!(matches!(err, ArmError::Timeout { .. }), "{:?}", err);
}

#[tokio::test]
async fn retry_after_longer_than_timeout_still_times_out() {
    let server = MockServer::start().await;
    let op_url = format!("{}/operations/slow", server.uri());

    Mock::given(method("GET"))
        .and(path("/operations/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Retry-After", "3")
                .set_body_json(json!({ "status": "InProgress" })),
        )
        .mount(&server)
        .await;
    arm_request("DELETE", &registry_path(REGISTRY), REGISTRY_API)
        .respond_with(
            ResponseTemplate::new(202)
                .insert_header("Azure-AsyncOperation", op_url.as_str())
                .insert_header("Retry-After", "3"),
        )
        .mount(&server)
        .await;

    let arm = arm_client(&server).with_polling(PollConfig {
        interval: Duration::from_millis(5),
        timeout: Duration::from_millis(100),
    });

    let started = Instant::now();
    let err = arm
        .registries()
        .delete(REGISTRY, RESOURCE_GROUP)
        .await
        .unwrap_err();

    assert!(matches!(err, ArmError::Timeout { .. }), "{:?}", err);
    assert!(
        started.elapsed() < Duration::from_secs(2),
        "waited {:?}",
        started.elapsed()
    );
}

#[tokio::test]
async fn retry_after_sets_poll_delay() {
    let server = MockServer::start().await;
    let op_url = format!("{}/operations/paced", server.uri());

    Mock::given(method("GET"))
        .and(path("/operations/paced"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "Succeeded" })))
        .expect(1)
        .mount(&server)
        .await;
    arm_request("DELETE", &registry_path(REGISTRY), REGISTRY_API)
        .respond_with(
            ResponseTemplate::new(202)
                .insert_header("Azure-AsyncOperation", op_url.as_str())
                .insert_header("Retry-After", "1"),
        )
        .expect(1)
        .mount(&server)
        .await;

    // Polling interval is 5ms, so only Retry-After explains a one second wait
    let started = Instant::now();
    arm_client(&server)
        .registries()
        .delete(REGISTRY, RESOURCE_GROUP)
        .await
        .unwrap();

    assert!(
        started.elapsed() >= Duration::from_secs(1),
        "waited {:?}",
        started.elapsed()
    );
    server.verify().await;
}

#[tokio::test]
async fn hung_request_hits_client_timeout() {
    let server = MockServer::start().await;

    arm_request("GET", &group_path(RESOURCE_GROUP), GROUPS_API)
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(group_body())
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let http = ArmClient::http_client_with_timeout(Duration::from_millis(200)).unwrap();
    let arm = ArmClient::new(
        http,
        &mock_environment(&server),
        SUBSCRIPTION,
        Arc::new(StaticToken::new("test-token")),
    );

    let started = Instant::now();
    let err = arm.resource_groups().get(RESOURCE_GROUP).await.unwrap_err();

    assert!(matches!(err, ArmError::Network(_)), "{:?}", err);
    assert!(started.elapsed() < Duration::from_secs(2));
}

#[tokio::test]
async fn missing_resources_are_not_found() {
    let server = MockServer::start().await;

    arm_request("GET", &storage_path(STORAGE_ACCOUNT), STORAGE_API)
        .respond_with(arm_error(
            404,
            "ResourceNotFound",
            "The Resource 'Microsoft.Storage/storageAccounts/bug1943stor' was not found.",
        ))
        .mount(&server)
        .await;

    let arm = arm_client(&server);
    assert!(!arm
        .storage_accounts()
        .exists(STORAGE_ACCOUNT, RESOURCE_GROUP)
        .await
        .unwrap());

    let err = arm
        .storage_accounts()
        .get_properties(STORAGE_ACCOUNT, RESOURCE_GROUP)
        .await
        .unwrap_err();
    assert!(err.is_not_found());
    assert!(err.to_string().contains("ResourceNotFound"));
}

#[tokio::test]
async fn registry_without_linked_storage_is_an_error() {
    let server = MockServer::start().await;

    arm_request("GET", &registry_path(REGISTRY), REGISTRY_API)
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": registry_path(REGISTRY),
            "name": REGISTRY,
            "properties": { "provisioningState": "Succeeded" }
        })))
        .mount(&server)
        .await;

    let err = arm_client(&server)
        .registries()
        .get_storage_account_id(REGISTRY, RESOURCE_GROUP)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("no linked storage account"));
}

#![allow(dead_code)] // Test helpers appear unused when compiled independently

use acr_classic_repro::azure::{ArmClient, AzureEnvironment, PollConfig, StaticToken};
use reqwest::Client;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockBuilder, MockServer, ResponseTemplate};

pub const SUBSCRIPTION: &str = "00000000-0000-0000-0000-000000000001";
pub const TENANT: &str = "11111111-1111-1111-1111-111111111111";
pub const RESOURCE_GROUP: &str = "bug1943-resources";
pub const STORAGE_ACCOUNT: &str = "bug1943stor";
pub const REGISTRY: &str = "bug1943ClassicReg";
pub const LOCATION: &str = "West Europe";

pub const GROUPS_API: &str = "2018-02-01";
pub const STORAGE_API: &str = "2018-02-01";
pub const REGISTRY_API: &str = "2017-10-01";

/// Environment whose AAD and ARM endpoints both point at the mock server
pub fn mock_environment(server: &MockServer) -> AzureEnvironment {
    AzureEnvironment::public().with_endpoints(Some(server.uri()), Some(server.uri()))
}

/// Polling fast enough for tests
pub fn fast_polling() -> PollConfig {
    PollConfig {
        interval: Duration::from_millis(5),
        timeout: Duration::from_secs(5),
    }
}

/// ARM client with a static bearer token
pub fn arm_client(server: &MockServer) -> ArmClient {
    ArmClient::new(
        Client::new(),
        &mock_environment(server),
        SUBSCRIPTION,
        Arc::new(StaticToken::new("test-token")),
    )
    .with_polling(fast_polling())
}

pub fn group_path(name: &str) -> String {
    format!("/subscriptions/{}/resourcegroups/{}", SUBSCRIPTION, name)
}

pub fn storage_path(name: &str) -> String {
    format!(
        "/subscriptions/{}/resourceGroups/{}/providers/Microsoft.Storage/storageAccounts/{}",
        SUBSCRIPTION, RESOURCE_GROUP, name
    )
}

pub fn registry_path(name: &str) -> String {
    format!(
        "/subscriptions/{}/resourceGroups/{}/providers/Microsoft.ContainerRegistry/registries/{}",
        SUBSCRIPTION, RESOURCE_GROUP, name
    )
}

pub fn storage_account_id() -> String {
    storage_path(STORAGE_ACCOUNT)
}

/// Matcher for an ARM call: method, path and api-version
pub fn arm_request(verb: &str, resource_path: &str, api_version: &str) -> MockBuilder {
    Mock::given(method(verb))
        .and(path(resource_path.to_string()))
        .and(query_param("api-version", api_version))
}

pub fn arm_error(status: u16, code: &str, message: &str) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_json(json!({
        "error": { "code": code, "message": message }
    }))
}

pub fn group_body() -> Value {
    json!({
        "id": group_path(RESOURCE_GROUP),
        "name": RESOURCE_GROUP,
        "location": "westeurope",
        "properties": { "provisioningState": "Succeeded" }
    })
}

pub fn storage_body(id: &str) -> Value {
    json!({
        "id": id,
        "name": STORAGE_ACCOUNT,
        "location": "westeurope",
        "kind": "Storage",
        "sku": { "name": "Standard_LRS", "tier": "Standard" },
        "properties": { "provisioningState": "Succeeded" }
    })
}

pub fn registry_body(linked_storage_id: &str, state: &str) -> Value {
    json!({
        "id": registry_path(REGISTRY),
        "name": REGISTRY,
        "location": "westeurope",
        "sku": { "name": "Classic", "tier": "Classic" },
        "properties": {
            "loginServer": "bug1943classicreg.azurecr.io",
            "provisioningState": state,
            "storageAccount": { "id": linked_storage_id }
        }
    })
}

/// 202 pointing at a Location poll URL that reports pending once, then done
pub async fn mount_location_operation(server: &MockServer, op_path: &str) -> ResponseTemplate {
    Mock::given(method("GET"))
        .and(path(op_path.to_string()))
        .respond_with(ResponseTemplate::new(202))
        .up_to_n_times(1)
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path(op_path.to_string()))
        .respond_with(ResponseTemplate::new(200))
        .mount(server)
        .await;

    ResponseTemplate::new(202).insert_header("Location", format!("{}{}", server.uri(), op_path))
}

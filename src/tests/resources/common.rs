use crate::core::{
    domain::{
        model::vsphere_config::VsphereConfig,
        value_object::{SessionToken, VsphereUrl},
    },
    infrastructure::{api_client::ApiClient, endpoint::VsphereEndpoint},
};
use std::sync::Arc;
use std::time::Duration;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

pub(crate) const SESSION: &str = "3f1a7c2e9b0d4e68";

pub(crate) fn api_path(member: &str) -> String {
    format!("/sdk/vim25/8.0.1.0/{}", member)
}

pub(crate) fn moref(kind: &str, value: &str) -> serde_json::Value {
    serde_json::json!({"_typeName": "ManagedObjectReference", "type": kind, "value": value})
}

pub(crate) fn test_config() -> VsphereConfig {
    VsphereConfig {
        task_timeout: Duration::from_secs(2),
        task_poll_interval: Duration::from_millis(10),
        ..Default::default()
    }
}

pub(crate) async fn create_authenticated_client(mock_server: &MockServer) -> Arc<ApiClient> {
    let url = VsphereUrl::parse(&mock_server.uri()).unwrap();
    let client = ApiClient::new(url, &test_config(), false).unwrap();
    let token = SessionToken::new(SESSION).unwrap();
    client.set_session(token).await;
    Arc::new(client)
}

pub(crate) async fn create_test_endpoint(
    mock_server: &MockServer,
    config: &VsphereConfig,
) -> VsphereEndpoint {
    VsphereEndpoint::with_client(create_authenticated_client(mock_server).await, config)
}

pub(crate) async fn mount_get(mock_server: &MockServer, member: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(api_path(member)))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(mock_server)
        .await;
}

/// One datacenter with its VM and host folders, and cluster `Cluster01`.
///
/// The service content must be read exactly once per endpoint.
pub(crate) async fn mount_inventory(mock_server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(api_path("ServiceInstance/ServiceInstance/content")))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "_typeName": "ServiceContent",
            "rootFolder": moref("Folder", "group-d1"),
            "sessionManager": moref("SessionManager", "SessionManager")
        })))
        .expect(1)
        .mount(mock_server)
        .await;
    mount_get(
        mock_server,
        "Folder/group-d1/childEntity",
        serde_json::json!([moref("Datacenter", "datacenter-3")]),
    )
    .await;
    mount_get(
        mock_server,
        "Datacenter/datacenter-3/vmFolder",
        moref("Folder", "group-v4"),
    )
    .await;
    mount_get(
        mock_server,
        "Datacenter/datacenter-3/hostFolder",
        moref("Folder", "group-h5"),
    )
    .await;
    mount_get(
        mock_server,
        "Folder/group-h5/childEntity",
        serde_json::json!([moref("ClusterComputeResource", "domain-c8")]),
    )
    .await;
    mount_get(
        mock_server,
        "ClusterComputeResource/domain-c8/name",
        serde_json::json!("Cluster01"),
    )
    .await;
}

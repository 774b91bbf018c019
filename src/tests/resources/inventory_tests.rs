use super::common::{create_test_endpoint, mount_get, mount_inventory, moref, test_config};
use crate::core::{
    domain::{error::VsphereError, model::capacity::ClusterCapacitySnapshot},
    infrastructure::endpoint::ManagementEndpoint,
};
use wiremock::MockServer;

async fn mount_datastores(mock_server: &MockServer) {
    mount_get(
        mock_server,
        "ClusterComputeResource/domain-c8/summary",
        serde_json::json!({
            "_typeName": "ClusterComputeResourceSummary",
            "numCpuCores": 8,
            "effectiveMemory": 32768,
            "numHosts": 2,
            "numEffectiveHosts": 2,
            "totalMemory": 68719476736_u64
        }),
    )
    .await;
    mount_get(
        mock_server,
        "ClusterComputeResource/domain-c8/datastore",
        serde_json::json!([moref("Datastore", "datastore-10"), moref("Datastore", "datastore-11")]),
    )
    .await;
    mount_get(
        mock_server,
        "Datastore/datastore-10/summary",
        serde_json::json!({
            "_typeName": "DatastoreSummary",
            "name": "datastore1",
            "freeSpace": 10737418240_u64,
            "capacity": 21474836480_u64,
            "accessible": true,
            "type": "VMFS"
        }),
    )
    .await;
    mount_get(
        mock_server,
        "Datastore/datastore-11/summary",
        serde_json::json!({
            "_typeName": "DatastoreSummary",
            "name": "NFS_share",
            "freeSpace": 1073741824000_u64,
            "capacity": 2199023255552_u64,
            "accessible": true,
            "type": "NFS"
        }),
    )
    .await;
}

#[tokio::test]
async fn test_vm_names_skips_folders() {
    let mock_server = MockServer::start().await;
    mount_inventory(&mock_server).await;
    mount_get(
        &mock_server,
        "Folder/group-v4/childEntity",
        serde_json::json!([
            moref("VirtualMachine", "vm-20"),
            moref("Folder", "group-v30"),
            moref("VirtualMachine", "vm-21")
        ]),
    )
    .await;
    mount_get(
        &mock_server,
        "VirtualMachine/vm-20/name",
        serde_json::json!("web01"),
    )
    .await;
    mount_get(
        &mock_server,
        "VirtualMachine/vm-21/name",
        serde_json::json!("db01"),
    )
    .await;

    let endpoint = create_test_endpoint(&mock_server, &test_config()).await;
    let names = endpoint.vm_names().await.unwrap();
    assert_eq!(names, vec!["web01".to_string(), "db01".to_string()]);

    // Second call reuses the discovered datacenter.
    assert_eq!(endpoint.vm_names().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_find_network() {
    let mock_server = MockServer::start().await;
    mount_inventory(&mock_server).await;
    mount_get(
        &mock_server,
        "Datacenter/datacenter-3/network",
        serde_json::json!([moref("Network", "network-13"), moref("Network", "network-14")]),
    )
    .await;
    mount_get(
        &mock_server,
        "Network/network-13/name",
        serde_json::json!("VM Network"),
    )
    .await;
    mount_get(
        &mock_server,
        "Network/network-14/name",
        serde_json::json!("PG-Lab"),
    )
    .await;

    let endpoint = create_test_endpoint(&mock_server, &test_config()).await;

    let network = endpoint.find_network("PG-Lab").await.unwrap().unwrap();
    assert_eq!(network.name, "PG-Lab");
    assert_eq!(network.reference.kind, "Network");
    assert_eq!(network.reference.value, "network-14");

    assert!(endpoint.find_network("Missing").await.unwrap().is_none());
}

#[tokio::test]
async fn test_capacity_snapshot_uses_named_datastore() {
    let mock_server = MockServer::start().await;
    mount_inventory(&mock_server).await;
    mount_datastores(&mock_server).await;

    let endpoint = create_test_endpoint(&mock_server, &test_config()).await;
    let snapshot = endpoint.capacity_snapshot("NFS_share").await.unwrap();
    assert_eq!(
        snapshot,
        ClusterCapacitySnapshot::new(8, 32768, 1_048_576_000)
    );
}

#[tokio::test]
async fn test_capacity_snapshot_unknown_datastore() {
    let mock_server = MockServer::start().await;
    mount_inventory(&mock_server).await;
    mount_datastores(&mock_server).await;

    let endpoint = create_test_endpoint(&mock_server, &test_config()).await;
    let result = endpoint.capacity_snapshot("vsanDatastore").await;
    assert!(matches!(result, Err(VsphereError::NotFound(_))));
}

#[tokio::test]
async fn test_empty_inventory() {
    let mock_server = MockServer::start().await;
    mount_get(
        &mock_server,
        "ServiceInstance/ServiceInstance/content",
        serde_json::json!({
            "_typeName": "ServiceContent",
            "rootFolder": moref("Folder", "group-d1")
        }),
    )
    .await;
    mount_get(
        &mock_server,
        "Folder/group-d1/childEntity",
        serde_json::json!([]),
    )
    .await;

    let endpoint = create_test_endpoint(&mock_server, &test_config()).await;
    assert!(matches!(
        endpoint.vm_names().await,
        Err(VsphereError::NotFound(_))
    ));
}

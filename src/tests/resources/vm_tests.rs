use super::common::{api_path, create_test_endpoint, mount_get, mount_inventory, moref, test_config};
use crate::{
    core::{
        domain::{error::VsphereError, model::managed_object::ManagedObjectReference},
        infrastructure::endpoint::ManagementEndpoint,
    },
    provisioning::application::{
        service::vm_provisioning_service::VmProvisioningService,
        validator::vm_arguments::VmArguments,
    },
};
use std::time::Duration;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_partial_json, method, path},
};

fn task_info(key: &str, state: &str) -> serde_json::Value {
    serde_json::json!({"_typeName": "TaskInfo", "key": key, "state": state, "progress": 40})
}

async fn mount_task_progress(
    mock_server: &MockServer,
    key: &str,
    running_polls: u64,
    last: serde_json::Value,
) {
    Mock::given(method("GET"))
        .and(path(api_path(&format!("Task/{}/info", key))))
        .respond_with(ResponseTemplate::new(200).set_body_json(task_info(key, "running")))
        .up_to_n_times(running_polls)
        .mount(mock_server)
        .await;
    mount_get(mock_server, &format!("Task/{}/info", key), last).await;
}

#[tokio::test]
async fn test_wait_for_task_polls_until_success() {
    let mock_server = MockServer::start().await;
    mount_task_progress(
        &mock_server,
        "task-101",
        2,
        serde_json::json!({
            "_typeName": "TaskInfo",
            "key": "task-101",
            "state": "success",
            "result": moref("VirtualMachine", "vm-42")
        }),
    )
    .await;

    let endpoint = create_test_endpoint(&mock_server, &test_config()).await;
    let info = endpoint
        .wait_for_task(&ManagedObjectReference::new("Task", "task-101"))
        .await
        .unwrap();
    assert_eq!(
        info.result_reference(),
        Some(ManagedObjectReference::new("VirtualMachine", "vm-42"))
    );

    let polls = mock_server.received_requests().await.unwrap().len();
    assert_eq!(polls, 3);
}

#[tokio::test]
async fn test_wait_for_task_reports_fault() {
    let mock_server = MockServer::start().await;
    mount_get(
        &mock_server,
        "Task/task-102/info",
        serde_json::json!({
            "_typeName": "TaskInfo",
            "key": "task-102",
            "state": "error",
            "error": {
                "_typeName": "LocalizedMethodFault",
                "localizedMessage": "The name 'vm1' already exists.",
                "fault": {"_typeName": "DuplicateName", "name": "vm1"}
            }
        }),
    )
    .await;

    let endpoint = create_test_endpoint(&mock_server, &test_config()).await;
    let result = endpoint
        .wait_for_task(&ManagedObjectReference::new("Task", "task-102"))
        .await;
    assert!(matches!(
        result,
        Err(VsphereError::Task { ref task, ref message })
            if task == "task-102" && message == "The name 'vm1' already exists."
    ));
}

#[tokio::test]
async fn test_wait_for_task_times_out() {
    let mock_server = MockServer::start().await;
    mount_get(
        &mock_server,
        "Task/task-103/info",
        task_info("task-103", "queued"),
    )
    .await;

    let config = crate::core::domain::model::vsphere_config::VsphereConfig {
        task_timeout: Duration::from_millis(50),
        task_poll_interval: Duration::from_millis(10),
        ..Default::default()
    };
    let endpoint = create_test_endpoint(&mock_server, &config).await;
    let result = endpoint
        .wait_for_task(&ManagedObjectReference::new("Task", "task-103"))
        .await;
    assert!(matches!(
        result,
        Err(VsphereError::TaskTimeout { ref task, .. }) if task == "task-103"
    ));
}

async fn mount_vm_inventory(mock_server: &MockServer) {
    mount_inventory(mock_server).await;
    mount_get(
        mock_server,
        "Folder/group-v4/childEntity",
        serde_json::json!([moref("VirtualMachine", "vm-20")]),
    )
    .await;
    mount_get(
        mock_server,
        "VirtualMachine/vm-20/name",
        serde_json::json!("web01"),
    )
    .await;
    mount_get(
        mock_server,
        "Datacenter/datacenter-3/network",
        serde_json::json!([moref("Network", "network-13")]),
    )
    .await;
    mount_get(
        mock_server,
        "Network/network-13/name",
        serde_json::json!("VM Network"),
    )
    .await;
    mount_get(
        mock_server,
        "ClusterComputeResource/domain-c8/summary",
        serde_json::json!({"numCpuCores": 8, "effectiveMemory": 32768}),
    )
    .await;
    mount_get(
        mock_server,
        "ClusterComputeResource/domain-c8/datastore",
        serde_json::json!([moref("Datastore", "datastore-11")]),
    )
    .await;
    mount_get(
        mock_server,
        "Datastore/datastore-11/summary",
        serde_json::json!({
            "name": "NFS_share",
            "freeSpace": 1073741824000_u64,
            "capacity": 2199023255552_u64
        }),
    )
    .await;
    mount_get(
        mock_server,
        "ClusterComputeResource/domain-c8/resourcePool",
        moref("ResourcePool", "resgroup-9"),
    )
    .await;
}

fn vm_arguments(name: &str) -> VmArguments {
    VmArguments {
        name: name.to_string(),
        port_group: "VM Network".to_string(),
        cpu_count: "4".to_string(),
        memory_gb: "8".to_string(),
        disk_gb: "100".to_string(),
        provisioning: "thin".to_string(),
    }
}

#[tokio::test]
async fn test_create_vm_then_add_disk() {
    let mock_server = MockServer::start().await;
    mount_vm_inventory(&mock_server).await;

    Mock::given(method("POST"))
        .and(path(api_path("Folder/group-v4/CreateVM_Task")))
        .and(body_partial_json(serde_json::json!({
            "config": {
                "_typeName": "VirtualMachineConfigSpec",
                "name": "vm1",
                "numCPUs": 4,
                "memoryMB": 8192,
                "files": {"vmPathName": "[NFS_share] vm1"}
            },
            "pool": {"type": "ResourcePool", "value": "resgroup-9"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(moref("Task", "task-201")))
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_task_progress(
        &mock_server,
        "task-201",
        1,
        serde_json::json!({
            "key": "task-201",
            "state": "success",
            "result": moref("VirtualMachine", "vm-42")
        }),
    )
    .await;

    mount_get(
        &mock_server,
        "VirtualMachine/vm-42/config",
        serde_json::json!({
            "_typeName": "VirtualMachineConfigInfo",
            "name": "vm1",
            "hardware": {
                "numCPU": 4,
                "memoryMB": 8192,
                "device": [
                    {
                        "_typeName": "VirtualLsiLogicController",
                        "key": 1000,
                        "controllerKey": 100,
                        "unitNumber": 3
                    },
                    {
                        "_typeName": "VirtualE1000",
                        "key": 4000,
                        "controllerKey": 100,
                        "unitNumber": 7
                    }
                ]
            }
        }),
    )
    .await;

    Mock::given(method("POST"))
        .and(path(api_path("VirtualMachine/vm-42/ReconfigVM_Task")))
        .and(body_partial_json(serde_json::json!({
            "spec": {
                "deviceChange": [{
                    "operation": "add",
                    "fileOperation": "create",
                    "device": {
                        "_typeName": "VirtualDisk",
                        "controllerKey": 1000,
                        "unitNumber": 0,
                        "capacityInKB": 104857600_u64,
                        "backing": {"diskMode": "persistent", "thinProvisioned": true}
                    }
                }]
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(moref("Task", "task-202")))
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_get(
        &mock_server,
        "Task/task-202/info",
        serde_json::json!({"key": "task-202", "state": "success"}),
    )
    .await;

    let endpoint = create_test_endpoint(&mock_server, &test_config()).await;
    let service = VmProvisioningService::new(endpoint, test_config());

    let request = service.validate(&vm_arguments("vm1")).await.unwrap();
    let vm = service.provision(&request).await.unwrap();
    assert_eq!(vm, ManagedObjectReference::new("VirtualMachine", "vm-42"));
}

#[tokio::test]
async fn test_existing_name_issues_no_mutation() {
    let mock_server = MockServer::start().await;
    mount_vm_inventory(&mock_server).await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&mock_server)
        .await;

    let endpoint = create_test_endpoint(&mock_server, &test_config()).await;
    let service = VmProvisioningService::new(endpoint, test_config());

    let result = service.validate(&vm_arguments("web01")).await;
    assert!(result.unwrap_err().is_validation());
}

#[tokio::test]
async fn test_disk_failure_leaves_vm() {
    let mock_server = MockServer::start().await;
    mount_vm_inventory(&mock_server).await;

    Mock::given(method("POST"))
        .and(path(api_path("Folder/group-v4/CreateVM_Task")))
        .respond_with(ResponseTemplate::new(200).set_body_json(moref("Task", "task-301")))
        .mount(&mock_server)
        .await;
    mount_get(
        &mock_server,
        "Task/task-301/info",
        serde_json::json!({
            "key": "task-301",
            "state": "success",
            "result": moref("VirtualMachine", "vm-43")
        }),
    )
    .await;
    mount_get(
        &mock_server,
        "VirtualMachine/vm-43/config",
        serde_json::json!({"name": "vm2", "hardware": {"device": [
            {"_typeName": "VirtualLsiLogicController", "key": 1000}
        ]}}),
    )
    .await;
    Mock::given(method("POST"))
        .and(path(api_path("VirtualMachine/vm-43/ReconfigVM_Task")))
        .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({
            "_typeName": "InvalidDeviceSpec",
            "localizedMessage": "Invalid configuration for device '0'."
        })))
        .mount(&mock_server)
        .await;

    let endpoint = create_test_endpoint(&mock_server, &test_config()).await;
    let service = VmProvisioningService::new(endpoint, test_config());
    let request = service.validate(&vm_arguments("vm2")).await.unwrap();

    match service.provision(&request).await {
        Err(VsphereError::DiskAttach { vm, source }) => {
            assert_eq!(vm, "vm2");
            assert!(matches!(*source, VsphereError::Api { status: 500, .. }));
        }
        other => panic!("expected DiskAttach, got {:?}", other),
    }

    let creates = mock_server
        .received_requests()
        .await
        .unwrap()
        .into_iter()
        .filter(|request| request.url.path().ends_with("/CreateVM_Task"))
        .count();
    assert_eq!(creates, 1);
}

//! Inventory discovery and remote operations against the management endpoint.
//!
//! [`ManagementEndpoint`] is the seam between the provisioning pipelines and the
//! wire; [`VsphereEndpoint`] implements it on top of [`ApiClient`].

use crate::core::{
    domain::{
        error::{VsphereError, VsphereResult},
        model::{
            capacity::{ClusterCapacitySnapshot, ClusterSummary, DatastoreSummary},
            managed_object::{ManagedObjectReference, NamedReference},
            network::{HostConfigManager, HostPortGroupSpec, HostVirtualSwitchSpec},
            task::{TaskInfo, TaskState},
            vm::{DeviceSummary, VirtualMachineConfigInfo, VirtualMachineConfigSpec},
            vsphere_config::VsphereConfig,
            vsphere_session::VsphereSession,
        },
    },
    infrastructure::api_client::ApiClient,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::OnceCell;
use tokio::time::Instant;
use tracing::{debug, info, warn};

const SERVICE_CONTENT_PATH: &str = "ServiceInstance/ServiceInstance/content";

/// Operations the provisioning pipelines need from the endpoint.
///
/// Mutating operations that start a remote task only return once the task
/// has finished.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ManagementEndpoint: Send + Sync {
    /// Names of the VMs in the datacenter's VM folder.
    async fn vm_names(&self) -> VsphereResult<Vec<String>>;

    /// Looks up a network (port group) of the datacenter by name.
    async fn find_network(&self, name: &str) -> VsphereResult<Option<NamedReference>>;

    /// Reads CPU cores and effective memory of the cluster and the free space
    /// of the named datastore.
    async fn capacity_snapshot(&self, datastore: &str) -> VsphereResult<ClusterCapacitySnapshot>;

    /// Creates a VM in the VM folder, placed in the cluster's resource pool.
    async fn create_vm(
        &self,
        spec: &VirtualMachineConfigSpec,
    ) -> VsphereResult<ManagedObjectReference>;

    async fn vm_devices(&self, vm: &ManagedObjectReference) -> VsphereResult<Vec<DeviceSummary>>;

    async fn reconfigure_vm(
        &self,
        vm: &ManagedObjectReference,
        spec: &VirtualMachineConfigSpec,
    ) -> VsphereResult<()>;

    /// Hosts of the named cluster, in inventory order.
    async fn cluster_hosts(&self, cluster: &str) -> VsphereResult<Vec<NamedReference>>;

    async fn add_virtual_switch(
        &self,
        host: &NamedReference,
        switch_name: &str,
        spec: &HostVirtualSwitchSpec,
    ) -> VsphereResult<()>;

    async fn add_port_group(
        &self,
        host: &NamedReference,
        spec: &HostPortGroupSpec,
    ) -> VsphereResult<()>;
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ServiceContent {
    root_folder: ManagedObjectReference,
}

#[derive(Serialize)]
struct CreateVmBody<'a> {
    config: &'a VirtualMachineConfigSpec,
    pool: &'a ManagedObjectReference,
}

#[derive(Serialize)]
struct ReconfigVmBody<'a> {
    spec: &'a VirtualMachineConfigSpec,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AddVirtualSwitchBody<'a> {
    vswitch_name: &'a str,
    spec: &'a HostVirtualSwitchSpec,
}

#[derive(Serialize)]
struct AddPortGroupBody<'a> {
    portgrp: &'a HostPortGroupSpec,
}

/// The folders of the (only) datacenter.
#[derive(Debug, Clone)]
struct Datacenter {
    reference: ManagedObjectReference,
    vm_folder: ManagedObjectReference,
    host_folder: ManagedObjectReference,
}

/// [`ManagementEndpoint`] backed by the `vim25` JSON binding.
///
/// The first datacenter of the inventory is used; the VM flow uses its first
/// cluster.
#[derive(Debug)]
pub struct VsphereEndpoint {
    client: Arc<ApiClient>,
    datacenter: OnceCell<Datacenter>,
    task_timeout: Duration,
    poll_interval: Duration,
}

impl VsphereEndpoint {
    pub fn new(session: &VsphereSession, config: &VsphereConfig) -> Self {
        Self::with_client(session.client(), config)
    }

    pub(crate) fn with_client(client: Arc<ApiClient>, config: &VsphereConfig) -> Self {
        Self {
            client,
            datacenter: OnceCell::new(),
            task_timeout: config.task_timeout,
            poll_interval: config.task_poll_interval,
        }
    }

    /// Polls `Task/{id}/info` until the task succeeds, fails or times out.
    pub async fn wait_for_task(&self, task: &ManagedObjectReference) -> VsphereResult<TaskInfo> {
        let started = Instant::now();
        loop {
            let info: TaskInfo = self.client.get(&task.member_path("info")).await?;
            match info.state {
                TaskState::Success => {
                    debug!(task = %task.value, "task completed");
                    return Ok(info);
                }
                TaskState::Error => {
                    return Err(VsphereError::Task {
                        task: task.value.clone(),
                        message: info.error_message(),
                    });
                }
                TaskState::Queued | TaskState::Running => {
                    debug!(
                        task = %task.value,
                        state = ?info.state,
                        progress = ?info.progress,
                        "waiting for task"
                    );
                }
            }
            if started.elapsed() >= self.task_timeout {
                return Err(VsphereError::TaskTimeout {
                    task: task.value.clone(),
                    seconds: self.task_timeout.as_secs(),
                });
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }

    async fn datacenter(&self) -> VsphereResult<&Datacenter> {
        self.datacenter
            .get_or_try_init(|| self.discover_datacenter())
            .await
    }

    async fn discover_datacenter(&self) -> VsphereResult<Datacenter> {
        let content: ServiceContent = self.client.get(SERVICE_CONTENT_PATH).await?;
        let children: Vec<ManagedObjectReference> = self
            .client
            .get(&content.root_folder.member_path("childEntity"))
            .await?;
        let reference = children
            .into_iter()
            .find(|child| child.kind == "Datacenter")
            .ok_or_else(|| VsphereError::NotFound("no datacenter in inventory".to_string()))?;

        let vm_folder = self.client.get(&reference.member_path("vmFolder")).await?;
        let host_folder = self.client.get(&reference.member_path("hostFolder")).await?;
        debug!(datacenter = %reference, "datacenter discovered");

        Ok(Datacenter {
            reference,
            vm_folder,
            host_folder,
        })
    }

    async fn name_of(&self, reference: &ManagedObjectReference) -> VsphereResult<String> {
        self.client.get(&reference.member_path("name")).await
    }

    async fn clusters(&self) -> VsphereResult<Vec<ManagedObjectReference>> {
        let datacenter = self.datacenter().await?;
        let children: Vec<ManagedObjectReference> = self
            .client
            .get(&datacenter.host_folder.member_path("childEntity"))
            .await?;
        Ok(children
            .into_iter()
            .filter(|child| child.kind == "ClusterComputeResource")
            .collect())
    }

    async fn first_cluster(&self) -> VsphereResult<ManagedObjectReference> {
        self.clusters()
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| VsphereError::NotFound("no cluster in datacenter".to_string()))
    }

    async fn find_cluster(&self, name: &str) -> VsphereResult<ManagedObjectReference> {
        for cluster in self.clusters().await? {
            if self.name_of(&cluster).await? == name {
                return Ok(cluster);
            }
        }
        Err(VsphereError::NotFound(format!("cluster '{}'", name)))
    }

    async fn network_system(&self, host: &NamedReference) -> VsphereResult<ManagedObjectReference> {
        let config_manager: HostConfigManager = self
            .client
            .get(&host.reference.member_path("configManager"))
            .await?;
        config_manager.network_system.ok_or_else(|| {
            VsphereError::NotFound(format!("network system of host '{}'", host.name))
        })
    }
}

#[async_trait]
impl ManagementEndpoint for VsphereEndpoint {
    async fn vm_names(&self) -> VsphereResult<Vec<String>> {
        let datacenter = self.datacenter().await?;
        let children: Vec<ManagedObjectReference> = self
            .client
            .get(&datacenter.vm_folder.member_path("childEntity"))
            .await?;

        let mut names = Vec::new();
        for vm in children.iter().filter(|vm| vm.kind == "VirtualMachine") {
            names.push(self.name_of(vm).await?);
        }
        Ok(names)
    }

    async fn find_network(&self, name: &str) -> VsphereResult<Option<NamedReference>> {
        let datacenter = self.datacenter().await?;
        let networks: Vec<ManagedObjectReference> = self
            .client
            .get(&datacenter.reference.member_path("network"))
            .await?;

        for network in networks {
            if self.name_of(&network).await? == name {
                return Ok(Some(NamedReference::new(network, name)));
            }
        }
        Ok(None)
    }

    async fn capacity_snapshot(&self, datastore: &str) -> VsphereResult<ClusterCapacitySnapshot> {
        let cluster = self.first_cluster().await?;
        let summary: ClusterSummary = self.client.get(&cluster.member_path("summary")).await?;
        let datastores: Vec<ManagedObjectReference> =
            self.client.get(&cluster.member_path("datastore")).await?;

        for candidate in datastores {
            let ds_summary: DatastoreSummary =
                self.client.get(&candidate.member_path("summary")).await?;
            if ds_summary.name == datastore {
                if !ds_summary.accessible {
                    warn!(datastore, "datastore reported as not accessible");
                }
                let snapshot = ClusterCapacitySnapshot::from_summaries(&summary, &ds_summary);
                debug!(?snapshot, "capacity read");
                return Ok(snapshot);
            }
        }
        Err(VsphereError::NotFound(format!(
            "datastore '{}' in cluster {}",
            datastore, cluster.value
        )))
    }

    async fn create_vm(
        &self,
        spec: &VirtualMachineConfigSpec,
    ) -> VsphereResult<ManagedObjectReference> {
        let datacenter = self.datacenter().await?;
        let cluster = self.first_cluster().await?;
        let pool: ManagedObjectReference = self
            .client
            .get(&cluster.member_path("resourcePool"))
            .await?;

        let body = CreateVmBody {
            config: spec,
            pool: &pool,
        };
        let task: ManagedObjectReference = self
            .client
            .post(&datacenter.vm_folder.member_path("CreateVM_Task"), &body)
            .await?;
        info!(task = %task.value, "CreateVM_Task submitted");

        let info = self.wait_for_task(&task).await?;
        info.result_reference().ok_or_else(|| VsphereError::Task {
            task: task.value.clone(),
            message: "task finished without a VM reference".to_string(),
        })
    }

    async fn vm_devices(&self, vm: &ManagedObjectReference) -> VsphereResult<Vec<DeviceSummary>> {
        let config: VirtualMachineConfigInfo = self.client.get(&vm.member_path("config")).await?;
        Ok(config.hardware.device)
    }

    async fn reconfigure_vm(
        &self,
        vm: &ManagedObjectReference,
        spec: &VirtualMachineConfigSpec,
    ) -> VsphereResult<()> {
        let task: ManagedObjectReference = self
            .client
            .post(&vm.member_path("ReconfigVM_Task"), &ReconfigVmBody { spec })
            .await?;
        info!(task = %task.value, vm = %vm.value, "ReconfigVM_Task submitted");
        self.wait_for_task(&task).await?;
        Ok(())
    }

    async fn cluster_hosts(&self, cluster: &str) -> VsphereResult<Vec<NamedReference>> {
        let cluster_ref = self.find_cluster(cluster).await?;
        let hosts: Vec<ManagedObjectReference> =
            self.client.get(&cluster_ref.member_path("host")).await?;

        let mut named = Vec::with_capacity(hosts.len());
        for host in hosts {
            let name = self.name_of(&host).await?;
            named.push(NamedReference::new(host, name));
        }
        Ok(named)
    }

    async fn add_virtual_switch(
        &self,
        host: &NamedReference,
        switch_name: &str,
        spec: &HostVirtualSwitchSpec,
    ) -> VsphereResult<()> {
        let network_system = self.network_system(host).await?;
        let body = AddVirtualSwitchBody {
            vswitch_name: switch_name,
            spec,
        };
        self.client
            .post_void(&network_system.member_path("AddVirtualSwitch"), &body)
            .await
    }

    async fn add_port_group(
        &self,
        host: &NamedReference,
        spec: &HostPortGroupSpec,
    ) -> VsphereResult<()> {
        let network_system = self.network_system(host).await?;
        self.client
            .post_void(
                &network_system.member_path("AddPortGroup"),
                &AddPortGroupBody { portgrp: spec },
            )
            .await
    }
}

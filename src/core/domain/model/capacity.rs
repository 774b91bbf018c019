//! Cluster capacity as reported by the endpoint, and the checks requests must pass.

use crate::core::domain::{error::ValidationError, units::bytes_to_kb};
use serde::Deserialize;

/// `ClusterComputeResource.summary`, reduced to the fields used for validation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterSummary {
    /// Number of physical CPU cores across the cluster.
    pub num_cpu_cores: u64,
    /// Effective memory (MB) available to run VMs. Hosts in maintenance
    /// mode or not responding are not counted.
    pub effective_memory: u64,
    #[serde(default)]
    pub num_hosts: Option<u32>,
    #[serde(default)]
    pub num_effective_hosts: Option<u32>,
    /// Total memory in bytes.
    #[serde(default)]
    pub total_memory: Option<u64>,
}

/// `Datastore.summary`, reduced to the fields used for validation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatastoreSummary {
    pub name: String,
    /// Free space in bytes.
    pub free_space: u64,
    /// Capacity in bytes.
    pub capacity: u64,
    #[serde(default = "default_accessible")]
    pub accessible: bool,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

fn default_accessible() -> bool {
    true
}

/// Point-in-time capacity read once per run and used only for comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClusterCapacitySnapshot {
    pub cpu_cores: u64,
    pub memory_mb: u64,
    pub datastore_free_kb: u64,
}

impl ClusterCapacitySnapshot {
    pub fn new(cpu_cores: u64, memory_mb: u64, datastore_free_kb: u64) -> Self {
        Self {
            cpu_cores,
            memory_mb,
            datastore_free_kb,
        }
    }

    /// Combines the cluster and datastore summaries.
    pub fn from_summaries(cluster: &ClusterSummary, datastore: &DatastoreSummary) -> Self {
        Self::new(
            cluster.num_cpu_cores,
            cluster.effective_memory,
            bytes_to_kb(datastore.free_space),
        )
    }

    /// Requested cores must be strictly below the cluster's cores.
    pub fn check_cpu(&self, cores: u64) -> Result<(), ValidationError> {
        check_below("CPU cores", cores, self.cpu_cores)
    }

    pub fn check_memory_mb(&self, memory_mb: u64) -> Result<(), ValidationError> {
        check_below("memory (MB)", memory_mb, self.memory_mb)
    }

    pub fn check_disk_kb(&self, disk_kb: u64) -> Result<(), ValidationError> {
        check_below("datastore space (KB)", disk_kb, self.datastore_free_kb)
    }
}

fn check_below(resource: &str, requested: u64, available: u64) -> Result<(), ValidationError> {
    if requested < available {
        Ok(())
    } else {
        Err(ValidationError::InsufficientCapacity {
            resource: resource.to_string(),
            requested,
            available,
        })
    }
}

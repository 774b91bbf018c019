//! Checks the `create-vm` arguments against the inventory and the cluster's capacity.

use crate::{
    core::{
        domain::{
            error::{ValidationError, VsphereResult},
            model::{
                vm::{ProvisioningMode, VmProvisioningRequest},
                vsphere_config::VsphereConfig,
            },
            units::{KB_PER_GB, MB_PER_GB},
        },
        infrastructure::endpoint::ManagementEndpoint,
    },
    provisioning::application::validator::{parse_positive, require_name},
};
use tracing::debug;

/// The raw positional arguments of `create-vm`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VmArguments {
    pub name: String,
    pub port_group: String,
    pub cpu_count: String,
    pub memory_gb: String,
    pub disk_gb: String,
    pub provisioning: String,
}

/// Validates the arguments in order and stops at the first violation.
///
/// Only reads from the endpoint. Each quantity must stay strictly below what
/// the cluster reports; capacity is read once, right before the first
/// numeric check.
pub async fn validate_vm_arguments<E>(
    args: &VmArguments,
    endpoint: &E,
    config: &VsphereConfig,
) -> VsphereResult<VmProvisioningRequest>
where
    E: ManagementEndpoint + ?Sized,
{
    let name = require_name("name", &args.name)?;
    let existing = endpoint.vm_names().await?;
    if existing.iter().any(|vm| *vm == name) {
        return Err(ValidationError::ConstraintViolation(format!(
            "VM with the name \"{}\" already exists",
            name
        ))
        .into());
    }

    let snapshot = endpoint.capacity_snapshot(&config.datastore).await?;
    debug!(?snapshot, datastore = %config.datastore, "validating against capacity");

    let cpu_count = parse_positive("cpu", "CPU value", &args.cpu_count)?;
    snapshot.check_cpu(cpu_count)?;
    let cpu_count = u32::try_from(cpu_count).map_err(|_| {
        ValidationError::ConstraintViolation(format!("CPU value {} is too large", cpu_count))
    })?;

    let memory_gb = parse_positive("memory", "RAM size", &args.memory_gb)?;
    let memory_mb = scale("memory", memory_gb, MB_PER_GB)?;
    snapshot.check_memory_mb(memory_mb)?;

    let disk_gb = parse_positive("disk", "Disk size", &args.disk_gb)?;
    let disk_kb = scale("disk", disk_gb, KB_PER_GB)?;
    snapshot.check_disk_kb(disk_kb)?;

    let mode: ProvisioningMode = args.provisioning.parse()?;

    let port_group = require_name("port_group", &args.port_group)?;
    let network = endpoint.find_network(&port_group).await?.ok_or_else(|| {
        ValidationError::Field {
            field: "port_group".to_string(),
            message: format!("network '{}' does not exist in the datacenter", port_group),
        }
    })?;

    Ok(VmProvisioningRequest {
        name,
        network,
        cpu_count,
        memory_mb,
        disk_kb,
        mode,
        datastore: config.datastore.clone(),
    })
}

fn scale(field: &str, gb: u64, factor: u64) -> Result<u64, ValidationError> {
    gb.checked_mul(factor).ok_or_else(|| ValidationError::Field {
        field: field.to_string(),
        message: format!("{} GB is out of range", gb),
    })
}

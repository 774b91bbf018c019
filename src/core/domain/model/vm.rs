//! Domain models for virtual machine provisioning.
//!
//! The write-side types mirror the `vim25` data objects sent to `CreateVM_Task`
//! and `ReconfigVM_Task`; each serializes with the `_typeName` discriminator the
//! JSON binding expects. The read-side types keep only what the disk step needs.

use crate::core::domain::{
    error::ValidationError,
    model::managed_object::{ManagedObjectReference, NamedReference},
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Disk allocation strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvisioningMode {
    /// Space is allocated on demand.
    Thin,
    /// Space is reserved upfront.
    Thick,
}

impl ProvisioningMode {
    #[must_use]
    pub fn is_thin(self) -> bool {
        self == ProvisioningMode::Thin
    }
}

const PROVISIONING_HINT: &str = "It determines if thin provisioning should be used or not";

impl FromStr for ProvisioningMode {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "thin" => Ok(ProvisioningMode::Thin),
            "thick" => Ok(ProvisioningMode::Thick),
            _ => Err(ValidationError::Field {
                field: "provisioning".to_string(),
                message: format!(
                    "Can only be \"thin\" or \"thick\" (got \"{}\"). {}",
                    value, PROVISIONING_HINT
                ),
            }),
        }
    }
}

impl fmt::Display for ProvisioningMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProvisioningMode::Thin => f.write_str("thin"),
            ProvisioningMode::Thick => f.write_str("thick"),
        }
    }
}

/// Validated intent for one VM, in the units the API takes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VmProvisioningRequest {
    pub name: String,
    /// Port group the NIC is attached to.
    pub network: NamedReference,
    pub cpu_count: u32,
    pub memory_mb: u64,
    pub disk_kb: u64,
    pub mode: ProvisioningMode,
    /// Name of the datastore holding the VM files and disk.
    pub datastore: String,
}

/// `VirtualMachineConfigSpec`, limited to what provisioning sets.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "_typeName", rename_all = "camelCase")]
pub struct VirtualMachineConfigSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guest_id: Option<String>,
    #[serde(rename = "numCPUs", skip_serializing_if = "Option::is_none")]
    pub num_cpus: Option<u32>,
    #[serde(rename = "memoryMB", skip_serializing_if = "Option::is_none")]
    pub memory_mb: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub files: Option<VirtualMachineFileInfo>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub device_change: Vec<VirtualDeviceConfigSpec>,
}

impl VirtualMachineConfigSpec {
    /// A spec that only changes devices, as used by reconfiguration.
    pub fn device_change(device_change: Vec<VirtualDeviceConfigSpec>) -> Self {
        Self {
            name: None,
            guest_id: None,
            num_cpus: None,
            memory_mb: None,
            files: None,
            device_change,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "_typeName", rename_all = "camelCase")]
pub struct VirtualMachineFileInfo {
    /// `[<datastore>] <vm-name>`: the directory for the VM's files.
    pub vm_path_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DeviceOperation {
    Add,
    Remove,
    Edit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FileOperation {
    Create,
    Destroy,
    Replace,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "_typeName", rename_all = "camelCase")]
pub struct VirtualDeviceConfigSpec {
    pub operation: DeviceOperation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_operation: Option<FileOperation>,
    pub device: VirtualDevice,
}

/// The devices provisioning adds, tagged by their `vim25` type name.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "_typeName")]
pub enum VirtualDevice {
    VirtualE1000(VirtualEthernetCard),
    VirtualLsiLogicController(VirtualScsiController),
    VirtualDisk(VirtualDisk),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "_typeName")]
pub struct Description {
    pub label: String,
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualEthernetCard {
    pub key: i32,
    pub device_info: Description,
    pub backing: VirtualEthernetCardNetworkBackingInfo,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "_typeName", rename_all = "camelCase")]
pub struct VirtualEthernetCardNetworkBackingInfo {
    pub device_name: String,
    pub network: ManagedObjectReference,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ScsiSharing {
    NoSharing,
    VirtualSharing,
    PhysicalSharing,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "_typeName", rename_all = "camelCase")]
pub struct VirtualDevicePciBusSlotInfo {
    pub pci_slot_number: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualScsiController {
    pub key: i32,
    pub device_info: Description,
    pub slot_info: VirtualDevicePciBusSlotInfo,
    pub bus_number: i32,
    pub shared_bus: ScsiSharing,
    pub scsi_ctlr_unit_number: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualDisk {
    pub key: i32,
    pub controller_key: i32,
    pub unit_number: i32,
    #[serde(rename = "capacityInKB")]
    pub capacity_in_kb: u64,
    pub backing: VirtualDiskFlatVer2BackingInfo,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "_typeName", rename_all = "camelCase")]
pub struct VirtualDiskFlatVer2BackingInfo {
    /// Empty: the server places the disk next to the VM files.
    pub file_name: String,
    pub disk_mode: String,
    pub thin_provisioned: bool,
}

/// `VirtualMachine.config`, reduced to the device list.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualMachineConfigInfo {
    pub name: String,
    pub hardware: VirtualHardware,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualHardware {
    #[serde(rename = "numCPU", default)]
    pub num_cpu: Option<u32>,
    #[serde(rename = "memoryMB", default)]
    pub memory_mb: Option<u64>,
    #[serde(default)]
    pub device: Vec<DeviceSummary>,
}

/// Any device of an existing VM: its type, key and position on its controller.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceSummary {
    #[serde(rename = "_typeName")]
    pub type_name: String,
    pub key: i32,
    #[serde(default)]
    pub controller_key: Option<i32>,
    #[serde(default)]
    pub unit_number: Option<i32>,
}

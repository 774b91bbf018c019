//! Turns a validated [`VmProvisioningRequest`] into `vim25` config specs.

use crate::core::domain::{
    error::{VsphereError, VsphereResult},
    model::vm::{
        Description, DeviceOperation, DeviceSummary, FileOperation, ScsiSharing,
        VirtualDevice, VirtualDeviceConfigSpec, VirtualDevicePciBusSlotInfo, VirtualDisk,
        VirtualDiskFlatVer2BackingInfo, VirtualEthernetCard,
        VirtualEthernetCardNetworkBackingInfo, VirtualMachineConfigSpec,
        VirtualMachineFileInfo, VirtualScsiController, VmProvisioningRequest,
    },
};

pub const LSI_LOGIC_CONTROLLER: &str = "VirtualLsiLogicController";
pub const SCSI_PCI_SLOT: i32 = 16;
pub const SCSI_BUS_NUMBER: i32 = 0;
/// Unit the controller itself occupies on its bus.
pub const SCSI_CONTROLLER_UNIT: i32 = 7;
pub const MAX_SCSI_UNIT: i32 = 15;
pub const DISK_MODE_PERSISTENT: &str = "persistent";

// Temporary keys for devices being added; the server assigns the real ones.
const NIC_KEY: i32 = -100;
const SCSI_CONTROLLER_KEY: i32 = -101;
const DISK_KEY: i32 = -102;

/// `[<datastore>] <vm-name>`, the directory the VM files are created in.
#[must_use]
pub fn vm_path_name(datastore: &str, vm_name: &str) -> String {
    format!("[{}] {}", datastore, vm_name)
}

/// Builds the `CreateVM_Task` spec: one E1000 NIC on the requested network and
/// one LSI Logic controller. The disk is added afterwards.
#[must_use]
pub fn build_create_spec(
    request: &VmProvisioningRequest,
    guest_id: &str,
) -> VirtualMachineConfigSpec {
    let nic = VirtualDeviceConfigSpec {
        operation: DeviceOperation::Add,
        file_operation: None,
        device: VirtualDevice::VirtualE1000(VirtualEthernetCard {
            key: NIC_KEY,
            device_info: Description {
                label: "Network adapter 1".to_string(),
                summary: request.network.name.clone(),
            },
            backing: VirtualEthernetCardNetworkBackingInfo {
                device_name: request.network.name.clone(),
                network: request.network.reference.clone(),
            },
        }),
    };

    let controller = VirtualDeviceConfigSpec {
        operation: DeviceOperation::Add,
        file_operation: None,
        device: VirtualDevice::VirtualLsiLogicController(VirtualScsiController {
            key: SCSI_CONTROLLER_KEY,
            device_info: Description {
                label: "SCSI controller 0".to_string(),
                summary: "LSI Logic".to_string(),
            },
            slot_info: VirtualDevicePciBusSlotInfo {
                pci_slot_number: SCSI_PCI_SLOT,
            },
            bus_number: SCSI_BUS_NUMBER,
            shared_bus: ScsiSharing::NoSharing,
            scsi_ctlr_unit_number: SCSI_CONTROLLER_UNIT,
        }),
    };

    VirtualMachineConfigSpec {
        name: Some(request.name.clone()),
        guest_id: Some(guest_id.to_string()),
        num_cpus: Some(request.cpu_count),
        memory_mb: Some(request.memory_mb),
        files: Some(VirtualMachineFileInfo {
            vm_path_name: vm_path_name(&request.datastore, &request.name),
        }),
        device_change: vec![nic, controller],
    }
}

/// Finds the LSI Logic controller among the VM's devices.
pub fn find_controller(devices: &[DeviceSummary]) -> Option<&DeviceSummary> {
    devices
        .iter()
        .find(|device| device.type_name == LSI_LOGIC_CONTROLLER)
}

/// Lowest unit number on the controller that is neither taken nor reserved.
pub fn next_free_unit(devices: &[DeviceSummary], controller_key: i32) -> Option<i32> {
    let taken: Vec<i32> = devices
        .iter()
        .filter(|device| device.controller_key == Some(controller_key))
        .filter_map(|device| device.unit_number)
        .collect();
    (0..=MAX_SCSI_UNIT).find(|unit| *unit != SCSI_CONTROLLER_UNIT && !taken.contains(unit))
}

/// Builds the `ReconfigVM_Task` spec that adds the requested disk to the VM's
/// LSI Logic controller.
pub fn build_disk_spec(
    request: &VmProvisioningRequest,
    devices: &[DeviceSummary],
) -> VsphereResult<VirtualMachineConfigSpec> {
    let controller = find_controller(devices).ok_or_else(|| {
        VsphereError::NotFound(format!("LSI Logic controller on VM '{}'", request.name))
    })?;
    let unit_number = next_free_unit(devices, controller.key).ok_or_else(|| {
        VsphereError::NotFound(format!(
            "free unit number on SCSI controller {} of VM '{}'",
            controller.key, request.name
        ))
    })?;

    let disk = VirtualDeviceConfigSpec {
        operation: DeviceOperation::Add,
        file_operation: Some(FileOperation::Create),
        device: VirtualDevice::VirtualDisk(VirtualDisk {
            key: DISK_KEY,
            controller_key: controller.key,
            unit_number,
            capacity_in_kb: request.disk_kb,
            backing: VirtualDiskFlatVer2BackingInfo {
                file_name: String::new(),
                disk_mode: DISK_MODE_PERSISTENT.to_string(),
                thin_provisioned: request.mode.is_thin(),
            },
        }),
    };
    Ok(VirtualMachineConfigSpec::device_change(vec![disk]))
}

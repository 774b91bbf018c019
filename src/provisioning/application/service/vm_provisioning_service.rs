use crate::{
    core::{
        domain::{
            error::{VsphereError, VsphereResult},
            model::{
                managed_object::ManagedObjectReference, vm::VmProvisioningRequest,
                vsphere_config::VsphereConfig,
            },
        },
        infrastructure::endpoint::ManagementEndpoint,
    },
    provisioning::application::{
        builder::vm_spec_builder::{build_create_spec, build_disk_spec},
        validator::vm_arguments::{VmArguments, validate_vm_arguments},
    },
};
use tracing::{error, info};

/// Creates a VM in two remote steps: the VM with NIC and controller, then its disk.
pub struct VmProvisioningService<E> {
    endpoint: E,
    config: VsphereConfig,
}

impl<E> VmProvisioningService<E>
where
    E: ManagementEndpoint,
{
    pub fn new(endpoint: E, config: VsphereConfig) -> Self {
        Self { endpoint, config }
    }

    /// Validates the CLI arguments against the inventory and capacity.
    pub async fn validate(&self, args: &VmArguments) -> VsphereResult<VmProvisioningRequest> {
        validate_vm_arguments(args, &self.endpoint, &self.config).await
    }

    /// Creates the VM, then attaches its disk.
    ///
    /// A failure after the VM exists is reported as [`VsphereError::DiskAttach`];
    /// the VM is left in place.
    pub async fn provision(
        &self,
        request: &VmProvisioningRequest,
    ) -> VsphereResult<ManagedObjectReference> {
        let spec = build_create_spec(request, &self.config.guest_id);
        info!(vm = %request.name, "creating VM without disk");
        let vm = self.endpoint.create_vm(&spec).await?;
        info!(vm = %request.name, reference = %vm, "VM created");

        self.attach_disk(request, &vm).await.map_err(|source| {
            error!(vm = %request.name, error = %source, "disk attachment failed");
            VsphereError::DiskAttach {
                vm: request.name.clone(),
                source: Box::new(source),
            }
        })?;
        Ok(vm)
    }

    async fn attach_disk(
        &self,
        request: &VmProvisioningRequest,
        vm: &ManagedObjectReference,
    ) -> VsphereResult<()> {
        info!(vm = %request.name, disk_kb = request.disk_kb, mode = %request.mode, "adding disk");
        let devices = self.endpoint.vm_devices(vm).await?;
        let spec = build_disk_spec(request, &devices)?;
        self.endpoint.reconfigure_vm(vm, &spec).await
    }
}

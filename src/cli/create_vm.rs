use crate::{
    cli::{connect, disconnect, setting_line},
    core::{
        domain::{
            error::VsphereResult,
            model::vsphere_session::VsphereSession,
            units::{kb_to_gb, mb_to_gb},
        },
        infrastructure::{endpoint::VsphereEndpoint, env_config::EnvConfig},
    },
    provisioning::application::{
        service::vm_provisioning_service::VmProvisioningService,
        validator::vm_arguments::VmArguments,
    },
};
use clap::Parser;

/// Create a virtual machine with a NIC, an LSI Logic controller and one disk.
///
/// The endpoint and credentials are read from VSPHERE_* environment
/// variables (or a .env file).
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "create-vm", version, allow_negative_numbers = true)]
pub struct CreateVmCommand {
    /// Name of the new VM
    pub vm_name: String,
    /// Port group (network) the NIC is attached to
    pub port_group: String,
    /// Number of virtual CPUs
    pub cpu_count: String,
    /// Memory in GB
    pub memory_gb: String,
    /// Disk size in GB
    pub disk_gb: String,
    /// Disk provisioning: thin or thick
    pub provisioning: String,
}

impl CreateVmCommand {
    pub fn arguments(&self) -> VmArguments {
        VmArguments {
            name: self.vm_name.clone(),
            port_group: self.port_group.clone(),
            cpu_count: self.cpu_count.clone(),
            memory_gb: self.memory_gb.clone(),
            disk_gb: self.disk_gb.clone(),
            provisioning: self.provisioning.clone(),
        }
    }
}

pub async fn run(command: CreateVmCommand) -> VsphereResult<()> {
    let env = EnvConfig::load()?;
    let session = connect(&env).await?;
    let result = provision(&command, &session, &env).await;
    disconnect(session).await;
    result
}

async fn provision(
    command: &CreateVmCommand,
    session: &VsphereSession,
    env: &EnvConfig,
) -> VsphereResult<()> {
    let endpoint = VsphereEndpoint::new(session, &env.settings);
    let service = VmProvisioningService::new(endpoint, env.settings.clone());
    let request = service.validate(&command.arguments()).await?;
    let memory = format!("{}GB", mb_to_gb(request.memory_mb));
    let disk = format!("{}GB", kb_to_gb(request.disk_kb));

    println!("\nAttempting to create Virtual machine with following settings:");
    println!("{}", setting_line("Name", &request.name));
    println!("{}", setting_line("Port Group", &request.network.name));
    println!("{}", setting_line("CPUs", request.cpu_count));
    println!("{}", setting_line("Memory", memory));
    println!("{}", setting_line("Disk", disk));
    println!("{}", setting_line("Provision", request.mode));
    println!("{}", setting_line("Datastore", &request.datastore));

    println!("\nCreating VM without disk...");
    service.provision(&request).await?;
    println!("\nVM {} successfully created.\nDone.", request.name);
    Ok(())
}

use crate::{
    cli::{connect, disconnect, setting_line},
    core::{
        domain::{error::VsphereResult, model::network::SwitchProvisioningRequest},
        infrastructure::{endpoint::VsphereEndpoint, env_config::EnvConfig},
    },
    provisioning::application::{
        service::switch_provisioning_service::SwitchProvisioningService,
        validator::switch_arguments::{SwitchArguments, validate_switch_arguments},
    },
};
use clap::Parser;

/// Create a standard virtual switch and a port group on every host of a cluster.
///
/// The endpoint and credentials are read from VSPHERE_* environment
/// variables (or a .env file).
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "create-vswitch", version, allow_negative_numbers = true)]
pub struct CreateVswitchCommand {
    /// Target cluster name
    pub cluster: String,
    /// Name of the new switch
    pub switch_name: String,
    /// MTU (1500-9000)
    pub mtu: String,
    /// Number of ports (1-1024)
    pub num_ports: String,
    /// Name of the port group attached to the switch
    pub port_group: String,
    /// VLAN ID (0-4095)
    pub vlan_id: String,
    /// Physical NIC to bond the switch to, e.g. vmnic1
    pub nic: Option<String>,
}

impl CreateVswitchCommand {
    pub fn arguments(&self) -> SwitchArguments {
        SwitchArguments {
            cluster: self.cluster.clone(),
            switch_name: self.switch_name.clone(),
            mtu: self.mtu.clone(),
            num_ports: self.num_ports.clone(),
            port_group: self.port_group.clone(),
            vlan_id: self.vlan_id.clone(),
            nic: self.nic.clone(),
        }
    }
}

/// Validates before connecting: the switch arguments need no remote reads.
pub async fn run(command: CreateVswitchCommand) -> VsphereResult<()> {
    let request = validate_switch_arguments(&command.arguments())?;
    let env = EnvConfig::load()?;
    let session = connect(&env).await?;

    print_settings(&request);
    let endpoint = VsphereEndpoint::new(&session, &env.settings);
    let result = SwitchProvisioningService::new(endpoint)
        .provision(&request)
        .await;
    disconnect(session).await;

    let hosts = result?;
    match &request.nic {
        Some(nic) => println!(
            "{} created with {} ports and attached to {} on {} host(s)...",
            request.switch_name,
            request.num_ports,
            nic,
            hosts.len()
        ),
        None => println!(
            "{} created with {} ports on {} host(s)...",
            request.switch_name,
            request.num_ports,
            hosts.len()
        ),
    }
    println!(
        "{} added to the port group {}...",
        request.switch_name, request.port_group
    );
    println!("Done.");
    Ok(())
}

fn print_settings(request: &SwitchProvisioningRequest) {
    println!("Attempting to create vSwitch with following settings:");
    println!("{}", setting_line("Cluster", &request.cluster));
    println!("{}", setting_line("Name", &request.switch_name));
    println!("{}", setting_line("MTU", request.mtu));
    println!("{}", setting_line("Number of ports", request.num_ports));
    println!("{}", setting_line("Port group", &request.port_group));
    println!("{}", setting_line("VLAN", request.vlan_id));
    if let Some(nic) = &request.nic {
        println!("{}", setting_line("Physical NIC", nic));
    }
}

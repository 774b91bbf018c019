use crate::{
    core::domain::{error::ValidationError, model::network::SwitchProvisioningRequest},
    provisioning::application::validator::{parse_number, require_name},
};

pub const MIN_MTU: u32 = 1500;
pub const MAX_MTU: u32 = 9000;
pub const MIN_PORTS: u32 = 1;
pub const MAX_PORTS: u32 = 1024;
pub const MAX_VLAN_ID: u16 = 4095;

/// The raw positional arguments of `create-vswitch`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwitchArguments {
    pub cluster: String,
    pub switch_name: String,
    pub mtu: String,
    pub num_ports: String,
    pub port_group: String,
    pub vlan_id: String,
    pub nic: Option<String>,
}

/// Validates the switch arguments. Needs no remote reads.
///
/// Ranges are inclusive: MTU 1500..=9000, ports 1..=1024, VLAN 0..=4095.
pub fn validate_switch_arguments(
    args: &SwitchArguments,
) -> Result<SwitchProvisioningRequest, ValidationError> {
    let cluster = require_name("cluster", &args.cluster)?;
    let switch_name = require_name("switch_name", &args.switch_name)?;

    let mtu = parse_number("mtu", "MTU", &args.mtu)?;
    if !(u64::from(MIN_MTU)..=u64::from(MAX_MTU)).contains(&mtu) {
        return Err(ValidationError::ConstraintViolation(format!(
            "MTU cannot be lower than {} or higher than {}",
            MIN_MTU, MAX_MTU
        )));
    }

    let num_ports = parse_number("num_ports", "Number of ports", &args.num_ports)?;
    if !(u64::from(MIN_PORTS)..=u64::from(MAX_PORTS)).contains(&num_ports) {
        return Err(ValidationError::ConstraintViolation(format!(
            "The number of ports may not exceed {} or be lower than {}",
            MAX_PORTS, MIN_PORTS
        )));
    }

    let port_group = require_name("port_group", &args.port_group)?;

    let vlan_id = parse_number("vlan_id", "VLAN ID", &args.vlan_id)?;
    if vlan_id > u64::from(MAX_VLAN_ID) {
        return Err(ValidationError::ConstraintViolation(format!(
            "VLAN ID cannot be lower than 0 or exceed {}",
            MAX_VLAN_ID
        )));
    }

    let nic = match args.nic.as_deref() {
        Some(raw) => Some(require_name("nic", raw)?),
        None => None,
    };

    // Ranges were checked above, so the narrowing casts cannot truncate.
    Ok(SwitchProvisioningRequest {
        cluster,
        switch_name,
        mtu: mtu as u32,
        num_ports: num_ports as u32,
        port_group,
        vlan_id: vlan_id as u16,
        nic,
    })
}

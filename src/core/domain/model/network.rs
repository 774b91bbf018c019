//! Domain models for standard virtual switches and port groups on hosts.

use crate::core::domain::model::managed_object::ManagedObjectReference;
use serde::{Deserialize, Serialize};

/// Validated intent for one switch plus port group, applied to every host of a cluster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwitchProvisioningRequest {
    pub cluster: String,
    pub switch_name: String,
    pub mtu: u32,
    pub num_ports: u32,
    pub port_group: String,
    pub vlan_id: u16,
    /// Physical NIC to bond the switch to, e.g. `vmnic1`.
    pub nic: Option<String>,
}

/// `HostVirtualSwitchSpec`, the argument of `AddVirtualSwitch`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "_typeName", rename_all = "camelCase")]
pub struct HostVirtualSwitchSpec {
    pub num_ports: u32,
    pub mtu: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bridge: Option<HostVirtualSwitchBondBridge>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "_typeName", rename_all = "camelCase")]
pub struct HostVirtualSwitchBondBridge {
    pub nic_device: Vec<String>,
}

/// `HostPortGroupSpec`, the argument of `AddPortGroup`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "_typeName", rename_all = "camelCase")]
pub struct HostPortGroupSpec {
    pub name: String,
    pub vlan_id: u16,
    pub vswitch_name: String,
    pub policy: HostNetworkPolicy,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "_typeName", rename_all = "camelCase")]
pub struct HostNetworkPolicy {
    pub security: HostNetworkSecurityPolicy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "_typeName", rename_all = "camelCase")]
pub struct HostNetworkSecurityPolicy {
    pub allow_promiscuous: bool,
    pub mac_changes: bool,
    pub forged_transmits: bool,
}

/// `HostSystem.configManager`, reduced to the network system.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostConfigManager {
    #[serde(default)]
    pub network_system: Option<ManagedObjectReference>,
}

use crate::core::domain::model::network::{
    HostNetworkPolicy, HostNetworkSecurityPolicy, HostPortGroupSpec, HostVirtualSwitchBondBridge,
    HostVirtualSwitchSpec, SwitchProvisioningRequest,
};

/// Security policy of every port group created: promiscuous mode and forged
/// transmits allowed, MAC address changes refused.
pub const PORT_GROUP_SECURITY: HostNetworkSecurityPolicy = HostNetworkSecurityPolicy {
    allow_promiscuous: true,
    mac_changes: false,
    forged_transmits: true,
};

#[must_use]
pub fn build_switch_spec(request: &SwitchProvisioningRequest) -> HostVirtualSwitchSpec {
    HostVirtualSwitchSpec {
        num_ports: request.num_ports,
        mtu: request.mtu,
        bridge: request.nic.as_ref().map(|nic| HostVirtualSwitchBondBridge {
            nic_device: vec![nic.clone()],
        }),
    }
}

#[must_use]
pub fn build_port_group_spec(request: &SwitchProvisioningRequest) -> HostPortGroupSpec {
    HostPortGroupSpec {
        name: request.port_group.clone(),
        vlan_id: request.vlan_id,
        vswitch_name: request.switch_name.clone(),
        policy: HostNetworkPolicy {
            security: PORT_GROUP_SECURITY,
        },
    }
}

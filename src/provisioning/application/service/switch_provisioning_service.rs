use crate::{
    core::{
        domain::{
            error::{VsphereError, VsphereResult},
            model::network::SwitchProvisioningRequest,
        },
        infrastructure::endpoint::ManagementEndpoint,
    },
    provisioning::application::builder::switch_spec_builder::{
        build_port_group_spec, build_switch_spec,
    },
};
use tracing::info;

/// Adds a standard switch, then a port group on it, to every host of a cluster.
pub struct SwitchProvisioningService<E> {
    endpoint: E,
}

impl<E> SwitchProvisioningService<E>
where
    E: ManagementEndpoint,
{
    pub fn new(endpoint: E) -> Self {
        Self { endpoint }
    }

    /// Applies the request host by host, in inventory order. All switches are
    /// added before the first port group. Returns the host names.
    ///
    /// Stops at the first failing call; hosts already changed stay changed.
    pub async fn provision(
        &self,
        request: &SwitchProvisioningRequest,
    ) -> VsphereResult<Vec<String>> {
        let hosts = self.endpoint.cluster_hosts(&request.cluster).await?;
        if hosts.is_empty() {
            return Err(VsphereError::NotFound(format!(
                "hosts in cluster '{}'",
                request.cluster
            )));
        }

        let switch_spec = build_switch_spec(request);
        for host in &hosts {
            self.endpoint
                .add_virtual_switch(host, &request.switch_name, &switch_spec)
                .await?;
            info!(host = %host.name, switch = %request.switch_name, "virtual switch added");
        }

        let port_group_spec = build_port_group_spec(request);
        for host in &hosts {
            self.endpoint.add_port_group(host, &port_group_spec).await?;
            info!(host = %host.name, port_group = %request.port_group, "port group added");
        }

        Ok(hosts.into_iter().map(|host| host.name).collect())
    }
}

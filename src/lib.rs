//! Provisioning of virtual machines and standard virtual switches on a VMware
//! vSphere cluster, over the JSON binding of the `vim25` API.
//!
//! Two pipelines share this crate. Each opens a session, validates the
//! user's arguments, builds the `vim25` specs and runs the remote calls:
//!
//! - VM: [`VmProvisioningService`] checks CPU, memory and disk against the
//!   cluster's capacity, creates the VM, waits for the task, then adds the disk.
//! - Switch: [`SwitchProvisioningService`] adds a switch and then a port group
//!   on every host of a cluster.
//!
//! # Examples
//!
//! ```no_run
//! use vsphere_provision::{
//!     EnvConfig, SessionService, VmArguments, VmProvisioningService, VsphereEndpoint,
//!     VsphereResult,
//! };
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> VsphereResult<()> {
//!     let env = EnvConfig::load()?;
//!     let session = SessionService::establish(&env.connection, &env.settings)
//!         .await
//!         .into_result()?;
//!
//!     let endpoint = VsphereEndpoint::new(&session, &env.settings);
//!     let service = VmProvisioningService::new(endpoint, env.settings.clone());
//!     let request = service
//!         .validate(&VmArguments {
//!             name: "vm1".to_string(),
//!             port_group: "VM Network".to_string(),
//!             cpu_count: "2".to_string(),
//!             memory_gb: "4".to_string(),
//!             disk_gb: "40".to_string(),
//!             provisioning: "thin".to_string(),
//!         })
//!         .await?;
//!     service.provision(&request).await?;
//!
//!     session.close().await
//! }
//! ```

mod auth;
pub mod cli;
mod core;
mod provisioning;

pub use crate::{
    auth::application::service::session_service::SessionService,
    core::{
        domain::{
            error::{ValidationError, VsphereError, VsphereResult},
            model::{
                capacity::ClusterCapacitySnapshot,
                managed_object::{ManagedObjectReference, NamedReference},
                network::SwitchProvisioningRequest,
                vm::{ProvisioningMode, VmProvisioningRequest},
                vsphere_config::{RateLimitConfig, VsphereConfig},
                vsphere_connection::VsphereConnection,
                vsphere_session::{ConnectionOutcome, SecurityMode, VsphereSession},
            },
            units,
            value_object::{VsphereHost, VspherePassword, VsphereUrl, VsphereUsername},
        },
        infrastructure::{
            endpoint::{ManagementEndpoint, VsphereEndpoint},
            env_config::EnvConfig,
        },
    },
    provisioning::application::{
        service::{
            switch_provisioning_service::SwitchProvisioningService,
            vm_provisioning_service::VmProvisioningService,
        },
        validator::{
            switch_arguments::{SwitchArguments, validate_switch_arguments},
            vm_arguments::{VmArguments, validate_vm_arguments},
        },
    },
};

#[cfg(test)]
mod tests;

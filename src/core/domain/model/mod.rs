pub mod capacity;
pub mod managed_object;
pub mod network;
pub mod task;
pub mod vm;
pub mod vsphere_config;
pub mod vsphere_connection;
pub mod vsphere_session;

pub mod switch_provisioning_service;
pub mod vm_provisioning_service;

mod common;
mod config_tests;
mod inventory_tests;
mod vm_tests;

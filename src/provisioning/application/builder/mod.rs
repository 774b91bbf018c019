pub mod switch_spec_builder;
pub mod vm_spec_builder;

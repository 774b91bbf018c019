pub mod builder;
pub mod service;
pub mod validator;

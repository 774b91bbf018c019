pub mod api_client;
pub mod endpoint;
pub mod env_config;

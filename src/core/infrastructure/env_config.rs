//! Connection and runtime settings read from the environment.
//!
//! A `.env` file in the working directory is loaded first; variables already
//! set in the process environment take precedence over it.

use crate::core::domain::{
    error::{VsphereError, VsphereResult},
    model::{
        vsphere_config::{RateLimitConfig, VsphereConfig},
        vsphere_connection::VsphereConnection,
    },
    value_object::{VsphereHost, VspherePassword, VsphereUsername},
};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;

pub const VSPHERE_HOST: &str = "VSPHERE_HOST";
pub const VSPHERE_PORT: &str = "VSPHERE_PORT";
pub const VSPHERE_USERNAME: &str = "VSPHERE_USERNAME";
pub const VSPHERE_PASSWORD: &str = "VSPHERE_PASSWORD";
pub const VSPHERE_SECURE: &str = "VSPHERE_SECURE";
pub const VSPHERE_ACCEPT_INVALID_CERTS: &str = "VSPHERE_ACCEPT_INVALID_CERTS";
pub const VSPHERE_INSECURE_FALLBACK: &str = "VSPHERE_INSECURE_FALLBACK";
pub const VSPHERE_API_RELEASE: &str = "VSPHERE_API_RELEASE";
pub const VSPHERE_DATASTORE: &str = "VSPHERE_DATASTORE";
pub const VSPHERE_GUEST_ID: &str = "VSPHERE_GUEST_ID";
pub const VSPHERE_TASK_TIMEOUT_SECS: &str = "VSPHERE_TASK_TIMEOUT_SECS";
pub const VSPHERE_TASK_POLL_MILLIS: &str = "VSPHERE_TASK_POLL_MILLIS";
pub const VSPHERE_RATE_LIMIT_RPS: &str = "VSPHERE_RATE_LIMIT_RPS";
pub const VSPHERE_RATE_LIMIT_BURST: &str = "VSPHERE_RATE_LIMIT_BURST";

const DEFAULT_PORT: u16 = 443;

/// Everything a tool needs before opening a session.
#[derive(Debug, Clone)]
pub struct EnvConfig {
    pub connection: VsphereConnection,
    pub settings: VsphereConfig,
}

impl EnvConfig {
    /// Loads `.env` (if present) and reads the process environment.
    pub fn load() -> VsphereResult<Self> {
        if let Some(path) = load_dotenv() {
            debug!(path = %path.display(), "loaded environment file");
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the settings through `lookup`, which maps a variable name to its value.
    pub fn from_lookup<F>(lookup: F) -> VsphereResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = VsphereHost::new(required(&lookup, VSPHERE_HOST)?)?;
        let port = parsed(&lookup, VSPHERE_PORT)?.unwrap_or(DEFAULT_PORT);
        let username = VsphereUsername::new(required(&lookup, VSPHERE_USERNAME)?)?;
        let password = VspherePassword::new(required(&lookup, VSPHERE_PASSWORD)?)?;
        let secure = flag(&lookup, VSPHERE_SECURE)?.unwrap_or(true);
        let accept_invalid_certs = flag(&lookup, VSPHERE_ACCEPT_INVALID_CERTS)?.unwrap_or(false);

        let connection =
            VsphereConnection::new(host, port, username, password, secure, accept_invalid_certs)?;

        let defaults = VsphereConfig::default();
        let rate_limit = match parsed::<u32, _>(&lookup, VSPHERE_RATE_LIMIT_RPS)? {
            Some(requests_per_second) => Some(RateLimitConfig {
                requests_per_second,
                burst_size: parsed(&lookup, VSPHERE_RATE_LIMIT_BURST)?
                    .unwrap_or(requests_per_second),
            }),
            None => None,
        };

        let settings = VsphereConfig {
            api_release: non_empty(&lookup, VSPHERE_API_RELEASE).unwrap_or(defaults.api_release),
            datastore: non_empty(&lookup, VSPHERE_DATASTORE).unwrap_or(defaults.datastore),
            guest_id: non_empty(&lookup, VSPHERE_GUEST_ID).unwrap_or(defaults.guest_id),
            insecure_fallback: flag(&lookup, VSPHERE_INSECURE_FALLBACK)?
                .unwrap_or(defaults.insecure_fallback),
            task_timeout: parsed(&lookup, VSPHERE_TASK_TIMEOUT_SECS)?
                .map(Duration::from_secs)
                .unwrap_or(defaults.task_timeout),
            task_poll_interval: parsed(&lookup, VSPHERE_TASK_POLL_MILLIS)?
                .map(Duration::from_millis)
                .unwrap_or(defaults.task_poll_interval),
            rate_limit,
        };

        Ok(Self {
            connection,
            settings,
        })
    }
}

/// Loads `.env` from the working directory or its parents.
pub fn load_dotenv() -> Option<PathBuf> {
    dotenvy::dotenv().ok()
}

fn non_empty<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn required<F>(lookup: &F, key: &str) -> VsphereResult<String>
where
    F: Fn(&str) -> Option<String>,
{
    match non_empty(lookup, key) {
        Some(value) => Ok(value),
        None => Err(VsphereError::Configuration(format!("{} is not set", key))),
    }
}

fn parsed<T, F>(lookup: &F, key: &str) -> VsphereResult<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = non_empty(lookup, key) else {
        return Ok(None);
    };
    match raw.parse::<T>() {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            let message = format!("{}='{}': {}", key, raw, e);
            Err(VsphereError::Configuration(message))
        }
    }
}

fn flag<F>(lookup: &F, key: &str) -> VsphereResult<Option<bool>>
where
    F: Fn(&str) -> Option<String>,
{
    non_empty(lookup, key)
        .map(|raw| match raw.to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(VsphereError::Configuration(format!(
                "{}='{}' is not a boolean",
                key, raw
            ))),
        })
        .transpose()
}

use std::time::Duration;

/// Default `vim25` release the JSON binding is addressed with.
pub const DEFAULT_API_RELEASE: &str = "8.0.1.0";
/// Datastore checked for free space and used for the VM files.
pub const DEFAULT_DATASTORE: &str = "NFS_share";
pub const DEFAULT_GUEST_ID: &str = "ubuntu64Guest";

/// Client-side rate limit for API requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub requests_per_second: u32,
    pub burst_size: u32,
}

/// Runtime settings that are not part of the connection identity.
#[derive(Debug, Clone, PartialEq)]
pub struct VsphereConfig {
    /// Release segment of `/sdk/vim25/{release}/`.
    pub api_release: String,
    pub datastore: String,
    pub guest_id: String,
    /// Retry once without certificate checks when verification fails.
    pub insecure_fallback: bool,
    /// Upper bound for a remote task to finish.
    pub task_timeout: Duration,
    pub task_poll_interval: Duration,
    pub rate_limit: Option<RateLimitConfig>,
}

impl Default for VsphereConfig {
    fn default() -> Self {
        Self {
            api_release: DEFAULT_API_RELEASE.to_string(),
            datastore: DEFAULT_DATASTORE.to_string(),
            guest_id: DEFAULT_GUEST_ID.to_string(),
            insecure_fallback: true,
            task_timeout: Duration::from_secs(300),
            task_poll_interval: Duration::from_millis(500),
            rate_limit: None,
        }
    }
}

mod session_token;
mod vsphere_host;
mod vsphere_password;
mod vsphere_url;
mod vsphere_username;

pub use session_token::{SESSION_HEADER, SessionToken};
pub use vsphere_host::VsphereHost;
pub use vsphere_password::VspherePassword;
pub use vsphere_url::VsphereUrl;
pub use vsphere_username::VsphereUsername;

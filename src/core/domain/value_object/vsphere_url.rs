use crate::core::domain::{
    error::ValidationError,
    value_object::vsphere_host::VsphereHost,
};
use std::net::Ipv6Addr;
use url::{Host, Url};

const ALLOWED_SCHEMES: [&str; 2] = ["https", "http"];
const VIM25_PREFIX: &str = "sdk/vim25";

/// The validated base URL of a management endpoint, e.g. `https://vc.lab:443/`.
///
/// Every API path is resolved against this base, so it always ends with `/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VsphereUrl(Url);

impl VsphereUrl {
    /// Builds the base URL from its parts.
    pub fn from_parts(
        host: &VsphereHost,
        port: u16,
        secure: bool,
    ) -> Result<Self, ValidationError> {
        validate_port(port)?;
        let scheme = if secure { "https" } else { "http" };
        let host = match host.as_str().parse::<Ipv6Addr>() {
            Ok(_) => format!("[{}]", host.as_str()),
            Err(_) => host.as_str().to_string(),
        };
        Self::parse(&format!("{}://{}:{}/", scheme, host, port))
    }

    /// Parses and validates a full base URL.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let url = validate_url(raw)?;
        Ok(Self(url))
    }

    /// Returns the base URL as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Host part without IPv6 brackets.
    #[must_use]
    pub fn host_name(&self) -> String {
        match self.0.host() {
            Some(Host::Ipv6(addr)) => addr.to_string(),
            Some(host) => host.to_string(),
            None => String::new(),
        }
    }

    /// Explicit port, or the scheme's default.
    #[must_use]
    pub fn port(&self) -> u16 {
        self.0.port_or_known_default().unwrap_or(443)
    }

    /// `true` when the endpoint is reached over TLS.
    #[must_use]
    pub fn is_https(&self) -> bool {
        self.0.scheme() == "https"
    }

    /// Resolves a path of the `vim25` JSON binding for the given API release.
    ///
    /// `vim25_path("8.0.1.0", "Folder/group-d1/childEntity")` yields
    /// `<base>/sdk/vim25/8.0.1.0/Folder/group-d1/childEntity`.
    pub fn vim25_path(&self, release: &str, path: &str) -> Result<Url, ValidationError> {
        let joined = format!(
            "{}/{}/{}",
            VIM25_PREFIX,
            release.trim_matches('/'),
            path.trim_start_matches('/')
        );
        self.0
            .join(&joined)
            .map_err(|e| ValidationError::Format(format!("Invalid API path '{}': {}", path, e)))
    }
}

/// Validates a port number.
pub(crate) fn validate_port(port: u16) -> Result<(), ValidationError> {
    if port == 0 {
        return Err(ValidationError::Field {
            field: "port".to_string(),
            message: "Port cannot be 0".to_string(),
        });
    }
    Ok(())
}

/// Validates a base URL and normalises it to end with `/`.
pub(crate) fn validate_url(raw: &str) -> Result<Url, ValidationError> {
    if raw.is_empty() {
        return Err(ValidationError::Field {
            field: "url".to_string(),
            message: "URL cannot be empty".to_string(),
        });
    }
    let mut url =
        Url::parse(raw).map_err(|e| ValidationError::Format(format!("Invalid URL format: {}", e)))?;
    if !ALLOWED_SCHEMES.contains(&url.scheme()) {
        return Err(ValidationError::ConstraintViolation(format!(
            "Invalid scheme. Must be one of: {}",
            ALLOWED_SCHEMES.join(", ")
        )));
    }
    if url.host_str().is_none() {
        return Err(ValidationError::Field {
            field: "url".to_string(),
            message: "URL must contain a host".to_string(),
        });
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(ValidationError::Format(
            "Base URL cannot carry a query or fragment".to_string(),
        ));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

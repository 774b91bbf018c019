use crate::core::domain::{
    error::ValidationError,
    value_object::{VsphereHost, VspherePassword, VsphereUrl, VsphereUsername},
};

/// Where and as whom to connect.
#[derive(Debug, Clone)]
pub struct VsphereConnection {
    host: VsphereHost,
    port: u16,
    username: VsphereUsername,
    password: VspherePassword,
    accept_invalid_certs: bool,
    url: VsphereUrl,
}

impl VsphereConnection {
    /// Builds a connection, deriving the base URL from host, port and scheme.
    pub fn new(
        host: VsphereHost,
        port: u16,
        username: VsphereUsername,
        password: VspherePassword,
        secure: bool,
        accept_invalid_certs: bool,
    ) -> Result<Self, ValidationError> {
        let url = VsphereUrl::from_parts(&host, port, secure)?;
        Ok(Self {
            host,
            port,
            username,
            password,
            accept_invalid_certs,
            url,
        })
    }

    /// Builds a connection against an explicit base URL.
    pub fn with_url(
        url: VsphereUrl,
        username: VsphereUsername,
        password: VspherePassword,
        accept_invalid_certs: bool,
    ) -> Result<Self, ValidationError> {
        let host = VsphereHost::new(url.host_name())?;
        let port = url.port();
        Ok(Self {
            host,
            port,
            username,
            password,
            accept_invalid_certs,
            url,
        })
    }

    pub fn host(&self) -> &VsphereHost {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn username(&self) -> &VsphereUsername {
        &self.username
    }

    pub fn password(&self) -> &VspherePassword {
        &self.password
    }

    /// `true` when certificate verification is off from the first attempt.
    pub fn accept_invalid_certs(&self) -> bool {
        self.accept_invalid_certs
    }

    pub fn url(&self) -> &VsphereUrl {
        &self.url
    }
}

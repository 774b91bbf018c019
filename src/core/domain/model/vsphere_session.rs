use crate::core::{
    domain::error::{VsphereError, VsphereResult},
    infrastructure::api_client::ApiClient,
};
use std::fmt;
use std::sync::Arc;
use tracing::info;

const LOGOUT_PATH: &str = "SessionManager/SessionManager/Logout";

/// How the endpoint's certificate was treated when the session was opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecurityMode {
    Verified,
    Insecure,
}

impl fmt::Display for SecurityMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SecurityMode::Verified => write!(f, "verified"),
            SecurityMode::Insecure => write!(f, "insecure"),
        }
    }
}

/// An authenticated handle to the management endpoint.
#[derive(Debug, Clone)]
pub struct VsphereSession {
    client: Arc<ApiClient>,
    mode: SecurityMode,
}

impl VsphereSession {
    pub fn new(client: Arc<ApiClient>, mode: SecurityMode) -> Self {
        Self { client, mode }
    }

    pub fn mode(&self) -> SecurityMode {
        self.mode
    }

    pub fn client(&self) -> Arc<ApiClient> {
        Arc::clone(&self.client)
    }

    /// Logs out and forgets the session token.
    pub async fn close(self) -> VsphereResult<()> {
        self.client
            .post_void(LOGOUT_PATH, &serde_json::json!({}))
            .await?;
        self.client.clear_session().await;
        info!("session closed");
        Ok(())
    }
}

/// Result of opening a session.
#[derive(Debug)]
pub enum ConnectionOutcome {
    /// Logged in with certificate verification.
    Connected(VsphereSession),
    /// Logged in with certificate verification disabled.
    ConnectedInsecure(VsphereSession),
    /// Could not log in at all.
    Failed(VsphereError),
}

impl ConnectionOutcome {
    pub fn into_result(self) -> VsphereResult<VsphereSession> {
        match self {
            ConnectionOutcome::Connected(session)
            | ConnectionOutcome::ConnectedInsecure(session) => Ok(session),
            ConnectionOutcome::Failed(err) => Err(err),
        }
    }

    pub fn is_insecure(&self) -> bool {
        matches!(self, ConnectionOutcome::ConnectedInsecure(_))
    }
}

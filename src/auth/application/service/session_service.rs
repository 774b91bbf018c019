use crate::{
    auth::application::{
        request::login_request::LoginRequest, response::login_response::LoginResponse,
    },
    core::{
        domain::{
            error::{VsphereError, VsphereResult},
            model::{
                vsphere_config::VsphereConfig,
                vsphere_connection::VsphereConnection,
                vsphere_session::{ConnectionOutcome, SecurityMode, VsphereSession},
            },
            value_object::{SESSION_HEADER, SessionToken},
        },
        infrastructure::api_client::ApiClient,
    },
};
use reqwest::Method;
use std::future::Future;
use std::sync::Arc;
use tracing::{info, warn};

const LOGIN_PATH: &str = "SessionManager/SessionManager/Login";

/// Opens sessions against the management endpoint.
pub struct SessionService;

impl SessionService {
    /// Logs in, falling back once to an insecure session when the endpoint's
    /// certificate cannot be verified and the configuration allows it.
    pub async fn establish(
        connection: &VsphereConnection,
        config: &VsphereConfig,
    ) -> ConnectionOutcome {
        Self::establish_with(connection, config, |accept_invalid_certs| {
            Self::login(connection, config, accept_invalid_certs)
        })
        .await
    }

    async fn establish_with<F, Fut>(
        connection: &VsphereConnection,
        config: &VsphereConfig,
        login: F,
    ) -> ConnectionOutcome
    where
        F: Fn(bool) -> Fut,
        Fut: Future<Output = VsphereResult<ApiClient>>,
    {
        if connection.accept_invalid_certs() {
            warn!(
                host = %connection.host().as_str(),
                "certificate verification disabled by configuration"
            );
            return match login(true).await {
                Ok(client) => ConnectionOutcome::ConnectedInsecure(insecure(client)),
                Err(err) => ConnectionOutcome::Failed(err),
            };
        }

        match login(false).await {
            Ok(client) => ConnectionOutcome::Connected(verified(client)),
            Err(VsphereError::Certificate(reason)) if config.insecure_fallback => {
                warn!(
                    host = %connection.host().as_str(),
                    %reason,
                    "invalid certificate, retrying without certificate verification"
                );
                match login(true).await {
                    Ok(client) => ConnectionOutcome::ConnectedInsecure(insecure(client)),
                    Err(err) => ConnectionOutcome::Failed(err),
                }
            }
            Err(err) => ConnectionOutcome::Failed(err),
        }
    }

    async fn login(
        connection: &VsphereConnection,
        config: &VsphereConfig,
        accept_invalid_certs: bool,
    ) -> VsphereResult<ApiClient> {
        let client = ApiClient::new(connection.url().clone(), config, accept_invalid_certs)?;
        let request = LoginRequest {
            user_name: connection.username().as_str().to_string(),
            password: connection.password().as_str().to_string(),
        };
        let response = client.send(Method::POST, LOGIN_PATH, Some(&request)).await?;

        let token = response
            .headers()
            .get(SESSION_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
            .ok_or_else(|| {
                VsphereError::Authentication("Login response carried no session token".to_string())
            })?;
        let token = SessionToken::new(token)?;

        match response.json::<LoginResponse>().await {
            Ok(user) => info!(user = %user.user_name, full_name = ?user.full_name, "logged in"),
            Err(_) => info!(user = %connection.username().as_str(), "logged in"),
        }

        client.set_session(token).await;
        Ok(client)
    }
}

fn verified(client: ApiClient) -> VsphereSession {
    VsphereSession::new(Arc::new(client), SecurityMode::Verified)
}

fn insecure(client: ApiClient) -> VsphereSession {
    VsphereSession::new(Arc::new(client), SecurityMode::Insecure)
}

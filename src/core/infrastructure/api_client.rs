//! Internal HTTP client for the `vim25` JSON binding.

use crate::core::domain::{
    error::{VsphereError, VsphereResult},
    model::vsphere_config::VsphereConfig,
    value_object::{SESSION_HEADER, SessionToken, VsphereUrl},
};
use governor::{DefaultDirectRateLimiter, Quota};
use reqwest::{
    Client, Method, StatusCode,
    header::{ACCEPT, HeaderMap, HeaderValue},
};
use std::error::Error as StdError;
use std::num::NonZeroU32;
use tokio::sync::RwLock;
use tracing::debug;

/// Fault types the endpoint uses for rejected or expired credentials.
const AUTH_FAULTS: [&str; 3] = ["InvalidLogin", "NotAuthenticated", "NoPermission"];

/// Internal HTTP client that calls the management endpoint.
///
/// Once a session token is set, it is sent in the `vmware-api-session-id`
/// header on every request. Requests are issued one at a time by the callers;
/// an optional rate limiter spaces them out.
#[derive(Debug)]
pub struct ApiClient {
    http_client: Client,
    base_url: VsphereUrl,
    api_release: String,
    session: RwLock<Option<SessionToken>>,
    rate_limiter: Option<DefaultDirectRateLimiter>,
}

impl ApiClient {
    /// Creates a new `ApiClient`. The client starts without a session.
    ///
    /// # Errors
    /// Returns `VsphereError::Connection` if the HTTP client cannot be built and
    /// `VsphereError::Configuration` for a zero rate limit.
    pub fn new(
        base_url: VsphereUrl,
        config: &VsphereConfig,
        accept_invalid_certs: bool,
    ) -> VsphereResult<Self> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http_client = Client::builder()
            .default_headers(default_headers)
            .danger_accept_invalid_certs(accept_invalid_certs)
            .build()
            .map_err(|e| VsphereError::Connection(e.to_string()))?;

        let rate_limiter = match config.rate_limit {
            Some(rl) => {
                let per_second = NonZeroU32::new(rl.requests_per_second).ok_or_else(|| {
                    VsphereError::Configuration(
                        "rate limit must be at least 1 request per second".to_string(),
                    )
                })?;
                let burst = NonZeroU32::new(rl.burst_size).ok_or_else(|| {
                    VsphereError::Configuration("rate limit burst must be at least 1".to_string())
                })?;
                Some(DefaultDirectRateLimiter::direct(
                    Quota::per_second(per_second).allow_burst(burst),
                ))
            }
            None => None,
        };

        Ok(Self {
            http_client,
            base_url,
            api_release: config.api_release.clone(),
            session: RwLock::new(None),
            rate_limiter,
        })
    }

    /// Sets the session token (used after a successful login).
    pub async fn set_session(&self, token: SessionToken) {
        let mut lock = self.session.write().await;
        *lock = Some(token);
    }

    /// Forgets the session token (used after logout).
    pub async fn clear_session(&self) {
        let mut lock = self.session.write().await;
        *lock = None;
    }

    pub async fn session(&self) -> Option<SessionToken> {
        self.session.read().await.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.session.read().await.is_some()
    }

    /// Reads a property, e.g. `get("Folder/group-d1/childEntity")`.
    pub async fn get<T>(&self, path: &str) -> VsphereResult<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let response = self.send(Method::GET, path, None::<&()>).await?;
        parse_json(response).await
    }

    /// Invokes a method that returns a value, e.g. `CreateVM_Task` returning its task.
    pub async fn post<B, T>(&self, path: &str, body: &B) -> VsphereResult<T>
    where
        B: serde::Serialize,
        T: serde::de::DeserializeOwned,
    {
        let response = self.send(Method::POST, path, Some(body)).await?;
        parse_json(response).await
    }

    /// Invokes a method whose result is void, e.g. `AddPortGroup`.
    pub async fn post_void<B>(&self, path: &str, body: &B) -> VsphereResult<()>
    where
        B: serde::Serialize,
    {
        self.send(Method::POST, path, Some(body)).await?;
        Ok(())
    }

    /// Sends one request and maps transport and status failures to `VsphereError`.
    ///
    /// The returned response always has a success status.
    pub(crate) async fn send<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> VsphereResult<reqwest::Response>
    where
        B: serde::Serialize,
    {
        if let Some(limiter) = &self.rate_limiter {
            limiter.until_ready().await;
        }

        let url = self.base_url.vim25_path(&self.api_release, path)?;
        debug!(%method, %url, "sending request");

        let mut req_builder = self.http_client.request(method, url);
        {
            let session = self.session.read().await;
            if let Some(token) = session.as_ref() {
                req_builder = req_builder.header(SESSION_HEADER, token.as_str());
            }
        }
        if let Some(body) = body {
            req_builder = req_builder.json(body);
        }

        let response = req_builder.send().await.map_err(|e| transport_error(&e))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let text = response
            .text()
            .await
            .unwrap_or_else(|_| "unknown".to_string());
        Err(status_error(status, &text))
    }
}

async fn parse_json<T>(response: reqwest::Response) -> VsphereResult<T>
where
    T: serde::de::DeserializeOwned,
{
    response
        .json::<T>()
        .await
        .map_err(|e| VsphereError::Connection(format!("Failed to parse response: {}", e)))
}

/// Classifies a failed request: certificate problems are told apart from other
/// connection failures because they alone allow the insecure retry.
fn transport_error(error: &reqwest::Error) -> VsphereError {
    if mentions_certificate(error) {
        VsphereError::Certificate(error_chain(error))
    } else {
        VsphereError::Connection(format!("HTTP request failed: {}", error_chain(error)))
    }
}

/// Walks the source chain looking for a TLS certificate verification failure.
pub(crate) fn mentions_certificate(error: &(dyn StdError + 'static)) -> bool {
    let mut current: Option<&(dyn StdError + 'static)> = Some(error);
    while let Some(err) = current {
        let message = err.to_string().to_lowercase();
        if message.contains("certificate")
            || message.contains("unknownissuer")
            || message.contains("self signed")
            || message.contains("self-signed")
        {
            return true;
        }
        current = err.source();
    }
    false
}

fn error_chain(error: &(dyn StdError + 'static)) -> String {
    let mut parts = vec![error.to_string()];
    let mut current = error.source();
    while let Some(err) = current {
        parts.push(err.to_string());
        current = err.source();
    }
    parts.join(": ")
}

/// Maps a non-success response to an error, reading the fault body when present.
fn status_error(status: StatusCode, body: &str) -> VsphereError {
    let fault: Option<serde_json::Value> = serde_json::from_str(body).ok();
    let fault_type = fault
        .as_ref()
        .and_then(|f| f.get("_typeName"))
        .and_then(|t| t.as_str())
        .map(str::to_string);
    let message = fault
        .as_ref()
        .and_then(|f| {
            f.get("localizedMessage")
                .or_else(|| f.get("message"))
                .and_then(|m| m.as_str())
        })
        .map(str::to_string)
        .or_else(|| fault_type.clone())
        .unwrap_or_else(|| body.to_string());

    let is_auth_fault = fault_type
        .as_deref()
        .is_some_and(|t| AUTH_FAULTS.contains(&t));
    if status == StatusCode::UNAUTHORIZED || is_auth_fault {
        return VsphereError::Authentication(message);
    }
    VsphereError::Api {
        status: status.as_u16(),
        message,
    }
}

use serde::Deserialize;

/// `UserSession` returned by `SessionManager.Login`.
///
/// The session token itself travels in the response header, not in this body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub user_name: String,
    #[serde(default)]
    pub full_name: Option<String>,
}

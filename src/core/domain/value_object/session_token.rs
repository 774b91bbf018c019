use crate::core::domain::error::ValidationError;
use std::fmt;
use std::time::SystemTime;

/// Name of the header carrying the session token on every request.
pub const SESSION_HEADER: &str = "vmware-api-session-id";

/// A vSphere API session token, as returned in the `vmware-api-session-id` header.
#[derive(Clone)]
pub struct SessionToken {
    value: String,
    created_at: SystemTime,
}

impl SessionToken {
    /// Validates and wraps a token.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        validate_session_token(&value)?;
        Ok(Self::new_unchecked(value))
    }

    /// Creates a new token without validation.
    pub(crate) fn new_unchecked(value: String) -> Self {
        Self {
            value,
            created_at: SystemTime::now(),
        }
    }

    /// Returns the token value as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Returns the creation time.
    #[must_use]
    pub fn created_at(&self) -> SystemTime {
        self.created_at
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionToken")
            .field("value", &"***")
            .field("created_at", &self.created_at)
            .finish()
    }
}

/// Validates the format of a session token: non-empty, printable ASCII, no whitespace.
pub(crate) fn validate_session_token(token: &str) -> Result<(), ValidationError> {
    if token.is_empty() {
        return Err(ValidationError::Field {
            field: "session_token".to_string(),
            message: "Session token cannot be empty".to_string(),
        });
    }
    if !token.chars().all(|c| c.is_ascii_graphic()) {
        return Err(ValidationError::Format(
            "Session token must be printable ASCII without whitespace".to_string(),
        ));
    }
    Ok(())
}

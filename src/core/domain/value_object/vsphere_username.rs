use crate::core::domain::error::ValidationError;

/// A validated vSphere login name, e.g. `administrator@vsphere.local` or `LAB\ops`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VsphereUsername(String);

impl VsphereUsername {
    /// Validates and wraps a login name.
    pub fn new(username: impl Into<String>) -> Result<Self, ValidationError> {
        let username = username.into();
        validate_username(&username)?;
        Ok(Self(username))
    }

    /// Returns the username as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Validates a login name.
///
/// SSO accounts are `user@domain`, Windows accounts `DOMAIN\user`; local
/// ESXi accounts are bare names. At most one domain separator is allowed.
pub(crate) fn validate_username(username: &str) -> Result<(), ValidationError> {
    if username.is_empty() {
        return Err(ValidationError::Field {
            field: "username".to_string(),
            message: "Username cannot be empty".to_string(),
        });
    }
    if username.len() > 256 {
        return Err(ValidationError::Format(format!(
            "Username cannot exceed 256 characters (got {})",
            username.len()
        )));
    }
    let allowed = |c: char| {
        c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '@' | '\\')
    };
    if !username.chars().all(allowed) {
        return Err(ValidationError::Format(
            "Username contains invalid characters. Allowed: alphanumeric, -, _, ., @, \\"
                .to_string(),
        ));
    }
    let separators = username.chars().filter(|c| *c == '@' || *c == '\\').count();
    if separators > 1 {
        return Err(ValidationError::Format(
            "Username can contain at most one domain separator".to_string(),
        ));
    }
    if username.starts_with('@') || username.ends_with('@') || username.ends_with('\\') {
        return Err(ValidationError::Format(
            "Username has an empty user or domain part".to_string(),
        ));
    }
    Ok(())
}

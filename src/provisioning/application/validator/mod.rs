pub mod switch_arguments;
pub mod vm_arguments;

use crate::core::domain::error::ValidationError;

/// Parses a strictly positive decimal integer typed by the user.
///
/// Only ASCII digits are accepted, so signs and whitespace are rejected as
/// non-numeric.
pub(crate) fn parse_positive(field: &str, label: &str, raw: &str) -> Result<u64, ValidationError> {
    let value = parse_number(field, label, raw)?;
    if value == 0 {
        return Err(ValidationError::Field {
            field: field.to_string(),
            message: format!("{} must be greater than 0", label),
        });
    }
    Ok(value)
}

/// Parses a non-negative decimal integer typed by the user.
pub(crate) fn parse_number(field: &str, label: &str, raw: &str) -> Result<u64, ValidationError> {
    if raw.is_empty() || !raw.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::Field {
            field: field.to_string(),
            message: format!("{} must be numerical", label),
        });
    }
    raw.parse::<u64>().map_err(|_| {
        ValidationError::ConstraintViolation(format!("{} '{}' is too large", label, raw))
    })
}

pub(crate) fn require_name(field: &str, raw: &str) -> Result<String, ValidationError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(ValidationError::Field {
            field: field.to_string(),
            message: "cannot be empty".to_string(),
        });
    }
    Ok(name.to_string())
}

//! Shared field checks for the collection front-ends.

use crate::ports::{PortError, PortResult};

/// Trims `value` and rejects it when nothing is left.
pub(crate) fn required(field: &str, value: &str) -> PortResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(PortError::Validation(format!("{} is required", field)));
    }
    Ok(trimmed.to_string())
}

/// Like `required`, for fields that arrive as `Option`.
pub(crate) fn required_opt<T>(field: &str, value: Option<T>) -> PortResult<T> {
    value.ok_or_else(|| PortError::Validation(format!("{} is required", field)))
}

pub(crate) fn max_chars(field: &str, value: &str, limit: usize) -> PortResult<()> {
    if value.chars().count() > limit {
        return Err(PortError::Validation(format!(
            "{} must be at most {} characters",
            field, limit
        )));
    }
    Ok(())
}

/// Trims an optional field, mapping blank to `None`.
pub(crate) fn optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

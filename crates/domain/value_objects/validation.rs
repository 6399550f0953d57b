use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    Missing(&'static str),

    #[error("{0}")]
    Invalid(String),
}

pub fn required<T>(value: Option<T>, field: &'static str) -> Result<T, ValidationError> {
    value.ok_or(ValidationError::Missing(field))
}

/// Same as [`required`] but also rejects blank strings.
pub fn required_text(value: Option<String>, field: &'static str) -> Result<String, ValidationError> {
    match value {
        Some(text) if !text.trim().is_empty() => Ok(text.trim().to_string()),
        _ => Err(ValidationError::Missing(field)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_text_counts_as_missing() {
        assert_eq!(
            required_text(Some("   ".to_string()), "content"),
            Err(ValidationError::Missing("content"))
        );
        assert_eq!(required_text(Some(" hi ".to_string()), "content").unwrap(), "hi");
    }

    #[test]
    fn missing_message_names_the_field() {
        let err = required::<i64>(None, "amountPaid").unwrap_err();
        assert_eq!(err.to_string(), "amountPaid is required");
    }
}

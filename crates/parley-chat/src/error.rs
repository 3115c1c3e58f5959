//! Error types for parley-chat.

use std::fmt;

use uuid::Uuid;

/// Result type alias for conversation operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building messages or managing a conversation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A field violates its closed-form constraint.
    ///
    /// Raised at construction time: the caller never receives a partially
    /// built value.
    #[error("validation error: {field}: {message}")]
    Validation {
        /// Name of the offending field.
        field: &'static str,
        /// What is wrong with it.
        message: String,
    },

    /// A message was offered to a conversation that has already ended.
    #[error("conversation {0} has ended, no more messages allowed")]
    ConversationEnded(Uuid),
}

impl Error {
    /// Creates a validation error for the given field.
    pub fn validation(field: &'static str, message: impl fmt::Display) -> Self {
        Self::Validation {
            field,
            message: message.to_string(),
        }
    }

    /// Creates a conversation-ended error.
    pub fn conversation_ended(conversation_id: Uuid) -> Self {
        Self::ConversationEnded(conversation_id)
    }

    /// Returns true if this is a validation error.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// Returns true if this error was raised by an ended conversation.
    pub fn is_conversation_ended(&self) -> bool {
        matches!(self, Self::ConversationEnded(_))
    }

    /// Returns the offending field for validation errors.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::Validation { field, .. } => Some(field),
            Self::ConversationEnded(_) => None,
        }
    }
}

impl From<derive_builder::UninitializedFieldError> for Error {
    fn from(err: derive_builder::UninitializedFieldError) -> Self {
        Self::validation(err.field_name(), "field is required")
    }
}

/// Checks that `value` lies in the closed range `[min, max]`.
///
/// NaN is rejected.
pub(crate) fn check_range(field: &'static str, value: f32, min: f32, max: f32) -> Result<()> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(Error::validation(
            field,
            format!("{value} is outside [{min}, {max}]"),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_names_field() {
        let err = Error::validation("role", "unknown role 'moderator'");

        assert!(err.is_validation());
        assert!(!err.is_conversation_ended());
        assert_eq!(err.field(), Some("role"));
        assert_eq!(
            err.to_string(),
            "validation error: role: unknown role 'moderator'"
        );
    }

    #[test]
    fn conversation_ended_has_no_field() {
        let err = Error::conversation_ended(Uuid::nil());

        assert!(err.is_conversation_ended());
        assert_eq!(err.field(), None);
    }

    #[test]
    fn uninitialized_builder_field_becomes_validation() {
        let err: Error = derive_builder::UninitializedFieldError::new("model").into();

        assert_eq!(err.field(), Some("model"));
    }

    #[test]
    fn range_check_is_inclusive() {
        assert!(check_range("temperature", 0.0, 0.0, 2.0).is_ok());
        assert!(check_range("temperature", 2.0, 0.0, 2.0).is_ok());
        assert!(check_range("temperature", 2.1, 0.0, 2.0).is_err());
        assert!(check_range("temperature", f32::NAN, 0.0, 2.0).is_err());
    }
}

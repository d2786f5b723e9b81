//! Error types for the editor
//!
//! Nothing here is fatal: every failure leaves the editor usable and the
//! operator free to retry.

use crate::state_machine::EditPhase;
use qrc_client::ClientError;
use qrc_draft::FieldError;

/// Illegal phase change
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    /// `to` is not reachable from `from`
    #[error("illegal phase transition: {from} -> {to}")]
    Illegal {
        /// Phase before
        from: EditPhase,
        /// Requested phase
        to: EditPhase,
    },
}

/// Why a submit did not persist the draft
#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    /// Local validation failed; nothing was sent
    #[error("draft is invalid: {}", describe(.0))]
    Validation(Vec<FieldError>),

    /// Another submit is still in flight
    #[error("a save is already in progress")]
    AlreadySubmitting,

    /// The API call failed; the draft is retained
    #[error("save failed: {0}")]
    Transport(#[from] ClientError),

    /// A create succeeded but the server assigned no id
    #[error("server response carries no id")]
    MissingId,

    /// The editor went away before the response arrived
    #[error("editor closed before the response arrived")]
    Unmounted,

    /// Phase bookkeeping rejected the submit
    #[error(transparent)]
    Transition(#[from] TransitionError),
}

impl SaveError {
    /// Field errors, if this is a validation failure
    #[must_use]
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            Self::Validation(errors) => errors,
            _ => &[],
        }
    }

    /// Whether submitting again may succeed without edits
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(err) => err.is_retryable(),
            Self::AlreadySubmitting => true,
            Self::Validation(_) | Self::MissingId | Self::Unmounted | Self::Transition(_) => false,
        }
    }
}

fn describe(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Why a delete did not happen
#[derive(Debug, thiserror::Error)]
pub enum DeleteError {
    /// The code was never saved
    #[error("qr code has no id")]
    NotPersisted,

    /// The API call failed; nothing changed
    #[error("delete failed: {0}")]
    Transport(#[from] ClientError),

    /// The editor was already closed
    #[error("editor is closed")]
    Unmounted,
}

/// Rejected field-level interactions
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditError {
    /// Discount catalog has not loaded or failed to load
    #[error("discount selection is unavailable")]
    DiscountsUnavailable,

    /// Discard is disabled while a save is in flight
    #[error("cannot discard while saving")]
    Submitting,
}

/// Invalid editor configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("failed to read {path}: {source}")]
    Io {
        /// File that was read
        path: String,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Config text is not valid TOML for [`crate::EditorConfig`]
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A URL setting does not parse or cannot carry a path
    #[error("invalid url for {field}: {reason}")]
    InvalidUrl {
        /// Setting name
        field: &'static str,
        /// Parse failure
        reason: String,
    },

    /// A numeric setting is out of range
    #[error("invalid value for {field}: {reason}")]
    Invalid {
        /// Setting name
        field: &'static str,
        /// Constraint violated
        reason: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use qrc_draft::FieldName;

    #[test]
    fn validation_lists_fields() {
        let err = SaveError::Validation(vec![
            FieldError {
                field: FieldName::Title,
                message: "Please name your QR code".to_string(),
            },
            FieldError {
                field: FieldName::ProductId,
                message: "Please select a product".to_string(),
            },
        ]);
        assert_eq!(
            err.to_string(),
            "draft is invalid: title: Please name your QR code, productId: Please select a product"
        );
        assert_eq!(err.field_errors().len(), 2);
        assert!(!err.is_retryable());
    }

    #[test]
    fn transport_retry_follows_client() {
        let err = SaveError::from(ClientError::Status {
            status: 503,
            message: String::new(),
        });
        assert!(err.is_retryable());
        assert!(err.field_errors().is_empty());
    }
}

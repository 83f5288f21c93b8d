// ── Core error types ──
//
// User-facing errors from taskye-core. Consumers never see raw HTTP or JSON
// failures: `From<taskye_api::Error>` folds provider errors into the
// assistant's failure taxonomy.

use thiserror::Error;

/// Failures surfaced by the AI assistant (ticket drafting and text review).
///
/// Response-shape problems in the drafting path never appear here: they are
/// absorbed by the deterministic fallback draft.
#[derive(Debug, Error)]
pub enum AssistError {
    /// The call was never attempted: nothing to send.
    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    #[error("No API key configured for the generative provider")]
    MissingCredential,

    #[error("Provider quota exceeded: {message}")]
    QuotaExceeded { message: String },

    #[error("No model supporting content generation is available")]
    NoUsableModel,

    #[error("The provider returned no generated text")]
    EmptyResponse,

    #[error("Provider request failed: {message}")]
    Transport {
        message: String,
        status: Option<u16>,
    },
}

impl AssistError {
    /// Whether the caller may offer the deterministic fallback draft instead.
    pub fn allows_fallback(&self) -> bool {
        matches!(self, Self::EmptyResponse | Self::Transport { .. })
    }

    /// Whether the provider rejected the credential outright.
    pub fn is_auth(&self) -> bool {
        match self {
            Self::MissingCredential => true,
            Self::Transport { status, .. } => matches!(status, Some(401 | 403)),
            _ => false,
        }
    }
}

impl From<taskye_api::Error> for AssistError {
    fn from(err: taskye_api::Error) -> Self {
        if err.is_quota() {
            let message = match err {
                taskye_api::Error::Provider { message, .. } => message,
                other => other.to_string(),
            };
            return Self::QuotaExceeded { message };
        }

        match err {
            taskye_api::Error::MissingApiKey => Self::MissingCredential,
            taskye_api::Error::Provider {
                status, message, ..
            } => Self::Transport {
                message,
                status: Some(status),
            },
            other => Self::Transport {
                status: other.status(),
                message: other.to_string(),
            },
        }
    }
}

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Lookup errors ────────────────────────────────────────────────
    #[error("Ticket not found: {id}")]
    TicketNotFound { id: String },

    #[error("Comment {comment_id} not found on ticket {ticket_id}")]
    CommentNotFound {
        ticket_id: String,
        comment_id: String,
    },

    #[error("Inventory item not found: {id}")]
    InventoryItemNotFound { id: String },

    // ── Session errors ───────────────────────────────────────────────
    #[error("Invalid email or password")]
    InvalidCredentials,

    // ── Input errors ─────────────────────────────────────────────────
    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    #[error("Attachment rejected: {message}")]
    Attachment { message: String },

    // ── Persistence ──────────────────────────────────────────────────
    #[error("Storage error for '{key}': {message}")]
    Storage { key: String, message: String },

    // ── Assistant ────────────────────────────────────────────────────
    #[error(transparent)]
    Assist(#[from] AssistError),
}

impl CoreError {
    pub(crate) fn storage(key: &str, err: impl std::fmt::Display) -> Self {
        Self::Storage {
            key: key.to_owned(),
            message: err.to_string(),
        }
    }

    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::ValidationFailed {
            message: message.into(),
        }
    }

    /// Returns `true` for any of the not-found variants.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::TicketNotFound { .. }
                | Self::CommentNotFound { .. }
                | Self::InventoryItemNotFound { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quota_message_maps_to_quota_exceeded() {
        let err = AssistError::from(taskye_api::Error::Provider {
            status: 400,
            code: None,
            message: "Quota exceeded for metric".into(),
        });
        assert!(matches!(err, AssistError::QuotaExceeded { .. }));
        assert!(!err.allows_fallback());
    }

    #[test]
    fn other_provider_errors_are_transport() {
        let err = AssistError::from(taskye_api::Error::Provider {
            status: 500,
            code: Some(500),
            message: "internal".into(),
        });
        assert!(matches!(
            err,
            AssistError::Transport {
                status: Some(500),
                ..
            }
        ));
        assert!(err.allows_fallback());
    }

    #[test]
    fn missing_key_maps_to_missing_credential() {
        let err = AssistError::from(taskye_api::Error::MissingApiKey);
        assert!(matches!(err, AssistError::MissingCredential));
        assert!(err.is_auth());
    }
}

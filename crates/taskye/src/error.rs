//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError`, `AssistError` and `ConfigError` into user-facing errors
//! with actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use taskye_config::ConfigError;
use taskye_core::{AssistError, CoreError};

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const QUOTA: i32 = 9;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Session ──────────────────────────────────────────────────────
    #[error("Not signed in")]
    #[diagnostic(
        code(taskye::not_logged_in),
        help("Run: taskye login --email <EMAIL>")
    )]
    NotLoggedIn,

    #[error("Invalid email or password")]
    #[diagnostic(
        code(taskye::invalid_credentials),
        help("Check the account details and try again.")
    )]
    InvalidCredentials,

    // ── Provider ─────────────────────────────────────────────────────
    #[error("No API key configured for the generative provider")]
    #[diagnostic(
        code(taskye::missing_api_key),
        help(
            "Store one with: taskye config set-key\n\
             Or set the TASKYE_API_KEY environment variable."
        )
    )]
    MissingApiKey,

    #[error("The provider rejected the API key: {message}")]
    #[diagnostic(
        code(taskye::provider_auth),
        help("Check that the key is valid and enabled for the Generative Language API.")
    )]
    ProviderAuth { message: String },

    #[error("Provider quota exceeded")]
    #[diagnostic(
        code(taskye::quota),
        help("{message}\nWait for the quota window to reset, or pin another model with --model.")
    )]
    QuotaExceeded { message: String },

    #[error("No model supporting content generation is available")]
    #[diagnostic(
        code(taskye::no_model),
        help("Run: taskye models list\nOr pin a model with --model.")
    )]
    NoUsableModel,

    #[error("The provider returned no generated text")]
    #[diagnostic(code(taskye::empty_response))]
    EmptyResponse,

    #[error("Could not reach the generative provider: {message}")]
    #[diagnostic(
        code(taskye::connection_failed),
        help("Check your network connection and provider.base_url.")
    )]
    ConnectionFailed { message: String },

    #[error("Provider request failed (HTTP {status}): {message}")]
    #[diagnostic(code(taskye::provider_error))]
    ProviderError { status: u16, message: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(taskye::not_found),
        help("Run: taskye {list_command} to see available {resource_type}s")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(taskye::validation))]
    Validation { field: String, reason: String },

    #[error("Attachment rejected: {reason}")]
    #[diagnostic(
        code(taskye::attachment),
        help("Attach a JPEG, PNG, GIF, WebP or PDF file of at most 10 MiB.")
    )]
    Attachment { reason: String },

    // ── Storage & configuration ──────────────────────────────────────
    #[error("Could not persist '{key}': {message}")]
    #[diagnostic(
        code(taskye::storage),
        help("Check that the data directory is writable (--data-dir / TASKYE_DATA_DIR).")
    )]
    Storage { key: String, message: String },

    #[error(transparent)]
    #[diagnostic(
        code(taskye::config),
        help("Inspect the file with: taskye config path")
    )]
    Config(#[from] ConfigError),

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Operation '{action}' requires confirmation")]
    #[diagnostic(
        code(taskye::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render output: {0}")]
    #[diagnostic(code(taskye::render))]
    Render(String),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NotLoggedIn
            | Self::InvalidCredentials
            | Self::MissingApiKey
            | Self::ProviderAuth { .. } => exit_code::AUTH,
            Self::QuotaExceeded { .. } => exit_code::QUOTA,
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. }
            | Self::Attachment { .. }
            | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── AssistError → CliError mapping ───────────────────────────────────

impl From<AssistError> for CliError {
    fn from(err: AssistError) -> Self {
        if err.is_auth() {
            return match err {
                AssistError::Transport { message, .. } => Self::ProviderAuth { message },
                _ => Self::MissingApiKey,
            };
        }
        match err {
            AssistError::InvalidRequest { message } => Self::Validation {
                field: "message".into(),
                reason: message,
            },
            AssistError::MissingCredential => Self::MissingApiKey,
            AssistError::QuotaExceeded { message } => Self::QuotaExceeded { message },
            AssistError::NoUsableModel => Self::NoUsableModel,
            AssistError::EmptyResponse => Self::EmptyResponse,
            AssistError::Transport {
                message,
                status: None,
            } => Self::ConnectionFailed { message },
            AssistError::Transport {
                message,
                status: Some(status),
            } => Self::ProviderError { status, message },
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::TicketNotFound { id } => Self::NotFound {
                resource_type: "ticket".into(),
                identifier: id,
                list_command: "tickets list".into(),
            },

            CoreError::CommentNotFound {
                ticket_id,
                comment_id,
            } => Self::NotFound {
                resource_type: "comment".into(),
                identifier: comment_id,
                list_command: format!("tickets show {ticket_id}"),
            },

            CoreError::InventoryItemNotFound { id } => Self::NotFound {
                resource_type: "asset".into(),
                identifier: id,
                list_command: "inventory list".into(),
            },

            CoreError::InvalidCredentials => Self::InvalidCredentials,

            CoreError::ValidationFailed { message } => Self::Validation {
                field: "input".into(),
                reason: message,
            },

            CoreError::Attachment { message } => Self::Attachment { reason: message },

            CoreError::Storage { key, message } => Self::Storage { key, message },

            CoreError::Assist(inner) => inner.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assist_errors_map_to_documented_exit_codes() {
        let cases = [
            (AssistError::MissingCredential, exit_code::AUTH),
            (
                AssistError::QuotaExceeded {
                    message: "exhausted".into(),
                },
                exit_code::QUOTA,
            ),
            (
                AssistError::Transport {
                    message: "dns".into(),
                    status: None,
                },
                exit_code::CONNECTION,
            ),
            (
                AssistError::Transport {
                    message: "denied".into(),
                    status: Some(403),
                },
                exit_code::AUTH,
            ),
            (
                AssistError::Transport {
                    message: "boom".into(),
                    status: Some(500),
                },
                exit_code::GENERAL,
            ),
            (AssistError::NoUsableModel, exit_code::GENERAL),
        ];
        for (err, code) in cases {
            let label = err.to_string();
            assert_eq!(CliError::from(err).exit_code(), code, "{label}");
        }
    }

    #[test]
    fn not_found_maps_to_four() {
        let err = CliError::from(CoreError::TicketNotFound { id: "99".into() });
        assert_eq!(err.exit_code(), exit_code::NOT_FOUND);
        assert_eq!(err.to_string(), "ticket '99' not found");
    }
}

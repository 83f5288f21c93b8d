use thiserror::Error;

/// Top-level error type for the `taskye-api` crate.
///
/// Covers every failure mode of the provider surface: credentials,
/// transport, structured provider errors, and response decoding.
/// `taskye-core` maps these into the assistant's failure taxonomy.
#[derive(Debug, Error)]
pub enum Error {
    // ── Credentials ─────────────────────────────────────────────────
    /// No API key was supplied to the client.
    #[error("No API key configured for the provider")]
    MissingApiKey,

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The underlying `reqwest::Client` could not be built.
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),

    // ── Provider ────────────────────────────────────────────────────
    /// Structured error from the provider's `{ error: { code, message } }` envelope.
    #[error("Provider error (HTTP {status}): {message}")]
    Provider {
        status: u16,
        code: Option<i64>,
        message: String,
    },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` when the provider signalled an exhausted quota:
    /// HTTP 429, an envelope code of 429, or a message mentioning "quota".
    pub fn is_quota(&self) -> bool {
        match self {
            Self::Provider {
                status,
                code,
                message,
            } => {
                *status == 429
                    || *code == Some(429)
                    || message.to_lowercase().contains("quota")
            }
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::TOO_MANY_REQUESTS),
            _ => false,
        }
    }

    /// Returns `true` if the provider rejected the API key.
    pub fn is_auth(&self) -> bool {
        match self {
            Self::MissingApiKey => true,
            Self::Provider { status, .. } => matches!(status, 401 | 403),
            _ => false,
        }
    }

    /// HTTP status associated with this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Provider { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

// ── Runtime assistant configuration ──
//
// Describes how to reach the generative provider. Carries the credential but
// never touches disk: the CLI resolves it and hands it in.

use std::time::Duration;

use secrecy::SecretString;
use taskye_api::{DEFAULT_BASE_URL, TransportConfig};

/// Model families tried first when no model is pinned, in order.
pub const DEFAULT_PREFERRED_MODELS: [&str; 3] = ["1.5-flash", "2.0-flash", "flash"];

#[derive(Debug, Clone)]
pub struct AssistantConfig {
    pub base_url: String,
    /// `None` surfaces as `AssistError::MissingCredential` at invocation.
    pub api_key: Option<SecretString>,
    /// Pinned model id; skips model listing.
    pub model: Option<String>,
    /// No timeout when unset.
    pub timeout: Option<Duration>,
    pub preferred_models: Vec<String>,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            api_key: None,
            model: None,
            timeout: None,
            preferred_models: DEFAULT_PREFERRED_MODELS
                .iter()
                .map(|s| (*s).to_owned())
                .collect(),
        }
    }
}

impl AssistantConfig {
    pub fn with_api_key(mut self, key: SecretString) -> Self {
        self.api_key = Some(key);
        self
    }

    pub(crate) fn transport(&self) -> TransportConfig {
        let transport = TransportConfig::default();
        match self.timeout {
            Some(timeout) => transport.with_timeout(timeout),
            None => transport,
        }
    }
}

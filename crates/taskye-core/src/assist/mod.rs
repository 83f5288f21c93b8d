// ── AI-assisted ticket drafting ──
//
// Per invocation:
//
//   Idle → SelectingModel → Requesting → Parsing → Done
//                                      ↘ Fallback → Done
//   any failure surfaced to the caller → Failed
//
// At most one listing call (skipped when a model is pinned) and exactly one
// generation call. No retries; the store is never touched here.

pub mod extract;
pub mod fallback;
pub mod prompt;
pub mod review;
pub mod selection;

use secrecy::ExposeSecret;
use serde::Serialize;
use strum::Display;
use taskye_api::{GenerateRequest, GenerativeClient, Part};
use tracing::{debug, warn};

use crate::attachment::Attachment;
use crate::config::AssistantConfig;
use crate::error::AssistError;
use crate::model::TicketDraft;

pub use extract::parse_draft;
pub use fallback::{fallback_draft, fallback_title};
pub use review::{AnalysisResult, TextReviewer};
pub use selection::{ModelOption, Tier, normalize_model_id, rank, select};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum Stage {
    Idle,
    SelectingModel,
    Requesting,
    Parsing,
    Fallback,
    Failed,
    Done,
}

/// Input for one drafting call.
#[derive(Debug, Clone, Default)]
pub struct DraftRequest {
    /// Free text; may be empty when an attachment is present.
    pub message: String,
    pub attachment: Option<Attachment>,
    /// Overrides the configured model; skips listing.
    pub model: Option<String>,
}

impl DraftRequest {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }

    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachment = Some(attachment);
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// The text the draft is about: the raw message, or a fixed
    /// instruction when only an attachment was given.
    pub fn effective_message(&self) -> &str {
        if self.message.trim().is_empty() && self.attachment.is_some() {
            prompt::ATTACHMENT_ONLY_MESSAGE
        } else {
            &self.message
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
pub enum DraftSource {
    Model,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Extraction {
    pub draft: TicketDraft,
    /// Model id used for generation, when one was resolved.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    pub source: DraftSource,
}

/// Build an authorized provider client from `config`.
pub(crate) fn provider_client(config: &AssistantConfig) -> Result<GenerativeClient, AssistError> {
    let key = config
        .api_key
        .as_ref()
        .filter(|k| !k.expose_secret().trim().is_empty())
        .ok_or(AssistError::MissingCredential)?;
    Ok(GenerativeClient::from_api_key(
        &config.base_url,
        key,
        &config.transport(),
    )?)
}

/// Ranked models the configured key can use.
pub(crate) async fn ranked_models(
    client: &GenerativeClient,
    config: &AssistantConfig,
) -> Result<Vec<ModelOption>, AssistError> {
    let models = client.list_models().await?;
    Ok(rank(models, &config.preferred_models))
}

pub(crate) fn first_text(response: &taskye_api::GenerateResponse) -> Option<&str> {
    response.first_text().filter(|t| !t.trim().is_empty())
}

/// Turns free text (and an optional attachment) into a ticket draft.
pub struct TicketAssistant {
    config: AssistantConfig,
}

impl TicketAssistant {
    pub fn new(config: AssistantConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AssistantConfig {
        &self.config
    }

    /// Ranked models available for drafting.
    pub async fn available_models(&self) -> Result<Vec<ModelOption>, AssistError> {
        let client = provider_client(&self.config)?;
        ranked_models(&client, &self.config).await
    }

    /// Run the pipeline. Parse and validation failures resolve to the
    /// fallback draft; request, credential and provider failures are
    /// returned.
    pub async fn draft(&self, request: &DraftRequest) -> Result<Extraction, AssistError> {
        debug!(stage = %Stage::Idle, "drafting ticket");
        let result = self.run(request).await;
        match &result {
            Ok(extraction) => {
                debug!(stage = %Stage::Done, source = %extraction.source, model = ?extraction.model);
            }
            Err(e) => debug!(stage = %Stage::Failed, error = %e),
        }
        result
    }

    /// Deterministic draft for `request`, for callers recovering from a
    /// failure that [`AssistError::allows_fallback`]. Carries the pinned
    /// model, if any.
    pub fn fallback(&self, request: &DraftRequest) -> Extraction {
        Extraction {
            draft: fallback_draft(request.effective_message()),
            model: self.pinned_model(request),
            source: DraftSource::Fallback,
        }
    }

    fn pinned_model(&self, request: &DraftRequest) -> Option<String> {
        request
            .model
            .as_deref()
            .or(self.config.model.as_deref())
            .map(|m| normalize_model_id(m).to_owned())
    }

    async fn run(&self, request: &DraftRequest) -> Result<Extraction, AssistError> {
        let message = request.message.trim();
        if message.is_empty() && request.attachment.is_none() {
            return Err(AssistError::InvalidRequest {
                message: "describe the problem or attach a file".into(),
            });
        }

        let client = provider_client(&self.config)?;

        debug!(stage = %Stage::SelectingModel);
        let model = match self.pinned_model(request) {
            Some(model) => model,
            None => {
                let ranked = ranked_models(&client, &self.config).await?;
                select(&ranked)?.id().to_owned()
            }
        };

        debug!(stage = %Stage::Requesting, %model);
        let attachment_name = request.attachment.as_ref().map(|a| a.file_name.as_str());
        let mut parts = vec![Part::text(prompt::ticket_prompt(message, attachment_name))];
        if let Some(attachment) = request.attachment.as_ref().filter(|a| a.is_inline_supported()) {
            parts.push(Part::inline(&attachment.mime_type, attachment.data()));
        }

        let response = client
            .generate_content(&model, &GenerateRequest::single_turn(parts))
            .await?;
        let text = first_text(&response).ok_or(AssistError::EmptyResponse)?;

        debug!(stage = %Stage::Parsing);
        match parse_draft(text) {
            Ok(draft) => Ok(Extraction {
                draft,
                model: Some(model),
                source: DraftSource::Model,
            }),
            Err(reason) => {
                warn!(%reason, response = %text, "model output unusable, using fallback draft");
                debug!(stage = %Stage::Fallback);
                Ok(Extraction {
                    draft: fallback_draft(request.effective_message()),
                    model: Some(model),
                    source: DraftSource::Fallback,
                })
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn effective_message_substitutes_for_attachment_only() {
        let mut req = DraftRequest::new("   ");
        assert_eq!(req.effective_message(), "   ");

        req.attachment = Attachment::from_bytes("a.png", "image/png", b"x").ok();
        assert_eq!(req.effective_message(), prompt::ATTACHMENT_ONLY_MESSAGE);
    }

    #[tokio::test]
    async fn empty_request_is_rejected_before_credentials() {
        let assistant = TicketAssistant::new(AssistantConfig::default());
        let err = assistant.draft(&DraftRequest::new("")).await.unwrap_err();
        assert!(matches!(err, AssistError::InvalidRequest { .. }));
    }

    #[tokio::test]
    async fn missing_key_is_reported() {
        let assistant = TicketAssistant::new(AssistantConfig::default());
        let err = assistant
            .draft(&DraftRequest::new("printer broken"))
            .await
            .unwrap_err();
        assert!(matches!(err, AssistError::MissingCredential));
    }
}

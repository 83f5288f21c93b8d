// ── Text reviewer ──
//
// Copy-editing through the same provider. Unlike drafting, a malformed
// response is not replaced by a heuristic: the raw text comes back with a
// note that formatting failed.

use serde::{Deserialize, Serialize};
use taskye_api::{GenerateRequest, Part};
use tracing::{debug, warn};

use super::extract::strip_fences;
use super::selection::{ModelOption, normalize_model_id};
use super::{first_text, prompt, provider_client, ranked_models};
use crate::config::AssistantConfig;
use crate::error::AssistError;

pub const FORMAT_FAILED_NOTE: &str = "Automatic formatting failed, but the text was processed.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub corrected_text: String,
    #[serde(default)]
    pub improvements: Vec<String>,
    #[serde(default)]
    pub tone_analysis: String,
}

impl AnalysisResult {
    fn unformatted(raw: &str) -> Self {
        Self {
            corrected_text: raw.to_owned(),
            improvements: vec![FORMAT_FAILED_NOTE.to_owned()],
            tone_analysis: "See the main text.".to_owned(),
        }
    }
}

pub struct TextReviewer {
    config: AssistantConfig,
}

impl TextReviewer {
    pub fn new(config: AssistantConfig) -> Self {
        Self { config }
    }

    /// Validate the key by listing models; fails with `NoUsableModel` when
    /// nothing can generate content.
    pub async fn available_models(&self) -> Result<Vec<ModelOption>, AssistError> {
        let client = provider_client(&self.config)?;
        let ranked = ranked_models(&client, &self.config).await?;
        if ranked.is_empty() {
            return Err(AssistError::NoUsableModel);
        }
        Ok(ranked)
    }

    pub async fn analyze(
        &self,
        model: &str,
        text: &str,
        tone: &str,
    ) -> Result<AnalysisResult, AssistError> {
        if text.trim().is_empty() {
            return Err(AssistError::InvalidRequest {
                message: "enter some text to review".into(),
            });
        }
        let client = provider_client(&self.config)?;
        let model = normalize_model_id(model);
        debug!(%model, %tone, "reviewing text");

        let request = GenerateRequest::single_turn(vec![Part::text(prompt::review_prompt(
            text, tone,
        ))]);
        let response = client.generate_content(model, &request).await?;
        let raw = first_text(&response).ok_or(AssistError::EmptyResponse)?;

        match serde_json::from_str::<AnalysisResult>(&strip_fences(raw)) {
            Ok(result) => Ok(result),
            Err(e) => {
                warn!(error = %e, "review response is not JSON, returning raw text");
                Ok(AnalysisResult::unformatted(raw))
            }
        }
    }
}

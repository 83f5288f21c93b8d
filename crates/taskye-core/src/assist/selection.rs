// ── Model ranking and selection ──
//
// One canonical policy for both the drafting pipeline and the reviewer:
// keep models that support `generateContent`, then order by
//   1. index of the first preferred family the name contains (`8b`
//      variants never match a preference),
//   2. safe (free-tier "flash") models before the rest,
//   3. provider order.

use serde::Serialize;
use strum::Display;
use taskye_api::ModelInfo;

use crate::error::AssistError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
pub enum Tier {
    Free,
    Pro,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelOption {
    /// Fully qualified provider name, e.g. `models/gemini-1.5-flash`.
    pub name: String,
    pub display_name: String,
    pub tier: Tier,
    pub is_safe: bool,
}

impl From<ModelInfo> for ModelOption {
    fn from(info: ModelInfo) -> Self {
        let tier = if info.name.contains("flash") {
            Tier::Free
        } else if info.name.contains("pro") || info.name.contains("ultra") {
            Tier::Pro
        } else {
            Tier::Unknown
        };
        let display_name = info
            .display_name
            .clone()
            .unwrap_or_else(|| info.id().to_owned());
        Self {
            is_safe: tier == Tier::Free,
            name: info.name,
            display_name,
            tier,
        }
    }
}

impl ModelOption {
    /// Model id without the `models/` prefix.
    pub fn id(&self) -> &str {
        normalize_model_id(&self.name)
    }
}

pub fn normalize_model_id(name: &str) -> &str {
    name.strip_prefix("models/").unwrap_or(name)
}

fn preference(name: &str, preferred: &[String]) -> usize {
    if name.contains("8b") {
        return preferred.len();
    }
    preferred
        .iter()
        .position(|family| name.contains(family.as_str()))
        .unwrap_or(preferred.len())
}

/// Filter and order provider models.
pub fn rank(models: Vec<ModelInfo>, preferred: &[String]) -> Vec<ModelOption> {
    let mut options: Vec<(usize, ModelOption)> = models
        .into_iter()
        .filter(ModelInfo::supports_generation)
        .map(|m| (preference(&m.name, preferred), ModelOption::from(m)))
        .collect();

    // Stable: ties keep provider order.
    options.sort_by_key(|(pref, opt)| (*pref, !opt.is_safe));
    options.into_iter().map(|(_, opt)| opt).collect()
}

/// Best candidate of an already ranked list.
pub fn select(ranked: &[ModelOption]) -> Result<&ModelOption, AssistError> {
    ranked.first().ok_or(AssistError::NoUsableModel)
}

//! CLI configuration: thin wrapper around `taskye_config` shared types.
//!
//! Adds resolution that respects `GlobalOpts` flag overrides (--config,
//! --data-dir, --api-key, --model).

use std::path::PathBuf;

use secrecy::SecretString;

use taskye_core::AssistantConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use taskye_config::{Config, clear_api_key, save_config_to, store_api_key};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Config file in effect: `--config` / `TASKYE_CONFIG`, else the platform path.
pub fn config_file(global: &GlobalOpts) -> PathBuf {
    global
        .config
        .clone()
        .unwrap_or_else(taskye_config::config_path)
}

/// Load config from the effective file + environment.
pub fn load(global: &GlobalOpts) -> Result<Config, CliError> {
    Ok(taskye_config::load_config_from(&config_file(global))?)
}

/// Snapshot directory with `--data-dir` taking priority.
pub fn data_dir(global: &GlobalOpts, cfg: &Config) -> PathBuf {
    taskye_config::data_dir(global.data_dir.as_deref(), cfg)
}

/// Provider key with `--api-key` / `TASKYE_API_KEY` taking priority.
pub fn api_key(global: &GlobalOpts, cfg: &Config) -> Option<SecretString> {
    taskye_config::resolve_api_key(&cfg.provider, global.api_key.as_deref())
}

/// Runtime assistant configuration with flag overrides applied.
pub fn assistant_config(global: &GlobalOpts, cfg: &Config) -> AssistantConfig {
    taskye_config::to_assistant_config(cfg, api_key(global, cfg), global.model.as_deref())
}

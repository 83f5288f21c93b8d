//! Shared configuration for taskye.
//!
//! TOML file + `TASKYE_` environment layering, data-directory resolution,
//! provider credential resolution (flag, env var, plaintext, keyring), and
//! translation to `taskye_core::AssistantConfig`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use taskye_core::AssistantConfig;
use taskye_core::config::DEFAULT_PREFERRED_MODELS;

/// Keyring service name.
pub const KEYRING_SERVICE: &str = "taskye";
/// Keyring entry holding the provider API key.
pub const KEYRING_API_KEY: &str = "provider/api-key";

const REDACTED: &str = "********";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub defaults: Defaults,

    #[serde(default)]
    pub provider: ProviderConfig,

    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}

/// Generative provider settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProviderConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// API key (plaintext; prefer keyring or env var).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Environment variable name containing the API key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key_env: Option<String>,

    /// Pinned model id; disables model discovery.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Request timeout in seconds. No timeout when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,

    #[serde(default = "default_preferred_models")]
    pub preferred_models: Vec<String>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            api_key_env: None,
            model: None,
            timeout: None,
            preferred_models: default_preferred_models(),
        }
    }
}

fn default_base_url() -> String {
    taskye_api::DEFAULT_BASE_URL.into()
}
fn default_preferred_models() -> Vec<String> {
    DEFAULT_PREFERRED_MODELS
        .iter()
        .map(|s| (*s).to_owned())
        .collect()
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Snapshot directory. Platform data dir when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

impl Config {
    /// Copy with plaintext secrets masked, for display.
    pub fn redacted(&self) -> Self {
        let mut cfg = self.clone();
        if cfg.provider.api_key.is_some() {
            cfg.provider.api_key = Some(REDACTED.into());
        }
        cfg
    }
}

// ── Paths ───────────────────────────────────────────────────────────

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "taskye", "taskye")
}

fn home_fallback(parts: &[&str]) -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    for part in parts {
        p.push(part);
    }
    p
}

/// Resolve the config file path: `TASKYE_CONFIG`, else platform conventions.
pub fn config_path() -> PathBuf {
    if let Some(path) = std::env::var_os("TASKYE_CONFIG").filter(|p| !p.is_empty()) {
        return PathBuf::from(path);
    }
    project_dirs().map_or_else(
        || home_fallback(&[".config", "taskye", "config.toml"]),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Snapshot directory: explicit override, then `[storage] data_dir`, then
/// the platform data dir.
pub fn data_dir(explicit: Option<&Path>, cfg: &Config) -> PathBuf {
    if let Some(dir) = explicit {
        return dir.to_path_buf();
    }
    if let Some(ref dir) = cfg.storage.data_dir {
        return dir.clone();
    }
    project_dirs().map_or_else(
        || home_fallback(&[".local", "share", "taskye"]),
        |dirs| dirs.data_dir().to_path_buf(),
    )
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical path + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load config from `path` (missing file is fine) layered under
/// `TASKYE_`-prefixed environment variables.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    debug!(path = %path.display(), "loading config");
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(
            Env::prefixed("TASKYE_")
                .ignore(&["config", "api_key", "data_dir", "model", "output"])
                .split("__"),
        );

    let config: Config = figment.extract()?;
    validate(&config)?;
    Ok(config)
}

fn validate(cfg: &Config) -> Result<(), ConfigError> {
    url::Url::parse(&cfg.provider.base_url).map_err(|e| ConfigError::Validation {
        field: "provider.base_url".into(),
        reason: format!("{e}: {}", cfg.provider.base_url),
    })?;
    if cfg.provider.timeout == Some(0) {
        return Err(ConfigError::Validation {
            field: "provider.timeout".into(),
            reason: "must be at least one second".into(),
        });
    }
    Ok(())
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to `path`.
pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

/// Serialize config to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

// ── Credentials ─────────────────────────────────────────────────────

fn keyring_entry() -> Result<keyring::Entry, ConfigError> {
    Ok(keyring::Entry::new(KEYRING_SERVICE, KEYRING_API_KEY)?)
}

fn keyring_api_key() -> Option<SecretString> {
    let secret = keyring_entry().ok()?.get_password().ok()?;
    Some(SecretString::from(secret))
}

/// Store the provider key in the system keyring.
pub fn store_api_key(key: &SecretString) -> Result<(), ConfigError> {
    keyring_entry()?.set_password(key.expose_secret())?;
    Ok(())
}

/// Remove the provider key from the system keyring. Absent entry is Ok.
pub fn clear_api_key() -> Result<(), ConfigError> {
    match keyring_entry()?.delete_credential() {
        Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
        Err(e) => Err(e.into()),
    }
}

/// Resolve the provider key. `explicit` is the CLI flag (or
/// `TASKYE_API_KEY`). `None` is not an error here: the assistant reports a
/// missing credential when it is actually invoked.
pub fn resolve_api_key(provider: &ProviderConfig, explicit: Option<&str>) -> Option<SecretString> {
    resolve_api_key_with(provider, explicit, keyring_api_key)
}

fn resolve_api_key_with(
    provider: &ProviderConfig,
    explicit: Option<&str>,
    keyring: impl FnOnce() -> Option<SecretString>,
) -> Option<SecretString> {
    fn usable(s: &str) -> Option<SecretString> {
        let s = s.trim();
        (!s.is_empty()).then(|| SecretString::from(s.to_owned()))
    }

    // 1. Flag / TASKYE_API_KEY
    if let Some(key) = explicit.and_then(usable) {
        return Some(key);
    }

    // 2. Configured env var
    if let Some(ref env_name) = provider.api_key_env {
        if let Some(key) = std::env::var(env_name).ok().as_deref().and_then(usable) {
            return Some(key);
        }
    }

    // 3. Plaintext in config
    if let Some(key) = provider.api_key.as_deref().and_then(usable) {
        return Some(key);
    }

    // 4. System keyring
    keyring()
}

/// Build the runtime assistant configuration. `model` overrides the
/// configured pin.
pub fn to_assistant_config(
    cfg: &Config,
    api_key: Option<SecretString>,
    model: Option<&str>,
) -> AssistantConfig {
    AssistantConfig {
        base_url: cfg.provider.base_url.clone(),
        api_key,
        model: model
            .map(str::to_owned)
            .or_else(|| cfg.provider.model.clone())
            .filter(|m| !m.trim().is_empty()),
        timeout: cfg.provider.timeout.map(Duration::from_secs),
        preferred_models: if cfg.provider.preferred_models.is_empty() {
            default_preferred_models()
        } else {
            cfg.provider.preferred_models.clone()
        },
    }
}

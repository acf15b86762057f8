//! Struct definitions and serde defaults for acu configuration.

use serde::{Deserialize, Serialize};

/// Root configuration for acu, deserialized from `config.toml`.
///
/// Every field is optional so acu runs with sensible defaults when no
/// config file exists.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    /// Optimizer preference: `auto`, `claude`, `openai`, `gemini`, or `openrouter`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optimizer: Option<String>,
    /// Free model to try first on OpenRouter, or `auto` for the roster default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub free_model: Option<String>,
    /// Upper bound on a single model call, in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attempt_timeout_secs: Option<u64>,
    /// Replaces the built-in optimizer instructions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
    /// Per-provider settings.
    #[serde(default)]
    pub provider: ProviderConfig,
    /// OpenRouter free-tier settings.
    #[serde(default)]
    pub free_tier: FreeTierConfig,
    /// Local history settings.
    #[serde(default)]
    pub history: HistoryConfig,
}

/// Provider-specific configuration map.
///
/// Each field corresponds to a supported LLM provider. Only providers
/// the user has configured will be `Some`.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct ProviderConfig {
    pub anthropic: Option<ProviderEntry>,
    pub openai: Option<ProviderEntry>,
    pub google: Option<ProviderEntry>,
    pub openrouter: Option<ProviderEntry>,
}

/// Connection details for a single LLM provider.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct ProviderEntry {
    /// API key for authentication. Can also be set via environment variables.
    pub api_key: Option<String>,
}

/// Overrides for the OpenRouter free-tier roster.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct FreeTierConfig {
    /// Ordered model ids; the first is the default free model.
    pub roster: Option<Vec<String>>,
}

/// Settings for the optimization history file.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct HistoryConfig {
    pub enabled: Option<bool>,
    /// Maximum number of entries kept; oldest are dropped first.
    pub limit: Option<usize>,
}

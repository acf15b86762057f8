//! File loading, merging, and editing for acu configuration.

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use super::types::{Config, FreeTierConfig, HistoryConfig, ProviderConfig, ProviderEntry};

/// Written on first run so users see where keys go.
const DEFAULT_CONFIG_TOML: &str = r#"optimizer = "auto"
free_model = "auto"

[provider.anthropic]
api_key = "{env:ANTHROPIC_API_KEY}"

[provider.openai]
api_key = "{env:OPENAI_API_KEY}"

[provider.google]
api_key = "{env:GEMINI_API_KEY}"

[provider.openrouter]
api_key = "{env:OPENROUTER_API_KEY}"
"#;

/// Keys accepted by `acu config set`.
pub const SETTABLE_KEYS: &[&str] = &[
    "optimizer",
    "free_model",
    "attempt_timeout_secs",
    "system_prompt",
    "history.enabled",
    "history.limit",
    "provider.anthropic.api_key",
    "provider.openai.api_key",
    "provider.google.api_key",
    "provider.openrouter.api_key",
];

impl Config {
    /// Loads the global config from `~/.config/acu/config.toml`.
    pub(super) fn load_global() -> Result<Self> {
        Self::load_or_create(&Self::config_path()?)
    }

    /// Reads the config at `path`, writing the default template first if it is missing.
    pub(super) fn load_or_create(path: &Path) -> Result<Self> {
        if !path.exists() {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, DEFAULT_CONFIG_TOML)
                .with_context(|| format!("Failed to write default config to {:?}", path))?;
        }
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;
        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config at {:?}", path))?;
        Ok(config)
    }

    /// Look for acu.toml in current dir, then walk up to git root.
    pub(super) fn load_project() -> Result<Option<Config>> {
        Self::find_project(std::env::current_dir()?)
    }

    pub(super) fn find_project(mut dir: PathBuf) -> Result<Option<Config>> {
        loop {
            let candidate = dir.join(crate::constants::PROJECT_CONFIG_FILENAME);
            if candidate.exists() {
                let contents = fs::read_to_string(&candidate)?;
                let config: Config = toml::from_str(&contents)
                    .with_context(|| format!("Failed to parse project config at {:?}", candidate))?;
                return Ok(Some(config));
            }
            // Stop at git root or filesystem root
            if dir.join(".git").exists() || !dir.pop() {
                break;
            }
        }
        Ok(None)
    }

    /// Merge project config over global config.
    /// Project values win when present.
    pub(super) fn merge(global: Config, project: Config) -> Config {
        Config {
            optimizer: project.optimizer.or(global.optimizer),
            free_model: project.free_model.or(global.free_model),
            attempt_timeout_secs: project.attempt_timeout_secs.or(global.attempt_timeout_secs),
            system_prompt: project.system_prompt.or(global.system_prompt),
            provider: ProviderConfig {
                anthropic: merge_entry(global.provider.anthropic, project.provider.anthropic),
                openai: merge_entry(global.provider.openai, project.provider.openai),
                google: merge_entry(global.provider.google, project.provider.google),
                openrouter: merge_entry(global.provider.openrouter, project.provider.openrouter),
            },
            free_tier: FreeTierConfig {
                roster: project.free_tier.roster.or(global.free_tier.roster),
            },
            history: HistoryConfig {
                enabled: project.history.enabled.or(global.history.enabled),
                limit: project.history.limit.or(global.history.limit),
            },
        }
    }

    /// Sets a dotted key in the global config file, keeping everything else intact.
    pub fn set_global_value(key: &str, value: &str) -> Result<PathBuf> {
        let path = Self::config_path()?;
        Self::load_or_create(&path)?;
        Self::set_value_at(&path, key, value)?;
        Ok(path)
    }

    pub(super) fn set_value_at(path: &Path, key: &str, value: &str) -> Result<()> {
        if !SETTABLE_KEYS.contains(&key) {
            bail!("Unknown config key: {key}. Settable keys: {}", SETTABLE_KEYS.join(", "));
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;
        let mut doc: toml::Table = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config at {:?}", path))?;

        let typed = match key {
            "attempt_timeout_secs" | "history.limit" => toml::Value::Integer(
                value
                    .parse::<i64>()
                    .ok()
                    .filter(|n| *n > 0)
                    .with_context(|| format!("{key} must be a positive integer"))?,
            ),
            "history.enabled" => toml::Value::Boolean(
                value
                    .parse::<bool>()
                    .with_context(|| format!("{key} must be true or false"))?,
            ),
            _ => toml::Value::String(value.to_string()),
        };

        let mut parts: Vec<&str> = key.split('.').collect();
        let leaf = parts.pop().unwrap_or(key);
        let mut table = &mut doc;
        for part in parts {
            let entry = table
                .entry(part.to_string())
                .or_insert_with(|| toml::Value::Table(toml::Table::new()));
            table = match entry {
                toml::Value::Table(t) => t,
                _ => bail!("Config key {part} is not a table"),
            };
        }
        table.insert(leaf.to_string(), typed);

        let rendered = toml::to_string_pretty(&doc)?;
        // Reject edits that would leave an unparseable config behind.
        toml::from_str::<Config>(&rendered).context("Edited config no longer parses")?;
        fs::write(path, rendered).with_context(|| format!("Failed to write config to {:?}", path))?;
        Ok(())
    }
}

/// Project entry wins field-by-field over the global one.
fn merge_entry(global: Option<ProviderEntry>, project: Option<ProviderEntry>) -> Option<ProviderEntry> {
    match (global, project) {
        (Some(g), Some(p)) => Some(ProviderEntry {
            api_key: p.api_key.or(g.api_key),
        }),
        (g, p) => p.or(g),
    }
}

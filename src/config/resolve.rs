//! Environment variable substitution and resolution into request settings.

use std::time::Duration;

use super::types::{Config, ProviderEntry};

use crate::constants::{ATTEMPT_TIMEOUT_SECS_DEFAULT, HISTORY_ENABLED_DEFAULT, HISTORY_LIMIT_DEFAULT};
use crate::models::FreeModelRoster;
use crate::provider::{CredentialSet, FreeModelPreference, ProviderKind};

impl Config {
    /// Resolve {env:VAR_NAME} patterns in string fields.
    pub(super) fn resolve_substitutions(&mut self) {
        for field in [&mut self.optimizer, &mut self.free_model, &mut self.system_prompt] {
            if let Some(s) = field {
                *s = Self::resolve_str(s);
            }
        }
        Self::resolve_provider_entry(&mut self.provider.anthropic);
        Self::resolve_provider_entry(&mut self.provider.openai);
        Self::resolve_provider_entry(&mut self.provider.google);
        Self::resolve_provider_entry(&mut self.provider.openrouter);
    }

    fn resolve_provider_entry(entry: &mut Option<ProviderEntry>) {
        if let Some(ref mut e) = entry {
            if let Some(ref mut key) = e.api_key {
                *key = Self::resolve_str(key);
            }
        }
    }

    /// Replace {env:VAR} with the environment variable value.
    ///
    /// Single pass: substituted values are copied as-is and never rescanned.
    fn resolve_str(s: &str) -> String {
        let mut result = String::with_capacity(s.len());
        let mut rest = s;
        while let Some(start) = rest.find("{env:") {
            let Some(end) = rest[start..].find('}') else {
                break;
            };
            let var_name = &rest[start + 5..start + end];
            result.push_str(&rest[..start]);
            result.push_str(&std::env::var(var_name).unwrap_or_default());
            rest = &rest[start + end + 1..];
        }
        result.push_str(rest);
        result
    }

    /// Resolve API key for a provider: env var first, then config value.
    pub fn resolve_api_key(&self, provider: ProviderKind) -> Option<String> {
        // ANTHROPIC_API_KEY, OPENAI_API_KEY, GOOGLE_API_KEY, OPENROUTER_API_KEY
        let env_key = format!("{}_API_KEY", provider.name().to_uppercase());
        if let Ok(val) = std::env::var(&env_key) {
            if !val.trim().is_empty() {
                return Some(val);
            }
        }

        let entry = match provider {
            ProviderKind::Anthropic => &self.provider.anthropic,
            ProviderKind::OpenAI => &self.provider.openai,
            ProviderKind::Google => &self.provider.google,
            ProviderKind::OpenRouter => &self.provider.openrouter,
        };
        entry
            .as_ref()
            .and_then(|e| e.api_key.clone())
            .filter(|k| !k.trim().is_empty())
    }

    /// Keys for all four providers, read fresh for this request.
    pub fn credentials(&self) -> CredentialSet {
        let mut creds = CredentialSet::default();
        for provider in ProviderKind::PRIORITY {
            if let Some(key) = self.resolve_api_key(provider) {
                creds.set(provider, key);
            }
        }
        creds
    }

    /// Raw optimizer preference string, `auto` when unset.
    pub fn optimizer_name(&self) -> &str {
        self.optimizer.as_deref().unwrap_or(crate::constants::AUTO)
    }

    pub fn free_model_preference(&self) -> FreeModelPreference {
        FreeModelPreference::parse(self.free_model.as_deref().unwrap_or_default())
    }

    pub fn roster(&self) -> FreeModelRoster {
        match &self.free_tier.roster {
            Some(models) => FreeModelRoster::new(models.iter().cloned()),
            None => FreeModelRoster::default(),
        }
    }

    pub fn attempt_timeout(&self) -> Duration {
        Duration::from_secs(
            self.attempt_timeout_secs
                .filter(|s| *s > 0)
                .unwrap_or(ATTEMPT_TIMEOUT_SECS_DEFAULT),
        )
    }

    pub fn history_enabled(&self) -> bool {
        self.history.enabled.unwrap_or(HISTORY_ENABLED_DEFAULT)
    }

    pub fn history_limit(&self) -> usize {
        self.history.limit.unwrap_or(HISTORY_LIMIT_DEFAULT)
    }

    /// Copy of this config with API keys masked, for `acu config show`.
    pub fn redacted(&self) -> Config {
        let mut copy = self.clone();
        for entry in [
            &mut copy.provider.anthropic,
            &mut copy.provider.openai,
            &mut copy.provider.google,
            &mut copy.provider.openrouter,
        ] {
            if let Some(ProviderEntry { api_key: Some(key) }) = entry {
                *key = mask_key(key);
            }
        }
        copy
    }
}

/// Keeps the first few characters so the prefix is still recognisable.
fn mask_key(key: &str) -> String {
    if key.is_empty() {
        return String::new();
    }
    let head: String = key.chars().take(6).collect();
    format!("{head}****")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_str() {
        std::env::set_var("ACU_TEST_RESOLVE_VAR", "value");
        assert_eq!(Config::resolve_str("a-{env:ACU_TEST_RESOLVE_VAR}-b"), "a-value-b");
        assert_eq!(Config::resolve_str("{env:ACU_TEST_SURELY_UNSET_VAR}"), "");
        assert_eq!(Config::resolve_str("no-close-{env:X"), "no-close-{env:X");
    }

    #[test]
    fn test_resolve_str_does_not_rescan_values() {
        std::env::set_var("ACU_TEST_SELF_REF_VAR", "{env:ACU_TEST_SELF_REF_VAR}");
        assert_eq!(
            Config::resolve_str("k={env:ACU_TEST_SELF_REF_VAR};"),
            "k={env:ACU_TEST_SELF_REF_VAR};"
        );
        std::env::set_var("ACU_TEST_PAIR_A", "1");
        std::env::set_var("ACU_TEST_PAIR_B", "2");
        assert_eq!(
            Config::resolve_str("{env:ACU_TEST_PAIR_A}-{env:ACU_TEST_PAIR_B}"),
            "1-2"
        );
    }

    #[test]
    fn test_config_keys_and_blank_keys() {
        let config: Config = toml::from_str(
            r#"
[provider.google]
api_key = "AIzaFromFile"
[provider.openai]
api_key = "   "
"#,
        )
        .unwrap();
        // GOOGLE_API_KEY / OPENAI_API_KEY are not expected in the test environment
        if std::env::var("GOOGLE_API_KEY").is_err() {
            assert_eq!(
                config.resolve_api_key(ProviderKind::Google).as_deref(),
                Some("AIzaFromFile")
            );
        }
        if std::env::var("OPENAI_API_KEY").is_err() {
            assert_eq!(config.resolve_api_key(ProviderKind::OpenAI), None);
        }
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.optimizer_name(), "auto");
        assert_eq!(config.free_model_preference(), FreeModelPreference::Auto);
        assert_eq!(config.roster(), FreeModelRoster::default());
        assert_eq!(config.attempt_timeout(), Duration::from_secs(60));
        assert!(config.history_enabled());
        assert_eq!(config.history_limit(), 50);
    }

    #[test]
    fn test_roster_override() {
        let config: Config =
            toml::from_str("[free_tier]\nroster = [\"x/one:free\", \"y/two:free\"]\n").unwrap();
        assert_eq!(config.roster().primary(), "x/one:free");
    }

    #[test]
    fn test_redacted() {
        let config: Config =
            toml::from_str("[provider.openrouter]\napi_key = \"sk-or-v1-secretsecret\"\n").unwrap();
        let shown = config.redacted();
        let key = shown.provider.openrouter.unwrap().api_key.unwrap();
        assert_eq!(key, "sk-or-****");
    }
}

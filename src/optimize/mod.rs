//! Request-level entry point for prompt optimization.
//!
//! Validates the request, picks a provider, builds the user message, and
//! hands off to the [`Executor`]. Nothing here touches the network directly.

mod executor;
#[cfg(test)]
pub(crate) mod testing;

use std::time::Duration;

use tracing::info;

pub use executor::{Completion, Executor};

use crate::config::Config;
use crate::error::OptimizeError;
use crate::models::FreeModelRoster;
use crate::provider::{
    select_provider, CredentialSet, FreeModelPreference, Invoker, Preference, ProviderChoice,
};

/// What the user wants optimized.
#[derive(Debug, Clone, Default)]
pub struct OptimizeRequest {
    /// The rough prompt to rewrite. Required.
    pub original_prompt: String,
    /// Label of the model family the prompt is for (e.g. "GPT-4o"). Required.
    pub target_model: String,
    /// Optional extra context: tone, format, constraints.
    pub additional_details: Option<String>,
}

impl OptimizeRequest {
    pub fn validate(&self) -> Result<(), OptimizeError> {
        if self.original_prompt.trim().is_empty() {
            return Err(OptimizeError::InvalidRequest("Prompt is required".into()));
        }
        if self.target_model.trim().is_empty() {
            return Err(OptimizeError::InvalidRequest("Target model is required".into()));
        }
        Ok(())
    }

    /// Labeled sections sent as the user turn.
    pub fn user_message(&self) -> String {
        let mut message = format!(
            "TARGET MODEL: {}\n\nORIGINAL PROMPT:\n{}",
            self.target_model, self.original_prompt
        );
        if let Some(details) = self.additional_details.as_deref().filter(|d| !d.trim().is_empty()) {
            message.push_str("\n\nADDITIONAL CONTEXT/DETAILS:\n");
            message.push_str(details);
        }
        message
    }
}

/// Everything besides the request itself that decides how it is served.
#[derive(Debug, Clone)]
pub struct Settings {
    pub credentials: CredentialSet,
    pub preference: Preference,
    pub free_preference: FreeModelPreference,
    pub roster: FreeModelRoster,
    pub system_prompt: String,
    pub attempt_timeout: Duration,
}

impl Settings {
    /// Builds settings from config, with optional per-run overrides of the two preferences.
    pub fn from_config(
        config: &Config,
        prefer: Option<&str>,
        free_model: Option<&str>,
    ) -> Result<Self, OptimizeError> {
        let preference = Preference::parse(prefer.unwrap_or(config.optimizer_name()))?;
        let free_preference = match free_model {
            Some(m) => FreeModelPreference::parse(m),
            None => config.free_model_preference(),
        };
        Ok(Self {
            credentials: config.credentials(),
            preference,
            free_preference,
            roster: config.roster(),
            system_prompt: config
                .system_prompt
                .clone()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| crate::prompts::OPTIMIZER_SYSTEM_PROMPT.to_string()),
            attempt_timeout: config.attempt_timeout(),
        })
    }

    /// The provider this request would use, without calling it.
    pub fn choice(&self) -> Option<ProviderChoice> {
        select_provider(
            &self.credentials,
            self.preference,
            &self.free_preference,
            &self.roster,
        )
    }
}

/// Optimizes one prompt: validate, select, invoke (with free-tier fallback).
pub async fn optimize(
    invoker: &dyn Invoker,
    settings: &Settings,
    request: &OptimizeRequest,
) -> Result<Completion, OptimizeError> {
    request.validate()?;
    let choice = settings.choice().ok_or(OptimizeError::NoUsableCredentials)?;
    info!(provider = %choice.provider, model = %choice.model, target = %request.target_model, "optimizing prompt");

    Executor::new(invoker, &settings.roster, settings.attempt_timeout)
        .execute(&choice, &settings.system_prompt, &request.user_message())
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::ProviderKind;
    use super::testing::ScriptedInvoker;

    fn request() -> OptimizeRequest {
        OptimizeRequest {
            original_prompt: "write an email asking for a raise".into(),
            target_model: "GPT-4o".into(),
            additional_details: None,
        }
    }

    fn settings(creds: &[(ProviderKind, &str)], pref: Preference, free: FreeModelPreference) -> Settings {
        let mut credentials = CredentialSet::default();
        for (p, k) in creds {
            credentials.set(*p, *k);
        }
        Settings {
            credentials,
            preference: pref,
            free_preference: free,
            roster: FreeModelRoster::default(),
            system_prompt: "SYSTEM".into(),
            attempt_timeout: Duration::from_secs(5),
        }
    }

    #[test]
    fn test_user_message_sections() {
        let mut req = request();
        assert_eq!(
            req.user_message(),
            "TARGET MODEL: GPT-4o\n\nORIGINAL PROMPT:\nwrite an email asking for a raise"
        );
        req.additional_details = Some("formal tone".into());
        assert!(req
            .user_message()
            .ends_with("\n\nADDITIONAL CONTEXT/DETAILS:\nformal tone"));
        req.additional_details = Some("  ".into());
        assert!(!req.user_message().contains("ADDITIONAL"));
    }

    #[tokio::test]
    async fn test_invalid_request_never_invokes() {
        let invoker = ScriptedInvoker::new();
        let s = settings(
            &[(ProviderKind::Anthropic, "sk-ant-x")],
            Preference::Auto,
            FreeModelPreference::Auto,
        );
        let mut req = request();
        req.original_prompt = " ".into();
        let err = optimize(&invoker, &s, &req).await.unwrap_err();
        assert!(matches!(err, OptimizeError::InvalidRequest(_)));

        let mut req = request();
        req.target_model = String::new();
        let err = optimize(&invoker, &s, &req).await.unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert_eq!(invoker.call_count(), 0);
    }

    #[tokio::test]
    async fn test_no_credentials_never_invokes() {
        let invoker = ScriptedInvoker::new();
        let s = settings(
            &[(ProviderKind::Anthropic, "bad"), (ProviderKind::OpenRouter, "")],
            Preference::Auto,
            FreeModelPreference::Auto,
        );
        let err = optimize(&invoker, &s, &request()).await.unwrap_err();
        assert!(matches!(err, OptimizeError::NoUsableCredentials));
        assert_eq!(err.status_code(), 401);
        assert_eq!(invoker.call_count(), 0);
    }

    #[tokio::test]
    async fn test_scenario_anthropic_only() {
        let invoker = ScriptedInvoker::new().succeed("claude-sonnet-4-5", "# Optimized Prompt\n...");
        let s = settings(
            &[(ProviderKind::Anthropic, "sk-ant-valid")],
            Preference::Auto,
            FreeModelPreference::Auto,
        );
        let out = optimize(&invoker, &s, &request()).await.unwrap();
        assert_eq!(out.text, "# Optimized Prompt\n...");
        assert_eq!(out.provider, ProviderKind::Anthropic);

        let calls = invoker.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].credential, "sk-ant-valid");
        assert_eq!(calls[0].system, "SYSTEM");
        assert!(calls[0].user.starts_with("TARGET MODEL: GPT-4o"));
    }

    #[tokio::test]
    async fn test_scenario_free_tier_second_entry() {
        let invoker = ScriptedInvoker::new().succeed("z.ai/glm-4.5-air:free", "second");
        let s = settings(
            &[(ProviderKind::OpenRouter, "sk-or-v1-valid")],
            Preference::Auto,
            FreeModelPreference::Auto,
        );
        let out = optimize(&invoker, &s, &request()).await.unwrap();
        assert_eq!(out.text, "second");
        assert_eq!(out.attempts, 2);
        assert_eq!(
            invoker.models(),
            vec!["arcee-ai/trinity-large-preview:free", "z.ai/glm-4.5-air:free"]
        );
    }

    #[tokio::test]
    async fn test_scenario_sub_preference_then_roster() {
        // The preferred model goes first and is never repeated; the roster
        // default is still tried during fallback.
        let invoker = ScriptedInvoker::new().succeed("arcee-ai/trinity-large-preview:free", "primary default");
        let s = settings(
            &[(ProviderKind::OpenRouter, "sk-or-v1-valid")],
            Preference::Forced(ProviderKind::OpenRouter),
            FreeModelPreference::Model("tngtech/deepseek-r1t2-chimera:free".into()),
        );
        let out = optimize(&invoker, &s, &request()).await.unwrap();
        assert_eq!(out.text, "primary default");
        assert_eq!(
            invoker.models(),
            vec![
                "tngtech/deepseek-r1t2-chimera:free",
                "arcee-ai/trinity-large-preview:free"
            ]
        );
    }

    #[tokio::test]
    async fn test_sub_preference_exhaustion_tries_each_model_once() {
        let invoker = ScriptedInvoker::new();
        let s = settings(
            &[(ProviderKind::OpenRouter, "sk-or-v1-valid")],
            Preference::Forced(ProviderKind::OpenRouter),
            FreeModelPreference::Model("z.ai/glm-4.5-air:free".into()),
        );
        let err = optimize(&invoker, &s, &request()).await.unwrap_err();
        assert_eq!(err.status_code(), 503);
        assert_eq!(
            invoker.models(),
            vec![
                "z.ai/glm-4.5-air:free",
                "arcee-ai/trinity-large-preview:free",
                "tngtech/deepseek-r1t2-chimera:free",
                "liquid/lfm-2.5-1.2b-instruct:free"
            ]
        );
    }

    #[tokio::test]
    async fn test_paid_choice_with_free_key_present_is_single_shot() {
        let invoker = ScriptedInvoker::new().succeed("z.ai/glm-4.5-air:free", "unused");
        let s = settings(
            &[
                (ProviderKind::OpenAI, "sk-proj-valid"),
                (ProviderKind::OpenRouter, "sk-or-v1-valid"),
            ],
            Preference::Auto,
            FreeModelPreference::Auto,
        );
        let err = optimize(&invoker, &s, &request()).await.unwrap_err();
        assert_eq!(err.status_code(), 500);
        assert_eq!(invoker.models(), vec!["gpt-4.1"]);
    }

    #[test]
    fn test_settings_from_config_overrides() {
        let config: Config = toml::from_str("optimizer = \"gemini\"\nfree_model = \"auto\"\n").unwrap();
        let s = Settings::from_config(&config, None, None).unwrap();
        assert_eq!(s.preference, Preference::Forced(ProviderKind::Google));
        assert_eq!(s.system_prompt, crate::prompts::OPTIMIZER_SYSTEM_PROMPT);

        let s = Settings::from_config(&config, Some("auto"), Some("x/y:free")).unwrap();
        assert_eq!(s.preference, Preference::Auto);
        assert_eq!(s.free_preference, FreeModelPreference::Model("x/y:free".into()));

        assert!(Settings::from_config(&config, Some("grok"), None).is_err());
    }
}

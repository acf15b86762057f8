//! Provider kind enumeration and default model mapping.
//!
//! Defines [`ProviderKind`] which identifies which LLM backend to use,
//! and [`default_model_for`] which returns the default model for each paid provider.

use anyhow::{anyhow, Result};
use std::fmt;

/// Identifies which LLM provider to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    /// Anthropic (Claude models).
    Anthropic,
    /// OpenAI (GPT models).
    OpenAI,
    /// Google (Gemini models).
    Google,
    /// OpenRouter (multi-provider gateway, used for its free tier).
    OpenRouter,
}

impl ProviderKind {
    /// Automatic selection order: paid providers first, free tier last.
    pub const PRIORITY: [ProviderKind; 4] = [
        ProviderKind::Anthropic,
        ProviderKind::OpenAI,
        ProviderKind::Google,
        ProviderKind::OpenRouter,
    ];

    /// Parses a provider name string into a [`ProviderKind`].
    ///
    /// Matching is case-insensitive and accepts the `claude` and `gemini`
    /// aliases. Returns an error for unknown providers.
    pub fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "anthropic" | "claude" => Ok(Self::Anthropic),
            "openai" => Ok(Self::OpenAI),
            "google" | "gemini" => Ok(Self::Google),
            "openrouter" => Ok(Self::OpenRouter),
            other => Err(anyhow!(
                "Unknown provider: {other}. Supported: auto, claude, openai, gemini, openrouter"
            )),
        }
    }

    /// Lowercase name used in config keys and env var names.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Anthropic => "anthropic",
            Self::OpenAI => "openai",
            Self::Google => "google",
            Self::OpenRouter => "openrouter",
        }
    }

    /// Whether this is the provider whose failures are retried across the free roster.
    pub fn is_free_tier(&self) -> bool {
        matches!(self, Self::OpenRouter)
    }

    /// Syntactic key check. Not a live verification.
    pub fn accepts_key(&self, key: &str) -> bool {
        match self {
            Self::Anthropic => key.starts_with("sk-ant"),
            Self::OpenAI => key.starts_with("sk-") || key.starts_with("user-"),
            Self::Google => key.starts_with("AIza"),
            Self::OpenRouter => key.starts_with("sk-or-"),
        }
    }

    /// Expected key prefix, for user-facing hints.
    pub fn key_hint(&self) -> &'static str {
        match self {
            Self::Anthropic => "sk-ant...",
            Self::OpenAI => "sk-... or user-...",
            Self::Google => "AIza...",
            Self::OpenRouter => "sk-or-...",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returns the default model identifier for a paid provider.
///
/// OpenRouter has no fixed default here; its model comes from the free roster.
pub fn default_model_for(provider: &ProviderKind) -> Option<&'static str> {
    match provider {
        ProviderKind::Anthropic => Some(crate::constants::DEFAULT_ANTHROPIC_MODEL),
        ProviderKind::OpenAI => Some(crate::constants::DEFAULT_OPENAI_MODEL),
        ProviderKind::Google => Some(crate::constants::DEFAULT_GOOGLE_MODEL),
        ProviderKind::OpenRouter => None,
    }
}

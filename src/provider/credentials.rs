//! Per-request API key set.

use std::fmt;

use super::kind::ProviderKind;

/// One optional API key per provider.
///
/// Built fresh for every request from env vars and config; never written
/// anywhere by the core.
#[derive(Clone, Default)]
pub struct CredentialSet {
    pub anthropic: Option<String>,
    pub openai: Option<String>,
    pub google: Option<String>,
    pub openrouter: Option<String>,
}

/// Result of the syntactic key check for one provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyStatus {
    Missing,
    InvalidFormat,
    Valid,
}

impl CredentialSet {
    /// Raw key for a provider, if one was supplied.
    pub fn get(&self, provider: ProviderKind) -> Option<&str> {
        match provider {
            ProviderKind::Anthropic => self.anthropic.as_deref(),
            ProviderKind::OpenAI => self.openai.as_deref(),
            ProviderKind::Google => self.google.as_deref(),
            ProviderKind::OpenRouter => self.openrouter.as_deref(),
        }
    }

    pub fn set(&mut self, provider: ProviderKind, key: impl Into<String>) {
        let slot = match provider {
            ProviderKind::Anthropic => &mut self.anthropic,
            ProviderKind::OpenAI => &mut self.openai,
            ProviderKind::Google => &mut self.google,
            ProviderKind::OpenRouter => &mut self.openrouter,
        };
        *slot = Some(key.into());
    }

    pub fn status(&self, provider: ProviderKind) -> KeyStatus {
        match self.get(provider).map(str::trim) {
            None | Some("") => KeyStatus::Missing,
            Some(key) if provider.accepts_key(key) => KeyStatus::Valid,
            Some(_) => KeyStatus::InvalidFormat,
        }
    }

    /// Trimmed key if it is present and well-formed. Malformed keys read as absent.
    pub fn usable(&self, provider: ProviderKind) -> Option<&str> {
        match self.status(provider) {
            KeyStatus::Valid => self.get(provider).map(str::trim),
            _ => None,
        }
    }

    pub fn has_any(&self) -> bool {
        ProviderKind::PRIORITY
            .iter()
            .any(|p| self.status(*p) != KeyStatus::Missing)
    }
}

impl fmt::Debug for CredentialSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("CredentialSet");
        for p in ProviderKind::PRIORITY {
            s.field(p.name(), &self.status(p));
        }
        s.finish()
    }
}

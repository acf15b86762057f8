//! Provider selection for acu.
//!
//! Decides which provider and model answer a request from the supplied keys
//! and the user's preference. Pure: no network, no config reads.
//!
//! Order:
//!   1. a forced preference whose key is usable wins outright
//!   2. otherwise the first usable key in [`ProviderKind::PRIORITY`]
//!   3. otherwise nothing

use tracing::{debug, info};

use super::credentials::CredentialSet;
use super::kind::{default_model_for, ProviderKind};
use crate::constants::AUTO;
use crate::error::OptimizeError;
use crate::models::FreeModelRoster;

/// Which provider the user wants to optimize with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Preference {
    #[default]
    Auto,
    Forced(ProviderKind),
}

impl Preference {
    /// Parses `auto` (or an empty string) and provider names/aliases.
    pub fn parse(s: &str) -> Result<Self, OptimizeError> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case(AUTO) {
            return Ok(Self::Auto);
        }
        ProviderKind::from_str(s)
            .map(Self::Forced)
            .map_err(|e| OptimizeError::InvalidRequest(e.to_string()))
    }
}

/// Which free model to try first on OpenRouter.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FreeModelPreference {
    #[default]
    Auto,
    Model(String),
}

impl FreeModelPreference {
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case(AUTO) {
            Self::Auto
        } else {
            Self::Model(s.to_string())
        }
    }

    /// The model to use for the primary free-tier attempt.
    pub fn resolve<'a>(&'a self, roster: &'a FreeModelRoster) -> &'a str {
        match self {
            Self::Auto => roster.primary(),
            Self::Model(m) => m,
        }
    }
}

/// Resolved provider, model, and the key to call it with.
#[derive(Clone, PartialEq, Eq)]
pub struct ProviderChoice {
    pub provider: ProviderKind,
    pub model: String,
    pub credential: String,
}

impl std::fmt::Debug for ProviderChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderChoice")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

/// Picks the provider and model for a request, or `None` if no key is usable.
///
/// Malformed keys are silently treated as absent.
pub fn select_provider(
    credentials: &CredentialSet,
    preference: Preference,
    free_preference: &FreeModelPreference,
    roster: &FreeModelRoster,
) -> Option<ProviderChoice> {
    debug!(?preference, ?credentials, "selecting provider");

    let choose = |provider: ProviderKind| {
        credentials.usable(provider).map(|key| {
            let model = default_model_for(&provider)
                .map(str::to_string)
                .unwrap_or_else(|| free_preference.resolve(roster).to_string());
            ProviderChoice {
                provider,
                model,
                credential: key.to_string(),
            }
        })
    };

    if let Preference::Forced(provider) = preference {
        if let Some(choice) = choose(provider) {
            info!(provider = %choice.provider, model = %choice.model, "using preferred provider");
            return Some(choice);
        }
        debug!(%provider, "preferred provider has no usable key, falling back to priority order");
    }

    let choice = ProviderKind::PRIORITY.into_iter().find_map(choose);
    match &choice {
        Some(c) if c.provider.is_free_tier() => {
            info!(model = %c.model, "using OpenRouter free tier (no paid keys found)")
        }
        Some(c) => info!(provider = %c.provider, model = %c.model, "using paid provider"),
        None => info!("no usable API keys"),
    }
    choice
}

//! Provider and model listing.
//!
//! Shows each provider's default model and key status, which provider the
//! current settings would pick, and the free roster. Isolates display
//! concerns from the selection core.

use colored::Colorize;

use super::credentials::KeyStatus;
use super::kind::{default_model_for, ProviderKind};
use super::select::{select_provider, FreeModelPreference, Preference};
use crate::config::Config;
use crate::error::OptimizeError;

/// List providers and free models, marking the current selection.
pub fn list_models(config: &Config) -> Result<(), OptimizeError> {
    let credentials = config.credentials();
    let preference = Preference::parse(config.optimizer_name())?;
    let free_preference = config.free_model_preference();
    let roster = config.roster();
    let selected = select_provider(&credentials, preference, &free_preference, &roster);

    println!("Providers (auto order):\n");
    for provider in ProviderKind::PRIORITY {
        let model = default_model_for(&provider).unwrap_or("(free roster)");
        let status = match credentials.status(provider) {
            KeyStatus::Valid => "key ok".green(),
            KeyStatus::InvalidFormat => format!("invalid key, expected {}", provider.key_hint()).red(),
            KeyStatus::Missing => "no key".dimmed(),
        };
        let marker = match &selected {
            Some(c) if c.provider == provider => " (selected)".cyan().bold().to_string(),
            _ => String::new(),
        };
        println!("  {:<12} {:<22} {}{marker}", provider.name(), model, status);
    }

    println!("\nOpenRouter free roster ({} models):\n", roster.len());
    let preferred = free_preference.resolve(&roster);
    for (i, model) in roster.models().iter().enumerate() {
        let label = crate::models::free_model_label(model)
            .map(|l| format!(" {}", l.dimmed()))
            .unwrap_or_default();
        let marker = if model == preferred { " (first)" } else { "" };
        println!("  {}. {model}{label}{marker}", i + 1);
    }
    if let FreeModelPreference::Model(m) = &free_preference {
        if !roster.models().contains(m) {
            println!("  preferred: {m} (not in roster, tried first)");
        }
    }

    if selected.is_none() {
        println!();
        if credentials.has_any() {
            println!("{} keys are set but none has a recognised format", "warning:".yellow().bold());
        } else {
            println!("{} {}", "warning:".yellow().bold(), OptimizeError::NoUsableCredentials);
        }
    }
    Ok(())
}

//! LLM provider abstraction for acu.
//!
//! Covers the four supported providers ([`ProviderKind`]), the per-request
//! key set, the selection policy, and the [`Invoker`] capability that
//! actually calls a model. Anthropic, OpenAI, and Google are paid; OpenRouter
//! is used for its free tier.

mod client;
mod credentials;
mod kind;
mod listing;
mod select;

pub use client::{Invoker, RigInvoker};
pub use credentials::CredentialSet;
pub use kind::ProviderKind;
pub use listing::list_models;
pub use select::{select_provider, FreeModelPreference, Preference, ProviderChoice};

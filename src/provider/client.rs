//! Model invocation for acu.
//!
//! [`Invoker`] is the one capability the optimizer needs from the outside
//! world: call a provider's model with a system instruction and a user
//! message. [`RigInvoker`] implements it over rig-core's provider clients
//! behind enum dispatch, keeping provider-specific details out of the core.

use anyhow::{Context, Result};
use async_trait::async_trait;
use rig::client::CompletionClient;
use rig::completion::Prompt;
use rig::providers::{anthropic, gemini, openai, openrouter};

use super::kind::ProviderKind;

/// Calls a model and returns its full text response.
///
/// Each call is independent: implementations must not reuse state from a
/// previous call.
#[async_trait]
pub trait Invoker: Send + Sync {
    async fn invoke(
        &self,
        provider: ProviderKind,
        credential: &str,
        model: &str,
        system: &str,
        user: &str,
    ) -> Result<String>;
}

/// Internal enum wrapping provider-specific clients.
enum ClientKind {
    Anthropic(anthropic::Client),
    OpenAI(openai::Client),
    Google(gemini::Client),
    OpenRouter(openrouter::Client),
}

/// Dispatches an operation across provider-specific clients.
///
/// Matches on [`ClientKind`] and executes the same block for each variant,
/// letting the compiler monomorphize per provider.
macro_rules! dispatch {
    ($kind:expr, |$client:ident| $body:expr) => {
        match $kind {
            ClientKind::Anthropic($client) => $body,
            ClientKind::OpenAI($client) => $body,
            ClientKind::Google($client) => $body,
            ClientKind::OpenRouter($client) => $body,
        }
    };
}

impl ClientKind {
    /// Builds a fresh client for `provider` authenticated with `api_key`.
    fn connect(provider: ProviderKind, api_key: &str) -> Result<Self> {
        let client = match provider {
            ProviderKind::Anthropic => Self::Anthropic(
                anthropic::Client::new(api_key).context("Failed to create Anthropic client")?,
            ),
            ProviderKind::OpenAI => Self::OpenAI(
                openai::Client::new(api_key).context("Failed to create OpenAI client")?,
            ),
            ProviderKind::Google => Self::Google(
                gemini::Client::new(api_key).context("Failed to create Gemini client")?,
            ),
            ProviderKind::OpenRouter => Self::OpenRouter(
                openrouter::Client::new(api_key).context("Failed to create OpenRouter client")?,
            ),
        };
        Ok(client)
    }
}

/// Production [`Invoker`] backed by rig-core.
///
/// Clients and agents are built on every call since they are cheap to
/// create and every attempt must be independent.
pub struct RigInvoker {
    max_tokens: u64,
}

impl RigInvoker {
    pub fn new() -> Self {
        Self {
            max_tokens: crate::constants::MAX_TOKENS,
        }
    }
}

#[async_trait]
impl Invoker for RigInvoker {
    async fn invoke(
        &self,
        provider: ProviderKind,
        credential: &str,
        model: &str,
        system: &str,
        user: &str,
    ) -> Result<String> {
        let client = ClientKind::connect(provider, credential)?;
        let response = dispatch!(&client, |c| {
            let agent = c
                .agent(model)
                .preamble(system)
                .max_tokens(self.max_tokens)
                .build();
            agent.prompt(user).await
        });
        Ok(response?)
    }
}

//! Scripted [`Invoker`] for tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use crate::provider::{Invoker, ProviderKind};

#[derive(Debug, Clone)]
pub struct Call {
    pub provider: ProviderKind,
    pub credential: String,
    pub model: String,
    pub system: String,
    pub user: String,
}

enum Script {
    Reply(String),
    Stall(Duration),
}

/// Replies per model id; any model without a script fails.
#[derive(Default)]
pub struct ScriptedInvoker {
    scripts: HashMap<String, Script>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedInvoker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn succeed(mut self, model: &str, text: &str) -> Self {
        self.scripts.insert(model.to_string(), Script::Reply(text.to_string()));
        self
    }

    /// Sleeps before failing, for timeout tests.
    pub fn stall(mut self, model: &str, delay: Duration) -> Self {
        self.scripts.insert(model.to_string(), Script::Stall(delay));
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn models(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.model).collect()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl Invoker for ScriptedInvoker {
    async fn invoke(
        &self,
        provider: ProviderKind,
        credential: &str,
        model: &str,
        system: &str,
        user: &str,
    ) -> Result<String> {
        self.calls.lock().unwrap().push(Call {
            provider,
            credential: credential.to_string(),
            model: model.to_string(),
            system: system.to_string(),
            user: user.to_string(),
        });
        match self.scripts.get(model) {
            Some(Script::Reply(text)) => Ok(text.clone()),
            Some(Script::Stall(delay)) => {
                tokio::time::sleep(*delay).await;
                Err(anyhow!("stalled {model}"))
            }
            None => Err(anyhow!("scripted failure for {model}")),
        }
    }
}

//! Completion execution with free-tier fallback.
//!
//! One request runs as a small state machine:
//!
//! ```text
//! NotStarted -> (primary attempt) -> Succeeded
//!                                 -> PrimaryFailed -> Failed            (paid provider)
//!                                                  -> Fallback(0) -> Succeeded
//!                                                                 -> Fallback(1) -> ... -> Failed (exhausted)
//! ```
//!
//! Attempts are strictly sequential and each one is bounded by the attempt
//! timeout. Fallback candidates are the free roster in order, minus the model
//! the primary attempt already used.

use std::time::Duration;

use anyhow::anyhow;
use tracing::{debug, info, warn};

use crate::error::OptimizeError;
use crate::models::FreeModelRoster;
use crate::provider::{Invoker, ProviderChoice, ProviderKind};

/// Successful optimization output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    /// Raw generated text, returned verbatim.
    pub text: String,
    pub provider: ProviderKind,
    /// Model that produced `text`.
    pub model: String,
    /// Invocations made, including the successful one.
    pub attempts: usize,
}

#[derive(Debug)]
enum State {
    NotStarted,
    PrimaryFailed { error: String },
    Fallback { next: usize, last_error: String },
    Succeeded(Completion),
    Failed(OptimizeError),
}

/// Runs the primary attempt and, for the free tier, the roster fallback loop.
pub struct Executor<'a> {
    invoker: &'a dyn Invoker,
    roster: &'a FreeModelRoster,
    attempt_timeout: Duration,
}

impl<'a> Executor<'a> {
    pub fn new(invoker: &'a dyn Invoker, roster: &'a FreeModelRoster, attempt_timeout: Duration) -> Self {
        Self {
            invoker,
            roster,
            attempt_timeout,
        }
    }

    /// Invokes the chosen model, falling back across the free roster when eligible.
    ///
    /// Returns the first successful completion. Paid provider failures are
    /// returned after a single attempt.
    pub async fn execute(
        &self,
        choice: &ProviderChoice,
        system: &str,
        user: &str,
    ) -> Result<Completion, OptimizeError> {
        let candidates: Vec<String> = self
            .roster
            .fallbacks_after(&choice.model)
            .map(str::to_string)
            .collect();
        let mut attempts = 0;
        let mut state = State::NotStarted;

        loop {
            state = match state {
                State::NotStarted => {
                    attempts += 1;
                    match self.attempt(choice, &choice.model, system, user).await {
                        Ok(text) => State::Succeeded(self.completion(choice, &choice.model, text, attempts)),
                        Err(error) => {
                            warn!(provider = %choice.provider, model = %choice.model, %error, "primary attempt failed");
                            State::PrimaryFailed { error }
                        }
                    }
                }
                State::PrimaryFailed { error } => {
                    if fallback_eligible(choice) {
                        info!(candidates = candidates.len(), "trying OpenRouter fallback models");
                        State::Fallback {
                            next: 0,
                            last_error: error,
                        }
                    } else {
                        State::Failed(OptimizeError::Provider {
                            provider: choice.provider,
                            model: choice.model.clone(),
                            message: error,
                        })
                    }
                }
                State::Fallback { next, last_error } => match candidates.get(next) {
                    None => State::Failed(OptimizeError::FreeTierExhausted {
                        attempts,
                        last_error,
                    }),
                    Some(model) => {
                        attempts += 1;
                        info!(%model, "retrying with fallback model");
                        match self.attempt(choice, model, system, user).await {
                            Ok(text) => State::Succeeded(self.completion(choice, model, text, attempts)),
                            Err(error) => {
                                warn!(%model, %error, "fallback model failed");
                                State::Fallback {
                                    next: next + 1,
                                    last_error: error,
                                }
                            }
                        }
                    }
                },
                State::Succeeded(completion) => {
                    debug!(model = %completion.model, attempts, "completion succeeded");
                    return Ok(completion);
                }
                State::Failed(error) => return Err(error),
            };
        }
    }

    /// One bounded invocation. Failures are flattened to their message.
    async fn attempt(
        &self,
        choice: &ProviderChoice,
        model: &str,
        system: &str,
        user: &str,
    ) -> Result<String, String> {
        let call = self
            .invoker
            .invoke(choice.provider, &choice.credential, model, system, user);
        let result = match tokio::time::timeout(self.attempt_timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(anyhow!(
                "timed out after {}s",
                self.attempt_timeout.as_secs_f32()
            )),
        };
        result.map_err(|e| format!("{e:#}"))
    }

    fn completion(&self, choice: &ProviderChoice, model: &str, text: String, attempts: usize) -> Completion {
        Completion {
            text,
            provider: choice.provider,
            model: model.to_string(),
            attempts,
        }
    }
}

/// Only the free tier with a key in hand gets retried.
fn fallback_eligible(choice: &ProviderChoice) -> bool {
    choice.provider.is_free_tier() && !choice.credential.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimize::testing::ScriptedInvoker;

    const SYSTEM: &str = "system";
    const USER: &str = "user";

    fn choice(provider: ProviderKind, model: &str) -> ProviderChoice {
        ProviderChoice {
            provider,
            model: model.to_string(),
            credential: "key".to_string(),
        }
    }

    fn roster() -> FreeModelRoster {
        FreeModelRoster::new(["free/a", "free/b", "free/c", "free/d"])
    }

    #[tokio::test]
    async fn test_primary_success_makes_one_call() {
        let invoker = ScriptedInvoker::new().succeed("free/a", "done");
        let roster = roster();
        let exec = Executor::new(&invoker, &roster, Duration::from_secs(5));
        let out = exec
            .execute(&choice(ProviderKind::OpenRouter, "free/a"), SYSTEM, USER)
            .await
            .unwrap();
        assert_eq!(out.text, "done");
        assert_eq!(out.attempts, 1);
        assert_eq!(invoker.models(), vec!["free/a"]);
    }

    #[tokio::test]
    async fn test_paid_failure_is_not_retried() {
        let invoker = ScriptedInvoker::new().succeed("free/b", "unused");
        let roster = roster();
        let exec = Executor::new(&invoker, &roster, Duration::from_secs(5));
        let err = exec
            .execute(&choice(ProviderKind::OpenAI, "gpt-4.1"), SYSTEM, USER)
            .await
            .unwrap_err();
        assert!(matches!(err, OptimizeError::Provider { provider: ProviderKind::OpenAI, .. }));
        assert!(err.to_string().contains("scripted failure for gpt-4.1"));
        assert_eq!(invoker.call_count(), 1);
    }

    #[tokio::test]
    async fn test_fallback_in_roster_order_until_success() {
        // primary a fails, b fails, c succeeds: exactly three calls, in order
        let invoker = ScriptedInvoker::new()
            .succeed("free/c", "from c")
            .succeed("free/d", "from d");
        let roster = roster();
        let exec = Executor::new(&invoker, &roster, Duration::from_secs(5));
        let out = exec
            .execute(&choice(ProviderKind::OpenRouter, "free/a"), SYSTEM, USER)
            .await
            .unwrap();
        assert_eq!(out.text, "from c");
        assert_eq!(out.model, "free/c");
        assert_eq!(out.attempts, 3);
        assert_eq!(invoker.models(), vec!["free/a", "free/b", "free/c"]);
    }

    #[tokio::test]
    async fn test_every_attempt_gets_same_inputs() {
        let invoker = ScriptedInvoker::new().succeed("free/b", "ok");
        let roster = roster();
        let exec = Executor::new(&invoker, &roster, Duration::from_secs(5));
        exec.execute(&choice(ProviderKind::OpenRouter, "free/a"), SYSTEM, USER)
            .await
            .unwrap();
        for call in invoker.calls() {
            assert_eq!(call.provider, ProviderKind::OpenRouter);
            assert_eq!(call.system, SYSTEM);
            assert_eq!(call.user, USER);
        }
    }

    #[tokio::test]
    async fn test_exhaustion() {
        let invoker = ScriptedInvoker::new();
        let roster = roster();
        let exec = Executor::new(&invoker, &roster, Duration::from_secs(5));
        let err = exec
            .execute(&choice(ProviderKind::OpenRouter, "free/a"), SYSTEM, USER)
            .await
            .unwrap_err();
        match &err {
            OptimizeError::FreeTierExhausted { attempts, last_error } => {
                assert_eq!(*attempts, 4);
                assert!(last_error.contains("free/d"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.to_string().contains("Tried all alternatives"));
        assert_eq!(invoker.models(), vec!["free/a", "free/b", "free/c", "free/d"]);
    }

    #[tokio::test]
    async fn test_non_default_primary_is_not_retried() {
        let invoker = ScriptedInvoker::new();
        let roster = roster();
        let exec = Executor::new(&invoker, &roster, Duration::from_secs(5));
        exec.execute(&choice(ProviderKind::OpenRouter, "free/c"), SYSTEM, USER)
            .await
            .unwrap_err();
        assert_eq!(invoker.models(), vec!["free/c", "free/a", "free/b", "free/d"]);
    }

    #[tokio::test]
    async fn test_empty_credential_is_terminal() {
        let invoker = ScriptedInvoker::new().succeed("free/b", "unused");
        let roster = roster();
        let exec = Executor::new(&invoker, &roster, Duration::from_secs(5));
        let mut c = choice(ProviderKind::OpenRouter, "free/a");
        c.credential = String::new();
        let err = exec.execute(&c, SYSTEM, USER).await.unwrap_err();
        assert!(matches!(err, OptimizeError::Provider { .. }));
        assert_eq!(invoker.call_count(), 1);
    }

    #[tokio::test]
    async fn test_timeout_counts_as_failure() {
        let invoker = ScriptedInvoker::new()
            .stall("free/a", Duration::from_secs(30))
            .succeed("free/b", "fast");
        let roster = roster();
        let exec = Executor::new(&invoker, &roster, Duration::from_millis(50));
        let out = exec
            .execute(&choice(ProviderKind::OpenRouter, "free/a"), SYSTEM, USER)
            .await
            .unwrap();
        assert_eq!(out.text, "fast");
        assert_eq!(out.attempts, 2);
    }

    #[tokio::test]
    async fn test_paid_timeout_message() {
        let invoker = ScriptedInvoker::new().stall("claude-sonnet-4-5", Duration::from_secs(30));
        let roster = roster();
        let exec = Executor::new(&invoker, &roster, Duration::from_millis(20));
        let err = exec
            .execute(&choice(ProviderKind::Anthropic, "claude-sonnet-4-5"), SYSTEM, USER)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("timed out"));
    }
}

//! Error taxonomy for an optimization request.
//!
//! Every request ends in either a completion or one of these. [`ErrorClass`]
//! lets a front-end tell "fix your keys" apart from "the service is degraded".

use thiserror::Error;

use crate::provider::ProviderKind;

/// Terminal failure of an optimization request.
#[derive(Debug, Error)]
pub enum OptimizeError {
    /// No provider had a usable key under the given preference.
    #[error("No valid API keys found. Add one with `acu config set provider.<name>.api_key <key>` or set <PROVIDER>_API_KEY")]
    NoUsableCredentials,

    /// Missing or malformed input. Raised before any model is called.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// A single-shot invocation failed and was not eligible for fallback.
    #[error("{provider} ({model}) failed: {message}")]
    Provider {
        provider: ProviderKind,
        model: String,
        message: String,
    },

    /// The free-tier primary attempt and every roster alternative failed.
    #[error("Free model unavailable. Tried all alternatives ({attempts} attempts, last error: {last_error}). Pick another free model or use a paid key for reliability.")]
    FreeTierExhausted { attempts: usize, last_error: String },
}

/// Coarse classification a transport maps to a status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    Unauthorized,
    BadRequest,
    Upstream,
    Unavailable,
}

impl OptimizeError {
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::NoUsableCredentials => ErrorClass::Unauthorized,
            Self::InvalidRequest(_) => ErrorClass::BadRequest,
            Self::Provider { .. } => ErrorClass::Upstream,
            Self::FreeTierExhausted { .. } => ErrorClass::Unavailable,
        }
    }

    /// HTTP-style status for the error class.
    pub fn status_code(&self) -> u16 {
        match self.class() {
            ErrorClass::Unauthorized => 401,
            ErrorClass::BadRequest => 400,
            ErrorClass::Upstream => 500,
            ErrorClass::Unavailable => 503,
        }
    }
}

impl ErrorClass {
    /// One-line hint on what the user should do next.
    pub fn hint(&self) -> &'static str {
        match self {
            Self::Unauthorized => "check your API keys (`acu models` shows their status)",
            Self::BadRequest => "fix the request and try again",
            Self::Upstream => "the provider rejected the call; check the key, quota, or try another provider",
            Self::Unavailable => "free models are degraded; try again, pick another free model, or add a paid key",
        }
    }
}

//! Centralized constants for acu.
//!
//! All magic numbers, default strings, and configuration constants live here
//! so they can be changed in one place.

/// Application name used in CLI output and directory paths.
pub const APP_NAME: &str = "acu";

/// Maximum tokens for LLM completions.
pub const MAX_TOKENS: u64 = 4096;

/// Configuration filename.
pub const CONFIG_FILENAME: &str = "config.toml";

/// Per-project configuration filename.
pub const PROJECT_CONFIG_FILENAME: &str = "acu.toml";

/// History filename under the data directory.
pub const HISTORY_FILENAME: &str = "history.json";

// --- Provider defaults ---

/// Default model for Anthropic.
pub const DEFAULT_ANTHROPIC_MODEL: &str = "claude-sonnet-4-5";

/// Default model for OpenAI.
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4.1";

/// Default model for Google.
pub const DEFAULT_GOOGLE_MODEL: &str = "gemini-2.5-pro";

/// Preference value meaning "pick for me".
pub const AUTO: &str = "auto";

// --- Request defaults ---

/// Target model label used when none is given on the command line.
pub const DEFAULT_TARGET_MODEL: &str = "Claude 3.5 Sonnet";

/// Target label used by `acu check`.
pub const CHECK_TARGET_MODEL: &str = "Test";

/// Prompt used by `acu check`.
pub const CHECK_PROMPT: &str = "Say hello.";

/// Upper bound on a single model invocation, in seconds.
pub const ATTEMPT_TIMEOUT_SECS_DEFAULT: u64 = 60;

// --- History ---

/// Whether optimizations are recorded by default.
pub const HISTORY_ENABLED_DEFAULT: bool = true;

/// Default number of history entries kept.
pub const HISTORY_LIMIT_DEFAULT: usize = 50;

/// Characters of the original prompt shown in history listings.
pub const HISTORY_TITLE_CHARS: usize = 50;

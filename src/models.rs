//! Centralized model registry for acu.
//!
//! Holds the OpenRouter free-tier roster. Order is priority: the first entry
//! is the default free model, the rest are fallback candidates in the order
//! they are tried.

/// Information about a known free model.
pub struct ModelInfo {
    /// The OpenRouter model identifier.
    pub name: &'static str,
    /// Short human-readable label.
    pub label: &'static str,
}

/// Built-in OpenRouter free-tier roster.
pub const FREE_MODELS: &[ModelInfo] = &[
    ModelInfo {
        name: "arcee-ai/trinity-large-preview:free",
        label: "Trinity Large Preview",
    },
    ModelInfo {
        name: "z.ai/glm-4.5-air:free",
        label: "GLM 4.5 Air",
    },
    ModelInfo {
        name: "tngtech/deepseek-r1t2-chimera:free",
        label: "DeepSeek Chimera",
    },
    ModelInfo {
        name: "liquid/lfm-2.5-1.2b-instruct:free",
        label: "Liquid LFM",
    },
];

/// Returns the label for a roster model, if it is a built-in one.
pub fn free_model_label(name: &str) -> Option<&'static str> {
    FREE_MODELS.iter().find(|m| m.name == name).map(|m| m.label)
}

/// Ordered, non-empty list of free-tier model identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FreeModelRoster {
    models: Vec<String>,
}

impl FreeModelRoster {
    /// Builds a roster from a configured list.
    ///
    /// Blank entries and repeats are dropped, keeping first-seen order. An
    /// empty result falls back to the built-in roster so index 0 always exists.
    pub fn new<I, S>(models: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut deduped: Vec<String> = Vec::new();
        for model in models {
            let model: String = model.into();
            let model = model.trim();
            if !model.is_empty() && !deduped.iter().any(|m| m == model) {
                deduped.push(model.to_string());
            }
        }
        let models = deduped;
        if models.is_empty() {
            Self::default()
        } else {
            Self { models }
        }
    }

    /// The default free model (roster index 0).
    pub fn primary(&self) -> &str {
        &self.models[0]
    }

    pub fn models(&self) -> &[String] {
        &self.models
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    /// Roster entries to try after `attempted` failed, in roster order.
    pub fn fallbacks_after(&self, attempted: &str) -> impl Iterator<Item = &str> + '_ {
        let attempted = attempted.to_string();
        self.models
            .iter()
            .map(String::as_str)
            .filter(move |m| *m != attempted)
    }
}

impl Default for FreeModelRoster {
    fn default() -> Self {
        Self {
            models: FREE_MODELS.iter().map(|m| m.name.to_string()).collect(),
        }
    }
}

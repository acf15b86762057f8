//! Optimization history for acu.
//!
//! Every successful optimization is stored in `~/.local/share/acu/history.json`,
//! newest first, capped at the configured limit. The file is a plain JSON
//! array so it stays human-readable.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One stored optimization.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HistoryItem {
    pub id: String,
    /// RFC3339 timestamp.
    pub created_at: String,
    pub original_prompt: String,
    pub target_model: String,
    /// Full generated text as returned by the model.
    pub optimized_prompt: String,
    /// `provider/model` that produced it.
    #[serde(default)]
    pub generated_by: Option<String>,
}

impl HistoryItem {
    /// The original prompt shortened to a single-line title.
    pub fn title(&self, max_chars: usize) -> String {
        let line = self.original_prompt.lines().next().unwrap_or_default().trim();
        if line.chars().count() > max_chars {
            let truncated: String = line.chars().take(max_chars.saturating_sub(3)).collect();
            format!("{}...", truncated)
        } else {
            line.to_string()
        }
    }
}

/// History file handle.
pub struct History {
    path: PathBuf,
    limit: usize,
}

impl History {
    pub fn open(path: impl Into<PathBuf>, limit: usize) -> Self {
        Self {
            path: path.into(),
            limit: limit.max(1),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns all entries, newest first. A missing file is an empty history.
    pub fn list(&self) -> Result<Vec<HistoryItem>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read history from {:?}", self.path))?;
        if contents.trim().is_empty() {
            return Ok(Vec::new());
        }
        let items: Vec<HistoryItem> = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse history at {:?}", self.path))?;
        Ok(items)
    }

    /// Prepends a new entry and trims the oldest beyond the limit.
    pub fn add(
        &self,
        original_prompt: &str,
        target_model: &str,
        optimized_prompt: &str,
        generated_by: Option<String>,
    ) -> Result<HistoryItem> {
        let item = HistoryItem {
            id: Uuid::new_v4().to_string(),
            created_at: Utc::now().to_rfc3339(),
            original_prompt: original_prompt.to_string(),
            target_model: target_model.to_string(),
            optimized_prompt: optimized_prompt.to_string(),
            generated_by,
        };
        let mut items = self.list()?;
        items.insert(0, item.clone());
        items.truncate(self.limit);
        self.save(&items)?;
        Ok(item)
    }

    /// Removes an entry by full id. Returns whether anything was removed.
    pub fn remove(&self, id: &str) -> Result<bool> {
        let mut items = self.list()?;
        let before = items.len();
        items.retain(|i| i.id != id);
        if items.len() == before {
            return Ok(false);
        }
        self.save(&items)?;
        Ok(true)
    }

    /// Deletes the history file.
    pub fn clear(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)
                .with_context(|| format!("Failed to delete history file {:?}", self.path))?;
        }
        Ok(())
    }

    /// Resolves a partial id (git-style prefix) to a single entry.
    pub fn find(&self, partial: &str) -> Result<HistoryItem> {
        let items = self.list()?;
        let matches: Vec<_> = items.iter().filter(|i| i.id.starts_with(partial)).collect();
        match matches.len() {
            0 => anyhow::bail!("No history entry found matching '{}'", partial),
            1 => Ok(matches[0].clone()),
            n => anyhow::bail!(
                "{} history entries match '{}'. Provide more characters to disambiguate",
                n,
                partial
            ),
        }
    }

    fn save(&self, items: &[HistoryItem]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).context("Failed to create data directory")?;
        }
        let json = serde_json::to_string_pretty(items)?;
        fs::write(&self.path, json)
            .with_context(|| format!("Failed to write history to {:?}", self.path))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history(limit: usize) -> (tempfile::TempDir, History) {
        let dir = tempfile::tempdir().unwrap();
        let h = History::open(dir.path().join("data").join("history.json"), limit);
        (dir, h)
    }

    #[test]
    fn test_empty_when_missing() {
        let (_dir, h) = history(10);
        assert!(h.list().unwrap().is_empty());
        h.clear().unwrap();
    }

    #[test]
    fn test_add_prepends() {
        let (_dir, h) = history(10);
        h.add("first", "GPT-4o", "out1", None).unwrap();
        let second = h
            .add("second", "Claude 3.5 Sonnet", "out2", Some("anthropic/claude-sonnet-4-5".into()))
            .unwrap();
        let items = h.list().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0], second);
        assert_eq!(items[1].original_prompt, "first");
    }

    #[test]
    fn test_limit_drops_oldest() {
        let (_dir, h) = history(2);
        h.add("a", "t", "o", None).unwrap();
        h.add("b", "t", "o", None).unwrap();
        h.add("c", "t", "o", None).unwrap();
        let prompts: Vec<_> = h.list().unwrap().into_iter().map(|i| i.original_prompt).collect();
        assert_eq!(prompts, vec!["c", "b"]);
    }

    #[test]
    fn test_remove_and_clear() {
        let (_dir, h) = history(10);
        let a = h.add("a", "t", "o", None).unwrap();
        h.add("b", "t", "o", None).unwrap();
        assert!(h.remove(&a.id).unwrap());
        assert!(!h.remove(&a.id).unwrap());
        assert_eq!(h.list().unwrap().len(), 1);
        h.clear().unwrap();
        assert!(h.list().unwrap().is_empty());
        assert!(!h.path().exists());
    }

    #[test]
    fn test_find_by_prefix() {
        let (_dir, h) = history(10);
        let a = h.add("a", "t", "o", None).unwrap();
        assert_eq!(h.find(&a.id[..8]).unwrap().id, a.id);
        assert!(h.find("zzzzzzzz-not-an-id").is_err());
    }

    #[test]
    fn test_title() {
        let item = HistoryItem {
            id: "x".into(),
            created_at: String::new(),
            original_prompt: "Write an email to my boss asking for a raise\nsecond line".into(),
            target_model: "GPT-4o".into(),
            optimized_prompt: String::new(),
            generated_by: None,
        };
        assert_eq!(item.title(100), "Write an email to my boss asking for a raise");
        assert_eq!(item.title(10), "Write a...");
    }
}

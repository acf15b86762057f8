//! History CLI operations for acu.
//!
//! Handles listing, showing, and deleting past optimizations through the
//! `acu history` subcommand family. Provides table-formatted output
//! and partial ID matching (git-style short IDs).

use anyhow::Result;
use colored::Colorize;

use super::HistoryAction;
use crate::config::Config;
use crate::constants::HISTORY_TITLE_CHARS;
use crate::format;
use crate::history::History;

/// Dispatches a history subcommand to its handler.
pub(crate) fn handle_history(action: HistoryAction) -> Result<()> {
    let config = Config::load()?;
    let store = History::open(Config::history_path()?, config.history_limit());
    match action {
        HistoryAction::List => history_list(&store),
        HistoryAction::Show { id } => {
            let item = store.find(&id)?;
            println!("{} {}", "id:".dimmed(), item.id);
            println!("{} {}", "target:".dimmed(), item.target_model.yellow());
            if let Some(by) = &item.generated_by {
                println!("{} {}", "by:".dimmed(), by);
            }
            println!();
            println!("{}", "Original".bold());
            println!("{}", item.original_prompt);
            println!();
            println!("{}", format::render_markdown_lite(&item.optimized_prompt));
            Ok(())
        }
        HistoryAction::Remove { id } => {
            let item = store.find(&id)?;
            store.remove(&item.id)?;
            println!(
                "Removed {} (\"{}\")",
                short_id(&item.id).cyan(),
                item.title(HISTORY_TITLE_CHARS)
            );
            Ok(())
        }
        HistoryAction::Clear => {
            store.clear()?;
            println!("{} {}", "History cleared:".green(), store.path().display());
            Ok(())
        }
    }
}

/// Lists history entries in a formatted table, newest first.
///
/// Adapts the prompt column to the terminal width.
fn history_list(store: &History) -> Result<()> {
    let items = store.list()?;
    if items.is_empty() {
        println!("{}", "No history yet.".dimmed());
        println!("Start with: {}", "acu optimize \"your prompt\"".cyan());
        return Ok(());
    }

    let term_width = terminal_size::terminal_size()
        .map(|(w, _)| w.0 as usize)
        .unwrap_or(80);

    // Fixed column widths: ID=10, WHEN=18, TARGET=20
    let fixed_cols = 10 + 18 + 20;
    let max_title_len = items
        .iter()
        .map(|i| i.title(HISTORY_TITLE_CHARS).chars().count())
        .max()
        .unwrap_or(6);
    let title_width = max_title_len
        .max(6)
        .min(term_width.saturating_sub(fixed_cols).max(10));

    println!(
        "{} {} {} {}",
        format!("{:<10}", "ID").bold(),
        format!("{:<18}", "WHEN").bold(),
        format!("{:<20}", "TARGET").bold(),
        "PROMPT".bold(),
    );
    println!("{}", "-".repeat(term_width.min(fixed_cols + title_width + 3)));

    for item in &items {
        let when = chrono::DateTime::parse_from_rfc3339(&item.created_at)
            .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|_| item.created_at.chars().take(16).collect());

        // Pad first, then colorize to avoid ANSI escape code width issues
        let id_col = format!("{:<10}", short_id(&item.id));
        let when_col = format!("{:<18}", when);
        let target_col = format!("{:<20}", truncate(&item.target_model, 19));

        println!(
            "{} {} {} {}",
            id_col.cyan(),
            when_col.dimmed(),
            target_col.yellow(),
            item.title(title_width),
        );
    }
    println!();
    println!(
        "{} {} entries. Show one with: {}",
        "total:".dimmed(),
        items.len(),
        "acu history show <id>".cyan()
    );
    Ok(())
}

/// First eight characters of an id, as shown in listings.
fn short_id(id: &str) -> String {
    id.chars().take(8).collect()
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() > max {
        let head: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{head}...")
    } else {
        s.to_string()
    }
}

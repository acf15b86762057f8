//! Command-line interface definition and dispatch for acu.
//!
//! Uses [`clap`] for argument parsing with derive macros. Each subcommand is
//! routed to its handler; history operations live in the [`history`] submodule.

mod history;

use crate::{config, constants, error::OptimizeError, format, optimize, provider, tokens};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::io::Read;

/// Top-level CLI structure for acu.
#[derive(Parser)]
#[command(name = "acu", about = "Rewrite rough prompts for a specific LLM")]
pub struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands for the acu CLI.
#[derive(Subcommand)]
pub enum Commands {
    /// Optimize a prompt for a target model
    Optimize {
        /// The rough prompt (use `-` to read it from stdin)
        prompt: Vec<String>,
        /// Model family the prompt is for (e.g. "GPT-4o", "Gemini 2.5 Pro")
        #[arg(short, long, default_value = constants::DEFAULT_TARGET_MODEL)]
        target: String,
        /// Extra context: tone, format, requirements
        #[arg(short, long)]
        details: Option<String>,
        #[command(flatten)]
        choice: ChoiceArgs,
        /// Print the model's reply without terminal styling
        #[arg(long)]
        raw: bool,
        /// Print only the optimized prompt section
        #[arg(long, conflicts_with = "raw")]
        prompt_only: bool,
        /// Do not record this run in history
        #[arg(long)]
        no_history: bool,
    },
    /// Test that the configured keys can reach a model
    Check {
        #[command(flatten)]
        choice: ChoiceArgs,
    },
    /// List providers, key status, and free models
    Models,
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Browse past optimizations
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },
}

/// Per-run overrides of the configured provider preferences.
#[derive(clap::Args)]
pub struct ChoiceArgs {
    /// Optimizer to use (auto, claude, openai, gemini, openrouter)
    #[arg(short, long)]
    pub prefer: Option<String>,
    /// Free OpenRouter model to try first (or auto)
    #[arg(long)]
    pub free_model: Option<String>,
}

/// Subcommands for the `config` command.
#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current config (keys redacted)
    Show,
    /// Set a config value
    Set { key: String, value: String },
}

/// Subcommands for the `history` command.
#[derive(Subcommand)]
pub enum HistoryAction {
    /// List past optimizations
    List,
    /// Show one entry by ID (supports partial IDs)
    Show { id: String },
    /// Remove one entry by ID (supports partial IDs)
    Remove { id: String },
    /// Delete all history
    Clear,
}

/// Parses command-line arguments into a [`Cli`] struct.
pub fn parse() -> Cli {
    Cli::parse()
}

/// Dispatches the parsed CLI command to its handler.
pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Optimize {
            prompt,
            target,
            details,
            choice,
            raw,
            prompt_only,
            no_history,
        } => {
            let original_prompt = read_prompt(prompt)?;
            let config = config::Config::load()?;
            let settings = settings_for(&config, &choice)?;
            let request = optimize::OptimizeRequest {
                original_prompt,
                target_model: target,
                additional_details: details,
            };

            if let Some(c) = settings.choice() {
                eprintln!(
                    "{} [target: {}] [optimizer: {}/{}]",
                    "acu".bold().cyan(),
                    request.target_model.yellow(),
                    c.provider,
                    c.model.yellow(),
                );
            }

            let invoker = provider::RigInvoker::new();
            let completion = optimize::optimize(&invoker, &settings, &request)
                .await
                .map_err(report)?;

            if prompt_only {
                println!("{}", format::extract_optimized_prompt(&completion.text));
            } else if raw {
                println!("{}", completion.text);
            } else {
                println!();
                println!("{}", format::render_markdown_lite(&completion.text));
                println!();
            }

            let token_note = tokens::count_tokens(format::extract_optimized_prompt(&completion.text))
                .map(|n| format!(", ~{} tokens", tokens::format_number(n)))
                .unwrap_or_default();
            eprintln!(
                "{}",
                format!(
                    "[{}/{}, {} attempt{}{}]",
                    completion.provider,
                    completion.model,
                    completion.attempts,
                    if completion.attempts == 1 { "" } else { "s" },
                    token_note,
                )
                .dimmed()
            );

            if !no_history && config.history_enabled() {
                let store = crate::history::History::open(
                    config::Config::history_path()?,
                    config.history_limit(),
                );
                store.add(
                    &request.original_prompt,
                    &request.target_model,
                    &completion.text,
                    Some(format!("{}/{}", completion.provider, completion.model)),
                )?;
            }
            Ok(())
        }
        Commands::Check { choice } => {
            let config = config::Config::load()?;
            let settings = settings_for(&config, &choice)?;
            let selected = settings.choice().ok_or_else(|| report(OptimizeError::NoUsableCredentials))?;
            println!(
                "Testing {} ({})...",
                selected.provider.to_string().bold(),
                selected.model
            );

            let request = optimize::OptimizeRequest {
                original_prompt: constants::CHECK_PROMPT.to_string(),
                target_model: constants::CHECK_TARGET_MODEL.to_string(),
                additional_details: None,
            };
            let invoker = provider::RigInvoker::new();
            let completion = optimize::optimize(&invoker, &settings, &request)
                .await
                .map_err(report)?;
            println!(
                "{} {}/{} answered after {} attempt(s)",
                "ok:".green().bold(),
                completion.provider,
                completion.model,
                completion.attempts
            );
            Ok(())
        }
        Commands::Models => {
            let config = config::Config::load()?;
            provider::list_models(&config).map_err(report)
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => {
                let config = config::Config::load()?;
                let path = config::Config::config_path()?;
                println!("{} {}", "Config path:".bold(), path.display());
                println!();
                let toml_str = toml::to_string_pretty(&config.redacted())?;
                println!("{}", toml_str);
                Ok(())
            }
            ConfigAction::Set { key, value } => {
                let path = config::Config::set_global_value(&key, &value)?;
                let shown = if key.ends_with("api_key") { "(hidden)" } else { value.as_str() };
                println!("{} {} = {} in {}", "set".green(), key.bold(), shown, path.display());
                Ok(())
            }
        },
        Commands::History { action } => history::handle_history(action),
    }
}

/// Joins prompt words, or reads stdin when the prompt is `-`.
fn read_prompt(words: Vec<String>) -> Result<String> {
    if words.len() == 1 && words[0] == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read prompt from stdin")?;
        return Ok(buf.trim().to_string());
    }
    let prompt = words.join(" ");
    if prompt.trim().is_empty() {
        anyhow::bail!("No prompt provided. Usage: acu optimize \"your rough prompt\" --target \"GPT-4o\"");
    }
    Ok(prompt)
}

fn settings_for(config: &config::Config, choice: &ChoiceArgs) -> Result<optimize::Settings> {
    optimize::Settings::from_config(config, choice.prefer.as_deref(), choice.free_model.as_deref())
        .map_err(report)
}

/// Prints the hint for an optimization failure and converts it for `main`.
fn report(err: OptimizeError) -> anyhow::Error {
    let class = err.class();
    eprintln!(
        "{} {}",
        format!("[{}]", err.status_code()).red().bold(),
        class.hint().dimmed()
    );
    err.into()
}

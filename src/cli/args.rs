//! Clap argument types.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// AI-powered code review CLI.
#[derive(Parser, Debug)]
#[command(
    name = "critiq",
    version = critiq::constants::VERSION,
    about = "AI-powered code review CLI",
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(clap::Subcommand, Debug)]
pub enum Command {
    /// Review a source file.
    Review(Box<ReviewArgs>),

    /// Manage the result cache.
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },

    /// List languages recognized by extension.
    Languages,

    /// Print version information.
    Version,
}

/// Cache management subcommands.
#[derive(clap::Subcommand, Debug)]
pub enum CacheAction {
    /// Remove all cached review results.
    Clear,
    /// Show cache statistics (entry count and size).
    Stats,
    /// Print the cache directory path.
    Path,
}

/// Output formats for the review result.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// Colored, human-readable terminal output.
    Terminal,
    /// Machine-readable JSON.
    Json,
    /// A Markdown report.
    Markdown,
}

/// Arguments for the `review` subcommand.
#[derive(Parser, Debug)]
pub struct ReviewArgs {
    /// Source file to review.
    pub file: PathBuf,

    /// Language display name (default: detected from the file extension).
    #[arg(long)]
    pub language: Option<String>,

    /// Comma-separated focus areas, e.g. security,performance.
    #[arg(long, value_delimiter = ',')]
    pub focus: Vec<String>,

    /// Output format.
    #[arg(long, default_value = "terminal")]
    pub format: OutputFormat,

    /// Write the rendered output to a file instead of stdout.
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Skip the result cache for this run.
    #[arg(long, default_value_t = false)]
    pub no_cache: bool,

    /// Override the token budget for the code portion of the prompt.
    #[arg(long)]
    pub token_budget: Option<usize>,

    /// LLM provider: gemini, anthropic, openai, openai-compatible.
    #[arg(long)]
    pub provider: Option<String>,

    /// Model identifier (provider-specific).
    #[arg(long)]
    pub model: Option<String>,

    /// API key (overrides config and environment).
    #[arg(long)]
    pub api_key: Option<String>,

    /// Base URL for openai-compatible providers.
    #[arg(long)]
    pub base_url: Option<String>,

    /// Suppress status output on stderr.
    #[arg(long, default_value_t = false)]
    pub quiet: bool,
}

//! critiq, an AI-powered code review CLI.
//!
//! Entry point and error handling boundary. Uses `anyhow` for
//! ergonomic error propagation and user-facing messages.

mod cli;

use critiq::cache;
use critiq::compress;
use critiq::config;
use critiq::constants;
use critiq::env;
use critiq::language;
use critiq::models;
use critiq::orchestrator;
use critiq::output;
use critiq::progress;
use critiq::providers;

use std::process;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::Parser;
use colored::Colorize;

use cache::CacheEngine;
use cli::args::{CacheAction, Cli, Command, OutputFormat, ReviewArgs};
use config::Config;
use env::Env;
use models::{ProviderName, ReviewRequest};
use orchestrator::ReviewOrchestrator;
use output::json::JsonRenderer;
use output::markdown::MarkdownRenderer;
use output::terminal::TerminalRenderer;
use output::OutputRenderer;
use progress::StatusReporter;
use providers::rig::RigProvider;

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("Error: {err:#}");
        process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Review(args) => run_review(*args).await,
        Command::Cache { action } => run_cache(action),
        Command::Languages => run_languages(),
        Command::Version => run_version(),
    }
}

/// Run a code review on a single file.
async fn run_review(args: ReviewArgs) -> Result<()> {
    let code = tokio::fs::read_to_string(&args.file)
        .await
        .with_context(|| format!("failed to read {}", args.file.display()))?;

    if code.trim().is_empty() {
        bail!("{} is empty — nothing to review", args.file.display());
    }

    let env = Env::real();
    let working_dir = std::env::current_dir().ok();
    let mut config =
        Config::load(working_dir.as_deref(), &env).context("failed to load configuration")?;
    apply_cli_overrides(&mut config, &args)?;

    let language = match args.language {
        Some(ref lang) => lang.clone(),
        None => language::detect_language(args.file.to_str(), &code),
    };

    // Pre-compression guard against pathological inputs
    let (code, truncated) = compress::truncate_code(&code, constants::MAX_CODE_CHARS);
    if truncated {
        eprintln!(
            "  {} {}",
            "⚠".yellow().bold(),
            format!(
                "input exceeds {} characters; reviewing the leading portion only",
                constants::MAX_CODE_CHARS
            )
            .yellow()
        );
    }

    let focus = if args.focus.is_empty() {
        config.review.focus.clone()
    } else {
        args.focus.clone()
    };

    let request = ReviewRequest::new(code, language, focus, config.review.token_budget);

    let provider =
        RigProvider::new(config.provider.clone()).context("provider configuration error")?;
    let cache_enabled = config.cache.enabled && !args.no_cache;
    let cache = CacheEngine::new(cache_enabled, config.cache.ttl_secs);
    let status = Arc::new(StatusReporter::new(!args.quiet));

    let orchestrator = ReviewOrchestrator::new(Arc::new(provider), cache, status);
    let outcome = orchestrator.review(&request).await;

    let rendered = match args.format {
        OutputFormat::Terminal => TerminalRenderer.render(&outcome),
        OutputFormat::Json => JsonRenderer.render(&outcome),
        OutputFormat::Markdown => MarkdownRenderer.render(&outcome),
    };

    match args.output {
        Some(ref path) => {
            tokio::fs::write(path, &rendered)
                .await
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("Report written to {}", path.display());
        }
        None => print!("{rendered}"),
    }

    if outcome.error.is_some() {
        process::exit(1);
    }

    Ok(())
}

/// Merge CLI flags into the loaded config (highest priority layer).
fn apply_cli_overrides(config: &mut Config, args: &ReviewArgs) -> Result<()> {
    if let Some(ref provider) = args.provider {
        config.provider.name = provider
            .parse::<ProviderName>()
            .map_err(|e| anyhow::anyhow!(e))?;
    }
    if let Some(ref model) = args.model {
        config.provider.model = model.clone();
    }
    if let Some(ref api_key) = args.api_key {
        config.provider.api_key = Some(api_key.clone());
    }
    if let Some(ref base_url) = args.base_url {
        config.provider.base_url = Some(base_url.clone());
    }
    if let Some(budget) = args.token_budget {
        config.review.token_budget = budget;
    }
    Ok(())
}

/// Manage the result cache.
fn run_cache(action: CacheAction) -> Result<()> {
    let engine = CacheEngine::new(true, constants::DEFAULT_CACHE_TTL_SECS);

    match action {
        CacheAction::Clear => {
            let stats = engine.clear().context("failed to clear cache")?;
            println!(
                "Cleared {} cached entry/entries ({}).",
                stats.entries,
                stats.human_size(),
            );
        }
        CacheAction::Stats => {
            let stats = engine.stats().context("failed to read cache stats")?;
            println!("Cache entries: {}", stats.entries);
            println!("Cache size:    {}", stats.human_size());
        }
        CacheAction::Path => match engine.path() {
            Some(p) => println!("{}", p.display()),
            None => bail!("cache directory could not be determined"),
        },
    }

    Ok(())
}

/// List languages recognized by extension.
fn run_languages() -> Result<()> {
    for (ext, name) in language::known_languages() {
        println!("  {}  {}", format!("{ext:<7}").bold(), name);
    }
    Ok(())
}

/// Print version information.
fn run_version() -> Result<()> {
    println!("{} {}", constants::APP_NAME.bold(), constants::VERSION.green().bold());
    Ok(())
}

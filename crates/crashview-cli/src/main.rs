#![deny(unsafe_code)]

//! crashview CLI: inspect stack traces and render error pages offline.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::io::AsyncReadExt;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crashview_config::AppConfig;
use crashview_core::{
    ErrorHandler, RaisedError, SourceExtractor, SourceResolver, SourceWindow, StackTrace,
};

/// crashview: developer error pages from raw stack traces.
#[derive(Parser)]
#[command(name = "crashview", version, about, long_about = None)]
struct Cli {
    /// Path to configuration file.
    #[arg(short, long, default_value = "crashview.toml")]
    config: PathBuf,

    /// Increase log verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a stack trace and print its frames as JSON.
    Frames {
        /// File containing the stack text, or `-` for stdin.
        input: String,
    },

    /// Print the source window around the first resolvable frame.
    Snippet {
        /// File containing the stack text, or `-` for stdin.
        input: String,

        /// Lines of context on each side (overrides the config).
        #[arg(short, long)]
        radius: Option<usize>,
    },

    /// Render the HTML error page for a stack trace.
    Render {
        /// File containing the stack text, or `-` for stdin.
        input: String,

        /// Error class name.
        #[arg(long = "type", default_value = "Error")]
        type_name: String,

        /// Error message.
        #[arg(long, default_value = "")]
        message: String,

        /// HTTP status shown on the page.
        #[arg(long)]
        status: Option<u16>,

        /// Write the page here instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate and display configuration.
    Config {
        /// Show the resolved configuration.
        #[arg(long)]
        show: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let (config, from_file) = load_config(&cli.config).await?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(log_level(cli.verbose, &config))),
        )
        .with_writer(std::io::stderr)
        .init();

    if !from_file {
        info!(path = %cli.config.display(), "Config file not found, using defaults");
    }

    match cli.command {
        Commands::Frames { input } => cmd_frames(&input).await?,
        Commands::Snippet { input, radius } => cmd_snippet(&config, &input, radius).await?,
        Commands::Render {
            input,
            type_name,
            message,
            status,
            output,
        } => {
            let mut error = RaisedError::new(type_name, message, read_input(&input).await?);
            if let Some(status) = status {
                error = error.with_status(status);
            }
            cmd_render(&config, &error, output.as_deref()).await?
        }
        Commands::Config { show } => cmd_config(&cli.config, &config, show)?,
    }

    Ok(())
}

async fn cmd_frames(input: &str) -> Result<()> {
    let trace = StackTrace::parse(&read_input(input).await?);
    debug!(frames = trace.len(), "parsed stack");
    println!("{}", serde_json::to_string_pretty(&trace)?);
    Ok(())
}

async fn cmd_snippet(config: &AppConfig, input: &str, radius: Option<usize>) -> Result<()> {
    let trace = StackTrace::parse(&read_input(input).await?);
    anyhow::ensure!(!trace.is_empty(), "no stack frames found in input");

    let reader = Arc::new(SourceResolver::from_config(&config.fetch)?);
    let extractor =
        SourceExtractor::new(reader).with_radius(radius.unwrap_or(config.extractor.radius));
    let resolved = extractor.extract_first(&trace).await?;

    println!("{}", resolved.frame);
    print!("{}", format_snippet(&resolved.window));
    Ok(())
}

async fn cmd_render(config: &AppConfig, error: &RaisedError, output: Option<&Path>) -> Result<()> {
    let handler = ErrorHandler::from_config(config)?;
    let page = handler.handle(error).await?;

    match output {
        Some(path) => {
            tokio::fs::write(path, &page.body)
                .await
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!(path = %path.display(), status = page.status, "error page written");
        }
        None => print!("{}", page.body),
    }
    Ok(())
}

fn cmd_config(config_path: &Path, config: &AppConfig, show: bool) -> Result<()> {
    if show {
        let toml_str =
            toml::to_string_pretty(config).map_err(|e| anyhow::anyhow!("TOML error: {e}"))?;
        println!("{toml_str}");
    } else {
        println!("Configuration at '{}' is valid.", config_path.display());
    }
    Ok(())
}

/// Load the config file, or defaults when it does not exist. The flag
/// reports whether the file was found.
async fn load_config(path: &Path) -> Result<(AppConfig, bool)> {
    if path.exists() {
        let config = AppConfig::load(path)
            .await
            .with_context(|| format!("failed to load {}", path.display()))?;
        Ok((config, true))
    } else {
        Ok((AppConfig::default(), false))
    }
}

/// `-v` flags win over the configured level.
fn log_level(verbose: u8, config: &AppConfig) -> String {
    match verbose {
        0 => config.logging.level.clone(),
        1 => "debug".to_string(),
        _ => "trace".to_string(),
    }
}

async fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut text = String::new();
        tokio::io::stdin()
            .read_to_string(&mut text)
            .await
            .context("failed to read stack from stdin")?;
        Ok(text)
    } else {
        tokio::fs::read_to_string(input)
            .await
            .with_context(|| format!("failed to read stack from {input}"))
    }
}

/// Plain-text window with a line-number gutter and `>` on the target line.
fn format_snippet(window: &SourceWindow) -> String {
    let target = window.start_line() + window.highlight_offset();
    let last = window.start_line() + window.lines().len().saturating_sub(1);
    let width = last.to_string().len();

    let mut out = String::new();
    for (number, text) in window.numbered_lines() {
        let marker = if number == target { '>' } else { ' ' };
        out.push_str(&format!("{marker} {number:>width$} | {text}\n"));
    }
    out
}

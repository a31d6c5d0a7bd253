//! toolgate — token-gated tool endpoint host.
//!
//! Usage:
//!   toolgate list                  Show public tool definitions
//!   toolgate call <tool> <json>    Invoke a tool once
//!   toolgate serve                 JSON-lines loop over stdin/stdout
//!   toolgate token                 Print this installation's unlock token

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use toolgate::config;
use toolgate::runtime::Runtime;

// ---------------------------------------------------------------------------
// CLI definition
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(name = "toolgate")]
#[command(version)]
#[command(about = "Progressive-disclosure, token-gated tool endpoint")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to toolgate home directory (defaults to ~/.toolgate).
    #[arg(long)]
    home: Option<String>,

    /// Log level (debug, info, warn, error).
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show the public definitions of all registered tools.
    List,

    /// Invoke a tool once and print the response envelope.
    Call {
        /// Tool name (including any suffix).
        tool: String,
        /// Raw parameters as JSON, e.g. '{"input":{"operation":"readme"}}'.
        params: String,
    },

    /// Serve requests as JSON lines on stdin, one response per line on stdout.
    Serve,

    /// Print the unlock token for this installation.
    Token,
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries protocol responses
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let home_dir = cli
        .home
        .as_deref()
        .map(|h| PathBuf::from(shellexpand::tilde(h).into_owned()))
        .unwrap_or_else(config::default_home_dir);

    let runtime = Runtime::bootstrap(&home_dir)?;

    match cli.command {
        Commands::List => cmd_list(&runtime),
        Commands::Call { tool, params } => cmd_call(&runtime, &tool, &params),
        Commands::Serve => cmd_serve(&runtime).await,
        Commands::Token => {
            println!("{}", runtime.token);
            Ok(())
        }
    }
}

// ---------------------------------------------------------------------------
// Command implementations
// ---------------------------------------------------------------------------

fn cmd_list(runtime: &Runtime) -> Result<()> {
    println!();
    println!("{}", "=== Registered Tools ===".bold());
    for def in runtime.registry.definitions() {
        println!();
        println!("  {}", def.name.green().bold());
        for line in def.description.lines() {
            println!("    {}", line);
        }
        let params = serde_json::to_string_pretty(&def.parameters)?;
        println!("    {}:", "Parameters".bold());
        for line in params.lines() {
            println!("      {}", line.dimmed());
        }
    }
    println!();
    Ok(())
}

fn cmd_call(runtime: &Runtime, tool: &str, params: &str) -> Result<()> {
    let raw: serde_json::Value =
        serde_json::from_str(params).context("Failed to parse tool parameters as JSON")?;
    let response = runtime.registry.call(tool, raw);
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

async fn cmd_serve(runtime: &Runtime) -> Result<()> {
    let cancel = CancellationToken::new();
    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            signal_cancel.cancel();
        }
    });

    info!("Serving {} on stdin", runtime.registry.names().join(", "));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    loop {
        let line = tokio::select! {
            _ = cancel.cancelled() => {
                info!("Interrupted, shutting down");
                break;
            }
            line = lines.next_line() => line.context("Failed to read from stdin")?,
        };
        let Some(line) = line else {
            debug!("stdin closed");
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        let response = runtime.handle_line(&line);
        let mut out = serde_json::to_string(&response)?;
        out.push('\n');
        stdout.write_all(out.as_bytes()).await?;
        stdout.flush().await?;
    }

    Ok(())
}

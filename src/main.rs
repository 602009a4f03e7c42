// Copyright (c) 2025 CodeDNA Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! CodeDNA - Main entrypoint.
//!
//! Parses the command line, loads configuration, initializes logging, and
//! dispatches to the command implementations in the library.

use std::io;
use std::path::PathBuf;
use std::process;

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use codedna_lib::commands;
use codedna_lib::config::{CodeDnaConfig, ConfigLoader, LogConfig, ENV_PREFIX};
use codedna_lib::context::AppContext;
use codedna_lib::error::{CodeDnaError, CodeDnaResult};
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Command line arguments for CodeDNA.
#[derive(Parser, Debug)]
#[clap(name = "codedna", version, author, about)]
struct Args {
    /// Path to configuration file
    #[clap(short, long, value_parser)]
    config: Option<PathBuf>,

    /// Show verbose debug information (repeat for trace)
    #[clap(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Command to execute
    #[clap(subcommand)]
    command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Command {
    /// Fingerprint a commit listing (`git rev-list HEAD`), or show a stored nickname
    Analyze {
        /// Listing file, `-` for stdin, or a stored nickname
        history: String,

        /// Source to record, usually the clone URL
        #[clap(short, long)]
        source: Option<String>,

        /// A nickname to assign to the new record
        #[clap(short, long)]
        nickname: Option<String>,
    },

    /// Import repositories listed in a CSV file
    Import {
        /// The path to import from
        #[clap(long, value_parser)]
        path: PathBuf,

        /// Re-fingerprint repositories that are already stored
        #[clap(long)]
        clone_existing: bool,
    },

    /// Export the store to CSV
    Export {
        /// The path to export to
        #[clap(long, value_parser, default_value = "database.csv")]
        path: PathBuf,
    },

    /// Run the repository similarity report
    Similarity,

    /// Print the similarity score between two stored labels
    Score {
        /// First label
        a: String,

        /// Second label
        b: String,
    },

    /// Validate the configuration file
    Validate,

    /// Generate a default configuration file
    GenConfig {
        /// Path to output configuration file
        #[clap(short, long, value_parser)]
        output: PathBuf,
    },
}

/// Initialize the logging system.
///
/// `RUST_LOG` wins over the configured level; `-v` raises the configured level.
fn init_logging(log: &LogConfig, verbose: u8) -> CodeDnaResult<()> {
    let level = match verbose {
        0 => log.level.as_str(),
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let registry = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_error::ErrorLayer::default());

    let result = if log.json {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_writer(io::stderr)
                    .with_file(log.source_location)
                    .with_line_number(log.source_location),
            )
            .try_init()
    } else {
        registry
            .with(
                fmt::layer()
                    .pretty()
                    .with_writer(io::stderr)
                    .with_file(log.source_location)
                    .with_line_number(log.source_location),
            )
            .try_init()
    };

    result.map_err(|e| CodeDnaError::Custom(format!("Failed to set global tracing subscriber: {e}")))
}

/// Main entry point for the application.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Configuration is needed before logging, so only gen-config may skip it
    let config_loader = ConfigLoader::new(args.config.as_deref(), ENV_PREFIX);
    let config = match &args.command {
        Command::GenConfig { .. } => CodeDnaConfig::default(),
        _ => match config_loader.load() {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Configuration error: {e}");
                process::exit(1);
            }
        },
    };
    init_logging(&config.log, args.verbose)?;

    let mut out = io::stdout().lock();
    match args.command {
        Command::Validate => {
            info!("Configuration validated successfully");
        }
        Command::GenConfig { output } => {
            commands::gen_config(&output)
                .with_context(|| format!("writing {}", output.display()))?;
        }
        command => {
            let ctx = AppContext::new(config).context("opening identity store")?;
            match command {
                Command::Analyze {
                    history,
                    source,
                    nickname,
                } => {
                    commands::analyze(&ctx, &history, source, nickname, &mut out)?;
                }
                Command::Import {
                    path,
                    clone_existing,
                } => {
                    commands::import(&ctx, &path, clone_existing, &mut out).await?;
                }
                Command::Export { path } => {
                    commands::export(&ctx, &path, &mut out)?;
                }
                Command::Similarity => {
                    commands::similarity(&ctx, &mut out)?;
                }
                Command::Score { a, b } => {
                    commands::score(&ctx, &a, &b, &mut out)?;
                }
                Command::Validate | Command::GenConfig { .. } => {}
            }
        }
    }
    Ok(())
}

// SPDX-FileCopyrightText: 2026 Chatline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chatline - a LINE chatbot webhook backed by an OpenAI-compatible API.
//!
//! This is the binary entry point.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod check;
mod serve;
mod shutdown;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Chatline - a LINE chatbot webhook backed by an OpenAI-compatible API.
#[derive(Parser, Debug)]
#[command(name = "chatline", version, about, long_about = None)]
struct Cli {
    /// Config file to load instead of the default search path.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Port to listen on (overrides `server.port`).
    #[arg(short, long, global = true)]
    port: Option<u16>,

    /// Log at debug level.
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum Commands {
    /// Start the webhook server and push scheduler (default).
    Serve,
    /// Validate the configuration and print a summary.
    Check,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => chatline_config::load_and_validate_path(path),
        None => chatline_config::load_and_validate(),
    };
    let mut config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            chatline_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if cli.debug {
        config.agent.log_level = "debug".to_string();
    }

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            if let Err(e) = serve::run_serve(config).await {
                eprintln!("error: {e}");
                std::process::exit(1);
            }
        }
        Commands::Check => {
            print!("{}", check::summary(&config));
        }
    }
}

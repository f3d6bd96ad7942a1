// SPDX-FileCopyrightText: 2026 WebSage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! WebSage - gateway and session aggregator for AI website analysis.
//!
//! This is the binary entry point.

mod commands;
mod serve;
mod shell;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use colored::Colorize;

use websage_config::WebsageConfig;
use websage_core::{AnalysisBackend, WebsageError};
use websage_proxy::BackendProxy;

/// WebSage - gateway and session aggregator for AI website analysis.
#[derive(Parser, Debug)]
#[command(name = "websage", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the standard locations.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the HTTP gateway.
    Serve,
    /// Print the analysis session list as JSON.
    Sessions,
    /// Submit a website for analysis and print the result.
    Analyze {
        /// Website URL to analyse.
        url: String,
        /// Question to answer during analysis (repeatable).
        #[arg(long = "question", short = 'q')]
        questions: Vec<String>,
    },
    /// Print the merged view of one session as JSON.
    View {
        /// Session id.
        id: String,
    },
    /// Load a session and ask follow-up questions interactively.
    Shell {
        /// Session id.
        id: String,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        println!("websage: use --help for available commands");
        return;
    };

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(errors) => {
            websage_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    serve::init_tracing(&config.logging.level);

    if let Err(e) = run(command, config).await {
        eprintln!("{}: {}", "error".red(), e.user_message());
        std::process::exit(1);
    }
}

fn load_config(
    path: Option<&std::path::Path>,
) -> Result<WebsageConfig, Vec<websage_config::ConfigError>> {
    match path {
        Some(path) => websage_config::load_and_validate_path(path),
        None => websage_config::load_and_validate(),
    }
}

async fn run(command: Commands, config: WebsageConfig) -> Result<(), WebsageError> {
    let backend: Arc<dyn AnalysisBackend> = Arc::new(BackendProxy::from_config(&config.backend)?);

    match command {
        Commands::Serve => serve::run_serve(&config, backend).await,
        Commands::Sessions => {
            commands::run_sessions(backend.as_ref(), &mut std::io::stdout()).await
        }
        Commands::Analyze { url, questions } => {
            commands::run_analyze(backend.as_ref(), url, questions, &mut std::io::stdout()).await
        }
        Commands::View { id } => commands::run_view(backend, &id, &mut std::io::stdout()).await,
        Commands::Shell { id } => shell::run_shell(backend, &id).await,
    }
}

//! agentwire CLI: the main entry point.
//!
//! Commands (one per pipeline):
//! - `chat`: Plain assistant with conversation history
//! - `meal`: Meal orchestrator with structured chef answers
//! - `recipe`: Master chef plus creative variation
//! - `no-butter`: Meal orchestrator with a butter inspector
//! - `email`: Email assistant with send / recent-subjects tools

use std::path::PathBuf;
use std::process::ExitCode;

use agentwire_agent::PipelineKind;
use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "agentwire",
    about = "agentwire: LLM chat pipelines on the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use this config file instead of ~/.agentwire/config.toml
    #[arg(short, long, global = true, env = "AGENTWIRE_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Chat with a plain assistant
    Chat {
        /// Send a single message instead of entering interactive mode
        #[arg(short, long)]
        message: Option<String>,
    },

    /// Ask for a breakfast, lunch, or dinner recipe
    Meal {
        #[arg(short, long)]
        message: Option<String>,
    },

    /// Get a recipe and a creative twist on it
    Recipe {
        #[arg(short, long)]
        message: Option<String>,
    },

    /// Meal recipes, checked for butter and revised until clean
    NoButter {
        #[arg(short, long)]
        message: Option<String>,
    },

    /// Email assistant that can send mail and list recent subjects
    Email {
        #[arg(short, long)]
        message: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    // A missing .env is fine
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let (kind, message) = match cli.command {
        Commands::Chat { message } => (PipelineKind::Chat, message),
        Commands::Meal { message } => (PipelineKind::Meal, message),
        Commands::Recipe { message } => (PipelineKind::Recipe, message),
        Commands::NoButter { message } => (PipelineKind::NoButter, message),
        Commands::Email { message } => (PipelineKind::Email, message),
    };

    commands::pipeline::run(kind, message, cli.config).await
}

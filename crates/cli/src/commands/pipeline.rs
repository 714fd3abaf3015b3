//! `agentwire <pipeline>`: interactive or single-message mode.

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use agentwire_agent::{LlmClient, PipelineKind, Session, SessionEnd};
use agentwire_config::AppConfig;
use tokio::io::BufReader;
use tracing::info;

fn load_config(path: Option<PathBuf>) -> Result<AppConfig, Box<dyn std::error::Error>> {
    let config = match path {
        Some(path) => AppConfig::load_with_env(&path),
        None => AppConfig::load(),
    };
    Ok(config.map_err(|e| format!("Failed to load config: {e}"))?)
}

pub async fn run(
    kind: PipelineKind,
    message: Option<String>,
    config_path: Option<PathBuf>,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let config = load_config(config_path)?;

    let has_provider_key = config
        .providers
        .get(&config.default_provider)
        .is_some_and(|p| p.api_key.is_some());
    if !config.has_api_key() && !has_provider_key {
        eprintln!("WARNING: no API key configured.");
        eprintln!("  Set OPENAI_API_KEY or AGENTWIRE_API_KEY (a .env file works too),");
        eprintln!(
            "  or add api_key to {}",
            AppConfig::config_dir().join("config.toml").display()
        );
    }

    // Build provider from config
    let router = agentwire_providers::build_from_config(&config);
    let provider = router.default().ok_or("No default provider configured")?;
    let llm = LlmClient::from_config(provider, &config);

    let mut session = Session::new(agentwire_agent::build(kind, llm, &config));
    info!(
        pipeline = session.pipeline_name(),
        provider = %config.default_provider,
        "Starting pipeline"
    );

    if let Some(msg) = message {
        // Single message mode
        return match session.turn(&msg).await {
            Ok(display) => {
                println!("{display}");
                Ok(ExitCode::SUCCESS)
            }
            Err(e) => {
                println!("An error occurred: {e}");
                Ok(ExitCode::FAILURE)
            }
        };
    }

    // Interactive mode
    println!("{}", kind.banner());
    println!("Provider: {}  (type 'quit', 'exit' or 'q' to leave)", config.default_provider);

    let stdin = BufReader::new(tokio::io::stdin());
    let stdout = tokio::io::stdout();

    tokio::select! {
        end = session.run(stdin, stdout) => match end? {
            SessionEnd::Quit | SessionEnd::EndOfInput => Ok(ExitCode::SUCCESS),
            SessionEnd::Failed(_) => Ok(ExitCode::FAILURE),
        },
        _ = tokio::signal::ctrl_c() => {
            println!("\nGoodbye!");
            std::io::stdout().flush()?;
            // The blocking stdin read cannot be cancelled; leave without
            // waiting for it.
            std::process::exit(0);
        }
    }
}

//! `agentwire-mail`: send one email or list recent inbox subjects.
//!
//! - `send --sender --recipient --title --body` prints the outcome line
//! - `get-recent --email-address` prints `- <subject>` per message
//!
//! Without a subcommand the help text is printed and the exit code is 1.

use std::path::PathBuf;
use std::process::ExitCode;

use agentwire_config::AppConfig;
use agentwire_tools::mail::imap::ImapsConnector;
use agentwire_tools::mail::smtp::LettreSubmitter;
use agentwire_tools::mail::{self, OutgoingEmail};
use clap::{CommandFactory, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "agentwire-mail", about = "Gmail actions: send mail, list recent subjects", version)]
struct Cli {
    #[command(subcommand)]
    command: Option<MailCommand>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use this config file instead of ~/.agentwire/config.toml
    #[arg(short, long, global = true, env = "AGENTWIRE_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum MailCommand {
    /// Send an email
    Send {
        /// Sender address (defaults to GMAIL_SENDER / GMAIL_USERNAME)
        #[arg(long)]
        sender: Option<String>,

        /// Recipient address
        #[arg(long)]
        recipient: String,

        /// Email subject
        #[arg(long)]
        title: String,

        /// Email body
        #[arg(long)]
        body: String,
    },

    /// Print the subjects of the 10 most recent emails
    GetRecent {
        /// Mailbox to check
        #[arg(long)]
        email_address: String,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        println!();
        return Ok(ExitCode::FAILURE);
    };

    let config = match &cli.config {
        Some(path) => AppConfig::load_with_env(path),
        None => AppConfig::load(),
    }
    .map_err(|e| format!("Failed to load config: {e}"))?;
    let mail_config = &config.mail;

    match command {
        MailCommand::Send {
            sender,
            recipient,
            title,
            body,
        } => {
            let Some(sender) = sender.or_else(|| mail_config.sender.clone()) else {
                eprintln!("Error: no sender given (use --sender or set GMAIL_SENDER)");
                return Ok(ExitCode::FAILURE);
            };
            let email = OutgoingEmail {
                sender,
                recipient,
                subject: title,
                body,
            };
            let submitter = LettreSubmitter::from_config(mail_config);
            println!("{}", mail::send_email(mail_config, &submitter, &email).await);
        }
        MailCommand::GetRecent { email_address } => {
            let connector = ImapsConnector::from_config(mail_config);
            match mail::try_recent_subjects(mail_config, &connector, &email_address).await {
                Ok(subjects) => {
                    for subject in subjects {
                        println!("- {subject}");
                    }
                }
                Err(e) => eprintln!("{}", e.retrieve_report()),
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

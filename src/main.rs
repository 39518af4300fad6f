// ABOUTME: Entry point for clawpost — queues a chat message with attachments for the agent session.
// ABOUTME: Parses CLI args, loads config, and runs one command against the app.

use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};

use clawpost::app::{App, read_attachments};
use clawpost::config::Config;
use clawpost::coordinator::SendPayload;

#[derive(Parser)]
#[command(name = "clawpost")]
#[command(about = "Deliver chat messages and attachments to a single agent session, in order")]
struct Cli {
    /// Path to config file (defaults to ~/.clawpost/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Workspace root override
    #[arg(short, long)]
    workspace: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Send a message, optionally with attached files
    Send {
        /// Message text
        text: Option<String>,

        /// File to attach (repeatable)
        #[arg(short, long = "attach")]
        attachments: Vec<PathBuf>,
    },
    /// Show or set the model preference (fast or smart)
    Model { preference: Option<String> },
    /// Interrupt the response currently streaming
    ///
    /// The session lives inside this process, so a fresh invocation has no
    /// response open and reports that there is nothing to stop.
    Interrupt,
    /// Reset the conversation
    ///
    /// Applies to this process's session only; the resume id is not kept
    /// after the command exits.
    Reset {
        /// Session id to resume after the reset
        #[arg(long)]
        resume: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    clawpost::logging::init(cli.verbose);

    let mut config = match &cli.config {
        Some(path) => Config::load_from_path(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => Config::load().context("failed to load configuration")?,
    };
    if let Some(workspace) = cli.workspace {
        config.workspace_dir = Some(workspace);
    }

    let app = App::new(config);

    let output = match cli.command {
        Command::Send { text, attachments } => {
            let attachments = read_attachments(&attachments)?;
            let payload = SendPayload {
                text,
                attachments: Some(attachments),
            };
            serde_json::to_string_pretty(&app.send_and_wait(payload).await)?
        }
        Command::Model { preference: None } => {
            serde_json::to_string_pretty(&app.bridge().model_preference())?
        }
        Command::Model {
            preference: Some(preference),
        } => serde_json::to_string_pretty(&app.bridge().set_model_preference_str(&preference).await)?,
        Command::Interrupt => serde_json::to_string_pretty(&app.bridge().interrupt().await)?,
        Command::Reset { resume } => serde_json::to_string_pretty(&app.bridge().reset(resume).await)?,
    };

    println!("{}", output);
    Ok(())
}

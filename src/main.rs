use anyhow::Result;
use clap::{Parser, Subcommand};

use adjutant::config::Config;
use adjutant::session::{Assistant, StdoutSpeaker, run_repl};
use adjutant::tools::ToolRegistry;

#[derive(Parser)]
#[command(name = "adjutant")]
#[command(about = "Voice-command personal assistant - keyword interpreter with async tool dispatch")]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Read utterances from stdin and answer each turn
    Repl,

    /// Interpret a single utterance and exit
    Say {
        /// The transcribed command text
        utterance: Vec<String>,
    },

    /// List registered tools
    Tools,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .init();

    let config = Config::from_env();

    match cli.command {
        Some(Commands::Say { utterance }) => {
            let assistant = Assistant::new(&config);
            assistant
                .handle_utterance(&utterance.join(" "), &StdoutSpeaker)
                .await;
            // One-shot mode: let background tool work finish before exit
            assistant.drain().await;
        }
        Some(Commands::Tools) => {
            let registry = ToolRegistry::with_defaults(&config);
            let mut ids: Vec<String> = registry
                .ids()
                .into_iter()
                .map(|id| id.to_string())
                .collect();
            ids.sort();
            for id in ids {
                println!("{id}");
            }
        }
        Some(Commands::Repl) | None => {
            let assistant = Assistant::new(&config);
            run_repl(&assistant, &StdoutSpeaker).await?;
        }
    }

    Ok(())
}

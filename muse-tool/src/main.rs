mod config;
mod error;
mod logging;

#[cfg(feature = "chat")]
mod chat;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use muse_gemini::GeminiClient;

use crate::config::{default_log_path, load_config, resolve};

#[derive(Parser)]
#[command(name = "muse")]
#[command(about = "A design mentor in your terminal", long_about = None)]
struct Cli {
    /// Where to write the log file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    #[cfg(feature = "chat")]
    /// Start an interactive chat session
    Chat {
        /// Model for grounded text answers
        #[arg(long)]
        text_model: Option<String>,

        /// Model for /imagine requests
        #[arg(long)]
        image_model: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    logging::init(&cli.log_file.unwrap_or_else(default_log_path))?;
    let config = load_config()?;

    match cli.command {
        #[cfg(feature = "chat")]
        Command::Chat {
            text_model,
            image_model,
        } => {
            let settings = resolve(config, text_model, image_model)?;
            let client = GeminiClient::with_base_url(settings.api_key, settings.base_url)
                .with_models(settings.text_model, settings.image_model);

            chat::run(client).await?;
        }
    }

    Ok(())
}

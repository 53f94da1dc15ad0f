//! Concierge CLI: the main entry point.
//!
//! Commands:
//! - `choose`: pick the assistant for a message
//! - `run`: pick the assistant and let it answer
//! - `assistants`: list registered assistants and their eligibility
//! - `config`: create, show, locate or validate the configuration

use clap::{Parser, Subcommand};

mod commands;

use commands::RequestArgs;

#[derive(Parser)]
#[command(
    name = "concierge",
    about = "Concierge: pick the right assistant for every request",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Choose the assistant that should handle a request
    Choose(RequestArgs),

    /// Choose an assistant and run it on the request
    Run(RequestArgs),

    /// List registered assistants
    Assistants {
        /// Data source as `id:type` (repeatable)
        #[arg(short, long = "source")]
        sources: Vec<concierge_core::DataSource>,

        /// Model the request would run with
        #[arg(long)]
        model: Option<String>,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Write a default config file
    Init,
    /// Print the effective configuration
    Show,
    /// Print the config file path
    Path,
    /// Validate the configuration
    Validate,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing; stdout is reserved for command output.
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Choose(args) => commands::choose::run(args, false).await?,
        Commands::Run(args) => commands::choose::run(args, true).await?,
        Commands::Assistants { sources, model } => commands::assistants::run(sources, model).await?,
        Commands::Config { action } => match action {
            ConfigAction::Init => commands::config_cmd::init().await?,
            ConfigAction::Show => commands::config_cmd::show().await?,
            ConfigAction::Path => commands::config_cmd::path().await?,
            ConfigAction::Validate => commands::config_cmd::validate().await?,
        },
    }

    Ok(())
}

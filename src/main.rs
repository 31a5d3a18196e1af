//! multimcp - Terminal client for a Multi-MCP orchestration backend
//!
#![doc = "multimcp - Terminal client for a Multi-MCP orchestration backend"]
#![doc = "Main entry point for the multimcp application."]

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use multimcp::cli::{Cli, Commands};
use multimcp::commands;
use multimcp::config::Config;
use multimcp::display;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    init_tracing(cli.verbose);

    // Load configuration
    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path, &cli)?;

    // Validate configuration
    config.validate()?;

    match cli.command {
        Commands::Chat => {
            tracing::info!("Starting interactive chat");
            commands::chat::run_chat(config).await
        }
        Commands::Query {
            text,
            example,
            json,
        } => {
            tracing::info!("Starting one-shot query");
            commands::query::run_query(config, text, example, json).await
        }
        Commands::Examples => {
            println!("{}", display::format_examples(&config.chat.examples));
            Ok(())
        }
        Commands::Session { command } => {
            commands::session::handle_session(config, command).await
        }
        Commands::History { command } => commands::history::handle_history(&config, command),
        Commands::Servers { json, watch } => {
            commands::registry::handle_servers(&config, json, watch).await
        }
        Commands::Agents { command } => commands::registry::handle_agents(&config, command).await,
    }
}

/// Initialize tracing subscriber with environment filter
///
/// Logs go to stderr so they never interleave with chat output on stdout.
fn init_tracing(verbose: bool) {
    let default_level = if verbose {
        "multimcp=debug"
    } else {
        "multimcp=warn"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

use super::{build_controller, open_controller};
use crate::chat::NewConversation;
use crate::cli::SessionCommand;
use crate::config::Config;
use crate::error::Result;
use colored::Colorize;

/// Handle `session` subcommands
pub async fn handle_session(config: Config, command: SessionCommand) -> Result<()> {
    let controller = match command {
        // read-only; never creates a session
        SessionCommand::Show => build_controller(&config)?,
        SessionCommand::Ensure | SessionCommand::New => open_controller(&config).await?,
    };

    match command {
        SessionCommand::Show => match controller.session_id() {
            Some(id) => println!("{}", id),
            None => println!("{}", "No session yet".yellow()),
        },
        SessionCommand::Ensure => {
            let id = controller.ensure_session().await?;
            println!("{}", id);
        }
        SessionCommand::New => match controller.new_conversation().await {
            NewConversation::Started(id) => println!("{}", id),
            NewConversation::Failed(reason) => {
                anyhow::bail!("failed to start new conversation: {}", reason)
            }
            // nothing else runs in a one-shot process
            NewConversation::Busy => anyhow::bail!("a query is still in progress"),
        },
    }

    Ok(())
}

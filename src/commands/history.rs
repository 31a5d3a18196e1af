use super::open_store;
use crate::cli::HistoryCommand;
use crate::config::Config;
use crate::display;
use crate::error::Result;
use colored::Colorize;

/// Handle history commands
///
/// Reads the local store only; the backend is never contacted.
pub fn handle_history(config: &Config, command: HistoryCommand) -> Result<()> {
    let store = open_store(config)?;
    let state = store.load();

    match command {
        HistoryCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(&state.messages)?);
                return Ok(());
            }

            if state.messages.is_empty() {
                println!("{}", "No conversation history found.".yellow());
                return Ok(());
            }

            if let Some(id) = &state.session_id {
                println!("Session: {}\n", id.cyan());
            }
            for message in &state.messages {
                println!("{}\n", display::format_message(message));
            }
            println!(
                "{} messages. Use {} to start over.",
                state.messages.len(),
                "multimcp session new".cyan()
            );
        }
    }

    Ok(())
}

//! Interactive chat handler
//!
//! Restores the persisted conversation, then runs a readline loop that
//! submits each line through the chat controller. Special commands are
//! handled locally.

use super::special_commands::{parse_special_command, print_help, SpecialCommand};
use super::{open_controller, registry, with_progress};
use crate::chat::{ChatController, DispatchState, SubmitOutcome};
use crate::config::Config;
use crate::display;
use crate::error::Result;
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::{Cmd, DefaultEditor, EventHandler, KeyCode, KeyEvent, Modifiers};

/// Start the interactive chat
///
/// # Examples
///
/// ```no_run
/// use multimcp::commands::chat;
/// use multimcp::config::Config;
///
/// # async fn example() -> multimcp::error::Result<()> {
/// chat::run_chat(Config::default()).await?;
/// # Ok(())
/// # }
/// ```
pub async fn run_chat(config: Config) -> Result<()> {
    tracing::info!("Starting interactive chat");

    let controller = open_controller(&config).await?;
    let mut rl = build_editor()?;

    print_welcome_banner(&controller, &config);

    loop {
        let prompt = format!("{} ", "multimcp>".cyan().bold());
        match rl.readline(&prompt) {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                if let Err(e) = rl.add_history_entry(line.as_str()) {
                    tracing::debug!("Failed to record readline history: {}", e);
                }

                let command = match parse_special_command(&line) {
                    Ok(command) => command,
                    Err(e) => {
                        eprintln!("{}", e.to_string().red());
                        continue;
                    }
                };

                match command {
                    SpecialCommand::Exit => break,
                    SpecialCommand::None => {
                        let outcome =
                            with_progress(controller.progress(), controller.submit(&line)).await;
                        print_outcome(&outcome);
                    }
                    other => handle_special_command(&controller, &config, other).await,
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => {
                tracing::error!("Readline error: {}", e);
                return Err(e.into());
            }
        }
    }

    println!("Goodbye!");
    Ok(())
}

/// Line editor with Alt+Enter / Shift+Enter inserting a newline
fn build_editor() -> Result<DefaultEditor> {
    let mut rl = DefaultEditor::new()?;
    rl.bind_sequence(
        KeyEvent(KeyCode::Enter, Modifiers::ALT),
        EventHandler::Simple(Cmd::Newline),
    );
    // only reported by terminals with extended key support
    rl.bind_sequence(
        KeyEvent(KeyCode::Enter, Modifiers::SHIFT),
        EventHandler::Simple(Cmd::Newline),
    );
    Ok(rl)
}

async fn handle_special_command(
    controller: &ChatController,
    config: &Config,
    command: SpecialCommand,
) {
    match command {
        SpecialCommand::NewConversation => {
            // outcome is reported through the notifier
            controller.new_conversation().await;
        }
        SpecialCommand::ShowSession => match controller.session_id() {
            Some(id) => println!("Session: {}", id.cyan()),
            None => println!("{}", "No session yet".yellow()),
        },
        SpecialCommand::ShowHistory => {
            let messages = controller.messages();
            if messages.is_empty() {
                println!("{}", "No messages yet.".yellow());
            }
            for message in &messages {
                println!("{}\n", display::format_message(message));
            }
        }
        SpecialCommand::ListExamples => {
            println!("{}", display::format_examples(controller.examples()));
        }
        SpecialCommand::RunExample(id) => {
            match with_progress(controller.progress(), controller.submit_example(&id)).await {
                Ok(outcome) => print_outcome(&outcome),
                Err(e) => eprintln!("{}", e.to_string().red()),
            }
        }
        SpecialCommand::ListServers => {
            if let Err(e) = registry::print_servers(controller.api().as_ref(), false).await {
                eprintln!("{} {}", "Failed to fetch servers:".red(), e);
            }
        }
        SpecialCommand::ListAgents => {
            if let Err(e) = registry::print_agents(controller.api().as_ref(), false).await {
                eprintln!("{} {}", "Failed to fetch agents:".red(), e);
            }
        }
        SpecialCommand::ShowStatus => print_status(controller, config),
        SpecialCommand::Help => print_help(),
        SpecialCommand::Exit | SpecialCommand::None => {}
    }
}

fn print_outcome(outcome: &SubmitOutcome) {
    match outcome {
        SubmitOutcome::Replied(message) | SubmitOutcome::Failed(message) => {
            println!("{}\n", display::format_message(message));
        }
        SubmitOutcome::Busy => {
            eprintln!("{}", "A query is already in progress".yellow());
        }
        SubmitOutcome::Empty => {}
    }
}

fn print_status(controller: &ChatController, config: &Config) {
    let state = match controller.state() {
        DispatchState::Idle => "idle".green(),
        DispatchState::AwaitingResponse => "awaiting response".yellow(),
    };
    println!("Backend:  {}", config.api.base_url.cyan());
    println!(
        "Session:  {}",
        controller.session_id().unwrap_or_else(|| "-".to_string())
    );
    println!("Messages: {}", controller.messages().len());
    println!("State:    {}", state);
}

fn print_welcome_banner(controller: &ChatController, config: &Config) {
    println!();
    println!("{}", "Multi-MCP Chat".bold());
    println!(
        "Connected to {}. Type {} for commands, {} to leave.",
        config.api.base_url.cyan(),
        "/help".cyan(),
        "exit".cyan()
    );
    println!();

    let messages = controller.messages();
    if messages.is_empty() {
        println!("Try one of these ({}):", "/example <id>".cyan());
        println!("{}", display::format_examples(controller.examples()));
        println!();
    } else {
        for message in &messages {
            println!("{}\n", display::format_message(message));
        }
    }
}

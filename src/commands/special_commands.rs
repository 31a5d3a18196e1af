//! Special commands parser for the interactive chat
//!
//! Lines starting with `/` (plus the bare words `exit` and `quit`) are
//! handled locally instead of being sent to the orchestrator. Commands are
//! case-insensitive.

use thiserror::Error;

/// Errors that can occur when parsing special commands
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Unknown command was entered
    #[error("Unknown command: {0}\n\nType '/help' to see available commands")]
    UnknownCommand(String),

    /// Command was given an unsupported argument
    #[error("Unsupported argument for {command}: {arg}\n\nType '/help' to see valid usage")]
    UnsupportedArgument { command: String, arg: String },

    /// Command requires an argument but none was provided
    #[error("Command {command} requires an argument\n\nUsage: {usage}")]
    MissingArgument { command: String, usage: String },
}

/// Commands handled by the chat loop itself
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecialCommand {
    /// Clear the backend context and start over
    NewConversation,

    /// Show the current session id
    ShowSession,

    /// Replay the whole conversation
    ShowHistory,

    /// List the suggested example queries
    ListExamples,

    /// Submit the example with the given id
    RunExample(String),

    /// List MCP servers
    ListServers,

    /// List agents
    ListAgents,

    /// Show session, dispatcher and backend status
    ShowStatus,

    /// Display help information
    Help,

    /// Leave the chat
    Exit,

    /// Not a special command; submit as a query
    None,
}

/// Parse a line of chat input
///
/// # Errors
///
/// Returns `CommandError::UnknownCommand` for unrecognized `/` commands,
/// `CommandError::MissingArgument` for `/example` without an id, and
/// `CommandError::UnsupportedArgument` when an argument is given to a
/// command that takes none.
///
/// # Examples
///
/// ```
/// use multimcp::commands::special_commands::{parse_special_command, SpecialCommand};
///
/// assert_eq!(parse_special_command("/NEW").unwrap(), SpecialCommand::NewConversation);
/// assert_eq!(
///     parse_special_command("/example 2").unwrap(),
///     SpecialCommand::RunExample("2".to_string())
/// );
/// assert_eq!(parse_special_command("List channels").unwrap(), SpecialCommand::None);
/// assert!(parse_special_command("/foo").is_err());
/// ```
pub fn parse_special_command(input: &str) -> Result<SpecialCommand, CommandError> {
    let trimmed = input.trim();
    let lower = trimmed.to_lowercase();

    if !trimmed.starts_with('/') && lower != "exit" && lower != "quit" {
        return Ok(SpecialCommand::None);
    }

    let mut parts = lower.splitn(2, char::is_whitespace);
    let command = parts.next().unwrap_or_default();
    let arg = parts.next().map(str::trim).filter(|a| !a.is_empty());

    let simple = match command {
        "/new" | "/clear" => Some(SpecialCommand::NewConversation),
        "/session" => Some(SpecialCommand::ShowSession),
        "/history" => Some(SpecialCommand::ShowHistory),
        "/examples" => Some(SpecialCommand::ListExamples),
        "/servers" => Some(SpecialCommand::ListServers),
        "/agents" => Some(SpecialCommand::ListAgents),
        "/status" => Some(SpecialCommand::ShowStatus),
        "/help" | "/?" => Some(SpecialCommand::Help),
        "exit" | "quit" | "/exit" | "/quit" => Some(SpecialCommand::Exit),
        _ => None,
    };

    if let Some(cmd) = simple {
        return match arg {
            None => Ok(cmd),
            Some(arg) => Err(CommandError::UnsupportedArgument {
                command: command.to_string(),
                arg: arg.to_string(),
            }),
        };
    }

    match command {
        "/example" => match arg {
            Some(id) => Ok(SpecialCommand::RunExample(id.to_string())),
            None => Err(CommandError::MissingArgument {
                command: "/example".to_string(),
                usage: "/example <id>".to_string(),
            }),
        },
        other => Err(CommandError::UnknownCommand(other.to_string())),
    }
}

/// Help text for the chat's special commands
pub fn help_text() -> &'static str {
    r#"
Special Commands for the Interactive Chat
=========================================

CONVERSATION:
  /new            - Clear the backend context and start a new conversation
  /clear          - Same as /new
  /history        - Show the whole conversation
  /session        - Show the current session id

SUGGESTIONS:
  /examples       - List suggested queries
  /example <id>   - Submit the suggested query with that id

REGISTRY:
  /servers        - List registered MCP servers
  /agents         - List registered agents

SESSION INFORMATION:
  /status         - Show session and backend status
  /help           - Show this help message
  /?              - Same as /help

SESSION CONTROL:
  exit            - Exit the chat
  quit            - Same as exit

NOTES:
  - Commands are case-insensitive
  - Regular text (not starting with /) is sent to the orchestrator
  - Enter sends the message; Alt+Enter (or Shift+Enter where the terminal
    reports it) inserts a newline
  - Only one query runs at a time
"#
}

/// Display help text for special commands
pub fn print_help() {
    println!("{}", help_text());
}

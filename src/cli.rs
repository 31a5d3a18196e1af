//! Command-line interface definition for multimcp
//!
//! This module defines the CLI structure using clap's derive API,
//! providing commands for chat, one-shot queries, session and history
//! management, and the server/agent registries.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// multimcp - Terminal client for a Multi-MCP orchestration backend
///
/// Chat with the orchestrator in natural language and manage the MCP
/// servers and agents it knows about.
#[derive(Parser, Debug, Clone)]
#[command(name = "multimcp")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Override the orchestration backend base URL
    #[arg(long)]
    pub api_base: Option<String>,

    /// Override the directory of the local history database
    #[arg(long)]
    pub storage_path: Option<PathBuf>,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for multimcp
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start the interactive chat
    Chat,

    /// Submit a single query and print the reply
    Query {
        /// Query text
        #[arg(required_unless_present = "example", conflicts_with = "example")]
        text: Option<String>,

        /// Submit the suggested example with this id instead of text
        #[arg(short, long)]
        example: Option<String>,

        /// Print the raw backend payload as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the suggested example queries
    Examples,

    /// Manage the backend conversation session
    Session {
        /// Session subcommand
        #[command(subcommand)]
        command: SessionCommand,
    },

    /// Inspect the locally persisted conversation
    History {
        /// History subcommand
        #[command(subcommand)]
        command: HistoryCommand,
    },

    /// List the MCP servers registered with the backend
    Servers {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,

        /// Refresh the listing periodically until interrupted
        #[arg(short, long)]
        watch: bool,
    },

    /// Manage the agent registry
    Agents {
        /// Agent subcommand
        #[command(subcommand)]
        command: AgentCommand,
    },
}

/// Session subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    /// Clear the current session and start a new conversation
    New,
    /// Show the current session id
    Show,
    /// Create a session if none is held
    Ensure,
}

/// History subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum HistoryCommand {
    /// Print the persisted conversation
    Show {
        /// Print JSON instead of formatted messages
        #[arg(long)]
        json: bool,
    },
}

/// Agent registry subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum AgentCommand {
    /// List registered agents
    List {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Register a new agent
    Add {
        /// Agent id (e.g. slack_agent)
        #[arg(long)]
        name: String,

        /// Human-readable name (e.g. "Slack Agent")
        #[arg(long)]
        display_name: String,

        /// Brief description of the agent's purpose
        #[arg(long)]
        description: String,

        /// System instructions for the agent
        #[arg(long)]
        instructions: String,

        /// Comma-separated capabilities
        #[arg(long)]
        capabilities: String,

        /// The agent needs an MCP server
        #[arg(long)]
        requires_mcp: bool,

        /// MCP server name (only sent with --requires-mcp)
        #[arg(long)]
        mcp_server: Option<String>,
    },

    /// Remove a database-defined agent
    Remove {
        /// Agent id
        name: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            config: Some("config/config.yaml".to_string()),
            verbose: false,
            api_base: None,
            storage_path: None,
            command: Commands::Chat,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_default() {
        let cli = Cli::default();
        assert_eq!(cli.config, Some("config/config.yaml".to_string()));
        assert!(!cli.verbose);
        assert!(matches!(cli.command, Commands::Chat));
    }

    #[test]
    fn test_cli_parse_chat_command() {
        let cli = Cli::try_parse_from(["multimcp", "chat"]).unwrap();
        assert!(matches!(cli.command, Commands::Chat));
    }

    #[test]
    fn test_cli_parse_query_text() {
        let cli = Cli::try_parse_from(["multimcp", "query", "Post hello"]).unwrap();
        if let Commands::Query {
            text,
            example,
            json,
        } = cli.command
        {
            assert_eq!(text, Some("Post hello".to_string()));
            assert_eq!(example, None);
            assert!(!json);
        } else {
            panic!("Expected Query command");
        }
    }

    #[test]
    fn test_cli_parse_query_example() {
        let cli = Cli::try_parse_from(["multimcp", "query", "--example", "2", "--json"]).unwrap();
        if let Commands::Query {
            text,
            example,
            json,
        } = cli.command
        {
            assert_eq!(text, None);
            assert_eq!(example, Some("2".to_string()));
            assert!(json);
        } else {
            panic!("Expected Query command");
        }
    }

    #[test]
    fn test_cli_parse_query_requires_text_or_example() {
        assert!(Cli::try_parse_from(["multimcp", "query"]).is_err());
    }

    #[test]
    fn test_cli_parse_query_rejects_text_and_example() {
        assert!(Cli::try_parse_from(["multimcp", "query", "hi", "--example", "1"]).is_err());
    }

    #[test]
    fn test_cli_parse_session_new() {
        let cli = Cli::try_parse_from(["multimcp", "session", "new"]).unwrap();
        if let Commands::Session { command } = cli.command {
            assert_eq!(command, SessionCommand::New);
        } else {
            panic!("Expected Session command");
        }
    }

    #[test]
    fn test_cli_parse_history_show_json() {
        let cli = Cli::try_parse_from(["multimcp", "history", "show", "--json"]).unwrap();
        if let Commands::History { command } = cli.command {
            assert_eq!(command, HistoryCommand::Show { json: true });
        } else {
            panic!("Expected History command");
        }
    }

    #[test]
    fn test_cli_parse_servers_watch() {
        let cli = Cli::try_parse_from(["multimcp", "servers", "--watch"]).unwrap();
        if let Commands::Servers { json, watch } = cli.command {
            assert!(!json);
            assert!(watch);
        } else {
            panic!("Expected Servers command");
        }
    }

    #[test]
    fn test_cli_parse_agents_add() {
        let cli = Cli::try_parse_from([
            "multimcp",
            "agents",
            "add",
            "--name",
            "slack_agent",
            "--display-name",
            "Slack Agent",
            "--description",
            "Talks to Slack",
            "--instructions",
            "Be brief",
            "--capabilities",
            "post, read",
            "--requires-mcp",
            "--mcp-server",
            "slack",
        ])
        .unwrap();
        if let Commands::Agents {
            command:
                AgentCommand::Add {
                    name,
                    requires_mcp,
                    mcp_server,
                    capabilities,
                    ..
                },
        } = cli.command
        {
            assert_eq!(name, "slack_agent");
            assert!(requires_mcp);
            assert_eq!(mcp_server, Some("slack".to_string()));
            assert_eq!(capabilities, "post, read");
        } else {
            panic!("Expected Agents add command");
        }
    }

    #[test]
    fn test_cli_parse_agents_remove_with_yes() {
        let cli = Cli::try_parse_from(["multimcp", "agents", "remove", "slack_agent", "-y"]).unwrap();
        if let Commands::Agents { command } = cli.command {
            assert_eq!(
                command,
                AgentCommand::Remove {
                    name: "slack_agent".to_string(),
                    yes: true
                }
            );
        } else {
            panic!("Expected Agents command");
        }
    }

    #[test]
    fn test_cli_parse_global_overrides() {
        let cli = Cli::try_parse_from([
            "multimcp",
            "--api-base",
            "http://backend:8000",
            "--storage-path",
            "/tmp/history",
            "-v",
            "examples",
        ])
        .unwrap();
        assert_eq!(cli.api_base, Some("http://backend:8000".to_string()));
        assert_eq!(cli.storage_path, Some(PathBuf::from("/tmp/history")));
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Examples));
    }

    #[test]
    fn test_cli_parse_missing_command() {
        assert!(Cli::try_parse_from(["multimcp"]).is_err());
    }

    #[test]
    fn test_cli_parse_invalid_command() {
        assert!(Cli::try_parse_from(["multimcp", "invalid"]).is_err());
    }
}

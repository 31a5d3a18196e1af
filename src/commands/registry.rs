//! MCP server and agent registry handlers

use super::build_api;
use crate::api::{parse_capabilities, NewAgent, OrchestratorApi};
use crate::chat::{Notification, Notifier, TerminalNotifier};
use crate::cli::AgentCommand;
use crate::config::Config;
use crate::display;
use crate::error::{MultiMcpError, Result};
use colored::Colorize;
use rustyline::DefaultEditor;
use std::time::Duration;

/// Print the server registry once
pub async fn print_servers(api: &dyn OrchestratorApi, json: bool) -> Result<()> {
    let listing = api.list_servers().await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&listing)?);
        return Ok(());
    }

    let servers = listing.ordered();
    if servers.is_empty() {
        println!("{}", "No MCP servers registered.".yellow());
        return Ok(());
    }
    println!("\nMCP Servers ({}):", servers.len());
    println!("{}", display::server_table(&servers));
    Ok(())
}

/// Print the agent registry once
pub async fn print_agents(api: &dyn OrchestratorApi, json: bool) -> Result<()> {
    let listing = api.list_agents().await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&listing)?);
        return Ok(());
    }

    let agents = listing.ordered();
    if agents.is_empty() {
        println!("{}", "No agents registered.".yellow());
        return Ok(());
    }
    println!("\nAgents ({}):", agents.len());
    println!("{}", display::agent_table(&agents));
    Ok(())
}

/// Handle `servers`, optionally refreshing until Ctrl-C
pub async fn handle_servers(config: &Config, json: bool, watch: bool) -> Result<()> {
    let api = build_api(config)?;
    if !watch {
        return print_servers(api.as_ref(), json).await;
    }

    let interval = Duration::from_secs(config.registry.refresh_seconds);
    loop {
        // a failed refresh is shown and retried on the next tick
        if let Err(e) = print_servers(api.as_ref(), json).await {
            eprintln!("{} {}", "Failed to fetch servers:".red(), e);
        }
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::debug!("Stopping server watch");
                return Ok(());
            }
            _ = tokio::time::sleep(interval) => {}
        }
    }
}

/// Handle `agents` subcommands
pub async fn handle_agents(config: &Config, command: AgentCommand) -> Result<()> {
    let api = build_api(config)?;
    let notifier = TerminalNotifier;

    match command {
        AgentCommand::List { json } => print_agents(api.as_ref(), json).await,
        AgentCommand::Add {
            name,
            display_name,
            description,
            instructions,
            capabilities,
            requires_mcp,
            mcp_server,
        } => {
            let agent = NewAgent {
                name,
                display_name,
                description,
                instructions,
                capabilities: parse_capabilities(&capabilities),
                requires_mcp,
                mcp_server,
            }
            .validated()?;

            add_agent(api.as_ref(), &notifier, &agent).await
        }
        AgentCommand::Remove { name, yes } => {
            if !yes && !confirm(&format!("Remove agent {}? [y/N] ", name))? {
                println!("Cancelled.");
                return Ok(());
            }
            remove_agent(api.as_ref(), &notifier, &name).await
        }
    }
}

/// Register an agent and announce it
pub async fn add_agent(
    api: &dyn OrchestratorApi,
    notifier: &dyn Notifier,
    agent: &NewAgent,
) -> Result<()> {
    api.add_agent(agent).await?;
    notifier.notify(Notification::success(
        "Agent added successfully!",
        format!("{} is now available", agent.display_name),
    ));
    Ok(())
}

/// Delete a database-defined agent
///
/// # Errors
///
/// Returns `MultiMcpError::InvalidInput` without calling the backend if the
/// listing shows the agent as defined in code
pub async fn remove_agent(
    api: &dyn OrchestratorApi,
    notifier: &dyn Notifier,
    name: &str,
) -> Result<()> {
    let listing = api.list_agents().await?;
    if let Some(agent) = listing.details.get(name) {
        if !agent.is_removable() {
            return Err(MultiMcpError::InvalidInput(format!(
                "agent {} is defined in {} and cannot be removed",
                name, agent.source
            ))
            .into());
        }
    }

    api.delete_agent(name).await?;
    notifier.notify(Notification::success(
        "Agent removed successfully!",
        "The agent has been deleted",
    ));
    Ok(())
}

fn confirm(prompt: &str) -> Result<bool> {
    let mut rl = DefaultEditor::new()?;
    let answer = rl.readline(prompt)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::{ApiCall, FakeApi};
    use crate::api::{AgentInfo, AgentSource};
    use crate::chat::RecordingNotifier;

    fn agent(name: &str, source: AgentSource) -> AgentInfo {
        AgentInfo {
            name: name.to_string(),
            display_name: name.to_string(),
            description: String::new(),
            capabilities: vec!["read".to_string()],
            requires_mcp: false,
            mcp_server: None,
            source,
            instructions: None,
        }
    }

    #[tokio::test]
    async fn test_remove_refuses_code_agent() {
        let api = FakeApi::new();
        api.insert_agent(agent("slack_agent", AgentSource::Code));
        let notifier = RecordingNotifier::new();

        let err = remove_agent(&api, &notifier, "slack_agent")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("cannot be removed"));
        assert!(!api.calls().contains(&ApiCall::DeleteAgent("slack_agent".to_string())));
        assert!(notifier.notifications().is_empty());
    }

    #[tokio::test]
    async fn test_remove_database_agent_notifies() {
        let api = FakeApi::new();
        api.insert_agent(agent("notion_agent", AgentSource::Database));
        let notifier = RecordingNotifier::new();

        remove_agent(&api, &notifier, "notion_agent").await.unwrap();
        assert_eq!(
            notifier.last().unwrap().title,
            "Agent removed successfully!"
        );
        assert!(api.list_agents().await.unwrap().agents.is_empty());
    }

    #[tokio::test]
    async fn test_add_agent_notifies_with_display_name() {
        let api = FakeApi::new();
        let notifier = RecordingNotifier::new();
        let new = NewAgent {
            name: "notion_agent".to_string(),
            display_name: "Notion Agent".to_string(),
            description: "Reads pages".to_string(),
            instructions: "Be brief".to_string(),
            capabilities: vec!["read".to_string()],
            requires_mcp: false,
            mcp_server: None,
        };

        add_agent(&api, &notifier, &new).await.unwrap();
        let note = notifier.last().unwrap();
        assert_eq!(note.title, "Agent added successfully!");
        assert_eq!(note.description, "Notion Agent is now available");

        // duplicate is rejected by the backend and not announced
        assert!(add_agent(&api, &notifier, &new).await.is_err());
        assert_eq!(notifier.notifications().len(), 1);
    }
}

//! Terminal rendering of messages and registry listings
//!
//! Everything here returns a `String` so callers decide where it goes.

use crate::api::{AgentInfo, QueryResponse, ServerInfo};
use crate::chat::{Message, Role};
use crate::config::ExampleQuery;
use chrono::Local;
use colored::Colorize;
use prettytable::{format, row, Table};
use serde_json::Value;

/// Render one conversation entry
pub fn format_message(message: &Message) -> String {
    let time = message
        .timestamp
        .with_timezone(&Local)
        .format("%H:%M")
        .to_string();

    match message.role {
        Role::User => format!(
            "{} {}\n{}",
            "You".blue().bold(),
            time.dimmed(),
            message.content
        ),
        Role::Assistant => {
            let mut out = format!(
                "{} {}\n{}",
                "Assistant".magenta().bold(),
                time.dimmed(),
                message.content
            );
            if let Some(result) = &message.result {
                out.push('\n');
                out.push_str(&format_result_panel(result, message.processing_time));
            }
            out
        }
    }
}

/// Render the structured details of a backend reply
pub fn format_result_panel(result: &QueryResponse, processing_time: Option<f64>) -> String {
    let mut lines = Vec::new();

    let heading = if result.has_error() {
        "Query Failed".red().bold()
    } else {
        "Query Executed Successfully".green().bold()
    };
    match processing_time {
        Some(secs) => lines.push(format!("{} ({:.2}s)", heading, secs)),
        None => lines.push(heading.to_string()),
    }

    if !result.agents_used.is_empty() {
        lines.push(format!(
            "{} {}",
            "Agents Used:".bold(),
            result.agents_used.join(", ")
        ));
    }

    if !result.plan.is_null() {
        lines.push("Execution Plan:".bold().to_string());
        lines.push(pretty_json(&result.plan));
    }

    if let Some(data) = &result.extracted_data {
        let show = match data {
            Value::Object(map) => !map.is_empty(),
            Value::Null => false,
            _ => true,
        };
        if show {
            lines.push("Extracted Data:".bold().to_string());
            lines.push(pretty_json(data));
        }
    }

    lines.join("\n")
}

fn pretty_json(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

/// Render the suggested example queries
pub fn format_examples(examples: &[ExampleQuery]) -> String {
    examples
        .iter()
        .map(|e| format!("  {} {} {}", format!("[{}]", e.id).cyan(), e.icon, e.text))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Table of registered MCP servers
pub fn server_table(servers: &[ServerInfo]) -> String {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BORDERS_ONLY);
    table.set_titles(row![
        "Name".bold(),
        "Type".bold(),
        "Tools".bold(),
        "Status".bold(),
        "Description".bold()
    ]);

    for server in servers {
        table.add_row(row![
            server.name,
            server.kind,
            server.tools_count,
            status_cell(&server.status),
            server.description
        ]);
    }

    table.to_string()
}

fn status_cell(status: &str) -> String {
    match status {
        "active" | "connected" | "running" => status.green().to_string(),
        "" => "-".to_string(),
        other => other.yellow().to_string(),
    }
}

/// Table of registered agents, marking which ones can be removed
pub fn agent_table(agents: &[AgentInfo]) -> String {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BORDERS_ONLY);
    table.set_titles(row![
        "Name".bold(),
        "Display Name".bold(),
        "Source".bold(),
        "MCP Server".bold(),
        "Capabilities".bold(),
        "Removable".bold()
    ]);

    for agent in agents {
        let server = agent.mcp_server.clone().unwrap_or_else(|| "-".to_string());
        let removable = if agent.is_removable() { "yes" } else { "no" };
        table.add_row(row![
            agent.name,
            agent.display_name,
            agent.source,
            server,
            agent.capabilities.join(", "),
            removable
        ]);
    }

    table.to_string()
}

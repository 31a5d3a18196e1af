//! One-shot query handler

use super::{open_controller, with_progress};
use crate::chat::SubmitOutcome;
use crate::config::Config;
use crate::display;
use crate::error::{MultiMcpError, Result};

/// Submit one query (or a suggested example) and print the reply
///
/// The exchange is appended to the persisted conversation like any chat
/// turn. With `json`, the raw backend payload is printed instead.
///
/// # Errors
///
/// Returns an error if the example id is unknown. A failed query is
/// recorded in the history and exits the process with status 1.
pub async fn run_query(
    config: Config,
    text: Option<String>,
    example: Option<String>,
    json: bool,
) -> Result<()> {
    let controller = open_controller(&config).await?;

    let outcome = match (text, example) {
        (_, Some(id)) => {
            with_progress(controller.progress(), controller.submit_example(&id)).await?
        }
        (Some(text), None) => with_progress(controller.progress(), controller.submit(&text)).await,
        (None, None) => {
            return Err(MultiMcpError::InvalidInput("query text is required".to_string()).into())
        }
    };

    match outcome {
        SubmitOutcome::Replied(message) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&message.result)?);
            } else {
                println!("{}", display::format_message(&message));
            }
            Ok(())
        }
        SubmitOutcome::Failed(_) => {
            // the notifier has already reported the reason
            drop(controller);
            std::process::exit(1);
        }
        SubmitOutcome::Empty => {
            Err(MultiMcpError::InvalidInput("query text is empty".to_string()).into())
        }
        SubmitOutcome::Busy => Err(MultiMcpError::InvalidInput(
            "another query is already in progress".to_string(),
        )
        .into()),
    }
}

//! CLI subcommands.

pub mod assistants;
pub mod choose;
pub mod config_cmd;

use std::path::PathBuf;

use clap::Args;
use concierge_core::data_source::DataSource;
use concierge_core::message::{Message, RequestBody};
use concierge_core::status::StatusEvent;

/// The request a command works on.
#[derive(Debug, Args)]
pub struct RequestArgs {
    /// The user's message
    #[arg(short, long)]
    pub message: Option<String>,

    /// JSON request body (`{"messages": [...], "model": "..."}`)
    #[arg(short, long)]
    pub body: Option<PathBuf>,

    /// Data source as `id:type` (repeatable)
    #[arg(short, long = "source")]
    pub sources: Vec<DataSource>,

    /// Model that answers the request (defaults to the body's, then the config's)
    #[arg(long)]
    pub model: Option<String>,
}

impl RequestArgs {
    /// Build the request body from `--body` and/or `--message`.
    ///
    /// A message is appended after the body's conversation, and `--model`
    /// replaces the body's model.
    pub fn request_body(&self) -> Result<RequestBody, Box<dyn std::error::Error>> {
        let mut body = match &self.body {
            Some(path) => {
                let content = std::fs::read_to_string(path)
                    .map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
                parse_body(&content)?
            }
            None => RequestBody::default(),
        };

        if let Some(message) = &self.message {
            body.messages.push(Message::user(message));
        }

        if let Some(model) = &self.model {
            body.model = Some(model.clone());
        }

        if body.messages.is_empty() {
            return Err("Nothing to do: pass --message or --body".into());
        }

        Ok(body)
    }
}

fn parse_body(content: &str) -> Result<RequestBody, Box<dyn std::error::Error>> {
    serde_json::from_str(content).map_err(|e| format!("Invalid request body: {e}").into())
}

/// One-line rendering of a status event for the terminal.
pub fn format_status(event: &StatusEvent) -> String {
    let marker = if event.in_progress { "…" } else { "✓" };
    match &event.message {
        Some(message) => format!("  {marker} {message}"),
        None => format!("  {marker}"),
    }
}

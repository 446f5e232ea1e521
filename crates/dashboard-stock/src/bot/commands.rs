//! Slash commands understood by the chat REPL

use crate::error::{DashboardError, Result};

/// Parsed line of user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Clear conversation history
    Clear,
    /// Show help
    Help,
    /// Exit the bot
    Exit,
    /// Free-text question for the chatbot
    Query { text: String },
}

impl Command {
    /// Parse a line of input; anything not starting with `/` is a query
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();

        if input.is_empty() {
            return Err(DashboardError::CommandError("Empty input".to_string()));
        }

        let Some(rest) = input.strip_prefix('/') else {
            return Ok(Command::Query {
                text: input.to_string(),
            });
        };

        let cmd = rest
            .split_whitespace()
            .next()
            .ok_or_else(|| DashboardError::CommandError("Empty command".to_string()))?
            .to_lowercase();

        match cmd.as_str() {
            "clear" | "cls" => Ok(Command::Clear),
            "help" | "h" | "?" => Ok(Command::Help),
            "exit" | "quit" | "q" => Ok(Command::Exit),
            _ => Err(DashboardError::CommandError(format!("Unknown command: {cmd}"))),
        }
    }

    pub fn help_text() -> &'static str {
        r#"
Stock Chat Commands
===================

  /clear    Clear conversation history   (alias: /cls)
  /help     Show this help                (aliases: /h, /?)
  /exit     Leave the chat                (aliases: /quit, /q)

Anything else is sent to the chatbot, for example:
  - "What's the price of AAPL?"
  - "Analyze RELIANCE.NS"
  - "Compare TCS vs INFY"
  - "help" for everything the bot can answer
"#
    }
}

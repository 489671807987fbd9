//! Command parsing for the interactive dashboard
//!
//! Input starting with `/` is a command; anything else is a company search.

use crate::error::{CliError, Result};
use pricescope_core::{Horizon, Intent, ModelId, Timeframe};

/// Parsed command from user input
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Free-text company search
    Search { query: String },
    /// Pick a suggestion by its 1-based position
    Pick { position: usize },
    /// List known companies, optionally filtered
    Companies { filter: Option<String> },
    /// Select a company by exact name
    Select { name: String },
    /// Switch the history timeframe
    Timeframe(Timeframe),
    /// Choose the forecast model
    Model(ModelId),
    /// Choose the forecast horizon
    Horizon(Horizon),
    /// Request a forecast
    Predict,
    /// Redraw the dashboard
    Show,
    /// Show help
    Help,
    /// Exit the dashboard
    Exit,
}

fn command_error(message: impl Into<String>) -> CliError {
    CliError::Command(message.into())
}

impl Command {
    /// Parse a command from user input
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();

        if input.is_empty() {
            return Err(command_error("Empty input"));
        }

        let Some(body) = input.strip_prefix('/') else {
            return Ok(Command::Search {
                query: input.to_string(),
            });
        };

        let (cmd, rest) = match body.split_once(char::is_whitespace) {
            Some((cmd, rest)) => (cmd.to_lowercase(), rest.trim()),
            None => (body.to_lowercase(), ""),
        };
        if cmd.is_empty() {
            return Err(command_error("Empty command"));
        }

        let required = |what: &str| {
            if rest.is_empty() {
                Err(command_error(format!("Missing {what} for /{cmd}")))
            } else {
                Ok(rest.to_string())
            }
        };

        match cmd.as_str() {
            "search" | "s" => Ok(Command::Search {
                query: required("query")?,
            }),
            "pick" | "p" => {
                let position = required("suggestion number")?
                    .parse::<usize>()
                    .ok()
                    .filter(|n| *n > 0)
                    .ok_or_else(|| command_error("Suggestion number must be 1 or more"))?;
                Ok(Command::Pick { position })
            }
            "companies" | "ls" => Ok(Command::Companies {
                filter: (!rest.is_empty()).then(|| rest.to_string()),
            }),
            "select" => Ok(Command::Select {
                name: required("company name")?,
            }),
            "tf" | "timeframe" => Ok(Command::Timeframe(required("timeframe")?.parse()?)),
            "model" => Ok(Command::Model(required("model id")?.parse()?)),
            "horizon" => Ok(Command::Horizon(required("horizon")?.parse()?)),
            "predict" | "fc" => Ok(Command::Predict),
            "show" => Ok(Command::Show),
            "help" | "h" | "?" => Ok(Command::Help),
            "exit" | "quit" | "q" => Ok(Command::Exit),
            _ => Err(command_error(format!("Unknown command: {}", cmd))),
        }
    }

    /// The dashboard intent this command issues, if any
    pub fn intent(&self) -> Option<Intent> {
        match self {
            Command::Search { query } => Some(Intent::Submit(query.clone())),
            Command::Pick { position } => Some(Intent::PickSuggestion(position - 1)),
            Command::Select { name } => Some(Intent::SelectCompany(name.clone())),
            Command::Timeframe(timeframe) => Some(Intent::ChangeTimeframe(*timeframe)),
            Command::Model(model) => Some(Intent::SelectModel(model.clone())),
            Command::Horizon(horizon) => Some(Intent::SelectHorizon(*horizon)),
            Command::Predict => Some(Intent::Predict),
            Command::Companies { .. } | Command::Show | Command::Help | Command::Exit => None,
        }
    }

    /// Get help text for all commands
    pub fn help_text() -> &'static str {
        r#"
Dashboard Commands
==================

Company:
  <text>                 Search for a company
  /search <text>         Search for a company
  /pick <n>              Pick suggestion number n
  /companies [filter]    List known companies
  /select <name>         Select a company by exact name

Chart:
  /tf <timeframe>        1D, 1W, 1M, 6M, 1Y, 5Y or Max
  /model <id>            Forecast model (linear, tree)
  /horizon <h>           Forecast horizon (1D, 1W, 1M)
  /predict               Overlay a forecast on the chart

Other:
  /show                  Redraw the dashboard
  /help                  Show help
  /exit                  Exit

Command Aliases:
  /s = /search    /p = /pick       /ls = /companies
  /fc = /predict  /h = /help       /q = /exit
"#
    }
}

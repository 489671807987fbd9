//! Error types for the terminal front-end

use pricescope_core::DashboardError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    /// Input that is not a valid command
    #[error("{0}")]
    Command(String),

    #[error(transparent)]
    Dashboard(#[from] DashboardError),
}

pub type Result<T> = std::result::Result<T, CliError>;

//! Error types for edulake-cli.
//!
//! Wraps library errors with user-facing message formatting so failures
//! read as plain sentences rather than debug dumps.

use edulake_link::EduLinkError;
use std::fmt;

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that can occur in the CLI
#[derive(Debug)]
pub enum CliError {
    /// Error from the edulake-link library
    LinkError(EduLinkError),

    /// Bad command-line usage
    UsageError(String),
}

impl CliError {
    fn format_link_error(err: &EduLinkError) -> String {
        match err {
            EduLinkError::ValidationError(msg) => format!("Invalid selection: {}", msg),
            EduLinkError::TimeoutError(msg) => {
                format!("{}. The query may still finish remotely; try again or raise --timeout.", msg)
            }
            EduLinkError::QueryFailedError { message, .. } => {
                format!("The remote query failed: {}", message)
            }
            EduLinkError::ShapeError(msg) => {
                format!("Result schema did not match expectations: {}", msg)
            }
            other => other.to_string(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LinkError(err) => f.write_str(&Self::format_link_error(err)),
            CliError::UsageError(msg) => f.write_str(msg),
        }
    }
}

impl std::error::Error for CliError {}

impl From<EduLinkError> for CliError {
    fn from(err: EduLinkError) -> Self {
        CliError::LinkError(err)
    }
}

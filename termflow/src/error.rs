//! # Error Handling
//!
//! Error taxonomy for the step orchestration core, plus utilities for
//! formatting errors on the terminal.

use thiserror::Error;

/// Errors surfaced by program resolution and step traversal
#[derive(Debug, Error)]
pub enum TermflowError {
    /// Invalid program configuration detected at run time
    #[error("Configuration error: {0}")]
    Config(String),

    /// The prompt collaborator failed to collect a value
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// A task handler returned an error; traversal stopped at this step
    #[error("Task `{step}` failed")]
    Task {
        step: String,
        #[source]
        source: anyhow::Error,
    },

    /// A step tried to write a value under a key that is already taken
    #[error("Duplicate value key: {0}")]
    DuplicateValue(String),

    /// IO failure while prompting or rendering
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl TermflowError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a prompt error
    pub fn prompt(message: impl Into<String>) -> Self {
        Self::Prompt(message.into())
    }
}

/// Format an error for display
pub fn format_error(error: &TermflowError) -> String {
    use colored::*;

    let mut output = format!("{} {}", "Error:".red().bold(), error);

    if let TermflowError::Task { source, .. } = error {
        output.push_str(&format!("\n{}\n  {}", "Details:".yellow(), source));
    }

    output
}

/// Print an error to stderr
pub fn print_error(error: &TermflowError) {
    eprintln!("{}", format_error(error));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_config_error() {
        let error = TermflowError::config("duplicate command name `build`");
        let formatted = format_error(&error);
        assert!(formatted.contains("Configuration error"));
        assert!(formatted.contains("duplicate command name `build`"));
    }

    #[test]
    fn test_format_task_error() {
        let error = TermflowError::Task {
            step: "gitstatus".to_string(),
            source: anyhow::anyhow!("git not found"),
        };
        let formatted = format_error(&error);
        assert!(formatted.contains("gitstatus"));
        assert!(formatted.contains("git not found"));
    }
}

//! ui::prompts
//!
//! Interactive prompts.
//!
//! # Design
//!
//! Readers and writers are passed in so the session can route prompts to
//! test buffers. A declined or unreadable confirmation is a normal outcome,
//! never an error.

use std::io::{BufRead, IsTerminal, Write};

use thiserror::Error;

/// Errors from prompts.
#[derive(Debug, Error)]
pub enum PromptError {
    #[error("not in interactive mode")]
    NotInteractive,

    #[error("input cannot be empty")]
    Empty,

    #[error("IO error: {0}")]
    IoError(String),
}

/// Printed when a confirmation is declined.
pub const CANCELLED: &str = "Operation cancelled.";

/// Ask a yes/no question. Only `y`, `Y`, and `yes` confirm.
pub fn confirm(message: &str, input: &mut dyn BufRead, output: &mut dyn Write) -> bool {
    let _ = writeln!(output, "⚠️  {}", message);
    let _ = write!(output, "Are you sure you want to continue? (y/N): ");
    let _ = output.flush();

    let mut line = String::new();
    match input.read_line(&mut line) {
        Ok(0) | Err(_) => false,
        Ok(_) => is_affirmative(&line),
    }
}

fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim(), "y" | "Y" | "yes")
}

/// Read a secret from the terminal without echo.
pub fn password(message: &str) -> Result<String, PromptError> {
    if !std::io::stdin().is_terminal() {
        return Err(PromptError::NotInteractive);
    }
    let value =
        rpassword::prompt_password(message).map_err(|e| PromptError::IoError(e.to_string()))?;
    let value = value.trim().to_string();
    if value.is_empty() {
        return Err(PromptError::Empty);
    }
    Ok(value)
}

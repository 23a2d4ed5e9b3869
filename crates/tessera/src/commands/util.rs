//! Shared helpers for command handlers.

use std::path::Path;

use tessera_core::{Console, CoreError};

use crate::error::CliError;

/// Route a failed API call through the notification store and produce the
/// matching CLI error. The toast carries the user-facing detail; the
/// returned error only sets the exit code and a short trailer line.
pub fn api_failure(console: &Console, err: tessera_api::Error, context: &str) -> CliError {
    console.notifications().handle_api_error(&err, context);
    CliError::Operation {
        context: context.to_owned(),
        source: CoreError::from(err),
    }
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(prompt_err)
}

/// Map a dialoguer / interactive I/O failure into CliError.
pub fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

/// Read and parse a JSON payload file for `--from-file` flags.
pub fn read_json_payload<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, CliError> {
    let contents = std::fs::read_to_string(path)?;
    serde_json::from_str(&contents).map_err(|e| CliError::Validation {
        field: "from-file".into(),
        reason: format!("invalid JSON: {e}"),
    })
}

/// Format a timestamp for table cells.
pub fn fmt_time(ts: &chrono::DateTime<chrono::Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M").to_string()
}

/// Yes/no table cell.
pub fn yes_no(flag: bool) -> &'static str {
    if flag { "yes" } else { "no" }
}

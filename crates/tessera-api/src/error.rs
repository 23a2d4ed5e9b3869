use std::collections::BTreeMap;

use thiserror::Error;

/// Top-level error type for the `tessera-api` crate.
///
/// Covers every failure mode across the API surface: authentication,
/// transport, and backend application errors. `tessera-core` maps these
/// into user-facing diagnostics and notifications.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Login failed (wrong credentials, account disabled, etc.)
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// The session could not be refreshed. The local session has been
    /// cleared and the consumer should route the user back to login.
    #[error("Session expired -- re-authentication required")]
    SessionExpired,

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS configuration or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Backend application errors ──────────────────────────────────
    /// Non-2xx response with a parsed backend message.
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// HTTP 422 with the backend's per-field validation errors.
    #[error("Validation failed: {message}")]
    Validation {
        message: String,
        /// Field name -> list of validation messages for that field.
        errors: BTreeMap<String, Vec<String>>,
    },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// The HTTP status code behind this error, if one applies.
    ///
    /// Transport failures that never produced a response (connection
    /// refused, DNS, timeout) return `None` — consumers treat that as a
    /// network error rather than a server error.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Validation { .. } => Some(422),
            Self::SessionExpired => Some(401),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// The backend-supplied human-readable message, if one was parsed.
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Api { message, .. }
            | Self::Validation { message, .. }
            | Self::Authentication { message } => Some(message),
            _ => None,
        }
    }

    /// Returns `true` if this error indicates the session is gone and
    /// re-authentication might resolve it.
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Self::SessionExpired) || self.status() == Some(401)
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

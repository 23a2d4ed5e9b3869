//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` variants into user-facing errors with actionable help
//! text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use tessera_core::CoreError;

/// Exit codes for process termination.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const PERMISSION: i32 = 5;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to the server at {url}")]
    #[diagnostic(
        code(tessera::connection_failed),
        help(
            "Check that the backend is reachable.\n\
             URL: {url}\n\
             For self-signed certificates, pass --insecure (-k)."
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(tessera::auth_failed),
        help("Check your email and password, then run: tessera login")
    )]
    AuthFailed { message: String },

    #[error("Session expired")]
    #[diagnostic(
        code(tessera::session_expired),
        help("Your session could not be refreshed. Run: tessera login")
    )]
    SessionExpired,

    #[error("Not signed in")]
    #[diagnostic(code(tessera::not_signed_in), help("Run: tessera login"))]
    NotSignedIn,

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource} not found")]
    #[diagnostic(
        code(tessera::not_found),
        help("The item does not exist or has been deleted.")
    )]
    NotFound { resource: String },

    #[error("Permission denied")]
    #[diagnostic(
        code(tessera::permission_denied),
        help("This operation requires an administrator role.")
    )]
    PermissionDenied { message: String },

    // ── Operations ───────────────────────────────────────────────────
    /// A resource operation failed after its error was already routed to
    /// the notification store; the toast carries the detail.
    #[error("{context} failed")]
    #[diagnostic(code(tessera::operation_failed))]
    Operation {
        context: String,
        #[source]
        source: CoreError,
    },

    #[error("API error: {message}")]
    #[diagnostic(code(tessera::api_error))]
    Api { message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(tessera::validation))]
    Validation { field: String, reason: String },

    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(tessera::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(tessera::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: tessera config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("Configuration file not found")]
    #[diagnostic(
        code(tessera::no_config),
        help(
            "Create one with: tessera config init\n\
             Or pass --server <URL> directly.\n\
             Expected at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(tessera::config))]
    Config(#[from] tessera_config::ConfigError),

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON payload: {0}")]
    #[diagnostic(code(tessera::json), help("Check the JSON file contents and try again."))]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::SessionExpired | Self::NotSignedIn => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::PermissionDenied { .. } => exit_code::PERMISSION,
            Self::Validation { .. } | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            Self::Operation { source, .. } => match source {
                CoreError::SessionExpired | CoreError::AuthenticationFailed { .. } => {
                    exit_code::AUTH
                }
                CoreError::NotFound { .. } => exit_code::NOT_FOUND,
                CoreError::PermissionDenied { .. } => exit_code::PERMISSION,
                CoreError::ConnectionFailed { .. } => exit_code::CONNECTION,
                _ => exit_code::GENERAL,
            },
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed {
                url,
                source: reason.into(),
            },

            CoreError::AuthenticationFailed { message } => CliError::AuthFailed { message },

            CoreError::SessionExpired => CliError::SessionExpired,

            CoreError::NotFound { resource } => CliError::NotFound { resource },

            CoreError::PermissionDenied { message } => CliError::PermissionDenied { message },

            CoreError::ValidationFailed { message } => CliError::Validation {
                field: "input".into(),
                reason: message,
            },

            CoreError::Api { message, status: _ } => CliError::Api { message },

            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },

            CoreError::Internal(message) => CliError::Api { message },
        }
    }
}

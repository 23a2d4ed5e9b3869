// ── Core error types ──
//
// User-facing errors from tessera-core. Consumers never see raw reqwest
// failures or JSON parse errors directly; the `From<tessera_api::Error>`
// impl translates transport-layer errors into domain-appropriate variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to the server at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Session expired -- sign in again")]
    SessionExpired,

    // ── Data errors ──────────────────────────────────────────────────
    #[error("{resource} not found")]
    NotFound { resource: String },

    #[error("Permission denied: {message}")]
    PermissionDenied { message: String },

    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<tessera_api::Error> for CoreError {
    fn from(err: tessera_api::Error) -> Self {
        match err {
            tessera_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            tessera_api::Error::SessionExpired => CoreError::SessionExpired,
            tessera_api::Error::Transport(ref e) => {
                if e.is_connect() || e.is_timeout() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map(|u| u.to_string())
                            .unwrap_or_else(|| "<unknown>".into()),
                        reason: e.to_string(),
                    }
                } else if e.status().map(|s| s.as_u16()) == Some(404) {
                    CoreError::NotFound {
                        resource: e.url().map(|u| u.path().to_owned()).unwrap_or_default(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            tessera_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            tessera_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            tessera_api::Error::Api { status: 403, message } => {
                CoreError::PermissionDenied { message }
            }
            tessera_api::Error::Api { status: 404, message } => {
                CoreError::NotFound { resource: message }
            }
            tessera_api::Error::Api { status, message } => CoreError::Api {
                message,
                status: Some(status),
            },
            tessera_api::Error::Validation { message, errors } => {
                let detail: Vec<String> = errors
                    .into_iter()
                    .map(|(field, msgs)| format!("{field}: {}", msgs.join(", ")))
                    .collect();
                CoreError::ValidationFailed {
                    message: if detail.is_empty() {
                        message
                    } else {
                        format!("{message} ({})", detail.join("; "))
                    },
                }
            }
            tessera_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn session_expired_maps_through() {
        let err = CoreError::from(tessera_api::Error::SessionExpired);
        assert!(matches!(err, CoreError::SessionExpired));
    }

    #[test]
    fn forbidden_maps_to_permission_denied() {
        let err = CoreError::from(tessera_api::Error::Api {
            status: 403,
            message: "Forbidden".into(),
        });
        assert!(matches!(err, CoreError::PermissionDenied { .. }));
    }

    #[test]
    fn validation_errors_are_flattened_into_the_message() {
        let mut errors = std::collections::BTreeMap::new();
        errors.insert("email".to_owned(), vec!["invalid".to_owned()]);
        let err = CoreError::from(tessera_api::Error::Validation {
            message: "The given data was invalid.".into(),
            errors,
        });
        match err {
            CoreError::ValidationFailed { message } => {
                assert!(message.contains("email: invalid"), "got: {message}");
            }
            other => panic!("expected ValidationFailed, got: {other:?}"),
        }
    }
}

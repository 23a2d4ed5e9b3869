// ── Console facade ──
//
// Wires configuration, auth session, API client, and notification store
// into one handle for consumers (CLI today). The admin API is plain
// request/response, so unlike a streaming data layer there are no
// background refresh tasks -- the facade owns construction and the auth
// lifecycle, and hands out the client for resource operations.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use secrecy::SecretString;
use tracing::debug;
use url::Url;

use tessera_api::types::User;
use tessera_api::{ApiClient, AuthSession, TlsMode, TokenPair, TransportConfig};

use crate::error::CoreError;
use crate::notify::NotificationStore;

/// TLS verification strategy (core-level mirror of the api crate's
/// `TlsMode`, so config consumers never import the transport layer).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict). Default.
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (self-signed staging backends).
    DangerAcceptInvalid,
}

/// Configuration for connecting to a backend.
///
/// Built by the CLI from its config file and flags -- core never reads
/// config files itself.
#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    /// Backend root URL (e.g. `https://cards.example.com`).
    pub url: Url,
    /// TLS verification strategy.
    pub tls: TlsVerification,
    /// Request timeout.
    pub timeout: Duration,
}

/// The main entry point for consumers.
///
/// Owns the API client (with its injected auth session) and the
/// notification store; both are created at construction and torn down
/// together when the console is dropped.
pub struct Console {
    api: Arc<ApiClient>,
    notifications: Arc<NotificationStore>,
}

impl Console {
    /// Build a console from configuration. Does not touch the network --
    /// authentication happens on [`login`](Self::login) or when a restored
    /// session sends its first request.
    pub fn new(config: &ConsoleConfig) -> Result<Self, CoreError> {
        let transport = TransportConfig {
            tls: match &config.tls {
                TlsVerification::SystemDefaults => TlsMode::System,
                TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
                TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
            },
            timeout: config.timeout,
        };

        let session = Arc::new(AuthSession::new());
        let api = ApiClient::new(config.url.clone(), session, &transport)?;
        debug!(url = %config.url, "console ready");

        Ok(Self {
            api: Arc::new(api),
            notifications: NotificationStore::new(),
        })
    }

    /// The API client for resource operations.
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// The notification store shared by all producers and the rendering
    /// surface.
    pub fn notifications(&self) -> &Arc<NotificationStore> {
        &self.notifications
    }

    /// The auth session (token state + lifecycle channel).
    pub fn session(&self) -> &Arc<AuthSession> {
        self.api.session()
    }

    // ── Auth lifecycle ───────────────────────────────────────────────

    /// Install a previously persisted token pair (no network call).
    pub fn restore_session(&self, pair: TokenPair) {
        self.session().install(pair);
    }

    /// Authenticate and install the issued token pair.
    pub async fn login(&self, email: &str, password: &SecretString) -> Result<User, CoreError> {
        Ok(self.api.login(email, password).await?)
    }

    /// Best-effort server-side sign-out; the local session is always
    /// cleared.
    pub async fn logout(&self) {
        self.api.logout().await;
    }

    /// The currently authenticated user.
    pub async fn whoami(&self) -> Result<User, CoreError> {
        Ok(self.api.me().await?)
    }
}

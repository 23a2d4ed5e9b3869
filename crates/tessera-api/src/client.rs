// HTTP client for the backend API.
//
// Wraps `reqwest::Client` with base-URL construction, Laravel envelope
// handling, and the authenticated send pipeline: bearer attachment, and on
// a 401 with a credential held, a single-flight token refresh followed by
// exactly one retry of the original request. Endpoint modules (cards,
// banners, users, account) are implemented as inherent methods in separate
// files to keep this module focused on transport mechanics.

use std::collections::BTreeMap;
use std::sync::Arc;

use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;
use tracing::{debug, warn};
use url::Url;

use crate::error::Error;
use crate::session::AuthSession;
use crate::transport::TransportConfig;

/// Laravel error body: `{"message": "...", "errors": {"field": ["..."]}}`.
#[derive(serde::Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    errors: Option<BTreeMap<String, Vec<String>>>,
}

/// Async client for the backend REST API.
///
/// All endpoint methods funnel through [`execute`](Self::execute), which
/// owns the credential-attachment and refresh-and-retry behavior. The
/// client holds no token state of its own — that lives in the injected
/// [`AuthSession`].
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    session: Arc<AuthSession>,
    /// Serializes refresh attempts so concurrent 401s trigger at most one
    /// network refresh.
    refresh_gate: Mutex<()>,
}

impl ApiClient {
    /// Create a new client from a base URL and transport config.
    ///
    /// `base_url` is the backend root (e.g. `https://cards.example.com`);
    /// the `/api/` prefix is appended per request.
    pub fn new(
        base_url: Url,
        session: Arc<AuthSession>,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self {
            http,
            base_url,
            session,
            refresh_gate: Mutex::new(()),
        })
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url, session: Arc<AuthSession>) -> Self {
        Self {
            http,
            base_url,
            session,
            refresh_gate: Mutex::new(()),
        }
    }

    /// The injected auth session.
    pub fn session(&self) -> &Arc<AuthSession> {
        &self.session
    }

    /// The backend base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The underlying HTTP client (for auth flows that bypass the pipeline).
    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Build a full URL for an API path: `{base}/api/{path}`.
    pub(crate) fn api_url(&self, path: &str) -> Url {
        let base = self.base_url.as_str().trim_end_matches('/');
        Url::parse(&format!("{base}/api/{path}")).expect("invalid API URL")
    }

    // ── Authenticated send pipeline ──────────────────────────────────

    /// Send a request with the current credential attached, recovering
    /// from a single class of authentication failure.
    ///
    /// `build` constructs the request from scratch; it is invoked once per
    /// attempt, so the retry is always rebuilt from the original request
    /// with the new bearer header — never re-wrapped.
    ///
    /// Behavior on 401:
    /// - credential was held: one refresh attempt, then one retry whose
    ///   outcome is final (a second 401 is not refreshed again). If the
    ///   refresh fails or yields no token, the session is expired and
    ///   [`Error::SessionExpired`] is returned.
    /// - no credential held: the response is returned unchanged; there is
    ///   nothing to refresh.
    pub(crate) async fn execute(
        &self,
        build: impl Fn() -> reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, Error> {
        let token = self.session.access_token();
        let resp = self.dispatch(&build, token.as_ref()).await?;

        if resp.status() != StatusCode::UNAUTHORIZED {
            return Ok(resp);
        }
        let Some(stale) = token else {
            return Ok(resp);
        };

        debug!("401 with credential held, attempting token refresh");
        match self.refresh_access(&stale).await {
            Ok(true) => {
                if let Some(fresh) = self.session.access_token() {
                    // Retry once with the rebuilt original request; the
                    // outcome is final whatever its status.
                    return self.dispatch(&build, Some(&fresh)).await;
                }
                warn!("refresh reported success but no token is available");
            }
            Ok(false) => debug!("token refresh rejected by backend"),
            Err(e) => warn!(error = %e, "token refresh failed"),
        }

        self.session.expire();
        Err(Error::SessionExpired)
    }

    /// Build and send a single attempt, attaching the bearer header when a
    /// credential is supplied.
    async fn dispatch(
        &self,
        build: &impl Fn() -> reqwest::RequestBuilder,
        token: Option<&SecretString>,
    ) -> Result<reqwest::Response, Error> {
        let mut req = build();
        if let Some(token) = token {
            req = req.bearer_auth(token.expose_secret());
        }
        req.send().await.map_err(Error::Transport)
    }

    /// Acquire the refresh gate and exchange the refresh token for a new
    /// pair. Returns `Ok(true)` when a fresh access token is installed.
    ///
    /// `stale` is the access token the failed request was sent with: if
    /// the session already holds a different token by the time the gate is
    /// acquired, another request completed the refresh first and no
    /// network call is made.
    async fn refresh_access(&self, stale: &SecretString) -> Result<bool, Error> {
        let _guard = self.refresh_gate.lock().await;

        if let Some(current) = self.session.access_token() {
            if current.expose_secret() != stale.expose_secret() {
                debug!("session already refreshed by a concurrent request");
                return Ok(true);
            }
        }

        self.refresh_session().await
    }

    // ── Request helpers ──────────────────────────────────────────────

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.api_url(path);
        debug!("GET {url}");

        let resp = self.execute(|| self.http.get(url.clone())).await?;
        self.parse(resp).await
    }

    pub(crate) async fn get_with_query<T: DeserializeOwned, Q: Serialize + Sync>(
        &self,
        path: &str,
        query: &Q,
    ) -> Result<T, Error> {
        let url = self.api_url(path);
        debug!("GET {url}");

        let resp = self
            .execute(|| self.http.get(url.clone()).query(query))
            .await?;
        self.parse(resp).await
    }

    pub(crate) async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.api_url(path);
        debug!("POST {url}");

        let resp = self
            .execute(|| self.http.post(url.clone()).json(body))
            .await?;
        self.parse(resp).await
    }

    pub(crate) async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.api_url(path);
        debug!("DELETE {url}");

        let resp = self.execute(|| self.http.delete(url.clone())).await?;
        self.parse(resp).await
    }

    // ── Response handling ────────────────────────────────────────────

    /// Deserialize a success body, or map a failure status to an [`Error`].
    pub(crate) async fn parse<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, Error> {
        let status = resp.status();
        if !status.is_success() {
            return Err(self.response_error(status, resp).await);
        }

        let body = resp.text().await.map_err(Error::Transport)?;
        serde_json::from_str(&body).map_err(|e| {
            let preview = &body[..body.len().min(200)];
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body: body.clone(),
            }
        })
    }

    /// Map a non-success response to an [`Error`], parsing the Laravel
    /// error body when present.
    pub(crate) async fn response_error(&self, status: StatusCode, resp: reqwest::Response) -> Error {
        let raw = resp.text().await.unwrap_or_default();
        let parsed: Option<ErrorBody> = serde_json::from_str(&raw).ok();

        let message = parsed
            .as_ref()
            .and_then(|b| b.message.clone())
            .unwrap_or_else(|| {
                if raw.is_empty() {
                    status.to_string()
                } else {
                    raw[..raw.len().min(200)].to_owned()
                }
            });

        if status == StatusCode::UNPROCESSABLE_ENTITY {
            return Error::Validation {
                message,
                errors: parsed.and_then(|b| b.errors).unwrap_or_default(),
            };
        }

        Error::Api {
            status: status.as_u16(),
            message,
        }
    }
}

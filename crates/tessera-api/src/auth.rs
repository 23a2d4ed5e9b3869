// Authentication endpoints.
//
// Bearer-token login/refresh/logout against the backend's JWT auth routes.
// A successful login installs the token pair in the injected session; the
// refresh flow is driven by the send pipeline in `client.rs`.

use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::session::TokenPair;
use crate::types::User;

#[derive(serde::Deserialize)]
struct AuthResponse {
    token: String,
    refresh_token: String,
    user: User,
}

#[derive(serde::Deserialize)]
struct RefreshResponse {
    #[serde(default)]
    token: Option<String>,
    /// The backend may rotate the refresh token; absent means keep the old one.
    #[serde(default)]
    refresh_token: Option<String>,
}

impl ApiClient {
    /// Authenticate with email/password.
    ///
    /// On success the token pair is installed in the session and used for
    /// all subsequent requests.
    pub async fn login(&self, email: &str, password: &SecretString) -> Result<User, Error> {
        let url = self.api_url("auth/login");
        debug!("logging in at {url}");

        let body = json!({
            "email": email,
            "password": password.expose_secret(),
        });

        let resp = self
            .http()
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(Error::Transport)?;

        let status = resp.status();
        if !status.is_success() {
            let err = self.response_error(status, resp).await;
            let message = match err.message() {
                Some(m) => m.to_owned(),
                None => format!("login failed (HTTP {status})"),
            };
            return Err(Error::Authentication { message });
        }

        let auth: AuthResponse = self.parse(resp).await?;
        self.session().install(TokenPair {
            access: auth.token.into(),
            refresh: auth.refresh_token.into(),
        });

        debug!("login successful");
        Ok(auth.user)
    }

    /// End the current session.
    ///
    /// The server-side revocation is best effort; the local session is
    /// cleared regardless of the outcome.
    pub async fn logout(&self) {
        if let Some(token) = self.session().access_token() {
            let url = self.api_url("auth/logout");
            debug!("logging out at {url}");

            if let Err(e) = self
                .http()
                .post(url)
                .bearer_auth(token.expose_secret())
                .send()
                .await
            {
                debug!(error = %e, "logout request failed, clearing session anyway");
            }
        }

        self.session().clear();
    }

    /// The currently authenticated user.
    pub async fn me(&self) -> Result<User, Error> {
        self.get("auth/me").await
    }

    /// Exchange the held refresh token for a new token pair.
    ///
    /// Returns `Ok(true)` when a new access token was installed, `Ok(false)`
    /// when no refresh token is held or the backend rejected the exchange
    /// or answered without a usable token. Transport failures propagate as
    /// errors; the send pipeline treats all three the same way (terminal).
    pub(crate) async fn refresh_session(&self) -> Result<bool, Error> {
        let Some(refresh) = self.session().refresh_token() else {
            return Ok(false);
        };

        let url = self.api_url("auth/refresh");
        debug!("refreshing session at {url}");

        let body = json!({ "refresh_token": refresh.expose_secret() });
        let resp = self
            .http()
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(Error::Transport)?;

        if !resp.status().is_success() {
            return Ok(false);
        }

        let refreshed: RefreshResponse = self.parse(resp).await?;
        match refreshed.token {
            Some(token) if !token.is_empty() => {
                let next_refresh = refreshed
                    .refresh_token
                    .map_or(refresh, SecretString::from);
                self.session().install(TokenPair {
                    access: token.into(),
                    refresh: next_refresh,
                });
                debug!("session refreshed");
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

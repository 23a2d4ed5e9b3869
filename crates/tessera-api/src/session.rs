// Auth session state: the bearer/refresh token pair plus an observable
// lifecycle channel.
//
// The session is constructor-injected into `ApiClient` — there is no
// ambient global token. Consumers that need to react to a forced sign-out
// (the "redirect to login" transition) subscribe to the state channel.

use std::sync::RwLock;

use secrecy::SecretString;
use tokio::sync::watch;
use tracing::debug;

/// The access/refresh token pair issued by the backend on login.
#[derive(Clone)]
pub struct TokenPair {
    pub access: SecretString,
    pub refresh: SecretString,
}

impl std::fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenPair").finish_non_exhaustive()
    }
}

/// Observable session lifecycle state.
///
/// `Expired` is distinct from `SignedOut`: it means the session was torn
/// down because a token refresh failed, and the consumer should route the
/// user to the login screen rather than treat it as a normal sign-out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    SignedOut,
    SignedIn,
    Expired,
}

/// Holds the current credential and broadcasts lifecycle transitions.
pub struct AuthSession {
    tokens: RwLock<Option<TokenPair>>,
    state: watch::Sender<SessionState>,
}

impl AuthSession {
    pub fn new() -> Self {
        let (state, _) = watch::channel(SessionState::SignedOut);
        Self {
            tokens: RwLock::new(None),
            state,
        }
    }

    /// The current access token, if a session is held.
    pub fn access_token(&self) -> Option<SecretString> {
        self.tokens
            .read()
            .expect("session lock poisoned")
            .as_ref()
            .map(|pair| pair.access.clone())
    }

    /// The current refresh token, if a session is held.
    pub fn refresh_token(&self) -> Option<SecretString> {
        self.tokens
            .read()
            .expect("session lock poisoned")
            .as_ref()
            .map(|pair| pair.refresh.clone())
    }

    /// Install a freshly issued token pair (login or refresh).
    pub fn install(&self, pair: TokenPair) {
        debug!("installing session tokens");
        *self.tokens.write().expect("session lock poisoned") = Some(pair);
        self.state.send_modify(|s| *s = SessionState::SignedIn);
    }

    /// Drop the held tokens after a user-requested sign-out.
    pub fn clear(&self) {
        debug!("clearing session");
        *self.tokens.write().expect("session lock poisoned") = None;
        self.state.send_modify(|s| *s = SessionState::SignedOut);
    }

    /// Drop the held tokens because a refresh failed. Subscribers watching
    /// the state channel see `Expired` and perform the login redirect.
    pub fn expire(&self) {
        debug!("expiring session after failed refresh");
        *self.tokens.write().expect("session lock poisoned") = None;
        self.state.send_modify(|s| *s = SessionState::Expired);
    }

    /// The current lifecycle state.
    pub fn state(&self) -> SessionState {
        *self.state.borrow()
    }

    /// Subscribe to lifecycle transitions.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    pub fn is_authenticated(&self) -> bool {
        self.tokens
            .read()
            .expect("session lock poisoned")
            .is_some()
    }
}

impl Default for AuthSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn pair(access: &str, refresh: &str) -> TokenPair {
        TokenPair {
            access: access.to_owned().into(),
            refresh: refresh.to_owned().into(),
        }
    }

    #[test]
    fn starts_signed_out() {
        let session = AuthSession::new();
        assert_eq!(session.state(), SessionState::SignedOut);
        assert!(session.access_token().is_none());
        assert!(!session.is_authenticated());
    }

    #[test]
    fn install_transitions_to_signed_in() {
        let session = AuthSession::new();
        session.install(pair("acc", "ref"));
        assert_eq!(session.state(), SessionState::SignedIn);
        assert!(session.is_authenticated());
    }

    #[test]
    fn expire_drops_tokens_and_flags_expired() {
        let session = AuthSession::new();
        session.install(pair("acc", "ref"));
        session.expire();
        assert_eq!(session.state(), SessionState::Expired);
        assert!(session.access_token().is_none());
        assert!(session.refresh_token().is_none());
    }

    #[test]
    fn subscribers_observe_transitions() {
        let session = AuthSession::new();
        let rx = session.subscribe();
        session.install(pair("acc", "ref"));
        assert_eq!(*rx.borrow(), SessionState::SignedIn);
        session.clear();
        assert_eq!(*rx.borrow(), SessionState::SignedOut);
    }
}

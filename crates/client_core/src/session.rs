//! Session lifecycle: token resolution at startup, login, logout.

use std::sync::Arc;

use shared::{domain::Identity, error::AuthError};
use storage::{KeyValueStore, KEY_SESSION_TOKEN};
use tokio::sync::{broadcast, Mutex};
use tracing::{info, warn};

use crate::{AuthBackend, StateEvent};

/// Session state machine. `Resolving` exists only between construction and
/// the first `resolve_session`; it is never re-entered.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SessionState {
    #[default]
    Resolving,
    Unauthenticated,
    Authenticated(Identity),
}

impl SessionState {
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            SessionState::Authenticated(identity) => Some(identity),
            _ => None,
        }
    }
}

pub struct SessionManager {
    auth: Arc<dyn AuthBackend>,
    store: Arc<dyn KeyValueStore>,
    state: Mutex<SessionState>,
    events: broadcast::Sender<StateEvent>,
}

impl SessionManager {
    pub fn new(
        auth: Arc<dyn AuthBackend>,
        store: Arc<dyn KeyValueStore>,
        events: broadcast::Sender<StateEvent>,
    ) -> Self {
        Self {
            auth,
            store,
            state: Mutex::new(SessionState::Resolving),
            events,
        }
    }

    /// Startup resolution: consult the persisted token once and settle into
    /// Unauthenticated or Authenticated. Does not error; a backend failure
    /// during resolution degrades to Unauthenticated (the token is kept so a
    /// later login can replace it). Calling again after the initial
    /// resolution returns the current identity without touching the backend.
    pub async fn resolve_session(&self) -> Option<Identity> {
        {
            let state = self.state.lock().await;
            if !matches!(*state, SessionState::Resolving) {
                return state.identity().cloned();
            }
        }

        let token = match self.store.get(KEY_SESSION_TOKEN).await {
            Ok(token) => token,
            Err(err) => {
                warn!("session token read failed, treating as signed out: {err:#}");
                None
            }
        };

        let resolved = match token {
            Some(token) => match self.auth.resolve(&token).await {
                Ok(identity) => identity,
                Err(err) => {
                    warn!("session resolution failed, treating as signed out: {err}");
                    None
                }
            },
            None => None,
        };

        let identity = resolved.clone();
        {
            let mut state = self.state.lock().await;
            // Guard against a login that raced ahead of resolution.
            if !matches!(*state, SessionState::Resolving) {
                return state.identity().cloned();
            }
            *state = match resolved {
                Some(identity) => SessionState::Authenticated(identity),
                None => SessionState::Unauthenticated,
            };
        }

        let _ = self.events.send(StateEvent::SessionChanged);
        identity
    }

    /// Authenticates and persists the issued session token before the
    /// identity becomes visible. Concurrent logins are not coordinated;
    /// the last call to mutate wins.
    pub async fn login(&self, email: &str) -> Result<Identity, AuthError> {
        let (token, identity) = self.auth.login(email).await?;

        if let Err(err) = self.store.set(KEY_SESSION_TOKEN, &token).await {
            // Degraded: the session works for this process but will not
            // survive a restart.
            warn!("failed to persist session token: {err:#}");
        }

        {
            let mut state = self.state.lock().await;
            *state = SessionState::Authenticated(identity.clone());
        }
        let _ = self.events.send(StateEvent::SessionChanged);
        info!(user = %identity.id, tenant = %identity.tenant_id, "signed in");
        Ok(identity)
    }

    /// Clears the active identity and the persisted token. Idempotent; safe
    /// to call while already signed out.
    pub async fn logout(&self) {
        let was_authenticated = {
            let mut state = self.state.lock().await;
            let was = matches!(*state, SessionState::Authenticated(_));
            *state = SessionState::Unauthenticated;
            was
        };

        if let Err(err) = self.store.remove(KEY_SESSION_TOKEN).await {
            warn!("failed to clear persisted session token: {err:#}");
        }

        if was_authenticated {
            let _ = self.events.send(StateEvent::SessionChanged);
            info!("signed out");
        }
    }

    pub async fn state(&self) -> SessionState {
        self.state.lock().await.clone()
    }

    pub async fn active_identity(&self) -> Option<Identity> {
        self.state.lock().await.identity().cloned()
    }
}

use std::sync::Arc;

use models::{Role, Session};
use tracing::{debug, error, info, warn};

use crate::errors::ServiceError;
use crate::observability::FORCED_LOGOUTS_TOTAL;
use crate::session::context::SessionContext;
use crate::session::store::SessionStore;
use crate::storage::DurableStorage;

pub const TOKEN_KEY: &str = "token";
pub const ROLE_KEY: &str = "role";
pub const USERNAME_KEY: &str = "username";
pub const TEAM_ID_KEY: &str = "teamId";

/// Keys removed on logout.
pub const SESSION_KEYS: [&str; 4] = [TOKEN_KEY, ROLE_KEY, TEAM_ID_KEY, USERNAME_KEY];

/// Which fields startup hydration copied from storage into memory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Hydration {
    pub token: bool,
    pub role: bool,
    pub username: bool,
}

impl Hydration {
    pub fn restored_any(&self) -> bool {
        self.token || self.role || self.username
    }
}

/// Mirrors session fields into durable storage and restores them on startup.
#[derive(Clone)]
pub struct PersistenceBridge {
    storage: Arc<dyn DurableStorage>,
}

impl PersistenceBridge {
    pub fn new(storage: Arc<dyn DurableStorage>) -> Self {
        Self { storage }
    }

    /// Copy `token`, `role`, `username` from storage into the store through its
    /// setters, skipping any field already present in memory. `teamId` is not
    /// read back; it is re-fetched for managers.
    pub async fn hydrate(&self, store: &SessionStore) -> Hydration {
        let current = store.snapshot().await;
        let mut restored = Hydration::default();

        if current.token.is_none() {
            if let Some(token) = self.storage.get(TOKEN_KEY).await.filter(|t| !t.is_empty()) {
                store.set_token(token).await;
                restored.token = true;
            }
        }
        if current.role.is_none() {
            if let Some(raw) = self.storage.get(ROLE_KEY).await {
                match raw.parse::<Role>() {
                    Ok(role) => {
                        store.set_role(role).await;
                        restored.role = true;
                    }
                    Err(e) => warn!(error = %e, "ignoring stored role"),
                }
            }
        }
        if current.username.is_none() {
            if let Some(username) = self.storage.get(USERNAME_KEY).await.filter(|u| !u.is_empty()) {
                store.set_username(username).await;
                restored.username = true;
            }
        }

        if restored.restored_any() {
            info!(event = "session_hydrated", token = restored.token, role = restored.role, username = restored.username, "session restored from storage");
        } else {
            debug!("nothing to restore from storage");
        }
        restored
    }

    pub async fn persist_login(&self, token: &str, role: Role, username: &str) -> Result<(), ServiceError> {
        self.storage.set(TOKEN_KEY, token.to_string()).await?;
        self.storage.set(ROLE_KEY, role.as_str().to_string()).await?;
        self.storage.set(USERNAME_KEY, username.to_string()).await?;
        Ok(())
    }

    pub async fn persist_team(&self, team_id: i64) -> Result<(), ServiceError> {
        self.storage.set(TEAM_ID_KEY, team_id.to_string()).await
    }

    /// Remove every session key. Failures are logged, never returned.
    pub async fn forget(&self) {
        if let Err(e) = self.storage.remove(&SESSION_KEYS).await {
            error!(error = %e, "failed to clear session storage");
        }
    }

    /// Clear storage, then reset the in-memory session.
    pub(crate) async fn end_session(&self, session: &SessionContext) {
        let mut current = session.lock().await;
        self.forget().await;
        *current = Session::default();
    }

    /// Session teardown after the backend rejected `rejected` with a 401.
    ///
    /// Only ends the session while `rejected` is still the current token; a
    /// late reply for a replaced token leaves the new session alone.
    pub(crate) async fn expire(&self, session: &SessionContext, rejected: &str) -> bool {
        let mut current = session.lock().await;
        if current.token.as_deref() != Some(rejected) {
            debug!("401 for a token that is no longer current; session kept");
            return false;
        }
        self.forget().await;
        *current = Session::default();
        drop(current);

        FORCED_LOGOUTS_TOTAL.inc();
        warn!(event = "session_forced_logout", "backend rejected the token; ending session");
        true
    }
}

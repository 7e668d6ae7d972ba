use std::sync::Arc;

use models::{LoginStatus, Role, Session, TokenReply, UserInfo};
use tracing::{debug, error, info, instrument, warn};

use crate::observability::{LOGIN_ATTEMPTS_TOTAL, LOGIN_FAILURES_TOTAL, SECONDARY_FETCH_FAILURES_TOTAL};
use crate::session::backend::{RawReply, SessionBackend};
use crate::session::context::SessionContext;
use crate::session::errors::{LoginError, SessionError};
use crate::session::persistence::{Hydration, PersistenceBridge};

/// Literal body the backend sends for a wrong username/password.
pub const BAD_CREDENTIALS: &str = "Bad credentials";

/// What a successful login resolved to once every stage was awaited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutcome {
    pub role: Role,
    pub employee_id: Option<i64>,
    pub team_id: Option<i64>,
}

/// Single source of truth for authentication state.
///
/// Holds the shared [`SessionContext`] and is the only public way to mutate it.
#[derive(Clone)]
pub struct SessionStore {
    session: SessionContext,
    bridge: PersistenceBridge,
    backend: Arc<dyn SessionBackend>,
}

impl SessionStore {
    pub fn new(session: SessionContext, bridge: PersistenceBridge, backend: Arc<dyn SessionBackend>) -> Self {
        Self { session, bridge, backend }
    }

    pub fn context(&self) -> &SessionContext {
        &self.session
    }

    pub async fn snapshot(&self) -> Session {
        self.session.snapshot().await
    }

    /// Authenticate, persist, then hydrate profile and (for managers) team.
    ///
    /// The stages run as awaited steps in that order, so the team lookup sees
    /// the employee id written by the profile fetch. Profile/team failures are
    /// logged and do not fail the login.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use service::session::{backend::mock::MockSessionBackend, PersistenceBridge, SessionContext, SessionStore};
    /// use service::storage::MemoryStorage;
    ///
    /// let backend = Arc::new(MockSessionBackend::default().with_token_reply(200, "ADMIN s3cr3t"));
    /// let store = SessionStore::new(SessionContext::new(), PersistenceBridge::new(MemoryStorage::new()), backend);
    /// let outcome = tokio_test::block_on(store.login("root", "pw")).unwrap();
    /// assert_eq!(outcome.role, models::Role::Admin);
    /// assert_eq!(tokio_test::block_on(store.snapshot()).token.as_deref(), Some("s3cr3t"));
    /// ```
    #[instrument(skip(self, password))]
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginOutcome, LoginError> {
        LOGIN_ATTEMPTS_TOTAL.inc();
        self.session
            .update(|s| {
                s.status = LoginStatus::Loading;
                s.error = None;
            })
            .await;

        let reply = match self.authenticate(username, password).await {
            Ok(reply) => reply,
            Err(e) => {
                LOGIN_FAILURES_TOTAL.inc();
                warn!(event = "login_failed", code = e.code(), reason = %e, "login rejected");
                let message = e.to_string();
                self.session
                    .update(|s| {
                        s.status = LoginStatus::Failed;
                        s.error = Some(message);
                    })
                    .await;
                return Err(e);
            }
        };

        let TokenReply { role, token } = reply;
        {
            let mut s = self.session.lock().await;
            if let Err(e) = self.bridge.persist_login(&token, role, username).await {
                error!(error = %e, "failed to persist session; it will not survive a restart");
            }
            s.token = Some(token);
            s.role = Some(role);
            s.username = Some(username.to_string());
            s.status = LoginStatus::Succeeded;
            s.error = None;
        }
        info!(event = "login_succeeded", %role, "login succeeded");

        let employee_id = self.fetch_user_info(username).await.ok().map(|info| info.employee_id);
        let team_id = if role == Role::Manager { self.fetch_team_info().await.ok().flatten() } else { None };

        Ok(LoginOutcome { role, employee_id, team_id })
    }

    async fn authenticate(&self, username: &str, password: &str) -> Result<TokenReply, LoginError> {
        let raw = self.backend.request_token(username, password).await?;
        interpret_token_reply(&raw)
    }

    /// Load the profile for `username` into the session. Idempotent.
    #[instrument(skip(self))]
    pub async fn fetch_user_info(&self, username: &str) -> Result<UserInfo, SessionError> {
        let info = match self.backend.user_info(username).await {
            Ok(info) => info,
            Err(e) => {
                SECONDARY_FETCH_FAILURES_TOTAL.inc();
                warn!(event = "user_info_fetch_failed", error = %e, "profile fetch failed; keeping previous fields");
                return Err(e.into());
            }
        };
        let loaded = info.clone();
        self.session
            .update(move |s| {
                s.employee_id = Some(info.employee_id);
                s.username = Some(info.username);
                s.first_name = info.first_name;
                s.last_name = info.last_name;
            })
            .await;
        debug!(employee_id = loaded.employee_id, "profile loaded");
        Ok(loaded)
    }

    /// Resolve the team managed by the current employee.
    ///
    /// Without a known employee id this returns `Ok(None)` and makes no request.
    #[instrument(skip(self))]
    pub async fn fetch_team_info(&self) -> Result<Option<i64>, SessionError> {
        let Some(employee_id) = self.session.employee_id().await else {
            debug!("no employee id yet; skipping team lookup");
            return Ok(None);
        };
        let teams = match self.backend.teams_for_employee(employee_id).await {
            Ok(teams) => teams,
            Err(e) => {
                SECONDARY_FETCH_FAILURES_TOTAL.inc();
                warn!(event = "team_fetch_failed", employee_id, error = %e, "team fetch failed");
                return Err(e.into());
            }
        };
        let Some(team_id) = teams.first().map(|t| t.id) else {
            info!(employee_id, "employee manages no team");
            return Ok(None);
        };
        self.session.update(|s| s.team_id = Some(team_id)).await;
        if let Err(e) = self.bridge.persist_team(team_id).await {
            warn!(error = %e, "failed to mirror teamId to storage");
        }
        Ok(Some(team_id))
    }

    /// Clear storage and reset the session. Never fails.
    #[instrument(skip(self))]
    pub async fn logout(&self) {
        self.bridge.end_session(&self.session).await;
        info!(event = "session_logged_out", "session cleared");
    }

    /// Restore token/role/username from durable storage (startup path).
    pub async fn hydrate_from_storage(&self) -> Hydration {
        self.bridge.hydrate(self).await
    }

    /// The next request through the shared client carries this token.
    pub async fn set_token(&self, token: String) {
        self.session.update(|s| s.token = Some(token)).await;
    }

    pub async fn set_role(&self, role: Role) {
        self.session.update(|s| s.role = Some(role)).await;
    }

    pub async fn set_username(&self, username: String) {
        self.session.update(|s| s.username = Some(username)).await;
    }

    pub async fn reset_state(&self) {
        self.session.reset().await;
    }
}

/// Turn the raw `/user/token` reply into a token or a user-facing error.
pub fn interpret_token_reply(raw: &RawReply) -> Result<TokenReply, LoginError> {
    let text = serde_json::from_str::<String>(&raw.body).unwrap_or_else(|_| raw.body.clone());
    if text.trim() == BAD_CREDENTIALS {
        return Err(LoginError::InvalidCredentials);
    }
    if !raw.is_success() {
        return Err(LoginError::server(raw.status, crate::session::http::backend_message(&raw.body)));
    }
    TokenReply::parse(&text).map_err(|_| LoginError::UnexpectedResponse)
}

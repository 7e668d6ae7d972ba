use std::sync::{Arc, Mutex};

use configs::AppConfig;
use models::Session;
use service::storage::{DurableStorage, FileStorage};
use service::session::{LoginError, LoginOutcome};
use service::{AuthorizedClient, HttpSessionBackend, PersistenceBridge, SessionBackend, SessionContext, SessionStore};
use tracing::{debug, info, warn};

use crate::errors::StartupError;
use crate::guard::{GuardDecision, RouteGuard};
use crate::navigation::{self, NavEntry};

/// Everything needed to draw one route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Screen {
    pub decision: GuardDecision,
    /// Sidebar entries; empty while the login form is shown.
    pub navigation: Vec<&'static NavEntry>,
    pub user: Option<String>,
}

/// The dashboard shell: one session store, one shared client, one guard.
pub struct App {
    store: SessionStore,
    client: AuthorizedClient,
    guard: Mutex<RouteGuard>,
}

impl App {
    /// Build the shell from configuration with file-backed session storage.
    pub async fn from_config(cfg: &AppConfig) -> Result<Self, StartupError> {
        cfg.backend.validate().map_err(|e| StartupError::InvalidConfig(e.to_string()))?;
        cfg.storage.validate().map_err(|e| StartupError::InvalidConfig(e.to_string()))?;
        common::env::ensure_storage_dir(&cfg.storage.path).await?;

        let storage = FileStorage::open(&cfg.storage.path).await?;
        let http = reqwest::Client::builder().timeout(cfg.backend.request_timeout()).build()?;
        info!(base_url = %cfg.backend.base_url, storage = %cfg.storage.path, "console configured");
        Ok(Self::new(http, &cfg.backend.base_url, storage))
    }

    /// Shell talking to a real backend at `base_url`.
    pub fn new(http: reqwest::Client, base_url: &str, storage: Arc<dyn DurableStorage>) -> Self {
        let session = SessionContext::new();
        let bridge = PersistenceBridge::new(storage);
        let client = AuthorizedClient::new(http, base_url, session.clone(), bridge.clone());
        let backend = Arc::new(HttpSessionBackend::new(client.clone()));
        Self::assemble(session, bridge, client, backend)
    }

    /// Shell whose session endpoints are served by `backend`; page fetches
    /// still go through the shared client at `base_url`.
    pub fn with_backend(
        http: reqwest::Client,
        base_url: &str,
        storage: Arc<dyn DurableStorage>,
        backend: Arc<dyn SessionBackend>,
    ) -> Self {
        let session = SessionContext::new();
        let bridge = PersistenceBridge::new(storage);
        let client = AuthorizedClient::new(http, base_url, session.clone(), bridge.clone());
        Self::assemble(session, bridge, client, backend)
    }

    fn assemble(
        session: SessionContext,
        bridge: PersistenceBridge,
        client: AuthorizedClient,
        backend: Arc<dyn SessionBackend>,
    ) -> Self {
        let store = SessionStore::new(session, bridge, backend);
        Self { store, client, guard: Mutex::new(RouteGuard::new()) }
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// The client every page-level fetch must use.
    pub fn client(&self) -> &AuthorizedClient {
        &self.client
    }

    /// Startup: restore the stored session, then fill in profile and team.
    ///
    /// Secondary fetch failures are logged; mounting itself never fails.
    pub async fn mount(&self) -> Session {
        let restored = self.store.hydrate_from_storage().await;
        if !restored.restored_any() {
            debug!("no stored session");
        }

        let session = self.store.snapshot().await;
        if let (Some(username), None) = (session.username.as_deref(), session.employee_id) {
            if let Err(e) = self.store.fetch_user_info(username).await {
                warn!(error = %e, code = e.code(), "profile not restored on mount");
            }
        }

        if self.store.snapshot().await.needs_team() {
            if let Err(e) = self.store.fetch_team_info().await {
                warn!(error = %e, code = e.code(), "team not restored on mount");
            }
        }

        let session = self.store.snapshot().await;
        info!(authenticated = session.is_authenticated(), role = ?session.role, "console mounted");
        session
    }

    pub async fn render(&self, route: &str) -> Screen {
        let session = self.store.snapshot().await;
        let decision = self.guard.lock().unwrap_or_else(|e| e.into_inner()).evaluate(&session, route);
        let navigation = if decision.shows_login() { Vec::new() } else { navigation::visible_entries(session.role) };
        Screen { decision, navigation, user: session.display_name() }
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<LoginOutcome, LoginError> {
        self.store.login(username, password).await
    }

    /// Sidebar logout; returns the route to navigate to.
    pub async fn logout(&self) -> &'static str {
        navigation::logout(&self.store).await
    }
}

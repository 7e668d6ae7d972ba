use std::sync::Arc;

use models::Session;
use tokio::sync::{RwLock, RwLockWriteGuard};

/// Shared, injectable handle to the one session of an app instance.
///
/// Cloning shares the same session. Reads are open to everyone; mutation is
/// crate-private so only the store, hydration and the client's forced
/// logout can change auth fields.
#[derive(Clone, Default)]
pub struct SessionContext {
    inner: Arc<RwLock<Session>>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn snapshot(&self) -> Session {
        self.inner.read().await.clone()
    }

    pub async fn token(&self) -> Option<String> {
        self.inner.read().await.token.clone()
    }

    pub async fn employee_id(&self) -> Option<i64> {
        self.inner.read().await.employee_id
    }

    /// Apply `f` under the write lock. Never hold this across a network call.
    pub(crate) async fn update<R>(&self, f: impl FnOnce(&mut Session) -> R) -> R {
        let mut session = self.inner.write().await;
        f(&mut session)
    }

    pub(crate) async fn reset(&self) {
        *self.inner.write().await = Session::default();
    }

    /// Exclusive access held across a storage write, so the session and its
    /// stored copy change together.
    pub(crate) async fn lock(&self) -> RwLockWriteGuard<'_, Session> {
        self.inner.write().await
    }
}

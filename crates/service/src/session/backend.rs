use async_trait::async_trait;
use models::{Team, UserInfo};
use serde::Serialize;

use crate::session::errors::BackendError;
use crate::session::http::AuthorizedClient;

/// Status and body of a reply whose status the caller interprets itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawReply {
    pub status: u16,
    pub body: String,
}

impl RawReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The three backend endpoints the session lifecycle depends on.
#[async_trait]
pub trait SessionBackend: Send + Sync {
    /// `POST /user/token`; any HTTP status is returned as a [`RawReply`].
    async fn request_token(&self, username: &str, password: &str) -> Result<RawReply, BackendError>;
    /// `GET /user/manage/get?username=...`
    async fn user_info(&self, username: &str) -> Result<UserInfo, BackendError>;
    /// `GET /employee/team/getbyEmployee?id=...`; empty when the person manages no team.
    async fn teams_for_employee(&self, employee_id: i64) -> Result<Vec<Team>, BackendError>;
}

#[derive(Serialize)]
struct TokenRequest<'a> {
    username: &'a str,
    password: &'a str,
}

/// [`SessionBackend`] over the shared [`AuthorizedClient`].
///
/// A `401` on the profile or team lookup fails that lookup only; the login
/// that triggered it stays in place.
#[derive(Clone)]
pub struct HttpSessionBackend {
    client: AuthorizedClient,
}

impl HttpSessionBackend {
    pub fn new(client: AuthorizedClient) -> Self {
        Self { client: client.without_forced_logout() }
    }
}

#[async_trait]
impl SessionBackend for HttpSessionBackend {
    async fn request_token(&self, username: &str, password: &str) -> Result<RawReply, BackendError> {
        self.client.post_public("/user/token", &TokenRequest { username, password }).await
    }

    async fn user_info(&self, username: &str) -> Result<UserInfo, BackendError> {
        self.client.get_json("/user/manage/get", &[("username", username.to_string())]).await
    }

    async fn teams_for_employee(&self, employee_id: i64) -> Result<Vec<Team>, BackendError> {
        self.client.get_json("/employee/team/getbyEmployee", &[("id", employee_id.to_string())]).await
    }
}

/// Simple in-memory mock backend for tests and doc examples
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Canned replies plus a log of every call made, e.g. `"user_info:alice"`.
    #[derive(Default)]
    pub struct MockSessionBackend {
        token_reply: Mutex<Option<Result<RawReply, BackendError>>>,
        users: Mutex<HashMap<String, Result<UserInfo, BackendError>>>,
        teams: Mutex<HashMap<i64, Vec<Team>>>,
        calls: Mutex<Vec<String>>,
    }

    impl MockSessionBackend {
        /// Reply to `/user/token` with `status` and `body`.
        pub fn with_token_reply(self, status: u16, body: &str) -> Self {
            *lock(&self.token_reply) = Some(Ok(RawReply { status, body: body.to_string() }));
            self
        }

        pub fn with_token_error(self, err: BackendError) -> Self {
            *lock(&self.token_reply) = Some(Err(err));
            self
        }

        pub fn with_user(self, info: UserInfo) -> Self {
            lock(&self.users).insert(info.username.clone(), Ok(info));
            self
        }

        pub fn with_user_error(self, username: &str, err: BackendError) -> Self {
            lock(&self.users).insert(username.to_string(), Err(err));
            self
        }

        pub fn with_team(self, employee_id: i64, team: Team) -> Self {
            lock(&self.teams).entry(employee_id).or_default().push(team);
            self
        }

        pub fn calls(&self) -> Vec<String> {
            lock(&self.calls).clone()
        }

        fn record(&self, call: String) {
            lock(&self.calls).push(call);
        }
    }

    fn lock<T>(m: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
        m.lock().unwrap_or_else(|e| e.into_inner())
    }

    #[async_trait]
    impl SessionBackend for MockSessionBackend {
        async fn request_token(&self, username: &str, _password: &str) -> Result<RawReply, BackendError> {
            self.record(format!("request_token:{username}"));
            lock(&self.token_reply)
                .clone()
                .unwrap_or_else(|| Err(BackendError::NoResponse("no token reply configured".into())))
        }

        async fn user_info(&self, username: &str) -> Result<UserInfo, BackendError> {
            self.record(format!("user_info:{username}"));
            lock(&self.users)
                .get(username)
                .cloned()
                .unwrap_or(Err(BackendError::Status { status: 404, message: None }))
        }

        async fn teams_for_employee(&self, employee_id: i64) -> Result<Vec<Team>, BackendError> {
            self.record(format!("teams_for_employee:{employee_id}"));
            Ok(lock(&self.teams).get(&employee_id).cloned().unwrap_or_default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mock::MockSessionBackend;
    use super::*;

    #[tokio::test]
    async fn mock_records_calls_and_defaults() {
        let backend = MockSessionBackend::default().with_token_reply(200, "ADMIN t");
        assert!(backend.request_token("root", "pw").await.unwrap().is_success());
        assert!(backend.user_info("nobody").await.is_err());
        assert!(backend.teams_for_employee(1).await.unwrap().is_empty());
        assert_eq!(backend.calls(), vec!["request_token:root", "user_info:nobody", "teams_for_employee:1"]);
    }
}

use reqwest::{header::AUTHORIZATION, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use crate::session::backend::RawReply;
use crate::session::context::SessionContext;
use crate::session::errors::BackendError;
use crate::session::persistence::PersistenceBridge;

/// The one HTTP client every page-level fetch goes through.
///
/// The `Authorization` header is computed from the session on each request,
/// so a token change is visible to the very next call and a cleared token
/// means no header at all. A `401` for the token that is still current ends
/// the session.
#[derive(Clone)]
pub struct AuthorizedClient {
    http: reqwest::Client,
    base_url: String,
    session: SessionContext,
    bridge: PersistenceBridge,
    expire_on_401: bool,
}

impl AuthorizedClient {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>, session: SessionContext, bridge: PersistenceBridge) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url, session, bridge, expire_on_401: true }
    }

    /// Same client, but a `401` is only reported, never turned into a logout.
    /// Used for the session's own profile and team lookups.
    pub fn without_forced_logout(&self) -> Self {
        Self { expire_on_401: false, ..self.clone() }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `Bearer {token}` while a token is present, `None` otherwise.
    pub async fn authorization(&self) -> Option<String> {
        self.session.token().await.map(|t| format!("Bearer {t}"))
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Authorized GET decoding a JSON body.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T, BackendError> {
        let req = self.http.get(self.url(path)).query(query);
        let resp = self.send_authorized(req).await?;
        decode_json(resp).await
    }

    /// Authorized POST with a JSON body, decoding a JSON reply.
    pub async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T, BackendError> {
        let req = self.http.post(self.url(path)).json(body);
        let resp = self.send_authorized(req).await?;
        decode_json(resp).await
    }

    /// POST without credentials; every status is handed back to the caller.
    pub async fn post_public<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<RawReply, BackendError> {
        let resp = self
            .http
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(|e| BackendError::NoResponse(e.to_string()))?;
        let status = resp.status().as_u16();
        let body = resp.text().await.map_err(|e| BackendError::NoResponse(e.to_string()))?;
        Ok(RawReply { status, body })
    }

    async fn send_authorized(&self, req: RequestBuilder) -> Result<Response, BackendError> {
        let sent = self.session.token().await;
        let req = match &sent {
            Some(token) => req.header(AUTHORIZATION, format!("Bearer {token}")),
            None => req,
        };
        let resp = req.send().await.map_err(|e| BackendError::NoResponse(e.to_string()))?;
        let status = resp.status();
        debug!(%status, url = %resp.url(), "backend replied");

        if status == StatusCode::UNAUTHORIZED {
            match sent.as_deref() {
                Some(token) if self.expire_on_401 => {
                    self.bridge.expire(&self.session, token).await;
                }
                _ => debug!("401 without forced logout"),
            }
            return Err(BackendError::Unauthorized);
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            warn!(%status, "backend request failed");
            return Err(BackendError::Status { status: status.as_u16(), message: backend_message(&body) });
        }
        Ok(resp)
    }
}

async fn decode_json<T: DeserializeOwned>(resp: Response) -> Result<T, BackendError> {
    let bytes = resp.bytes().await.map_err(|e| BackendError::NoResponse(e.to_string()))?;
    serde_json::from_slice(&bytes).map_err(|e| BackendError::Decode(e.to_string()))
}

/// Human-readable message from an error body: a JSON `message`/`error` field,
/// a JSON string, or the raw text.
pub fn backend_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }
    match serde_json::from_str::<serde_json::Value>(trimmed) {
        Ok(serde_json::Value::Object(map)) => ["message", "error"]
            .iter()
            .find_map(|k| map.get(*k).and_then(|v| v.as_str()))
            .filter(|m| !m.trim().is_empty())
            .map(str::to_string),
        Ok(serde_json::Value::String(s)) if !s.trim().is_empty() => Some(s),
        Ok(_) => None,
        Err(_) => Some(trimmed.to_string()),
    }
}

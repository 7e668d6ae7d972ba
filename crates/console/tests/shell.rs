use std::collections::HashMap;
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::{header::AUTHORIZATION, HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use console::guard::View;
use console::{routes, App};
use models::Role;
use serde_json::{json, Value};
use service::session::backend::mock::MockSessionBackend;
use service::session::LoginError;
use service::storage::MemoryStorage;
use tokio::net::TcpListener;
use uuid::Uuid;

#[derive(Clone, Default)]
struct Backend {
    hits: Arc<AtomicUsize>,
}

fn bearer_ok(b: &Backend, headers: &HeaderMap) -> Result<(), StatusCode> {
    b.hits.fetch_add(1, Ordering::SeqCst);
    match headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        Some(h) if h.starts_with("Bearer ") && &h["Bearer ".len()..] != "expired" => Ok(()),
        _ => Err(StatusCode::UNAUTHORIZED),
    }
}

async fn token(State(b): State<Backend>, Json(body): Json<Value>) -> String {
    b.hits.fetch_add(1, Ordering::SeqCst);
    match (body["username"].as_str(), body["password"].as_str()) {
        (Some("alice"), Some("pw")) => "MANAGER abc123".into(),
        (Some("frank"), Some("pw")) => "FIELD_OFFICER frank-token".into(),
        _ => "Bad credentials".into(),
    }
}

async fn user(
    State(b): State<Backend>,
    headers: HeaderMap,
    Query(q): Query<HashMap<String, String>>,
) -> Result<Json<Value>, StatusCode> {
    bearer_ok(&b, &headers)?;
    match q.get("username").map(String::as_str) {
        Some("alice") => Ok(Json(json!({
            "username": "alice", "roles": ["MANAGER"], "employeeId": 42, "firstName": "Alice", "lastName": "A"
        }))),
        Some("frank") => Ok(Json(json!({
            "username": "frank", "roles": "FIELD_OFFICER", "employeeId": 100, "firstName": "Frank", "lastName": "F"
        }))),
        _ => Err(StatusCode::NOT_FOUND),
    }
}

async fn team(
    State(b): State<Backend>,
    headers: HeaderMap,
    Query(q): Query<HashMap<String, String>>,
) -> Result<Json<Value>, StatusCode> {
    bearer_ok(&b, &headers)?;
    match q.get("id").map(String::as_str) {
        Some("42") => Ok(Json(json!([{"id": 7, "officeManager": null, "fieldOfficers": [{"id": 100}]}]))),
        _ => Ok(Json(json!([]))),
    }
}

async fn visits(State(b): State<Backend>, headers: HeaderMap) -> Result<Json<Value>, StatusCode> {
    bearer_ok(&b, &headers)?;
    Ok(Json(json!([{"id": 1}])))
}

async fn start_backend() -> anyhow::Result<(Backend, String)> {
    let backend = Backend::default();
    let app = Router::new()
        .route("/user/token", post(token))
        .route("/user/manage/get", get(user))
        .route("/employee/team/getbyEmployee", get(team))
        .route("/visit/getAll", get(visits))
        .with_state(backend.clone());
    let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            eprintln!("mock backend error: {}", e);
        }
    });
    Ok((backend, format!("http://{}:{}", addr.ip(), addr.port())))
}

#[tokio::test]
async fn mount_restores_manager_profile_and_team() -> anyhow::Result<()> {
    let (_, base_url) = start_backend().await?;
    let storage = MemoryStorage::with_entries([("token", "abc123"), ("role", "MANAGER"), ("username", "alice")]);
    let app = App::new(reqwest::Client::new(), &base_url, storage.clone());

    let session = app.mount().await;
    assert_eq!(session.token.as_deref(), Some("abc123"));
    assert_eq!(session.employee_id, Some(42));
    assert_eq!(session.team_id, Some(7));
    assert_eq!(storage.entries().get("teamId").map(String::as_str), Some("7"));

    let screen = app.render("/my-team").await;
    assert_eq!(screen.decision.view, View::Page(routes::MY_TEAM.into()));
    assert!(screen.navigation.iter().any(|e| e.route == routes::MY_TEAM));
    assert_eq!(screen.user.as_deref(), Some("Alice A"));
    Ok(())
}

#[tokio::test]
async fn empty_storage_mounts_to_login_without_backend_calls() -> anyhow::Result<()> {
    let (backend, base_url) = start_backend().await?;
    let app = App::new(reqwest::Client::new(), &base_url, MemoryStorage::new());

    let session = app.mount().await;
    assert!(!session.is_authenticated());
    for route in ["/", routes::DASHBOARD, routes::SALARY] {
        let screen = app.render(route).await;
        assert!(screen.decision.shows_login());
        assert!(screen.navigation.is_empty());
    }
    assert_eq!(backend.hits.load(Ordering::SeqCst), 0);
    Ok(())
}

#[tokio::test]
async fn field_officer_login_then_logout_returns_to_landing() -> anyhow::Result<()> {
    let (_, base_url) = start_backend().await?;
    let storage = MemoryStorage::new();
    let app = App::new(reqwest::Client::new(), &base_url, storage.clone());
    app.mount().await;

    let outcome = app.login("frank", "pw").await?;
    assert_eq!(outcome.role, Role::FieldOfficer);
    assert_eq!(outcome.employee_id, Some(100));
    assert_eq!(outcome.team_id, None);

    let screen = app.render(routes::VISITS).await;
    assert_eq!(screen.decision.view, View::Page(routes::VISITS.into()));
    let visible: Vec<_> = screen.navigation.iter().map(|e| e.route).collect();
    assert!(!visible.contains(&routes::SALARY));
    assert!(!visible.contains(&routes::MY_TEAM));

    assert_eq!(app.logout().await, routes::LANDING);
    assert!(storage.entries().is_empty());
    let screen = app.render(routes::VISITS).await;
    assert!(screen.decision.shows_login());
    assert_eq!(screen.decision.redirect.as_deref(), Some(routes::LANDING));
    Ok(())
}

#[tokio::test]
async fn rejected_page_fetch_sends_user_back_to_login() -> anyhow::Result<()> {
    let (_, base_url) = start_backend().await?;
    let storage = MemoryStorage::with_entries([("token", "expired"), ("role", "ADMIN")]);
    let app = App::new(reqwest::Client::new(), &base_url, storage.clone());
    app.mount().await;

    let screen = app.render(routes::VISITS).await;
    assert_eq!(screen.decision.view, View::Page(routes::VISITS.into()));

    let err = app.client().get_json::<Value>("/visit/getAll", &[]).await.unwrap_err();
    assert_eq!(err, service::session::BackendError::Unauthorized);
    assert!(storage.entries().is_empty());

    let screen = app.render(routes::VISITS).await;
    assert!(screen.decision.shows_login());
    assert_eq!(screen.decision.redirect.as_deref(), Some(routes::LANDING));
    Ok(())
}

#[tokio::test]
async fn rejected_profile_lookup_on_mount_keeps_session() -> anyhow::Result<()> {
    let (_, base_url) = start_backend().await?;
    let storage = MemoryStorage::with_entries([("token", "expired"), ("role", "MANAGER"), ("username", "alice")]);
    let app = App::new(reqwest::Client::new(), &base_url, storage.clone());

    let session = app.mount().await;
    assert_eq!(session.token.as_deref(), Some("expired"));
    assert_eq!(session.employee_id, None);
    assert_eq!(storage.entries().len(), 3);
    assert_eq!(app.render(routes::DASHBOARD).await.decision.view, View::Page(routes::DASHBOARD.into()));
    Ok(())
}

#[tokio::test]
async fn failed_login_error_reaches_login_view() {
    let backend = Arc::new(MockSessionBackend::default().with_token_reply(200, "Bad credentials"));
    let app = App::with_backend(reqwest::Client::new(), "http://127.0.0.1:9", MemoryStorage::new(), backend.clone());

    let err = app.login("alice", "nope").await.unwrap_err();
    assert_eq!(err, LoginError::InvalidCredentials);

    let screen = app.render("/").await;
    assert_eq!(screen.decision.view, View::Login { error: Some("Invalid username or password".into()) });
    assert_eq!(backend.calls(), vec!["request_token:alice"]);
}

#[tokio::test]
async fn from_config_creates_storage_directory() -> anyhow::Result<()> {
    let dir = format!("target/test-data/{}", Uuid::new_v4());
    let cfg = configs::load_from_str(&format!(
        "[backend]\nbase_url = \"http://127.0.0.1:9\"\nrequest_timeout_secs = 2\n\n[storage]\npath = \"{dir}/session.json\"\n"
    ))?;
    let app = App::from_config(&cfg).await?;

    assert!(!app.mount().await.is_authenticated());
    assert!(tokio::fs::metadata(&dir).await.is_ok());
    let _ = tokio::fs::remove_dir_all(&dir).await;
    Ok(())
}

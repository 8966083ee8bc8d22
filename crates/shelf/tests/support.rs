// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Mock library API for client integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::header::{AUTHORIZATION, COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use parking_lot::Mutex;
use serde_json::json;
use tokio::net::TcpListener;

use shelf::credential::memory::MemoryStore;
use shelf::test_support::{fake_jwt, test_config};
use shelf::ApiClient;

pub const LOGIN_PASSWORD: &str = "hunter2";

/// Behaviour knobs and request log for the mock API.
pub struct Backend {
    /// Access token the protected routes currently accept.
    pub valid_token: Mutex<String>,
    /// Token handed out by `/refresh`.
    pub new_token: String,
    /// Status `/refresh` answers with.
    pub refresh_status: StatusCode,
    /// Refresh credential `/refresh` requires in its cookie.
    pub expected_refresh: String,
    /// Refresh credential to rotate to via `Set-Cookie`.
    pub rotate_refresh: Option<String>,
    /// How long `/refresh` takes.
    pub refresh_delay: Duration,
    pub refresh_calls: AtomicU32,
    /// `Authorization` header of every protected request, in arrival order.
    pub seen_auth: Mutex<Vec<Option<String>>>,
    /// `Cookie` header of every refresh request.
    pub seen_refresh_cookies: Mutex<Vec<Option<String>>>,
}

impl Default for Backend {
    fn default() -> Self {
        Self {
            valid_token: Mutex::new("current".to_owned()),
            new_token: "new_token".to_owned(),
            refresh_status: StatusCode::OK,
            expected_refresh: "r1".to_owned(),
            rotate_refresh: None,
            refresh_delay: Duration::from_millis(200),
            refresh_calls: AtomicU32::new(0),
            seen_auth: Mutex::new(Vec::new()),
            seen_refresh_cookies: Mutex::new(Vec::new()),
        }
    }
}

impl Backend {
    pub fn refresh_count(&self) -> u32 {
        self.refresh_calls.load(Ordering::SeqCst)
    }

    /// Invalidate whatever token clients hold right now.
    pub fn expire_sessions(&self) {
        *self.valid_token.lock() = "rotated-server-side".to_owned();
    }

    /// How many protected requests carried `Bearer <token>`.
    pub fn requests_with(&self, token: &str) -> usize {
        let expected = format!("Bearer {token}");
        self.seen_auth.lock().iter().filter(|h| h.as_deref() == Some(expected.as_str())).count()
    }

    fn authorize(&self, headers: &HeaderMap) -> bool {
        let auth = header(headers, AUTHORIZATION.as_str());
        self.seen_auth.lock().push(auth.clone());
        auth == Some(format!("Bearer {}", self.valid_token.lock()))
    }
}

fn header(headers: &HeaderMap, name: &str) -> Option<String> {
    headers.get(name).and_then(|v| v.to_str().ok()).map(str::to_owned)
}

fn unauthorized() -> Response {
    (StatusCode::UNAUTHORIZED, Json(json!({"msg": "Token has expired"}))).into_response()
}

fn game(id: i64) -> serde_json::Value {
    json!({"id": id, "title": format!("Game {id}"), "status": "backlog", "priority": "medium"})
}

async fn list_games(State(b): State<Arc<Backend>>, headers: HeaderMap) -> Response {
    if !b.authorize(&headers) {
        return unauthorized();
    }
    Json(json!([game(1), game(2)])).into_response()
}

async fn get_game(
    State(b): State<Arc<Backend>>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Response {
    if !b.authorize(&headers) {
        return unauthorized();
    }
    if id > 100 {
        return (StatusCode::NOT_FOUND, Json(json!({"msg": "no such game"}))).into_response();
    }
    Json(game(id)).into_response()
}

async fn put_game(
    State(b): State<Arc<Backend>>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    Json(patch): Json<serde_json::Value>,
) -> Response {
    if !b.authorize(&headers) {
        return unauthorized();
    }
    let mut updated = game(id);
    if let (Some(obj), Some(patch)) = (updated.as_object_mut(), patch.as_object()) {
        for (k, v) in patch {
            obj.insert(k.clone(), v.clone());
        }
    }
    Json(updated).into_response()
}

async fn delete_game(State(b): State<Arc<Backend>>, headers: HeaderMap) -> Response {
    if !b.authorize(&headers) {
        return unauthorized();
    }
    StatusCode::NO_CONTENT.into_response()
}

async fn always_401(State(b): State<Arc<Backend>>, headers: HeaderMap) -> Response {
    b.authorize(&headers);
    unauthorized()
}

async fn broken() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response()
}

async fn refresh(State(b): State<Arc<Backend>>, headers: HeaderMap) -> Response {
    b.refresh_calls.fetch_add(1, Ordering::SeqCst);
    let cookie = header(&headers, COOKIE.as_str());
    b.seen_refresh_cookies.lock().push(cookie.clone());
    tokio::time::sleep(b.refresh_delay).await;

    if b.refresh_status != StatusCode::OK {
        return (b.refresh_status, "refresh denied").into_response();
    }
    if cookie != Some(format!("refresh_token={}", b.expected_refresh)) {
        return (StatusCode::UNAUTHORIZED, "missing refresh cookie").into_response();
    }

    *b.valid_token.lock() = b.new_token.clone();
    let body = Json(json!({"access_token": b.new_token}));
    match b.rotate_refresh {
        Some(ref rt) => {
            ([(SET_COOKIE, format!("refresh_token={rt}; HttpOnly; Path=/refresh"))], body)
                .into_response()
        }
        None => body.into_response(),
    }
}

async fn login(State(b): State<Arc<Backend>>, Json(body): Json<serde_json::Value>) -> Response {
    if body["password"] != LOGIN_PASSWORD {
        return (StatusCode::UNAUTHORIZED, "bad credentials").into_response();
    }
    let admin = body["username"] == "admin";
    let token = fake_jwt(&json!({"sub": body["username"], "is_admin": admin}));
    *b.valid_token.lock() = token.clone();
    (
        [(SET_COOKIE, format!("refresh_token={}; HttpOnly; Path=/refresh", b.expected_refresh))],
        Json(json!({"access_token": token})),
    )
        .into_response()
}

/// Start the mock API on an ephemeral port.
pub async fn spawn_backend(backend: Backend) -> anyhow::Result<(SocketAddr, Arc<Backend>)> {
    let backend = Arc::new(backend);
    let app = Router::new()
        .route("/games", get(list_games))
        .route("/games/{id}", get(get_game).put(put_game).delete(delete_game))
        .route("/always-401", get(always_401))
        .route("/broken", get(broken))
        .route("/refresh", post(refresh))
        .route("/login", post(login))
        .with_state(Arc::clone(&backend));

    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });
    Ok((addr, backend))
}

/// Client with an in-memory store seeded with the given credentials.
pub fn client_for(
    addr: SocketAddr,
    access: Option<&str>,
    refresh: Option<&str>,
) -> anyhow::Result<(ApiClient, Arc<MemoryStore>)> {
    use shelf::credential::{CredentialKind, CredentialStore};

    let store = Arc::new(MemoryStore::new());
    if let Some(a) = access {
        store.set(CredentialKind::Access, a, None);
    }
    if let Some(r) = refresh {
        store.set(CredentialKind::Refresh, r, None);
    }
    let client = ApiClient::new(test_config(&format!("http://{addr}")), store.clone())?;
    Ok((client, store))
}

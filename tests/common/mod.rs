#![allow(dead_code)]

use std::collections::BTreeMap;
use std::process::{Child, Command, Stdio};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use admin_ui_rust::client::{BackendError, Client, Collection};
use admin_ui_rust::controller::{UiPaths, JSON_INPUT_FIELD};
use admin_ui_rust::model::User;
use admin_ui_rust::session::{SessionGate, SessionResolver};
use admin_ui_rust::{app, AppState};
use anyhow::{Context, Result};
use async_trait::async_trait;
use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, Request, StatusCode};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use tower::ServiceExt;

pub const COOKIE: &str = "admin_ui_session";
pub const SESSION: &str = "valid-session";

// ---------------------------------------------------------------------------
// In-process fakes
// ---------------------------------------------------------------------------

/// One call made against the fake users collection
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    List,
    Create(User),
    Get(String),
    Update(String, User),
}

/// Users collection backed by a map, recording every call it receives
#[derive(Default)]
pub struct FakeUsers {
    records: Mutex<BTreeMap<String, User>>,
    calls: Mutex<Vec<Call>>,
    fail_list: Option<BackendError>,
    fail_create: Option<BackendError>,
    fail_get: Option<BackendError>,
    fail_update: Option<BackendError>,
}

impl FakeUsers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(self, id: i64, username: &str) -> Self {
        let user = User {
            id: Some(id),
            ..User::named(username)
        };
        self.records.lock().unwrap().insert(id.to_string(), user);
        self
    }

    pub fn failing_list(mut self, error: BackendError) -> Self {
        self.fail_list = Some(error);
        self
    }

    pub fn failing_create(mut self, error: BackendError) -> Self {
        self.fail_create = Some(error);
        self
    }

    pub fn failing_get(mut self, error: BackendError) -> Self {
        self.fail_get = Some(error);
        self
    }

    pub fn failing_update(mut self, error: BackendError) -> Self {
        self.fail_update = Some(error);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn record(&self, id: &str) -> Option<User> {
        self.records.lock().unwrap().get(id).cloned()
    }

    fn track(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl Collection<User> for FakeUsers {
    async fn list(&self) -> Result<Vec<User>, BackendError> {
        self.track(Call::List);
        if let Some(e) = &self.fail_list {
            return Err(e.clone());
        }
        Ok(self.records.lock().unwrap().values().cloned().collect())
    }

    async fn create(&self, model: &User) -> Result<(), BackendError> {
        self.track(Call::Create(model.clone()));
        if let Some(e) = &self.fail_create {
            return Err(e.clone());
        }
        let mut records = self.records.lock().unwrap();
        let id = records.len() as i64 + 1;
        let user = User {
            id: Some(id),
            ..model.clone()
        };
        records.insert(id.to_string(), user);
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<User, BackendError> {
        self.track(Call::Get(id.to_string()));
        if let Some(e) = &self.fail_get {
            return Err(e.clone());
        }
        self.record(id)
            .ok_or_else(|| BackendError::NotFound(format!("user {}", id)))
    }

    async fn update(&self, id: &str, model: &User) -> Result<(), BackendError> {
        self.track(Call::Update(id.to_string(), model.clone()));
        if let Some(e) = &self.fail_update {
            return Err(e.clone());
        }
        let mut records = self.records.lock().unwrap();
        let Some(existing) = records.get_mut(id) else {
            return Err(BackendError::NotFound(format!("user {}", id)));
        };
        *existing = User {
            id: existing.id,
            ..model.clone()
        };
        Ok(())
    }
}

/// Resolves exactly one token, `SESSION`, counting every lookup
pub struct FakeSessions {
    client: Option<Client>,
    lookups: Arc<AtomicUsize>,
}

#[async_trait]
impl SessionResolver for FakeSessions {
    async fn lookup(&self, token: &str) -> Option<Client> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if token == SESSION {
            self.client.clone()
        } else {
            None
        }
    }
}

/// Final response after following any See Other redirects
#[derive(Debug)]
pub struct Reply {
    pub status: StatusCode,
    pub path: String,
    pub redirects: Vec<String>,
    pub body: String,
}

impl Reply {
    pub fn redirected(&self) -> bool {
        !self.redirects.is_empty()
    }
}

/// The UI router wired to `FakeUsers`, driven with `oneshot`
pub struct Harness {
    pub router: Router,
    pub users: Arc<FakeUsers>,
    lookups: Arc<AtomicUsize>,
}

impl Harness {
    pub fn new(users: FakeUsers) -> Self {
        let users = Arc::new(users);
        let lookups = Arc::new(AtomicUsize::new(0));
        let sessions = FakeSessions {
            client: Some(Client::new(users.clone())),
            lookups: lookups.clone(),
        };
        let state = AppState::new(SessionGate::new(COOKIE, sessions), UiPaths::default());

        Self {
            router: app(state),
            users,
            lookups,
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.users.calls()
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    pub async fn get(&self, path: &str, session: Option<&str>) -> Reply {
        self.follow(get_request(path, session), session).await
    }

    /// POST `json` as the `json_input` form field
    pub async fn post_json(&self, path: &str, session: Option<&str>, json: &str) -> Reply {
        self.follow(form_request(path, session, json), session).await
    }

    /// Send one request without following redirects
    pub async fn send_once(&self, request: Request<Body>) -> (StatusCode, Option<String>, String) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let location = response
            .headers()
            .get(header::LOCATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, location, String::from_utf8_lossy(&bytes).into_owned())
    }

    async fn follow(&self, request: Request<Body>, session: Option<&str>) -> Reply {
        let mut path = request.uri().path().to_string();
        let mut redirects = Vec::new();
        let mut next = request;

        loop {
            let (status, location, body) = self.send_once(next).await;
            match location {
                Some(location) if status == StatusCode::SEE_OTHER && redirects.len() < 5 => {
                    redirects.push(location.clone());
                    path = location;
                    next = get_request(&path, session);
                }
                _ => {
                    return Reply {
                        status,
                        path,
                        redirects,
                        body,
                    }
                }
            }
        }
    }
}

pub fn get_request(path: &str, session: Option<&str>) -> Request<Body> {
    with_cookie(Request::get(path), session).body(Body::empty()).unwrap()
}

pub fn form_request(path: &str, session: Option<&str>, json: &str) -> Request<Body> {
    with_cookie(Request::post(path), session)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form_body(json)))
        .unwrap()
}

pub fn form_body(json: &str) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .append_pair(JSON_INPUT_FIELD, json)
        .finish()
}

fn with_cookie(builder: axum::http::request::Builder, session: Option<&str>) -> axum::http::request::Builder {
    match session {
        Some(token) => builder.header(header::COOKIE, format!("{}={}", COOKIE, token)),
        None => builder,
    }
}

// ---------------------------------------------------------------------------
// Mock backend API
// ---------------------------------------------------------------------------

/// Minimal stand-in for the backend: users and sessions under `/api`
#[derive(Clone, Default)]
pub struct MockBackend {
    users: Arc<Mutex<BTreeMap<i64, Value>>>,
    requests: Arc<Mutex<Vec<String>>>,
}

type Reject = (StatusCode, Json<Value>);

impl MockBackend {
    pub fn seeded() -> Self {
        let backend = Self::default();
        backend
            .users
            .lock()
            .unwrap()
            .insert(1, json!({"id": 1, "username": "admin", "role": "root"}));
        backend
    }

    /// "METHOD path authorization" for every request received
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn user(&self, id: i64) -> Option<Value> {
        self.users.lock().unwrap().get(&id).cloned()
    }

    pub fn find_user(&self, username: &str) -> Option<i64> {
        self.users
            .lock()
            .unwrap()
            .iter()
            .find(|(_, user)| user["username"] == username)
            .map(|(id, _)| *id)
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route("/api/users", get(list_users).post(create_user))
            .route("/api/users/:id", get(get_user).put(update_user))
            .route("/api/sessions/:token", get(get_session))
            .with_state(self.clone())
    }

    fn authorize(&self, method: &str, path: String, headers: &HeaderMap) -> Result<(), Reject> {
        let auth = headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string();
        self.requests
            .lock()
            .unwrap()
            .push(format!("{} {} {}", method, path, auth));
        if auth.starts_with("SGAPI ") {
            Ok(())
        } else {
            Err(reject(StatusCode::UNAUTHORIZED, "missing credentials"))
        }
    }
}

fn reject(status: StatusCode, message: &str) -> Reject {
    (status, Json(json!({ "message": message })))
}

async fn list_users(State(backend): State<MockBackend>, headers: HeaderMap) -> Result<Json<Value>, Reject> {
    backend.authorize("GET", "/api/users".into(), &headers)?;
    let users: Vec<Value> = backend.users.lock().unwrap().values().cloned().collect();
    Ok(Json(json!({ "items": users })))
}

async fn create_user(
    State(backend): State<MockBackend>,
    headers: HeaderMap,
    Json(mut body): Json<Value>,
) -> Result<(StatusCode, Json<Value>), Reject> {
    backend.authorize("POST", "/api/users".into(), &headers)?;
    let username = body
        .get("username")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    if username.is_empty() {
        return Err(reject(StatusCode::UNPROCESSABLE_ENTITY, "username is required"));
    }

    let mut users = backend.users.lock().unwrap();
    if users.values().any(|user| user["username"] == username.as_str()) {
        return Err(reject(StatusCode::CONFLICT, "username already taken"));
    }
    let id = users.keys().max().copied().unwrap_or(0) + 1;
    body["id"] = json!(id);
    users.insert(id, body.clone());
    Ok((StatusCode::CREATED, Json(body)))
}

async fn get_user(
    State(backend): State<MockBackend>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<Value>, Reject> {
    backend.authorize("GET", format!("/api/users/{}", id), &headers)?;
    id.parse::<i64>()
        .ok()
        .and_then(|id| backend.user(id))
        .map(Json)
        .ok_or_else(|| reject(StatusCode::NOT_FOUND, "user not found"))
}

async fn update_user(
    State(backend): State<MockBackend>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(mut body): Json<Value>,
) -> Result<Json<Value>, Reject> {
    backend.authorize("PUT", format!("/api/users/{}", id), &headers)?;
    let id = id
        .parse::<i64>()
        .map_err(|_| reject(StatusCode::NOT_FOUND, "user not found"))?;

    let mut users = backend.users.lock().unwrap();
    if !users.contains_key(&id) {
        return Err(reject(StatusCode::NOT_FOUND, "user not found"));
    }
    body["id"] = json!(id);
    users.insert(id, body.clone());
    Ok(Json(body))
}

async fn get_session(
    State(backend): State<MockBackend>,
    Path(token): Path<String>,
    headers: HeaderMap,
) -> Result<Json<Value>, Reject> {
    backend.authorize("GET", "/api/sessions/:token".into(), &headers)?;
    if token == SESSION {
        Ok(Json(json!({ "active": true })))
    } else {
        Err(reject(StatusCode::NOT_FOUND, "session not found"))
    }
}

/// Serve `router` on an ephemeral port inside the current runtime
pub async fn spawn_router(router: Router) -> Result<String> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    Ok(format!("http://{}", addr))
}

// ---------------------------------------------------------------------------
// Spawned server binary
// ---------------------------------------------------------------------------

/// Server binary spawned for one test; the child is killed when this is dropped
pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    pub backend: MockBackend,
    child: Child,
}

impl TestServer {
    async fn spawn() -> Result<Self> {
        let backend = MockBackend::seeded();
        let backend_url = spawn_router(backend.router()).await?;

        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let mut cmd = Command::new(env!("CARGO_BIN_EXE_admin-ui-rust"));
        cmd.env("APP_ENV", "development")
            .env("ADMIN_UI_HOST", "127.0.0.1")
            .env("ADMIN_UI_PORT", port.to_string())
            .env("ADMIN_UI_SESSION_COOKIE", COOKIE)
            .env("ADMIN_UI_SESSION_STORE", "backend")
            .env("ADMIN_UI_BACKEND_URL", format!("{}/api", backend_url))
            .env("ADMIN_UI_BACKEND_TIMEOUT_SECS", "5")
            .env_remove("ADMIN_UI_PREFIX")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::inherit());

        let child = cmd.spawn().context("failed to spawn server binary")?;

        Ok(Self {
            port,
            base_url,
            backend,
            child,
        })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status() == reqwest::StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    /// Whether the child process has already exited
    pub fn exited(&mut self) -> bool {
        matches!(self.child.try_wait(), Ok(Some(_)))
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

/// Spawn the server binary against a fresh mock backend and wait for `/health`
pub async fn start_server() -> Result<TestServer> {
    let server = TestServer::spawn().await?;
    server.wait_ready(Duration::from_secs(10)).await?;
    Ok(server)
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared test helpers: a stub content API and an app wired to it.
//!
//! The stub answers in the shapes the real API uses: resources wrapped in
//! envelopes, projects keyed by `_id` with `liveLink`/`githubLink`, and
//! technologies stored as a comma-separated string.

// Each test binary uses a different subset of these helpers.
#![allow(dead_code)]

use axum::{
    body::Body,
    extract::{Multipart, Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use portfolio_site::config::Config;
use portfolio_site::routes::create_router;
use portfolio_site::AppState;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Token the stub issues for the valid credentials.
pub const STUB_TOKEN: &str = "stub-token";

/// Cookie header carrying the stub's session token.
pub const SESSION_COOKIE: &str = "admin_token=stub-token";

/// In-memory state of the stub content API.
#[derive(Default)]
pub struct StubStore {
    pub hero: Option<Value>,
    pub about: Option<Value>,
    pub technologies: Vec<Value>,
    pub projects: Vec<Value>,
    pub socials: Vec<Value>,
    pub contacts: Vec<Value>,
    pub uploads: Vec<String>,
    /// Every read answers 500.
    pub fail_reads: bool,
    /// Every authenticated write answers 500.
    pub fail_writes: bool,
    /// Logout answers 500.
    pub fail_logout: bool,
    /// Delay before the social list is answered.
    pub socials_delay: Option<std::time::Duration>,
    pub logout_calls: usize,
    pub write_calls: usize,
    next_id: u64,
}

impl StubStore {
    fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}{}", self.next_id)
    }
}

pub type Store = Arc<Mutex<StubStore>>;

/// A running stub content API.
pub struct StubApi {
    pub store: Store,
    pub base_url: String,
}

impl StubApi {
    /// Bind the stub to an ephemeral local port and serve it in the background.
    pub async fn spawn() -> Self {
        let store: Store = Arc::new(Mutex::new(StubStore::default()));
        let app = stub_router(store.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind stub content API");
        let addr = listener.local_addr().expect("No local address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Stub server failed");
        });

        Self {
            store,
            base_url: format!("http://{addr}/api"),
        }
    }

    pub fn with<T>(&self, f: impl FnOnce(&mut StubStore) -> T) -> T {
        f(&mut self.store.lock().unwrap())
    }
}

/// Create a test app talking to the content API at `content_api_url`.
/// Returns the router and the shared state.
pub fn create_test_app(content_api_url: &str) -> (Router, Arc<AppState>) {
    create_test_app_with_frontend_url(content_api_url, "http://localhost:3000")
}

pub fn create_test_app_with_frontend_url(
    content_api_url: &str,
    frontend_url: &str,
) -> (Router, Arc<AppState>) {
    let config = Config {
        content_api_url: content_api_url.to_string(),
        frontend_url: frontend_url.to_string(),
        ..Config::test_default()
    };
    let state = Arc::new(AppState::new(config));
    (create_router(state.clone()), state)
}

/// Create a stub API and an app wired to it.
pub async fn create_test_app_with_stub() -> (Router, StubApi) {
    let stub = StubApi::spawn().await;
    let (app, _) = create_test_app(&stub.base_url);
    (app, stub)
}

/// Collect a response body as JSON.
pub async fn body_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    serde_json::from_slice(&bytes).expect("Body is not JSON")
}

/// Build a multipart body from text fields and at most one file.
pub fn multipart_body(
    fields: &[(&str, &str)],
    file: Option<(&str, &str, &str, &[u8])>,
) -> (String, Body) {
    let boundary = "stub-boundary-7d93";
    let mut body = Vec::new();

    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((name, file_name, content_type, bytes)) = file {
        body.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());

    (
        format!("multipart/form-data; boundary={boundary}"),
        Body::from(body),
    )
}

// ─── Stub Content API ────────────────────────────────────────

fn stub_router(store: Store) -> Router {
    let api = Router::new()
        .route("/hero", get(get_hero).put(put_hero))
        .route("/about", get(get_about).put(put_about))
        .route(
            "/technologies",
            get(get_technologies)
                .put(put_technologies)
                .post(create_technology),
        )
        .route("/projects", get(get_projects).post(create_project))
        .route(
            "/projects/{id}",
            put(update_project).delete(delete_project),
        )
        .route("/socials", get(get_socials).put(put_socials))
        .route("/upload", post(upload))
        .route("/contact", post(contact))
        .route("/admin/login", post(login))
        .route("/auth/logout", post(logout));

    Router::new().nest("/api", api).with_state(store)
}

type StubResult = std::result::Result<Response, StatusCode>;

fn read_guard(store: &Store) -> std::result::Result<(), StatusCode> {
    if store.lock().unwrap().fail_reads {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }
    Ok(())
}

fn write_guard(store: &Store, headers: &HeaderMap) -> std::result::Result<(), StatusCode> {
    let authorized = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {STUB_TOKEN}"));
    if !authorized {
        return Err(StatusCode::UNAUTHORIZED);
    }

    let mut store = store.lock().unwrap();
    store.write_calls += 1;
    if store.fail_writes {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }
    Ok(())
}

/// Text fields plus the name of an uploaded file, if any.
async fn form(mut multipart: Multipart) -> (HashMap<String, String>, Option<String>) {
    let mut fields = HashMap::new();
    let mut file_name = None;

    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or_default().to_string();
        if let Some(file) = field.file_name().map(str::to_string) {
            field.bytes().await.unwrap();
            file_name = Some(file);
        } else {
            fields.insert(name, field.text().await.unwrap());
        }
    }

    (fields, file_name)
}

async fn get_hero(State(store): State<Store>) -> StubResult {
    read_guard(&store)?;
    let hero = store.lock().unwrap().hero.clone().unwrap_or_else(|| json!({}));
    Ok(Json(json!({ "hero": hero })).into_response())
}

async fn put_hero(State(store): State<Store>, headers: HeaderMap, Json(body): Json<Value>) -> StubResult {
    write_guard(&store, &headers)?;
    store.lock().unwrap().hero = Some(body.clone());
    Ok(Json(json!({ "hero": body })).into_response())
}

async fn get_about(State(store): State<Store>) -> StubResult {
    read_guard(&store)?;
    let about = store.lock().unwrap().about.clone().unwrap_or_else(|| json!({}));
    Ok(Json(about).into_response())
}

async fn put_about(State(store): State<Store>, headers: HeaderMap, Json(body): Json<Value>) -> StubResult {
    write_guard(&store, &headers)?;
    store.lock().unwrap().about = Some(body.clone());
    Ok(Json(json!({ "about": body })).into_response())
}

async fn get_technologies(State(store): State<Store>) -> StubResult {
    read_guard(&store)?;
    let list = store.lock().unwrap().technologies.clone();
    Ok(Json(list).into_response())
}

async fn put_technologies(
    State(store): State<Store>,
    headers: HeaderMap,
    Json(body): Json<Vec<Value>>,
) -> StubResult {
    write_guard(&store, &headers)?;
    store.lock().unwrap().technologies = body.clone();
    Ok(Json(body).into_response())
}

async fn create_technology(
    State(store): State<Store>,
    headers: HeaderMap,
    multipart: Multipart,
) -> StubResult {
    write_guard(&store, &headers)?;
    let (fields, file) = form(multipart).await;

    let icon = match file {
        Some(file) => format!("https://cdn.test/{file}"),
        None => fields.get("icon").cloned().unwrap_or_default(),
    };
    let mut store = store.lock().unwrap();
    let technology = json!({
        "_id": store.next_id("t"),
        "name": fields.get("name").cloned().unwrap_or_default(),
        "icon": icon,
        "category": fields.get("category").cloned().unwrap_or_default(),
    });
    store.technologies.push(technology.clone());
    Ok((StatusCode::CREATED, Json(json!({ "technology": technology }))).into_response())
}

async fn get_projects(State(store): State<Store>) -> StubResult {
    read_guard(&store)?;
    let list = store.lock().unwrap().projects.clone();
    Ok(Json(json!({ "projects": list })).into_response())
}

fn project_fields(project: &mut Value, fields: &HashMap<String, String>, file: Option<String>) {
    for key in ["title", "description", "technologies", "liveLink", "githubLink"] {
        if let Some(value) = fields.get(key) {
            project[key] = json!(value);
        }
    }
    if let Some(featured) = fields.get("featured") {
        project["featured"] = json!(featured == "true");
    }
    if let Some(file) = file {
        project["image"] = json!({ "url": format!("https://cdn.test/{file}") });
    }
}

async fn create_project(
    State(store): State<Store>,
    headers: HeaderMap,
    multipart: Multipart,
) -> StubResult {
    write_guard(&store, &headers)?;
    let (fields, file) = form(multipart).await;

    let mut store = store.lock().unwrap();
    let mut project = json!({ "_id": store.next_id("p") });
    project_fields(&mut project, &fields, file);
    store.projects.push(project.clone());
    Ok((StatusCode::CREATED, Json(json!({ "project": project }))).into_response())
}

async fn update_project(
    State(store): State<Store>,
    Path(id): Path<String>,
    headers: HeaderMap,
    multipart: Multipart,
) -> StubResult {
    write_guard(&store, &headers)?;
    let (fields, file) = form(multipart).await;

    let mut store = store.lock().unwrap();
    let project = store
        .projects
        .iter_mut()
        .find(|p| p["_id"] == id)
        .ok_or(StatusCode::NOT_FOUND)?;
    project_fields(project, &fields, file);
    Ok(Json(json!({ "project": project.clone() })).into_response())
}

async fn delete_project(
    State(store): State<Store>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> StubResult {
    write_guard(&store, &headers)?;
    let mut store = store.lock().unwrap();
    let before = store.projects.len();
    store.projects.retain(|p| p["_id"] != id);
    if store.projects.len() == before {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(Json(json!({ "message": "Project deleted" })).into_response())
}

async fn get_socials(State(store): State<Store>) -> StubResult {
    read_guard(&store)?;
    let delay = store.lock().unwrap().socials_delay;
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }
    let list = store.lock().unwrap().socials.clone();
    Ok(Json(list).into_response())
}

async fn put_socials(
    State(store): State<Store>,
    headers: HeaderMap,
    Json(body): Json<Vec<Value>>,
) -> StubResult {
    write_guard(&store, &headers)?;
    store.lock().unwrap().socials = body.clone();
    Ok(Json(json!({ "socials": body })).into_response())
}

async fn upload(State(store): State<Store>, headers: HeaderMap, multipart: Multipart) -> StubResult {
    write_guard(&store, &headers)?;
    let (_, file) = form(multipart).await;
    let file = file.ok_or(StatusCode::BAD_REQUEST)?;

    let url = format!("https://cdn.test/{file}");
    store.lock().unwrap().uploads.push(url.clone());
    Ok(Json(json!({ "url": url })).into_response())
}

async fn contact(State(store): State<Store>, Json(body): Json<Value>) -> StubResult {
    let mut store = store.lock().unwrap();
    if store.fail_writes {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }
    store.contacts.push(body);
    Ok(Json(json!({ "message": "Message received" })).into_response())
}

async fn login(Json(body): Json<Value>) -> StubResult {
    if body["username"] == "admin" && body["password"] == "secret" {
        return Ok(Json(json!({ "token": STUB_TOKEN })).into_response());
    }
    Ok((
        StatusCode::UNAUTHORIZED,
        Json(json!({ "message": "Invalid credentials" })),
    )
        .into_response())
}

async fn logout(State(store): State<Store>) -> StubResult {
    let mut store = store.lock().unwrap();
    store.logout_calls += 1;
    if store.fail_logout {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }
    Ok(Json(json!({ "message": "Logged out" })).into_response())
}

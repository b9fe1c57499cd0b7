// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Admin dashboard routes.
//!
//! Everything here sits under the route guard's prefix. Each handler builds
//! an [`Editor`] for one resource, runs at most one save through the content
//! client and answers with the resulting editor view.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthGate;
use crate::models::{
    AboutContent, EditorView, HeroContent, ImageUpload, NewTechnology, Project, ProjectDraft,
    SocialLink, Technology,
};
use crate::services::editor::{apply_list_edits, Editable, Editor, ListEdit, ListItem};
use crate::AppState;
use axum::{
    extract::{multipart::Field, DefaultBodyLimit, Multipart, Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;

/// Room for one image plus the text fields around it.
const BODY_LIMIT: usize = ImageUpload::MAX_BYTES + 64 * 1024;

/// Dashboard routes. The route guard is applied in routes/mod.rs.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/admin/dashboard", get(dashboard))
        .route("/admin/dashboard/hero", get(hero_editor).put(save_hero))
        .route("/admin/dashboard/about", get(about_editor).put(save_about))
        .route(
            "/admin/dashboard/technologies",
            get(technologies_editor)
                .put(save_technologies)
                .post(create_technology),
        )
        .route(
            "/admin/dashboard/projects",
            get(projects_editor).post(create_project),
        )
        .route(
            "/admin/dashboard/projects/{id}",
            put(update_project).delete(delete_project),
        )
        .route(
            "/admin/dashboard/socials",
            get(socials_editor).put(save_socials),
        )
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
}

type EditorResponse<R> = (StatusCode, Json<EditorView<R>>);

/// Editor view after a save attempt. A save refused for want of a session
/// is an error, not a view.
fn respond<R: Editable>(
    saved: bool,
    authenticated: bool,
    editor: Editor<R>,
) -> Result<EditorResponse<R>> {
    let status = match (saved, authenticated) {
        (true, _) => StatusCode::OK,
        (false, false) => return Err(AppError::Unauthorized),
        (false, true) => StatusCode::BAD_GATEWAY,
    };
    Ok((status, Json(editor.into_view())))
}

/// An editor populated from the content API.
async fn load<R, F>(read: F) -> Editor<R>
where
    R: Editable + Default,
    F: Future<Output = Result<R::Patch>>,
{
    let mut editor = Editor::new(R::default());
    editor.finish_load(read.await);
    editor
}

/// Re-read a list after a per-item write, or fall back to `local` if that fails.
async fn reload_or<T, F>(read: F, local: Vec<T>) -> Vec<T>
where
    F: Future<Output = Result<Vec<T>>>,
{
    match read.await {
        Ok(items) => items,
        Err(e) => {
            tracing::warn!(error = %e, "Reload after save failed, keeping local list");
            local
        }
    }
}

// ─── Editor Views ────────────────────────────────────────────

/// Every editor, as shown on the dashboard.
#[derive(Debug, Serialize)]
pub struct DashboardView {
    pub hero: EditorView<HeroContent>,
    pub about: EditorView<AboutContent>,
    pub technologies: EditorView<Vec<Technology>>,
    pub projects: EditorView<Vec<Project>>,
    pub socials: EditorView<Vec<SocialLink>>,
}

async fn dashboard(State(state): State<Arc<AppState>>) -> Json<DashboardView> {
    let client = &state.content;
    let (hero, about, technologies, projects, socials) = tokio::join!(
        load::<HeroContent, _>(client.get_hero()),
        load::<AboutContent, _>(client.get_about()),
        load::<Vec<Technology>, _>(client.get_technologies()),
        load::<Vec<Project>, _>(client.get_projects()),
        load::<Vec<SocialLink>, _>(client.get_socials()),
    );

    Json(DashboardView {
        hero: hero.into_view(),
        about: about.into_view(),
        technologies: technologies.into_view(),
        projects: projects.into_view(),
        socials: socials.into_view(),
    })
}

async fn hero_editor(State(state): State<Arc<AppState>>) -> Json<EditorView<HeroContent>> {
    Json(load::<HeroContent, _>(state.content.get_hero()).await.into_view())
}

async fn about_editor(State(state): State<Arc<AppState>>) -> Json<EditorView<AboutContent>> {
    Json(load::<AboutContent, _>(state.content.get_about()).await.into_view())
}

async fn technologies_editor(
    State(state): State<Arc<AppState>>,
) -> Json<EditorView<Vec<Technology>>> {
    Json(load::<Vec<Technology>, _>(state.content.get_technologies()).await.into_view())
}

async fn projects_editor(State(state): State<Arc<AppState>>) -> Json<EditorView<Vec<Project>>> {
    Json(load::<Vec<Project>, _>(state.content.get_projects()).await.into_view())
}

async fn socials_editor(State(state): State<Arc<AppState>>) -> Json<EditorView<Vec<SocialLink>>> {
    Json(load::<Vec<SocialLink>, _>(state.content.get_socials()).await.into_view())
}

// ─── Singleton Saves ─────────────────────────────────────────

async fn save_hero(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(draft): Json<HeroContent>,
) -> Result<EditorResponse<HeroContent>> {
    let token = AuthGate::new(jar).token();
    let client = &state.content;

    let mut editor = Editor::resume(draft);
    let saved = editor
        .save(token.as_deref(), |token, draft| async move {
            client.update_hero(&draft, &token).await
        })
        .await;

    respond(saved, token.is_some(), editor)
}

/// Save the about section. A selected image is uploaded first and its URL
/// becomes the profile image; a failed upload aborts the save.
async fn save_about(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    multipart: Multipart,
) -> Result<EditorResponse<AboutContent>> {
    let token = AuthGate::new(jar).token();
    let client = &state.content;
    let AboutForm { draft, image } = AboutForm::parse(multipart).await?;

    let mut editor = Editor::resume(draft);
    let saved = editor
        .save(token.as_deref(), |token, mut draft| async move {
            if let Some(image) = image {
                draft.profile_image = client.upload_image(&token, image).await?;
            }
            client.update_about(&draft, &token).await
        })
        .await;

    respond(saved, token.is_some(), editor)
}

// ─── List Saves ──────────────────────────────────────────────

/// A list as the frontend holds it, plus local edits not yet applied.
#[derive(Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>, T::New: Deserialize<'de>, T::Changes: Deserialize<'de>"))]
pub struct ListDraft<T: ListItem> {
    #[serde(default)]
    pub items: Vec<T>,
    #[serde(default)]
    pub edits: Vec<ListEdit<T::New, T::Changes>>,
}

/// Apply the local edits to an editor over the submitted list.
fn list_editor<T>(draft: ListDraft<T>) -> Editor<Vec<T>>
where
    T: ListItem,
    Vec<T>: Editable,
{
    let now_ms = chrono::Utc::now().timestamp_millis();
    let ListDraft { items, edits } = draft;

    let mut editor = Editor::resume(items);
    editor.edit(|items| {
        let applied = apply_list_edits(items, edits, now_ms);
        tracing::debug!(applied, "Applied local list edits");
    });
    editor
}

async fn save_technologies(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(draft): Json<ListDraft<Technology>>,
) -> Result<EditorResponse<Vec<Technology>>> {
    let token = AuthGate::new(jar).token();
    let client = &state.content;

    let mut editor = list_editor(draft);
    let saved = editor
        .save(token.as_deref(), |token, items| async move {
            client.update_technologies(&items, &token).await
        })
        .await;

    respond(saved, token.is_some(), editor)
}

async fn save_socials(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(draft): Json<ListDraft<SocialLink>>,
) -> Result<EditorResponse<Vec<SocialLink>>> {
    let token = AuthGate::new(jar).token();
    let client = &state.content;

    let mut editor = list_editor(draft);
    let saved = editor
        .save(token.as_deref(), |token, items| async move {
            client.update_socials(&items, &token).await
        })
        .await;

    respond(saved, token.is_some(), editor)
}

// ─── Per-Item Saves ──────────────────────────────────────────

/// Create one technology immediately, bypassing the bulk list save.
async fn create_technology(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    multipart: Multipart,
) -> Result<EditorResponse<Vec<Technology>>> {
    let token = AuthGate::new(jar).token();
    let client = &state.content;
    let TechnologyForm { technology, icon_file } = TechnologyForm::parse(multipart).await?;

    let mut editor = load::<Vec<Technology>, _>(client.get_technologies()).await;
    let saved = editor
        .save_with(
            token.as_deref(),
            "Technology added successfully!",
            "Failed to add technology",
            |token, mut items| async move {
                let created = client
                    .create_technology(&technology, &token, icon_file)
                    .await?;
                items.extend(created);
                Ok(reload_or(client.get_technologies(), items).await)
            },
        )
        .await;

    respond(saved, token.is_some(), editor)
}

const PROJECT_SAVE_FAILED: &str = <Vec<Project> as Editable>::NOTICES.save_failed;

async fn create_project(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    multipart: Multipart,
) -> Result<EditorResponse<Vec<Project>>> {
    let token = AuthGate::new(jar).token();
    let client = &state.content;
    let ProjectForm { draft, image } = ProjectForm::parse(multipart).await?;

    let mut editor = load::<Vec<Project>, _>(client.get_projects()).await;
    let saved = editor
        .save_with(
            token.as_deref(),
            "Project created successfully!",
            PROJECT_SAVE_FAILED,
            |token, mut items| async move {
                let created = client.create_project(&draft, &token, image).await?;
                items.extend(created);
                Ok(reload_or(client.get_projects(), items).await)
            },
        )
        .await;

    respond(saved, token.is_some(), editor)
}

async fn update_project(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    jar: CookieJar,
    multipart: Multipart,
) -> Result<EditorResponse<Vec<Project>>> {
    let token = AuthGate::new(jar).token();
    let client = &state.content;
    let ProjectForm { draft, image } = ProjectForm::parse(multipart).await?;

    let mut editor = load::<Vec<Project>, _>(client.get_projects()).await;
    let saved = editor
        .save_with(
            token.as_deref(),
            "Project updated successfully!",
            PROJECT_SAVE_FAILED,
            |token, mut items| async move {
                if let Some(updated) = client.update_project(&id, &draft, &token, image).await? {
                    if let Some(entry) = items.iter_mut().find(|p| p.id == updated.id) {
                        *entry = updated;
                    }
                }
                Ok(reload_or(client.get_projects(), items).await)
            },
        )
        .await;

    respond(saved, token.is_some(), editor)
}

async fn delete_project(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    jar: CookieJar,
) -> Result<EditorResponse<Vec<Project>>> {
    let token = AuthGate::new(jar).token();
    let client = &state.content;

    let mut editor = load::<Vec<Project>, _>(client.get_projects()).await;
    let saved = editor
        .save_with(
            token.as_deref(),
            "Project deleted successfully!",
            "Failed to delete project",
            |token, mut items| async move {
                client.delete_project(&id, &token).await?;
                items.retain(|p| p.id != id);
                Ok(reload_or(client.get_projects(), items).await)
            },
        )
        .await;

    respond(saved, token.is_some(), editor)
}

// ─── Multipart Forms ─────────────────────────────────────────

fn bad_multipart(e: axum::extract::multipart::MultipartError) -> AppError {
    AppError::BadRequest(format!("Invalid multipart body: {}", e.body_text()))
}

async fn text(field: Field<'_>) -> Result<String> {
    field.text().await.map_err(bad_multipart)
}

/// Read a file field. An empty part (no file selected) yields `None`.
async fn image(field: Field<'_>) -> Result<Option<ImageUpload>> {
    let file_name = field.file_name().unwrap_or("upload").to_string();
    let content_type = field
        .content_type()
        .unwrap_or("application/octet-stream")
        .to_string();
    let bytes = field.bytes().await.map_err(bad_multipart)?;

    if bytes.is_empty() {
        return Ok(None);
    }
    if !content_type.starts_with("image/") {
        return Err(AppError::BadRequest(format!(
            "Expected an image, got {content_type}"
        )));
    }
    if bytes.len() > ImageUpload::MAX_BYTES {
        return Err(AppError::BadRequest("Image exceeds 5MB".to_string()));
    }

    Ok(Some(ImageUpload {
        file_name,
        content_type,
        bytes: bytes.to_vec(),
    }))
}

fn is_truthy(value: &str) -> bool {
    matches!(value.trim(), "true" | "on" | "1")
}

struct AboutForm {
    draft: AboutContent,
    image: Option<ImageUpload>,
}

impl AboutForm {
    /// Fields: `title`, `description`, `profileImage`, repeated `skills`,
    /// repeated `removeSkill` (indices into the skill list), `image` (file).
    async fn parse(mut multipart: Multipart) -> Result<Self> {
        let mut draft = AboutContent::default();
        let mut image_file = None;
        let mut removals = Vec::new();

        while let Some(field) = multipart.next_field().await.map_err(bad_multipart)? {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "title" => draft.title = text(field).await?,
                "description" => draft.description = text(field).await?,
                "profileImage" => draft.profile_image = text(field).await?,
                "skills" => {
                    draft.add_skill(&text(field).await?);
                }
                "removeSkill" => {
                    let raw = text(field).await?;
                    let index = raw
                        .trim()
                        .parse::<usize>()
                        .map_err(|_| AppError::BadRequest(format!("Bad skill index: {raw}")))?;
                    removals.push(index);
                }
                "image" => image_file = image(field).await?,
                _ => {}
            }
        }

        removals.sort_unstable_by(|a, b| b.cmp(a));
        removals.dedup();
        for index in removals {
            draft.remove_skill(index);
        }

        Ok(Self {
            draft,
            image: image_file,
        })
    }
}

struct TechnologyForm {
    technology: NewTechnology,
    icon_file: Option<ImageUpload>,
}

impl TechnologyForm {
    /// Fields: `name`, `category`, and `icon` as either a URL or a file.
    async fn parse(mut multipart: Multipart) -> Result<Self> {
        let mut technology = NewTechnology::default();
        let mut icon_file = None;

        while let Some(field) = multipart.next_field().await.map_err(bad_multipart)? {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "name" => technology.name = text(field).await?.trim().to_string(),
                "category" => technology.category = text(field).await?,
                "icon" if field.file_name().is_some() => icon_file = image(field).await?,
                "icon" => technology.icon = text(field).await?.trim().to_string(),
                _ => {}
            }
        }

        if technology.name.is_empty() {
            return Err(AppError::BadRequest("Technology name is required".to_string()));
        }
        if technology.icon.is_empty() && icon_file.is_none() {
            return Err(AppError::BadRequest("Technology icon is required".to_string()));
        }

        Ok(Self {
            technology,
            icon_file,
        })
    }
}

struct ProjectForm {
    draft: ProjectDraft,
    image: Option<ImageUpload>,
}

impl ProjectForm {
    /// Fields: `title`, `description`, `technologies` (comma-separated),
    /// `liveUrl`/`liveLink`, `githubUrl`/`githubLink`, `featured`, `image` (file).
    async fn parse(mut multipart: Multipart) -> Result<Self> {
        let mut draft = ProjectDraft::default();
        let mut image_file = None;

        while let Some(field) = multipart.next_field().await.map_err(bad_multipart)? {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "title" => draft.title = text(field).await?,
                "description" => draft.description = text(field).await?,
                "technologies" => {
                    draft.technologies = ProjectDraft::parse_technologies(&text(field).await?)
                }
                "liveUrl" | "liveLink" => draft.live_url = text(field).await?,
                "githubUrl" | "githubLink" => draft.github_url = text(field).await?,
                "featured" => draft.featured = is_truthy(&text(field).await?),
                "image" => image_file = image(field).await?,
                _ => {}
            }
        }

        if draft.title.trim().is_empty() {
            return Err(AppError::BadRequest("Project title is required".to_string()));
        }

        Ok(Self {
            draft,
            image: image_file,
        })
    }
}

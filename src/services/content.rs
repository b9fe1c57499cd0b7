// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Content API client.
//!
//! One method per logical operation, each issuing exactly one HTTP request.
//! Reads are anonymous; writes carry the caller's bearer token. Nothing is
//! retried and no state is kept between calls.

use crate::error::AppError;
use crate::models::content::{
    AboutContent, ContactMessage, Credentials, HeroContent, ImageUpload, LoginResponse,
    NewTechnology, Project, ProjectDraft, SocialLink, Technology,
};
use crate::models::ingest::{project_from, technology_from, unwrap_envelope, AboutPatch, HeroPatch};
use crate::models::Resource;
use reqwest::header::ACCEPT;
use reqwest::multipart::{Form, Part};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

type Result<T> = std::result::Result<T, AppError>;

/// Content API client.
#[derive(Clone)]
pub struct ContentClient {
    http: reqwest::Client,
    base_url: String,
}

impl ContentClient {
    /// Create a client for the API rooted at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    // ─── Reads ───────────────────────────────────────────────

    pub async fn get_hero(&self) -> Result<HeroPatch> {
        self.read::<HeroContent>(None).await
    }

    pub async fn get_about(&self) -> Result<AboutPatch> {
        self.read::<AboutContent>(None).await
    }

    pub async fn get_technologies(&self) -> Result<Vec<Technology>> {
        self.read::<Vec<Technology>>(None).await
    }

    pub async fn get_projects(&self) -> Result<Vec<Project>> {
        self.read::<Vec<Project>>(None).await
    }

    pub async fn get_socials(&self) -> Result<Vec<SocialLink>> {
        self.read::<Vec<SocialLink>>(None).await
    }

    /// Fetch social links, giving up after `timeout`.
    pub async fn get_socials_within(&self, timeout: Duration) -> Result<Vec<SocialLink>> {
        self.read::<Vec<SocialLink>>(Some(timeout)).await
    }

    /// Generic GET of a resource, normalised on the way in.
    async fn read<R: Resource>(&self, timeout: Option<Duration>) -> Result<R::Patch> {
        let mut request = self
            .http
            .get(self.url(R::PATH))
            .header(ACCEPT, "application/json");
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await?;
        let body = self
            .check_response(response, &format!("Failed to fetch {}", R::ENVELOPE))
            .await?;
        let value: Value =
            serde_json::from_str(&body).map_err(|e| AppError::Malformed(e.to_string()))?;

        R::ingest(value).map_err(AppError::Malformed)
    }

    // ─── Writes ──────────────────────────────────────────────

    pub async fn update_hero(&self, data: &HeroContent, token: &str) -> Result<HeroContent> {
        self.put_json(data, token, "Failed to update hero data").await
    }

    pub async fn update_about(&self, data: &AboutContent, token: &str) -> Result<AboutContent> {
        self.put_json(data, token, "Failed to update about data")
            .await
    }

    /// Replace the whole technology list.
    pub async fn update_technologies(
        &self,
        data: &[Technology],
        token: &str,
    ) -> Result<Vec<Technology>> {
        self.put_json(&data.to_vec(), token, "Failed to update technologies")
            .await
    }

    /// Replace the whole social link list.
    pub async fn update_socials(
        &self,
        data: &[SocialLink],
        token: &str,
    ) -> Result<Vec<SocialLink>> {
        self.put_json(&data.to_vec(), token, "Failed to update social links")
            .await
    }

    /// PUT a resource as JSON. The returned value is what was sent, overlaid
    /// with whatever the API echoed back.
    async fn put_json<R: Resource + Serialize>(
        &self,
        data: &R,
        token: &str,
        context: &str,
    ) -> Result<R> {
        let response = self
            .http
            .put(self.url(R::PATH))
            .bearer_auth(token)
            .json(data)
            .send()
            .await?;

        let body = self.check_response(response, context).await?;

        let mut canonical = data.clone();
        if let Some(patch) = serde_json::from_str::<Value>(&body)
            .ok()
            .and_then(|value| R::ingest(value).ok())
            .filter(|patch| !R::is_empty_patch(patch))
        {
            canonical.apply(patch);
        }
        Ok(canonical)
    }

    /// Upload an image and return its hosted URL.
    pub async fn upload_image(&self, token: &str, image: ImageUpload) -> Result<String> {
        let form = Form::new().part("image", image_part(image)?);

        let response = self
            .http
            .post(self.url("/upload"))
            .bearer_auth(token)
            .multipart(form)
            .send()
            .await?;

        let body = self.check_response(response, "Image upload failed").await?;
        let value: Value =
            serde_json::from_str(&body).map_err(|e| AppError::Malformed(e.to_string()))?;

        value
            .get("url")
            .and_then(Value::as_str)
            .filter(|url| !url.is_empty())
            .map(str::to_string)
            .ok_or_else(|| AppError::Malformed("upload response has no url".to_string()))
    }

    /// Create one technology, optionally with an uploaded icon file.
    pub async fn create_technology(
        &self,
        data: &NewTechnology,
        token: &str,
        icon_file: Option<ImageUpload>,
    ) -> Result<Option<Technology>> {
        let mut form = Form::new()
            .text("name", data.name.clone())
            .text("category", data.category.clone());
        form = match icon_file {
            Some(file) => form.part("icon", image_part(file)?),
            None => form.text("icon", data.icon.clone()),
        };

        let response = self
            .http
            .post(self.url("/technologies"))
            .bearer_auth(token)
            .multipart(form)
            .send()
            .await?;

        let body = self
            .check_response(response, "Failed to create technology")
            .await?;
        Ok(echoed(&body, "technology", technology_from))
    }

    pub async fn create_project(
        &self,
        data: &ProjectDraft,
        token: &str,
        image: Option<ImageUpload>,
    ) -> Result<Option<Project>> {
        let response = self
            .http
            .post(self.url("/projects"))
            .bearer_auth(token)
            .multipart(project_form(data, image)?)
            .send()
            .await?;

        let body = self
            .check_response(response, "Failed to create project")
            .await?;
        Ok(echoed(&body, "project", project_from))
    }

    pub async fn update_project(
        &self,
        id: &str,
        data: &ProjectDraft,
        token: &str,
        image: Option<ImageUpload>,
    ) -> Result<Option<Project>> {
        let response = self
            .http
            .put(self.url(&format!("/projects/{}", urlencoding::encode(id))))
            .bearer_auth(token)
            .multipart(project_form(data, image)?)
            .send()
            .await?;

        let body = self
            .check_response(response, "Failed to update project")
            .await?;
        Ok(echoed(&body, "project", project_from))
    }

    pub async fn delete_project(&self, id: &str, token: &str) -> Result<()> {
        let response = self
            .http
            .delete(self.url(&format!("/projects/{}", urlencoding::encode(id))))
            .bearer_auth(token)
            .send()
            .await?;

        self.check_response(response, "Failed to delete project")
            .await?;
        Ok(())
    }

    /// Send a contact-form message. No auth.
    pub async fn submit_contact(&self, message: &ContactMessage) -> Result<()> {
        let response = self
            .http
            .post(self.url("/contact"))
            .json(message)
            .send()
            .await?;

        self.check_response(response, "Failed to submit contact message")
            .await?;
        Ok(())
    }

    // ─── Auth ────────────────────────────────────────────────

    /// Exchange credentials for a session token.
    pub async fn login(&self, credentials: &Credentials) -> Result<String> {
        let response = self
            .http
            .post(self.url("/admin/login"))
            .json(credentials)
            .send()
            .await?;

        if response.status().is_client_error() {
            tracing::info!(status = response.status().as_u16(), "Login rejected");
            return Err(AppError::InvalidCredentials);
        }

        let body = self.check_response(response, "Login failed").await?;
        let login: LoginResponse =
            serde_json::from_str(&body).map_err(|e| AppError::Malformed(e.to_string()))?;

        if login.token.is_empty() {
            return Err(AppError::Malformed("login response has an empty token".to_string()));
        }
        Ok(login.token)
    }

    /// Invalidate the session token server-side.
    pub async fn logout(&self, token: &str) -> Result<()> {
        let response = self
            .http
            .post(self.url("/auth/logout"))
            .bearer_auth(token)
            .send()
            .await?;

        self.check_response(response, "Failed to logout").await?;
        Ok(())
    }

    /// Check response status and return the body text if successful.
    async fn check_response(&self, response: reqwest::Response, context: &str) -> Result<String> {
        let status = response.status();
        let body = response.text().await?;

        if status.is_success() {
            return Ok(body);
        }

        tracing::warn!(
            status = status.as_u16(),
            body = %truncate(&body, 200),
            "{}",
            context
        );
        Err(AppError::Upstream {
            status: status.as_u16(),
            context: context.to_string(),
        })
    }
}

fn image_part(image: ImageUpload) -> Result<Part> {
    Part::bytes(image.bytes)
        .file_name(image.file_name)
        .mime_str(&image.content_type)
        .map_err(|e| AppError::BadRequest(format!("Invalid image content type: {e}")))
}

fn project_form(data: &ProjectDraft, image: Option<ImageUpload>) -> Result<Form> {
    let mut form = data
        .form_fields()
        .into_iter()
        .fold(Form::new(), |form, (name, value)| form.text(name, value));
    if let Some(image) = image {
        form = form.part("image", image_part(image)?);
    }
    Ok(form)
}

/// Parse a single echoed entity, if the API returned one we can use.
fn echoed<T>(body: &str, envelope: &str, item: fn(&Value) -> Option<T>) -> Option<T> {
    let value = serde_json::from_str::<Value>(body).ok()?;
    item(&unwrap_envelope(value, envelope))
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

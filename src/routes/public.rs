// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Public routes: the landing page, its sections, the contact form and the
//! login/logout flow.

use crate::error::{AppError, Result};
use crate::middleware::auth::{AuthGate, LOGIN_PATH};
use crate::models::{
    AboutContent, ContactMessage, Credentials, HeroContent, Notice, SectionView, SocialLink,
    Technology,
};
use crate::services::sections::{self, LandingPage, ProjectShowcase};
use crate::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::Redirect,
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Serialize;
use std::sync::Arc;
use validator::Validate;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(landing))
        .route("/sections/hero", get(hero))
        .route("/sections/about", get(about))
        .route("/sections/technologies", get(technologies))
        .route("/sections/projects", get(projects))
        .route("/sections/socials", get(socials))
        .route("/contact", post(contact))
        .route("/admin", get(login_view))
        .route("/admin/login", post(login))
        .route("/admin/logout", post(logout))
        .route("/api/session", get(session))
}

// ─── Landing Page ────────────────────────────────────────────

async fn landing(State(state): State<Arc<AppState>>) -> Json<LandingPage> {
    Json(sections::landing_page(&state.content, state.config.socials_timeout).await)
}

async fn hero(State(state): State<Arc<AppState>>) -> Json<SectionView<HeroContent>> {
    Json(sections::hero_section(&state.content).await)
}

async fn about(State(state): State<Arc<AppState>>) -> Json<SectionView<AboutContent>> {
    Json(sections::about_section(&state.content).await)
}

async fn technologies(State(state): State<Arc<AppState>>) -> Json<SectionView<Vec<Technology>>> {
    Json(sections::technologies_section(&state.content).await)
}

async fn projects(State(state): State<Arc<AppState>>) -> Json<SectionView<ProjectShowcase>> {
    Json(sections::projects_section(&state.content).await)
}

async fn socials(State(state): State<Arc<AppState>>) -> Json<SectionView<Vec<SocialLink>>> {
    Json(sections::socials_section(&state.content, state.config.socials_timeout).await)
}

// ─── Contact ─────────────────────────────────────────────────

const CONTACT_SENT: &str = "Message sent successfully! I'll get back to you soon.";
const CONTACT_FAILED: &str = "Failed to send message. Please try again.";

/// Forward a contact message. Invalid input is rejected before any remote call.
async fn contact(
    State(state): State<Arc<AppState>>,
    Json(message): Json<ContactMessage>,
) -> Result<(StatusCode, Json<Notice>)> {
    message
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    match state.content.submit_contact(&message).await {
        Ok(()) => {
            tracing::info!("Contact message forwarded");
            Ok((StatusCode::OK, Json(Notice::success(CONTACT_SENT))))
        }
        Err(e) => {
            tracing::warn!(error = %e, "Failed to forward contact message");
            Ok((StatusCode::BAD_GATEWAY, Json(Notice::error(CONTACT_FAILED))))
        }
    }
}

// ─── Session ─────────────────────────────────────────────────

/// Whether the caller holds a session.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub authenticated: bool,
}

impl SessionResponse {
    fn from_jar(jar: CookieJar) -> Json<Self> {
        Json(Self {
            authenticated: AuthGate::new(jar).is_authenticated(),
        })
    }
}

async fn login_view(jar: CookieJar) -> Json<SessionResponse> {
    SessionResponse::from_jar(jar)
}

async fn session(jar: CookieJar) -> Json<SessionResponse> {
    SessionResponse::from_jar(jar)
}

/// Exchange credentials for a session. Rejected credentials leave no cookie.
async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(credentials): Json<Credentials>,
) -> Result<(CookieJar, Json<SessionResponse>)> {
    if credentials.username.trim().is_empty() || credentials.password.is_empty() {
        return Err(AppError::BadRequest(
            "username and password are required".to_string(),
        ));
    }

    let token = state.content.login(&credentials).await?;
    tracing::info!(username = %credentials.username, "Admin logged in");

    let jar = AuthGate::new(jar).set_token(&token, &state.config).into_jar();
    Ok((
        jar,
        Json(SessionResponse {
            authenticated: true,
        }),
    ))
}

/// End the session. The cookie is cleared whatever the remote logout returns.
async fn logout(State(state): State<Arc<AppState>>, jar: CookieJar) -> (CookieJar, Redirect) {
    let gate = AuthGate::new(jar);

    if let Some(token) = gate.token() {
        if let Err(e) = state.content.logout(&token).await {
            tracing::warn!(error = %e, "Remote logout failed, clearing session anyway");
        }
    }

    (
        gate.remove_token(&state.config).into_jar(),
        Redirect::to(LOGIN_PATH),
    )
}

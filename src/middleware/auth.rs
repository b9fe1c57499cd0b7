// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session authentication: the auth gate and the dashboard route guard.
//!
//! The session token issued by the content API at login is kept in a single
//! HttpOnly cookie. [`AuthGate`] is the only code that reads or writes it;
//! the route guard and every editor handler go through it.

use crate::config::Config;
use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "admin_token";

/// Where unauthenticated dashboard requests are sent.
pub const LOGIN_PATH: &str = "/admin";

/// Path prefix the route guard protects.
pub const PROTECTED_PREFIX: &str = "/admin/dashboard";

/// View of the session credential carried by a request.
///
/// Presence of a non-empty token counts as authenticated. Validity is only
/// established when the content API accepts or rejects it.
#[derive(Debug, Clone)]
pub struct AuthGate {
    jar: CookieJar,
}

impl AuthGate {
    pub fn new(jar: CookieJar) -> Self {
        Self { jar }
    }

    /// The session token, if a non-empty one is present.
    pub fn token(&self) -> Option<String> {
        self.jar
            .get(SESSION_COOKIE)
            .map(|cookie| cookie.value().to_string())
            .filter(|token| !token.is_empty())
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    /// Store `token` as the session credential, replacing any previous one.
    pub fn set_token(self, token: &str, config: &Config) -> Self {
        let cookie = Cookie::build((SESSION_COOKIE, token.to_string()))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(config.secure_cookies())
            .max_age(time::Duration::days(config.session_max_age_days));

        Self {
            jar: self.jar.add(cookie),
        }
    }

    /// Clear the session credential. Safe to call when none is present.
    pub fn remove_token(self, config: &Config) -> Self {
        let cookie = Cookie::build(SESSION_COOKIE)
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(config.secure_cookies());

        Self {
            jar: self.jar.remove(cookie),
        }
    }

    pub fn into_jar(self) -> CookieJar {
        self.jar
    }
}

/// Whether `path` falls under the protected dashboard prefix.
pub fn is_protected(path: &str) -> bool {
    path == PROTECTED_PREFIX
        || path
            .strip_prefix(PROTECTED_PREFIX)
            .is_some_and(|rest| rest.starts_with('/'))
}

/// Middleware that redirects unauthenticated dashboard requests to the login page.
/// Requests outside the protected prefix pass through untouched.
pub async fn guard_dashboard(jar: CookieJar, request: Request, next: Next) -> Response {
    let path = request.uri().path();
    if is_protected(path) && !AuthGate::new(jar).is_authenticated() {
        tracing::info!(path = %path, "No session, redirecting to login");
        return Redirect::temporary(LOGIN_PATH).into_response();
    }

    next.run(request).await
}

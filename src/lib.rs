// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Portfolio site backend.
//!
//! Serves the public landing page and the admin dashboard as JSON view
//! models. All content lives in a remote content API; this crate owns the
//! admin session cookie and performs every content API call server-side.

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use config::Config;
use services::ContentClient;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub content: ContentClient,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let content = ContentClient::new(config.content_api_url.clone());
        Self { config, content }
    }
}

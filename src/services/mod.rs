// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services: the content API client and the section/editor logic built on it.

pub mod content;
pub mod editor;
pub mod sections;

pub use content::ContentClient;
pub use editor::{apply_list_edits, Editable, Editor, ListEdit, ListItem};
pub use sections::{landing_page, LandingPage, ProjectShowcase};

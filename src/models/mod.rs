// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod content;
pub mod ingest;
pub mod view;

pub use content::{
    AboutContent, ContactMessage, Credentials, HeroContent, ImageUpload, NewTechnology, Project,
    ProjectDraft, SocialLink, Technology,
};
pub use ingest::Resource;
pub use view::{EditorView, Notice, NoticeLevel, SectionView, ViewPhase};

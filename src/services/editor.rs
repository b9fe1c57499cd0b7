// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Admin editor state.
//!
//! An editor holds the last saved copy of a resource and a local draft.
//! Saving requires a session token and hands the draft to a write
//! operation. Success replaces both copies with the canonical value;
//! failure leaves them untouched. Either way the outcome becomes a
//! [`Notice`].

use crate::error::AppError;
use crate::models::{
    AboutContent, EditorView, HeroContent, NewTechnology, Notice, Project, Resource, SocialLink,
    Technology, ViewPhase,
};
use serde::{Deserialize, Serialize};
use std::future::Future;

/// Notification copy for one editor.
#[derive(Debug, Clone, Copy)]
pub struct Notices {
    pub load_failed: &'static str,
    pub saved: &'static str,
    pub save_failed: &'static str,
}

/// A resource with an admin editor.
pub trait Editable: Resource + PartialEq + Serialize {
    const NOTICES: Notices;
}

impl Editable for HeroContent {
    const NOTICES: Notices = Notices {
        load_failed: "Failed to load hero data",
        saved: "Hero section updated successfully!",
        save_failed: "Failed to update hero section",
    };
}

impl Editable for AboutContent {
    const NOTICES: Notices = Notices {
        load_failed: "Failed to load about data",
        saved: "About section updated successfully!",
        save_failed: "Failed to update about section",
    };
}

impl Editable for Vec<Technology> {
    const NOTICES: Notices = Notices {
        load_failed: "Failed to load technologies",
        saved: "Technologies updated successfully!",
        save_failed: "Failed to update technologies",
    };
}

impl Editable for Vec<Project> {
    const NOTICES: Notices = Notices {
        load_failed: "Failed to load projects",
        saved: "Project saved successfully!",
        save_failed: "Failed to save project",
    };
}

impl Editable for Vec<SocialLink> {
    const NOTICES: Notices = Notices {
        load_failed: "Failed to load social links",
        saved: "Social links updated successfully!",
        save_failed: "Failed to update social links",
    };
}

/// Editor state for one resource.
#[derive(Debug, Clone)]
pub struct Editor<R: Editable> {
    phase: ViewPhase,
    saved: R,
    draft: R,
    notice: Option<Notice>,
}

impl<R: Editable> Editor<R> {
    /// An editor that is about to load, showing `initial` meanwhile.
    pub fn new(initial: R) -> Self {
        Self {
            phase: ViewPhase::Loading,
            saved: initial.clone(),
            draft: initial,
            notice: None,
        }
    }

    /// An editor resumed from a draft the frontend already holds.
    pub fn resume(draft: R) -> Self {
        Self {
            phase: ViewPhase::Loaded,
            saved: draft.clone(),
            draft,
            notice: None,
        }
    }

    pub fn phase(&self) -> ViewPhase {
        self.phase
    }

    pub fn draft(&self) -> &R {
        &self.draft
    }

    pub fn saved(&self) -> &R {
        &self.saved
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Apply a read result. On failure the current values stay and an error notice is set.
    pub fn finish_load(&mut self, result: Result<R::Patch, AppError>) {
        match result {
            Ok(patch) => {
                self.saved.apply(patch);
                self.draft = self.saved.clone();
            }
            Err(e) => {
                tracing::warn!(error = %e, "{}", R::NOTICES.load_failed);
                self.notice = Some(Notice::error(R::NOTICES.load_failed));
            }
        }
        self.phase = ViewPhase::Loaded;
    }

    /// Change the local draft.
    pub fn edit(&mut self, f: impl FnOnce(&mut R)) {
        f(&mut self.draft);
        self.phase = self.settled_phase();
    }

    fn settled_phase(&self) -> ViewPhase {
        if self.draft == self.saved {
            ViewPhase::Loaded
        } else {
            ViewPhase::Editing
        }
    }

    /// Save the draft with the resource's standard notices.
    pub async fn save<F, Fut>(&mut self, token: Option<&str>, write: F) -> bool
    where
        F: FnOnce(String, R) -> Fut,
        Fut: Future<Output = Result<R, AppError>>,
    {
        let Notices {
            saved, save_failed, ..
        } = R::NOTICES;
        self.save_with(token, saved, save_failed, write).await
    }

    /// Save the draft through `write`, which receives the token and a copy of
    /// the draft and returns the canonical value.
    pub async fn save_with<F, Fut>(
        &mut self,
        token: Option<&str>,
        saved_message: &str,
        failed_message: &str,
        write: F,
    ) -> bool
    where
        F: FnOnce(String, R) -> Fut,
        Fut: Future<Output = Result<R, AppError>>,
    {
        let Some(token) = token.filter(|t| !t.is_empty()) else {
            tracing::warn!("Save attempted without a session token");
            self.notice = Some(Notice::error(failed_message));
            return false;
        };

        let previous_phase = self.phase;
        self.phase = ViewPhase::Saving;

        match write(token.to_string(), self.draft.clone()).await {
            Ok(canonical) => {
                self.saved = canonical.clone();
                self.draft = canonical;
                self.phase = ViewPhase::Loaded;
                self.notice = Some(Notice::success(saved_message));
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "{}", failed_message);
                self.phase = previous_phase;
                self.notice = Some(Notice::error(failed_message));
                false
            }
        }
    }

    pub fn into_view(self) -> EditorView<R> {
        EditorView {
            phase: self.phase,
            data: self.draft,
            notice: self.notice,
        }
    }
}

// ─── Local list edits ────────────────────────────────────────

/// One local change to a list before it is saved in bulk.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ListEdit<N, C> {
    Add { item: N },
    Update { id: String, changes: C },
    Remove { id: String },
}

/// An entry of a bulk-saved list.
pub trait ListItem: Sized {
    type New;
    type Changes;

    fn id(&self) -> &str;

    /// Build a new entry, or `None` when required fields are missing.
    fn create(new: Self::New, id: String) -> Option<Self>;

    fn update(&mut self, changes: Self::Changes);
}

/// Apply local edits in order. New entries get ids derived from `now_ms`.
/// Returns how many edits took effect.
pub fn apply_list_edits<T: ListItem>(
    items: &mut Vec<T>,
    edits: Vec<ListEdit<T::New, T::Changes>>,
    now_ms: i64,
) -> usize {
    let mut applied = 0;
    let mut next_id = now_ms;

    for edit in edits {
        match edit {
            ListEdit::Add { item } => {
                let id = next_id.to_string();
                if let Some(entry) = T::create(item, id) {
                    items.push(entry);
                    next_id += 1;
                    applied += 1;
                }
            }
            ListEdit::Update { id, changes } => {
                if let Some(entry) = items.iter_mut().find(|e| e.id() == id) {
                    entry.update(changes);
                    applied += 1;
                }
            }
            ListEdit::Remove { id } => {
                let before = items.len();
                items.retain(|e| e.id() != id);
                if items.len() < before {
                    applied += 1;
                }
            }
        }
    }

    applied
}

fn replace(field: &mut String, value: Option<String>) {
    if let Some(value) = value {
        *field = value;
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TechnologyChanges {
    pub name: Option<String>,
    pub icon: Option<String>,
    pub category: Option<String>,
}

impl ListItem for Technology {
    type New = NewTechnology;
    type Changes = TechnologyChanges;

    fn id(&self) -> &str {
        &self.id
    }

    fn create(new: NewTechnology, id: String) -> Option<Self> {
        if new.name.trim().is_empty() || new.icon.trim().is_empty() {
            return None;
        }
        Some(Technology {
            id,
            name: new.name,
            icon: new.icon,
            category: new.category,
        })
    }

    fn update(&mut self, changes: TechnologyChanges) {
        replace(&mut self.name, changes.name);
        replace(&mut self.icon, changes.icon);
        replace(&mut self.category, changes.category);
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NewSocialLink {
    pub platform: String,
    pub url: String,
    pub icon: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SocialLinkChanges {
    pub platform: Option<String>,
    pub url: Option<String>,
    pub icon: Option<String>,
}

impl ListItem for SocialLink {
    type New = NewSocialLink;
    type Changes = SocialLinkChanges;

    fn id(&self) -> &str {
        &self.id
    }

    fn create(new: NewSocialLink, id: String) -> Option<Self> {
        if [&new.platform, &new.url, &new.icon]
            .iter()
            .any(|f| f.trim().is_empty())
        {
            return None;
        }
        Some(SocialLink {
            id,
            platform: new.platform,
            url: new.url,
            icon: new.icon,
        })
    }

    fn update(&mut self, changes: SocialLinkChanges) {
        replace(&mut self.platform, changes.platform);
        replace(&mut self.url, changes.url);
        replace(&mut self.icon, changes.icon);
    }
}

//! View models returned to the frontend.

use serde::Serialize;

/// Lifecycle of a section or editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewPhase {
    Loading,
    Loaded,
    Editing,
    Saving,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Success,
    Error,
}

/// A toast-style notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// A public page section. Errors are never surfaced here.
#[derive(Debug, Clone, Serialize)]
pub struct SectionView<T> {
    pub phase: ViewPhase,
    pub data: T,
    /// Whether any fetched value replaced a built-in default.
    pub from_remote: bool,
}

/// An admin editor.
#[derive(Debug, Clone, Serialize)]
pub struct EditorView<T> {
    pub phase: ViewPhase,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<Notice>,
}

impl<T> SectionView<T> {
    /// Transform the section data, keeping phase and provenance.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> SectionView<U> {
        SectionView {
            phase: self.phase,
            data: f(self.data),
            from_remote: self.from_remote,
        }
    }
}

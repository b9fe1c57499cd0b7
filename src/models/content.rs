//! Content entities exchanged with the content API.
//!
//! Wire names are camelCase to match the API. Ingestion of raw API bodies
//! (envelopes, alternate field names) lives in [`super::ingest`].

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Hero banner copy (singleton resource).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HeroContent {
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub cta_text: String,
    pub cta_link: String,
}

/// About section (singleton resource).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AboutContent {
    pub title: String,
    pub description: String,
    /// Profile image URL
    pub profile_image: String,
    /// Ordered skill list
    pub skills: Vec<String>,
}

impl AboutContent {
    /// Append a skill. Blank input is ignored and reported as `false`.
    pub fn add_skill(&mut self, skill: &str) -> bool {
        let skill = skill.trim();
        if skill.is_empty() {
            return false;
        }
        self.skills.push(skill.to_string());
        true
    }

    /// Remove the skill at `index`, if any.
    pub fn remove_skill(&mut self, index: usize) -> Option<String> {
        (index < self.skills.len()).then(|| self.skills.remove(index))
    }
}

/// A technology badge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Technology {
    pub id: String,
    pub name: String,
    /// Icon URL
    pub icon: String,
    pub category: String,
}

/// A portfolio project, in canonical field names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Project {
    pub id: String,
    pub title: String,
    pub description: String,
    /// Image URL
    pub image: Option<String>,
    pub technologies: Vec<String>,
    pub live_url: Option<String>,
    pub github_url: Option<String>,
    pub featured: bool,
}

/// A social profile link.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SocialLink {
    pub id: String,
    pub platform: String,
    pub url: String,
    pub icon: String,
}

/// Message submitted from the contact form. Never stored locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ContactMessage {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 5000))]
    pub message: String,
}

/// Admin login credentials.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Body returned by a successful login.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

/// Fields written when creating or updating a project.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectDraft {
    pub title: String,
    pub description: String,
    pub technologies: Vec<String>,
    pub live_url: String,
    pub github_url: String,
    pub featured: bool,
}

impl ProjectDraft {
    /// Text fields of the multipart body, in the names the project endpoints expect.
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("title", self.title.clone()),
            ("description", self.description.clone()),
            ("technologies", self.technologies.join(",")),
            ("liveLink", self.live_url.clone()),
            ("githubLink", self.github_url.clone()),
            ("featured", self.featured.to_string()),
        ]
    }

    /// Split a comma-separated technology list, dropping blanks.
    pub fn parse_technologies(raw: &str) -> Vec<String> {
        raw.split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// Fields written when creating a single technology.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NewTechnology {
    pub name: String,
    pub icon: String,
    pub category: String,
}

/// Image file selected in an editor.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    /// Largest accepted upload.
    pub const MAX_BYTES: usize = 5 * 1024 * 1024;
}

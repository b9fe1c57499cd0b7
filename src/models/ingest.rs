//! Normalisation of raw content API bodies.
//!
//! The API has grown two write paths that disagree on field names
//! (`id`/`_id`, `liveUrl`/`liveLink`, `githubUrl`/`githubLink`) and on whether
//! bodies are wrapped in a resource envelope. Everything is mapped to the
//! canonical shapes in [`super::content`] here, once, on ingestion.

use super::content::{AboutContent, HeroContent, Project, SocialLink, Technology};
use serde_json::{Map, Value};

/// A content resource that can be read from the API and merged into local state.
pub trait Resource: Clone + Send + Sync + 'static {
    /// Fields recovered from a (possibly partial) API body.
    type Patch: Send;

    /// Path relative to the API base URL.
    const PATH: &'static str;
    /// Key the API may wrap the body in.
    const ENVELOPE: &'static str;

    /// Recover usable fields. Fails only when the body has the wrong overall shape.
    fn patch_from(value: &Value) -> Result<Self::Patch, String>;

    /// Merge recovered fields into `self`, field by field.
    fn apply(&mut self, patch: Self::Patch);

    /// Whether the patch carries nothing worth showing over built-in defaults.
    fn is_empty_patch(_patch: &Self::Patch) -> bool {
        false
    }

    /// Unwrap the envelope, then recover fields.
    fn ingest(value: Value) -> Result<Self::Patch, String> {
        Self::patch_from(&unwrap_envelope(value, Self::ENVELOPE))
    }
}

/// Return the value under `key` when the body is `{ key: ... }`, else the body itself.
pub fn unwrap_envelope(value: Value, key: &str) -> Value {
    match value {
        Value::Object(mut map) if map.contains_key(key) => {
            map.remove(key).unwrap_or(Value::Null)
        }
        other => other,
    }
}

/// Non-empty string field.
fn text(map: &Map<String, Value>, key: &str) -> Option<String> {
    map.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
}

fn first_text(map: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| text(map, key))
}

/// `id` or `_id`, as a string or a number.
fn identifier(map: &Map<String, Value>) -> Option<String> {
    ["id", "_id"].iter().find_map(|key| match map.get(*key) {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Image reference given either as a URL string or as `{ "url": ... }`.
fn image_url(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Object(map) => text(map, "url"),
        _ => None,
    }
}

/// List of strings given either as an array or as a comma-separated string.
fn string_list(value: &Value) -> Option<Vec<String>> {
    match value {
        Value::Array(items) => Some(
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        ),
        Value::String(s) => Some(
            s.split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect(),
        ),
        _ => None,
    }
}

fn flag(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::String(s) => s.eq_ignore_ascii_case("true"),
        _ => false,
    }
}

fn object<'a>(value: &'a Value, what: &str) -> Result<&'a Map<String, Value>, String> {
    value
        .as_object()
        .ok_or_else(|| format!("expected {what} object"))
}

/// Keep the items that normalise; the rest are dropped.
fn list<T>(value: &Value, what: &str, item: fn(&Value) -> Option<T>) -> Result<Vec<T>, String> {
    let items = value
        .as_array()
        .ok_or_else(|| format!("expected {what} list"))?;
    let parsed: Vec<T> = items.iter().filter_map(item).collect();
    if parsed.len() < items.len() {
        tracing::debug!(
            resource = what,
            dropped = items.len() - parsed.len(),
            "Dropped malformed list entries"
        );
    }
    Ok(parsed)
}

// ─── Singletons ──────────────────────────────────────────────

/// Hero fields present in an API body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeroPatch {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub description: Option<String>,
    pub cta_text: Option<String>,
    pub cta_link: Option<String>,
}

impl Resource for HeroContent {
    type Patch = HeroPatch;
    const PATH: &'static str = "/hero";
    const ENVELOPE: &'static str = "hero";

    fn patch_from(value: &Value) -> Result<HeroPatch, String> {
        let map = object(value, "hero")?;
        Ok(HeroPatch {
            title: text(map, "title"),
            subtitle: text(map, "subtitle"),
            description: text(map, "description"),
            cta_text: text(map, "ctaText"),
            cta_link: text(map, "ctaLink"),
        })
    }

    fn apply(&mut self, patch: HeroPatch) {
        set(&mut self.title, patch.title);
        set(&mut self.subtitle, patch.subtitle);
        set(&mut self.description, patch.description);
        set(&mut self.cta_text, patch.cta_text);
        set(&mut self.cta_link, patch.cta_link);
    }

    fn is_empty_patch(patch: &HeroPatch) -> bool {
        *patch == HeroPatch::default()
    }
}

/// About fields present in an API body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AboutPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub profile_image: Option<String>,
    pub skills: Option<Vec<String>>,
}

impl Resource for AboutContent {
    type Patch = AboutPatch;
    const PATH: &'static str = "/about";
    const ENVELOPE: &'static str = "about";

    fn patch_from(value: &Value) -> Result<AboutPatch, String> {
        let map = object(value, "about")?;
        Ok(AboutPatch {
            title: text(map, "title"),
            description: text(map, "description"),
            profile_image: map.get("profileImage").and_then(image_url),
            skills: map
                .get("skills")
                .filter(|v| v.is_array())
                .and_then(string_list),
        })
    }

    fn apply(&mut self, patch: AboutPatch) {
        set(&mut self.title, patch.title);
        set(&mut self.description, patch.description);
        set(&mut self.profile_image, patch.profile_image);
        if let Some(skills) = patch.skills {
            self.skills = skills;
        }
    }

    fn is_empty_patch(patch: &AboutPatch) -> bool {
        *patch == AboutPatch::default()
    }
}

fn set(field: &mut String, value: Option<String>) {
    if let Some(value) = value {
        *field = value;
    }
}

// ─── Lists ───────────────────────────────────────────────────

/// Normalise one technology. A name is required; the id falls back to it.
pub fn technology_from(value: &Value) -> Option<Technology> {
    let map = value.as_object()?;
    let name = text(map, "name")?;
    Some(Technology {
        id: identifier(map).unwrap_or_else(|| name.clone()),
        icon: map.get("icon").and_then(image_url).unwrap_or_default(),
        category: text(map, "category").unwrap_or_default(),
        name,
    })
}

/// Normalise one project. Projects without an identifier cannot be edited and are dropped.
pub fn project_from(value: &Value) -> Option<Project> {
    let map = value.as_object()?;
    Some(Project {
        id: identifier(map)?,
        title: text(map, "title")?,
        description: text(map, "description").unwrap_or_default(),
        image: map.get("image").and_then(image_url),
        technologies: map
            .get("technologies")
            .and_then(string_list)
            .unwrap_or_default(),
        live_url: first_text(map, &["liveUrl", "liveLink"]),
        github_url: first_text(map, &["githubUrl", "githubLink"]),
        featured: map.get("featured").map(flag).unwrap_or(false),
    })
}

/// Normalise one social link. Platform and URL are required.
pub fn social_from(value: &Value) -> Option<SocialLink> {
    let map = value.as_object()?;
    let platform = text(map, "platform")?;
    Some(SocialLink {
        id: identifier(map).unwrap_or_else(|| platform.clone()),
        url: text(map, "url")?,
        icon: text(map, "icon").unwrap_or_default(),
        platform,
    })
}

impl Resource for Vec<Technology> {
    type Patch = Vec<Technology>;
    const PATH: &'static str = "/technologies";
    const ENVELOPE: &'static str = "technologies";

    fn patch_from(value: &Value) -> Result<Self::Patch, String> {
        list(value, "technologies", technology_from)
    }

    fn apply(&mut self, patch: Self::Patch) {
        *self = patch;
    }

    fn is_empty_patch(patch: &Self::Patch) -> bool {
        patch.is_empty()
    }
}

impl Resource for Vec<Project> {
    type Patch = Vec<Project>;
    const PATH: &'static str = "/projects";
    const ENVELOPE: &'static str = "projects";

    fn patch_from(value: &Value) -> Result<Self::Patch, String> {
        list(value, "projects", project_from)
    }

    fn apply(&mut self, patch: Self::Patch) {
        *self = patch;
    }

    fn is_empty_patch(patch: &Self::Patch) -> bool {
        patch.is_empty()
    }
}

impl Resource for Vec<SocialLink> {
    type Patch = Vec<SocialLink>;
    const PATH: &'static str = "/socials";
    const ENVELOPE: &'static str = "socials";

    fn patch_from(value: &Value) -> Result<Self::Patch, String> {
        list(value, "socials", social_from)
    }

    fn apply(&mut self, patch: Self::Patch) {
        *self = patch;
    }

    fn is_empty_patch(patch: &Self::Patch) -> bool {
        patch.is_empty()
    }
}

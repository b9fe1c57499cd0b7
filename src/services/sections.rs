// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Public page sections.
//!
//! Each section starts from built-in defaults and overlays whatever the
//! content API returns. A failed or unusable read leaves the defaults in
//! place and is only logged; the public page never shows an error.

use crate::error::AppError;
use crate::models::{
    AboutContent, HeroContent, Project, Resource, SectionView, SocialLink, Technology, ViewPhase,
};
use crate::services::ContentClient;
use serde::Serialize;
use std::time::Duration;

pub fn default_hero() -> HeroContent {
    HeroContent {
        title: "No Code Solution Expert".to_string(),
        subtitle: "Hi, I am Joash Adeoye".to_string(),
        description: "I help startups and individuals bring their ideas and product to life \
                      by building responsive and sellable MVPs."
            .to_string(),
        cta_text: "View My Work".to_string(),
        cta_link: "#projects".to_string(),
    }
}

pub fn default_about() -> AboutContent {
    AboutContent {
        title: "About Me".to_string(),
        ..Default::default()
    }
}

pub fn default_technologies() -> Vec<Technology> {
    [
        ("1", "React", "/icons/react.svg", "Frontend"),
        ("2", "Node.js", "/icons/nodejs.svg", "Backend"),
        ("3", "TypeScript", "/icons/typescript.svg", "Language"),
        ("4", "Python", "/icons/python.svg", "Language"),
    ]
    .into_iter()
    .map(|(id, name, icon, category)| Technology {
        id: id.to_string(),
        name: name.to_string(),
        icon: icon.to_string(),
        category: category.to_string(),
    })
    .collect()
}

pub fn default_projects() -> Vec<Project> {
    vec![Project {
        id: "1".to_string(),
        title: "E-Commerce Platform".to_string(),
        description:
            "Full-stack e-commerce solution with modern UI and secure payment integration."
                .to_string(),
        image: Some("/placeholder-project.jpg".to_string()),
        technologies: vec![
            "React".to_string(),
            "Node.js".to_string(),
            "MongoDB".to_string(),
        ],
        live_url: Some("https://example.com".to_string()),
        github_url: Some("https://github.com/example".to_string()),
        featured: true,
    }]
}

/// Links shown when the social list cannot be fetched or is empty.
pub fn fallback_socials() -> Vec<SocialLink> {
    [
        ("github", "https://github.com"),
        ("linkedin", "https://linkedin.com"),
        ("email", "mailto:oyerinde13@gmail.com"),
        ("twitter", "https://twitter.com"),
    ]
    .into_iter()
    .map(|(platform, url)| SocialLink {
        id: platform.to_string(),
        platform: platform.to_string(),
        url: url.to_string(),
        icon: platform.to_string(),
    })
    .collect()
}

/// Overlay a read result on `defaults`.
pub fn settle<R: Resource>(
    defaults: R,
    result: Result<R::Patch, AppError>,
    section: &'static str,
) -> SectionView<R> {
    match result {
        Ok(patch) if !R::is_empty_patch(&patch) => {
            let mut data = defaults;
            data.apply(patch);
            SectionView {
                phase: ViewPhase::Loaded,
                data,
                from_remote: true,
            }
        }
        Ok(_) => {
            tracing::debug!(section, "Empty content, showing defaults");
            fallback(defaults)
        }
        Err(e) => {
            tracing::warn!(section, error = %e, "Failed to load section, showing defaults");
            fallback(defaults)
        }
    }
}

fn fallback<R>(defaults: R) -> SectionView<R> {
    SectionView {
        phase: ViewPhase::Loaded,
        data: defaults,
        from_remote: false,
    }
}

pub async fn hero_section(client: &ContentClient) -> SectionView<HeroContent> {
    settle(default_hero(), client.get_hero().await, "hero")
}

pub async fn about_section(client: &ContentClient) -> SectionView<AboutContent> {
    settle(default_about(), client.get_about().await, "about")
}

pub async fn technologies_section(client: &ContentClient) -> SectionView<Vec<Technology>> {
    settle(
        default_technologies(),
        client.get_technologies().await,
        "technologies",
    )
}

pub async fn projects_section(client: &ContentClient) -> SectionView<ProjectShowcase> {
    settle(default_projects(), client.get_projects().await, "projects")
        .map(|projects| ProjectShowcase::from(projects.as_slice()))
}

/// Social sidebar links, with a bounded wait.
pub async fn socials_section(
    client: &ContentClient,
    timeout: Duration,
) -> SectionView<Vec<SocialLink>> {
    settle(
        fallback_socials(),
        client.get_socials_within(timeout).await,
        "socials",
    )
}

/// Projects split the way the page shows them.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectShowcase {
    pub featured: Vec<Project>,
    pub others: Vec<Project>,
}

impl From<&[Project]> for ProjectShowcase {
    fn from(projects: &[Project]) -> Self {
        let (featured, others): (Vec<Project>, Vec<Project>) =
            projects.iter().cloned().partition(|p| p.featured);
        Self { featured, others }
    }
}

/// Everything the landing page renders.
#[derive(Debug, Clone, Serialize)]
pub struct LandingPage {
    pub hero: SectionView<HeroContent>,
    pub about: SectionView<AboutContent>,
    pub technologies: SectionView<Vec<Technology>>,
    pub projects: SectionView<ProjectShowcase>,
    /// Shared by the sidebar, contact section and footer.
    pub socials: SectionView<Vec<SocialLink>>,
}

/// Load every section concurrently.
pub async fn landing_page(client: &ContentClient, socials_timeout: Duration) -> LandingPage {
    let (hero, about, technologies, projects, socials) = tokio::join!(
        hero_section(client),
        about_section(client),
        technologies_section(client),
        projects_section(client),
        socials_section(client, socials_timeout),
    );

    LandingPage {
        hero,
        about,
        technologies,
        projects,
        socials,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ingest::HeroPatch;

    #[test]
    fn test_failed_read_keeps_defaults() {
        let view = settle(
            default_hero(),
            Err(AppError::Transport("connection refused".to_string())),
            "hero",
        );
        assert_eq!(view.phase, ViewPhase::Loaded);
        assert!(!view.from_remote);
        assert_eq!(view.data, default_hero());
    }

    #[test]
    fn test_partial_read_merges_field_by_field() {
        let patch = HeroPatch {
            title: Some("Rust Consultant".to_string()),
            ..Default::default()
        };
        let view = settle(default_hero(), Ok(patch), "hero");
        assert!(view.from_remote);
        assert_eq!(view.data.title, "Rust Consultant");
        assert_eq!(view.data.subtitle, default_hero().subtitle);
        assert_eq!(view.data.cta_link, "#projects");
    }

    #[test]
    fn test_empty_social_list_falls_back() {
        let view = settle(fallback_socials(), Ok(Vec::new()), "socials");
        assert!(!view.from_remote);
        assert_eq!(view.data.len(), 4);
        assert_eq!(view.data[2].url, "mailto:oyerinde13@gmail.com");
    }

    #[test]
    fn test_showcase_split() {
        let mut projects = default_projects();
        projects.push(Project {
            id: "2".to_string(),
            title: "Side project".to_string(),
            ..Default::default()
        });
        let showcase = ProjectShowcase::from(projects.as_slice());
        assert_eq!(showcase.featured.len(), 1);
        assert_eq!(showcase.others[0].title, "Side project");
    }
}

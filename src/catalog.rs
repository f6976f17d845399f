//! Portfolio content catalog.
//!
//! Everything the page shows that is not styling lives in the content
//! directory:
//!
//! ```text
//! content/
//! ├── portfolio.toml     # Profile, projects, skills, contact items, links
//! ├── about.md           # About section body (markdown)
//! ├── config.toml        # Site config (optional, see config module)
//! └── assets/            # Images, resume, icons → copied to output root
//! ```
//!
//! ## `portfolio.toml`
//!
//! ```toml
//! [profile]
//! name = "Ada Lovelace"
//! brand = "ada.dev"
//! greeting = "👋 Hi there! I am"
//! role = "Full-Stack Developer specializing in"
//! highlights = ["Rust", "WebAssembly"]
//! location = "London, UK"
//! photo = "/images/ada.png"
//! badges = ["Rust", "Wasm"]
//! email = "ada@example.com"
//!
//! [links]
//! resume = "https://example.com/resume.pdf"
//! github = "https://github.com/ada"
//! linkedin = "https://linkedin.com/in/ada"
//!
//! [[projects]]
//! title = "Analytical Engine"
//! description = "A general-purpose mechanical computer."
//! image = "/images/engine.png"
//! technologies = ["Brass", "Steam"]
//! ```
//!
//! The catalog is pure data: loading and validation are the only behavior.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parse error in portfolio.toml: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Catalog validation error: {0}")]
    Validation(String),
}

/// Everything rendered on the page, loaded from the content directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AssetCatalog {
    pub profile: Profile,
    #[serde(default)]
    pub links: Links,
    #[serde(default)]
    pub sections: SectionCopy,
    #[serde(default)]
    pub facts: Vec<Fact>,
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub skills: Vec<SkillGroup>,
    #[serde(default)]
    pub levels: Vec<ProficiencyLevel>,
    #[serde(default)]
    pub contact: Vec<ContactItem>,
    #[serde(default)]
    pub footer: Footer,
    /// Markdown body of the about section, from `about.md`.
    #[serde(skip)]
    pub about: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Profile {
    pub name: String,
    /// Short wordmark shown in the header (defaults to the name).
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub greeting: String,
    #[serde(default)]
    pub role: String,
    /// Words emphasized after the role line.
    #[serde(default)]
    pub highlights: Vec<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub photo: Option<String>,
    /// Floating technology badges around the hero.
    #[serde(default)]
    pub badges: Vec<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl Profile {
    pub fn brand(&self) -> &str {
        self.brand.as_deref().unwrap_or(&self.name)
    }
}

/// External destinations. Each opens in a new browsing context.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Links {
    pub resume: Option<String>,
    pub github: Option<String>,
    pub linkedin: Option<String>,
}

/// Headings and taglines of the content sections.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SectionCopy {
    pub about: Heading,
    pub projects: Heading,
    pub skills: Heading,
    pub contact: Heading,
}

impl Default for SectionCopy {
    fn default() -> Self {
        Self {
            about: Heading::new(
                "About Me",
                "Passionate about crafting digital experiences that make a difference",
            ),
            projects: Heading::new(
                "Featured Projects",
                "A showcase of my latest work in web development, mobile apps, and IoT solutions",
            ),
            skills: Heading::new(
                "Skills & Technologies",
                "A comprehensive toolkit for building modern digital solutions",
            ),
            contact: Heading::new(
                "Get In Touch",
                "Ready to bring your ideas to life? Let's discuss your next project!",
            ),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Heading {
    pub title: String,
    #[serde(default)]
    pub tagline: String,
}

impl Heading {
    fn new(title: &str, tagline: &str) -> Self {
        Self {
            title: title.to_string(),
            tagline: tagline.to_string(),
        }
    }
}

/// An about-section card: either a single line or a list of tags.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Fact {
    pub title: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub items: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Project {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub technologies: Vec<String>,
    /// Source link; falls back to `links.github`.
    #[serde(default)]
    pub code_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SkillGroup {
    pub category: String,
    #[serde(default)]
    pub icon: Option<String>,
    pub items: Vec<String>,
}

/// Legend entry under the skills grid.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProficiencyLevel {
    pub label: String,
    /// CSS modifier, e.g. `expert` → `.level-expert`.
    pub class: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContactItem {
    pub title: String,
    pub text: String,
    #[serde(default)]
    pub icon: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Footer {
    #[serde(default)]
    pub copyright: Option<String>,
}

impl AssetCatalog {
    /// Load `portfolio.toml` (required) and `about.md` (optional) from `root`.
    pub fn load(root: &Path) -> Result<Self, CatalogError> {
        let path = root.join("portfolio.toml");
        let content = read(&path)?;
        let mut catalog: AssetCatalog = toml::from_str(&content)?;

        let about_path = root.join("about.md");
        if about_path.exists() {
            catalog.about = read(&about_path)?;
        }

        catalog.validate()?;
        Ok(catalog)
    }

    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.profile.name.trim().is_empty() {
            return Err(invalid("profile.name must not be empty"));
        }

        let mut titles = HashSet::new();
        for project in &self.projects {
            if project.title.trim().is_empty() {
                return Err(invalid("project title must not be empty"));
            }
            if !titles.insert(project.title.as_str()) {
                return Err(invalid(format!("duplicate project '{}'", project.title)));
            }
            if let Some(url) = &project.code_url {
                check_url(&format!("projects '{}' code_url", project.title), url)?;
            }
        }

        for group in &self.skills {
            if group.items.is_empty() {
                return Err(invalid(format!(
                    "skill group '{}' has no items",
                    group.category
                )));
            }
        }

        for fact in &self.facts {
            if fact.text.is_some() == !fact.items.is_empty() {
                return Err(invalid(format!(
                    "fact '{}' needs exactly one of `text` or `items`",
                    fact.title
                )));
            }
        }

        for (name, url) in [
            ("links.resume", &self.links.resume),
            ("links.github", &self.links.github),
            ("links.linkedin", &self.links.linkedin),
        ] {
            if let Some(url) = url {
                check_url(name, url)?;
            }
        }
        Ok(())
    }

    /// Where a project's "View Code" button points.
    pub fn code_url<'a>(&'a self, project: &'a Project) -> Option<&'a str> {
        project
            .code_url
            .as_deref()
            .or(self.links.github.as_deref())
    }
}

fn read(path: &Path) -> Result<String, CatalogError> {
    fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.display().to_string(),
        source,
    })
}

fn invalid(msg: impl Into<String>) -> CatalogError {
    CatalogError::Validation(msg.into())
}

fn check_url(name: &str, url: &str) -> Result<(), CatalogError> {
    if url.starts_with("https://") || url.starts_with("http://") || url.starts_with("mailto:") {
        Ok(())
    } else {
        Err(invalid(format!("{name} must be an absolute URL, got '{url}'")))
    }
}

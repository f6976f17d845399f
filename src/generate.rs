//! HTML site generation.
//!
//! Renders the catalog into a single `index.html` and copies the content's
//! `assets/` directory next to it.
//!
//! ## Page Structure
//!
//! ```text
//! header.site-header        brand, nav buttons, mobile menu toggle
//! section#home  (hero)      photo, greeting, name, role, CTAs, badges
//! section#about             markdown body, resume link, fact cards
//! section#projects          project cards, "View All Projects"
//! section#skills            skill group cards, proficiency legend
//! section#contact           contact items, social links, form
//! footer#footer             copyright, links
//! ```
//!
//! Every section wrapper carries the reveal contract as data attributes:
//!
//! - `data-section`: section name
//! - `data-reveal`: initial presentation (`hidden`); the page script flips it
//!   to `visible` exactly once
//! - `data-margin`: viewport margin in px, from `[reveal]` config
//! - `data-reveal-delay`: hero only, entrance delay in ms
//!
//! ## Output Structure
//!
//! ```text
//! dist/
//! ├── index.html      # Page with inline CSS and script
//! └── images/...      # Everything under content/assets/, copied verbatim
//! ```
//!
//! ## HTML Generation
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating.
//! Templates are type-safe Rust code with automatic XSS escaping.

use crate::catalog::{AssetCatalog, CatalogError, Fact, Project, SkillGroup};
use crate::config::{self, ConfigError, SiteConfig};
use crate::reveal::RevealState;
use crate::types::{self, SectionId};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use pulldown_cmark::{Parser, html as md_html};
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error("asset walk error: {0}")]
    Walk(#[from] walkdir::Error),
}

/// What a build produced, for CLI output.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerateSummary {
    pub sections: Vec<SectionId>,
    pub projects: usize,
    pub skill_groups: usize,
    pub assets_copied: usize,
    pub relay_configured: bool,
}

const CSS_STATIC: &str = include_str!("../static/style.css");
const JS: &str = include_str!("../static/site.js");

/// Build the site from `source` into `output_dir`.
pub fn generate(source: &Path, output_dir: &Path) -> Result<GenerateSummary, GenerateError> {
    let config = config::load_config(source)?;
    let catalog = AssetCatalog::load(source)?;

    fs::create_dir_all(output_dir)?;
    let page = render_page(&catalog, &config);
    fs::write(output_dir.join("index.html"), page.into_string())?;
    info!(output = %output_dir.display(), "generated index.html");

    let assets_copied = copy_assets(&source.join("assets"), output_dir)?;

    Ok(GenerateSummary {
        sections: SectionId::ALL.to_vec(),
        projects: catalog.projects.len(),
        skill_groups: catalog.skills.len(),
        assets_copied,
        relay_configured: config.relay.is_configured(),
    })
}

/// Copy every file under `src` into `dst`, preserving relative paths.
///
/// A missing assets directory is not an error.
fn copy_assets(src: &Path, dst: &Path) -> Result<usize, GenerateError> {
    if !src.is_dir() {
        return Ok(0);
    }
    let mut copied = 0;
    for entry in WalkDir::new(src).min_depth(1) {
        let entry = entry?;
        let Ok(rel) = entry.path().strip_prefix(src) else {
            continue;
        };
        let target = dst.join(rel);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &target)?;
            debug!(asset = %rel.display(), "copied");
            copied += 1;
        }
    }
    Ok(copied)
}

// ============================================================================
// HTML Components
// ============================================================================

/// Renders the full page.
pub fn render_page(catalog: &AssetCatalog, config: &SiteConfig) -> Markup {
    let css = format!("{}\n\n{}", config::generate_color_css(&config.colors), CSS_STATIC);
    let title = if catalog.profile.role.is_empty() {
        catalog.profile.name.clone()
    } else {
        format!("{} | Portfolio", catalog.profile.name)
    };

    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                style { (PreEscaped(css)) }
            }
            body {
                (site_header(catalog))
                main {
                    (hero_section(catalog, config))
                    (about_section(catalog, config))
                    (projects_section(catalog, config))
                    (skills_section(catalog, config))
                    (contact_section(catalog, config))
                }
                (site_footer(catalog, config))
                script { (PreEscaped(JS)) }
            }
        }
    }
}

/// Data attributes every revealable wrapper carries.
struct RevealAttrs {
    margin: String,
    delay: Option<String>,
}

fn reveal_attrs(section: SectionId, config: &SiteConfig) -> RevealAttrs {
    RevealAttrs {
        margin: config.reveal.margin_for(section).to_string(),
        delay: section
            .is_timer_driven()
            .then(|| config.reveal.hero_delay_ms.to_string()),
    }
}

/// Initial presentation of every section: nothing is revealed at build time.
fn initial_presentation() -> &'static str {
    RevealState::NotRevealed.presentation().as_attr()
}

/// Wraps section content with the reveal contract attributes.
fn section_shell(section: SectionId, config: &SiteConfig, content: Markup) -> Markup {
    let attrs = reveal_attrs(section, config);
    html! {
        section.section.reveal
            id=(section.anchor())
            data-section=(section.as_str())
            data-reveal=(initial_presentation())
            data-margin=(attrs.margin)
            data-reveal-delay=[attrs.delay] {
            div.container {
                (content)
            }
        }
    }
}

fn section_heading(title: &str, tagline: &str) -> Markup {
    html! {
        div.section-heading {
            h2 { (title) }
            @if !tagline.is_empty() {
                p.tagline { (tagline) }
            }
        }
    }
}

/// Link that opens in a new browsing context.
fn external_link(href: &str, class: &str, label: Markup) -> Markup {
    html! {
        a class=(class) href=(href) target="_blank" rel="noopener noreferrer" { (label) }
    }
}

/// Renders the fixed header with nav buttons and the mobile menu toggle.
fn site_header(catalog: &AssetCatalog) -> Markup {
    let items = types::nav_items();
    html! {
        header.site-header {
            div.container.header-row {
                a.brand href="#home" { (catalog.profile.brand()) }
                input.nav-toggle type="checkbox" id="nav-toggle";
                label.nav-hamburger for="nav-toggle" aria-label="Toggle menu" {
                    span.hamburger-line {}
                    span.hamburger-line {}
                    span.hamburger-line {}
                }
                nav.site-nav {
                    @for (idx, item) in items.iter().enumerate() {
                        a.nav-link href={ "#" (item.section.anchor()) } style={ "--i:" (idx) } {
                            (item.label)
                        }
                    }
                }
            }
        }
    }
}

/// Splits text into per-letter spans for the staggered entrance.
fn letters(text: &str) -> Markup {
    html! {
        @for (idx, ch) in text.chars().enumerate() {
            @if ch == ' ' {
                span.letter style={ "--i:" (idx) } { (PreEscaped("&nbsp;")) }
            } @else {
                span.letter style={ "--i:" (idx) } { (ch) }
            }
        }
    }
}

fn hero_section(catalog: &AssetCatalog, config: &SiteConfig) -> Markup {
    let profile = &catalog.profile;
    let mut name_parts = profile.name.splitn(2, ' ');
    let first = name_parts.next().unwrap_or_default();
    let rest = name_parts.next();

    let content = html! {
        div.hero-grid {
            @if let Some(photo) = &profile.photo {
                div.profile-photo {
                    img src=(photo) alt=(profile.name);
                }
            }
            div.hero-text {
                @if !profile.greeting.is_empty() {
                    p.greeting { (profile.greeting) }
                }
                h1.hero-name {
                    span.name-first { (letters(first)) }
                    @if let Some(rest) = rest {
                        br;
                        span.name-rest { (letters(rest)) }
                    }
                }
                @if !profile.role.is_empty() {
                    p.role {
                        (profile.role) " "
                        @for (idx, word) in profile.highlights.iter().enumerate() {
                            @if idx > 0 {
                                @if idx + 1 == profile.highlights.len() { ", and " } @else { ", " }
                            }
                            span.highlight { (word) }
                        }
                    }
                }
                @if let Some(location) = &profile.location {
                    p.location { (location) }
                }
                div.cta-row {
                    a.button.primary href={ "#" (SectionId::Projects.anchor()) } { "See My Work" }
                    a.button.outline href={ "#" (SectionId::Contact.anchor()) } { "Let's Connect" }
                }
                @if !profile.badges.is_empty() {
                    ul.badges {
                        @for (idx, badge) in profile.badges.iter().enumerate() {
                            li.badge style={ "--i:" (idx) } { (badge) }
                        }
                    }
                }
            }
        }
    };
    section_shell(SectionId::Hero, config, content)
}

fn fact_card(fact: &Fact) -> Markup {
    html! {
        div.card.fact {
            @if let Some(icon) = &fact.icon {
                img.icon src=(icon) alt="";
            }
            div {
                h3 { (letters(&fact.title)) }
                @if let Some(text) = &fact.text {
                    p { (text) }
                } @else {
                    div.tags {
                        @for item in &fact.items {
                            span.tag { (item) }
                        }
                    }
                }
            }
        }
    }
}

fn about_section(catalog: &AssetCatalog, config: &SiteConfig) -> Markup {
    let mut body_html = String::new();
    md_html::push_html(&mut body_html, Parser::new(&catalog.about));
    let copy = &catalog.sections.about;

    let content = html! {
        (section_heading(&copy.title, &copy.tagline))
        div.about-grid {
            div.about-body {
                (PreEscaped(body_html))
                @if let Some(resume) = &catalog.links.resume {
                    (external_link(resume, "button primary", html! { "Download Resume" }))
                }
            }
            @if !catalog.facts.is_empty() {
                div.facts {
                    @for fact in &catalog.facts {
                        (fact_card(fact))
                    }
                }
            }
        }
    };
    section_shell(SectionId::About, config, content)
}

fn project_card(catalog: &AssetCatalog, project: &Project, idx: usize) -> Markup {
    html! {
        article.card.project style={ "--i:" (idx) } {
            @if let Some(image) = &project.image {
                div.project-image {
                    img src=(image) alt=(project.title) loading="lazy";
                }
            }
            div.project-body {
                h3 { (project.title) }
                p { (project.description) }
                @if !project.technologies.is_empty() {
                    div.tags {
                        @for tech in &project.technologies {
                            span.tag { (tech) }
                        }
                    }
                }
                @if let Some(url) = catalog.code_url(project) {
                    (external_link(url, "button outline small", html! { "View Code" }))
                }
            }
        }
    }
}

fn projects_section(catalog: &AssetCatalog, config: &SiteConfig) -> Markup {
    let copy = &catalog.sections.projects;
    let content = html! {
        (section_heading(&copy.title, &copy.tagline))
        div.project-grid {
            @for (idx, project) in catalog.projects.iter().enumerate() {
                (project_card(catalog, project, idx))
            }
        }
        @if let Some(github) = &catalog.links.github {
            div.center {
                (external_link(github, "button primary", html! { "View All Projects" }))
            }
        }
    };
    section_shell(SectionId::Projects, config, content)
}

fn skill_card(group: &SkillGroup, idx: usize) -> Markup {
    html! {
        div.card.skill style={ "--i:" (idx) } {
            div.skill-head {
                @if let Some(icon) = &group.icon {
                    img.icon src=(icon) alt="";
                }
                h3 { (letters(&group.category)) }
            }
            div.tags {
                @for item in &group.items {
                    span.tag { (item) }
                }
            }
        }
    }
}

fn skills_section(catalog: &AssetCatalog, config: &SiteConfig) -> Markup {
    let copy = &catalog.sections.skills;
    let content = html! {
        (section_heading(&copy.title, &copy.tagline))
        div.skill-grid {
            @for (idx, group) in catalog.skills.iter().enumerate() {
                (skill_card(group, idx))
            }
        }
        @if !catalog.levels.is_empty() {
            div.levels {
                h3 { "Proficiency Levels" }
                ul {
                    @for level in &catalog.levels {
                        li {
                            span class={ "level-dot level-" (level.class) } {}
                            (level.label)
                        }
                    }
                }
            }
        }
    };
    section_shell(SectionId::Skills, config, content)
}

/// Renders the contact form. Relay identifiers are public and read by the
/// page script.
fn contact_form(config: &SiteConfig) -> Markup {
    let relay = &config.relay;
    html! {
        form.card.contact-form
            data-relay-endpoint=(relay.endpoint)
            data-relay-service=(relay.service_id)
            data-relay-template=(relay.template_id)
            data-relay-key=(relay.public_key)
            data-relay-to=(relay.to_name) {
            h3 { "Send a Message" }
            label for="contact-name" { "Name" }
            input #contact-name type="text" name="name" autocomplete="name" required;
            label for="contact-email" { "Email" }
            input #contact-email type="email" name="email" autocomplete="email" required;
            label for="contact-message" { "Message" }
            textarea #contact-message name="message" rows="5" required {}
            button.button.primary type="submit" { "Send Message" }
            p.form-status role="status" aria-live="polite" {}
        }
    }
}

fn contact_section(catalog: &AssetCatalog, config: &SiteConfig) -> Markup {
    let copy = &catalog.sections.contact;
    let content = html! {
        (section_heading(&copy.title, &copy.tagline))
        div.contact-grid {
            div.contact-info {
                h3 { "Get in Touch" }
                p {
                    "I am always open to discussing new opportunities, innovative projects, "
                    "or just having a conversation about technology. Feel free to reach out!"
                }
                @for item in &catalog.contact {
                    div.contact-item {
                        @if let Some(icon) = &item.icon {
                            img.icon src=(icon) alt="";
                        }
                        div {
                            h4 { (item.title) }
                            p { (item.text) }
                        }
                    }
                }
                div.socials {
                    @if let Some(github) = &catalog.links.github {
                        (external_link(github, "social", html! { "GitHub" }))
                    }
                    @if let Some(linkedin) = &catalog.links.linkedin {
                        (external_link(linkedin, "social", html! { "LinkedIn" }))
                    }
                }
            }
            (contact_form(config))
        }
    };
    section_shell(SectionId::Contact, config, content)
}

fn site_footer(catalog: &AssetCatalog, config: &SiteConfig) -> Markup {
    let attrs = reveal_attrs(SectionId::Footer, config);
    let section = SectionId::Footer;
    html! {
        footer.site-footer.reveal
            id=(section.anchor())
            data-section=(section.as_str())
            data-reveal=(initial_presentation())
            data-margin=(attrs.margin) {
            div.container.footer-row {
                p.copyright {
                    @if let Some(copyright) = &catalog.footer.copyright {
                        (copyright)
                    } @else {
                        "© " (catalog.profile.name)
                    }
                }
                div.footer-links {
                    @if let Some(github) = &catalog.links.github {
                        (external_link(github, "", html! { "GitHub" }))
                    }
                    @if let Some(linkedin) = &catalog.links.linkedin {
                        (external_link(linkedin, "", html! { "LinkedIn" }))
                    }
                    @if let Some(email) = &catalog.profile.email {
                        a href={ "mailto:" (email) } { "Email" }
                    }
                }
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{assert_section_hidden, section_tag, setup_fixtures};
    use tempfile::TempDir;

    fn fixture() -> (AssetCatalog, SiteConfig) {
        let tmp = setup_fixtures();
        (
            AssetCatalog::load(tmp.path()).unwrap(),
            config::load_config(tmp.path()).unwrap(),
        )
    }

    fn page() -> String {
        let (catalog, config) = fixture();
        render_page(&catalog, &config).into_string()
    }

    #[test]
    fn page_includes_doctype_and_title() {
        let html = page();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Ada Lovelace | Portfolio</title>"));
    }

    #[test]
    fn every_section_starts_hidden() {
        let html = page();
        for section in SectionId::ALL {
            assert_section_hidden(&html, section);
        }
    }

    #[test]
    fn sections_use_nav_anchors() {
        let html = page();
        assert!(section_tag(&html, SectionId::Hero).contains(r#"id="home""#));
        assert!(section_tag(&html, SectionId::Skills).contains(r#"id="skills""#));
        assert!(html.contains(r##"href="#projects""##));
        assert!(html.contains(r##"href="#contact""##));
    }

    #[test]
    fn margins_come_from_config() {
        let html = page();
        assert!(section_tag(&html, SectionId::About).contains(r#"data-margin="-100""#));
        assert!(section_tag(&html, SectionId::Contact).contains(r#"data-margin="-200""#));
    }

    #[test]
    fn only_hero_carries_reveal_delay() {
        let html = page();
        assert!(section_tag(&html, SectionId::Hero).contains(r#"data-reveal-delay="1200""#));
        for section in [SectionId::About, SectionId::Footer] {
            assert!(!section_tag(&html, section).contains("data-reveal-delay"));
        }
    }

    #[test]
    fn about_markdown_is_rendered() {
        let html = page();
        assert!(html.contains("<strong>Analytical Engine</strong>"));
        assert!(html.contains("<em>poetical science</em>"));
        assert!(html.contains("Download Resume"));
    }

    #[test]
    fn projects_render_cards_and_code_links() {
        let html = page();
        assert_eq!(html.matches("card project").count(), 3);
        assert!(html.contains("https://github.com/ada-lovelace/bernoulli"));
        assert!(html.contains("View All Projects"));
    }

    #[test]
    fn external_links_open_in_new_context() {
        let html = page();
        let resume = html
            .find("https://example.com/ada/resume.pdf")
            .expect("resume link rendered");
        let tag_end = resume + html[resume..].find('>').unwrap();
        assert!(html[resume..tag_end].contains(r#"target="_blank""#));
        assert!(html[resume..tag_end].contains("noopener"));
    }

    #[test]
    fn contact_form_carries_relay_identifiers() {
        let html = page();
        assert!(html.contains(r#"data-relay-service="service_test""#));
        assert!(html.contains(r#"data-relay-template="template_test""#));
        assert!(html.contains(r#"data-relay-key="pk_test""#));
        assert!(html.contains(r#"data-relay-to="Ada Lovelace""#));
        assert!(html.contains(r#"name="message""#));
    }

    #[test]
    fn contact_form_fields_are_labelled() {
        let html = page();
        for id in ["contact-name", "contact-email", "contact-message"] {
            assert!(html.contains(&format!(r#"label for="{id}""#)), "{id}");
            assert!(html.contains(&format!(r#"id="{id}""#)), "{id}");
        }
        let form = &html[html.find(r#"class="card contact-form""#).unwrap()..];
        assert!(form.contains(r#"name="email""#));
        assert!(form.contains("</textarea>"));
    }

    #[test]
    fn hero_highlights_are_joined() {
        let html = page();
        assert!(html.contains(r#"<span class="highlight">algorithms</span>, and <span class="highlight">poetical science</span>"#));
    }

    #[test]
    fn skills_legend_rendered() {
        let html = page();
        assert!(html.contains("Proficiency Levels"));
        assert!(html.contains("level-dot level-expert"));
    }

    #[test]
    fn catalog_text_is_escaped() {
        let (mut catalog, config) = fixture();
        catalog.projects[0].title = "<script>alert('xss')</script>".into();
        let html = render_page(&catalog, &config).into_string();
        assert!(!html.contains("<script>alert"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn generate_writes_page_and_copies_assets() {
        let tmp = setup_fixtures();
        let out = TempDir::new().unwrap();
        let summary = generate(tmp.path(), out.path()).unwrap();

        assert!(out.path().join("index.html").exists());
        assert!(out.path().join("images/ada.svg").exists());
        assert_eq!(summary.assets_copied, 1);
        assert_eq!(summary.projects, 3);
        assert!(summary.relay_configured);
    }

    #[test]
    fn generate_without_assets_dir() {
        let tmp = setup_fixtures();
        fs::remove_dir_all(tmp.path().join("assets")).unwrap();
        let out = TempDir::new().unwrap();
        let summary = generate(tmp.path(), out.path()).unwrap();
        assert_eq!(summary.assets_copied, 0);
    }

    #[test]
    fn generate_fails_without_catalog() {
        let tmp = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        assert!(matches!(
            generate(tmp.path(), out.path()),
            Err(GenerateError::Catalog(_))
        ));
    }
}

//! Shared types used across the observer, coordinator, and renderer.
//!
//! Sections are a fixed, ordered set. Everything that is keyed per section
//! (margins, reveal states, rendered anchors) uses [`SectionId`] so that a
//! misspelled section name is rejected once, at the config or script
//! boundary, instead of silently never revealing.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the page's sections, in page order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionId {
    Hero,
    About,
    Projects,
    Skills,
    Contact,
    Footer,
}

impl SectionId {
    /// All sections in page order.
    pub const ALL: [SectionId; 6] = [
        SectionId::Hero,
        SectionId::About,
        SectionId::Projects,
        SectionId::Skills,
        SectionId::Contact,
        SectionId::Footer,
    ];

    /// Name used in config files, scroll scripts and `data-section` attributes.
    pub fn as_str(self) -> &'static str {
        match self {
            SectionId::Hero => "hero",
            SectionId::About => "about",
            SectionId::Projects => "projects",
            SectionId::Skills => "skills",
            SectionId::Contact => "contact",
            SectionId::Footer => "footer",
        }
    }

    /// In-page anchor (`id` attribute). The hero is reached through `#home`.
    pub fn anchor(self) -> &'static str {
        match self {
            SectionId::Hero => "home",
            other => other.as_str(),
        }
    }

    /// Whether the section is revealed by the entrance timer rather than by
    /// scrolling into view.
    pub fn is_timer_driven(self) -> bool {
        self == SectionId::Hero
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string does not name a section.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("unknown section '{0}' (expected one of: hero, about, projects, skills, contact, footer)")]
pub struct UnknownSection(pub String);

impl FromStr for SectionId {
    type Err = UnknownSection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SectionId::ALL
            .into_iter()
            .find(|id| id.as_str() == s || id.anchor() == s)
            .ok_or_else(|| UnknownSection(s.to_string()))
    }
}

/// Navigation entry rendered in the fixed header.
#[derive(Debug, Clone, PartialEq)]
pub struct NavItem {
    pub label: &'static str,
    pub section: SectionId,
}

/// Header navigation, in the order the buttons appear.
pub fn nav_items() -> Vec<NavItem> {
    [
        ("Home", SectionId::Hero),
        ("About", SectionId::About),
        ("Projects", SectionId::Projects),
        ("Skills", SectionId::Skills),
        ("Contact", SectionId::Contact),
    ]
    .into_iter()
    .map(|(label, section)| NavItem { label, section })
    .collect()
}

//! CLI output formatting for every command.
//!
//! # Information-First Display
//!
//! Output reads as a content inventory. Every entity (section, project,
//! skill group) leads with its positional index and title; file paths and
//! config details are secondary context on indented lines.
//!
//! # Output Format
//!
//! ## Check
//!
//! ```text
//! Sections
//! 001 Home → #home (delay 1200ms)
//! 002 About Me → #about (margin -100px)
//!     3 facts, about.md
//! 003 Featured Projects → #projects (margin -100px)
//!     001 Analytical Engine
//!         Code: https://github.com/...
//!
//! Relay
//!     service_test / template_test
//!
//! Config
//!     config.toml
//!     assets/
//! ```
//!
//! ## Simulate
//!
//! ```text
//!   400ms  about     visibility  (frame 1)
//!  1200ms  hero      timer       (frame 2)
//!
//! Not revealed: footer
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::catalog::AssetCatalog;
use crate::config::SiteConfig;
use crate::contact::SubmissionStatus;
use crate::generate::GenerateSummary;
use crate::reveal::{RevealState, Trigger};
use crate::simulate::Timeline;
use crate::types::SectionId;
use std::path::Path;

// ============================================================================
// Shared entity display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Format an entity header: positional index + title, with optional detail.
///
/// ```text
/// 002 About Me → #about (margin -100px)
/// 001 Analytical Engine
/// ```
fn entity_header(index: usize, title: &str, detail: Option<&str>) -> String {
    match detail {
        Some(d) => format!("{} {} {}", format_index(index), title, d),
        None => format!("{} {}", format_index(index), title),
    }
}

/// Pluralize a count: `1 fact`, `3 facts`.
fn count(n: usize, noun: &str) -> String {
    if n == 1 {
        format!("{} {}", n, noun)
    } else {
        format!("{} {}s", n, noun)
    }
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate_desc(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max).collect();
        format!("{}...", cut)
    }
}

fn section_title<'a>(catalog: &'a AssetCatalog, section: SectionId) -> &'a str {
    match section {
        SectionId::Hero => "Home",
        SectionId::About => &catalog.sections.about.title,
        SectionId::Projects => &catalog.sections.projects.title,
        SectionId::Skills => &catalog.sections.skills.title,
        SectionId::Contact => &catalog.sections.contact.title,
        SectionId::Footer => "Footer",
    }
}

/// How a section gets revealed: the hero by delay, the rest by margin.
fn reveal_detail(section: SectionId, config: &SiteConfig) -> String {
    if section.is_timer_driven() {
        format!(
            "→ #{} (delay {}ms)",
            section.anchor(),
            config.reveal.hero_delay_ms
        )
    } else {
        format!(
            "→ #{} (margin {}px)",
            section.anchor(),
            config.reveal.margin_for(section)
        )
    }
}

// ============================================================================
// Check: catalog inventory
// ============================================================================

/// Format the content inventory shown by `check`.
pub fn format_catalog_inventory(
    catalog: &AssetCatalog,
    config: &SiteConfig,
    source_root: &Path,
) -> Vec<String> {
    let mut lines = vec!["Sections".to_string()];

    for (i, section) in SectionId::ALL.iter().copied().enumerate() {
        let detail = reveal_detail(section, config);
        lines.push(entity_header(
            i + 1,
            section_title(catalog, section),
            Some(&detail),
        ));
        let body = indent(1);
        match section {
            SectionId::Hero => {
                let role = truncate_desc(&catalog.profile.role, 60);
                if role.is_empty() {
                    lines.push(format!("{}{}", body, catalog.profile.name));
                } else {
                    lines.push(format!("{}{}, {}", body, catalog.profile.name, role));
                }
            }
            SectionId::About => {
                let mut context = count(catalog.facts.len(), "fact");
                if !catalog.about.trim().is_empty() {
                    context.push_str(", about.md");
                }
                lines.push(format!("{}{}", body, context));
            }
            SectionId::Projects => {
                for (j, project) in catalog.projects.iter().enumerate() {
                    lines.push(format!("{}{}", body, entity_header(j + 1, &project.title, None)));
                    if let Some(url) = catalog.code_url(project) {
                        lines.push(format!("{}    Code: {}", body, url));
                    }
                }
            }
            SectionId::Skills => {
                for (j, group) in catalog.skills.iter().enumerate() {
                    let detail = format!("({})", count(group.items.len(), "item"));
                    lines.push(format!(
                        "{}{}",
                        body,
                        entity_header(j + 1, &group.category, Some(&detail))
                    ));
                }
            }
            SectionId::Contact => {
                lines.push(format!("{}{}", body, count(catalog.contact.len(), "contact item")));
            }
            SectionId::Footer => {
                if let Some(ref copyright) = catalog.footer.copyright {
                    lines.push(format!("{}{}", body, copyright));
                }
            }
        }
    }

    lines.push(String::new());
    lines.push("Relay".to_string());
    if config.relay.is_configured() {
        lines.push(format!(
            "    {} / {}",
            config.relay.service_id, config.relay.template_id
        ));
    } else {
        lines.push("    not configured (contact form will report failure)".to_string());
    }

    lines.push(String::new());
    lines.push("Config".to_string());
    if source_root.join("config.toml").exists() {
        lines.push("    config.toml".to_string());
    } else {
        lines.push("    (stock defaults)".to_string());
    }
    if source_root.join("assets").is_dir() {
        lines.push("    assets/".to_string());
    }

    lines
}

/// Print the `check` inventory to stdout.
pub fn print_catalog_inventory(catalog: &AssetCatalog, config: &SiteConfig, source_root: &Path) {
    for line in format_catalog_inventory(catalog, config, source_root) {
        println!("{}", line);
    }
}

// ============================================================================
// Build
// ============================================================================

/// Format the result of `build`.
pub fn format_generate_summary(summary: &GenerateSummary, output_dir: &Path) -> Vec<String> {
    let mut lines = vec![format!("Home → {}", output_dir.join("index.html").display())];
    for (i, section) in summary.sections.iter().enumerate() {
        lines.push(format!(
            "    {} {} → #{}",
            format_index(i + 1),
            section,
            section.anchor()
        ));
    }
    lines.push(String::new());
    lines.push(format!(
        "Generated {} sections, {}, {}, copied {}",
        summary.sections.len(),
        count(summary.projects, "project"),
        count(summary.skill_groups, "skill group"),
        count(summary.assets_copied, "asset"),
    ));
    if !summary.relay_configured {
        lines.push("Warning: relay not configured; contact form submissions will fail".to_string());
    }
    lines
}

pub fn print_generate_summary(summary: &GenerateSummary, output_dir: &Path) {
    for line in format_generate_summary(summary, output_dir) {
        println!("{}", line);
    }
}

// ============================================================================
// Simulate
// ============================================================================

fn trigger_label(trigger: Trigger) -> &'static str {
    match trigger {
        Trigger::Visibility => "visibility",
        Trigger::Timer => "timer",
    }
}

/// Format a replayed reveal timeline, one reveal per line.
pub fn format_timeline(timeline: &Timeline) -> Vec<String> {
    let mut lines: Vec<String> = timeline
        .reveals
        .iter()
        .map(|entry| {
            format!(
                "{:>6}ms  {:<8}  {:<10}  (frame {})",
                entry.signal.at.as_millis(),
                entry.signal.section.as_str(),
                trigger_label(entry.signal.trigger),
                entry.frame
            )
        })
        .collect();

    if lines.is_empty() {
        lines.push("No sections revealed".to_string());
    }

    let pending: Vec<&str> = timeline
        .final_states
        .iter()
        .filter(|(_, state)| *state == RevealState::NotRevealed)
        .map(|(section, _)| section.as_str())
        .collect();
    lines.push(String::new());
    if pending.is_empty() {
        lines.push("All sections revealed".to_string());
    } else {
        lines.push(format!("Not revealed: {}", pending.join(", ")));
    }
    if let Some(frame) = timeline.torn_down_after {
        lines.push(format!("Torn down after frame {}", frame));
    }
    lines
}

pub fn print_timeline(timeline: &Timeline) {
    for line in format_timeline(timeline) {
        println!("{}", line);
    }
}

// ============================================================================
// Send
// ============================================================================

/// Format the outcome of `send`: the visitor notice plus failure detail.
pub fn format_submission(status: SubmissionStatus, detail: Option<&str>) -> Vec<String> {
    let mut lines = Vec::new();
    match status.notice() {
        Some(notice) => lines.push(notice.to_string()),
        None => lines.push(format!("Status: {:?}", status)),
    }
    if status == SubmissionStatus::Failed
        && let Some(detail) = detail
    {
        lines.push(format!("    Cause: {}", detail));
    }
    lines
}

pub fn print_submission(status: SubmissionStatus, detail: Option<&str>) {
    for line in format_submission(status, detail) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::AssetCatalog;
    use crate::contact::{FAILURE_NOTICE, SUCCESS_NOTICE};
    use crate::reveal::RevealSignal;
    use crate::simulate::TimelineEntry;
    use crate::test_helpers::setup_fixtures;
    use std::time::Duration;

    // =========================================================================
    // Helpers
    // =========================================================================

    #[test]
    fn format_index_single_digit() {
        assert_eq!(format_index(1), "001");
    }

    #[test]
    fn format_index_triple_digit() {
        assert_eq!(format_index(123), "123");
    }

    #[test]
    fn indent_levels() {
        assert_eq!(indent(0), "");
        assert_eq!(indent(2), "        ");
    }

    #[test]
    fn entity_header_with_detail() {
        assert_eq!(
            entity_header(2, "About Me", Some("→ #about")),
            "002 About Me → #about"
        );
    }

    #[test]
    fn entity_header_without_detail() {
        assert_eq!(entity_header(1, "Engine", None), "001 Engine");
    }

    #[test]
    fn count_pluralizes() {
        assert_eq!(count(1, "fact"), "1 fact");
        assert_eq!(count(0, "fact"), "0 facts");
        assert_eq!(count(3, "skill group"), "3 skill groups");
    }

    #[test]
    fn truncate_desc_long() {
        assert_eq!(truncate_desc("abcdefghij", 4), "abcd...");
        assert_eq!(truncate_desc("abc", 4), "abc");
    }

    #[test]
    fn truncate_desc_multibyte() {
        assert_eq!(truncate_desc("ééééé", 2), "éé...");
    }

    // =========================================================================
    // Check
    // =========================================================================

    fn fixture_inventory() -> Vec<String> {
        let tmp = setup_fixtures();
        let catalog = AssetCatalog::load(tmp.path()).unwrap();
        let config = crate::config::load_config(tmp.path()).unwrap();
        format_catalog_inventory(&catalog, &config, tmp.path())
    }

    #[test]
    fn inventory_lists_sections_in_page_order() {
        let lines = fixture_inventory();
        assert_eq!(lines[0], "Sections");
        assert!(lines[1].starts_with("001 Home → #home (delay 1200ms)"));
        let about = lines.iter().position(|l| l.starts_with("002 ")).unwrap();
        let footer = lines.iter().position(|l| l.starts_with("006 Footer")).unwrap();
        assert!(about < footer);
    }

    #[test]
    fn inventory_shows_margin_overrides() {
        let lines = fixture_inventory();
        assert!(lines.iter().any(|l| l.contains("→ #contact (margin -200px)")));
        assert!(lines.iter().any(|l| l.contains("→ #about (margin -100px)")));
    }

    #[test]
    fn inventory_shows_project_code_links() {
        let lines = fixture_inventory();
        assert!(
            lines
                .iter()
                .any(|l| l.trim() == "Code: https://github.com/ada-lovelace/bernoulli")
        );
    }

    #[test]
    fn inventory_shows_relay_and_config() {
        let lines = fixture_inventory();
        assert!(lines.contains(&"    service_test / template_test".to_string()));
        assert!(lines.contains(&"    config.toml".to_string()));
        assert!(lines.contains(&"    assets/".to_string()));
    }

    #[test]
    fn inventory_without_config_uses_stock_defaults() {
        let tmp = tempfile::TempDir::new().unwrap();
        let catalog: AssetCatalog =
            toml::from_str(crate::test_helpers::minimal_catalog_toml()).unwrap();
        let lines = format_catalog_inventory(&catalog, &SiteConfig::default(), tmp.path());
        assert!(lines.contains(&"    (stock defaults)".to_string()));
        assert!(lines.iter().any(|l| l.contains("not configured")));
        assert!(!lines.contains(&"    assets/".to_string()));
    }

    // =========================================================================
    // Build
    // =========================================================================

    #[test]
    fn generate_summary_counts() {
        let summary = GenerateSummary {
            sections: SectionId::ALL.to_vec(),
            projects: 3,
            skill_groups: 1,
            assets_copied: 0,
            relay_configured: true,
        };
        let lines = format_generate_summary(&summary, Path::new("dist"));
        assert_eq!(lines[0], "Home → dist/index.html");
        assert_eq!(lines[1], "    001 hero → #home");
        assert_eq!(
            lines.last().unwrap(),
            "Generated 6 sections, 3 projects, 1 skill group, copied 0 assets"
        );
    }

    #[test]
    fn generate_summary_warns_without_relay() {
        let summary = GenerateSummary {
            sections: vec![SectionId::Hero],
            ..Default::default()
        };
        let lines = format_generate_summary(&summary, Path::new("dist"));
        assert!(lines.last().unwrap().starts_with("Warning: relay not configured"));
    }

    // =========================================================================
    // Simulate
    // =========================================================================

    fn entry(frame: usize, section: SectionId, trigger: Trigger, ms: u64) -> TimelineEntry {
        TimelineEntry {
            frame,
            signal: RevealSignal {
                section,
                trigger,
                at: Duration::from_millis(ms),
            },
        }
    }

    #[test]
    fn timeline_lines() {
        let timeline = Timeline {
            reveals: vec![
                entry(1, SectionId::About, Trigger::Visibility, 400),
                entry(2, SectionId::Hero, Trigger::Timer, 1200),
            ],
            final_states: vec![
                (SectionId::Hero, RevealState::Revealed),
                (SectionId::About, RevealState::Revealed),
                (SectionId::Footer, RevealState::NotRevealed),
            ],
            torn_down_after: None,
        };
        let lines = format_timeline(&timeline);
        assert_eq!(lines[0], "   400ms  about     visibility  (frame 1)");
        assert_eq!(lines[1], "  1200ms  hero      timer       (frame 2)");
        assert_eq!(lines.last().unwrap(), "Not revealed: footer");
    }

    #[test]
    fn timeline_empty_and_torn_down() {
        let timeline = Timeline {
            reveals: vec![],
            final_states: vec![(SectionId::Hero, RevealState::NotRevealed)],
            torn_down_after: Some(0),
        };
        let lines = format_timeline(&timeline);
        assert_eq!(lines[0], "No sections revealed");
        assert!(lines.contains(&"Not revealed: hero".to_string()));
        assert_eq!(lines.last().unwrap(), "Torn down after frame 0");
    }

    // =========================================================================
    // Send
    // =========================================================================

    #[test]
    fn submission_success_notice() {
        let lines = format_submission(SubmissionStatus::Succeeded, Some("ignored"));
        assert_eq!(lines, vec![SUCCESS_NOTICE.to_string()]);
    }

    #[test]
    fn submission_failure_includes_cause() {
        let lines = format_submission(SubmissionStatus::Failed, Some("request timed out"));
        assert_eq!(lines[0], FAILURE_NOTICE);
        assert_eq!(lines[1], "    Cause: request timed out");
    }
}

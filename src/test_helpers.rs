//! Shared test utilities for the folio test suite.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_fixtures();
//! let catalog = AssetCatalog::load(tmp.path()).unwrap();
//! let html = render_page(&catalog, &SiteConfig::default()).into_string();
//! assert_section_hidden(&html, SectionId::About);
//! ```

use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::types::SectionId;

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/content/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/content");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

/// Path of a scroll script under `fixtures/scripts/`.
pub fn fixture_script(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures/scripts")
        .join(name)
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

/// The smallest valid `portfolio.toml`.
pub fn minimal_catalog_toml() -> &'static str {
    "[profile]\nname = \"Ada Lovelace\"\n"
}

// =========================================================================
// Rendered page assertions
// =========================================================================

/// Opening tag of a section's wrapper element. Panics if not rendered.
pub fn section_tag<'a>(html: &'a str, section: SectionId) -> &'a str {
    let marker = format!(r#"data-section="{}""#, section.as_str());
    let at = html
        .find(&marker)
        .unwrap_or_else(|| panic!("section '{section}' not rendered"));
    let start = html[..at].rfind('<').unwrap();
    let end = at + html[at..].find('>').unwrap();
    &html[start..=end]
}

/// Assert a section starts in the hidden presentation.
pub fn assert_section_hidden(html: &str, section: SectionId) {
    let tag = section_tag(html, section);
    assert!(
        tag.contains(r#"data-reveal="hidden""#),
        "section '{section}' is not hidden: {tag}"
    );
}

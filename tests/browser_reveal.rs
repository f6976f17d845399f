//! Browser reveal tests: sections enter once, on scroll or on the hero delay.
//!
//! Run with: `cargo test --test browser_reveal -- --ignored`

use headless_chrome::{Browser, LaunchOptions, Tab};
use std::path::PathBuf;
use std::process::Command;
use std::sync::{Arc, OnceLock};
use std::thread::sleep;
use std::time::Duration;

// ---------------------------------------------------------------------------
// Setup helpers
// ---------------------------------------------------------------------------

fn generated_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/browser/generated")
}

fn ensure_fixtures_built() {
    static BUILT: OnceLock<()> = OnceLock::new();
    BUILT.get_or_init(|| {
        let bin = env!("CARGO_BIN_EXE_folio");
        let root = PathBuf::from(env!("CARGO_MANIFEST_DIR"));

        let output_dir = generated_dir();
        if output_dir.exists() {
            std::fs::remove_dir_all(&output_dir).expect("failed to clean output dir");
        }

        let status = Command::new(bin)
            .args([
                "build",
                "--source",
                root.join("fixtures/content").to_str().unwrap(),
                "--output",
                output_dir.to_str().unwrap(),
            ])
            .status()
            .expect("failed to run folio");
        assert!(status.success(), "fixture generation failed");
    });
}

fn browser() -> &'static Browser {
    static B: OnceLock<Browser> = OnceLock::new();
    B.get_or_init(|| {
        Browser::new(LaunchOptions {
            window_size: Some((1280, 800)),
            ..Default::default()
        })
        .expect("failed to launch Chrome")
    })
}

fn load_index() -> Arc<Tab> {
    ensure_fixtures_built();
    let tab = browser().new_tab().unwrap();
    let file = generated_dir().join("index.html");
    assert!(file.exists(), "missing: {}", file.display());

    tab.navigate_to(&format!("file://{}", file.display()))
        .unwrap()
        .wait_until_navigated()
        .unwrap();
    tab
}

fn eval_string(tab: &Tab, js: &str) -> String {
    tab.evaluate(js, false)
        .expect("failed to evaluate JS")
        .value
        .expect("no value returned")
        .as_str()
        .expect("value is not a string")
        .to_string()
}

fn reveal_state(tab: &Tab, section: &str) -> String {
    eval_string(
        tab,
        &format!(r#"document.querySelector('[data-section="{section}"]').getAttribute('data-reveal')"#),
    )
}

fn scroll_to(tab: &Tab, anchor: &str) {
    tab.evaluate(
        &format!(r#"document.getElementById('{anchor}').scrollIntoView({{block: 'start'}})"#),
        false,
    )
    .expect("failed to scroll");
    // Let the observer callbacks run.
    sleep(Duration::from_millis(300));
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
#[ignore]
fn hero_enters_after_delay() {
    let tab = load_index();
    assert_eq!(reveal_state(&tab, "hero"), "hidden");
    sleep(Duration::from_millis(1600));
    assert_eq!(reveal_state(&tab, "hero"), "visible");
}

#[test]
#[ignore]
fn offscreen_sections_stay_hidden_until_scrolled() {
    let tab = load_index();
    sleep(Duration::from_millis(300));
    assert_eq!(reveal_state(&tab, "contact"), "hidden");

    scroll_to(&tab, "contact");
    assert_eq!(reveal_state(&tab, "contact"), "visible");
}

#[test]
#[ignore]
fn scrolling_back_keeps_sections_revealed() {
    let tab = load_index();
    scroll_to(&tab, "projects");
    assert_eq!(reveal_state(&tab, "projects"), "visible");

    scroll_to(&tab, "home");
    assert_eq!(reveal_state(&tab, "projects"), "visible");
}

#[test]
#[ignore]
fn nav_links_target_section_anchors() {
    let tab = load_index();
    let hrefs = eval_string(
        &tab,
        r#"Array.from(document.querySelectorAll('nav a')).map(a => a.getAttribute('href')).join(' ')"#,
    );
    assert_eq!(hrefs, "#home #about #projects #skills #contact");
}

#[test]
#[ignore]
fn whitespace_only_message_is_refused() {
    let tab = load_index();
    let status = eval_string(
        &tab,
        r#"(function() {
            const form = document.querySelector('form.contact-form');
            form.elements.name.value = 'Grace';
            form.elements.email.value = 'grace@example.com';
            form.elements.message.value = '   ';
            form.dispatchEvent(new Event('submit', {cancelable: true}));
            return form.querySelector('.form-status').textContent;
        })()"#,
    );
    assert_eq!(status, "Please fill in your name, email address and message.");
}

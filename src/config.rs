//! Site configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. The file lives in
//! the content root next to `portfolio.toml`; every key is optional and
//! overrides the stock default of the same name.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [reveal]
//! margin_px = -100          # Viewport margin for "in view" (negative = later)
//! hero_delay_ms = 1200      # Hero entrance delay after page load
//!
//! [reveal.margins]
//! contact = -200            # Per-section override of margin_px
//!
//! [relay]
//! endpoint = "https://api.emailjs.com/api/v1.0/email/send"
//! service_id = ""
//! template_id = ""
//! public_key = ""
//! to_name = ""              # Recipient name passed to the email template
//! timeout_secs = 10
//!
//! [colors.dark]
//! bg_primary = "#0b1120"
//! # ...
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse — override just the values you want:
//!
//! ```toml
//! [reveal]
//! hero_delay_ms = 800
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::types::SectionId;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
///
/// All fields have sensible defaults. User config files need only specify
/// the values they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Scroll-reveal timing and margins.
    pub reveal: RevealConfig,
    /// Contact form email relay.
    pub relay: RelayConfig,
    /// Color schemes for light and dark modes.
    pub colors: ColorConfig,
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.reveal.hero_delay_ms == 0 {
            return Err(ConfigError::Validation(
                "reveal.hero_delay_ms must be greater than 0".into(),
            ));
        }
        let mut overridden = BTreeSet::new();
        for name in self.reveal.margins.keys() {
            let section = name
                .parse::<SectionId>()
                .map_err(|e| ConfigError::Validation(format!("reveal.margins: {e}")))?;
            if section.is_timer_driven() {
                return Err(ConfigError::Validation(format!(
                    "reveal.margins: '{name}' is revealed by hero_delay_ms, not by scrolling"
                )));
            }
            if !overridden.insert(section) {
                return Err(ConfigError::Validation(format!(
                    "reveal.margins: '{section}' margin is set more than once"
                )));
            }
        }
        if self.relay.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "relay.timeout_secs must be greater than 0".into(),
            ));
        }
        if !(self.relay.endpoint.starts_with("https://")
            || self.relay.endpoint.starts_with("http://"))
        {
            return Err(ConfigError::Validation(
                "relay.endpoint must be an http(s) URL".into(),
            ));
        }
        Ok(())
    }
}

/// Scroll-reveal settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RevealConfig {
    /// Margin applied to the viewport on every side when testing whether a
    /// section is in view. Negative values require the section to be that
    /// far inside the viewport.
    pub margin_px: i32,
    /// Delay between page load and the hero entrance, in milliseconds.
    pub hero_delay_ms: u64,
    /// Per-section overrides of `margin_px`, keyed by section name.
    pub margins: BTreeMap<String, i32>,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            margin_px: -100,
            hero_delay_ms: 1200,
            margins: BTreeMap::new(),
        }
    }
}

impl RevealConfig {
    /// Effective margin for a section.
    ///
    /// Keys are validated by [`SiteConfig::validate`]; an unparseable key is
    /// simply never matched.
    pub fn margin_for(&self, section: SectionId) -> i32 {
        self.margins
            .iter()
            .find(|(name, _)| name.parse::<SectionId>().ok() == Some(section))
            .map(|(_, &margin)| margin)
            .unwrap_or(self.margin_px)
    }

    pub fn hero_delay(&self) -> Duration {
        Duration::from_millis(self.hero_delay_ms)
    }
}

/// Email relay (EmailJS) settings.
///
/// The identifiers are public by design of the relay: they are embedded in
/// the generated page so the browser can submit the contact form directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RelayConfig {
    /// Send endpoint of the relay's REST API.
    pub endpoint: String,
    /// Relay service identifier.
    pub service_id: String,
    /// Relay template identifier.
    pub template_id: String,
    /// Relay public key (sent as `user_id`).
    pub public_key: String,
    /// Recipient name passed to the template as `to_name`.
    pub to_name: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.emailjs.com/api/v1.0/email/send".to_string(),
            service_id: String::new(),
            template_id: String::new(),
            public_key: String::new(),
            to_name: String::new(),
            timeout_secs: 10,
        }
    }
}

impl RelayConfig {
    /// Whether enough is configured to actually send messages.
    pub fn is_configured(&self) -> bool {
        !self.service_id.is_empty() && !self.template_id.is_empty() && !self.public_key.is_empty()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Color configuration for light and dark modes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorConfig {
    /// Light mode color scheme.
    pub light: ColorScheme,
    /// Dark mode color scheme.
    pub dark: ColorScheme,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            light: ColorScheme::default_light(),
            dark: ColorScheme::default_dark(),
        }
    }
}

/// Individual color scheme (light or dark).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorScheme {
    /// Page background.
    pub bg_primary: String,
    /// Alternate section background.
    pub bg_secondary: String,
    /// Card background.
    pub bg_card: String,
    /// Accent fills (badges, tags).
    pub bg_accent: String,
    /// Primary buttons and highlights.
    pub bg_highlight: String,
    /// Headings and body text.
    pub text_primary: String,
    /// Secondary text.
    pub text_secondary: String,
    /// Nav, captions, taglines.
    pub text_muted: String,
    /// Links and emphasized words.
    pub text_accent: String,
}

impl ColorScheme {
    pub fn default_light() -> Self {
        Self {
            bg_primary: "#ffffff".to_string(),
            bg_secondary: "#f4f6fb".to_string(),
            bg_card: "#ffffff".to_string(),
            bg_accent: "#e0f2fe".to_string(),
            bg_highlight: "#3b82f6".to_string(),
            text_primary: "#0f172a".to_string(),
            text_secondary: "#334155".to_string(),
            text_muted: "#64748b".to_string(),
            text_accent: "#0891b2".to_string(),
        }
    }

    pub fn default_dark() -> Self {
        Self {
            bg_primary: "#0b1120".to_string(),
            bg_secondary: "#0f172a".to_string(),
            bg_card: "#1e293b".to_string(),
            bg_accent: "#164e63".to_string(),
            bg_highlight: "#3b82f6".to_string(),
            text_primary: "#f8fafc".to_string(),
            text_secondary: "#cbd5e1".to_string(),
            text_muted: "#94a3b8".to_string(),
            text_accent: "#22d3ee".to_string(),
        }
    }
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self::default_dark()
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SiteConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if no `config.toml` exists in the directory.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = path.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the given directory.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(root)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Folio Configuration
# ===================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Scroll reveal
# ---------------------------------------------------------------------------
[reveal]
# Margin (px) applied to every side of the viewport when deciding whether a
# section is in view. Negative values reveal a section only once it is that
# far inside the viewport; positive values reveal it early.
margin_px = -100

# Delay (ms) between page load and the hero entrance.
hero_delay_ms = 1200

# Per-section margin overrides. Sections: about, projects, skills, contact, footer.
[reveal.margins]
# contact = -200

# ---------------------------------------------------------------------------
# Contact form relay (EmailJS)
# ---------------------------------------------------------------------------
[relay]
endpoint = "https://api.emailjs.com/api/v1.0/email/send"
service_id = ""
template_id = ""
public_key = ""

# Recipient name passed to the email template as `to_name`.
to_name = ""

# Request timeout in seconds. A timeout counts as a failed submission.
timeout_secs = 10

# ---------------------------------------------------------------------------
# Colors - Light mode (prefers-color-scheme: light)
# ---------------------------------------------------------------------------
[colors.light]
bg_primary = "#ffffff"
bg_secondary = "#f4f6fb"
bg_card = "#ffffff"
bg_accent = "#e0f2fe"
bg_highlight = "#3b82f6"
text_primary = "#0f172a"
text_secondary = "#334155"
text_muted = "#64748b"
text_accent = "#0891b2"

# ---------------------------------------------------------------------------
# Colors - Dark mode (prefers-color-scheme: dark)
# ---------------------------------------------------------------------------
[colors.dark]
bg_primary = "#0b1120"
bg_secondary = "#0f172a"
bg_card = "#1e293b"
bg_accent = "#164e63"
bg_highlight = "#3b82f6"
text_primary = "#f8fafc"
text_secondary = "#cbd5e1"
text_muted = "#94a3b8"
text_accent = "#22d3ee"
"##
}

fn scheme_vars(scheme: &ColorScheme, indent: &str) -> String {
    [
        ("--bg-primary", &scheme.bg_primary),
        ("--bg-secondary", &scheme.bg_secondary),
        ("--bg-card", &scheme.bg_card),
        ("--bg-accent", &scheme.bg_accent),
        ("--bg-highlight", &scheme.bg_highlight),
        ("--text-primary", &scheme.text_primary),
        ("--text-secondary", &scheme.text_secondary),
        ("--text-muted", &scheme.text_muted),
        ("--text-accent", &scheme.text_accent),
    ]
    .iter()
    .map(|(name, value)| format!("{indent}{name}: {value};"))
    .collect::<Vec<_>>()
    .join("\n")
}

/// Generate CSS custom properties from color config.
pub fn generate_color_css(colors: &ColorConfig) -> String {
    format!(
        ":root {{\n{light}\n}}\n\n@media (prefers-color-scheme: dark) {{\n    :root {{\n{dark}\n    }}\n}}",
        light = scheme_vars(&colors.light, "    "),
        dark = scheme_vars(&colors.dark, "        "),
    )
}

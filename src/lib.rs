//! # Folio
//!
//! A static site generator for animated single-page developer portfolios.
//! One content directory becomes one self-contained `index.html`: a fixed
//! header, a hero that enters on a short delay, and content sections that
//! fade in the first time they scroll into view.
//!
//! # Architecture
//!
//! The page's behavior is modeled in Rust first and rendered second:
//!
//! ```text
//! observer   viewport + section bounds  →  visibility transitions
//! reveal     transitions + clock        →  one-shot reveal signals
//! contact    form fields + relay        →  submission status
//! generate   catalog + config           →  dist/index.html
//! ```
//!
//! The generated page ships a small script (`static/site.js`) that follows
//! the same contract the [`reveal`] and [`observer`] modules implement: every
//! section starts with `data-reveal="hidden"`, flips to `visible` at most
//! once, and never flips back. The `simulate` command replays scroll scripts
//! through those modules so margins and the hero delay can be tuned without
//! a browser.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`types`] | Section identities, anchors and the navigation list |
//! | [`observer`] | Viewport intersection with a signed root margin, per section |
//! | [`reveal`] | Reveal coordinator: once-only state per section, hero entrance timer |
//! | [`contact`] | Contact form fields and the message submitter state machine |
//! | [`relay`] | `EmailRelay` trait and the EmailJS REST adapter |
//! | [`catalog`] | `portfolio.toml` + `about.md` loading and validation |
//! | [`config`] | `config.toml` loading, merging, validation, and CSS generation |
//! | [`generate`] | Renders the page with Maud and copies assets |
//! | [`simulate`] | Scroll-script replay through observer and coordinator |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Logical Time
//!
//! The coordinator never reads a clock. Callers pass the current
//! [`Duration`](std::time::Duration) since mount, which keeps timer behavior
//! deterministic in tests and in `simulate`. The hero timer belongs to the
//! coordinator and is dropped with it, so a torn-down page cannot reveal.
//!
//! ## Maud Over Template Engines
//!
//! HTML is generated with [Maud](https://maud.lambda.xyz/): malformed markup
//! is a build error and all interpolation is escaped. The stylesheet and
//! script are inlined, so the output needs nothing but a file server.

pub mod catalog;
pub mod config;
pub mod contact;
pub mod generate;
pub mod observer;
pub mod output;
pub mod relay;
pub mod reveal;
pub mod simulate;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;

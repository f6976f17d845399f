//! Scroll-script replay.
//!
//! Drives a [`SectionVisibilityObserver`] and a [`RevealCoordinator`] with a
//! scripted sequence of viewport frames, the same way the browser's event
//! loop does, and records every reveal. Useful for checking margins and the
//! hero delay against a real layout without opening a browser.
//!
//! ## Script Format
//!
//! ```toml
//! [viewport]
//! width = 1280
//! height = 800
//!
//! [[sections]]
//! id = "about"
//! top = 900
//! height = 700            # left/width default to 0/viewport width
//!
//! [[frames]]
//! at_ms = 0
//! scroll_y = 0
//!
//! [[frames]]
//! at_ms = 1500
//! scroll_y = 600
//! teardown = true         # navigate away after this frame
//! ```
//!
//! For each frame the coordinator is first advanced to `at_ms` (timers fire
//! before the scroll is observed), then the observer is updated and its
//! transitions applied. Sections missing from `[[sections]]` are treated as
//! not mounted.

use crate::config::RevealConfig;
use crate::observer::{Rect, SectionVisibilityObserver, Viewport};
use crate::reveal::{RevealCoordinator, RevealSignal, RevealState};
use crate::types::SectionId;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimulateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error in scroll script: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Scroll script error: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScrollScript {
    pub viewport: ViewportSize,
    #[serde(default)]
    pub sections: Vec<SectionLayout>,
    pub frames: Vec<Frame>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ViewportSize {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SectionLayout {
    pub id: String,
    pub top: f64,
    pub height: f64,
    #[serde(default)]
    pub left: f64,
    #[serde(default)]
    pub width: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Frame {
    pub at_ms: u64,
    #[serde(default)]
    pub scroll_x: f64,
    pub scroll_y: f64,
    #[serde(default)]
    pub teardown: bool,
}

impl ScrollScript {
    pub fn load(path: &Path) -> Result<Self, SimulateError> {
        let content = fs::read_to_string(path)?;
        let script: ScrollScript = toml::from_str(&content)?;
        script.validate()?;
        Ok(script)
    }

    pub fn validate(&self) -> Result<(), SimulateError> {
        if !(self.viewport.width > 0.0 && self.viewport.height > 0.0) {
            return Err(SimulateError::Invalid(
                "viewport width and height must be positive".into(),
            ));
        }
        let mut seen = Vec::new();
        for layout in &self.sections {
            let id = layout
                .id
                .parse::<SectionId>()
                .map_err(|e| SimulateError::Invalid(e.to_string()))?;
            if seen.contains(&id) {
                return Err(SimulateError::Invalid(format!(
                    "section '{id}' is laid out twice"
                )));
            }
            seen.push(id);
        }
        if self.frames.windows(2).any(|w| w[1].at_ms < w[0].at_ms) {
            return Err(SimulateError::Invalid(
                "frames must be sorted by at_ms".into(),
            ));
        }
        Ok(())
    }

    fn bounds(&self) -> Vec<(SectionId, Rect)> {
        self.sections
            .iter()
            .filter_map(|layout| {
                let id = layout.id.parse::<SectionId>().ok()?;
                let width = layout.width.unwrap_or(self.viewport.width);
                Some((id, Rect::new(layout.left, layout.top, width, layout.height)))
            })
            .collect()
    }
}

/// One reveal in the replay.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimelineEntry {
    /// Frame that produced the reveal.
    pub frame: usize,
    #[serde(flatten)]
    pub signal: RevealSignal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Timeline {
    pub reveals: Vec<TimelineEntry>,
    pub final_states: Vec<(SectionId, RevealState)>,
    /// Frame index after which the coordinator was torn down, if any.
    pub torn_down_after: Option<usize>,
}

impl Timeline {
    pub fn revealed_at(&self, section: SectionId) -> Option<Duration> {
        self.reveals
            .iter()
            .find(|e| e.signal.section == section)
            .map(|e| e.signal.at)
    }
}

/// Replay `script` with the margins and hero delay from `reveal`.
pub fn run(script: &ScrollScript, reveal: &RevealConfig) -> Timeline {
    let mut observer = SectionVisibilityObserver::new();
    for section in SectionId::ALL {
        if !section.is_timer_driven() {
            observer.register(section, f64::from(reveal.margin_for(section)));
        }
    }
    for (section, rect) in script.bounds() {
        observer.set_bounds(section, Some(rect));
    }

    let mut coordinator = RevealCoordinator::new(reveal.hero_delay());
    coordinator.mount(Duration::ZERO);

    let mut reveals = Vec::new();
    let mut torn_down_after = None;
    for (idx, frame) in script.frames.iter().enumerate() {
        let now = Duration::from_millis(frame.at_ms);
        let viewport = Viewport {
            scroll_x: frame.scroll_x,
            scroll_y: frame.scroll_y,
            width: script.viewport.width,
            height: script.viewport.height,
        };

        let timed = coordinator.advance(now);
        let transitions = observer.update(&viewport);
        let seen = coordinator.apply(&transitions);

        reveals.extend(
            timed
                .into_iter()
                .chain(seen)
                .map(|signal| TimelineEntry { frame: idx, signal }),
        );

        if frame.teardown {
            coordinator.teardown();
            torn_down_after = Some(idx);
            break;
        }
    }

    Timeline {
        reveals,
        final_states: coordinator.states().collect(),
        torn_down_after,
    }
}

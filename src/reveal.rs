//! One-shot section reveals.
//!
//! Every section starts [`RevealState::NotRevealed`] and moves to
//! [`RevealState::Revealed`] at most once. Two trigger paths feed the same
//! table:
//!
//! - **Visibility**: a section other than the hero is revealed the first time
//!   the observer reports it in view.
//! - **Entrance timer**: the hero is always in view on load, so it is
//!   revealed by a timer a fixed delay after [`RevealCoordinator::mount`]
//!   instead (profile photo first, then the rest of the content).
//!
//! ```text
//!                visible == true
//!   NotRevealed ─────────────────▶ Revealed   (terminal)
//!               ─────────────────▶
//!                 timer elapsed
//! ```
//!
//! Time is logical: the caller passes "time since page load" to
//! [`RevealCoordinator::mount`] and [`RevealCoordinator::advance`]. This keeps
//! the coordinator single-threaded and deterministic; the hero timer is a
//! value owned by the coordinator, so tearing the coordinator down (or
//! dropping it) is enough to guarantee it never fires.

use crate::observer::VisibilityTransition;
use crate::types::SectionId;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::mpsc::Sender;
use std::time::Duration;
use tracing::debug;

/// Default delay between mount and the hero entrance.
pub const HERO_DELAY: Duration = Duration::from_millis(1200);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum RevealState {
    #[default]
    NotRevealed,
    Revealed,
}

/// Presentation the renderer should apply for a state.
///
/// Keyframes and curves live in the stylesheet; the core only says which
/// variant is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Presentation {
    Hidden,
    Visible,
}

impl Presentation {
    /// Value of the `data-reveal` attribute.
    pub fn as_attr(self) -> &'static str {
        match self {
            Presentation::Hidden => "hidden",
            Presentation::Visible => "visible",
        }
    }
}

impl RevealState {
    pub fn presentation(self) -> Presentation {
        match self {
            RevealState::NotRevealed => Presentation::Hidden,
            RevealState::Revealed => Presentation::Visible,
        }
    }
}

/// What caused a reveal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trigger {
    Visibility,
    Timer,
}

/// "Begin entrance animation" for one section. Emitted once per section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RevealSignal {
    pub section: SectionId,
    pub trigger: Trigger,
    /// Logical time of the reveal. For timer reveals this is the timer's
    /// deadline, not the time it happened to be polled.
    #[serde(serialize_with = "serialize_millis")]
    pub at: Duration,
}

fn serialize_millis<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u64(d.as_millis() as u64)
}

/// A pending one-shot timer. Owned by the coordinator; dropping it cancels it.
#[derive(Debug, Clone, Copy, PartialEq)]
struct EntranceTimer {
    section: SectionId,
    deadline: Duration,
}

/// Owns the reveal state of every section.
///
/// Nothing else mutates the table; the renderer reads it through
/// [`state`](Self::state) and [`presentation`](Self::presentation).
#[derive(Debug)]
pub struct RevealCoordinator {
    states: BTreeMap<SectionId, RevealState>,
    hero_delay: Duration,
    timer: Option<EntranceTimer>,
    now: Duration,
    torn_down: bool,
    sink: Option<Sender<RevealSignal>>,
}

impl Default for RevealCoordinator {
    fn default() -> Self {
        Self::new(HERO_DELAY)
    }
}

impl RevealCoordinator {
    pub fn new(hero_delay: Duration) -> Self {
        Self {
            states: SectionId::ALL
                .into_iter()
                .map(|s| (s, RevealState::NotRevealed))
                .collect(),
            hero_delay,
            timer: None,
            now: Duration::ZERO,
            torn_down: false,
            sink: None,
        }
    }

    /// Also deliver every signal to `sink`.
    pub fn with_sink(mut self, sink: Sender<RevealSignal>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn hero_delay(&self) -> Duration {
        self.hero_delay
    }

    /// The view has mounted at logical time `at`; arm the hero entrance timer.
    ///
    /// Mounting again re-arms the timer only while the hero is still hidden.
    pub fn mount(&mut self, at: Duration) {
        if self.torn_down {
            return;
        }
        self.now = self.now.max(at);
        if self.state(SectionId::Hero) == RevealState::NotRevealed {
            self.timer = Some(EntranceTimer {
                section: SectionId::Hero,
                deadline: at + self.hero_delay,
            });
        }
    }

    /// Feed a visibility change for one section.
    ///
    /// Reveals on the first `true`; everything else is a no-op, including
    /// `false` after a reveal and any event for a timer-driven section.
    pub fn on_visibility_changed(
        &mut self,
        section: SectionId,
        is_visible: bool,
    ) -> Option<RevealSignal> {
        if self.torn_down || !is_visible || section.is_timer_driven() {
            return None;
        }
        self.reveal(section, Trigger::Visibility, self.now)
    }

    /// Feed a batch of observer transitions, returning the reveals they caused.
    pub fn apply(&mut self, transitions: &[VisibilityTransition]) -> Vec<RevealSignal> {
        transitions
            .iter()
            .filter_map(|t| self.on_visibility_changed(t.section, t.current))
            .collect()
    }

    /// Advance logical time to `now`, firing the entrance timer if it is due.
    ///
    /// Time never moves backwards; an earlier `now` is ignored.
    pub fn advance(&mut self, now: Duration) -> Option<RevealSignal> {
        if self.torn_down {
            return None;
        }
        self.now = self.now.max(now);
        let timer = self.timer.filter(|t| t.deadline <= self.now)?;
        self.timer = None;
        self.reveal(timer.section, Trigger::Timer, timer.deadline)
    }

    /// Cancel the entrance timer and stop emitting signals.
    ///
    /// States stay readable. Idempotent.
    pub fn teardown(&mut self) {
        if !self.torn_down {
            debug!(pending_timer = self.timer.is_some(), "reveal coordinator torn down");
        }
        self.timer = None;
        self.torn_down = true;
        self.sink = None;
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Deadline of the pending entrance timer, if armed.
    pub fn pending_deadline(&self) -> Option<Duration> {
        self.timer.map(|t| t.deadline)
    }

    pub fn state(&self, section: SectionId) -> RevealState {
        self.states.get(&section).copied().unwrap_or_default()
    }

    pub fn presentation(&self, section: SectionId) -> Presentation {
        self.state(section).presentation()
    }

    /// Snapshot of the whole table, in page order.
    pub fn states(&self) -> impl Iterator<Item = (SectionId, RevealState)> + '_ {
        self.states.iter().map(|(&s, &st)| (s, st))
    }

    fn reveal(&mut self, section: SectionId, trigger: Trigger, at: Duration) -> Option<RevealSignal> {
        let state = self.states.entry(section).or_default();
        if *state == RevealState::Revealed {
            return None;
        }
        *state = RevealState::Revealed;

        let signal = RevealSignal {
            section,
            trigger,
            at,
        };
        debug!(%section, ?trigger, at_ms = at.as_millis() as u64, "section revealed");
        if let Some(sink) = &self.sink {
            // A dropped receiver means nobody is listening any more; the
            // state change itself still stands.
            let _ = sink.send(signal);
        }
        Some(signal)
    }
}

impl Drop for RevealCoordinator {
    fn drop(&mut self) {
        self.teardown();
    }
}

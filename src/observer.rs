//! Section visibility observation.
//!
//! Turns viewport geometry into a per-section "in view" boolean. The
//! semantics follow the browser's `IntersectionObserver` with a `rootMargin`:
//!
//! ```text
//!         margin_px = -100                 margin_px = +50
//!   ┌──────── viewport ────────┐     ┌─ ─ ─ ─ expanded ─ ─ ─ ─┐
//!   │  ┌ ─ ─ shrunk ─ ─ ─ ─ ┐  │       ┌──── viewport ────┐
//!   │  │                    │  │     │ │                  │ │
//!   │  └ ─ ─ ─ ─ ─ ─ ─ ─ ─ ─┘  │       └──────────────────┘
//!   └──────────────────────────┘     └─ ─ ─ ─ ─ ─ ─ ─ ─ ─ ─ ─┘
//! ```
//!
//! A section is visible when its bounds and the adjusted viewport overlap
//! with positive area. Sections that are not mounted (no bounds), have
//! degenerate bounds, or were never registered are simply not visible:
//! there is no error path in this module.

use crate::types::SectionId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Axis-aligned rectangle in document coordinates (CSS pixels).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Finite and of positive area.
    pub fn is_measurable(&self) -> bool {
        [self.left, self.top, self.width, self.height]
            .iter()
            .all(|v| v.is_finite())
            && self.width > 0.0
            && self.height > 0.0
    }

    /// Grow (positive) or shrink (negative) on every side.
    ///
    /// Shrinking past zero yields a zero-sized rectangle centred on the
    /// original, which overlaps nothing.
    pub fn inflate(&self, by: f64) -> Rect {
        let width = (self.width + 2.0 * by).max(0.0);
        let height = (self.height + 2.0 * by).max(0.0);
        let cx = self.left + self.width / 2.0;
        let cy = self.top + self.height / 2.0;
        Rect::new(cx - width / 2.0, cy - height / 2.0, width, height)
    }

    /// Positive-area overlap. Touching edges do not count.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left < other.right()
            && other.left < self.right()
            && self.top < other.bottom()
            && other.top < self.bottom()
    }
}

/// The visible window onto the document at one moment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    #[serde(default)]
    pub scroll_x: f64,
    pub scroll_y: f64,
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(scroll_y: f64, width: f64, height: f64) -> Self {
        Self {
            scroll_x: 0.0,
            scroll_y,
            width,
            height,
        }
    }

    /// The viewport as a rectangle in document coordinates.
    pub fn rect(&self) -> Rect {
        Rect::new(self.scroll_x, self.scroll_y, self.width, self.height)
    }
}

/// Whether `bounds` is in view of `viewport` once the viewport is adjusted
/// by `margin_px`. Absent or unmeasurable bounds are never in view.
pub fn intersects(bounds: Option<&Rect>, margin_px: f64, viewport: &Viewport) -> bool {
    let Some(bounds) = bounds else {
        return false;
    };
    if !bounds.is_measurable() || !viewport.rect().is_measurable() || !margin_px.is_finite() {
        return false;
    }
    let root = viewport.rect().inflate(margin_px);
    root.width > 0.0 && root.height > 0.0 && bounds.overlaps(&root)
}

/// A change in a section's visibility, produced by [`SectionVisibilityObserver::update`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VisibilityTransition {
    pub section: SectionId,
    pub previous: bool,
    pub current: bool,
    /// Observer update counter; orders transitions across updates.
    pub tick: u64,
}

#[derive(Debug, Clone)]
struct Registration {
    margin_px: f64,
    last: bool,
}

/// Tracks which registered sections are currently in view.
///
/// The observer only reports; it never decides what a visibility change
/// means. Feed its transitions to a [`crate::reveal::RevealCoordinator`].
#[derive(Debug, Default)]
pub struct SectionVisibilityObserver {
    registrations: BTreeMap<SectionId, Registration>,
    bounds: BTreeMap<SectionId, Rect>,
    tick: u64,
}

impl SectionVisibilityObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start (or restart) observing a section.
    ///
    /// Re-registering resets the section to a not-visible baseline, so the
    /// next [`update`](Self::update) reports it afresh if it is in view.
    pub fn register(&mut self, section: SectionId, margin_px: f64) {
        self.registrations.insert(
            section,
            Registration {
                margin_px,
                last: false,
            },
        );
    }

    /// Stop observing a section. Its bounds are kept.
    pub fn unregister(&mut self, section: SectionId) {
        self.registrations.remove(&section);
    }

    pub fn is_registered(&self, section: SectionId) -> bool {
        self.registrations.contains_key(&section)
    }

    /// Record the rendered bounds of a section, or `None` when it unmounts.
    pub fn set_bounds(&mut self, section: SectionId, bounds: Option<Rect>) {
        match bounds {
            Some(rect) => {
                self.bounds.insert(section, rect);
            }
            None => {
                self.bounds.remove(&section);
            }
        }
    }

    /// Point query for one section against a viewport.
    pub fn is_visible(&self, section: SectionId, viewport: &Viewport) -> bool {
        self.registrations
            .get(&section)
            .is_some_and(|reg| intersects(self.bounds.get(&section), reg.margin_px, viewport))
    }

    /// Recompute every registered section against `viewport`.
    ///
    /// Returns only the sections whose boolean changed since the previous
    /// update, ordered by section.
    pub fn update(&mut self, viewport: &Viewport) -> Vec<VisibilityTransition> {
        self.tick += 1;
        let tick = self.tick;
        let bounds = &self.bounds;
        self.registrations
            .iter_mut()
            .filter_map(|(&section, reg)| {
                let current = intersects(bounds.get(&section), reg.margin_px, viewport);
                let previous = std::mem::replace(&mut reg.last, current);
                (previous != current).then_some(VisibilityTransition {
                    section,
                    previous,
                    current,
                    tick,
                })
            })
            .collect()
    }

    /// Number of updates performed so far.
    pub fn tick(&self) -> u64 {
        self.tick
    }
}

/// Lazy boolean sequence for one section, one value per viewport frame.
///
/// Created by [`observe`]. The sequence is as long as the frame source,
/// which may be unbounded.
pub struct Observe<I> {
    bounds: Option<Rect>,
    margin_px: f64,
    frames: I,
}

impl<I> Iterator for Observe<I>
where
    I: Iterator<Item = Viewport>,
{
    type Item = bool;

    fn next(&mut self) -> Option<bool> {
        let viewport = self.frames.next()?;
        Some(intersects(self.bounds.as_ref(), self.margin_px, &viewport))
    }
}

/// Observe a single section over a stream of viewport frames.
///
/// Calling `observe` again with a fresh frame source restarts the sequence.
pub fn observe<I>(bounds: Option<Rect>, margin_px: f64, frames: I) -> Observe<I::IntoIter>
where
    I: IntoIterator<Item = Viewport>,
{
    Observe {
        bounds,
        margin_px,
        frames: frames.into_iter(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section_at(top: f64, height: f64) -> Rect {
        Rect::new(0.0, top, 1280.0, height)
    }

    #[test]
    fn section_inside_viewport_is_visible() {
        let vp = Viewport::new(0.0, 1280.0, 800.0);
        assert!(intersects(Some(&section_at(100.0, 300.0)), 0.0, &vp));
    }

    #[test]
    fn section_below_fold_is_not_visible() {
        let vp = Viewport::new(0.0, 1280.0, 800.0);
        assert!(!intersects(Some(&section_at(900.0, 300.0)), 0.0, &vp));
    }

    #[test]
    fn touching_edge_is_not_visible() {
        let vp = Viewport::new(0.0, 1280.0, 800.0);
        assert!(!intersects(Some(&section_at(800.0, 300.0)), 0.0, &vp));
    }

    #[test]
    fn negative_margin_requires_deeper_entry() {
        let vp = Viewport::new(0.0, 1280.0, 800.0);
        // Top edge 50px above the fold: in view without margin, out with -100.
        let rect = section_at(750.0, 400.0);
        assert!(intersects(Some(&rect), 0.0, &vp));
        assert!(!intersects(Some(&rect), -100.0, &vp));
    }

    #[test]
    fn positive_margin_triggers_early() {
        let vp = Viewport::new(0.0, 1280.0, 800.0);
        let rect = section_at(850.0, 400.0);
        assert!(!intersects(Some(&rect), 0.0, &vp));
        assert!(intersects(Some(&rect), 100.0, &vp));
    }

    #[test]
    fn margin_larger_than_viewport_sees_nothing() {
        let vp = Viewport::new(0.0, 1280.0, 800.0);
        assert!(!intersects(Some(&section_at(0.0, 800.0)), -500.0, &vp));
    }

    #[test]
    fn unmounted_or_degenerate_bounds_are_not_visible() {
        let vp = Viewport::new(0.0, 1280.0, 800.0);
        assert!(!intersects(None, 0.0, &vp));
        assert!(!intersects(Some(&section_at(100.0, 0.0)), 0.0, &vp));
        assert!(!intersects(Some(&section_at(f64::NAN, 100.0)), 0.0, &vp));
    }

    #[test]
    fn update_reports_only_changes() {
        let mut observer = SectionVisibilityObserver::new();
        observer.register(SectionId::About, 0.0);
        observer.set_bounds(SectionId::About, Some(section_at(900.0, 600.0)));

        assert!(observer.update(&Viewport::new(0.0, 1280.0, 800.0)).is_empty());

        let entered = observer.update(&Viewport::new(400.0, 1280.0, 800.0));
        assert_eq!(
            entered,
            vec![VisibilityTransition {
                section: SectionId::About,
                previous: false,
                current: true,
                tick: 2,
            }]
        );

        assert!(observer.update(&Viewport::new(450.0, 1280.0, 800.0)).is_empty());

        let left = observer.update(&Viewport::new(0.0, 1280.0, 800.0));
        assert_eq!(left.len(), 1);
        assert!(left[0].previous && !left[0].current);
    }

    #[test]
    fn update_orders_by_section() {
        let mut observer = SectionVisibilityObserver::new();
        observer.register(SectionId::Skills, 0.0);
        observer.register(SectionId::About, 0.0);
        observer.set_bounds(SectionId::Skills, Some(section_at(200.0, 100.0)));
        observer.set_bounds(SectionId::About, Some(section_at(0.0, 100.0)));

        let sections: Vec<_> = observer
            .update(&Viewport::new(0.0, 1280.0, 800.0))
            .into_iter()
            .map(|t| t.section)
            .collect();
        assert_eq!(sections, vec![SectionId::About, SectionId::Skills]);
    }

    #[test]
    fn unregistered_section_is_never_reported() {
        let mut observer = SectionVisibilityObserver::new();
        observer.set_bounds(SectionId::About, Some(section_at(0.0, 100.0)));
        let vp = Viewport::new(0.0, 1280.0, 800.0);
        assert!(observer.update(&vp).is_empty());
        assert!(!observer.is_visible(SectionId::About, &vp));
    }

    #[test]
    fn unmount_reports_not_visible() {
        let mut observer = SectionVisibilityObserver::new();
        observer.register(SectionId::Contact, 0.0);
        observer.set_bounds(SectionId::Contact, Some(section_at(0.0, 100.0)));
        let vp = Viewport::new(0.0, 1280.0, 800.0);
        assert_eq!(observer.update(&vp).len(), 1);

        observer.set_bounds(SectionId::Contact, None);
        let changes = observer.update(&vp);
        assert_eq!(changes.len(), 1);
        assert!(!changes[0].current);
    }

    #[test]
    fn unregistered_section_stops_reporting() {
        let mut observer = SectionVisibilityObserver::new();
        observer.register(SectionId::Projects, 0.0);
        observer.set_bounds(SectionId::Projects, Some(section_at(0.0, 100.0)));
        let vp = Viewport::new(0.0, 1280.0, 800.0);
        assert_eq!(observer.update(&vp).len(), 1);

        observer.unregister(SectionId::Projects);
        assert!(!observer.is_registered(SectionId::Projects));
        // Scrolling it out of view produces no transition either.
        assert!(observer.update(&Viewport::new(2000.0, 1280.0, 800.0)).is_empty());
        assert!(!observer.is_visible(SectionId::Projects, &vp));
    }

    #[test]
    fn tick_counts_updates() {
        let mut observer = SectionVisibilityObserver::new();
        assert_eq!(observer.tick(), 0);
        observer.register(SectionId::About, 0.0);
        assert!(observer.is_registered(SectionId::About));
        let vp = Viewport::new(0.0, 1280.0, 800.0);
        observer.update(&vp);
        observer.update(&vp);
        assert_eq!(observer.tick(), 2);
    }

    #[test]
    fn reregistering_restarts_from_not_visible() {
        let mut observer = SectionVisibilityObserver::new();
        observer.register(SectionId::About, 0.0);
        observer.set_bounds(SectionId::About, Some(section_at(0.0, 100.0)));
        let vp = Viewport::new(0.0, 1280.0, 800.0);
        assert_eq!(observer.update(&vp).len(), 1);
        assert!(observer.update(&vp).is_empty());

        observer.register(SectionId::About, 0.0);
        assert_eq!(observer.update(&vp).len(), 1);
    }

    #[test]
    fn observe_is_lazy_over_unbounded_frames() {
        let frames = (0..).map(|i| Viewport::new(f64::from(i) * 100.0, 1280.0, 800.0));
        let seen: Vec<bool> = observe(Some(section_at(1000.0, 200.0)), 0.0, frames)
            .take(6)
            .collect();
        // scroll_y 0..=500: visible once the viewport bottom passes 1000.
        assert_eq!(seen, vec![false, false, false, true, true, true]);
    }

    #[test]
    fn observe_without_bounds_is_all_false() {
        let frames = vec![Viewport::new(0.0, 1280.0, 800.0); 3];
        assert!(observe(None, 0.0, frames).all(|v| !v));
    }
}

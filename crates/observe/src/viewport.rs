//! Host-side visibility signal
//!
//! A `Viewport` stands in for the browser's intersection machinery: it owns
//! element rectangles in document coordinates and a vertical scroll offset,
//! and reports threshold-crossing events as the offset moves. It knows
//! nothing about callbacks; dispatch policy lives in
//! [`crate::VisibilityTrigger`].

use crate::geometry::{Margin, Rect};
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tracing::trace;

/// Opaque handle to a visual element.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct ElementId(pub u64);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "el#{}", self.0)
    }
}

/// A threshold-crossing notification for one observed element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Crossing {
    pub element: ElementId,
    /// Visible fraction at the time of the crossing.
    pub fraction: f64,
    /// True when the element crossed above its threshold (came into view).
    pub entered: bool,
}

struct Watch {
    threshold: f64,
    margin: Margin,
    was_above: bool,
}

/// Simulated scrollable viewport over a set of element rectangles.
pub struct Viewport {
    width: f64,
    height: f64,
    scroll_y: f64,
    elements: AHashMap<ElementId, Rect>,
    /// BTreeMap so crossings are reported in stable element order.
    watches: BTreeMap<ElementId, Watch>,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            scroll_y: 0.0,
            elements: AHashMap::new(),
            watches: BTreeMap::new(),
        }
    }

    /// Place (or move) an element, in document coordinates.
    pub fn insert_element(&mut self, id: ElementId, rect: Rect) {
        self.elements.insert(id, rect);
    }

    /// Remove an element and any watch on it.
    pub fn remove_element(&mut self, id: ElementId) {
        self.elements.remove(&id);
        self.watches.remove(&id);
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.elements.contains_key(&id)
    }

    pub fn element(&self, id: ElementId) -> Option<Rect> {
        self.elements.get(&id).copied()
    }

    pub fn scroll_y(&self) -> f64 {
        self.scroll_y
    }

    /// Start watching an element for threshold crossings.
    ///
    /// Returns false (and does nothing) if the element does not exist.
    /// Re-observing an element replaces its watch and resets its edge state,
    /// so the next evaluation reports its current side as a fresh crossing
    /// if it is already above the threshold.
    pub fn observe(&mut self, id: ElementId, threshold: f64, margin: Margin) -> bool {
        if !self.elements.contains_key(&id) {
            trace!(%id, "observe skipped: no such element");
            return false;
        }
        self.watches.insert(
            id,
            Watch {
                threshold,
                margin,
                was_above: false,
            },
        );
        true
    }

    /// Stop watching an element.
    pub fn unobserve(&mut self, id: ElementId) {
        self.watches.remove(&id);
    }

    pub fn watched(&self, id: ElementId) -> bool {
        self.watches.contains_key(&id)
    }

    /// Move the scroll offset and report resulting crossings.
    pub fn set_scroll(&mut self, y: f64) -> Vec<Crossing> {
        self.scroll_y = y;
        self.evaluate()
    }

    /// Re-evaluate all watches at the current offset.
    ///
    /// Call once after wiring so elements already in view produce their
    /// initial "entered" crossing, mirroring the host API's initial
    /// observation delivery.
    pub fn refresh(&mut self) -> Vec<Crossing> {
        self.evaluate()
    }

    fn evaluate(&mut self) -> Vec<Crossing> {
        let visible = Rect::new(0.0, self.scroll_y, self.width, self.height);
        let mut crossings = Vec::new();

        for (&id, watch) in self.watches.iter_mut() {
            let Some(rect) = self.elements.get(&id) else {
                continue;
            };

            let root = visible.expand(&watch.margin);
            let fraction = rect.visible_fraction(&root);
            // Threshold 0 means "any intersection at all".
            let above = if watch.threshold == 0.0 {
                fraction > 0.0
            } else {
                fraction >= watch.threshold
            };

            if above != watch.was_above {
                watch.was_above = above;
                trace!(%id, fraction, entered = above, "threshold crossing");
                crossings.push(Crossing {
                    element: id,
                    fraction,
                    entered: above,
                });
            }
        }

        crossings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport_with(elements: &[(u64, Rect)]) -> Viewport {
        let mut vp = Viewport::new(1280.0, 720.0);
        for &(id, rect) in elements {
            vp.insert_element(ElementId(id), rect);
        }
        vp
    }

    fn below_fold(id: u64) -> (u64, Rect) {
        (id, Rect::new(100.0, 1500.0, 400.0, 100.0))
    }

    #[test]
    fn test_scrolling_into_view_reports_entry() {
        let mut vp = viewport_with(&[below_fold(1)]);
        assert!(vp.observe(ElementId(1), 0.1, Margin::ZERO));

        assert!(vp.set_scroll(100.0).is_empty());

        let crossings = vp.set_scroll(1400.0);
        assert_eq!(crossings.len(), 1);
        assert_eq!(crossings[0].element, ElementId(1));
        assert!(crossings[0].entered);
    }

    #[test]
    fn test_scrolling_out_reports_exit() {
        let mut vp = viewport_with(&[below_fold(1)]);
        vp.observe(ElementId(1), 0.1, Margin::ZERO);

        vp.set_scroll(1400.0);
        let crossings = vp.set_scroll(0.0);

        assert_eq!(crossings.len(), 1);
        assert!(!crossings[0].entered);
    }

    #[test]
    fn test_no_crossing_while_staying_visible() {
        let mut vp = viewport_with(&[below_fold(1)]);
        vp.observe(ElementId(1), 0.1, Margin::ZERO);

        vp.set_scroll(1400.0);
        assert!(vp.set_scroll(1410.0).is_empty());
        assert!(vp.set_scroll(1420.0).is_empty());
    }

    #[test]
    fn test_observe_missing_element_is_noop() {
        let mut vp = viewport_with(&[]);
        assert!(!vp.observe(ElementId(42), 0.1, Margin::ZERO));
        assert!(vp.set_scroll(5000.0).is_empty());
    }

    #[test]
    fn test_refresh_reports_elements_already_in_view() {
        let mut vp = viewport_with(&[(1, Rect::new(0.0, 100.0, 200.0, 50.0))]);
        vp.observe(ElementId(1), 0.1, Margin::ZERO);

        let crossings = vp.refresh();
        assert_eq!(crossings.len(), 1);
        assert!(crossings[0].entered);
    }

    #[test]
    fn test_negative_margin_delays_entry() {
        let mut vp = viewport_with(&[below_fold(1)]);
        let margin = Margin::parse("0px 0px -200px 0px").unwrap();
        vp.observe(ElementId(1), 0.1, margin);

        // Would be visible without the margin, but the shrunk root excludes it.
        assert!(vp.set_scroll(850.0).is_empty());
        let crossings = vp.set_scroll(1100.0);
        assert_eq!(crossings.len(), 1);
        assert!(crossings[0].entered);
    }

    #[test]
    fn test_crossings_in_stable_element_order() {
        let mut vp = viewport_with(&[below_fold(3), below_fold(1), below_fold(2)]);
        for id in [3, 1, 2] {
            vp.observe(ElementId(id), 0.1, Margin::ZERO);
        }

        let crossings = vp.set_scroll(1400.0);
        let order: Vec<u64> = crossings.iter().map(|c| c.element.0).collect();
        assert_eq!(order, vec![1, 2, 3]);
    }
}

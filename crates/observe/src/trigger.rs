//! Per-element callback dispatch over crossing events
//!
//! The trigger is a registered-handler table keyed by subscription identity.
//! It consumes [`Crossing`] batches produced by a [`Viewport`] and applies
//! the one-shot / repeatable policy per element. Registration state is
//! checked at dispatch time, so unregistering an element discards any
//! crossings already produced but not yet dispatched.

use crate::geometry::Margin;
use crate::viewport::{Crossing, ElementId, Viewport};
use ahash::AHashMap;
use tracing::debug;
use ulid::Ulid;

/// Identity of one registration. A re-registration of the same element gets
/// a fresh id.
pub type SubscriptionId = Ulid;

/// Per-registration policy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegisterOptions {
    /// Drop the registration after the first qualifying callback.
    pub one_shot: bool,
    /// Visible fraction that must be reached (0 = any intersection).
    pub threshold: f64,
    /// Root margin applied on the host side.
    pub root_margin: Margin,
}

impl Default for RegisterOptions {
    fn default() -> Self {
        Self {
            one_shot: false,
            threshold: 0.0,
            root_margin: Margin::ZERO,
        }
    }
}

impl RegisterOptions {
    pub fn one_shot(threshold: f64) -> Self {
        Self {
            one_shot: true,
            threshold,
            root_margin: Margin::ZERO,
        }
    }

    pub fn repeatable(threshold: f64) -> Self {
        Self {
            one_shot: false,
            threshold,
            root_margin: Margin::ZERO,
        }
    }

    pub fn with_root_margin(mut self, margin: Margin) -> Self {
        self.root_margin = margin;
        self
    }
}

struct ObservedTarget {
    subscription: SubscriptionId,
    callback: Box<dyn FnMut(ElementId) + Send>,
    one_shot: bool,
}

/// Registry of visibility callbacks.
///
/// Owns no element geometry; holds only the element -> callback relation.
#[derive(Default)]
pub struct VisibilityTrigger {
    targets: AHashMap<ElementId, ObservedTarget>,
}

impl VisibilityTrigger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback for an element.
    ///
    /// Installs a watch on the viewport and records the callback. If the
    /// element does not exist in the viewport, registration skips entirely
    /// and returns `None` (pages are free to omit any element).
    /// Registering an element that is already registered replaces the
    /// previous registration: last registration wins.
    pub fn register(
        &mut self,
        viewport: &mut Viewport,
        element: ElementId,
        options: RegisterOptions,
        callback: impl FnMut(ElementId) + Send + 'static,
    ) -> Option<SubscriptionId> {
        if !viewport.observe(element, options.threshold, options.root_margin) {
            debug!(%element, "registration skipped: element not present");
            return None;
        }

        let subscription = Ulid::new();
        let replaced = self
            .targets
            .insert(
                element,
                ObservedTarget {
                    subscription,
                    callback: Box::new(callback),
                    one_shot: options.one_shot,
                },
            )
            .is_some();
        if replaced {
            debug!(%element, "previous registration replaced");
        }

        Some(subscription)
    }

    /// Remove an element's registration and its viewport watch.
    ///
    /// Crossings already produced for the element are discarded when they
    /// reach [`dispatch`](Self::dispatch).
    pub fn unregister(&mut self, viewport: &mut Viewport, element: ElementId) {
        self.targets.remove(&element);
        viewport.unobserve(element);
    }

    /// Deliver a batch of crossings, invoking callbacks for entries.
    ///
    /// Returns the number of callbacks invoked. One-shot targets are
    /// removed (and unobserved) immediately after their first invocation.
    pub fn dispatch(&mut self, viewport: &mut Viewport, crossings: &[Crossing]) -> usize {
        let mut fired = 0;

        for crossing in crossings {
            if !crossing.entered {
                continue;
            }
            let Some(target) = self.targets.get_mut(&crossing.element) else {
                // Unregistered (or one-shot already consumed): discard.
                continue;
            };

            (target.callback)(crossing.element);
            fired += 1;

            if target.one_shot {
                self.targets.remove(&crossing.element);
                viewport.unobserve(crossing.element);
            }
        }

        fired
    }

    /// Current subscription id for an element, if registered.
    pub fn subscription(&self, element: ElementId) -> Option<SubscriptionId> {
        self.targets.get(&element).map(|t| t.subscription)
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    const EL: ElementId = ElementId(1);

    fn setup() -> (Viewport, VisibilityTrigger, Arc<AtomicUsize>) {
        let mut vp = Viewport::new(1280.0, 720.0);
        vp.insert_element(EL, Rect::new(0.0, 1500.0, 400.0, 100.0));
        (vp, VisibilityTrigger::new(), Arc::new(AtomicUsize::new(0)))
    }

    fn counting(hits: &Arc<AtomicUsize>) -> impl FnMut(ElementId) + Send + 'static {
        let hits = hits.clone();
        move |_| {
            hits.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_one_shot_fires_exactly_once_across_two_entries() {
        let (mut vp, mut trigger, hits) = setup();
        trigger
            .register(&mut vp, EL, RegisterOptions::one_shot(0.1), counting(&hits))
            .unwrap();

        let crossings = vp.set_scroll(1400.0);
        trigger.dispatch(&mut vp, &crossings);
        let crossings = vp.set_scroll(0.0);
        trigger.dispatch(&mut vp, &crossings);
        let crossings = vp.set_scroll(1400.0);
        trigger.dispatch(&mut vp, &crossings);

        assert_eq!(hits.load(Ordering::SeqCst), 1);
        // No state retained for the consumed one-shot.
        assert!(trigger.is_empty());
        assert!(!vp.watched(EL));
    }

    #[test]
    fn test_repeatable_fires_on_each_entry() {
        let (mut vp, mut trigger, hits) = setup();
        trigger
            .register(
                &mut vp,
                EL,
                RegisterOptions::repeatable(0.1),
                counting(&hits),
            )
            .unwrap();

        for _ in 0..2 {
            let crossings = vp.set_scroll(1400.0);
            trigger.dispatch(&mut vp, &crossings);
            let crossings = vp.set_scroll(0.0);
            trigger.dispatch(&mut vp, &crossings);
        }

        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_unregister_discards_in_flight_crossings() {
        let (mut vp, mut trigger, hits) = setup();
        trigger
            .register(&mut vp, EL, RegisterOptions::one_shot(0.1), counting(&hits))
            .unwrap();

        // Crossing produced, then the element is unregistered before the
        // batch is dispatched.
        let crossings = vp.set_scroll(1400.0);
        trigger.unregister(&mut vp, EL);
        let fired = trigger.dispatch(&mut vp, &crossings);

        assert_eq!(fired, 0);
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_double_registration_last_wins() {
        let (mut vp, mut trigger, hits) = setup();
        let first = trigger
            .register(&mut vp, EL, RegisterOptions::one_shot(0.1), counting(&hits))
            .unwrap();
        let second = trigger
            .register(&mut vp, EL, RegisterOptions::one_shot(0.1), counting(&hits))
            .unwrap();

        assert_ne!(first, second);
        assert_eq!(trigger.subscription(EL), Some(second));
        assert_eq!(trigger.len(), 1);

        let crossings = vp.set_scroll(1400.0);
        let fired = trigger.dispatch(&mut vp, &crossings);

        assert_eq!(fired, 1);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_register_missing_element_skips() {
        let (mut vp, mut trigger, hits) = setup();
        let sub = trigger.register(
            &mut vp,
            ElementId(99),
            RegisterOptions::one_shot(0.1),
            counting(&hits),
        );

        assert!(sub.is_none());
        assert!(trigger.is_empty());
    }

    #[test]
    fn test_exit_crossings_do_not_fire() {
        let (mut vp, mut trigger, hits) = setup();
        trigger
            .register(
                &mut vp,
                EL,
                RegisterOptions::repeatable(0.1),
                counting(&hits),
            )
            .unwrap();

        let entered = vp.set_scroll(1400.0);
        let exited = vp.set_scroll(0.0);
        trigger.dispatch(&mut vp, &entered);
        trigger.dispatch(&mut vp, &exited);

        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }
}

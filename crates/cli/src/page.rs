//! Simulated page layout
//!
//! Builds a [`Viewport`] from the configured element list and keeps the
//! name -> element-id relation. Elements with degenerate geometry (zero or
//! negative extent) get a name and an id but are never placed in the
//! viewport, standing in for elements a page chose to omit; registration
//! against them must no-op.

use crate::config::CadenceConfig;
use ahash::AHashMap;
use cadence_observe::{ElementId, Rect, Viewport};
use tracing::warn;

pub struct Page {
    pub viewport: Viewport,
    ids: AHashMap<String, ElementId>,
}

impl Page {
    pub fn build(config: &CadenceConfig) -> Self {
        let mut viewport = Viewport::new(config.viewport.width, config.viewport.height);
        let mut ids = AHashMap::new();

        for (n, element) in config.page.iter().enumerate() {
            let id = ElementId(n as u64 + 1);
            if ids.insert(element.name.clone(), id).is_some() {
                warn!(name = %element.name, "duplicate element name, last one wins");
            }

            if element.height > 0.0 && element.width > 0.0 {
                viewport.insert_element(
                    id,
                    Rect::new(0.0, element.top, element.width, element.height),
                );
            }
        }

        Self { viewport, ids }
    }

    pub fn id(&self, name: &str) -> Option<ElementId> {
        self.ids.get(name).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CadenceConfig, ElementKind, PageElement};

    #[test]
    fn test_build_places_all_default_elements() {
        let config = CadenceConfig::default();
        let page = Page::build(&config);

        for element in &config.page {
            let id = page.id(&element.name).unwrap();
            assert!(page.viewport.contains(id), "{} missing", element.name);
        }
    }

    #[test]
    fn test_degenerate_element_named_but_not_placed() {
        let mut config = CadenceConfig::default();
        config.page.push(PageElement {
            name: "ghost".to_string(),
            kind: ElementKind::Section,
            top: 100.0,
            height: 0.0,
            width: 600.0,
            target: 0,
            text: String::new(),
        });

        let page = Page::build(&config);
        let id = page.id("ghost").unwrap();
        assert!(!page.viewport.contains(id));
    }

    #[test]
    fn test_unknown_name_is_none() {
        let page = Page::build(&CadenceConfig::default());
        assert!(page.id("no-such-element").is_none());
    }
}

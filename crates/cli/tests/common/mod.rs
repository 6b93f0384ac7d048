//! Shared helpers for simulation integration tests

use cli_lib::config::{CadenceConfig, ElementKind, PageElement, ResizeEvent, ScrollConfig};

/// A compact page: one section, one counter, one typewriter, all reachable
/// within a short scripted scroll.
pub fn small_config() -> CadenceConfig {
    let mut config = CadenceConfig::default();
    config.page = vec![
        element("intro", ElementKind::Section, 0.0, 720.0),
        PageElement {
            target: 250,
            ..element("stat", ElementKind::Counter, 1000.0, 100.0)
        },
        PageElement {
            text: "hello".to_string(),
            ..element("motto", ElementKind::Typing, 1200.0, 80.0)
        },
    ];
    config.scroll = ScrollConfig {
        distance_px: 1400.0,
        duration_ms: 2000,
        return_to_top: false,
        jitter_px: 0.0,
        seed: 1,
    };
    config.resizes = Vec::new();
    config
}

pub fn element(name: &str, kind: ElementKind, top: f64, height: f64) -> PageElement {
    PageElement {
        name: name.to_string(),
        kind,
        top,
        height,
        width: 600.0,
        target: 0,
        text: String::new(),
    }
}

pub fn resize(at_ms: u64, width: f64) -> ResizeEvent {
    ResizeEvent { at_ms, width }
}

//! Scripted scroll simulation
//!
//! Drives the full stack on a virtual clock: a page is built from config,
//! effects are wired through the visibility trigger, and a deterministic
//! scroll trajectory is replayed frame by frame. Resize events exercise the
//! debounce path; the scroll stream exercises throttling.

use crate::config::{CadenceConfig, ElementKind, ScrollConfig};
use crate::page::Page;
use anyhow::Result;
use cadence_core::{EventLoop, Scheduler};
use cadence_effects::{Counter, Reveal, ScrollIndicator, Typewriter};
use cadence_limiter::{Mode, RateLimiter};
use cadence_observe::{Margin, RegisterOptions, VisibilityTrigger};
use parking_lot::Mutex;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// End-of-run state of everything the simulation animated.
#[derive(Debug, Serialize)]
pub struct RunSummary {
    pub frames: u64,
    pub duration_ms: u64,
    pub final_scroll: f64,
    pub callbacks_fired: u64,
    pub counters: Vec<CounterSummary>,
    pub typewriters: Vec<TypewriterSummary>,
    pub sections: Vec<SectionSummary>,
    pub indicator_visible: bool,
    pub layout_width: f64,
    pub relayouts: u32,
    pub skipped: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct CounterSummary {
    pub name: String,
    pub target: u64,
    pub display: u64,
    pub done: bool,
}

#[derive(Debug, Serialize)]
pub struct TypewriterSummary {
    pub name: String,
    pub shown: String,
    pub done: bool,
}

#[derive(Debug, Serialize)]
pub struct SectionSummary {
    pub name: String,
    pub revealed: bool,
    pub times: u32,
}

#[derive(Default)]
struct Wired {
    counters: Vec<(String, Counter)>,
    typewriters: Vec<(String, Typewriter)>,
    sections: Vec<(String, Reveal)>,
    skipped: Vec<String>,
}

struct LayoutState {
    width: f64,
    relayouts: u32,
}

/// Run the scripted session and report final state.
pub fn run(config: &CadenceConfig) -> Result<RunSummary> {
    config.validate()?;

    let ev = EventLoop::new_virtual();
    let sched = ev.scheduler();
    let mut page = Page::build(config);
    let mut trigger = VisibilityTrigger::new();

    // A wiring failure aborts the remaining handlers but not the run;
    // partially wired pages are tolerated.
    let wired = match wire(config, &mut page, &mut trigger, &sched) {
        Ok(wired) => wired,
        Err(e) => {
            warn!("page wiring aborted: {e:#}");
            Wired::default()
        }
    };

    let indicator = ScrollIndicator::with_params(
        &sched,
        cadence_effects::indicator::DEFAULT_HIDE_AFTER,
        Duration::from_millis(config.throttle_ms),
    );

    let layout = Arc::new(Mutex::new(LayoutState {
        width: config.viewport.width,
        relayouts: 0,
    }));
    let relayout_state = layout.clone();
    let relayout = RateLimiter::wrap(
        &sched,
        move |width: f64| {
            let mut layout = relayout_state.lock();
            layout.width = width;
            layout.relayouts += 1;
            info!(width, "relayout");
        },
        Duration::from_millis(config.debounce_ms),
        Mode::Debounce,
    );

    // Initial observation pass: elements already in view fire now.
    let crossings = page.viewport.refresh();
    let mut fired = trigger.dispatch(&mut page.viewport, &crossings) as u64;

    let frame = Duration::from_millis(config.frame_ms);
    let frames = config.scroll.duration_ms / config.frame_ms;
    let mut rng = ChaCha8Rng::seed_from_u64(config.scroll.seed);

    let mut resizes = config.resizes.clone();
    resizes.sort_by_key(|r| r.at_ms);
    let mut next_resize = 0;

    info!(frames, duration_ms = config.scroll.duration_ms, "starting scripted scroll");

    for n in 1..=frames {
        ev.advance(frame)?;
        let t_ms = n * config.frame_ms;

        while next_resize < resizes.len() && resizes[next_resize].at_ms <= t_ms {
            relayout.invoke(resizes[next_resize].width);
            next_resize += 1;
        }

        let mut y = scroll_at(t_ms, &config.scroll);
        if config.scroll.jitter_px > 0.0 {
            y += rng.gen_range(-config.scroll.jitter_px..=config.scroll.jitter_px);
        }
        let y = y.max(0.0);

        let crossings = page.viewport.set_scroll(y);
        fired += trigger.dispatch(&mut page.viewport, &crossings) as u64;
        indicator.on_scroll(y);
    }

    // Let in-flight animations (typing, counters) and the pending debounce
    // run to completion.
    let settle = settle_ms(config);
    debug!(settle_ms = settle, "settling");
    ev.advance(Duration::from_millis(settle))?;

    let layout = layout.lock();
    Ok(RunSummary {
        frames,
        duration_ms: config.scroll.duration_ms,
        final_scroll: page.viewport.scroll_y(),
        callbacks_fired: fired,
        counters: wired
            .counters
            .iter()
            .map(|(name, counter)| CounterSummary {
                name: name.clone(),
                target: counter.target(),
                display: counter.display(),
                done: counter.is_done(),
            })
            .collect(),
        typewriters: wired
            .typewriters
            .iter()
            .map(|(name, tw)| TypewriterSummary {
                name: name.clone(),
                shown: tw.shown(),
                done: tw.is_done(),
            })
            .collect(),
        sections: wired
            .sections
            .iter()
            .map(|(name, reveal)| SectionSummary {
                name: name.clone(),
                revealed: reveal.is_revealed(),
                times: reveal.times(),
            })
            .collect(),
        indicator_visible: indicator.is_visible(),
        layout_width: layout.width,
        relayouts: layout.relayouts,
        skipped: wired.skipped,
    })
}

fn wire(
    config: &CadenceConfig,
    page: &mut Page,
    trigger: &mut VisibilityTrigger,
    sched: &Scheduler,
) -> Result<Wired> {
    let margin = Margin::parse(&config.root_margin)?;
    let mut wired = Wired::default();

    let frame = Duration::from_millis(config.frame_ms);
    let typing_interval = Duration::from_millis(config.typing_interval_ms);
    let steps = config.counter_steps;

    for element in &config.page {
        let Some(id) = page.id(&element.name) else {
            continue;
        };

        let registered = match element.kind {
            ElementKind::Counter => {
                let counter = Counter::new(element.target);
                let effect = counter.clone();
                let sched = sched.clone();
                let sub = trigger.register(
                    &mut page.viewport,
                    id,
                    RegisterOptions::one_shot(config.threshold).with_root_margin(margin),
                    move |_| effect.start(&sched, frame, steps),
                );
                if sub.is_some() {
                    wired.counters.push((element.name.clone(), counter));
                }
                sub.is_some()
            }
            ElementKind::Typing => {
                let tw = Typewriter::new(&element.text);
                let effect = tw.clone();
                let sched = sched.clone();
                let sub = trigger.register(
                    &mut page.viewport,
                    id,
                    RegisterOptions::one_shot(config.threshold).with_root_margin(margin),
                    move |_| effect.start(&sched, typing_interval),
                );
                if sub.is_some() {
                    wired.typewriters.push((element.name.clone(), tw));
                }
                sub.is_some()
            }
            ElementKind::Section => {
                let reveal = Reveal::hidden(30.0);
                let effect = reveal.clone();
                let sub = trigger.register(
                    &mut page.viewport,
                    id,
                    RegisterOptions::repeatable(config.threshold).with_root_margin(margin),
                    move |_| effect.reveal(),
                );
                if sub.is_some() {
                    wired.sections.push((element.name.clone(), reveal));
                }
                sub.is_some()
            }
        };

        if !registered {
            warn!(name = %element.name, "skipped: element not present in viewport");
            wired.skipped.push(element.name.clone());
        }
    }

    Ok(wired)
}

/// Scroll offset at `t_ms`: linear ramp to the peak, and back down over the
/// second half when `return_to_top` is set.
fn scroll_at(t_ms: u64, scroll: &ScrollConfig) -> f64 {
    let progress = (t_ms as f64 / scroll.duration_ms as f64).clamp(0.0, 1.0);
    if scroll.return_to_top {
        if progress <= 0.5 {
            scroll.distance_px * (progress / 0.5)
        } else {
            scroll.distance_px * ((1.0 - progress) / 0.5)
        }
    } else {
        scroll.distance_px * progress
    }
}

/// Virtual time needed after the script for every started animation to
/// finish: the pending debounce, the longest typewriter, one full counter.
fn settle_ms(config: &CadenceConfig) -> u64 {
    let longest_text = config
        .page
        .iter()
        .filter(|e| e.kind == ElementKind::Typing)
        .map(|e| e.text.chars().count() as u64)
        .max()
        .unwrap_or(0);

    config.debounce_ms
        + longest_text * config.typing_interval_ms
        + u64::from(config.counter_steps) * config.frame_ms
        + 5 * config.frame_ms
}

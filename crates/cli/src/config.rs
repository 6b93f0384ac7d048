//! Demo configuration
//!
//! Loaded from `cadence.toml` (or a `--config` path); every field has a
//! default so the demo runs with no file at all. Values are validated to
//! the same ranges the simulation assumes.

use anyhow::{bail, Context, Result};
use cadence_observe::Margin;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Default config file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "cadence.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CadenceConfig {
    /// Simulation frame interval in milliseconds.
    pub frame_ms: u64,
    /// Throttle interval for scroll-driven handlers.
    pub throttle_ms: u64,
    /// Debounce quiet period for resize handling.
    pub debounce_ms: u64,
    /// Visible fraction required to count as "in view".
    pub threshold: f64,
    /// Root margin shorthand applied to visibility checks.
    pub root_margin: String,
    /// Milliseconds per typed character.
    pub typing_interval_ms: u64,
    /// Number of increments a counter takes to reach its target.
    pub counter_steps: u32,
    pub viewport: ViewportConfig,
    pub scroll: ScrollConfig,
    /// Resize events injected during the run (exercises debouncing).
    pub resizes: Vec<ResizeEvent>,
    pub page: Vec<PageElement>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrollConfig {
    /// Peak scroll offset reached by the script.
    pub distance_px: f64,
    /// Total scripted duration in milliseconds.
    pub duration_ms: u64,
    /// Scroll back to the top over the second half of the run.
    pub return_to_top: bool,
    /// Uniform per-frame jitter amplitude (0 disables).
    pub jitter_px: f64,
    /// Seed for the jitter stream.
    pub seed: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResizeEvent {
    /// When the event fires, milliseconds from run start.
    pub at_ms: u64,
    pub width: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageElement {
    pub name: String,
    pub kind: ElementKind,
    /// Top edge in document coordinates.
    pub top: f64,
    pub height: f64,
    #[serde(default = "default_element_width")]
    pub width: f64,
    /// Counter target (counter elements only).
    #[serde(default)]
    pub target: u64,
    /// Text to type (typing elements only).
    #[serde(default)]
    pub text: String,
}

fn default_element_width() -> f64 {
    600.0
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
        }
    }
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            distance_px: 3000.0,
            duration_ms: 4000,
            return_to_top: true,
            jitter_px: 0.0,
            seed: 7,
        }
    }
}

impl Default for CadenceConfig {
    fn default() -> Self {
        Self {
            frame_ms: 16,
            throttle_ms: 16,
            debounce_ms: 250,
            threshold: 0.1,
            root_margin: "0px 0px -50px 0px".to_string(),
            typing_interval_ms: 100,
            counter_steps: 100,
            viewport: ViewportConfig::default(),
            scroll: ScrollConfig::default(),
            resizes: vec![
                ResizeEvent {
                    at_ms: 1000,
                    width: 1100.0,
                },
                ResizeEvent {
                    at_ms: 1040,
                    width: 900.0,
                },
                ResizeEvent {
                    at_ms: 1080,
                    width: 768.0,
                },
            ],
            page: default_page(),
        }
    }
}

fn default_page() -> Vec<PageElement> {
    let section = |name: &str, top: f64, height: f64| PageElement {
        name: name.to_string(),
        kind: ElementKind::Section,
        top,
        height,
        width: 1280.0,
        target: 0,
        text: String::new(),
    };
    let counter = |name: &str, top: f64, target: u64| PageElement {
        name: name.to_string(),
        kind: ElementKind::Counter,
        top,
        height: 120.0,
        width: 300.0,
        target,
        text: String::new(),
    };

    vec![
        section("hero", 0.0, 720.0),
        section("story", 800.0, 600.0),
        counter("counter-customers", 1500.0, 4800),
        counter("counter-brands", 1500.0, 120),
        counter("counter-years", 1500.0, 12),
        PageElement {
            name: "tagline".to_string(),
            kind: ElementKind::Typing,
            top: 2100.0,
            height: 80.0,
            width: 900.0,
            target: 0,
            text: "Crafted for the modern skyline".to_string(),
        },
        section("gallery", 2600.0, 700.0),
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    /// Count-up statistic, triggered one-shot.
    Counter,
    /// Typewriter text, triggered one-shot.
    Typing,
    /// Fade-in section, triggered repeatably.
    Section,
}

impl CadenceConfig {
    /// Load configuration.
    ///
    /// With an explicit path the file must exist; otherwise
    /// `cadence.toml` is used when present and defaults apply when not.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Self::from_file(default_path)?
                } else {
                    debug!("no config file, using defaults");
                    Self::default()
                }
            }
        };
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: Self = toml::from_str(&raw)
            .with_context(|| format!("parsing config {}", path.display()))?;
        debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(1..=1000).contains(&self.frame_ms) {
            bail!("frame_ms must be in 1..=1000, got {}", self.frame_ms);
        }
        if self.throttle_ms == 0 || self.debounce_ms == 0 {
            bail!("throttle_ms and debounce_ms must be non-zero");
        }
        if !(0.0..=1.0).contains(&self.threshold) {
            bail!("threshold must be in 0.0..=1.0, got {}", self.threshold);
        }
        Margin::parse(&self.root_margin)
            .with_context(|| format!("root_margin {:?}", self.root_margin))?;
        if self.counter_steps == 0 {
            bail!("counter_steps must be at least 1");
        }
        if self.typing_interval_ms == 0 {
            bail!("typing_interval_ms must be non-zero");
        }
        if self.scroll.duration_ms == 0 {
            bail!("scroll.duration_ms must be non-zero");
        }
        if self.viewport.width <= 0.0 || self.viewport.height <= 0.0 {
            bail!("viewport dimensions must be positive");
        }
        if self.scroll.jitter_px < 0.0 {
            bail!("scroll.jitter_px must not be negative");
        }
        Ok(())
    }
}

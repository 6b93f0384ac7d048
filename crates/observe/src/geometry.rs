//! Rectangles, margins and visible-fraction math

use crate::ObserveError;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in document coordinates (y grows downward).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn area(&self) -> f64 {
        self.width.max(0.0) * self.height.max(0.0)
    }

    /// Intersection area with `other` (zero when disjoint).
    pub fn intersection_area(&self, other: &Rect) -> f64 {
        let left = self.x.max(other.x);
        let right = (self.x + self.width).min(other.x + other.width);
        let top = self.y.max(other.y);
        let bottom = (self.y + self.height).min(other.y + other.height);

        (right - left).max(0.0) * (bottom - top).max(0.0)
    }

    /// Fraction of this rect covered by `root`, in [0, 1].
    ///
    /// Zero-area rects are never considered visible.
    pub fn visible_fraction(&self, root: &Rect) -> f64 {
        let area = self.area();
        if area == 0.0 {
            return 0.0;
        }
        (self.intersection_area(root) / area).clamp(0.0, 1.0)
    }

    /// Grow (positive margins) or shrink (negative margins) on each side.
    pub fn expand(&self, margin: &Margin) -> Rect {
        Rect {
            x: self.x - margin.left,
            y: self.y - margin.top,
            width: self.width + margin.left + margin.right,
            height: self.height + margin.top + margin.bottom,
        }
    }
}

/// Per-side pixel margins applied to the observation root.
///
/// Matches the CSS margin shorthand the host API uses: negative values
/// shrink the root, so `"0px 0px -50px 0px"` requires an element to be 50px
/// past the bottom edge before it counts as visible.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Margin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Margin {
    pub const ZERO: Margin = Margin {
        top: 0.0,
        right: 0.0,
        bottom: 0.0,
        left: 0.0,
    };

    /// Parse a CSS-style margin shorthand: 1, 2 or 4 px values.
    ///
    /// `"10px"`, `"0px -50px"`, `"0px 0px -50px 0px"`. Only the `px` unit
    /// is supported.
    pub fn parse(s: &str) -> Result<Margin, ObserveError> {
        let invalid = |why| ObserveError::InvalidMargin(s.to_string(), why);

        let values: Vec<f64> = s
            .split_whitespace()
            .map(|part| {
                let number = part
                    .strip_suffix("px")
                    .ok_or_else(|| invalid("missing px unit"))?;
                number
                    .parse::<f64>()
                    .map_err(|_| invalid("not a number"))
            })
            .collect::<Result<_, _>>()?;

        match values[..] {
            [all] => Ok(Margin {
                top: all,
                right: all,
                bottom: all,
                left: all,
            }),
            [vertical, horizontal] => Ok(Margin {
                top: vertical,
                right: horizontal,
                bottom: vertical,
                left: horizontal,
            }),
            [top, right, bottom, left] => Ok(Margin {
                top,
                right,
                bottom,
                left,
            }),
            _ => Err(invalid("expected 1, 2 or 4 values")),
        }
    }
}

#![forbid(unsafe_code)]

//! Left/right anchoring for filter popup content.
//!
//! A filter trigger (the button showing the filter label) opens a popup whose
//! content may be wider than the trigger. [`resolve`] decides which edge of
//! the content lines up with the trigger so the popup stays inside the
//! viewport, and whether the content must be stretched to at least the
//! trigger's width.
//!
//! # Decision Rule
//!
//! ```text
//! distance_to_right = viewport_width - trigger_right_edge
//! overflow          = content_width  - trigger_width
//!
//! anchor    = Right  if distance_to_right > overflow   (strict)
//!             Left   otherwise
//! min_width = trigger_width  if content_width < trigger_width
//! ```
//!
//! Right anchoring is preferred; a tie falls back to Left.
//!
//! # Offsets
//!
//! The configured offset is applied to the margin opposite the anchor:
//! a Right anchor produces `left: offset`, a Left anchor `right: offset`.
//!
//! # Failure Modes
//!
//! | Condition | Behavior |
//! |-----------|----------|
//! | Trigger or content not yet measured | Neutral result, empty style |
//! | Any non-finite input (NaN, ±inf) | Neutral result, empty style |
//!
//! # Example
//!
//! ```
//! use filterkit_layout::{Anchor, PlacementQuery, resolve};
//!
//! let query = PlacementQuery {
//!     trigger_right_edge: 900.0,
//!     viewport_width: 1000.0,
//!     trigger_width: 80.0,
//!     content_width: 50.0,
//!     offset: 10.0,
//! };
//! let result = resolve(&query);
//! assert_eq!(result.anchor, Some(Anchor::Right));
//! assert_eq!(result.style().left, Some(10.0));
//! ```

use serde::{Deserialize, Serialize};

/// Which side of the trigger the popup content's edge aligns to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Anchor {
    /// Content's left edge aligns to the trigger; content grows rightwards
    /// from the right margin offset.
    Left,
    /// Content's right edge aligns to the trigger.
    Right,
}

impl Anchor {
    /// Stable lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

/// Measured geometry of the trigger element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriggerGeometry {
    /// Right edge of the trigger in viewport coordinates.
    pub right_edge: f64,
    /// Rendered width of the trigger.
    pub width: f64,
}

/// Layout measurements consumed by [`resolve`]. All values are pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacementQuery {
    /// Right edge of the trigger in viewport coordinates.
    pub trigger_right_edge: f64,
    /// Width of the viewport.
    pub viewport_width: f64,
    /// Rendered width of the trigger.
    pub trigger_width: f64,
    /// Rendered width of the popup content.
    pub content_width: f64,
    /// Distance the popup is nudged away from the trigger.
    pub offset: f64,
}

impl PlacementQuery {
    /// Build a query from possibly-missing measurements.
    ///
    /// Returns `None` until both the trigger and the content have been
    /// measured, which callers pass on to [`resolve_or_neutral`].
    #[must_use]
    pub fn measure(
        trigger: Option<TriggerGeometry>,
        content_width: Option<f64>,
        viewport_width: f64,
        offset: f64,
    ) -> Option<Self> {
        let trigger = trigger?;
        let content_width = content_width?;
        Some(Self {
            trigger_right_edge: trigger.right_edge,
            viewport_width,
            trigger_width: trigger.width,
            content_width,
            offset,
        })
    }

    /// Space between the trigger's right edge and the viewport's right edge.
    #[must_use]
    pub fn distance_to_right(&self) -> f64 {
        self.viewport_width - self.trigger_right_edge
    }

    /// How far the content would extend past the trigger if right anchored.
    /// Negative when the content is narrower than the trigger.
    #[must_use]
    pub fn overflow_if_right_anchored(&self) -> f64 {
        self.content_width - self.trigger_width
    }

    fn is_finite(&self) -> bool {
        [
            self.trigger_right_edge,
            self.viewport_width,
            self.trigger_width,
            self.content_width,
            self.offset,
        ]
        .iter()
        .all(|v| v.is_finite())
    }
}

/// Outcome of [`resolve`].
///
/// The neutral result (`anchor == None`) means "use the default layout".
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacementResult {
    /// Chosen anchor, or `None` when geometry was unavailable.
    pub anchor: Option<Anchor>,
    /// Minimum content width, present only when the content is narrower
    /// than the trigger.
    pub min_width: Option<f64>,
    /// Offset to apply on the margin opposite the anchor.
    pub offset: f64,
}

impl PlacementResult {
    /// Result used when geometry is unavailable.
    pub const NEUTRAL: Self = Self {
        anchor: None,
        min_width: None,
        offset: 0.0,
    };

    /// Whether this is the neutral result.
    #[must_use]
    pub fn is_neutral(&self) -> bool {
        self.anchor.is_none()
    }

    /// Style directive for the rendering layer.
    #[must_use]
    pub fn style(&self) -> PositionStyle {
        match self.anchor {
            None => PositionStyle::default(),
            Some(Anchor::Right) => PositionStyle {
                left: Some(self.offset),
                right: None,
                min_width: self.min_width,
            },
            Some(Anchor::Left) => PositionStyle {
                left: None,
                right: Some(self.offset),
                min_width: self.min_width,
            },
        }
    }
}

/// Positioning style for popup content.
///
/// Serializes with only the present keys, e.g. `{"left":10.0}` or
/// `{"right":10.0,"minWidth":80.0}`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_width: Option<f64>,
}

impl PositionStyle {
    /// True when no property is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.left.is_none() && self.right.is_none() && self.min_width.is_none()
    }
}

/// Decide anchoring and minimum width for popup content.
#[must_use]
pub fn resolve(query: &PlacementQuery) -> PlacementResult {
    if !query.is_finite() {
        return PlacementResult::NEUTRAL;
    }

    let anchor = if query.distance_to_right() > query.overflow_if_right_anchored() {
        Anchor::Right
    } else {
        Anchor::Left
    };

    let min_width = (query.content_width < query.trigger_width).then_some(query.trigger_width);

    PlacementResult {
        anchor: Some(anchor),
        min_width,
        offset: query.offset,
    }
}

/// [`resolve`] for a query that may not exist yet.
#[must_use]
pub fn resolve_or_neutral(query: Option<&PlacementQuery>) -> PlacementResult {
    query.map_or(PlacementResult::NEUTRAL, resolve)
}

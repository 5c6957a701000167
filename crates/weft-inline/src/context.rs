//! The area and shared state a layout call runs against.
//!
//! [§ 9.4.2 Inline formatting contexts](https://www.w3.org/TR/CSS2/visuren.html#inline-formatting)
//!
//! "In an inline formatting context, boxes are laid out horizontally, one
//! after the other, beginning at the top of a containing block."

use serde::Serialize;
use strum_macros::{Display, EnumString};

use crate::float::FloatObstacleTracker;
use crate::geometry::Rect;

/// [CSS Overflow Level 3 § 3](https://www.w3.org/TR/css-overflow-3/#overflow-properties)
///
/// How content wider than its area is handled when it cannot be broken at
/// an ordinary opportunity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, Serialize)]
#[strum(serialize_all = "kebab-case")]
pub enum OverflowPolicy {
    /// Content must fit: unbreakable words are broken between characters.
    #[default]
    Fit,
    /// Content may overflow: unbreakable words are kept whole.
    Visible,
}

/// The rectangle available to a layout call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LayoutArea {
    /// Content rectangle; `y` is the top of the first line.
    pub rect: Rect,
    /// The height was clipped by an ancestor: content taller than `rect`
    /// is clipped rather than refused.
    pub clipped_height: bool,
}

impl LayoutArea {
    /// An unclipped area.
    #[must_use]
    pub const fn new(rect: Rect) -> Self {
        Self {
            rect,
            clipped_height: false,
        }
    }
}

/// Everything a line layout call reads, plus the float list it may extend.
#[derive(Debug)]
pub struct LayoutContext<'a> {
    /// Area for this line.
    pub area: LayoutArea,
    /// Floats placed so far in this pass.
    pub floats: &'a mut FloatObstacleTracker,
    /// [§ 7.1 text-indent](https://www.w3.org/TR/css-text-3/#text-indent-property)
    ///
    /// Indentation of this line; callers pass it for the first line of a
    /// paragraph and zero afterwards.
    pub text_indent: f32,
    /// Place at least one unit of content even if it overflows the area.
    pub forced_placement: bool,
}

impl<'a> LayoutContext<'a> {
    /// A context with no indent and no forced placement.
    #[must_use]
    pub const fn new(area: LayoutArea, floats: &'a mut FloatObstacleTracker) -> Self {
        Self {
            area,
            floats,
            text_indent: 0.0,
            forced_placement: false,
        }
    }

    /// Set the text indent.
    #[must_use]
    pub const fn with_text_indent(mut self, indent: f32) -> Self {
        self.text_indent = indent;
        self
    }

    /// Set forced placement.
    #[must_use]
    pub const fn with_forced_placement(mut self, forced: bool) -> Self {
        self.forced_placement = forced;
        self
    }
}

//! Rectangles and tolerance comparisons.
//!
//! [CSS Box Model Module Level 3](https://www.w3.org/TR/css-box-3/)
//!
//! The engine never performs margin/border/padding arithmetic; every
//! rectangle it receives is already a content area. Coordinates grow to the
//! right and downward.

use serde::Serialize;

/// Tolerance used for every width/height fit test.
pub const EPSILON: f32 = 1e-4;

/// Returns `true` if `value` is not larger than `limit` within [`EPSILON`].
#[must_use]
pub fn fits_within(value: f32, limit: f32) -> bool {
    value <= limit + EPSILON
}

/// A rectangle positioned in 2D space.
///
/// [§ 3 The CSS Box Model](https://www.w3.org/TR/css-box-3/#box-model)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Rect {
    /// Horizontal position of the top-left corner.
    pub x: f32,
    /// Vertical position of the top-left corner.
    pub y: f32,
    /// Width of the rectangle.
    pub width: f32,
    /// Height of the rectangle.
    pub height: f32,
}

impl Rect {
    /// Create a rectangle from its top-left corner and size.
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The x coordinate of the right edge.
    #[must_use]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// The y coordinate of the bottom edge.
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Returns `true` if the vertical extent of this rectangle overlaps the
    /// band `[top, top + height)`. A zero-height band is the single edge at
    /// `top`, which overlaps when `self.y <= top < self.bottom()`.
    #[must_use]
    pub fn overlaps_band(&self, top: f32, height: f32) -> bool {
        if height <= 0.0 {
            self.y <= top && self.bottom() > top
        } else {
            self.y < top + height && self.bottom() > top
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_height_band_is_top_edge() {
        let r = Rect::new(0.0, 10.0, 5.0, 10.0);
        assert!(r.overlaps_band(10.0, 0.0));
        assert!(r.overlaps_band(19.0, 0.0));
        assert!(!r.overlaps_band(20.0, 0.0));
        assert!(!r.overlaps_band(9.0, 0.0));
        assert!(r.overlaps_band(5.0, 6.0));
        assert!(!r.overlaps_band(5.0, 5.0));
    }

    #[test]
    fn test_fits_within_tolerance() {
        assert!(fits_within(10.00001, 10.0));
        assert!(!fits_within(10.1, 10.0));
    }
}

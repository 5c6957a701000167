//! Float obstacles shared between lines.
//!
//! [§ 9.5 Floats](https://www.w3.org/TR/CSS2/visuren.html#floats)
//!
//! "A float is a box that is shifted to the left or right on the current line.
//! The most interesting characteristic of a float is that content may flow along
//! its side (or be prohibited from doing so by the 'clear' property)."
//!
//! The tracker is owned by whoever drives a sequence of layout calls and is
//! lent to each call through the
//! [`LayoutContext`](crate::context::LayoutContext). Entries are appended as
//! floats are placed and are only removed by
//! [`FloatObstacleTracker::reclaim_below`].

use serde::Serialize;
use strum_macros::{Display, EnumString};

use crate::geometry::Rect;

/// [§ 9.5 Floats](https://www.w3.org/TR/CSS2/visuren.html#floats)
///
/// "left: The element generates a block box that is floated to the left.
///
/// right: The element generates a block box that is floated to the right."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize)]
#[strum(serialize_all = "kebab-case")]
pub enum FloatSide {
    /// Floated to the left.
    Left,
    /// Floated to the right.
    Right,
}

/// [§ 9.5.2 Controlling flow next to floats: the 'clear' property](https://www.w3.org/TR/CSS2/visuren.html#flow-control)
///
/// "This property indicates which sides of an element's box(es) may not
/// be adjacent to an earlier floating box."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize)]
#[strum(serialize_all = "kebab-case")]
pub enum ClearSide {
    /// "Requires the top border edge be below any left-floating boxes."
    Left,
    /// "Requires the top border edge be below any right-floating boxes."
    Right,
    /// "Requires the top border edge be below any floating boxes."
    Both,
}

/// A placed float: its margin box and side.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FloatObstacle {
    /// Which side the float is on.
    pub side: FloatSide,
    /// The margin box of the float (absolute coordinates).
    pub rect: Rect,
}

/// Horizontal space taken from a line box by floats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Exclusions {
    /// Width excluded at the left edge.
    pub left: f32,
    /// Width excluded at the right edge.
    pub right: f32,
}

impl Exclusions {
    /// Total excluded width.
    #[must_use]
    pub fn total(&self) -> f32 {
        self.left + self.right
    }
}

/// Append-only list of float obstacles for one layout pass.
///
/// "Since a float is not in the flow, non-positioned block boxes created
/// before and after the float box flow vertically as if the float did not
/// exist. However, the current and subsequent line boxes created next to
/// the float are shortened as necessary to make room for the margin box
/// of the float."
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FloatObstacleTracker {
    obstacles: Vec<FloatObstacle>,
}

impl FloatObstacleTracker {
    /// Create an empty tracker.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            obstacles: Vec::new(),
        }
    }

    /// Placed obstacles in insertion order.
    #[must_use]
    pub fn obstacles(&self) -> &[FloatObstacle] {
        &self.obstacles
    }

    /// Returns true if no floats have been placed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    /// Append an obstacle.
    ///
    /// [§ 9.5.1 Rule 5](https://www.w3.org/TR/CSS2/visuren.html#float-position)
    ///
    /// "The outer top of a floating box may not be higher than the outer top
    /// of any block or floated box generated by an element earlier in the
    /// source document."
    ///
    /// The top is clamped so insertion order stays monotonic in y. Returns
    /// the rectangle actually recorded.
    pub fn add(&mut self, side: FloatSide, rect: Rect) -> Rect {
        let mut rect = rect;
        if let Some(last) = self.obstacles.last() {
            rect.y = rect.y.max(last.rect.y);
        }
        self.obstacles.push(FloatObstacle { side, rect });
        rect
    }

    /// Left/right exclusions inside `area` for the band `[top, top + height)`.
    /// With `height == 0` only obstacles overlapping the top edge count.
    #[must_use]
    pub fn exclusions(&self, area: &Rect, top: f32, height: f32) -> Exclusions {
        let (left_offset, width) = self.available_width_at(area, top, height);
        Exclusions {
            left: left_offset - area.x,
            right: (area.right() - (left_offset + width)).max(0.0),
        }
    }

    /// [§ 9.5 Floats](https://www.w3.org/TR/CSS2/visuren.html#floats)
    ///
    /// "The current and subsequent line boxes created next to the float are
    /// shortened as necessary to make room for the margin box of the float."
    ///
    /// Returns `(left_edge, available_width)` in absolute coordinates for
    /// content inside `area` at the band starting at `y`.
    #[must_use]
    pub fn available_width_at(&self, area: &Rect, y: f32, height: f32) -> (f32, f32) {
        // STEP 1: Find the rightmost right-edge of active left floats.
        let mut left_edge = area.x;
        // STEP 2: Find the leftmost left-edge of active right floats.
        let mut right_edge = area.right();

        for f in self.obstacles.iter().filter(|f| f.rect.overlaps_band(y, height)) {
            match f.side {
                FloatSide::Left => left_edge = left_edge.max(f.rect.right()),
                FloatSide::Right => right_edge = right_edge.min(f.rect.x),
            }
        }

        // STEP 3: Return (left_edge, available_width).
        let left_edge = left_edge.min(area.right());
        (left_edge, (right_edge - left_edge).max(0.0))
    }

    /// [§ 9.5.1 Positioning the float: the 'float' property](https://www.w3.org/TR/CSS2/visuren.html#float-position)
    ///
    /// Place a float of the given size inside `area`, as high as possible at
    /// or below `current_y`, and record it.
    ///
    /// - Rule 1: Float cannot extend past containing block edges.
    /// - Rules 4, 5, 8: Float is placed as high as possible (at or below `current_y`).
    /// - Rule 9: Left floats go as far left as possible; right floats as far right.
    /// - Rules 2, 3, 7: Floats do not overlap each other.
    pub fn place_float(
        &mut self,
        area: &Rect,
        side: FloatSide,
        width: f32,
        height: f32,
        current_y: f32,
    ) -> Rect {
        // STEP 1: Start at the highest allowed position.
        // "A floating box must be placed as high as possible."
        let mut y = current_y.max(area.y);
        if let Some(last) = self.obstacles.last() {
            y = y.max(last.rect.y);
        }

        // STEP 2: Scan downward until the float fits, jumping from one float
        // bottom edge to the next.
        loop {
            let (left_edge, available) = self.available_width_at(area, y, height);
            let next_y = self.next_float_bottom_after(y);
            if available >= width || available >= area.width || next_y <= y {
                // STEP 3: Place the float.
                // "A left-floating box must be put as far to the left as
                // possible, a right-floating box as far to the right as
                // possible."
                let x = match side {
                    FloatSide::Left => left_edge,
                    FloatSide::Right => (left_edge + available - width).max(area.x),
                };
                return self.add(side, Rect::new(x, y, width, height));
            }
            y = next_y;
        }
    }

    /// [§ 9.5.2 Controlling flow next to floats: the 'clear' property](https://www.w3.org/TR/CSS2/visuren.html#flow-control)
    ///
    /// Returns the y position below every float on the cleared side(s),
    /// never above `current_y`.
    #[must_use]
    pub fn clear(&self, clear_side: ClearSide, current_y: f32) -> f32 {
        self.obstacles
            .iter()
            .filter(|f| match clear_side {
                ClearSide::Left => f.side == FloatSide::Left,
                ClearSide::Right => f.side == FloatSide::Right,
                ClearSide::Both => true,
            })
            .map(|f| f.rect.bottom())
            .fold(current_y, f32::max)
    }

    /// [§ 10.6.7](https://www.w3.org/TR/CSS2/visudet.html#root-height)
    ///
    /// "If the element has any floating descendants whose bottom margin edge
    /// is below the element's bottom content edge, then the height is
    /// increased to include those edges."
    #[must_use]
    pub fn max_float_bottom(&self) -> f32 {
        self.obstacles
            .iter()
            .map(|f| f.rect.bottom())
            .fold(0.0_f32, f32::max)
    }

    /// Find the smallest float bottom edge that is strictly greater than `y`,
    /// or `y` itself when there is none.
    #[must_use]
    pub fn next_float_bottom_after(&self, y: f32) -> f32 {
        self.obstacles
            .iter()
            .map(|f| f.rect.bottom())
            .filter(|&bottom| bottom > y)
            .reduce(f32::min)
            .unwrap_or(y)
    }

    /// Forget every float recorded after the first `len`. Used to undo the
    /// floats of a line that ends up placing nothing.
    pub(crate) fn truncate(&mut self, len: usize) {
        self.obstacles.truncate(len);
    }

    /// Drop the floats that start at or below `bottom_edge`. Called when an
    /// owning box finishes short of the floats it had placed (their content
    /// moves to the next area).
    pub fn reclaim_below(&mut self, bottom_edge: f32) {
        self.obstacles.retain(|f| f.rect.y < bottom_edge);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn area() -> Rect {
        Rect::new(0.0, 0.0, 200.0, 500.0)
    }

    #[test]
    fn test_exclusions_from_both_sides() {
        let mut floats = FloatObstacleTracker::new();
        let _ = floats.add(FloatSide::Left, Rect::new(0.0, 0.0, 30.0, 40.0));
        let _ = floats.add(FloatSide::Right, Rect::new(180.0, 0.0, 20.0, 40.0));

        let ex = floats.exclusions(&area(), 10.0, 0.0);
        assert!((ex.left - 30.0).abs() < 1e-5);
        assert!((ex.right - 20.0).abs() < 1e-5);

        // Below the floats nothing is excluded.
        let ex = floats.exclusions(&area(), 40.0, 0.0);
        assert!(ex.total().abs() < 1e-5);
    }

    #[test]
    fn test_place_float_stacks_horizontally_then_drops() {
        let mut floats = FloatObstacleTracker::new();
        let a = floats.place_float(&area(), FloatSide::Left, 120.0, 50.0, 0.0);
        let b = floats.place_float(&area(), FloatSide::Left, 60.0, 20.0, 0.0);
        assert!((b.x - 120.0).abs() < 1e-5);
        assert!(b.y.abs() < 1e-5);

        // Too wide beside `a` and `b`, and still too wide beside `a` alone:
        // drops below `a`.
        let c = floats.place_float(&area(), FloatSide::Right, 100.0, 10.0, 0.0);
        assert!(c.y >= a.bottom() - 1e-5);
        assert!((c.right() - 200.0).abs() < 1e-5);
    }

    #[test]
    fn test_insertion_is_monotonic_in_top() {
        let mut floats = FloatObstacleTracker::new();
        let _ = floats.add(FloatSide::Left, Rect::new(0.0, 50.0, 10.0, 10.0));
        let placed = floats.add(FloatSide::Right, Rect::new(190.0, 20.0, 10.0, 10.0));
        assert!((placed.y - 50.0).abs() < 1e-5);
    }

    #[test]
    fn test_clear_and_reclaim() {
        let mut floats = FloatObstacleTracker::new();
        let _ = floats.add(FloatSide::Left, Rect::new(0.0, 0.0, 10.0, 30.0));
        let _ = floats.add(FloatSide::Right, Rect::new(190.0, 100.0, 10.0, 30.0));
        assert!((floats.clear(ClearSide::Left, 5.0) - 30.0).abs() < 1e-5);
        assert!((floats.clear(ClearSide::Both, 5.0) - 130.0).abs() < 1e-5);
        assert!((floats.max_float_bottom() - 130.0).abs() < 1e-5);

        floats.reclaim_below(80.0);
        assert_eq!(floats.obstacles().len(), 1);
        assert_eq!(floats.obstacles()[0].side, FloatSide::Left);
    }
}

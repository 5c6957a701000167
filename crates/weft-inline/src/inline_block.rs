//! Atomic inline boxes and floats.
//!
//! [§ 9.2.2 Inline-level elements and inline boxes](https://www.w3.org/TR/CSS2/visuren.html#inline-boxes)
//!
//! "Inline-level boxes that are not inline boxes (such as replaced
//! inline-level elements, inline-block elements, and inline-table elements)
//! are called atomic inline-level boxes because they participate in their
//! inline formatting context as a single opaque box."
//!
//! The engine never looks inside an atomic box. It hands the box an area
//! through [`BoxLayout`] and places whatever rectangle comes back.

use std::fmt;
use std::rc::Rc;

use serde::Serialize;

use crate::context::LayoutArea;
use crate::float::FloatSide;
use crate::geometry::fits_within;
use crate::properties::Properties;
use crate::result::LayoutStatus;
use crate::width::MinMaxWidth;

/// What a box reports after laying itself out.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoxLayoutResult {
    /// How much of the box fit.
    pub status: LayoutStatus,
    /// Occupied width, margins included.
    pub width: f32,
    /// Occupied height, margins included.
    pub height: f32,
    /// Distance from the box top to its baseline.
    ///
    /// [§ 10.8.1](https://www.w3.org/TR/CSS2/visudet.html#leading)
    ///
    /// "The baseline of an 'inline-block' is the baseline of its last line
    /// box in the normal flow, unless it has either no in-flow line boxes
    /// or if its 'overflow' property has a computed value other than
    /// 'visible', in which case the baseline is the bottom margin edge."
    pub baseline: f32,
}

/// Layout contract for atomic inline content and floats.
pub trait BoxLayout {
    /// Lay the box out in `area`.
    fn layout(&self, area: &LayoutArea) -> BoxLayoutResult;

    /// Min-content and max-content widths of the box.
    fn min_max_width(&self) -> MinMaxWidth;
}

/// A box of fixed size, like a replaced element with known dimensions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedSizeBox {
    /// Width.
    pub width: f32,
    /// Height.
    pub height: f32,
    /// Baseline from the top; the bottom edge when `None`.
    pub baseline: Option<f32>,
}

impl FixedSizeBox {
    /// A box whose baseline is its bottom edge.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            baseline: None,
        }
    }
}

impl BoxLayout for FixedSizeBox {
    fn layout(&self, area: &LayoutArea) -> BoxLayoutResult {
        let fits = fits_within(self.width, area.rect.width)
            && (area.clipped_height || fits_within(self.height, area.rect.height));
        BoxLayoutResult {
            status: if fits {
                LayoutStatus::Full
            } else {
                LayoutStatus::Nothing
            },
            width: self.width,
            height: self.height,
            baseline: self.baseline.unwrap_or(self.height),
        }
    }

    fn min_max_width(&self) -> MinMaxWidth {
        MinMaxWidth {
            min: self.width,
            max: self.width,
        }
    }
}

/// An inline-block (or other atomic inline) in the inline sequence.
#[derive(Clone)]
pub struct InlineBlock {
    content: Rc<dyn BoxLayout>,
    properties: Rc<Properties>,
}

impl InlineBlock {
    /// Wrap box content as an inline item.
    #[must_use]
    pub fn new(content: Rc<dyn BoxLayout>, properties: Properties) -> Self {
        Self {
            content,
            properties: Rc::new(properties),
        }
    }

    /// The box's properties.
    #[must_use]
    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    /// The box content.
    #[must_use]
    pub fn content(&self) -> &dyn BoxLayout {
        self.content.as_ref()
    }
}

impl fmt::Debug for InlineBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InlineBlock")
            .field("min_max_width", &self.content.min_max_width())
            .finish_non_exhaustive()
    }
}

/// [§ 9.5 Floats](https://www.w3.org/TR/CSS2/visuren.html#floats)
///
/// "A float is a box that is shifted to the left or right on the current
/// line."
#[derive(Clone)]
pub struct FloatItem {
    side: FloatSide,
    content: Rc<dyn BoxLayout>,
    properties: Rc<Properties>,
}

impl FloatItem {
    /// A float on `side`.
    #[must_use]
    pub fn new(side: FloatSide, content: Rc<dyn BoxLayout>, properties: Properties) -> Self {
        Self {
            side,
            content,
            properties: Rc::new(properties),
        }
    }

    /// Which side the float hugs.
    #[must_use]
    pub const fn side(&self) -> FloatSide {
        self.side
    }

    /// The float's properties.
    #[must_use]
    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    /// The float content.
    #[must_use]
    pub fn content(&self) -> &dyn BoxLayout {
        self.content.as_ref()
    }
}

impl fmt::Debug for FloatItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FloatItem")
            .field("side", &self.side)
            .field("min_max_width", &self.content.min_max_width())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;

    #[test]
    fn test_fixed_box_refuses_narrow_area() {
        let area = LayoutArea::new(Rect::new(0.0, 0.0, 20.0, 100.0));
        let result = FixedSizeBox::new(30.0, 10.0).layout(&area);
        assert_eq!(result.status, LayoutStatus::Nothing);
        assert_eq!(result.baseline, 10.0);

        let area = LayoutArea::new(Rect::new(0.0, 0.0, 30.0, 100.0));
        assert_eq!(FixedSizeBox::new(30.0, 10.0).layout(&area).status, LayoutStatus::Full);
    }

    #[test]
    fn test_clipped_area_accepts_tall_box() {
        let mut area = LayoutArea::new(Rect::new(0.0, 0.0, 50.0, 5.0));
        assert_eq!(FixedSizeBox::new(10.0, 10.0).layout(&area).status, LayoutStatus::Nothing);
        area.clipped_height = true;
        assert_eq!(FixedSizeBox::new(10.0, 10.0).layout(&area).status, LayoutStatus::Full);
    }
}

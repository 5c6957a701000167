//! Line boxes and the items placed on them.
//!
//! [§ 9.4.2 Inline formatting contexts](https://www.w3.org/TR/CSS2/visuren.html#inline-formatting)
//!
//! "The rectangular area that contains the boxes that form a line is called
//! a line box."
//!
//! All rectangles are in the coordinate space of the layout area, y down.
//! The baseline of a line sits `ascent` below its top edge.

use serde::Serialize;

use crate::geometry::Rect;
use crate::item::InlineItem;
use crate::result::LayoutStatus;
use crate::shaping::Glyph;

/// An inline item with the geometry layout assigned to it.
#[derive(Debug, Clone)]
pub struct PlacedItem {
    /// The placed item. Text items hold only the window that fit.
    pub item: InlineItem,
    /// Occupied rectangle.
    pub rect: Rect,
    /// Height above the baseline.
    pub ascent: f32,
    /// Depth below the baseline (≤ 0).
    pub descent: f32,
    /// Trailing whitespace glyphs excluded from rendering and width.
    pub trimmed_glyphs: usize,
    /// Glyphs render right to left.
    pub reversed: bool,
    /// Bidi embedding level.
    pub bidi_level: u8,
    /// Extra space after every grapheme cluster (justification).
    pub char_spacing: f32,
    /// Extra space after every word space (justification).
    pub word_spacing: f32,
}

impl PlacedItem {
    /// A freshly placed item with no spacing, trimming, or reordering.
    #[must_use]
    pub const fn new(item: InlineItem, rect: Rect, ascent: f32, descent: f32) -> Self {
        Self {
            item,
            rect,
            ascent,
            descent,
            trimmed_glyphs: 0,
            reversed: false,
            bidi_level: 0,
            char_spacing: 0.0,
            word_spacing: 0.0,
        }
    }

    /// Glyphs that render, trailing trimmed whitespace excluded.
    #[must_use]
    pub fn visible_glyphs(&self) -> &[Glyph] {
        match &self.item {
            InlineItem::Text(run) => {
                let glyphs = run.glyphs();
                &glyphs[..glyphs.len().saturating_sub(self.trimmed_glyphs)]
            }
            _ => &[],
        }
    }

    /// Rendered text in logical order.
    #[must_use]
    pub fn text(&self) -> Option<String> {
        self.item
            .as_text()
            .map(|_| self.visible_glyphs().iter().map(|g| g.ch).collect())
    }

    /// Snapshot of the geometry.
    #[must_use]
    pub fn geometry(&self) -> PlacedGeometry {
        let kind = match &self.item {
            InlineItem::Text(_) => ItemKind::Text,
            InlineItem::Tab(_) => ItemKind::Tab,
            InlineItem::InlineBlock(_) => ItemKind::InlineBlock,
            InlineItem::Float(_) => ItemKind::Float,
        };
        PlacedGeometry {
            kind,
            rect: self.rect,
            text: self.text(),
            reversed: self.reversed,
            bidi_level: self.bidi_level,
            char_spacing: self.char_spacing,
            word_spacing: self.word_spacing,
        }
    }
}

/// One laid-out line.
#[derive(Debug, Clone)]
pub struct Line {
    /// Occupied rectangle.
    pub rect: Rect,
    /// Max ascent over the placed items (≥ 0).
    pub ascent: f32,
    /// Min descent over the placed items (≤ 0).
    pub descent: f32,
    /// Items in visual order.
    pub items: Vec<PlacedItem>,
    /// Per-glyph bidi levels of the line's content in logical order, or
    /// `None` when the line is entirely left to right.
    pub bidi_levels: Option<Vec<u8>>,
    /// Status of the layout call that produced the line.
    pub status: LayoutStatus,
}

impl Line {
    /// Move the line and every item on it.
    pub fn translate(&mut self, dx: f32, dy: f32) {
        self.rect.x += dx;
        self.rect.y += dy;
        for placed in &mut self.items {
            placed.rect.x += dx;
            placed.rect.y += dy;
        }
    }

    /// Y of the baseline.
    #[must_use]
    pub fn baseline(&self) -> f32 {
        self.rect.y + self.ascent
    }

    /// Right edge of the rightmost in-flow item.
    #[must_use]
    pub fn content_right(&self) -> f32 {
        self.items
            .iter()
            .filter(|p| p.item.is_in_flow())
            .map(|p| p.rect.right())
            .fold(self.rect.x, f32::max)
    }

    /// Rendered text of all text items, in visual order.
    #[must_use]
    pub fn text(&self) -> String {
        self.items.iter().filter_map(PlacedItem::text).collect()
    }

    /// Serializable snapshot of the line.
    #[must_use]
    pub fn geometry(&self) -> LineGeometry {
        LineGeometry {
            rect: self.rect,
            ascent: self.ascent,
            descent: self.descent,
            status: self.status,
            items: self.items.iter().map(PlacedItem::geometry).collect(),
        }
    }
}

/// Kind of a placed item, for snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ItemKind {
    /// Text.
    Text,
    /// Tab.
    Tab,
    /// Atomic inline.
    InlineBlock,
    /// Float.
    Float,
}

/// Geometry of a placed item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedGeometry {
    /// Item kind.
    pub kind: ItemKind,
    /// Occupied rectangle.
    pub rect: Rect,
    /// Rendered text, for text items.
    pub text: Option<String>,
    /// Rendered right to left.
    pub reversed: bool,
    /// Bidi level.
    pub bidi_level: u8,
    /// Justification character spacing.
    pub char_spacing: f32,
    /// Justification word spacing.
    pub word_spacing: f32,
}

/// Geometry of a line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineGeometry {
    /// Occupied rectangle.
    pub rect: Rect,
    /// Ascent.
    pub ascent: f32,
    /// Descent.
    pub descent: f32,
    /// Status.
    pub status: LayoutStatus,
    /// Items in visual order.
    pub items: Vec<PlacedGeometry>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::properties::Properties;
    use crate::tab::TabItem;

    #[test]
    fn test_translate_moves_items_with_the_line() {
        let tab = InlineItem::Tab(TabItem::new(Properties::default()));
        let mut line = Line {
            rect: Rect::new(0.0, 0.0, 100.0, 10.0),
            ascent: 8.0,
            descent: -2.0,
            items: vec![PlacedItem::new(tab, Rect::new(5.0, 0.0, 20.0, 10.0), 8.0, -2.0)],
            bidi_levels: None,
            status: LayoutStatus::Full,
        };
        line.translate(3.0, 40.0);
        assert_eq!(line.rect.y, 40.0);
        assert_eq!(line.items[0].rect.x, 8.0);
        assert_eq!(line.items[0].rect.y, 40.0);
        assert_eq!(line.baseline(), 48.0);
        assert_eq!(line.content_right(), 28.0);
    }
}

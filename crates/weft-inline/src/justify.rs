//! Justification: spreading free space over word spaces and characters.
//!
//! [§ 7.3 Text Justification](https://www.w3.org/TR/css-text-3/#justify-property)
//!
//! "When justifying text, the user agent takes the remaining space between
//! the ends of a line's contents and the edges of its line box, and
//! distributes that space throughout its contents so that the contents
//! exactly fill the line box."
//!
//! The free space is split by a *spacing ratio*: with ratio `r`, `S` word
//! spaces and `C` grapheme clusters,
//!
//! ```text
//! base         = free / (r·S + (1 − r)·(C − 1))
//! word spacing = r·base
//! char spacing = (1 − r)·base
//! ```
//!
//! The last cluster of the line takes no character spacing, so the line's
//! end lands exactly on the target.

use crate::geometry::EPSILON;
use crate::item::InlineItem;
use crate::line::Line;
use crate::properties::DEFAULT_SPACING_RATIO;
use crate::segmentation::{base_character_count, is_breaking_space};

/// Distributes a line's free space.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Justifier {
    ratio: Option<f32>,
}

impl Justifier {
    /// A justifier that takes its ratio from the `spacing-ratio` property of
    /// the line's first text item.
    #[must_use]
    pub const fn new() -> Self {
        Self { ratio: None }
    }

    /// A justifier with a fixed ratio, clamped to `0..=1`.
    #[must_use]
    pub fn with_ratio(ratio: f32) -> Self {
        Self {
            ratio: Some(ratio.clamp(0.0, 1.0)),
        }
    }

    /// Stretch `line` to `target_width`.
    ///
    /// Does nothing if the line is already at least that wide or has
    /// nothing to stretch.
    pub fn justify(&self, line: &mut Line, target_width: f32) {
        let free = target_width - line.rect.width;
        if free <= EPSILON {
            return;
        }

        // STEP 1: Count stretch opportunities over the rendered text.
        let ratio = self.ratio.unwrap_or_else(|| {
            line.items
                .iter()
                .find(|p| matches!(p.item, InlineItem::Text(_)))
                .map_or(DEFAULT_SPACING_RATIO, |p| {
                    p.item.properties().spacing_ratio()
                })
        });
        let mut spaces = 0_usize;
        let mut clusters = 0_usize;
        for placed in &line.items {
            if let Some(text) = placed.text() {
                spaces += text.chars().filter(|&ch| is_breaking_space(ch)).count();
                clusters += base_character_count(&text);
            }
        }
        let denominator = ratio * spaces as f32 + (1.0 - ratio) * clusters.saturating_sub(1) as f32;
        if denominator <= EPSILON {
            return;
        }

        // STEP 2: Spacing values.
        let base = free / denominator;
        let word_spacing = ratio * base;
        let char_spacing = (1.0 - ratio) * base;

        // STEP 3: Widen text items and lay all in-flow items out again,
        // left to right and contiguous.
        let last_text = line
            .items
            .iter()
            .rposition(|p| p.item.is_in_flow() && p.item.as_text().is_some());
        let mut x = line.rect.x;
        for (i, placed) in line.items.iter_mut().enumerate() {
            if !placed.item.is_in_flow() {
                continue;
            }
            if let Some(text) = placed.text() {
                let item_spaces = text.chars().filter(|&ch| is_breaking_space(ch)).count();
                let mut item_clusters = base_character_count(&text);
                if Some(i) == last_text {
                    item_clusters = item_clusters.saturating_sub(1);
                }
                placed.word_spacing = word_spacing;
                placed.char_spacing = char_spacing;
                placed.rect.width +=
                    word_spacing * item_spaces as f32 + char_spacing * item_clusters as f32;
            }
            placed.rect.x = x;
            x += placed.rect.width;
        }
        line.rect.width = x - line.rect.x;
    }
}

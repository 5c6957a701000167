//! Min-content and max-content widths.
//!
//! [CSS Sizing Level 3 § 5.1 Intrinsic Sizes](https://www.w3.org/TR/css-sizing-3/#intrinsic-sizes)
//!
//! "min-content inline size: The narrowest inline size a box could take
//! that doesn't cause inline-axis overflow that could be avoided by
//! choosing a larger size."
//!
//! "max-content inline size: A box's ideal size in a given axis when given
//! infinite available space."
//!
//! Each item reports an [`IntrinsicContribution`]; the [`WidthAccumulator`]
//! joins adjacent contributions that have no break opportunity between
//! them, so two runs forming one word count as one unbreakable piece.

use serde::Serialize;

/// A min/max intrinsic width pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct MinMaxWidth {
    /// Min-content width.
    pub min: f32,
    /// Max-content width.
    pub max: f32,
}

/// What one inline item contributes to its line's intrinsic widths.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct IntrinsicContribution {
    /// Widest unbreakable piece inside the item.
    pub min: f32,
    /// Widest stretch without a forced break.
    pub max: f32,
    /// Width up to the first break opportunity (the whole item if none).
    pub head: f32,
    /// Width after the last break opportunity.
    pub tail: f32,
    /// Whether the item contains a break opportunity.
    pub breakable: bool,
    /// Whether a break is allowed right before the item.
    pub break_before: bool,
    /// Whether a break is allowed right after the item.
    pub break_after: bool,
    /// `(before first forced break, after last forced break)` widths, if the
    /// item contains forced breaks.
    pub hard_break: Option<(f32, f32)>,
}

impl IntrinsicContribution {
    /// An unbreakable box of the given min/max widths with break
    /// opportunities on both sides.
    #[must_use]
    pub const fn atomic(widths: MinMaxWidth) -> Self {
        Self {
            min: widths.min,
            max: widths.max,
            head: widths.min,
            tail: widths.min,
            breakable: false,
            break_before: true,
            break_after: true,
            hard_break: None,
        }
    }
}

/// Running min/max width for a sequence of items.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WidthAccumulator {
    min: f32,
    closed_max: f32,
    current_max: f32,
    chain: f32,
    chain_open: bool,
    floats: f32,
}

impl WidthAccumulator {
    /// Start an empty accumulation.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the contribution of the next in-flow item.
    pub fn add(&mut self, item: &IntrinsicContribution) {
        // STEP 1: min-content. Extend the open unbreakable chain with the
        // item's head, or start a new one.
        let joined = if self.chain_open && !item.break_before {
            self.chain + item.head
        } else {
            item.head
        };
        if item.breakable {
            self.min = self.min.max(joined).max(item.min);
            self.chain = item.tail;
        } else {
            self.chain = joined;
        }
        self.min = self.min.max(self.chain);
        self.chain_open = !item.break_after;

        // STEP 2: max-content. Forced breaks close the current line.
        match item.hard_break {
            Some((first, last)) => {
                self.closed_max = self
                    .closed_max
                    .max(self.current_max + first)
                    .max(item.max);
                self.current_max = last;
            }
            None => self.current_max += item.max,
        }
    }

    /// Add a float. Floats sit beside the line content, so their widths add
    /// to max-content and bound min-content.
    pub fn add_float(&mut self, width: f32) {
        self.floats += width;
        self.min = self.min.max(width);
    }

    /// The accumulated widths.
    #[must_use]
    pub fn result(&self) -> MinMaxWidth {
        MinMaxWidth {
            min: self.min,
            max: self.closed_max.max(self.current_max) + self.floats,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(head: f32, min: f32, tail: f32, max: f32, break_after: bool) -> IntrinsicContribution {
        IntrinsicContribution {
            min,
            max,
            head,
            tail,
            breakable: true,
            break_before: false,
            break_after,
            hard_break: None,
        }
    }

    #[test]
    fn test_runs_without_break_join_into_one_piece() {
        // "Hel" + "lo world": "Hello" is one unbreakable piece.
        let mut acc = WidthAccumulator::new();
        acc.add(&IntrinsicContribution {
            breakable: false,
            ..text(18.0, 18.0, 18.0, 18.0, false)
        });
        acc.add(&text(12.0, 30.0, 30.0, 54.0, false));
        let widths = acc.result();
        assert!((widths.min - 30.0).abs() < 1e-5);
        assert!((widths.max - 72.0).abs() < 1e-5);

        let mut acc = WidthAccumulator::new();
        acc.add(&text(12.0, 12.0, 12.0, 12.0, false));
        acc.add(&text(30.0, 30.0, 6.0, 40.0, true));
        assert!((acc.result().min - 42.0).abs() < 1e-5);
    }

    #[test]
    fn test_hard_break_closes_max_line() {
        let mut acc = WidthAccumulator::new();
        acc.add(&IntrinsicContribution::atomic(MinMaxWidth { min: 50.0, max: 50.0 }));
        acc.add(&IntrinsicContribution {
            hard_break: Some((10.0, 5.0)),
            ..text(10.0, 10.0, 5.0, 10.0, true)
        });
        acc.add(&IntrinsicContribution::atomic(MinMaxWidth { min: 20.0, max: 20.0 }));
        let widths = acc.result();
        assert!((widths.max - 60.0).abs() < 1e-5);
        assert!((widths.min - 50.0).abs() < 1e-5);
    }

    #[test]
    fn test_floats_add_to_max() {
        let mut acc = WidthAccumulator::new();
        acc.add(&IntrinsicContribution::atomic(MinMaxWidth { min: 10.0, max: 10.0 }));
        acc.add_float(40.0);
        let widths = acc.result();
        assert!((widths.min - 40.0).abs() < 1e-5);
        assert!((widths.max - 50.0).abs() < 1e-5);
    }
}

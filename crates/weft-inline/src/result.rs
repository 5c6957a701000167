//! Outcomes of layout calls.
//!
//! A layout call never fails because content does not fit. It reports how
//! much fit through [`LayoutStatus`] and hands back the remainder so the
//! caller can continue in a new area.

use serde::Serialize;
use strum_macros::Display;

/// How much of the content was placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
pub enum LayoutStatus {
    /// Everything was placed.
    Full,
    /// Part was placed; the rest is in the overflow.
    Partial,
    /// Nothing was placed. The caller must enlarge the area or retry with
    /// forced placement.
    Nothing,
}

/// Why nothing could be placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
pub enum NothingReason {
    /// The first word does not fit and the line already has content.
    WordDoesNotFit,
    /// The word would have to be broken between characters, which
    /// `overflow-wrap: normal` with visible overflow forbids.
    OverflowWrapForbidsSplit,
    /// The content is taller than the area.
    HeightOverflow,
    /// An atomic box is wider than the line.
    BoxTooWide,
}

/// Diagnostic pointer to the item that caused a [`LayoutStatus::Nothing`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NothingCause {
    /// Index of the offending item in the input sequence.
    pub item_index: usize,
    /// What went wrong.
    pub reason: NothingReason,
}

impl std::fmt::Display for NothingCause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "item {}: {}", self.item_index, self.reason)
    }
}

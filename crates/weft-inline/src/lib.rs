//! Inline line breaking and text layout for the Weft layout engine.
//!
//! # Scope
//!
//! This crate implements:
//! - **Text Runs** ([CSS Text Level 3 § 5 Line Breaking](https://www.w3.org/TR/css-text-3/#line-breaking))
//!   - Greedy fill over non-breakable parts
//!   - Hyphenation, forced line breaks, and `overflow-wrap`
//!   - Copy-on-split windows into a shared glyph buffer
//!
//! - **Line Breaking** ([CSS 2.1 § 9.4.2 Inline formatting contexts](https://www.w3.org/TR/CSS2/visuren.html#inline-formatting))
//!   - Text, tabs, atomic inline boxes, and floats on one line
//!   - Rollback to the last break opportunity across items
//!   - Trailing whitespace trimming and vertical metrics
//!
//! - **Bidi Reordering** ([UAX #9](https://www.unicode.org/reports/tr9/))
//!   - Embedding levels and visual order through a pluggable service
//!
//! - **Floats** ([CSS 2.1 § 9.5 Floats](https://www.w3.org/TR/CSS2/visuren.html#floats))
//!   - Exclusions, placement, clearance, and reclaiming
//!
//! - **Justification** ([CSS Text Level 3 § 7.3](https://www.w3.org/TR/css-text-3/#justify-property))
//!   - Word and character spacing split by a spacing ratio
//!
//! - **Intrinsic Sizes** ([CSS Sizing Level 3 § 5.1](https://www.w3.org/TR/css-sizing-3/#intrinsic-sizes))
//!   - Running min-content and max-content widths
//!
//! # Not Implemented
//!
//! - Font parsing, shaping, and kerning (see [`shaping::TextShaper`])
//! - Hyphenation dictionaries (see [`hyphenation::Hyphenator`])
//! - Pagination across areas; callers re-invoke [`LineBreaker::layout`]
//!   with the overflow of the previous line

/// Bidirectional levels and reordering per [UAX #9](https://www.unicode.org/reports/tr9/).
pub mod bidi;
/// Layout area and shared layout state.
pub mod context;
/// Unrecoverable layout errors.
pub mod error;
/// Float obstacles per [CSS 2.1 § 9.5](https://www.w3.org/TR/CSS2/visuren.html#floats).
pub mod float;
/// Rectangles and tolerance comparisons.
pub mod geometry;
/// Hyphenation candidates per [CSS Text Level 3 § 6.1](https://www.w3.org/TR/css-text-3/#hyphens-property).
pub mod hyphenation;
/// Atomic inline boxes and floats.
pub mod inline_block;
/// The inline item sequence.
pub mod item;
/// Justification per [CSS Text Level 3 § 7.3](https://www.w3.org/TR/css-text-3/#justify-property).
pub mod justify;
/// Line boxes per [CSS 2.1 § 9.4.2](https://www.w3.org/TR/CSS2/visuren.html#inline-formatting).
pub mod line;
/// The line breaker.
pub mod line_breaker;
/// Layered property lookup.
pub mod properties;
/// Layout statuses and causes.
pub mod result;
/// Break opportunities and grapheme clusters.
pub mod segmentation;
/// Pluggable layout services.
pub mod services;
/// Glyphs, fonts, and the shaping contract.
pub mod shaping;
/// Tab stops per [CSS Text Level 3 § 4.2](https://www.w3.org/TR/css-text-3/#tab-size-property).
pub mod tab;
/// Text runs and the fill algorithm.
pub mod text_run;
/// Intrinsic widths per [CSS Sizing Level 3](https://www.w3.org/TR/css-sizing-3/).
pub mod width;

// Re-exports for convenience
pub use bidi::{BaseDirection, BidiService, UnicodeBidiService};
pub use context::{LayoutArea, LayoutContext, OverflowPolicy};
pub use error::LayoutError;
pub use float::{ClearSide, FloatObstacleTracker, FloatSide};
pub use geometry::Rect;
pub use hyphenation::{Hyphenation, Hyphenator, NoHyphenation, SoftHyphenHyphenator};
pub use inline_block::{BoxLayout, BoxLayoutResult, FixedSizeBox, FloatItem, InlineBlock};
pub use item::InlineItem;
pub use justify::Justifier;
pub use line::{Line, LineGeometry, PlacedItem};
pub use line_breaker::{LineBreaker, LineBreakerOptions, LineLayoutResult, RenderingProfile};
pub use properties::{Properties, PropertyKey, PropertyMap, PropertyValue};
pub use result::{LayoutStatus, NothingCause, NothingReason};
pub use services::LayoutServices;
pub use shaping::{ApproximateShaper, FontSpec, Glyph, TextShaper};
pub use tab::{TabAlignment, TabItem, TabStop};
pub use text_run::TextRun;
pub use width::{MinMaxWidth, WidthAccumulator};

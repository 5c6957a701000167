//! Pluggable collaborators consulted during layout.

use crate::bidi::{BidiService, UnicodeBidiService};
use crate::hyphenation::{Hyphenator, NoHyphenation};
use crate::segmentation::{DefaultSplitCharacters, ScriptSegmenter, SplitCharacters, WordBoundarySegmenter};

/// The external services the line breaker and text runs call into.
pub struct LayoutServices {
    /// Hyphenation candidates for words that do not fit.
    pub hyphenator: Box<dyn Hyphenator>,
    /// Embedding levels and visual reordering.
    pub bidi: Box<dyn BidiService>,
    /// Break offsets for scripts without word separators.
    pub segmenter: Box<dyn ScriptSegmenter>,
    /// Glyphs after which a break is allowed.
    pub split_characters: Box<dyn SplitCharacters>,
}

impl Default for LayoutServices {
    fn default() -> Self {
        Self {
            hyphenator: Box::new(NoHyphenation),
            bidi: Box::new(UnicodeBidiService),
            segmenter: Box::new(WordBoundarySegmenter),
            split_characters: Box::new(DefaultSplitCharacters),
        }
    }
}

impl LayoutServices {
    /// Replace the hyphenator.
    #[must_use]
    pub fn with_hyphenator(mut self, hyphenator: impl Hyphenator + 'static) -> Self {
        self.hyphenator = Box::new(hyphenator);
        self
    }

    /// Replace the bidi service.
    #[must_use]
    pub fn with_bidi(mut self, bidi: impl BidiService + 'static) -> Self {
        self.bidi = Box::new(bidi);
        self
    }

    /// Replace the special-script segmenter.
    #[must_use]
    pub fn with_segmenter(mut self, segmenter: impl ScriptSegmenter + 'static) -> Self {
        self.segmenter = Box::new(segmenter);
        self
    }

    /// Replace the split character predicate.
    #[must_use]
    pub fn with_split_characters(mut self, split: impl SplitCharacters + 'static) -> Self {
        self.split_characters = Box::new(split);
        self
    }
}

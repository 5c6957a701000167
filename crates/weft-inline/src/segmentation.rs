//! Break opportunities inside text.
//!
//! [§ 5 Line Breaking and Word Boundaries](https://www.w3.org/TR/css-text-3/#line-breaking)
//!
//! "When inline-level content is laid out into lines, it is broken across
//! line boxes. Such a break is called a line break."
//!
//! Three sources of break opportunities feed the text run fill:
//!
//! - a pluggable [`SplitCharacters`] predicate (a break is allowed *after*
//!   a split character),
//! - [`ScriptSegmenter`] offsets for scripts written without spaces between
//!   words (a break is allowed *before* an offset),
//! - grapheme cluster boundaries, used only when a word must be broken at
//!   an arbitrary point.

use unicode_script::{Script, UnicodeScript};
use unicode_segmentation::UnicodeSegmentation;

use crate::shaping::Glyph;

/// U+2011 NON-BREAKING HYPHEN: glyphs on either side never break apart.
pub const NON_BREAKING_HYPHEN: char = '\u{2011}';

/// U+00AD SOFT HYPHEN.
pub const SOFT_HYPHEN: char = '\u{00AD}';

/// Decides after which glyphs a line may break.
pub trait SplitCharacters {
    /// Whether a break is permitted after `glyphs[index]`.
    fn is_split_character(&self, glyphs: &[Glyph], index: usize) -> bool;
}

/// Whitespace, hyphens, dashes, slashes, and ideographs.
///
/// [§ 5.1 Line Breaking Details](https://www.w3.org/TR/css-text-3/#line-break-details)
///
/// "For soft wrap opportunities defined by the boundary between two
/// characters or atomic inlines, the white-space property on the nearest
/// common ancestor of the two characters controls breaking."
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultSplitCharacters;

impl SplitCharacters for DefaultSplitCharacters {
    fn is_split_character(&self, glyphs: &[Glyph], index: usize) -> bool {
        let Some(glyph) = glyphs.get(index) else {
            return false;
        };
        let ch = glyph.ch;
        if is_breaking_space(ch) {
            return true;
        }
        match ch {
            // A hyphen between two digits is a minus sign.
            '-' => {
                let prev_digit = index
                    .checked_sub(1)
                    .and_then(|i| glyphs.get(i))
                    .is_some_and(|g| g.ch.is_ascii_digit());
                let next_digit = glyphs.get(index + 1).is_some_and(|g| g.ch.is_ascii_digit());
                !(prev_digit && next_digit)
            }
            '\u{2010}' | '\u{2012}' | '\u{2013}' | '/' => true,
            _ => is_ideographic(ch),
        }
    }
}

/// Whitespace that permits a break (excludes no-break spaces).
#[must_use]
pub fn is_breaking_space(ch: char) -> bool {
    ch.is_whitespace() && !matches!(ch, '\u{00A0}' | '\u{2007}' | '\u{202F}' | '\n' | '\r')
}

/// Whitespace that is removed from the end of a line.
///
/// [§ 4.1.3 Phase II: Trimming and Positioning](https://www.w3.org/TR/css-text-3/#white-space-phase-2)
///
/// "A sequence of collapsible spaces at the end of a line is removed."
#[must_use]
pub fn is_trimmable(ch: char) -> bool {
    ch.is_whitespace() && !matches!(ch, '\u{00A0}' | '\u{2007}' | '\u{202F}')
}

/// Forced line breaks.
#[must_use]
pub const fn is_newline(ch: char) -> bool {
    matches!(ch, '\n' | '\u{2028}' | '\u{2029}')
}

/// CJK ideographs, kana, and full-width forms allow a break after each
/// character.
#[must_use]
pub const fn is_ideographic(ch: char) -> bool {
    matches!(ch as u32,
        0x2E80..=0xD7A0 | 0xF900..=0xFB00 | 0xFE30..=0xFE50 | 0xFF61..=0xFFA0)
}

/// Scripts written without spaces between words, whose break opportunities
/// come from a [`ScriptSegmenter`].
#[must_use]
pub fn is_special_script(ch: char) -> bool {
    matches!(ch.script(), Script::Thai | Script::Lao | Script::Khmer | Script::Myanmar)
}

/// The dominant script of `text`: the first script that is not shared
/// (Common/Inherited), or `Latin` for script-neutral text.
#[must_use]
pub fn dominant_script(text: &str) -> Script {
    text.chars()
        .map(|ch| ch.script())
        .find(|s| !matches!(s, Script::Common | Script::Inherited | Script::Unknown))
        .unwrap_or(Script::Latin)
}

/// Supplies word boundaries for special scripts.
pub trait ScriptSegmenter {
    /// Code point offsets into `text` before which a line may break.
    /// Offsets are strictly increasing and lie in `1..text.chars().count()`.
    fn break_offsets(&self, text: &str) -> Vec<usize>;
}

/// Word boundaries from [UAX #29](https://www.unicode.org/reports/tr29/).
///
/// This does not find dictionary word boundaries; a dictionary-backed
/// segmenter should be plugged in where Thai or Khmer quality matters.
#[derive(Debug, Clone, Copy, Default)]
pub struct WordBoundarySegmenter;

impl ScriptSegmenter for WordBoundarySegmenter {
    fn break_offsets(&self, text: &str) -> Vec<usize> {
        let total = text.chars().count();
        let mut offsets = Vec::new();
        let mut char_pos = 0;
        let mut byte_pos = 0;
        for (byte_idx, _) in text.split_word_bound_indices() {
            char_pos += text[byte_pos..byte_idx].chars().count();
            byte_pos = byte_idx;
            if char_pos > 0 && char_pos < total {
                offsets.push(char_pos);
            }
        }
        offsets
    }
}

/// Glyph offsets (relative to `glyphs`) at which each extended grapheme
/// cluster ends. The last entry is always `glyphs.len()` for non-empty input.
#[must_use]
pub fn cluster_ends(glyphs: &[Glyph]) -> Vec<usize> {
    let text: String = glyphs.iter().map(|g| g.ch).collect();
    let mut ends = Vec::new();
    let mut pos = 0;
    for grapheme in text.graphemes(true) {
        pos += grapheme.chars().count();
        ends.push(pos);
    }
    ends
}

/// Number of extended grapheme clusters (base characters) in `text`.
#[must_use]
pub fn base_character_count(text: &str) -> usize {
    text.graphemes(true).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn glyphs(text: &str) -> Vec<Glyph> {
        text.chars().map(|ch| Glyph::new(ch, 1.0)).collect()
    }

    #[test]
    fn test_default_split_characters() {
        let split = DefaultSplitCharacters;
        let g = glyphs("a b-c\u{00A0}d 3-4 \u{2011}x");
        let breaks: Vec<usize> = (0..g.len()).filter(|&i| split.is_split_character(&g, i)).collect();
        // space at 1, hyphen at 3, space at 7, space at 11; not the NBSP,
        // the minus between digits, or the non-breaking hyphen.
        assert_eq!(breaks, vec![1, 3, 7, 11]);
    }

    #[test]
    fn test_ideographs_are_split_characters() {
        let split = DefaultSplitCharacters;
        let g = glyphs("中文");
        assert!(split.is_split_character(&g, 0));
    }

    #[test]
    fn test_special_script_detection() {
        assert!(is_special_script('ก'));
        assert!(is_special_script('ក'));
        assert!(!is_special_script('a'));
        assert_eq!(dominant_script("  ภาษา"), Script::Thai);
        assert_eq!(dominant_script("123"), Script::Latin);
    }

    #[test]
    fn test_word_boundary_offsets_are_interior() {
        let offsets = WordBoundarySegmenter.break_offsets("ab cd");
        assert_eq!(offsets, vec![2, 3]);
    }

    #[test]
    fn test_cluster_ends_keep_combining_marks() {
        // "e" + COMBINING ACUTE ACCENT forms one cluster.
        let g = glyphs("e\u{0301}x");
        assert_eq!(cluster_ends(&g), vec![2, 3]);
        assert_eq!(base_character_count("e\u{0301}x"), 2);
    }
}

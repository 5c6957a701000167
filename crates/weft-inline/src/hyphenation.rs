//! Hyphenation contract and built-in hyphenators.
//!
//! [§ 6.1 Hyphenation Control: the hyphens property](https://www.w3.org/TR/css-text-3/#hyphens-property)
//!
//! "Hyphenation opportunities are considered when calculating min-content
//! intrinsic sizes and when breaking lines."
//!
//! Dictionaries are out of scope for the engine. A [`Hyphenator`] returns
//! the candidate break points of one word, widest first, and the text run
//! fill commits the first candidate whose prefix plus hyphen fits.

use std::collections::HashMap;

use crate::segmentation::SOFT_HYPHEN;

/// One way to break a word: `pre` stays on the line (followed by a hyphen
/// glyph), `post` moves to the next. `pre + post` must equal the word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hyphenation {
    /// Text kept on the current line.
    pub pre: String,
    /// Text moved to the next line.
    pub post: String,
}

impl Hyphenation {
    /// Split `word` after `chars` code points.
    #[must_use]
    pub fn at(word: &str, chars: usize) -> Self {
        let byte = word.char_indices().nth(chars).map_or(word.len(), |(b, _)| b);
        Self {
            pre: word[..byte].to_string(),
            post: word[byte..].to_string(),
        }
    }

    /// Number of code points in `pre`.
    #[must_use]
    pub fn pre_len(&self) -> usize {
        self.pre.chars().count()
    }
}

/// Supplies hyphenation candidates.
pub trait Hyphenator {
    /// Candidates for `word`, widest `pre` first.
    fn hyphenate(&self, word: &str) -> Vec<Hyphenation>;
}

/// Never hyphenates.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHyphenation;

impl Hyphenator for NoHyphenation {
    fn hyphenate(&self, _word: &str) -> Vec<Hyphenation> {
        Vec::new()
    }
}

/// Breaks only at U+00AD SOFT HYPHEN.
///
/// [§ 6.1](https://www.w3.org/TR/css-text-3/#hyphens-property)
///
/// "manual: Words are only broken at line breaks where there are
/// characters inside the word that suggest line break opportunities."
#[derive(Debug, Clone, Copy, Default)]
pub struct SoftHyphenHyphenator;

impl Hyphenator for SoftHyphenHyphenator {
    fn hyphenate(&self, word: &str) -> Vec<Hyphenation> {
        let mut candidates: Vec<Hyphenation> = word
            .chars()
            .enumerate()
            .filter(|&(_, ch)| ch == SOFT_HYPHEN)
            .map(|(i, _)| Hyphenation::at(word, i + 1))
            .filter(|h| !h.post.is_empty())
            .collect();
        candidates.reverse();
        candidates
    }
}

/// Hyphenates from an explicit exception list, in the style of TeX's
/// `\hyphenation{hy-phen-ation}`.
#[derive(Debug, Clone, Default)]
pub struct ExceptionListHyphenator {
    words: HashMap<String, Vec<usize>>,
    /// Minimum code points kept before a break.
    pub left_min: usize,
    /// Minimum code points moved after a break.
    pub right_min: usize,
}

impl ExceptionListHyphenator {
    /// An empty list with TeX's default 2/3 minimums.
    #[must_use]
    pub fn new() -> Self {
        Self {
            words: HashMap::new(),
            left_min: 2,
            right_min: 3,
        }
    }

    /// Register a word with its breaks marked by `-`, e.g. `"hy-phen-ation"`.
    #[must_use]
    pub fn with_word(mut self, pattern: &str) -> Self {
        let mut points = Vec::new();
        let mut word = String::new();
        for ch in pattern.chars() {
            if ch == '-' {
                points.push(word.chars().count());
            } else {
                word.push(ch);
            }
        }
        let _ = self.words.insert(word.to_lowercase(), points);
        self
    }
}

impl Hyphenator for ExceptionListHyphenator {
    fn hyphenate(&self, word: &str) -> Vec<Hyphenation> {
        let Some(points) = self.words.get(&word.to_lowercase()) else {
            return Vec::new();
        };
        let len = word.chars().count();
        points
            .iter()
            .rev()
            .filter(|&&p| p >= self.left_min && len.saturating_sub(p) >= self.right_min)
            .map(|&p| Hyphenation::at(word, p))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_soft_hyphen_candidates_widest_first() {
        let candidates = SoftHyphenHyphenator.hyphenate("hy\u{00AD}phen\u{00AD}ation");
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].pre, "hy\u{00AD}phen\u{00AD}");
        assert_eq!(candidates[0].post, "ation");
        assert_eq!(candidates[1].pre_len(), 3);
    }

    #[test]
    fn test_exception_list_respects_minimums() {
        let hyphenator = ExceptionListHyphenator::new().with_word("a-ble-ness");
        let candidates = hyphenator.hyphenate("Ableness");
        // "a-" violates left_min; "able-ness" is the only candidate.
        assert_eq!(candidates, vec![Hyphenation::at("Ableness", 4)]);
        assert_eq!(candidates[0].pre, "Able");
        assert!(hyphenator.hyphenate("unknown").is_empty());
    }
}

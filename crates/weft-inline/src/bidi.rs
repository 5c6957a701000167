//! Bidirectional embedding levels and visual reordering.
//!
//! [UAX #9: Unicode Bidirectional Algorithm](https://www.unicode.org/reports/tr9/)
//!
//! The engine never resolves embedding levels itself. A [`BidiService`]
//! computes per-code-point levels and turns a sequence of levels into a
//! visual permutation (rule L2); [`UnicodeBidiService`] delegates both to
//! the `unicode-bidi` crate.

use serde::Serialize;
use strum_macros::{Display, EnumString};
use unicode_bidi::{BidiInfo, Level};

/// [§ 2.1 Specifying Directionality: the direction property](https://www.w3.org/TR/css-writing-modes-4/#direction)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, Serialize)]
#[strum(serialize_all = "kebab-case")]
pub enum BaseDirection {
    /// "Left-to-right directionality."
    #[default]
    Ltr,
    /// "Right-to-left directionality."
    Rtl,
    /// Direction of the first strong character (rules P2/P3).
    Auto,
}

/// Embedding levels and reordering.
pub trait BidiService {
    /// One embedding level per code point of `text`.
    fn compute_levels(&self, text: &str, base: BaseDirection) -> Vec<u8>;

    /// Visual order of units carrying `levels`: entry `i` is the logical
    /// index of the unit displayed at visual position `i`.
    fn reorder(&self, levels: &[u8]) -> Vec<usize>;
}

/// [`BidiService`] backed by `unicode-bidi`.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnicodeBidiService;

impl BidiService for UnicodeBidiService {
    fn compute_levels(&self, text: &str, base: BaseDirection) -> Vec<u8> {
        let default_level = match base {
            BaseDirection::Ltr => Some(Level::ltr()),
            BaseDirection::Rtl => Some(Level::rtl()),
            BaseDirection::Auto => None,
        };
        let info = BidiInfo::new(text, default_level);
        // `levels` is indexed by byte; keep the level of each code point's
        // first byte.
        text.char_indices()
            .map(|(byte, _)| info.levels.get(byte).map_or(0, |level| level.number()))
            .collect()
    }

    fn reorder(&self, levels: &[u8]) -> Vec<usize> {
        let levels: Vec<Level> = levels
            .iter()
            .map(|&n| Level::new(n).unwrap_or_else(|_| Level::ltr()))
            .collect();
        BidiInfo::reorder_visual(&levels)
    }
}

/// Whether any level is odd (right-to-left).
#[must_use]
pub fn has_rtl(levels: &[u8]) -> bool {
    levels.iter().any(|l| l % 2 == 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hebrew_gets_odd_level() {
        let levels = UnicodeBidiService.compute_levels("אב cd", BaseDirection::Ltr);
        assert_eq!(levels.len(), 5);
        assert_eq!(levels[0], 1);
        assert_eq!(levels[1], 1);
        assert_eq!(levels[3], 0);
        assert!(has_rtl(&levels));
    }

    #[test]
    fn test_rtl_base_raises_latin_to_two() {
        let levels = UnicodeBidiService.compute_levels("ab", BaseDirection::Rtl);
        assert_eq!(levels, vec![2, 2]);
    }

    #[test]
    fn test_reorder_reverses_rtl_sequence() {
        let order = UnicodeBidiService.reorder(&[0, 1, 1, 1, 0]);
        assert_eq!(order, vec![0, 3, 2, 1, 4]);
    }
}

//! Text runs and the greedy fill algorithm.
//!
//! [§ 2.5 Text Runs](https://www.w3.org/TR/css-display-3/#text-nodes)
//!
//! "A text run is a maximal sequence of consecutive text nodes."
//!
//! A [`TextRun`] is a `[start, end)` window into an immutable glyph buffer
//! shared by every piece split from the same text. Layout never touches the
//! buffer; splitting produces two new runs whose windows partition the
//! original one.
//!
//! [§ 5.5.1 Line Breaking Details](https://www.w3.org/TR/css-text-3/#line-breaking)
//!
//! The fill walks *non-breakable parts*: maximal glyph ranges between two
//! break opportunities. Parts are appended while they fit. The first part
//! that does not fit is hyphenated if possible; otherwise the run splits
//! before it, or, when nothing at all is on the line, the part is broken
//! between grapheme clusters.

use std::ops::Range;
use std::rc::Rc;

use serde::Serialize;
use weft_common::warning::warn_once;

use crate::context::OverflowPolicy;
use crate::error::LayoutError;
use crate::geometry::fits_within;
use crate::properties::Properties;
use crate::result::{LayoutStatus, NothingReason};
use crate::segmentation::{
    NON_BREAKING_HYPHEN, cluster_ends, dominant_script, is_breaking_space, is_newline,
    is_special_script, is_trimmable,
};
use crate::services::LayoutServices;
use crate::shaping::{FontSpec, Glyph, TextShaper, is_zero_width};
use crate::width::IntrinsicContribution;

/// A window into a shared glyph buffer, with the font and properties that
/// apply to it.
#[derive(Debug, Clone)]
pub struct TextRun {
    glyphs: Rc<[Glyph]>,
    start: usize,
    end: usize,
    font: Rc<FontSpec>,
    properties: Rc<Properties>,
    hyphen: Glyph,
    hyphenated: bool,
}

/// Constraints for one [`TextRun::layout`] call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextConstraints {
    /// Width left on the line.
    pub available_width: f32,
    /// Height of the area.
    pub available_height: f32,
    /// The area height is clipped, so taller text is accepted.
    pub clipped_height: bool,
    /// What to do with an unbreakable word that is too wide.
    pub overflow_policy: OverflowPolicy,
    /// Nothing has been placed on the line yet.
    pub first_on_line: bool,
    /// Place something even if it overflows.
    pub forced_placement: bool,
}

/// Outcome of [`TextRun::layout`].
#[derive(Debug, Clone)]
pub struct TextLayoutResult {
    /// How much of the run was placed.
    pub status: LayoutStatus,
    /// Width occupied by the placed part, hyphen and italic overhang
    /// included, hanging spaces excluded.
    pub width: f32,
    /// [§ 4.1.3 Phase II](https://www.w3.org/TR/css-text-3/#white-space-phase-2)
    ///
    /// Trailing spaces of the placed part that hang: they end the line, or
    /// they extend past the available width. Their glyphs are still placed.
    pub hanging_width: f32,
    /// Height occupied by the placed part.
    pub height: f32,
    /// The placed part (`Full`: the whole run; `Nothing`: `None`).
    pub split: Option<TextRun>,
    /// The part left over (`Full`: `None`; `Nothing`: the whole run).
    pub overflow: Option<TextRun>,
    /// The run was split right after a newline.
    pub split_forced_by_newline: bool,
    /// A word was broken between characters.
    pub word_has_been_split: bool,
    /// The placed part contains a break opportunity.
    pub contains_possible_break: bool,
    /// Why nothing was placed.
    pub cause: Option<NothingReason>,
}

impl TextLayoutResult {
    /// Width the placed glyphs take up on the line, hanging spaces
    /// included.
    #[must_use]
    pub fn occupied_width(&self) -> f32 {
        self.width + self.hanging_width
    }

    /// Move `hanging` pixels of trailing spaces out of `width`.
    fn hang(mut self, hanging: f32) -> Self {
        let hanging = hanging.min(self.width);
        self.width -= hanging;
        self.hanging_width += hanging;
        self
    }
}

/// Serializable summary of a run, for diagnostics and snapshots.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextRunSummary {
    /// Window start.
    pub start: usize,
    /// Window end.
    pub end: usize,
    /// Text of the window.
    pub text: String,
    /// Whether a hyphen is appended.
    pub hyphenated: bool,
}

impl TextRun {
    /// Shape `text` with the font its properties resolve to.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::FontResolution`] if the shaper does not know
    /// the font family and [`LayoutError::InvalidShaping`] if it returns a
    /// glyph count different from the code point count.
    pub fn shape(
        text: &str,
        properties: Properties,
        shaper: &dyn TextShaper,
    ) -> Result<Self, LayoutError> {
        let family = properties.font_family();
        let face = shaper
            .resolve_font(&family)
            .ok_or(LayoutError::FontResolution { family })?;
        let font = FontSpec {
            face,
            size: properties.font_size(),
            bold: properties.bold(),
            italic: properties.italic(),
        };

        let mut glyphs = shaper.shape(text, dominant_script(text), &font);
        let chars = text.chars().count();
        if glyphs.len() != chars {
            return Err(LayoutError::InvalidShaping {
                chars,
                glyphs: glyphs.len(),
            });
        }
        shaper.kern(&mut glyphs, &font);

        let hyphen = shaper
            .shape("-", dominant_script("-"), &font)
            .first()
            .copied()
            .unwrap_or(Glyph::new('-', 0.0));

        Ok(Self::from_glyphs(glyphs.into(), font, properties, hyphen))
    }

    /// Build a run over an already shaped buffer.
    #[must_use]
    pub fn from_glyphs(
        glyphs: Rc<[Glyph]>,
        font: FontSpec,
        properties: Properties,
        hyphen: Glyph,
    ) -> Self {
        let end = glyphs.len();
        Self {
            glyphs,
            start: 0,
            end,
            font: Rc::new(font),
            properties: Rc::new(properties),
            hyphen,
            hyphenated: false,
        }
    }

    /// A run over `[start, end)` of the same buffer. The window must lie
    /// inside this run's window.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::InvariantViolation`] if it does not.
    pub fn with_window(&self, start: usize, end: usize) -> Result<Self, LayoutError> {
        if start > end || start < self.start || end > self.end {
            return Err(LayoutError::InvariantViolation {
                start,
                end,
                window_start: self.start,
                window_end: self.end,
            });
        }
        Ok(Self {
            glyphs: Rc::clone(&self.glyphs),
            start,
            end,
            font: Rc::clone(&self.font),
            properties: Rc::clone(&self.properties),
            hyphen: self.hyphen,
            hyphenated: self.hyphenated && end == self.end,
        })
    }

    /// Split into `[start, at)` and `[at, end)`.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::InvariantViolation`] if `at` is outside the
    /// window.
    pub fn split_at(&self, at: usize) -> Result<(Self, Self), LayoutError> {
        Ok((self.with_window(self.start, at)?, self.with_window(at, self.end)?))
    }

    /// The window into the shared buffer.
    #[must_use]
    pub const fn window(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Glyphs inside the window.
    #[must_use]
    pub fn glyphs(&self) -> &[Glyph] {
        &self.glyphs[self.start..self.end]
    }

    /// The whole shared buffer.
    #[must_use]
    pub fn buffer(&self) -> &Rc<[Glyph]> {
        &self.glyphs
    }

    /// Text of the window.
    #[must_use]
    pub fn text(&self) -> String {
        self.glyphs().iter().map(|g| g.ch).collect()
    }

    /// The run's font.
    #[must_use]
    pub fn font(&self) -> &FontSpec {
        &self.font
    }

    /// The run's properties.
    #[must_use]
    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    /// Whether the window is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Whether a hyphen glyph is rendered after the window.
    #[must_use]
    pub const fn hyphenated(&self) -> bool {
        self.hyphenated
    }

    /// The glyph rendered when the run ends in a hyphenation break.
    #[must_use]
    pub const fn hyphen(&self) -> Glyph {
        self.hyphen
    }

    /// Serializable summary.
    #[must_use]
    pub fn summary(&self) -> TextRunSummary {
        TextRunSummary {
            start: self.start,
            end: self.end,
            text: self.text(),
            hyphenated: self.hyphenated,
        }
    }

    /// Sum of advances over an absolute glyph range, synthetic bold included.
    fn advance_sum(&self, from: usize, to: usize) -> f32 {
        let bold = self.font.bold_addition();
        self.glyphs[from..to]
            .iter()
            .map(|g| {
                if is_zero_width(g.ch) {
                    g.advance
                } else {
                    g.advance + bold
                }
            })
            .sum()
    }

    /// Width of trailing trimmable whitespace in an absolute range.
    fn trailing_space_width(&self, from: usize, to: usize) -> f32 {
        let count = self.glyphs[from..to]
            .iter()
            .rev()
            .take_while(|g| is_trimmable(g.ch))
            .count();
        self.advance_sum(to - count, to)
    }

    /// Sum of advances over an absolute sub-range, synthetic bold included
    /// and italic overhang excluded.
    #[must_use]
    pub fn advance_width(&self, range: Range<usize>) -> f32 {
        self.advance_sum(range.start, range.end)
    }

    /// Width of an absolute sub-range as it would be occupied on a line.
    #[must_use]
    pub fn width_of(&self, range: Range<usize>) -> f32 {
        if range.is_empty() {
            return 0.0;
        }
        self.advance_sum(range.start, range.end) + self.font.italic_overhang()
    }

    /// Occupied width of the whole window, hyphen included.
    #[must_use]
    pub fn width(&self) -> f32 {
        let hyphen = if self.hyphenated {
            self.hyphen.advance + self.font.bold_addition()
        } else {
            0.0
        };
        self.width_of(self.window()) + hyphen
    }

    /// Width of the window up to the first `anchor` character, or the whole
    /// width when the window has none.
    #[must_use]
    pub fn width_before_char(&self, anchor: char) -> f32 {
        match self.glyphs().iter().position(|g| g.ch == anchor) {
            Some(offset) => self.advance_sum(self.start, self.start + offset),
            None => self.width(),
        }
    }

    /// Number of trimmable whitespace glyphs at the end of the window.
    #[must_use]
    pub fn trailing_whitespace_count(&self) -> usize {
        if self.hyphenated {
            return 0;
        }
        self.glyphs().iter().rev().take_while(|g| is_trimmable(g.ch)).count()
    }

    /// Width removed by trimming `count` trailing glyphs.
    #[must_use]
    pub fn trimmed_width(&self, count: usize) -> f32 {
        let count = count.min(self.end - self.start);
        if count == 0 {
            return 0.0;
        }
        let kept = self.end - count;
        let removed = self.advance_sum(kept, self.end);
        if kept == self.start {
            removed + self.font.italic_overhang()
        } else {
            removed
        }
    }

    /// Height above the baseline, baseline shift included.
    #[must_use]
    pub fn ascent(&self) -> f32 {
        self.font.ascent() + self.properties.baseline_shift()
    }

    /// Depth below the baseline (≤ 0 for unshifted text).
    #[must_use]
    pub fn descent(&self) -> f32 {
        self.font.descent() + self.properties.baseline_shift()
    }

    /// Whether a break is allowed between absolute glyphs `index` and
    /// `index + 1`.
    fn break_after(&self, index: usize, special_breaks: &[usize], services: &LayoutServices) -> bool {
        let Some(current) = self.glyphs.get(index) else {
            return false;
        };
        let Some(next) = self.glyphs.get(index + 1) else {
            return true;
        };
        // Clusters adjacent to a non-breaking hyphen stay together.
        if current.ch == NON_BREAKING_HYPHEN || next.ch == NON_BREAKING_HYPHEN {
            return false;
        }
        if is_newline(next.ch) {
            return true;
        }
        if special_breaks.binary_search(&(index + 1)).is_ok() {
            return true;
        }
        // Spaces stay with the part before them; the break comes after
        // the last space.
        if is_breaking_space(next.ch) {
            return false;
        }
        services.split_characters.is_split_character(&self.glyphs, index)
    }

    /// Whether a break is allowed after the last glyph of the window, based
    /// on the glyph alone.
    #[must_use]
    pub fn ends_with_break(&self, services: &LayoutServices) -> bool {
        if self.is_empty() {
            return true;
        }
        let last = self.glyphs[self.end - 1].ch;
        last != NON_BREAKING_HYPHEN
            && (is_newline(last)
                || services
                    .split_characters
                    .is_split_character(&self.glyphs, self.end - 1))
    }

    /// Special-script break positions (absolute, sorted) inside the window.
    fn special_breaks(&self, services: &LayoutServices) -> Vec<usize> {
        let glyphs = self.glyphs();
        if !glyphs.iter().any(|g| is_special_script(g.ch)) {
            return Vec::new();
        }
        let text: String = glyphs.iter().map(|g| g.ch).collect();
        let mut breaks: Vec<usize> = services
            .segmenter
            .break_offsets(&text)
            .into_iter()
            .filter(|&offset| offset > 0 && offset < glyphs.len())
            .filter(|&offset| {
                is_special_script(glyphs[offset - 1].ch) || is_special_script(glyphs[offset].ch)
            })
            .map(|offset| self.start + offset)
            .collect();
        breaks.sort_unstable();
        breaks.dedup();
        breaks
    }

    /// End (absolute, exclusive) of the non-breakable part starting at `pos`.
    fn part_end(&self, pos: usize, special_breaks: &[usize], services: &LayoutServices) -> usize {
        let mut i = pos;
        while i + 1 < self.end {
            if self.break_after(i, special_breaks, services) {
                return i + 1;
            }
            i += 1;
        }
        self.end
    }

    /// Absolute positions strictly inside the window where a line may break.
    #[must_use]
    pub fn break_positions(&self, services: &LayoutServices) -> Vec<usize> {
        let special = self.special_breaks(services);
        let mut positions = Vec::new();
        let mut pos = self.start;
        while pos < self.end {
            let end = if is_newline(self.glyphs[pos].ch) {
                pos + 1
            } else {
                self.part_end(pos, &special, services)
            };
            if end < self.end {
                positions.push(end);
            }
            pos = end;
        }
        positions
    }

    /// The last position inside the window where a line may break.
    #[must_use]
    pub fn last_break_position(&self, services: &LayoutServices) -> Option<usize> {
        self.break_positions(services).last().copied()
    }

    /// Intrinsic width contribution of the window.
    #[must_use]
    pub fn intrinsic_contribution(&self, services: &LayoutServices) -> IntrinsicContribution {
        let overhang = self.font.italic_overhang();
        let special = self.special_breaks(services);

        let mut parts: Vec<f32> = Vec::new();
        let mut segments: Vec<f32> = vec![0.0];
        let mut pos = self.start;
        while pos < self.end {
            if is_newline(self.glyphs[pos].ch) {
                segments.push(0.0);
                pos += 1;
                continue;
            }
            let end = self.part_end(pos, &special, services);
            let full = self.advance_sum(pos, end);
            parts.push(full - self.trailing_space_width(pos, end));
            if let Some(segment) = segments.last_mut() {
                *segment += full;
            }
            pos = end;
        }

        let min = parts.iter().copied().fold(0.0, f32::max) + overhang;
        let max = segments.iter().copied().fold(0.0, f32::max) + overhang;
        let hard_break = (segments.len() > 1).then(|| {
            (
                segments.first().copied().unwrap_or(0.0) + overhang,
                segments.last().copied().unwrap_or(0.0) + overhang,
            )
        });
        IntrinsicContribution {
            min,
            max,
            head: parts.first().copied().unwrap_or(0.0) + overhang,
            tail: parts.last().copied().unwrap_or(0.0) + overhang,
            breakable: parts.len() > 1 || hard_break.is_some(),
            break_before: false,
            break_after: self.ends_with_break(services),
            hard_break,
        }
    }

    /// Greedily place as much of the window as fits.
    #[must_use]
    pub fn layout(&self, constraints: &TextConstraints, services: &LayoutServices) -> TextLayoutResult {
        // STEP 1: Height.
        // [§ 10.8 Line height calculations](https://www.w3.org/TR/CSS2/visudet.html#line-height)
        if !fits_within(self.height(), constraints.available_height)
            && !constraints.clipped_height
            && !constraints.forced_placement
        {
            return self.nothing(NothingReason::HeightOverflow);
        }
        if self.is_empty() {
            return self.full(0.0, false);
        }

        let special = self.special_breaks(services);
        let overhang = self.font.italic_overhang();
        let available = constraints.available_width;

        #[cfg(feature = "layout-trace")]
        eprintln!(
            "[TEXT] layout {:?} window={:?} available={available} first_on_line={}",
            self.text(),
            self.window(),
            constraints.first_on_line
        );

        // STEP 2: Walk non-breakable parts.
        let mut width = 0.0;
        let mut trailing = 0.0;
        let mut parts_placed = 0_usize;
        let mut pos = self.start;
        while pos < self.end {
            // [§ 5.1 Line Breaking Details](https://www.w3.org/TR/css-text-3/#line-break-details)
            //
            // "Preserved segment breaks ... are forced line breaks."
            if is_newline(self.glyphs[pos].ch) {
                let split_at = pos + 1;
                if split_at == self.end {
                    return self.full(width + overhang, true).hang(trailing);
                }
                return self.partial(split_at, width + overhang, true, false).hang(trailing);
            }

            let part_end = self.part_end(pos, &special, services);
            let part_width = self.advance_sum(pos, part_end);
            let hanging = self.trailing_space_width(pos, part_end);

            // STEP 3: The part fits. Trailing spaces hang: they count toward
            // the width but not toward the fit test.
            if fits_within(width + part_width - hanging + overhang, available) {
                width += part_width;
                trailing = hanging;
                parts_placed += 1;
                pos = part_end;
                continue;
            }

            // STEP 4: Try hyphenating the word the part contains.
            // [§ 6.1 hyphens](https://www.w3.org/TR/css-text-3/#hyphens-property)
            if self.properties.hyphenate()
                && let Some(result) = self.hyphenate(pos, part_end, width, available, services)
            {
                return result;
            }

            // STEP 5: Break before the part if anything was placed.
            if pos > self.start {
                return self.partial(pos, width + overhang, false, false).hang(trailing);
            }
            if !constraints.first_on_line {
                return self.nothing(NothingReason::WordDoesNotFit);
            }

            // STEP 6: The first word on the line is too wide.
            // [§ 5.5 Overflow Wrapping](https://www.w3.org/TR/css-text-3/#overflow-wrap-property)
            let wrap = self.properties.overflow_wrap();
            if constraints.overflow_policy == OverflowPolicy::Visible && !wrap.allows_mid_cluster_break() {
                if !constraints.forced_placement {
                    return self.nothing(NothingReason::OverflowWrapForbidsSplit);
                }
                let placed = width + part_width + overhang;
                if part_end == self.end {
                    return self.full(placed, false).hang(hanging);
                }
                return self.partial(part_end, placed, false, false).hang(hanging);
            }
            return self.split_word(pos, part_end, available, wrap.allows_mid_cluster_break());
        }

        let mut result = self.full(width + overhang, false);
        if !fits_within(result.width, available) {
            result = result.hang(trailing);
        }
        result.contains_possible_break = parts_placed > 1;
        result
    }

    /// Try the hyphenation candidates of the word in `[pos, part_end)`,
    /// widest first.
    fn hyphenate(
        &self,
        pos: usize,
        part_end: usize,
        placed_width: f32,
        available: f32,
        services: &LayoutServices,
    ) -> Option<TextLayoutResult> {
        // Trailing spaces and punctuation are not part of the word.
        let trailing = self.glyphs[pos..part_end]
            .iter()
            .rev()
            .take_while(|g| is_trimmable(g.ch) || g.ch.is_ascii_punctuation())
            .count();
        let word_end = part_end - trailing;
        if word_end <= pos {
            return None;
        }
        let word: String = self.glyphs[pos..word_end].iter().map(|g| g.ch).collect();
        let word_len = word_end - pos;
        let hyphen_width = self.hyphen.advance + self.font.bold_addition();
        let overhang = self.font.italic_overhang();

        for candidate in services.hyphenator.hyphenate(&word) {
            if format!("{}{}", candidate.pre, candidate.post) != word {
                warn_once(
                    "Layout",
                    &format!(
                        "hyphenation candidate '{}'/'{}' does not spell '{word}'; skipped",
                        candidate.pre, candidate.post
                    ),
                );
                continue;
            }
            let pre_len = candidate.pre_len();
            if pre_len == 0 || pre_len >= word_len {
                continue;
            }
            let split_at = pos + pre_len;
            let width = placed_width + self.advance_sum(pos, split_at) + hyphen_width + overhang;
            if fits_within(width, available) {
                let mut result = self.partial(split_at, width, false, false);
                if let Some(split) = result.split.as_mut() {
                    split.hyphenated = true;
                }
                return Some(result);
            }
        }
        None
    }

    /// Break the part starting at the window start between grapheme
    /// clusters, placing at least one cluster (or one glyph when a
    /// mid-cluster break is allowed).
    fn split_word(&self, pos: usize, part_end: usize, available: f32, mid_cluster: bool) -> TextLayoutResult {
        let overhang = self.font.italic_overhang();
        let mut split_at = pos;
        let mut width = 0.0;

        for end in cluster_ends(&self.glyphs[pos..part_end]).into_iter().map(|e| pos + e) {
            let cluster = self.advance_sum(split_at, end);
            if !fits_within(width + cluster + overhang, available) {
                break;
            }
            width += cluster;
            split_at = end;
        }

        if split_at == pos {
            // Not even one cluster fits.
            let first_cluster_end = cluster_ends(&self.glyphs[pos..part_end])
                .first()
                .map_or(pos + 1, |e| pos + e);
            if mid_cluster {
                while split_at < first_cluster_end
                    && fits_within(width + self.advance_sum(split_at, split_at + 1) + overhang, available)
                {
                    width += self.advance_sum(split_at, split_at + 1);
                    split_at += 1;
                }
                if split_at == pos {
                    split_at = pos + 1;
                    width = self.advance_sum(pos, split_at);
                }
            } else {
                split_at = first_cluster_end;
                width = self.advance_sum(pos, split_at);
            }
        }

        let mut result = if split_at >= self.end {
            self.full(width + overhang, false)
        } else {
            self.partial(split_at, width + overhang, false, true)
        };
        result.word_has_been_split = true;
        result
    }

    fn height(&self) -> f32 {
        self.font.ascent() - self.font.descent()
    }

    fn full(&self, width: f32, newline: bool) -> TextLayoutResult {
        TextLayoutResult {
            status: LayoutStatus::Full,
            width,
            height: self.height(),
            split: Some(self.clone()),
            overflow: None,
            split_forced_by_newline: newline,
            word_has_been_split: false,
            contains_possible_break: false,
            cause: None,
            hanging_width: 0.0,
        }
    }

    fn partial(&self, at: usize, width: f32, newline: bool, word_split: bool) -> TextLayoutResult {
        // `at` always lies strictly inside the window here.
        let (split, overflow) = match self.split_at(at) {
            Ok(pair) => pair,
            Err(err) => {
                warn_once("Layout", &format!("text split rejected: {err}"));
                return self.nothing(NothingReason::WordDoesNotFit);
            }
        };
        TextLayoutResult {
            status: LayoutStatus::Partial,
            width,
            height: self.height(),
            split: Some(split),
            overflow: Some(overflow),
            split_forced_by_newline: newline,
            word_has_been_split: word_split,
            contains_possible_break: !word_split,
            cause: None,
            hanging_width: 0.0,
        }
    }

    fn nothing(&self, reason: NothingReason) -> TextLayoutResult {
        TextLayoutResult {
            status: LayoutStatus::Nothing,
            width: 0.0,
            height: 0.0,
            split: None,
            overflow: Some(self.clone()),
            split_forced_by_newline: false,
            word_has_been_split: false,
            contains_possible_break: false,
            cause: Some(reason),
            hanging_width: 0.0,
        }
    }
}

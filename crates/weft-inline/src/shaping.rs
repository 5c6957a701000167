//! Glyphs, fonts, and the external shaping contract.
//!
//! [§ 10.8 Line height calculations](https://www.w3.org/TR/CSS2/visudet.html#line-height)
//!
//! "CSS assumes that every font has font metrics that specify a
//! characteristic height above the baseline and a depth below it."
//!
//! Shaping, kerning, and font lookup are delegated to a [`TextShaper`]. The
//! engine only ever consumes the resulting advances and vertical metrics.
//! Glyphs map 1:1 onto code points, so a glyph index is also a code point
//! index into the run's text.

use std::collections::HashMap;

use serde::Serialize;
use unicode_script::Script;

/// Horizontal shear of synthetic italics (tan of ~12°).
pub const ITALIC_SKEW: f32 = 0.212_56;

/// Extra stroke added to each glyph by synthetic bold, relative to the
/// font size.
pub const BOLD_STROKE_RATIO: f32 = 1.0 / 30.0;

/// A positioned glyph: the code point it renders and its advance width in
/// pixels, kerning included.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Glyph {
    /// The code point this glyph renders.
    pub ch: char,
    /// Advance width in pixels.
    pub advance: f32,
}

impl Glyph {
    /// Create a glyph.
    #[must_use]
    pub const fn new(ch: char, advance: f32) -> Self {
        Self { ch, advance }
    }
}

/// Vertical metrics of a resolved font face, as fractions of the em size.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FontFace {
    /// Family name.
    pub family: String,
    /// Height above the baseline, in ems.
    pub ascent: f32,
    /// Depth below the baseline, in ems (positive).
    pub descent: f32,
}

/// A font face at a given size with synthetic style flags.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FontSpec {
    /// The resolved face.
    pub face: FontFace,
    /// Size in pixels.
    pub size: f32,
    /// Synthetic bold.
    pub bold: bool,
    /// Synthetic italic.
    pub italic: bool,
}

impl FontSpec {
    /// Ascent in pixels (≥ 0).
    #[must_use]
    pub fn ascent(&self) -> f32 {
        (self.face.ascent * self.size).max(0.0)
    }

    /// Descent in pixels (≤ 0).
    #[must_use]
    pub fn descent(&self) -> f32 {
        -(self.face.descent * self.size).abs()
    }

    /// Extra width synthetic bold adds to every glyph.
    #[must_use]
    pub fn bold_addition(&self) -> f32 {
        if self.bold { self.size * BOLD_STROKE_RATIO } else { 0.0 }
    }

    /// Extra width synthetic italic adds once at the end of a run, where the
    /// sheared last glyph leans past its advance.
    #[must_use]
    pub fn italic_overhang(&self) -> f32 {
        if self.italic { self.size * ITALIC_SKEW } else { 0.0 }
    }
}

/// Shaping, kerning, and font resolution.
///
/// Implementations must return exactly one glyph per code point from
/// [`TextShaper::shape`].
pub trait TextShaper {
    /// Resolve a family name to a face, or `None` if the family is unknown.
    fn resolve_font(&self, family: &str) -> Option<FontFace>;

    /// Produce glyphs with advances for `text`.
    fn shape(&self, text: &str, script: Script, font: &FontSpec) -> Vec<Glyph>;

    /// Adjust advances for kerning pairs. The default applies no kerning.
    fn kern(&self, _glyphs: &mut [Glyph], _font: &FontSpec) {}
}

/// Approximate shaping using fixed ratios.
///
/// Implementation note: without access to actual font data every glyph
/// advances by a fixed fraction of the font size (0.6 by default, typical
/// for Latin body text). Newlines and zero-width characters advance by
/// zero. Optional kerning pairs are expressed in ems.
///
/// This is used as a fallback when no shaper is configured, and in tests.
#[derive(Debug, Clone)]
pub struct ApproximateShaper {
    /// Advance of every visible glyph, in ems.
    pub char_width_ratio: f32,
    /// Ascent of every face, in ems.
    pub ascent: f32,
    /// Descent of every face, in ems.
    pub descent: f32,
    /// Families this shaper knows; `None` accepts every family.
    pub families: Option<Vec<String>>,
    kerning: HashMap<(char, char), f32>,
}

impl Default for ApproximateShaper {
    fn default() -> Self {
        Self {
            char_width_ratio: 0.6,
            ascent: 0.8,
            descent: 0.2,
            families: None,
            kerning: HashMap::new(),
        }
    }
}

impl ApproximateShaper {
    /// Create a shaper with the default ratios.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a kerning adjustment (in ems) applied between `left` and `right`.
    #[must_use]
    pub fn with_kerning_pair(mut self, left: char, right: char, adjustment: f32) -> Self {
        let _ = self.kerning.insert((left, right), adjustment);
        self
    }

    /// Restrict the families this shaper resolves.
    #[must_use]
    pub fn with_families(mut self, families: &[&str]) -> Self {
        self.families = Some(families.iter().map(|f| (*f).to_string()).collect());
        self
    }
}

/// Code points that take no horizontal space.
#[must_use]
pub const fn is_zero_width(ch: char) -> bool {
    matches!(
        ch,
        '\n' | '\r' | '\u{00AD}' | '\u{200B}' | '\u{200C}' | '\u{200D}' | '\u{2060}' | '\u{FEFF}'
    )
}

impl TextShaper for ApproximateShaper {
    fn resolve_font(&self, family: &str) -> Option<FontFace> {
        let known = self
            .families
            .as_ref()
            .is_none_or(|families| families.iter().any(|f| f.eq_ignore_ascii_case(family)));
        known.then(|| FontFace {
            family: family.to_string(),
            ascent: self.ascent,
            descent: self.descent,
        })
    }

    fn shape(&self, text: &str, _script: Script, font: &FontSpec) -> Vec<Glyph> {
        text.chars()
            .map(|ch| {
                let advance = if is_zero_width(ch) {
                    0.0
                } else {
                    font.size * self.char_width_ratio
                };
                Glyph::new(ch, advance)
            })
            .collect()
    }

    fn kern(&self, glyphs: &mut [Glyph], font: &FontSpec) {
        if self.kerning.is_empty() {
            return;
        }
        for i in 1..glyphs.len() {
            if let Some(adjust) = self.kerning.get(&(glyphs[i - 1].ch, glyphs[i].ch)) {
                glyphs[i - 1].advance += adjust * font.size;
            }
        }
    }
}

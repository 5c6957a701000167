//! Layered property lookup for inline items.
//!
//! [CSS Cascading and Inheritance Level 4 § 7 Inheritance](https://www.w3.org/TR/css-cascade-4/#inheriting)
//!
//! "Inheritance propagates property values from parent elements to their
//! children. The inherited value of a property on an element is the
//! computed value of the property on the element's parent element."
//!
//! Every inline item carries a [`Properties`] value with three layers that
//! are consulted in a fixed order:
//!
//! 1. the item's own properties,
//! 2. the properties of the model element the item was generated from,
//! 3. the properties inherited from the nearest ancestor (inherited keys only),
//!
//! falling back to [`PropertyKey::default_value`]. A value of the wrong kind
//! or an unsupported unit is reported through
//! [`warn_once`] and treated as absent.

use std::collections::HashMap;
use std::rc::Rc;
use std::str::FromStr;

use serde::Serialize;
use strum_macros::{Display, EnumString};
use weft_common::warning::warn_once;

use crate::tab::{TabAlignment, TabStop};

/// User agent default font size in pixels.
/// [§ 3.5 font-size](https://www.w3.org/TR/css-fonts-4/#font-size-prop)
pub const DEFAULT_FONT_SIZE_PX: f32 = 16.0;

/// Default share of justification space given to word spaces.
pub const DEFAULT_SPACING_RATIO: f32 = 0.75;

/// Properties the inline engine reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum PropertyKey {
    /// Family name handed to [`TextShaper::resolve_font`](crate::shaping::TextShaper::resolve_font).
    FontFamily,
    /// Font size in pixels.
    FontSize,
    /// Synthetic bold.
    FontBold,
    /// Synthetic italic.
    FontItalic,
    /// [§ 5.5 overflow-wrap](https://www.w3.org/TR/css-text-3/#overflow-wrap-property)
    OverflowWrap,
    /// [§ 6.1 hyphens](https://www.w3.org/TR/css-text-3/#hyphens-property)
    Hyphenate,
    /// Share of justification space distributed to word spaces (0..=1).
    SpacingRatio,
    /// Explicit tab stops.
    TabStops,
    /// Interval of the implicit tab stops after the last explicit one.
    TabInterval,
    /// Character that anchor-aligned tab stops align on.
    TabAnchor,
    /// [§ 10.8 line-height](https://www.w3.org/TR/CSS2/visudet.html#propdef-line-height)
    LineHeight,
    /// Vertical offset of the item's baseline (positive raises).
    BaselineShift,
}

impl PropertyKey {
    /// Whether the property inherits from ancestors.
    ///
    /// [§ 7.2 Inherited properties](https://www.w3.org/TR/css-cascade-4/#inherited-property)
    #[must_use]
    pub const fn is_inherited(self) -> bool {
        !matches!(self, Self::BaselineShift)
    }

    /// The initial value of the property.
    #[must_use]
    pub fn default_value(self) -> PropertyValue {
        match self {
            Self::FontFamily => PropertyValue::Text("sans-serif".to_string()),
            Self::FontSize => PropertyValue::Length(Length::Px(DEFAULT_FONT_SIZE_PX)),
            Self::FontBold | Self::FontItalic => PropertyValue::Flag(false),
            Self::OverflowWrap => PropertyValue::Keyword(OverflowWrap::Normal.to_string()),
            Self::Hyphenate => PropertyValue::Flag(false),
            Self::SpacingRatio => PropertyValue::Number(DEFAULT_SPACING_RATIO),
            Self::TabStops => PropertyValue::TabStops(Vec::new()),
            Self::TabInterval => PropertyValue::Number(0.0),
            Self::TabAnchor => PropertyValue::Text(".".to_string()),
            Self::LineHeight => PropertyValue::Keyword("normal".to_string()),
            Self::BaselineShift => PropertyValue::Length(Length::Px(0.0)),
        }
    }
}

/// A length that may be relative to something the engine does not know.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Length {
    /// Absolute pixels.
    Px(f32),
    /// Percentage of a context-dependent reference.
    Percent(f32),
}

/// A declared property value.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    /// A length.
    Length(Length),
    /// A plain number.
    Number(f32),
    /// A boolean switch.
    Flag(bool),
    /// A CSS-style keyword, parsed on access.
    Keyword(String),
    /// Free text (family names, anchor characters).
    Text(String),
    /// A list of tab stops.
    TabStops(Vec<TabStop>),
}

/// [§ 5.5 Overflow Wrapping](https://www.w3.org/TR/css-text-3/#overflow-wrap-property)
///
/// "This property specifies whether the UA may break at otherwise
/// disallowed points within a line to prevent overflow, when an otherwise
/// unbreakable string is too long to fit within the line box."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, Serialize)]
#[strum(serialize_all = "kebab-case")]
pub enum OverflowWrap {
    /// "Lines may break only at allowed break points."
    #[default]
    Normal,
    /// "An otherwise unbreakable sequence of characters may be broken at an
    /// arbitrary point if there are no otherwise-acceptable break points in
    /// the line."
    Anywhere,
    /// "As for anywhere except that soft wrap opportunities introduced by
    /// break-word are not considered when calculating min-content intrinsic
    /// sizes."
    BreakWord,
}

impl OverflowWrap {
    /// Whether a single grapheme cluster may be split when even one cluster
    /// does not fit.
    #[must_use]
    pub const fn allows_mid_cluster_break(self) -> bool {
        matches!(self, Self::Anywhere | Self::BreakWord)
    }
}

/// [§ 10.8 Line height calculations](https://www.w3.org/TR/CSS2/visudet.html#line-height)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum LineHeight {
    /// "Tells user agents to set the used value to a 'reasonable' value
    /// based on the font of the element."
    Normal,
    /// "The used value of the property is this number multiplied by the
    /// element's font size."
    Multiplier(f32),
    /// "The specified length is used in the calculation of the line box
    /// height."
    Px(f32),
}

/// A single layer of declared properties.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyMap {
    values: HashMap<PropertyKey, PropertyValue>,
}

impl PropertyMap {
    /// Create an empty layer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, key: PropertyKey, value: PropertyValue) -> Self {
        self.set(key, value);
        self
    }

    /// Declare `key`, replacing any earlier declaration.
    pub fn set(&mut self, key: PropertyKey, value: PropertyValue) {
        let _ = self.values.insert(key, value);
    }

    /// Look up a declared value.
    #[must_use]
    pub fn get(&self, key: PropertyKey) -> Option<&PropertyValue> {
        self.values.get(&key)
    }
}

/// Resolve `key` through three ordered lookups: own, model element, then
/// (for inherited keys) the ancestor. Returns `None` when no layer declares
/// it, leaving the initial value to the caller.
#[must_use]
pub fn resolve_layered<O, M, I>(key: PropertyKey, own: O, model: M, inherited: I) -> Option<PropertyValue>
where
    O: Fn(PropertyKey) -> Option<PropertyValue>,
    M: Fn(PropertyKey) -> Option<PropertyValue>,
    I: Fn(PropertyKey) -> Option<PropertyValue>,
{
    own(key)
        .or_else(|| model(key))
        .or_else(|| key.is_inherited().then(|| inherited(key)).flatten())
}

/// The layered property lookup attached to an inline item.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Properties {
    own: PropertyMap,
    model: Option<Rc<PropertyMap>>,
    inherited: Option<Rc<PropertyMap>>,
}

impl Properties {
    /// Properties with only an own layer.
    #[must_use]
    pub fn new(own: PropertyMap) -> Self {
        Self {
            own,
            model: None,
            inherited: None,
        }
    }

    /// Attach the model element layer.
    #[must_use]
    pub fn with_model(mut self, model: Rc<PropertyMap>) -> Self {
        self.model = Some(model);
        self
    }

    /// Attach the ancestor layer.
    #[must_use]
    pub fn with_inherited(mut self, inherited: Rc<PropertyMap>) -> Self {
        self.inherited = Some(inherited);
        self
    }

    /// The resolved value of `key`, falling back to its initial value.
    #[must_use]
    pub fn resolve(&self, key: PropertyKey) -> PropertyValue {
        resolve_layered(
            key,
            |k| self.own.get(k).cloned(),
            |k| self.model.as_ref().and_then(|m| m.get(k).cloned()),
            |k| self.inherited.as_ref().and_then(|m| m.get(k).cloned()),
        )
        .unwrap_or_else(|| key.default_value())
    }

    /// Font family name.
    #[must_use]
    pub fn font_family(&self) -> String {
        match self.resolve(PropertyKey::FontFamily) {
            PropertyValue::Text(name) | PropertyValue::Keyword(name) => name,
            other => malformed(PropertyKey::FontFamily, &other, "sans-serif".to_string()),
        }
    }

    /// Font size in pixels.
    ///
    /// Only absolute lengths are accepted: the engine has no parent font
    /// size to resolve a percentage against.
    #[must_use]
    pub fn font_size(&self) -> f32 {
        match self.resolve(PropertyKey::FontSize) {
            PropertyValue::Length(Length::Px(px)) | PropertyValue::Number(px) if px > 0.0 => px,
            other => malformed(PropertyKey::FontSize, &other, DEFAULT_FONT_SIZE_PX),
        }
    }

    /// Synthetic bold.
    #[must_use]
    pub fn bold(&self) -> bool {
        self.flag(PropertyKey::FontBold)
    }

    /// Synthetic italic.
    #[must_use]
    pub fn italic(&self) -> bool {
        self.flag(PropertyKey::FontItalic)
    }

    /// Whether automatic hyphenation is enabled.
    #[must_use]
    pub fn hyphenate(&self) -> bool {
        self.flag(PropertyKey::Hyphenate)
    }

    /// [§ 5.5 overflow-wrap](https://www.w3.org/TR/css-text-3/#overflow-wrap-property)
    #[must_use]
    pub fn overflow_wrap(&self) -> OverflowWrap {
        self.keyword(PropertyKey::OverflowWrap)
    }

    /// Justification spacing ratio in `0..=1`.
    #[must_use]
    pub fn spacing_ratio(&self) -> f32 {
        match self.resolve(PropertyKey::SpacingRatio) {
            PropertyValue::Number(ratio) if (0.0..=1.0).contains(&ratio) => ratio,
            other => malformed(PropertyKey::SpacingRatio, &other, DEFAULT_SPACING_RATIO),
        }
    }

    /// Explicit tab stops, sorted by position.
    #[must_use]
    pub fn tab_stops(&self) -> Vec<TabStop> {
        match self.resolve(PropertyKey::TabStops) {
            PropertyValue::TabStops(mut stops) => {
                stops.sort_by(|a, b| a.position.total_cmp(&b.position));
                stops
            }
            other => malformed(PropertyKey::TabStops, &other, Vec::new()),
        }
    }

    /// Interval of implicit tab stops, if one is declared.
    #[must_use]
    pub fn tab_interval(&self) -> Option<f32> {
        match self.resolve(PropertyKey::TabInterval) {
            PropertyValue::Number(px) | PropertyValue::Length(Length::Px(px)) if px > 0.0 => {
                Some(px)
            }
            PropertyValue::Number(px) if px.abs() <= f32::EPSILON => None,
            other => malformed(PropertyKey::TabInterval, &other, None),
        }
    }

    /// Anchor character for [`TabAlignment::Anchor`] stops.
    #[must_use]
    pub fn tab_anchor(&self) -> char {
        match self.resolve(PropertyKey::TabAnchor) {
            PropertyValue::Text(text) if text.chars().count() == 1 => {
                text.chars().next().unwrap_or('.')
            }
            other => malformed(PropertyKey::TabAnchor, &other, '.'),
        }
    }

    /// [§ 10.8 line-height](https://www.w3.org/TR/CSS2/visudet.html#propdef-line-height)
    #[must_use]
    pub fn line_height(&self) -> LineHeight {
        match self.resolve(PropertyKey::LineHeight) {
            PropertyValue::Keyword(k) if k.eq_ignore_ascii_case("normal") => LineHeight::Normal,
            PropertyValue::Number(n) if n >= 0.0 => LineHeight::Multiplier(n),
            PropertyValue::Length(Length::Px(px)) if px >= 0.0 => LineHeight::Px(px),
            // "<percentage>: The computed value of the property is this
            // percentage multiplied by the element's computed font size."
            PropertyValue::Length(Length::Percent(p)) if p >= 0.0 => {
                LineHeight::Multiplier(p / 100.0)
            }
            other => malformed(PropertyKey::LineHeight, &other, LineHeight::Normal),
        }
    }

    /// Baseline shift in pixels (positive raises the item).
    #[must_use]
    pub fn baseline_shift(&self) -> f32 {
        match self.resolve(PropertyKey::BaselineShift) {
            PropertyValue::Length(Length::Px(px)) | PropertyValue::Number(px) => px,
            other => malformed(PropertyKey::BaselineShift, &other, 0.0),
        }
    }

    fn flag(&self, key: PropertyKey) -> bool {
        match self.resolve(key) {
            PropertyValue::Flag(on) => on,
            PropertyValue::Keyword(k) if k.eq_ignore_ascii_case("auto") => true,
            PropertyValue::Keyword(k)
                if k.eq_ignore_ascii_case("none") || k.eq_ignore_ascii_case("manual") =>
            {
                false
            }
            other => malformed(key, &other, false),
        }
    }

    fn keyword<T>(&self, key: PropertyKey) -> T
    where
        T: FromStr + Default,
    {
        match self.resolve(key) {
            PropertyValue::Keyword(k) => k.parse().unwrap_or_else(|_| {
                warn_once("Layout", &format!("unsupported {key} value '{k}'; property ignored"));
                T::default()
            }),
            other => malformed(key, &other, T::default()),
        }
    }
}

/// Report a value that is not acceptable for `key` and return `fallback`.
fn malformed<T>(key: PropertyKey, value: &PropertyValue, fallback: T) -> T {
    let description = match value {
        PropertyValue::Length(Length::Percent(p)) => format!("percentage {p}% for {key}"),
        PropertyValue::Length(Length::Px(px)) => format!("length {px}px for {key}"),
        PropertyValue::Number(n) => format!("number {n} for {key}"),
        PropertyValue::Flag(b) => format!("flag {b} for {key}"),
        PropertyValue::Keyword(k) => format!("keyword '{k}' for {key}"),
        PropertyValue::Text(t) => format!("text '{t}' for {key}"),
        PropertyValue::TabStops(_) => format!("tab stops for {key}"),
    };
    warn_once("Layout", &format!("unsupported {description}; property ignored"));
    fallback
}

/// Convenience constructor for a tab stop list value.
#[must_use]
pub fn tab_stops(stops: &[(f32, TabAlignment)]) -> PropertyValue {
    PropertyValue::TabStops(
        stops
            .iter()
            .map(|&(position, alignment)| TabStop {
                position,
                alignment,
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use weft_common::warning::emitted_warnings;

    #[test]
    fn test_own_layer_wins_over_model_and_ancestor() {
        let model = Rc::new(PropertyMap::new().with(PropertyKey::FontSize, PropertyValue::Number(20.0)));
        let ancestor = Rc::new(PropertyMap::new().with(PropertyKey::FontSize, PropertyValue::Number(30.0)));
        let own = PropertyMap::new().with(PropertyKey::FontSize, PropertyValue::Number(10.0));

        let props = Properties::new(own).with_model(model.clone()).with_inherited(ancestor.clone());
        assert!((props.font_size() - 10.0).abs() < f32::EPSILON);

        let props = Properties::new(PropertyMap::new()).with_model(model).with_inherited(ancestor.clone());
        assert!((props.font_size() - 20.0).abs() < f32::EPSILON);

        let props = Properties::new(PropertyMap::new()).with_inherited(ancestor);
        assert!((props.font_size() - 30.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_non_inherited_key_skips_ancestor() {
        let ancestor = Rc::new(
            PropertyMap::new().with(PropertyKey::BaselineShift, PropertyValue::Length(Length::Px(4.0))),
        );
        let props = Properties::new(PropertyMap::new()).with_inherited(ancestor);
        assert!(props.baseline_shift().abs() < f32::EPSILON);
    }

    #[test]
    fn test_percentage_font_size_is_ignored_with_warning() {
        let props = Properties::new(
            PropertyMap::new().with(PropertyKey::FontSize, PropertyValue::Length(Length::Percent(150.0))),
        );
        assert!((props.font_size() - DEFAULT_FONT_SIZE_PX).abs() < f32::EPSILON);
        assert!(
            emitted_warnings()
                .iter()
                .any(|w| w.contains("percentage 150% for font-size"))
        );
    }

    #[test]
    fn test_keyword_parsing() {
        let props = Properties::new(
            PropertyMap::new().with(PropertyKey::OverflowWrap, PropertyValue::Keyword("break-word".into())),
        );
        assert_eq!(props.overflow_wrap(), OverflowWrap::BreakWord);

        let props = Properties::new(
            PropertyMap::new().with(PropertyKey::OverflowWrap, PropertyValue::Keyword("sideways".into())),
        );
        assert_eq!(props.overflow_wrap(), OverflowWrap::Normal);
    }

    #[test]
    fn test_line_height_forms() {
        let props = Properties::new(
            PropertyMap::new().with(PropertyKey::LineHeight, PropertyValue::Length(Length::Percent(150.0))),
        );
        assert_eq!(props.line_height(), LineHeight::Multiplier(1.5));
        assert_eq!(Properties::default().line_height(), LineHeight::Normal);
    }
}

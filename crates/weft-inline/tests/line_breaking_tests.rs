//! Integration tests for line breaking, floats, bidi, and justification.

use std::rc::Rc;

use weft_inline::float::FloatObstacleTracker;
use weft_inline::hyphenation::ExceptionListHyphenator;
use weft_inline::segmentation::ScriptSegmenter;
use weft_inline::{
    BaseDirection, FixedSizeBox, FloatItem, FloatSide, InlineItem, Justifier, LayoutArea, LayoutContext,
    LayoutServices, LayoutStatus, LineBreaker, LineBreakerOptions, Properties, PropertyKey, PropertyMap,
    PropertyValue, Rect, TextRun,
};
use weft_inline::shaping::ApproximateShaper;

/// 10px text: every glyph is 6px wide, 8px ascent, 2px descent.
fn text_with(s: &str, map: PropertyMap) -> InlineItem {
    let map = map.with(PropertyKey::FontSize, PropertyValue::Number(10.0));
    InlineItem::Text(TextRun::shape(s, Properties::new(map), &ApproximateShaper::new()).unwrap())
}

fn text(s: &str) -> InlineItem {
    text_with(s, PropertyMap::new())
}

fn area(width: f32) -> LayoutArea {
    LayoutArea::new(Rect::new(0.0, 0.0, width, 100.0))
}

fn overflow_texts(items: &[InlineItem]) -> Vec<String> {
    items
        .iter()
        .filter_map(InlineItem::as_text)
        .map(TextRun::text)
        .collect()
}

/// Lay out `items` line by line, moving down after each line, until
/// nothing is left over.
fn paginate(breaker: &LineBreaker, items: Vec<InlineItem>, width: f32) -> Vec<String> {
    let mut floats = FloatObstacleTracker::new();
    let mut items = items;
    let mut lines = Vec::new();
    let mut y = 0.0;
    for _ in 0..100 {
        let mut ctx = LayoutContext::new(LayoutArea::new(Rect::new(0.0, y, width, 1000.0)), &mut floats);
        let result = breaker.layout(&items, &mut ctx).unwrap();
        let line = result.line.expect("a line is produced");
        y += line.rect.height;
        lines.push(line.text());
        if result.status == LayoutStatus::Full {
            return lines;
        }
        items = result.overflow;
    }
    panic!("layout did not terminate");
}

#[test]
fn test_hello_world_split() {
    let mut floats = FloatObstacleTracker::new();
    let mut ctx = LayoutContext::new(area(60.0), &mut floats);
    let breaker = LineBreaker::new(LayoutServices::default(), LineBreakerOptions::default());
    let result = breaker.layout(&[text("Hello World")], &mut ctx).unwrap();

    assert_eq!(result.status, LayoutStatus::Partial);
    let line = result.line.unwrap();
    let placed = line.items[0].item.as_text().unwrap();
    assert_eq!(placed.text(), "Hello ");
    assert_eq!(line.text(), "Hello");
    assert_eq!(overflow_texts(&result.overflow), vec!["World"]);
}

#[test]
fn test_newline_split() {
    let mut floats = FloatObstacleTracker::new();
    let mut ctx = LayoutContext::new(area(1000.0), &mut floats);
    let breaker = LineBreaker::new(LayoutServices::default(), LineBreakerOptions::default());
    let result = breaker.layout(&[text("first\nsecond")], &mut ctx).unwrap();

    assert_eq!(result.status, LayoutStatus::Partial);
    assert!(result.split_forced_by_newline);
    assert_eq!(overflow_texts(&result.overflow), vec!["second"]);
}

#[test]
fn test_forced_character_split() {
    let mut floats = FloatObstacleTracker::new();
    let mut ctx = LayoutContext::new(area(30.0), &mut floats);
    let breaker = LineBreaker::new(LayoutServices::default(), LineBreakerOptions::default());
    let result = breaker.layout(&[text("abcdefghij")], &mut ctx).unwrap();

    assert_eq!(result.status, LayoutStatus::Partial);
    assert_eq!(result.line.unwrap().text(), "abcde");
    assert_eq!(overflow_texts(&result.overflow), vec!["fghij"]);
}

#[test]
fn test_floats_narrow_the_line() {
    let mut floats = FloatObstacleTracker::new();
    let left = InlineItem::Float(FloatItem::new(
        FloatSide::Left,
        Rc::new(FixedSizeBox::new(30.0, 20.0)),
        Properties::default(),
    ));
    let right = InlineItem::Float(FloatItem::new(
        FloatSide::Right,
        Rc::new(FixedSizeBox::new(20.0, 20.0)),
        Properties::default(),
    ));
    let items = [left, right, text("aaaa bbbb cccc dddd eeee ffff")];

    let mut ctx = LayoutContext::new(area(200.0), &mut floats);
    let breaker = LineBreaker::new(LayoutServices::default(), LineBreakerOptions::default());
    let result = breaker.layout(&items, &mut ctx).unwrap();

    let line = result.line.unwrap();
    assert_eq!(line.text(), "aaaa bbbb cccc dddd eeee");
    assert!((line.rect.x - 30.0).abs() < 1e-3);
    assert!(line.rect.width <= 150.0);
    assert_eq!(overflow_texts(&result.overflow), vec!["ffff"]);

    let exclusions = floats.exclusions(&Rect::new(0.0, 0.0, 200.0, 100.0), 0.0, 0.0);
    assert!((exclusions.total() - 50.0).abs() < 1e-3);
    assert!((floats.max_float_bottom() - 20.0).abs() < 1e-3);
}

#[test]
fn test_floats_end_below_their_bottom() {
    let mut floats = FloatObstacleTracker::new();
    let float = InlineItem::Float(FloatItem::new(
        FloatSide::Left,
        Rc::new(FixedSizeBox::new(30.0, 15.0)),
        Properties::default(),
    ));
    let breaker = LineBreaker::new(LayoutServices::default(), LineBreakerOptions::default());

    let mut ctx = LayoutContext::new(area(100.0), &mut floats);
    let first = breaker.layout(&[float, text("aaaa bbbb cccc")], &mut ctx).unwrap();
    assert!((first.line.unwrap().rect.x - 30.0).abs() < 1e-3);

    // The second line starts at y = 10, still beside the float.
    let mut ctx = LayoutContext::new(LayoutArea::new(Rect::new(0.0, 10.0, 100.0, 90.0)), &mut floats);
    let second = breaker.layout(&first.overflow, &mut ctx).unwrap();
    assert!((second.line.unwrap().rect.x - 30.0).abs() < 1e-3);

    // The third starts below it.
    let mut ctx = LayoutContext::new(LayoutArea::new(Rect::new(0.0, 20.0, 100.0, 80.0)), &mut floats);
    let third = breaker.layout(&[text("dddd")], &mut ctx).unwrap();
    assert!(third.line.unwrap().rect.x.abs() < 1e-3);
    assert!((floats.clear(weft_inline::ClearSide::Left, 0.0) - 15.0).abs() < 1e-3);

    floats.reclaim_below(0.0);
    assert!(floats.is_empty());
}

#[test]
fn test_single_word_justification_is_unchanged() {
    let mut floats = FloatObstacleTracker::new();
    let mut ctx = LayoutContext::new(area(100.0), &mut floats);
    let breaker = LineBreaker::new(LayoutServices::default(), LineBreakerOptions::default());
    let mut line = breaker.layout(&[text("Hello")], &mut ctx).unwrap().line.unwrap();
    let before = line.geometry();

    Justifier::with_ratio(1.0).justify(&mut line, 100.0);
    assert_eq!(line.geometry(), before);
}

#[test]
fn test_justified_line_fills_the_box() {
    let mut floats = FloatObstacleTracker::new();
    let mut ctx = LayoutContext::new(area(90.0), &mut floats);
    let breaker = LineBreaker::new(LayoutServices::default(), LineBreakerOptions::default());
    let result = breaker.layout(&[text("aaa bbb ccc dddd")], &mut ctx).unwrap();
    let mut line = result.line.unwrap();
    assert_eq!(line.text(), "aaa bbb ccc");
    assert!((line.rect.width - 66.0).abs() < 1e-3);

    Justifier::new().justify(&mut line, 90.0);
    assert!((line.rect.width - 90.0).abs() < 1e-3);
    assert!((line.content_right() - 90.0).abs() < 1e-3);
}

#[test]
fn test_hebrew_and_latin_are_reordered() {
    let mut floats = FloatObstacleTracker::new();
    let mut ctx = LayoutContext::new(area(200.0), &mut floats);
    let breaker = LineBreaker::new(LayoutServices::default(), LineBreakerOptions::default());
    let result = breaker.layout(&[text("abc \u{05D0}\u{05D1}\u{05D2}")], &mut ctx).unwrap();
    let line = result.line.unwrap();

    assert_eq!(line.bidi_levels, Some(vec![0, 0, 0, 0, 1, 1, 1]));
    assert_eq!(line.items.len(), 2);
    assert_eq!(line.items[0].text().as_deref(), Some("abc "));
    assert!(!line.items[0].reversed);
    assert_eq!(line.items[1].text().as_deref(), Some("\u{05D0}\u{05D1}\u{05D2}"));
    assert!(line.items[1].reversed);
    assert!((line.items[1].rect.x - 24.0).abs() < 1e-3);
}

#[test]
fn test_leading_hebrew_word_stays_on_the_left() {
    let mut floats = FloatObstacleTracker::new();
    let mut ctx = LayoutContext::new(area(200.0), &mut floats);
    let breaker = LineBreaker::new(LayoutServices::default(), LineBreakerOptions::default());
    let result = breaker.layout(&[text("\u{05D0}\u{05D1}\u{05D2} def")], &mut ctx).unwrap();
    let line = result.line.unwrap();

    assert_eq!(line.bidi_levels, Some(vec![1, 1, 1, 0, 0, 0, 0]));
    assert_eq!(line.items.len(), 2);
    assert_eq!(line.items[0].text().as_deref(), Some("\u{05D0}\u{05D1}\u{05D2}"));
    assert!(line.items[0].reversed);
    assert!(line.items[0].rect.x.abs() < 1e-3);
    assert_eq!(line.items[1].text().as_deref(), Some(" def"));
    assert!(!line.items[1].reversed);
    assert!((line.items[1].rect.x - 18.0).abs() < 1e-3);
}

#[test]
fn test_rtl_paragraph_puts_hebrew_first() {
    let mut floats = FloatObstacleTracker::new();
    let mut ctx = LayoutContext::new(area(200.0), &mut floats);
    let options = LineBreakerOptions {
        base_direction: BaseDirection::Rtl,
        ..LineBreakerOptions::default()
    };
    let breaker = LineBreaker::new(LayoutServices::default(), options);
    let result = breaker.layout(&[text("abc \u{05D0}\u{05D1}\u{05D2}")], &mut ctx).unwrap();
    let line = result.line.unwrap();

    let visual: Vec<String> = line.items.iter().filter_map(|p| p.text()).collect();
    assert_eq!(visual, vec![" \u{05D0}\u{05D1}\u{05D2}".to_string(), "abc".to_string()]);
    assert!(line.items[0].rect.x.abs() < 1e-3);
    assert!((line.items[1].rect.x - 24.0).abs() < 1e-3);
}

#[test]
fn test_paragraph_pagination() {
    let breaker = LineBreaker::new(LayoutServices::default(), LineBreakerOptions::default());
    let lines = paginate(&breaker, vec![text("The quick brown fox jumps over the lazy dog")], 60.0);
    assert_eq!(lines, vec!["The quick", "brown fox", "jumps over", "the lazy", "dog"]);
}

#[test]
fn test_hyphenation_from_exception_list() {
    let services = LayoutServices::default().with_hyphenator(ExceptionListHyphenator::new().with_word("hy-phen-ation"));
    let breaker = LineBreaker::new(services, LineBreakerOptions::default());
    let map = PropertyMap::new().with(PropertyKey::Hyphenate, PropertyValue::Flag(true));

    let mut floats = FloatObstacleTracker::new();
    let mut ctx = LayoutContext::new(area(60.0), &mut floats);
    let result = breaker.layout(&[text_with("hyphenation", map)], &mut ctx).unwrap();
    let line = result.line.unwrap();

    assert_eq!(line.text(), "hyphen");
    let summary = line.items[0].item.as_text().unwrap().summary();
    assert_eq!(summary.text, "hyphen");
    assert!(summary.hyphenated);
    assert!((line.rect.width - 42.0).abs() < 1e-3);
    assert_eq!(overflow_texts(&result.overflow), vec!["ation"]);
}

/// Thai has no spaces between words; break offsets come from the segmenter.
struct FixedOffsets(Vec<usize>);

impl ScriptSegmenter for FixedOffsets {
    fn break_offsets(&self, _text: &str) -> Vec<usize> {
        self.0.clone()
    }
}

#[test]
fn test_special_script_breaks_come_from_segmenter() {
    // "สวัสดีครับ": two words, the first six code points long.
    let services = LayoutServices::default().with_segmenter(FixedOffsets(vec![6]));
    let breaker = LineBreaker::new(services, LineBreakerOptions::default());

    let mut floats = FloatObstacleTracker::new();
    let mut ctx = LayoutContext::new(area(40.0), &mut floats);
    let result = breaker
        .layout(&[text("\u{0E2A}\u{0E27}\u{0E31}\u{0E2A}\u{0E14}\u{0E35}\u{0E04}\u{0E23}\u{0E31}\u{0E1A}")], &mut ctx)
        .unwrap();

    assert_eq!(result.status, LayoutStatus::Partial);
    let placed = result.line.unwrap().items[0].item.as_text().unwrap().window();
    assert_eq!(placed, 0..6);
}

#[test]
fn test_layout_is_idempotent() {
    let float = InlineItem::Float(FloatItem::new(
        FloatSide::Right,
        Rc::new(FixedSizeBox::new(25.0, 12.0)),
        Properties::default(),
    ));
    let items = vec![text("Lorem ipsum "), float, text("dolor sit amet")];
    let breaker = LineBreaker::new(LayoutServices::default(), LineBreakerOptions::default());
    let floats = FloatObstacleTracker::new();

    let snapshot = || {
        let mut floats = floats.clone();
        let mut ctx = LayoutContext::new(area(90.0), &mut floats);
        let result = breaker.layout(&items, &mut ctx).unwrap();
        (
            serde_json::to_value(result.line.unwrap().geometry()).unwrap(),
            overflow_texts(&result.overflow),
        )
    };
    assert_eq!(snapshot(), snapshot());
}

#[test]
fn test_nothing_leaves_float_list_untouched() {
    let mut floats = FloatObstacleTracker::new();
    let float = InlineItem::Float(FloatItem::new(
        FloatSide::Left,
        Rc::new(FixedSizeBox::new(10.0, 10.0)),
        Properties::default(),
    ));
    let short = LayoutArea::new(Rect::new(0.0, 0.0, 100.0, 5.0));
    let mut ctx = LayoutContext::new(short, &mut floats);
    let breaker = LineBreaker::new(LayoutServices::default(), LineBreakerOptions::default());
    let result = breaker.layout(&[float, text("tall")], &mut ctx).unwrap();

    assert_eq!(result.status, LayoutStatus::Nothing);
    assert_eq!(result.overflow.len(), 2);
    assert!(floats.is_empty());
}

//! Property tests for pagination, justification, bidi reordering, and text
//! splitting.
#![allow(clippy::needless_pass_by_value)]

use std::rc::Rc;

use quickcheck::TestResult;
use quickcheck_macros::quickcheck;
use weft_inline::float::FloatObstacleTracker;
use weft_inline::{
    ApproximateShaper, BaseDirection, InlineItem, Justifier, LayoutArea, LayoutContext, LayoutServices,
    LayoutStatus, LineBreaker, LineBreakerOptions, Properties, PropertyKey, PropertyMap, PropertyValue, Rect,
    TextRun,
};

const LATIN: [char; 5] = ['a', 'b', 'c', ' ', '\n'];
const WORDS: [char; 4] = ['a', 'b', 'c', ' '];
const MIXED: [char; 5] = ['a', 'b', ' ', '\u{05D0}', '\u{05D1}'];
/// Items that end in whitespace, hard breaks, and zero-width text.
const PIECES: [&str; 8] = ["ab", "cd ", "ab    ", "\n", "\u{200B}", " ", "a b", "abcdefgh"];

fn decode(bytes: &[u8], alphabet: &[char]) -> String {
    bytes
        .iter()
        .take(60)
        .map(|&b| alphabet[usize::from(b) % alphabet.len()])
        .collect()
}

fn run(s: &str) -> TextRun {
    let props = Properties::new(PropertyMap::new().with(PropertyKey::FontSize, PropertyValue::Number(10.0)));
    TextRun::shape(s, props, &ApproximateShaper::new()).unwrap()
}

fn area(width: f32) -> LayoutArea {
    LayoutArea::new(Rect::new(0.0, 0.0, width, 1000.0))
}

#[quickcheck]
fn pagination_places_every_glyph_once(bytes: Vec<u8>, width: u8) -> TestResult {
    let text = decode(&bytes, &LATIN);
    let width = 6.0 + f32::from(width);
    let breaker = LineBreaker::new(LayoutServices::default(), LineBreakerOptions::default());
    let mut floats = FloatObstacleTracker::new();

    let mut items = vec![InlineItem::Text(run(&text))];
    let mut placed = String::new();
    for _ in 0..=text.chars().count() {
        let mut ctx = LayoutContext::new(area(width), &mut floats);
        let result = breaker.layout(&items, &mut ctx).unwrap();
        let Some(line) = result.line else {
            return TestResult::failed();
        };
        if line.rect.width > width + 1e-3 {
            return TestResult::failed();
        }
        for item in &line.items {
            if let Some(text_run) = item.item.as_text() {
                placed.push_str(&text_run.text());
            }
        }
        if result.status == LayoutStatus::Full {
            return TestResult::from_bool(placed == text);
        }
        items = result.overflow;
    }
    TestResult::failed()
}

#[quickcheck]
fn lines_of_several_items_stay_inside_the_box(pieces: Vec<u8>, width: u8) -> bool {
    let items: Vec<InlineItem> = pieces
        .iter()
        .take(12)
        .map(|&b| InlineItem::Text(run(PIECES[usize::from(b) % PIECES.len()])))
        .collect();
    let width = 6.0 + f32::from(width % 120);
    let breaker = LineBreaker::new(LayoutServices::default(), LineBreakerOptions::default());
    let mut floats = FloatObstacleTracker::new();

    let glyphs: usize = PIECES.iter().map(|p| p.chars().count()).sum();
    let mut items = items;
    for _ in 0..=glyphs * items.len().max(1) {
        let mut ctx = LayoutContext::new(area(width), &mut floats);
        let result = breaker.layout(&items, &mut ctx).unwrap();
        let Some(line) = result.line else {
            return false;
        };
        if line.rect.width > width + 1e-3 || line.items.iter().any(|item| item.rect.right() > width + 1e-3) {
            return false;
        }
        if result.status == LayoutStatus::Full {
            return true;
        }
        items = result.overflow;
    }
    false
}

#[quickcheck]
fn justified_line_reaches_target(bytes: Vec<u8>, extra: u8) -> TestResult {
    let text = decode(&bytes, &WORDS);
    let breaker = LineBreaker::new(LayoutServices::default(), LineBreakerOptions::default());
    let mut floats = FloatObstacleTracker::new();
    let mut ctx = LayoutContext::new(area(120.0), &mut floats);
    let Some(mut line) = breaker.layout(&[InlineItem::Text(run(&text))], &mut ctx).unwrap().line else {
        return TestResult::discard();
    };

    let before = line.rect.width;
    let target = before + 1.0 + f32::from(extra);
    Justifier::new().justify(&mut line, target);

    if line.text().chars().count() < 2 {
        return TestResult::from_bool((line.rect.width - before).abs() < 1e-3);
    }
    TestResult::from_bool((line.rect.width - target).abs() < 1e-2)
}

#[quickcheck]
fn reordering_keeps_every_visible_glyph(bytes: Vec<u8>, rtl: bool) -> bool {
    let text = decode(&bytes, &MIXED);
    let options = LineBreakerOptions {
        base_direction: if rtl { BaseDirection::Rtl } else { BaseDirection::Ltr },
        ..LineBreakerOptions::default()
    };
    let breaker = LineBreaker::new(LayoutServices::default(), options);
    let mut floats = FloatObstacleTracker::new();
    let mut ctx = LayoutContext::new(area(1000.0), &mut floats);
    let Some(line) = breaker.layout(&[InlineItem::Text(run(&text))], &mut ctx).unwrap().line else {
        return text.is_empty();
    };

    let mut rendered: Vec<char> = line.text().chars().collect();
    let mut expected: Vec<char> = text.trim_end_matches(' ').chars().collect();
    rendered.sort_unstable();
    expected.sort_unstable();

    let mut x = line.rect.x;
    let contiguous = line.items.iter().all(|item| {
        let ok = (item.rect.x - x).abs() < 1e-3;
        x = item.rect.right();
        ok
    });
    rendered == expected && contiguous
}

#[quickcheck]
fn split_partitions_the_window(bytes: Vec<u8>, at: usize) -> bool {
    let text = decode(&bytes, &LATIN);
    let whole = run(&text);
    let window = whole.window();
    let at = at % (window.end + 1);

    let (head, tail) = whole.split_at(at).unwrap();
    head.window() == (0..at)
        && tail.window() == (at..window.end)
        && Rc::ptr_eq(head.buffer(), tail.buffer())
        && format!("{}{}", head.text(), tail.text()) == text
}

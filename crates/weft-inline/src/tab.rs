//! Tab items and tab stop resolution.
//!
//! [§ 4.2 Tab Character Size](https://www.w3.org/TR/css-text-3/#tab-size-property)
//!
//! "Tab characters (U+0009) are rendered as a horizontal shift that lines
//! up the start edge of the next glyph with the next tab stop."
//!
//! A tab's width is not known when it is reached. Left-aligned stops are
//! resolved immediately. Right, center, and anchor stops align the item
//! *after* the tab, so they are resolved one item late, once that item's
//! width is known.

use std::rc::Rc;

use serde::Serialize;
use strum_macros::{Display, EnumString};

use crate::geometry::EPSILON;
use crate::properties::Properties;
use crate::width::IntrinsicContribution;

/// How the content after a tab lines up with its stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, Serialize)]
#[strum(serialize_all = "kebab-case")]
pub enum TabAlignment {
    /// Content starts at the stop.
    #[default]
    Left,
    /// Content is centered on the stop.
    Center,
    /// Content ends at the stop.
    Right,
    /// The anchor character of the content sits at the stop.
    Anchor,
}

/// A tab stop position, measured from the start of the line box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TabStop {
    /// Distance from the line box start edge.
    pub position: f32,
    /// Alignment of the following content.
    pub alignment: TabAlignment,
}

/// A tab in the inline sequence.
#[derive(Debug, Clone)]
pub struct TabItem {
    properties: Rc<Properties>,
}

impl TabItem {
    /// A tab with the given properties.
    #[must_use]
    pub fn new(properties: Properties) -> Self {
        Self {
            properties: Rc::new(properties),
        }
    }

    /// The tab's properties.
    #[must_use]
    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    /// The first stop strictly after `current`.
    ///
    /// Explicit stops are searched first. Past the last explicit stop,
    /// implicit left-aligned stops repeat every `tab-interval`, or every
    /// `default_interval` when the property is unset.
    #[must_use]
    pub fn next_stop(&self, current: f32, default_interval: f32) -> TabStop {
        let stops = self.properties.tab_stops();
        if let Some(stop) = stops.iter().find(|s| s.position > current + EPSILON) {
            return *stop;
        }

        let interval = self.properties.tab_interval().unwrap_or(default_interval);
        let origin = stops.last().map_or(0.0, |s| s.position.max(0.0));
        if interval <= EPSILON {
            // No usable interval: the tab only advances to where it is.
            return TabStop {
                position: current,
                alignment: TabAlignment::Left,
            };
        }
        let mut position = origin + interval * ((current - origin) / interval).floor().max(0.0);
        while position <= current + EPSILON {
            position += interval;
        }
        TabStop {
            position,
            alignment: TabAlignment::Left,
        }
    }

    /// The character anchor-aligned stops align on.
    #[must_use]
    pub fn anchor(&self) -> char {
        self.properties.tab_anchor()
    }

    /// A tab has no intrinsic width of its own; it is a break opportunity
    /// only after it.
    #[must_use]
    pub fn intrinsic_contribution(&self, default_interval: f32) -> IntrinsicContribution {
        let interval = self.properties.tab_interval().unwrap_or(default_interval);
        IntrinsicContribution {
            min: 0.0,
            max: interval,
            head: 0.0,
            tail: 0.0,
            breakable: false,
            break_before: false,
            break_after: true,
            hard_break: None,
        }
    }
}

/// A tab whose width waits for the item after it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingTab {
    /// Index of the tab in the placed items of the line.
    pub placed_index: usize,
    /// Line-relative x where the tab starts.
    pub start: f32,
    /// The stop it aligns to.
    pub stop: TabStop,
}

impl PendingTab {
    /// Width of the tab once the following content is known.
    ///
    /// `following` is the width of the item after the tab and
    /// `before_anchor` the width of that item up to its anchor character.
    #[must_use]
    pub fn resolve(&self, following: f32, before_anchor: f32) -> f32 {
        let span = self.stop.position - self.start;
        let width = match self.stop.alignment {
            TabAlignment::Left => span,
            TabAlignment::Right => span - following,
            TabAlignment::Center => span - following / 2.0,
            TabAlignment::Anchor => span - before_anchor,
        };
        width.max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::properties::{PropertyKey, PropertyMap, PropertyValue, tab_stops};

    fn tab(map: PropertyMap) -> TabItem {
        TabItem::new(Properties::new(map))
    }

    #[test]
    fn test_explicit_stop_strictly_after_current() {
        let item = tab(PropertyMap::new().with(
            PropertyKey::TabStops,
            tab_stops(&[(40.0, TabAlignment::Left), (100.0, TabAlignment::Right)]),
        ));
        assert_eq!(item.next_stop(10.0, 50.0).position, 40.0);
        let stop = item.next_stop(40.0, 50.0);
        assert_eq!(stop.position, 100.0);
        assert_eq!(stop.alignment, TabAlignment::Right);
    }

    #[test]
    fn test_implicit_stops_continue_after_last_explicit() {
        let item = tab(
            PropertyMap::new()
                .with(PropertyKey::TabStops, tab_stops(&[(30.0, TabAlignment::Left)]))
                .with(PropertyKey::TabInterval, PropertyValue::Number(25.0)),
        );
        assert_eq!(item.next_stop(30.0, 50.0).position, 55.0);
        assert_eq!(item.next_stop(60.0, 50.0).position, 80.0);
    }

    #[test]
    fn test_default_interval_applies_without_property() {
        let item = tab(PropertyMap::new());
        assert_eq!(item.next_stop(0.0, 50.0).position, 50.0);
        assert_eq!(item.next_stop(50.0, 50.0).position, 100.0);
        assert_eq!(item.next_stop(73.0, 50.0).position, 100.0);
    }

    #[test]
    fn test_pending_alignment_widths() {
        let pending = |alignment| PendingTab {
            placed_index: 0,
            start: 10.0,
            stop: TabStop {
                position: 100.0,
                alignment,
            },
        };
        assert_eq!(pending(TabAlignment::Left).resolve(20.0, 5.0), 90.0);
        assert_eq!(pending(TabAlignment::Right).resolve(20.0, 5.0), 70.0);
        assert_eq!(pending(TabAlignment::Center).resolve(20.0, 5.0), 80.0);
        assert_eq!(pending(TabAlignment::Anchor).resolve(20.0, 5.0), 85.0);
        assert_eq!(pending(TabAlignment::Right).resolve(200.0, 5.0), 0.0);
    }
}

//! The line breaker: fills one line from a sequence of inline items.
//!
//! [§ 9.4.2 Inline formatting contexts](https://www.w3.org/TR/CSS2/visuren.html#inline-formatting)
//!
//! "When the total width of the inline boxes on a line is less than the
//! width of the line box containing them, their horizontal distribution
//! within the line box is determined by the 'text-align' property."
//!
//! "When an inline box exceeds the width of a line box, it is split into
//! several boxes and these boxes are distributed across several line boxes."
//!
//! One [`LineBreaker::layout`] call produces one line. The pagination
//! caller feeds [`LineLayoutResult::overflow`] back in, unchanged, until the
//! status is no longer [`LayoutStatus::Partial`].

use std::collections::HashMap;

use serde::Serialize;
use strum_macros::{Display, EnumString};
use weft_common::warning::warn_once;

use crate::bidi::{BaseDirection, has_rtl};
use crate::context::{LayoutArea, LayoutContext, OverflowPolicy};
use crate::error::LayoutError;
use crate::geometry::{EPSILON, Rect, fits_within};
use crate::inline_block::{FloatItem, InlineBlock};
use crate::item::InlineItem;
use crate::line::{Line, PlacedItem};
use crate::properties::LineHeight;
use crate::result::{LayoutStatus, NothingCause, NothingReason};
use crate::segmentation::is_trimmable;
use crate::services::LayoutServices;
use crate::tab::{PendingTab, TabAlignment, TabItem};
use crate::text_run::{TextConstraints, TextRun};
use crate::width::{MinMaxWidth, WidthAccumulator};

/// [§ 10.8.1 Leading and half-leading](https://www.w3.org/TR/CSS2/visudet.html#leading)
///
/// "We recommend a used value for 'normal' between 1.0 and 1.2."
pub const NORMAL_LINE_HEIGHT_RATIO: f32 = 1.2;

/// Default distance between implicit tab stops, in pixels.
pub const DEFAULT_TAB_INTERVAL: f32 = 50.0;

/// How the vertical extent of a line is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, Serialize)]
#[strum(serialize_all = "kebab-case")]
pub enum RenderingProfile {
    /// Lines are as tall as the font metrics of their content.
    #[default]
    Default,
    /// [§ 10.8.1](https://www.w3.org/TR/CSS2/visudet.html#leading)
    ///
    /// Text contributes its `line-height`, with the leading split evenly
    /// above and below the glyphs.
    Html,
}

/// Engine-wide settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LineBreakerOptions {
    /// Paragraph direction used for bidi reordering.
    pub base_direction: BaseDirection,
    /// Vertical metrics mode.
    pub rendering_profile: RenderingProfile,
    /// Handling of unbreakable words that are too wide.
    pub overflow_policy: OverflowPolicy,
    /// Interval of implicit tab stops when `tab-interval` is unset.
    pub default_tab_interval: f32,
}

impl Default for LineBreakerOptions {
    fn default() -> Self {
        Self {
            base_direction: BaseDirection::Ltr,
            rendering_profile: RenderingProfile::Default,
            overflow_policy: OverflowPolicy::Fit,
            default_tab_interval: DEFAULT_TAB_INTERVAL,
        }
    }
}

/// Outcome of laying out one line.
#[derive(Debug, Clone)]
pub struct LineLayoutResult {
    /// How much of the input was placed.
    pub status: LayoutStatus,
    /// The line, unless nothing was placed.
    pub line: Option<Line>,
    /// Items for the next line, in order. Feed this back in as-is.
    pub overflow: Vec<InlineItem>,
    /// The line ended at a forced line break.
    pub split_forced_by_newline: bool,
    /// Floats that did not fit beside this line and lead the overflow.
    pub floats_deferred: usize,
    /// Why nothing was placed.
    pub cause: Option<NothingCause>,
    /// Intrinsic widths of the content placed on the line.
    pub min_max_width: MinMaxWidth,
}

/// Lays out lines of inline content.
pub struct LineBreaker {
    services: LayoutServices,
    options: LineBreakerOptions,
}

impl LineBreaker {
    /// A line breaker using `services` for hyphenation, bidi, and
    /// segmentation.
    #[must_use]
    pub const fn new(services: LayoutServices, options: LineBreakerOptions) -> Self {
        Self { services, options }
    }

    /// The services consulted during layout.
    #[must_use]
    pub const fn services(&self) -> &LayoutServices {
        &self.services
    }

    /// The engine-wide options.
    #[must_use]
    pub const fn options(&self) -> &LineBreakerOptions {
        &self.options
    }

    /// Lay out the next line of `items` in `ctx.area`.
    ///
    /// Floats placed on the line are appended to `ctx.floats`. When nothing
    /// can be placed the float list is left as it was.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::InvariantViolation`] if a text window cannot
    /// be narrowed as requested; this indicates an engine defect.
    pub fn layout(
        &self,
        items: &[InlineItem],
        ctx: &mut LayoutContext<'_>,
    ) -> Result<LineLayoutResult, LayoutError> {
        let floats_before = ctx.floats.obstacles().len();

        #[cfg(feature = "layout-trace")]
        eprintln!(
            "[LINE] layout {} items in {:?} indent={} forced={}",
            items.len(),
            ctx.area.rect,
            ctx.text_indent,
            ctx.forced_placement
        );

        let mut builder = LineBuilder::new(self, items, ctx);
        let mut boundary = Boundary::Before(items.len());
        for (index, item) in items.iter().enumerate() {
            let step = match item {
                InlineItem::Float(float) => builder.place_float(index, float),
                InlineItem::Text(run) => builder.place_text(index, run)?,
                InlineItem::Tab(tab) => builder.place_tab(index, tab),
                InlineItem::InlineBlock(block) => builder.place_block(index, block),
            };
            match step {
                Step::Continue => {}
                Step::End(end) => {
                    boundary = end;
                    break;
                }
                Step::Nothing(cause) => return Ok(builder.nothing(cause, floats_before)),
            }
        }

        builder.finish(boundary, floats_before)
    }

    /// Intrinsic widths of `items` laid out on lines of unlimited width.
    ///
    /// [CSS Sizing Level 3 § 5.1](https://www.w3.org/TR/css-sizing-3/#intrinsic-sizes)
    #[must_use]
    pub fn min_max_width(&self, items: &[InlineItem]) -> MinMaxWidth {
        let mut accumulator = WidthAccumulator::new();
        for item in items {
            match item {
                InlineItem::Float(float) => accumulator.add_float(float.content().min_max_width().max),
                other => accumulator.add(
                    &other.intrinsic_contribution(&self.services, self.options.default_tab_interval),
                ),
            }
        }
        accumulator.result()
    }

    /// [§ 10.8.1](https://www.w3.org/TR/CSS2/visudet.html#leading)
    ///
    /// "The height of the inline box encloses all glyphs and their
    /// half-leading on each side and is thus exactly 'line-height'."
    fn normalized_metrics(placed: &PlacedItem) -> (f32, f32) {
        let InlineItem::Text(run) = &placed.item else {
            return (placed.ascent, placed.descent);
        };
        let font = run.font();
        let shift = run.properties().baseline_shift();
        let (ascent, descent) = (font.ascent(), font.descent());
        let line_height = match run.properties().line_height() {
            LineHeight::Normal => font.size * NORMAL_LINE_HEIGHT_RATIO,
            LineHeight::Multiplier(factor) => font.size * factor,
            LineHeight::Px(px) => px,
        };
        // "Find the difference between L and A+D and add half of it above
        // the glyphs and half below."
        let half_leading = (line_height - (ascent - descent)) / 2.0;
        (ascent + half_leading + shift, descent - half_leading + shift)
    }
}

/// An in-flow item placed on the line being built. `rect.x` is relative to
/// the line's left edge until the line is finished.
#[derive(Debug, Clone)]
struct Slot {
    index: usize,
    placed: PlacedItem,
}

/// Builder state at a point where the line could end, for rollback.
#[derive(Debug, Clone, Copy)]
struct FitSnapshot {
    slots_len: usize,
    cursor: f32,
    pending_tab: Option<PendingTab>,
    /// Break inside the item at this index, or `None` for the boundary
    /// before it.
    split_at: Option<usize>,
}

/// Where the line ends.
#[derive(Debug)]
enum Boundary {
    /// Before the item at this index.
    Before(usize),
    /// Inside the item at `index`; `remainder` starts the next line.
    Split { index: usize, remainder: InlineItem },
}

#[derive(Debug)]
enum Step {
    Continue,
    End(Boundary),
    Nothing(NothingCause),
}

struct LineBuilder<'b, 'c, 'f> {
    breaker: &'b LineBreaker,
    items: &'b [InlineItem],
    ctx: &'c mut LayoutContext<'f>,
    slots: Vec<Slot>,
    floats: Vec<PlacedItem>,
    placed_floats: Vec<usize>,
    deferred: Vec<usize>,
    cursor: f32,
    left_edge: f32,
    box_width: f32,
    pending_tab: Option<PendingTab>,
    registry: HashMap<usize, FitSnapshot>,
    last_break: Option<usize>,
    newline: bool,
}

impl<'b, 'c, 'f> LineBuilder<'b, 'c, 'f> {
    fn new(breaker: &'b LineBreaker, items: &'b [InlineItem], ctx: &'c mut LayoutContext<'f>) -> Self {
        let mut builder = Self {
            breaker,
            items,
            ctx,
            slots: Vec::new(),
            floats: Vec::new(),
            placed_floats: Vec::new(),
            deferred: Vec::new(),
            cursor: 0.0,
            left_edge: 0.0,
            box_width: 0.0,
            pending_tab: None,
            registry: HashMap::new(),
            last_break: None,
            newline: false,
        };
        builder.update_box();
        builder
    }

    fn services(&self) -> &'b LayoutServices {
        &self.breaker.services
    }

    /// Box width = area width − float exclusions at the line top − indent.
    fn update_box(&mut self) {
        let area = self.ctx.area.rect;
        let (left, width) = self.ctx.floats.available_width_at(&area, area.y, 0.0);
        self.left_edge = left + self.ctx.text_indent;
        self.box_width = (width - self.ctx.text_indent).max(0.0);
    }

    fn remaining(&self) -> f32 {
        (self.box_width - self.cursor).max(0.0)
    }

    /// Record the boundary before `index` as a rollback target if a line
    /// may break there.
    fn record_boundary(&mut self, index: usize) {
        let Some(previous) = self.slots.last() else {
            return;
        };
        let allowed = match (&previous.placed.item, &self.items[index]) {
            (_, InlineItem::Tab(_)) => false,
            (InlineItem::Text(run), InlineItem::Text(_)) => run.ends_with_break(self.services()),
            _ => true,
        };
        if allowed {
            let _ = self.registry.insert(
                index,
                FitSnapshot {
                    slots_len: self.slots.len(),
                    cursor: self.cursor,
                    pending_tab: self.pending_tab,
                    split_at: None,
                },
            );
            self.last_break = Some(index);
        }
    }

    /// Place an in-flow item at the cursor, first resolving a tab that is
    /// waiting for it.
    fn commit(&mut self, index: usize, item: InlineItem, width: f32, metrics: (f32, f32), before_anchor: f32) {
        let mut x = self.cursor;
        if let Some(tab) = self.pending_tab.take() {
            let room = (self.box_width - self.cursor - width).max(0.0);
            let tab_width = tab.resolve(width, before_anchor).min(room);
            if let Some(slot) = self.slots.get_mut(tab.placed_index) {
                slot.placed.rect.width = tab_width;
            }
            x += tab_width;
        }
        let (ascent, descent) = metrics;
        self.slots.push(Slot {
            index,
            placed: PlacedItem::new(item, Rect::new(x, 0.0, width, 0.0), ascent, descent),
        });
        self.cursor = x + width;
    }

    fn commit_text(&mut self, index: usize, run: TextRun, width: f32) {
        let metrics = (run.ascent(), run.descent());
        let anchor = match self.pending_tab {
            Some(tab) if tab.stop.alignment == TabAlignment::Anchor => {
                let anchor = self.slots.get(tab.placed_index).and_then(|slot| match &slot.placed.item {
                    InlineItem::Tab(tab_item) => Some(tab_item.anchor()),
                    _ => None,
                });
                anchor.map_or(width, |ch| run.width_before_char(ch))
            }
            _ => width,
        };
        self.commit(index, InlineItem::Text(run), width, metrics, anchor);
    }

    fn place_text(&mut self, index: usize, run: &TextRun) -> Result<Step, LayoutError> {
        self.record_boundary(index);
        let result = run.layout(&self.text_constraints(self.slots.is_empty()), self.services());

        #[cfg(feature = "layout-trace")]
        eprintln!(
            "[LINE] item {index} text status={} width={} remaining={}",
            result.status,
            result.width,
            self.remaining()
        );

        let occupied = result.occupied_width();
        match (result.status, result.split, result.overflow) {
            (LayoutStatus::Full, Some(split), _) => {
                let snapshot = FitSnapshot {
                    slots_len: self.slots.len(),
                    cursor: self.cursor,
                    pending_tab: self.pending_tab,
                    split_at: split.last_break_position(self.services()),
                };
                self.commit_text(index, split, occupied);
                if snapshot.split_at.is_some() {
                    let _ = self.registry.insert(index, snapshot);
                    self.last_break = Some(index);
                }
                if result.split_forced_by_newline {
                    self.newline = true;
                    return Ok(Step::End(Boundary::Before(index + 1)));
                }
                Ok(Step::Continue)
            }
            (LayoutStatus::Partial, Some(split), Some(overflow)) => {
                self.commit_text(index, split, occupied);
                self.newline = result.split_forced_by_newline;
                Ok(Step::End(Boundary::Split {
                    index,
                    remainder: InlineItem::Text(overflow),
                }))
            }
            _ => self.refuse_text(index, run, result.cause),
        }
    }

    fn text_constraints(&self, first_on_line: bool) -> TextConstraints {
        TextConstraints {
            available_width: self.remaining(),
            available_height: self.ctx.area.rect.height,
            clipped_height: self.ctx.area.clipped_height,
            overflow_policy: self.breaker.options.overflow_policy,
            first_on_line,
            forced_placement: self.ctx.forced_placement,
        }
    }

    /// The text item at `index` placed nothing although the line has
    /// content.
    fn refuse_text(
        &mut self,
        index: usize,
        run: &TextRun,
        cause: Option<NothingReason>,
    ) -> Result<Step, LayoutError> {
        let reason = cause.unwrap_or(NothingReason::WordDoesNotFit);
        if self.slots.is_empty() {
            return Ok(Step::Nothing(NothingCause {
                item_index: index,
                reason,
            }));
        }
        if reason != NothingReason::WordDoesNotFit {
            return Ok(Step::End(Boundary::Before(index)));
        }

        // STEP 1: A break is allowed right before this item: end the line
        // there.
        let boundary_here = self
            .registry
            .get(&index)
            .is_some_and(|snapshot| snapshot.split_at.is_none());
        if self.last_break == Some(index) && boundary_here {
            return Ok(Step::End(Boundary::Before(index)));
        }

        // STEP 2: The word started in an earlier item. Roll back to the last
        // break opportunity.
        if let Some(target) = self.last_break
            && let Some(snapshot) = self.registry.get(&target).copied()
        {
            #[cfg(feature = "layout-trace")]
            eprintln!("[LINE] item {index} rolls back to item {target} ({snapshot:?})");
            return self.rollback(target, snapshot);
        }

        // STEP 3: The word started the line; break it like a first word.
        let result = run.layout(&self.text_constraints(true), self.services());
        if self.breaker.options.overflow_policy == OverflowPolicy::Fit
            && result.status != LayoutStatus::Nothing
            && !fits_within(result.width, self.remaining())
        {
            // Not even one cluster fits after the content already placed;
            // the item boundary is the only way left to break the word.
            return Ok(Step::End(Boundary::Before(index)));
        }
        let occupied = result.occupied_width();
        match (result.status, result.split, result.overflow) {
            (LayoutStatus::Full, Some(split), _) => {
                self.commit_text(index, split, occupied);
                self.newline = result.split_forced_by_newline;
                if self.newline {
                    return Ok(Step::End(Boundary::Before(index + 1)));
                }
                Ok(Step::Continue)
            }
            (LayoutStatus::Partial, Some(split), Some(overflow)) => {
                self.commit_text(index, split, occupied);
                self.newline = result.split_forced_by_newline;
                Ok(Step::End(Boundary::Split {
                    index,
                    remainder: InlineItem::Text(overflow),
                }))
            }
            _ => Ok(Step::Nothing(NothingCause {
                item_index: index,
                reason: result.cause.unwrap_or(reason),
            })),
        }
    }

    fn rollback(&mut self, target: usize, snapshot: FitSnapshot) -> Result<Step, LayoutError> {
        self.slots.truncate(snapshot.slots_len);
        self.cursor = snapshot.cursor;
        self.pending_tab = snapshot.pending_tab;

        let (Some(at), InlineItem::Text(run)) = (snapshot.split_at, &self.items[target]) else {
            return Ok(Step::End(Boundary::Before(target)));
        };
        let (head, tail) = run.split_at(at)?;
        let width = head.width();
        self.commit_text(target, head, width);
        Ok(Step::End(Boundary::Split {
            index: target,
            remainder: InlineItem::Text(tail),
        }))
    }

    fn place_tab(&mut self, index: usize, tab: &TabItem) -> Step {
        self.record_boundary(index);
        // A tab directly after another pending tab aligns nothing.
        self.resolve_pending_tab();

        let stop = tab.next_stop(self.cursor, self.breaker.options.default_tab_interval);
        if stop.position > self.box_width + EPSILON {
            if !self.slots.is_empty() {
                return Step::End(Boundary::Before(index));
            }
            let width = self.remaining();
            self.commit(index, InlineItem::Tab(tab.clone()), width, (0.0, 0.0), width);
            return Step::End(Boundary::Before(index + 1));
        }

        if stop.alignment == TabAlignment::Left {
            let width = stop.position - self.cursor;
            self.commit(index, InlineItem::Tab(tab.clone()), width, (0.0, 0.0), width);
        } else {
            self.commit(index, InlineItem::Tab(tab.clone()), 0.0, (0.0, 0.0), 0.0);
            self.pending_tab = Some(PendingTab {
                placed_index: self.slots.len() - 1,
                start: self.cursor,
                stop,
            });
        }
        Step::Continue
    }

    /// Give a pending tab its width when nothing follows it.
    fn resolve_pending_tab(&mut self) {
        let Some(tab) = self.pending_tab.take() else {
            return;
        };
        let width = tab.resolve(0.0, 0.0).min(self.remaining());
        if let Some(slot) = self.slots.get_mut(tab.placed_index) {
            slot.placed.rect.width = width;
        }
        self.cursor += width;
    }

    fn place_block(&mut self, index: usize, block: &InlineBlock) -> Step {
        self.record_boundary(index);
        let remaining = self.remaining();
        let area = LayoutArea {
            rect: Rect::new(
                self.left_edge + self.cursor,
                self.ctx.area.rect.y,
                remaining,
                self.ctx.area.rect.height,
            ),
            clipped_height: self.ctx.area.clipped_height,
        };
        let result = block.content().layout(&area);
        let fits = result.status == LayoutStatus::Full && fits_within(result.width, remaining);

        if fits || (self.slots.is_empty() && self.ctx.forced_placement) {
            let metrics = (result.baseline, result.baseline - result.height);
            self.commit(index, InlineItem::InlineBlock(block.clone()), result.width, metrics, result.width);
            return Step::Continue;
        }
        if !self.slots.is_empty() {
            return Step::End(Boundary::Before(index));
        }
        let reason = if fits_within(result.width, remaining) {
            NothingReason::HeightOverflow
        } else {
            NothingReason::BoxTooWide
        };
        Step::Nothing(NothingCause {
            item_index: index,
            reason,
        })
    }

    /// [§ 9.5 Floats](https://www.w3.org/TR/CSS2/visuren.html#floats)
    ///
    /// "If there is a line box, the outer top of the floated box is aligned
    /// with the top of the current line box."
    ///
    /// "If a shortened line box is too small to contain any content, then
    /// the line box is shifted downward ... until either it fits or there
    /// are no more floats present."
    fn place_float(&mut self, index: usize, float: &FloatItem) -> Step {
        let area = self.ctx.area.rect;
        let result = float.content().layout(&LayoutArea {
            rect: area,
            clipped_height: true,
        });

        if !self.slots.is_empty() && !fits_within(result.width, self.remaining()) {
            #[cfg(feature = "layout-trace")]
            eprintln!("[LINE] item {index} float deferred width={}", result.width);
            self.deferred.push(index);
            return Step::Continue;
        }

        let rect = self
            .ctx
            .floats
            .place_float(&area, float.side(), result.width, result.height, area.y);
        self.floats.push(PlacedItem::new(
            InlineItem::Float(float.clone()),
            rect,
            0.0,
            0.0,
        ));
        self.placed_floats.push(index);
        self.update_box();
        Step::Continue
    }

    fn nothing(&mut self, cause: NothingCause, floats_before: usize) -> LineLayoutResult {
        self.ctx.floats.truncate(floats_before);

        #[cfg(feature = "layout-trace")]
        eprintln!("[LINE] nothing placed: {cause}");

        LineLayoutResult {
            status: LayoutStatus::Nothing,
            line: None,
            overflow: self.items.to_vec(),
            split_forced_by_newline: false,
            floats_deferred: 0,
            cause: Some(cause),
            min_max_width: MinMaxWidth::default(),
        }
    }

    /// Items for the next line after `boundary`.
    fn overflow(&self, boundary: Boundary) -> Vec<InlineItem> {
        let (first, next, remainder) = match boundary {
            Boundary::Before(index) => (index, index, None),
            Boundary::Split { index, remainder } => (index, index + 1, Some(remainder)),
        };
        let mut overflow: Vec<InlineItem> = self
            .deferred
            .iter()
            .filter(|&&i| i < first)
            .map(|&i| self.items[i].clone())
            .collect();
        overflow.extend(remainder);
        overflow.extend(
            self.items
                .iter()
                .enumerate()
                .skip(next)
                .filter(|(i, _)| !self.placed_floats.contains(i))
                .map(|(_, item)| item.clone()),
        );
        overflow
    }

    fn finish(mut self, boundary: Boundary, floats_before: usize) -> Result<LineLayoutResult, LayoutError> {
        let overflow = self.overflow(boundary);
        self.resolve_pending_tab();

        // STEP 1: Trim trailing whitespace, walking back over items that
        // hold nothing but whitespace or zero-width glyphs.
        // [§ 4.1.3 Phase II](https://www.w3.org/TR/css-text-3/#white-space-phase-2)
        //
        // "A sequence of collapsible spaces at the end of a line is removed."
        self.trim_trailing_whitespace();

        // Intrinsic widths follow the logical order of the content.
        let mut widths = WidthAccumulator::new();
        for slot in &self.slots {
            widths.add(&slot.placed.item.intrinsic_contribution(
                self.services(),
                self.breaker.options.default_tab_interval,
            ));
        }

        // STEP 2: Reorder for bidi.
        let slots = std::mem::take(&mut self.slots);
        let (slots, bidi_levels) = self.reorder(slots)?;

        // STEP 3: Vertical metrics.
        // [§ 10.8](https://www.w3.org/TR/CSS2/visudet.html#line-height)
        //
        // "The line box height is the distance between the uppermost box top
        // and the lowermost box bottom."
        let html = self.breaker.options.rendering_profile == RenderingProfile::Html;
        let mut ascent: f32 = 0.0;
        let mut descent: f32 = 0.0;
        let mut tallest: Option<(usize, f32)> = None;
        let mut placed: Vec<PlacedItem> = Vec::with_capacity(slots.len() + self.floats.len());
        for slot in slots {
            let mut item = slot.placed;
            if html {
                (item.ascent, item.descent) = LineBreaker::normalized_metrics(&item);
            }
            ascent = ascent.max(item.ascent);
            descent = descent.min(item.descent);
            let height = item.ascent - item.descent;
            if tallest.is_none_or(|(_, h)| height > h) {
                tallest = Some((slot.index, height));
            }
            placed.push(item);
        }
        let height = ascent - descent;

        // STEP 4: Height check.
        let area = self.ctx.area;
        if !fits_within(height, area.rect.height) {
            if !self.ctx.forced_placement && !area.clipped_height {
                let cause = NothingCause {
                    item_index: tallest.map_or(0, |(index, _)| index),
                    reason: NothingReason::HeightOverflow,
                };
                return Ok(self.nothing(cause, floats_before));
            }
            warn_once(
                "Layout",
                &format!("line of height {height} clipped to area height {}", area.rect.height),
            );
        }

        // STEP 5: Absolute positions. Baselines line up `ascent` below the
        // line top.
        let top = area.rect.y;
        for item in &mut placed {
            item.rect.x += self.left_edge;
            item.rect.y = top + ascent - item.ascent;
            item.rect.height = item.ascent - item.descent;
        }

        for float in &self.floats {
            widths.add_float(float.rect.width);
        }
        placed.append(&mut self.floats);

        let status = if overflow.is_empty() {
            LayoutStatus::Full
        } else {
            LayoutStatus::Partial
        };

        #[cfg(feature = "layout-trace")]
        eprintln!(
            "[LINE] {status} width={} height={height} overflow={} deferred={}",
            self.cursor,
            overflow.len(),
            self.deferred.len()
        );

        Ok(LineLayoutResult {
            status,
            line: Some(Line {
                rect: Rect::new(self.left_edge, top, self.cursor, height),
                ascent,
                descent,
                items: placed,
                bidi_levels,
                status,
            }),
            overflow,
            split_forced_by_newline: self.newline,
            floats_deferred: self.deferred.len(),
            cause: None,
            min_max_width: widths.result(),
        })
    }

    fn trim_trailing_whitespace(&mut self) {
        let mut trimmed_total = 0.0;
        let mut first_touched = None;
        for (i, slot) in self.slots.iter_mut().enumerate().rev() {
            let InlineItem::Text(run) = &slot.placed.item else {
                break;
            };
            let count = run.trailing_whitespace_count();
            if count > 0 {
                let trimmed = run.trimmed_width(count);
                slot.placed.trimmed_glyphs = count;
                slot.placed.rect.width = (slot.placed.rect.width - trimmed).max(0.0);
                trimmed_total += trimmed;
            }
            first_touched = Some(i);
            let blank = slot
                .placed
                .visible_glyphs()
                .iter()
                .all(|g| is_trimmable(g.ch) || g.advance <= 0.0);
            if !blank {
                break;
            }
        }
        let Some(first) = first_touched else {
            return;
        };

        // Items after a trimmed one close up behind it.
        let mut x = self.slots[first].placed.rect.right();
        for slot in &mut self.slots[first + 1..] {
            slot.placed.rect.x = x;
            x = slot.placed.rect.right();
        }
        self.cursor = (self.cursor - trimmed_total).max(0.0);
    }

    /// [UAX #9 § 3.4 Reordering Resolved Levels](https://www.unicode.org/reports/tr9/#Reordering_Resolved_Levels)
    ///
    /// Non-text items take part as U+FFFC OBJECT REPLACEMENT CHARACTER.
    /// Text items are split into fragments of one level each, the fragments
    /// are put in visual order, and x positions are rebuilt from the left
    /// edge. Vertical positions are untouched.
    fn reorder(&self, slots: Vec<Slot>) -> Result<(Vec<Slot>, Option<Vec<u8>>), LayoutError> {
        let text: String = slots
            .iter()
            .flat_map(|slot| match &slot.placed.item {
                InlineItem::Text(_) => slot.placed.visible_glyphs().iter().map(|g| g.ch).collect::<Vec<_>>(),
                _ => vec!['\u{FFFC}'],
            })
            .collect();
        let levels = self
            .services()
            .bidi
            .compute_levels(&text, self.breaker.options.base_direction);
        if !has_rtl(&levels) {
            return Ok((slots, None));
        }
        if levels.len() != text.chars().count() {
            warn_once("Layout", "bidi levels do not cover the line; reordering skipped");
            return Ok((slots, None));
        }

        // STEP 1: Split text items into uniform-level fragments.
        let mut units: Vec<Slot> = Vec::with_capacity(slots.len());
        let mut offset = 0;
        for slot in slots {
            let InlineItem::Text(run) = &slot.placed.item else {
                let mut unit = slot;
                unit.placed.bidi_level = levels[offset];
                units.push(unit);
                offset += 1;
                continue;
            };
            let visible = slot.placed.visible_glyphs().len();
            let run_levels = &levels[offset..offset + visible];
            offset += visible;
            if run_levels.is_empty() || run_levels.iter().all(|&l| l == run_levels[0]) {
                let mut unit = slot.clone();
                unit.placed.bidi_level = run_levels.first().copied().unwrap_or(levels[offset.saturating_sub(1)]);
                unit.placed.reversed = unit.placed.bidi_level % 2 == 1;
                units.push(unit);
                continue;
            }

            let window = run.window();
            let mut consumed = 0.0;
            let mut fragment_start = 0;
            for i in 1..=visible {
                if i < visible && run_levels[i] == run_levels[fragment_start] {
                    continue;
                }
                let last = i == visible;
                let end = if last { window.end } else { window.start + i };
                let fragment = run.with_window(window.start + fragment_start, end)?;
                let width = if last {
                    slot.placed.rect.width - consumed
                } else {
                    run.advance_width(window.start + fragment_start..end)
                };
                consumed += width;

                let mut placed = PlacedItem::new(
                    InlineItem::Text(fragment),
                    Rect::new(0.0, 0.0, width, 0.0),
                    slot.placed.ascent,
                    slot.placed.descent,
                );
                placed.trimmed_glyphs = if last { slot.placed.trimmed_glyphs } else { 0 };
                placed.bidi_level = run_levels[fragment_start];
                placed.reversed = placed.bidi_level % 2 == 1;
                units.push(Slot {
                    index: slot.index,
                    placed,
                });
                fragment_start = i;
            }
        }

        // STEP 2: Visual order, then x positions from the line start.
        let unit_levels: Vec<u8> = units.iter().map(|u| u.placed.bidi_level).collect();
        let order = self.services().bidi.reorder(&unit_levels);
        let mut sorted = order.clone();
        sorted.sort_unstable();
        if sorted.iter().copied().ne(0..units.len()) {
            warn_once("Layout", "bidi reordering is not a permutation; logical order kept");
            return Ok((units, Some(levels)));
        }

        let mut slots_by_index: Vec<Option<Slot>> = units.into_iter().map(Some).collect();
        let mut visual = Vec::with_capacity(slots_by_index.len());
        let mut x = 0.0;
        for logical in order {
            if let Some(mut unit) = slots_by_index[logical].take() {
                unit.placed.rect.x = x;
                x += unit.placed.rect.width;
                visual.push(unit);
            }
        }
        Ok((visual, Some(levels)))
    }
}

//! The inline item sequence a line is built from.

use crate::inline_block::{FloatItem, InlineBlock};
use crate::properties::Properties;
use crate::services::LayoutServices;
use crate::tab::TabItem;
use crate::text_run::TextRun;
use crate::width::IntrinsicContribution;

/// One item of inline content.
#[derive(Debug, Clone)]
pub enum InlineItem {
    /// Shaped text.
    Text(TextRun),
    /// A tab.
    Tab(TabItem),
    /// An atomic inline box.
    InlineBlock(InlineBlock),
    /// A float anchored in the inline content.
    Float(FloatItem),
}

impl InlineItem {
    /// The item's properties.
    #[must_use]
    pub fn properties(&self) -> &Properties {
        match self {
            Self::Text(run) => run.properties(),
            Self::Tab(tab) => tab.properties(),
            Self::InlineBlock(block) => block.properties(),
            Self::Float(float) => float.properties(),
        }
    }

    /// The text run, if this is text.
    #[must_use]
    pub const fn as_text(&self) -> Option<&TextRun> {
        match self {
            Self::Text(run) => Some(run),
            _ => None,
        }
    }

    /// Whether the item takes part in the line's vertical metrics.
    #[must_use]
    pub const fn is_in_flow(&self) -> bool {
        !matches!(self, Self::Float(_))
    }

    /// What the item contributes to the line's intrinsic widths. Floats
    /// are reported separately through [`FloatItem::content`].
    #[must_use]
    pub fn intrinsic_contribution(
        &self,
        services: &LayoutServices,
        default_tab_interval: f32,
    ) -> IntrinsicContribution {
        match self {
            Self::Text(run) => run.intrinsic_contribution(services),
            Self::Tab(tab) => tab.intrinsic_contribution(default_tab_interval),
            Self::InlineBlock(block) => {
                IntrinsicContribution::atomic(block.content().min_max_width())
            }
            Self::Float(float) => IntrinsicContribution::atomic(float.content().min_max_width()),
        }
    }
}

impl From<TextRun> for InlineItem {
    fn from(run: TextRun) -> Self {
        Self::Text(run)
    }
}

impl From<TabItem> for InlineItem {
    fn from(tab: TabItem) -> Self {
        Self::Tab(tab)
    }
}

impl From<InlineBlock> for InlineItem {
    fn from(block: InlineBlock) -> Self {
        Self::InlineBlock(block)
    }
}

impl From<FloatItem> for InlineItem {
    fn from(float: FloatItem) -> Self {
        Self::Float(float)
    }
}

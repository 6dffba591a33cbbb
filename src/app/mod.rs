use crate::graph::cache::PositionCache;
use crate::graph::{ClusterGraph, Vec2};
use crate::service::GraphStore;
use crate::service::payload::SessionRecord;
use crate::service::summary::{Summary, SummaryCache};
use crate::util::format_percent;

pub mod controller;
pub mod hierarchy;
pub mod scene;

use hierarchy::{ConceptTree, Highlight, TreeLayout};

pub const DEFAULT_THRESHOLD: f32 = 0.3;

/// The two independent topic slots ("top" and "bottom" of the page).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Topic {
    Top,
    Bottom,
}

impl Topic {
    pub fn label(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Bottom => "bottom",
        }
    }
}

/// Render state of one topic's cluster graph.
#[derive(Debug, Default)]
pub enum GraphPanel {
    #[default]
    NotGenerated,
    Loading,
    Ready(ClusterGraph),
    /// The service answered with zero clusters; shown as an explicit
    /// "no data" state rather than an empty canvas.
    NoData,
    Failed(String),
}

impl GraphPanel {
    pub fn graph(&self) -> Option<&ClusterGraph> {
        match self {
            Self::Ready(graph) => Some(graph),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SummaryState {
    /// Transient "generating" placeholder while the fetch is in flight.
    Pending,
    Ready(Summary),
    /// Retryable inline error; never cached.
    Failed(String),
}

/// Panel shown for the currently selected cluster. Size and engagement are
/// displayed immediately on click; the summary arrives asynchronously.
#[derive(Clone, Debug)]
pub struct SelectionPanel {
    pub cluster_id: u32,
    pub label: String,
    pub size: u32,
    pub avg_engagement: f32,
    pub story_ids: Vec<String>,
    pub summary: SummaryState,
}

#[derive(Debug, Default)]
pub enum ConceptPanel {
    #[default]
    Hidden,
    Pending,
    Ready(ConceptView),
    /// Build or fetch failure for the concept subtree only; the selection
    /// panel around it stays intact.
    Failed(String),
}

#[derive(Debug)]
pub struct ConceptView {
    pub tree: ConceptTree,
    pub layout: TreeLayout,
    pub highlight: Highlight,
}

/// Presentational edge tooltip tied to the pointer; no state-machine
/// transition is involved.
#[derive(Clone, Debug, PartialEq)]
pub struct EdgeTooltip {
    pub source: u32,
    pub target: u32,
    pub similarity: f32,
    pub at: Vec2,
}

impl EdgeTooltip {
    pub fn label(&self) -> String {
        format!("{} similar", format_percent(self.similarity))
    }
}

/// Everything one topic owns: graph, position cache, threshold, selection,
/// concept view. Switching the active topic must not mutate the other slot.
#[derive(Debug)]
pub struct TopicSlot {
    pub search_id: Option<String>,
    pub graph: GraphPanel,
    pub positions: PositionCache,
    pub threshold: f32,
    pub selection: Option<SelectionPanel>,
    pub concept: ConceptPanel,
}

impl Default for TopicSlot {
    fn default() -> Self {
        Self {
            search_id: None,
            graph: GraphPanel::default(),
            positions: PositionCache::default(),
            threshold: DEFAULT_THRESHOLD,
            selection: None,
            concept: ConceptPanel::default(),
        }
    }
}

impl TopicSlot {
    pub fn selected_cluster(&self) -> Option<u32> {
        self.selection.as_ref().map(|panel| panel.cluster_id)
    }
}

/// Explicit session context owned by the controller and passed by reference
/// to layout and filter code; there are no ambient globals.
#[derive(Debug)]
pub struct Session {
    pub record: SessionRecord,
    pub active: Topic,
    pub graph_store: GraphStore,
    pub summary_cache: SummaryCache,
    pub tooltip: Option<EdgeTooltip>,
    top: TopicSlot,
    bottom: TopicSlot,
}

impl Session {
    pub fn new(record: SessionRecord) -> Self {
        Self {
            record,
            active: Topic::Top,
            graph_store: GraphStore::default(),
            summary_cache: SummaryCache::default(),
            tooltip: None,
            top: TopicSlot::default(),
            bottom: TopicSlot::default(),
        }
    }

    pub fn slot(&self, topic: Topic) -> &TopicSlot {
        match topic {
            Topic::Top => &self.top,
            Topic::Bottom => &self.bottom,
        }
    }

    pub fn slot_mut(&mut self, topic: Topic) -> &mut TopicSlot {
        match topic {
            Topic::Top => &mut self.top,
            Topic::Bottom => &mut self.bottom,
        }
    }

    pub fn active_slot(&self) -> &TopicSlot {
        self.slot(self.active)
    }

    pub fn active_slot_mut(&mut self) -> &mut TopicSlot {
        self.slot_mut(self.active)
    }

    /// Search id recorded for a topic in the per-session record.
    pub fn recorded_search(&self, topic: Topic) -> Option<&str> {
        match topic {
            Topic::Top => self.record.top_search_id.as_deref(),
            Topic::Bottom => self.record.bottom_search_id.as_deref(),
        }
    }

    pub fn set_recorded_search(&mut self, topic: Topic, search_id: String) {
        match topic {
            Topic::Top => self.record.top_search_id = Some(search_id),
            Topic::Bottom => self.record.bottom_search_id = Some(search_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::vec2;

    #[test]
    fn tooltip_label_is_rounded_percent() {
        let tooltip = EdgeTooltip {
            source: 0,
            target: 1,
            similarity: 0.814,
            at: vec2(10.0, 20.0),
        };
        assert_eq!(tooltip.label(), "81% similar");
    }

    #[test]
    fn slots_are_independent() {
        let mut session = Session::new(SessionRecord::default());
        session.slot_mut(Topic::Top).threshold = 0.9;
        assert_eq!(session.slot(Topic::Bottom).threshold, DEFAULT_THRESHOLD);
    }
}

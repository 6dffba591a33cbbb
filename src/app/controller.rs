use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, warn};

use crate::error::ServiceError;
use crate::graph::{Vec2, layout};
use crate::service::SummaryRequest;
use crate::service::payload::{ConceptResponse, GraphData, GraphResponse, SessionRecord, SummaryResponse};
use crate::service::summary::{Summary, summary_cache_key};

use super::hierarchy::{build_tree, layout_tree};
use super::{
    ConceptPanel, ConceptView, EdgeTooltip, GraphPanel, SelectionPanel, Session, SummaryState,
    Topic,
};

/// Drawing area handed to the concept-tree layout.
const CONCEPT_AREA_WIDTH: f32 = 900.0;
const CONCEPT_AREA_HEIGHT: f32 = 560.0;

/// Tags an in-flight graph fetch with the topic and search it was issued
/// for, so a completion for a superseded topic can be discarded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GraphToken {
    pub topic: Topic,
    pub search_id: String,
}

/// Stale-response guard for summary fetches: the result is applied only if
/// this cluster is still the selection on this topic's current search.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SummaryToken {
    pub topic: Topic,
    pub search_id: String,
    pub cluster_id: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConceptToken {
    pub topic: Topic,
    pub search_id: String,
    pub cluster_id: u32,
}

/// Everything the rendering surface can feed back into the core, plus the
/// completions the host posts for finished service calls.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// A new search was recorded for a topic (new similarity data will be
    /// generated for it).
    SearchRecorded { topic: Topic, search_id: String },
    GenerateRequested { topic: Topic },
    GraphFetched {
        token: GraphToken,
        result: Result<GraphResponse, ServiceError>,
    },
    NodeClicked { node_id: u32 },
    SelectionClosed,
    EdgeHoverEntered { source: u32, target: u32, at: Vec2 },
    EdgeHoverLeft,
    ThresholdChanged(f32),
    TopicSwitched(Topic),
    SummaryFetched {
        token: SummaryToken,
        result: Result<SummaryResponse, ServiceError>,
    },
    SummaryRetryRequested,
    ConceptFetched {
        token: ConceptToken,
        result: Result<ConceptResponse, ServiceError>,
    },
    ConceptNodeClicked { node_id: String },
    ConceptArticleClicked { node_id: String },
}

/// Requests the controller asks its host to perform. The host runs them off
/// the interaction thread and posts the matching completion event.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    FetchGraph(GraphToken),
    FetchSummary {
        token: SummaryToken,
        request: SummaryRequest,
    },
    FetchConcepts(ConceptToken),
    OpenArticle { url: String },
}

/// Single update-function controller over the session state: every input is
/// an explicit [`Event`], every side effect an explicit [`Command`], which
/// keeps the whole state machine testable without a rendering surface.
pub struct Controller {
    session: Session,
    rng: StdRng,
}

impl Controller {
    pub fn new(record: SessionRecord) -> Self {
        Self {
            session: Session::new(record),
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic seeding for tests and reproducible replays.
    pub fn with_seed(record: SessionRecord, seed: u64) -> Self {
        Self {
            session: Session::new(record),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn handle(&mut self, event: Event) -> Vec<Command> {
        match event {
            Event::SearchRecorded { topic, search_id } => {
                self.session.set_recorded_search(topic, search_id);
                self.session.record.clusters_generated = true;
                Vec::new()
            }
            Event::GenerateRequested { topic } => self.generate(topic),
            Event::GraphFetched { token, result } => self.apply_graph_result(token, result),
            Event::NodeClicked { node_id } => self.select_cluster(node_id),
            Event::SelectionClosed => {
                let slot = self.session.active_slot_mut();
                slot.selection = None;
                slot.concept = ConceptPanel::Hidden;
                Vec::new()
            }
            Event::EdgeHoverEntered { source, target, at } => {
                let similarity = self
                    .session
                    .active_slot()
                    .graph
                    .graph()
                    .and_then(|graph| graph.edge_between(source, target))
                    .map(|edge| edge.similarity);
                if let Some(similarity) = similarity {
                    self.session.tooltip = Some(EdgeTooltip {
                        source,
                        target,
                        similarity,
                        at,
                    });
                }
                Vec::new()
            }
            Event::EdgeHoverLeft => {
                self.session.tooltip = None;
                Vec::new()
            }
            Event::ThresholdChanged(value) => {
                // Filtering is re-derived at render time; positions stay put.
                self.session.active_slot_mut().threshold = value.clamp(0.0, 1.0);
                Vec::new()
            }
            Event::TopicSwitched(topic) => {
                if topic != self.session.active {
                    let outgoing = self.session.active_slot_mut();
                    outgoing.selection = None;
                    outgoing.concept = ConceptPanel::Hidden;
                    self.session.tooltip = None;
                    self.session.active = topic;
                }
                Vec::new()
            }
            Event::SummaryFetched { token, result } => self.apply_summary_result(token, result),
            Event::SummaryRetryRequested => self.retry_summary(),
            Event::ConceptFetched { token, result } => self.apply_concept_result(token, result),
            Event::ConceptNodeClicked { node_id } => {
                let slot = self.session.active_slot_mut();
                if let ConceptPanel::Ready(view) = &mut slot.concept
                    && let Some(index) = view.tree.index_of(&node_id)
                {
                    // Article-link leaves are a separate click target and do
                    // not start a highlight, but any click clears one.
                    if view.highlight.is_active() || view.tree.node(index).article_url().is_none() {
                        view.highlight.toggle(&view.tree, index);
                    }
                }
                Vec::new()
            }
            Event::ConceptArticleClicked { node_id } => {
                let slot = self.session.active_slot();
                if let ConceptPanel::Ready(view) = &slot.concept
                    && let Some(index) = view.tree.index_of(&node_id)
                    && let Some(url) = view.tree.node(index).article_url()
                {
                    return vec![Command::OpenArticle { url: url.to_owned() }];
                }
                Vec::new()
            }
        }
    }

    fn generate(&mut self, topic: Topic) -> Vec<Command> {
        if !self.session.record.clusters_generated {
            self.session.slot_mut(topic).graph =
                GraphPanel::Failed("clusters have not been generated for this session".to_owned());
            return Vec::new();
        }

        let Some(search_id) = self.session.recorded_search(topic).map(str::to_owned) else {
            self.session.slot_mut(topic).graph =
                GraphPanel::Failed(format!("no search recorded for the {} topic", topic.label()));
            return Vec::new();
        };

        // A fetch already in flight for this same search stays the owner;
        // a newly recorded search supersedes it instead.
        let slot = self.session.slot(topic);
        if matches!(slot.graph, GraphPanel::Loading)
            && slot.search_id.as_deref() == Some(search_id.as_str())
        {
            return Vec::new();
        }

        // A store hit for the slot's current search is the same generated
        // graph, so cached positions stay valid. Coming back to this search
        // from a different one, the cache still holds the other graph's
        // coordinates (cluster ids restart at 0 per search and collide), so
        // the install counts as fresh.
        if let Some(data) = self.session.graph_store.get(&search_id).cloned() {
            debug!(topic = topic.label(), search_id, "installing graph from store");
            let slot = self.session.slot_mut(topic);
            let fresh = slot.search_id.as_deref() != Some(search_id.as_str());
            slot.search_id = Some(search_id);
            self.install_graph(topic, data, fresh);
            return Vec::new();
        }

        let slot = self.session.slot_mut(topic);
        slot.search_id = Some(search_id.clone());
        slot.graph = GraphPanel::Loading;
        vec![Command::FetchGraph(GraphToken { topic, search_id })]
    }

    fn apply_graph_result(
        &mut self,
        token: GraphToken,
        result: Result<GraphResponse, ServiceError>,
    ) -> Vec<Command> {
        let slot = self.session.slot(token.topic);
        if slot.search_id.as_deref() != Some(token.search_id.as_str())
            || !matches!(slot.graph, GraphPanel::Loading)
        {
            debug!(
                topic = token.topic.label(),
                search_id = token.search_id,
                "discarding stale graph completion"
            );
            return Vec::new();
        }

        match result.and_then(GraphResponse::into_data) {
            Ok(data) => {
                self.session
                    .graph_store
                    .insert(token.search_id.clone(), data.clone());
                self.install_graph(token.topic, data, true);
            }
            Err(error) => {
                warn!(topic = token.topic.label(), %error, "graph fetch failed");
                self.session.slot_mut(token.topic).graph = match error {
                    ServiceError::EmptyGraph => GraphPanel::NoData,
                    other => GraphPanel::Failed(other.to_string()),
                };
            }
        }
        Vec::new()
    }

    /// Installs a graph into its topic slot. `fresh` marks brand-new
    /// similarity data: the only point where the position cache is cleared.
    /// The simulation runs once, and only when some node lacked a cached
    /// position; re-installs of a fully cached graph skip it entirely.
    fn install_graph(&mut self, topic: Topic, data: GraphData, fresh: bool) {
        let graph = match data.into_graph() {
            Ok(graph) => graph,
            Err(ServiceError::EmptyGraph) => {
                self.session.slot_mut(topic).graph = GraphPanel::NoData;
                return;
            }
            Err(error) => {
                self.session.slot_mut(topic).graph = GraphPanel::Failed(error.to_string());
                return;
            }
        };

        let slot = self.session.slot_mut(topic);
        if fresh {
            slot.positions.clear();
        }

        let mut graph = graph;
        let mut any_unseeded = false;
        for node in &mut graph.nodes {
            if let Some(pos) = slot.positions.get(node.id) {
                node.pos = pos;
            } else {
                node.pos = layout::random_seed_position(&mut self.rng);
                any_unseeded = true;
            }
        }

        if any_unseeded {
            layout::simulate(&mut graph);
        }

        let slot = self.session.slot_mut(topic);
        slot.positions
            .set_all(graph.nodes.iter().map(|node| (node.id, node.pos)));
        debug!(
            topic = topic.label(),
            nodes = graph.node_count(),
            edges = graph.edges.len(),
            fresh,
            simulated = any_unseeded,
            "graph installed"
        );
        slot.graph = GraphPanel::Ready(graph);
        slot.selection = None;
        slot.concept = ConceptPanel::Hidden;
    }

    fn select_cluster(&mut self, node_id: u32) -> Vec<Command> {
        let topic = self.session.active;
        let slot = self.session.active_slot();
        let Some(search_id) = slot.search_id.clone() else {
            return Vec::new();
        };
        let Some(node) = slot.graph.graph().and_then(|graph| graph.node(node_id)) else {
            return Vec::new();
        };

        let story_ids = node.story_ids.clone();
        let mut panel = SelectionPanel {
            cluster_id: node.id,
            label: node.label.clone(),
            size: node.size,
            avg_engagement: node.avg_engagement,
            story_ids: story_ids.clone(),
            summary: SummaryState::Pending,
        };

        let mut commands = Vec::new();
        let key = summary_cache_key(&search_id, node_id, &story_ids);
        if let Some(summary) = self.session.summary_cache.get(&key) {
            debug!(cluster = node_id, "summary served from cache");
            panel.summary = SummaryState::Ready(summary.clone());
        } else {
            commands.push(Command::FetchSummary {
                token: SummaryToken {
                    topic,
                    search_id: search_id.clone(),
                    cluster_id: node_id,
                },
                request: SummaryRequest {
                    search_id: search_id.clone(),
                    cluster_id: node_id,
                    story_ids,
                },
            });
        }

        commands.push(Command::FetchConcepts(ConceptToken {
            topic,
            search_id,
            cluster_id: node_id,
        }));

        let slot = self.session.active_slot_mut();
        slot.selection = Some(panel);
        slot.concept = ConceptPanel::Pending;
        commands
    }

    fn apply_summary_result(
        &mut self,
        token: SummaryToken,
        result: Result<SummaryResponse, ServiceError>,
    ) -> Vec<Command> {
        let slot = self.session.slot(token.topic);
        let still_current = slot.search_id.as_deref() == Some(token.search_id.as_str())
            && slot.selected_cluster() == Some(token.cluster_id);
        if !still_current {
            debug!(cluster = token.cluster_id, "discarding stale summary completion");
            return Vec::new();
        }

        let story_ids = slot
            .selection
            .as_ref()
            .map(|panel| panel.story_ids.clone())
            .unwrap_or_default();

        let state = match result {
            Ok(response) => {
                let summary = Summary {
                    title: response.title,
                    body: response.summary,
                };
                let key = summary_cache_key(&token.search_id, token.cluster_id, &story_ids);
                self.session.summary_cache.insert(key, summary.clone());
                SummaryState::Ready(summary)
            }
            Err(error) => SummaryState::Failed(error.to_string()),
        };

        if let Some(panel) = &mut self.session.slot_mut(token.topic).selection {
            panel.summary = state;
        }
        Vec::new()
    }

    fn retry_summary(&mut self) -> Vec<Command> {
        let topic = self.session.active;
        let slot = self.session.active_slot();
        let Some(search_id) = slot.search_id.clone() else {
            return Vec::new();
        };
        let Some(panel) = &slot.selection else {
            return Vec::new();
        };
        if !matches!(panel.summary, SummaryState::Failed(_)) {
            return Vec::new();
        }

        let token = SummaryToken {
            topic,
            search_id: search_id.clone(),
            cluster_id: panel.cluster_id,
        };
        let request = SummaryRequest {
            search_id,
            cluster_id: panel.cluster_id,
            story_ids: panel.story_ids.clone(),
        };

        let slot = self.session.active_slot_mut();
        if let Some(panel) = &mut slot.selection {
            panel.summary = SummaryState::Pending;
        }
        vec![Command::FetchSummary { token, request }]
    }

    fn apply_concept_result(
        &mut self,
        token: ConceptToken,
        result: Result<ConceptResponse, ServiceError>,
    ) -> Vec<Command> {
        let slot = self.session.slot(token.topic);
        let still_current = slot.search_id.as_deref() == Some(token.search_id.as_str())
            && slot.selected_cluster() == Some(token.cluster_id);
        if !still_current {
            debug!(cluster = token.cluster_id, "discarding stale concept completion");
            return Vec::new();
        }

        let panel = match result.and_then(ConceptResponse::into_parts) {
            Ok((nodes, root_id)) => match build_tree(nodes, &root_id) {
                Ok(tree) => {
                    let layout = layout_tree(&tree, CONCEPT_AREA_WIDTH, CONCEPT_AREA_HEIGHT);
                    ConceptPanel::Ready(ConceptView {
                        tree,
                        layout,
                        highlight: Default::default(),
                    })
                }
                Err(error) => {
                    warn!(%error, "concept tree rejected");
                    ConceptPanel::Failed(error.to_string())
                }
            },
            Err(error) => ConceptPanel::Failed(error.to_string()),
        };

        self.session.slot_mut(token.topic).concept = panel;
        Vec::new()
    }
}

use crate::graph::cache::node_radius;
use crate::graph::style::{EdgeStyle, edge_style};
use crate::graph::Vec2;

use super::hierarchy::Emphasis;
use super::{ConceptPanel, EdgeTooltip, Session, TopicSlot};

/// One drawable cluster vertex: final position, derived radius, caller
/// color. Everything the rendering surface needs and nothing it owns.
#[derive(Clone, Debug)]
pub struct SceneNode {
    pub id: u32,
    pub label: String,
    pub pos: Vec2,
    pub radius: f32,
    pub color: String,
    pub selected: bool,
}

#[derive(Clone, Debug)]
pub struct SceneEdge {
    pub source: u32,
    pub target: u32,
    pub from: Vec2,
    pub to: Vec2,
    pub similarity: f32,
    pub style: EdgeStyle,
}

#[derive(Clone, Debug)]
pub struct GraphScene {
    pub nodes: Vec<SceneNode>,
    pub edges: Vec<SceneEdge>,
    pub tooltip: Option<EdgeTooltip>,
}

/// Projects the active topic slot into a drawable scene. Positions come
/// from the slot's position cache; radii and edge styles are derived fresh
/// on every call, so a threshold change only needs a re-projection.
pub fn graph_scene(session: &Session) -> Option<GraphScene> {
    let slot = session.active_slot();
    let graph = slot.graph.graph()?;

    let (min_size, max_size) = graph.size_bounds();
    let selected = slot.selected_cluster();

    let nodes = graph
        .nodes
        .iter()
        .map(|node| SceneNode {
            id: node.id,
            label: node.label.clone(),
            pos: slot.positions.get(node.id).unwrap_or(node.pos),
            radius: node_radius(node.size, min_size, max_size),
            color: node.color.clone(),
            selected: selected == Some(node.id),
        })
        .collect();

    let edges = graph
        .edges
        .iter()
        .filter_map(|edge| {
            let style = edge_style(edge.similarity, slot.threshold)?;
            let from = position_of(slot, edge.source)?;
            let to = position_of(slot, edge.target)?;
            Some(SceneEdge {
                source: edge.source,
                target: edge.target,
                from,
                to,
                similarity: edge.similarity,
                style,
            })
        })
        .collect();

    Some(GraphScene {
        nodes,
        edges,
        tooltip: session.tooltip.clone(),
    })
}

fn position_of(slot: &TopicSlot, node_id: u32) -> Option<Vec2> {
    slot.positions
        .get(node_id)
        .or_else(|| slot.graph.graph()?.node(node_id).map(|node| node.pos))
}

#[derive(Clone, Debug)]
pub struct HierarchySceneNode {
    pub id: String,
    pub label: String,
    pub layer: u32,
    pub pos: Vec2,
    pub emphasis: Emphasis,
    pub article_url: Option<String>,
}

#[derive(Clone, Debug)]
pub struct HierarchySceneEdge {
    pub from: Vec2,
    pub to: Vec2,
    pub emphasis: Emphasis,
}

#[derive(Clone, Debug)]
pub struct HierarchyScene {
    pub nodes: Vec<HierarchySceneNode>,
    pub edges: Vec<HierarchySceneEdge>,
    pub width: f32,
    pub height: f32,
}

/// Projects the active slot's concept view, classifying every node and
/// edge against the current path highlight.
pub fn hierarchy_scene(session: &Session) -> Option<HierarchyScene> {
    let slot = session.active_slot();
    let ConceptPanel::Ready(view) = &slot.concept else {
        return None;
    };

    let nodes = view
        .tree
        .nodes()
        .iter()
        .enumerate()
        .map(|(index, node)| HierarchySceneNode {
            id: node.id.clone(),
            label: node.label.clone(),
            layer: node.layer,
            pos: view.layout.positions[index],
            emphasis: view.highlight.node_emphasis(index),
            article_url: node.article_url().map(str::to_owned),
        })
        .collect();

    let edges = view
        .tree
        .edges()
        .map(|(parent, child)| HierarchySceneEdge {
            from: view.layout.positions[parent],
            to: view.layout.positions[child],
            emphasis: view.highlight.edge_emphasis(parent, child),
        })
        .collect();

    Some(HierarchyScene {
        nodes,
        edges,
        width: view.layout.width,
        height: view.layout.height,
    })
}

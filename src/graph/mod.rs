use std::collections::HashMap;
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

pub mod cache;
pub mod layout;
pub mod style;

/// Minimal 2D vector used for world positions, velocities, and forces.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

pub const fn vec2(x: f32, y: f32) -> Vec2 {
    Vec2 { x, y }
}

impl Vec2 {
    pub const ZERO: Vec2 = vec2(0.0, 0.0);

    pub fn length_sq(self) -> f32 {
        (self.x * self.x) + (self.y * self.y)
    }

    pub fn length(self) -> f32 {
        self.length_sq().sqrt()
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    fn add(self, rhs: Vec2) -> Vec2 {
        vec2(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, rhs: Vec2) -> Vec2 {
        vec2(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;
    fn mul(self, rhs: f32) -> Vec2 {
        vec2(self.x * rhs, self.y * rhs)
    }
}

impl Div<f32> for Vec2 {
    type Output = Vec2;
    fn div(self, rhs: f32) -> Vec2 {
        vec2(self.x / rhs, self.y / rhs)
    }
}

impl Neg for Vec2 {
    type Output = Vec2;
    fn neg(self) -> Vec2 {
        vec2(-self.x, -self.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl SubAssign for Vec2 {
    fn sub_assign(&mut self, rhs: Vec2) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

/// One cluster of similar stories, rendered as a single vertex.
///
/// `pos` and `vel` are meaningful only while the layout simulation runs;
/// the position of record lives in the per-topic [`cache::PositionCache`].
#[derive(Clone, Debug)]
pub struct ClusterNode {
    pub id: u32,
    pub label: String,
    pub size: u32,
    pub avg_engagement: f32,
    pub color: String,
    pub story_ids: Vec<String>,
    pub pos: Vec2,
    pub vel: Vec2,
}

/// Unordered similarity edge between two clusters. Visual attributes are
/// derived from the score at render time and never stored here.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClusterEdge {
    pub source: u32,
    pub target: u32,
    pub similarity: f32,
}

#[derive(Clone, Debug)]
pub struct ClusterGraph {
    pub nodes: Vec<ClusterNode>,
    pub edges: Vec<ClusterEdge>,
    index_by_id: HashMap<u32, usize>,
}

impl ClusterGraph {
    /// Edges whose endpoints are not in the node set are dropped, duplicate
    /// unordered pairs collapse to the first occurrence, and self loops are
    /// discarded. Similarity is clamped into [0, 1].
    pub fn new(nodes: Vec<ClusterNode>, edges: Vec<ClusterEdge>) -> Self {
        let mut index_by_id = HashMap::with_capacity(nodes.len());
        for (index, node) in nodes.iter().enumerate() {
            index_by_id.insert(node.id, index);
        }

        let mut seen = HashMap::new();
        let mut kept = Vec::with_capacity(edges.len());
        for edge in edges {
            if edge.source == edge.target
                || !index_by_id.contains_key(&edge.source)
                || !index_by_id.contains_key(&edge.target)
            {
                continue;
            }

            let key = (edge.source.min(edge.target), edge.source.max(edge.target));
            if seen.insert(key, ()).is_none() {
                kept.push(ClusterEdge {
                    similarity: edge.similarity.clamp(0.0, 1.0),
                    ..edge
                });
            }
        }

        Self {
            nodes,
            edges: kept,
            index_by_id,
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn index_of(&self, id: u32) -> Option<usize> {
        self.index_by_id.get(&id).copied()
    }

    pub fn node(&self, id: u32) -> Option<&ClusterNode> {
        self.index_of(id).map(|index| &self.nodes[index])
    }

    pub fn edge_between(&self, a: u32, b: u32) -> Option<&ClusterEdge> {
        self.edges.iter().find(|edge| {
            (edge.source == a && edge.target == b) || (edge.source == b && edge.target == a)
        })
    }

    /// Observed story-count bounds of the current node set, used for the
    /// per-render radius normalization.
    pub fn size_bounds(&self) -> (u32, u32) {
        let mut min = u32::MAX;
        let mut max = 0u32;
        for node in &self.nodes {
            min = min.min(node.size);
            max = max.max(node.size);
        }
        if min == u32::MAX {
            (0, 0)
        } else {
            (min, max)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: u32, size: u32) -> ClusterNode {
        ClusterNode {
            id,
            label: format!("cluster {id}"),
            size,
            avg_engagement: 0.0,
            color: "#888888".to_owned(),
            story_ids: Vec::new(),
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
        }
    }

    fn edge(source: u32, target: u32, similarity: f32) -> ClusterEdge {
        ClusterEdge {
            source,
            target,
            similarity,
        }
    }

    #[test]
    fn drops_dangling_and_duplicate_edges() {
        let graph = ClusterGraph::new(
            vec![node(0, 3), node(1, 5)],
            vec![edge(0, 1, 0.7), edge(1, 0, 0.9), edge(0, 7, 0.4), edge(1, 1, 0.5)],
        );

        assert_eq!(graph.edges.len(), 1);
        assert_eq!(graph.edges[0].similarity, 0.7);
    }

    #[test]
    fn size_bounds_cover_node_set() {
        let graph = ClusterGraph::new(vec![node(0, 4), node(1, 19), node(2, 1)], Vec::new());
        assert_eq!(graph.size_bounds(), (1, 19));
    }

    #[test]
    fn edge_lookup_is_unordered() {
        let graph = ClusterGraph::new(vec![node(0, 1), node(1, 1)], vec![edge(0, 1, 0.6)]);
        assert!(graph.edge_between(1, 0).is_some());
    }
}

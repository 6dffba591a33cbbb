use serde::{Deserialize, Serialize};

use crate::error::ServiceError;
use crate::graph::{ClusterEdge, ClusterGraph, ClusterNode, Vec2};

/// Wire shape of the Data Service graph endpoint.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct GraphResponse {
    pub success: bool,
    #[serde(default)]
    pub graph_data: Option<GraphData>,
    #[serde(default)]
    pub message: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct GraphData {
    pub nodes: Vec<GraphNodePayload>,
    #[serde(default)]
    pub edges: Vec<GraphEdgePayload>,
    #[serde(default)]
    pub n_clusters: usize,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct GraphNodePayload {
    pub id: u32,
    pub label: String,
    pub size: u32,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub avg_engagement: f32,
    #[serde(default)]
    pub story_ids: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct GraphEdgePayload {
    pub source: u32,
    pub target: u32,
    #[serde(default)]
    pub similarity: Option<f32>,
}

impl GraphResponse {
    /// Unwraps the `success`/`message` envelope. A refused envelope or a
    /// missing body maps to `InvalidResponse`.
    pub fn into_data(self) -> Result<GraphData, ServiceError> {
        if !self.success {
            let message = if self.message.is_empty() {
                "graph generation was refused".to_owned()
            } else {
                self.message
            };
            return Err(ServiceError::InvalidResponse(message));
        }

        self.graph_data
            .ok_or_else(|| ServiceError::InvalidResponse("missing graph_data".to_owned()))
    }

    pub fn into_graph(self) -> Result<ClusterGraph, ServiceError> {
        self.into_data()?.into_graph()
    }
}

impl GraphData {
    pub fn into_graph(self) -> Result<ClusterGraph, ServiceError> {
        if self.nodes.is_empty() {
            return Err(ServiceError::EmptyGraph);
        }

        let nodes = self
            .nodes
            .into_iter()
            .map(|node| ClusterNode {
                id: node.id,
                label: node.label,
                size: node.size,
                avg_engagement: node.avg_engagement,
                color: node.color,
                story_ids: node.story_ids,
                pos: Vec2::ZERO,
                vel: Vec2::ZERO,
            })
            .collect();

        let edges = self
            .edges
            .into_iter()
            .map(|edge| ClusterEdge {
                source: edge.source,
                target: edge.target,
                // Absent scores default to the medium band instead of failing.
                similarity: edge.similarity.unwrap_or(0.5),
            })
            .collect();

        Ok(ClusterGraph::new(nodes, edges))
    }
}

/// Wire shape of the Concept Service endpoint.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct ConceptResponse {
    pub success: bool,
    #[serde(default)]
    pub nodes: Vec<ConceptNodePayload>,
    #[serde(default)]
    pub root_id: Option<String>,
    #[serde(default)]
    pub layer_count: usize,
    #[serde(default)]
    pub message: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct ConceptNodePayload {
    pub id: String,
    pub label: String,
    pub layer: u32,
    #[serde(default)]
    pub children: Vec<String>,
    /// Wire compatibility only; the tree build derives parent links from
    /// `children` and ignores this field.
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(default)]
    pub article_id: Option<String>,
    #[serde(default)]
    pub article_title: Option<String>,
    #[serde(default)]
    pub article_url: Option<String>,
    #[serde(default)]
    pub article_hn_url: Option<String>,
}

impl ConceptResponse {
    pub fn into_parts(self) -> Result<(Vec<ConceptNodePayload>, String), ServiceError> {
        if !self.success {
            let message = if self.message.is_empty() {
                "concept graph generation was refused".to_owned()
            } else {
                self.message
            };
            return Err(ServiceError::InvalidResponse(message));
        }

        let root_id = self
            .root_id
            .ok_or_else(|| ServiceError::InvalidResponse("missing root_id".to_owned()))?;
        Ok((self.nodes, root_id))
    }
}

/// Wire shape of the Summary Service endpoint.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct SummaryResponse {
    pub title: String,
    pub summary: String,
    #[serde(default)]
    pub story_count: usize,
}

/// Per-session record read on load; decides whether generation is offered
/// for each topic slot.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct SessionRecord {
    #[serde(default)]
    pub top_search_id: Option<String>,
    #[serde(default)]
    pub bottom_search_id: Option<String>,
    #[serde(default)]
    pub clusters_generated: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_similarity_defaults_to_medium() {
        let raw = r#"{
            "success": true,
            "graph_data": {
                "nodes": [
                    {"id": 0, "label": "a", "size": 3},
                    {"id": 1, "label": "b", "size": 5}
                ],
                "edges": [{"source": 0, "target": 1}]
            },
            "message": "ok"
        }"#;

        let response: GraphResponse = serde_json::from_str(raw).unwrap();
        let graph = response.into_graph().unwrap();
        assert_eq!(graph.edges[0].similarity, 0.5);
    }

    #[test]
    fn refused_envelope_is_invalid_response() {
        let response: GraphResponse =
            serde_json::from_str(r#"{"success": false, "message": "embed first"}"#).unwrap();
        assert_eq!(
            response.into_graph().unwrap_err(),
            ServiceError::InvalidResponse("embed first".to_owned())
        );
    }

    #[test]
    fn zero_nodes_is_empty_graph() {
        let response: GraphResponse = serde_json::from_str(
            r#"{"success": true, "graph_data": {"nodes": [], "edges": []}, "message": ""}"#,
        )
        .unwrap();
        assert_eq!(response.into_graph().unwrap_err(), ServiceError::EmptyGraph);
    }

    #[test]
    fn concept_response_requires_root() {
        let response: ConceptResponse =
            serde_json::from_str(r#"{"success": true, "nodes": [], "message": ""}"#).unwrap();
        assert!(matches!(
            response.into_parts(),
            Err(ServiceError::InvalidResponse(_))
        ));
    }
}

use std::collections::HashMap;

use crate::error::ServiceError;

pub mod payload;
pub mod summary;

use payload::{ConceptResponse, GraphData, GraphResponse, SummaryResponse};

/// Cluster graph endpoint: `{search_id}` -> nodes/edges envelope.
pub trait DataService {
    fn fetch_graph(&mut self, search_id: &str) -> Result<GraphResponse, ServiceError>;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SummaryRequest {
    pub search_id: String,
    pub cluster_id: u32,
    pub story_ids: Vec<String>,
}

/// Summary endpoint: title/body for one cluster's story set.
pub trait SummaryService {
    fn summarize(&mut self, request: &SummaryRequest) -> Result<SummaryResponse, ServiceError>;
}

/// Concept-hierarchy endpoint: flat labeled node list plus declared root.
pub trait ConceptService {
    fn fetch_concepts(
        &mut self,
        search_id: &str,
        cluster_id: u32,
    ) -> Result<ConceptResponse, ServiceError>;
}

/// Previously fetched graph data keyed by search id, consulted before the
/// Data Service is called again. Reinstalling from here is the same
/// generated graph, so it does not count as brand-new similarity data.
#[derive(Debug, Default)]
pub struct GraphStore {
    by_search: HashMap<String, GraphData>,
}

impl GraphStore {
    pub fn get(&self, search_id: &str) -> Option<&GraphData> {
        self.by_search.get(search_id)
    }

    pub fn insert(&mut self, search_id: String, data: GraphData) {
        self.by_search.insert(search_id, data);
    }
}

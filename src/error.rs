use thiserror::Error;

/// Failures surfaced by the external data, summary, and concept services.
///
/// These are caught at the call site and rendered as an inline panel state;
/// they never unwind through the layout engine.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ServiceError {
    #[error("service unavailable: {0}")]
    Unavailable(String),
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    #[error("no clusters were returned")]
    EmptyGraph,
}

/// Rejections from the concept-tree build. A failed build aborts rendering
/// of the concept subtree only; the rest of the selection panel stays up.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum HierarchyError {
    #[error("declared root node {0:?} is not in the node list")]
    MissingRoot(String),
    #[error("node {parent:?} references unknown child {child:?}")]
    UnknownChild { parent: String, child: String },
    #[error("duplicate node id {0:?}")]
    DuplicateNode(String),
    #[error("node {0:?} is claimed as a child by more than one parent")]
    MultipleParents(String),
    #[error("declared root {0:?} is referenced as a child")]
    RootHasParent(String),
    #[error("{0} node(s) are not reachable from the root")]
    Unreachable(usize),
}

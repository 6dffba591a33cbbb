use std::collections::HashMap;

mod build;
mod highlight;
mod layout;

pub use build::build_tree;
pub use highlight::{Emphasis, Highlight};
pub use layout::{MIN_ROW_SPACING, TreeLayout, layout_tree};

/// Article metadata carried by layer-0 leaf nodes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ArticleRef {
    pub id: Option<String>,
    pub title: Option<String>,
    pub url: Option<String>,
    pub hn_url: Option<String>,
}

/// One node of the built concept tree, addressed by arena index.
#[derive(Clone, Debug)]
pub struct ConceptNode {
    pub id: String,
    pub label: String,
    pub layer: u32,
    pub children: Vec<usize>,
    pub parent: Option<usize>,
    pub article: Option<ArticleRef>,
}

impl ConceptNode {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Leaves with an article URL open the article on click instead of
    /// toggling the path highlight.
    pub fn article_url(&self) -> Option<&str> {
        if self.layer != 0 {
            return None;
        }
        self.article.as_ref().and_then(|article| article.url.as_deref())
    }
}

/// Rooted concept tree built from the service's flat node list. Invariants
/// enforced by [`build_tree`]: exactly one parentless node (the declared
/// root), no cycles, every node reachable from the root.
#[derive(Clone, Debug)]
pub struct ConceptTree {
    nodes: Vec<ConceptNode>,
    root: usize,
    index_by_id: HashMap<String, usize>,
}

impl ConceptTree {
    pub fn nodes(&self) -> &[ConceptNode] {
        &self.nodes
    }

    pub fn node(&self, index: usize) -> &ConceptNode {
        &self.nodes[index]
    }

    pub fn root(&self) -> usize {
        self.root
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index_by_id.get(id).copied()
    }

    /// Parent-link walk from `index` up to the root, inclusive of both ends.
    pub fn path_to_root(&self, index: usize) -> Vec<usize> {
        let mut path = vec![index];
        let mut cursor = index;
        while let Some(parent) = self.nodes[cursor].parent {
            path.push(parent);
            cursor = parent;
        }
        path
    }

    /// Parent/child pairs in arena order, the edge set of the tree.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.nodes.iter().enumerate().flat_map(|(parent, node)| {
            node.children.iter().map(move |&child| (parent, child))
        })
    }
}

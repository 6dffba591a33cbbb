use std::collections::HashSet;

use super::ConceptTree;

/// Visual classification of a node or edge under the current highlight.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Emphasis {
    Normal,
    Highlighted,
    Dimmed,
}

/// Root-to-node path highlight toggle.
///
/// While highlighted, a click on any node clears back to the unhighlighted
/// state regardless of which node was hit; while unhighlighted, a click
/// collects the clicked node's parent chain and marks it.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Highlight {
    #[default]
    Unhighlighted,
    Highlighted {
        path: HashSet<usize>,
    },
}

impl Highlight {
    pub fn toggle(&mut self, tree: &ConceptTree, clicked: usize) {
        *self = match self {
            Self::Highlighted { .. } => Self::Unhighlighted,
            Self::Unhighlighted => Self::Highlighted {
                path: tree.path_to_root(clicked).into_iter().collect(),
            },
        };
    }

    pub fn is_active(&self) -> bool {
        matches!(self, Self::Highlighted { .. })
    }

    pub fn node_emphasis(&self, index: usize) -> Emphasis {
        match self {
            Self::Unhighlighted => Emphasis::Normal,
            Self::Highlighted { path } => {
                if path.contains(&index) {
                    Emphasis::Highlighted
                } else {
                    Emphasis::Dimmed
                }
            }
        }
    }

    pub fn edge_emphasis(&self, parent: usize, child: usize) -> Emphasis {
        match self {
            Self::Unhighlighted => Emphasis::Normal,
            Self::Highlighted { path } => {
                if path.contains(&parent) && path.contains(&child) {
                    Emphasis::Highlighted
                } else {
                    Emphasis::Dimmed
                }
            }
        }
    }
}

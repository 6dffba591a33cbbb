use std::collections::{HashMap, VecDeque};

use crate::error::HierarchyError;
use crate::service::payload::ConceptNodePayload;

use super::{ArticleRef, ConceptNode, ConceptTree};

/// Two-phase arena build: allocate every node record first, then resolve
/// children by id lookup. Any unresolved reference rejects the whole build;
/// a partial tree is never returned.
pub fn build_tree(
    payloads: Vec<ConceptNodePayload>,
    root_id: &str,
) -> Result<ConceptTree, HierarchyError> {
    let mut index_by_id = HashMap::with_capacity(payloads.len());
    let mut nodes = Vec::with_capacity(payloads.len());

    for payload in &payloads {
        if index_by_id.insert(payload.id.clone(), nodes.len()).is_some() {
            return Err(HierarchyError::DuplicateNode(payload.id.clone()));
        }

        let article = if payload.article_id.is_some()
            || payload.article_title.is_some()
            || payload.article_url.is_some()
            || payload.article_hn_url.is_some()
        {
            Some(ArticleRef {
                id: payload.article_id.clone(),
                title: payload.article_title.clone(),
                url: payload.article_url.clone(),
                hn_url: payload.article_hn_url.clone(),
            })
        } else {
            None
        };

        nodes.push(ConceptNode {
            id: payload.id.clone(),
            label: payload.label.clone(),
            layer: payload.layer,
            children: Vec::new(),
            parent: None,
            article,
        });
    }

    let root = index_by_id
        .get(root_id)
        .copied()
        .ok_or_else(|| HierarchyError::MissingRoot(root_id.to_owned()))?;

    for payload in &payloads {
        let parent = index_by_id[&payload.id];
        for child_id in &payload.children {
            let child = index_by_id.get(child_id).copied().ok_or_else(|| {
                HierarchyError::UnknownChild {
                    parent: payload.id.clone(),
                    child: child_id.clone(),
                }
            })?;

            if child == root {
                return Err(HierarchyError::RootHasParent(root_id.to_owned()));
            }
            if nodes[child].parent.is_some() {
                return Err(HierarchyError::MultipleParents(child_id.clone()));
            }

            nodes[child].parent = Some(parent);
            nodes[parent].children.push(child);
        }
    }

    // Parent links are acyclic by construction (single parent, root
    // excluded), so full reachability from the root is the remaining check.
    let mut visited = vec![false; nodes.len()];
    let mut queue = VecDeque::from([root]);
    visited[root] = true;
    let mut reached = 1usize;

    while let Some(current) = queue.pop_front() {
        for &child in &nodes[current].children {
            if !visited[child] {
                visited[child] = true;
                reached += 1;
                queue.push_back(child);
            }
        }
    }

    if reached != nodes.len() {
        return Err(HierarchyError::Unreachable(nodes.len() - reached));
    }

    Ok(ConceptTree {
        nodes,
        root,
        index_by_id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(id: &str, layer: u32, children: &[&str]) -> ConceptNodePayload {
        ConceptNodePayload {
            id: id.to_owned(),
            label: id.to_owned(),
            layer,
            children: children.iter().map(|child| (*child).to_owned()).collect(),
            parent: None,
            article_id: None,
            article_title: None,
            article_url: None,
            article_hn_url: None,
        }
    }

    #[test]
    fn builds_rooted_tree_with_parent_links() {
        let tree = build_tree(
            vec![
                payload("root", 2, &["c1", "c2"]),
                payload("c1", 1, &["a1"]),
                payload("c2", 1, &[]),
                payload("a1", 0, &[]),
            ],
            "root",
        )
        .unwrap();

        let root = tree.root();
        assert_eq!(tree.node(root).id, "root");
        assert!(tree.node(root).parent.is_none());

        let article = tree.index_of("a1").unwrap();
        let path = tree.path_to_root(article);
        let labels = path
            .iter()
            .map(|&index| tree.node(index).id.as_str())
            .collect::<Vec<_>>();
        assert_eq!(labels, ["a1", "c1", "root"]);
    }

    #[test]
    fn missing_root_is_rejected() {
        let result = build_tree(vec![payload("c1", 1, &[])], "root");
        assert_eq!(result.unwrap_err(), HierarchyError::MissingRoot("root".to_owned()));
    }

    #[test]
    fn dangling_child_is_rejected() {
        let result = build_tree(vec![payload("root", 1, &["ghost"])], "root");
        assert_eq!(
            result.unwrap_err(),
            HierarchyError::UnknownChild {
                parent: "root".to_owned(),
                child: "ghost".to_owned(),
            }
        );
    }

    #[test]
    fn unreachable_node_is_rejected() {
        let result = build_tree(
            vec![payload("root", 1, &[]), payload("stray", 0, &[])],
            "root",
        );
        assert_eq!(result.unwrap_err(), HierarchyError::Unreachable(1));
    }

    #[test]
    fn double_parent_is_rejected() {
        let result = build_tree(
            vec![
                payload("root", 2, &["c1", "c2"]),
                payload("c1", 1, &["a1"]),
                payload("c2", 1, &["a1"]),
                payload("a1", 0, &[]),
            ],
            "root",
        );
        assert_eq!(result.unwrap_err(), HierarchyError::MultipleParents("a1".to_owned()));
    }
}

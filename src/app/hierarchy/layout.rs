use crate::graph::{Vec2, vec2};

use super::ConceptTree;

pub const MIN_ROW_SPACING: f32 = 28.0;
const MARGIN: f32 = 24.0;

/// 2D coordinates per arena index plus the drawing extent actually used.
#[derive(Clone, Debug)]
pub struct TreeLayout {
    pub positions: Vec<Vec2>,
    pub width: f32,
    pub height: f32,
}

/// Layered tree layout: one column per layer with the root leftmost and
/// layer-0 article leaves rightmost, siblings stacked in input order.
/// Leaves claim evenly spaced rows and every internal node centers on its
/// children. Height grows with the leaf count so rows never overlap, even
/// when the requested area is smaller.
pub fn layout_tree(tree: &ConceptTree, area_width: f32, area_height: f32) -> TreeLayout {
    let mut positions = vec![Vec2::ZERO; tree.len()];
    if tree.is_empty() {
        return TreeLayout {
            positions,
            width: area_width,
            height: area_height,
        };
    }

    let leaf_count = tree
        .nodes()
        .iter()
        .filter(|node| node.is_leaf())
        .count()
        .max(1);

    let height = area_height.max(MARGIN * 2.0 + ((leaf_count - 1) as f32 * MIN_ROW_SPACING));
    let row_spacing = if leaf_count > 1 {
        ((height - MARGIN * 2.0) / (leaf_count - 1) as f32).max(MIN_ROW_SPACING)
    } else {
        0.0
    };

    let max_layer = tree
        .nodes()
        .iter()
        .map(|node| node.layer)
        .max()
        .unwrap_or(0);
    let column_width = if max_layer > 0 {
        (area_width - MARGIN * 2.0) / max_layer as f32
    } else {
        0.0
    };

    let mut next_row = 0usize;
    assign_rows(tree, tree.root(), row_spacing, &mut next_row, &mut positions);

    for (index, node) in tree.nodes().iter().enumerate() {
        let column = max_layer.saturating_sub(node.layer);
        positions[index].x = MARGIN + (column as f32 * column_width);
    }

    TreeLayout {
        positions,
        width: area_width,
        height,
    }
}

fn assign_rows(
    tree: &ConceptTree,
    index: usize,
    row_spacing: f32,
    next_row: &mut usize,
    positions: &mut [Vec2],
) {
    let node = tree.node(index);
    if node.is_leaf() {
        positions[index] = vec2(0.0, MARGIN + (*next_row as f32 * row_spacing));
        *next_row += 1;
        return;
    }

    for &child in &node.children {
        assign_rows(tree, child, row_spacing, next_row, positions);
    }

    let sum: f32 = node.children.iter().map(|&child| positions[child].y).sum();
    positions[index].y = sum / node.children.len() as f32;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::hierarchy::build_tree;
    use crate::service::payload::ConceptNodePayload;

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

    fn sample_tree() -> crate::app::hierarchy::ConceptTree {
        build_tree(
            vec![
                payload("root", 2, &["c1", "c2"]),
                payload("c1", 1, &["a1", "a2"]),
                payload("c2", 1, &["a3"]),
                payload("a1", 0, &[]),
                payload("a2", 0, &[]),
                payload("a3", 0, &[]),
            ],
            "root",
        )
        .unwrap()
    }

    #[test]
    fn root_is_left_of_leaves() {
        let tree = sample_tree();
        let layout = layout_tree(&tree, 800.0, 400.0);

        let root_x = layout.positions[tree.root()].x;
        let leaf_x = layout.positions[tree.index_of("a1").unwrap()].x;
        assert!(root_x < leaf_x);
    }

    #[test]
    fn siblings_keep_input_order_top_to_bottom() {
        let tree = sample_tree();
        let layout = layout_tree(&tree, 800.0, 400.0);

        let y1 = layout.positions[tree.index_of("a1").unwrap()].y;
        let y2 = layout.positions[tree.index_of("a2").unwrap()].y;
        let y3 = layout.positions[tree.index_of("a3").unwrap()].y;
        assert!(y1 < y2 && y2 < y3);
    }

    #[test]
    fn parent_centers_on_children() {
        let tree = sample_tree();
        let layout = layout_tree(&tree, 800.0, 400.0);

        let c1 = tree.index_of("c1").unwrap();
        let mid = (layout.positions[tree.index_of("a1").unwrap()].y
            + layout.positions[tree.index_of("a2").unwrap()].y)
            / 2.0;
        assert!((layout.positions[c1].y - mid).abs() < f32::EPSILON);
    }

    #[test]
    fn height_grows_with_leaf_count() {
        let mut payloads = vec![payload("root", 1, &[])];
        let child_ids: Vec<String> = (0..40).map(|index| format!("a{index}")).collect();
        payloads[0].children = child_ids.clone();
        for id in &child_ids {
            payloads.push(payload(id, 0, &[]));
        }

        let tree = build_tree(payloads, "root").unwrap();
        let layout = layout_tree(&tree, 800.0, 100.0);
        assert!(layout.height >= 39.0 * MIN_ROW_SPACING);
    }
}

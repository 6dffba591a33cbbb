use std::collections::HashMap;

use super::Vec2;

pub const MIN_NODE_RADIUS: f32 = 10.0;
pub const MAX_NODE_RADIUS: f32 = 40.0;

/// Last-known world position per cluster id, scoped to one topic slot.
///
/// Once a position is recorded for a generated graph it is reused for every
/// re-render of that graph, whatever the threshold does. The cache is
/// cleared only when brand-new similarity data is installed for the topic.
#[derive(Clone, Debug, Default)]
pub struct PositionCache {
    positions: HashMap<u32, Vec2>,
}

impl PositionCache {
    pub fn get(&self, node_id: u32) -> Option<Vec2> {
        self.positions.get(&node_id).copied()
    }

    pub fn set_all(&mut self, positions: impl IntoIterator<Item = (u32, Vec2)>) {
        self.positions.extend(positions);
    }

    pub fn clear(&mut self) {
        self.positions.clear();
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Linear story-count to radius mapping against the observed bounds of the
/// current node set. Recomputed every render, never cached. When all nodes
/// share one size the denominator is treated as 1, pinning them to the
/// minimum radius.
pub fn node_radius(size: u32, min: u32, max: u32) -> f32 {
    let span = max.saturating_sub(min);
    let denominator = if span == 0 { 1.0 } else { span as f32 };
    let t = (size.saturating_sub(min) as f32 / denominator).clamp(0.0, 1.0);
    MIN_NODE_RADIUS + (t * (MAX_NODE_RADIUS - MIN_NODE_RADIUS))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::vec2;

    #[test]
    fn radius_maps_bounds_to_min_and_max() {
        let sizes = [1u32, 5, 10, 20];
        let radii = sizes.map(|size| node_radius(size, 1, 20));

        assert_eq!(radii[0], MIN_NODE_RADIUS);
        assert_eq!(radii[3], MAX_NODE_RADIUS);
        assert!(radii[1] > MIN_NODE_RADIUS && radii[1] < MAX_NODE_RADIUS);
        assert!(radii[2] > radii[1] && radii[2] < MAX_NODE_RADIUS);
    }

    #[test]
    fn uniform_sizes_pin_to_min_radius() {
        assert_eq!(node_radius(7, 7, 7), MIN_NODE_RADIUS);
    }

    #[test]
    fn set_all_then_clear() {
        let mut cache = PositionCache::default();
        cache.set_all([(0, vec2(1.0, 2.0)), (1, vec2(3.0, 4.0))]);

        assert_eq!(cache.get(0), Some(vec2(1.0, 2.0)));
        assert_eq!(cache.len(), 2);

        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.get(0), None);
    }
}

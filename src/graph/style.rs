/// Similarity band an included edge falls into. Tiers are a function of the
/// score alone, independent of the filter threshold: a low threshold can
/// still show faint-tier edges.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EdgeTier {
    Strong,
    Medium,
    Faint,
}

impl EdgeTier {
    pub fn of(similarity: f32) -> Self {
        if similarity > 0.8 {
            Self::Strong
        } else if similarity >= 0.5 {
            Self::Medium
        } else {
            Self::Faint
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgeStyle {
    pub tier: EdgeTier,
    pub opacity: f32,
    pub width: f32,
}

impl EdgeStyle {
    fn for_tier(tier: EdgeTier) -> Self {
        let (opacity, width) = match tier {
            EdgeTier::Strong => (0.9, 3.5),
            EdgeTier::Medium => (0.6, 2.5),
            EdgeTier::Faint => (0.25, 1.5),
        };
        Self { tier, opacity, width }
    }

    pub fn css_color(&self) -> String {
        format!("rgba(110, 110, 110, {})", self.opacity)
    }
}

/// Pure filter-and-style step, re-evaluated on every threshold change and
/// every render. Returns `None` for edges below the threshold; never
/// touches node positions.
pub fn edge_style(similarity: f32, threshold: f32) -> Option<EdgeStyle> {
    if similarity < threshold {
        return None;
    }
    Some(EdgeStyle::for_tier(EdgeTier::of(similarity)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inclusion_matches_threshold_comparison() {
        for (similarity, threshold, included) in [
            (0.3, 0.5, false),
            (0.5, 0.5, true),
            (0.81, 0.5, true),
            (0.49, 0.0, true),
            (0.99, 1.0, false),
        ] {
            assert_eq!(
                edge_style(similarity, threshold).is_some(),
                included,
                "similarity {similarity} at threshold {threshold}"
            );
        }
    }

    #[test]
    fn tiers_are_independent_of_threshold() {
        let strong = edge_style(0.81, 0.5).unwrap();
        assert_eq!(strong.tier, EdgeTier::Strong);
        assert_eq!((strong.opacity, strong.width), (0.9, 3.5));

        let medium = edge_style(0.5, 0.5).unwrap();
        assert_eq!(medium.tier, EdgeTier::Medium);
        assert_eq!((medium.opacity, medium.width), (0.6, 2.5));

        let faint = edge_style(0.2, 0.0).unwrap();
        assert_eq!(faint.tier, EdgeTier::Faint);
        assert_eq!((faint.opacity, faint.width), (0.25, 1.5));
    }

    #[test]
    fn boundary_point_eight_is_medium() {
        assert_eq!(EdgeTier::of(0.8), EdgeTier::Medium);
    }
}

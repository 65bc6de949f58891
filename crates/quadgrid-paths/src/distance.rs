//! Distance metrics shared by step costs and heuristics.

use quadgrid_core::geom;

/// How the pathfinder measures the cost between two cells.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DistanceMetric {
    /// Taxicab distance, the natural fit for four-way movement.
    Manhattan,
    /// Straight-line distance, the natural fit for eight-way movement.
    #[default]
    Euclidean,
}

impl DistanceMetric {
    /// Distance from `(x1, y1)` to `(x2, y2)` under this metric.
    #[inline]
    pub fn between(self, x1: f32, y1: f32, x2: f32, y2: f32) -> f32 {
        match self {
            Self::Manhattan => geom::manhattan(x1, y1, x2, y2),
            Self::Euclidean => geom::euclidean(x1, y1, x2, y2),
        }
    }
}


#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn metric_round_trips() {
        for metric in [DistanceMetric::Manhattan, DistanceMetric::Euclidean] {
            let json = serde_json::to_string(&metric).unwrap();
            let back: DistanceMetric = serde_json::from_str(&json).unwrap();
            assert_eq!(back, metric);
        }
    }
}

use ndarray::{Array2, ArrayView1, ArrayView2};

use super::{check_build_args, Metric, SpatialIndex};
use crate::error::Result;

/// Exhaustive-scan index: every query compares against every point.
#[derive(Debug, Clone)]
pub struct BruteForce {
    /// Owned copy of the `D x N` point array.
    points: Array2<f64>,
    metric: Metric,
}

impl SpatialIndex for BruteForce {
    /// `leaf_size` is validated but otherwise unused.
    fn build(points: ArrayView2<'_, f64>, leaf_size: usize, metric: Metric) -> Result<Self> {
        check_build_args(points, leaf_size)?;
        Ok(Self {
            points: points.to_owned(),
            metric,
        })
    }

    fn query_radius(&self, point: ArrayView1<'_, f64>, radius: f64) -> Vec<usize> {
        self.points
            .columns()
            .into_iter()
            .enumerate()
            .filter(|(_, other)| self.metric.distance(point, other.view()) <= radius)
            .map(|(idx, _)| idx)
            .collect()
    }

    fn len(&self) -> usize {
        self.points.ncols()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_query_radius_inclusive() {
        let points = array![[0.0, 1.0, 2.0, 10.0]];
        let index = BruteForce::build(points.view(), 1, Metric::Euclidean).unwrap();

        assert_eq!(index.len(), 4);
        // Distance exactly 1.0 is inside the radius.
        assert_eq!(index.query_radius(points.column(1), 1.0), vec![0, 1, 2]);
        assert_eq!(index.query_radius(points.column(3), 1.0), vec![3]);
    }

    #[test]
    fn test_build_checks_match_kdtree() {
        use crate::spatial::KdTree;
        use ndarray::Array2;

        let points = array![[0.0, 1.0, 2.0]];
        assert!(BruteForce::build(points.view(), 0, Metric::Euclidean).is_err());
        assert!(KdTree::build(points.view(), 0, Metric::Euclidean).is_err());

        let no_dims = Array2::<f64>::zeros((0, 3));
        assert!(BruteForce::build(no_dims.view(), 4, Metric::Euclidean).is_err());
        assert!(KdTree::build(no_dims.view(), 4, Metric::Euclidean).is_err());
    }
}

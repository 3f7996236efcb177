//! Neighborhood queries over point sets.
//!
//! The indexed DBSCAN driver only needs one capability from a spatial
//! structure: given a point and a radius, return the indices of every point
//! within that radius. [`SpatialIndex`] captures exactly that, so the
//! clustering code never depends on a concrete tree.
//!
//! Point arrays are `D x N`: one column per point, one row per dimension.
//!
//! Two implementations are provided:
//!
//! - [`KdTree`]: median-split k-d tree. Radius queries prune whole subtrees
//!   whose split plane is farther than the radius from the query.
//! - [`BruteForce`]: exhaustive scan. Useful as a reference and for tiny inputs.

mod brute;
mod kdtree;

pub use brute::BruteForce;
pub use kdtree::KdTree;

use ndarray::{Array2, ArrayView1, ArrayView2};

use crate::error::{Error, Result};

/// Distance metric used by spatial indexes and [`pairwise_distances`].
///
/// All variants are Minkowski metrics (p = 2, 1, infinity), so the absolute
/// difference along any single axis is a lower bound on the full distance.
/// [`KdTree`] relies on this for pruning.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Metric {
    /// L2 norm.
    #[default]
    Euclidean,
    /// L1 norm (city block).
    Manhattan,
    /// L-infinity norm (largest per-axis difference).
    Chebyshev,
}

impl Metric {
    /// Distance between two points of equal dimensionality.
    #[inline]
    pub fn distance(self, a: ArrayView1<'_, f64>, b: ArrayView1<'_, f64>) -> f64 {
        debug_assert_eq!(a.len(), b.len());
        let diffs = a.iter().zip(b.iter()).map(|(x, y)| (x - y).abs());
        match self {
            Metric::Euclidean => diffs.map(|d| d * d).sum::<f64>().sqrt(),
            Metric::Manhattan => diffs.sum(),
            Metric::Chebyshev => diffs.fold(0.0, f64::max),
        }
    }
}

/// A structure answering fixed-radius neighborhood queries.
pub trait SpatialIndex: Sized {
    /// Build the index over a `D x N` point array.
    ///
    /// `leaf_size` bounds how many points a terminal bucket may hold; indexes
    /// without buckets may ignore it.
    fn build(points: ArrayView2<'_, f64>, leaf_size: usize, metric: Metric) -> Result<Self>;

    /// Indices of all indexed points `x` with `distance(point, x) <= radius`,
    /// in ascending order.
    ///
    /// When `point` is itself indexed, its own index is part of the result.
    fn query_radius(&self, point: ArrayView1<'_, f64>, radius: f64) -> Vec<usize>;

    /// Number of indexed points.
    fn len(&self) -> usize;

    /// Whether the index holds no points.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Argument checks shared by every [`SpatialIndex::build`].
fn check_build_args(points: ArrayView2<'_, f64>, leaf_size: usize) -> Result<()> {
    if leaf_size == 0 {
        return Err(Error::invalid("leaf_size", "must be at least 1"));
    }
    if points.nrows() == 0 {
        return Err(Error::invalid("points", "must have at least one dimension"));
    }
    Ok(())
}

/// Full `N x N` distance matrix for a `D x N` point array.
///
/// The result can be fed to [`crate::cluster::dbscan`].
pub fn pairwise_distances(points: ArrayView2<'_, f64>, metric: Metric) -> Array2<f64> {
    let n = points.ncols();
    let mut out = Array2::zeros((n, n));
    for i in 0..n {
        for j in (i + 1)..n {
            let d = metric.distance(points.column(i), points.column(j));
            out[[i, j]] = d;
            out[[j, i]] = d;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_metric_distances() {
        let a = array![0.0, 0.0];
        let b = array![3.0, 4.0];

        assert_eq!(Metric::Euclidean.distance(a.view(), b.view()), 5.0);
        assert_eq!(Metric::Manhattan.distance(a.view(), b.view()), 7.0);
        assert_eq!(Metric::Chebyshev.distance(a.view(), b.view()), 4.0);
    }

    #[test]
    fn test_pairwise_distances_symmetric() {
        // Three points on a line: 0, 1, 3.
        let points = array![[0.0, 1.0, 3.0]];
        let d = pairwise_distances(points.view(), Metric::Euclidean);

        assert_eq!(d.dim(), (3, 3));
        for i in 0..3 {
            assert_eq!(d[[i, i]], 0.0);
            for j in 0..3 {
                assert_eq!(d[[i, j]], d[[j, i]]);
            }
        }
        assert_eq!(d[[0, 2]], 3.0);
        assert_eq!(d[[1, 2]], 2.0);
    }
}

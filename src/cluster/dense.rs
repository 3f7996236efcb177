//! DBSCAN over a precomputed pairwise distance matrix.
//!
//! # The Algorithm (Ester et al., 1996)
//!
//! DBSCAN groups points that are densely packed together and leaves points in
//! sparse regions as noise. It discovers clusters of arbitrary shape and does
//! not need the number of clusters up front.
//!
//! ## Core Concepts
//!
//! - **Epsilon (ε)**: two points are neighbors when their distance is strictly
//!   below ε. Every point is its own neighbor (distance 0).
//! - **MinPts**: a point seeds a cluster when it has at least MinPts neighbors.
//! - **Noise**: a point that never seeds a cluster and is never absorbed by one.
//!
//! ## Algorithm Steps
//!
//! 1. Visit points in order. For each point P not yet assigned and not yet
//!    visited, mark it visited and find its neighbors.
//! 2. If `|neighbors| >= MinPts`, P seeds a new cluster, which grows from a
//!    FIFO queue initialised with P's neighbors:
//!    - pop Q; if Q is unvisited, mark it and find its neighbors. When Q has
//!      strictly more than MinPts neighbors, enqueue every unassigned one.
//!    - if Q is still unassigned, it joins the cluster.
//!
//! The seed test (`>=`) and the expansion test (`>`) differ on purpose; both
//! are kept as they are.
//!
//! A point joins at most one cluster: assignment only ever happens from 0, so
//! the first cluster to reach a point keeps it.
//!
//! ## Complexity
//!
//! - **Time**: O(n²): each region query scans one matrix column.
//! - **Space**: O(n) beyond the caller's matrix.
//!
//! ## References
//!
//! Ester et al. (1996). "A Density-Based Algorithm for Discovering Clusters
//! in Large Spatial Databases with Noise." KDD-96.

use std::collections::VecDeque;

use ndarray::ArrayView2;
use tracing::{debug, trace};

use super::result::DbscanResult;
use super::traits::{Clustering, DbscanExt, NOISE};
use super::util::rows_to_columns;
use crate::error::{Error, Result};
use crate::spatial::{pairwise_distances, Metric};

/// DBSCAN over a square distance matrix.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DenseDbscan {
    /// Neighborhood radius (exclusive).
    eps: f64,
    /// Minimum neighborhood size (self included) for a seed.
    min_pts: usize,
}

/// Per-run mutable state, owned by one driver call.
struct DenseState {
    visited: Vec<bool>,
    /// Cluster id per point, 0 = unassigned.
    assignments: Vec<usize>,
}

impl DenseDbscan {
    /// Create a new dense-matrix DBSCAN clusterer.
    ///
    /// # Arguments
    ///
    /// * `eps` - Points closer than this (strictly) are neighbors.
    /// * `min_pts` - Neighborhood size, counting the point itself, needed to
    ///   seed a cluster.
    pub fn new(eps: f64, min_pts: usize) -> Self {
        Self { eps, min_pts }
    }

    /// Set epsilon (neighborhood radius).
    pub fn with_eps(mut self, eps: f64) -> Self {
        self.eps = eps;
        self
    }

    /// Set the minimum neighborhood size for a seed.
    pub fn with_min_pts(mut self, min_pts: usize) -> Self {
        self.min_pts = min_pts;
        self
    }

    /// Configured epsilon.
    pub fn eps(&self) -> f64 {
        self.eps
    }

    /// Configured minimum neighborhood size.
    pub fn min_pts(&self) -> usize {
        self.min_pts
    }

    /// Cluster the points described by `distances`, visiting them in index order.
    pub fn fit(&self, distances: ArrayView2<'_, f64>) -> Result<DbscanResult> {
        let n = self.validate(distances)?;
        Ok(self.run(distances, 0..n))
    }

    /// Cluster the points described by `distances`, trying seeds in `order`.
    ///
    /// `order` may omit or repeat points; points it omits are only reached
    /// through expansion of other clusters.
    pub fn fit_with_order(
        &self,
        distances: ArrayView2<'_, f64>,
        order: &[usize],
    ) -> Result<DbscanResult> {
        let n = self.validate(distances)?;
        if let Some(&bad) = order.iter().find(|&&p| p >= n) {
            return Err(Error::invalid(
                "order",
                format!("point index {bad} out of range for {n} points"),
            ));
        }
        Ok(self.run(distances, order.iter().copied()))
    }

    fn validate(&self, distances: ArrayView2<'_, f64>) -> Result<usize> {
        let (rows, cols) = distances.dim();
        if rows != cols {
            return Err(Error::invalid(
                "distances",
                format!("must be a square matrix, got {rows}x{cols}"),
            ));
        }
        if rows < 2 {
            return Err(Error::invalid(
                "distances",
                format!("must describe at least 2 points, got {rows}"),
            ));
        }
        if self.eps.is_nan() || self.eps <= 0.0 {
            return Err(Error::invalid(
                "eps",
                format!("must be positive, got {}", self.eps),
            ));
        }
        if self.min_pts == 0 {
            return Err(Error::invalid("min_pts", "must be at least 1"));
        }
        Ok(rows)
    }

    fn run(
        &self,
        distances: ArrayView2<'_, f64>,
        order: impl IntoIterator<Item = usize>,
    ) -> DbscanResult {
        let n = distances.nrows();
        debug!(n, eps = self.eps, min_pts = self.min_pts, "dense dbscan");

        let mut state = DenseState {
            visited: vec![false; n],
            assignments: vec![0; n],
        };
        let mut seeds = Vec::new();
        let mut counts = Vec::new();

        for p in order {
            if state.assignments[p] != 0 || state.visited[p] {
                continue;
            }
            state.visited[p] = true;

            let neighbors = self.region_query(distances, p);
            if neighbors.len() < self.min_pts {
                continue;
            }

            let cluster_id = seeds.len() + 1;
            let count = self.expand_cluster(distances, &mut state, cluster_id, p, neighbors);
            trace!(cluster_id, seed = p, count, "cluster expanded");
            seeds.push(p);
            counts.push(count);
        }

        let result = DbscanResult::new(seeds, state.assignments, counts);
        debug!(
            n_clusters = result.n_clusters(),
            n_noise = result.n_noise(),
            "dense dbscan done"
        );
        result
    }

    /// Indices `q` with `distances[q, p] < eps`, ascending. Always contains `p`
    /// when the diagonal is zero.
    pub(crate) fn region_query(&self, distances: ArrayView2<'_, f64>, p: usize) -> Vec<usize> {
        distances
            .column(p)
            .iter()
            .enumerate()
            .filter(|&(_, &d)| d < self.eps)
            .map(|(q, _)| q)
            .collect()
    }

    /// Grow cluster `cluster_id` from seed `p`. Returns the cluster size.
    fn expand_cluster(
        &self,
        distances: ArrayView2<'_, f64>,
        state: &mut DenseState,
        cluster_id: usize,
        p: usize,
        neighbors: Vec<usize>,
    ) -> usize {
        state.assignments[p] = cluster_id;
        let mut count = 1;

        // Duplicates are allowed; the visited and assignment checks absorb them.
        let mut queue = VecDeque::from(neighbors);
        while let Some(q) = queue.pop_front() {
            if !state.visited[q] {
                state.visited[q] = true;
                let q_neighbors = self.region_query(distances, q);
                if q_neighbors.len() > self.min_pts {
                    queue.extend(
                        q_neighbors
                            .into_iter()
                            .filter(|&x| state.assignments[x] == 0),
                    );
                }
            }
            if state.assignments[q] == 0 {
                state.assignments[q] = cluster_id;
                count += 1;
            }
        }
        count
    }
}

impl Default for DenseDbscan {
    fn default() -> Self {
        Self::new(0.5, 5)
    }
}

/// Run dense-matrix DBSCAN on `distances` with radius `eps` and seed
/// threshold `min_pts`.
///
/// ```rust
/// use dbclust::cluster::dbscan;
/// use ndarray::array;
///
/// let d = array![
///     [0.0, 1.0, 9.0],
///     [1.0, 0.0, 9.0],
///     [9.0, 9.0, 0.0],
/// ];
/// let result = dbscan(d.view(), 1.5, 2).unwrap();
/// assert_eq!(result.assignments(), &[1, 1, 0]);
/// ```
pub fn dbscan(distances: ArrayView2<'_, f64>, eps: f64, min_pts: usize) -> Result<DbscanResult> {
    DenseDbscan::new(eps, min_pts).fit(distances)
}

impl Clustering for DenseDbscan {
    /// Euclidean pairwise distances are computed from `data` first.
    fn fit_predict(&self, data: &[Vec<f64>]) -> Result<Vec<usize>> {
        let points = rows_to_columns(data)?;
        let distances = pairwise_distances(points.view(), Metric::Euclidean);
        let result = self.fit(distances.view())?;
        Ok(result
            .labels()
            .into_iter()
            .map(|l| l.unwrap_or(NOISE))
            .collect())
    }

    fn n_clusters(&self) -> usize {
        0
    }
}

impl DbscanExt for DenseDbscan {}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array2};

    fn line_distances(xs: &[f64]) -> Array2<f64> {
        Array2::from_shape_fn((xs.len(), xs.len()), |(i, j)| (xs[i] - xs[j]).abs())
    }

    #[test]
    fn test_line_with_outlier() {
        let d = line_distances(&[0.0, 1.0, 2.0, 10.0]);
        let result = dbscan(d.view(), 1.5, 2).unwrap();

        assert_eq!(result.seeds(), &[0]);
        assert_eq!(result.counts(), &[3]);
        assert_eq!(result.assignments(), &[1, 1, 1, 0]);
    }

    #[test]
    fn test_far_apart_points() {
        let mut d = Array2::from_elem((5, 5), 100.0);
        d.diag_mut().fill(0.0);

        // Only the point itself is within eps, so min_pts = 2 leaves everything noise.
        let result = dbscan(d.view(), 1.0, 2).unwrap();
        assert_eq!(result.n_clusters(), 0);
        assert!(result.assignments().iter().all(|&a| a == 0));

        // min_pts = 1 turns every point into its own singleton cluster.
        let result = dbscan(d.view(), 1.0, 1).unwrap();
        assert_eq!(result.seeds(), &[0, 1, 2, 3, 4]);
        assert_eq!(result.counts(), &[1, 1, 1, 1, 1]);
        assert_eq!(result.assignments(), &[1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_identical_points_one_cluster() {
        let n = 6;
        let d = Array2::<f64>::zeros((n, n));
        for min_pts in 1..=n {
            let result = dbscan(d.view(), 0.5, min_pts).unwrap();
            assert_eq!(result.n_clusters(), 1, "min_pts={min_pts}");
            assert_eq!(result.counts(), &[n]);
            assert!(result.assignments().iter().all(|&a| a == 1));
        }
    }

    #[test]
    fn test_expansion_threshold_is_strict() {
        // Chain 0 - 1 - 2 - 3 with unit spacing. Every interior point has
        // exactly 3 neighbors (itself and two sides).
        let d = line_distances(&[0.0, 1.0, 2.0, 3.0]);

        // Seed 1 qualifies (3 >= 3), but point 2 has only 3 neighbors, so the
        // cluster does not continue through it to point 3. Point 3 is then too
        // sparse to seed on its own.
        let result = DenseDbscan::new(1.5, 3)
            .fit_with_order(d.view(), &[1, 0, 2, 3])
            .unwrap();
        assert_eq!(result.seeds(), &[1]);
        assert_eq!(result.assignments(), &[1, 1, 1, 0]);
        assert_eq!(result.counts(), &[3]);
    }

    #[test]
    fn test_visit_order_changes_seeds() {
        let d = line_distances(&[0.0, 1.0, 2.0, 10.0, 11.0]);
        let dbscan = DenseDbscan::new(1.5, 2);

        let forward = dbscan.fit(d.view()).unwrap();
        assert_eq!(forward.seeds(), &[0, 3]);

        let backward = dbscan.fit_with_order(d.view(), &[4, 3, 2, 1, 0]).unwrap();
        assert_eq!(backward.seeds(), &[4, 2]);
        assert_eq!(backward.assignments(), &[2, 2, 2, 1, 1]);
        assert_eq!(backward.counts(), &[2, 3]);
    }

    #[test]
    fn test_growing_eps_can_turn_member_into_noise() {
        let d = line_distances(&[10.0, 4.0, 0.0, 7.0]);

        // eps 4: 7 has 3 neighbors (4, 7, 10 at distance 3) and pulls 10 in.
        let result = dbscan(d.view(), 4.0, 3).unwrap();
        assert_eq!(result.assignments(), &[1, 1, 0, 1]);

        // eps 6: 10 is visited first and fails as a seed (only 7 and itself).
        // The cluster later reaches 7, which has exactly 3 neighbors, so it
        // never re-enqueues 10.
        let result = dbscan(d.view(), 6.0, 3).unwrap();
        assert_eq!(result.assignments(), &[0, 1, 1, 1]);
    }

    #[test]
    fn test_growing_eps_can_shrink_a_cluster() {
        let d = line_distances(&[3.0, 7.0, 1.0, 10.0, 12.0]);

        let result = dbscan(d.view(), 4.0, 3).unwrap();
        assert_eq!(result.assignments(), &[0, 1, 0, 1, 1]);
        assert_eq!(result.counts(), &[3]);

        // 3 and 1 now form their own cluster and claim 7 first.
        let result = dbscan(d.view(), 5.0, 3).unwrap();
        assert_eq!(result.assignments(), &[1, 1, 1, 2, 2]);
        assert_eq!(result.counts(), &[3, 2]);
    }

    #[test]
    fn test_region_query_idempotent() {
        let d = line_distances(&[0.0, 0.4, 0.8, 5.0]);
        let dbscan = DenseDbscan::new(0.5, 2);
        let first = dbscan.region_query(d.view(), 1);
        let second = dbscan.region_query(d.view(), 1);
        assert_eq!(first, vec![0, 1, 2]);
        assert_eq!(first, second);
    }

    #[test]
    fn test_region_query_exclusive() {
        let d = line_distances(&[0.0, 1.0]);
        let dbscan = DenseDbscan::new(1.0, 1);
        assert_eq!(dbscan.region_query(d.view(), 0), vec![0]);
    }

    #[test]
    fn test_invalid_params() {
        let d = Array2::<f64>::zeros((3, 3));

        assert!(dbscan(d.view(), 0.0, 1).is_err());
        assert!(dbscan(d.view(), -1.0, 1).is_err());
        assert!(dbscan(d.view(), f64::NAN, 1).is_err());
        assert!(dbscan(d.view(), 1.0, 0).is_err());

        let not_square = Array2::<f64>::zeros((3, 4));
        assert!(dbscan(not_square.view(), 1.0, 1).is_err());

        let too_small = array![[0.0]];
        assert!(dbscan(too_small.view(), 1.0, 1).is_err());

        let err = DenseDbscan::new(1.0, 1)
            .fit_with_order(d.view(), &[0, 3])
            .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument { name: "order", .. }));
    }

    #[test]
    fn test_fit_predict_rows() {
        let data = vec![
            vec![0.0, 0.0],
            vec![0.1, 0.0],
            vec![0.0, 0.1],
            vec![100.0, 100.0],
            vec![5.0, 5.0],
            vec![5.1, 5.0],
            vec![5.0, 5.1],
        ];

        let dbscan = DenseDbscan::new(0.3, 3);
        let labels = dbscan.fit_predict(&data).unwrap();
        assert_eq!(labels, vec![0, 0, 0, NOISE, 1, 1, 1]);

        let labels = dbscan.fit_predict_with_noise(&data).unwrap();
        assert!(labels[3].is_none());
        assert_eq!(labels[0], Some(0));
    }
}

//! DBSCAN over coordinates, with neighbor queries served by a spatial index.
//!
//! This variant scales to large point sets: each neighborhood query goes
//! through a [`SpatialIndex`] (a [`KdTree`] by default) instead of a full
//! scan, and results come back as [`Cluster`]s that separate core members
//! from boundary members.
//!
//! # Cluster growth
//!
//! Points are tried as seeds in index order, skipping any already visited by
//! an earlier attempt. One attempt runs a breadth-first expansion:
//!
//! 1. Pop `current` from the queue; skip it if it was already visited.
//! 2. Mark it visited and query every point within `radius` (itself included).
//! 3. Every returned point becomes a member of the attempt.
//! 4. If there are at most `min_neighbors` of them, `current` is a boundary
//!    point and expansion stops there.
//! 5. Otherwise `current` is core, and every unvisited neighbor is queued.
//!
//! The queue may hold the same point more than once; the visited check in
//! step 1 makes later copies no-ops.
//!
//! An attempt whose membership reaches `min_cluster_size` becomes a
//! [`Cluster`]. Smaller attempts are dropped, leaving their points visited
//! but in no cluster.
//!
//! Membership in step 3 is unconditional, boundary points included, so a
//! point near the edge of one cluster can also appear in the boundary list of
//! a neighboring cluster, even one where it is core. A point is core in at
//! most one cluster, since it is only expanded once.

use std::collections::VecDeque;

use ndarray::ArrayView2;
use tracing::{debug, trace};

use super::result::{clusters_to_labels, Cluster};
use super::traits::{Clustering, DbscanExt, NOISE};
use super::util::rows_to_columns;
use crate::error::{Error, Result};
use crate::spatial::{KdTree, Metric, SpatialIndex};

/// Default number of points per k-d tree leaf.
pub const DEFAULT_LEAF_SIZE: usize = 20;

/// DBSCAN over a `D x N` point array using a spatial index.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IndexedDbscan {
    /// Neighborhood radius (inclusive).
    radius: f64,
    /// A point is core when its neighborhood holds more than this many points.
    min_neighbors: usize,
    /// Smallest membership an attempt needs to be reported.
    min_cluster_size: usize,
    /// Leaf size passed to the spatial index.
    leaf_size: usize,
    metric: Metric,
}

impl IndexedDbscan {
    /// Create a new indexed DBSCAN clusterer with neighborhood `radius`.
    ///
    /// Defaults: `min_neighbors = 1`, `min_cluster_size = 1`,
    /// `leaf_size = 20`, Euclidean metric.
    pub fn new(radius: f64) -> Self {
        Self {
            radius,
            min_neighbors: 1,
            min_cluster_size: 1,
            leaf_size: DEFAULT_LEAF_SIZE,
            metric: Metric::Euclidean,
        }
    }

    /// Set the neighborhood radius.
    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = radius;
        self
    }

    /// Set the neighbor count a point must exceed to be core.
    pub fn with_min_neighbors(mut self, min_neighbors: usize) -> Self {
        self.min_neighbors = min_neighbors;
        self
    }

    /// Set the smallest cluster size that is reported.
    pub fn with_min_cluster_size(mut self, min_cluster_size: usize) -> Self {
        self.min_cluster_size = min_cluster_size;
        self
    }

    /// Set the spatial index leaf size.
    pub fn with_leaf_size(mut self, leaf_size: usize) -> Self {
        self.leaf_size = leaf_size;
        self
    }

    /// Set the distance metric.
    pub fn with_metric(mut self, metric: Metric) -> Self {
        self.metric = metric;
        self
    }

    /// Configured radius.
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Configured core threshold.
    pub fn min_neighbors(&self) -> usize {
        self.min_neighbors
    }

    /// Configured minimum cluster size.
    pub fn min_cluster_size(&self) -> usize {
        self.min_cluster_size
    }

    /// Cluster the columns of `points` using a [`KdTree`].
    pub fn fit(&self, points: ArrayView2<'_, f64>) -> Result<Vec<Cluster>> {
        self.fit_with_index::<KdTree>(points)
    }

    /// Cluster the columns of `points` using index type `I`.
    pub fn fit_with_index<I: SpatialIndex>(
        &self,
        points: ArrayView2<'_, f64>,
    ) -> Result<Vec<Cluster>> {
        self.validate(points)?;
        let index = I::build(points, self.leaf_size, self.metric)?;
        Ok(self.run(&index, points))
    }

    fn validate(&self, points: ArrayView2<'_, f64>) -> Result<()> {
        let (n_dims, n_points) = points.dim();
        if n_dims == 0 {
            return Err(Error::invalid("points", "must have at least one dimension"));
        }
        if n_points <= n_dims {
            return Err(Error::invalid(
                "points",
                format!(
                    "expected a D x N array with more points (columns) than dimensions (rows), got {n_dims}x{n_points}"
                ),
            ));
        }
        if points.iter().any(|v| !v.is_finite()) {
            return Err(Error::invalid("points", "coordinates must be finite"));
        }
        if self.radius.is_nan() || self.radius <= 0.0 {
            return Err(Error::invalid(
                "radius",
                format!("must be positive, got {}", self.radius),
            ));
        }
        if self.min_neighbors == 0 {
            return Err(Error::invalid("min_neighbors", "must be at least 1"));
        }
        if self.min_cluster_size == 0 {
            return Err(Error::invalid("min_cluster_size", "must be at least 1"));
        }
        if self.leaf_size == 0 {
            return Err(Error::invalid("leaf_size", "must be at least 1"));
        }
        Ok(())
    }

    fn run<I: SpatialIndex>(&self, index: &I, points: ArrayView2<'_, f64>) -> Vec<Cluster> {
        let n = points.ncols();
        debug!(
            n,
            radius = self.radius,
            min_neighbors = self.min_neighbors,
            min_cluster_size = self.min_cluster_size,
            "indexed dbscan"
        );

        let mut grower = ClusterGrower::new(index, points.reborrow(), self.radius, self.min_neighbors);
        let mut clusters = Vec::new();
        let mut discarded = 0usize;

        for seed in 0..n {
            if grower.is_visited(seed) {
                continue;
            }
            let size = grower.grow(seed);
            if size >= self.min_cluster_size {
                trace!(seed, size, "cluster accepted");
                clusters.push(grower.snapshot());
            } else {
                trace!(seed, size, "cluster discarded");
                discarded += 1;
            }
        }

        debug!(n_clusters = clusters.len(), discarded, "indexed dbscan done");
        clusters
    }
}

impl Default for IndexedDbscan {
    fn default() -> Self {
        Self::new(0.5)
    }
}

/// Breadth-first growth of one cluster attempt at a time.
///
/// Owns all mutable state of a run. `visited` persists across attempts; the
/// membership masks are cleared at the start of each attempt.
struct ClusterGrower<'a, I> {
    index: &'a I,
    points: ArrayView2<'a, f64>,
    radius: f64,
    min_neighbors: usize,
    visited: Vec<bool>,
    members: Vec<bool>,
    core: Vec<bool>,
    /// Indices set in `members` during the current attempt.
    touched: Vec<usize>,
    queue: VecDeque<usize>,
}

impl<'a, I: SpatialIndex> ClusterGrower<'a, I> {
    fn new(index: &'a I, points: ArrayView2<'a, f64>, radius: f64, min_neighbors: usize) -> Self {
        let n = points.ncols();
        Self {
            index,
            points,
            radius,
            min_neighbors,
            visited: vec![false; n],
            members: vec![false; n],
            core: vec![false; n],
            touched: Vec::new(),
            queue: VecDeque::new(),
        }
    }

    fn is_visited(&self, idx: usize) -> bool {
        self.visited[idx]
    }

    fn mark_member(&mut self, idx: usize) {
        if !self.members[idx] {
            self.members[idx] = true;
            self.touched.push(idx);
        }
    }

    /// Clear the masks of the previous attempt. Only touched entries can be set.
    fn reset(&mut self) {
        for &idx in &self.touched {
            self.members[idx] = false;
            self.core[idx] = false;
        }
        self.touched.clear();
    }

    /// Run one attempt from `seed` and return its membership size.
    fn grow(&mut self, seed: usize) -> usize {
        self.reset();
        self.mark_member(seed);
        self.queue.push_back(seed);

        while let Some(current) = self.queue.pop_front() {
            if self.visited[current] {
                continue;
            }
            self.visited[current] = true;

            let neighbors = self
                .index
                .query_radius(self.points.column(current), self.radius);
            for &x in &neighbors {
                self.mark_member(x);
            }

            if neighbors.len() <= self.min_neighbors {
                continue;
            }

            self.core[current] = true;
            self.queue
                .extend(neighbors.into_iter().filter(|&x| !self.visited[x]));
        }

        self.touched.len()
    }

    /// Snapshot the current attempt as a [`Cluster`].
    fn snapshot(&mut self) -> Cluster {
        self.touched.sort_unstable();
        let (core, boundary): (Vec<usize>, Vec<usize>) =
            self.touched.iter().copied().partition(|&idx| self.core[idx]);
        Cluster::new(core, boundary)
    }
}

/// Run indexed DBSCAN over the columns of `points`.
///
/// ```rust
/// use dbclust::cluster::dbscan_points;
/// use ndarray::array;
///
/// // One dimension, four points: 0, 1, 2 and 10.
/// let points = array![[0.0, 1.0, 2.0, 10.0]];
/// let clusters = dbscan_points(points.view(), 1.5, 1, 2).unwrap();
/// assert_eq!(clusters.len(), 1);
/// assert_eq!(clusters[0].core_indices(), &[0, 1, 2]);
/// ```
pub fn dbscan_points(
    points: ArrayView2<'_, f64>,
    radius: f64,
    min_neighbors: usize,
    min_cluster_size: usize,
) -> Result<Vec<Cluster>> {
    IndexedDbscan::new(radius)
        .with_min_neighbors(min_neighbors)
        .with_min_cluster_size(min_cluster_size)
        .fit(points)
}

impl Clustering for IndexedDbscan {
    /// Requires more rows (points) than columns (dimensions). A boundary
    /// point shared by several clusters gets the lowest label.
    fn fit_predict(&self, data: &[Vec<f64>]) -> Result<Vec<usize>> {
        let points = rows_to_columns(data)?;
        let clusters = self.fit(points.view())?;
        Ok(clusters_to_labels(data.len(), &clusters)
            .into_iter()
            .map(|l| l.unwrap_or(NOISE))
            .collect())
    }

    fn n_clusters(&self) -> usize {
        0
    }
}

impl DbscanExt for IndexedDbscan {}

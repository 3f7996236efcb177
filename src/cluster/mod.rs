//! Density-based clustering.
//!
//! DBSCAN groups points that lie in dense regions and separates them from
//! points in sparse regions (noise). Clusters can have arbitrary shape, and
//! their number is not fixed in advance.
//!
//! ## Two variants
//!
//! ### Dense matrix
//!
//! [`DenseDbscan`] / [`dbscan`] take a precomputed `N x N` distance matrix.
//! Neighbors are points at distance strictly below `eps`. Each region query
//! scans one matrix column, so a run costs O(n²). The result is a flat
//! [`DbscanResult`]: a cluster id per point (0 for noise), plus the seed and
//! size of every cluster.
//!
//! ### Indexed
//!
//! [`IndexedDbscan`] / [`dbscan_points`] take a `D x N` coordinate array and
//! answer neighbor queries (distance `<= radius`) through a
//! [`SpatialIndex`](crate::spatial::SpatialIndex). The result is a list of
//! [`Cluster`]s, each split into core and boundary members, filtered by a
//! minimum cluster size.
//!
//! The two variants use slightly different density thresholds and result
//! shapes; see the module docs of each for the exact rules.
//!
//! ## Usage
//!
//! ```rust
//! use dbclust::cluster::{dbscan, dbscan_points, Clustering, DenseDbscan};
//! use dbclust::spatial::{pairwise_distances, Metric};
//! use ndarray::array;
//!
//! // Four points on a line: 0, 1, 2 and 10.
//! let points = array![[0.0, 1.0, 2.0, 10.0]];
//!
//! let distances = pairwise_distances(points.view(), Metric::Euclidean);
//! let result = dbscan(distances.view(), 1.5, 2).unwrap();
//! assert_eq!(result.assignments(), &[1, 1, 1, 0]);
//!
//! let clusters = dbscan_points(points.view(), 1.5, 1, 2).unwrap();
//! assert_eq!(clusters.len(), 1);
//! assert_eq!(clusters[0].size(), 3);
//!
//! // Row-per-point convenience interface.
//! let data = vec![vec![0.0], vec![1.0], vec![2.0], vec![10.0]];
//! let labels = DenseDbscan::new(1.5, 2).fit_predict(&data).unwrap();
//! assert_eq!(labels[0], labels[2]);
//! ```

mod dense;
mod indexed;
mod result;
mod traits;
mod util;

pub use dense::{dbscan, DenseDbscan};
pub use indexed::{dbscan_points, IndexedDbscan, DEFAULT_LEAF_SIZE};
pub use result::{clusters_to_labels, Cluster, DbscanResult};
pub use traits::{Clustering, DbscanExt, NOISE};

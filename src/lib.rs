//! Density-based clustering.
//!
//! `dbclust` implements DBSCAN in two flavors:
//!
//! - over a precomputed pairwise distance matrix ([`cluster::dbscan`]), with a
//!   flat label-per-point result;
//! - over raw coordinates with a spatial index ([`cluster::dbscan_points`]),
//!   reporting clusters split into core and boundary points.
//!
//! Neighbor queries for the second flavor go through [`spatial::SpatialIndex`];
//! a k-d tree is provided.

#![forbid(unsafe_code)]

pub mod cluster;
pub mod error;
pub mod spatial;

pub use cluster::{
    clusters_to_labels, dbscan, dbscan_points, Cluster, Clustering, DbscanExt, DbscanResult,
    DenseDbscan, IndexedDbscan, NOISE,
};
pub use error::{Error, Result};
pub use spatial::{pairwise_distances, BruteForce, KdTree, Metric, SpatialIndex};

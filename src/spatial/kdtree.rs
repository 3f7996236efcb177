//! k-d tree for fixed-radius neighbor queries.
//!
//! # Layout
//!
//! The tree is stored as a flat arena of nodes plus one permutation of point
//! indices. Every leaf owns a contiguous range `[start, end)` of that
//! permutation; internal nodes record a split dimension and value.
//!
//! # Construction
//!
//! At each node the dimension with the widest spread is chosen and the points
//! are partitioned around their median along it (`select_nth_unstable`), so
//! the left child holds coordinates `<= value` and the right child `>= value`.
//! Splitting stops once a node holds at most `leaf_size` points.
//!
//! # Queries
//!
//! A radius query walks the tree with an explicit stack and skips any child
//! whose half-space lies farther than `radius` from the query along the split
//! axis. For the supported metrics the per-axis gap is a lower bound on the
//! true distance, so pruning never drops a match.

use ndarray::{Array2, ArrayView1, ArrayView2};
use tracing::debug;

use super::{check_build_args, Metric, SpatialIndex};
use crate::error::Result;

#[derive(Debug, Clone, Copy)]
enum Node {
    Leaf {
        start: usize,
        end: usize,
    },
    Split {
        dim: usize,
        value: f64,
        left: usize,
        right: usize,
    },
}

/// Median-split k-d tree over a fixed point set.
#[derive(Debug, Clone)]
pub struct KdTree {
    /// Points stored row-wise (`N x D`) so each point is contiguous.
    data: Array2<f64>,
    /// Permutation of `0..N`; leaves index into it.
    indices: Vec<usize>,
    /// Node arena; the root is node 0 when the tree is non-empty.
    nodes: Vec<Node>,
    leaf_size: usize,
    metric: Metric,
}

impl KdTree {
    /// Maximum number of points held by a leaf.
    pub fn leaf_size(&self) -> usize {
        self.leaf_size
    }

    /// Metric used to compare points.
    pub fn metric(&self) -> Metric {
        self.metric
    }

    /// Number of dimensions of the indexed points.
    pub fn n_dims(&self) -> usize {
        self.data.ncols()
    }

    /// Total node count (internal nodes plus leaves).
    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }

    fn build_node(
        data: &Array2<f64>,
        indices: &mut [usize],
        start: usize,
        end: usize,
        leaf_size: usize,
        nodes: &mut Vec<Node>,
    ) -> usize {
        let id = nodes.len();
        let len = end - start;
        if len <= leaf_size {
            nodes.push(Node::Leaf { start, end });
            return id;
        }

        let slice = &mut indices[start..end];
        let dim = widest_dim(data, slice);
        let mid = len / 2;
        slice.select_nth_unstable_by(mid, |&a, &b| data[[a, dim]].total_cmp(&data[[b, dim]]));
        let value = data[[slice[mid], dim]];

        // Children are patched in once they exist.
        nodes.push(Node::Split {
            dim,
            value,
            left: usize::MAX,
            right: usize::MAX,
        });

        // `len > leaf_size >= 1` so both halves are non-empty.
        let left_child = Self::build_node(data, indices, start, start + mid, leaf_size, nodes);
        let right_child = Self::build_node(data, indices, start + mid, end, leaf_size, nodes);

        if let Node::Split { left, right, .. } = &mut nodes[id] {
            *left = left_child;
            *right = right_child;
        }
        id
    }
}

/// Dimension with the largest coordinate range among `subset`.
fn widest_dim(data: &Array2<f64>, subset: &[usize]) -> usize {
    let mut best_dim = 0;
    let mut best_spread = f64::NEG_INFINITY;
    for dim in 0..data.ncols() {
        let mut lo = f64::INFINITY;
        let mut hi = f64::NEG_INFINITY;
        for &idx in subset {
            let v = data[[idx, dim]];
            lo = lo.min(v);
            hi = hi.max(v);
        }
        if hi - lo > best_spread {
            best_spread = hi - lo;
            best_dim = dim;
        }
    }
    best_dim
}

impl SpatialIndex for KdTree {
    fn build(points: ArrayView2<'_, f64>, leaf_size: usize, metric: Metric) -> Result<Self> {
        check_build_args(points, leaf_size)?;

        let data = points.t().as_standard_layout().into_owned();
        let n = data.nrows();
        let mut indices: Vec<usize> = (0..n).collect();
        let mut nodes = Vec::new();
        if n > 0 {
            Self::build_node(&data, &mut indices, 0, n, leaf_size, &mut nodes);
        }

        debug!(
            n_points = n,
            n_dims = data.ncols(),
            n_nodes = nodes.len(),
            leaf_size,
            "built k-d tree"
        );

        Ok(Self {
            data,
            indices,
            nodes,
            leaf_size,
            metric,
        })
    }

    fn query_radius(&self, point: ArrayView1<'_, f64>, radius: f64) -> Vec<usize> {
        debug_assert_eq!(point.len(), self.n_dims());
        let mut out = Vec::new();
        if self.nodes.is_empty() {
            return out;
        }

        // Leaf distances are rounded, so the per-axis bound gets a few ulps of
        // slack; a subtree is only skipped when no point in it can pass the
        // leaf test.
        let reach = radius * (1.0 + 4.0 * f64::EPSILON);
        let mut stack = vec![0usize];
        while let Some(id) = stack.pop() {
            match self.nodes[id] {
                Node::Leaf { start, end } => {
                    for &idx in &self.indices[start..end] {
                        if self.metric.distance(point, self.data.row(idx)) <= radius {
                            out.push(idx);
                        }
                    }
                }
                Node::Split {
                    dim,
                    value,
                    left,
                    right,
                } => {
                    let gap = point[dim] - value;
                    if gap <= reach {
                        stack.push(left);
                    }
                    if -gap <= reach {
                        stack.push(right);
                    }
                }
            }
        }

        out.sort_unstable();
        out
    }

    fn len(&self) -> usize {
        self.data.nrows()
    }
}

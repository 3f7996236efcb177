//! Result types for the two DBSCAN variants.
//!
//! The dense-matrix variant reports a flat label array ([`DbscanResult`]);
//! the indexed variant reports one [`Cluster`] per accepted cluster, split
//! into core and boundary members. The two shapes are kept separate.

/// Output of the dense-matrix DBSCAN variant.
///
/// Cluster ids are `1..=k`; an assignment of `0` means noise.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DbscanResult {
    seeds: Vec<usize>,
    assignments: Vec<usize>,
    counts: Vec<usize>,
}

impl DbscanResult {
    pub(crate) fn new(seeds: Vec<usize>, assignments: Vec<usize>, counts: Vec<usize>) -> Self {
        debug_assert_eq!(seeds.len(), counts.len());
        debug_assert_eq!(
            counts.iter().sum::<usize>(),
            assignments.iter().filter(|&&a| a != 0).count()
        );
        Self {
            seeds,
            assignments,
            counts,
        }
    }

    /// Point index that started each cluster, in cluster-id order.
    pub fn seeds(&self) -> &[usize] {
        &self.seeds
    }

    /// Cluster id of every point (`0` for noise).
    pub fn assignments(&self) -> &[usize] {
        &self.assignments
    }

    /// Size of each cluster, parallel to [`seeds`](Self::seeds).
    pub fn counts(&self) -> &[usize] {
        &self.counts
    }

    /// Number of clusters found.
    pub fn n_clusters(&self) -> usize {
        self.seeds.len()
    }

    /// Number of points that ended up in no cluster.
    pub fn n_noise(&self) -> usize {
        self.assignments.iter().filter(|&&a| a == 0).count()
    }

    /// Zero-based cluster labels with noise as `None`.
    pub fn labels(&self) -> Vec<Option<usize>> {
        self.assignments
            .iter()
            .map(|&a| if a == 0 { None } else { Some(a - 1) })
            .collect()
    }
}

/// One cluster found by the indexed DBSCAN variant.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cluster {
    size: usize,
    core_indices: Vec<usize>,
    boundary_indices: Vec<usize>,
}

impl Cluster {
    /// Assemble a cluster from disjoint, ascending core and boundary lists.
    pub(crate) fn new(core_indices: Vec<usize>, boundary_indices: Vec<usize>) -> Self {
        debug_assert!(core_indices.windows(2).all(|w| w[0] < w[1]));
        debug_assert!(boundary_indices.windows(2).all(|w| w[0] < w[1]));
        Self {
            size: core_indices.len() + boundary_indices.len(),
            core_indices,
            boundary_indices,
        }
    }

    /// Total member count (core plus boundary).
    pub fn size(&self) -> usize {
        self.size
    }

    /// Members that had enough neighbors to be expanded from.
    pub fn core_indices(&self) -> &[usize] {
        &self.core_indices
    }

    /// Members reached from a core point without being core themselves.
    pub fn boundary_indices(&self) -> &[usize] {
        &self.boundary_indices
    }

    /// All members in ascending index order.
    pub fn members(&self) -> Vec<usize> {
        let mut all: Vec<usize> = self
            .core_indices
            .iter()
            .chain(&self.boundary_indices)
            .copied()
            .collect();
        all.sort_unstable();
        all
    }

    /// Whether `idx` is a member (core or boundary).
    pub fn contains(&self, idx: usize) -> bool {
        self.core_indices.binary_search(&idx).is_ok()
            || self.boundary_indices.binary_search(&idx).is_ok()
    }
}

/// Flatten a cluster list into one label per point (`None` for noise).
///
/// A boundary point listed by several clusters takes the label of the first
/// one.
pub fn clusters_to_labels(n_points: usize, clusters: &[Cluster]) -> Vec<Option<usize>> {
    let mut labels = vec![None; n_points];
    for (label, cluster) in clusters.iter().enumerate() {
        for &idx in cluster.core_indices.iter().chain(&cluster.boundary_indices) {
            if idx < n_points && labels[idx].is_none() {
                labels[idx] = Some(label);
            }
        }
    }
    labels
}

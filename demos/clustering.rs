//! Dense-matrix and indexed DBSCAN on a simple 2D dataset.

use dbclust::cluster::{dbscan, dbscan_points, Clustering, DenseDbscan, NOISE};
use dbclust::spatial::{pairwise_distances, Metric};
use ndarray::Array2;

fn main() {
    // Two well-separated clusters in 2D plus one outlier.
    let rows: Vec<Vec<f64>> = vec![
        // Cluster A (near origin)
        vec![0.0, 0.0],
        vec![0.1, 0.2],
        vec![0.2, 0.1],
        vec![-0.1, 0.1],
        // Cluster B (near (5, 5))
        vec![5.0, 5.0],
        vec![5.1, 4.9],
        vec![4.9, 5.1],
        vec![5.2, 5.2],
        // Outlier
        vec![10.0, -10.0],
    ];
    let points = Array2::from_shape_fn((2, rows.len()), |(d, i)| rows[i][d]);

    // --- Dense matrix (eps=1.0, min_pts=2) ---
    let distances = pairwise_distances(points.view(), Metric::Euclidean);
    let result = dbscan(distances.view(), 1.0, 2).unwrap();
    println!("=== Dense DBSCAN (eps=1.0, min_pts=2) ===");
    println!("  seeds:  {:?}", result.seeds());
    println!("  counts: {:?}", result.counts());
    for (i, a) in result.assignments().iter().enumerate() {
        let tag = if *a == 0 {
            "NOISE".to_string()
        } else {
            format!("cluster {}", a)
        };
        println!("  point {:2} ({:5.1}, {:5.1}) => {}", i, rows[i][0], rows[i][1], tag);
    }

    // --- Indexed (radius=1.0, min_neighbors=2, min_cluster_size=3) ---
    let clusters = dbscan_points(points.view(), 1.0, 2, 3).unwrap();
    println!("\n=== Indexed DBSCAN (radius=1.0, min_neighbors=2, min_cluster_size=3) ===");
    for (i, cluster) in clusters.iter().enumerate() {
        println!(
            "  cluster {}: size {} core {:?} boundary {:?}",
            i,
            cluster.size(),
            cluster.core_indices(),
            cluster.boundary_indices()
        );
    }

    // --- Row interface ---
    let labels = DenseDbscan::new(1.0, 2).fit_predict(&rows).unwrap();
    println!("\n=== fit_predict ===");
    for (i, label) in labels.iter().enumerate() {
        let tag = if *label == NOISE {
            "NOISE".to_string()
        } else {
            format!("cluster {}", label)
        };
        println!("  point {:2} => {}", i, tag);
    }
}

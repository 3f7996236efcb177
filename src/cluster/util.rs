use ndarray::Array2;

use crate::error::{Error, Result};

/// Pack row-per-point data into a `D x N` array (one column per point).
pub(crate) fn rows_to_columns(data: &[Vec<f64>]) -> Result<Array2<f64>> {
    let n = data.len();
    if n == 0 {
        return Err(Error::invalid("data", "must contain at least one point"));
    }
    let d = data[0].len();
    if let Some((i, row)) = data.iter().enumerate().find(|(_, row)| row.len() != d) {
        return Err(Error::invalid(
            "data",
            format!("row {i} has {} dimensions, expected {d}", row.len()),
        ));
    }
    Ok(Array2::from_shape_fn((d, n), |(dim, idx)| data[idx][dim]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_to_columns() {
        let data = vec![vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]];
        let m = rows_to_columns(&data).unwrap();
        assert_eq!(m.dim(), (2, 3));
        assert_eq!(m.column(1).to_vec(), vec![3.0, 4.0]);
    }

    #[test]
    fn test_rows_to_columns_rejects_bad_shapes() {
        assert!(rows_to_columns(&[]).is_err());
        assert!(rows_to_columns(&[vec![1.0, 2.0], vec![3.0]]).is_err());
    }
}

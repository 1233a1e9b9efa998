use itertools::izip;

use super::{labels::Labels, LabeledMatrix};
use crate::{
    error::{LabeledError, Result},
    toolkit::array::AFloat,
};

fn describe_mismatch(what: &str, left: &Labels, right: &Labels) -> String {
    if left.len() != right.len() {
        return format!("{what} have {} vs {} entries", left.len(), right.len());
    }
    match izip!(left, right).position(|(l, r)| l != r) {
        Some(i) => format!(
            "{what} differ at position {i} ({:?} vs {:?})",
            left.get(i).unwrap_or_default(),
            right.get(i).unwrap_or_default()
        ),
        None => format!("{what} are identical"),
    }
}

impl<T: AFloat> LabeledMatrix<T> {
    fn check_aligned(&self, other: &Self) -> Result<()> {
        if self.rows != other.rows {
            return Err(LabeledError::Alignment(describe_mismatch(
                "row labels",
                &self.rows,
                &other.rows,
            )));
        }
        if self.cols != other.cols {
            return Err(LabeledError::Alignment(describe_mismatch(
                "column labels",
                &self.cols,
                &other.cols,
            )));
        }
        Ok(())
    }

    /// Elementwise sum. Both operands must carry the same row and column labels,
    /// in the same order.
    pub fn add(&self, other: &Self) -> Result<Self> {
        self.check_aligned(other)?;
        Ok(Self::from_parts(
            &self.data + &other.data,
            self.rows.clone(),
            self.cols.clone(),
        ))
    }

    /// Elementwise product, aligned the same way as [`LabeledMatrix::add`].
    pub fn multiply(&self, other: &Self) -> Result<Self> {
        self.check_aligned(other)?;
        Ok(Self::from_parts(
            &self.data * &other.data,
            self.rows.clone(),
            self.cols.clone(),
        ))
    }

    /// Matrix product. The column labels of `self` must equal the row labels of
    /// `other`; the result takes its rows from `self` and its columns from `other`.
    pub fn matmul(&self, other: &Self) -> Result<Self> {
        if self.cols != other.rows {
            return Err(LabeledError::Alignment(describe_mismatch(
                "column labels of the left operand and row labels of the right operand",
                &self.cols,
                &other.rows,
            )));
        }
        Ok(Self::from_parts(
            self.data.dot(&other.data),
            self.rows.clone(),
            other.cols.clone(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::meta::tests::strings;
    use ndarray::array;

    fn labeled(data: &[Vec<i32>], rows: &[&str], cols: &[&str]) -> LabeledMatrix<f64> {
        LabeledMatrix::from_rows(data, Some(strings(rows)), Some(strings(cols))).unwrap()
    }

    #[test]
    fn test_arithmetic_operations() {
        let a = labeled(&[vec![1, 2], vec![3, 4]], &["a", "b"], &["x", "y"]);
        let b = labeled(&[vec![2, 3], vec![4, 5]], &["a", "b"], &["x", "y"]);

        let sum = a.add(&b).unwrap();
        assert_eq!(sum.data(), array![[3.0, 5.0], [7.0, 9.0]]);
        assert_eq!(sum.row_labels(), &strings(&["a", "b"])[..]);
        assert_eq!(sum.col_labels(), &strings(&["x", "y"])[..]);

        let product = a.multiply(&b).unwrap();
        assert_eq!(product.data(), array![[2.0, 6.0], [12.0, 20.0]]);
        assert_eq!(product.row_labels(), &strings(&["a", "b"])[..]);
        assert_eq!(product.col_labels(), &strings(&["x", "y"])[..]);
    }

    #[test]
    fn test_misaligned_arithmetic() {
        let a = labeled(&[vec![1, 2], vec![3, 4]], &["a", "b"], &["x", "y"]);
        let other_rows = labeled(&[vec![1, 2], vec![3, 4]], &["a", "c"], &["x", "y"]);
        let other_cols = labeled(&[vec![1, 2], vec![3, 4]], &["a", "b"], &["x", "z"]);
        let reordered = labeled(&[vec![1, 2], vec![3, 4]], &["b", "a"], &["x", "y"]);
        for other in [&other_rows, &other_cols, &reordered] {
            assert!(matches!(a.add(other), Err(LabeledError::Alignment(_))));
            assert!(matches!(a.multiply(other), Err(LabeledError::Alignment(_))));
        }
        // same shape is not enough
        let wider = labeled(&[vec![1, 2, 3]], &["a"], &["x", "y", "z"]);
        assert!(matches!(wider.add(&a), Err(LabeledError::Alignment(_))));
    }

    #[test]
    fn test_matrix_multiplication() {
        let a = labeled(&[vec![1, 2], vec![3, 4]], &["a", "b"], &["x", "y"]);
        let b = labeled(&[vec![5, 6], vec![7, 8]], &["x", "y"], &["i", "j"]);
        let result = a.matmul(&b).unwrap();
        assert_eq!(result.data(), array![[19.0, 22.0], [43.0, 50.0]]);
        assert_eq!(result.row_labels(), &strings(&["a", "b"])[..]);
        assert_eq!(result.col_labels(), &strings(&["i", "j"])[..]);

        let c = labeled(&[vec![1, 2], vec![3, 4]], &["a", "b"], &["k", "l"]);
        assert!(matches!(a.matmul(&c), Err(LabeledError::Alignment(_))));

        let tall = labeled(&[vec![1], vec![2], vec![3]], &["x", "y", "z"], &["only"]);
        let wide = labeled(&[vec![1, 1, 1]], &["r"], &["x", "y", "z"]);
        let dot = wide.matmul(&tall).unwrap();
        assert_eq!(dot.shape(), (1, 1));
        assert_eq!(dot.get(("r", "only")).unwrap(), 6.0);
    }

    #[test]
    fn test_mismatch_description() {
        let left = Labels::new(0, strings(&["a", "b"]), 2).unwrap();
        let right = Labels::new(0, strings(&["a", "c"]), 2).unwrap();
        let message = describe_mismatch("row labels", &left, &right);
        assert!(message.contains("position 1"));
        let shorter = Labels::new(0, strings(&["a"]), 1).unwrap();
        assert!(describe_mismatch("row labels", &left, &shorter).contains("2 vs 1"));
    }
}

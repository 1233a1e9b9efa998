use ndarray::{Array1, ArrayView1, ArrayView2};

use super::{meta::check_axis, LabeledMatrix, LabeledSeries};
use crate::{
    error::Result,
    toolkit::array::{map_axis1, reduce_all, reduce_axis1, AFloat, Reduction, DEFAULT_NUM_THREADS},
};

/// Result of a reduction: a bare scalar when every axis collapsed, a labeled
/// series otherwise.
#[derive(Debug, Clone, PartialEq)]
pub enum Reduced<T: AFloat> {
    Scalar(T),
    Series(LabeledSeries<T>),
}

impl<T: AFloat> Reduced<T> {
    pub fn into_scalar(self) -> Option<T> {
        match self {
            Reduced::Scalar(value) => Some(value),
            Reduced::Series(_) => None,
        }
    }

    pub fn into_series(self) -> Option<LabeledSeries<T>> {
        match self {
            Reduced::Scalar(_) => None,
            Reduced::Series(series) => Some(series),
        }
    }
}

macro_rules! reduction_shortcut {
    ($($name:ident => $op:expr),* $(,)?) => {$(
        pub fn $name(&self, axis: Option<usize>) -> Result<Reduced<T>> {
            self.reduce(axis, $op)
        }
    )*};
}

impl<T: AFloat> LabeledMatrix<T> {
    /// Collapses `axis` (or everything, if `axis` is `None`).
    ///
    /// Collapsing rows (`axis = 0`) leaves one value per column, labeled with the
    /// column labels; collapsing columns (`axis = 1`) leaves one value per row,
    /// labeled with the row labels.
    pub fn reduce(&self, axis: Option<usize>, op: Reduction) -> Result<Reduced<T>> {
        self.reduce_with_threads(axis, op, DEFAULT_NUM_THREADS)
    }

    pub fn reduce_with_threads(
        &self,
        axis: Option<usize>,
        op: Reduction,
        num_threads: usize,
    ) -> Result<Reduced<T>> {
        match axis {
            None => Ok(Reduced::Scalar(reduce_all(self.data.view(), op))),
            Some(axis) => self
                .collapse(axis, |lanes| reduce_axis1(lanes, op, num_threads))
                .map(Reduced::Series),
        }
    }

    /// Collapses `axis` with a custom lane reducer.
    pub fn map_axis<F>(&self, axis: usize, f: F) -> Result<LabeledSeries<T>>
    where
        F: Fn(ArrayView1<T>) -> T + Sync,
    {
        self.collapse(axis, |lanes| map_axis1(lanes, DEFAULT_NUM_THREADS, f))
    }

    reduction_shortcut!(
        sum => Reduction::Sum,
        prod => Reduction::Prod,
        mean => Reduction::Mean,
        min => Reduction::Min,
        max => Reduction::Max,
        var => Reduction::Var,
        std => Reduction::Std,
    );

    // the one place where reductions pick up their labels
    fn collapse(
        &self,
        axis: usize,
        kernel: impl FnOnce(ArrayView2<T>) -> Vec<T>,
    ) -> Result<LabeledSeries<T>> {
        check_axis(axis)?;
        let (lanes, labels) = if axis == 0 {
            (self.data.t(), &self.cols)
        } else {
            (self.data.view(), &self.rows)
        };
        let values = Array1::from(kernel(lanes));
        Ok(LabeledSeries::from_parts(values, labels.clone(), None))
    }
}

use super::{labels::Labels, LabeledMatrix};
use crate::{
    error::{LabeledError, Result},
    toolkit::array::AFloat,
};
use ndarray::{Array2, ArrayView2, ArrayViewMut2};
use num_traits::{cast, NumCast, ToPrimitive};

fn axis_labels(axis: usize, labels: Option<Vec<String>>, len: usize) -> Result<Labels> {
    match labels {
        None => Ok(Labels::default_for(len)),
        Some(labels) => Labels::new(axis, labels, len),
    }
}

pub(crate) fn check_axis(axis: usize) -> Result<()> {
    if axis > 1 {
        return Err(LabeledError::Validation(format!(
            "axis {axis} is out of bounds for a two-dimensional matrix"
        )));
    }
    Ok(())
}

impl<T: AFloat> LabeledMatrix<T> {
    /// Wraps `data`, which must be non-empty on both axes. Axes without labels get
    /// `"0".."n - 1"`.
    pub fn new(
        data: Array2<T>,
        row_labels: Option<Vec<String>>,
        col_labels: Option<Vec<String>>,
    ) -> Result<Self> {
        if data.is_empty() {
            return Err(LabeledError::Validation(format!(
                "payload must be non-empty on both axes, got shape {:?}",
                data.shape()
            )));
        }
        let rows = axis_labels(0, row_labels, data.nrows())?;
        let cols = axis_labels(1, col_labels, data.ncols())?;
        Ok(Self { data, rows, cols })
    }

    /// Builds a matrix from nested rows, converting every value into `T`.
    ///
    /// The payload must be rectangular, emptiness is rejected by [`LabeledMatrix::new`].
    pub fn from_rows<V: Copy + ToPrimitive>(
        rows: &[Vec<V>],
        row_labels: Option<Vec<String>>,
        col_labels: Option<Vec<String>>,
    ) -> Result<Self> {
        let nrows = rows.len();
        let ncols = rows.first().map(Vec::len).unwrap_or(0);
        let mut values: Vec<T> = Vec::with_capacity(nrows * ncols);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != ncols {
                return Err(LabeledError::Validation(format!(
                    "ragged payload: row {i} has {} values while row 0 has {ncols}",
                    row.len()
                )));
            }
            for &value in row {
                let value = <T as NumCast>::from(value).ok_or_else(|| {
                    LabeledError::Validation(format!(
                        "value in row {i} cannot be represented by the element type"
                    ))
                })?;
                values.push(value);
            }
        }
        let data = Array2::from_shape_vec((nrows, ncols), values)
            .map_err(|e| LabeledError::Validation(e.to_string()))?;
        Self::new(data, row_labels, col_labels)
    }

    /// Callers guarantee that `rows` / `cols` describe `data`.
    pub(crate) fn from_parts(data: Array2<T>, rows: Labels, cols: Labels) -> Self {
        debug_assert_eq!(data.nrows(), rows.len());
        debug_assert_eq!(data.ncols(), cols.len());
        Self { data, rows, cols }
    }

    pub fn into_parts(self) -> (Array2<T>, Vec<String>, Vec<String>) {
        (self.data, self.rows.into_vec(), self.cols.into_vec())
    }

    /// Builder form of [`LabeledMatrix::set_labels`].
    pub fn with_labels<I, S>(mut self, axis: usize, labels: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set_labels(axis, labels.into_iter().map(Into::into).collect())?;
        Ok(self)
    }

    pub fn get_labels(&self, axis: usize) -> Result<&[String]> {
        check_axis(axis)?;
        Ok(if axis == 0 {
            self.rows.as_slice()
        } else {
            self.cols.as_slice()
        })
    }

    /// Replaces the labels of `axis`. On failure the current labels are kept.
    pub fn set_labels(&mut self, axis: usize, labels: Vec<String>) -> Result<()> {
        check_axis(axis)?;
        let len = self.data.len_of(ndarray::Axis(axis));
        let labels = Labels::new(axis, labels, len)?;
        log::debug!("replacing {len} labels on axis {axis}");
        if axis == 0 {
            self.rows = labels;
        } else {
            self.cols = labels;
        }
        Ok(())
    }

    pub fn row_labels(&self) -> &[String] {
        self.rows.as_slice()
    }

    pub fn col_labels(&self) -> &[String] {
        self.cols.as_slice()
    }

    pub fn labels(&self, axis: usize) -> Result<&Labels> {
        check_axis(axis)?;
        Ok(if axis == 0 { &self.rows } else { &self.cols })
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.data.nrows(), self.data.ncols())
    }

    pub fn nrows(&self) -> usize {
        self.data.nrows()
    }

    pub fn ncols(&self) -> usize {
        self.data.ncols()
    }

    pub fn data(&self) -> ArrayView2<'_, T> {
        self.data.view()
    }

    /// Mutable access to the values. The shape cannot change through the view, so
    /// the labels stay valid.
    pub fn data_mut(&mut self) -> ArrayViewMut2<'_, T> {
        self.data.view_mut()
    }

    pub fn into_data(self) -> Array2<T> {
        self.data
    }

    /// Converts the values into another element type, keeping the labels.
    pub fn cast<U: AFloat>(&self) -> Result<LabeledMatrix<U>> {
        let values = self
            .data
            .iter()
            .map(|&x| cast::<T, U>(x))
            .collect::<Option<Vec<U>>>()
            .ok_or_else(|| LabeledError::validation("values cannot be represented by the target type"))?;
        let data = Array2::from_shape_vec(self.shape(), values)
            .map_err(|e| LabeledError::Validation(e.to_string()))?;
        Ok(LabeledMatrix::from_parts(
            data,
            self.rows.clone(),
            self.cols.clone(),
        ))
    }

    /// Transposed copy, with row and column labels swapped.
    pub fn transpose(&self) -> Self {
        Self::from_parts(
            self.data.t().to_owned(),
            self.cols.clone(),
            self.rows.clone(),
        )
    }

    /// Shorthand for [`LabeledMatrix::transpose`].
    pub fn t(&self) -> Self {
        self.transpose()
    }

    /// Consuming transpose that reuses the buffer.
    pub fn into_transpose(self) -> Self {
        Self::from_parts(self.data.reversed_axes(), self.cols, self.rows)
    }

    /// `true` iff values, row labels and column labels (in order) all match.
    pub fn equals(&self, other: &Self) -> bool {
        self == other
    }
}

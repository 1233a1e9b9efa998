use itertools::iproduct;
use ndarray::{Array1, Array2, Axis};

use super::{
    selector::{Key, Resolved},
    LabeledMatrix, LabeledSeries,
};
use crate::{
    error::{LabeledError, Result},
    toolkit::array::AFloat,
};

/// Result of [`LabeledMatrix::read`].
#[derive(Debug, Clone, PartialEq)]
pub enum Selection<T: AFloat> {
    /// both axes were addressed by a single position / label
    Scalar(T),
    /// exactly one axis was addressed by a single position / label
    Series(LabeledSeries<T>),
    Matrix(LabeledMatrix<T>),
}

impl<T: AFloat> Selection<T> {
    pub fn into_scalar(self) -> Option<T> {
        match self {
            Selection::Scalar(value) => Some(value),
            _ => None,
        }
    }

    pub fn into_series(self) -> Option<LabeledSeries<T>> {
        match self {
            Selection::Series(series) => Some(series),
            _ => None,
        }
    }

    pub fn into_matrix(self) -> Option<LabeledMatrix<T>> {
        match self {
            Selection::Matrix(matrix) => Some(matrix),
            _ => None,
        }
    }
}

/// Value accepted by [`LabeledMatrix::write`]. Scalars are broadcast over the
/// selection, arrays must match its shape.
#[derive(Debug, Clone, PartialEq)]
pub enum Fill<T> {
    Scalar(T),
    Vector(Array1<T>),
    Matrix(Array2<T>),
}

impl<T: AFloat> From<T> for Fill<T> {
    fn from(value: T) -> Self {
        Fill::Scalar(value)
    }
}
impl<T: AFloat> From<Array1<T>> for Fill<T> {
    fn from(values: Array1<T>) -> Self {
        Fill::Vector(values)
    }
}
impl<T: AFloat> From<Array2<T>> for Fill<T> {
    fn from(values: Array2<T>) -> Self {
        Fill::Matrix(values)
    }
}

impl<T: AFloat> LabeledMatrix<T> {
    /// Translates `key` into positional selectors, one per axis.
    pub fn resolve_indices(&self, key: impl Into<Key>) -> Result<(Resolved, Resolved)> {
        let key = key.into();
        let rows = key.rows.resolve(0, &self.rows)?;
        let cols = key.cols.resolve(1, &self.cols)?;
        Ok((rows, cols))
    }

    /// Reads a scalar, a series or a sub-matrix.
    ///
    /// Axes addressed by a list or a range keep their labels, sliced the same way
    /// as the values.
    pub fn read(&self, key: impl Into<Key>) -> Result<Selection<T>> {
        let (rows, cols) = self.resolve_indices(key)?;
        match (rows, cols) {
            (Resolved::Index(i), Resolved::Index(j)) => Ok(Selection::Scalar(self.data[[i, j]])),
            (Resolved::Index(i), cols) => {
                let positions = cols.positions(self.ncols());
                let values = self.data.row(i).select(Axis(0), &positions);
                let labels = self.cols.select(1, &positions)?;
                let name = self.rows.get(i).map(str::to_string);
                Ok(Selection::Series(LabeledSeries::from_parts(
                    values, labels, name,
                )))
            }
            (rows, Resolved::Index(j)) => {
                let positions = rows.positions(self.nrows());
                let values = self.data.column(j).select(Axis(0), &positions);
                let labels = self.rows.select(0, &positions)?;
                let name = self.cols.get(j).map(str::to_string);
                Ok(Selection::Series(LabeledSeries::from_parts(
                    values, labels, name,
                )))
            }
            (rows, cols) => {
                let row_positions = rows.positions(self.nrows());
                let col_positions = cols.positions(self.ncols());
                let data = self
                    .data
                    .select(Axis(0), &row_positions)
                    .select(Axis(1), &col_positions);
                Ok(Selection::Matrix(LabeledMatrix::from_parts(
                    data,
                    self.rows.select(0, &row_positions)?,
                    self.cols.select(1, &col_positions)?,
                )))
            }
        }
    }

    /// Reads a single element.
    pub fn get(&self, key: impl Into<Key>) -> Result<T> {
        match self.read(key)? {
            Selection::Scalar(value) => Ok(value),
            _ => Err(LabeledError::validation(
                "key does not address a single element",
            )),
        }
    }

    /// Writes `value` into the selected region. Labels are left untouched, and
    /// nothing is written if `value` does not fit.
    pub fn write(&mut self, key: impl Into<Key>, value: impl Into<Fill<T>>) -> Result<()> {
        let (rows, cols) = self.resolve_indices(key)?;
        let row_positions = rows.positions(self.nrows());
        let col_positions = cols.positions(self.ncols());
        let expected = match (rows.is_scalar(), cols.is_scalar()) {
            (true, true) => vec![],
            (true, false) => vec![col_positions.len()],
            (false, true) => vec![row_positions.len()],
            (false, false) => vec![row_positions.len(), col_positions.len()],
        };
        let targets = iproduct!(row_positions.iter(), col_positions.iter());
        match value.into() {
            Fill::Scalar(value) => {
                targets.for_each(|(&i, &j)| self.data[[i, j]] = value);
            }
            Fill::Vector(values) => {
                if expected != values.shape() {
                    return Err(LabeledError::Shape {
                        expected,
                        actual: values.shape().to_vec(),
                    });
                }
                targets
                    .zip(values.iter())
                    .for_each(|((&i, &j), &value)| self.data[[i, j]] = value);
            }
            Fill::Matrix(values) => {
                if expected != values.shape() {
                    return Err(LabeledError::Shape {
                        expected,
                        actual: values.shape().to_vec(),
                    });
                }
                targets
                    .zip(values.iter())
                    .for_each(|((&i, &j), &value)| self.data[[i, j]] = value);
            }
        }
        Ok(())
    }
}

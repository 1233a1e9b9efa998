//! Error types for labeled matrix operations

use thiserror::Error;

/// Errors that can occur while building, addressing, combining or persisting
/// a [`crate::matrix::LabeledMatrix`]
#[derive(Debug, Error)]
pub enum LabeledError {
    /// Labels (or the payload they describe) break the matrix invariants
    #[error("Validation error: {0}")]
    Validation(String),

    /// A label lookup missed during index resolution
    #[error("Label {label:?} not found on axis {axis}")]
    Key { axis: usize, label: String },

    /// Label sequences of two operands do not line up
    #[error("Axes are not aligned: {0}")]
    Alignment(String),

    /// A positional selector points outside of the axis
    #[error("Index {index} is out of bounds for axis {axis} with size {len}")]
    Index { axis: usize, index: isize, len: usize },

    /// An assigned value does not fit the selected region
    #[error("Shape mismatch: expected {expected:?}, got {actual:?}")]
    Shape {
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl LabeledError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        LabeledError::Validation(message.into())
    }
}

pub type Result<T> = std::result::Result<T, LabeledError>;

//! Labeled two-dimensional numeric arrays.
//!
//! A [`LabeledMatrix`] pairs a dense [`ndarray::Array2`] with unique string labels
//! on both axes. Elements can be addressed by position or by label, arithmetic
//! checks that operands line up, and reductions keep the labels of the surviving
//! axis.

pub mod error;
pub mod matrix;
pub mod toolkit;

pub use error::{LabeledError, Result};
pub use matrix::{
    DisplayOptions, Fill, Key, LabeledMatrix, LabeledSeries, Reduced, Selection, Selector,
};
pub use toolkit::array::{AFloat, Reduction};

//! # matrix
//!
//! a two-dimensional numeric array that carries string labels on both axes
//!
//! # Design
//!
//! [`LabeledMatrix`] owns a dense [`Array2`] plus one [`Labels`] per axis. Labels
//! are validated whenever they (or the shape they describe) change: there must be
//! exactly one label per row / column, and no label may appear twice on an axis.
//!
//! Every axis slot of [`LabeledMatrix::read`] / [`LabeledMatrix::write`] accepts
//! either positions or labels (see [`selector`]), so one call serves both addressing
//! modes. Arithmetic refuses to combine operands whose labels do not line up, and
//! slicing, transposing and reducing carry the relevant labels over to the result.
//!
//! Matrices persist as `.npz` archives with three entries: `data`, `row_labels`
//! and `col_labels`.

use crate::toolkit::array::AFloat;
use ndarray::Array2;

mod display;
mod indexing;
mod io;
pub mod labels;
mod meta;
mod ops;
mod reduce;
pub mod selector;
mod series;

pub use display::DisplayOptions;
pub use indexing::{Fill, Selection};
pub use io::{COL_LABELS_ENTRY, DATA_ENTRY, ROW_LABELS_ENTRY};
pub use labels::Labels;
pub use reduce::Reduced;
pub use selector::{Key, Resolved, Selector, Span};
pub use series::LabeledSeries;

#[derive(Debug, Clone, PartialEq)]
pub struct LabeledMatrix<T: AFloat> {
    data: Array2<T>,
    rows: Labels,
    cols: Labels,
}

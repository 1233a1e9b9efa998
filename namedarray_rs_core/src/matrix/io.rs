mod npy_labels;
mod npz;

use std::{fmt::Display, io};

/// Name of the archive entry holding the values, shape `(R, C)`.
pub const DATA_ENTRY: &str = "data";
/// Name of the archive entry holding the row labels, shape `(R,)`.
pub const ROW_LABELS_ENTRY: &str = "row_labels";
/// Name of the archive entry holding the column labels, shape `(C,)`.
pub const COL_LABELS_ENTRY: &str = "col_labels";

fn invalid_data(err: impl Display) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, err.to_string())
}

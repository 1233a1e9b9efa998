use core::fmt;

use itertools::izip;

use super::{LabeledMatrix, LabeledSeries};
use crate::toolkit::array::AFloat;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayOptions {
    /// rows beyond this are elided
    pub max_rows: usize,
    /// columns beyond this are replaced by a single `...` column
    pub max_cols: usize,
    /// decimals printed per value
    pub precision: usize,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            max_rows: 10,
            max_cols: 6,
            precision: 4,
        }
    }
}

impl<T: AFloat> LabeledMatrix<T> {
    pub fn render(&self, options: &DisplayOptions) -> String {
        let (nrows, ncols) = self.shape();
        let truncate_rows = nrows > options.max_rows;
        let truncate_cols = ncols > options.max_cols;
        let shown_cols = ncols.min(options.max_cols);

        let mut header = self
            .cols
            .iter()
            .take(shown_cols)
            .map(String::as_str)
            .collect::<Vec<_>>();
        if truncate_cols {
            header.push("...");
        }
        let mut lines = vec![format!("      | {}", header.join(" "))];
        for (label, row) in izip!(&self.rows, self.data.rows()).take(options.max_rows) {
            let mut cells = row
                .iter()
                .take(shown_cols)
                .map(|x| format!("{:.*}", options.precision, x))
                .collect::<Vec<_>>();
            if truncate_cols {
                cells.push("...".to_string());
            }
            lines.push(format!("{label:>5} | {}", cells.join(" ")));
        }
        if truncate_rows {
            lines.push(format!("{:>5} |", "..."));
        }
        lines.join("\n")
    }
}

impl<T: AFloat> fmt::Display for LabeledMatrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(&DisplayOptions::default()))
    }
}

impl<T: AFloat> fmt::Display for LabeledSeries<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = self.name() {
            writeln!(f, "name: {name}")?;
        }
        let lines = self
            .iter()
            .map(|(label, value)| format!("{label:>5} | {value:.4}"))
            .collect::<Vec<_>>();
        f.write_str(&lines.join("\n"))
    }
}

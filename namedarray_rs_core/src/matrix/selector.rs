//! Selectors accepted by [`super::LabeledMatrix::read`] / [`super::LabeledMatrix::write`].
//!
//! Every axis slot takes either positions or labels, as a scalar, a list or a
//! range. Labels are translated into positions (see [`Selector::resolve`]) before
//! the buffer is touched.

use core::ops::{Range, RangeFrom, RangeFull, RangeTo};

use super::labels::Labels;
use crate::error::{LabeledError, Result};

/// A `start:stop:step` range with Python slice semantics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span<B> {
    pub start: Option<B>,
    pub stop: Option<B>,
    pub step: Option<isize>,
}

impl<B> Span<B> {
    pub fn new(start: Option<B>, stop: Option<B>, step: Option<isize>) -> Self {
        Self { start, stop, step }
    }

    pub fn full() -> Self {
        Self::new(None, None, None)
    }
}

impl Span<isize> {
    /// Positions covered by this span on an axis of `len` entries.
    ///
    /// Negative bounds count from the end, out-of-range bounds are clamped and a
    /// negative step walks backwards, exactly like `slice.indices(len)`.
    pub fn positions(&self, len: usize) -> Vec<usize> {
        let step = self.step.unwrap_or(1);
        if step == 0 {
            return Vec::new();
        }
        let len = len as isize;
        let (lower, upper) = if step > 0 { (0, len) } else { (-1, len - 1) };
        let clamp = |bound: Option<isize>, default: isize| match bound {
            None => default,
            Some(b) if b < 0 => (b + len).max(lower),
            Some(b) => b.min(upper),
        };
        let (start, stop) = if step > 0 {
            (clamp(self.start, lower), clamp(self.stop, upper))
        } else {
            (clamp(self.start, upper), clamp(self.stop, lower))
        };
        let mut positions = Vec::new();
        let mut i = start;
        while (step > 0 && i < stop) || (step < 0 && i > stop) {
            positions.push(i as usize);
            match i.checked_add(step) {
                Some(next) => i = next,
                None => break,
            }
        }
        positions
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    Position(isize),
    PositionRange(Span<isize>),
    PositionList(Vec<isize>),
    Label(String),
    LabelRange(Span<String>),
    LabelList(Vec<String>),
}

/// Positional form of a [`Selector`], ready to be applied to the buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved {
    Index(usize),
    Range(Span<isize>),
    List(Vec<usize>),
}

impl Resolved {
    pub fn is_scalar(&self) -> bool {
        matches!(self, Resolved::Index(_))
    }

    pub fn positions(&self, len: usize) -> Vec<usize> {
        match self {
            Resolved::Index(i) => vec![*i],
            Resolved::Range(span) => span.positions(len),
            Resolved::List(positions) => positions.clone(),
        }
    }
}

fn check_position(axis: usize, index: isize, len: usize) -> Result<usize> {
    let signed_len = len as isize;
    let position = if index < 0 { index + signed_len } else { index };
    if position < 0 || position >= signed_len {
        return Err(LabeledError::Index { axis, index, len });
    }
    Ok(position as usize)
}

// out-of-range integers saturate, so they still fail the bounds check (or clamp, in a range)
fn to_position<I>(index: I) -> isize
where
    I: TryInto<isize> + PartialOrd + Default + Copy,
{
    index.try_into().unwrap_or(if index < I::default() {
        isize::MIN
    } else {
        isize::MAX
    })
}

fn check_step(step: Option<isize>) -> Result<()> {
    if step == Some(0) {
        return Err(LabeledError::validation("slice step cannot be zero"));
    }
    Ok(())
}

impl Selector {
    pub fn all() -> Self {
        Selector::PositionRange(Span::full())
    }

    pub fn label_range(start: Option<&str>, stop: Option<&str>, step: Option<isize>) -> Self {
        Selector::LabelRange(Span::new(
            start.map(str::to_string),
            stop.map(str::to_string),
            step,
        ))
    }

    pub fn position_range(start: Option<isize>, stop: Option<isize>, step: Option<isize>) -> Self {
        Selector::PositionRange(Span::new(start, stop, step))
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self, Selector::Position(_) | Selector::Label(_))
    }

    /// Translates this selector into positions of `axis`, whose labels are `labels`.
    pub fn resolve(&self, axis: usize, labels: &Labels) -> Result<Resolved> {
        let len = labels.len();
        match self {
            Selector::Position(index) => Ok(Resolved::Index(check_position(axis, *index, len)?)),
            Selector::PositionRange(span) => {
                check_step(span.step)?;
                Ok(Resolved::Range(span.clone()))
            }
            Selector::PositionList(indices) => indices
                .iter()
                .map(|&index| check_position(axis, index, len))
                .collect::<Result<Vec<_>>>()
                .map(Resolved::List),
            Selector::Label(label) => Ok(Resolved::Index(labels.locate(axis, label)?)),
            Selector::LabelRange(span) => {
                check_step(span.step)?;
                let locate = |bound: &Option<String>| -> Result<Option<isize>> {
                    bound
                        .as_deref()
                        .map(|label| labels.locate(axis, label).map(|i| i as isize))
                        .transpose()
                };
                Ok(Resolved::Range(Span::new(
                    locate(&span.start)?,
                    locate(&span.stop)?,
                    span.step,
                )))
            }
            Selector::LabelList(names) => names
                .iter()
                .map(|label| labels.locate(axis, label))
                .collect::<Result<Vec<_>>>()
                .map(Resolved::List),
        }
    }
}

/// A per-axis pair of selectors. A single selector addresses rows and keeps every
/// column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key {
    pub rows: Selector,
    pub cols: Selector,
}

impl Key {
    pub fn new(rows: impl Into<Selector>, cols: impl Into<Selector>) -> Self {
        Self {
            rows: rows.into(),
            cols: cols.into(),
        }
    }
}

impl<A: Into<Selector>, B: Into<Selector>> From<(A, B)> for Key {
    fn from((rows, cols): (A, B)) -> Self {
        Key::new(rows, cols)
    }
}

macro_rules! selector_from_int {
    ($($int:ty),*) => {$(
        impl From<$int> for Selector {
            fn from(index: $int) -> Self {
                Selector::Position(to_position(index))
            }
        }
        impl From<Vec<$int>> for Selector {
            fn from(indices: Vec<$int>) -> Self {
                Selector::PositionList(indices.into_iter().map(to_position).collect())
            }
        }
        impl<const N: usize> From<[$int; N]> for Selector {
            fn from(indices: [$int; N]) -> Self {
                Selector::PositionList(indices.into_iter().map(to_position).collect())
            }
        }
        impl<const N: usize> From<[$int; N]> for Key {
            fn from(rows: [$int; N]) -> Self {
                Key::new(rows, Selector::all())
            }
        }
        impl From<Range<$int>> for Selector {
            fn from(range: Range<$int>) -> Self {
                Selector::position_range(
                    Some(to_position(range.start)),
                    Some(to_position(range.end)),
                    None,
                )
            }
        }
        impl From<RangeFrom<$int>> for Selector {
            fn from(range: RangeFrom<$int>) -> Self {
                Selector::position_range(Some(to_position(range.start)), None, None)
            }
        }
        impl From<RangeTo<$int>> for Selector {
            fn from(range: RangeTo<$int>) -> Self {
                Selector::position_range(None, Some(to_position(range.end)), None)
            }
        }
    )*};
}
selector_from_int!(i32, i64, isize, usize);

impl From<RangeFull> for Selector {
    fn from(_: RangeFull) -> Self {
        Selector::all()
    }
}
impl From<&str> for Selector {
    fn from(label: &str) -> Self {
        Selector::Label(label.to_string())
    }
}
impl From<String> for Selector {
    fn from(label: String) -> Self {
        Selector::Label(label)
    }
}
impl From<&String> for Selector {
    fn from(label: &String) -> Self {
        Selector::Label(label.clone())
    }
}
impl From<Vec<&str>> for Selector {
    fn from(labels: Vec<&str>) -> Self {
        Selector::LabelList(labels.into_iter().map(str::to_string).collect())
    }
}
impl From<Vec<String>> for Selector {
    fn from(labels: Vec<String>) -> Self {
        Selector::LabelList(labels)
    }
}
impl<const N: usize> From<[&str; N]> for Selector {
    fn from(labels: [&str; N]) -> Self {
        Selector::LabelList(labels.into_iter().map(str::to_string).collect())
    }
}
impl<const N: usize> From<[&str; N]> for Key {
    fn from(rows: [&str; N]) -> Self {
        Key::new(rows, Selector::all())
    }
}
impl From<Range<&str>> for Selector {
    fn from(range: Range<&str>) -> Self {
        Selector::label_range(Some(range.start), Some(range.end), None)
    }
}
impl From<RangeFrom<&str>> for Selector {
    fn from(range: RangeFrom<&str>) -> Self {
        Selector::label_range(Some(range.start), None, None)
    }
}
impl From<RangeTo<&str>> for Selector {
    fn from(range: RangeTo<&str>) -> Self {
        Selector::label_range(None, Some(range.end), None)
    }
}

macro_rules! key_from_single {
    ($($t:ty),*) => {$(
        impl From<$t> for Key {
            fn from(rows: $t) -> Self {
                Key::new(rows, Selector::all())
            }
        }
    )*};
}
key_from_single!(
    Selector,
    i32,
    i64,
    isize,
    usize,
    Vec<i32>,
    Vec<i64>,
    Vec<isize>,
    Vec<usize>,
    Range<i32>,
    Range<i64>,
    Range<isize>,
    Range<usize>,
    RangeFrom<i32>,
    RangeFrom<i64>,
    RangeFrom<isize>,
    RangeFrom<usize>,
    RangeTo<i32>,
    RangeTo<i64>,
    RangeTo<isize>,
    RangeTo<usize>,
    RangeFull,
    &str,
    String,
    &String,
    Vec<&str>,
    Vec<String>,
    Range<&str>,
    RangeFrom<&str>,
    RangeTo<&str>
);

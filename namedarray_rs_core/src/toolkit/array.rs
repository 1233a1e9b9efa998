use core::fmt::{Debug, Display};
use std::cell::UnsafeCell;

use itertools::izip;
use ndarray::{Array1, ArrayView1, ArrayView2, Axis, LinalgScalar, ScalarOperand};
use ndarray_npy::{ReadableElement, WritableElement};
use num_traits::{cast, Float};

/// Element type of a [`crate::matrix::LabeledMatrix`].
pub trait AFloat:
    Float
    + LinalgScalar
    + ScalarOperand
    + Send
    + Sync
    + Debug
    + Display
    + ReadableElement
    + WritableElement
{
}
impl AFloat for f32 {}
impl AFloat for f64 {}

pub const DEFAULT_NUM_THREADS: usize = 8;
/// Below this many elements, lane kernels run on the calling thread.
pub const PARALLEL_MIN_ELEMENTS: usize = 1 << 16;

#[derive(Copy, Clone)]
pub struct UnsafeSlice<'a, T> {
    slice: &'a [UnsafeCell<T>],
}
unsafe impl<'a, T: Send + Sync> Send for UnsafeSlice<'a, T> {}
unsafe impl<'a, T: Send + Sync> Sync for UnsafeSlice<'a, T> {}
impl<'a, T> UnsafeSlice<'a, T> {
    pub fn new(slice: &'a mut [T]) -> Self {
        let ptr = slice as *mut [T] as *const [UnsafeCell<T>];
        Self {
            slice: unsafe { &*ptr },
        }
    }

    /// Callers must guarantee that no two threads write to the same `i`.
    pub fn set(&mut self, i: usize, value: T) {
        let ptr = self.slice[i].get();
        unsafe {
            *ptr = value;
        }
    }
}

/// Axis-collapsing operations understood by the lane kernels.
///
/// NaN propagates as IEEE-754 dictates. Empty lanes give `0` for [`Reduction::Sum`],
/// `1` for [`Reduction::Prod`] and NaN for everything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reduction {
    Sum,
    Prod,
    Mean,
    Min,
    Max,
    /// population variance (`ddof = 0`)
    Var,
    /// population standard deviation (`ddof = 0`)
    Std,
}

impl Reduction {
    pub fn name(&self) -> &'static str {
        match self {
            Reduction::Sum => "sum",
            Reduction::Prod => "prod",
            Reduction::Mean => "mean",
            Reduction::Min => "min",
            Reduction::Max => "max",
            Reduction::Var => "var",
            Reduction::Std => "std",
        }
    }

    pub fn apply<T: AFloat>(&self, a: ArrayView1<T>) -> T {
        match self {
            Reduction::Sum => sum(a),
            Reduction::Prod => a.iter().fold(T::one(), |acc, &x| acc * x),
            Reduction::Mean => mean(a),
            Reduction::Min => extremum(a, |x, acc| x < acc),
            Reduction::Max => extremum(a, |x, acc| x > acc),
            Reduction::Var => var(a),
            Reduction::Std => var(a).sqrt(),
        }
    }
}

fn sum<T: AFloat>(a: ArrayView1<T>) -> T {
    a.iter().fold(T::zero(), |acc, &x| acc + x)
}

fn mean<T: AFloat>(a: ArrayView1<T>) -> T {
    if a.is_empty() {
        return T::nan();
    }
    match cast::<usize, T>(a.len()) {
        Some(num) => sum(a) / num,
        None => T::nan(),
    }
}

fn var<T: AFloat>(a: ArrayView1<T>) -> T {
    let a_mean = mean(a);
    if a_mean.is_nan() {
        return T::nan();
    }
    let sq = a.iter().fold(T::zero(), |acc, &x| acc + (x - a_mean) * (x - a_mean));
    match cast::<usize, T>(a.len()) {
        Some(num) => sq / num,
        None => T::nan(),
    }
}

// once a NaN is picked up it sticks, since every comparison against it is false
fn extremum<T: AFloat>(a: ArrayView1<T>, replaces: impl Fn(T, T) -> bool) -> T {
    a.iter()
        .copied()
        .reduce(|acc, x| if x.is_nan() || replaces(x, acc) { x } else { acc })
        .unwrap_or_else(T::nan)
}

/// Applies `f` to every row of `a`, spreading rows over a rayon pool when `a` is
/// large enough. Pass `a.t()` to work on columns instead.
pub fn map_axis1<T, F>(a: ArrayView2<'_, T>, num_threads: usize, f: F) -> Vec<T>
where
    T: AFloat,
    F: Fn(ArrayView1<T>) -> T + Sync,
{
    let nrows = a.nrows();
    let mut res: Vec<T> = vec![T::zero(); nrows];
    if num_threads <= 1 || nrows < 2 || a.len() < PARALLEL_MIN_ELEMENTS {
        izip!(res.iter_mut(), a.rows()).for_each(|(r, row)| *r = f(row));
        return res;
    }
    let pool = match rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build()
    {
        Ok(pool) => pool,
        Err(err) => {
            log::warn!("failed to build a pool of {num_threads} threads ({err}), running sequentially");
            izip!(res.iter_mut(), a.rows()).for_each(|(r, row)| *r = f(row));
            return res;
        }
    };

    let chunk_size = nrows.div_ceil(num_threads);
    let slice = UnsafeSlice::new(res.as_mut_slice());
    let f = &f;
    pool.scope(|s| {
        a.axis_chunks_iter(Axis(0), chunk_size)
            .enumerate()
            .for_each(|(i, chunk)| {
                let mut slice = slice;
                s.spawn(move |_| {
                    let offset = i * chunk_size;
                    chunk
                        .rows()
                        .into_iter()
                        .enumerate()
                        .for_each(|(j, row)| slice.set(offset + j, f(row)));
                });
            });
    });
    res
}

pub fn reduce_axis1<T: AFloat>(a: ArrayView2<T>, op: Reduction, num_threads: usize) -> Vec<T> {
    map_axis1(a, num_threads, |lane| op.apply(lane))
}

pub fn reduce_all<T: AFloat>(a: ArrayView2<T>, op: Reduction) -> T {
    match a.as_slice() {
        Some(values) => op.apply(ArrayView1::from(values)),
        None => {
            let flat: Array1<T> = a.iter().copied().collect();
            op.apply(flat.view())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array2};

    #[test]
    fn test_lane_reductions() {
        let a = array![1.0f64, 2.0, 3.0, 4.0];
        assert_eq!(Reduction::Sum.apply(a.view()), 10.0);
        assert_eq!(Reduction::Prod.apply(a.view()), 24.0);
        assert_eq!(Reduction::Mean.apply(a.view()), 2.5);
        assert_eq!(Reduction::Min.apply(a.view()), 1.0);
        assert_eq!(Reduction::Max.apply(a.view()), 4.0);
        assert_eq!(Reduction::Var.apply(a.view()), 1.25);
        assert_eq!(Reduction::Std.apply(a.view()), 1.25f64.sqrt());
    }

    #[test]
    fn test_nan_and_empty_lanes() {
        let a = array![1.0f32, f32::NAN, 0.5];
        assert!(Reduction::Min.apply(a.view()).is_nan());
        assert!(Reduction::Max.apply(a.view()).is_nan());
        assert!(Reduction::Mean.apply(a.view()).is_nan());
        let empty = Array1::<f32>::zeros(0);
        assert_eq!(Reduction::Sum.apply(empty.view()), 0.0);
        assert_eq!(Reduction::Prod.apply(empty.view()), 1.0);
        assert!(Reduction::Max.apply(empty.view()).is_nan());
        assert!(Reduction::Std.apply(empty.view()).is_nan());
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let nrows = 257;
        let ncols = 300;
        let a = Array2::from_shape_fn((nrows, ncols), |(i, j)| (i * ncols + j) as f64 * 0.5);
        assert!(a.len() >= PARALLEL_MIN_ELEMENTS);
        for op in [Reduction::Sum, Reduction::Mean, Reduction::Min, Reduction::Max] {
            let sequential = reduce_axis1(a.view(), op, 1);
            let parallel = reduce_axis1(a.view(), op, 8);
            assert_eq!(sequential, parallel);
            let sequential = reduce_axis1(a.t(), op, 1);
            let parallel = reduce_axis1(a.t(), op, 8);
            assert_eq!(sequential, parallel);
        }
    }

    #[test]
    fn test_reduce_all_on_strided_view() {
        let a = array![[1.0f64, 2.0], [3.0, 4.0]];
        assert_eq!(reduce_all(a.view(), Reduction::Sum), 10.0);
        assert_eq!(reduce_all(a.t(), Reduction::Max), 4.0);
        assert_eq!(reduce_all(a.t(), Reduction::Mean), 2.5);
    }
}

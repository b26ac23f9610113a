//! Zero-frequency centering (fftshift) over any dense array.
//!
//! Centering swaps the two halves of every axis so that bin 0 moves to index
//! `len / 2`. Axes are processed one at a time, which amounts to a quadrant swap
//! in 2D and an octant swap in 3D. Applying it twice restores the input.

use crate::{FftError, Result};

/// Minimal element access used by the centering routines.
///
/// Coordinates are given in axis order, e.g. `[row, col]` for 2D and
/// `[row, col, depth]` for 3D. Implementations may panic on coordinates outside
/// [`dims`](Self::dims).
pub trait DenseArray<const N: usize> {
    type Elem: Copy;

    fn dims(&self) -> [usize; N];

    fn at(&self, coords: [usize; N]) -> Self::Elem;

    fn set(&mut self, coords: [usize; N], value: Self::Elem);
}

/// Row-major `nr x nc` view over a mutable slice, `A(i, j) = data[i * nc + j]`.
///
/// Lets the output buffer of [`Fft2`](crate::Fft2) be centered in place.
#[derive(Debug)]
pub struct RowMajorMut<'a, T> {
    data: &'a mut [T],
    nr: usize,
    nc: usize,
}

impl<'a, T> RowMajorMut<'a, T> {
    /// # Errors
    /// [`FftError::DimensionMismatch`] if `data.len() != nr * nc`.
    pub fn new(data: &'a mut [T], nr: usize, nc: usize) -> Result<Self> {
        let Some(expected) = nr.checked_mul(nc) else {
            return Err(FftError::InvalidShape("row-major shape overflows usize"));
        };
        if data.len() != expected {
            return Err(FftError::DimensionMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self { data, nr, nc })
    }
}

impl<T: Copy> DenseArray<2> for RowMajorMut<'_, T> {
    type Elem = T;

    #[inline]
    fn dims(&self) -> [usize; 2] {
        [self.nr, self.nc]
    }

    #[inline]
    fn at(&self, [i, j]: [usize; 2]) -> T {
        self.data[i * self.nc + j]
    }

    #[inline]
    fn set(&mut self, [i, j]: [usize; 2], value: T) {
        self.data[i * self.nc + j] = value;
    }
}

/// Center every axis of `array`.
///
/// # Errors
/// [`FftError::OddAxisLength`] for the first axis of odd length. The array is
/// checked before any element moves, so it is left untouched on error.
pub fn center<A, const N: usize>(array: &mut A) -> Result<()>
where
    A: DenseArray<N> + ?Sized,
{
    let dims = array.dims();
    for (axis, &len) in dims.iter().enumerate() {
        if len % 2 != 0 {
            return Err(FftError::OddAxisLength { axis, len });
        }
    }
    tracing::trace!(?dims, "centering");
    for axis in 0..N {
        swap_halves(array, dims, axis);
    }
    Ok(())
}

/// Quadrant swap of a 2D array.
pub fn center2<A>(array: &mut A) -> Result<()>
where
    A: DenseArray<2> + ?Sized,
{
    center::<A, 2>(array)
}

/// Octant swap of a 3D array.
pub fn center3<A>(array: &mut A) -> Result<()>
where
    A: DenseArray<3> + ?Sized,
{
    center::<A, 3>(array)
}

/// Exchange element `c` with element `c + half` along `axis`, for every `c` in
/// the lower half of that axis.
fn swap_halves<A, const N: usize>(array: &mut A, dims: [usize; N], axis: usize)
where
    A: DenseArray<N> + ?Sized,
{
    let half = dims[axis] / 2;
    let mut extent = dims;
    extent[axis] = half;
    if extent.iter().any(|&d| d == 0) {
        return;
    }

    let mut lo = [0usize; N];
    loop {
        let mut hi = lo;
        hi[axis] += half;
        let a = array.at(lo);
        let b = array.at(hi);
        array.set(lo, b);
        array.set(hi, a);

        // odometer over `extent`, last axis fastest
        let mut d = N;
        loop {
            if d == 0 {
                return;
            }
            d -= 1;
            lo[d] += 1;
            if lo[d] < extent[d] {
                break;
            }
            lo[d] = 0;
        }
    }
}

//! Axis naming and the pass order shared by every engine.

use num_complex::Complex;
use rustfft::FftNum;

use crate::{FftError, Result};

/// One axis of a flattened array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Contiguous lines of length `nc`.
    Row,
    /// Lines of stride `nc` and length `nr`.
    Column,
    /// Lines of stride `nr * nc` and length `nd` (3D only).
    Depth,
}

/// Pass order of the 2D engines, used for both directions.
pub const AXES_2D: [Axis; 2] = [Axis::Row, Axis::Column];

/// Pass order of the 3D engines, used for both directions.
pub const AXES_3D: [Axis; 3] = [Axis::Row, Axis::Column, Axis::Depth];

/// A separable multi-dimensional transform over a flat buffer.
///
/// Serial and parallel engines implement this trait with the same contract:
/// the buffer must hold exactly [`len`](Self::len) elements and is transformed in
/// place, unnormalized.
pub trait SeparableFft<T: FftNum> {
    /// Number of elements the buffer must hold.
    fn len(&self) -> usize;

    /// Forward transform in place.
    fn fft(&mut self, data: &mut [Complex<T>]) -> Result<()>;

    /// Inverse transform in place, without the `1/N` factor.
    fn ifft(&mut self, data: &mut [Complex<T>]) -> Result<()>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Validate a set of line indices for an axis of length `len`.
pub(crate) fn line_set<I>(axis: Axis, lines: I, len: usize) -> Result<Vec<usize>>
where
    I: IntoIterator<Item = usize>,
{
    let mut seen = vec![false; len];
    let mut out = Vec::new();
    for index in lines {
        if index >= len {
            return Err(FftError::LineOutOfBounds { axis, index, len });
        }
        if std::mem::replace(&mut seen[index], true) {
            return Err(FftError::DuplicateLine { axis, index });
        }
        out.push(index);
    }
    Ok(out)
}

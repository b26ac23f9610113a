//! Strided access to one axis line of a flat buffer.
//!
//! A line is `len` elements starting at `start` and spaced `step` apart. Columns of
//! a row-major array and depth lines of a depth-major cube are lines; they are
//! gathered into a contiguous scratch buffer with [`extract_into`], transformed, and
//! written back with [`insert`].

use crate::{FftError, Result};

/// Offsets `start, start + step, ..., start + (len - 1) * step`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StridedLine {
    start: usize,
    step: usize,
    len: usize,
}

impl StridedLine {
    /// Create a line of `len` elements.
    ///
    /// # Errors
    /// Returns [`FftError::ZeroStride`] if `step == 0`.
    pub fn new(start: usize, step: usize, len: usize) -> Result<Self> {
        if step == 0 {
            return Err(FftError::ZeroStride);
        }
        Ok(Self { start, step, len })
    }

    /// The line of `buffer_len / step` elements starting at `start`.
    ///
    /// # Errors
    /// [`FftError::ZeroStride`] for `step == 0`, [`FftError::OffsetOverflow`] if the
    /// last offset falls outside the buffer.
    pub fn spanning(buffer_len: usize, start: usize, step: usize) -> Result<Self> {
        if step == 0 {
            return Err(FftError::ZeroStride);
        }
        let line = Self {
            start,
            step,
            len: buffer_len / step,
        };
        line.check_bounds(buffer_len)?;
        Ok(line)
    }

    /// Layouts only build lines with non-zero steps.
    #[inline]
    pub(crate) fn from_parts(start: usize, step: usize, len: usize) -> Self {
        debug_assert!(step > 0);
        Self { start, step, len }
    }

    #[inline]
    pub fn start(&self) -> usize {
        self.start
    }

    #[inline]
    pub fn step(&self) -> usize {
        self.step
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Offset of the last element, `None` for an empty line or when the offset
    /// does not fit in `usize`.
    #[inline]
    pub fn last(&self) -> Option<usize> {
        self.len
            .checked_sub(1)
            .and_then(|n| n.checked_mul(self.step))
            .and_then(|o| o.checked_add(self.start))
    }

    /// Iterate over the offsets of the line in order.
    #[inline]
    pub fn offsets(&self) -> impl Iterator<Item = usize> {
        let (start, step) = (self.start, self.step);
        (0..self.len).map(move |t| start + t * step)
    }

    /// Check that every offset lies inside a buffer of `buffer_len` elements.
    ///
    /// A line whose last offset overflows `usize` is reported with
    /// `offset == usize::MAX`.
    pub fn check_bounds(&self, buffer_len: usize) -> Result<()> {
        if self.is_empty() {
            return Ok(());
        }
        match self.last() {
            Some(offset) if offset < buffer_len => Ok(()),
            offset => Err(FftError::OffsetOverflow {
                offset: offset.unwrap_or(usize::MAX),
                len: buffer_len,
            }),
        }
    }
}

/// Gather `buffer[start], buffer[start + step], ...` for `buffer.len() / step`
/// elements.
///
/// # Errors
/// [`FftError::ZeroStride`] for `step == 0`; [`FftError::OffsetOverflow`] when the
/// line runs past the end of the buffer.
pub fn extract<T: Copy>(buffer: &[T], start: usize, step: usize) -> Result<Vec<T>> {
    let line = StridedLine::spanning(buffer.len(), start, step)?;
    Ok(line.offsets().map(|o| buffer[o]).collect())
}

/// Gather `line` from `buffer` into `out` without allocating.
///
/// # Errors
/// [`FftError::ShapeMismatch`] if `out.len() != line.len()`;
/// [`FftError::OffsetOverflow`] if the line leaves the buffer.
pub fn extract_into<T: Copy>(buffer: &[T], line: &StridedLine, out: &mut [T]) -> Result<()> {
    if out.len() != line.len() {
        return Err(FftError::ShapeMismatch {
            expected: line.len(),
            actual: out.len(),
        });
    }
    line.check_bounds(buffer.len())?;
    for (slot, o) in out.iter_mut().zip(line.offsets()) {
        *slot = buffer[o];
    }
    Ok(())
}

/// Write `seq[t]` to `buffer[start + t * step]`; the inverse of [`extract`].
///
/// # Errors
/// [`FftError::ZeroStride`] for `step == 0`; [`FftError::OffsetOverflow`] when
/// the last write would fall outside the buffer. Nothing is written on error.
pub fn insert<T: Copy>(buffer: &mut [T], seq: &[T], start: usize, step: usize) -> Result<()> {
    let line = StridedLine::new(start, step, seq.len())?;
    line.check_bounds(buffer.len())?;
    for (o, &value) in line.offsets().zip(seq) {
        buffer[o] = value;
    }
    Ok(())
}

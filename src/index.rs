//! Flat index mapping for 2D and 3D buffers.
//!
//! - [`Layout2`]: row-major, `(i, j) -> i * nc + j`
//! - [`Layout3`]: depth-major, `(i, j, k) -> k * nr * nc + i * nc + j`
//!
//! Rows are contiguous in both layouts. Columns have stride `nc` inside a plane and
//! depth lines have stride `nr * nc`; both are described as [`StridedLine`]s.

use std::ops::Range;

use crate::strided::StridedLine;
use crate::{FftError, Result};

/// Product of all dimensions. The empty product is 1.
#[inline]
pub fn prod(dims: &[usize]) -> usize {
    dims.iter().product()
}

/// Product of all dimensions, or `None` on overflow.
pub fn checked_prod(dims: &[usize]) -> Option<usize> {
    dims.iter().try_fold(1usize, |acc, &d| acc.checked_mul(d))
}

fn validate_dims(dims: &[usize]) -> Result<usize> {
    if dims.contains(&0) {
        return Err(FftError::InvalidShape(
            "axis lengths must be greater than zero",
        ));
    }
    match checked_prod(dims) {
        Some(len) => Ok(len),
        None => Err(FftError::InvalidShape("shape product overflows usize")),
    }
}

/// Row-major 2D layout with `nr` rows and `nc` columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout2 {
    nr: usize,
    nc: usize,
}

impl Layout2 {
    /// Create a layout; both axes must be non-empty.
    pub fn new(nr: usize, nc: usize) -> Result<Self> {
        validate_dims(&[nr, nc])?;
        Ok(Self { nr, nc })
    }

    #[inline]
    pub fn nr(&self) -> usize {
        self.nr
    }

    #[inline]
    pub fn nc(&self) -> usize {
        self.nc
    }

    /// Total number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.nr * self.nc
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Linear offset of element `(i, j)`.
    #[inline]
    pub fn index(&self, i: usize, j: usize) -> usize {
        i * self.nc + j
    }

    /// Inverse of [`index`](Self::index): `(row, col)` of a linear offset.
    #[inline]
    pub fn coords(&self, index: usize) -> (usize, usize) {
        (index / self.nc, index % self.nc)
    }

    /// Contiguous span of row `i`.
    #[inline]
    pub fn row(&self, i: usize) -> Range<usize> {
        let start = i * self.nc;
        start..start + self.nc
    }

    /// Strided line of column `j`.
    #[inline]
    pub fn column(&self, j: usize) -> StridedLine {
        StridedLine::from_parts(j, self.nc, self.nr)
    }
}

/// Depth-major 3D layout: `nd` planes of `nr x nc` row-major sheets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout3 {
    nr: usize,
    nc: usize,
    nd: usize,
}

impl Layout3 {
    /// Create a layout; all three axes must be non-empty.
    pub fn new(nr: usize, nc: usize, nd: usize) -> Result<Self> {
        validate_dims(&[nr, nc, nd])?;
        Ok(Self { nr, nc, nd })
    }

    #[inline]
    pub fn nr(&self) -> usize {
        self.nr
    }

    #[inline]
    pub fn nc(&self) -> usize {
        self.nc
    }

    #[inline]
    pub fn nd(&self) -> usize {
        self.nd
    }

    /// Number of elements in one depth plane.
    #[inline]
    pub fn plane_len(&self) -> usize {
        self.nr * self.nc
    }

    /// Total number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.plane_len() * self.nd
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Linear offset of element `(i, j, k)`.
    #[inline]
    pub fn index(&self, i: usize, j: usize, k: usize) -> usize {
        k * self.plane_len() + i * self.nc + j
    }

    /// Inverse of [`index`](Self::index): `(row, col, depth)` of a linear offset.
    #[inline]
    pub fn coords(&self, index: usize) -> (usize, usize, usize) {
        let col = index % self.nc;
        let row = (index / self.nc) % self.nr;
        let depth = index / self.plane_len();
        (row, col, depth)
    }

    /// Contiguous span of row `i` in plane `k`.
    #[inline]
    pub fn row(&self, i: usize, k: usize) -> Range<usize> {
        let start = self.index(i, 0, k);
        start..start + self.nc
    }

    /// Strided line of column `j` in plane `k`.
    #[inline]
    pub fn column(&self, j: usize, k: usize) -> StridedLine {
        StridedLine::from_parts(self.index(0, j, k), self.nc, self.nr)
    }

    /// Strided line through all planes at `(i, j)`.
    #[inline]
    pub fn depth_line(&self, i: usize, j: usize) -> StridedLine {
        StridedLine::from_parts(self.index(i, j, 0), self.plane_len(), self.nd)
    }
}

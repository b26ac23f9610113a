//! Three-dimensional transform over a depth-major buffer.

use num_complex::Complex;
use num_traits::Zero;
use rustfft::{FftNum, FftPlanner};

use crate::axis::{line_set, Axis, SeparableFft, AXES_3D};
use crate::freq::bin_frequency;
use crate::index::Layout3;
use crate::plan::{AxisPlan, Direction};
use crate::shared::SharedBuffer;
use crate::{FftError, Result};

/// 3D FFT of `nd` planes of `nr x nc`, `A(i, j, k) = data[k * nr * nc + i * nc + j]`.
///
/// Passes run in the order of [`AXES_3D`]:
/// 1. rows (contiguous): every row in the row set, in every plane
/// 2. columns (stride `nc`): every column in the column set, in every plane
/// 3. depth lines (stride `nr * nc`): every `(r, c)` with `r` in the row set and
///    `c` over all columns
///
/// With the default full row set the depth pass covers every `(r, c)` pair.
/// Tying depth lines to rows keeps the line sets of [`Fft3Par`](crate::Fft3Par)
/// shards disjoint in all three phases.
pub struct Fft3<T: FftNum> {
    layout: Layout3,
    row_plan: AxisPlan<T>,
    col_plan: AxisPlan<T>,
    depth_plan: AxisPlan<T>,
    rows: Vec<usize>,
    cols: Vec<usize>,
    line: Vec<Complex<T>>,
    scratch: Vec<Complex<T>>,
}

impl<T: FftNum> Fft3<T> {
    /// Plan a transform for `nr` rows, `nc` columns and `nd` planes.
    pub fn new(nr: usize, nc: usize, nd: usize) -> Result<Self> {
        let mut planner = FftPlanner::new();
        Self::with_planner(&mut planner, nr, nc, nd)
    }

    /// Plan a transform reusing the plans cached in `planner`.
    pub fn with_planner(
        planner: &mut FftPlanner<T>,
        nr: usize,
        nc: usize,
        nd: usize,
    ) -> Result<Self> {
        let layout = Layout3::new(nr, nc, nd)?;
        let row_plan = AxisPlan::new(planner, nc);
        let col_plan = AxisPlan::new(planner, nr);
        let depth_plan = AxisPlan::new(planner, nd);
        let scratch_len = row_plan
            .scratch_len()
            .max(col_plan.scratch_len())
            .max(depth_plan.scratch_len());
        tracing::debug!(nr, nc, nd, "planned 3D transform");
        Ok(Self {
            layout,
            row_plan,
            col_plan,
            depth_plan,
            rows: (0..nr).collect(),
            cols: (0..nc).collect(),
            line: vec![Complex::zero(); nr.max(nd)],
            scratch: vec![Complex::zero(); scratch_len],
        })
    }

    #[inline]
    pub fn nr(&self) -> usize {
        self.layout.nr()
    }

    #[inline]
    pub fn nc(&self) -> usize {
        self.layout.nc()
    }

    #[inline]
    pub fn nd(&self) -> usize {
        self.layout.nd()
    }

    #[inline]
    pub fn layout(&self) -> Layout3 {
        self.layout
    }

    /// Rows visited by the row and depth passes.
    #[inline]
    pub fn rows(&self) -> &[usize] {
        &self.rows
    }

    /// Columns visited by the column pass.
    #[inline]
    pub fn cols(&self) -> &[usize] {
        &self.cols
    }

    /// Replace the row and column sets. The depth axis is never restricted
    /// directly.
    ///
    /// # Errors
    /// [`FftError::LineOutOfBounds`] or [`FftError::DuplicateLine`]; the engine is
    /// left unchanged on error.
    pub fn restrict<R, C>(&mut self, rows: R, cols: C) -> Result<()>
    where
        R: IntoIterator<Item = usize>,
        C: IntoIterator<Item = usize>,
    {
        let rows = line_set(Axis::Row, rows, self.nr())?;
        let cols = line_set(Axis::Column, cols, self.nc())?;
        self.rows = rows;
        self.cols = cols;
        Ok(())
    }

    /// Forward transform in place.
    ///
    /// # Errors
    /// [`FftError::ShapeMismatch`] if `data.len() != nr * nc * nd`.
    pub fn fft(&mut self, data: &mut [Complex<T>]) -> Result<()> {
        self.transform(data, Direction::Forward)
    }

    /// Inverse transform in place. `ifft(fft(x)) == nr * nc * nd * x`.
    pub fn ifft(&mut self, data: &mut [Complex<T>]) -> Result<()> {
        self.transform(data, Direction::Inverse)
    }

    pub fn row_pass(&mut self, data: &mut [Complex<T>], direction: Direction) -> Result<()> {
        self.single_pass(Axis::Row, data, direction)
    }

    pub fn col_pass(&mut self, data: &mut [Complex<T>], direction: Direction) -> Result<()> {
        self.single_pass(Axis::Column, data, direction)
    }

    pub fn depth_pass(&mut self, data: &mut [Complex<T>], direction: Direction) -> Result<()> {
        self.single_pass(Axis::Depth, data, direction)
    }

    /// Normalized `(col, row, depth)` frequency of linear index `i`.
    ///
    /// Note the component order: the column frequency comes first.
    ///
    /// # Errors
    /// [`FftError::IndexOutOfBounds`] if `i >= nr * nc * nd`.
    pub fn freq(&self, i: usize) -> Result<[f64; 3]> {
        if i >= self.layout.len() {
            return Err(FftError::IndexOutOfBounds {
                index: i,
                len: self.layout.len(),
            });
        }
        let (r, c, d) = self.layout.coords(i);
        Ok([
            bin_frequency(c, self.nc()),
            bin_frequency(r, self.nr()),
            bin_frequency(d, self.nd()),
        ])
    }

    fn single_pass(
        &mut self,
        axis: Axis,
        data: &mut [Complex<T>],
        direction: Direction,
    ) -> Result<()> {
        self.check_len(data.len())?;
        // SAFETY: `data` is exclusively borrowed and its length was checked.
        unsafe { self.pass_shared(axis, SharedBuffer::new(data), direction) };
        Ok(())
    }

    fn transform(&mut self, data: &mut [Complex<T>], direction: Direction) -> Result<()> {
        self.check_len(data.len())?;
        tracing::trace!(
            nr = self.nr(),
            nc = self.nc(),
            nd = self.nd(),
            ?direction,
            "3D transform"
        );
        let buf = SharedBuffer::new(data);
        for axis in AXES_3D {
            // SAFETY: `buf` comes from an exclusive borrow of a buffer of the right
            // length and no other handle exists.
            unsafe { self.pass_shared(axis, buf, direction) };
        }
        Ok(())
    }

    pub(crate) fn check_len(&self, len: usize) -> Result<()> {
        if len != self.layout.len() {
            return Err(FftError::ShapeMismatch {
                expected: self.layout.len(),
                actual: len,
            });
        }
        Ok(())
    }

    /// Run one axis pass over this engine's lines of `buf`.
    ///
    /// # Safety
    /// `buf.len()` must equal `nr * nc * nd`, and while the call runs no other
    /// handle may access the lines this engine visits for `axis`: its rows in every
    /// plane, its columns in every plane, or the depth lines of its rows.
    pub(crate) unsafe fn pass_shared(
        &mut self,
        axis: Axis,
        buf: SharedBuffer<'_, Complex<T>>,
        direction: Direction,
    ) {
        debug_assert_eq!(buf.len(), self.layout.len());
        let (nc, nd) = (self.nc(), self.nd());
        match axis {
            Axis::Row => {
                for &r in &self.rows {
                    for k in 0..nd {
                        let row = buf.span_mut(self.layout.row(r, k));
                        self.row_plan.run(direction, row, &mut self.scratch);
                    }
                }
            }
            Axis::Column => {
                let line_buf = &mut self.line[..self.layout.nr()];
                for &c in &self.cols {
                    for k in 0..nd {
                        let line = self.layout.column(c, k);
                        buf.gather(&line, line_buf);
                        self.col_plan.run(direction, line_buf, &mut self.scratch);
                        buf.scatter(&line, line_buf);
                    }
                }
            }
            Axis::Depth => {
                let line_buf = &mut self.line[..nd];
                for &r in &self.rows {
                    for c in 0..nc {
                        let line = self.layout.depth_line(r, c);
                        buf.gather(&line, line_buf);
                        self.depth_plan.run(direction, line_buf, &mut self.scratch);
                        buf.scatter(&line, line_buf);
                    }
                }
            }
        }
    }
}

impl<T: FftNum> SeparableFft<T> for Fft3<T> {
    fn len(&self) -> usize {
        self.layout.len()
    }

    fn fft(&mut self, data: &mut [Complex<T>]) -> Result<()> {
        Fft3::fft(self, data)
    }

    fn ifft(&mut self, data: &mut [Complex<T>]) -> Result<()> {
        Fft3::ifft(self, data)
    }
}

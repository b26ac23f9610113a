//! Two-dimensional transform over a row-major buffer.

use num_complex::Complex;
use num_traits::Zero;
use rustfft::{FftNum, FftPlanner};

use crate::axis::{line_set, Axis, SeparableFft, AXES_2D};
use crate::freq::bin_frequency;
use crate::index::Layout2;
use crate::plan::{AxisPlan, Direction};
use crate::shared::SharedBuffer;
use crate::{FftError, Result};

/// 2D FFT of an `nr x nc` row-major buffer, `A(i, j) = data[i * nc + j]`.
///
/// The transform runs a row pass followed by a column pass. Each pass only
/// visits the lines in the engine's row and column sets, which default to the
/// full axes; [`restrict`](Self::restrict) narrows them, which is how
/// [`Fft2Par`](crate::Fft2Par) assigns work to shards.
pub struct Fft2<T: FftNum> {
    layout: Layout2,
    row_plan: AxisPlan<T>,
    col_plan: AxisPlan<T>,
    rows: Vec<usize>,
    cols: Vec<usize>,
    line: Vec<Complex<T>>,
    scratch: Vec<Complex<T>>,
}

impl<T: FftNum> Fft2<T> {
    /// Plan a transform for `nr` rows and `nc` columns.
    pub fn new(nr: usize, nc: usize) -> Result<Self> {
        let mut planner = FftPlanner::new();
        Self::with_planner(&mut planner, nr, nc)
    }

    /// Plan a transform reusing the plans cached in `planner`.
    pub fn with_planner(planner: &mut FftPlanner<T>, nr: usize, nc: usize) -> Result<Self> {
        let layout = Layout2::new(nr, nc)?;
        let row_plan = AxisPlan::new(planner, nc);
        let col_plan = AxisPlan::new(planner, nr);
        let scratch_len = row_plan.scratch_len().max(col_plan.scratch_len());
        tracing::debug!(nr, nc, "planned 2D transform");
        Ok(Self {
            layout,
            row_plan,
            col_plan,
            rows: (0..nr).collect(),
            cols: (0..nc).collect(),
            line: vec![Complex::zero(); nr],
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
    pub fn layout(&self) -> Layout2 {
        self.layout
    }

    /// Rows visited by the row pass.
    #[inline]
    pub fn rows(&self) -> &[usize] {
        &self.rows
    }

    /// Columns visited by the column pass.
    #[inline]
    pub fn cols(&self) -> &[usize] {
        &self.cols
    }

    /// Replace the row and column sets.
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
    /// [`FftError::ShapeMismatch`] if `data.len() != nr * nc`.
    pub fn fft(&mut self, data: &mut [Complex<T>]) -> Result<()> {
        self.transform(data, Direction::Forward)
    }

    /// Inverse transform in place. `ifft(fft(x)) == nr * nc * x`.
    pub fn ifft(&mut self, data: &mut [Complex<T>]) -> Result<()> {
        self.transform(data, Direction::Inverse)
    }

    /// 1D transform of every row in the row set.
    pub fn row_pass(&mut self, data: &mut [Complex<T>], direction: Direction) -> Result<()> {
        self.check_len(data.len())?;
        // SAFETY: `data` is exclusively borrowed and its length was checked.
        unsafe { self.pass_shared(Axis::Row, SharedBuffer::new(data), direction) };
        Ok(())
    }

    /// 1D transform of every column in the column set.
    pub fn col_pass(&mut self, data: &mut [Complex<T>], direction: Direction) -> Result<()> {
        self.check_len(data.len())?;
        // SAFETY: `data` is exclusively borrowed and its length was checked.
        unsafe { self.pass_shared(Axis::Column, SharedBuffer::new(data), direction) };
        Ok(())
    }

    /// Normalized `(row, col)` frequency of linear index `i`.
    ///
    /// # Errors
    /// [`FftError::IndexOutOfBounds`] if `i >= nr * nc`.
    pub fn freq(&self, i: usize) -> Result<[f64; 2]> {
        if i >= self.layout.len() {
            return Err(FftError::IndexOutOfBounds {
                index: i,
                len: self.layout.len(),
            });
        }
        let (row, col) = self.layout.coords(i);
        Ok([
            bin_frequency(row, self.nr()),
            bin_frequency(col, self.nc()),
        ])
    }

    fn transform(&mut self, data: &mut [Complex<T>], direction: Direction) -> Result<()> {
        self.check_len(data.len())?;
        tracing::trace!(nr = self.nr(), nc = self.nc(), ?direction, "2D transform");
        let buf = SharedBuffer::new(data);
        for axis in AXES_2D {
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
    /// `buf.len()` must equal `nr * nc`, and while the call runs no other handle
    /// may access the rows (for [`Axis::Row`]) or columns (for [`Axis::Column`])
    /// assigned to this engine.
    pub(crate) unsafe fn pass_shared(
        &mut self,
        axis: Axis,
        buf: SharedBuffer<'_, Complex<T>>,
        direction: Direction,
    ) {
        debug_assert_eq!(buf.len(), self.layout.len());
        match axis {
            Axis::Row => {
                for &r in &self.rows {
                    let row = buf.span_mut(self.layout.row(r));
                    self.row_plan.run(direction, row, &mut self.scratch);
                }
            }
            Axis::Column => {
                for &c in &self.cols {
                    let line = self.layout.column(c);
                    buf.gather(&line, &mut self.line);
                    self.col_plan
                        .run(direction, &mut self.line, &mut self.scratch);
                    buf.scatter(&line, &self.line);
                }
            }
            // `AXES_2D` never yields a depth pass
            Axis::Depth => debug_assert!(false, "depth pass requested on a 2D engine"),
        }
    }
}

impl<T: FftNum> SeparableFft<T> for Fft2<T> {
    fn len(&self) -> usize {
        self.layout.len()
    }

    fn fft(&mut self, data: &mut [Complex<T>]) -> Result<()> {
        Fft2::fft(self, data)
    }

    fn ifft(&mut self, data: &mut [Complex<T>]) -> Result<()> {
        Fft2::ifft(self, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cube::to_complex;
    use approx::assert_abs_diff_eq;
    use num_complex::Complex64;
    use std::f64::consts::PI;

    fn assert_close(a: Complex64, b: Complex64, tol: f64) {
        assert_abs_diff_eq!(a.re, b.re, epsilon = tol);
        assert_abs_diff_eq!(a.im, b.im, epsilon = tol);
    }

    #[test]
    fn test_two_pixels_match_closed_form() {
        #[rustfmt::skip]
        let data = [
            0.0, 0.0, 0.0, 0.0, 0.0,
            0.0, 1.0, 1.0, 0.0, 0.0,
            0.0, 0.0, 0.0, 0.0, 0.0,
            0.0, 0.0, 0.0, 0.0, 0.0,
        ];
        let mut expected = vec![Complex64::new(0.0, 0.0); 20];
        for j in 0..4 {
            for i in 0..5 {
                let e1 = Complex64::new(0.0, -0.5 * PI * j as f64).exp();
                let e2 = Complex64::new(0.0, -2.0 * PI * i as f64 / 5.0).exp();
                let e3 = Complex64::new(0.0, -4.0 * PI * i as f64 / 5.0).exp();
                expected[j * 5 + i] = e1 * (e2 + e3);
            }
        }

        let mut buf = to_complex(&data);
        let mut ft = Fft2::<f64>::new(4, 5).unwrap();
        ft.fft(&mut buf).unwrap();
        for (a, e) in buf.iter().zip(&expected) {
            assert_close(*a, *e, 1e-10);
        }

        ft.ifft(&mut buf).unwrap();
        for (a, d) in buf.iter().zip(&data) {
            assert_close(*a, Complex64::new(20.0 * d, 0.0), 1e-10);
        }
    }

    #[test]
    fn test_conjugate_pairs_have_equal_magnitude() {
        #[rustfmt::skip]
        let data = [
            1.0, -1.0, 2.0, 3.0,
            2.0, 3.0, -5.0, 1.0,
            4.0, 5.0, 6.0, 7.0,
            2.0, 1.0, 3.0, 4.0,
        ];
        let mut coeff = to_complex(&data);
        let mut ft = Fft2::<f64>::new(4, 4).unwrap();
        ft.fft(&mut coeff).unwrap();

        let mut pairs = 0;
        for i in 1..coeff.len() {
            let f1 = ft.freq(i).unwrap();
            for j in 1..coeff.len() {
                let f2 = ft.freq(j).unwrap();
                if (f1[0] + f2[0]).abs() < 1e-10 && (f1[1] + f2[1]).abs() < 1e-10 {
                    pairs += 1;
                    assert_abs_diff_eq!(coeff[i].norm(), coeff[j].norm(), epsilon = 1e-10);
                }
            }
        }
        assert_eq!(pairs, 8);
    }

    #[test]
    fn test_freq_folds_past_nyquist() {
        let ft = Fft2::<f64>::new(4, 5).unwrap();
        assert_eq!(ft.freq(0).unwrap(), [0.0, 0.0]);
        // row 2, col 3
        let f = ft.freq(13).unwrap();
        assert_abs_diff_eq!(f[0], 0.5, epsilon = 1e-15);
        assert_abs_diff_eq!(f[1], -0.4, epsilon = 1e-15);
        assert_eq!(
            ft.freq(20),
            Err(FftError::IndexOutOfBounds { index: 20, len: 20 })
        );
    }

    #[test]
    fn test_shape_mismatch_leaves_buffer_untouched() {
        let mut ft = Fft2::<f64>::new(3, 3).unwrap();
        let mut buf = vec![Complex64::new(1.0, 0.0); 8];
        assert_eq!(
            ft.fft(&mut buf),
            Err(FftError::ShapeMismatch {
                expected: 9,
                actual: 8
            })
        );
        assert!(buf.iter().all(|c| *c == Complex64::new(1.0, 0.0)));
    }

    #[test]
    fn test_restricted_row_pass_touches_only_its_rows() {
        let mut ft = Fft2::<f64>::new(3, 4).unwrap();
        ft.restrict([1], std::iter::empty()).unwrap();
        let original: Vec<Complex64> = (0..12).map(|i| Complex64::new(i as f64, 0.0)).collect();
        let mut buf = original.clone();
        ft.fft(&mut buf).unwrap();

        assert_eq!(&buf[..4], &original[..4]);
        assert_eq!(&buf[8..], &original[8..]);
        // row 1 = [4, 5, 6, 7] -> DC term 22
        assert_close(buf[4], Complex64::new(22.0, 0.0), 1e-12);
    }

    #[test]
    fn test_restrict_rejects_bad_sets_and_keeps_old_ones() {
        let mut ft = Fft2::<f64>::new(2, 3).unwrap();
        assert!(ft.restrict([0, 2], [0]).is_err());
        assert!(ft.restrict([0], [1, 1]).is_err());
        assert_eq!(ft.rows(), &[0, 1]);
        assert_eq!(ft.cols(), &[0, 1, 2]);
    }

    #[test]
    fn test_passes_compose_to_full_transform() {
        let input: Vec<Complex64> = (0..24)
            .map(|i| Complex64::new((i as f64).cos(), (i as f64 * 0.3).sin()))
            .collect();
        let mut ft = Fft2::<f64>::new(4, 6).unwrap();

        let mut full = input.clone();
        ft.fft(&mut full).unwrap();

        let mut staged = input.clone();
        ft.row_pass(&mut staged, Direction::Forward).unwrap();
        ft.col_pass(&mut staged, Direction::Forward).unwrap();

        for (a, b) in full.iter().zip(&staged) {
            assert_close(*a, *b, 1e-12);
        }
    }

    #[test]
    fn test_2d_pass_order_has_no_depth_axis() {
        assert!(!AXES_2D.contains(&Axis::Depth));
        let mut ft = Fft2::<f64>::new(2, 2).unwrap();
        let mut buf = vec![Complex64::new(1.0, 0.0); 4];
        ft.fft(&mut buf).unwrap();
        // row pass then column pass: all mass lands in the DC bin
        assert_close(buf[0], Complex64::new(4.0, 0.0), 1e-12);
        assert!(buf[1..].iter().all(|c| c.norm() < 1e-12));
    }

    #[test]
    fn test_f32_roundtrip() {
        let input: Vec<Complex<f32>> = (0..16).map(|i| Complex::new(i as f32, 0.0)).collect();
        let mut buf = input.clone();
        let mut ft = Fft2::<f32>::new(4, 4).unwrap();
        ft.fft(&mut buf).unwrap();
        ft.ifft(&mut buf).unwrap();
        for (a, b) in buf.iter().zip(&input) {
            assert_abs_diff_eq!(a.re, 16.0 * b.re, epsilon = 1e-2);
            assert_abs_diff_eq!(a.im, 0.0, epsilon = 1e-2);
        }
    }
}

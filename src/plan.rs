//! One-dimensional transform plans backed by `rustfft`.

use std::sync::Arc;

use num_complex::Complex;
use num_traits::Zero;
use rustfft::{Fft, FftNum, FftPlanner};

use crate::freq::bin_frequency;
use crate::{FftError, Result};

/// Direction of a 1D pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Coefficients from a sequence (`exp(-2πi kn/L)` kernel).
    Forward,
    /// Sequence from coefficients, without the `1/L` factor.
    Inverse,
}

/// Forward and inverse `rustfft` plans for one axis length.
///
/// Both directions are unnormalized: running `Forward` then `Inverse` scales the
/// line by its length.
#[derive(Clone)]
pub struct AxisPlan<T: FftNum> {
    forward: Arc<dyn Fft<T>>,
    inverse: Arc<dyn Fft<T>>,
}

impl<T: FftNum> AxisPlan<T> {
    /// Plan both directions for `len` points. Plans are cached by `planner`, so
    /// axes of equal length share them.
    pub fn new(planner: &mut FftPlanner<T>, len: usize) -> Self {
        Self {
            forward: planner.plan_fft_forward(len),
            inverse: planner.plan_fft_inverse(len),
        }
    }

    /// Number of points per line.
    #[inline]
    pub fn len(&self) -> usize {
        self.forward.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Scratch length sufficient for in-place processing in either direction.
    pub fn scratch_len(&self) -> usize {
        self.forward
            .get_inplace_scratch_len()
            .max(self.inverse.get_inplace_scratch_len())
    }

    /// Transform `line` in place.
    ///
    /// # Errors
    /// [`FftError::ShapeMismatch`] if `line.len()` differs from [`len`](Self::len)
    /// or `scratch` is shorter than [`scratch_len`](Self::scratch_len). Neither
    /// buffer is touched on error.
    pub fn process(
        &self,
        direction: Direction,
        line: &mut [Complex<T>],
        scratch: &mut [Complex<T>],
    ) -> Result<()> {
        if line.len() != self.len() {
            return Err(FftError::ShapeMismatch {
                expected: self.len(),
                actual: line.len(),
            });
        }
        let needed = self.scratch_len();
        if scratch.len() < needed {
            return Err(FftError::ShapeMismatch {
                expected: needed,
                actual: scratch.len(),
            });
        }
        self.run(direction, line, scratch);
        Ok(())
    }

    /// [`process`](Self::process) for callers that sized both buffers from this
    /// plan.
    #[inline]
    pub(crate) fn run(
        &self,
        direction: Direction,
        line: &mut [Complex<T>],
        scratch: &mut [Complex<T>],
    ) {
        debug_assert_eq!(line.len(), self.len());
        let fft = match direction {
            Direction::Forward => &self.forward,
            Direction::Inverse => &self.inverse,
        };
        fft.process_with_scratch(line, &mut scratch[..fft.get_inplace_scratch_len()]);
    }
}

/// Real-input 1D transform of fixed length `n`.
///
/// [`fft`](Self::fft) returns the `n/2 + 1` coefficients of the non-negative
/// frequencies; [`ifft`](Self::ifft) restores the `n` real samples, scaled by `n`.
pub struct Fft1<T: FftNum> {
    plan: AxisPlan<T>,
    buffer: Vec<Complex<T>>,
    scratch: Vec<Complex<T>>,
}

impl<T: FftNum> Fft1<T> {
    /// Plan a transform of `n` samples.
    pub fn new(n: usize) -> Result<Self> {
        if n == 0 {
            return Err(FftError::InvalidShape(
                "transform length must be greater than zero",
            ));
        }
        let mut planner = FftPlanner::new();
        let plan = AxisPlan::new(&mut planner, n);
        let scratch = vec![Complex::zero(); plan.scratch_len()];
        tracing::debug!(n, "planned 1D real transform");
        Ok(Self {
            plan,
            buffer: vec![Complex::zero(); n],
            scratch,
        })
    }

    /// Number of real samples.
    #[inline]
    pub fn len(&self) -> usize {
        self.plan.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.plan.is_empty()
    }

    /// Number of coefficients returned by [`fft`](Self::fft).
    #[inline]
    pub fn spectrum_len(&self) -> usize {
        self.len() / 2 + 1
    }

    /// Forward transform of `data`, which must hold exactly `n` samples.
    pub fn fft(&mut self, data: &[T]) -> Result<Vec<Complex<T>>> {
        if data.len() != self.len() {
            return Err(FftError::ShapeMismatch {
                expected: self.len(),
                actual: data.len(),
            });
        }
        for (slot, &x) in self.buffer.iter_mut().zip(data) {
            *slot = Complex::new(x, T::zero());
        }
        self.plan
            .run(Direction::Forward, &mut self.buffer, &mut self.scratch);
        Ok(self.buffer[..self.spectrum_len()].to_vec())
    }

    /// Inverse transform of a half spectrum of `n/2 + 1` coefficients.
    ///
    /// The missing negative frequencies are the complex conjugates of the given
    /// ones. The imaginary parts of the DC term and, for even `n`, the Nyquist term
    /// are ignored.
    pub fn ifft(&mut self, coeff: &[Complex<T>]) -> Result<Vec<T>> {
        let n = self.len();
        if coeff.len() != self.spectrum_len() {
            return Err(FftError::ShapeMismatch {
                expected: self.spectrum_len(),
                actual: coeff.len(),
            });
        }
        self.buffer[..coeff.len()].copy_from_slice(coeff);
        for k in coeff.len()..n {
            self.buffer[k] = coeff[n - k].conj();
        }
        self.buffer[0].im = T::zero();
        if n % 2 == 0 {
            self.buffer[n / 2].im = T::zero();
        }
        self.plan
            .run(Direction::Inverse, &mut self.buffer, &mut self.scratch);
        Ok(self.buffer.iter().map(|c| c.re).collect())
    }

    /// Frequency of coefficient `i` for unit sample spacing.
    #[inline]
    pub fn freq(&self, i: usize) -> f64 {
        bin_frequency(i, self.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use num_complex::Complex64;

    #[test]
    fn test_two_impulses_length_eight() {
        let mut ft = Fft1::<f64>::new(8).unwrap();
        let mut data = vec![0.0; 8];
        data[0] = 1.0;
        data[2] = 1.0;

        let coeff = ft.fft(&data).unwrap();
        let expected = [
            Complex64::new(2.0, 0.0),
            Complex64::new(1.0, -1.0),
            Complex64::new(0.0, 0.0),
            Complex64::new(1.0, 1.0),
            Complex64::new(2.0, 0.0),
        ];
        assert_eq!(coeff.len(), expected.len());
        for (c, e) in coeff.iter().zip(&expected) {
            assert_abs_diff_eq!(c.re, e.re, epsilon = 1e-10);
            assert_abs_diff_eq!(c.im, e.im, epsilon = 1e-10);
        }

        let inv = ft.ifft(&coeff).unwrap();
        for (x, d) in inv.iter().zip(&data) {
            assert_abs_diff_eq!(*x, 8.0 * d, epsilon = 1e-10);
        }

        let freqs: Vec<f64> = (0..5).map(|i| ft.freq(i)).collect();
        let expected_freqs = [0.0, 1.0 / 8.0, 1.0 / 4.0, 3.0 / 8.0, 1.0 / 2.0];
        for (f, e) in freqs.iter().zip(&expected_freqs) {
            assert_abs_diff_eq!(*f, *e, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_odd_length_roundtrip() {
        let mut ft = Fft1::<f64>::new(7).unwrap();
        let data = [0.5, -1.0, 2.0, 3.5, 0.0, -2.25, 1.0];
        let coeff = ft.fft(&data).unwrap();
        assert_eq!(coeff.len(), 4);
        let inv = ft.ifft(&coeff).unwrap();
        for (x, d) in inv.iter().zip(&data) {
            assert_abs_diff_eq!(*x, 7.0 * d, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_length_checks() {
        let mut ft = Fft1::<f64>::new(4).unwrap();
        assert_eq!(
            ft.fft(&[1.0, 2.0]),
            Err(FftError::ShapeMismatch {
                expected: 4,
                actual: 2
            })
        );
        assert_eq!(
            ft.ifft(&[Complex64::new(1.0, 0.0); 4]),
            Err(FftError::ShapeMismatch {
                expected: 3,
                actual: 4
            })
        );
        assert!(matches!(
            Fft1::<f64>::new(0),
            Err(FftError::InvalidShape(_))
        ));
    }

    #[test]
    fn test_axis_plan_roundtrip_scales_by_len() {
        let mut planner = FftPlanner::<f64>::new();
        let plan = AxisPlan::new(&mut planner, 6);
        assert_eq!(plan.len(), 6);
        let original: Vec<Complex64> = (0..6)
            .map(|i| Complex64::new(i as f64, (i as f64).sin()))
            .collect();
        let mut line = original.clone();
        let mut scratch = vec![Complex64::new(0.0, 0.0); plan.scratch_len()];
        plan.process(Direction::Forward, &mut line, &mut scratch)
            .unwrap();
        plan.process(Direction::Inverse, &mut line, &mut scratch)
            .unwrap();
        for (a, b) in line.iter().zip(&original) {
            assert_abs_diff_eq!(a.re, 6.0 * b.re, epsilon = 1e-10);
            assert_abs_diff_eq!(a.im, 6.0 * b.im, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_axis_plan_rejects_wrong_buffers() {
        let mut planner = FftPlanner::<f64>::new();
        let plan = AxisPlan::new(&mut planner, 4);
        let mut scratch = vec![Complex64::new(0.0, 0.0); plan.scratch_len()];

        let original: Vec<Complex64> = (0..8).map(|i| Complex64::new(i as f64, 0.0)).collect();
        let mut line = original.clone();
        assert_eq!(
            plan.process(Direction::Forward, &mut line, &mut scratch),
            Err(FftError::ShapeMismatch {
                expected: 4,
                actual: 8
            })
        );
        assert_eq!(line, original);

        let mut planner = FftPlanner::<f64>::new();
        // a large prime needs scratch
        let plan = AxisPlan::new(&mut planner, 97);
        let needed = plan.scratch_len();
        if needed > 0 {
            let mut line = vec![Complex64::new(1.0, 0.0); 97];
            let mut short = vec![Complex64::new(0.0, 0.0); needed - 1];
            assert_eq!(
                plan.process(Direction::Inverse, &mut line, &mut short),
                Err(FftError::ShapeMismatch {
                    expected: needed,
                    actual: needed - 1
                })
            );
        }
    }
}

//! Separable multi-dimensional FFTs over flat strided buffers.
//!
//! This crate computes 2D and 3D discrete Fourier transforms by applying a 1D
//! transform (provided by [`rustfft`]) along every axis of a flattened array.
//! Rows are contiguous and are transformed in place; columns and depth lines are
//! gathered through strided access into a scratch line, transformed, and
//! scattered back.
//!
//! # Core Types
//!
//! - [`Fft2`] / [`Fft3`]: serial engines for row-major 2D and depth-major 3D buffers
//! - [`Fft2Par`] / [`Fft3Par`]: sharded engines that run every axis pass across a
//!   fixed number of workers with a barrier between axes
//! - [`Fft1`]: real-input 1D transform returning the `n/2 + 1` half spectrum
//! - [`DenseCube`]: owned depth-major 3D array
//!
//! # Layouts
//!
//! - 2D, row-major: `A(i, j) = data[i * nc + j]`
//! - 3D, depth-major: `A(i, j, k) = data[k * nr * nc + i * nc + j]`
//!
//! # Normalization
//!
//! Every transform is unnormalized: `ifft(fft(x)) == N * x` where `N` is the
//! number of elements. Dividing by `N` is left to the caller.
//!
//! # Example
//!
//! ```rust
//! use num_complex::Complex64;
//! use strided_fft::{Fft2, Fft2Par};
//!
//! let (nr, nc) = (4, 6);
//! let input: Vec<Complex64> = (0..nr * nc).map(|i| Complex64::new(i as f64, 0.0)).collect();
//!
//! let mut serial = input.clone();
//! Fft2::<f64>::new(nr, nc).unwrap().fft(&mut serial).unwrap();
//!
//! let mut parallel = input.clone();
//! Fft2Par::<f64>::new(nr, nc, 2).unwrap().fft(&mut parallel).unwrap();
//!
//! for (a, b) in serial.iter().zip(&parallel) {
//!     assert!((a - b).norm() < 1e-10);
//! }
//! ```
//!
//! # Centering
//!
//! [`center2`] and [`center3`] swap the halves of every axis so that the
//! zero-frequency bin lands in the middle of the array. They work on anything
//! implementing [`DenseArray`].

pub mod axis;
pub mod center;
mod cube;
mod fft2;
mod fft3;
pub mod freq;
pub mod index;
#[cfg(feature = "ndarray")]
mod ndarray_impl;
pub mod parallel;
mod plan;
mod shared;
pub mod strided;

// ============================================================================
// Engines
// ============================================================================
pub use axis::{Axis, SeparableFft, AXES_2D, AXES_3D};
pub use fft2::Fft2;
pub use fft3::Fft3;
pub use parallel::{partition, Fft2Par, Fft3Par};
pub use plan::{AxisPlan, Direction, Fft1};

// ============================================================================
// Index mapping, strided access and frequencies
// ============================================================================
pub use freq::{bin_frequency, fftfreq};
pub use index::{checked_prod, prod, Layout2, Layout3};
pub use strided::{extract, extract_into, insert, StridedLine};

// ============================================================================
// Containers and centering
// ============================================================================
pub use center::{center, center2, center3, DenseArray, RowMajorMut};
pub use cube::{to_complex, DenseCube};

// ============================================================================
// Error types
// ============================================================================

/// Errors that can occur while planning or running a transform.
///
/// Every variant is a precondition violation detected before the caller's
/// buffer is touched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FftError {
    /// Buffer length does not equal the product of the configured dimensions.
    #[error("shape mismatch: expected {expected} elements, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    /// Worker count does not evenly divide an axis length.
    #[error("cannot partition {axis:?} axis of length {len} across {workers} workers")]
    InvalidPartition {
        axis: Axis,
        len: usize,
        workers: usize,
    },

    /// Stride 0 was requested for strided access.
    #[error("invalid stride 0")]
    ZeroStride,

    /// Container backing buffer does not match the declared shape.
    #[error("dimension mismatch: shape holds {expected} elements, data has {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Shape or worker count is degenerate.
    #[error("invalid shape: {0}")]
    InvalidShape(&'static str),

    /// A strided line would reach past the end of the buffer.
    #[error("offset {offset} out of bounds for buffer of length {len}")]
    OffsetOverflow { offset: usize, len: usize },

    /// A line index lies outside its axis.
    #[error("{axis:?} index {index} out of bounds for axis of length {len}")]
    LineOutOfBounds {
        axis: Axis,
        index: usize,
        len: usize,
    },

    /// A line index appears twice in a restriction set.
    #[error("{axis:?} index {index} listed more than once")]
    DuplicateLine { axis: Axis, index: usize },

    /// Centering requires even axis lengths.
    #[error("cannot center axis {axis} of odd length {len}")]
    OddAxisLength { axis: usize, len: usize },

    /// Linear index outside the transformed array.
    #[error("index {index} out of bounds for array of length {len}")]
    IndexOutOfBounds { index: usize, len: usize },
}

/// Result type for transform operations.
pub type Result<T> = std::result::Result<T, FftError>;

//! Owned depth-major 3D array.

use num_complex::Complex;
use num_traits::{Num, Zero};

use crate::center::DenseArray;
use crate::index::Layout3;
use crate::{FftError, Result};

/// Promote real samples to complex values with zero imaginary part.
pub fn to_complex<T: Num + Copy>(data: &[T]) -> Vec<Complex<T>> {
    data.iter().map(|&x| Complex::new(x, T::zero())).collect()
}

/// Dense `nr x nc x nd` array stored depth-major,
/// `A(i, j, k) = data[k * nr * nc + i * nc + j]`.
///
/// This is the layout [`Fft3`](crate::Fft3) and [`Fft3Par`](crate::Fft3Par) expect,
/// so [`as_mut_slice`](Self::as_mut_slice) can be handed to them directly.
#[derive(Debug, Clone, PartialEq)]
pub struct DenseCube<T> {
    layout: Layout3,
    data: Vec<T>,
}

impl<T: Zero + Clone> DenseCube<T> {
    /// Zero-filled cube.
    pub fn new(nr: usize, nc: usize, nd: usize) -> Result<Self> {
        let layout = Layout3::new(nr, nc, nd)?;
        Ok(Self {
            layout,
            data: vec![T::zero(); layout.len()],
        })
    }
}

impl<T> DenseCube<T> {
    /// Wrap an existing depth-major buffer.
    ///
    /// # Errors
    /// [`FftError::DimensionMismatch`] if `data.len() != nr * nc * nd`.
    pub fn from_vec(nr: usize, nc: usize, nd: usize, data: Vec<T>) -> Result<Self> {
        let layout = Layout3::new(nr, nc, nd)?;
        if data.len() != layout.len() {
            return Err(FftError::DimensionMismatch {
                expected: layout.len(),
                actual: data.len(),
            });
        }
        Ok(Self { layout, data })
    }

    /// `[nr, nc, nd]`.
    #[inline]
    pub fn dims(&self) -> [usize; 3] {
        [self.layout.nr(), self.layout.nc(), self.layout.nd()]
    }

    #[inline]
    pub fn layout(&self) -> Layout3 {
        self.layout
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Element `(i, j, k)`, or `None` outside the cube.
    pub fn get(&self, i: usize, j: usize, k: usize) -> Option<&T> {
        let [nr, nc, nd] = self.dims();
        if i >= nr || j >= nc || k >= nd {
            return None;
        }
        self.data.get(self.layout.index(i, j, k))
    }

    pub fn get_mut(&mut self, i: usize, j: usize, k: usize) -> Option<&mut T> {
        let [nr, nc, nd] = self.dims();
        if i >= nr || j >= nc || k >= nd {
            return None;
        }
        let idx = self.layout.index(i, j, k);
        self.data.get_mut(idx)
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }
}

impl<T: Copy> DenseCube<T> {
    /// Element `(i, j, k)`.
    ///
    /// # Panics
    /// If any coordinate is outside the cube.
    #[inline]
    pub fn at(&self, i: usize, j: usize, k: usize) -> T {
        self.check(i, j, k);
        self.data[self.layout.index(i, j, k)]
    }

    /// Overwrite element `(i, j, k)`.
    ///
    /// # Panics
    /// If any coordinate is outside the cube.
    #[inline]
    pub fn set(&mut self, i: usize, j: usize, k: usize, value: T) {
        self.check(i, j, k);
        let idx = self.layout.index(i, j, k);
        self.data[idx] = value;
    }

    #[inline]
    fn check(&self, i: usize, j: usize, k: usize) {
        let [nr, nc, nd] = self.dims();
        assert!(
            i < nr && j < nc && k < nd,
            "index ({i}, {j}, {k}) out of bounds for cube {nr}x{nc}x{nd}"
        );
    }
}

impl<T: Num + Copy> DenseCube<T> {
    /// Complex copy of a real cube, ready for a forward transform.
    pub fn to_complex(&self) -> DenseCube<Complex<T>> {
        DenseCube {
            layout: self.layout,
            data: to_complex(&self.data),
        }
    }
}

impl<T: Copy> DenseArray<3> for DenseCube<T> {
    type Elem = T;

    fn dims(&self) -> [usize; 3] {
        DenseCube::dims(self)
    }

    fn at(&self, [i, j, k]: [usize; 3]) -> T {
        DenseCube::at(self, i, j, k)
    }

    fn set(&mut self, [i, j, k]: [usize; 3], value: T) {
        DenseCube::set(self, i, j, k, value)
    }
}

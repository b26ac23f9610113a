//! [`DenseArray`] for `ndarray` arrays, so owned arrays and mutable views can be
//! centered directly.

use ndarray::{ArrayBase, DataMut, Ix2, Ix3};

use crate::center::DenseArray;

impl<S, T> DenseArray<2> for ArrayBase<S, Ix2>
where
    S: DataMut<Elem = T>,
    T: Copy,
{
    type Elem = T;

    fn dims(&self) -> [usize; 2] {
        let (nr, nc) = self.dim();
        [nr, nc]
    }

    fn at(&self, [i, j]: [usize; 2]) -> T {
        self[[i, j]]
    }

    fn set(&mut self, [i, j]: [usize; 2], value: T) {
        self[[i, j]] = value;
    }
}

/// Axes are taken as `[row, col, depth]`, matching [`DenseCube`](crate::DenseCube).
impl<S, T> DenseArray<3> for ArrayBase<S, Ix3>
where
    S: DataMut<Elem = T>,
    T: Copy,
{
    type Elem = T;

    fn dims(&self) -> [usize; 3] {
        let (nr, nc, nd) = self.dim();
        [nr, nc, nd]
    }

    fn at(&self, [i, j, k]: [usize; 3]) -> T {
        self[[i, j, k]]
    }

    fn set(&mut self, [i, j, k]: [usize; 3], value: T) {
        self[[i, j, k]] = value;
    }
}

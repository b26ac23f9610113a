//! Sharded engines that split every axis pass across a fixed number of workers.
//!
//! A transform runs as a sequence of phases, one per axis. Within a phase each
//! shard transforms only its own lines, so the shards write disjoint parts of the
//! shared buffer. A phase finishes only when every shard has finished; the next
//! axis never starts early.
//!
//! With the `parallel` feature (default) each phase spawns one rayon task per
//! shard inside a `rayon::scope`, and leaving the scope is the barrier. Without
//! it the shards run one after another, which produces the same result.

use std::ops::Range;

use num_complex::Complex;
use rustfft::{FftNum, FftPlanner};

use crate::axis::{Axis, SeparableFft, AXES_2D, AXES_3D};
use crate::fft2::Fft2;
use crate::fft3::Fft3;
use crate::plan::Direction;
use crate::shared::SharedBuffer;
use crate::{FftError, Result};

/// Split `0..len` into `workers` contiguous slices of equal length.
///
/// Slice `w` is `w * len / workers .. (w + 1) * len / workers`.
///
/// # Errors
/// - [`FftError::InvalidShape`] if `workers == 0`
/// - [`FftError::InvalidPartition`] if `len` is not a multiple of `workers`
pub fn partition(axis: Axis, len: usize, workers: usize) -> Result<Vec<Range<usize>>> {
    if workers == 0 {
        return Err(FftError::InvalidShape(
            "worker count must be greater than zero",
        ));
    }
    if len % workers != 0 {
        return Err(FftError::InvalidPartition { axis, len, workers });
    }
    let chunk = len / workers;
    Ok((0..workers).map(|w| w * chunk..(w + 1) * chunk).collect())
}

/// One shard's share of an axis pass.
trait Shard<T: FftNum>: Send {
    /// # Safety
    /// Same contract as the engine's `pass_shared`: the lines this shard owns for
    /// `axis` must not be touched by anyone else while the call runs.
    unsafe fn pass(
        &mut self,
        axis: Axis,
        buf: SharedBuffer<'_, Complex<T>>,
        direction: Direction,
    );
}

impl<T: FftNum> Shard<T> for Fft2<T> {
    unsafe fn pass(
        &mut self,
        axis: Axis,
        buf: SharedBuffer<'_, Complex<T>>,
        direction: Direction,
    ) {
        self.pass_shared(axis, buf, direction)
    }
}

impl<T: FftNum> Shard<T> for Fft3<T> {
    unsafe fn pass(
        &mut self,
        axis: Axis,
        buf: SharedBuffer<'_, Complex<T>>,
        direction: Direction,
    ) {
        self.pass_shared(axis, buf, direction)
    }
}

/// Run every axis phase over `shards`, with a barrier after each phase.
///
/// The caller must have validated `data.len()` against the shard shape and
/// configured the shards with pairwise disjoint line sets.
fn run_phases<T, S>(
    shards: &mut [S],
    axes: &[Axis],
    data: &mut [Complex<T>],
    direction: Direction,
) where
    T: FftNum,
    S: Shard<T>,
{
    let buf = SharedBuffer::new(data);
    for &axis in axes {
        tracing::trace!(?axis, ?direction, workers = shards.len(), "axis phase");
        run_phase(shards, axis, buf, direction);
    }
}

#[cfg(feature = "parallel")]
fn run_phase<T, S>(
    shards: &mut [S],
    axis: Axis,
    buf: SharedBuffer<'_, Complex<T>>,
    direction: Direction,
) where
    T: FftNum,
    S: Shard<T>,
{
    rayon::scope(|s| {
        for shard in shards.iter_mut() {
            // SAFETY: shards own disjoint row and column sets, and a shard only
            // touches its own lines for `axis`. All tasks join before the scope
            // returns, so no task overlaps the next phase.
            s.spawn(move |_| unsafe { shard.pass(axis, buf, direction) });
        }
    });
}

#[cfg(not(feature = "parallel"))]
fn run_phase<T, S>(
    shards: &mut [S],
    axis: Axis,
    buf: SharedBuffer<'_, Complex<T>>,
    direction: Direction,
) where
    T: FftNum,
    S: Shard<T>,
{
    for shard in shards.iter_mut() {
        // SAFETY: shards run one at a time on disjoint lines.
        unsafe { shard.pass(axis, buf, direction) };
    }
}

/// 2D transform split across `workers` shards.
///
/// Shard `w` owns rows `w * nr / W .. (w + 1) * nr / W` and the matching slice of
/// columns. The result equals [`Fft2`] on the same input.
pub struct Fft2Par<T: FftNum> {
    shards: Vec<Fft2<T>>,
}

impl<T: FftNum> Fft2Par<T> {
    /// # Errors
    /// [`FftError::InvalidPartition`] unless `workers` divides both `nr` and `nc`.
    pub fn new(nr: usize, nc: usize, workers: usize) -> Result<Self> {
        let rows = partition(Axis::Row, nr, workers)?;
        let cols = partition(Axis::Column, nc, workers)?;
        let mut planner = FftPlanner::new();
        let mut shards = Vec::with_capacity(workers);
        for (r, c) in rows.into_iter().zip(cols) {
            let mut shard = Fft2::with_planner(&mut planner, nr, nc)?;
            shard.restrict(r, c)?;
            shards.push(shard);
        }
        tracing::debug!(nr, nc, workers, "planned sharded 2D transform");
        Ok(Self { shards })
    }

    /// Number of shards.
    #[inline]
    pub fn workers(&self) -> usize {
        self.shards.len()
    }

    #[inline]
    pub fn nr(&self) -> usize {
        self.shards[0].nr()
    }

    #[inline]
    pub fn nc(&self) -> usize {
        self.shards[0].nc()
    }

    pub fn fft(&mut self, data: &mut [Complex<T>]) -> Result<()> {
        self.transform(data, Direction::Forward)
    }

    pub fn ifft(&mut self, data: &mut [Complex<T>]) -> Result<()> {
        self.transform(data, Direction::Inverse)
    }

    /// Same as [`Fft2::freq`].
    pub fn freq(&self, i: usize) -> Result<[f64; 2]> {
        self.shards[0].freq(i)
    }

    fn transform(&mut self, data: &mut [Complex<T>], direction: Direction) -> Result<()> {
        self.shards[0].check_len(data.len())?;
        run_phases(&mut self.shards, &AXES_2D, data, direction);
        Ok(())
    }
}

impl<T: FftNum> SeparableFft<T> for Fft2Par<T> {
    fn len(&self) -> usize {
        self.shards[0].layout().len()
    }

    fn fft(&mut self, data: &mut [Complex<T>]) -> Result<()> {
        Fft2Par::fft(self, data)
    }

    fn ifft(&mut self, data: &mut [Complex<T>]) -> Result<()> {
        Fft2Par::ifft(self, data)
    }
}

/// 3D transform split across `workers` shards.
///
/// Rows and columns are partitioned as in [`Fft2Par`]. In the depth phase shard
/// `w` transforms the depth lines of its own rows, across every column.
pub struct Fft3Par<T: FftNum> {
    shards: Vec<Fft3<T>>,
}

impl<T: FftNum> Fft3Par<T> {
    /// # Errors
    /// [`FftError::InvalidPartition`] unless `workers` divides both `nr` and `nc`.
    /// The depth axis is never split.
    pub fn new(nr: usize, nc: usize, nd: usize, workers: usize) -> Result<Self> {
        let rows = partition(Axis::Row, nr, workers)?;
        let cols = partition(Axis::Column, nc, workers)?;
        let mut planner = FftPlanner::new();
        let mut shards = Vec::with_capacity(workers);
        for (r, c) in rows.into_iter().zip(cols) {
            let mut shard = Fft3::with_planner(&mut planner, nr, nc, nd)?;
            shard.restrict(r, c)?;
            shards.push(shard);
        }
        tracing::debug!(nr, nc, nd, workers, "planned sharded 3D transform");
        Ok(Self { shards })
    }

    #[inline]
    pub fn workers(&self) -> usize {
        self.shards.len()
    }

    #[inline]
    pub fn nr(&self) -> usize {
        self.shards[0].nr()
    }

    #[inline]
    pub fn nc(&self) -> usize {
        self.shards[0].nc()
    }

    #[inline]
    pub fn nd(&self) -> usize {
        self.shards[0].nd()
    }

    pub fn fft(&mut self, data: &mut [Complex<T>]) -> Result<()> {
        self.transform(data, Direction::Forward)
    }

    pub fn ifft(&mut self, data: &mut [Complex<T>]) -> Result<()> {
        self.transform(data, Direction::Inverse)
    }

    /// Same as [`Fft3::freq`].
    pub fn freq(&self, i: usize) -> Result<[f64; 3]> {
        self.shards[0].freq(i)
    }

    fn transform(&mut self, data: &mut [Complex<T>], direction: Direction) -> Result<()> {
        self.shards[0].check_len(data.len())?;
        run_phases(&mut self.shards, &AXES_3D, data, direction);
        Ok(())
    }
}

impl<T: FftNum> SeparableFft<T> for Fft3Par<T> {
    fn len(&self) -> usize {
        self.shards[0].layout().len()
    }

    fn fft(&mut self, data: &mut [Complex<T>]) -> Result<()> {
        Fft3Par::fft(self, data)
    }

    fn ifft(&mut self, data: &mut [Complex<T>]) -> Result<()> {
        Fft3Par::ifft(self, data)
    }
}

//! Shared access to one buffer from several shards.
//!
//! During a parallel axis pass every shard works on its own set of lines. The
//! lines of different shards never overlap, so the shards can mutate the same
//! buffer without locks. [`SharedBuffer`] carries the buffer pointer across
//! threads; the disjointness is the caller's obligation.

use std::marker::PhantomData;
use std::ops::Range;

use crate::strided::StridedLine;

/// A raw pointer wrapper that is `Send` + `Sync`.
///
/// # Safety
/// The caller must guarantee that the pointed-to data is valid for the
/// lifetime of any parallel operation and that no data races occur
/// (different threads write to disjoint regions).
pub(crate) struct SendPtr<T>(pub(crate) *mut T);

impl<T> Clone for SendPtr<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for SendPtr<T> {}

unsafe impl<T> Send for SendPtr<T> {}
unsafe impl<T> Sync for SendPtr<T> {}

impl<T> SendPtr<T> {
    #[inline]
    pub(crate) fn as_ptr(self) -> *mut T {
        self.0
    }
}

/// A buffer borrowed mutably for `'a` and handed to several shards at once.
///
/// Created from an exclusive borrow, so no one outside the shards can observe the
/// buffer while a handle is alive.
pub(crate) struct SharedBuffer<'a, T> {
    ptr: SendPtr<T>,
    len: usize,
    _borrow: PhantomData<&'a mut [T]>,
}

impl<T> Clone for SharedBuffer<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for SharedBuffer<'_, T> {}

impl<'a, T: Copy> SharedBuffer<'a, T> {
    pub(crate) fn new(data: &'a mut [T]) -> Self {
        Self {
            ptr: SendPtr(data.as_mut_ptr()),
            len: data.len(),
            _borrow: PhantomData,
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// Mutable view of a contiguous span.
    ///
    /// # Safety
    /// `range` must be in bounds, and no other live reference (from this or any
    /// other handle) may overlap it.
    #[inline]
    pub(crate) unsafe fn span_mut(&self, range: Range<usize>) -> &mut [T] {
        debug_assert!(range.start <= range.end && range.end <= self.len);
        std::slice::from_raw_parts_mut(self.ptr.as_ptr().add(range.start), range.len())
    }

    /// Copy `line` into `out`.
    ///
    /// # Safety
    /// The line must be in bounds, `out.len() == line.len()`, and no other handle
    /// may write to the line concurrently.
    #[inline]
    pub(crate) unsafe fn gather(&self, line: &StridedLine, out: &mut [T]) {
        debug_assert_eq!(out.len(), line.len());
        debug_assert!(line.last().map_or(true, |o| o < self.len));
        let base = self.ptr.as_ptr();
        for (slot, o) in out.iter_mut().zip(line.offsets()) {
            *slot = base.add(o).read();
        }
    }

    /// Write `src` back onto `line`.
    ///
    /// # Safety
    /// The line must be in bounds, `src.len() == line.len()`, and no other handle
    /// may read or write the line concurrently.
    #[inline]
    pub(crate) unsafe fn scatter(&self, line: &StridedLine, src: &[T]) {
        debug_assert_eq!(src.len(), line.len());
        debug_assert!(line.last().map_or(true, |o| o < self.len));
        let base = self.ptr.as_ptr();
        for (&value, o) in src.iter().zip(line.offsets()) {
            base.add(o).write(value);
        }
    }
}

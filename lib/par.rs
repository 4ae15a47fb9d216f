//! Index-loop drivers shared by every kernel.
//!
//! A kernel describes one loop iteration as a closure of the iteration index;
//! the drivers here decide whether to run the loop sequentially or over the
//! rayon pool, and in what block shape (see
//! [`Policy::LANES`][crate::policy::Policy::LANES]).
//!
//! Kernels whose iterations write to scattered (but disjoint) amplitude
//! indices reach the array through a [`RawSlice`]: every iteration of every
//! kernel only touches the amplitudes of its own coset, so no two iterations
//! ever alias.

use std::{ iter::Sum, marker::PhantomData };
use rayon::iter::{ IntoParallelIterator, ParallelIterator };
use crate::mask::Index;

/// Unchecked shared access to a mutable slice for disjoint-index parallel
/// loops.
#[derive(Debug)]
pub(crate) struct RawSlice<'a, T> {
    ptr: *mut T,
    len: usize,
    _borrow: PhantomData<&'a mut [T]>,
}

impl<'a, T> Clone for RawSlice<'a, T> {
    fn clone(&self) -> Self { *self }
}

impl<'a, T> Copy for RawSlice<'a, T> { }

// SAFETY: all access goes through `get`/`set`, whose callers guarantee that
// no index is written by one thread while touched by another
unsafe impl<'a, T: Send> Send for RawSlice<'a, T> { }
unsafe impl<'a, T: Send> Sync for RawSlice<'a, T> { }

impl<'a, T: Copy> RawSlice<'a, T> {
    pub(crate) fn new(data: &'a mut [T]) -> Self {
        Self { ptr: data.as_mut_ptr(), len: data.len(), _borrow: PhantomData }
    }

    /// Read-only view; `set` must never be called on the result.
    pub(crate) fn from_ref(data: &'a [T]) -> Self {
        Self { ptr: data.as_ptr() as *mut T, len: data.len(), _borrow: PhantomData }
    }

    /// # Safety
    /// `i` must be in bounds and not concurrently written by another
    /// iteration.
    #[inline(always)]
    pub(crate) unsafe fn get(&self, i: Index) -> T {
        debug_assert!(i < self.len);
        *self.ptr.add(i)
    }

    /// # Safety
    /// `i` must be in bounds, exclusively owned by the calling iteration, and
    /// `self` must have been created from a mutable borrow.
    #[inline(always)]
    pub(crate) unsafe fn set(&self, i: Index, val: T) {
        debug_assert!(i < self.len);
        *self.ptr.add(i) = val;
    }
}

/// Run `f(i)` for every `i` in `0..n`, over the rayon pool if `par`.
///
/// Indices are handed out in blocks of `lanes`; callers pass a policy's
/// constant block width, so the inner loop has a fixed trip count once
/// inlined.
#[inline]
pub(crate) fn for_each<F>(n: Index, lanes: usize, par: bool, f: F)
where F: Fn(Index) + Send + Sync
{
    let n_blocks = n / lanes;
    let tail = n_blocks * lanes;
    let block = |b: Index| {
        let start = b * lanes;
        for k in 0..lanes { f(start + k); }
    };
    if par {
        (0..n_blocks).into_par_iter().for_each(block);
    } else {
        (0..n_blocks).for_each(block);
    }
    (tail..n).for_each(&f);
}

/// Sum `f(i)` over `0..n`, over the rayon pool if `par`.
///
/// The accumulation order depends on how rayon splits the range, so results
/// may differ in the last bits between sequential and parallel runs.
#[inline]
pub(crate) fn sum<T, F>(n: Index, lanes: usize, par: bool, f: F) -> T
where
    T: Send + Sum<T>,
    F: Fn(Index) -> T + Send + Sync,
{
    let n_blocks = n / lanes;
    let tail = n_blocks * lanes;
    let block = |b: Index| -> T {
        let start = b * lanes;
        (0..lanes).map(|k| f(start + k)).sum()
    };
    let body: T
        = if par {
            (0..n_blocks).into_par_iter().map(block).sum()
        } else {
            (0..n_blocks).map(block).sum()
        };
    std::iter::once(body).chain((tail..n).map(&f)).sum()
}

#[cfg(test)]
mod test {
    use super::*;
    use std::sync::atomic::{ AtomicUsize, Ordering };

    #[test]
    fn for_each_visits_every_index_once() {
        for par in [false, true] {
            let hits: Vec<AtomicUsize>
                = (0..37).map(|_| AtomicUsize::new(0)).collect();
            for_each(37, 4, par, |i| {
                hits[i].fetch_add(1, Ordering::Relaxed);
            });
            assert!(hits.iter().all(|h| h.load(Ordering::Relaxed) == 1));
        }
    }

    #[test]
    fn sum_matches_closed_form() {
        let seq: usize = sum(1000, 1, false, |i| i);
        let par: usize = sum(1000, 8, true, |i| i);
        assert_eq!(seq, 999 * 1000 / 2);
        assert_eq!(par, seq);
    }

    #[test]
    fn raw_slice_disjoint_writes() {
        let mut data = vec![0_usize; 64];
        let raw = RawSlice::new(&mut data);
        for_each(32, 1, true, |l| unsafe {
            raw.set(2 * l, l);
            raw.set(2 * l + 1, raw.get(2 * l) + 100);
        });
        assert_eq!(data[10], 5);
        assert_eq!(data[11], 105);
    }
}

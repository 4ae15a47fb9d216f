//! The kernel surface.
//!
//! All kernels are methods of [`Engine`], spread across the modules of this
//! crate by family. An engine is a zero-cost handle naming a
//! [`Policy`] together with the parallelization threshold every one of its
//! kernels consults.
//!
//! Kernels act on plain amplitude slices of length `dim` = 2<sup>*n*</sup>,
//! so they can be called on a [`State`][crate::State] or on any foreign buffer
//! with the same layout. Qubit indices, slice lengths, and matrix sizes are
//! preconditions: violating them is a logic error, caught (at most) by debug
//! assertions.

use std::marker::PhantomData;
use tracing::debug;
use crate::{
    config,
    mask::Index,
    par::{ self, RawSlice },
    policy::{ Amp, Policy },
};

/// Where a kernel reads its input and writes its output.
#[derive(Debug)]
pub enum Update<'a, T> {
    /// Overwrite the state in place.
    InPlace(&'a mut [T]),
    /// Read from `src` and write the full result into `des`, which must have
    /// the same length and be supplied (allocated) by the caller. `src` is
    /// left untouched.
    OutOfPlace { src: &'a [T], des: &'a mut [T] },
}

impl<'a, T> From<&'a mut [T]> for Update<'a, T> {
    fn from(qs: &'a mut [T]) -> Self { Self::InPlace(qs) }
}

impl<'a, T> From<&'a mut Vec<T>> for Update<'a, T> {
    fn from(qs: &'a mut Vec<T>) -> Self { Self::InPlace(qs.as_mut_slice()) }
}

impl<'a, T: Copy> Update<'a, T> {
    /// Length of the output array.
    pub fn dim(&self) -> usize {
        match self {
            Self::InPlace(qs) => qs.len(),
            Self::OutOfPlace { des, .. } => des.len(),
        }
    }

    /// Return `true` if `self` is `InPlace`.
    pub fn is_in_place(&self) -> bool { matches!(self, Self::InPlace(..)) }

    // (source, destination); both alias the same buffer when in place
    pub(crate) fn into_raw(self) -> (RawSlice<'a, T>, RawSlice<'a, T>) {
        match self {
            Self::InPlace(qs) => {
                let raw = RawSlice::new(qs);
                (raw, raw)
            },
            Self::OutOfPlace { src, des } => {
                debug_assert_eq!(src.len(), des.len(), "Update: length mismatch");
                (RawSlice::from_ref(src), RawSlice::new(des))
            },
        }
    }
}

/// Kernel handle for policy `P`.
///
/// ```
/// use statevec::{ CpuF64, Engine };
///
/// let engine: Engine<CpuF64> = Engine::new();
/// let mut qs = engine.init_state(4, true).unwrap();
/// engine.apply_h(&mut qs, &[0], &[]);
/// engine.apply_x(&mut qs, &[1], &[0]);
/// // (∣00⟩ + ∣11⟩) / √2
/// assert!((qs[3].re - std::f64::consts::FRAC_1_SQRT_2).abs() < 1e-12);
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Engine<P: Policy> {
    dim_th: usize,
    policy: PhantomData<P>,
}

impl<P: Policy> Default for Engine<P> {
    fn default() -> Self { Self::new() }
}

impl<P: Policy> Engine<P> {
    /// Create a new engine using the process-wide parallelization threshold
    /// (see [`config`]).
    pub fn new() -> Self {
        Self { dim_th: config::resolve_dim_th(P::DIM_TH), policy: PhantomData }
    }

    /// Create a new engine that parallelizes kernels on states of at least
    /// `dim_th` amplitudes.
    ///
    /// `usize::MAX` forces sequential execution; `1` parallelizes everything.
    pub fn with_dim_th(dim_th: usize) -> Self {
        debug!(policy = P::NAME, dim_th, "engine threshold override");
        Self { dim_th: dim_th.max(1), policy: PhantomData }
    }

    /// Return the parallelization threshold.
    pub fn dim_th(&self) -> usize { self.dim_th }

    /// Return the name of the policy.
    pub fn policy_name(&self) -> &'static str { P::NAME }

    #[inline]
    pub(crate) fn is_par(&self, dim: Index) -> bool { dim >= self.dim_th }

    /// Run a loop of `n` iterations over a state of dimension `dim`.
    #[inline]
    pub(crate) fn for_each<F>(&self, dim: Index, n: Index, f: F)
    where F: Fn(Index) + Send + Sync
    {
        par::for_each(n, P::LANES, self.is_par(dim), f)
    }

    /// Sum `n` loop iterations over a state of dimension `dim`.
    #[inline]
    pub(crate) fn sum<F>(&self, dim: Index, n: Index, f: F) -> Amp<P>
    where F: Fn(Index) -> Amp<P> + Send + Sync
    {
        par::sum(n, P::LANES, self.is_par(dim), f)
    }

    /// Like [`Self::sum`], but over real values.
    #[inline]
    pub(crate) fn sum_re<F>(&self, dim: Index, n: Index, f: F) -> P::Real
    where F: Fn(Index) -> P::Real + Send + Sync
    {
        par::sum(n, P::LANES, self.is_par(dim), f)
    }
}

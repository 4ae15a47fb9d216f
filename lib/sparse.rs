//! Hamiltonian-vector products.
//!
//! Two representations of an operator *H* are supported:
//! - a sum of weighted Pauli strings, applied term by term with bit masks
//!   (no matrix is ever built), and
//! - an externally constructed sparse matrix, consumed through the
//!   [`SparseOperator`] trait. [`CsrMatrix`] is a plain compressed-row
//!   implementation of it.
//!
//! Both produce a new state *H*∣ψ⟩ and leave ∣ψ⟩ untouched.

use std::ops::{ Add, Mul };
use itertools::Itertools;
use num_complex::Complex;
use num_traits::{ One, Zero };
use tracing::debug;
use crate::{
    engine::Engine,
    error::Result,
    mask::{ Index, Qubit },
    par::RawSlice,
    pauli::Pauli,
    policy::{ Amp, Policy, Real },
    state::{ try_alloc, State },
};

/// A real-weighted Pauli string, *c* ⊗<sub>*q*</sub> *P*<sub>*q*</sub>.
///
/// Qubits not listed carry the identity.
#[derive(Clone, Debug, PartialEq)]
pub struct PauliTerm<R> {
    pub word: Vec<(Qubit, Pauli)>,
    pub coeff: R,
}

impl<R> PauliTerm<R> {
    pub fn new<I>(word: I, coeff: R) -> Self
    where I: IntoIterator<Item = (Qubit, Pauli)>
    {
        let word: Vec<(Qubit, Pauli)> = word.into_iter().collect();
        debug_assert!(
            word.iter().map(|(q, _)| q).all_unique(),
            "PauliTerm: repeated qubit",
        );
        Self { word, coeff }
    }
}

// a Pauli string as (P a)_i = phase (−1)^popcount(i & sign) a_(i ^ flip)
#[derive(Copy, Clone, Debug)]
struct TermMask<R> {
    flip: Index,
    sign: Index,
    phase: Complex<R>,
}

impl<R: Real> TermMask<R> {
    fn new(term: &PauliTerm<R>) -> Self {
        let mut flip: Index = 0;
        let mut sign: Index = 0;
        let mut n_y: usize = 0;
        for (q, p) in term.word.iter() {
            if p.flips() { flip |= 1 << q; }
            if p.signs() { sign |= 1 << q; }
            if *p == Pauli::Y { n_y += 1; }
        }
        // each Y contributes −i (−1)^b
        let phase: Complex<R>
            = match n_y % 4 {
                0 => Complex::one(),
                1 => -Complex::i(),
                2 => -Complex::<R>::one(),
                _ => Complex::i(),
            };
        Self { flip, sign, phase: phase.scale(term.coeff) }
    }

    #[inline(always)]
    fn apply(&self, qs: &[Complex<R>], i: Index) -> Complex<R> {
        let a = self.phase * qs[i ^ self.flip];
        if (i & self.sign).count_ones() % 2 == 0 { a } else { -a }
    }
}

/// A square sparse operator on the amplitude index space.
pub trait SparseOperator<T>: Sync {
    /// Number of rows (and columns).
    fn dim(&self) -> Index;

    /// Product of row `row` with `vec`.
    fn row_dot(&self, row: Index, vec: &[T]) -> T;
}

/// Compressed sparse row storage.
#[derive(Clone, Debug, PartialEq)]
pub struct CsrMatrix<T> {
    dim: Index,
    indptr: Vec<usize>,
    indices: Vec<Index>,
    data: Vec<T>,
}

impl<T> CsrMatrix<T> {
    /// Wrap raw CSR arrays: the entries of row *r* are
    /// `data[indptr[r]..indptr[r + 1]]`, in the columns given by the same
    /// range of `indices`.
    ///
    /// *Panics if `indptr` does not have `dim + 1` entries or `indices` and
    /// `data` differ in length.*
    pub fn new(dim: Index, indptr: Vec<usize>, indices: Vec<Index>, data: Vec<T>) -> Self {
        assert_eq!(indptr.len(), dim + 1, "CsrMatrix: bad row pointer length");
        assert_eq!(indices.len(), data.len(), "CsrMatrix: indices/data length mismatch");
        debug_assert!(indptr.windows(2).all(|w| w[0] <= w[1]));
        debug_assert!(indices.iter().all(|c| *c < dim));
        Self { dim, indptr, indices, data }
    }

    /// Number of stored entries.
    pub fn nnz(&self) -> usize { self.data.len() }
}

impl<T> CsrMatrix<T>
where T: Copy + Add<Output = T>
{
    /// Build from `(row, column, value)` triplets in any order; repeated
    /// positions are summed.
    pub fn from_triplets<I>(dim: Index, triplets: I) -> Self
    where I: IntoIterator<Item = (Index, Index, T)>
    {
        let mut indptr: Vec<usize> = vec![0; dim + 1];
        let mut indices: Vec<Index> = Vec::new();
        let mut data: Vec<T> = Vec::new();
        let sorted
            = triplets.into_iter()
            .sorted_by_key(|(r, c, _)| (*r, *c))
            .coalesce(|(r0, c0, v0), (r1, c1, v1)| {
                if (r0, c0) == (r1, c1) {
                    Ok((r0, c0, v0 + v1))
                } else {
                    Err(((r0, c0, v0), (r1, c1, v1)))
                }
            });
        for (r, c, v) in sorted {
            indptr[r + 1] += 1;
            indices.push(c);
            data.push(v);
        }
        for r in 0..dim { indptr[r + 1] += indptr[r]; }
        Self::new(dim, indptr, indices, data)
    }
}

impl<T> SparseOperator<T> for CsrMatrix<T>
where T: Copy + Zero + Mul<Output = T> + Sync
{
    fn dim(&self) -> Index { self.dim }

    fn row_dot(&self, row: Index, vec: &[T]) -> T {
        let range = self.indptr[row]..self.indptr[row + 1];
        self.indices[range.clone()].iter()
            .zip(&self.data[range])
            .fold(T::zero(), |acc, (c, v)| acc + *v * vec[*c])
    }
}

impl<P: Policy> Engine<P> {
    /// Return *H*∣`qs`⟩ for *H* = Σ<sub>*k*</sub> `terms[k]`.
    ///
    /// An empty sum gives the zero vector.
    pub fn apply_terms(&self, qs: &[Amp<P>], terms: &[PauliTerm<P::Real>])
        -> Result<State<P>>
    {
        debug!(policy = P::NAME, n_terms = terms.len(), dim = qs.len(), "apply terms");
        let dim = qs.len();
        let masks: Vec<TermMask<P::Real>> = terms.iter().map(TermMask::new).collect();
        let mut out: Vec<Amp<P>> = try_alloc(dim)?;
        {
            let des = RawSlice::new(&mut out);
            self.for_each(dim, dim, |i| unsafe {
                let acc: Amp<P>
                    = masks.iter()
                    .fold(Complex::zero(), |acc, t| acc + t.apply(qs, i));
                des.set(i, acc);
            });
        }
        Ok(State::from_vec(out))
    }

    /// Return *A*·`vec`.
    pub fn csr_dot_vec<A>(&self, a: &A, vec: &[Amp<P>]) -> Result<State<P>>
    where A: SparseOperator<Amp<P>> + ?Sized
    {
        debug_assert_eq!(a.dim(), vec.len(), "csr_dot_vec: dimension mismatch");
        let dim = vec.len();
        let mut out: Vec<Amp<P>> = try_alloc(dim)?;
        {
            let des = RawSlice::new(&mut out);
            self.for_each(dim, dim, |i| unsafe { des.set(i, a.row_dot(i, vec)); });
        }
        Ok(State::from_vec(out))
    }

    /// Return (*A* + *B*)·`vec` without forming *A* + *B*.
    pub fn csr_dot_vec2<A, B>(&self, a: &A, b: &B, vec: &[Amp<P>]) -> Result<State<P>>
    where
        A: SparseOperator<Amp<P>> + ?Sized,
        B: SparseOperator<Amp<P>> + ?Sized,
    {
        debug_assert_eq!(a.dim(), vec.len(), "csr_dot_vec2: dimension mismatch");
        debug_assert_eq!(b.dim(), vec.len(), "csr_dot_vec2: dimension mismatch");
        let dim = vec.len();
        let mut out: Vec<Amp<P>> = try_alloc(dim)?;
        {
            let des = RawSlice::new(&mut out);
            self.for_each(dim, dim, |i| unsafe {
                des.set(i, a.row_dot(i, vec) + b.row_dot(i, vec));
            });
        }
        Ok(State::from_vec(out))
    }
}

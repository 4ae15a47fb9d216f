//! Coset drivers: the loops every gate and derivative kernel is built from.
//!
//! A gate on *k* targets is fully described by what it does to one local
//! vector of 2<sup>*k*</sup> amplitudes (see [`mask`][crate::mask]). The
//! `map_*` drivers walk all cosets, apply a local update where the control
//! condition holds, and (when writing out of place) copy the rest through
//! unchanged. The `sum_*` drivers evaluate ⟨bra∣*U*∣ket⟩ over the controlled
//! cosets from the same local update without materializing *U*∣ket⟩.
//!
//! Local updates on a single target take the pair `(∣0⟩, ∣1⟩)` amplitudes;
//! on two targets, the quadruple in [`DoubleMask::quad`] order.

use num_complex::Complex;
use num_traits::Zero;
use rayon::iter::{ IntoParallelIterator, ParallelIterator };
use crate::{
    engine::{ Engine, Update },
    mask::{ DoubleMask, GateMask, Index, Qubit, SingleMask },
    policy::{ Amp, Policy },
};

impl<P: Policy> Engine<P> {
    pub(crate) fn map_pairs<F>(
        &self,
        update: Update<'_, Amp<P>>,
        obj: Qubit,
        ctrls: &[Qubit],
        f: F,
    )
    where F: Fn(Amp<P>, Amp<P>) -> (Amp<P>, Amp<P>) + Send + Sync
    {
        let mask = SingleMask::new(obj, ctrls);
        let dim = update.dim();
        let copy_rest = !update.is_in_place();
        let (src, des) = update.into_raw();
        self.for_each(dim, dim >> 1, |l| unsafe {
            let i = mask.base(l);
            let j = i | mask.obj;
            if mask.ctrl.test(i) {
                let (a, b) = f(src.get(i), src.get(j));
                des.set(i, a);
                des.set(j, b);
            } else if copy_rest {
                des.set(i, src.get(i));
                des.set(j, src.get(j));
            }
        });
    }

    pub(crate) fn map_quads<F>(
        &self,
        update: Update<'_, Amp<P>>,
        mask: DoubleMask,
        f: F,
    )
    where F: Fn([Amp<P>; 4]) -> [Amp<P>; 4] + Send + Sync
    {
        let dim = update.dim();
        let copy_rest = !update.is_in_place();
        let (src, des) = update.into_raw();
        self.for_each(dim, dim >> 2, |l| unsafe {
            let idx = mask.quad(l);
            if mask.ctrl.test(idx[0]) {
                let out = f(idx.map(|i| src.get(i)));
                idx.iter().zip(out).for_each(|(i, a)| { des.set(*i, a); });
            } else if copy_rest {
                idx.iter().for_each(|i| { des.set(*i, src.get(*i)); });
            }
        });
    }

    /// Multiply each controlled local vector by the dense matrix `m`.
    pub(crate) fn map_cosets(
        &self,
        update: Update<'_, Amp<P>>,
        mask: &GateMask,
        m: &[Vec<Amp<P>>],
    ) {
        let dim = update.dim();
        let ld = mask.local_dim();
        debug_assert_eq!(m.len(), ld, "matrix size does not match targets");
        let copy_rest = !update.is_in_place();
        let (src, des) = update.into_raw();
        let body = |buf: &mut Vec<Amp<P>>, l: Index| unsafe {
            let b = mask.base(l);
            if mask.ctrl.test(b) {
                buf.iter_mut().zip(&mask.offsets)
                    .for_each(|(x, off)| { *x = src.get(b | off); });
                for (row, off) in m.iter().zip(&mask.offsets) {
                    let acc: Amp<P>
                        = row.iter().zip(buf.iter())
                        .fold(Complex::zero(), |acc, (mij, xj)| acc + mij * xj);
                    des.set(b | off, acc);
                }
            } else if copy_rest {
                mask.offsets.iter()
                    .for_each(|off| { des.set(b | off, src.get(b | off)); });
            }
        };
        let n = mask.n_cosets(dim);
        if self.is_par(dim) {
            (0..n).into_par_iter()
                .for_each_init(|| vec![Complex::zero(); ld], body);
        } else {
            let mut buf: Vec<Amp<P>> = vec![Complex::zero(); ld];
            (0..n).for_each(|l| body(&mut buf, l));
        }
    }

    /// ⟨bra∣*U*∣ket⟩ over the controlled cosets of a single target.
    pub(crate) fn sum_pairs<F>(
        &self,
        bra: &[Amp<P>],
        ket: &[Amp<P>],
        obj: Qubit,
        ctrls: &[Qubit],
        f: F,
    ) -> Amp<P>
    where F: Fn(Amp<P>, Amp<P>) -> (Amp<P>, Amp<P>) + Send + Sync
    {
        let mask = SingleMask::new(obj, ctrls);
        let dim = ket.len();
        debug_assert_eq!(bra.len(), dim);
        self.sum(dim, dim >> 1, |l| {
            let i = mask.base(l);
            if !mask.ctrl.test(i) { return Complex::zero(); }
            let j = i | mask.obj;
            let (a, b) = f(ket[i], ket[j]);
            bra[i].conj() * a + bra[j].conj() * b
        })
    }

    /// ⟨bra∣*U*∣ket⟩ over the controlled cosets of a target pair.
    pub(crate) fn sum_quads<F>(
        &self,
        bra: &[Amp<P>],
        ket: &[Amp<P>],
        mask: DoubleMask,
        f: F,
    ) -> Amp<P>
    where F: Fn([Amp<P>; 4]) -> [Amp<P>; 4] + Send + Sync
    {
        let dim = ket.len();
        debug_assert_eq!(bra.len(), dim);
        self.sum(dim, dim >> 2, |l| {
            let idx = mask.quad(l);
            if !mask.ctrl.test(idx[0]) { return Complex::zero(); }
            let out = f(idx.map(|i| ket[i]));
            idx.iter().zip(out)
                .fold(Complex::zero(), |acc, (i, a)| acc + bra[*i].conj() * a)
        })
    }

    /// ⟨bra∣*M*∣ket⟩ over the controlled cosets for a dense local matrix.
    pub(crate) fn sum_cosets(
        &self,
        bra: &[Amp<P>],
        ket: &[Amp<P>],
        mask: &GateMask,
        m: &[Vec<Amp<P>>],
    ) -> Amp<P>
    {
        let dim = ket.len();
        debug_assert_eq!(bra.len(), dim);
        debug_assert_eq!(m.len(), mask.local_dim(), "matrix size does not match targets");
        self.sum(dim, mask.n_cosets(dim), |l| {
            let b = mask.base(l);
            if !mask.ctrl.test(b) { return Complex::zero(); }
            m.iter().zip(&mask.offsets)
                .fold(Complex::zero(), |acc, (row, off_i)| {
                    let mket: Amp<P>
                        = row.iter().zip(&mask.offsets)
                        .fold(Complex::zero(), |s, (mij, off_j)| s + mij * ket[b | off_j]);
                    acc + bra[b | off_i].conj() * mket
                })
        })
    }
}

//! X-like and Z-like gates.
//!
//! An X-like gate exchanges the two amplitudes of every target pair with a
//! phase on each,
//! ```text
//! ∣…0…⟩ ← v1 ∣…1…⟩
//! ∣…1…⟩ ← v2 ∣…0…⟩
//! ```
//! so that *X* is `(1, 1)` and *Y* is `(−i, i)`. A Z-like gate multiplies
//! the ∣…1…⟩ amplitude of every pair by a single phase, leaving ∣…0…⟩
//! alone: *Z*, *S*, *T*, their adjoints, and the phase shift *PS*(θ).

use num_complex::Complex;
use num_traits::{ One, Zero };
use crate::{
    engine::{ Engine, Update },
    mask::{ qubit_mask, Qubit, SingleMask },
    par::RawSlice,
    policy::{ re, Amp, Policy },
};

impl<P: Policy> Engine<P> {
    /* X-like *****************************************************************/

    /// Apply the X-like gate `(v1, v2)` to `objs[0]`, conditioned on `ctrls`.
    pub fn apply_x_like(
        &self,
        qs: &mut [Amp<P>],
        objs: &[Qubit],
        ctrls: &[Qubit],
        v1: Amp<P>,
        v2: Amp<P>,
    ) {
        debug_assert_eq!(objs.len(), 1, "X-like gates act on one qubit");
        self.map_pairs(Update::InPlace(qs), objs[0], ctrls, |a0, a1| (v1 * a1, v2 * a0));
    }

    /// Apply a Pauli *X* gate.
    pub fn apply_x(&self, qs: &mut [Amp<P>], objs: &[Qubit], ctrls: &[Qubit]) {
        let mask = SingleMask::new(objs[0], ctrls);
        let dim = qs.len();
        let raw = RawSlice::new(qs);
        // bare permutation; skip the multiplications
        self.for_each(dim, dim >> 1, |l| unsafe {
            let i = mask.base(l);
            if mask.ctrl.test(i) {
                let j = i | mask.obj;
                let tmp = raw.get(i);
                raw.set(i, raw.get(j));
                raw.set(j, tmp);
            }
        });
    }

    /// Apply a Pauli *Y* gate.
    pub fn apply_y(&self, qs: &mut [Amp<P>], objs: &[Qubit], ctrls: &[Qubit]) {
        let i = Complex::<P::Real>::i();
        self.apply_x_like(qs, objs, ctrls, -i, i);
    }

    /* Z-like *****************************************************************/

    /// Multiply every controlled amplitude with `objs[0]` set by `val`.
    pub fn apply_z_like(
        &self,
        qs: &mut [Amp<P>],
        objs: &[Qubit],
        ctrls: &[Qubit],
        val: Amp<P>,
    ) {
        debug_assert_eq!(objs.len(), 1, "Z-like gates act on one qubit");
        let mask = SingleMask::new(objs[0], ctrls);
        let dim = qs.len();
        let raw = RawSlice::new(qs);
        self.for_each(dim, dim >> 1, |l| unsafe {
            let j = mask.base(l) | mask.obj;
            if mask.ctrl.test(j) { raw.set(j, raw.get(j) * val); }
        });
    }

    /// Apply a Pauli *Z* gate.
    pub fn apply_z(&self, qs: &mut [Amp<P>], objs: &[Qubit], ctrls: &[Qubit]) {
        self.apply_z_like(qs, objs, ctrls, -Complex::one());
    }

    /// Apply an *S* = diag(1, i) gate.
    pub fn apply_s(&self, qs: &mut [Amp<P>], objs: &[Qubit], ctrls: &[Qubit]) {
        self.apply_z_like(qs, objs, ctrls, Complex::i());
    }

    /// Apply an *S*<sup>†</sup> = diag(1, −i) gate.
    pub fn apply_sdag(&self, qs: &mut [Amp<P>], objs: &[Qubit], ctrls: &[Qubit]) {
        self.apply_z_like(qs, objs, ctrls, -Complex::i());
    }

    /// Apply a *T* = diag(1, e<sup>iπ/4</sup>) gate.
    pub fn apply_t(&self, qs: &mut [Amp<P>], objs: &[Qubit], ctrls: &[Qubit]) {
        let h = re::<P::Real>(std::f64::consts::FRAC_1_SQRT_2);
        self.apply_z_like(qs, objs, ctrls, Complex::new(h, h));
    }

    /// Apply a *T*<sup>†</sup> = diag(1, e<sup>−iπ/4</sup>) gate.
    pub fn apply_tdag(&self, qs: &mut [Amp<P>], objs: &[Qubit], ctrls: &[Qubit]) {
        let h = re::<P::Real>(std::f64::consts::FRAC_1_SQRT_2);
        self.apply_z_like(qs, objs, ctrls, Complex::new(h, -h));
    }

    /// Apply a phase shift *PS*(θ) = diag(1, e<sup>iθ</sup>).
    ///
    /// With `diff`, apply d*PS*/dθ = diag(0, i e<sup>iθ</sup>) instead; the
    /// result is not a physical state. Amplitudes outside the control
    /// subspace are zeroed in that case, since the derivative of a controlled
    /// gate vanishes there.
    pub fn apply_ps(
        &self,
        qs: &mut [Amp<P>],
        objs: &[Qubit],
        ctrls: &[Qubit],
        val: P::Real,
        diff: bool,
    ) {
        let e = Complex::from_polar(P::Real::one(), val);
        if diff {
            let d = Complex::<P::Real>::i() * e;
            self.map_pairs(
                Update::InPlace(&mut *qs), objs[0], ctrls, |_, a1| (Complex::zero(), d * a1));
            if !ctrls.is_empty() { self.set_to_zero_except(qs, qubit_mask(ctrls)); }
        } else {
            self.apply_z_like(qs, objs, ctrls, e);
        }
    }
}

//! Closed-form gates: Hadamard, global phase, permutations, and Pauli
//! rotations.
//!
//! Every Pauli rotation has the form
//! ```text
//! R_G(θ) = cos(θ/2) I − i sin(θ/2) G
//! ```
//! for a (one- or two-qubit) Pauli string *G*, with derivative
//! ```text
//! dR_G/dθ = −½ sin(θ/2) I − ½ i cos(θ/2) G
//! ```
//! so both are α*I* + β*G* for a pair of scalars, and *G* only ever
//! permutes and phases amplitudes (see [`pauli`][crate::pauli]). Each
//! rotation is therefore two complex multiply-adds per amplitude, with no
//! matrix in sight.
//!
//! For the two-qubit rotations *R*<sub>*PQ*</sub>, *P* acts on `objs[0]`
//! and *Q* on `objs[1]`; order matters for the mixed ones.
//!
//! Derivatives (`diff = true`) of controlled gates vanish outside the control
//! subspace, so those amplitudes are zeroed.

use num_complex::Complex;
use crate::{
    engine::{ Engine, Update },
    mask::{ qubit_mask, DoubleMask, Qubit },
    pauli::Pauli,
    policy::{ re, Amp, Policy, Real },
};

/// (α, β) such that the rotation (or its derivative) is α*I* + β*G*.
pub(crate) fn rotation_coeffs<R: Real>(val: R, diff: bool) -> (Complex<R>, Complex<R>) {
    let (s, c) = (val * re::<R>(0.5)).sin_cos();
    if diff {
        let h = re::<R>(0.5);
        (Complex::new(-s * h, R::zero()), Complex::new(R::zero(), -c * h))
    } else {
        (Complex::new(c, R::zero()), Complex::new(R::zero(), -s))
    }
}

/// Local update for α*I* + β*G* on one target.
pub(crate) fn pauli_pair<R: Real>(g: Pauli, alpha: Complex<R>, beta: Complex<R>)
    -> impl Fn(Complex<R>, Complex<R>) -> (Complex<R>, Complex<R>) + Copy + Send + Sync
{
    let f = usize::from(g.flips());
    let ph = [beta * g.phase::<R>(false), beta * g.phase::<R>(true)];
    move |a0, a1| {
        let a = [a0, a1];
        (alpha * a0 + ph[0] * a[f], alpha * a1 + ph[1] * a[1 ^ f])
    }
}

/// Local update for α*I* + β(*G*<sub>0</sub> ⊗ *G*<sub>1</sub>) on two
/// targets, in [`DoubleMask::quad`] order.
pub(crate) fn pauli_quad<R: Real>(
    g0: Pauli,
    g1: Pauli,
    alpha: Complex<R>,
    beta: Complex<R>,
) -> impl Fn([Complex<R>; 4]) -> [Complex<R>; 4] + Copy + Send + Sync
{
    let flip = usize::from(g0.flips()) | usize::from(g1.flips()) << 1;
    let ph: [Complex<R>; 4]
        = std::array::from_fn(|r| {
            beta * g0.phase::<R>(r & 1 == 1) * g1.phase::<R>(r & 2 == 2)
        });
    move |a| std::array::from_fn(|r| alpha * a[r] + ph[r] * a[r ^ flip])
}

/// Local update for the global phase e<sup>−iθ</sup> (or its derivative).
pub(crate) fn gp_pair<R: Real>(val: R, diff: bool)
    -> impl Fn(Complex<R>, Complex<R>) -> (Complex<R>, Complex<R>) + Copy + Send + Sync
{
    let e = Complex::from_polar(R::one(), -val);
    let v = if diff { -Complex::<R>::i() * e } else { e };
    move |a0, a1| (v * a0, v * a1)
}

impl<P: Policy> Engine<P> {
    fn rotate_single(
        &self,
        qs: &mut [Amp<P>],
        objs: &[Qubit],
        ctrls: &[Qubit],
        g: Pauli,
        val: P::Real,
        diff: bool,
    ) {
        debug_assert_eq!(objs.len(), 1, "single-qubit rotation");
        let (alpha, beta) = rotation_coeffs(val, diff);
        self.map_pairs(
            Update::InPlace(&mut *qs), objs[0], ctrls, pauli_pair(g, alpha, beta));
        if diff && !ctrls.is_empty() { self.set_to_zero_except(qs, qubit_mask(ctrls)); }
    }

    #[allow(clippy::too_many_arguments)]
    fn rotate_double(
        &self,
        qs: &mut [Amp<P>],
        objs: &[Qubit],
        ctrls: &[Qubit],
        g0: Pauli,
        g1: Pauli,
        val: P::Real,
        diff: bool,
    ) {
        let (alpha, beta) = rotation_coeffs(val, diff);
        self.map_quads(
            Update::InPlace(&mut *qs),
            DoubleMask::new(objs, ctrls),
            pauli_quad(g0, g1, alpha, beta),
        );
        if diff && !ctrls.is_empty() { self.set_to_zero_except(qs, qubit_mask(ctrls)); }
    }

    /* single-qubit ***********************************************************/

    /// Apply a Hadamard gate.
    pub fn apply_h(&self, qs: &mut [Amp<P>], objs: &[Qubit], ctrls: &[Qubit]) {
        let h = re::<P::Real>(std::f64::consts::FRAC_1_SQRT_2);
        self.map_pairs(
            Update::InPlace(qs), objs[0], ctrls,
            |a0, a1| ((a0 + a1).scale(h), (a0 - a1).scale(h)),
        );
    }

    /// Apply a global phase e<sup>−iθ</sup> to every amplitude in the
    /// control subspace.
    pub fn apply_gp(
        &self,
        qs: &mut [Amp<P>],
        objs: &[Qubit],
        ctrls: &[Qubit],
        val: P::Real,
        diff: bool,
    ) {
        self.map_pairs(Update::InPlace(&mut *qs), objs[0], ctrls, gp_pair(val, diff));
        if diff && !ctrls.is_empty() { self.set_to_zero_except(qs, qubit_mask(ctrls)); }
    }

    /// Apply *RX*(θ) = [[*c*, −i*s*], [−i*s*, *c*]].
    pub fn apply_rx(
        &self,
        qs: &mut [Amp<P>],
        objs: &[Qubit],
        ctrls: &[Qubit],
        val: P::Real,
        diff: bool,
    ) {
        self.rotate_single(qs, objs, ctrls, Pauli::X, val, diff);
    }

    /// Apply *RY*(θ) = [[*c*, −*s*], [*s*, *c*]].
    pub fn apply_ry(
        &self,
        qs: &mut [Amp<P>],
        objs: &[Qubit],
        ctrls: &[Qubit],
        val: P::Real,
        diff: bool,
    ) {
        self.rotate_single(qs, objs, ctrls, Pauli::Y, val, diff);
    }

    /// Apply *RZ*(θ) = diag(e<sup>−iθ/2</sup>, e<sup>iθ/2</sup>).
    pub fn apply_rz(
        &self,
        qs: &mut [Amp<P>],
        objs: &[Qubit],
        ctrls: &[Qubit],
        val: P::Real,
        diff: bool,
    ) {
        self.rotate_single(qs, objs, ctrls, Pauli::Z, val, diff);
    }

    /* two-qubit **************************************************************/

    /// Exchange the states of `objs[0]` and `objs[1]`.
    pub fn apply_swap(&self, qs: &mut [Amp<P>], objs: &[Qubit], ctrls: &[Qubit]) {
        self.map_quads(
            Update::InPlace(qs), DoubleMask::new(objs, ctrls),
            |[a00, a01, a10, a11]| [a00, a10, a01, a11],
        );
    }

    /// Apply an iSWAP gate, or its adjoint if `daggered`.
    pub fn apply_iswap(
        &self,
        qs: &mut [Amp<P>],
        objs: &[Qubit],
        ctrls: &[Qubit],
        daggered: bool,
    ) {
        let p: Amp<P> = if daggered { -Complex::i() } else { Complex::i() };
        self.map_quads(
            Update::InPlace(qs), DoubleMask::new(objs, ctrls),
            move |[a00, a01, a10, a11]| [a00, p * a10, p * a01, a11],
        );
    }

    /// Apply *R*<sub>*XX*</sub>(θ).
    pub fn apply_rxx(
        &self,
        qs: &mut [Amp<P>],
        objs: &[Qubit],
        ctrls: &[Qubit],
        val: P::Real,
        diff: bool,
    ) {
        self.rotate_double(qs, objs, ctrls, Pauli::X, Pauli::X, val, diff);
    }

    /// Apply *R*<sub>*YY*</sub>(θ).
    pub fn apply_ryy(
        &self,
        qs: &mut [Amp<P>],
        objs: &[Qubit],
        ctrls: &[Qubit],
        val: P::Real,
        diff: bool,
    ) {
        self.rotate_double(qs, objs, ctrls, Pauli::Y, Pauli::Y, val, diff);
    }

    /// Apply *R*<sub>*ZZ*</sub>(θ).
    pub fn apply_rzz(
        &self,
        qs: &mut [Amp<P>],
        objs: &[Qubit],
        ctrls: &[Qubit],
        val: P::Real,
        diff: bool,
    ) {
        self.rotate_double(qs, objs, ctrls, Pauli::Z, Pauli::Z, val, diff);
    }

    /// Apply *R*<sub>*XY*</sub>(θ), with *X* on `objs[0]` and *Y* on
    /// `objs[1]`.
    pub fn apply_rxy(
        &self,
        qs: &mut [Amp<P>],
        objs: &[Qubit],
        ctrls: &[Qubit],
        val: P::Real,
        diff: bool,
    ) {
        self.rotate_double(qs, objs, ctrls, Pauli::X, Pauli::Y, val, diff);
    }

    /// Apply *R*<sub>*XZ*</sub>(θ), with *X* on `objs[0]` and *Z* on
    /// `objs[1]`.
    pub fn apply_rxz(
        &self,
        qs: &mut [Amp<P>],
        objs: &[Qubit],
        ctrls: &[Qubit],
        val: P::Real,
        diff: bool,
    ) {
        self.rotate_double(qs, objs, ctrls, Pauli::X, Pauli::Z, val, diff);
    }

    /// Apply *R*<sub>*YZ*</sub>(θ), with *Y* on `objs[0]` and *Z* on
    /// `objs[1]`.
    pub fn apply_ryz(
        &self,
        qs: &mut [Amp<P>],
        objs: &[Qubit],
        ctrls: &[Qubit],
        val: P::Real,
        diff: bool,
    ) {
        self.rotate_double(qs, objs, ctrls, Pauli::Y, Pauli::Z, val, diff);
    }
}

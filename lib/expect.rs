//! Inner products and derivative expectation values.
//!
//! `expect_diff_*` kernels return ⟨bra∣*D*∣ket⟩, where *D* is the derivative
//! of the named gate with respect to its angle, restricted to the control
//! subspace (see [`rotation`][crate::rotation] for the conventions). The
//! product is fused: *D*∣ket⟩ is never stored. The gradient of a real
//! expectation value ⟨ψ(θ)∣*H*∣ψ(θ)⟩ is then 2 Re ⟨ψ∣*H* *D*∣ψ'⟩-type
//! combinations of these, assembled by the caller.

use num_complex::Complex;
use num_traits::{ One, Zero };
use crate::{
    engine::Engine,
    mask::{ Condition, DoubleMask, GateMask, Index, Qubit },
    matrix::{ ascending_pair, mat4 },
    pauli::Pauli,
    policy::{ Amp, Policy },
    rotation::{ gp_pair, pauli_pair, pauli_quad, rotation_coeffs },
};

impl<P: Policy> Engine<P> {
    /* inner products *********************************************************/

    /// Σ<sub>*i*</sub> conj(bra<sub>*i*</sub>) ket<sub>*i*</sub>.
    pub fn vdot(&self, bra: &[Amp<P>], ket: &[Amp<P>]) -> Amp<P> {
        debug_assert_eq!(bra.len(), ket.len(), "vdot: length mismatch");
        self.sum(ket.len(), ket.len(), |i| bra[i].conj() * ket[i])
    }

    /// Like [`Self::vdot`], but only over indices *i* with
    /// `i & mask == condi`.
    pub fn condition_vdot(
        &self,
        bra: &[Amp<P>],
        ket: &[Amp<P>],
        mask: Index,
        condi: Index,
    ) -> Amp<P>
    {
        debug_assert_eq!(bra.len(), ket.len(), "condition_vdot: length mismatch");
        let cond = Condition::new(mask, condi);
        self.sum(ket.len(), ket.len(), |i| {
            if cond.test(i) { bra[i].conj() * ket[i] } else { Complex::zero() }
        })
    }

    /// Inner product over the subspace where qubit `obj` is ∣1⟩.
    pub fn one_state_vdot(&self, bra: &[Amp<P>], ket: &[Amp<P>], obj: Qubit) -> Amp<P> {
        let c = Condition::qubit_is(obj, true);
        self.condition_vdot(bra, ket, c.mask, c.condi)
    }

    /// Inner product over the subspace where qubit `obj` is ∣0⟩.
    pub fn zero_state_vdot(&self, bra: &[Amp<P>], ket: &[Amp<P>], obj: Qubit) -> Amp<P> {
        let c = Condition::qubit_is(obj, false);
        self.condition_vdot(bra, ket, c.mask, c.condi)
    }

    /* caller-supplied derivative matrices ************************************/

    /// ⟨bra∣*M*∣ket⟩ for a 2×2 matrix `m` on `objs[0]`, over the control
    /// subspace.
    pub fn expect_diff_single_qubit_matrix(
        &self,
        bra: &[Amp<P>],
        ket: &[Amp<P>],
        objs: &[Qubit],
        ctrls: &[Qubit],
        m: &[Vec<Amp<P>>],
    ) -> Amp<P>
    {
        let (m00, m01, m10, m11) = (m[0][0], m[0][1], m[1][0], m[1][1]);
        self.sum_pairs(
            bra, ket, objs[0], ctrls,
            |a0, a1| (m00 * a0 + m01 * a1, m10 * a0 + m11 * a1),
        )
    }

    /// ⟨bra∣*M*∣ket⟩ for a 4×4 matrix `m` on `objs[0..2]`, over the control
    /// subspace.
    pub fn expect_diff_two_qubits_matrix(
        &self,
        bra: &[Amp<P>],
        ket: &[Amp<P>],
        objs: &[Qubit],
        ctrls: &[Qubit],
        m: &[Vec<Amp<P>>],
    ) -> Amp<P>
    {
        let m: [[Amp<P>; 4]; 4]
            = std::array::from_fn(|r| std::array::from_fn(|c| m[r][c]));
        self.sum_quads(bra, ket, ascending_pair(objs, ctrls), |a| mat4(&m, a))
    }

    /// ⟨bra∣*M*∣ket⟩ for a 2<sup>*k*</sup>×2<sup>*k*</sup> matrix `m` on
    /// `objs`, over the control subspace.
    pub fn expect_diff_n_qubits_matrix(
        &self,
        bra: &[Amp<P>],
        ket: &[Amp<P>],
        objs: &[Qubit],
        ctrls: &[Qubit],
        m: &[Vec<Amp<P>>],
    ) -> Amp<P>
    {
        self.sum_cosets(bra, ket, &GateMask::new(objs, ctrls), m)
    }

    /// ⟨bra∣*M*∣ket⟩ for a matrix of any size.
    pub fn expect_diff_matrix_gate(
        &self,
        bra: &[Amp<P>],
        ket: &[Amp<P>],
        objs: &[Qubit],
        ctrls: &[Qubit],
        m: &[Vec<Amp<P>>],
    ) -> Amp<P>
    {
        match objs.len() {
            1 => self.expect_diff_single_qubit_matrix(bra, ket, objs, ctrls, m),
            2 => self.expect_diff_two_qubits_matrix(bra, ket, objs, ctrls, m),
            _ => self.expect_diff_n_qubits_matrix(bra, ket, objs, ctrls, m),
        }
    }

    /* parametrized gates *****************************************************/

    fn expect_diff_rot1(
        &self,
        bra: &[Amp<P>],
        ket: &[Amp<P>],
        objs: &[Qubit],
        ctrls: &[Qubit],
        g: Pauli,
        val: P::Real,
    ) -> Amp<P>
    {
        let (alpha, beta) = rotation_coeffs(val, true);
        self.sum_pairs(bra, ket, objs[0], ctrls, pauli_pair(g, alpha, beta))
    }

    #[allow(clippy::too_many_arguments)]
    fn expect_diff_rot2(
        &self,
        bra: &[Amp<P>],
        ket: &[Amp<P>],
        objs: &[Qubit],
        ctrls: &[Qubit],
        g0: Pauli,
        g1: Pauli,
        val: P::Real,
    ) -> Amp<P>
    {
        let (alpha, beta) = rotation_coeffs(val, true);
        self.sum_quads(
            bra, ket, DoubleMask::new(objs, ctrls), pauli_quad(g0, g1, alpha, beta))
    }

    pub fn expect_diff_rx(
        &self,
        bra: &[Amp<P>],
        ket: &[Amp<P>],
        objs: &[Qubit],
        ctrls: &[Qubit],
        val: P::Real,
    ) -> Amp<P>
    {
        self.expect_diff_rot1(bra, ket, objs, ctrls, Pauli::X, val)
    }

    pub fn expect_diff_ry(
        &self,
        bra: &[Amp<P>],
        ket: &[Amp<P>],
        objs: &[Qubit],
        ctrls: &[Qubit],
        val: P::Real,
    ) -> Amp<P>
    {
        self.expect_diff_rot1(bra, ket, objs, ctrls, Pauli::Y, val)
    }

    pub fn expect_diff_rz(
        &self,
        bra: &[Amp<P>],
        ket: &[Amp<P>],
        objs: &[Qubit],
        ctrls: &[Qubit],
        val: P::Real,
    ) -> Amp<P>
    {
        self.expect_diff_rot1(bra, ket, objs, ctrls, Pauli::Z, val)
    }

    pub fn expect_diff_rxx(
        &self,
        bra: &[Amp<P>],
        ket: &[Amp<P>],
        objs: &[Qubit],
        ctrls: &[Qubit],
        val: P::Real,
    ) -> Amp<P>
    {
        self.expect_diff_rot2(bra, ket, objs, ctrls, Pauli::X, Pauli::X, val)
    }

    pub fn expect_diff_ryy(
        &self,
        bra: &[Amp<P>],
        ket: &[Amp<P>],
        objs: &[Qubit],
        ctrls: &[Qubit],
        val: P::Real,
    ) -> Amp<P>
    {
        self.expect_diff_rot2(bra, ket, objs, ctrls, Pauli::Y, Pauli::Y, val)
    }

    pub fn expect_diff_rzz(
        &self,
        bra: &[Amp<P>],
        ket: &[Amp<P>],
        objs: &[Qubit],
        ctrls: &[Qubit],
        val: P::Real,
    ) -> Amp<P>
    {
        self.expect_diff_rot2(bra, ket, objs, ctrls, Pauli::Z, Pauli::Z, val)
    }

    /// *X* on `objs[0]`, *Y* on `objs[1]`.
    pub fn expect_diff_rxy(
        &self,
        bra: &[Amp<P>],
        ket: &[Amp<P>],
        objs: &[Qubit],
        ctrls: &[Qubit],
        val: P::Real,
    ) -> Amp<P>
    {
        self.expect_diff_rot2(bra, ket, objs, ctrls, Pauli::X, Pauli::Y, val)
    }

    /// *X* on `objs[0]`, *Z* on `objs[1]`.
    pub fn expect_diff_rxz(
        &self,
        bra: &[Amp<P>],
        ket: &[Amp<P>],
        objs: &[Qubit],
        ctrls: &[Qubit],
        val: P::Real,
    ) -> Amp<P>
    {
        self.expect_diff_rot2(bra, ket, objs, ctrls, Pauli::X, Pauli::Z, val)
    }

    /// *Y* on `objs[0]`, *Z* on `objs[1]`.
    pub fn expect_diff_ryz(
        &self,
        bra: &[Amp<P>],
        ket: &[Amp<P>],
        objs: &[Qubit],
        ctrls: &[Qubit],
        val: P::Real,
    ) -> Amp<P>
    {
        self.expect_diff_rot2(bra, ket, objs, ctrls, Pauli::Y, Pauli::Z, val)
    }

    /// Derivative of the phase shift, diag(0, i e<sup>iθ</sup>).
    pub fn expect_diff_ps(
        &self,
        bra: &[Amp<P>],
        ket: &[Amp<P>],
        objs: &[Qubit],
        ctrls: &[Qubit],
        val: P::Real,
    ) -> Amp<P>
    {
        let d = Complex::<P::Real>::i() * Complex::from_polar(P::Real::one(), val);
        self.sum_pairs(bra, ket, objs[0], ctrls, |_, a1| (Complex::zero(), d * a1))
    }

    /// Derivative of the global phase, −i e<sup>−iθ</sup>.
    pub fn expect_diff_gp(
        &self,
        bra: &[Amp<P>],
        ket: &[Amp<P>],
        objs: &[Qubit],
        ctrls: &[Qubit],
        val: P::Real,
    ) -> Amp<P>
    {
        self.sum_pairs(bra, ket, objs[0], ctrls, gp_pair(val, true))
    }
}

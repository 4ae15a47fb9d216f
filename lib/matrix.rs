//! Dense matrix gates.
//!
//! A gate matrix on *k* targets is given as 2<sup>*k*</sup> rows of
//! 2<sup>*k*</sup> entries each, indexed by the local basis in which bit *j*
//! is the *j*-th smallest target qubit, regardless of the order `objs` is
//! given in. One- and two-target matrices are unrolled; larger ones go
//! through a generic gather/multiply/scatter loop.

use itertools::Itertools;
use crate::{
    engine::{ Engine, Update },
    mask::{ DoubleMask, GateMask, Qubit },
    policy::{ Amp, Policy },
};

impl<P: Policy> Engine<P> {
    /// Apply a 2×2 matrix to `objs[0]`.
    pub fn apply_single_qubit_matrix<'a, U>(
        &self,
        update: U,
        objs: &[Qubit],
        ctrls: &[Qubit],
        m: &[Vec<Amp<P>>],
    )
    where U: Into<Update<'a, Amp<P>>>, P: 'a
    {
        debug_assert!(m.len() == 2 && m.iter().all(|row| row.len() == 2));
        let (m00, m01, m10, m11) = (m[0][0], m[0][1], m[1][0], m[1][1]);
        self.map_pairs(
            update.into(), objs[0], ctrls,
            |a0, a1| (m00 * a0 + m01 * a1, m10 * a0 + m11 * a1),
        );
    }

    /// Apply a 4×4 matrix to `objs[0..2]`.
    pub fn apply_two_qubits_matrix<'a, U>(
        &self,
        update: U,
        objs: &[Qubit],
        ctrls: &[Qubit],
        m: &[Vec<Amp<P>>],
    )
    where U: Into<Update<'a, Amp<P>>>, P: 'a
    {
        debug_assert!(m.len() == 4 && m.iter().all(|row| row.len() == 4));
        let m: [[Amp<P>; 4]; 4]
            = std::array::from_fn(|r| std::array::from_fn(|c| m[r][c]));
        self.map_quads(update.into(), ascending_pair(objs, ctrls), |a| mat4(&m, a));
    }

    /// Apply a 2<sup>*k*</sup>×2<sup>*k*</sup> matrix to `objs`, with *k* =
    /// `objs.len()`.
    pub fn apply_n_qubits_matrix<'a, U>(
        &self,
        update: U,
        objs: &[Qubit],
        ctrls: &[Qubit],
        m: &[Vec<Amp<P>>],
    )
    where U: Into<Update<'a, Amp<P>>>, P: 'a
    {
        let mask = GateMask::new(objs, ctrls);
        self.map_cosets(update.into(), &mask, m);
    }

    /// Apply a matrix gate of any size, picking the kernel by the number of
    /// targets.
    pub fn apply_matrix_gate<'a, U>(
        &self,
        update: U,
        objs: &[Qubit],
        ctrls: &[Qubit],
        m: &[Vec<Amp<P>>],
    )
    where U: Into<Update<'a, Amp<P>>>, P: 'a
    {
        match objs.len() {
            1 => self.apply_single_qubit_matrix(update, objs, ctrls, m),
            2 => self.apply_two_qubits_matrix(update, objs, ctrls, m),
            _ => self.apply_n_qubits_matrix(update, objs, ctrls, m),
        }
    }
}

/// A [`DoubleMask`] whose quadruples follow the ascending-target local basis.
pub(crate) fn ascending_pair(objs: &[Qubit], ctrls: &[Qubit]) -> DoubleMask {
    debug_assert_eq!(objs.len(), 2, "expected two targets");
    let sorted: Vec<Qubit> = objs.iter().copied().sorted().collect();
    DoubleMask::new(&sorted, ctrls)
}

#[inline(always)]
pub(crate) fn mat4<T>(m: &[[T; 4]; 4], a: [T; 4]) -> [T; 4]
where T: Copy + std::ops::Add<Output = T> + std::ops::Mul<Output = T>
{
    std::array::from_fn(|r| {
        m[r][0] * a[0] + m[r][1] * a[1] + m[r][2] * a[2] + m[r][3] * a[3]
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        policy::{ CpuF64, WideF64 },
        testing::*,
    };
    use num_complex::Complex64 as C64;
    use num_traits::{ One, Zero };

    fn h_matrix() -> Vec<Vec<C64>> {
        let h = C64::new(std::f64::consts::FRAC_1_SQRT_2, 0.0);
        vec![vec![h, h], vec![h, -h]]
    }

    // |q1 q0⟩ ↦ |q1 (q0 ⊕ q1)⟩ in the ascending local basis: CNOT with the
    // larger target as control
    fn cnot_hi_ctrl() -> Vec<Vec<C64>> {
        let (o, z) = (C64::one(), C64::zero());
        vec![
            vec![o, z, z, z],
            vec![z, o, z, z],
            vec![z, z, z, o],
            vec![z, z, o, z],
        ]
    }

    #[test]
    fn single_qubit_matrix_matches_h() {
        let e: Engine<CpuF64> = Engine::new();
        let psi = random_state::<CpuF64>(4, 1);
        let mut a = psi.clone();
        e.apply_single_qubit_matrix(&mut *a, &[2], &[0], &h_matrix());
        let mut b = psi.clone();
        e.apply_h(&mut b, &[2], &[0]);
        assert_close(&a, &b, 1e-14);
    }

    #[test]
    fn two_qubit_matrix_uses_ascending_order() {
        let e: Engine<CpuF64> = Engine::new();
        let m = cnot_hi_ctrl();
        // targets given in either order act identically
        let psi = random_state::<CpuF64>(4, 2);
        let mut a = psi.clone();
        e.apply_two_qubits_matrix(&mut *a, &[1, 3], &[], &m);
        let mut b = psi.clone();
        e.apply_two_qubits_matrix(&mut *b, &[3, 1], &[], &m);
        assert_close(&a, &b, 0.0);
        // and equal a CNOT controlled by the larger target
        let mut c = psi.clone();
        e.apply_x(&mut c, &[1], &[3]);
        assert_close(&a, &c, 1e-15);
    }

    #[test]
    fn n_qubit_matrix_agrees_with_two_qubit_kernel() {
        let e: Engine<WideF64> = Engine::with_dim_th(1);
        let m = cnot_hi_ctrl();
        let psi = random_state::<WideF64>(5, 3);
        let mut a = psi.clone();
        e.apply_n_qubits_matrix(&mut *a, &[4, 0], &[2], &m);
        let mut b = psi.clone();
        e.apply_matrix_gate(&mut *b, &[0, 4], &[2], &m);
        assert_close(&a, &b, 1e-15);
    }

    #[test]
    fn three_qubit_toffoli() {
        let e: Engine<CpuF64> = Engine::new();
        let (o, z) = (C64::one(), C64::zero());
        // flip the largest target when both smaller ones are set
        let mut m = vec![vec![z; 8]; 8];
        for r in 0..8 {
            let c = if r & 0b011 == 0b011 { r ^ 0b100 } else { r };
            m[r][c] = o;
        }
        for idx in 0..16 {
            let mut qs = basis::<CpuF64>(4, idx);
            e.apply_matrix_gate(&mut *qs, &[3, 0, 2], &[], &m);
            let expected = if idx & 0b0101 == 0b0101 { idx ^ 0b1000 } else { idx };
            assert_eq!(qs, basis::<CpuF64>(4, expected), "input {:04b}", idx);
        }
    }

    #[test]
    fn out_of_place_copies_uncontrolled_amplitudes() {
        let e: Engine<CpuF64> = Engine::new();
        let psi = random_state::<CpuF64>(3, 4);
        let mut des = vec![C64::zero(); 8];
        e.apply_single_qubit_matrix(
            Update::OutOfPlace { src: &psi[..], des: &mut des[..] },
            &[0], &[1], &h_matrix(),
        );
        let mut expected = psi.clone();
        e.apply_h(&mut expected, &[0], &[1]);
        assert_close(&des, &expected, 1e-15);
    }
}

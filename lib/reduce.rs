//! Conditional arithmetic and masked reductions.
//!
//! These kernels operate on the whole index space, split by a mask/condition
//! pair into a "success" subspace (`i & mask == condi`) and its complement.
//! Among other things they implement projections and damping-type updates
//! (scale one subspace, zero or rescale the other) and measurement
//! probabilities (sum of squared magnitudes over a subspace).

use std::{
    collections::HashMap,
    hash::BuildHasher,
};
use num_complex::Complex;
use num_traits::{ Float, Zero };
use rayon::iter::{ IntoParallelIterator, ParallelIterator };
use crate::{
    engine::{ Engine, Update },
    mask::{ Condition, Index, Qubit },
    policy::{ Amp, Policy },
};

impl<P: Policy> Engine<P> {
    /// Set `des[i] = op(src[i], succ)` where `i & mask == condi` and
    /// `des[i] = op(src[i], fail)` elsewhere.
    pub fn conditional_binary<'a, U, F>(
        &self,
        update: U,
        mask: Index,
        condi: Index,
        succ: Amp<P>,
        fail: Amp<P>,
        op: F,
    )
    where
        U: Into<Update<'a, Amp<P>>>,
        P: 'a,
        F: Fn(Amp<P>, Amp<P>) -> Amp<P> + Send + Sync,
    {
        let cond = Condition::new(mask, condi);
        let update = update.into();
        let dim = update.dim();
        let (src, des) = update.into_raw();
        self.for_each(dim, dim, |i| unsafe {
            let c = if cond.test(i) { succ } else { fail };
            des.set(i, op(src.get(i), c));
        });
    }

    /// [`Self::conditional_binary`] with addition.
    pub fn conditional_add<'a, U>(
        &self,
        update: U,
        mask: Index,
        condi: Index,
        succ: Amp<P>,
        fail: Amp<P>,
    )
    where U: Into<Update<'a, Amp<P>>>, P: 'a
    {
        self.conditional_binary(update, mask, condi, succ, fail, |a, c| a + c);
    }

    /// [`Self::conditional_binary`] with subtraction.
    pub fn conditional_minus<'a, U>(
        &self,
        update: U,
        mask: Index,
        condi: Index,
        succ: Amp<P>,
        fail: Amp<P>,
    )
    where U: Into<Update<'a, Amp<P>>>, P: 'a
    {
        self.conditional_binary(update, mask, condi, succ, fail, |a, c| a - c);
    }

    /// [`Self::conditional_binary`] with multiplication.
    pub fn conditional_mul<'a, U>(
        &self,
        update: U,
        mask: Index,
        condi: Index,
        succ: Amp<P>,
        fail: Amp<P>,
    )
    where U: Into<Update<'a, Amp<P>>>, P: 'a
    {
        self.conditional_binary(update, mask, condi, succ, fail, |a, c| a * c);
    }

    /// [`Self::conditional_binary`] with division.
    pub fn conditional_div<'a, U>(
        &self,
        update: U,
        mask: Index,
        condi: Index,
        succ: Amp<P>,
        fail: Amp<P>,
    )
    where U: Into<Update<'a, Amp<P>>>, P: 'a
    {
        self.conditional_binary(update, mask, condi, succ, fail, |a, c| a / c);
    }

    /// Sum `qs[i]` over indices with `i & mask == condi`, or |`qs[i]`|² if
    /// `abs` is set.
    ///
    /// With `abs`, the result is real and, for `mask == 0`, equal to
    /// `vdot(qs, qs)`; it is then the probability of measuring the selected
    /// bit values.
    pub fn conditional_collect(
        &self,
        qs: &[Amp<P>],
        mask: Index,
        condi: Index,
        abs: bool,
    ) -> Amp<P>
    {
        let cond = Condition::new(mask, condi);
        let dim = qs.len();
        if abs {
            let p = self.sum_re(dim, dim, |i| {
                if cond.test(i) { qs[i].norm_sqr() } else { P::Real::zero() }
            });
            Complex::new(p, P::Real::zero())
        } else {
            self.sum(dim, dim, |i| {
                if cond.test(i) { qs[i] } else { Complex::zero() }
            })
        }
    }

    /// Minimize the diagonal cost
    /// ```text
    /// E(i) = Σ_m c_m (−1)^popcount(i & m)
    /// ```
    /// over all 2<sup>`n_qubits`</sup> basis states *i*, where `masks_value`
    /// maps each parity mask *m* (e.g. `1 << a | 1 << b` for
    /// *Z*<sub>*a*</sub>*Z*<sub>*b*</sub>) to its coefficient
    /// *c*<sub>*m*</sub>.
    ///
    /// This is an exhaustive search.
    pub fn ground_state_of_zzs<S>(
        &self,
        masks_value: &HashMap<Index, P::Real, S>,
        n_qubits: Qubit,
    ) -> P::Real
    where S: BuildHasher
    {
        let terms: Vec<(Index, P::Real)>
            = masks_value.iter().map(|(m, c)| (*m, *c)).collect();
        let energy = |i: Index| -> P::Real {
            terms.iter()
                .map(|(m, c)| if (i & m).count_ones() % 2 == 0 { *c } else { -*c })
                .sum()
        };
        let dim: Index = 1 << n_qubits;
        if self.is_par(dim) {
            (0..dim).into_par_iter()
                .map(energy)
                .reduce(<P::Real as Float>::infinity, Float::min)
        } else {
            (0..dim).map(energy).fold(<P::Real as Float>::infinity(), Float::min)
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        policy::{ CpuF32, CpuF64, WideF64 },
        testing::*,
    };
    use approx::assert_abs_diff_eq;
    use num_complex::Complex64 as C64;
    use num_traits::One;
    use rustc_hash::FxHashMap;

    #[test]
    fn conditional_binary_splits_subspaces() {
        let e: Engine<CpuF64> = Engine::new();
        let src: Vec<C64> = (0..8).map(|i| C64::new(i as f64, 0.0)).collect();
        let mut des = vec![C64::zero(); 8];
        let (succ, fail) = (C64::new(10.0, 0.0), C64::new(0.0, 1.0));
        e.conditional_add(
            Update::OutOfPlace { src: &src[..], des: &mut des[..] },
            0b010, 0b010, succ, fail,
        );
        for i in 0..8 {
            let c = if i & 0b010 != 0 { succ } else { fail };
            assert_eq!(des[i], src[i] + c);
        }
        // source untouched
        assert_eq!(src[3], C64::new(3.0, 0.0));

        let mut qs = src.clone();
        e.conditional_minus(&mut qs, 0b001, 0, succ, fail);
        assert_eq!(qs[2], C64::new(-8.0, 0.0));
        assert_eq!(qs[3], C64::new(3.0, -1.0));
    }

    #[test]
    fn projection_and_renormalization() {
        let e: Engine<WideF64> = Engine::with_dim_th(1);
        let psi = random_state::<WideF64>(6, 70);
        // probability of qubit 4 reading 1, then collapse onto that outcome
        let p1 = e.conditional_collect(&psi, 1 << 4, 1 << 4, true);
        assert_close1(p1, e.one_state_vdot(&psi, &psi, 4), 1e-14);
        let mut qs = psi.clone();
        let scale = C64::new(1.0 / p1.re.sqrt(), 0.0);
        e.conditional_mul(&mut qs, 1 << 4, 1 << 4, scale, C64::zero());
        assert_abs_diff_eq!(norm_sqr(&qs), 1.0, epsilon = 1e-12);
        assert!(qs.iter().enumerate().all(|(i, a)| i & (1 << 4) != 0 || *a == C64::zero()));
        // divide back
        let mut back = qs.clone();
        e.conditional_div(&mut back, 1 << 4, 1 << 4, scale, C64::one());
        for i in (0..64).filter(|i| i & (1 << 4) != 0) {
            assert_close1(back[i], psi[i], 1e-14);
        }
    }

    #[test]
    fn collect_relations() {
        let e: Engine<CpuF64> = Engine::new();
        let psi = random_state::<CpuF64>(5, 71);
        // |·|² over everything is the squared norm
        let all = e.conditional_collect(&psi, 0, 0, true);
        assert_close1(all, e.vdot(&psi, &psi), 1e-14);
        assert_eq!(all.im, 0.0);
        // plain sum over everything is Σ qs[i], with no conjugation
        let plain = e.conditional_collect(&psi, 0, 0, false);
        let direct: C64 = psi.iter().sum();
        assert_close1(plain, direct, 1e-14);
        let halves
            = e.conditional_collect(&psi, 0b100, 0, false)
            + e.conditional_collect(&psi, 0b100, 0b100, false);
        assert_close1(halves, plain, 1e-14);
    }

    #[test]
    fn single_zz_ground_state() {
        let e: Engine<CpuF64> = Engine::new();
        let mut zz: FxHashMap<Index, f64> = FxHashMap::default();
        zz.insert(0b11, 1.0);
        assert_eq!(e.ground_state_of_zzs(&zz, 2), -1.0);
        zz.insert(0b11, -2.0);
        assert_eq!(e.ground_state_of_zzs(&zz, 2), -2.0);
    }

    #[test]
    fn frustrated_triangle() {
        // antiferromagnetic triangle plus a field on qubit 0: one bond is
        // always frustrated, and the field picks qubit 0 = ∣1⟩
        let mut zz: FxHashMap<Index, f32> = FxHashMap::default();
        zz.insert(0b011, 1.0);
        zz.insert(0b110, 1.0);
        zz.insert(0b101, 1.0);
        zz.insert(0b001, 0.5);
        let brute: f32
            = (0..8_usize)
            .map(|i| {
                zz.iter()
                    .map(|(m, c)| if (i & m).count_ones() % 2 == 0 { *c } else { -c })
                    .sum::<f32>()
            })
            .fold(f32::INFINITY, f32::min);
        assert_eq!(brute, -1.5);
        let seq: Engine<CpuF32> = Engine::with_dim_th(usize::MAX);
        let par: Engine<CpuF32> = Engine::with_dim_th(1);
        assert_eq!(seq.ground_state_of_zzs(&zz, 3), brute);
        assert_eq!(par.ground_state_of_zzs(&zz, 3), brute);
    }
}

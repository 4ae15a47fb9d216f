//! Owned amplitude buffers and whole-state operations.
//!
//! A [`State`] is nothing more than a contiguous, header-free array of `dim`
//! complex amplitudes; it dereferences to a slice, so every kernel accepts an
//! owned state and a foreign buffer alike. Amplitude *i* is the coefficient of
//! the basis state whose *k*-th qubit is bit *k* of *i* (little-endian).

use std::{
    fmt,
    ops::{ Deref, DerefMut },
};
use num_complex::Complex;
use num_traits::{ One, Zero };
use tracing::{ debug, warn };
use crate::{
    engine::{ Engine, Update },
    error::{ Error, Result },
    mask::{ Condition, Index, Qubit },
    par::RawSlice,
    policy::{ cast_amp, Amp, Policy },
};

/// An owned state vector under policy `P`.
#[derive(Clone, Debug, PartialEq)]
pub struct State<P: Policy> {
    data: Vec<Amp<P>>,
}

impl<P: Policy> Deref for State<P> {
    type Target = [Amp<P>];

    fn deref(&self) -> &Self::Target { &self.data }
}

impl<P: Policy> DerefMut for State<P> {
    fn deref_mut(&mut self) -> &mut Self::Target { &mut self.data }
}

impl<P: Policy> AsRef<[Amp<P>]> for State<P> {
    fn as_ref(&self) -> &[Amp<P>] { &self.data }
}

impl<P: Policy> AsMut<[Amp<P>]> for State<P> {
    fn as_mut(&mut self) -> &mut [Amp<P>] { &mut self.data }
}

impl<P: Policy> From<State<P>> for Vec<Amp<P>> {
    fn from(state: State<P>) -> Self { state.data }
}

impl<'a, P: Policy> From<&'a mut State<P>> for Update<'a, Amp<P>> {
    fn from(state: &'a mut State<P>) -> Self { Self::InPlace(&mut state.data) }
}

impl<P: Policy> State<P> {
    /// Wrap an existing amplitude vector.
    ///
    /// The length should be a power of two.
    pub fn from_vec(data: Vec<Amp<P>>) -> Self {
        debug_assert!(data.len().is_power_of_two(), "State: length not a power of 2");
        Self { data }
    }

    /// Return the number of amplitudes.
    pub fn dim(&self) -> Index { self.data.len() }

    /// Return the number of qubits.
    pub fn n_qubits(&self) -> Qubit { self.data.len().trailing_zeros() as Qubit }

    /// Release the underlying vector.
    pub fn into_vec(self) -> Vec<Amp<P>> { self.data }
}

/// Allocate `dim` zeroed amplitudes, reporting failure instead of aborting.
pub(crate) fn try_alloc<T>(dim: Index) -> Result<Vec<T>>
where T: Zero + Clone
{
    let mut data: Vec<T> = Vec::new();
    if data.try_reserve_exact(dim).is_err() {
        warn!(dim, "state allocation failed");
        return Err(Error::Alloc { dim });
    }
    data.resize(dim, T::zero());
    Ok(data)
}

/// Printable dump of a state, returned by [`Engine::display`].
pub struct Display<'a, P: Policy> {
    qs: &'a [Amp<P>],
    n_qubits: Qubit,
    q_limit: Qubit,
}

impl<'a, P: Policy> fmt::Display for Display<'a, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f, "{} qubits {} simulator (little endian)", self.n_qubits, P::NAME)?;
        if self.n_qubits > self.q_limit {
            return writeln!(
                f, "<{} amplitudes; exceeds the {}-qubit display limit>",
                self.qs.len(), self.q_limit,
            );
        }
        for (i, a) in self.qs.iter().enumerate() {
            writeln!(f, "{:0w$b}: {}, {}", i, a.re, a.im, w = self.n_qubits)?;
        }
        Ok(())
    }
}

impl<P: Policy> Engine<P> {
    /// Allocate a new state of `dim` amplitudes.
    ///
    /// If `zero_state` is `true`, the state is initialized to ∣0...0⟩;
    /// otherwise every amplitude is zero and the caller is expected to fill it.
    pub fn init_state(&self, dim: Index, zero_state: bool) -> Result<State<P>> {
        debug!(policy = P::NAME, dim, zero_state, "init state");
        let mut data: Vec<Amp<P>> = try_alloc(dim)?;
        if zero_state {
            if let Some(a0) = data.first_mut() { *a0 = Complex::one(); }
        }
        Ok(State { data })
    }

    /// Release a state. Equivalent to dropping it.
    pub fn free_state(&self, qs: State<P>) { drop(qs); }

    /// Set every amplitude to zero without reallocating.
    pub fn reset(&self, qs: &mut [Amp<P>]) {
        let dim = qs.len();
        if self.is_par(dim) {
            use rayon::prelude::*;
            qs.par_iter_mut().for_each(|a| { *a = Complex::zero(); });
        } else {
            qs.fill(Complex::zero());
        }
    }

    /// Return an independently owned copy of `qs`.
    pub fn copy(&self, qs: &[Amp<P>]) -> Result<State<P>> {
        let mut data: Vec<Amp<P>> = try_alloc(qs.len())?;
        self.copy_into(qs, &mut data);
        Ok(State { data })
    }

    pub(crate) fn copy_into(&self, src: &[Amp<P>], des: &mut [Amp<P>]) {
        if self.is_par(src.len()) {
            use rayon::prelude::*;
            des.par_iter_mut().zip(src.par_iter()).for_each(|(d, s)| { *d = *s; });
        } else {
            des.copy_from_slice(src);
        }
    }

    /// Export all amplitudes into a new vector.
    pub fn get_qs(&self, qs: &[Amp<P>]) -> Result<Vec<Amp<P>>> {
        self.copy(qs).map(State::into_vec)
    }

    /// Overwrite all amplitudes of `qs` with `values`.
    ///
    /// *Panics if the lengths differ.*
    pub fn set_qs(&self, qs: &mut [Amp<P>], values: &[Amp<P>]) {
        assert_eq!(qs.len(), values.len(), "set_qs: length mismatch");
        self.copy_into(values, qs);
    }

    /// Return a printable dump of `qs`, listing every amplitude if
    /// `n_qubits <= q_limit`.
    pub fn display<'a>(&self, qs: &'a [Amp<P>], n_qubits: Qubit, q_limit: Qubit)
        -> Display<'a, P>
    {
        Display { qs, n_qubits, q_limit }
    }

    /// Convert `qs` entry-wise into a new state under policy `Q`.
    ///
    /// Each amplitude is rebuilt from its real and imaginary parts in the
    /// target precision; casting to the same precision is an exact copy.
    pub fn cast_to<Q: Policy>(&self, qs: &[Amp<P>]) -> Result<State<Q>> {
        debug!(from = P::NAME, to = Q::NAME, dim = qs.len(), "cast state");
        let dim = qs.len();
        let mut data: Vec<Amp<Q>> = try_alloc(dim)?;
        {
            let des = RawSlice::new(&mut data);
            self.for_each(dim, dim, |i| unsafe {
                des.set(i, cast_amp(qs[i]));
            });
        }
        Ok(State { data })
    }

    /// Zero every amplitude outside the subspace where all `ctrl_mask` bits
    /// are set.
    pub fn set_to_zero_except(&self, qs: &mut [Amp<P>], ctrl_mask: Index) {
        let cond = Condition::new(ctrl_mask, ctrl_mask);
        let dim = qs.len();
        let raw = RawSlice::new(qs);
        self.for_each(dim, dim, |i| unsafe {
            if !cond.test(i) { raw.set(i, Complex::zero()); }
        });
    }

    /// Multiply every amplitude by `value`.
    pub fn qs_mul_value<'a, U>(&self, update: U, value: Amp<P>)
    where U: Into<Update<'a, Amp<P>>>, P: 'a
    {
        let update = update.into();
        let dim = update.dim();
        let (src, des) = update.into_raw();
        self.for_each(dim, dim, |i| unsafe {
            des.set(i, src.get(i) * value);
        });
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::policy::{ CpuF32, CpuF64, WideF64 };
    use num_complex::{ Complex32 as C32, Complex64 as C64 };

    #[test]
    fn init_zero_state() {
        let e: Engine<CpuF64> = Engine::new();
        let qs = e.init_state(8, true).unwrap();
        assert_eq!(qs.dim(), 8);
        assert_eq!(qs.n_qubits(), 3);
        assert_eq!(qs[0], C64::new(1.0, 0.0));
        assert!(qs[1..].iter().all(|a| *a == C64::zero()));
        let blank = e.init_state(8, false).unwrap();
        assert!(blank.iter().all(|a| *a == C64::zero()));
    }

    #[test]
    fn init_state_reports_exhaustion() {
        let e: Engine<CpuF64> = Engine::new();
        let res = e.init_state(usize::MAX / 2, true);
        assert!(matches!(res, Err(Error::Alloc { .. })));
    }

    #[test]
    fn reset_copy_and_set() {
        let e: Engine<WideF64> = Engine::with_dim_th(1);
        let mut qs = e.init_state(16, true).unwrap();
        qs[5] = C64::new(0.25, -0.5);
        let cp = e.copy(&qs).unwrap();
        e.reset(&mut qs);
        assert!(qs.iter().all(|a| *a == C64::zero()));
        assert_eq!(cp[5], C64::new(0.25, -0.5));
        e.set_qs(&mut qs, &cp);
        assert_eq!(qs, cp);
        assert_eq!(e.get_qs(&qs).unwrap(), cp.into_vec());
    }

    #[test]
    fn cast_round_trip_is_single_rounded() {
        let e64: Engine<CpuF64> = Engine::new();
        let e32: Engine<CpuF32> = Engine::new();
        let x = C64::new(0.1, 1.0 / 3.0);
        let qs = State::<CpuF64>::from_vec(vec![x, -x]);
        let single = e64.cast_to::<CpuF32>(&qs).unwrap();
        assert_eq!(single[0], C32::new(0.1_f32, (1.0 / 3.0_f64) as f32));
        let double = e32.cast_to::<CpuF64>(&single).unwrap();
        assert_eq!(double[0].re, 0.1_f32 as f64);
        assert_ne!(double[0].re, 0.1);
        assert_eq!(double[1], -double[0]);
        let same = e64.cast_to::<WideF64>(&qs).unwrap();
        assert_eq!(same.into_vec(), qs.into_vec());
    }

    #[test]
    fn zero_except_and_scale() {
        let e: Engine<CpuF64> = Engine::new();
        let mut qs: Vec<C64> = (0..8).map(|i| C64::new(i as f64, 0.0)).collect();
        e.set_to_zero_except(&mut qs, 0b101);
        let expected: Vec<C64>
            = [0.0, 0.0, 0.0, 0.0, 0.0, 5.0, 0.0, 7.0].iter()
            .map(|x| C64::new(*x, 0.0))
            .collect();
        assert_eq!(qs, expected);

        let mut des = vec![C64::zero(); 8];
        e.qs_mul_value(Update::OutOfPlace { src: &qs[..], des: &mut des[..] }, C64::i());
        assert_eq!(des[7], C64::new(0.0, 7.0));
        assert_eq!(qs[7], C64::new(7.0, 0.0));
        e.qs_mul_value(&mut qs, C64::new(2.0, 0.0));
        assert_eq!(qs[5], C64::new(10.0, 0.0));
    }

    #[test]
    fn display_respects_limit() {
        let e: Engine<CpuF64> = Engine::new();
        let qs = e.init_state(4, true).unwrap();
        let shown = e.display(&qs, 2, 10).to_string();
        assert!(shown.contains("00: 1, 0"));
        assert_eq!(shown.lines().count(), 5);
        let hidden = e.display(&qs, 2, 1).to_string();
        assert_eq!(hidden.lines().count(), 2);
    }
}

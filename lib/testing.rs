//! Shared fixtures for unit tests.

use nalgebra::DMatrix;
use num_complex::{ Complex, Complex64 };
use num_traits::{ One, Zero };
use rand::{ rngs::StdRng, Rng, SeedableRng };
use crate::{
    policy::{ Amp, Policy, Real },
    state::State,
};

/// The `n`-qubit basis state ∣`idx`⟩.
pub(crate) fn basis<P: Policy>(n: usize, idx: usize) -> State<P> {
    let mut data: Vec<Amp<P>> = vec![Complex::zero(); 1 << n];
    data[idx] = Complex::one();
    State::from_vec(data)
}

/// A normalized `n`-qubit state with uniformly random components.
pub(crate) fn random_state<P: Policy>(n: usize, seed: u64) -> State<P> {
    let mut rng = StdRng::seed_from_u64(seed);
    let raw: Vec<(f64, f64)>
        = (0..1_usize << n)
        .map(|_| (rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0)))
        .collect();
    let norm: f64 = raw.iter().map(|(a, b)| a * a + b * b).sum::<f64>().sqrt();
    State::from_vec(
        raw.into_iter()
            .map(|(a, b)| {
                Complex::new(P::Real::from_f64(a / norm), P::Real::from_f64(b / norm))
            })
            .collect()
    )
}

/// Σ |a<sub>i</sub>|².
pub(crate) fn norm_sqr<R: Real>(qs: &[Complex<R>]) -> f64 {
    qs.iter().map(|a| a.norm_sqr().to_f64()).sum()
}

/// Assert element-wise closeness of two amplitude arrays.
pub(crate) fn assert_close<R: Real>(a: &[Complex<R>], b: &[Complex<R>], tol: f64) {
    assert_eq!(a.len(), b.len(), "length mismatch");
    for (i, (ai, bi)) in a.iter().zip(b).enumerate() {
        let d = (*ai - *bi).norm().to_f64();
        assert!(d <= tol, "amplitude {}: {} vs {} (|Δ| = {:e})", i, ai, bi, d);
    }
}

/// Assert closeness of two complex scalars.
pub(crate) fn assert_close1<R: Real>(a: Complex<R>, b: Complex<R>, tol: f64) {
    let d = (a - b).norm().to_f64();
    assert!(d <= tol, "{} vs {} (|Δ| = {:e})", a, b, d);
}

/// Dense reference matrix of a Pauli operator.
pub(crate) fn pauli_dense(p: crate::pauli::Pauli) -> DMatrix<Complex64> {
    let m = p.matrix::<f64>();
    DMatrix::from_fn(2, 2, |r, c| m[r][c])
}

/// cos(θ/2) *I* − i sin(θ/2) *G* for a Hermitian involution *G*.
pub(crate) fn rotation_dense(g: &DMatrix<Complex64>, theta: f64) -> DMatrix<Complex64> {
    let (s, c) = (theta / 2.0).sin_cos();
    let n = g.nrows();
    DMatrix::<Complex64>::identity(n, n) * Complex64::new(c, 0.0)
        - g * Complex64::new(0.0, s)
}

/// Row-major nested vectors of a dense matrix.
pub(crate) fn rows(m: &DMatrix<Complex64>) -> Vec<Vec<Complex64>> {
    (0..m.nrows())
        .map(|r| (0..m.ncols()).map(|c| m[(r, c)]).collect())
        .collect()
}

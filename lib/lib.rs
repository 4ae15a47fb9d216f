//! Dense state-vector kernels for simulating registers of qubits.
//!
//! A state of *n* qubits is stored as all 2<sup>*n*</sup> complex amplitudes,
//! and every operation (gates, their derivatives with respect to rotation
//! angles, inner products, and masked reductions) is a data-parallel pass
//! over that array. Kernels are methods of an [`Engine`], which is generic
//! over a [`Policy`] fixing the floating-point precision and the shape of the
//! inner loop.
//!
//! There is no circuit layer here: kernels trust their inputs (qubit indices
//! in range, matching lengths, unitary matrices where a gate is meant) and
//! only report allocation failure as an error.

pub mod config;
pub mod error;
pub mod policy;
pub mod mask;
mod par;
pub mod engine;
pub mod state;
mod coset;
pub mod pauli;
mod elementary;
mod matrix;
mod rotation;
mod expect;
mod reduce;
pub mod sparse;

#[cfg(test)]
pub(crate) mod testing;

pub use num_complex::{ Complex32 as C32, Complex64 as C64 };
pub use engine::{ Engine, Update };
pub use error::{ Error, Result };
pub use mask::{ Condition, Index, Qubit };
pub use pauli::Pauli;
pub use policy::{ Amp, CpuF32, CpuF64, Policy, Real, WideF32, WideF64 };
pub use sparse::{ CsrMatrix, PauliTerm, SparseOperator };
pub use state::State;

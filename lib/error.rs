//! Recoverable failures.
//!
//! Nearly everything the engine does is a total function of its inputs under
//! documented preconditions; the only thing that can go wrong at runtime is
//! running out of memory for a new amplitude buffer.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// A buffer of `dim` amplitudes could not be allocated.
    #[error("failed to allocate a state of {dim} amplitudes")]
    Alloc { dim: usize },

    /// A parallelization threshold given through the environment could not
    /// be parsed.
    #[error("invalid parallel threshold {value:?}: expected a positive integer")]
    BadThreshold { value: String },
}

pub type Result<T> = std::result::Result<T, Error>;

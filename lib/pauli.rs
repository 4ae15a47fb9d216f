//! Single-qubit Pauli operators as bit-flip/phase pairs.
//!
//! Every Pauli matrix *P* permutes the two basis states of its qubit and
//! attaches a phase, so that (*P* **a**)<sub>*b*</sub> = φ<sub>*P*</sub>(*b*)
//! *a*<sub>*b* ⊕ *f*<sub>*P*</sub></sub>:
//!
//! | *P* | *f* | φ(0) | φ(1) |
//! |:---:|:---:|:----:|:----:|
//! | *X* | 1   | 1    | 1    |
//! | *Y* | 1   | −i   | i    |
//! | *Z* | 0   | 1    | −1   |
//!
//! Rotation kernels and Pauli-string products are all built from this table
//! instead of from explicit matrices.

use std::fmt;
use num_complex::Complex;
use num_traits::{ One, Zero };
use crate::policy::Real;

/// A non-identity single-qubit Pauli operator.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Pauli {
    X,
    Y,
    Z,
}

impl fmt::Display for Pauli {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::X => write!(f, "X"),
            Self::Y => write!(f, "Y"),
            Self::Z => write!(f, "Z"),
        }
    }
}

impl Pauli {
    /// Return `true` if `self` exchanges ∣0⟩ and ∣1⟩.
    pub fn flips(self) -> bool { matches!(self, Self::X | Self::Y) }

    /// Return `true` if `self` attaches a sign to ∣1⟩.
    pub fn signs(self) -> bool { matches!(self, Self::Y | Self::Z) }

    /// Phase φ(*b*) attached to output bit `b` (see the module docs).
    pub fn phase<R: Real>(self, b: bool) -> Complex<R> {
        match (self, b) {
            (Self::X, _) => Complex::one(),
            (Self::Y, false) => -Complex::i(),
            (Self::Y, true) => Complex::i(),
            (Self::Z, false) => Complex::one(),
            (Self::Z, true) => -Complex::<R>::one(),
        }
    }

    /// The 2×2 matrix of `self`.
    pub fn matrix<R: Real>(self) -> [[Complex<R>; 2]; 2] {
        let mut m = [[Complex::zero(); 2]; 2];
        let f = usize::from(self.flips());
        for b in 0..2 {
            m[b][b ^ f] = self.phase(b == 1);
        }
        m
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use num_complex::Complex64 as C64;

    #[test]
    fn matrices() {
        let (o, z, i) = (C64::one(), C64::zero(), C64::i());
        assert_eq!(Pauli::X.matrix::<f64>(), [[z, o], [o, z]]);
        assert_eq!(Pauli::Y.matrix::<f64>(), [[z, -i], [i, z]]);
        assert_eq!(Pauli::Z.matrix::<f64>(), [[o, z], [z, -o]]);
        assert!(Pauli::Y.flips() && Pauli::Y.signs());
        assert!(!Pauli::Z.flips() && !Pauli::X.signs());
    }
}

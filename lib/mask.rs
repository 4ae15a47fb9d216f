//! Bit-mask arithmetic mapping qubit lists onto amplitude-array strides.
//!
//! Amplitude index *i* of an *n*-qubit state encodes the basis state whose
//! *k*-th qubit is bit *k* of *i*. A gate on *k* target qubits therefore acts
//! independently on each of the 2<sup>*n*−*k*</sup> cosets of the non-target
//! bits: for a coset "base" index *b* with every target bit cleared, the
//! 2<sup>*k*</sup> amplitudes at *b* | *o*<sub>*r*</sub> form the local
//! vector the gate's matrix multiplies, where *o*<sub>*r*</sub> places bit *j*
//! of the local index *r* at the *j*-th smallest target qubit.
//!
//! Coset bases are enumerated by counting *l* = 0, ..., 2<sup>*n*−*k*</sup> −
//! 1 and inserting a zero bit at every target position (in ascending order).
//! Controls are checked against the base with a [`Condition`].

use itertools::Itertools;

/// An index into the amplitude array, or a bit pattern over such indices.
pub type Index = usize;

/// A qubit, identified by its bit position in an amplitude index.
pub type Qubit = usize;

/// OR together `1 << q` for every qubit `q` in `qubits`.
pub fn qubit_mask(qubits: &[Qubit]) -> Index {
    qubits.iter().fold(0, |acc, q| acc | (1 << q))
}

/// Insert a zero bit at position `q`, shifting higher bits up by one.
#[inline(always)]
pub fn insert_zero(l: Index, q: Qubit) -> Index {
    let low = (1 << q) - 1;
    ((l & !low) << 1) | (l & low)
}

/// A mask/condition pair: index *i* belongs to the selected subspace iff
/// `i & mask == condi`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Condition {
    pub mask: Index,
    pub condi: Index,
}

impl Default for Condition {
    fn default() -> Self { Self::always() }
}

impl Condition {
    /// Create a new condition from a raw mask/value pair.
    pub fn new(mask: Index, condi: Index) -> Self { Self { mask, condi } }

    /// The condition satisfied by every index.
    pub fn always() -> Self { Self { mask: 0, condi: 0 } }

    /// Select indices whose bits at every control qubit are 1.
    pub fn controls(ctrls: &[Qubit]) -> Self {
        let mask = qubit_mask(ctrls);
        Self { mask, condi: mask }
    }

    /// Select indices with qubit `q` fixed to `bit`.
    pub fn qubit_is(q: Qubit, bit: bool) -> Self {
        let mask = 1 << q;
        Self { mask, condi: if bit { mask } else { 0 } }
    }

    /// Return `true` if no index is excluded.
    pub fn is_trivial(&self) -> bool { self.mask == 0 }

    #[inline(always)]
    pub fn test(&self, i: Index) -> bool { i & self.mask == self.condi }
}

/// Masks for a gate on a single target qubit.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SingleMask {
    /// `1 << obj`
    pub obj: Index,
    /// Bits below the target.
    pub low: Index,
    /// Bits above the target (in the coset counter).
    pub high: Index,
    /// Control condition.
    pub ctrl: Condition,
}

impl SingleMask {
    pub fn new(obj: Qubit, ctrls: &[Qubit]) -> Self {
        let low = (1 << obj) - 1;
        Self { obj: 1 << obj, low, high: !low, ctrl: Condition::controls(ctrls) }
    }

    /// Base index of the `l`-th coset (target bit cleared).
    #[inline(always)]
    pub fn base(&self, l: Index) -> Index {
        ((l & self.high) << 1) | (l & self.low)
    }
}

/// Masks for a gate on two target qubits.
///
/// Unlike [`GateMask`], the two partner offsets keep the order in which the
/// targets were given, which closed-form two-qubit kernels rely on to tell
/// the roles of the targets apart.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DoubleMask {
    /// `1 << objs[0]`
    pub q0: Index,
    /// `1 << objs[1]`
    pub q1: Index,
    /// Smaller target bit position.
    pub lo: Qubit,
    /// Larger target bit position.
    pub hi: Qubit,
    /// Control condition.
    pub ctrl: Condition,
}

impl DoubleMask {
    /// *Panics if fewer than two targets are given.*
    pub fn new(objs: &[Qubit], ctrls: &[Qubit]) -> Self {
        let (a, b) = (objs[0], objs[1]);
        debug_assert_ne!(a, b, "DoubleMask: repeated target qubit");
        Self {
            q0: 1 << a,
            q1: 1 << b,
            lo: a.min(b),
            hi: a.max(b),
            ctrl: Condition::controls(ctrls),
        }
    }

    /// Base index of the `l`-th coset (both target bits cleared).
    #[inline(always)]
    pub fn base(&self, l: Index) -> Index {
        insert_zero(insert_zero(l, self.lo), self.hi)
    }

    /// The four indices of the `l`-th coset, ordered by local index
    /// `r = b0 + 2 b1` with `b0` the bit of `objs[0]` and `b1` that of
    /// `objs[1]`.
    #[inline(always)]
    pub fn quad(&self, l: Index) -> [Index; 4] {
        let b = self.base(l);
        [b, b | self.q0, b | self.q1, b | self.q0 | self.q1]
    }
}

/// Masks for a gate on an arbitrary number of target qubits.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GateMask {
    /// Target qubits in ascending order.
    pub objs: Vec<Qubit>,
    /// OR of all target bits.
    pub obj_mask: Index,
    /// Control condition.
    pub ctrl: Condition,
    /// `offsets[r]` places bit `j` of local index `r` at `objs[j]`.
    pub offsets: Vec<Index>,
}

impl GateMask {
    pub fn new(objs: &[Qubit], ctrls: &[Qubit]) -> Self {
        let objs: Vec<Qubit> = objs.iter().copied().sorted().collect();
        debug_assert!(
            objs.windows(2).all(|w| w[0] != w[1]),
            "GateMask: repeated target qubit",
        );
        let offsets: Vec<Index>
            = (0..1_usize << objs.len())
            .map(|r| {
                objs.iter().enumerate()
                    .filter(|(j, _)| r >> j & 1 == 1)
                    .fold(0, |acc, (_, q)| acc | (1 << q))
            })
            .collect();
        Self {
            obj_mask: qubit_mask(&objs),
            objs,
            ctrl: Condition::controls(ctrls),
            offsets,
        }
    }

    /// Number of target qubits.
    pub fn n_objs(&self) -> usize { self.objs.len() }

    /// Dimension of the local (target) space.
    pub fn local_dim(&self) -> usize { self.offsets.len() }

    /// Number of cosets in a state of dimension `dim`.
    pub fn n_cosets(&self, dim: Index) -> Index { dim >> self.objs.len() }

    /// Base index of the `l`-th coset (all target bits cleared).
    #[inline(always)]
    pub fn base(&self, l: Index) -> Index {
        self.objs.iter().fold(l, |acc, q| insert_zero(acc, *q))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn condition_controls() {
        let c = Condition::controls(&[0, 2]);
        assert_eq!(c.mask, 0b101);
        assert!(c.test(0b101));
        assert!(c.test(0b111));
        assert!(!c.test(0b100));
        assert!(Condition::controls(&[]).is_trivial());
        assert!((0..16).all(|i| Condition::always().test(i)));
        assert!(Condition::qubit_is(1, false).test(0b101));
        assert!(!Condition::qubit_is(1, true).test(0b101));
    }

    #[test]
    fn single_mask_cosets() {
        let m = SingleMask::new(1, &[]);
        let bases: Vec<Index> = (0..4).map(|l| m.base(l)).collect();
        assert_eq!(bases, vec![0b000, 0b001, 0b100, 0b101]);
        assert!(bases.iter().all(|b| b & m.obj == 0));
    }

    #[test]
    fn double_mask_order() {
        // objs given high-first: local bit 0 follows objs[0]
        let m = DoubleMask::new(&[2, 0], &[]);
        assert_eq!(m.quad(0), [0b000, 0b100, 0b001, 0b101]);
        assert_eq!(m.quad(1), [0b010, 0b110, 0b011, 0b111]);
    }

    #[test]
    fn gate_mask_offsets_ascending() {
        let m = GateMask::new(&[3, 0, 1], &[2]);
        assert_eq!(m.objs, vec![0, 1, 3]);
        assert_eq!(m.offsets, vec![0b0000, 0b0001, 0b0010, 0b0011,
                                   0b1000, 0b1001, 0b1010, 0b1011]);
        assert_eq!(m.base(0), 0);
        assert_eq!(m.base(1), 0b0100);
        assert_eq!(m.n_cosets(16), 2);
        assert_eq!(m.ctrl, Condition::new(0b100, 0b100));
    }

    #[test]
    fn coset_bases_partition_index_space() {
        let m = GateMask::new(&[1, 4], &[]);
        let dim = 1 << 5;
        let mut seen = vec![false; dim];
        for l in 0..m.n_cosets(dim) {
            let b = m.base(l);
            for off in m.offsets.iter() {
                assert!(!seen[b | off]);
                seen[b | off] = true;
            }
        }
        assert!(seen.into_iter().all(|s| s));
    }
}

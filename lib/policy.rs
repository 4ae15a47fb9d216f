//! Precision and instruction-set specializations.
//!
//! Every kernel in this crate is written once, generically over a [`Policy`],
//! and monomorphized for each of the four concrete policies below. A policy
//! fixes
//! - the real type underlying each complex amplitude (`f32` or `f64`), and
//! - the block width of the innermost index loop: the portable policies walk
//!   indices one at a time, the wide ones in fixed-size blocks that the
//!   compiler can unroll and vectorize.
//!
//! Nothing is dispatched dynamically; a specialization is picked once, when
//! an [`Engine`][crate::Engine] is named.

use std::{ fmt, iter::Sum };
use num_complex::Complex;
use num_traits::{ Float, FloatConst };

/// Real scalar underlying a complex amplitude.
pub trait Real
where Self: Float + FloatConst + Sum + Send + Sync + fmt::Debug + fmt::Display + 'static
{
    /// Widen to `f64` (lossless for both implementors).
    fn to_f64(self) -> f64;

    /// Narrow from `f64`, rounding to nearest.
    fn from_f64(x: f64) -> Self;
}

impl Real for f32 {
    fn to_f64(self) -> f64 { self as f64 }

    fn from_f64(x: f64) -> Self { x as f32 }
}

impl Real for f64 {
    fn to_f64(self) -> f64 { self }

    fn from_f64(x: f64) -> Self { x }
}

/// A compile-time bundle of numeric precision and loop shape.
pub trait Policy: Copy + Send + Sync + fmt::Debug + 'static {
    /// Real component type.
    type Real: Real;

    /// Number of consecutive loop indices handled per block.
    const LANES: usize;

    /// Human-readable name, used in logs and debug output.
    const NAME: &'static str;

    /// Suggested parallelization threshold for this specialization.
    const DIM_TH: usize = crate::config::DIM_TH;
}

/// A single complex amplitude under policy `P`.
pub type Amp<P> = Complex<<P as Policy>::Real>;

/// Portable single-precision policy.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct CpuF32;

/// Portable double-precision policy.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct CpuF64;

/// Wide-block single-precision policy.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct WideF32;

/// Wide-block double-precision policy.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct WideF64;

impl Policy for CpuF32 {
    type Real = f32;
    const LANES: usize = 1;
    const NAME: &'static str = "cpu-f32";
}

impl Policy for CpuF64 {
    type Real = f64;
    const LANES: usize = 1;
    const NAME: &'static str = "cpu-f64";
}

// 256-bit blocks: eight f32 or four f64 components, i.e. four or two
// amplitudes per register, doubled to keep two registers in flight
impl Policy for WideF32 {
    type Real = f32;
    const LANES: usize = 8;
    const NAME: &'static str = "wide-f32";
}

impl Policy for WideF64 {
    type Real = f64;
    const LANES: usize = 4;
    const NAME: &'static str = "wide-f64";
}

/// Convert a real literal into `R`.
#[inline(always)]
pub(crate) fn re<R: Real>(x: f64) -> R { R::from_f64(x) }

/// Convert a complex value between precisions component-wise.
#[inline(always)]
pub(crate) fn cast_amp<R, S>(z: Complex<R>) -> Complex<S>
where
    R: Real,
    S: Real,
{
    Complex::new(S::from_f64(z.re.to_f64()), S::from_f64(z.im.to_f64()))
}

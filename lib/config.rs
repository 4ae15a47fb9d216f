//! Process-wide defaults.
//!
//! The only tunable is the parallelization threshold: the state dimension at
//! or above which a kernel fans its index loop out over the rayon pool. Each
//! [`Policy`][crate::policy::Policy] carries a built-in value (2<sup>13</sup>
//! amplitudes unless it says otherwise), which can be replaced for the whole
//! process through the `STATEVEC_DIM_TH` environment variable or at any time
//! with [`set_default_dim_th`]. Individual [`Engine`][crate::Engine]s can
//! carry their own value (see
//! [`Engine::with_dim_th`][crate::Engine::with_dim_th]).

use std::sync::atomic::{ AtomicUsize, Ordering };
use once_cell::sync::Lazy;
use tracing::{ debug, warn };
use crate::error::{ Error, Result };

/// Name of the environment variable read for the default threshold.
pub const DIM_TH_VAR: &str = "STATEVEC_DIM_TH";

/// Built-in parallelization threshold.
pub const DIM_TH: usize = 1 << 13;

// read once, on first use
static ENV_DIM_TH: Lazy<Option<usize>> =
    Lazy::new(|| {
        let value = std::env::var(DIM_TH_VAR).ok()?;
        match parse_dim_th(&value) {
            Ok(th) => {
                debug!(dim_th = th, "parallel threshold from {}", DIM_TH_VAR);
                Some(th)
            },
            Err(err) => {
                warn!(%err, "ignoring {}", DIM_TH_VAR);
                None
            },
        }
    });

// 0 = not set at runtime
static RUNTIME_DIM_TH: AtomicUsize = AtomicUsize::new(0);

/// Parse a threshold value as given in the environment.
pub fn parse_dim_th(value: &str) -> Result<usize> {
    value.trim().parse::<usize>().ok()
        .filter(|th| *th > 0)
        .ok_or_else(|| Error::BadThreshold { value: value.to_string() })
}

/// Return the process-wide threshold override, if any: the value last
/// passed to [`set_default_dim_th`], or else the one read from
/// `STATEVEC_DIM_TH`.
pub fn dim_th_override() -> Option<usize> {
    pick_override(RUNTIME_DIM_TH.load(Ordering::Relaxed), *ENV_DIM_TH)
}

fn pick_override(runtime: usize, env: Option<usize>) -> Option<usize> {
    match runtime {
        0 => env,
        th => Some(th),
    }
}

/// Return the current process-wide parallelization threshold, falling back
/// to [`DIM_TH`].
pub fn default_dim_th() -> usize { dim_th_override().unwrap_or(DIM_TH) }

/// Replace the process-wide parallelization threshold.
///
/// `None` clears a previous call: the `STATEVEC_DIM_TH` value read at
/// startup applies again if there was one, and each policy's built-in value
/// otherwise. Engines created before the call keep the value they were
/// created with.
pub fn set_default_dim_th(dim_th: Option<usize>) {
    debug!(?dim_th, "set default parallel threshold");
    RUNTIME_DIM_TH.store(dim_th.map(|th| th.max(1)).unwrap_or(0), Ordering::Relaxed);
}

pub(crate) fn resolve_dim_th(policy_default: usize) -> usize {
    dim_th_override().unwrap_or(policy_default)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parse_thresholds() {
        assert_eq!(parse_dim_th("8192").unwrap(), 8192);
        assert_eq!(parse_dim_th(" 16 ").unwrap(), 16);
        assert!(matches!(parse_dim_th("0"), Err(Error::BadThreshold { .. })));
        assert!(matches!(parse_dim_th("lots"), Err(Error::BadThreshold { .. })));
    }

    #[test]
    fn runtime_override_falls_back_to_environment() {
        assert_eq!(pick_override(0, Some(64)), Some(64));
        assert_eq!(pick_override(16, Some(64)), Some(16));
        assert_eq!(pick_override(16, None), Some(16));
        assert_eq!(pick_override(0, None), None);
    }
}

//! Throat area split between the core and barrier streams.

use isp_core::numeric::bisect_fixed;

/// Bisection count for the split. 2^-40 is below f64 resolution on [0, 1].
pub const SPLIT_ITERATIONS: usize = 40;

/// Mixture ratio of the combined flow when the core stream owns `core_fraction`
/// of the throat area.
///
/// Each stream's flow per unit throat area scales as `1 / cstar`; the
/// oxidizer share of that flow is `MR / (MR + 1)`.
pub fn combined_mixture_ratio(
    core_fraction: f64,
    mr_core: f64,
    mr_barrier: f64,
    cstar_core: f64,
    cstar_barrier: f64,
) -> f64 {
    let ccm = cstar_core * (mr_core + 1.0);
    let cbm = cstar_barrier * (mr_barrier + 1.0);
    let atc = core_fraction;
    let atb = 1.0 - core_fraction;
    (atc * mr_core / ccm + atb * mr_barrier / cbm) / (atc / ccm + atb / cbm)
}

/// Fraction of throat area belonging to the core stream such that the
/// combined mixture ratio equals the engine mixture ratio `MRc * (1 - ffc)`.
///
/// Fixed 40-step bisection on `[0, 1]`; returns the final bracket midpoint.
/// When the target lies outside the reachable range the result pins to the
/// nearer end of the bracket.
pub fn solve_throat_split(
    mr_core: f64,
    mr_barrier: f64,
    ffc: f64,
    cstar_core: f64,
    cstar_barrier: f64,
) -> f64 {
    let target = mr_core * (1.0 - ffc);
    bisect_fixed(0.0, 1.0, SPLIT_ITERATIONS, |f| {
        combined_mixture_ratio(f, mr_core, mr_barrier, cstar_core, cstar_barrier) < target
    })
}

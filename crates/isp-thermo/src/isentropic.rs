//! Calorically perfect gas nozzle relations.
//!
//! All functions work in US-customary units: temperature in degR, molecular
//! weight in lbm/lbmol, velocities in ft/s.

use isp_core::bisect_fixed;
use isp_core::units::constants::{GC, R_UNIVERSAL_US};

const MACH_MAX: f64 = 50.0;
const MACH_ITERATIONS: usize = 100;

/// Nozzle area ratio A/A* at a given Mach number.
pub fn area_ratio_from_mach(gamma: f64, mach: f64) -> f64 {
    let gp1 = gamma + 1.0;
    let gm1 = gamma - 1.0;
    let term = (2.0 / gp1) * (1.0 + 0.5 * gm1 * mach * mach);
    term.powf(gp1 / (2.0 * gm1)) / mach
}

/// Supersonic Mach number for a nozzle area ratio (>= 1).
pub fn supersonic_mach(gamma: f64, area_ratio: f64) -> f64 {
    if area_ratio <= 1.0 {
        return 1.0;
    }
    bisect_fixed(1.0, MACH_MAX, MACH_ITERATIONS, |m| {
        area_ratio_from_mach(gamma, m) < area_ratio
    })
}

/// Stagnation over static pressure at a Mach number.
pub fn pressure_ratio_from_mach(gamma: f64, mach: f64) -> f64 {
    (1.0 + 0.5 * (gamma - 1.0) * mach * mach).powf(gamma / (gamma - 1.0))
}

/// Mach number for a stagnation over static pressure ratio.
pub fn mach_from_pressure_ratio(gamma: f64, pc_over_p: f64) -> f64 {
    let gm1 = gamma - 1.0;
    let t = pc_over_p.max(1.0).powf(gm1 / gamma);
    (2.0 * (t - 1.0) / gm1).sqrt()
}

/// Chamber over exit pressure for an area ratio.
pub fn pressure_ratio_at_area_ratio(gamma: f64, area_ratio: f64) -> f64 {
    pressure_ratio_from_mach(gamma, supersonic_mach(gamma, area_ratio))
}

/// Specific gas constant times gc, ft²/(s²·degR).
fn gas_constant(mol_weight: f64) -> f64 {
    R_UNIVERSAL_US / mol_weight * GC
}

/// Characteristic velocity [ft/s].
pub fn cstar(gamma: f64, chamber_temperature: f64, mol_weight: f64) -> f64 {
    let gp1 = gamma + 1.0;
    let gm1 = gamma - 1.0;
    let big_gamma = (2.0 / gp1).powf(gp1 / (2.0 * gm1));
    (gamma * gas_constant(mol_weight) * chamber_temperature).sqrt() / (gamma * big_gamma)
}

/// Ideal vacuum thrust coefficient at an area ratio.
pub fn vacuum_cf(gamma: f64, area_ratio: f64) -> f64 {
    let gp1 = gamma + 1.0;
    let gm1 = gamma - 1.0;
    let pe_over_pc = 1.0 / pressure_ratio_at_area_ratio(gamma, area_ratio);
    let momentum = (2.0 * gamma * gamma / gm1
        * (2.0 / gp1).powf(gp1 / gm1)
        * (1.0 - pe_over_pc.powf(gm1 / gamma)))
    .sqrt();
    momentum + pe_over_pc * area_ratio
}

/// Ideal vacuum specific impulse [s].
pub fn vacuum_isp(gamma: f64, chamber_temperature: f64, mol_weight: f64, area_ratio: f64) -> f64 {
    cstar(gamma, chamber_temperature, mol_weight) * vacuum_cf(gamma, area_ratio) / GC
}

/// Speed of sound [ft/s] at a static temperature.
pub fn sonic_velocity(gamma: f64, temperature: f64, mol_weight: f64) -> f64 {
    (gamma * gas_constant(mol_weight) * temperature).sqrt()
}

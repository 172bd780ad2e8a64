//! Empirical efficiency correlations.
//!
//! Pure curve fits. Inputs are in the units the fits were built in
//! (psia, inches, seconds).

use crate::error::{PerfError, PerfResult};
use isp_core::numeric::interp_quadratic;
use tracing::warn;

const PERCENT_BELL: [f64; 6] = [60.0, 70.0, 80.0, 90.0, 100.0, 120.0];

// (a, b, c) in eff = a - b/eps - c/sqrt(eps), one row per PERCENT_BELL entry
const DIVERGENCE_FITS: [(f64, f64, f64); 6] = [
    (0.9795420864904427, 0.0981313348710805, 0.02104281165829153),
    (0.9880774081200867, 0.09006900924820571, 0.00018544403669973342),
    (0.9941974506864701, 0.06403015875188575, 1.7996764332283723e-08),
    (0.9971299043689117, 0.03820495281446622, 2.591748813286344e-08),
    (0.9989509055092716, 0.027302115360697286, 2.227978789532209e-08),
    (0.9997896193436784, 0.00836547101429648, 1.8072678278328226e-08),
];

/// Divergence efficiency of a bell nozzle.
///
/// Percent bell outside 60..=120 is clamped; the returned advisory says so.
pub fn divergence_efficiency(area_ratio: f64, percent_bell: f64) -> (f64, Option<String>) {
    let mut advisory = None;
    let mut pb = percent_bell;
    if !(60.0..=120.0).contains(&pb) {
        pb = pb.clamp(60.0, 120.0);
        let msg = format!(
            "divergence efficiency %bell range is 60 to 120, {percent_bell} was input; using {pb}"
        );
        warn!("{msg}");
        advisory = Some(msg);
    }

    let effs: Vec<f64> = DIVERGENCE_FITS
        .iter()
        .map(|(a, b, c)| a - b / area_ratio - c / area_ratio.sqrt())
        .collect();
    (interp_quadratic(pb, &PERCENT_BELL, &effs), advisory)
}

/// Boundary-layer efficiency digitized from NASA SP-8120.
///
/// `pc` in psia, `throat_diameter` in inches.
pub fn boundary_layer_efficiency(pc: f64, throat_diameter: f64, area_ratio: f64) -> f64 {
    const A: f64 = 0.13956490814036465;
    const B: f64 = 0.4839954048378114;
    const C: f64 = -1.5290708783162201;
    const D: f64 = 1.8872208607881908;
    const E: f64 = 1.2281287531868839;
    const F: f64 = 1.1165014352424605;
    const G: f64 = 0.08873349847277191;

    let pxd = pc * throat_diameter;
    let frac = C + D * (E + area_ratio * F).ln();
    let loss = G * area_ratio / pxd + frac / (A + B * pxd.ln());
    (100.0 - loss) / 100.0
}

/// Credit a boundary-layer efficiency for regenerative cooling out to
/// `regen_area_ratio`.
///
/// Drag is 15% of the loss at eps=0 rising to 30% at eps=200; only the
/// enthalpy part of the loss is recovered.
pub fn regen_corrected_bl(eff_bl: f64, area_ratio: f64, regen_area_ratio: f64) -> f64 {
    if regen_area_ratio <= 1.0 {
        return eff_bl;
    }
    let bl_loss = 1.0 - eff_bl;
    let drag_frac = (0.15 + 0.15 * area_ratio / 200.0).min(0.3);
    let drag_loss = drag_frac * bl_loss;
    let enth_loss = if regen_area_ratio >= area_ratio {
        0.0
    } else {
        0.5 * (bl_loss - drag_loss) * (1.0 - regen_area_ratio / area_ratio)
    };
    1.0 - drag_loss - enth_loss
}

/// Rough pulsing efficiency from pulse width [s] and a 0..1 pulse quality.
pub fn pulsing_efficiency(pulse_width: f64, pulse_quality: f64) -> PerfResult<f64> {
    if !pulse_width.is_finite() || pulse_width <= 0.0 {
        return Err(PerfError::InvalidArg {
            what: format!("pulse width must be positive and finite, got {pulse_width}"),
        });
    }
    if !(0.0..=1.0).contains(&pulse_quality) {
        return Err(PerfError::InvalidArg {
            what: format!("pulse quality must lie in [0, 1], got {pulse_quality}"),
        });
    }
    let best = 100.0 - 0.1415451671778462 / pulse_width - 0.3648849301597481 / pulse_width.sqrt();
    let worst =
        100.0 - 0.027250694282230977 / pulse_width - 4.331742005085193 / pulse_width.sqrt();
    let eff = (worst + pulse_quality * (best - worst)) / 100.0;
    if eff <= 0.0 {
        return Err(PerfError::Domain {
            what: format!("pulse width {pulse_width} s is below the pulsing fit"),
        });
    }
    Ok(eff)
}

const RUP_THROAT: [f64; 6] = [0.75, 1.0, 1.5, 2.0, 2.5, 3.0];

/// Throat discharge coefficient from the upstream radius of curvature
/// (normalized by throat radius) and gamma.
pub fn discharge_coefficient(rup_throat: f64, gamma: f64) -> f64 {
    let ln_g = gamma.ln();
    let cds = [
        1.0 / (1.021593870476789 - 0.00639987485225013 * gamma),
        1.0 / (1.0129240686314567 - 0.0023339112881583077 * gamma),
        1.0 / (1.005933078723958 - 7.929354028900166e-05 * gamma),
        1.0 / (1.004296035576616 - 0.0006527109040944512 / gamma),
        1.0 / (1.0025011467929128 + 0.0005677730519755054 * ln_g),
        0.998188849337407 - 0.0005288719430737602 * ln_g,
    ];
    interp_quadratic(rup_throat, &RUP_THROAT, &cds)
}

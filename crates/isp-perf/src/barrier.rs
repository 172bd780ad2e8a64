//! Fuel film cooling barrier stream.
//!
//! The barrier is the film coolant plus the core flow it entrains along the
//! chamber wall. Entrainment follows the Aerojet "Combustion Effects on Film
//! Cooling" mixing-layer model: the entrained fraction grows with
//! `L'/Rcham * ko`, and the film effectiveness comes from a subsonic shape
//! factor on `Wentr/Wcool`.
//!
//! The barrier has no life of its own. The owning core stream evaluates it
//! through a borrowed [`CoreView`].

use crate::efficiency::{Efficiencies, EfficiencyKind};
use crate::error::{PerfError, PerfResult};
use crate::geometry::Geometry;
use isp_core::units::{SpecificImpulse, Temperature, Velocity, fps, psia, s, us};
use isp_thermo::{NozzleKinetics, ThermoOracle};
use tracing::{debug, warn};

/// Validated range of the entrainment constant.
pub const ENTRAINMENT_RANGE: (f64, f64) = (0.03, 0.06);

/// Frozen Isp below this is treated as an oracle failure.
const MIN_PLAUSIBLE_FROZEN_ISP: f64 = 10.0;

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BarrierConfig {
    /// Film coolant flow as percent of total fuel flow.
    pub ffc_percent: f64,
    /// Entrainment constant `ko`.
    pub entrainment_constant: f64,
}

impl Default for BarrierConfig {
    fn default() -> Self {
        Self {
            ffc_percent: 10.0,
            entrainment_constant: 0.035,
        }
    }
}

impl BarrierConfig {
    pub fn ffc_fraction(&self) -> f64 {
        self.ffc_percent / 100.0
    }

    pub fn validate(&self) -> PerfResult<()> {
        if !self.ffc_percent.is_finite() || self.ffc_percent <= 0.0 || self.ffc_percent >= 100.0 {
            return Err(PerfError::InvalidArg {
                what: format!(
                    "film cooling percent must lie in (0, 100), got {}",
                    self.ffc_percent
                ),
            });
        }
        if !self.entrainment_constant.is_finite() || self.entrainment_constant <= 0.0 {
            return Err(PerfError::InvalidArg {
                what: format!(
                    "entrainment constant must be positive, got {}",
                    self.entrainment_constant
                ),
            });
        }
        Ok(())
    }
}

/// Subsonic mixing-layer shape factor as a function of `Wentr/Wcool`.
///
/// Saturates to `1/1.32` at and above 1.4 and to `1/(1 + r)` at and below
/// 0.06. Between the two, the rational curve fit is shifted by a linear
/// blend of its end mismatches so the whole function is continuous. Interior
/// values therefore differ from the raw Figure 5 fit of "Combustion Effects
/// on Film Cooling" by up to about 1.1e-3.
pub fn shape_factor(entrained_over_cooling: f64) -> f64 {
    const LO: f64 = 0.06;
    const HI: f64 = 1.4;
    let r = entrained_over_cooling;
    if r >= HI {
        return 1.0 / 1.32;
    }
    if r <= LO {
        return 1.0 / (1.0 + r);
    }
    let fit = |r: f64| (0.962 + 0.299 * r) / (1.0 + 0.67 * r - 0.06 * r * r);
    let lo_gap = 1.0 / (1.0 + LO) - fit(LO);
    let hi_gap = 1.0 / 1.32 - fit(HI);
    let t = (r - LO) / (HI - LO);
    fit(r) + lo_gap * (1.0 - t) + hi_gap * t
}

/// Entrained fraction of core flow: `2x - x^2` with `x = L'/Rcham * ko`.
pub fn entrained_fraction(lprime_over_rcham: f64, entrainment_constant: f64) -> f64 {
    let x = lprime_over_rcham * entrainment_constant;
    2.0 * x - x * x
}

/// The core-stream state a barrier evaluation reads.
#[derive(Clone, Copy)]
pub struct CoreView<'a> {
    pub oracle: &'a dyn ThermoOracle,
    pub kinetics: &'a dyn NozzleKinetics,
    pub geometry: &'a Geometry,
    pub efficiencies: &'a Efficiencies,
    /// Chamber pressure [psia].
    pub pc: f64,
    pub mr_core: f64,
    pub adj_cstar_ode: f64,
    pub adj_isp_ideal: f64,
    /// Core equilibrium Isp [s], already adjusted.
    pub isp_ode: f64,
    /// Core frozen Isp [s], already adjusted.
    pub isp_odf: f64,
    pub frac_kin: f64,
}

/// Result of one barrier evaluation.
#[derive(Clone, Debug)]
pub struct BarrierPerformance {
    pub entrained_fraction: f64,
    pub entrained_over_cooling: f64,
    pub film_effectiveness: f64,
    pub mixture_ratio: f64,
    pub wall_mixture_ratio: f64,
    /// `None` when the wall gas is pure coolant.
    pub wall_temperature: Option<Temperature>,
    pub isp_ode: SpecificImpulse,
    pub isp_odf: SpecificImpulse,
    pub isp_odk: SpecificImpulse,
    pub isp_del: SpecificImpulse,
    pub cstar_ode: Velocity,
    pub cstar_ere: Velocity,
    pub chamber_temperature: Temperature,
    pub mol_weight: f64,
    pub gamma: f64,
    pub frac_kin: f64,
    pub eff_kin: f64,
    pub eff_noz: f64,
    pub eff_ere: f64,
    pub eff_isp: f64,
    /// Recoverable advisories raised during evaluation.
    pub warnings: Vec<String>,
}

#[derive(Clone, Debug)]
pub struct BarrierStream {
    config: BarrierConfig,
    performance: Option<BarrierPerformance>,
}

impl BarrierStream {
    pub fn new(config: BarrierConfig) -> PerfResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            performance: None,
        })
    }

    pub fn config(&self) -> &BarrierConfig {
        &self.config
    }

    /// Last committed evaluation, if any.
    pub fn performance(&self) -> Option<&BarrierPerformance> {
        self.performance.as_ref()
    }

    pub(crate) fn commit(&mut self, performance: BarrierPerformance) {
        self.performance = Some(performance);
    }

    /// Evaluate the barrier against the current core state.
    pub fn evaluate(&self, core: &CoreView<'_>) -> PerfResult<BarrierPerformance> {
        let mut warnings = Vec::new();
        let ko = self.config.entrainment_constant;
        let (ko_lo, ko_hi) = ENTRAINMENT_RANGE;
        if !(ko_lo..=ko_hi).contains(&ko) {
            let msg = format!(
                "entrainment constant ko={ko} is outside the correlated range {ko_lo} to {ko_hi}"
            );
            warn!("{msg}");
            warnings.push(msg);
        }

        let frac_entr = entrained_fraction(core.geometry.lprime_over_rcham(), ko);
        let ffc = self.config.ffc_fraction();
        let mr_eng = core.mr_core * (1.0 - ffc);

        // flows relative to a unit core-injected flow
        let fuel_core_inj = 1.0 / (1.0 + core.mr_core);
        let ox_core_inj = 1.0 - fuel_core_inj;
        let fuel_total = mr_eng * ox_core_inj;
        let ffc_flow = ffc * fuel_total;
        let entr_flow = frac_entr;

        let entrained_over_cooling = entr_flow / ffc_flow;
        let sf = shape_factor(entrained_over_cooling);
        let film_effectiveness = 1.0 / (sf * (1.0 + entrained_over_cooling));

        let fuel_entr = fuel_core_inj * frac_entr;
        let ox_entr = ox_core_inj * frac_entr;
        let mixture_ratio = ox_entr / (fuel_entr + ffc_flow);
        if !mixture_ratio.is_finite() || mixture_ratio <= 0.0 {
            return Err(PerfError::Domain {
                what: format!(
                    "barrier mixture ratio {mixture_ratio} from entrained fraction {frac_entr}"
                ),
            });
        }

        let ox_mass_frac_wall =
            ((1.0 - film_effectiveness) * mixture_ratio / (1.0 + mixture_ratio)).max(0.0);
        let wall_mixture_ratio = ox_mass_frac_wall / (1.0 - ox_mass_frac_wall);

        let pc = psia(core.pc);
        let eps = core.geometry.area_ratio();
        let wall_temperature = if wall_mixture_ratio > 0.0 {
            Some(core.oracle.combustion_temperature(pc, wall_mixture_ratio)?)
        } else {
            None
        };

        let ode = core.oracle.ideal_performance(pc, mixture_ratio, eps)?;
        let cstar_ode = us::fps(ode.cstar) * core.adj_cstar_ode;
        let isp_ode = us::seconds(ode.isp) * core.adj_isp_ideal;
        let mut isp_odf =
            us::seconds(core.oracle.frozen_performance(pc, mixture_ratio, eps)?.isp)
                * core.adj_isp_ideal;

        let isp_odk = if isp_odf < MIN_PLAUSIBLE_FROZEN_ISP {
            let failed = isp_odf;
            isp_odf = isp_ode * (core.isp_odf / core.isp_ode);
            let msg = format!(
                "frozen Isp failed for barrier MR={mixture_ratio:.5} ({failed:.3} s); \
                 estimated IspODF_b = {isp_odf:.3} s from the core frozen/equilibrium ratio"
            );
            warn!("{msg}");
            warnings.push(msg);
            isp_odf + core.frac_kin * (isp_ode - isp_odf)
        } else {
            let odk = core.kinetics.kinetic_isp(
                core.oracle,
                pc,
                eps,
                core.geometry.throat_radius(),
                core.geometry.percent_bell(),
                mixture_ratio,
            )?;
            us::seconds(odk) * core.adj_isp_ideal
        };

        let denom = isp_ode - isp_odf;
        if denom.abs() < 1e-9 * isp_ode.abs().max(1.0) {
            return Err(PerfError::Domain {
                what: format!(
                    "barrier equilibrium and frozen Isp coincide ({isp_ode} s) at MR={mixture_ratio}"
                ),
            });
        }
        let frac_kin = (isp_odk - isp_odf) / denom;
        let eff_kin = isp_odk / isp_ode;

        let effs = core.efficiencies;
        let eff_noz = if effs.is_held(EfficiencyKind::Noz) {
            effs.value(EfficiencyKind::Noz)
        } else {
            eff_kin
                * effs.value(EfficiencyKind::Div)
                * effs.value(EfficiencyKind::BL)
                * effs.value(EfficiencyKind::TP)
        };
        let eff_ere = effs.value(EfficiencyKind::ERE);
        let eff_isp = eff_noz * eff_ere;

        debug!(
            mr_barrier = mixture_ratio,
            wentr_over_wcool = entrained_over_cooling,
            effectiveness = film_effectiveness,
            isp_ode_b = isp_ode,
            "barrier stream evaluated"
        );

        Ok(BarrierPerformance {
            entrained_fraction: frac_entr,
            entrained_over_cooling,
            film_effectiveness,
            mixture_ratio,
            wall_mixture_ratio,
            wall_temperature,
            isp_ode: s(isp_ode),
            isp_odf: s(isp_odf),
            isp_odk: s(isp_odk),
            isp_del: s(eff_isp * isp_ode),
            cstar_ode: fps(cstar_ode),
            cstar_ere: fps(cstar_ode * eff_ere),
            chamber_temperature: ode.chamber_temperature,
            mol_weight: ode.mol_weight,
            gamma: ode.gamma,
            frac_kin,
            eff_kin,
            eff_noz,
            eff_ere,
            eff_isp,
            warnings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_factor_saturates_at_upper_boundary() {
        assert!((shape_factor(1.4) - 1.0 / 1.32).abs() < 1e-15);
        assert!((shape_factor(5.0) - 1.0 / 1.32).abs() < 1e-15);
        assert!((shape_factor(0.03) - 1.0 / 1.03).abs() < 1e-15);
    }

    #[test]
    fn shape_factor_is_continuous() {
        for edge in [0.06, 1.4] {
            let below = shape_factor(edge - 1e-9);
            let above = shape_factor(edge + 1e-9);
            assert!((below - above).abs() < 1e-6, "jump at {edge}");
        }
        assert!((shape_factor(0.5) - 0.8425333665122476).abs() < 1e-12);
    }

    #[test]
    fn shape_factor_tracks_published_fit() {
        let fit = |r: f64| (0.962 + 0.299 * r) / (1.0 + 0.67 * r - 0.06 * r * r);
        for i in 1..100 {
            let r = 0.06 + (1.4 - 0.06) * i as f64 / 100.0;
            assert!((shape_factor(r) - fit(r)).abs() < 1.2e-3, "r={r}");
        }
    }

    #[test]
    fn entrainment_grows_with_chamber_length() {
        let short = entrained_fraction(2.0, 0.035);
        let long = entrained_fraction(4.0, 0.035);
        assert!(long > short);
        assert!((entrained_fraction(3.921224, 0.035) - 0.255650).abs() < 1e-6);
    }

    #[test]
    fn coolant_is_a_fraction_of_engine_fuel() {
        use crate::efficiency::Efficiencies;
        use crate::geometry::GeometryConfig;
        use isp_thermo::{
            FixedKineticFraction, OracleFactory, PerfectGasBackend, PerfectGasPoint,
            PerfectGasTable, Propellants,
        };

        let point = |mr: f64, tc: f64, mw: f64, geq: f64, gfr: f64| PerfectGasPoint {
            mixture_ratio: mr,
            chamber_temperature_r: tc,
            mol_weight: mw,
            gamma_equilibrium: geq,
            gamma_frozen: gfr,
        };
        let table = PerfectGasTable::new(vec![
            point(0.3, 2600.0, 14.0, 1.26, 1.30),
            point(2.0, 5600.0, 22.0, 1.16, 1.22),
        ])
        .unwrap();
        let oracle = PerfectGasBackend::new()
            .with_table(Propellants::default(), table)
            .build(&Propellants::default())
            .unwrap();
        let geometry = Geometry::new(GeometryConfig {
            area_ratio: 62.5,
            percent_bell: 75.0,
            ..GeometryConfig::default()
        })
        .unwrap();
        let kinetics = FixedKineticFraction::default();
        let efficiencies = Efficiencies::new();
        let view = CoreView {
            oracle: oracle.as_ref(),
            kinetics: &kinetics,
            geometry: &geometry,
            efficiencies: &efficiencies,
            pc: 100.0,
            mr_core: 1.6,
            adj_cstar_ode: 1.0,
            adj_isp_ideal: 1.0,
            isp_ode: 330.0,
            isp_odf: 310.0,
            frac_kin: 1.0,
        };

        let perf = BarrierStream::new(BarrierConfig::default())
            .unwrap()
            .evaluate(&view)
            .unwrap();
        // Wcool = 10% of MReng * Wox,core with MReng = 1.6 * 0.9
        assert!((perf.entrained_fraction - 0.24799132345414387).abs() < 1e-12);
        assert!((perf.entrained_over_cooling - 2.7985131987012757).abs() < 1e-9);
        assert!((perf.mixture_ratio - 0.8294174623856114).abs() < 1e-9);
        assert!(perf.warnings.is_empty());
    }

    #[test]
    fn config_validation() {
        assert!(BarrierStream::new(BarrierConfig::default()).is_ok());
        assert!(
            BarrierStream::new(BarrierConfig {
                ffc_percent: 0.0,
                ..BarrierConfig::default()
            })
            .is_err()
        );
        assert!(
            BarrierStream::new(BarrierConfig {
                entrainment_constant: -0.01,
                ..BarrierConfig::default()
            })
            .is_err()
        );
    }
}

//! Thruster: fills in model efficiencies for a core stream and sizes its throat.

use crate::core_stream::CoreStream;
use crate::correlations::{
    boundary_layer_efficiency, discharge_coefficient, divergence_efficiency, pulsing_efficiency,
    regen_corrected_bl,
};
use crate::efficiency::EfficiencyKind;
use crate::error::{PerfError, PerfResult};
use isp_core::units::{Force, Pressure, inch, us};
use std::f64::consts::PI;
use tracing::{debug, warn};

const SCALE_ITERATIONS: usize = 10;

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ThrusterSettings {
    /// Area ratio out to which the nozzle is regeneratively cooled (1 = none).
    pub regen_area_ratio: f64,
    /// Pulse width [s]; `None` for steady-state firing.
    pub pulse_width: Option<f64>,
    /// 0 (worst) to 1 (best).
    pub pulse_quality: f64,
    /// Replace the throat Cd with the Rup/gamma fit on every pass.
    pub calc_cd_throat: bool,
}

impl Default for ThrusterSettings {
    fn default() -> Self {
        Self {
            regen_area_ratio: 1.0,
            pulse_width: None,
            pulse_quality: 0.8,
            calc_cd_throat: true,
        }
    }
}

#[derive(Debug)]
pub struct Thruster {
    name: String,
    core: CoreStream,
    settings: ThrusterSettings,
    advisories: Vec<String>,
}

impl Thruster {
    /// Wrap a core stream and run one full efficiency pass.
    pub fn new(
        name: impl Into<String>,
        core: CoreStream,
        settings: ThrusterSettings,
    ) -> PerfResult<Self> {
        let mut thruster = Self {
            name: name.into(),
            core,
            settings,
            advisories: Vec::new(),
        };
        thruster.calc_all_eff()?;
        Ok(thruster)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn core(&self) -> &CoreStream {
        &self.core
    }

    /// Mutable access to the core; re-run [`Thruster::calc_all_eff`] afterwards.
    pub fn core_mut(&mut self) -> &mut CoreStream {
        &mut self.core
    }

    pub fn settings(&self) -> &ThrusterSettings {
        &self.settings
    }

    /// Advisories from the last efficiency pass plus the core's evaluation warnings.
    pub fn warnings(&self) -> Vec<String> {
        let mut all = self.advisories.clone();
        if let Ok(perf) = self.core.performance() {
            all.extend(perf.warnings.iter().cloned());
        }
        all
    }

    /// Compute every efficiency that is not held constant, then evaluate the core once.
    pub fn calc_all_eff(&mut self) -> PerfResult<()> {
        self.advisories.clear();

        let core = &self.core;
        let cfg = core.config();
        let geom = core.geometry();
        let oracle = core.oracle();
        let effs = core.efficiencies();
        let pc = us::psia(cfg.pc);
        let eps = geom.area_ratio();
        let rt = us::inches(geom.throat_radius());
        let percent_bell = geom.percent_bell();

        let ode = oracle.ideal_performance(cfg.pc, cfg.mixture_ratio, eps)?;

        let cd = self
            .settings
            .calc_cd_throat
            .then(|| discharge_coefficient(geom.config().rup_throat, ode.gamma));

        let pulse = if effs.is_held(EfficiencyKind::Pulse) {
            None
        } else {
            Some(match self.settings.pulse_width {
                Some(pw) => (
                    pulsing_efficiency(pw, self.settings.pulse_quality)?,
                    format!("rough estimate ({pw} sec, Q={})", self.settings.pulse_quality),
                ),
                None => (1.0, "steady state".to_string()),
            })
        };

        let div = if effs.is_held(EfficiencyKind::Div) {
            None
        } else {
            let (eff, advisory) = divergence_efficiency(eps, percent_bell);
            self.advisories.extend(advisory);
            Some((eff, format!("simple fit eps={eps}, %bell={percent_bell:.4}")))
        };

        let bl = if effs.is_held(EfficiencyKind::BL) {
            None
        } else {
            let mut eff = boundary_layer_efficiency(pc, 2.0 * rt, eps);
            let mut source = "NASA-SP8120".to_string();
            if self.settings.regen_area_ratio > 1.0 {
                eff = regen_corrected_bl(eff, eps, self.settings.regen_area_ratio);
                source.push_str(" regen-corrected");
            }
            Some((eff, source))
        };

        let kin = if effs.is_held(EfficiencyKind::Kin) {
            None
        } else {
            let odk = core.kinetics().kinetic_isp(
                oracle,
                cfg.pc,
                eps,
                geom.throat_radius(),
                percent_bell,
                cfg.mixture_ratio,
            )?;
            let source = core.kinetics().name().to_string();
            Some((us::seconds(odk) / us::seconds(ode.isp), source))
        };

        if let Some(cd) = cd {
            self.core.reset_discharge_coefficient(cd, "Rup/gamma fit", false)?;
        }
        let effs = self.core.efficiencies_mut();
        for (kind, update) in [
            (EfficiencyKind::Pulse, pulse),
            (EfficiencyKind::Div, div),
            (EfficiencyKind::BL, bl),
            (EfficiencyKind::Kin, kin),
        ] {
            if let Some((value, source)) = update {
                effs.store(kind, value, source)?;
            }
        }
        debug!(thruster = %self.name, "model efficiencies updated");
        self.core.evaluate()
    }

    /// Resize the throat so ambient thrust at `ambient` equals `thrust`.
    ///
    /// Fixed-point iteration on throat area, re-running the efficiency pass
    /// at each size. The core's ambient pressure is restored afterwards.
    pub fn scale_throat_to_thrust(&mut self, thrust: Force, ambient: Pressure) -> PerfResult<()> {
        let target = us::lbf(thrust);
        if !target.is_finite() || target <= 0.0 {
            return Err(PerfError::InvalidArg {
                what: format!("target thrust must be positive, got {target} lbf"),
            });
        }

        let saved = self.core.config().ambient;
        self.core.set_ambient_pressure(ambient)?;
        let scaled = self.core.evaluate().and_then(|_| self.iterate_throat(target));

        self.core.set_ambient_pressure(saved)?;
        let restored = self.core.evaluate();
        scaled.and(restored)
    }

    fn iterate_throat(&mut self, target: f64) -> PerfResult<()> {
        let tol = target / 1.0e8;
        self.resize_throat(target)?;
        for i in 0..SCALE_ITERATIONS {
            let famb = self.resize_throat(target)?;
            if (target - famb).abs() < tol {
                debug!(iterations = i + 1, thrust = famb, "throat scaled to thrust");
                return Ok(());
            }
        }
        let msg = format!(
            "throat scaling did not reach {target} lbf within {SCALE_ITERATIONS} iterations"
        );
        warn!("{msg}");
        self.advisories.push(msg);
        Ok(())
    }

    // One pass: At <- At * F_target / F_amb, then recompute efficiencies.
    fn resize_throat(&mut self, target: f64) -> PerfResult<f64> {
        let perf = self.core.performance()?;
        let famb = us::lbf(perf.thrust_amb);
        if famb <= 0.0 {
            return Err(PerfError::Domain {
                what: format!("ambient thrust {famb} lbf cannot be scaled"),
            });
        }
        let at = us::sq_inches(self.core.geometry().throat_area()) * target / famb;
        self.core.set_throat_radius(inch((at / PI).sqrt()))?;
        self.calc_all_eff()?;
        Ok(us::lbf(self.core.performance()?.thrust_amb))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_stream::CoreConfig;
    use crate::efficiency::Efficiencies;
    use crate::geometry::GeometryConfig;
    use isp_core::units::{lbf, psia};
    use isp_thermo::{
        FixedKineticFraction, OracleFactory, PerfectGasBackend, PerfectGasPoint, PerfectGasTable,
        Propellants,
    };
    use std::sync::Arc;

    fn core(effs: Efficiencies) -> CoreStream {
        let table = PerfectGasTable::new(vec![PerfectGasPoint {
            mixture_ratio: 1.9,
            chamber_temperature_r: 5600.0,
            mol_weight: 21.0,
            gamma_equilibrium: 1.17,
            gamma_frozen: 1.23,
        }])
        .unwrap();
        let factory: Arc<dyn OracleFactory> =
            Arc::new(PerfectGasBackend::new().with_table(Propellants::default(), table));
        CoreStream::new(CoreConfig::default(), GeometryConfig::default(), effs, factory)
            .unwrap()
            .with_kinetics(Box::new(FixedKineticFraction::new(0.5).unwrap()))
    }

    #[test]
    fn fills_unheld_efficiencies() {
        let effs = Efficiencies::with_constants(&[("BL", 0.99)]).unwrap();
        let t = Thruster::new("test", core(effs), ThrusterSettings::default()).unwrap();
        let effs = t.core().efficiencies();

        assert_eq!(effs.value(EfficiencyKind::BL), 0.99);
        assert!(effs.get(EfficiencyKind::Div).source().starts_with("simple fit"));
        assert!((effs.value(EfficiencyKind::Div) - 0.990995938724677).abs() < 1e-12);
        assert_eq!(effs.get(EfficiencyKind::Kin).source(), "fixed fraction");
        assert!(effs.value(EfficiencyKind::Kin) < 1.0);
        assert_eq!(effs.value(EfficiencyKind::Pulse), 1.0);

        let (cd, source) = t.core().discharge_coefficient();
        assert_eq!(source, "Rup/gamma fit");
        assert!((cd - discharge_coefficient(1.5, 1.17)).abs() < 1e-15);
        assert!(t.core().is_consistent());
    }

    #[test]
    fn pulsing_and_regen_settings() {
        let settings = ThrusterSettings {
            regen_area_ratio: 10.0,
            pulse_width: Some(0.1),
            pulse_quality: 0.8,
            calc_cd_throat: false,
        };
        let t = Thruster::new("pulser", core(Efficiencies::new()), settings).unwrap();
        let effs = t.core().efficiencies();
        assert!((effs.value(EfficiencyKind::Pulse) - 0.9515040910901298).abs() < 1e-12);
        assert!(effs.get(EfficiencyKind::BL).source().ends_with("regen-corrected"));
        assert_eq!(t.core().discharge_coefficient(), (0.995, "default"));

        let perf = t.core().performance().unwrap();
        let ratio = us::seconds(perf.isp_del_pulse) / us::seconds(perf.isp_del);
        assert!((ratio - 0.9515040910901298).abs() < 1e-12);
    }

    #[test]
    fn scales_throat_to_target_thrust() {
        let mut t = Thruster::new("scale", core(Efficiencies::new()), ThrusterSettings::default())
            .unwrap();
        t.scale_throat_to_thrust(lbf(5000.0), psia(0.0)).unwrap();
        let perf = t.core().performance().unwrap();
        assert!((us::lbf(perf.thrust_amb) - 5000.0).abs() < 5000.0 / 1e7);
        assert!(us::inches(t.core().geometry().throat_radius()) > 1.0);
    }

    #[test]
    fn scaling_restores_ambient_pressure() {
        let mut t = Thruster::new("scale", core(Efficiencies::new()), ThrusterSettings::default())
            .unwrap();
        t.scale_throat_to_thrust(lbf(500.0), psia(1.0)).unwrap();
        assert_eq!(us::psia(t.core().config().ambient), 0.0);
        assert!(t.core().is_consistent());
        assert!(t.scale_throat_to_thrust(lbf(-1.0), psia(0.0)).is_err());
    }
}

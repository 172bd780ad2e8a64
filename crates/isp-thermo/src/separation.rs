//! Nozzle flow separation at ambient back-pressure.

use crate::error::{ThermoError, ThermoResult};
use crate::isentropic;
use crate::oracle::validation;
use isp_core::units::Pressure;

/// Separation state of a nozzle running against ambient pressure.
#[derive(Clone, Copy, Debug)]
pub struct SeparationPoint {
    /// Ideal vacuum thrust coefficient of the full nozzle.
    pub vacuum_cf: f64,
    /// Full-nozzle thrust coefficient with the simple `Pamb·eps/Pc` correction.
    pub simple_ambient_cf: f64,
    /// Ambient thrust coefficient accounting for separation.
    pub separated_cf: f64,
    /// Area ratio at which the flow leaves the wall (nozzle area ratio if attached).
    pub area_ratio_at_separation: f64,
    /// Wall pressure at which separation occurs.
    pub pressure_at_separation: Pressure,
}

impl SeparationPoint {
    pub fn is_separated(&self, area_ratio: f64) -> bool {
        self.area_ratio_at_separation < area_ratio
    }
}

/// Ambient-thrust-coefficient collaborator.
pub trait SeparationModel: Send + Sync {
    fn name(&self) -> &str;

    fn separation(
        &self,
        gamma: f64,
        area_ratio: f64,
        pc: Pressure,
        ambient: Pressure,
    ) -> ThermoResult<SeparationPoint>;
}

/// Kalt-Badal separation criterion: `Psep/Pamb = 0.667·(Pc/Pamb)^-0.2`.
#[derive(Clone, Copy, Debug, Default)]
pub struct KaltBadal;

impl KaltBadal {
    const COEFF: f64 = 0.667;
    const EXPONENT: f64 = -0.2;
}

impl SeparationModel for KaltBadal {
    fn name(&self) -> &str {
        "Kalt-Badal"
    }

    fn separation(
        &self,
        gamma: f64,
        area_ratio: f64,
        pc: Pressure,
        ambient: Pressure,
    ) -> ThermoResult<SeparationPoint> {
        validation::validate_gamma(gamma)?;
        validation::validate_area_ratio(area_ratio)?;
        validation::validate_pressure(pc)?;
        validation::validate_pressure(ambient)?;
        if ambient >= pc {
            return Err(ThermoError::InvalidArg {
                what: "ambient pressure must be below chamber pressure",
            });
        }

        let pamb_over_pc = (ambient / pc).value;
        let psep = ambient * (Self::COEFF * pamb_over_pc.powf(-Self::EXPONENT));
        let pe_over_pc = 1.0 / isentropic::pressure_ratio_at_area_ratio(gamma, area_ratio);
        let psep_over_pc = (psep / pc).value;

        let vacuum_cf = isentropic::vacuum_cf(gamma, area_ratio);
        let simple_ambient_cf = vacuum_cf - area_ratio * pamb_over_pc;

        let (area_ratio_at_separation, separated_cf) = if psep_over_pc <= pe_over_pc {
            (area_ratio, simple_ambient_cf)
        } else {
            let mach_sep = isentropic::mach_from_pressure_ratio(gamma, 1.0 / psep_over_pc);
            let eps_sep = isentropic::area_ratio_from_mach(gamma, mach_sep).clamp(1.0, area_ratio);
            let cf = isentropic::vacuum_cf(gamma, eps_sep) - eps_sep * pamb_over_pc;
            (eps_sep, cf)
        };

        Ok(SeparationPoint {
            vacuum_cf,
            simple_ambient_cf,
            separated_cf,
            area_ratio_at_separation,
            pressure_at_separation: psep,
        })
    }
}

//! Thermochemistry oracle trait and validation helpers.

use crate::error::{ThermoError, ThermoResult};
use crate::propellants::Propellants;
use isp_core::units::{Pressure, SpecificImpulse, Temperature, Velocity};

/// Ideal (shifting equilibrium) performance at one operating point.
#[derive(Clone, Copy, Debug)]
pub struct IdealPerformance {
    /// Vacuum specific impulse at the requested area ratio.
    pub isp: SpecificImpulse,
    /// Characteristic velocity.
    pub cstar: Velocity,
    /// Chamber (combustion) temperature.
    pub chamber_temperature: Temperature,
    /// Chamber molecular weight [lbm/lbmol].
    pub mol_weight: f64,
    /// Chamber ratio of specific heats.
    pub gamma: f64,
}

/// Chemically frozen performance at one operating point.
#[derive(Clone, Copy, Debug)]
pub struct FrozenPerformance {
    pub isp: SpecificImpulse,
    pub cstar: Velocity,
    pub chamber_temperature: Temperature,
}

/// Sonic velocities at chamber, throat and nozzle exit.
#[derive(Clone, Copy, Debug)]
pub struct SonicVelocities {
    pub chamber: Velocity,
    pub throat: Velocity,
    pub exit: Velocity,
}

/// Ideal thermochemistry for one propellant pair.
///
/// Every query is a pure function of its arguments. Implementations must be
/// thread-safe (Send + Sync) so a host may share one oracle between streams.
pub trait ThermoOracle: Send + Sync {
    /// Get the backend name (for debugging/logging).
    fn name(&self) -> &str;

    /// The propellant pair this oracle was built for.
    fn propellants(&self) -> &Propellants;

    /// Equilibrium vacuum Isp, c*, chamber temperature, molecular weight and gamma.
    fn ideal_performance(
        &self,
        pc: Pressure,
        mixture_ratio: f64,
        area_ratio: f64,
    ) -> ThermoResult<IdealPerformance>;

    /// Frozen vacuum Isp, c* and chamber temperature.
    fn frozen_performance(
        &self,
        pc: Pressure,
        mixture_ratio: f64,
        area_ratio: f64,
    ) -> ThermoResult<FrozenPerformance>;

    /// Chamber pressure over nozzle exit pressure.
    fn pressure_ratio(&self, pc: Pressure, mixture_ratio: f64, area_ratio: f64)
    -> ThermoResult<f64>;

    /// Adiabatic combustion temperature.
    fn combustion_temperature(&self, pc: Pressure, mixture_ratio: f64)
    -> ThermoResult<Temperature>;

    /// Sonic velocities at chamber, throat and exit.
    fn sonic_velocities(
        &self,
        pc: Pressure,
        mixture_ratio: f64,
        area_ratio: f64,
    ) -> ThermoResult<SonicVelocities>;

    /// Equilibrium vacuum Isp alone.
    fn vacuum_isp(
        &self,
        pc: Pressure,
        mixture_ratio: f64,
        area_ratio: f64,
    ) -> ThermoResult<SpecificImpulse> {
        Ok(self.ideal_performance(pc, mixture_ratio, area_ratio)?.isp)
    }
}

/// Builds an oracle handle for a propellant pair.
///
/// Streams hold the factory so the handle can be rebuilt when the
/// propellant identity changes.
pub trait OracleFactory: Send + Sync {
    fn build(&self, propellants: &Propellants) -> ThermoResult<Box<dyn ThermoOracle>>;
}

/// Nozzle exit pressure from the oracle's chamber/exit pressure ratio.
pub fn exit_pressure(
    oracle: &dyn ThermoOracle,
    pc: Pressure,
    mixture_ratio: f64,
    area_ratio: f64,
) -> ThermoResult<Pressure> {
    Ok(pc / oracle.pressure_ratio(pc, mixture_ratio, area_ratio)?)
}

/// Validation helpers for oracle inputs and outputs.
pub mod validation {
    use super::*;

    /// Ensure pressure is positive and finite.
    pub fn validate_pressure(p: Pressure) -> ThermoResult<()> {
        if !p.value.is_finite() || p.value <= 0.0 {
            return Err(ThermoError::NonPhysical {
                what: "pressure must be positive and finite",
            });
        }
        Ok(())
    }

    /// Ensure mixture ratio is positive and finite.
    pub fn validate_mixture_ratio(mr: f64) -> ThermoResult<()> {
        if !mr.is_finite() || mr <= 0.0 {
            return Err(ThermoError::InvalidArg {
                what: "mixture ratio must be positive and finite",
            });
        }
        Ok(())
    }

    /// Ensure area ratio is at least one (throat) and finite.
    pub fn validate_area_ratio(eps: f64) -> ThermoResult<()> {
        if !eps.is_finite() || eps < 1.0 {
            return Err(ThermoError::InvalidArg {
                what: "area ratio must be >= 1 and finite",
            });
        }
        Ok(())
    }

    /// Ensure gamma (heat capacity ratio) is physically plausible.
    pub fn validate_gamma(gamma: f64) -> ThermoResult<()> {
        if !gamma.is_finite() || gamma <= 1.0 {
            return Err(ThermoError::NonPhysical {
                what: "gamma must be > 1 and finite",
            });
        }
        Ok(())
    }

    /// Ensure temperature is positive and finite.
    pub fn validate_temperature(t: Temperature) -> ThermoResult<()> {
        if !t.value.is_finite() || t.value <= 0.0 {
            return Err(ThermoError::NonPhysical {
                what: "temperature must be positive and finite",
            });
        }
        Ok(())
    }

    /// Common input check for (pc, mr, eps) queries.
    pub fn validate_point(pc: Pressure, mr: f64, eps: f64) -> ThermoResult<()> {
        validate_pressure(pc)?;
        validate_mixture_ratio(mr)?;
        validate_area_ratio(eps)
    }
}

#[cfg(test)]
mod tests {
    use super::validation::*;
    use isp_core::units::{deg_r, psia};

    #[test]
    fn validate_positive_pressure() {
        assert!(validate_pressure(psia(100.0)).is_ok());
        assert!(validate_pressure(psia(-100.0)).is_err());
        assert!(validate_pressure(psia(0.0)).is_err());
        assert!(validate_pressure(psia(f64::NAN)).is_err());
    }

    #[test]
    fn validate_area_ratio_at_least_one() {
        assert!(validate_area_ratio(1.0).is_ok());
        assert!(validate_area_ratio(35.0).is_ok());
        assert!(validate_area_ratio(0.5).is_err());
        assert!(validate_area_ratio(f64::INFINITY).is_err());
    }

    #[test]
    fn validate_gamma_physical() {
        assert!(validate_gamma(1.2).is_ok());
        assert!(validate_gamma(1.0).is_err());
        assert!(validate_gamma(f64::NAN).is_err());
    }

    #[test]
    fn validate_point_checks_all() {
        assert!(validate_point(psia(500.0), 3.6, 35.0).is_ok());
        assert!(validate_point(psia(500.0), 0.0, 35.0).is_err());
        assert!(validate_temperature(deg_r(6000.0)).is_ok());
    }
}

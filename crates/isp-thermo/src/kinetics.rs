//! Nozzle kinetics boundary.
//!
//! A kinetics model returns the one-dimensional kinetic Isp (ODK), which lies
//! between the frozen (ODF) and shifting-equilibrium (ODE) bounds.

use crate::error::{ThermoError, ThermoResult};
use crate::oracle::ThermoOracle;
use isp_core::units::{Length, Pressure, SpecificImpulse};

pub trait NozzleKinetics: Send + Sync {
    fn name(&self) -> &str;

    /// Kinetic vacuum Isp for one operating point and nozzle.
    fn kinetic_isp(
        &self,
        oracle: &dyn ThermoOracle,
        pc: Pressure,
        area_ratio: f64,
        throat_radius: Length,
        percent_bell: f64,
        mixture_ratio: f64,
    ) -> ThermoResult<SpecificImpulse>;
}

/// Kinetic Isp at a fixed fraction of the way from frozen to equilibrium.
#[derive(Clone, Copy, Debug)]
pub struct FixedKineticFraction {
    fraction: f64,
}

impl FixedKineticFraction {
    pub fn new(fraction: f64) -> ThermoResult<Self> {
        if !fraction.is_finite() || !(0.0..=1.0).contains(&fraction) {
            return Err(ThermoError::InvalidArg {
                what: "kinetic fraction must lie in [0, 1]",
            });
        }
        Ok(Self { fraction })
    }

    pub fn fraction(&self) -> f64 {
        self.fraction
    }
}

impl Default for FixedKineticFraction {
    fn default() -> Self {
        Self { fraction: 1.0 }
    }
}

impl NozzleKinetics for FixedKineticFraction {
    fn name(&self) -> &str {
        "fixed fraction"
    }

    fn kinetic_isp(
        &self,
        oracle: &dyn ThermoOracle,
        pc: Pressure,
        area_ratio: f64,
        _throat_radius: Length,
        _percent_bell: f64,
        mixture_ratio: f64,
    ) -> ThermoResult<SpecificImpulse> {
        let ode = oracle.ideal_performance(pc, mixture_ratio, area_ratio)?.isp;
        let odf = oracle.frozen_performance(pc, mixture_ratio, area_ratio)?.isp;
        Ok(odf + (ode - odf) * self.fraction)
    }
}

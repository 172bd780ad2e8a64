//! Tabulated perfect-gas thermochemistry backend.
//!
//! Combustion products are treated as a calorically perfect gas whose chamber
//! temperature, molecular weight and specific-heat ratios vary with mixture
//! ratio only. Shifting equilibrium and frozen expansion differ through their
//! effective gamma. This is a surrogate for a full equilibrium code: it keeps
//! the trends (peak temperature near stoichiometric, equilibrium Isp above
//! frozen) without solving any chemistry.

use std::collections::HashMap;

use crate::error::{ThermoError, ThermoResult};
use crate::isentropic;
use crate::oracle::{
    FrozenPerformance, IdealPerformance, OracleFactory, SonicVelocities, ThermoOracle,
    validation,
};
use crate::propellants::Propellants;
use isp_core::interp_linear_clamped;
use isp_core::units::{Pressure, SpecificImpulse, Temperature, deg_r, fps, s};

/// One row of a perfect-gas table.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PerfectGasPoint {
    pub mixture_ratio: f64,
    /// Chamber temperature [degR]
    pub chamber_temperature_r: f64,
    /// Molecular weight [lbm/lbmol]
    pub mol_weight: f64,
    pub gamma_equilibrium: f64,
    pub gamma_frozen: f64,
}

/// Perfect-gas properties tabulated against mixture ratio.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PerfectGasTable {
    points: Vec<PerfectGasPoint>,
}

#[derive(Clone, Copy, Debug)]
struct GasState {
    tc: f64,
    mw: f64,
    gamma_eq: f64,
    gamma_fr: f64,
}

impl PerfectGasTable {
    /// Build a table; rows must be non-empty, physical, and strictly ascending in mixture ratio.
    pub fn new(points: Vec<PerfectGasPoint>) -> ThermoResult<Self> {
        if points.is_empty() {
            return Err(ThermoError::InvalidArg {
                what: "perfect-gas table needs at least one point",
            });
        }
        for p in &points {
            validation::validate_mixture_ratio(p.mixture_ratio)?;
            validation::validate_gamma(p.gamma_equilibrium)?;
            validation::validate_gamma(p.gamma_frozen)?;
            let bad = |v: f64| !v.is_finite() || v <= 0.0;
            if bad(p.chamber_temperature_r) || bad(p.mol_weight) {
                return Err(ThermoError::NonPhysical {
                    what: "chamber temperature and molecular weight must be positive",
                });
            }
        }
        if points
            .windows(2)
            .any(|w| w[1].mixture_ratio <= w[0].mixture_ratio)
        {
            return Err(ThermoError::InvalidArg {
                what: "perfect-gas table must be strictly ascending in mixture ratio",
            });
        }
        Ok(Self { points })
    }

    pub fn points(&self) -> &[PerfectGasPoint] {
        &self.points
    }

    fn state(&self, mr: f64) -> GasState {
        let xs: Vec<f64> = self.points.iter().map(|p| p.mixture_ratio).collect();
        let col = |f: fn(&PerfectGasPoint) -> f64| -> f64 {
            let ys: Vec<f64> = self.points.iter().map(f).collect();
            interp_linear_clamped(mr, &xs, &ys)
        };
        GasState {
            tc: col(|p| p.chamber_temperature_r),
            mw: col(|p| p.mol_weight),
            gamma_eq: col(|p| p.gamma_equilibrium),
            gamma_fr: col(|p| p.gamma_frozen),
        }
    }
}

/// Oracle over a [`PerfectGasTable`].
#[derive(Clone, Debug)]
pub struct PerfectGasOracle {
    propellants: Propellants,
    table: PerfectGasTable,
}

impl PerfectGasOracle {
    pub fn new(propellants: Propellants, table: PerfectGasTable) -> Self {
        Self { propellants, table }
    }
}

impl ThermoOracle for PerfectGasOracle {
    fn name(&self) -> &str {
        "perfect-gas"
    }

    fn propellants(&self) -> &Propellants {
        &self.propellants
    }

    fn ideal_performance(
        &self,
        pc: Pressure,
        mixture_ratio: f64,
        area_ratio: f64,
    ) -> ThermoResult<IdealPerformance> {
        validation::validate_point(pc, mixture_ratio, area_ratio)?;
        let g = self.table.state(mixture_ratio);
        let isp = isentropic::vacuum_isp(g.gamma_eq, g.tc, g.mw, area_ratio);
        Ok(IdealPerformance {
            isp: s(isp),
            cstar: fps(isentropic::cstar(g.gamma_eq, g.tc, g.mw)),
            chamber_temperature: deg_r(g.tc),
            mol_weight: g.mw,
            gamma: g.gamma_eq,
        })
    }

    fn frozen_performance(
        &self,
        pc: Pressure,
        mixture_ratio: f64,
        area_ratio: f64,
    ) -> ThermoResult<FrozenPerformance> {
        validation::validate_point(pc, mixture_ratio, area_ratio)?;
        let g = self.table.state(mixture_ratio);
        Ok(FrozenPerformance {
            isp: s(isentropic::vacuum_isp(g.gamma_fr, g.tc, g.mw, area_ratio)),
            cstar: fps(isentropic::cstar(g.gamma_fr, g.tc, g.mw)),
            chamber_temperature: deg_r(g.tc),
        })
    }

    fn pressure_ratio(
        &self,
        pc: Pressure,
        mixture_ratio: f64,
        area_ratio: f64,
    ) -> ThermoResult<f64> {
        validation::validate_point(pc, mixture_ratio, area_ratio)?;
        let g = self.table.state(mixture_ratio);
        Ok(isentropic::pressure_ratio_at_area_ratio(
            g.gamma_eq, area_ratio,
        ))
    }

    fn combustion_temperature(
        &self,
        pc: Pressure,
        mixture_ratio: f64,
    ) -> ThermoResult<Temperature> {
        validation::validate_pressure(pc)?;
        validation::validate_mixture_ratio(mixture_ratio)?;
        Ok(deg_r(self.table.state(mixture_ratio).tc))
    }

    fn sonic_velocities(
        &self,
        pc: Pressure,
        mixture_ratio: f64,
        area_ratio: f64,
    ) -> ThermoResult<SonicVelocities> {
        validation::validate_point(pc, mixture_ratio, area_ratio)?;
        let g = self.table.state(mixture_ratio);
        let gam = g.gamma_eq;
        let t_throat = 2.0 * g.tc / (gam + 1.0);
        let mach_exit = isentropic::supersonic_mach(gam, area_ratio);
        let t_exit = g.tc / (1.0 + 0.5 * (gam - 1.0) * mach_exit * mach_exit);
        Ok(SonicVelocities {
            chamber: fps(isentropic::sonic_velocity(gam, g.tc, g.mw)),
            throat: fps(isentropic::sonic_velocity(gam, t_throat, g.mw)),
            exit: fps(isentropic::sonic_velocity(gam, t_exit, g.mw)),
        })
    }

    fn vacuum_isp(
        &self,
        pc: Pressure,
        mixture_ratio: f64,
        area_ratio: f64,
    ) -> ThermoResult<SpecificImpulse> {
        validation::validate_point(pc, mixture_ratio, area_ratio)?;
        let g = self.table.state(mixture_ratio);
        Ok(s(isentropic::vacuum_isp(g.gamma_eq, g.tc, g.mw, area_ratio)))
    }
}

/// Factory holding one [`PerfectGasTable`] per propellant pair.
#[derive(Clone, Debug, Default)]
pub struct PerfectGasBackend {
    tables: HashMap<Propellants, PerfectGasTable>,
}

impl PerfectGasBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the table for a propellant pair.
    pub fn with_table(mut self, propellants: Propellants, table: PerfectGasTable) -> Self {
        self.tables.insert(propellants, table);
        self
    }

    pub fn supports(&self, propellants: &Propellants) -> bool {
        self.tables.contains_key(propellants)
    }
}

impl OracleFactory for PerfectGasBackend {
    fn build(&self, propellants: &Propellants) -> ThermoResult<Box<dyn ThermoOracle>> {
        let table = self
            .tables
            .get(propellants)
            .ok_or_else(|| ThermoError::UnknownPropellants {
                pair: propellants.to_string(),
            })?;
        Ok(Box::new(PerfectGasOracle::new(
            propellants.clone(),
            table.clone(),
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::exit_pressure;
    use isp_core::units::{psia, us};

    fn point(mr: f64, tc: f64) -> PerfectGasPoint {
        PerfectGasPoint {
            mixture_ratio: mr,
            chamber_temperature_r: tc,
            mol_weight: 21.0,
            gamma_equilibrium: 1.14,
            gamma_frozen: 1.2,
        }
    }

    #[test]
    fn table_rejects_unsorted_rows() {
        let err = PerfectGasTable::new(vec![point(3.0, 6000.0), point(2.0, 5000.0)]);
        assert!(err.is_err());
        assert!(PerfectGasTable::new(vec![]).is_err());
    }

    #[test]
    fn table_interpolates_temperature() {
        let table = PerfectGasTable::new(vec![point(2.0, 5000.0), point(4.0, 6000.0)]).unwrap();
        let oracle = PerfectGasOracle::new(Propellants::new("LOX", "CH4"), table);
        let tc = oracle.combustion_temperature(psia(500.0), 3.0).unwrap();
        assert!((us::deg_r(tc) - 5500.0).abs() < 1e-6);
        // clamped beyond the table
        let tc = oracle.combustion_temperature(psia(500.0), 9.0).unwrap();
        assert!((us::deg_r(tc) - 6000.0).abs() < 1e-6);
    }

    #[test]
    fn equilibrium_beats_frozen() {
        let table = PerfectGasTable::new(vec![point(3.6, 6400.0)]).unwrap();
        let oracle = PerfectGasOracle::new(Propellants::new("LOX", "CH4"), table);
        let ode = oracle.ideal_performance(psia(500.0), 3.6, 35.0).unwrap();
        let odf = oracle.frozen_performance(psia(500.0), 3.6, 35.0).unwrap();
        assert!(ode.isp > odf.isp);
        assert!((us::seconds(ode.isp) - 368.635).abs() < 0.01);
    }

    #[test]
    fn backend_rejects_unknown_pair() {
        let backend = PerfectGasBackend::new();
        let err = backend.build(&Propellants::new("LOX", "RP1")).err().unwrap();
        assert!(matches!(err, ThermoError::UnknownPropellants { .. }));
    }

    #[test]
    fn exit_pressure_from_ratio() {
        let table = PerfectGasTable::new(vec![point(3.6, 6400.0)]).unwrap();
        let oracle = PerfectGasOracle::new(Propellants::new("LOX", "CH4"), table);
        let pe = exit_pressure(&oracle, psia(500.0), 3.6, 35.0).unwrap();
        assert!((us::psia(pe) - 500.0 / 321.210).abs() < 1e-4);
    }
}

//! isp-thermo: thermochemistry boundary for the Isp workspace.
//!
//! Provides:
//! - Propellant identity (oxidizer/fuel pair)
//! - `ThermoOracle` trait for ideal equilibrium/frozen performance queries
//! - `OracleFactory` trait so streams can rebuild their oracle handle
//! - `SeparationModel` trait for ambient back-pressure separation
//! - `NozzleKinetics` trait for kinetic Isp
//! - In-tree backends: tabulated perfect gas, Kalt-Badal separation,
//!   fixed kinetic fraction
//!
//! # Architecture
//!
//! The performance model only ever talks to the traits. A full equilibrium
//! code can be plugged in by implementing `ThermoOracle` + `OracleFactory`;
//! the perfect-gas backend exists so the model can run and be tested without one.
//!
//! # Example
//!
//! ```no_run
//! use isp_thermo::{OracleFactory, PerfectGasBackend, PerfectGasPoint, PerfectGasTable, Propellants};
//! use isp_core::units::psia;
//!
//! let table = PerfectGasTable::new(vec![PerfectGasPoint {
//!     mixture_ratio: 3.6,
//!     chamber_temperature_r: 6400.0,
//!     mol_weight: 21.0,
//!     gamma_equilibrium: 1.14,
//!     gamma_frozen: 1.2,
//! }])
//! .unwrap();
//! let props = Propellants::new("LOX", "CH4");
//! let backend = PerfectGasBackend::new().with_table(props.clone(), table);
//! let oracle = backend.build(&props).unwrap();
//! let ode = oracle.ideal_performance(psia(500.0), 3.6, 35.0).unwrap();
//! println!("IspODE: {:?}", ode.isp);
//! ```

pub mod error;
pub mod isentropic;
pub mod kinetics;
pub mod oracle;
pub mod perfect_gas;
pub mod propellants;
pub mod separation;

// Re-exports for ergonomics
pub use error::{ThermoError, ThermoResult};
pub use kinetics::{FixedKineticFraction, NozzleKinetics};
pub use oracle::{
    FrozenPerformance, IdealPerformance, OracleFactory, SonicVelocities, ThermoOracle,
    exit_pressure,
};
pub use perfect_gas::{PerfectGasBackend, PerfectGasOracle, PerfectGasPoint, PerfectGasTable};
pub use propellants::Propellants;
pub use separation::{KaltBadal, SeparationModel, SeparationPoint};

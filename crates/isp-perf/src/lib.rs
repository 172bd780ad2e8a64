//! isp-perf: delivered specific impulse of liquid rocket thrust chambers.
//!
//! Provides:
//! - Efficiency registry with held overrides and roll-up (`Noz`, `ERE`, `Isp`)
//! - Chamber and nozzle geometry
//! - Empirical loss correlations (divergence, boundary layer, pulsing, Cd)
//! - Core stream evaluation with ambient and separation corrections
//! - Fuel film cooled barrier stream and throat area split
//! - Thruster driver that fills model efficiencies and sizes the throat
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use isp_core::units::{lbf, psia};
//! use isp_perf::{CoreConfig, CoreStream, Efficiencies, GeometryConfig, Thruster, ThrusterSettings};
//! use isp_thermo::{OracleFactory, PerfectGasBackend, PerfectGasPoint, PerfectGasTable, Propellants};
//!
//! let table = PerfectGasTable::new(vec![PerfectGasPoint {
//!     mixture_ratio: 1.9,
//!     chamber_temperature_r: 5600.0,
//!     mol_weight: 21.0,
//!     gamma_equilibrium: 1.17,
//!     gamma_frozen: 1.23,
//! }])
//! .unwrap();
//! let factory: Arc<dyn OracleFactory> =
//!     Arc::new(PerfectGasBackend::new().with_table(Propellants::default(), table));
//!
//! let effs = Efficiencies::with_constants(&[("ERE", 0.98)]).unwrap();
//! let core = CoreStream::new(CoreConfig::default(), GeometryConfig::default(), effs, factory).unwrap();
//! let mut thruster = Thruster::new("RCS", core, ThrusterSettings::default()).unwrap();
//! thruster.scale_throat_to_thrust(lbf(100.0), psia(0.0)).unwrap();
//!
//! let perf = thruster.core().performance().unwrap();
//! println!("IspDel: {:?}", perf.isp_del);
//! ```

pub mod area_split;
pub mod barrier;
pub mod core_stream;
pub mod correlations;
pub mod efficiency;
pub mod error;
pub mod geometry;
pub mod thruster;

pub use area_split::{combined_mixture_ratio, solve_throat_split};
pub use barrier::{BarrierConfig, BarrierPerformance, BarrierStream, CoreView};
pub use core_stream::{
    AttrValue, CoreAttr, CoreConfig, CorePerformance, CoreStream, FlowSplit, NozzleMode,
};
pub use efficiency::{Efficiencies, EfficiencyKind, EfficiencyValue};
pub use error::{PerfError, PerfResult};
pub use geometry::{ChamberLengthSource, Geometry, GeometryConfig};
pub use thruster::{Thruster, ThrusterSettings};

//! Core stream: the primary combustion and expansion flow of a thrust chamber.
//!
//! A [`CoreStream`] owns its inputs ([`CoreConfig`], [`Geometry`],
//! [`Efficiencies`]), the oracle handles it queries, and the optional
//! [`BarrierStream`]. Derived values live in [`CorePerformance`] and are
//! only readable while the stream is consistent.
//!
//! # Evaluation order
//!
//! 1. aggregate efficiencies
//! 2. query the oracle at (Pc, MR, eps)
//! 3. evaluate the barrier and solve the throat area split
//! 4. flows, thrust and delivered Isp
//! 5. back-derive the film cooling efficiency
//! 6. ambient correction (simple or separated)
//!
//! A failed evaluation leaves the previous consistent state, efficiencies and
//! barrier results untouched.

use crate::area_split::solve_throat_split;
use crate::barrier::{BarrierConfig, BarrierPerformance, BarrierStream, CoreView};
use crate::efficiency::{Efficiencies, EfficiencyKind};
use crate::error::{PerfError, PerfResult};
use crate::geometry::{Geometry, GeometryConfig};
use isp_core::units::constants::GC;
use isp_core::units::{
    Force, Length, MassRate, Pressure, SpecificImpulse, Temperature, Velocity, fps, lbf,
    lbm_per_s, psia, s, us,
};
use isp_thermo::{
    FixedKineticFraction, KaltBadal, NozzleKinetics, OracleFactory, Propellants, SeparationModel,
    ThermoOracle, exit_pressure,
};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::debug;

/// Ambient pressure below this [psia] is treated as vacuum.
const VACUUM_AMBIENT_PSIA: f64 = 1e-6;

/// Half width of the at-design band on exit pressure [psia].
const AT_DESIGN_BAND_PSIA: f64 = 0.05;

/// Core stream inputs.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CoreConfig {
    pub propellants: Propellants,
    /// Core mixture ratio (oxidizer / fuel).
    pub mixture_ratio: f64,
    pub pc: Pressure,
    pub ambient: Pressure,
    /// Throat discharge coefficient.
    pub cd_throat: f64,
    /// Multiplier on the oracle's equilibrium c*.
    pub adj_cstar_ode: f64,
    /// Multiplier on the oracle's equilibrium and frozen Isp.
    pub adj_isp_ideal: f64,
    /// Fuel film cooling as percent of total fuel; a barrier stream exists when > 0.
    pub ffc_percent: f64,
    /// Barrier entrainment constant.
    pub entrainment_constant: f64,
    /// Always use the simple ambient correction, even when the nozzle would separate.
    pub ignore_separation: bool,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            propellants: Propellants::default(),
            mixture_ratio: 1.9,
            pc: psia(500.0),
            ambient: psia(0.0),
            cd_throat: 0.995,
            adj_cstar_ode: 1.0,
            adj_isp_ideal: 1.0,
            ffc_percent: 0.0,
            entrainment_constant: 0.035,
            ignore_separation: false,
        }
    }
}

impl CoreConfig {
    pub fn validate(&self) -> PerfResult<()> {
        positive(self.mixture_ratio, "mixture ratio")?;
        positive(us::psia(self.pc), "chamber pressure")?;
        let pamb = us::psia(self.ambient);
        if !pamb.is_finite() || pamb < 0.0 {
            return Err(PerfError::InvalidArg {
                what: format!("ambient pressure must be >= 0, got {pamb} psia"),
            });
        }
        if !self.cd_throat.is_finite() || self.cd_throat <= 0.0 || self.cd_throat > 1.0 {
            return Err(PerfError::InvalidArg {
                what: format!("throat Cd must lie in (0, 1], got {}", self.cd_throat),
            });
        }
        positive(self.adj_cstar_ode, "c* adjustment")?;
        positive(self.adj_isp_ideal, "ideal Isp adjustment")?;
        if self.ffc_percent != 0.0 {
            self.barrier_config().validate()?;
        }
        Ok(())
    }

    fn barrier_config(&self) -> BarrierConfig {
        BarrierConfig {
            ffc_percent: self.ffc_percent,
            entrainment_constant: self.entrainment_constant,
        }
    }

    pub fn has_barrier(&self) -> bool {
        self.ffc_percent > 0.0
    }
}

fn positive(v: f64, what: &str) -> PerfResult<()> {
    if !v.is_finite() || v <= 0.0 {
        return Err(PerfError::InvalidArg {
            what: format!("{what} must be positive and finite, got {v}"),
        });
    }
    Ok(())
}

/// Input attributes settable by name through [`CoreStream::reset_attribute`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CoreAttr {
    Oxidizer,
    Fuel,
    MixtureRatio,
    /// Chamber pressure, psia when set by name.
    ChamberPressure,
    /// Ambient pressure, psia when set by name.
    AmbientPressure,
    CdThroat,
    AdjCstarOde,
    AdjIspIdeal,
    FfcPercent,
    EntrainmentConstant,
    IgnoreSeparation,
}

impl CoreAttr {
    pub const ALL: [CoreAttr; 11] = [
        Self::Oxidizer,
        Self::Fuel,
        Self::MixtureRatio,
        Self::ChamberPressure,
        Self::AmbientPressure,
        Self::CdThroat,
        Self::AdjCstarOde,
        Self::AdjIspIdeal,
        Self::FfcPercent,
        Self::EntrainmentConstant,
        Self::IgnoreSeparation,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Oxidizer => "oxidizer",
            Self::Fuel => "fuel",
            Self::MixtureRatio => "mixture_ratio",
            Self::ChamberPressure => "pc",
            Self::AmbientPressure => "ambient_pressure",
            Self::CdThroat => "cd_throat",
            Self::AdjCstarOde => "adj_cstar_ode",
            Self::AdjIspIdeal => "adj_isp_ideal",
            Self::FfcPercent => "ffc_percent",
            Self::EntrainmentConstant => "entrainment_constant",
            Self::IgnoreSeparation => "ignore_separation",
        }
    }
}

impl FromStr for CoreAttr {
    type Err = PerfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|a| a.name() == s)
            .ok_or_else(|| PerfError::UnknownAttribute { name: s.into() })
    }
}

/// Value passed to [`CoreStream::reset_attribute`].
#[derive(Clone, Debug, PartialEq)]
pub enum AttrValue {
    Number(f64),
    Flag(bool),
    Text(String),
}

impl From<f64> for AttrValue {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<bool> for AttrValue {
    fn from(v: bool) -> Self {
        Self::Flag(v)
    }
}

impl From<&str> for AttrValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl AttrValue {
    fn number(self, attr: CoreAttr) -> PerfResult<f64> {
        match self {
            Self::Number(v) => Ok(v),
            other => Err(type_mismatch(attr, "a number", &other)),
        }
    }

    fn flag(self, attr: CoreAttr) -> PerfResult<bool> {
        match self {
            Self::Flag(v) => Ok(v),
            other => Err(type_mismatch(attr, "a flag", &other)),
        }
    }

    fn text(self, attr: CoreAttr) -> PerfResult<String> {
        match self {
            Self::Text(v) => Ok(v),
            other => Err(type_mismatch(attr, "text", &other)),
        }
    }
}

fn type_mismatch(attr: CoreAttr, expected: &str, got: &AttrValue) -> PerfError {
    PerfError::InvalidArg {
        what: format!("attribute {} expects {expected}, got {got:?}", attr.name()),
    }
}

/// Nozzle flow regime at the current ambient pressure.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum NozzleMode {
    Vacuum,
    UnderExpanded,
    OverExpanded,
    /// Exit pressure within the at-design band of ambient.
    AtDesign,
    Separated {
        area_ratio: f64,
        pressure: Pressure,
    },
}

impl fmt::Display for NozzleMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Vacuum => f.write_str("Vacuum"),
            Self::UnderExpanded => f.write_str("UnderExpanded"),
            Self::OverExpanded => f.write_str("OverExpanded"),
            Self::AtDesign => f.write_str("AtDesign"),
            Self::Separated {
                area_ratio,
                pressure,
            } => write!(
                f,
                "Separated (Psep={:.4} psia, epsSep={area_ratio:.4})",
                us::psia(*pressure)
            ),
        }
    }
}

/// Total, oxidizer and fuel mass flow of one stream.
#[derive(Clone, Copy, Debug)]
pub struct FlowSplit {
    pub total: MassRate,
    pub oxidizer: MassRate,
    pub fuel: MassRate,
}

impl FlowSplit {
    fn from_total(total: f64, mixture_ratio: f64) -> Self {
        let ox = total * mixture_ratio / (1.0 + mixture_ratio);
        Self {
            total: lbm_per_s(total),
            oxidizer: lbm_per_s(ox),
            fuel: lbm_per_s(total - ox),
        }
    }

    fn zero() -> Self {
        Self::from_total(0.0, 1.0)
    }

    fn sum(a: &Self, b: &Self) -> Self {
        Self {
            total: a.total + b.total,
            oxidizer: a.oxidizer + b.oxidizer,
            fuel: a.fuel + b.fuel,
        }
    }
}

/// Everything derived by one successful [`CoreStream::evaluate`].
#[derive(Clone, Debug)]
pub struct CorePerformance {
    pub isp_ode: SpecificImpulse,
    pub isp_odf: SpecificImpulse,
    pub isp_odk: SpecificImpulse,
    pub cstar_ode: Velocity,
    pub chamber_temperature: Temperature,
    pub mol_weight: f64,
    pub gamma: f64,
    /// Fraction of the way from frozen to equilibrium Isp.
    pub frac_kin: f64,
    pub exit_pressure: Pressure,
    pub cf_vac_ideal: f64,

    pub isp_del_core: SpecificImpulse,
    pub cstar_ere_core: Velocity,
    /// Delivered vacuum Isp of the combined flow.
    pub isp_del: SpecificImpulse,
    pub isp_del_pulse: SpecificImpulse,
    pub cstar_ere: Velocity,
    pub isp_amb: SpecificImpulse,

    pub frac_at_core: f64,
    pub frac_at_barrier: f64,
    pub core_flow: FlowSplit,
    pub barrier_flow: FlowSplit,
    pub total_flow: FlowSplit,
    /// Engine mixture ratio `MRcore * (1 - ffc)`.
    pub mr_thruster: f64,

    pub thrust_vac_core: Force,
    pub thrust_vac_barrier: Force,
    pub thrust_vac: Force,
    pub thrust_amb: Force,
    pub cf_vac_del: f64,
    pub cf_amb_del: f64,

    pub nozzle_mode: NozzleMode,
    pub barrier: Option<BarrierPerformance>,
    /// Recoverable advisories from this evaluation.
    pub warnings: Vec<String>,
}

/// The primary flow of a thrust chamber.
pub struct CoreStream {
    config: CoreConfig,
    cd_source: String,
    geometry: Geometry,
    efficiencies: Efficiencies,
    factory: Arc<dyn OracleFactory>,
    oracle: Box<dyn ThermoOracle>,
    kinetics: Box<dyn NozzleKinetics>,
    separation: Box<dyn SeparationModel>,
    barrier: Option<BarrierStream>,
    performance: Option<CorePerformance>,
    dirty: bool,
}

impl fmt::Debug for CoreStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CoreStream")
            .field("config", &self.config)
            .field("oracle", &self.oracle.name())
            .field("kinetics", &self.kinetics.name())
            .field("separation", &self.separation.name())
            .field("dirty", &self.dirty)
            .finish()
    }
}

impl CoreStream {
    /// Create a stream with the Kalt-Badal separation model and full kinetic
    /// recovery. The stream starts stale; call [`CoreStream::evaluate`].
    pub fn new(
        config: CoreConfig,
        geometry: GeometryConfig,
        efficiencies: Efficiencies,
        factory: Arc<dyn OracleFactory>,
    ) -> PerfResult<Self> {
        config.validate()?;
        let geometry = Geometry::new(geometry)?;
        let oracle = factory.build(&config.propellants)?;
        let barrier = if config.has_barrier() {
            Some(BarrierStream::new(config.barrier_config())?)
        } else {
            None
        };
        Ok(Self {
            config,
            cd_source: "default".into(),
            geometry,
            efficiencies,
            factory,
            oracle,
            kinetics: Box::new(FixedKineticFraction::default()),
            separation: Box::new(KaltBadal),
            barrier,
            performance: None,
            dirty: true,
        })
    }

    pub fn with_kinetics(mut self, kinetics: Box<dyn NozzleKinetics>) -> Self {
        self.kinetics = kinetics;
        self.dirty = true;
        self
    }

    pub fn with_separation(mut self, separation: Box<dyn SeparationModel>) -> Self {
        self.separation = separation;
        self.dirty = true;
        self
    }

    pub fn config(&self) -> &CoreConfig {
        &self.config
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn efficiencies(&self) -> &Efficiencies {
        &self.efficiencies
    }

    /// Mutable access to the registry. Marks the stream stale.
    pub fn efficiencies_mut(&mut self) -> &mut Efficiencies {
        self.dirty = true;
        &mut self.efficiencies
    }

    pub fn oracle(&self) -> &dyn ThermoOracle {
        self.oracle.as_ref()
    }

    pub fn kinetics(&self) -> &dyn NozzleKinetics {
        self.kinetics.as_ref()
    }

    pub fn barrier(&self) -> Option<&BarrierStream> {
        self.barrier.as_ref()
    }

    /// Throat Cd and the method that produced it.
    pub fn discharge_coefficient(&self) -> (f64, &str) {
        (self.config.cd_throat, &self.cd_source)
    }

    /// True when derived values reflect the current inputs.
    pub fn is_consistent(&self) -> bool {
        !self.dirty && self.performance.is_some()
    }

    /// Derived values of the last evaluation.
    pub fn performance(&self) -> PerfResult<&CorePerformance> {
        match &self.performance {
            Some(p) if !self.dirty => Ok(p),
            _ => Err(PerfError::Stale),
        }
    }

    pub fn set_mixture_ratio(&mut self, mixture_ratio: f64) -> PerfResult<()> {
        positive(mixture_ratio, "mixture ratio")?;
        self.config.mixture_ratio = mixture_ratio;
        self.dirty = true;
        Ok(())
    }

    pub fn set_chamber_pressure(&mut self, pc: Pressure) -> PerfResult<()> {
        positive(us::psia(pc), "chamber pressure")?;
        self.config.pc = pc;
        self.dirty = true;
        Ok(())
    }

    pub fn set_ambient_pressure(&mut self, ambient: Pressure) -> PerfResult<()> {
        let pamb = us::psia(ambient);
        if !pamb.is_finite() || pamb < 0.0 {
            return Err(PerfError::InvalidArg {
                what: format!("ambient pressure must be >= 0, got {pamb} psia"),
            });
        }
        self.config.ambient = ambient;
        self.dirty = true;
        Ok(())
    }

    /// Change the propellant pair, rebuilding the oracle handle.
    ///
    /// On failure the previous pair and oracle stay in place.
    pub fn set_propellants(&mut self, propellants: Propellants) -> PerfResult<()> {
        let oracle = self.factory.build(&propellants)?;
        debug!(propellants = %propellants, backend = oracle.name(), "oracle rebuilt");
        self.oracle = oracle;
        self.config.propellants = propellants;
        self.dirty = true;
        Ok(())
    }

    pub fn set_adjustments(&mut self, adj_cstar_ode: f64, adj_isp_ideal: f64) -> PerfResult<()> {
        positive(adj_cstar_ode, "c* adjustment")?;
        positive(adj_isp_ideal, "ideal Isp adjustment")?;
        self.config.adj_cstar_ode = adj_cstar_ode;
        self.config.adj_isp_ideal = adj_isp_ideal;
        self.dirty = true;
        Ok(())
    }

    /// Set film cooling. A positive percentage creates the barrier stream;
    /// zero removes it and resets the film cooling efficiency to its default.
    pub fn set_film_cooling(
        &mut self,
        ffc_percent: f64,
        entrainment_constant: f64,
    ) -> PerfResult<()> {
        if !ffc_percent.is_finite() || ffc_percent < 0.0 {
            return Err(PerfError::InvalidArg {
                what: format!("film cooling percent must be >= 0, got {ffc_percent}"),
            });
        }
        let mut config = self.config.clone();
        config.ffc_percent = ffc_percent;
        config.entrainment_constant = entrainment_constant;
        self.barrier = if config.has_barrier() {
            Some(BarrierStream::new(config.barrier_config())?)
        } else {
            if self.barrier.is_some() {
                self.efficiencies.store(EfficiencyKind::FFC, 1.0, "default")?;
            }
            None
        };
        self.config = config;
        self.dirty = true;
        Ok(())
    }

    pub fn set_ignore_separation(&mut self, ignore: bool) {
        self.config.ignore_separation = ignore;
        self.dirty = true;
    }

    pub fn set_geometry(&mut self, geometry: GeometryConfig) -> PerfResult<()> {
        self.geometry = Geometry::new(geometry)?;
        self.dirty = true;
        Ok(())
    }

    pub fn set_throat_radius(&mut self, throat_radius: Length) -> PerfResult<()> {
        let mut config = self.geometry.config().clone();
        config.throat_radius = throat_radius;
        self.set_geometry(config)
    }

    /// Reset the throat Cd with its provenance; evaluate when `re_evaluate`.
    pub fn reset_discharge_coefficient(
        &mut self,
        value: f64,
        method: impl Into<String>,
        re_evaluate: bool,
    ) -> PerfResult<()> {
        if !value.is_finite() || value <= 0.0 || value > 1.0 {
            return Err(PerfError::InvalidArg {
                what: format!("throat Cd must lie in (0, 1], got {value}"),
            });
        }
        self.config.cd_throat = value;
        self.cd_source = method.into();
        self.dirty = true;
        if re_evaluate {
            self.evaluate()?;
        }
        Ok(())
    }

    /// Set an input attribute by name; evaluate when `re_evaluate`.
    ///
    /// Pressures given by name are in psia.
    pub fn reset_attribute(
        &mut self,
        name: &str,
        value: impl Into<AttrValue>,
        re_evaluate: bool,
    ) -> PerfResult<()> {
        let attr: CoreAttr = name.parse()?;
        let value = value.into();
        match attr {
            CoreAttr::Oxidizer => {
                let fuel = self.config.propellants.fuel.clone();
                self.set_propellants(Propellants::new(value.text(attr)?, fuel))?;
            }
            CoreAttr::Fuel => {
                let ox = self.config.propellants.oxidizer.clone();
                self.set_propellants(Propellants::new(ox, value.text(attr)?))?;
            }
            CoreAttr::MixtureRatio => self.set_mixture_ratio(value.number(attr)?)?,
            CoreAttr::ChamberPressure => self.set_chamber_pressure(psia(value.number(attr)?))?,
            CoreAttr::AmbientPressure => self.set_ambient_pressure(psia(value.number(attr)?))?,
            CoreAttr::CdThroat => {
                self.reset_discharge_coefficient(value.number(attr)?, "user input", false)?
            }
            CoreAttr::AdjCstarOde => {
                let isp = self.config.adj_isp_ideal;
                self.set_adjustments(value.number(attr)?, isp)?;
            }
            CoreAttr::AdjIspIdeal => {
                let cstar = self.config.adj_cstar_ode;
                self.set_adjustments(cstar, value.number(attr)?)?;
            }
            CoreAttr::FfcPercent => {
                let ko = self.config.entrainment_constant;
                self.set_film_cooling(value.number(attr)?, ko)?;
            }
            CoreAttr::EntrainmentConstant => {
                let ffc = self.config.ffc_percent;
                self.set_film_cooling(ffc, value.number(attr)?)?;
            }
            CoreAttr::IgnoreSeparation => self.set_ignore_separation(value.flag(attr)?),
        }
        if re_evaluate {
            self.evaluate()?;
        }
        Ok(())
    }

    /// Recompute every derived value from the current inputs.
    ///
    /// Commits the new efficiencies, barrier results and performance only
    /// when every step succeeds.
    pub fn evaluate(&mut self) -> PerfResult<()> {
        let mut effs = self.efficiencies.clone();
        let performance = self.compute(&mut effs)?;

        if let (Some(barrier), Some(bperf)) = (self.barrier.as_mut(), &performance.barrier) {
            barrier.commit(bperf.clone());
        }
        self.efficiencies = effs;
        self.performance = Some(performance);
        self.dirty = false;
        Ok(())
    }

    fn compute(&self, effs: &mut Efficiencies) -> PerfResult<CorePerformance> {
        effs.aggregate();
        debug!(
            noz = effs.value(EfficiencyKind::Noz),
            ere = effs.value(EfficiencyKind::ERE),
            isp = effs.value(EfficiencyKind::Isp),
            "efficiencies aggregated"
        );

        let cfg = &self.config;
        let oracle = self.oracle.as_ref();
        let pc = us::psia(cfg.pc);
        let mr = cfg.mixture_ratio;
        let eps = self.geometry.area_ratio();

        let ode = oracle.ideal_performance(cfg.pc, mr, eps)?;
        let cstar_ode = us::fps(ode.cstar) * cfg.adj_cstar_ode;
        let isp_ode = us::seconds(ode.isp) * cfg.adj_isp_ideal;
        let isp_odf =
            us::seconds(oracle.frozen_performance(cfg.pc, mr, eps)?.isp) * cfg.adj_isp_ideal;
        let isp_odk = isp_ode * effs.value(EfficiencyKind::Kin);

        let denom = isp_ode - isp_odf;
        if denom.abs() < 1e-9 * isp_ode.abs().max(1.0) {
            return Err(PerfError::Domain {
                what: format!(
                    "equilibrium and frozen Isp coincide ({isp_ode} s), kinetic fraction undefined"
                ),
            });
        }
        let frac_kin = (isp_odk - isp_odf) / denom;
        let pexit = us::psia(exit_pressure(oracle, cfg.pc, mr, eps)?);
        let cf_vac_ideal = GC * isp_ode / cstar_ode;
        debug!(isp_ode, isp_odf, cstar_ode, pexit, "oracle queried");

        let eff_noz = effs.value(EfficiencyKind::Noz);
        let eff_ere = effs.value(EfficiencyKind::ERE);
        let cstar_ere_core = cstar_ode * eff_ere;
        let isp_del_core = eff_noz * eff_ere * isp_ode;

        let at = us::sq_inches(self.geometry.throat_area());
        let cd = cfg.cd_throat;
        let mut warnings = Vec::new();

        let (frac_at_core, barrier_perf, barrier_flow, thrust_vac_barrier, mr_thruster) =
            match &self.barrier {
                Some(barrier) => {
                    let view = CoreView {
                        oracle,
                        kinetics: self.kinetics.as_ref(),
                        geometry: &self.geometry,
                        efficiencies: &*effs,
                        pc,
                        mr_core: mr,
                        adj_cstar_ode: cfg.adj_cstar_ode,
                        adj_isp_ideal: cfg.adj_isp_ideal,
                        isp_ode,
                        isp_odf,
                        frac_kin,
                    };
                    let bperf = barrier.evaluate(&view)?;
                    let ffc = barrier.config().ffc_fraction();
                    let cstar_ere_b = us::fps(bperf.cstar_ere);
                    let f = solve_throat_split(mr, bperf.mixture_ratio, ffc, cstar_ere_core, cstar_ere_b);
                    debug!(frac_at_core = f, mr_barrier = bperf.mixture_ratio, "throat area split");

                    let wdot_b = pc * (1.0 - f) * at * cd * GC / cstar_ere_b;
                    let flow = FlowSplit::from_total(wdot_b, bperf.mixture_ratio);
                    let thrust = wdot_b * us::seconds(bperf.isp_del);
                    warnings.extend(bperf.warnings.iter().cloned());
                    (f, Some(bperf), flow, thrust, mr * (1.0 - ffc))
                }
                None => (1.0, None, FlowSplit::zero(), 0.0, mr),
            };

        let wdot_core = pc * frac_at_core * at * cd * GC / cstar_ere_core;
        let core_flow = FlowSplit::from_total(wdot_core, mr);
        let total_flow = FlowSplit::sum(&core_flow, &barrier_flow);
        let wdot_total = wdot_core + us::lbm_per_s(barrier_flow.total);

        let (isp_del, thrust_vac_core) = if barrier_perf.is_some() {
            let thrust_core = wdot_core * isp_del_core;
            let isp_del = (thrust_core + thrust_vac_barrier) / wdot_total;
            effs.store(EfficiencyKind::FFC, isp_del / isp_del_core, "barrier calc")?;
            effs.aggregate();
            (isp_del, thrust_core)
        } else {
            // a user-supplied FFC efficiency acts as a plain loss without a barrier
            let isp_del = effs.value(EfficiencyKind::Isp) * isp_ode;
            (isp_del, wdot_core * isp_del)
        };
        let thrust_vac = thrust_vac_core + thrust_vac_barrier;
        let isp_del_pulse = isp_del * effs.value(EfficiencyKind::Pulse);
        let cstar_ere = cstar_ode * effs.value(EfficiencyKind::ERE);

        let pamb = us::psia(cfg.ambient);
        let (isp_amb, nozzle_mode) = if pamb < VACUUM_AMBIENT_PSIA {
            (isp_del, NozzleMode::Vacuum)
        } else {
            let sep = self.separation.separation(ode.gamma, eps, cfg.pc, cfg.ambient)?;
            let psep = us::psia(sep.pressure_at_separation);
            if pexit >= psep || cfg.ignore_separation {
                let isp_amb = isp_del - cstar_ere * pamb * eps / pc / GC;
                let mode = if pexit > pamb + AT_DESIGN_BAND_PSIA {
                    NozzleMode::UnderExpanded
                } else if pexit < pamb - AT_DESIGN_BAND_PSIA {
                    NozzleMode::OverExpanded
                } else {
                    NozzleMode::AtDesign
                };
                (isp_amb, mode)
            } else {
                let eps_sep = sep.area_ratio_at_separation;
                let isp_ode_sep =
                    us::seconds(oracle.vacuum_isp(cfg.pc, mr, eps_sep)?) * cfg.adj_isp_ideal;
                let mode = NozzleMode::Separated {
                    area_ratio: eps_sep,
                    pressure: sep.pressure_at_separation,
                };
                (isp_del * isp_ode_sep / isp_ode, mode)
            }
        };
        let thrust_amb = thrust_vac * isp_amb / isp_del;
        debug!(isp_del, isp_amb, mode = %nozzle_mode, "stream evaluated");

        Ok(CorePerformance {
            isp_ode: s(isp_ode),
            isp_odf: s(isp_odf),
            isp_odk: s(isp_odk),
            cstar_ode: fps(cstar_ode),
            chamber_temperature: ode.chamber_temperature,
            mol_weight: ode.mol_weight,
            gamma: ode.gamma,
            frac_kin,
            exit_pressure: psia(pexit),
            cf_vac_ideal,
            isp_del_core: s(isp_del_core),
            cstar_ere_core: fps(cstar_ere_core),
            isp_del: s(isp_del),
            isp_del_pulse: s(isp_del_pulse),
            cstar_ere: fps(cstar_ere),
            isp_amb: s(isp_amb),
            frac_at_core,
            frac_at_barrier: 1.0 - frac_at_core,
            core_flow,
            barrier_flow,
            total_flow,
            mr_thruster,
            thrust_vac_core: lbf(thrust_vac_core),
            thrust_vac_barrier: lbf(thrust_vac_barrier),
            thrust_vac: lbf(thrust_vac),
            thrust_amb: lbf(thrust_amb),
            cf_vac_del: thrust_vac / (at * pc),
            cf_amb_del: thrust_amb / (at * pc),
            nozzle_mode,
            barrier: barrier_perf,
            warnings,
        })
    }
}

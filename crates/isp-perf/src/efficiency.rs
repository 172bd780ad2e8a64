//! Efficiency registry.
//!
//! Every loss mechanism is a named multiplicative factor. The nozzle members
//! roll up into `Noz`, the chamber (energy-release) members roll up into
//! `ERE`, and `Isp = Noz * ERE * FFC`. `IspPulsing = Isp * Pulse`.
//!
//! An entry is either `Computed` (set by a model or by aggregation) or
//! `Held` (an external override). A held aggregate is never recomputed from
//! its members.

use crate::error::{PerfError, PerfResult};
use std::fmt;
use std::str::FromStr;

/// Identity of a registry entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EfficiencyKind {
    Div,
    Kin,
    BL,
    TP,
    Mix,
    Em,
    Vap,
    HL,
    FFC,
    Pulse,
    Noz,
    ERE,
    Isp,
    IspPulsing,
}

impl EfficiencyKind {
    pub const ALL: [EfficiencyKind; 14] = [
        Self::Div,
        Self::Kin,
        Self::BL,
        Self::TP,
        Self::Mix,
        Self::Em,
        Self::Vap,
        Self::HL,
        Self::FFC,
        Self::Pulse,
        Self::Noz,
        Self::ERE,
        Self::Isp,
        Self::IspPulsing,
    ];

    /// Members of the nozzle roll-up.
    pub const NOZZLE: [EfficiencyKind; 4] = [Self::Div, Self::Kin, Self::BL, Self::TP];

    /// Members of the energy-release roll-up.
    pub const CHAMBER: [EfficiencyKind; 4] = [Self::Mix, Self::Em, Self::Vap, Self::HL];

    pub fn name(self) -> &'static str {
        match self {
            Self::Div => "Div",
            Self::Kin => "Kin",
            Self::BL => "BL",
            Self::TP => "TP",
            Self::Mix => "Mix",
            Self::Em => "Em",
            Self::Vap => "Vap",
            Self::HL => "HL",
            Self::FFC => "FFC",
            Self::Pulse => "Pulse",
            Self::Noz => "Noz",
            Self::ERE => "ERE",
            Self::Isp => "Isp",
            Self::IspPulsing => "IspPulsing",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Div => "Divergence Efficiency of Nozzle",
            Self::Kin => "Kinetic Efficiency of Nozzle",
            Self::BL => "Boundary Layer Efficiency of Nozzle",
            Self::TP => "Two Phase Efficiency of Nozzle",
            Self::Mix => "Inter-Element Mixing Efficiency of Injector",
            Self::Em => "Intra-Element Mixing Efficiency of Injector",
            Self::Vap => "Vaporization Efficiency of Injector",
            Self::HL => "Heat Loss Efficiency of Chamber",
            Self::FFC => "Fuel Film Cooling Efficiency of Chamber",
            Self::Pulse => "Pulsing Efficiency of Thruster",
            Self::Noz => "Nozzle Efficiency",
            Self::ERE => "Energy Release Efficiency",
            Self::Isp => "Overall Isp Efficiency",
            Self::IspPulsing => "Pulsing Isp Efficiency",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for EfficiencyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EfficiencyKind {
    type Err = PerfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|k| k.name() == s)
            .ok_or_else(|| PerfError::UnknownEfficiency { name: s.into() })
    }
}

/// Current value of one entry.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EfficiencyValue {
    Computed { value: f64, source: String },
    Held(f64),
}

impl EfficiencyValue {
    pub fn value(&self) -> f64 {
        match self {
            Self::Computed { value, .. } | Self::Held(value) => *value,
        }
    }

    /// Provenance tag ("default", "constant", a model name, ...).
    pub fn source(&self) -> &str {
        match self {
            Self::Computed { source, .. } => source,
            Self::Held(_) => "constant",
        }
    }

    pub fn is_held(&self) -> bool {
        matches!(self, Self::Held(_))
    }
}

impl Default for EfficiencyValue {
    fn default() -> Self {
        Self::Computed {
            value: 1.0,
            source: "default".into(),
        }
    }
}

/// The fixed set of named efficiencies owned by a core stream.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Efficiencies {
    entries: [EfficiencyValue; 14],
}

impl Default for Efficiencies {
    fn default() -> Self {
        let mut entries: [EfficiencyValue; 14] = Default::default();
        for kind in [
            EfficiencyKind::Noz,
            EfficiencyKind::ERE,
            EfficiencyKind::Isp,
            EfficiencyKind::IspPulsing,
        ] {
            entries[kind.index()] = EfficiencyValue::Computed {
                value: 1.0,
                source: String::new(),
            };
        }
        Self { entries }
    }
}

impl Efficiencies {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry with named entries held constant, then aggregate.
    ///
    /// Unknown names fail; nothing is created on the fly.
    pub fn with_constants(constants: &[(&str, f64)]) -> PerfResult<Self> {
        let mut effs = Self::default();
        for (name, value) in constants {
            let kind: EfficiencyKind = name.parse()?;
            effs.hold(kind, *value)?;
        }
        effs.aggregate();
        Ok(effs)
    }

    /// Look up a kind by name.
    pub fn kind(name: &str) -> PerfResult<EfficiencyKind> {
        name.parse()
    }

    pub fn get(&self, kind: EfficiencyKind) -> &EfficiencyValue {
        &self.entries[kind.index()]
    }

    pub fn value(&self, kind: EfficiencyKind) -> f64 {
        self.get(kind).value()
    }

    pub fn is_held(&self, kind: EfficiencyKind) -> bool {
        self.get(kind).is_held()
    }

    /// Hold `kind` at `value` and re-aggregate.
    pub fn set_constant(&mut self, kind: EfficiencyKind, value: f64) -> PerfResult<()> {
        self.hold(kind, value)?;
        self.aggregate();
        Ok(())
    }

    /// Hold `kind` at `value` without re-aggregating.
    pub fn hold(&mut self, kind: EfficiencyKind, value: f64) -> PerfResult<()> {
        if !value.is_finite() || value <= 0.0 || value > 1.0 {
            return Err(PerfError::InvalidArg {
                what: format!("efficiency {kind} must lie in (0, 1], got {value}"),
            });
        }
        self.entries[kind.index()] = EfficiencyValue::Held(value);
        Ok(())
    }

    /// Store a computed value with its provenance and re-aggregate.
    ///
    /// This replaces a held value as well; callers that must respect
    /// overrides check [`Efficiencies::is_held`] first.
    pub fn set_value(
        &mut self,
        kind: EfficiencyKind,
        value: f64,
        source: impl Into<String>,
    ) -> PerfResult<()> {
        self.store(kind, value, source)?;
        self.aggregate();
        Ok(())
    }

    /// Store a computed value without re-aggregating.
    pub fn store(
        &mut self,
        kind: EfficiencyKind,
        value: f64,
        source: impl Into<String>,
    ) -> PerfResult<()> {
        if !value.is_finite() || value <= 0.0 {
            return Err(PerfError::InvalidArg {
                what: format!("efficiency {kind} must be positive and finite, got {value}"),
            });
        }
        self.entries[kind.index()] = EfficiencyValue::Computed {
            value,
            source: source.into(),
        };
        Ok(())
    }

    /// Recompute `Noz`, `ERE`, `Isp` and `IspPulsing`, in that order,
    /// skipping any that are held.
    pub fn aggregate(&mut self) {
        let noz = self.roll_up(EfficiencyKind::Noz, &EfficiencyKind::NOZZLE);
        let ere = self.roll_up(EfficiencyKind::ERE, &EfficiencyKind::CHAMBER);

        if !self.is_held(EfficiencyKind::Isp) {
            let isp = noz * ere * self.value(EfficiencyKind::FFC);
            self.entries[EfficiencyKind::Isp.index()] = EfficiencyValue::Computed {
                value: isp,
                source: String::new(),
            };
        }

        if !self.is_held(EfficiencyKind::IspPulsing) {
            let pulse = self.get(EfficiencyKind::Pulse);
            let entry = EfficiencyValue::Computed {
                value: self.value(EfficiencyKind::Isp) * pulse.value(),
                source: pulse.source().to_string(),
            };
            self.entries[EfficiencyKind::IspPulsing.index()] = entry;
        }
    }

    fn roll_up(&mut self, aggregate: EfficiencyKind, members: &[EfficiencyKind]) -> f64 {
        if let EfficiencyValue::Held(v) = self.get(aggregate) {
            return *v;
        }
        let product: f64 = members.iter().map(|k| self.value(*k)).product();
        self.entries[aggregate.index()] = EfficiencyValue::Computed {
            value: product,
            source: String::new(),
        };
        product
    }

    /// Entries in registry order with their current values.
    pub fn iter(&self) -> impl Iterator<Item = (EfficiencyKind, &EfficiencyValue)> {
        EfficiencyKind::ALL.iter().map(|k| (*k, self.get(*k)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_unity() {
        let effs = Efficiencies::new();
        for (kind, entry) in effs.iter() {
            assert_eq!(entry.value(), 1.0, "{kind}");
            assert!(!entry.is_held());
        }
        assert_eq!(effs.get(EfficiencyKind::Div).source(), "default");
    }

    #[test]
    fn aggregates_products() {
        let mut effs = Efficiencies::new();
        effs.set_value(EfficiencyKind::Div, 0.99, "test").unwrap();
        effs.set_value(EfficiencyKind::BL, 0.98, "test").unwrap();
        effs.set_value(EfficiencyKind::Mix, 0.97, "test").unwrap();
        effs.set_value(EfficiencyKind::Pulse, 0.9, "pulse model").unwrap();

        let noz = 0.99 * 0.98;
        assert!((effs.value(EfficiencyKind::Noz) - noz).abs() < 1e-15);
        assert!((effs.value(EfficiencyKind::ERE) - 0.97).abs() < 1e-15);
        assert!((effs.value(EfficiencyKind::Isp) - noz * 0.97).abs() < 1e-15);
        assert!((effs.value(EfficiencyKind::IspPulsing) - noz * 0.97 * 0.9).abs() < 1e-15);
        assert_eq!(effs.get(EfficiencyKind::IspPulsing).source(), "pulse model");
    }

    #[test]
    fn held_aggregate_ignores_members() {
        let mut effs = Efficiencies::with_constants(&[("ERE", 0.98), ("Noz", 0.97)]).unwrap();
        effs.set_value(EfficiencyKind::Mix, 0.5, "ignored").unwrap();
        effs.set_value(EfficiencyKind::Div, 0.5, "ignored").unwrap();

        assert_eq!(effs.value(EfficiencyKind::ERE), 0.98);
        assert_eq!(effs.value(EfficiencyKind::Noz), 0.97);
        assert!((effs.value(EfficiencyKind::Isp) - 0.98 * 0.97).abs() < 1e-15);
        // members keep their values even though they were not consulted
        assert_eq!(effs.value(EfficiencyKind::Mix), 0.5);
    }

    #[test]
    fn held_isp_short_circuits_ffc() {
        let mut effs = Efficiencies::with_constants(&[("Isp", 0.9)]).unwrap();
        effs.set_value(EfficiencyKind::FFC, 0.8, "test").unwrap();
        assert_eq!(effs.value(EfficiencyKind::Isp), 0.9);
    }

    #[test]
    fn aggregate_is_idempotent() {
        let mut effs = Efficiencies::new();
        effs.store(EfficiencyKind::Div, 0.987, "a").unwrap();
        effs.store(EfficiencyKind::Vap, 0.991, "b").unwrap();
        effs.store(EfficiencyKind::FFC, 0.97, "c").unwrap();
        effs.aggregate();
        let first = effs.clone();
        effs.aggregate();
        assert_eq!(first, effs);
    }

    #[test]
    fn unknown_name_is_rejected() {
        let err = Efficiencies::with_constants(&[("Bogus", 0.9)]).unwrap_err();
        assert!(matches!(err, PerfError::UnknownEfficiency { .. }));
        assert!(Efficiencies::kind("noz").is_err());
        assert_eq!(Efficiencies::kind("IspPulsing").unwrap(), EfficiencyKind::IspPulsing);
    }

    #[test]
    fn constant_range_checked() {
        let mut effs = Efficiencies::new();
        assert!(effs.set_constant(EfficiencyKind::Div, 0.0).is_err());
        assert!(effs.set_constant(EfficiencyKind::Div, 1.01).is_err());
        assert!(effs.set_constant(EfficiencyKind::Div, f64::NAN).is_err());
        assert!(effs.set_value(EfficiencyKind::FFC, -0.1, "x").is_err());
        assert!(effs.set_constant(EfficiencyKind::Div, 1.0).is_ok());
    }

    #[test]
    fn names_round_trip() {
        for kind in EfficiencyKind::ALL {
            assert_eq!(kind.name().parse::<EfficiencyKind>().unwrap(), kind);
        }
    }
}

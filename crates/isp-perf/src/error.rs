//! Error types for performance-model operations.

use isp_core::error::IspError;
use isp_thermo::ThermoError;
use thiserror::Error;

/// Errors that can occur while configuring or evaluating the performance model.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PerfError {
    #[error("Unknown efficiency name: {name}")]
    UnknownEfficiency { name: String },

    #[error("Unknown stream attribute: {name}")]
    UnknownAttribute { name: String },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: String },

    #[error("Geometry error: {what}")]
    Geometry { what: String },

    #[error("Numeric domain error: {what}")]
    Domain { what: String },

    #[error("Derived values are stale: call evaluate() first")]
    Stale,

    #[error("Thermochemistry error: {0}")]
    Thermo(#[from] ThermoError),
}

pub type PerfResult<T> = Result<T, PerfError>;

impl From<PerfError> for IspError {
    fn from(e: PerfError) -> Self {
        match e {
            PerfError::UnknownEfficiency { name } => IspError::Config {
                what: format!("unknown efficiency {name}"),
            },
            PerfError::UnknownAttribute { name } => IspError::Config {
                what: format!("unknown attribute {name}"),
            },
            PerfError::InvalidArg { what } => IspError::InvalidArg { what },
            PerfError::Geometry { what } => IspError::Config { what },
            PerfError::Domain { what } => IspError::Domain { what },
            PerfError::Stale => IspError::Invariant {
                what: "derived values read before evaluate".into(),
            },
            PerfError::Thermo(e) => e.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = PerfError::UnknownEfficiency {
            name: "Foo".into(),
        };
        assert!(err.to_string().contains("Foo"));
        assert!(PerfError::Stale.to_string().contains("evaluate"));
    }

    #[test]
    fn error_conversion() {
        let isp_err: IspError = PerfError::Domain {
            what: "zero denominator".into(),
        }
        .into();
        assert!(matches!(isp_err, IspError::Domain { .. }));

        let isp_err: IspError = PerfError::Thermo(ThermoError::NonPhysical { what: "gamma" }).into();
        assert!(matches!(isp_err, IspError::Invariant { .. }));
    }
}

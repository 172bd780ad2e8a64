//! Thermochemistry oracle errors.

use isp_core::IspError;
use thiserror::Error;

/// Result type for oracle operations.
pub type ThermoResult<T> = Result<T, ThermoError>;

/// Errors that can occur while querying a thermochemistry backend.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ThermoError {
    /// Non-physical values (negative pressure, gamma below one, etc.).
    #[error("Non-physical value for {what}")]
    NonPhysical { what: &'static str },

    /// Invalid argument.
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    /// No backend data for the requested oxidizer/fuel pair.
    #[error("Unknown propellant combination: {pair}")]
    UnknownPropellants { pair: String },

    /// Backend error.
    #[error("Backend error: {message}")]
    Backend { message: String },
}

impl From<ThermoError> for IspError {
    fn from(err: ThermoError) -> Self {
        match err {
            ThermoError::NonPhysical { what } => IspError::Invariant {
                what: format!("Non-physical oracle value: {what}"),
            },
            ThermoError::InvalidArg { what } => IspError::InvalidArg {
                what: format!("Invalid oracle argument: {what}"),
            },
            ThermoError::UnknownPropellants { pair } => IspError::Config {
                what: format!("Unknown propellant combination: {pair}"),
            },
            ThermoError::Backend { message } => IspError::Invariant {
                what: format!("Oracle backend error: {message}"),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ThermoError::NonPhysical { what: "gamma" };
        assert!(err.to_string().contains("gamma"));

        let err = ThermoError::UnknownPropellants {
            pair: "LOX/Kerosene".into(),
        };
        assert!(err.to_string().contains("LOX/Kerosene"));
    }

    #[test]
    fn error_to_isp_error() {
        let err = ThermoError::UnknownPropellants { pair: "A/B".into() };
        let isp_err: IspError = err.into();
        assert!(matches!(isp_err, IspError::Config { .. }));
    }
}

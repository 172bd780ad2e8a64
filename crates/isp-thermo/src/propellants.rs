//! Oxidizer/fuel identity.

use std::fmt;

/// An oxidizer/fuel pair as named by the thermochemistry backend (e.g. "LOX", "CH4").
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Propellants {
    pub oxidizer: String,
    pub fuel: String,
}

impl Propellants {
    pub fn new(oxidizer: impl Into<String>, fuel: impl Into<String>) -> Self {
        Self {
            oxidizer: oxidizer.into(),
            fuel: fuel.into(),
        }
    }
}

impl Default for Propellants {
    fn default() -> Self {
        Self::new("N2O4", "MMH")
    }
}

impl fmt::Display for Propellants {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.oxidizer, self.fuel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_joins_names() {
        assert_eq!(Propellants::new("LOX", "CH4").to_string(), "LOX/CH4");
        assert_eq!(Propellants::default().to_string(), "N2O4/MMH");
    }
}

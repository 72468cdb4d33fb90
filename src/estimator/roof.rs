//! Roof orientation classes and how unrecognized names are handled.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{SolterraError, SolterraResult};

/// Roof orientation class, each with a fixed yield coefficient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoofType {
    Flat,
    SlopedSouth,
    SlopedOther,
}

impl RoofType {
    /// Effective kW yield per 100 sq ft of roof.
    pub fn efficiency(self) -> f64 {
        match self {
            Self::Flat => 0.15,
            Self::SlopedSouth => 0.18,
            Self::SlopedOther => 0.16,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Flat => "flat",
            Self::SlopedSouth => "sloped_south",
            Self::SlopedOther => "sloped_other",
        }
    }

    /// Parses a roof type name under the given policy.
    ///
    /// `Strict` rejects unknown names; `Permissive` maps them to
    /// [`RoofType::SlopedOther`]. An empty name is rejected either way.
    pub fn parse(name: &str, policy: RoofTypePolicy) -> SolterraResult<Self> {
        match (name.parse::<Self>(), policy) {
            (Ok(roof), _) => Ok(roof),
            (Err(_), RoofTypePolicy::Permissive) if !name.is_empty() => Ok(Self::SlopedOther),
            (Err(err), _) => Err(err),
        }
    }
}

impl FromStr for RoofType {
    type Err = SolterraError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "flat" => Ok(Self::Flat),
            "sloped_south" => Ok(Self::SlopedSouth),
            "sloped_other" => Ok(Self::SlopedOther),
            other => Err(SolterraError::invalid(
                "roof_type",
                format!("must be one of flat, sloped_south, sloped_other (got \"{other}\")"),
            )),
        }
    }
}

impl fmt::Display for RoofType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What to do with a roof type name that is not one of the three classes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoofTypePolicy {
    /// Reject with an invalid-input error.
    #[default]
    Strict,
    /// Fall back to the `sloped_other` coefficient.
    Permissive,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn efficiency_per_class() {
        assert_eq!(RoofType::Flat.efficiency(), 0.15);
        assert_eq!(RoofType::SlopedSouth.efficiency(), 0.18);
        assert_eq!(RoofType::SlopedOther.efficiency(), 0.16);
    }

    #[test]
    fn parses_known_names() {
        assert_eq!("flat".parse::<RoofType>().ok(), Some(RoofType::Flat));
        assert_eq!(
            "sloped_south".parse::<RoofType>().ok(),
            Some(RoofType::SlopedSouth)
        );
        assert_eq!(
            "sloped_other".parse::<RoofType>().ok(),
            Some(RoofType::SlopedOther)
        );
    }

    #[test]
    fn strict_policy_rejects_unknown() {
        let err = RoofType::parse("invalid", RoofTypePolicy::Strict);
        assert!(matches!(err, Err(SolterraError::InvalidInput { .. })));
    }

    #[test]
    fn permissive_policy_falls_back_to_other() {
        assert_eq!(
            RoofType::parse("sloped_east", RoofTypePolicy::Permissive).ok(),
            Some(RoofType::SlopedOther)
        );
        assert!(RoofType::parse("", RoofTypePolicy::Permissive).is_err());
    }

    #[test]
    fn names_are_case_sensitive() {
        assert!("Flat".parse::<RoofType>().is_err());
    }
}

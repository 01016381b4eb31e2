//! Access tier types

use serde::{Deserialize, Serialize};

/// Access tier granted through group membership
///
/// Tiers gate which event categories a member may book. They are granted
/// via group memberships, not stored on the member directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// Baseline tier every member group carries
    All,
    /// Open water sessions
    Open,
    /// Advanced training sessions
    Advanced,
    /// Deep/depth training sessions
    Deep,
}

impl Tier {
    /// All tiers, lowest first
    pub const ALL_TIERS: [Tier; 4] = [Tier::All, Tier::Open, Tier::Advanced, Tier::Deep];

    /// Stable string form, as stored in the database
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Open => "open",
            Self::Advanced => "advanced",
            Self::Deep => "deep",
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Tier {
    type Err = TierParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(Self::All),
            "open" => Ok(Self::Open),
            "advanced" => Ok(Self::Advanced),
            "deep" => Ok(Self::Deep),
            _ => Err(TierParseError(s.to_string())),
        }
    }
}

/// Error parsing a tier string
#[derive(Debug, Clone)]
pub struct TierParseError(pub String);

impl std::fmt::Display for TierParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid tier: {}", self.0)
    }
}

impl std::error::Error for TierParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_round_trip() {
        for tier in Tier::ALL_TIERS {
            let parsed: Tier = tier.as_str().parse().unwrap();
            assert_eq!(parsed, tier);
        }
    }

    #[test]
    fn test_tier_parse_case_insensitive() {
        assert_eq!("DEEP".parse::<Tier>().unwrap(), Tier::Deep);
        assert_eq!("Open".parse::<Tier>().unwrap(), Tier::Open);
    }

    #[test]
    fn test_tier_parse_rejects_unknown() {
        assert!("master".parse::<Tier>().is_err());
        assert!("".parse::<Tier>().is_err());
    }
}

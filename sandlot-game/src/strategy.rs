//! Team strategy profiles and the modifier table they bias probabilities with.
//!
//! Modifiers only ever scale a threshold computed elsewhere; nothing in this
//! module decides an outcome on its own.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ParseError;

/// Named bias profile a team plays with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    #[default]
    Balanced,
    Aggressive,
    Patient,
    Contact,
    Power,
}

/// Probability axis a strategy can bias.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatAxis {
    Walk,
    Strikeout,
    Homerun,
    Contact,
    Steal,
    Advance,
}

impl Strategy {
    pub const ALL: [Self; 5] = [
        Self::Balanced,
        Self::Aggressive,
        Self::Patient,
        Self::Contact,
        Self::Power,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Balanced => "balanced",
            Self::Aggressive => "aggressive",
            Self::Patient => "patient",
            Self::Contact => "contact",
            Self::Power => "power",
        }
    }

    /// Percent chance (out of 100) that a bunt attempt drops in for a single.
    #[must_use]
    pub const fn bunt_single_pct(self) -> u32 {
        match self {
            Self::Balanced | Self::Patient => 15,
            Self::Aggressive => 20,
            Self::Contact => 25,
            Self::Power => 10,
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|strategy| strategy.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseError::unknown("strategy", s))
    }
}

/// Multiplier applied to `axis` under `strategy`. `Balanced` is identity.
#[must_use]
pub const fn strat_mod(strategy: Strategy, axis: StatAxis) -> f64 {
    match (strategy, axis) {
        (Strategy::Balanced, _) => 1.0,

        (Strategy::Aggressive, StatAxis::Walk) => 0.8,
        (Strategy::Aggressive, StatAxis::Strikeout) => 1.15,
        (Strategy::Aggressive, StatAxis::Homerun) => 1.1,
        (Strategy::Aggressive, StatAxis::Contact) => 1.0,
        (Strategy::Aggressive, StatAxis::Steal) => 1.3,
        (Strategy::Aggressive, StatAxis::Advance) => 1.3,

        (Strategy::Patient, StatAxis::Walk) => 1.4,
        (Strategy::Patient, StatAxis::Strikeout) => 0.85,
        (Strategy::Patient, StatAxis::Homerun) => 0.9,
        (Strategy::Patient, StatAxis::Contact) => 1.0,
        (Strategy::Patient, StatAxis::Steal) => 0.8,
        (Strategy::Patient, StatAxis::Advance) => 0.9,

        (Strategy::Contact, StatAxis::Walk) => 1.0,
        (Strategy::Contact, StatAxis::Strikeout) => 0.7,
        (Strategy::Contact, StatAxis::Homerun) => 0.7,
        (Strategy::Contact, StatAxis::Contact) => 1.15,
        (Strategy::Contact, StatAxis::Steal) => 1.1,
        (Strategy::Contact, StatAxis::Advance) => 1.1,

        (Strategy::Power, StatAxis::Walk) => 0.9,
        (Strategy::Power, StatAxis::Strikeout) => 1.3,
        (Strategy::Power, StatAxis::Homerun) => 1.6,
        (Strategy::Power, StatAxis::Contact) => 0.85,
        (Strategy::Power, StatAxis::Steal) => 0.8,
        (Strategy::Power, StatAxis::Advance) => 1.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const AXES: [StatAxis; 6] = [
        StatAxis::Walk,
        StatAxis::Strikeout,
        StatAxis::Homerun,
        StatAxis::Contact,
        StatAxis::Steal,
        StatAxis::Advance,
    ];

    #[test]
    fn balanced_is_identity() {
        for axis in AXES {
            assert!((strat_mod(Strategy::Balanced, axis) - 1.0).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn table_biases_expected_axes() {
        assert!(strat_mod(Strategy::Patient, StatAxis::Walk) > 1.0);
        assert!(strat_mod(Strategy::Power, StatAxis::Homerun) > 1.0);
        assert!(strat_mod(Strategy::Power, StatAxis::Contact) < 1.0);
        assert!(strat_mod(Strategy::Contact, StatAxis::Strikeout) < 1.0);
        assert!(strat_mod(Strategy::Aggressive, StatAxis::Steal) > 1.2);
        for strategy in Strategy::ALL {
            for axis in AXES {
                assert!(strat_mod(strategy, axis) > 0.0);
            }
        }
    }

    #[test]
    fn names_roundtrip_case_insensitively() {
        for strategy in Strategy::ALL {
            assert_eq!(strategy.to_string().parse::<Strategy>(), Ok(strategy));
        }
        assert_eq!("POWER".parse::<Strategy>(), Ok(Strategy::Power));
        assert!(matches!(
            "small-ball".parse::<Strategy>(),
            Err(ParseError::UnknownName { kind: "strategy", .. })
        ));
    }
}

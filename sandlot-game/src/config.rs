//! Game shape and manager-mode configuration.
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{
    DEFAULT_BENCH_SIZE, DEFAULT_LATE_INNING, DEFAULT_LINEUP_SIZE, DEFAULT_REGULATION_INNINGS,
    MAX_BENCH_SIZE, MAX_LINEUP_SIZE, MAX_REGULATION_INNINGS,
};
use crate::state::Team;
use crate::strategy::Strategy;

/// Rules that shape a game. Missing fields fall back to a standard nine-inning game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    #[serde(default = "GameConfig::default_regulation_innings")]
    pub regulation_innings: u8,
    #[serde(default = "GameConfig::default_lineup_size")]
    pub lineup_size: u8,
    #[serde(default = "GameConfig::default_bench_size")]
    pub bench_size: u8,
    /// First inning in which late-game decisions (IBB, pinch hitter) are offered.
    #[serde(default = "GameConfig::default_late_inning")]
    pub late_inning: u8,
    /// Start each extra half-inning with a runner on second.
    #[serde(default = "GameConfig::default_extra_inning_runner")]
    pub extra_inning_runner: bool,
}

impl GameConfig {
    #[must_use]
    pub const fn default_regulation_innings() -> u8 {
        DEFAULT_REGULATION_INNINGS
    }

    #[must_use]
    pub const fn default_lineup_size() -> u8 {
        DEFAULT_LINEUP_SIZE
    }

    #[must_use]
    pub const fn default_bench_size() -> u8 {
        DEFAULT_BENCH_SIZE
    }

    #[must_use]
    pub const fn default_late_inning() -> u8 {
        DEFAULT_LATE_INNING
    }

    const fn default_extra_inning_runner() -> bool {
        true
    }

    /// Parse a JSON config document and validate it.
    ///
    /// # Errors
    ///
    /// Returns `GameConfigError::Parse` for malformed JSON and the range
    /// errors of [`GameConfig::validate`] otherwise.
    pub fn from_json(text: &str) -> Result<Self, GameConfigError> {
        let cfg: Self =
            serde_json::from_str(text).map_err(|err| GameConfigError::Parse(err.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Validate the configuration against documented bounds.
    ///
    /// # Errors
    ///
    /// Returns `GameConfigError` when any field is out of range.
    pub fn validate(&self) -> Result<(), GameConfigError> {
        check_range("regulation_innings", self.regulation_innings, 1, MAX_REGULATION_INNINGS)?;
        check_range("lineup_size", self.lineup_size, 1, MAX_LINEUP_SIZE)?;
        check_range("bench_size", self.bench_size, 0, MAX_BENCH_SIZE)?;
        if self.late_inning == 0 || self.late_inning > self.regulation_innings {
            return Err(GameConfigError::LateInning {
                late: self.late_inning,
                regulation: self.regulation_innings,
            });
        }
        Ok(())
    }

    /// Clamp every field into its valid range.
    pub fn sanitize(&mut self) {
        self.regulation_innings = self.regulation_innings.clamp(1, MAX_REGULATION_INNINGS);
        self.lineup_size = self.lineup_size.clamp(1, MAX_LINEUP_SIZE);
        self.bench_size = self.bench_size.min(MAX_BENCH_SIZE);
        self.late_inning = self.late_inning.clamp(1, self.regulation_innings);
    }

    /// Sanitized copy, used wherever external settings enter the engine.
    #[must_use]
    pub fn sanitized(mut self) -> Self {
        self.sanitize();
        self
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            regulation_innings: Self::default_regulation_innings(),
            lineup_size: Self::default_lineup_size(),
            bench_size: Self::default_bench_size(),
            late_inning: Self::default_late_inning(),
            extra_inning_runner: Self::default_extra_inning_runner(),
        }
    }
}

fn check_range(field: &'static str, value: u8, min: u8, max: u8) -> Result<(), GameConfigError> {
    if value < min || value > max {
        return Err(GameConfigError::RangeViolation {
            field,
            min,
            max,
            value,
        });
    }
    Ok(())
}

/// Errors raised when game configuration invariants are violated.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GameConfigError {
    #[error("{field} must be between {min} and {max} (got {value})")]
    RangeViolation {
        field: &'static str,
        min: u8,
        max: u8,
        value: u8,
    },
    #[error("late_inning {late} must fall within regulation (1..={regulation})")]
    LateInning { late: u8, regulation: u8 },
    #[error("config is not valid JSON: {0}")]
    Parse(String),
}

/// Who the external manager controls and how that team plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagerSettings {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "ManagerSettings::default_team")]
    pub team: Team,
    #[serde(default)]
    pub strategy: Strategy,
}

impl ManagerSettings {
    const fn default_team() -> Team {
        Team::Home
    }

    /// Manager mode switched off; every pitch is automatic.
    #[must_use]
    pub const fn disabled() -> Self {
        Self {
            enabled: false,
            team: Team::Home,
            strategy: Strategy::Balanced,
        }
    }

    #[must_use]
    pub const fn managing(team: Team, strategy: Strategy) -> Self {
        Self {
            enabled: true,
            team,
            strategy,
        }
    }
}

impl Default for ManagerSettings {
    fn default() -> Self {
        Self::disabled()
    }
}

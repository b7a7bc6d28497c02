//! Centralized balance and tuning constants for the Sandlot engine.
//!
//! Probabilities are expressed as integer thresholds against a draw in
//! `[0, 1000)` (per-mille) or `[0, 100)` (percent). Keeping them together means
//! the game can only be rebalanced through reviewed code changes, and replays
//! recorded against one table stay tied to that table.

// Swing decision -----------------------------------------------------------
pub(crate) const SWING_BASE_PER_MILLE: f64 = 500.0;
pub(crate) const SWING_STRIKE_PENALTY: f64 = 75.0;
pub(crate) const PROTECT_SWING_FACTOR: f64 = 0.7;
/// Draws at or above this per-mille value are always put in play.
pub(crate) const IN_PLAY_THRESHOLD: u32 = 920;
pub(crate) const FOUL_CHANCE: f64 = 0.30;

// Take outcome -------------------------------------------------------------
pub(crate) const TAKE_BALL_BASE: f64 = 750.0;
pub(crate) const TAKE_BALL_CAP: u32 = 950;
pub(crate) const CALLED_STRIKE_BASE: f64 = 500.0;

// Ball in play -------------------------------------------------------------
pub(crate) const HOME_RUN_BASE_PER_MILLE: f64 = 80.0;
pub(crate) const TRIPLE_PER_MILLE: u32 = 25;
pub(crate) const DOUBLE_PER_MILLE: u32 = 160;
pub(crate) const CONTACT_BASE_PER_MILLE: f64 = 750.0;
pub(crate) const SHIFT_CONTACT_FACTOR: f64 = 0.85;
pub(crate) const PINCH_HIT_CONTACT_FACTOR: f64 = 1.1;
pub(crate) const POWER_POP_HOMER_CHANCE: f64 = 0.15;

// Manager decisions --------------------------------------------------------
pub(crate) const STEAL_BASE_PCT_FROM_FIRST: f64 = 70.0;
pub(crate) const STEAL_BASE_PCT_FROM_SECOND: f64 = 60.0;
pub(crate) const STEAL_OFFER_MIN_PCT: u32 = 72;
pub(crate) const IBB_MAX_MARGIN: u32 = 2;
pub(crate) const SACRIFICE_CEILING_PCT: u32 = 80;

// Game shape ---------------------------------------------------------------
pub(crate) const DEFAULT_REGULATION_INNINGS: u8 = 9;
pub(crate) const DEFAULT_LINEUP_SIZE: u8 = 9;
pub(crate) const DEFAULT_BENCH_SIZE: u8 = 2;
pub(crate) const DEFAULT_LATE_INNING: u8 = 7;
pub(crate) const MAX_LINEUP_SIZE: u8 = 15;
pub(crate) const MAX_REGULATION_INNINGS: u8 = 15;
pub(crate) const MAX_BENCH_SIZE: u8 = 9;

pub const DEFAULT_TEAMS: [&str; 2] = ["Visitors", "Home"];

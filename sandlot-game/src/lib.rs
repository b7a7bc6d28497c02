//! Sandlot Game Engine
//!
//! Deterministic pitch-by-pitch baseball simulation. A game is a seed plus a
//! sequence of actions; replaying both on any machine yields the same game.
//! This crate holds the rules only: no rendering, audio, or storage.

pub mod advance;
pub mod config;
pub mod constants;
pub mod decision;
pub mod error;
pub mod lifecycle;
pub mod narrator;
pub mod numbers;
pub mod pitch;
pub mod reducer;
pub mod replay;
pub mod rng;
pub mod seed;
pub mod session;
pub mod state;
pub mod strategy;

// Re-export commonly used types
pub use advance::{Advancement, advance_runners, sacrifice_advance};
pub use config::{GameConfig, GameConfigError, ManagerSettings};
pub use decision::{Decision, detect_decision, steal_opportunity};
pub use error::ParseError;
pub use lifecycle::{check_game_over, check_walkoff, end_half_inning, player_out};
pub use narrator::{LogNarrator, Narrator, NullNarrator, VecNarrator};
pub use pitch::{
    PitchType, PlannedPitch, WaitOutcome, compute_wait_outcome, hit_category, plan_pitch,
    select_pitch_type, swing_threshold,
};
pub use reducer::{GameAction, ReduceCtx, reduce};
pub use replay::{
    DecisionChoice, ReplayDecision, ReplayQueue, build_replay_url, decisions_from_url,
    seed_from_url,
};
pub use rng::PitchRng;
pub use seed::{encode_seed, fresh_seed, parse_seed, resolve_seed};
pub use session::{GameSession, LineScore, SessionError, StepOutcome};
pub use state::{
    Base, BaseLayout, GameState, Half, HitKind, OnePitchModifier, PlayEvent, PlayLogEntry, Team,
};
pub use strategy::{StatAxis, Strategy, strat_mod};

//! Manager decision detection.
//!
//! Detection is read-only: it inspects a snapshot and proposes at most one
//! tactical pause. Resolution lives in the reducer.
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::{GameConfig, ManagerSettings};
use crate::constants::{
    IBB_MAX_MARGIN, STEAL_BASE_PCT_FROM_FIRST, STEAL_BASE_PCT_FROM_SECOND, STEAL_OFFER_MIN_PCT,
};
use crate::numbers::round_f64_to_u32;
use crate::state::{Base, GameState};
use crate::strategy::{StatAxis, Strategy, strat_mod};

/// A tactical pause offered to the manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Decision {
    Steal {
        base: Base,
        success_pct: u32,
    },
    Bunt,
    #[serde(rename = "count30")]
    Count30,
    #[serde(rename = "count02")]
    Count02,
    #[serde(rename = "ibb")]
    IntentionalWalk,
    #[serde(rename = "ibb_or_steal")]
    IntentionalWalkOrSteal {
        base: Base,
        success_pct: u32,
    },
    PinchHitter,
    DefensiveShift,
}

impl Decision {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Steal { .. } => "steal",
            Self::Bunt => "bunt",
            Self::Count30 => "count30",
            Self::Count02 => "count02",
            Self::IntentionalWalk => "ibb",
            Self::IntentionalWalkOrSteal { .. } => "ibb_or_steal",
            Self::PinchHitter => "pinch_hitter",
            Self::DefensiveShift => "defensive_shift",
        }
    }

    /// Steal target and success chance, for decisions that offer one.
    #[must_use]
    pub const fn steal_offer(self) -> Option<(Base, u32)> {
        match self {
            Self::Steal { base, success_pct }
            | Self::IntentionalWalkOrSteal { base, success_pct } => {
                Some((base, success_pct))
            }
            _ => None,
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Steal { base, success_pct } => {
                write!(f, "steal {} ({success_pct}% success)", base.label())
            }
            Self::Bunt => f.write_str("sacrifice bunt"),
            Self::Count30 => f.write_str("3-0 count"),
            Self::Count02 => f.write_str("0-2 count"),
            Self::IntentionalWalk => f.write_str("intentional walk"),
            Self::IntentionalWalkOrSteal { base, success_pct } => write!(
                f,
                "intentional walk or steal {} ({success_pct}% success)",
                base.label()
            ),
            Self::PinchHitter => f.write_str("pinch hitter"),
            Self::DefensiveShift => f.write_str("defensive shift"),
        }
    }
}

/// Propose the pause, if any, the manager should face before the next pitch.
#[must_use]
pub fn detect_decision(
    state: &GameState,
    manager: &ManagerSettings,
    config: &GameConfig,
) -> Option<Decision> {
    if !manager.enabled
        || state.game_over
        || state.pending_decision.is_some()
        || state.decision_checked_at == Some(state.pitch_key)
    {
        return None;
    }
    if state.batting_team() == manager.team {
        detect_offense(state, manager.strategy, config)
    } else {
        detect_defense(state)
    }
}

fn detect_offense(state: &GameState, strategy: Strategy, config: &GameConfig) -> Option<Decision> {
    let late = state.inning >= config.late_inning;
    let scoring_position = state.runner_in_scoring_position();

    let walk_window = !state.occupied(Base::First)
        && scoring_position
        && state.outs == 2
        && late
        && state.margin() <= IBB_MAX_MARGIN;
    if walk_window {
        return Some(match steal_opportunity(state, strategy) {
            Some((base, success_pct)) => Decision::IntentionalWalkOrSteal { base, success_pct },
            None => Decision::IntentionalWalk,
        });
    }

    if state.outs < 2 {
        if let Some((base, success_pct)) = steal_opportunity(state, strategy) {
            return Some(Decision::Steal { base, success_pct });
        }
        if state.occupied(Base::First) || state.occupied(Base::Second) {
            return Some(Decision::Bunt);
        }
    }

    let fresh_count = state.balls == 0 && state.strikes == 0;
    let bench_left = state.pinch_hitters_used[state.batting_team().index()] < config.bench_size;
    if fresh_count && late && scoring_position && bench_left && !state.pinch_hitter {
        return Some(Decision::PinchHitter);
    }

    match (state.balls, state.strikes) {
        (3, 0) => Some(Decision::Count30),
        (0, 2) => Some(Decision::Count02),
        _ => None,
    }
}

fn detect_defense(state: &GameState) -> Option<Decision> {
    let heart_of_order = matches!(state.current_batter_slot(), 2 | 3);
    let shift_spot = state.balls == 0
        && state.strikes == 0
        && state.runners_on() == 0
        && heart_of_order
        && !state.defensive_shift;
    shift_spot.then_some(Decision::DefensiveShift)
}

/// First steal worth offering: a runner with an open base ahead and a success
/// chance above the offer floor. Outs are not considered here.
#[must_use]
pub fn steal_opportunity(state: &GameState, strategy: Strategy) -> Option<(Base, u32)> {
    let steal = strat_mod(strategy, StatAxis::Steal);
    [
        (Base::First, Base::Second, STEAL_BASE_PCT_FROM_FIRST),
        (Base::Second, Base::Third, STEAL_BASE_PCT_FROM_SECOND),
    ]
    .into_iter()
    .filter(|(from, target, _)| state.occupied(*from) && !state.occupied(*target))
    .map(|(_, target, base_pct)| (target, round_f64_to_u32(base_pct * steal)))
    .find(|(_, pct)| *pct > STEAL_OFFER_MIN_PCT)
}

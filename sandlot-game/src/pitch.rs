//! Pitch outcome resolver.
//!
//! Draw order per pitch is fixed: pitch type (percent), swing draw
//! (per-mille), then either a foul roll (swings) or a hit-category draw (balls
//! in play). Takes are resolved by the reducer with one further draw.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::{
    CALLED_STRIKE_BASE, DOUBLE_PER_MILLE, FOUL_CHANCE, HOME_RUN_BASE_PER_MILLE, IN_PLAY_THRESHOLD,
    PROTECT_SWING_FACTOR, SWING_BASE_PER_MILLE, SWING_STRIKE_PENALTY, TAKE_BALL_BASE,
    TAKE_BALL_CAP, TRIPLE_PER_MILLE,
};
use crate::error::ParseError;
use crate::numbers::round_f64_to_u32;
use crate::reducer::GameAction;
use crate::rng::PitchRng;
use crate::state::{GameState, HitKind, OnePitchModifier};
use crate::strategy::{StatAxis, Strategy, strat_mod};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PitchType {
    Fastball,
    Curveball,
    Slider,
    Changeup,
}

impl PitchType {
    pub const ALL: [Self; 4] = [Self::Fastball, Self::Curveball, Self::Slider, Self::Changeup];

    /// Multiplier on the batter's swing probability.
    #[must_use]
    pub const fn swing_rate(self) -> f64 {
        match self {
            Self::Fastball => 1.0,
            Self::Curveball => 0.85,
            Self::Slider => 1.1,
            Self::Changeup => 1.05,
        }
    }

    /// Multiplier on the chance a taken pitch is in the zone.
    #[must_use]
    pub const fn zone_mod(self) -> f64 {
        match self {
            Self::Fastball => 1.1,
            Self::Curveball => 0.85,
            Self::Slider => 0.9,
            Self::Changeup => 0.95,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fastball => "fastball",
            Self::Curveball => "curveball",
            Self::Slider => "slider",
            Self::Changeup => "changeup",
        }
    }
}

impl fmt::Display for PitchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PitchType {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|pitch| pitch.as_str() == s.trim())
            .ok_or_else(|| ParseError::unknown("pitch type", s))
    }
}

/// Choose a pitch from the count and a roll in `[0, 100)`.
#[must_use]
pub const fn select_pitch_type(balls: u8, strikes: u8, roll: u32) -> PitchType {
    const CHANGEUP_SECOND: [PitchType; 4] = [
        PitchType::Fastball,
        PitchType::Changeup,
        PitchType::Slider,
        PitchType::Curveball,
    ];
    const SLIDER_SECOND: [PitchType; 4] = [
        PitchType::Fastball,
        PitchType::Slider,
        PitchType::Curveball,
        PitchType::Changeup,
    ];
    // cumulative cut points, then the pitch order they select
    let (first, second, third, order) = match (balls, strikes) {
        (3, 0) => (80, 90, 95, CHANGEUP_SECOND),
        (0 | 1, 2) => (25, 55, 85, SLIDER_SECOND),
        (b, s) if b > s => (60, 80, 90, CHANGEUP_SECOND),
        _ => (45, 65, 80, SLIDER_SECOND),
    };
    if roll < first {
        order[0]
    } else if roll < second {
        order[1]
    } else if roll < third {
        order[2]
    } else {
        order[3]
    }
}

/// How a swing draw resolves before any follow-up roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwingDecision {
    Swing,
    Take,
    InPlay,
}

/// Per-mille swing threshold for the current count.
#[must_use]
pub fn swing_threshold(
    strikes: u8,
    strategy: Strategy,
    modifier: Option<OnePitchModifier>,
    pitch: PitchType,
) -> u32 {
    if modifier == Some(OnePitchModifier::Swing) {
        return IN_PLAY_THRESHOLD;
    }
    let protect = if modifier == Some(OnePitchModifier::Protect) {
        PROTECT_SWING_FACTOR
    } else {
        1.0
    };
    let base = SWING_STRIKE_PENALTY.mul_add(-f64::from(strikes), SWING_BASE_PER_MILLE);
    let scaled = base * strat_mod(strategy, StatAxis::Contact) * protect * pitch.swing_rate();
    round_f64_to_u32(scaled).min(IN_PLAY_THRESHOLD)
}

/// Classify a per-mille draw against the swing threshold.
#[must_use]
pub const fn classify_draw(draw: u32, threshold: u32) -> SwingDecision {
    if draw >= IN_PLAY_THRESHOLD {
        SwingDecision::InPlay
    } else if draw < threshold {
        SwingDecision::Swing
    } else {
        SwingDecision::Take
    }
}

/// Result of a pitch the batter did not swing at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    Ball,
    CalledStrike,
}

/// Resolve a taken pitch against a per-mille draw.
///
/// Under `take` the ball probability is capped at 950. The strike
/// probability of the normal branch is left unclamped; values above 1000 make
/// every draw a called strike.
#[must_use]
pub fn compute_wait_outcome(
    strategy: Strategy,
    pitch: Option<PitchType>,
    modifier: Option<OnePitchModifier>,
    draw: u32,
) -> WaitOutcome {
    let zone = pitch.map_or(1.0, PitchType::zone_mod);
    let walk = strat_mod(strategy, StatAxis::Walk);
    if modifier == Some(OnePitchModifier::Take) {
        let ball_prob = round_f64_to_u32(TAKE_BALL_BASE * walk / zone).min(TAKE_BALL_CAP);
        if draw < ball_prob {
            WaitOutcome::Ball
        } else {
            WaitOutcome::CalledStrike
        }
    } else {
        let strike_prob = round_f64_to_u32(CALLED_STRIKE_BASE * zone / walk);
        if draw < strike_prob {
            WaitOutcome::CalledStrike
        } else {
            WaitOutcome::Ball
        }
    }
}

/// Map a per-mille draw on a ball in play to a hit category.
#[must_use]
pub fn hit_category(strategy: Strategy, draw: u32) -> HitKind {
    let home_run =
        round_f64_to_u32(HOME_RUN_BASE_PER_MILLE * strat_mod(strategy, StatAxis::Homerun));
    let triple = home_run + TRIPLE_PER_MILLE;
    let double = triple
        + round_f64_to_u32(f64::from(DOUBLE_PER_MILLE) * strat_mod(strategy, StatAxis::Advance));
    if draw < home_run {
        HitKind::HomeRun
    } else if draw < triple {
        HitKind::Triple
    } else if draw < double {
        HitKind::Double
    } else {
        HitKind::Single
    }
}

/// The action a pitch resolves to, along with the pitch thrown.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedPitch {
    pub pitch_type: PitchType,
    pub action: GameAction,
}

/// Throw one pitch: draw the pitch type, the swing decision and any
/// follow-up roll, yielding the action to dispatch.
pub fn plan_pitch(state: &GameState, strategy: Strategy, rng: &mut PitchRng) -> PlannedPitch {
    let pitch_type = select_pitch_type(state.balls, state.strikes, rng.roll(100));
    let draw = rng.roll(1000);
    let threshold = swing_threshold(state.strikes, strategy, state.one_pitch_modifier, pitch_type);
    let decision = classify_draw(draw, threshold);
    log::trace!(
        "pitch {} {pitch_type} draw {draw} threshold {threshold} -> {decision:?}",
        state.pitch_key
    );
    let action = match decision {
        SwingDecision::Swing => {
            if rng.chance(FOUL_CHANCE) {
                GameAction::Foul {
                    pitch_type: Some(pitch_type),
                }
            } else {
                GameAction::Strike {
                    swung: true,
                    pitch_type: Some(pitch_type),
                }
            }
        }
        SwingDecision::Take => GameAction::Wait {
            strategy,
            pitch_type: Some(pitch_type),
        },
        SwingDecision::InPlay => GameAction::Hit {
            kind: hit_category(strategy, rng.roll(1000)),
            strategy,
        },
    };
    PlannedPitch { pitch_type, action }
}

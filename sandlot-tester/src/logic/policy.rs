use std::fmt;

use clap::ValueEnum;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use sandlot_game::{
    Decision, DecisionChoice, GameState, ManagerSettings, OnePitchModifier, Strategy, Team,
};

/// Policy interface for answering manager pauses in automated runs.
pub trait ManagerPolicy {
    /// Name used for logging/debug output.
    fn name(&self) -> &'static str;

    /// Answer the pause `decision` raised against `state`.
    fn choose(&mut self, state: &GameState, decision: Decision) -> DecisionChoice;
}

/// Built-in manager personalities selectable from the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, ValueEnum)]
pub enum ManagerStyle {
    /// Manager mode on, every pause declined
    Skip,
    /// Take every offer the game makes
    Aggressive,
    /// Only take high-percentage plays
    Cautious,
    /// Pick uniformly among the legal answers
    Random,
}

impl ManagerStyle {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Skip => "skip",
            Self::Aggressive => "aggressive",
            Self::Cautious => "cautious",
            Self::Random => "random",
        }
    }

    /// Strategy the managed team plays with under this style.
    #[must_use]
    pub const fn strategy(self) -> Strategy {
        match self {
            Self::Skip | Self::Random => Strategy::Balanced,
            Self::Aggressive => Strategy::Aggressive,
            Self::Cautious => Strategy::Patient,
        }
    }

    #[must_use]
    pub const fn settings(self, team: Team) -> ManagerSettings {
        ManagerSettings::managing(team, self.strategy())
    }

    #[must_use]
    pub fn create_policy(self, seed: u64) -> Box<dyn ManagerPolicy + Send> {
        match self {
            Self::Skip => Box::new(SkipPolicy),
            Self::Aggressive => Box::new(AggressivePolicy),
            Self::Cautious => Box::new(CautiousPolicy),
            Self::Random => Box::new(RandomPolicy::new(seed)),
        }
    }
}

impl fmt::Display for ManagerStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

struct SkipPolicy;
struct AggressivePolicy;
struct CautiousPolicy;

struct RandomPolicy {
    rng: ChaCha20Rng,
}

impl RandomPolicy {
    fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }
}

/// Steals below this success chance are passed up by the cautious manager.
const CAUTIOUS_STEAL_PCT: u32 = 75;

impl ManagerPolicy for SkipPolicy {
    fn name(&self) -> &'static str {
        "Skip"
    }

    fn choose(&mut self, _state: &GameState, _decision: Decision) -> DecisionChoice {
        DecisionChoice::Skip
    }
}

impl ManagerPolicy for AggressivePolicy {
    fn name(&self) -> &'static str {
        "Aggressive"
    }

    fn choose(&mut self, _state: &GameState, decision: Decision) -> DecisionChoice {
        match decision {
            Decision::Steal { base, success_pct }
            | Decision::IntentionalWalkOrSteal { base, success_pct } => {
                DecisionChoice::Steal { base, success_pct }
            }
            Decision::Bunt => DecisionChoice::Bunt,
            Decision::Count30 | Decision::Count02 => DecisionChoice::Modifier {
                modifier: OnePitchModifier::Swing,
            },
            Decision::IntentionalWalk => DecisionChoice::IntentionalWalk,
            Decision::PinchHitter => DecisionChoice::PinchHit,
            Decision::DefensiveShift => DecisionChoice::Shift { active: true },
        }
    }
}

impl ManagerPolicy for CautiousPolicy {
    fn name(&self) -> &'static str {
        "Cautious"
    }

    fn choose(&mut self, state: &GameState, decision: Decision) -> DecisionChoice {
        match decision {
            Decision::Steal { base, success_pct } if success_pct >= CAUTIOUS_STEAL_PCT => {
                DecisionChoice::Steal { base, success_pct }
            }
            Decision::Bunt if state.outs == 0 => DecisionChoice::Bunt,
            Decision::Count30 => DecisionChoice::Modifier {
                modifier: OnePitchModifier::Take,
            },
            Decision::Count02 => DecisionChoice::Modifier {
                modifier: OnePitchModifier::Protect,
            },
            Decision::IntentionalWalk | Decision::IntentionalWalkOrSteal { .. } => {
                DecisionChoice::IntentionalWalk
            }
            Decision::PinchHitter if state.runner_in_scoring_position() => {
                DecisionChoice::PinchHit
            }
            _ => DecisionChoice::Skip,
        }
    }
}

impl ManagerPolicy for RandomPolicy {
    fn name(&self) -> &'static str {
        "Random"
    }

    fn choose(&mut self, _state: &GameState, decision: Decision) -> DecisionChoice {
        let options = legal_answers(decision);
        let idx = self.rng.gen_range(0..options.len());
        options[idx]
    }
}

/// Every answer the game accepts for `decision`, declining included.
#[must_use]
pub fn legal_answers(decision: Decision) -> Vec<DecisionChoice> {
    let mut options = vec![DecisionChoice::Skip];
    match decision {
        Decision::Steal { base, success_pct } => {
            options.push(DecisionChoice::Steal { base, success_pct });
        }
        Decision::Bunt => options.push(DecisionChoice::Bunt),
        Decision::Count30 | Decision::Count02 => {
            options.extend(
                OnePitchModifier::ALL
                    .into_iter()
                    .map(|modifier| DecisionChoice::Modifier { modifier }),
            );
        }
        Decision::IntentionalWalk => options.push(DecisionChoice::IntentionalWalk),
        Decision::IntentionalWalkOrSteal { base, success_pct } => {
            options.push(DecisionChoice::IntentionalWalk);
            options.push(DecisionChoice::Steal { base, success_pct });
        }
        Decision::PinchHitter => options.push(DecisionChoice::PinchHit),
        Decision::DefensiveShift => options.push(DecisionChoice::Shift { active: true }),
    }
    options
}

//! Driver that binds a game to its seed, RNG, settings and narrator.
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::config::{GameConfig, ManagerSettings};
use crate::decision::{Decision, detect_decision};
use crate::narrator::Narrator;
use crate::pitch::{PitchType, plan_pitch};
use crate::reducer::{GameAction, ReduceCtx, reduce};
use crate::replay::{DecisionChoice, ReplayDecision, ReplayQueue, build_replay_url, seed_from_url};
use crate::rng::PitchRng;
use crate::seed::fresh_seed;
use crate::state::{GameState, Half, Team};
use crate::strategy::Strategy;

/// What a single [`GameSession::step`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// A pitch was thrown and resolved.
    Pitched(PitchType),
    /// A new pause was raised and now waits for an answer.
    DecisionRaised(Decision),
    /// A pause is still waiting; nothing happened.
    AwaitingDecision(Decision),
    /// A replayed answer was applied to the pending pause.
    Resolved(DecisionChoice),
    GameOver,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("game still running after {steps} steps")]
    StepLimit { steps: usize },
}

/// Runs by inning plus totals for both teams.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineScore {
    pub teams: [String; 2],
    pub innings: [Vec<u32>; 2],
    pub runs: [u32; 2],
    pub hits: [u32; 2],
}

impl LineScore {
    #[must_use]
    pub fn from_state(state: &GameState) -> Self {
        let mut hits = [0u32; 2];
        for entry in state.play_log.iter().filter(|entry| entry.event.is_hit()) {
            hits[entry.team.index()] += 1;
        }
        // a game decided after a bottom half has already rolled the inning over
        let played = if state.game_over && state.at_bat == Half::Top {
            usize::from(state.inning.saturating_sub(1))
        } else {
            usize::from(state.inning)
        };
        let innings = [Team::Visitors, Team::Home].map(|team| {
            let mut runs = state.line_score(team);
            runs.truncate(played);
            runs
        });
        Self {
            teams: state.teams.clone(),
            innings,
            runs: state.score,
            hits,
        }
    }
}

impl fmt::Display for LineScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self.teams.iter().map(String::len).max().unwrap_or(0);
        for (idx, team) in self.teams.iter().enumerate() {
            write!(f, "{team:<width$} |")?;
            for runs in &self.innings[idx] {
                write!(f, " {runs:>2}")?;
            }
            writeln!(f, " | R {:>2}  H {:>2}", self.runs[idx], self.hits[idx])?;
        }
        Ok(())
    }
}

/// A game in progress together with everything needed to keep playing it.
pub struct GameSession<N = Box<dyn Narrator>> {
    state: GameState,
    rng: PitchRng,
    config: GameConfig,
    manager: ManagerSettings,
    strategies: [Strategy; 2],
    narrator: N,
    decisions: Vec<ReplayDecision>,
    replay: Option<ReplayQueue>,
}

impl<N: Narrator> GameSession<N> {
    /// Start a fresh game. The configuration is sanitized on the way in.
    #[must_use]
    pub fn new(
        seed: u32,
        teams: [String; 2],
        config: GameConfig,
        manager: ManagerSettings,
        narrator: N,
    ) -> Self {
        let mut strategies = [Strategy::Balanced; 2];
        if manager.enabled {
            strategies[manager.team.index()] = manager.strategy;
        }
        Self {
            state: GameState::new(teams),
            rng: PitchRng::from_user_seed(seed),
            config: config.sanitized(),
            manager,
            strategies,
            narrator,
            decisions: Vec::new(),
            replay: None,
        }
    }

    /// Rebuild a game from a replay link. A missing or malformed seed falls
    /// back to a fresh one; every pause is answered from the link's log.
    #[must_use]
    pub fn from_replay_url(
        url: &str,
        teams: [String; 2],
        config: GameConfig,
        manager: ManagerSettings,
        narrator: N,
    ) -> Self {
        let seed = seed_from_url(url).unwrap_or_else(|| {
            log::warn!("replay link carries no usable seed; generating one");
            fresh_seed()
        });
        let mut session = Self::new(seed, teams, config, manager, narrator);
        session.replay = Some(ReplayQueue::from_url(url));
        session
    }

    /// Override the strategy a team plays with.
    #[must_use]
    pub fn with_strategy(mut self, team: Team, strategy: Strategy) -> Self {
        self.strategies[team.index()] = strategy;
        self
    }

    /// Apply one action. Answers to a pending pause are added to the
    /// decision log under the pitch key they were given at.
    pub fn dispatch(&mut self, action: &GameAction) -> &GameState {
        if self.state.pending_decision.is_some()
            && let Some(choice) = DecisionChoice::from_action(action)
        {
            self.decisions
                .push(ReplayDecision::new(self.state.pitch_key, choice));
        }
        let mut ctx = ReduceCtx {
            rng: &mut self.rng,
            narrator: &mut self.narrator,
            config: &self.config,
        };
        self.state = reduce(&self.state, action, &mut ctx);
        &self.state
    }

    /// Answer the pending pause with `choice`.
    pub fn answer(&mut self, choice: DecisionChoice) -> &GameState {
        let action = choice.to_action(self.batting_strategy());
        self.dispatch(&action)
    }

    /// Advance the game by one unit of work: raise a pause, answer one from
    /// the replay log, or throw a pitch.
    pub fn step(&mut self) -> StepOutcome {
        if self.state.game_over {
            return StepOutcome::GameOver;
        }
        if let Some(pending) = self.state.pending_decision {
            let pitch_key = self.state.pitch_key;
            let Some(queue) = self.replay.as_mut() else {
                return StepOutcome::AwaitingDecision(pending);
            };
            let choice = queue
                .take_for(pitch_key)
                .map_or(DecisionChoice::Skip, |entry| entry.choice);
            log::debug!("replaying {choice:?} for {pending} at pitch {pitch_key}");
            self.answer(choice);
            return StepOutcome::Resolved(choice);
        }
        if let Some(decision) = detect_decision(&self.state, &self.manager, &self.config) {
            self.dispatch(&GameAction::SetPendingDecision { decision });
            return StepOutcome::DecisionRaised(decision);
        }
        let planned = plan_pitch(&self.state, self.batting_strategy(), &mut self.rng);
        self.dispatch(&planned.action);
        StepOutcome::Pitched(planned.pitch_type)
    }

    /// Play until the game ends. Pauses are answered from the replay log
    /// when there is one and skipped otherwise.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::StepLimit` if the game is still going after
    /// `max_steps` steps.
    pub fn autoplay(&mut self, max_steps: usize) -> Result<&GameState, SessionError> {
        for _ in 0..max_steps {
            match self.step() {
                StepOutcome::GameOver => return Ok(&self.state),
                StepOutcome::DecisionRaised(_) | StepOutcome::AwaitingDecision(_) => {
                    if self.replay.is_none() {
                        self.answer(DecisionChoice::Skip);
                    }
                }
                StepOutcome::Pitched(_) | StepOutcome::Resolved(_) => {}
            }
        }
        if self.state.game_over {
            Ok(&self.state)
        } else {
            Err(SessionError::StepLimit { steps: max_steps })
        }
    }

    /// Replay the same seed from the first pitch, keeping team names.
    pub fn restart(&mut self) {
        self.rng = PitchRng::from_user_seed(self.rng.seed());
        self.decisions.clear();
        self.dispatch(&GameAction::Reset);
    }

    #[must_use]
    pub fn batting_strategy(&self) -> Strategy {
        self.strategies[self.state.batting_team().index()]
    }

    #[must_use]
    pub const fn state(&self) -> &GameState {
        &self.state
    }

    #[must_use]
    pub const fn seed(&self) -> u32 {
        self.rng.seed()
    }

    #[must_use]
    pub const fn rng_draws(&self) -> u64 {
        self.rng.draws()
    }

    #[must_use]
    pub const fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub const fn manager(&self) -> &ManagerSettings {
        &self.manager
    }

    /// Answers recorded so far, in the order they were given.
    #[must_use]
    pub fn decisions(&self) -> &[ReplayDecision] {
        &self.decisions
    }

    #[must_use]
    pub const fn narrator(&self) -> &N {
        &self.narrator
    }

    pub const fn narrator_mut(&mut self) -> &mut N {
        &mut self.narrator
    }

    /// Link that reproduces this game from the first pitch.
    #[must_use]
    pub fn replay_url(&self) -> String {
        build_replay_url(self.seed(), &self.decisions)
    }

    #[must_use]
    pub fn line_score(&self) -> LineScore {
        LineScore::from_state(&self.state)
    }

    /// Consume the session, returning the final state.
    #[must_use]
    pub fn into_state(self) -> GameState {
        self.state
    }
}

impl<N> fmt::Debug for GameSession<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameSession")
            .field("seed", &self.rng.seed())
            .field("pitch_key", &self.state.pitch_key)
            .field("decisions", &self.decisions.len())
            .finish_non_exhaustive()
    }
}

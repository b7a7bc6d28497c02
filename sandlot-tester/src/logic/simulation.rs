use std::hash::Hasher;

use anyhow::{Context, Result, bail};
use sandlot_game::{
    Base, Decision, GameConfig, GameSession, GameState, Half, LineScore, ManagerSettings,
    ReplayDecision, StepOutcome, Team, VecNarrator, encode_seed,
};
use twox_hash::XxHash64;

use crate::logic::policy::{ManagerPolicy, ManagerStyle};

/// Steps a single game may take before the run is declared stuck.
pub const DEFAULT_MAX_STEPS: usize = 50_000;

const TEAMS: [&str; 2] = ["Visitors", "Home"];

fn team_names() -> [String; 2] {
    TEAMS.map(str::to_string)
}

/// Configuration for a simulated game.
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    pub seed: u32,
    pub style: ManagerStyle,
    pub managed_team: Team,
    pub game: GameConfig,
    pub max_steps: usize,
    /// Replay this link instead of letting the policy answer pauses.
    pub replay_url: Option<String>,
}

impl SimulationConfig {
    #[must_use]
    pub fn new(seed: u32, style: ManagerStyle) -> Self {
        Self {
            seed,
            style,
            managed_team: Team::Home,
            game: GameConfig::default(),
            max_steps: DEFAULT_MAX_STEPS,
            replay_url: None,
        }
    }

    #[must_use]
    pub fn with_game_config(mut self, game: GameConfig) -> Self {
        self.game = game;
        self
    }

    #[must_use]
    pub const fn with_managed_team(mut self, team: Team) -> Self {
        self.managed_team = team;
        self
    }

    #[must_use]
    pub fn with_replay_url(mut self, url: Option<String>) -> Self {
        self.replay_url = url;
        self
    }

    #[must_use]
    pub const fn manager(&self) -> ManagerSettings {
        self.style.settings(self.managed_team)
    }
}

/// Complete record of a simulated game.
#[derive(Debug, Clone)]
pub struct GameSummary {
    pub seed: u32,
    pub seed_code: String,
    pub style: ManagerStyle,
    pub manager: ManagerSettings,
    pub game_config: GameConfig,
    pub final_state: GameState,
    pub line_score: LineScore,
    pub decisions: Vec<ReplayDecision>,
    pub replay_url: String,
    pub steps: usize,
    pub pitches: usize,
    pub pauses: usize,
    pub rng_draws: u64,
    pub fingerprint: u64,
    /// Rule violations spotted between steps.
    pub violations: Vec<String>,
    pub narration: Vec<String>,
}

impl GameSummary {
    #[must_use]
    pub fn result_line(&self) -> String {
        let state = &self.final_state;
        let winner = state
            .winner()
            .map_or("nobody", |team| state.team_name(team));
        format!(
            "{} {} - {} {} after {} innings, {} wins",
            state.teams[0], state.score[0], state.teams[1], state.score[1], state.inning, winner
        )
    }
}

/// Hash of the parts of a game a replay must reproduce exactly.
#[must_use]
pub fn fingerprint(state: &GameState) -> u64 {
    let mut hasher = XxHash64::with_seed(0);
    hasher.write(&serde_json::to_vec(&state.play_log).unwrap_or_default());
    hasher.write(&serde_json::to_vec(&state.score).unwrap_or_default());
    hasher.write(&state.pitch_key.to_le_bytes());
    hasher.finish()
}

/// Play one game to completion, answering pauses with the configured policy
/// (or from the replay link, when one is set).
pub fn run_game(config: &SimulationConfig) -> Result<GameSummary> {
    let manager = config.manager();
    let mut session = match &config.replay_url {
        Some(url) => GameSession::from_replay_url(
            url,
            team_names(),
            config.game.clone(),
            manager,
            VecNarrator::new(),
        ),
        None => GameSession::new(
            config.seed,
            team_names(),
            config.game.clone(),
            manager,
            VecNarrator::new(),
        ),
    };
    let mut policy = config.style.create_policy(u64::from(config.seed));

    let mut steps = 0;
    let mut pitches = 0;
    let mut pauses = 0;
    let mut violations = Vec::new();

    while steps < config.max_steps {
        let before = session.state().clone();
        let outcome = session.step();
        steps += 1;
        match outcome {
            StepOutcome::GameOver => break,
            StepOutcome::Pitched(_) => pitches += 1,
            StepOutcome::DecisionRaised(decision) => {
                pauses += 1;
                violations.extend(check_offer(&before, decision));
                // replayed pauses are answered by the session on the next step
                if config.replay_url.is_none() {
                    answer(&mut session, policy.as_mut(), decision);
                }
            }
            StepOutcome::AwaitingDecision(decision) => {
                answer(&mut session, policy.as_mut(), decision);
            }
            StepOutcome::Resolved(choice) => {
                log::debug!("replayed {choice:?} at pitch {}", before.pitch_key);
            }
        }
        violations.extend(check_transition(&before, session.state()));
    }

    if !session.state().game_over {
        bail!(
            "seed {} still running after {} steps",
            encode_seed(session.seed()),
            config.max_steps
        );
    }

    let final_state = session.state().clone();
    violations.extend(check_final(&final_state));
    let seed = session.seed();
    Ok(GameSummary {
        seed,
        seed_code: encode_seed(seed),
        style: config.style,
        manager,
        game_config: session.config().clone(),
        line_score: session.line_score(),
        decisions: session.decisions().to_vec(),
        replay_url: session.replay_url(),
        steps,
        pitches,
        pauses,
        rng_draws: session.rng_draws(),
        fingerprint: fingerprint(&final_state),
        violations,
        narration: session.narrator_mut().drain(),
        final_state,
    })
}

fn answer(
    session: &mut GameSession<VecNarrator>,
    policy: &mut (dyn ManagerPolicy + Send),
    decision: Decision,
) {
    let choice = policy.choose(session.state(), decision);
    log::trace!("{} answers {decision} with {choice:?}", policy.name());
    session.answer(choice);
}

/// Re-run a finished game from its replay link alone.
pub fn replay_summary(summary: &GameSummary) -> Result<GameState> {
    let mut session = GameSession::from_replay_url(
        &summary.replay_url,
        team_names(),
        summary.game_config.clone(),
        summary.manager,
        VecNarrator::new(),
    );
    session
        .autoplay(DEFAULT_MAX_STEPS)
        .with_context(|| format!("replaying {}", summary.replay_url))?;
    Ok(session.into_state())
}

fn check_offer(state: &GameState, decision: Decision) -> Vec<String> {
    let mut problems = Vec::new();
    if let Some((base, _)) = decision.steal_offer() {
        if state.occupied(base) {
            problems.push(format!("{decision} offered onto occupied {}", base.label()));
        }
        if !base.previous().is_some_and(|from| state.occupied(from)) {
            problems.push(format!("{decision} offered without a runner to send"));
        }
    }
    if matches!(
        decision,
        Decision::IntentionalWalk | Decision::IntentionalWalkOrSteal { .. }
    ) && state.occupied(Base::First)
    {
        problems.push(format!("{decision} offered with first base occupied"));
    }
    if state.game_over {
        problems.push(format!("{decision} offered after the final out"));
    }
    problems
}

fn check_transition(before: &GameState, after: &GameState) -> Vec<String> {
    let mut problems = Vec::new();
    let at = after.pitch_key;
    if after.score[0] < before.score[0] || after.score[1] < before.score[1] {
        problems.push(format!("pitch {at}: score went down"));
    }
    if after.pitch_key < before.pitch_key {
        problems.push(format!("pitch {at}: pitch key went backwards"));
    }
    if after.inning > before.inning && before.at_bat != Half::Bottom {
        problems.push(format!("pitch {at}: inning advanced after a top half"));
    }
    if !after.game_over && (after.outs > 2 || after.balls > 3 || after.strikes > 2) {
        problems.push(format!(
            "pitch {at}: impossible count {}-{} with {} outs",
            after.balls, after.strikes, after.outs
        ));
    }
    if after.play_log.len() < before.play_log.len()
        || after.play_log[..before.play_log.len()] != before.play_log[..]
    {
        problems.push(format!("pitch {at}: play log was rewritten"));
    }
    problems
}

fn check_final(state: &GameState) -> Vec<String> {
    let mut problems = Vec::new();
    if state.winner().is_none() {
        problems.push("game ended tied".to_string());
    }
    for team in [Team::Visitors, Team::Home] {
        let logged: u32 = state
            .play_log
            .iter()
            .filter(|entry| entry.team == team)
            .map(|entry| entry.runs)
            .sum();
        if logged != state.score[team.index()] {
            problems.push(format!(
                "{} scored {} but the log credits {logged}",
                state.team_name(team),
                state.score[team.index()]
            ));
        }
    }
    problems
}

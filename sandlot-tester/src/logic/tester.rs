use anyhow::Result;
use colored::Colorize;
use sandlot_game::{GameConfig, Team};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::logic::policy::ManagerStyle;
use crate::logic::seeds::SeedInfo;
use crate::logic::simulation::{GameSummary, SimulationConfig, run_game};

/// Assertion hook run after a simulated game completes.
type SimulationExpectationFn = Arc<dyn Fn(&GameSummary) -> Result<()> + Send + Sync + 'static>;

#[derive(Clone)]
pub struct SimulationExpectation(SimulationExpectationFn);

impl std::fmt::Debug for SimulationExpectation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulationExpectation").finish()
    }
}

impl SimulationExpectation {
    pub fn evaluate(&self, summary: &GameSummary) -> Result<()> {
        (self.0)(summary)
    }
}

impl<F> From<F> for SimulationExpectation
where
    F: Fn(&GameSummary) -> Result<()> + Send + Sync + 'static,
{
    fn from(f: F) -> Self {
        Self(Arc::new(f))
    }
}

/// Which side a scenario manages and what it checks after each game.
#[derive(Debug, Clone, Default)]
pub struct SimulationPlan {
    pub managed_team: Option<Team>,
    pub expectations: Vec<SimulationExpectation>,
}

impl SimulationPlan {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn with_managed_team(mut self, team: Team) -> Self {
        self.managed_team = Some(team);
        self
    }

    #[must_use]
    pub fn with_expectation(mut self, expectation: impl Into<SimulationExpectation>) -> Self {
        self.expectations.push(expectation.into());
        self
    }
}

#[derive(Debug, Clone)]
pub struct TestScenario {
    pub name: String,
    pub plan: SimulationPlan,
}

impl TestScenario {
    #[must_use]
    pub fn simulation(name: impl Into<String>, plan: SimulationPlan) -> Self {
        Self {
            name: name.into(),
            plan,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub scenario_name: String,
    pub seed: String,
    pub passed: bool,
    pub iterations_run: usize,
    pub successful_iterations: usize,
    pub failures: Vec<String>,
    #[serde(with = "duration_serde")]
    pub average_duration: Duration,
    #[serde(with = "duration_vec_serde")]
    pub performance_data: Vec<Duration>,
}

pub struct LogicTester {
    verbose: bool,
    play_by_play: bool,
    style: ManagerStyle,
    game: GameConfig,
}

impl LogicTester {
    #[must_use]
    pub const fn new(style: ManagerStyle, game: GameConfig) -> Self {
        Self {
            verbose: false,
            play_by_play: false,
            style,
            game,
        }
    }

    #[must_use]
    pub const fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    #[must_use]
    pub const fn play_by_play(mut self, play_by_play: bool) -> Self {
        self.play_by_play = play_by_play;
        self
    }

    pub fn run_scenario(
        &self,
        scenario: &TestScenario,
        seeds: &[SeedInfo],
        iterations: usize,
    ) -> Vec<ScenarioResult> {
        let mut results = Vec::new();

        for seed in seeds {
            if self.verbose {
                println!(
                    "🧪 Testing scenario: {} (manager: {} seed: {})",
                    scenario.name.bright_white(),
                    self.style,
                    seed.code
                );
                if seed.replay_url.is_some() {
                    println!(
                        "   ↳ first game replays {} logged decision(s)",
                        seed.decisions.len()
                    );
                }
            }

            results.push(self.run_single_scenario(scenario, seed, iterations));
        }

        results
    }

    fn run_single_scenario(
        &self,
        scenario: &TestScenario,
        seed: &SeedInfo,
        iterations: usize,
    ) -> ScenarioResult {
        let mut successes = 0;
        let mut failures = Vec::new();
        let mut performance_data = Vec::new();

        for i in 0..iterations {
            let start_time = Instant::now();
            let config = self.iteration_config(&scenario.plan, seed, i);
            let iteration_code = sandlot_game::encode_seed(config.seed);

            let outcome = run_game(&config).and_then(|summary| {
                if self.play_by_play {
                    print_play_by_play(&summary);
                }
                evaluate_expectations(&scenario.plan, &summary).map(|()| summary)
            });

            match outcome {
                Ok(summary) => {
                    successes += 1;
                    let duration = start_time.elapsed();
                    performance_data.push(duration);
                    if self.verbose {
                        let counts = format!(
                            "steps {} pitches {} pauses {} draws {}",
                            summary.steps, summary.pitches, summary.pauses, summary.rng_draws
                        );
                        println!(
                            "  ✅ Iteration {}/{} passed ({duration:?}) {} | {counts}",
                            i + 1,
                            iterations,
                            summary.result_line()
                        );
                    }
                }
                Err(err) => {
                    failures.push(format!(
                        "Iteration {} (seed {iteration_code}, manager {}): {err:#}",
                        i + 1,
                        config.style
                    ));
                    if self.verbose {
                        println!(
                            "  ❌ Iteration {}/{} failed: {}",
                            i + 1,
                            iterations,
                            format!("{err:#}").red()
                        );
                    }
                }
            }
        }

        let average_duration = if performance_data.is_empty() {
            Duration::ZERO
        } else {
            performance_data.iter().sum::<Duration>()
                / u32::try_from(performance_data.len()).unwrap_or(1)
        };

        ScenarioResult {
            scenario_name: scenario.name.clone(),
            seed: seed.code.clone(),
            passed: failures.is_empty(),
            iterations_run: iterations,
            successful_iterations: successes,
            failures,
            average_duration,
            performance_data,
        }
    }

    /// The first iteration replays the seed's link when it has one; the
    /// rest walk forward from the seed.
    fn iteration_config(
        &self,
        plan: &SimulationPlan,
        seed: &SeedInfo,
        i: usize,
    ) -> SimulationConfig {
        let offset = u32::try_from(i).unwrap_or(u32::MAX);
        let replay_url = if i == 0 { seed.replay_url.clone() } else { None };
        SimulationConfig::new(seed.seed.wrapping_add(offset), self.style)
            .with_managed_team(plan.managed_team.unwrap_or(Team::Home))
            .with_game_config(self.game.clone())
            .with_replay_url(replay_url)
    }
}

fn evaluate_expectations(plan: &SimulationPlan, summary: &GameSummary) -> Result<()> {
    for expectation in &plan.expectations {
        expectation.evaluate(summary)?;
    }
    Ok(())
}

fn print_play_by_play(summary: &GameSummary) {
    println!(
        "{}",
        format!("⚾ Seed {} ({})", summary.seed_code, summary.style)
            .bright_white()
            .bold()
    );
    for line in &summary.narration {
        println!("   {line}");
    }
    print!("{}", summary.line_score);
    println!("   Replay: {}", summary.replay_url.cyan());
}

mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_millis().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u128::deserialize(deserializer)?;
        Ok(Duration::from_millis(u64::try_from(millis).unwrap_or(0)))
    }
}

mod duration_vec_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(durations: &[Duration], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let millis: Vec<u128> = durations.iter().map(Duration::as_millis).collect();
        millis.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis_vec = Vec::<u128>::deserialize(deserializer)?;
        Ok(millis_vec
            .into_iter()
            .map(|m| Duration::from_millis(u64::try_from(m).unwrap_or(0)))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan_that_checks_innings() -> SimulationPlan {
        SimulationPlan::new().with_expectation(|summary: &GameSummary| -> Result<()> {
            anyhow::ensure!(summary.final_state.inning >= 9, "short game");
            Ok(())
        })
    }

    #[test]
    fn passing_plan_counts_every_iteration() {
        let tester = LogicTester::new(ManagerStyle::Skip, GameConfig::default());
        let scenario = TestScenario::simulation("innings", plan_that_checks_innings());
        let results = tester.run_scenario(&scenario, &[SeedInfo::from_numeric(10)], 3);
        assert_eq!(results.len(), 1);
        assert!(results[0].passed);
        assert_eq!(results[0].successful_iterations, 3);
        assert_eq!(results[0].performance_data.len(), 3);
    }

    #[test]
    fn failing_expectation_is_reported_with_seed() {
        let tester = LogicTester::new(ManagerStyle::Skip, GameConfig::default());
        let plan = SimulationPlan::new()
            .with_expectation(|_: &GameSummary| -> Result<()> { anyhow::bail!("always fails") });
        let scenario = TestScenario::simulation("broken", plan);
        let results = tester.run_scenario(&scenario, &[SeedInfo::from_numeric(3)], 2);
        assert!(!results[0].passed);
        assert_eq!(results[0].failures.len(), 2);
        assert!(results[0].failures[0].contains("seed 3"));
        assert!(results[0].failures[1].contains("always fails"));
    }

    #[test]
    fn iterations_walk_forward_from_the_seed() {
        let tester = LogicTester::new(ManagerStyle::Cautious, GameConfig::default());
        let plan = SimulationPlan::new().with_managed_team(Team::Visitors);
        let url = sandlot_game::build_replay_url(1, &[]);
        let seed = SeedInfo::from_replay_url(1, &url);

        let first = tester.iteration_config(&plan, &seed, 0);
        assert_eq!(first.replay_url.as_deref(), Some(url.as_str()));
        let later = tester.iteration_config(&plan, &seed, 4);
        assert_eq!(later.style, ManagerStyle::Cautious);
        assert_eq!(later.managed_team, Team::Visitors);
        assert_eq!(later.seed, 5);
        assert!(later.replay_url.is_none());
    }

    #[test]
    fn scenario_result_serializes_durations_as_millis() {
        let result = ScenarioResult {
            scenario_name: "smoke".to_string(),
            seed: "1337".to_string(),
            passed: true,
            iterations_run: 1,
            successful_iterations: 1,
            failures: Vec::new(),
            average_duration: Duration::from_millis(12),
            performance_data: vec![Duration::from_millis(12)],
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["average_duration"], 12);
        let back: ScenarioResult = serde_json::from_value(json).unwrap();
        assert_eq!(back.performance_data, vec![Duration::from_millis(12)]);
    }
}

pub mod catalog;

use crate::logic::TestScenario;

/// Scenario keys in the order `all` expands to, with a short description.
const SCENARIOS: [(&str, &str); 5] = [
    ("smoke", "Seeded games finish with a winner and a consistent log"),
    (
        "deterministic-replay",
        "Replaying a game's link reproduces it pitch for pitch",
    ),
    (
        "replay-url-roundtrip",
        "Seed and decision log survive the trip through a replay URL",
    ),
    (
        "state-invariants",
        "Counts, outs, bases and the line score stay legal throughout",
    ),
    (
        "manager-decisions",
        "Manager pauses are legal, answered, and logged by pitch",
    ),
];

pub fn get_scenario(name: &str) -> Option<TestScenario> {
    let (key, plan) = match name.to_lowercase().as_str() {
        "smoke" => ("smoke", catalog::smoke_plan()),
        "deterministic-replay" | "deterministic" => {
            ("deterministic-replay", catalog::deterministic_replay_plan())
        }
        "replay-url-roundtrip" | "replay-url" => {
            ("replay-url-roundtrip", catalog::replay_url_plan())
        }
        "state-invariants" | "invariants" => ("state-invariants", catalog::state_invariants_plan()),
        "manager-decisions" | "manager" => ("manager-decisions", catalog::manager_decisions_plan()),
        _ => return None,
    };
    Some(TestScenario::simulation(key, plan))
}

pub fn list_scenarios() -> Vec<(&'static str, &'static str)> {
    SCENARIOS.to_vec()
}

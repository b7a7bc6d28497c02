use anyhow::{Context, Result, anyhow, ensure};
use sandlot_game::{
    ReplayDecision, Team, build_replay_url, decisions_from_url, parse_seed, seed_from_url,
};

use crate::logic::{GameSummary, SimulationPlan, fingerprint, replay_summary};

pub fn smoke_plan() -> SimulationPlan {
    SimulationPlan::new().with_expectation(smoke_expectation)
}

pub fn deterministic_replay_plan() -> SimulationPlan {
    SimulationPlan::new().with_expectation(deterministic_replay_expectation)
}

pub fn replay_url_plan() -> SimulationPlan {
    SimulationPlan::new().with_expectation(replay_url_expectation)
}

pub fn state_invariants_plan() -> SimulationPlan {
    SimulationPlan::new().with_expectation(state_invariants_expectation)
}

/// Manages the visitors so the road side's pauses get exercised too.
pub fn manager_decisions_plan() -> SimulationPlan {
    SimulationPlan::new()
        .with_managed_team(Team::Visitors)
        .with_expectation(manager_decisions_expectation)
}

fn smoke_expectation(summary: &GameSummary) -> Result<()> {
    let state = &summary.final_state;
    ensure!(state.game_over, "Game should be over");
    ensure!(state.winner().is_some(), "Game should not end tied");
    ensure!(summary.pitches > 0, "At least one pitch should be thrown");
    ensure!(
        state.inning >= summary.game_config.regulation_innings,
        "Game ended in inning {} before regulation",
        state.inning
    );
    ensure!(
        summary
            .narration
            .last()
            .is_some_and(|line| line.starts_with("Final")),
        "Narration should close with the final score"
    );
    Ok(())
}

fn deterministic_replay_expectation(summary: &GameSummary) -> Result<()> {
    let replayed = replay_summary(summary)?;
    ensure!(replayed.game_over, "Replay should reach the final out");
    ensure!(
        replayed.score == summary.final_state.score,
        "Replay score {:?} differs from original {:?}",
        replayed.score,
        summary.final_state.score
    );
    if let Some(idx) = replayed
        .play_log
        .iter()
        .zip(&summary.final_state.play_log)
        .position(|(a, b)| a != b)
    {
        return Err(anyhow!("Replay diverged at plate appearance {}", idx + 1));
    }
    ensure!(
        replayed.play_log.len() == summary.final_state.play_log.len(),
        "Replay logged {} plate appearances, original {}",
        replayed.play_log.len(),
        summary.final_state.play_log.len()
    );
    ensure!(
        fingerprint(&replayed) == summary.fingerprint,
        "Replay fingerprint mismatch"
    );
    Ok(())
}

fn replay_url_expectation(summary: &GameSummary) -> Result<()> {
    let url = &summary.replay_url;
    ensure!(
        seed_from_url(url) == Some(summary.seed),
        "Seed did not survive the link: {url}"
    );
    ensure!(
        parse_seed(&summary.seed_code) == Some(summary.seed),
        "Seed code {} does not parse back",
        summary.seed_code
    );
    ensure!(
        decisions_from_url(url) == summary.decisions,
        "Decision log did not survive the link"
    );
    ensure!(
        build_replay_url(summary.seed, &summary.decisions) == *url,
        "Rebuilding the link changed it"
    );
    for entry in &summary.decisions {
        let text = entry.to_string();
        let parsed: ReplayDecision = text
            .parse()
            .with_context(|| format!("Decision entry {text} does not parse"))?;
        ensure!(parsed == *entry, "Decision entry {text} changed on parse");
    }
    Ok(())
}

fn state_invariants_expectation(summary: &GameSummary) -> Result<()> {
    if let Some(first) = summary.violations.first() {
        return Err(anyhow!(
            "{} rule violation(s), first: {first}",
            summary.violations.len()
        ));
    }
    let line = &summary.line_score;
    for idx in 0..2 {
        let by_inning: u32 = line.innings[idx].iter().sum();
        ensure!(
            by_inning == line.runs[idx],
            "{} line score sums to {by_inning} but scored {}",
            line.teams[idx],
            line.runs[idx]
        );
    }
    let hits = summary
        .final_state
        .play_log
        .iter()
        .filter(|entry| entry.event.is_hit())
        .count();
    let line_hits = usize::try_from(line.hits[0] + line.hits[1])?;
    ensure!(hits == line_hits, "Line score hits {line_hits} but log has {hits}");
    ensure!(
        line.innings[0].len() >= usize::from(summary.game_config.regulation_innings),
        "Visitors batted only {} innings",
        line.innings[0].len()
    );
    Ok(())
}

fn manager_decisions_expectation(summary: &GameSummary) -> Result<()> {
    ensure!(summary.pauses > 0, "Manager was never consulted");
    ensure!(
        summary.decisions.len() == summary.pauses,
        "{} pauses raised but {} answers recorded",
        summary.pauses,
        summary.decisions.len()
    );
    let keys: Vec<u32> = summary.decisions.iter().map(|d| d.pitch_key).collect();
    ensure!(
        keys.windows(2).all(|pair| pair[0] <= pair[1]),
        "Decision log is out of pitch order"
    );
    ensure!(
        keys.last()
            .is_none_or(|key| *key <= summary.final_state.pitch_key),
        "Decision logged after the last pitch"
    );
    if let Some(bad) = summary.violations.iter().find(|v| v.contains("offered")) {
        return Err(anyhow!("Illegal offer: {bad}"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::{ManagerStyle, SimulationConfig, run_game};

    fn summary(seed: u32, style: ManagerStyle) -> GameSummary {
        run_game(&SimulationConfig::new(seed, style)).expect("game finishes")
    }

    #[test]
    fn catalog_expectations_hold_for_a_managed_game() {
        let game = summary(1337, ManagerStyle::Aggressive);
        smoke_expectation(&game).unwrap();
        deterministic_replay_expectation(&game).unwrap();
        replay_url_expectation(&game).unwrap();
        state_invariants_expectation(&game).unwrap();
        manager_decisions_expectation(&game).unwrap();
    }

    #[test]
    fn tampered_summary_fails_the_replay_check() {
        let mut game = summary(42, ManagerStyle::Cautious);
        game.final_state.score[0] += 1;
        assert!(deterministic_replay_expectation(&game).is_err());
    }

    #[test]
    fn dropped_answer_fails_the_manager_check() {
        let mut game = summary(8, ManagerStyle::Random);
        game.decisions.pop();
        assert!(manager_decisions_expectation(&game).is_err());
    }
}

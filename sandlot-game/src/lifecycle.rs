//! Outs, half-inning transitions and game-over detection.
//!
//! Helpers here mutate the reducer's working copy of the state; callers never
//! see a snapshot change underneath them.
use crate::config::GameConfig;
use crate::narrator::Narrator;
use crate::state::{Base, GameState, Half, PlayEvent, PlayLogEntry};

pub(crate) const fn reset_count(state: &mut GameState) {
    state.balls = 0;
    state.strikes = 0;
}

/// Credit runs to the batting team and the current inning.
pub fn score_runs(state: &mut GameState, runs: u32) {
    if runs == 0 {
        return;
    }
    let team = state.batting_team().index();
    state.score[team] = state.score[team].saturating_add(runs);
    let inning_total = state.inning_runs[team].entry(state.inning).or_insert(0);
    *inning_total = inning_total.saturating_add(runs);
}

/// Log the plate appearance and bring up the next batter.
pub fn complete_plate_appearance(
    state: &mut GameState,
    event: PlayEvent,
    runs: u32,
    config: &GameConfig,
) {
    let team = state.batting_team();
    let slot = state.current_batter_slot();
    state.play_log.push(PlayLogEntry {
        inning: state.inning,
        half: state.at_bat,
        batter_num: slot.saturating_add(1),
        team,
        event,
        runs,
    });
    state.batter_index[team.index()] = slot.saturating_add(1) % config.lineup_size.max(1);
    reset_count(state);
    state.defensive_shift = false;
    state.pinch_hitter = false;
}

/// Record an out. The third out ends the half-inning.
///
/// The count is left alone; plate-appearance paths reset it beforehand and a
/// caught stealing keeps it.
pub fn player_out(state: &mut GameState, narrator: &mut dyn Narrator, config: &GameConfig) {
    state.outs = state.outs.saturating_add(1);
    if state.outs >= 3 {
        end_half_inning(state, narrator, config);
    } else {
        let noun = if state.outs == 1 { "out" } else { "outs" };
        narrator.narrate(&format!("{} {noun}.", state.outs));
    }
}

/// Close out the half-inning: clear the field, flip sides, and either end the
/// game or bring up the other team.
pub fn end_half_inning(state: &mut GameState, narrator: &mut dyn Narrator, config: &GameConfig) {
    let finished = state.at_bat;
    narrator.narrate(&format!(
        "End of the {} of the {}. {}",
        finished.label(),
        ordinal(state.inning),
        score_line(state)
    ));

    state.outs = 0;
    reset_count(state);
    state.base_layout = [false; 3];
    state.pending_decision = None;
    state.one_pitch_modifier = None;
    state.defensive_shift = false;
    state.pinch_hitter = false;

    let over = check_game_over(state, finished, config);
    state.at_bat = finished.flipped();
    if finished == Half::Bottom {
        state.inning = state.inning.saturating_add(1);
    }
    if over {
        state.game_over = true;
        narrate_final(state, narrator);
        return;
    }

    narrator.narrate(&format!(
        "{} up to bat in the {} of the {}.",
        state.team_name(state.batting_team()),
        state.at_bat.label(),
        ordinal(state.inning)
    ));
    if config.extra_inning_runner && state.inning > config.regulation_innings {
        state.base_layout[Base::Second.slot()] = true;
        narrator.narrate("Extra innings: runner placed on second.");
    }
}

/// Whether the game ends once `finished` is complete.
///
/// Only regulation or later counts. After the top half the home team must
/// already lead; after the bottom half any difference ends it.
#[must_use]
pub fn check_game_over(state: &GameState, finished: Half, config: &GameConfig) -> bool {
    if state.inning < config.regulation_innings {
        return false;
    }
    let [visitors, home] = state.score;
    match finished {
        Half::Top => home > visitors,
        Half::Bottom => home != visitors,
    }
}

/// Whether a scoring play just ended the game in the home team's last at-bat.
#[must_use]
pub fn check_walkoff(state: &GameState, config: &GameConfig) -> bool {
    state.at_bat == Half::Bottom
        && state.inning >= config.regulation_innings
        && state.score[1] > state.score[0]
}

/// End the game on a walk-off. Returns whether it fired.
pub fn finish_if_walkoff(
    state: &mut GameState,
    narrator: &mut dyn Narrator,
    config: &GameConfig,
) -> bool {
    if state.game_over || !check_walkoff(state, config) {
        return false;
    }
    state.game_over = true;
    state.pending_decision = None;
    state.one_pitch_modifier = None;
    narrator.narrate(&format!(
        "Walk-off! {} win it in the {}.",
        state.team_name(state.batting_team()),
        ordinal(state.inning)
    ));
    narrate_final(state, narrator);
    true
}

fn narrate_final(state: &GameState, narrator: &mut dyn Narrator) {
    narrator.narrate(&format!("Final: {}", score_line(state)));
}

fn score_line(state: &GameState) -> String {
    format!(
        "{} {}, {} {}.",
        state.teams[0], state.score[0], state.teams[1], state.score[1]
    )
}

/// `1st`, `2nd`, `11th`, `23rd`...
#[must_use]
pub fn ordinal(n: u8) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{n}{suffix}")
}

//! Single entry point for state transitions.
//!
//! `reduce` takes a snapshot and an action and returns the next snapshot. All
//! randomness comes from the injected [`PitchRng`]; all text goes to the
//! injected [`Narrator`].
use serde::{Deserialize, Serialize};

use crate::advance::{advance_runners, sacrifice_advance};
use crate::config::GameConfig;
use crate::constants::{
    CONTACT_BASE_PER_MILLE, PINCH_HIT_CONTACT_FACTOR, POWER_POP_HOMER_CHANCE,
    SACRIFICE_CEILING_PCT, SHIFT_CONTACT_FACTOR,
};
use crate::decision::Decision;
use crate::lifecycle::{complete_plate_appearance, finish_if_walkoff, player_out, score_runs};
use crate::narrator::Narrator;
use crate::numbers::round_f64_to_u32;
use crate::pitch::{PitchType, WaitOutcome, compute_wait_outcome};
use crate::rng::PitchRng;
use crate::state::{Base, GameState, HitKind, OnePitchModifier, PlayEvent};
use crate::strategy::{StatAxis, Strategy, strat_mod};

/// Everything that can happen to a game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameAction {
    Reset,
    SetTeams {
        names: [String; 2],
    },
    Strike {
        swung: bool,
        #[serde(default)]
        pitch_type: Option<PitchType>,
    },
    Foul {
        #[serde(default)]
        pitch_type: Option<PitchType>,
    },
    Wait {
        strategy: Strategy,
        #[serde(default)]
        pitch_type: Option<PitchType>,
    },
    Hit {
        kind: HitKind,
        strategy: Strategy,
    },
    StealAttempt {
        base: Base,
        success_pct: u32,
    },
    BuntAttempt {
        strategy: Strategy,
    },
    IntentionalWalk,
    SetOnePitchModifier {
        modifier: OnePitchModifier,
    },
    SetPendingDecision {
        decision: Decision,
    },
    SkipDecision,
    PinchHit,
    SetDefensiveShift {
        active: bool,
    },
}

impl GameAction {
    /// Whether the action consumes a pitch key.
    #[must_use]
    pub const fn is_pitch(&self) -> bool {
        matches!(
            self,
            Self::Strike { .. }
                | Self::Foul { .. }
                | Self::Wait { .. }
                | Self::Hit { .. }
                | Self::StealAttempt { .. }
                | Self::BuntAttempt { .. }
                | Self::IntentionalWalk
        )
    }
}

/// Collaborators the reducer borrows for one dispatch.
pub struct ReduceCtx<'a> {
    pub rng: &'a mut PitchRng,
    pub narrator: &'a mut dyn Narrator,
    pub config: &'a GameConfig,
}

/// Apply `action` to `state`, returning the next snapshot.
///
/// Once the game is over only `Reset` and `SetTeams` have any effect.
#[must_use]
pub fn reduce(state: &GameState, action: &GameAction, ctx: &mut ReduceCtx<'_>) -> GameState {
    let mut next = state.clone();
    if next.game_over && !matches!(action, GameAction::Reset | GameAction::SetTeams { .. }) {
        log::debug!("game over; ignoring {action:?}");
        return next;
    }

    match action {
        GameAction::Reset => {
            next = GameState::new(state.teams.clone());
            ctx.narrator.narrate(&format!(
                "Play ball! {} at {}.",
                next.teams[0], next.teams[1]
            ));
        }
        GameAction::SetTeams { names } => next.teams = names.clone(),
        GameAction::Strike { swung, pitch_type } => {
            begin_pitch(&mut next);
            record_strike(&mut next, *swung, *pitch_type, ctx);
        }
        GameAction::Foul { pitch_type } => {
            begin_pitch(&mut next);
            if next.strikes < 2 {
                next.strikes += 1;
            }
            ctx.narrator.narrate(&format!(
                "Foul ball{}. Count {}-{}.",
                pitch_suffix(*pitch_type),
                next.balls,
                next.strikes
            ));
        }
        GameAction::Wait {
            strategy,
            pitch_type,
        } => {
            let modifier = begin_pitch(&mut next);
            let draw = ctx.rng.roll(1000);
            match compute_wait_outcome(*strategy, *pitch_type, modifier, draw) {
                WaitOutcome::Ball => record_ball(&mut next, *pitch_type, ctx),
                WaitOutcome::CalledStrike => record_strike(&mut next, false, *pitch_type, ctx),
            }
        }
        GameAction::Hit { kind, strategy } => {
            begin_pitch(&mut next);
            hit_ball(&mut next, *kind, *strategy, ctx);
        }
        GameAction::StealAttempt { base, success_pct } => {
            attempt_steal(&mut next, *base, *success_pct, ctx);
        }
        GameAction::BuntAttempt { strategy } => {
            begin_pitch(&mut next);
            attempt_bunt(&mut next, *strategy, ctx);
        }
        GameAction::IntentionalWalk => {
            begin_pitch(&mut next);
            ctx.narrator.narrate(&format!("{} is intentionally walked.", batter_label(&next)));
            award_walk(&mut next, PlayEvent::IntentionalWalk, ctx);
        }
        GameAction::SetOnePitchModifier { modifier } => {
            next.pending_decision = None;
            next.one_pitch_modifier = Some(*modifier);
            log::debug!("one-pitch modifier set to {modifier}");
        }
        GameAction::SetPendingDecision { decision } => {
            next.pending_decision = Some(*decision);
            next.decision_checked_at = Some(next.pitch_key);
            ctx.narrator.narrate(&format!("Manager's call: {decision}."));
        }
        GameAction::SkipDecision => {
            next.pending_decision = None;
            next.decision_checked_at = Some(next.pitch_key);
        }
        GameAction::PinchHit => send_pinch_hitter(&mut next, ctx),
        GameAction::SetDefensiveShift { active } => {
            next.pending_decision = None;
            next.defensive_shift = *active;
            let text = if *active {
                "The defense shifts."
            } else {
                "The defense stays at standard depth."
            };
            ctx.narrator.narrate(text);
        }
    }
    next
}

/// Common bookkeeping for every pitch-like action. Returns the modifier that
/// applies to this pitch.
fn begin_pitch(state: &mut GameState) -> Option<OnePitchModifier> {
    state.pitch_key = state.pitch_key.saturating_add(1);
    state.hit_type = None;
    state.pending_decision = None;
    state.one_pitch_modifier.take()
}

fn record_strike(
    state: &mut GameState,
    swung: bool,
    pitch_type: Option<PitchType>,
    ctx: &mut ReduceCtx<'_>,
) {
    state.strikes = state.strikes.saturating_add(1);
    let how = if swung { "swinging" } else { "looking" };
    if state.strikes >= 3 {
        ctx.narrator.narrate(&format!(
            "Strike three {how}{}! {} strikes out.",
            pitch_suffix(pitch_type),
            batter_label(state)
        ));
        complete_plate_appearance(state, PlayEvent::Strikeout, 0, ctx.config);
        player_out(state, ctx.narrator, ctx.config);
    } else {
        ctx.narrator.narrate(&format!(
            "Strike {how}{}. Count {}-{}.",
            pitch_suffix(pitch_type),
            state.balls,
            state.strikes
        ));
    }
}

fn record_ball(state: &mut GameState, pitch_type: Option<PitchType>, ctx: &mut ReduceCtx<'_>) {
    state.balls = state.balls.saturating_add(1);
    if state.balls >= 4 {
        ctx.narrator.narrate(&format!("Ball four. {} walks.", batter_label(state)));
        award_walk(state, PlayEvent::Walk, ctx);
    } else {
        ctx.narrator.narrate(&format!(
            "Ball{}. Count {}-{}.",
            pitch_suffix(pitch_type),
            state.balls,
            state.strikes
        ));
    }
}

fn award_walk(state: &mut GameState, event: PlayEvent, ctx: &mut ReduceCtx<'_>) {
    let advancement = advance_runners(HitKind::Walk, &state.base_layout);
    state.base_layout = advancement.bases;
    score_runs(state, advancement.runs);
    narrate_runs(ctx.narrator, advancement.runs);
    complete_plate_appearance(state, event, advancement.runs, ctx.config);
    finish_if_walkoff(state, ctx.narrator, ctx.config);
}

/// Resolve a ball in play: pop-out check first, then runner advancement.
///
/// The contact draw is taken for every kind; only singles, doubles and
/// triples can be popped out.
fn hit_ball(state: &mut GameState, kind: HitKind, strategy: Strategy, ctx: &mut ReduceCtx<'_>) {
    let threshold = contact_threshold(state, strategy);
    let draw = ctx.rng.roll(1000);
    log::debug!("contact draw {draw} against {threshold}");
    match kind {
        HitKind::Walk => {
            ctx.narrator.narrate(&format!("{} takes first.", batter_label(state)));
            award_walk(state, PlayEvent::Walk, ctx);
            return;
        }
        HitKind::HomeRun => {
            apply_hit(state, HitKind::HomeRun, PlayEvent::HomeRun, ctx);
            return;
        }
        HitKind::Single | HitKind::Double | HitKind::Triple => {}
    }

    if draw < threshold {
        apply_hit(state, kind, kind.into(), ctx);
        return;
    }
    if strategy == Strategy::Power && ctx.rng.chance(POWER_POP_HOMER_CHANCE) {
        ctx.narrator.narrate("Got all of it...");
        apply_hit(state, HitKind::HomeRun, PlayEvent::HomeRun, ctx);
        return;
    }
    ctx.narrator.narrate(&format!("{} pops out.", batter_label(state)));
    state.hit_type = Some(PlayEvent::PopOut);
    complete_plate_appearance(state, PlayEvent::PopOut, 0, ctx.config);
    player_out(state, ctx.narrator, ctx.config);
}

/// Per-mille chance a ball in play is squared up rather than popped up.
#[must_use]
pub fn contact_threshold(state: &GameState, strategy: Strategy) -> u32 {
    let shift = if state.defensive_shift {
        SHIFT_CONTACT_FACTOR
    } else {
        1.0
    };
    let pinch = if state.pinch_hitter {
        PINCH_HIT_CONTACT_FACTOR
    } else {
        1.0
    };
    round_f64_to_u32(
        CONTACT_BASE_PER_MILLE * strat_mod(strategy, StatAxis::Contact) * shift * pinch,
    )
}

fn apply_hit(state: &mut GameState, kind: HitKind, event: PlayEvent, ctx: &mut ReduceCtx<'_>) {
    let advancement = advance_runners(kind, &state.base_layout);
    ctx.narrator.narrate(&format!(
        "{} {}!",
        batter_label(state),
        event_verb(event)
    ));
    state.base_layout = advancement.bases;
    state.hit_type = Some(event);
    score_runs(state, advancement.runs);
    narrate_runs(ctx.narrator, advancement.runs);
    complete_plate_appearance(state, event, advancement.runs, ctx.config);
    finish_if_walkoff(state, ctx.narrator, ctx.config);
}

fn attempt_steal(state: &mut GameState, target: Base, success_pct: u32, ctx: &mut ReduceCtx<'_>) {
    let from = target.previous().filter(|from| state.occupied(*from));
    let Some(from) = from.filter(|_| !state.occupied(target)) else {
        log::warn!(
            "steal of {} ignored: no runner to send or base taken",
            target.label()
        );
        state.pending_decision = None;
        return;
    };

    begin_pitch(state);
    let roll = ctx.rng.roll(100);
    log::debug!("steal roll {roll} against {success_pct}");
    state.base_layout[from.slot()] = false;
    if roll < success_pct {
        state.base_layout[target.slot()] = true;
        ctx.narrator.narrate(&format!("Runner steals {}!", target.label()));
    } else {
        ctx.narrator.narrate(&format!("Caught stealing {}!", target.label()));
        player_out(state, ctx.narrator, ctx.config);
    }
}

fn attempt_bunt(state: &mut GameState, strategy: Strategy, ctx: &mut ReduceCtx<'_>) {
    let roll = ctx.rng.roll(100);
    log::debug!("bunt roll {roll}");
    if roll < strategy.bunt_single_pct() {
        apply_hit(state, HitKind::Single, PlayEvent::BuntSingle, ctx);
        return;
    }
    if roll < SACRIFICE_CEILING_PCT {
        state.hit_type = Some(PlayEvent::Sacrifice);
        let advancement = sacrifice_advance(&state.base_layout);
        state.base_layout = advancement.bases;
        score_runs(state, advancement.runs);
        let runs = advancement.runs;
        ctx.narrator.narrate(&format!(
            "{} {}.",
            batter_label(state),
            event_verb(PlayEvent::Sacrifice)
        ));
        narrate_runs(ctx.narrator, runs);
        complete_plate_appearance(state, PlayEvent::Sacrifice, runs, ctx.config);
        if finish_if_walkoff(state, ctx.narrator, ctx.config) {
            return;
        }
        player_out(state, ctx.narrator, ctx.config);
        return;
    }
    ctx.narrator.narrate(&format!(
        "{} {}.",
        batter_label(state),
        event_verb(PlayEvent::BuntPopOut)
    ));
    state.hit_type = Some(PlayEvent::BuntPopOut);
    complete_plate_appearance(state, PlayEvent::BuntPopOut, 0, ctx.config);
    player_out(state, ctx.narrator, ctx.config);
}

fn send_pinch_hitter(state: &mut GameState, ctx: &mut ReduceCtx<'_>) {
    state.pending_decision = None;
    let team = state.batting_team().index();
    if state.pinch_hitter || state.pinch_hitters_used[team] >= ctx.config.bench_size {
        log::warn!("pinch hitter ignored: bench empty or one already at the plate");
        return;
    }
    state.pinch_hitters_used[team] += 1;
    state.pinch_hitter = true;
    ctx.narrator.narrate(&format!(
        "Pinch hitter for {}.",
        batter_label(state)
    ));
}

fn batter_label(state: &GameState) -> String {
    format!(
        "{} batter #{}",
        state.team_name(state.batting_team()),
        u16::from(state.current_batter_slot()) + 1
    )
}

fn pitch_suffix(pitch_type: Option<PitchType>) -> String {
    pitch_type.map_or_else(String::new, |pitch| format!(" on a {pitch}"))
}

fn narrate_runs(narrator: &mut dyn Narrator, runs: u32) {
    match runs {
        0 => {}
        1 => narrator.narrate("1 run scores."),
        n => narrator.narrate(&format!("{n} runs score.")),
    }
}

const fn event_verb(event: PlayEvent) -> &'static str {
    match event {
        PlayEvent::Single => "singles",
        PlayEvent::Double => "doubles",
        PlayEvent::Triple => "triples",
        PlayEvent::HomeRun => "homers",
        PlayEvent::Walk => "walks",
        PlayEvent::IntentionalWalk => "is intentionally walked",
        PlayEvent::PopOut => "pops out",
        PlayEvent::Strikeout => "strikes out",
        PlayEvent::Sacrifice => "lays down a sacrifice bunt",
        PlayEvent::BuntSingle => "bunts for a single",
        PlayEvent::BuntPopOut => "pops up the bunt",
    }
}

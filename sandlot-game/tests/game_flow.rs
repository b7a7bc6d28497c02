use sandlot_game::{
    Base, Decision, DecisionChoice, GameAction, GameConfig, GameSession, GameState, Half,
    ManagerSettings, NullNarrator, OnePitchModifier, PitchRng, PlayEvent, ReduceCtx, StepOutcome,
    Strategy, Team, VecNarrator, check_game_over, check_walkoff, detect_decision, reduce,
};

fn teams() -> [String; 2] {
    ["Visitors".to_string(), "Home".to_string()]
}

/// A manager that takes every offer it is given.
fn eager_choice(decision: Decision) -> DecisionChoice {
    match decision {
        Decision::Steal { base, success_pct }
        | Decision::IntentionalWalkOrSteal { base, success_pct } => {
            DecisionChoice::Steal { base, success_pct }
        }
        Decision::Bunt => DecisionChoice::Bunt,
        Decision::Count30 => DecisionChoice::Modifier {
            modifier: OnePitchModifier::Take,
        },
        Decision::Count02 => DecisionChoice::Modifier {
            modifier: OnePitchModifier::Protect,
        },
        Decision::IntentionalWalk => DecisionChoice::IntentionalWalk,
        Decision::PinchHitter => DecisionChoice::PinchHit,
        Decision::DefensiveShift => DecisionChoice::Shift { active: true },
    }
}

fn assert_offer_is_legal(state: &GameState, decision: Decision) {
    if let Some((base, _)) = decision.steal_offer() {
        assert!(!state.occupied(base), "steal onto occupied {base:?}");
        let from = base.previous().expect("steals never target first");
        assert!(state.occupied(from), "steal without a runner on {from:?}");
    }
    if matches!(
        decision,
        Decision::IntentionalWalk | Decision::IntentionalWalkOrSteal { .. }
    ) {
        assert!(!state.occupied(Base::First), "walk offered with first occupied");
        assert_eq!(state.outs, 2);
    }
    if matches!(decision, Decision::Steal { .. } | Decision::Bunt) {
        assert!(state.outs < 2);
    }
}

fn assert_transition(before: &GameState, after: &GameState) {
    assert!(after.score[0] >= before.score[0]);
    assert!(after.score[1] >= before.score[1]);
    assert!(after.inning >= before.inning);
    assert!(after.pitch_key >= before.pitch_key);
    if after.at_bat != before.at_bat {
        assert_eq!(after.outs, 0);
        assert_eq!((after.balls, after.strikes), (0, 0));
    }
    if after.inning > before.inning {
        assert_eq!(before.at_bat, Half::Bottom);
        assert_eq!(after.at_bat, Half::Top);
    }
    if !after.game_over {
        assert!(after.outs <= 2);
        assert!(after.balls <= 3);
        assert!(after.strikes <= 2);
    }
    assert!(after.play_log.len() >= before.play_log.len());
    assert_eq!(&after.play_log[..before.play_log.len()], &before.play_log[..]);
}

fn play_managed(seed: u32, manager: ManagerSettings) -> GameSession<NullNarrator> {
    let mut session =
        GameSession::new(seed, teams(), GameConfig::default(), manager, NullNarrator);
    for _ in 0..50_000 {
        let before = session.state().clone();
        match session.step() {
            StepOutcome::GameOver => break,
            StepOutcome::DecisionRaised(decision) => {
                assert_offer_is_legal(&before, decision);
                session.answer(eager_choice(decision));
            }
            StepOutcome::AwaitingDecision(decision) => {
                session.answer(eager_choice(decision));
            }
            StepOutcome::Pitched(_) | StepOutcome::Resolved(_) => {}
        }
        assert_transition(&before, session.state());
    }
    assert!(session.state().game_over, "seed {seed} never finished");
    session
}

#[test]
fn automatic_games_finish_with_a_winner() {
    for seed in 0..25 {
        let mut session = GameSession::new(
            seed,
            teams(),
            GameConfig::default(),
            ManagerSettings::disabled(),
            NullNarrator,
        );
        let state = session.autoplay(50_000).expect("game finishes").clone();
        assert!(state.winner().is_some(), "seed {seed} ended tied");
        assert!(session.decisions().is_empty());
        for team in [Team::Visitors, Team::Home] {
            let logged: u32 = state
                .play_log
                .iter()
                .filter(|entry| entry.team == team)
                .map(|entry| entry.runs)
                .sum();
            assert_eq!(logged, state.score[team.index()], "seed {seed}");
        }
    }
}

#[test]
fn managed_games_respect_invariants() {
    for seed in 0..15 {
        for team in [Team::Visitors, Team::Home] {
            for strategy in [Strategy::Aggressive, Strategy::Contact, Strategy::Patient] {
                let session = play_managed(seed, ManagerSettings::managing(team, strategy));
                assert!(session.state().winner().is_some());
            }
        }
    }
}

#[test]
fn manager_answers_show_up_in_play_log() {
    let mut saw_managed_event = false;
    for seed in 0..20 {
        let session = play_managed(seed, ManagerSettings::managing(Team::Home, Strategy::Contact));
        assert!(!session.decisions().is_empty());
        saw_managed_event |= session.state().play_log.iter().any(|entry| {
            matches!(
                entry.event,
                PlayEvent::Sacrifice
                    | PlayEvent::BuntSingle
                    | PlayEvent::BuntPopOut
                    | PlayEvent::IntentionalWalk
            )
        });
    }
    assert!(saw_managed_event);
}

#[test]
fn nothing_is_offered_once_the_game_is_over() {
    let config = GameConfig::default();
    let manager = ManagerSettings::managing(Team::Home, Strategy::Aggressive);
    let session = play_managed(3, manager);
    let mut state = session.into_state();
    state.balls = 3;
    state.strikes = 0;
    assert_eq!(detect_decision(&state, &manager, &config), None);
}

#[test]
fn game_over_is_terminal_except_for_reset() {
    let config = GameConfig::default();
    let mut rng = PitchRng::from_user_seed(1);
    let mut narrator = VecNarrator::new();
    let mut state = GameState::default();
    state.inning = 9;
    state.at_bat = Half::Bottom;
    state.score = [1, 2];
    state.game_over = true;

    let mut ctx = ReduceCtx {
        rng: &mut rng,
        narrator: &mut narrator,
        config: &config,
    };
    for action in [
        GameAction::Strike {
            swung: true,
            pitch_type: None,
        },
        GameAction::IntentionalWalk,
        GameAction::SkipDecision,
        GameAction::PinchHit,
        GameAction::SetDefensiveShift { active: true },
    ] {
        assert_eq!(reduce(&state, &action, &mut ctx), state);
    }
    let renamed = reduce(
        &state,
        &GameAction::SetTeams {
            names: ["A".into(), "B".into()],
        },
        &mut ctx,
    );
    assert_eq!(renamed.teams, ["A".to_string(), "B".to_string()]);
    assert!(renamed.game_over);
    let fresh = reduce(&renamed, &GameAction::Reset, &mut ctx);
    assert!(!fresh.game_over);
    assert_eq!(fresh.inning, 1);
    assert_eq!(fresh.teams, renamed.teams);
}

#[test]
fn tied_games_never_end() {
    let config = GameConfig::default();
    for inning in 1..=15 {
        for half in [Half::Top, Half::Bottom] {
            let mut state = GameState::default();
            state.inning = inning;
            state.at_bat = half;
            state.score = [3, 3];
            assert!(!check_game_over(&state, half, &config));
            assert!(!check_walkoff(&state, &config));
        }
    }
}

#[test]
fn walkoff_home_run_in_extras() {
    let config = GameConfig::default();
    let mut rng = PitchRng::from_user_seed(77);
    let mut narrator = VecNarrator::new();
    let mut state = GameState::default();
    state.inning = 11;
    state.at_bat = Half::Bottom;
    state.score = [5, 5];
    state.base_layout = [false, true, false];

    let mut ctx = ReduceCtx {
        rng: &mut rng,
        narrator: &mut narrator,
        config: &config,
    };
    let next = reduce(
        &state,
        &GameAction::Hit {
            kind: sandlot_game::HitKind::HomeRun,
            strategy: Strategy::Power,
        },
        &mut ctx,
    );
    assert!(next.game_over);
    assert_eq!(next.score, [5, 7]);
    assert_eq!(next.winner(), Some(Team::Home));
    assert!(narrator.lines().iter().any(|line| line.starts_with("Walk-off")));
}

#[test]
fn shorter_games_follow_configured_regulation() {
    let config = GameConfig {
        regulation_innings: 5,
        late_inning: 4,
        ..GameConfig::default()
    };
    for seed in 0..10 {
        let mut session = GameSession::new(
            seed,
            teams(),
            config.clone(),
            ManagerSettings::disabled(),
            NullNarrator,
        );
        let state = session.autoplay(50_000).expect("finishes");
        assert!(state.game_over);
        assert!(state.inning >= 5);
        assert!(state.play_log.iter().all(|entry| entry.batter_num <= 9));
    }
}

//! Property tests over the difficulty curves, scoring and session
//! determinism

use proptest::prelude::*;

use whack_a_mole::persistence::MemoryStore;
use whack_a_mole::sim::{
    GamePhase, MoleKind, Scoreboard, Session, mole_visible_time, spawn_interval,
};
use whack_a_mole::{Penalty, PenaltyMode, Tuning};

/// One host input between frames
#[derive(Debug, Clone)]
enum Input {
    Frame(f64),
    Click(f32, f32),
    ClickMole,
    Pause,
    Start,
    ForceSpawn(MoleKind),
}

fn kind() -> impl Strategy<Value = MoleKind> {
    prop_oneof![
        Just(MoleKind::Normal),
        Just(MoleKind::Golden),
        Just(MoleKind::Bomb),
    ]
}

fn penalty() -> impl Strategy<Value = Penalty> {
    (
        prop_oneof![
            Just(PenaltyMode::Score),
            Just(PenaltyMode::Lives),
            Just(PenaltyMode::None),
        ],
        0u32..4,
    )
        .prop_map(|(mode, amount)| Penalty::new(mode, amount))
}

fn input() -> impl Strategy<Value = Input> {
    prop_oneof![
        6 => (1.0f64..40.0).prop_map(Input::Frame),
        2 => (0.0f32..720.0, 0.0f32..1080.0).prop_map(|(x, y)| Input::Click(x, y)),
        3 => Just(Input::ClickMole),
        1 => Just(Input::Pause),
        1 => Just(Input::Start),
        1 => kind().prop_map(Input::ForceSpawn),
    ]
}

fn tuning_with(miss: Penalty, expiry: Penalty) -> Tuning {
    Tuning {
        session_duration_ms: 8000.0,
        miss_penalty: miss,
        expiry_penalty: expiry,
        ..Default::default()
    }
}

/// Drive a session through `inputs`, recording (score, lives, combo) after each
fn run_script(tuning: Tuning, seed: u32, inputs: &[Input]) -> (Session, Vec<(u64, u32, u32)>) {
    let mut session = Session::new(tuning, Some(seed), Box::new(MemoryStore::new())).unwrap();
    let mut ts = 0.0;
    let mut trajectory = Vec::with_capacity(inputs.len());
    session.update(ts);
    session.register_start(ts);

    for input in inputs {
        match input {
            Input::Frame(dt) => {
                ts += dt;
                session.update(ts);
            }
            Input::Click(x, y) => {
                session.register_pointer_down(*x, *y, ts);
            }
            Input::ClickMole => {
                if let Some(c) = session.mole_center() {
                    session.register_pointer_down(c.x, c.y, ts);
                }
            }
            Input::Pause => {
                session.register_pause(ts);
            }
            Input::Start => {
                session.register_start(ts);
            }
            Input::ForceSpawn(kind) => {
                session.spawn_mole(*kind);
            }
        }
        trajectory.push((session.score(), session.lives(), session.combo()));
    }
    (session, trajectory)
}

proptest! {
    #[test]
    fn prop_spawn_interval_bounded_and_non_increasing(a in 0.0f64..1e7, b in 0.0f64..1e7) {
        let tuning = Tuning::default();
        let (early, late) = if a <= b { (a, b) } else { (b, a) };
        let i_early = spawn_interval(&tuning, early);
        let i_late = spawn_interval(&tuning, late);
        prop_assert!(i_early >= tuning.spawn_interval_min_ms);
        prop_assert!(i_early <= tuning.spawn_interval_start_ms);
        prop_assert!(i_late <= i_early);
    }

    #[test]
    fn prop_visible_time_bounded_and_non_increasing(a in 0.0f64..1e7, b in 0.0f64..1e7) {
        let tuning = Tuning::default();
        let (early, late) = if a <= b { (a, b) } else { (b, a) };
        let v_early = mole_visible_time(&tuning, early);
        let v_late = mole_visible_time(&tuning, late);
        prop_assert!(v_early >= tuning.mole_visible_min_ms);
        prop_assert!(v_early <= tuning.mole_visible_start_ms);
        prop_assert!(v_late <= v_early);
    }

    /// Scoreboard agrees with a signed reference model clamped at zero
    #[test]
    fn prop_score_never_negative(
        steps in prop::collection::vec((prop::option::of(kind()), penalty(), 0.0f64..3000.0), 1..80)
    ) {
        let tuning = Tuning::default();
        let mut board = Scoreboard::new(3);
        let mut model: i64 = 0;
        let mut now = 0.0;

        for (hit, penalty, gap) in steps {
            now += gap;
            match hit {
                Some(kind) => {
                    let prev_combo = board.combo;
                    let in_streak = board.last_hit_time.is_some_and(|t| now - t < tuning.combo_timeout_ms);
                    let result = board.apply_hit(kind, now, &tuning);
                    model = (model + result.points).max(0);

                    if kind == MoleKind::Bomb {
                        prop_assert_eq!(board.combo, 0);
                    } else if in_streak {
                        prop_assert_eq!(board.combo, prev_combo + 1);
                    } else {
                        prop_assert_eq!(board.combo, 1);
                    }
                }
                None => {
                    board.apply_penalty(penalty);
                    if penalty.mode == PenaltyMode::Score {
                        model = (model - i64::from(penalty.amount)).max(0);
                    }
                    prop_assert_eq!(board.combo, 0);
                }
            }
            prop_assert_eq!(board.score as i64, model);
        }
    }

    #[test]
    fn prop_at_most_one_mole(
        inputs in prop::collection::vec(input(), 1..300),
        seed in any::<u32>(),
    ) {
        let mut session = Session::new(Tuning::default(), Some(seed), Box::new(MemoryStore::new())).unwrap();
        let mut ts = 0.0;
        session.update(ts);
        session.register_start(ts);

        for input in &inputs {
            let before = session.mole().cloned();
            match input {
                Input::Frame(dt) => {
                    ts += dt;
                    session.update(ts);
                }
                Input::ForceSpawn(kind) => {
                    let spawned = session.spawn_mole(*kind);
                    if before.is_some() {
                        // Refused, and the active mole is untouched
                        prop_assert!(!spawned);
                        prop_assert_eq!(session.mole(), before.as_ref());
                    }
                    if spawned {
                        prop_assert_eq!(session.phase(), GamePhase::Playing);
                    }
                }
                Input::ClickMole => {
                    if let Some(c) = session.mole_center() {
                        session.register_pointer_down(c.x, c.y, ts);
                    }
                }
                Input::Click(x, y) => {
                    session.register_pointer_down(*x, *y, ts);
                }
                Input::Pause => {
                    session.register_pause(ts);
                }
                Input::Start => {
                    session.register_start(ts);
                }
            }
            if let Some(mole) = session.mole() {
                prop_assert!(mole.hole_index < session.holes().len());
            }
        }
    }

    #[test]
    fn prop_lives_exhaustion_ends_session(
        inputs in prop::collection::vec(input(), 1..300),
        miss in penalty(),
        expiry in penalty(),
        seed in any::<u32>(),
    ) {
        let lives_mode = miss.mode == PenaltyMode::Lives || expiry.mode == PenaltyMode::Lives;
        let tuning = tuning_with(miss, expiry);
        let (session, trajectory) = run_script(tuning.clone(), seed, &inputs);

        for (_, lives, _) in &trajectory {
            prop_assert!(*lives <= tuning.initial_lives);
        }
        if lives_mode && session.lives() == 0 {
            prop_assert_eq!(session.phase(), GamePhase::GameOver);
        }
        prop_assert!(session.time_left_ms() >= 0.0);
        prop_assert!(session.time_left_ms() <= tuning.session_duration_ms);
    }

    #[test]
    fn prop_same_seed_same_trajectory(
        inputs in prop::collection::vec(input(), 1..300),
        miss in penalty(),
        seed in any::<u32>(),
    ) {
        let tuning = tuning_with(miss, Penalty::new(PenaltyMode::Lives, 1));
        let (a, traj_a) = run_script(tuning.clone(), seed, &inputs);
        let (b, traj_b) = run_script(tuning, seed, &inputs);
        prop_assert_eq!(traj_a, traj_b);
        prop_assert_eq!(a.snapshot(), b.snapshot());
        prop_assert_eq!(a.events(), b.events());
    }
}

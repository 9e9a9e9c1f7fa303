//! Game state and core simulation types
//!
//! `Session` is the single owner of all mutable gameplay state, including
//! the one mole slot. Other subsystems only see it through accessors.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::clock::FrameClock;
use super::events::GameEvent;
use super::layout::{Hole, Layout};
use super::rng::Mulberry32;
use super::scoring::Scoreboard;
use crate::persistence::ScoreStore;
use crate::tuning::{ConfigError, Tuning};
use crate::{ease_in_back, ease_in_quad, ease_out_back};

/// Mole base sits slightly above the hole centre (fraction of hole radius)
const MOLE_BASE_LIFT: f32 = 0.15;
/// Mole radius as a fraction of hole radius
const MOLE_RADIUS_FRACTION: f32 = 0.6;
/// Fully hidden offset as a multiple of the mole radius
const MOLE_HIDDEN_DEPTH: f32 = 1.5;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GamePhase {
    /// Idle, waiting for the first input
    Start,
    /// Fixed countdown before play, no scoring
    Countdown,
    /// Active gameplay
    Playing,
    /// All timers frozen
    Paused,
    /// Results screen
    GameOver,
}

impl GamePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            GamePhase::Start => "START",
            GamePhase::Countdown => "COUNTDOWN",
            GamePhase::Playing => "PLAYING",
            GamePhase::Paused => "PAUSED",
            GamePhase::GameOver => "GAME_OVER",
        }
    }
}

/// Mole variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoleKind {
    #[default]
    Normal,
    /// Worth more, stays up for less time
    Golden,
    /// Costs points when hit, harmless when left alone
    Bomb,
}

/// The single active target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mole {
    pub hole_index: usize,
    pub kind: MoleKind,
    pub spawn_time: f64,
    pub despawn_time: f64,
    pub hit: bool,
    pub hit_time: f64,
    /// Resting centre when fully popped up
    pub base: Vec2,
    pub radius: f32,
}

impl Mole {
    pub fn spawn(hole: &Hole, kind: MoleKind, now: f64, visible_ms: f64) -> Self {
        Self {
            hole_index: hole.index,
            kind,
            spawn_time: now,
            despawn_time: now + visible_ms,
            hit: false,
            hit_time: 0.0,
            base: Vec2::new(hole.center.x, hole.center.y - hole.radius * MOLE_BASE_LIFT),
            radius: hole.radius * MOLE_RADIUS_FRACTION,
        }
    }

    /// Downward offset from `base` for the pop/hide animation.
    ///
    /// 0 means fully up; `1.5 * radius` means fully inside the hole.
    /// Hit-testing uses the animated position, so this is gameplay state.
    pub fn vertical_offset(&self, now: f64, tuning: &Tuning) -> f32 {
        let hidden = self.radius * MOLE_HIDDEN_DEPTH;
        let pop = tuning.mole_pop_duration_ms;
        let hide = tuning.mole_hide_duration_ms;
        let elapsed = now - self.spawn_time;
        let remaining = self.despawn_time - now;

        let t = if self.hit {
            let t = if hide > 0.0 {
                ((now - self.hit_time) / hide).clamp(0.0, 1.0)
            } else {
                1.0
            };
            ease_in_quad(t)
        } else if elapsed < pop {
            1.0 - ease_out_back((elapsed / pop).clamp(0.0, 1.0))
        } else if remaining < hide && remaining > 0.0 {
            ease_in_back(1.0 - remaining / hide)
        } else {
            0.0
        };

        t as f32 * hidden
    }

    /// Animated centre at `now`
    pub fn center(&self, now: f64, tuning: &Tuning) -> Vec2 {
        Vec2::new(self.base.x, self.base.y + self.vertical_offset(now, tuning))
    }

    /// Forgiving circular hit test against the animated centre.
    ///
    /// Never true once `despawn_time` is reached, even before the next
    /// frame clears the mole.
    pub fn contains_point(&self, point: Vec2, now: f64, tuning: &Tuning) -> bool {
        if !self.hit && now >= self.despawn_time {
            return false;
        }
        let dist_sq = f64::from(point.distance_squared(self.center(now, tuning)));
        let r = f64::from(self.radius);
        dist_sq <= r * r * tuning.hit_slack
    }

    /// White flash intensity after a hit (1 right at impact, fades to 0)
    pub fn hit_flash(&self, now: f64, tuning: &Tuning) -> f32 {
        if !self.hit || tuning.hit_flash_duration_ms <= 0.0 {
            return 0.0;
        }
        let t = (now - self.hit_time) / tuning.hit_flash_duration_ms;
        (1.0 - t).clamp(0.0, 1.0) as f32
    }
}

/// One game session (START through GAME_OVER, restartable)
#[derive(Debug)]
pub struct Session {
    pub(crate) tuning: Tuning,
    pub(crate) layout: Layout,
    pub(crate) rng: Mulberry32,
    pub(crate) clock: FrameClock,
    pub(crate) store: Box<dyn ScoreStore>,

    pub(crate) phase: GamePhase,
    /// Game time the current phase was entered
    pub(crate) phase_entered_at: f64,
    /// Host timestamp of the latest frame or input
    pub(crate) host_ts: f64,
    /// Host timestamp play ended at, for the restart delay
    pub(crate) game_over_ts: f64,

    pub(crate) board: Scoreboard,
    pub(crate) time_left_ms: f64,
    pub(crate) elapsed_ms: f64,
    pub(crate) total_clicks: u32,
    pub(crate) best_score: u64,
    pub(crate) is_new_best: bool,

    pub(crate) countdown_value: u32,
    pub(crate) next_spawn_ms: f64,
    pub(crate) last_warning_second: Option<u32>,
    pub(crate) shake_until: f64,

    pub(crate) mole: Option<Mole>,
    pub(crate) events: Vec<GameEvent>,
}

impl Session {
    /// Create a session in the START phase.
    ///
    /// `seed: None` draws a fresh seed from OS entropy.
    pub fn new(
        tuning: Tuning,
        seed: Option<u32>,
        store: Box<dyn ScoreStore>,
    ) -> Result<Self, ConfigError> {
        tuning.validate()?;

        let rng = Mulberry32::from_optional_seed(seed);
        let best_score = store.load_best_score();
        log::info!(
            "Session created (seed {}, best score {})",
            rng.seed(),
            best_score
        );

        Ok(Self {
            layout: Layout::build(&tuning),
            clock: FrameClock::new(tuning.max_frame_dt_ms),
            board: Scoreboard::new(tuning.initial_lives),
            time_left_ms: tuning.session_duration_ms,
            elapsed_ms: 0.0,
            total_clicks: 0,
            best_score,
            is_new_best: false,
            countdown_value: tuning.countdown_seconds,
            next_spawn_ms: tuning.initial_spawn_delay_ms,
            last_warning_second: None,
            shake_until: 0.0,
            phase: GamePhase::Start,
            phase_entered_at: 0.0,
            host_ts: 0.0,
            game_over_ts: 0.0,
            mole: None,
            events: Vec::new(),
            rng,
            store,
            tuning,
        })
    }

    /// Reseed gameplay randomness (takes effect for the next roll)
    pub fn reseed(&mut self, seed: Option<u32>) {
        self.rng.reseed(seed);
        log::info!("Session reseeded with {}", self.rng.seed());
    }

    pub fn seed(&self) -> u32 {
        self.rng.seed()
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn holes(&self) -> &[Hole] {
        &self.layout.holes
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn score(&self) -> u64 {
        self.board.score
    }

    pub fn lives(&self) -> u32 {
        self.board.lives
    }

    pub fn combo(&self) -> u32 {
        self.board.combo
    }

    pub fn max_combo(&self) -> u32 {
        self.board.max_combo
    }

    /// Multiplier the next positive hit would get at the current combo
    pub fn combo_multiplier(&self) -> u32 {
        self.board.multiplier(self.tuning.combo_multiplier_max)
    }

    pub fn last_hit_time(&self) -> Option<f64> {
        self.board.last_hit_time
    }

    pub fn time_left_ms(&self) -> f64 {
        self.time_left_ms
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_ms
    }

    pub fn total_clicks(&self) -> u32 {
        self.total_clicks
    }

    pub fn successful_hits(&self) -> u32 {
        self.board.successful_hits
    }

    /// Fraction of clicks that hit something (0 with no clicks)
    pub fn accuracy(&self) -> f64 {
        if self.total_clicks == 0 {
            0.0
        } else {
            f64::from(self.board.successful_hits) / f64::from(self.total_clicks)
        }
    }

    pub fn best_score(&self) -> u64 {
        self.best_score
    }

    pub fn is_new_best(&self) -> bool {
        self.is_new_best
    }

    pub fn countdown_value(&self) -> u32 {
        self.countdown_value
    }

    /// Time until the scheduler next tries to spawn
    pub fn next_spawn_ms(&self) -> f64 {
        self.next_spawn_ms
    }

    /// Current game time (frozen while paused)
    pub fn now(&self) -> f64 {
        self.clock.now()
    }

    pub fn mole(&self) -> Option<&Mole> {
        self.mole.as_ref()
    }

    /// Animated centre of the active mole at the current game time
    pub fn mole_center(&self) -> Option<Vec2> {
        self.mole
            .as_ref()
            .map(|m| m.center(self.clock.now(), &self.tuning))
    }

    /// Hit-test a logical point against the active, unhit mole
    pub fn is_point_in_mole(&self, x: f32, y: f32) -> bool {
        self.mole.as_ref().is_some_and(|m| {
            !m.hit && m.contains_point(Vec2::new(x, y), self.clock.now(), &self.tuning)
        })
    }

    pub fn shake_active(&self) -> bool {
        self.clock.now() < self.shake_until
    }

    /// Events emitted since the last drain, oldest first
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Read-only view for the render pass
    pub fn snapshot(&self) -> SessionSnapshot {
        let now = self.clock.now();
        SessionSnapshot {
            phase: self.phase,
            score: self.board.score,
            best_score: self.best_score,
            is_new_best: self.is_new_best,
            lives: self.board.lives,
            time_left_ms: self.time_left_ms,
            elapsed_ms: self.elapsed_ms,
            combo: self.board.combo,
            max_combo: self.board.max_combo,
            multiplier: self.combo_multiplier(),
            countdown_value: self.countdown_value,
            total_clicks: self.total_clicks,
            successful_hits: self.board.successful_hits,
            accuracy: self.accuracy(),
            shake_active: self.shake_active(),
            mole: self.mole.as_ref().map(|m| MoleView {
                hole_index: m.hole_index,
                kind: m.kind,
                center: m.center(now, &self.tuning),
                radius: m.radius,
                hit: m.hit,
                flash: m.hit_flash(now, &self.tuning),
            }),
        }
    }
}

/// Mole as the renderer sees it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoleView {
    pub hole_index: usize,
    pub kind: MoleKind,
    pub center: Vec2,
    pub radius: f32,
    pub hit: bool,
    pub flash: f32,
}

/// Per-frame read-only state for rendering and HUD
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub phase: GamePhase,
    pub score: u64,
    pub best_score: u64,
    pub is_new_best: bool,
    pub lives: u32,
    pub time_left_ms: f64,
    pub elapsed_ms: f64,
    pub combo: u32,
    pub max_combo: u32,
    pub multiplier: u32,
    pub countdown_value: u32,
    pub total_clicks: u32,
    pub successful_hits: u32,
    pub accuracy: f64,
    pub shake_active: bool,
    pub mole: Option<MoleView>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    fn hole() -> Hole {
        Hole {
            index: 4,
            center: Vec2::new(100.0, 200.0),
            radius: 50.0,
        }
    }

    #[test]
    fn test_mole_spawn_geometry() {
        let mole = Mole::spawn(&hole(), MoleKind::Golden, 1000.0, 500.0);
        assert_eq!(mole.hole_index, 4);
        assert_eq!(mole.despawn_time, 1500.0);
        assert_eq!(mole.base, Vec2::new(100.0, 192.5));
        assert_eq!(mole.radius, 30.0);
        assert!(!mole.hit);
    }

    #[test]
    fn test_vertical_offset_pop_cycle() {
        let tuning = Tuning::default();
        let mole = Mole::spawn(&hole(), MoleKind::Normal, 0.0, 1000.0);

        // Fully hidden at spawn, fully up after the pop window
        assert!((mole.vertical_offset(0.0, &tuning) - 45.0).abs() < 1e-3);
        assert_eq!(mole.vertical_offset(500.0, &tuning), 0.0);
        // Sinking during the last hide window
        assert!(mole.vertical_offset(990.0, &tuning) > 0.0);
        // Past despawn, no offset is applied
        assert_eq!(mole.vertical_offset(1000.0, &tuning), 0.0);
    }

    #[test]
    fn test_vertical_offset_after_hit() {
        let tuning = Tuning::default();
        let mut mole = Mole::spawn(&hole(), MoleKind::Normal, 0.0, 1000.0);
        mole.hit = true;
        mole.hit_time = 400.0;
        assert_eq!(mole.vertical_offset(400.0, &tuning), 0.0);
        assert!((mole.vertical_offset(480.0, &tuning) - 45.0).abs() < 1e-3);
        assert!((mole.vertical_offset(440.0, &tuning) - 45.0 * 0.25).abs() < 1e-3);
    }

    #[test]
    fn test_hit_slack() {
        let tuning = Tuning::default();
        let mole = Mole::spawn(&hole(), MoleKind::Normal, 0.0, 1000.0);
        let now = 500.0;
        let c = mole.center(now, &tuning);
        // Just outside the radius but inside radius * sqrt(1.2)
        assert!(mole.contains_point(c + Vec2::new(32.0, 0.0), now, &tuning));
        assert!(!mole.contains_point(c + Vec2::new(33.0, 0.0), now, &tuning));
    }

    #[test]
    fn test_no_hit_after_despawn() {
        let tuning = Tuning::default();
        let mole = Mole::spawn(&hole(), MoleKind::Normal, 0.0, 1000.0);
        assert!(mole.contains_point(mole.base, 500.0, &tuning));
        assert!(!mole.contains_point(mole.base, 1000.0, &tuning));
        assert!(!mole.contains_point(mole.base, 1050.0, &tuning));
    }

    #[test]
    fn test_hit_flash_fades() {
        let tuning = Tuning::default();
        let mut mole = Mole::spawn(&hole(), MoleKind::Normal, 0.0, 1000.0);
        assert_eq!(mole.hit_flash(10.0, &tuning), 0.0);
        mole.hit = true;
        mole.hit_time = 100.0;
        assert_eq!(mole.hit_flash(100.0, &tuning), 1.0);
        assert!((mole.hit_flash(150.0, &tuning) - 0.5).abs() < 1e-6);
        assert_eq!(mole.hit_flash(300.0, &tuning), 0.0);
    }

    #[test]
    fn test_new_session_defaults() {
        let store = MemoryStore::default();
        let session = Session::new(Tuning::default(), Some(1), Box::new(store)).unwrap();
        assert_eq!(session.phase(), GamePhase::Start);
        assert_eq!(session.lives(), 3);
        assert_eq!(session.score(), 0);
        assert_eq!(session.holes().len(), 9);
        assert!(session.mole().is_none());
        assert_eq!(session.accuracy(), 0.0);
        assert_eq!(session.seed(), 1);
    }

    #[test]
    fn test_new_session_rejects_bad_tuning() {
        let tuning = Tuning {
            grid_rows: 0,
            ..Default::default()
        };
        let err = Session::new(tuning, Some(1), Box::new(MemoryStore::default())).unwrap_err();
        assert!(matches!(err, ConfigError::EmptyGrid { .. }));
    }

    #[test]
    fn test_new_session_rejects_oversized_grid() {
        let tuning = Tuning {
            grid_rows: 70_000,
            grid_cols: 70_000,
            ..Default::default()
        };
        let err = Session::new(tuning, Some(1), Box::new(MemoryStore::default())).unwrap_err();
        assert!(matches!(err, ConfigError::GridTooLarge { .. }));
    }

    #[test]
    fn test_best_score_loaded_from_store() {
        let mut store = MemoryStore::default();
        store.save_best_score(42);
        let session = Session::new(Tuning::default(), Some(1), Box::new(store)).unwrap();
        assert_eq!(session.best_score(), 42);
    }

    #[test]
    fn test_snapshot_serializes() {
        let session =
            Session::new(Tuning::default(), Some(1), Box::new(MemoryStore::default())).unwrap();
        let json = serde_json::to_string(&session.snapshot()).unwrap();
        assert!(json.contains("\"phase\":\"START\""));
        assert!(json.contains("\"mole\":null"));
    }
}

//! Per-frame update and input handling
//!
//! The host calls `Session::update` once per rendered frame, then reads the
//! snapshot and drains events. Pointer and keyboard handlers run between
//! frames and are applied atomically at the projected game time.

use glam::Vec2;

use super::difficulty::{roll_kind, spawn_interval, visible_time_for};
use super::events::{GameEvent, SoundCue};
use super::state::{GamePhase, Mole, MoleKind, Session};

/// Floating text starts this far above the mole centre
const FLOAT_TEXT_LIFT: f32 = 20.0;

/// HUD/menu actions a pointer press can trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiAction {
    /// Left START or GAME_OVER into a fresh countdown
    Start,
    Pause,
    Resume,
    /// Mute button pressed (the host owns the audio state)
    ToggleMute,
}

/// What a pointer press resolved to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerOutcome {
    Hit { kind: MoleKind, points: i64 },
    Miss,
    Ui(UiAction),
    /// Nothing happened (countdown, restart debounce)
    Ignored,
}

impl Session {
    /// Advance the simulation to host timestamp `ts` (ms).
    ///
    /// Does nothing while paused, so no time is charged for the pause.
    pub fn update(&mut self, ts: f64) {
        self.host_ts = ts;
        if self.phase == GamePhase::Paused {
            return;
        }

        let dt = self.clock.advance(ts);
        let now = self.clock.now();

        match self.phase {
            GamePhase::Countdown => self.update_countdown(now),
            GamePhase::Playing => self.update_playing(now, dt),
            GamePhase::Start | GamePhase::Paused | GamePhase::GameOver => {}
        }
    }

    /// Pointer press at logical game-space coordinates
    pub fn register_pointer_down(&mut self, x: f32, y: f32, ts: f64) -> PointerOutcome {
        self.host_ts = ts;
        let now = self.clock.project(ts);
        let point = Vec2::new(x, y);

        match self.phase {
            GamePhase::Start => {
                self.start_countdown(now);
                return PointerOutcome::Ui(UiAction::Start);
            }
            GamePhase::GameOver => {
                if self.restart_allowed(ts) {
                    self.start_countdown(now);
                    return PointerOutcome::Ui(UiAction::Start);
                }
                return PointerOutcome::Ignored;
            }
            _ => {}
        }

        if self.layout.mute_button.contains(point) {
            return PointerOutcome::Ui(UiAction::ToggleMute);
        }

        if matches!(self.phase, GamePhase::Playing | GamePhase::Paused)
            && self.layout.pause_button.contains(point)
        {
            return match self.toggle_pause(ts) {
                Some(action) => PointerOutcome::Ui(action),
                None => PointerOutcome::Ignored,
            };
        }

        // Any press on the pause overlay resumes
        if self.phase == GamePhase::Paused {
            self.resume(ts);
            return PointerOutcome::Ui(UiAction::Resume);
        }

        if self.phase != GamePhase::Playing {
            return PointerOutcome::Ignored;
        }

        self.total_clicks += 1;

        let on_mole = self
            .mole
            .as_ref()
            .is_some_and(|m| !m.hit && m.contains_point(point, now, &self.tuning));
        if on_mole {
            if let Some((kind, points)) = self.hit_mole(now) {
                return PointerOutcome::Hit { kind, points };
            }
        }

        self.click_miss(point, now);
        PointerOutcome::Miss
    }

    /// Pause key. Toggles PLAYING/PAUSED; returns `false` in any other phase.
    pub fn register_pause(&mut self, ts: f64) -> bool {
        self.host_ts = ts;
        self.toggle_pause(ts).is_some()
    }

    /// Start key. Starts from START, or restarts from GAME_OVER once the
    /// restart delay has passed.
    pub fn register_start(&mut self, ts: f64) -> bool {
        self.host_ts = ts;
        let now = self.clock.project(ts);
        let allowed = match self.phase {
            GamePhase::Start => true,
            GamePhase::GameOver => self.restart_allowed(ts),
            _ => false,
        };
        if allowed {
            self.start_countdown(now);
        }
        allowed
    }

    /// Put a mole of `kind` in a random hole.
    ///
    /// Refused (returns `false`) while a mole is active or outside PLAYING.
    pub fn spawn_mole(&mut self, kind: MoleKind) -> bool {
        if self.mole.is_some() || self.phase != GamePhase::Playing {
            log::trace!("Spawn refused ({}, occupied={})", self.phase.as_str(), self.mole.is_some());
            return false;
        }

        let now = self.clock.now();
        let idx = self.rng.next_index(self.layout.holes.len());
        let Some(hole) = self.layout.hole(idx).copied() else {
            return false;
        };
        let visible_ms = visible_time_for(&self.tuning, kind, self.elapsed_ms);

        self.mole = Some(Mole::spawn(&hole, kind, now, visible_ms));
        log::debug!(
            "Spawned {:?} mole in hole {} for {:.0}ms at {:.0}ms",
            kind,
            hole.index,
            visible_ms,
            self.elapsed_ms
        );
        self.emit(GameEvent::MoleSpawned {
            hole: hole.index,
            kind,
            visible_ms,
        });
        self.emit(GameEvent::sound(SoundCue::Spawn));
        true
    }

    fn update_countdown(&mut self, now: f64) {
        let elapsed = now - self.phase_entered_at;
        let passed = (elapsed / 1000.0).floor() as i64;
        let value = i64::from(self.tuning.countdown_seconds) - passed;

        if value > 0 && value != i64::from(self.countdown_value) {
            self.countdown_value = value as u32;
            self.emit(GameEvent::CountdownTick {
                value: self.countdown_value,
            });
            self.emit(GameEvent::sound(SoundCue::Countdown));
        }

        if elapsed >= self.tuning.countdown_ms() {
            self.start_playing(now);
        }
    }

    fn update_playing(&mut self, now: f64, dt: f64) {
        self.elapsed_ms += dt;
        self.time_left_ms -= dt;

        let secs_left = (self.time_left_ms / 1000.0).ceil();
        if secs_left > 0.0 && secs_left <= f64::from(self.tuning.warning_seconds) {
            let secs_left = secs_left as u32;
            if self.last_warning_second != Some(secs_left) {
                self.last_warning_second = Some(secs_left);
                self.emit(GameEvent::sound(SoundCue::Warning));
            }
        }

        if self.time_left_ms <= 0.0 {
            self.time_left_ms = 0.0;
            self.end(now);
            return;
        }

        // Spawn scheduling
        self.next_spawn_ms -= dt;
        if self.next_spawn_ms <= 0.0 && self.mole.is_none() {
            let kind = roll_kind(&self.tuning, self.rng.next_f64());
            self.spawn_mole(kind);
            self.next_spawn_ms = spawn_interval(&self.tuning, self.elapsed_ms);
        }

        self.expire_mole(now);
    }

    /// Clear a hit mole once it has sunk, or an unhit one at despawn time
    fn expire_mole(&mut self, now: f64) {
        let Some(mole) = &self.mole else { return };

        if mole.hit {
            if now >= mole.hit_time + self.tuning.mole_hide_duration_ms {
                self.mole = None;
            }
            return;
        }

        if now < mole.despawn_time {
            return;
        }

        let (hole, kind) = (mole.hole_index, mole.kind);
        self.mole = None;

        // Bombs are meant to be avoided, letting one go is free
        let penalized = kind != MoleKind::Bomb;
        log::debug!("{kind:?} mole escaped from hole {hole}");
        self.emit(GameEvent::MoleEscaped {
            hole,
            kind,
            penalized,
        });
        if penalized && self.board.apply_penalty(self.tuning.expiry_penalty) {
            self.end(now);
        }
    }

    /// Score the active mole; `None` if there is no hittable mole
    fn hit_mole(&mut self, now: f64) -> Option<(MoleKind, i64)> {
        let mole = self.mole.as_mut().filter(|m| !m.hit)?;
        mole.hit = true;
        mole.hit_time = now;
        let (hole, kind) = (mole.hole_index, mole.kind);
        let pos = mole.center(now, &self.tuning);

        let result = self.board.apply_hit(kind, now, &self.tuning);
        log::debug!(
            "Hit {:?} in hole {}: {} (combo {}, score {})",
            kind,
            hole,
            result.label,
            result.combo,
            self.board.score
        );

        if result.combo_cue {
            self.emit(GameEvent::sound(SoundCue::Combo));
        }
        self.emit(GameEvent::sound(SoundCue::for_hit(kind)));
        self.emit(GameEvent::MoleHit {
            hole,
            kind,
            points: result.points,
            combo: result.combo,
        });
        self.emit(GameEvent::FloatingText {
            pos: pos - Vec2::new(0.0, FLOAT_TEXT_LIFT),
            text: result.label,
            kind,
        });
        self.emit(GameEvent::ParticleBurst { pos, kind });

        let shake_mult = if kind == MoleKind::Bomb {
            self.tuning.bomb_shake_mult
        } else {
            1.0
        };
        let duration_ms = self.tuning.shake_duration_ms * shake_mult;
        self.shake_until = now + duration_ms;
        self.emit(GameEvent::ScreenShake { duration_ms });

        Some((kind, result.points))
    }

    fn click_miss(&mut self, pos: Vec2, now: f64) {
        let out_of_lives = self.board.apply_penalty(self.tuning.miss_penalty);
        log::debug!(
            "Miss click at ({:.0}, {:.0}), score {}, lives {}",
            pos.x,
            pos.y,
            self.board.score,
            self.board.lives
        );
        self.emit(GameEvent::MissClick { pos });
        self.emit(GameEvent::sound(SoundCue::Miss));
        if out_of_lives {
            self.end(now);
        }
    }

    fn toggle_pause(&mut self, ts: f64) -> Option<UiAction> {
        match self.phase {
            GamePhase::Playing => {
                self.pause();
                Some(UiAction::Pause)
            }
            GamePhase::Paused => {
                self.resume(ts);
                Some(UiAction::Resume)
            }
            _ => None,
        }
    }

    fn pause(&mut self) {
        if self.phase == GamePhase::Playing {
            self.set_phase(GamePhase::Paused);
            log::info!("Paused at {:.0}ms left", self.time_left_ms);
        }
    }

    fn resume(&mut self, ts: f64) {
        if self.phase == GamePhase::Paused {
            // The paused interval is never charged to game time
            self.clock.reanchor(ts);
            self.set_phase(GamePhase::Playing);
            log::info!("Resumed");
        }
    }

    /// Measured in host time; the frame clamp does not apply to input
    fn restart_allowed(&self, ts: f64) -> bool {
        ts - self.game_over_ts > self.tuning.restart_delay_ms
    }

    fn start_countdown(&mut self, now: f64) {
        self.board = super::scoring::Scoreboard::new(self.tuning.initial_lives);
        self.time_left_ms = self.tuning.session_duration_ms;
        self.elapsed_ms = 0.0;
        self.total_clicks = 0;
        self.is_new_best = false;
        self.countdown_value = self.tuning.countdown_seconds;
        self.next_spawn_ms = self.tuning.initial_spawn_delay_ms;
        self.last_warning_second = None;
        self.shake_until = 0.0;
        self.mole = None;

        self.phase_entered_at = now;
        self.set_phase(GamePhase::Countdown);
        log::info!("Countdown started (seed {})", self.rng.seed());
    }

    fn start_playing(&mut self, now: f64) {
        self.phase_entered_at = now;
        self.next_spawn_ms = self.tuning.initial_spawn_delay_ms;
        self.set_phase(GamePhase::Playing);
        self.emit(GameEvent::sound(SoundCue::Go));
        log::info!("Playing");
    }

    fn end(&mut self, now: f64) {
        self.phase_entered_at = now;
        self.game_over_ts = self.host_ts;
        self.mole = None;
        self.set_phase(GamePhase::GameOver);

        let score = self.board.score;
        if score > self.best_score {
            self.best_score = score;
            self.is_new_best = true;
            self.store.save_best_score(score);
            self.emit(GameEvent::NewRecord { score });
            self.emit(GameEvent::sound(SoundCue::NewBest));
            log::info!("Game over - new best score {score}");
        } else {
            self.emit(GameEvent::sound(SoundCue::GameOver));
            log::info!("Game over - score {score} (best {})", self.best_score);
        }
    }

    fn set_phase(&mut self, to: GamePhase) {
        let from = self.phase;
        self.phase = to;
        self.emit(GameEvent::PhaseChanged { from, to });
    }
}

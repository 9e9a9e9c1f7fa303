//! Score, lives and combo arithmetic
//!
//! Rules:
//! - A hit within `combo_timeout_ms` of the previous hit extends the combo,
//!   otherwise the combo restarts at 1.
//! - Normal is worth 1, Golden `golden_points`, Bomb `-bomb_penalty`.
//! - Positive points are multiplied by `min(combo, combo_multiplier_max)`
//!   when the combo is above 1.
//! - Bomb hits, misses and penalised expiries break the combo.
//! - Score is floored at 0, lives at 0.

use serde::{Deserialize, Serialize};

use super::state::MoleKind;
use crate::tuning::{Penalty, PenaltyMode, Tuning};

/// Outcome of scoring one hit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HitResult {
    /// Points after the multiplier (negative for bombs)
    pub points: i64,
    /// Combo after the hit (0 after a bomb)
    pub combo: u32,
    /// Multiplier that was applied (1 when none)
    pub multiplier: u32,
    /// The hit extended an existing streak past 1
    pub combo_cue: bool,
    /// Floating text, e.g. `+3 x3` or `-2`
    pub label: String,
}

/// The mutable scoring part of a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scoreboard {
    pub score: u64,
    pub lives: u32,
    pub combo: u32,
    pub max_combo: u32,
    /// Game time of the previous hit (`None` before the first hit)
    pub last_hit_time: Option<f64>,
    pub successful_hits: u32,
}

impl Scoreboard {
    pub fn new(lives: u32) -> Self {
        Self {
            score: 0,
            lives,
            combo: 0,
            max_combo: 0,
            last_hit_time: None,
            successful_hits: 0,
        }
    }

    /// Current multiplier, capped at `max`
    pub fn multiplier(&self, max: u32) -> u32 {
        self.combo.min(max)
    }

    /// Score a hit on a mole of `kind` at game time `now`
    pub fn apply_hit(&mut self, kind: MoleKind, now: f64, tuning: &Tuning) -> HitResult {
        self.successful_hits += 1;

        let in_streak = self
            .last_hit_time
            .is_some_and(|last| now - last < tuning.combo_timeout_ms);
        self.combo = if in_streak { self.combo + 1 } else { 1 };
        self.max_combo = self.max_combo.max(self.combo);
        self.last_hit_time = Some(now);
        let combo_cue = self.combo > 1;

        let mut points: i64 = match kind {
            MoleKind::Normal => 1,
            MoleKind::Golden => i64::from(tuning.golden_points),
            MoleKind::Bomb => -i64::from(tuning.bomb_penalty),
        };
        if kind == MoleKind::Bomb {
            self.combo = 0;
        }

        let mut multiplier = 1;
        if points > 0 && self.combo > 1 {
            multiplier = self.multiplier(tuning.combo_multiplier_max);
            points *= i64::from(multiplier);
        }

        self.add_points(points);

        HitResult {
            points,
            combo: self.combo,
            multiplier,
            combo_cue,
            label: points_label(points, multiplier),
        }
    }

    /// Apply a penalty rule and break the combo.
    ///
    /// Returns `true` when the penalty drained the last life.
    pub fn apply_penalty(&mut self, penalty: Penalty) -> bool {
        self.combo = 0;
        match penalty.mode {
            PenaltyMode::Score => {
                self.score = self.score.saturating_sub(u64::from(penalty.amount));
                false
            }
            PenaltyMode::Lives => {
                self.lives = self.lives.saturating_sub(penalty.amount);
                self.lives == 0
            }
            PenaltyMode::None => false,
        }
    }

    fn add_points(&mut self, points: i64) {
        if points >= 0 {
            self.score = self.score.saturating_add(points.unsigned_abs());
        } else {
            self.score = self.score.saturating_sub(points.unsigned_abs());
        }
    }
}

/// Floating text for a scored hit
pub fn points_label(points: i64, multiplier: u32) -> String {
    let mut label = if points > 0 {
        format!("+{points}")
    } else {
        format!("{points}")
    };
    if multiplier > 1 {
        label.push_str(&format!(" x{multiplier}"));
    }
    label
}

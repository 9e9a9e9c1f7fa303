//! Data-driven game balance
//!
//! Every constant the simulation depends on lives in [`Tuning`]. Defaults
//! reproduce the reference balance; a JSON document can override any subset
//! of fields (missing fields keep their defaults).

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// What a penalty takes away from the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PenaltyMode {
    #[default]
    Score,
    Lives,
    None,
}

impl PenaltyMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PenaltyMode::Score => "score",
            PenaltyMode::Lives => "lives",
            PenaltyMode::None => "none",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "score" => Some(PenaltyMode::Score),
            "lives" => Some(PenaltyMode::Lives),
            "none" => Some(PenaltyMode::None),
            _ => None,
        }
    }
}

/// A penalty rule: mode plus how much to take
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Penalty {
    pub mode: PenaltyMode,
    pub amount: u32,
}

impl Penalty {
    pub const fn new(mode: PenaltyMode, amount: u32) -> Self {
        Self { mode, amount }
    }
}

/// Upper bound on `grid_rows * grid_cols`
pub const MAX_HOLES: u32 = 1024;

/// Rejected configuration
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{field} must be a positive finite number, got {value}")]
    NotPositive { field: &'static str, value: f64 },

    #[error("{field} must be finite and non-negative, got {value}")]
    Negative { field: &'static str, value: f64 },

    #[error("{min_field} ({min}) must not exceed {max_field} ({max})")]
    InvertedRange {
        min_field: &'static str,
        min: f64,
        max_field: &'static str,
        max: f64,
    },

    #[error("{field} must be a probability in [0, 1], got {value}")]
    BadChance { field: &'static str, value: f64 },

    #[error("golden_chance + bomb_chance must not exceed 1, got {0}")]
    ChanceSum(f64),

    #[error("golden_visible_mult must be in (0, 1], got {0}")]
    BadVisibleMult(f64),

    #[error("combo_multiplier_max must be at least 1")]
    ZeroMultiplier,

    #[error("hit_slack must be at least 1, got {0}")]
    HitSlackTooSmall(f64),

    #[error("grid must have at least one row and one column, got {rows}x{cols}")]
    EmptyGrid { rows: u32, cols: u32 },

    #[error("grid of {rows}x{cols} exceeds {max} holes", max = MAX_HOLES)]
    GridTooLarge { rows: u32, cols: u32 },

    #[error("initial_lives must be at least 1 when a penalty uses lives")]
    NoLives,

    #[error("invalid tuning JSON: {0}")]
    Json(String),
}

/// Complete balance and layout configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Layout (logical game space) ===
    pub logical_width: f32,
    pub logical_height: f32,
    pub grid_rows: u32,
    pub grid_cols: u32,
    pub grid_padding: f32,
    pub grid_top_offset: f32,
    pub hud_margin: f32,
    pub hud_height: f32,
    pub hud_button_radius: f32,

    // === Session timing ===
    pub session_duration_ms: f64,
    pub initial_lives: u32,
    pub countdown_seconds: u32,
    /// Delay before the first spawn once play begins
    pub initial_spawn_delay_ms: f64,

    // === Difficulty ramp ===
    pub spawn_interval_start_ms: f64,
    pub spawn_interval_min_ms: f64,
    pub spawn_interval_ramp_per_sec: f64,
    pub mole_visible_start_ms: f64,
    pub mole_visible_min_ms: f64,
    pub mole_visible_ramp_per_sec: f64,

    // === Special moles ===
    pub golden_chance: f64,
    pub golden_points: u32,
    /// Fraction of the normal visible time a golden mole stays up
    pub golden_visible_mult: f64,
    pub bomb_chance: f64,
    pub bomb_penalty: u32,

    // === Combo ===
    pub combo_timeout_ms: f64,
    pub combo_multiplier_max: u32,

    // === Animation windows that affect gameplay ===
    pub mole_pop_duration_ms: f64,
    pub mole_hide_duration_ms: f64,
    pub hit_flash_duration_ms: f64,
    pub shake_duration_ms: f64,
    pub shake_intensity: f32,
    pub bomb_shake_mult: f64,

    // === Input ===
    /// Hitbox forgiveness: squared radius is scaled by this
    pub hit_slack: f64,
    /// Minimum time in GAME_OVER before a restart is accepted
    pub restart_delay_ms: f64,

    /// Final seconds that emit a warning cue each second
    pub warning_seconds: u32,
    /// Largest frame delta charged to the simulation
    pub max_frame_dt_ms: f64,

    // === Penalties ===
    /// Applied when a click lands on nothing
    pub miss_penalty: Penalty,
    /// Applied when a non-bomb mole leaves unhit
    pub expiry_penalty: Penalty,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            logical_width: 720.0,
            logical_height: 1080.0,
            grid_rows: 3,
            grid_cols: 3,
            grid_padding: 70.0,
            grid_top_offset: 280.0,
            hud_margin: 24.0,
            hud_height: 72.0,
            hud_button_radius: 22.0,

            session_duration_ms: 60_000.0,
            initial_lives: 3,
            countdown_seconds: 3,
            initial_spawn_delay_ms: 300.0,

            spawn_interval_start_ms: 900.0,
            spawn_interval_min_ms: 350.0,
            spawn_interval_ramp_per_sec: 8.0,
            mole_visible_start_ms: 1000.0,
            mole_visible_min_ms: 500.0,
            mole_visible_ramp_per_sec: 5.0,

            golden_chance: 0.10,
            golden_points: 3,
            golden_visible_mult: 0.5,
            bomb_chance: 0.08,
            bomb_penalty: 2,

            combo_timeout_ms: 1500.0,
            combo_multiplier_max: 5,

            mole_pop_duration_ms: 120.0,
            mole_hide_duration_ms: 80.0,
            hit_flash_duration_ms: 100.0,
            shake_duration_ms: 150.0,
            shake_intensity: 4.0,
            bomb_shake_mult: 2.0,

            hit_slack: 1.2,
            restart_delay_ms: 500.0,

            warning_seconds: 10,
            max_frame_dt_ms: 100.0,

            miss_penalty: Penalty::new(PenaltyMode::Score, 1),
            expiry_penalty: Penalty::new(PenaltyMode::Lives, 1),
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON override and validate the result
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let tuning: Tuning =
            serde_json::from_str(json).map_err(|e| ConfigError::Json(e.to_string()))?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Check every field; the first violation found is returned
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("logical_width", f64::from(self.logical_width))?;
        positive("logical_height", f64::from(self.logical_height))?;
        if self.grid_rows == 0 || self.grid_cols == 0 {
            return Err(ConfigError::EmptyGrid {
                rows: self.grid_rows,
                cols: self.grid_cols,
            });
        }
        let holes = self.grid_rows.checked_mul(self.grid_cols);
        if holes.is_none_or(|n| n > MAX_HOLES) {
            return Err(ConfigError::GridTooLarge {
                rows: self.grid_rows,
                cols: self.grid_cols,
            });
        }
        non_negative("grid_padding", f64::from(self.grid_padding))?;
        non_negative("grid_top_offset", f64::from(self.grid_top_offset))?;
        positive("hud_button_radius", f64::from(self.hud_button_radius))?;

        positive("session_duration_ms", self.session_duration_ms)?;
        non_negative("initial_spawn_delay_ms", self.initial_spawn_delay_ms)?;

        positive("spawn_interval_min_ms", self.spawn_interval_min_ms)?;
        positive("spawn_interval_start_ms", self.spawn_interval_start_ms)?;
        ordered(
            ("spawn_interval_min_ms", self.spawn_interval_min_ms),
            ("spawn_interval_start_ms", self.spawn_interval_start_ms),
        )?;
        non_negative("spawn_interval_ramp_per_sec", self.spawn_interval_ramp_per_sec)?;

        positive("mole_visible_min_ms", self.mole_visible_min_ms)?;
        positive("mole_visible_start_ms", self.mole_visible_start_ms)?;
        ordered(
            ("mole_visible_min_ms", self.mole_visible_min_ms),
            ("mole_visible_start_ms", self.mole_visible_start_ms),
        )?;
        non_negative("mole_visible_ramp_per_sec", self.mole_visible_ramp_per_sec)?;

        chance("golden_chance", self.golden_chance)?;
        chance("bomb_chance", self.bomb_chance)?;
        let sum = self.golden_chance + self.bomb_chance;
        if sum > 1.0 {
            return Err(ConfigError::ChanceSum(sum));
        }
        if !(self.golden_visible_mult > 0.0 && self.golden_visible_mult <= 1.0) {
            return Err(ConfigError::BadVisibleMult(self.golden_visible_mult));
        }

        positive("combo_timeout_ms", self.combo_timeout_ms)?;
        if self.combo_multiplier_max == 0 {
            return Err(ConfigError::ZeroMultiplier);
        }

        non_negative("mole_pop_duration_ms", self.mole_pop_duration_ms)?;
        non_negative("mole_hide_duration_ms", self.mole_hide_duration_ms)?;
        non_negative("hit_flash_duration_ms", self.hit_flash_duration_ms)?;
        non_negative("shake_duration_ms", self.shake_duration_ms)?;
        non_negative("bomb_shake_mult", self.bomb_shake_mult)?;

        if !(self.hit_slack >= 1.0 && self.hit_slack.is_finite()) {
            return Err(ConfigError::HitSlackTooSmall(self.hit_slack));
        }
        non_negative("restart_delay_ms", self.restart_delay_ms)?;
        positive("max_frame_dt_ms", self.max_frame_dt_ms)?;

        let uses_lives = self.miss_penalty.mode == PenaltyMode::Lives
            || self.expiry_penalty.mode == PenaltyMode::Lives;
        if uses_lives && self.initial_lives == 0 {
            return Err(ConfigError::NoLives);
        }

        Ok(())
    }

    /// Countdown length in milliseconds
    pub fn countdown_ms(&self) -> f64 {
        f64::from(self.countdown_seconds) * 1000.0
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { field, value })
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { field, value })
    }
}

fn ordered(min: (&'static str, f64), max: (&'static str, f64)) -> Result<(), ConfigError> {
    if min.1 <= max.1 {
        Ok(())
    } else {
        Err(ConfigError::InvertedRange {
            min_field: min.0,
            min: min.1,
            max_field: max.0,
            max: max.1,
        })
    }
}

fn chance(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::BadChance { field, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert_eq!(Tuning::default().validate(), Ok(()));
    }

    #[test]
    fn test_negative_duration_rejected() {
        let tuning = Tuning {
            session_duration_ms: -5.0,
            ..Default::default()
        };
        assert_eq!(
            tuning.validate(),
            Err(ConfigError::NotPositive {
                field: "session_duration_ms",
                value: -5.0
            })
        );
    }

    #[test]
    fn test_chance_sum_rejected() {
        let tuning = Tuning {
            golden_chance: 0.6,
            bomb_chance: 0.5,
            ..Default::default()
        };
        assert!(matches!(tuning.validate(), Err(ConfigError::ChanceSum(_))));
    }

    #[test]
    fn test_inverted_spawn_range_rejected() {
        let tuning = Tuning {
            spawn_interval_min_ms: 1000.0,
            spawn_interval_start_ms: 900.0,
            ..Default::default()
        };
        let err = tuning.validate().unwrap_err();
        assert!(err.to_string().contains("spawn_interval_min_ms"));
    }

    #[test]
    fn test_nan_rejected() {
        let tuning = Tuning {
            combo_timeout_ms: f64::NAN,
            ..Default::default()
        };
        assert!(tuning.validate().is_err());
    }

    #[test]
    fn test_oversized_grid_rejected() {
        let tuning = Tuning {
            grid_rows: 70_000,
            grid_cols: 70_000,
            ..Default::default()
        };
        assert_eq!(
            tuning.validate(),
            Err(ConfigError::GridTooLarge {
                rows: 70_000,
                cols: 70_000
            })
        );

        let tuning = Tuning {
            grid_rows: 32,
            grid_cols: 32,
            ..Default::default()
        };
        assert_eq!(tuning.validate(), Ok(()));
    }

    #[test]
    fn test_lives_mode_needs_lives() {
        let tuning = Tuning {
            initial_lives: 0,
            ..Default::default()
        };
        assert_eq!(tuning.validate(), Err(ConfigError::NoLives));

        let tuning = Tuning {
            initial_lives: 0,
            miss_penalty: Penalty::new(PenaltyMode::Score, 1),
            expiry_penalty: Penalty::new(PenaltyMode::None, 0),
            ..Default::default()
        };
        assert_eq!(tuning.validate(), Ok(()));
    }

    #[test]
    fn test_partial_json_override() {
        let tuning = Tuning::from_json(
            r#"{ "initial_lives": 5, "miss_penalty": { "mode": "lives", "amount": 2 } }"#,
        )
        .unwrap();
        assert_eq!(tuning.initial_lives, 5);
        assert_eq!(tuning.miss_penalty, Penalty::new(PenaltyMode::Lives, 2));
        assert_eq!(tuning.session_duration_ms, 60_000.0);
    }

    #[test]
    fn test_json_validation_applies() {
        let err = Tuning::from_json(r#"{ "hit_slack": 0.5 }"#).unwrap_err();
        assert_eq!(err, ConfigError::HitSlackTooSmall(0.5));
        assert!(matches!(
            Tuning::from_json("not json"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn test_penalty_mode_names() {
        for mode in [PenaltyMode::Score, PenaltyMode::Lives, PenaltyMode::None] {
            assert_eq!(PenaltyMode::from_str(mode.as_str()), Some(mode));
        }
        assert_eq!(PenaltyMode::from_str("LIVES"), Some(PenaltyMode::Lives));
        assert_eq!(PenaltyMode::from_str("hp"), None);
    }
}

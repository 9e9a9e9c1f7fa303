//! Difficulty ramp
//!
//! Pure functions of elapsed play time. Both curves fall linearly from their
//! start value and are floor-clamped, so they never increase over a session.

use super::state::MoleKind;
use crate::tuning::Tuning;

/// Time between spawn attempts at `elapsed_ms` into play
pub fn spawn_interval(tuning: &Tuning, elapsed_ms: f64) -> f64 {
    linear_ramp(
        tuning.spawn_interval_start_ms,
        tuning.spawn_interval_min_ms,
        tuning.spawn_interval_ramp_per_sec,
        elapsed_ms,
    )
}

/// How long a normal mole stays up at `elapsed_ms` into play
pub fn mole_visible_time(tuning: &Tuning, elapsed_ms: f64) -> f64 {
    linear_ramp(
        tuning.mole_visible_start_ms,
        tuning.mole_visible_min_ms,
        tuning.mole_visible_ramp_per_sec,
        elapsed_ms,
    )
}

/// Visible time adjusted for the mole kind (golden moles are shorter-lived)
pub fn visible_time_for(tuning: &Tuning, kind: MoleKind, elapsed_ms: f64) -> f64 {
    let base = mole_visible_time(tuning, elapsed_ms);
    match kind {
        MoleKind::Golden => base * tuning.golden_visible_mult,
        MoleKind::Normal | MoleKind::Bomb => base,
    }
}

/// Map a uniform roll in [0, 1) to a mole kind.
///
/// `[0, golden)` is Golden, `[golden, golden + bomb)` is Bomb, the rest Normal.
pub fn roll_kind(tuning: &Tuning, roll: f64) -> MoleKind {
    if roll < tuning.golden_chance {
        MoleKind::Golden
    } else if roll < tuning.golden_chance + tuning.bomb_chance {
        MoleKind::Bomb
    } else {
        MoleKind::Normal
    }
}

fn linear_ramp(start: f64, min: f64, per_sec: f64, elapsed_ms: f64) -> f64 {
    let reduced = start - (elapsed_ms / 1000.0) * per_sec;
    reduced.max(min).min(start)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_interval_ramp() {
        let tuning = Tuning::default();
        assert_eq!(spawn_interval(&tuning, 0.0), 900.0);
        assert_eq!(spawn_interval(&tuning, 10_000.0), 820.0);
        assert_eq!(spawn_interval(&tuning, 60_000.0), 420.0);
        // Floor reached after ~68.75s
        assert_eq!(spawn_interval(&tuning, 120_000.0), 350.0);
    }

    #[test]
    fn test_visible_time_ramp() {
        let tuning = Tuning::default();
        assert_eq!(mole_visible_time(&tuning, 0.0), 1000.0);
        assert_eq!(mole_visible_time(&tuning, 30_000.0), 850.0);
        assert_eq!(mole_visible_time(&tuning, 500_000.0), 500.0);
    }

    #[test]
    fn test_negative_elapsed_clamps_to_start() {
        let tuning = Tuning::default();
        assert_eq!(spawn_interval(&tuning, -5000.0), 900.0);
        assert_eq!(mole_visible_time(&tuning, -5000.0), 1000.0);
    }

    #[test]
    fn test_golden_is_shorter() {
        let tuning = Tuning::default();
        assert_eq!(visible_time_for(&tuning, MoleKind::Golden, 0.0), 500.0);
        assert_eq!(visible_time_for(&tuning, MoleKind::Bomb, 0.0), 1000.0);
        assert_eq!(visible_time_for(&tuning, MoleKind::Normal, 0.0), 1000.0);
    }

    #[test]
    fn test_roll_kind_bands() {
        let tuning = Tuning::default();
        assert_eq!(roll_kind(&tuning, 0.0), MoleKind::Golden);
        assert_eq!(roll_kind(&tuning, 0.099), MoleKind::Golden);
        assert_eq!(roll_kind(&tuning, 0.10), MoleKind::Bomb);
        assert_eq!(roll_kind(&tuning, 0.179), MoleKind::Bomb);
        assert_eq!(roll_kind(&tuning, 0.181), MoleKind::Normal);
        assert_eq!(roll_kind(&tuning, 0.9999), MoleKind::Normal);
    }
}

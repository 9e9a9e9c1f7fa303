//! Whack-a-Mole - A timed single-screen reflex game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (session state machine, scoring, spawns)
//! - `tuning`: Data-driven game balance
//! - `persistence`: Best score storage behind a swallow-all-failures contract
//! - `settings`: Player preferences (mute, volumes, motion)
//! - `effects`: Cosmetic particle/text/confetti pools driven by sim events
//! - `platform`: Browser/native platform glue
//! - `web`: wasm-bindgen facade for the browser host

pub mod effects;
pub mod persistence;
pub mod platform;
pub mod settings;
pub mod sim;
pub mod tuning;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use effects::Effects;
pub use settings::Settings;
pub use sim::{GameEvent, GamePhase, MoleKind, PointerOutcome, Session, SoundCue};
pub use tuning::{ConfigError, Penalty, PenaltyMode, Tuning};

/// Game configuration constants
pub mod consts {
    /// Seed used by the demo binary when none is given
    pub const DEFAULT_DEMO_SEED: u32 = 1;
    /// Frame step the headless demo drives the session at (60 Hz)
    pub const DEMO_FRAME_MS: f64 = 1000.0 / 60.0;

    /// Overshoot constant shared by the back easings
    pub const BACK_OVERSHOOT: f64 = 1.70158;
}

/// Ease out with a slight overshoot past 1 before settling
#[inline]
pub fn ease_out_back(t: f64) -> f64 {
    let c1 = consts::BACK_OVERSHOOT;
    let c3 = c1 + 1.0;
    let u = t - 1.0;
    1.0 + c3 * u * u * u + c1 * u * u
}

/// Ease in with a slight dip below 0 before accelerating
#[inline]
pub fn ease_in_back(t: f64) -> f64 {
    let c1 = consts::BACK_OVERSHOOT;
    let c3 = c1 + 1.0;
    c3 * t * t * t - c1 * t * t
}

#[inline]
pub fn ease_in_quad(t: f64) -> f64 {
    t * t
}

#[inline]
pub fn ease_out_cubic(t: f64) -> f64 {
    let u = 1.0 - t;
    1.0 - u * u * u
}

/// Format remaining time as `M:SS` (rounded up to the whole second)
pub fn format_time(ms: f64) -> String {
    let total = (ms.max(0.0) / 1000.0).ceil() as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_easing_endpoints() {
        for f in [ease_out_back, ease_in_back, ease_in_quad, ease_out_cubic] {
            assert!(f(0.0).abs() < 1e-12);
            assert!((f(1.0) - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_back_easings_overshoot() {
        assert!(ease_out_back(0.8) > 1.0);
        assert!(ease_in_back(0.2) < 0.0);
    }

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(60_000.0), "1:00");
        assert_eq!(format_time(59_001.0), "1:00");
        assert_eq!(format_time(9_500.0), "0:10");
        assert_eq!(format_time(0.0), "0:00");
        assert_eq!(format_time(-20.0), "0:00");
    }
}

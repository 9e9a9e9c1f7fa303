//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Host timestamps in, game time out (no wall clock reads)
//! - Seeded RNG only
//! - One mole at a time, owned by `Session`
//! - No rendering, audio or platform dependencies

pub mod clock;
pub mod difficulty;
pub mod events;
pub mod layout;
pub mod rng;
pub mod scoring;
pub mod state;
pub mod tick;

pub use clock::FrameClock;
pub use difficulty::{mole_visible_time, roll_kind, spawn_interval, visible_time_for};
pub use events::{GameEvent, SoundCue};
pub use layout::{Button, Hole, Layout};
pub use rng::Mulberry32;
pub use scoring::{HitResult, Scoreboard, points_label};
pub use state::{GamePhase, Mole, MoleKind, MoleView, Session, SessionSnapshot};
pub use tick::{PointerOutcome, UiAction};

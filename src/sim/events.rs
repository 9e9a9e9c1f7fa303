//! Events emitted by the simulation for audio, effects and storage hosts
//!
//! The core never plays sounds or draws particles itself; it queues events
//! and the host drains them once per frame after `Session::update`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{GamePhase, MoleKind};

/// Named audio cue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SoundCue {
    Spawn,
    Hit,
    Golden,
    Bomb,
    Miss,
    Combo,
    Warning,
    GameOver,
    NewBest,
    Countdown,
    Go,
}

impl SoundCue {
    pub const ALL: [SoundCue; 11] = [
        SoundCue::Spawn,
        SoundCue::Hit,
        SoundCue::Golden,
        SoundCue::Bomb,
        SoundCue::Miss,
        SoundCue::Combo,
        SoundCue::Warning,
        SoundCue::GameOver,
        SoundCue::NewBest,
        SoundCue::Countdown,
        SoundCue::Go,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SoundCue::Spawn => "spawn",
            SoundCue::Hit => "hit",
            SoundCue::Golden => "golden",
            SoundCue::Bomb => "bomb",
            SoundCue::Miss => "miss",
            SoundCue::Combo => "combo",
            SoundCue::Warning => "warning",
            SoundCue::GameOver => "gameover",
            SoundCue::NewBest => "newbest",
            SoundCue::Countdown => "countdown",
            SoundCue::Go => "go",
        }
    }

    /// Cue played when a mole of `kind` is hit
    pub fn for_hit(kind: MoleKind) -> Self {
        match kind {
            MoleKind::Normal => SoundCue::Hit,
            MoleKind::Golden => SoundCue::Golden,
            MoleKind::Bomb => SoundCue::Bomb,
        }
    }
}

/// Something the host should react to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    Sound {
        cue: SoundCue,
    },
    PhaseChanged {
        from: GamePhase,
        to: GamePhase,
    },
    /// Visible countdown value changed
    CountdownTick {
        value: u32,
    },
    MoleSpawned {
        hole: usize,
        kind: MoleKind,
        visible_ms: f64,
    },
    MoleHit {
        hole: usize,
        kind: MoleKind,
        points: i64,
        combo: u32,
    },
    /// Mole went back down unhit
    MoleEscaped {
        hole: usize,
        kind: MoleKind,
        penalized: bool,
    },
    /// Click during play that hit nothing
    MissClick {
        pos: Vec2,
    },
    FloatingText {
        pos: Vec2,
        text: String,
        kind: MoleKind,
    },
    ParticleBurst {
        pos: Vec2,
        kind: MoleKind,
    },
    ScreenShake {
        duration_ms: f64,
    },
    /// Session ended above the stored best score
    NewRecord {
        score: u64,
    },
}

impl GameEvent {
    pub fn sound(cue: SoundCue) -> Self {
        GameEvent::Sound { cue }
    }

    /// The audio cue carried by this event, if any
    pub fn cue(&self) -> Option<SoundCue> {
        match self {
            GameEvent::Sound { cue } => Some(*cue),
            _ => None,
        }
    }
}

//! Browser facade
//!
//! JavaScript owns the canvas, audio and DOM events. It forwards
//! `requestAnimationFrame` timestamps and pointer events (already mapped to
//! logical game space) to [`WebGame`], then reads JSON snapshots back.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::effects::{Confetti, Effects, FloatingText, Particle};
use crate::persistence::LocalStore;
use crate::settings::Settings;
use crate::sim::{GameEvent, Layout, PointerOutcome, Session, UiAction};
use crate::tuning::Tuning;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    crate::platform::init_logging();
    log::info!("Whack-a-Mole wasm module loaded");
}

#[derive(Serialize)]
struct EffectsView<'a> {
    particles: Vec<&'a Particle>,
    texts: Vec<&'a FloatingText>,
    confetti: Vec<&'a Confetti>,
    shake: [f32; 2],
}

/// Game instance holding all state
#[wasm_bindgen]
pub struct WebGame {
    session: Session,
    effects: Effects,
    settings: Settings,
    storage: LocalStore,
    /// Events applied to effects, waiting for the host to drain
    pending: Vec<GameEvent>,
    last_ts: Option<f64>,
}

#[wasm_bindgen]
impl WebGame {
    /// `seed` pins gameplay randomness; `tuning_json` overrides any balance
    /// fields
    #[wasm_bindgen(constructor)]
    pub fn new(seed: Option<u32>, tuning_json: Option<String>) -> Result<WebGame, JsError> {
        let tuning = match tuning_json {
            Some(json) => Tuning::from_json(&json)?,
            None => Tuning::default(),
        };
        let storage = LocalStore::new();
        let settings = Settings::load(&storage);
        let effects = Effects::new(
            js_seed(),
            tuning.logical_width,
            tuning.shake_intensity,
        );
        let session = Session::new(tuning, seed, crate::platform::default_store())?;

        Ok(Self {
            session,
            effects,
            settings,
            storage,
            pending: Vec::new(),
            last_ts: None,
        })
    }

    /// Run one frame at host timestamp `ts` (ms)
    pub fn frame(&mut self, ts: f64) {
        self.session.update(ts);
        self.flush_events();

        let max_dt = self.session.tuning().max_frame_dt_ms;
        let dt = self
            .last_ts
            .map_or(0.0, |last| (ts - last).clamp(0.0, max_dt));
        self.last_ts = Some(ts);
        self.effects.update(dt);
    }

    /// Pointer press in logical coordinates. Returns the outcome name:
    /// `hit`, `miss`, `start`, `pause`, `resume`, `mute` or `ignored`.
    pub fn pointer_down(&mut self, x: f32, y: f32, ts: f64) -> String {
        let outcome = self.session.register_pointer_down(x, y, ts);
        if outcome == PointerOutcome::Ui(UiAction::ToggleMute) {
            self.toggle_mute();
        }
        self.flush_events();

        match outcome {
            PointerOutcome::Hit { .. } => "hit",
            PointerOutcome::Miss => "miss",
            PointerOutcome::Ui(UiAction::Start) => "start",
            PointerOutcome::Ui(UiAction::Pause) => "pause",
            PointerOutcome::Ui(UiAction::Resume) => "resume",
            PointerOutcome::Ui(UiAction::ToggleMute) => "mute",
            PointerOutcome::Ignored => "ignored",
        }
        .to_string()
    }

    /// Pause key (also used for auto-pause on blur/visibility change)
    pub fn pause(&mut self, ts: f64) -> bool {
        let changed = self.session.register_pause(ts);
        self.flush_events();
        changed
    }

    /// Start/restart key
    pub fn start(&mut self, ts: f64) -> bool {
        let started = self.session.register_start(ts);
        self.flush_events();
        started
    }

    /// Flip and persist the mute preference; returns the new state
    pub fn toggle_mute(&mut self) -> bool {
        let muted = self.settings.toggle_mute();
        self.settings.save(&mut self.storage);
        muted
    }

    pub fn muted(&self) -> bool {
        self.settings.muted
    }

    pub fn volume(&self) -> f32 {
        self.settings.effective_volume()
    }

    pub fn music_volume(&self) -> f32 {
        self.settings.effective_music_volume()
    }

    /// Whether the host should draw the FPS counter
    pub fn show_fps(&self) -> bool {
        self.settings.show_fps
    }

    pub fn snapshot_json(&self) -> String {
        to_json(&self.session.snapshot())
    }

    pub fn layout_json(&self) -> String {
        to_json::<Layout>(self.session.layout())
    }

    pub fn effects_json(&mut self) -> String {
        let shake = self.effects.shake_offset();
        let view = EffectsView {
            particles: self.effects.particles().collect(),
            texts: self.effects.texts().collect(),
            confetti: self.effects.confetti().collect(),
            shake: [shake.x, shake.y],
        };
        to_json(&view)
    }

    /// Events since the last drain as a JSON array, oldest first
    pub fn drain_events_json(&mut self) -> String {
        self.flush_events();
        to_json(&std::mem::take(&mut self.pending))
    }
}

impl WebGame {
    /// Feed new session events to effects and queue them for the host
    fn flush_events(&mut self) {
        for event in self.session.drain_events() {
            self.effects.apply(&event, &self.settings);
            self.pending.push(event);
        }
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| {
        log::warn!("Snapshot serialization failed: {e}");
        "null".to_string()
    })
}

/// Cosmetic seed from the browser RNG
fn js_seed() -> u64 {
    let mut bytes = [0u8; 8];
    if getrandom::fill(&mut bytes).is_err() {
        log::warn!("No browser entropy, effects use a fixed seed");
    }
    u64::from_le_bytes(bytes)
}

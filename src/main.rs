//! Whack-a-Mole entry point
//!
//! The browser build is driven from JavaScript through `whack_a_mole::web`.
//! The native binary runs a headless demo: one seeded session played at
//! 60 fps by a simple bot, with the result logged.
//!
//! Usage: `whack-a-mole [SEED] [--tuning FILE] [--no-save]`

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    use whack_a_mole::consts::{DEFAULT_DEMO_SEED, DEMO_FRAME_MS};
    use whack_a_mole::persistence::{MemoryStore, ScoreStore};
    use whack_a_mole::sim::{GameEvent, GamePhase, MoleKind, PointerOutcome, Session};
    use whack_a_mole::{Effects, Settings, Tuning, format_time, platform};

    /// Bot waits this long after a spawn before swinging
    const REACTION_MS: f64 = 260.0;
    /// Chance the bot's swing lands off target
    const FUMBLE_CHANCE: f64 = 0.12;
    /// Chance the bot swings at a bomb anyway
    const BOMB_CONFUSION: f64 = 0.25;
    /// Hard stop in case a tuning never ends the session
    const MAX_FRAMES: u32 = 60 * 60 * 30;

    struct Options {
        seed: u32,
        tuning_path: Option<String>,
        save: bool,
    }

    fn parse_args() -> Result<Options, String> {
        let mut options = Options {
            seed: DEFAULT_DEMO_SEED,
            tuning_path: None,
            save: true,
        };
        let mut args = std::env::args().skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--tuning" => {
                    options.tuning_path = Some(args.next().ok_or("--tuning needs a file")?);
                }
                "--no-save" => options.save = false,
                other => {
                    options.seed = other
                        .parse()
                        .map_err(|_| format!("seed must be a u32, got {other:?}"))?;
                }
            }
        }
        Ok(options)
    }

    fn load_tuning(path: Option<&str>) -> Result<Tuning, String> {
        let Some(path) = path else {
            return Ok(Tuning::default());
        };
        let json = std::fs::read_to_string(path).map_err(|e| format!("{path}: {e}"))?;
        Tuning::from_json(&json).map_err(|e| format!("{path}: {e}"))
    }

    /// Autoplay: waits out a reaction delay, then swings at the mole centre
    struct Bot {
        rng: Pcg32,
        swung_at: Option<f64>,
    }

    impl Bot {
        fn new(seed: u32) -> Self {
            Self {
                rng: Pcg32::seed_from_u64(u64::from(seed)),
                swung_at: None,
            }
        }

        /// Where to click this frame, if anywhere
        fn aim(&mut self, session: &Session) -> Option<(f32, f32)> {
            let mole = session.mole().filter(|m| !m.hit)?;
            if self.swung_at == Some(mole.spawn_time) {
                return None;
            }
            if session.now() - mole.spawn_time < REACTION_MS {
                return None;
            }
            self.swung_at = Some(mole.spawn_time);

            if mole.kind == MoleKind::Bomb && !self.rng.random_bool(BOMB_CONFUSION) {
                return None;
            }
            let center = session.mole_center()?;
            if self.rng.random_bool(FUMBLE_CHANCE) {
                let dx = self.rng.random_range(60.0f32..120.0) * self.sign();
                return Some((center.x + dx, center.y));
            }
            Some((center.x, center.y))
        }

        fn sign(&mut self) -> f32 {
            if self.rng.random_bool(0.5) { 1.0 } else { -1.0 }
        }
    }

    pub fn run() -> Result<(), String> {
        platform::init_logging();
        let options = parse_args()?;
        let tuning = load_tuning(options.tuning_path.as_deref())?;

        log::info!("Whack-a-Mole (native) demo starting, seed {}", options.seed);

        let store: Box<dyn ScoreStore> = if options.save {
            platform::default_store()
        } else {
            Box::new(MemoryStore::new())
        };
        let settings = Settings::default();
        let mut effects = Effects::new(
            u64::from(options.seed),
            tuning.logical_width,
            tuning.shake_intensity,
        );
        let mut session =
            Session::new(tuning, Some(options.seed), store).map_err(|e| e.to_string())?;
        let mut bot = Bot::new(options.seed);

        let mut ts = 0.0;
        let mut hits = 0u32;
        let mut peak_particles = 0usize;
        session.update(ts);
        session.register_start(ts);

        for _ in 0..MAX_FRAMES {
            ts += DEMO_FRAME_MS;
            session.update(ts);

            if session.phase() == GamePhase::Playing {
                if let Some((x, y)) = bot.aim(&session) {
                    if let PointerOutcome::Hit { .. } = session.register_pointer_down(x, y, ts) {
                        hits += 1;
                    }
                }
            }

            for event in session.drain_events() {
                if let GameEvent::CountdownTick { value } = event {
                    log::info!("{value}...");
                }
                effects.apply(&event, &settings);
            }
            effects.update(DEMO_FRAME_MS);
            peak_particles = peak_particles.max(effects.particles().count());

            if session.phase() == GamePhase::GameOver {
                break;
            }
        }

        let snapshot = session.snapshot();
        log::info!(
            "Finished with {} left: score {}, best {}{}, lives {}, max combo {}, accuracy {:.0}% ({hits} hits, peak {peak_particles} particles)",
            format_time(snapshot.time_left_ms),
            snapshot.score,
            snapshot.best_score,
            if snapshot.is_new_best { " (new record)" } else { "" },
            snapshot.lives,
            snapshot.max_combo,
            snapshot.accuracy * 100.0,
        );
        println!(
            "{}",
            serde_json::to_string_pretty(&snapshot).map_err(|e| e.to_string())?
        );
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    if let Err(e) = demo::run() {
        log::error!("{e}");
        eprintln!("error: {e}");
        std::process::exit(2);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is web::wasm_start, this is just to satisfy the compiler
}

//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Logger setup (console on web, env_logger on native)
//! - Panic reporting
//! - Default best-score storage backend

use crate::persistence::ScoreStore;

/// Install the logger for this target. Safe to call more than once.
#[cfg(target_arch = "wasm32")]
pub fn init_logging() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        log::debug!("Logger already initialized");
    }
}

/// Install the logger for this target. Safe to call more than once.
///
/// Level comes from `RUST_LOG`, defaulting to `info`.
#[cfg(not(target_arch = "wasm32"))]
pub fn init_logging() {
    let env = env_logger::Env::default().default_filter_or("info");
    if env_logger::Builder::from_env(env).try_init().is_err() {
        log::debug!("Logger already initialized");
    }
}

/// Best-score store the platform persists to
#[cfg(target_arch = "wasm32")]
pub fn default_store() -> Box<dyn ScoreStore> {
    Box::new(crate::persistence::LocalStore::new())
}

/// Best-score store the platform persists to (`whack-a-mole.json` in the
/// working directory)
#[cfg(not(target_arch = "wasm32"))]
pub fn default_store() -> Box<dyn ScoreStore> {
    Box::new(crate::persistence::FileStore::new("whack-a-mole.json"))
}

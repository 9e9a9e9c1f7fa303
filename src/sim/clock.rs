//! Game-time clock driven by host frame timestamps
//!
//! Host timestamps (ms, e.g. from `requestAnimationFrame`) are turned into
//! clamped deltas and summed into a game time that only moves while the
//! session is being updated. A tab switch or debugger pause therefore costs
//! at most one clamped frame, and a paused session is re-anchored on resume.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameClock {
    /// Host timestamp of the last charged frame
    last_ts: Option<f64>,
    /// Accumulated game time in ms
    now_ms: f64,
    max_dt_ms: f64,
}

impl FrameClock {
    pub fn new(max_dt_ms: f64) -> Self {
        Self {
            last_ts: None,
            now_ms: 0.0,
            max_dt_ms,
        }
    }

    /// Charge the frame ending at `ts`; returns the clamped delta.
    ///
    /// The first frame only anchors the clock. Timestamps going backwards
    /// yield a zero delta.
    pub fn advance(&mut self, ts: f64) -> f64 {
        let dt = self.delta_to(ts);
        self.last_ts = Some(ts);
        self.now_ms += dt;
        dt
    }

    /// Move the reference timestamp without charging any time
    pub fn reanchor(&mut self, ts: f64) {
        self.last_ts = Some(ts);
    }

    /// Game time a between-frames event at host time `ts` happened at
    pub fn project(&self, ts: f64) -> f64 {
        self.now_ms + self.delta_to(ts)
    }

    pub fn now(&self) -> f64 {
        self.now_ms
    }

    fn delta_to(&self, ts: f64) -> f64 {
        match self.last_ts {
            Some(last) => (ts - last).clamp(0.0, self.max_dt_ms),
            None => 0.0,
        }
    }
}

//! Cosmetic effects driven by simulation events
//!
//! Nothing here feeds back into gameplay. Effects draw from their own
//! `Pcg32`, so toggling particles never changes which hole the next mole
//! picks.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::ease_out_cubic;
use crate::settings::Settings;
use crate::sim::{GameEvent, GamePhase, MoleKind};

/// Particle pool size
pub const MAX_PARTICLES: usize = 128;
/// Floating text pool size
pub const MAX_FLOATING_TEXTS: usize = 20;
/// Confetti pool size
pub const MAX_CONFETTI: usize = 100;

const PARTICLES_PER_HIT: usize = 12;
const PARTICLE_LIFE_MS: f32 = 500.0;
const PARTICLE_GRAVITY: f32 = 200.0;
/// Extra upward kick so bursts fountain
const PARTICLE_LIFT: f32 = 80.0;

const TEXT_LIFE_MS: f32 = 800.0;
const TEXT_RISE_SPEED: f32 = 80.0;
/// Extra size a floating text grows to
const TEXT_GROW: f32 = 0.3;
/// Progress after which floating text fades out
const TEXT_FADE_START: f32 = 0.7;

const CONFETTI_LIFE_MS: f32 = 3000.0;
const CONFETTI_GRAVITY: f32 = 100.0;
/// Velocity kept per 60 Hz frame
const CONFETTI_DRAG: f32 = 0.99;
const CONFETTI_COLORS: u8 = 6;

/// Fixed-capacity ring buffer of reusable slots.
///
/// Pushing into a full pool overwrites the oldest slot.
#[derive(Debug, Clone)]
pub struct RingPool<T> {
    slots: Vec<Option<T>>,
    next: usize,
}

impl<T> RingPool<T> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: (0..capacity).map(|_| None).collect(),
            next: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Live items
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    pub fn push(&mut self, item: T) {
        if self.slots.is_empty() {
            return;
        }
        self.slots[self.next] = Some(item);
        self.next = (self.next + 1) % self.slots.len();
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.slots.iter().flatten()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.slots.iter_mut().flatten()
    }

    /// Free every slot for which `keep` returns false
    pub fn retain(&mut self, mut keep: impl FnMut(&mut T) -> bool) {
        for slot in &mut self.slots {
            if slot.as_mut().is_some_and(|item| !keep(item)) {
                *slot = None;
            }
        }
    }

    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(|s| *s = None);
        self.next = 0;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParticleShape {
    Circle,
    Square,
    Star,
}

impl ParticleShape {
    const ALL: [ParticleShape; 3] = [
        ParticleShape::Circle,
        ParticleShape::Square,
        ParticleShape::Star,
    ];
}

/// A particle for visual effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    pub rotation: f32,
    pub rot_speed: f32,
    pub shape: ParticleShape,
    /// Mole kind for colour lookup
    pub kind: MoleKind,
    pub life: f32, // 0-1, decreases over time
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FloatingText {
    pub pos: Vec2,
    pub text: String,
    pub kind: MoleKind,
    pub life: f32,
    pub scale: f32,
    pub alpha: f32,
}

impl FloatingText {
    /// Pop to full size in the first third of its life, fade over the last 30%
    fn animate(&mut self) {
        let progress = (1.0 - self.life).clamp(0.0, 1.0);
        let grow = ease_out_cubic(f64::from((progress * 3.0).min(1.0))) as f32;
        self.scale = 1.0 + grow * TEXT_GROW;
        self.alpha = if progress < TEXT_FADE_START {
            1.0
        } else {
            1.0 - (progress - TEXT_FADE_START) / (1.0 - TEXT_FADE_START)
        };
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Confetti {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    pub rotation: f32,
    pub rot_speed: f32,
    pub color: u8,
    pub life: f32,
}

/// Decaying screen shake
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Shake {
    remaining_ms: f64,
    duration_ms: f64,
}

impl Shake {
    pub fn start(&mut self, duration_ms: f64) {
        // A longer shake in progress is not cut short
        if duration_ms > self.remaining_ms {
            self.remaining_ms = duration_ms;
            self.duration_ms = duration_ms;
        }
    }

    pub fn is_active(&self) -> bool {
        self.remaining_ms > 0.0
    }

    /// 1 at the start of a shake, linearly down to 0
    pub fn strength(&self) -> f32 {
        if self.duration_ms <= 0.0 {
            0.0
        } else {
            (self.remaining_ms / self.duration_ms).clamp(0.0, 1.0) as f32
        }
    }

    fn update(&mut self, dt_ms: f64) {
        self.remaining_ms = (self.remaining_ms - dt_ms).max(0.0);
    }
}

/// All cosmetic effect pools
#[derive(Debug, Clone)]
pub struct Effects {
    rng: Pcg32,
    width: f32,
    shake_intensity: f32,
    particles: RingPool<Particle>,
    texts: RingPool<FloatingText>,
    confetti: RingPool<Confetti>,
    shake: Shake,
}

impl Effects {
    /// `width` is the logical playfield width confetti spreads across
    pub fn new(seed: u64, width: f32, shake_intensity: f32) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            width,
            shake_intensity,
            particles: RingPool::with_capacity(MAX_PARTICLES),
            texts: RingPool::with_capacity(MAX_FLOATING_TEXTS),
            confetti: RingPool::with_capacity(MAX_CONFETTI),
            shake: Shake::default(),
        }
    }

    /// React to one simulation event
    pub fn apply(&mut self, event: &GameEvent, settings: &Settings) {
        match event {
            GameEvent::ParticleBurst { pos, kind } if settings.particles => {
                self.burst(*pos, *kind);
            }
            GameEvent::FloatingText { pos, text, kind } => {
                self.texts.push(FloatingText {
                    pos: *pos,
                    text: text.clone(),
                    kind: *kind,
                    life: 1.0,
                    scale: 1.0,
                    alpha: 1.0,
                });
            }
            GameEvent::ScreenShake { duration_ms } if settings.effective_screen_shake() => {
                self.shake.start(*duration_ms);
            }
            GameEvent::NewRecord { .. } if settings.effective_confetti() => {
                self.celebrate();
            }
            GameEvent::PhaseChanged { to, .. } if *to == GamePhase::Countdown => {
                self.clear();
            }
            _ => {}
        }
    }

    /// Advance all effects by `dt_ms` of wall time
    pub fn update(&mut self, dt_ms: f64) {
        let dt = (dt_ms / 1000.0) as f32;

        self.particles.retain(|p| {
            p.vel.y += PARTICLE_GRAVITY * dt;
            p.pos += p.vel * dt;
            p.rotation += p.rot_speed * dt;
            p.life -= dt * 1000.0 / PARTICLE_LIFE_MS;
            p.life > 0.0
        });

        self.texts.retain(|t| {
            t.pos.y -= TEXT_RISE_SPEED * dt;
            t.life -= dt * 1000.0 / TEXT_LIFE_MS;
            t.animate();
            t.life > 0.0
        });

        let drag = CONFETTI_DRAG.powf(dt * 60.0);
        self.confetti.retain(|c| {
            c.vel.y += CONFETTI_GRAVITY * dt;
            c.vel *= drag;
            c.pos += c.vel * dt;
            c.rotation += c.rot_speed * dt;
            c.life -= dt * 1000.0 / CONFETTI_LIFE_MS;
            c.life > 0.0
        });

        self.shake.update(dt_ms);
    }

    /// Camera offset for this frame
    pub fn shake_offset(&mut self) -> Vec2 {
        if !self.shake.is_active() {
            return Vec2::ZERO;
        }
        let amount = self.shake_intensity * self.shake.strength();
        Vec2::new(
            self.rng.random_range(-1.0..=1.0) * amount,
            self.rng.random_range(-1.0..=1.0) * amount,
        )
    }

    pub fn particles(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }

    pub fn texts(&self) -> impl Iterator<Item = &FloatingText> {
        self.texts.iter()
    }

    pub fn confetti(&self) -> impl Iterator<Item = &Confetti> {
        self.confetti.iter()
    }

    pub fn shake(&self) -> &Shake {
        &self.shake
    }

    pub fn clear(&mut self) {
        self.particles.clear();
        self.texts.clear();
        self.confetti.clear();
        self.shake = Shake::default();
    }

    fn burst(&mut self, pos: Vec2, kind: MoleKind) {
        for i in 0..PARTICLES_PER_HIT {
            let angle =
                TAU * i as f32 / PARTICLES_PER_HIT as f32 + self.rng.random_range(-0.2..0.2);
            let speed = self.rng.random_range(100.0..250.0);
            let shape = ParticleShape::ALL[self.rng.random_range(0..ParticleShape::ALL.len())];
            self.particles.push(Particle {
                pos,
                vel: Vec2::new(angle.cos() * speed, angle.sin() * speed - PARTICLE_LIFT),
                size: self.rng.random_range(4.0..12.0),
                rotation: self.rng.random_range(0.0..TAU),
                rot_speed: self.rng.random_range(-5.0..5.0),
                shape,
                kind,
                life: 1.0,
            });
        }
    }

    fn celebrate(&mut self) {
        log::debug!("Confetti!");
        for _ in 0..MAX_CONFETTI {
            self.confetti.push(Confetti {
                pos: Vec2::new(
                    self.rng.random_range(0.0..self.width.max(1.0)),
                    self.rng.random_range(-100.0..-10.0),
                ),
                vel: Vec2::new(
                    self.rng.random_range(-100.0..100.0),
                    self.rng.random_range(50.0..200.0),
                ),
                size: self.rng.random_range(6.0..12.0),
                rotation: self.rng.random_range(0.0..TAU),
                rot_speed: self.rng.random_range(-8.0..8.0),
                color: self.rng.random_range(0..CONFETTI_COLORS),
                life: 1.0,
            });
        }
    }
}

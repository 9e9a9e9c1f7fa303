//! Seedable gameplay RNG
//!
//! Mulberry32: a 32-bit state advanced by a fixed odd increment and mixed
//! with two xorshift/multiply rounds. Every gameplay roll (mole placement,
//! mole type) goes through this generator so a seed fully determines a run.

use rand::{Rng, RngCore, SeedableRng};
use serde::{Deserialize, Serialize};

/// Odd increment added to the state before each output
const INCREMENT: u32 = 0x6D2B_79F5;

/// 2^32, maps a `u32` output onto [0, 1)
const U32_RANGE: f64 = 4_294_967_296.0;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mulberry32 {
    /// Seed the generator was last (re)seeded with
    seed: u32,
    state: u32,
}

impl Mulberry32 {
    pub fn new(seed: u32) -> Self {
        Self { seed, state: seed }
    }

    /// Seed from the given value, or from OS entropy when `None`.
    ///
    /// The entropy-drawn seed is still recorded, so an unseeded run can be
    /// replayed after the fact from `seed()`.
    pub fn from_optional_seed(seed: Option<u32>) -> Self {
        Self::new(seed.unwrap_or_else(|| rand::rng().random()))
    }

    /// Reset to a new seed (or a fresh entropy seed)
    pub fn reseed(&mut self, seed: Option<u32>) {
        *self = Self::from_optional_seed(seed);
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Float in [0, 1)
    pub fn next_f64(&mut self) -> f64 {
        f64::from(self.next_u32()) / U32_RANGE
    }

    /// Integer in [min, max_exclusive). Returns `min` for an empty range.
    pub fn next_int(&mut self, min: i64, max_exclusive: i64) -> i64 {
        if max_exclusive <= min {
            return min;
        }
        (self.next_f64() * (max_exclusive - min) as f64 + min as f64).floor() as i64
    }

    /// Index in [0, len)
    pub fn next_index(&mut self, len: usize) -> usize {
        self.next_int(0, len as i64) as usize
    }

    /// Float in [min, max)
    pub fn next_float(&mut self, min: f64, max: f64) -> f64 {
        self.next_f64() * (max - min) + min
    }

    /// Uniformly pick an element, `None` for an empty slice
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        let idx = self.next_index(items.len());
        items.get(idx)
    }
}

impl RngCore for Mulberry32 {
    fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_add(INCREMENT);
        let mut t = self.state;
        t = (t ^ (t >> 15)).wrapping_mul(t | 1);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
        t ^ (t >> 14)
    }

    fn next_u64(&mut self) -> u64 {
        let hi = u64::from(self.next_u32());
        let lo = u64::from(self.next_u32());
        (hi << 32) | lo
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        for chunk in dst.chunks_mut(4) {
            let bytes = self.next_u32().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }
}

impl SeedableRng for Mulberry32 {
    type Seed = [u8; 4];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::new(u32::from_le_bytes(seed))
    }
}

//! Random number generation for combat resolution
//!
//! Every random decision (critical rolls, boss AI, flee attempts, special
//! attack timing) goes through [`RandomSource`] so a session can be replayed
//! exactly from a seed or from a scripted list of draws.

use std::collections::VecDeque;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Source of uniform random draws.
///
/// Only [`next_f64`](RandomSource::next_f64) is required; the other methods
/// are derived from it and may be overridden by sources with a native
/// implementation.
pub trait RandomSource {
    /// Uniform draw in `[0, 1)`
    fn next_f64(&mut self) -> f64;

    /// Returns true with the given probability.
    ///
    /// Probabilities above 1.0 always succeed and probabilities at or below
    /// 0.0 never do. One draw is consumed either way.
    fn chance(&mut self, probability: f64) -> bool {
        self.next_f64() < probability
    }

    /// Uniform integer in `lo..=hi`. Returns `lo` when the range is empty.
    fn range_inclusive(&mut self, lo: u32, hi: u32) -> u32 {
        if hi <= lo {
            return lo;
        }
        let span = (hi - lo + 1) as f64;
        let offset = (self.next_f64() * span) as u32;
        lo + offset.min(hi - lo)
    }

    /// Uniform float in `[lo, hi)`. Returns `lo` when the range is empty.
    fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        if hi <= lo {
            return lo;
        }
        lo + self.next_f64() * (hi - lo)
    }
}

/// Game random number generator
///
/// Wraps ChaCha8Rng for reproducible random number generation.
#[derive(Debug, Clone)]
pub struct GameRng {
    rng: ChaCha8Rng,
    seed: u64,
}

// Only the seed is serialized; deserializing restarts the stream from it.
impl Serialize for GameRng {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.seed.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for GameRng {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let seed = u64::deserialize(deserializer)?;
        Ok(GameRng::new(seed))
    }
}

impl GameRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Create a new RNG with a random seed
    pub fn from_entropy() -> Self {
        let seed = rand::random();
        Self::new(seed)
    }

    /// Get the seed used to create this RNG
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl RandomSource for GameRng {
    fn next_f64(&mut self) -> f64 {
        self.rng.gen_range(0.0..1.0)
    }

    fn range_inclusive(&mut self, lo: u32, hi: u32) -> u32 {
        if hi <= lo {
            return lo;
        }
        self.rng.gen_range(lo..=hi)
    }

    fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        if hi <= lo {
            return lo;
        }
        self.rng.gen_range(lo..hi)
    }
}

impl Default for GameRng {
    fn default() -> Self {
        Self::from_entropy()
    }
}

/// Replays a fixed sequence of draws.
///
/// Once the script runs out every further draw returns `fallback`. Useful for
/// pinning an exact combat sequence in tests or when reproducing a bug report.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRng {
    draws: VecDeque<f64>,
    fallback: f64,
    consumed: usize,
}

impl ScriptedRng {
    /// Script the given draws; exhausted scripts fall back to `0.99`
    /// (a draw that fails every probability check below 99%).
    pub fn new(draws: impl IntoIterator<Item = f64>) -> Self {
        Self::with_fallback(draws, 0.99)
    }

    pub fn with_fallback(draws: impl IntoIterator<Item = f64>, fallback: f64) -> Self {
        Self {
            draws: draws.into_iter().collect(),
            fallback,
            consumed: 0,
        }
    }

    /// Number of draws taken so far (scripted or fallback)
    pub fn consumed(&self) -> usize {
        self.consumed
    }

    /// Scripted draws not yet taken
    pub fn remaining(&self) -> usize {
        self.draws.len()
    }
}

impl RandomSource for ScriptedRng {
    fn next_f64(&mut self) -> f64 {
        self.consumed += 1;
        self.draws.pop_front().unwrap_or(self.fallback)
    }
}

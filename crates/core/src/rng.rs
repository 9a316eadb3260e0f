//! RNG module - the seeded draw sequence behind every tile on the board
//!
//! A session owns exactly one [`TileSource`]. The initial fill and every
//! later refill draw from it in a fixed order, so a game is fully
//! replayable from its seed plus the ordered sequence of hits.
//!
//! The generator is a 64-bit LCG: cheap, stable across platforms and Rust
//! versions, and good enough for picking among a handful of tile kinds.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::GameError;
use crate::types::{TileKind, MAX_TILE_KINDS};

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses Knuth's MMIX constants
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleRng {
    state: u64,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Generate next random u64
    pub fn next_u64(&mut self) -> u64 {
        // LCG formula: (a * state + c) mod 2^64
        self.state = self
            .state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.state
    }

    /// Generate next random u32 from the high bits (the low bits of an LCG are weak)
    pub fn next_u32(&mut self) -> u32 {
        (self.next_u64() >> 32) as u32
    }

    /// Generate random value in range [0, max)
    pub fn next_range(&mut self, max: u32) -> u32 {
        debug_assert!(max > 0, "next_range called with an empty range");
        self.next_u32() % max
    }
}

/// Derive a non-zero seed from the wall clock.
pub fn seed_from_clock() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(1)
        .max(1)
}

/// Resolve an optional seed: `None` and `Some(0)` both mean "pick one now".
pub fn resolve_seed(seed: Option<u64>) -> u64 {
    match seed {
        Some(s) if s != 0 => s,
        _ => seed_from_clock(),
    }
}

/// Uniform draws over a fixed tile vocabulary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileSource {
    rng: SimpleRng,
    kinds: u32,
    draws: u64,
}

impl TileSource {
    pub fn new(seed: u64, kinds: usize) -> Result<Self, GameError> {
        if kinds == 0 {
            return Err(GameError::EmptyVocabulary);
        }
        if kinds > MAX_TILE_KINDS {
            return Err(GameError::TooManyKinds(kinds));
        }
        Ok(Self {
            rng: SimpleRng::new(seed),
            kinds: kinds as u32,
            draws: 0,
        })
    }

    /// Draw the next tile kind.
    pub fn draw(&mut self) -> TileKind {
        self.draws += 1;
        TileKind(self.rng.next_range(self.kinds) as u8)
    }

    pub fn kinds(&self) -> usize {
        self.kinds as usize
    }

    /// Number of tiles drawn so far.
    pub fn draws(&self) -> u64 {
        self.draws
    }
}

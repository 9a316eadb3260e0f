//! Snapshots - read-only copies of a session for renderers and transports
//!
//! A [`GameSnapshot`] never contains a placeholder cell, and its
//! [`GameSnapshot::fingerprint`] is stable across builds.

use std::hash::{Hash, Hasher};

use crate::grid::{Cell, Grid};
use crate::types::TileKind;

/// Stable 64-bit FNV-1a hasher for snapshot fingerprints.
///
/// `DefaultHasher` output is not guaranteed stable across Rust versions, and
/// fingerprints end up in logs that get compared across builds.
#[derive(Debug, Clone)]
struct Fnv1aHasher {
    state: u64,
}

impl Fnv1aHasher {
    const OFFSET_BASIS: u64 = 0xcbf29ce484222325;
    const PRIME: u64 = 0x100000001b3;

    fn new() -> Self {
        Self {
            state: Self::OFFSET_BASIS,
        }
    }
}

impl Hasher for Fnv1aHasher {
    fn finish(&self) -> u64 {
        self.state
    }

    fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.state ^= b as u64;
            self.state = self.state.wrapping_mul(Self::PRIME);
        }
    }
}

/// Cursor position on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Cursor {
    pub x: u16,
    pub y: u16,
}

/// Immutable copy of everything a client needs to draw the game.
///
/// Cells are `None` for empty; a placeholder cannot be represented.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GameSnapshot {
    pub width: u16,
    pub height: u16,
    /// Row-major, top row first.
    pub cells: Vec<Option<TileKind>>,
    pub cursor: Cursor,
    pub points: u32,
    pub game_over: bool,
    pub seed: u64,
    pub refills_left: u32,
    pub episode_id: u32,
}

impl GameSnapshot {
    pub(crate) fn capture(
        grid: &Grid,
        cursor: Cursor,
        points: u32,
        game_over: bool,
        seed: u64,
        refills_left: u32,
        episode_id: u32,
    ) -> Self {
        debug_assert!(
            !grid.contains_placeholder(),
            "snapshot taken mid flood-fill"
        );
        Self {
            width: grid.width(),
            height: grid.height(),
            cells: grid.cells().iter().map(|c| Cell::kind(*c)).collect(),
            cursor,
            points,
            game_over,
            seed,
            refills_left,
            episode_id,
        }
    }

    /// Tile at `(x, y)`, `None` when empty or out of range.
    pub fn cell(&self, x: u16, y: u16) -> Option<TileKind> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.cells[y as usize * self.width as usize + x as usize]
    }

    /// Iterate rows top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Option<TileKind>]> {
        self.cells.chunks(self.width as usize)
    }

    /// Whether the game still accepts hits.
    pub fn playable(&self) -> bool {
        !self.game_over
    }

    /// Deterministic fingerprint of the full snapshot.
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = Fnv1aHasher::new();
        self.hash(&mut hasher);
        hasher.finish()
    }
}

//! Core game logic - pure, deterministic, and testable
//!
//! Holds every rule of the cluster-clearing puzzle and nothing else: no
//! threads, no I/O, no terminal. The same seed plus the same ordered hits
//! always yields the same boards and the same score.
//!
//! # Module Structure
//!
//! - [`grid`]: the `width x height` board of [`Cell`]s
//! - [`cluster`]: flood fill, hit, gravity (`shake`) and bounded refill (`fill_back`)
//! - [`moves`]: whether any clearable cluster remains
//! - [`game_state`]: one session (grid, seed, refill budget, cursor, score)
//! - [`snapshot`]: immutable copies handed to renderers and transports
//! - [`rng`]: the seeded tile source
//!
//! # Game Rules
//!
//! - Hitting a cell selects its 4-connected cluster of the same kind
//! - Clusters of 3 or more are cleared; smaller ones are left untouched
//! - Cleared cells are compacted by gravity column by column
//! - Vacated cells are refilled bottom-up until the refill budget runs out
//! - Clearing `n` cells scores `1 + (n - 3) * 2`
//! - The game is over when no cluster of 3 or more remains
//!
//! # Example
//!
//! ```
//! use tui_cluster_core::{GameState, Rules};
//!
//! let rules = Rules { width: 10, height: 10, kinds: 3, refill_budget: 50 };
//! let mut game = GameState::with_rules(rules, Some(12345)).unwrap();
//!
//! let before = game.points();
//! for y in 0..10 {
//!     for x in 0..10 {
//!         game.hit(x, y);
//!     }
//! }
//! assert!(game.points() >= before);
//! assert!(!game.grid().contains_placeholder());
//! ```

pub use tui_cluster_types as types;

pub mod cluster;
pub mod error;
pub mod game_state;
pub mod grid;
pub mod moves;
pub mod rng;
pub mod snapshot;

pub use cluster::{cluster_points, RefillBudget};
pub use error::{GameError, Result};
pub use game_state::{GameState, Rules};
pub use grid::{Cell, Grid};
pub use rng::{resolve_seed, seed_from_clock, SimpleRng, TileSource};
pub use snapshot::{Cursor, GameSnapshot};

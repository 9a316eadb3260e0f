//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the application.
//! Everything here is plain data, usable from the board engine, the
//! coordinator, the terminal front end and the network adapter alike.
//!
//! # Defaults
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `DEFAULT_WIDTH` | 20 | Board columns |
//! | `DEFAULT_HEIGHT` | 20 | Board rows |
//! | `DEFAULT_REFILL_BUDGET` | 200 | Cells that may be replenished per session |
//! | `DEFAULT_LISTEN_ADDR` | 127.0.0.1:8080 | Network surface bind address |
//! | `MIN_CLUSTER_SIZE` | 3 | Smallest clearable cluster |
//! | `STREAM_INTERVAL_MS` | 1000 | Unsolicited push interval for streaming clients |
//!
//! # Examples
//!
//! ```
//! use tui_cluster_types::{GameAction, GameConfig, TileKind};
//!
//! let config = GameConfig::default();
//! assert!(config.validate().is_ok());
//! assert_eq!(config.tile(TileKind(0)).map(|t| t.sign.as_str()), Some("*"));
//!
//! assert_eq!(GameAction::from_str("newGame"), Some(GameAction::NewGame));
//! ```

pub mod config;

pub use config::{parse_hex_color, ConfigError, GameConfig, TileType};

/// Default board width in cells
pub const DEFAULT_WIDTH: u16 = 20;

/// Default board height in cells
pub const DEFAULT_HEIGHT: u16 = 20;

/// Upper bound for either board dimension
pub const MAX_DIMENSION: u16 = 512;

/// Default number of cells that may be refilled over a session
pub const DEFAULT_REFILL_BUDGET: u32 = 200;

/// Default bind address for the network surface
pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8080";

/// Largest tile vocabulary a [`TileKind`] can index
pub const MAX_TILE_KINDS: usize = u8::MAX as usize + 1;

/// Clusters must be at least this large to be cleared
pub const MIN_CLUSTER_SIZE: usize = 3;

/// Interval between unsolicited snapshots pushed to streaming clients
pub const STREAM_INTERVAL_MS: u64 = 1000;

/// Sign used when serializing an empty cell
pub const EMPTY_SIGN: &str = " ";

/// Neutral color used when serializing an empty cell
pub const EMPTY_COLOR: &str = "#000000";

/// Opaque identifier for a class of matching tiles.
///
/// The wrapped value is an index into the configured tile vocabulary;
/// two tiles match iff their kinds are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileKind(pub u8);

impl TileKind {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Player intents produced by the local front end.
///
/// Remote clients speak the adapter protocol instead; both end up as
/// coordinator commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameAction {
    /// Move cursor one row up
    MoveUp,
    /// Move cursor one row down
    MoveDown,
    /// Move cursor one column left
    MoveLeft,
    /// Move cursor one column right
    MoveRight,
    /// Hit the cluster under the cursor
    Hit,
    /// Regenerate the board from the current seed
    Restart,
    /// Regenerate the board from a fresh seed
    NewGame,
}

impl GameAction {
    /// Parse action from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use tui_cluster_types::GameAction;
    ///
    /// assert_eq!(GameAction::from_str("moveLeft"), Some(GameAction::MoveLeft));
    /// assert_eq!(GameAction::from_str("HIT"), Some(GameAction::Hit));
    /// assert_eq!(GameAction::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "moveup" => Some(GameAction::MoveUp),
            "movedown" => Some(GameAction::MoveDown),
            "moveleft" => Some(GameAction::MoveLeft),
            "moveright" => Some(GameAction::MoveRight),
            "hit" => Some(GameAction::Hit),
            "restart" => Some(GameAction::Restart),
            "newgame" => Some(GameAction::NewGame),
            _ => None,
        }
    }

    /// Convert to camelCase string
    pub fn as_str(&self) -> &'static str {
        match self {
            GameAction::MoveUp => "moveUp",
            GameAction::MoveDown => "moveDown",
            GameAction::MoveLeft => "moveLeft",
            GameAction::MoveRight => "moveRight",
            GameAction::Hit => "hit",
            GameAction::Restart => "restart",
            GameAction::NewGame => "newGame",
        }
    }

    /// Cursor delta for movement actions.
    pub fn cursor_delta(&self) -> Option<(i32, i32)> {
        match self {
            GameAction::MoveUp => Some((0, -1)),
            GameAction::MoveDown => Some((0, 1)),
            GameAction::MoveLeft => Some((-1, 0)),
            GameAction::MoveRight => Some((1, 0)),
            _ => None,
        }
    }
}

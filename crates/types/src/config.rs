//! Game configuration schema.
//!
//! Loading and saving live in the facade crate; this module only defines
//! the shape and the validation rules.

use std::net::SocketAddr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    TileKind, DEFAULT_HEIGHT, DEFAULT_LISTEN_ADDR, DEFAULT_REFILL_BUDGET, DEFAULT_WIDTH,
    MAX_DIMENSION, MAX_TILE_KINDS,
};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("tile vocabulary is empty")]
    EmptyVocabulary,
    #[error("tile vocabulary has {0} kinds, at most {max} are supported", max = MAX_TILE_KINDS)]
    TooManyKinds(usize),
    #[error("tile type #{0} has an empty sign")]
    EmptySign(usize),
    #[error("tile type #{index} has an invalid color {color:?}")]
    InvalidColor { index: usize, color: String },
    #[error("board dimensions {width}x{height} must be between 1 and {max}", max = MAX_DIMENSION)]
    InvalidDimensions { width: u16, height: u16 },
    #[error("invalid listen address {0:?}")]
    InvalidListenAddr(String),
}

/// Visual identity of one tile kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileType {
    pub sign: String,
    pub color: String,
}

impl TileType {
    pub fn new(sign: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            sign: sign.into(),
            color: color.into(),
        }
    }
}

/// Full session configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub width: u16,
    pub height: u16,
    /// 0 means "derive from the wall clock at generation time".
    pub seed: u64,
    pub refill_budget: u32,
    pub listen_addr: String,
    /// Whether remote clients may restart or start a new game.
    pub allow_remote_restart: bool,
    /// Directory served at `/` by the network surface.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub static_dir: Option<String>,
    pub tile_types: Vec<TileType>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            seed: 0,
            refill_budget: DEFAULT_REFILL_BUDGET,
            listen_addr: DEFAULT_LISTEN_ADDR.to_string(),
            allow_remote_restart: true,
            static_dir: None,
            tile_types: vec![
                TileType::new("*", "#ffff00"),
                TileType::new("X", "#88ff00"),
                TileType::new("O", "#0088ff"),
            ],
        }
    }
}

impl GameConfig {
    /// Check every constraint the engine and the adapter rely on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tile_types.is_empty() {
            return Err(ConfigError::EmptyVocabulary);
        }
        if self.tile_types.len() > MAX_TILE_KINDS {
            return Err(ConfigError::TooManyKinds(self.tile_types.len()));
        }
        for (index, tile) in self.tile_types.iter().enumerate() {
            if tile.sign.is_empty() {
                return Err(ConfigError::EmptySign(index));
            }
            if parse_hex_color(&tile.color).is_none() {
                return Err(ConfigError::InvalidColor {
                    index,
                    color: tile.color.clone(),
                });
            }
        }
        if self.width == 0
            || self.height == 0
            || self.width > MAX_DIMENSION
            || self.height > MAX_DIMENSION
        {
            return Err(ConfigError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        self.socket_addr()?;
        Ok(())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.listen_addr
            .parse()
            .map_err(|_| ConfigError::InvalidListenAddr(self.listen_addr.clone()))
    }

    /// Number of tile kinds in the vocabulary.
    pub fn kind_count(&self) -> usize {
        self.tile_types.len()
    }

    pub fn tile(&self, kind: TileKind) -> Option<&TileType> {
        self.tile_types.get(kind.index())
    }
}

/// Parse `#rrggbb` or `#rgb` into RGB components.
///
/// # Examples
///
/// ```
/// use tui_cluster_types::parse_hex_color;
///
/// assert_eq!(parse_hex_color("#88ff00"), Some((0x88, 0xff, 0x00)));
/// assert_eq!(parse_hex_color("#08f"), Some((0x00, 0x88, 0xff)));
/// assert_eq!(parse_hex_color("blue"), None);
/// ```
pub fn parse_hex_color(s: &str) -> Option<(u8, u8, u8)> {
    let hex = s.strip_prefix('#')?;
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    match hex.len() {
        6 => {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some((r, g, b))
        }
        3 => {
            let digit = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|v| v * 17);
            Some((digit(0)?, digit(1)?, digit(2)?))
        }
        _ => None,
    }
}

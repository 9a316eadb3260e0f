//! Protocol module - JSON shapes shared by the HTTP routes and `/ws`.
//!
//! Clients send either a bare hit (`{"x":1,"y":2}`) or an action message
//! (`{"action":"restart"}`). Every answer is a [`BoardReply`] or, when the
//! request could not be understood, an [`ErrorReply`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

use tui_cluster_core::GameSnapshot;
use tui_cluster_engine::Command;
use tui_cluster_types::{TileType, EMPTY_COLOR, EMPTY_SIGN};

// ============== Client -> Server Messages ==============

/// Body of `POST /api/board`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitRequest {
    pub x: i32,
    pub y: i32,
}

/// Any text frame a WebSocket client may send.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<i32>,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    #[error("invalid JSON: {0}")]
    InvalidJson(String),
    #[error("unknown action {0:?}")]
    UnknownAction(String),
    #[error("hit requires both x and y")]
    MissingCoordinates,
    #[error("{0} is disabled on this server")]
    Forbidden(&'static str),
}

impl ClientMessage {
    /// Parse one text frame.
    pub fn parse(text: &str) -> Result<Self, RequestError> {
        serde_json::from_str(text).map_err(|e| RequestError::InvalidJson(e.to_string()))
    }

    /// Resolve into a coordinator command. A message without `action` is a hit.
    pub fn to_command(&self, allow_restart: bool) -> Result<Command, RequestError> {
        let action = self.action.as_deref().unwrap_or("hit");
        match action {
            "hit" => match (self.x, self.y) {
                (Some(x), Some(y)) => Ok(Command::Hit { x, y }),
                _ => Err(RequestError::MissingCoordinates),
            },
            "get" => Ok(Command::Get),
            "restart" if !allow_restart => Err(RequestError::Forbidden("restart")),
            "newGame" if !allow_restart => Err(RequestError::Forbidden("newGame")),
            "restart" => Ok(Command::Restart),
            "newGame" => Ok(Command::NewGame),
            other => Err(RequestError::UnknownAction(other.to_string())),
        }
    }
}

// ============== Server -> Client Messages ==============

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileView {
    pub sign: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardView {
    pub width: u16,
    pub height: u16,
    /// Row-major, top row first.
    pub tiles: Vec<Vec<TileView>>,
}

/// Reply to every successfully understood request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardReply {
    pub board: BoardView,
    pub game_over: bool,
    pub points: u32,
    pub seed: u64,
}

impl BoardReply {
    /// Render a snapshot with the configured vocabulary.
    pub fn from_snapshot(snapshot: &GameSnapshot, tiles: &[TileType]) -> Self {
        let view = |kind: Option<tui_cluster_types::TileKind>| {
            match kind.and_then(|k| tiles.get(k.index())) {
                Some(t) => TileView {
                    sign: t.sign.clone(),
                    color: t.color.clone(),
                },
                None => TileView {
                    sign: EMPTY_SIGN.to_string(),
                    color: EMPTY_COLOR.to_string(),
                },
            }
        };

        let tiles = snapshot
            .rows()
            .map(|row| row.iter().copied().map(&view).collect())
            .collect();

        Self {
            board: BoardView {
                width: snapshot.width,
                height: snapshot.height,
                tiles,
            },
            game_over: snapshot.game_over,
            points: snapshot.points,
            seed: snapshot.seed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorReply {
    pub error: String,
}

impl ErrorReply {
    pub fn new(error: impl ToString) -> Self {
        Self {
            error: error.to_string(),
        }
    }
}

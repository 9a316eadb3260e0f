//! Adapter crate - remote play over HTTP and WebSocket
//!
//! Exposes the live game to browsers and scripts. Every request becomes one
//! coordinator command and is answered with the resulting board.
//!
//! # Routes
//!
//! | Method | Path            | Command   |
//! |--------|-----------------|-----------|
//! | GET    | `/api/board`    | get       |
//! | POST   | `/api/board`    | hit       |
//! | POST   | `/api/restart`  | restart   |
//! | POST   | `/api/new-game` | new game  |
//! | GET    | `/api/health`   | -         |
//! | GET    | `/ws`           | streaming |
//!
//! # Streaming
//!
//! A `/ws` client gets the board once per second while idle, and
//! immediately after each frame it sends:
//!
//! ```text
//! Client -> Server: {"x":3,"y":7}
//! Server -> Client: {"board":{"width":20,"height":20,"tiles":[[...]]},
//!                   "gameOver":false,"points":5,"seed":1234}
//! Client -> Server: {"action":"restart"}
//! Server -> Client: {"board":{...},"gameOver":false,"points":0,"seed":1234}
//! Client -> Server: {"action":"fly"}
//! Server -> Client: {"error":"unknown action \"fly\""}
//! ```

pub mod protocol;
pub mod runtime;
pub mod server;

pub use protocol::{
    BoardReply, BoardView, ClientMessage, ErrorReply, HitRequest, RequestError, TileView,
};
pub use runtime::Adapter;
pub use server::{router, run_server, serve, ServerConfig};

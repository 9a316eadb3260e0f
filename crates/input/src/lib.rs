//! Terminal input module (engine-facing).
//!
//! Maps `crossterm` key and mouse events into [`crate::types::GameAction`]s
//! and pointer positions. Independent of any UI framework.

pub mod map;

pub use tui_cluster_types as types;

pub use map::{handle_key_event, pointer_hit, should_quit};

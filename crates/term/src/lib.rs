//! Terminal "game renderer" module.
//!
//! A small, game-oriented rendering layer for terminal play. It avoids
//! widget toolkits and instead renders into a simple framebuffer that is
//! diffed and flushed to the terminal.
//!
//! - [`GameView`] is pure: snapshot in, framebuffer out
//! - [`TerminalRenderer`] owns the terminal and sends only changed runs
//! - [`RenderThrottle`] skips frames whose content did not change

pub mod fb;
pub mod game_view;
pub mod render_throttle;
pub mod renderer;

pub use tui_cluster_core as core;
pub use tui_cluster_types as types;

pub use fb::{FrameBuffer, Glyph, Rgb, Style};
pub use game_view::{AnchorY, GameView, Palette, ServerStatusView, Viewport};
pub use render_throttle::RenderThrottle;
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};

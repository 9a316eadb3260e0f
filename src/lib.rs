//! TUI Cluster (workspace facade crate).
//!
//! Re-exports the workspace crates under one name and adds the pieces only
//! the binary needs: config file handling and log setup.

pub use tui_cluster_adapter as adapter;
pub use tui_cluster_core as core;
pub use tui_cluster_engine as engine;
pub use tui_cluster_input as input;
pub use tui_cluster_term as term;
pub use tui_cluster_types as types;

pub mod config;
pub mod logging;

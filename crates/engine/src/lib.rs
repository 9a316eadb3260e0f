//! Engine crate - owns the live game and serializes access to it.
//!
//! See [`coordinator`] for the request/reply protocol shared by every front end.

pub mod coordinator;

pub use coordinator::{Command, Coordinator, CoordinatorError, CoordinatorHandle, Request};

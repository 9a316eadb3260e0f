//! Single-writer coordinator for the live game.
//!
//! One OS thread owns the [`GameState`]. Every front end (terminal, HTTP,
//! WebSocket) talks to it through a cloneable [`CoordinatorHandle`] by sending a
//! [`Request`] that carries its own reply slot. Requests are applied one at a
//! time in arrival order and each is answered with the snapshot taken right
//! after it was applied.

use std::io;
use std::thread::{self, JoinHandle};

use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use tui_cluster_core::{GameSnapshot, GameState};
use tui_cluster_types::GameAction;

/// Requests queued ahead of the one being applied. Producers wait for their
/// reply, so this only bounds the hand-off.
const REQUEST_QUEUE_CAPACITY: usize = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Hit { x: i32, y: i32 },
    Get,
    Restart,
    NewGame,
    MoveCursor { dx: i32, dy: i32 },
}

impl Command {
    /// Translate a front-end action. Hits land on `cursor`.
    pub fn from_action(action: GameAction, cursor: (u16, u16)) -> Self {
        match action {
            GameAction::Hit => Command::Hit {
                x: cursor.0 as i32,
                y: cursor.1 as i32,
            },
            GameAction::Restart => Command::Restart,
            GameAction::NewGame => Command::NewGame,
            GameAction::MoveUp
            | GameAction::MoveDown
            | GameAction::MoveLeft
            | GameAction::MoveRight => {
                let (dx, dy) = action.cursor_delta().unwrap_or((0, 0));
                Command::MoveCursor { dx, dy }
            }
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Command::Hit { .. } => "hit",
            Command::Get => "get",
            Command::Restart => "restart",
            Command::NewGame => "newGame",
            Command::MoveCursor { .. } => "moveCursor",
        }
    }
}

/// A command plus the slot its answer goes to.
#[derive(Debug)]
pub struct Request {
    pub command: Command,
    pub reply: oneshot::Sender<GameSnapshot>,
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinatorError {
    #[error("game coordinator has shut down")]
    Closed,
    #[error("game coordinator dropped the request without replying")]
    NoReply,
}

/// Cloneable sender side of the coordinator.
#[derive(Debug, Clone)]
pub struct CoordinatorHandle {
    tx: mpsc::Sender<Request>,
}

impl CoordinatorHandle {
    /// Submit a command and wait for its snapshot.
    pub async fn request(&self, command: Command) -> Result<GameSnapshot, CoordinatorError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(Request { command, reply })
            .await
            .map_err(|_| CoordinatorError::Closed)?;
        rx.await.map_err(|_| CoordinatorError::NoReply)
    }

    /// Blocking variant for plain threads. Must not be called from inside an
    /// async runtime.
    pub fn request_blocking(&self, command: Command) -> Result<GameSnapshot, CoordinatorError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .blocking_send(Request { command, reply })
            .map_err(|_| CoordinatorError::Closed)?;
        rx.blocking_recv().map_err(|_| CoordinatorError::NoReply)
    }

    pub async fn snapshot(&self) -> Result<GameSnapshot, CoordinatorError> {
        self.request(Command::Get).await
    }
}

pub struct Coordinator {
    state: GameState,
    rx: mpsc::Receiver<Request>,
}

impl Coordinator {
    /// Move `state` onto a dedicated thread and return a handle to it.
    ///
    /// The thread exits once every handle is dropped; joining it yields the
    /// final state.
    pub fn spawn(state: GameState) -> io::Result<(CoordinatorHandle, JoinHandle<GameState>)> {
        let (tx, rx) = mpsc::channel(REQUEST_QUEUE_CAPACITY);
        let coordinator = Coordinator { state, rx };
        let join = thread::Builder::new()
            .name("coordinator".to_string())
            .spawn(move || coordinator.run())?;
        Ok((CoordinatorHandle { tx }, join))
    }

    fn run(mut self) -> GameState {
        info!(
            seed = self.state.seed(),
            width = self.state.grid().width(),
            height = self.state.grid().height(),
            "coordinator started"
        );

        while let Some(Request { command, reply }) = self.rx.blocking_recv() {
            self.apply(command);
            if reply.send(self.state.snapshot()).is_err() {
                debug!(command = command.name(), "requester went away; reply discarded");
            }
        }

        info!(points = self.state.points(), "coordinator stopped");
        self.state
    }

    fn apply(&mut self, command: Command) {
        match command {
            Command::Hit { x, y } => {
                let earned = self.state.hit(x, y);
                if earned > 0 {
                    debug!(x, y, earned, total = self.state.points(), "cluster cleared");
                }
                if self.state.game_over() && earned > 0 {
                    info!(points = self.state.points(), "game over");
                }
            }
            Command::Get => {}
            Command::Restart => match self.state.restart() {
                Ok(()) => info!(seed = self.state.seed(), "game restarted"),
                Err(e) => warn!(error = %e, "restart failed; keeping current board"),
            },
            Command::NewGame => match self.state.new_game() {
                Ok(()) => info!(seed = self.state.seed(), "new game"),
                Err(e) => warn!(error = %e, "new game failed; keeping current board"),
            },
            Command::MoveCursor { dx, dy } => self.state.move_cursor(dx, dy),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tui_cluster_core::Rules;

    fn state(seed: u64) -> GameState {
        GameState::with_rules(
            Rules {
                width: 6,
                height: 6,
                kinds: 3,
                refill_budget: 10,
            },
            Some(seed),
        )
        .unwrap()
    }

    #[test]
    fn from_action_maps_moves_and_hits() {
        assert_eq!(
            Command::from_action(GameAction::Hit, (2, 3)),
            Command::Hit { x: 2, y: 3 }
        );
        assert_eq!(
            Command::from_action(GameAction::MoveLeft, (0, 0)),
            Command::MoveCursor { dx: -1, dy: 0 }
        );
        assert_eq!(
            Command::from_action(GameAction::MoveDown, (0, 0)),
            Command::MoveCursor { dx: 0, dy: 1 }
        );
        assert_eq!(
            Command::from_action(GameAction::Restart, (0, 0)),
            Command::Restart
        );
    }

    #[test]
    fn get_does_not_mutate() {
        let initial = state(5).snapshot();
        let (handle, join) = Coordinator::spawn(state(5)).unwrap();
        let a = handle.request_blocking(Command::Get).unwrap();
        let b = handle.request_blocking(Command::Get).unwrap();
        assert_eq!(a, initial);
        assert_eq!(a, b);
        drop(handle);
        join.join().unwrap();
    }

    #[test]
    fn restart_replies_with_initial_board() {
        let (handle, join) = Coordinator::spawn(state(77)).unwrap();
        let initial = handle.request_blocking(Command::Get).unwrap();
        for y in 0..6 {
            for x in 0..6 {
                handle.request_blocking(Command::Hit { x, y }).unwrap();
            }
        }
        let restarted = handle.request_blocking(Command::Restart).unwrap();
        assert_eq!(restarted.cells, initial.cells);
        assert_eq!(restarted.points, 0);
        assert_eq!(restarted.seed, 77);
        drop(handle);
        join.join().unwrap();
    }

    #[test]
    fn thread_exits_when_handles_drop() {
        let (handle, join) = Coordinator::spawn(state(1)).unwrap();
        let clone = handle.clone();
        handle.request_blocking(Command::MoveCursor { dx: 2, dy: 1 }).unwrap();
        drop(handle);
        drop(clone);
        let final_state = join.join().unwrap();
        assert_eq!(final_state.cursor().x, 2);
        assert_eq!(final_state.cursor().y, 1);
    }

    #[tokio::test]
    async fn async_requests_are_answered() {
        let (handle, _join) = Coordinator::spawn(state(3)).unwrap();
        let snap = handle.request(Command::MoveCursor { dx: 1, dy: 0 }).await.unwrap();
        assert_eq!(snap.cursor.x, 1);
        let snap = handle.snapshot().await.unwrap();
        assert_eq!(snap.cursor.x, 1);
    }
}

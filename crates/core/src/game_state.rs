//! Game state module - one live session of the puzzle
//!
//! Ties the grid, the tile source, the refill budget and the score together.
//! Every mutator keeps `game_over` in sync with [`Grid::has_move`] and keeps
//! the cursor inside the board.

use crate::cluster::RefillBudget;
use crate::error::{GameError, Result};
use crate::grid::Grid;
use crate::rng::{seed_from_clock, TileSource};
use crate::snapshot::{Cursor, GameSnapshot};
use crate::types::GameConfig;

/// Board rules fixed for the lifetime of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rules {
    pub width: u16,
    pub height: u16,
    pub kinds: usize,
    pub refill_budget: u32,
}

impl From<&GameConfig> for Rules {
    fn from(config: &GameConfig) -> Self {
        Self {
            width: config.width,
            height: config.height,
            kinds: config.kind_count(),
            refill_budget: config.refill_budget,
        }
    }
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    rules: Rules,
    grid: Grid,
    tiles: TileSource,
    refill: RefillBudget,
    seed: u64,
    cursor: Cursor,
    points: u32,
    game_over: bool,
    /// Monotonic episode id (increments on restart and new game).
    episode_id: u32,
}

impl GameState {
    /// Create a session from config. `None` or `Some(0)` derives the seed from
    /// the clock.
    pub fn new(config: &GameConfig, seed: Option<u64>) -> Result<Self> {
        Self::with_rules(Rules::from(config), seed)
    }

    pub fn with_rules(rules: Rules, seed: Option<u64>) -> Result<Self> {
        let seed = crate::rng::resolve_seed(seed);
        let mut tiles = TileSource::new(seed, rules.kinds)?;
        let grid = Grid::generate(rules.width, rules.height, &mut tiles)?;
        let mut state = Self {
            rules,
            grid,
            tiles,
            refill: RefillBudget::new(rules.refill_budget),
            seed,
            cursor: Cursor::default(),
            points: 0,
            game_over: false,
            episode_id: 0,
        };
        state.refresh_game_over();
        Ok(state)
    }

    /// Start a session from a prepared grid. Used by tests and replays that
    /// need a specific layout; refills still draw from `seed`.
    pub fn from_grid(grid: Grid, rules: Rules, seed: u64) -> Result<Self> {
        let tiles = TileSource::new(seed, rules.kinds)?;
        let width = grid.width() as usize;
        for (idx, cell) in grid.cells().iter().enumerate() {
            if cell.kind().is_some_and(|k| k.index() >= rules.kinds) {
                return Err(GameError::UnknownKind {
                    x: idx % width,
                    y: idx / width,
                });
            }
        }
        let rules = Rules {
            width: grid.width(),
            height: grid.height(),
            ..rules
        };
        let mut state = Self {
            rules,
            grid,
            tiles,
            refill: RefillBudget::new(rules.refill_budget),
            seed,
            cursor: Cursor::default(),
            points: 0,
            game_over: false,
            episode_id: 0,
        };
        state.refresh_game_over();
        Ok(state)
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn rules(&self) -> Rules {
        self.rules
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn points(&self) -> u32 {
        self.points
    }

    pub fn game_over(&self) -> bool {
        self.game_over
    }

    pub fn episode_id(&self) -> u32 {
        self.episode_id
    }

    pub fn refills_left(&self) -> u32 {
        self.refill.remaining()
    }

    /// Hit the cluster at `(x, y)`; returns the points earned by this hit.
    pub fn hit(&mut self, x: i32, y: i32) -> u32 {
        let earned = self.grid.hit(x, y, &mut self.refill, &mut self.tiles);
        if earned > 0 {
            self.points = self.points.saturating_add(earned);
            self.refresh_game_over();
        }
        earned
    }

    /// Hit the cluster under the cursor.
    pub fn hit_at_cursor(&mut self) -> u32 {
        let Cursor { x, y } = self.cursor;
        self.hit(x as i32, y as i32)
    }

    /// Move the cursor by `(dx, dy)`, clamped to the board.
    pub fn move_cursor(&mut self, dx: i32, dy: i32) {
        let max_x = self.grid.width() as i32 - 1;
        let max_y = self.grid.height() as i32 - 1;
        self.cursor.x = (self.cursor.x as i32 + dx).clamp(0, max_x) as u16;
        self.cursor.y = (self.cursor.y as i32 + dy).clamp(0, max_y) as u16;
    }

    /// Regenerate the board from the current seed.
    ///
    /// The board is identical to the one the session started with.
    pub fn restart(&mut self) -> Result<()> {
        self.regenerate(self.seed)
    }

    /// Regenerate the board from a fresh clock seed.
    pub fn new_game(&mut self) -> Result<()> {
        let mut seed = seed_from_clock();
        if seed == self.seed {
            seed = seed.wrapping_add(1).max(1);
        }
        self.regenerate(seed)
    }

    fn regenerate(&mut self, seed: u64) -> Result<()> {
        let mut tiles = TileSource::new(seed, self.rules.kinds)?;
        let grid = Grid::generate(self.rules.width, self.rules.height, &mut tiles)?;
        self.grid = grid;
        self.tiles = tiles;
        self.seed = seed;
        self.refill = RefillBudget::new(self.rules.refill_budget);
        self.cursor = Cursor::default();
        self.points = 0;
        self.episode_id = self.episode_id.wrapping_add(1);
        self.refresh_game_over();
        Ok(())
    }

    fn refresh_game_over(&mut self) {
        self.game_over = !self.grid.has_move();
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot::capture(
            &self.grid,
            self.cursor,
            self.points,
            self.game_over,
            self.seed,
            self.refill.remaining(),
            self.episode_id,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Cell;
    use crate::types::TileKind;

    const A: Cell = Cell::Occupied(TileKind(0));
    const B: Cell = Cell::Occupied(TileKind(1));

    fn rules() -> Rules {
        Rules {
            width: 8,
            height: 6,
            kinds: 3,
            refill_budget: 20,
        }
    }

    #[test]
    fn same_seed_same_board() {
        let a = GameState::with_rules(rules(), Some(9)).unwrap();
        let b = GameState::with_rules(rules(), Some(9)).unwrap();
        assert_eq!(a.grid(), b.grid());
        assert_eq!(a.seed(), 9);
    }

    #[test]
    fn zero_seed_is_resolved() {
        let state = GameState::with_rules(rules(), Some(0)).unwrap();
        assert_ne!(state.seed(), 0);
    }

    #[test]
    fn empty_vocabulary_is_an_error() {
        let bad = Rules { kinds: 0, ..rules() };
        assert!(GameState::with_rules(bad, Some(1)).is_err());
    }

    #[test]
    fn from_grid_rejects_kinds_outside_the_rules() {
        let c = Cell::Occupied(TileKind(2));
        let grid = Grid::from_rows(&[vec![A, B], vec![B, c]], 3).unwrap();
        let two_kinds = Rules { kinds: 2, ..rules() };
        assert_eq!(
            GameState::from_grid(grid.clone(), two_kinds, 1).err(),
            Some(GameError::UnknownKind { x: 1, y: 1 })
        );
        assert!(GameState::from_grid(grid, rules(), 1).is_ok());
    }

    #[test]
    fn cursor_is_clamped() {
        let mut state = GameState::with_rules(rules(), Some(3)).unwrap();
        state.move_cursor(-5, -5);
        assert_eq!(state.cursor(), Cursor { x: 0, y: 0 });
        state.move_cursor(100, 100);
        assert_eq!(state.cursor(), Cursor { x: 7, y: 5 });
    }

    #[test]
    fn hit_accumulates_points_and_tracks_game_over() {
        // A-row clears, leaving B alone with no budget: game over.
        let grid = Grid::from_rows(&[vec![A, A, A], vec![B, A, B]], 2).unwrap();
        let mut state = GameState::from_grid(
            grid,
            Rules {
                refill_budget: 0,
                ..rules()
            },
            1,
        )
        .unwrap();
        assert!(!state.game_over());
        assert_eq!(state.hit(0, 0), 3);
        assert_eq!(state.points(), 3);
        assert!(state.game_over());
        assert!(!state.snapshot().playable());
    }

    #[test]
    fn restart_reproduces_initial_board() {
        let mut state = GameState::with_rules(rules(), Some(1234)).unwrap();
        let initial = state.grid().clone();
        state.move_cursor(3, 2);
        for y in 0..6 {
            for x in 0..8 {
                state.hit(x, y);
            }
        }
        state.restart().unwrap();
        assert_eq!(state.grid(), &initial);
        assert_eq!(state.points(), 0);
        assert_eq!(state.cursor(), Cursor::default());
        assert_eq!(state.refills_left(), 20);
        assert_eq!(state.episode_id(), 1);
    }

    #[test]
    fn new_game_changes_seed() {
        let mut state = GameState::with_rules(rules(), Some(1234)).unwrap();
        state.new_game().unwrap();
        assert_ne!(state.seed(), 1234);
        assert_eq!(state.points(), 0);
    }
}

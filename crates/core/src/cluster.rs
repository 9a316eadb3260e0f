//! Cluster engine - flood fill, clearing, gravity and bounded refill
//!
//! Everything that rewrites board cells lives here. The one primitive is
//! [`Grid::flood_fill`]; clearing, reverting a rejected hit and probing a
//! cluster's size (see [`crate::moves`]) are all expressed with it, using
//! [`Cell::Placeholder`] as the in-flight marker.
//!
//! # Hit pipeline
//!
//! 1. flood the hit cluster to `Placeholder`, counting it
//! 2. fewer than [`MIN_CLUSTER_SIZE`] cells: flood back, award nothing
//! 3. otherwise flood `Placeholder` to `Empty`, [`Grid::shake`] every column,
//!    then [`Grid::fill_back`] as far as the refill budget allows
//!
//! Points grow linearly above the threshold: 3 cells score 1, and every
//! extra cell is worth 2 more.

use crate::grid::{Cell, Grid};
use crate::rng::TileSource;
use crate::types::MIN_CLUSTER_SIZE;

/// Session-lifetime limit on how many vacated cells may be replenished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RefillBudget {
    initial: u32,
    remaining: u32,
}

impl RefillBudget {
    pub fn new(budget: u32) -> Self {
        Self {
            initial: budget,
            remaining: budget,
        }
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Cells refilled so far.
    pub fn used(&self) -> u32 {
        self.initial - self.remaining
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining == 0
    }

    /// Consume one unit. Returns false once the budget is spent.
    fn take(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        true
    }
}

/// Points awarded for clearing a cluster of `size` cells.
///
/// # Examples
///
/// ```
/// use tui_cluster_core::cluster_points;
///
/// assert_eq!(cluster_points(2), 0);
/// assert_eq!(cluster_points(3), 1);
/// assert_eq!(cluster_points(4), 3);
/// assert_eq!(cluster_points(10), 15);
/// ```
pub fn cluster_points(size: usize) -> u32 {
    if size < MIN_CLUSTER_SIZE {
        return 0;
    }
    let extra = (size - MIN_CLUSTER_SIZE) as u32;
    extra.saturating_mul(2).saturating_add(1)
}

impl Grid {
    /// Rewrite the 4-connected region of `matching` cells containing `(x, y)`
    /// to `replacement`, returning how many cells were rewritten.
    ///
    /// Returns 0 without touching the grid when `matching` is empty, when the
    /// start is out of bounds or does not hold `matching`, or when
    /// `matching == replacement`.
    pub fn flood_fill(&mut self, matching: Cell, replacement: Cell, x: i32, y: i32) -> usize {
        self.flood_fill_with(matching, replacement, x, y, |_| {})
    }

    /// [`Grid::flood_fill`] that also reports every rewritten flat index.
    pub(crate) fn flood_fill_with(
        &mut self,
        matching: Cell,
        replacement: Cell,
        x: i32,
        y: i32,
        mut visit: impl FnMut(usize),
    ) -> usize {
        if matching == Cell::Empty || matching == replacement {
            return 0;
        }
        let Some(start) = self.index(x, y) else {
            return 0;
        };

        let width = self.width() as usize;
        let height = self.height() as usize;
        let cells = self.cells_mut();
        if cells[start] != matching {
            return 0;
        }

        // Cells are rewritten when pushed, so `replacement` doubles as the
        // visited mark and each cell enters the worklist at most once.
        cells[start] = replacement;
        let mut worklist = vec![start];
        let mut count = 0usize;

        while let Some(idx) = worklist.pop() {
            count += 1;
            visit(idx);

            let (cx, cy) = (idx % width, idx / width);
            let neighbors = [
                (cx > 0).then(|| idx - 1),
                (cx + 1 < width).then(|| idx + 1),
                (cy > 0).then(|| idx - width),
                (cy + 1 < height).then(|| idx + width),
            ];
            for n in neighbors.into_iter().flatten() {
                if cells[n] == matching {
                    cells[n] = replacement;
                    worklist.push(n);
                }
            }
        }

        count
    }

    /// Hit the cluster at `(x, y)` and return the points it earned.
    ///
    /// Clusters below [`MIN_CLUSTER_SIZE`] are restored exactly and score 0.
    /// Out-of-bounds and empty cells are a no-op.
    pub fn hit(
        &mut self,
        x: i32,
        y: i32,
        refill: &mut RefillBudget,
        tiles: &mut TileSource,
    ) -> u32 {
        let original = match self.get(x, y) {
            Some(cell @ Cell::Occupied(_)) => cell,
            _ => return 0,
        };

        let size = self.flood_fill(original, Cell::Placeholder, x, y);
        if size < MIN_CLUSTER_SIZE {
            self.flood_fill(Cell::Placeholder, original, x, y);
            return 0;
        }

        self.flood_fill(Cell::Placeholder, Cell::Empty, x, y);
        self.shake();
        self.fill_back(refill, tiles);
        cluster_points(size)
    }

    /// Gravity: in every column, drop occupied cells to the bottom keeping
    /// their relative order, leaving the empty cells on top.
    pub fn shake(&mut self) {
        let width = self.width() as usize;
        let height = self.height() as usize;
        let cells = self.cells_mut();

        for x in 0..width {
            let mut write = height;
            for y in (0..height).rev() {
                let from = y * width + x;
                if cells[from].is_empty() {
                    continue;
                }
                write -= 1;
                if write != y {
                    cells[write * width + x] = cells[from];
                    cells[from] = Cell::Empty;
                }
            }
        }
    }

    /// Refill empty cells bottom row first, left to right within a row,
    /// until the budget runs out. Returns the number of cells filled.
    pub fn fill_back(&mut self, refill: &mut RefillBudget, tiles: &mut TileSource) -> usize {
        let width = self.width() as usize;
        let height = self.height() as usize;
        let cells = self.cells_mut();
        let mut filled = 0usize;

        for y in (0..height).rev() {
            for x in 0..width {
                let idx = y * width + x;
                if !cells[idx].is_empty() {
                    continue;
                }
                if !refill.take() {
                    return filled;
                }
                cells[idx] = Cell::Occupied(tiles.draw());
                filled += 1;
            }
        }

        filled
    }
}

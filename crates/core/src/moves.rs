//! Move availability.
//!
//! A board still has a move when some 4-connected cluster of one kind
//! reaches [`MIN_CLUSTER_SIZE`]. Probing floods each unvisited cluster to
//! `Placeholder` and back, so the grid is identical before and after.

use crate::grid::{Cell, Grid};
use crate::types::MIN_CLUSTER_SIZE;

impl Grid {
    /// Size of the cluster containing `(x, y)`; 0 for empty or out-of-bounds.
    ///
    /// The grid is left exactly as it was found.
    pub fn cluster_size(&mut self, x: i32, y: i32) -> usize {
        let Some(cell @ Cell::Occupied(_)) = self.get(x, y) else {
            return 0;
        };
        let size = self.flood_fill(cell, Cell::Placeholder, x, y);
        self.flood_fill(Cell::Placeholder, cell, x, y);
        size
    }

    /// True when at least one cluster of [`MIN_CLUSTER_SIZE`] or more exists.
    pub fn has_move(&mut self) -> bool {
        let mut probed = vec![false; self.cells().len()];

        for idx in 0..probed.len() {
            if probed[idx] {
                continue;
            }
            let cell = self.cells()[idx];
            if !matches!(cell, Cell::Occupied(_)) {
                continue;
            }

            let (x, y) = self.coords(idx);
            let size = self.flood_fill_with(cell, Cell::Placeholder, x, y, |i| probed[i] = true);
            self.flood_fill(Cell::Placeholder, cell, x, y);

            if size >= MIN_CLUSTER_SIZE {
                return true;
            }
        }

        false
    }
}

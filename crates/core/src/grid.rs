//! Grid module - the mutable board of tiles
//!
//! The grid is a fixed `width x height` matrix stored as a flat, row-major
//! vector. Coordinates are `(x, y)` with `x` growing to the right and `y`
//! growing downwards, so row 0 is the top of the board.
//!
//! Reading is open to everyone; writing is reserved for the cluster engine
//! in this crate (see [`crate::cluster`]).

use crate::error::{GameError, Result};
use crate::rng::TileSource;
use crate::types::{TileKind, MAX_DIMENSION};

/// A single board cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cell {
    #[default]
    Empty,
    Occupied(TileKind),
    /// Transient flood-fill marker. Never survives past the operation that set it.
    Placeholder,
}

impl Cell {
    /// The tile kind held by this cell, if any.
    pub fn kind(self) -> Option<TileKind> {
        match self {
            Cell::Occupied(kind) => Some(kind),
            Cell::Empty | Cell::Placeholder => None,
        }
    }

    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }
}

impl From<TileKind> for Cell {
    fn from(kind: TileKind) -> Self {
        Cell::Occupied(kind)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Grid {
    width: u16,
    height: u16,
    /// Flat array of cells, row-major order (y * width + x)
    cells: Vec<Cell>,
}

impl Grid {
    /// Create a grid with every cell empty.
    pub fn new(width: u16, height: u16) -> Result<Self> {
        check_dimensions(width as usize, height as usize)?;
        Ok(Self {
            width,
            height,
            cells: vec![Cell::Empty; width as usize * height as usize],
        })
    }

    /// Create a grid and fill every cell row-major from `tiles`.
    pub fn generate(width: u16, height: u16, tiles: &mut TileSource) -> Result<Self> {
        let mut grid = Self::new(width, height)?;
        for cell in grid.cells.iter_mut() {
            *cell = Cell::Occupied(tiles.draw());
        }
        Ok(grid)
    }

    /// Build a grid from explicit rows (top row first).
    ///
    /// `kinds` is the vocabulary size; every occupied cell must index into it.
    pub fn from_rows(rows: &[Vec<Cell>], kinds: usize) -> Result<Self> {
        let height = rows.len();
        let width = rows.first().map(Vec::len).unwrap_or(0);
        check_dimensions(width, height)?;

        let mut cells = Vec::with_capacity(width * height);
        for (y, row) in rows.iter().enumerate() {
            if row.len() != width {
                return Err(GameError::RaggedRow {
                    row: y,
                    len: row.len(),
                    width,
                });
            }
            for (x, &cell) in row.iter().enumerate() {
                match cell {
                    Cell::Placeholder => return Err(GameError::PlaceholderCell { x, y }),
                    Cell::Occupied(kind) if kind.index() >= kinds => {
                        return Err(GameError::UnknownKind { x, y })
                    }
                    _ => cells.push(cell),
                }
            }
        }

        Ok(Self {
            width: width as u16,
            height: height as u16,
            cells,
        })
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// Calculate flat index from (x, y) coordinates
    #[inline(always)]
    pub(crate) fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    /// Inverse of [`Grid::index`].
    #[inline(always)]
    pub(crate) fn coords(&self, idx: usize) -> (i32, i32) {
        let w = self.width as usize;
        ((idx % w) as i32, (idx / w) as i32)
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        self.index(x, y).is_some()
    }

    /// Get cell at position (x, y)
    /// Returns None if out of bounds
    pub fn get(&self, x: i32, y: i32) -> Option<Cell> {
        self.index(x, y).map(|idx| self.cells[idx])
    }

    pub(crate) fn cells_mut(&mut self) -> &mut [Cell] {
        &mut self.cells
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Iterate rows top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.width as usize)
    }

    /// Cells of column `x`, top to bottom.
    pub fn column(&self, x: u16) -> Vec<Cell> {
        if x >= self.width {
            return Vec::new();
        }
        self.cells
            .iter()
            .skip(x as usize)
            .step_by(self.width as usize)
            .copied()
            .collect()
    }

    pub fn occupied_count(&self) -> usize {
        self.cells
            .iter()
            .filter(|c| matches!(c, Cell::Occupied(_)))
            .count()
    }

    pub fn empty_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_empty()).count()
    }

    pub fn contains_placeholder(&self) -> bool {
        self.cells.contains(&Cell::Placeholder)
    }
}

fn check_dimensions(width: usize, height: usize) -> Result<()> {
    let max = MAX_DIMENSION as usize;
    if width == 0 || height == 0 || width > max || height > max {
        return Err(GameError::InvalidDimensions { width, height });
    }
    Ok(())
}

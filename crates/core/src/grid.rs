//! Grid module - the 4x4 tile matrix
//!
//! The grid is stored row-major as `[[u32; 4]; 4]`, so its dimensions are fixed
//! by the type. Coordinates are `(row, col)`, both in `0..4`, with `(0, 0)` at
//! the top-left. A cell is `0` when empty, otherwise a power of two from 2 up
//! to `MAX_TILE`.
//!
//! `Grid` is `Copy`: every transformation takes a grid and returns a new one.

use std::fmt;

use arrayvec::ArrayVec;

use crate::error::GridError;
use crate::types::{Row, Tile, CELL_COUNT, GRID_SIZE, MAX_TILE};

/// Whether `value` may appear in a cell
#[inline]
pub fn is_valid_tile(value: Tile) -> bool {
    value == 0 || ((2..=MAX_TILE).contains(&value) && value.is_power_of_two())
}

/// The 4x4 playfield
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Grid {
    /// Row-major cells (`rows[row][col]`)
    rows: [Row; GRID_SIZE],
}

impl Grid {
    /// Create a new empty grid
    pub fn new() -> Self {
        Self {
            rows: [[0; GRID_SIZE]; GRID_SIZE],
        }
    }

    /// Build a grid from rows.
    ///
    /// # Panics
    ///
    /// Panics if any cell is not a valid tile. Use [`Grid::try_from_rows`] for
    /// data that did not come from this crate.
    pub fn from_rows(rows: [Row; GRID_SIZE]) -> Self {
        match Self::try_from_rows(rows) {
            Ok(grid) => grid,
            Err(err) => panic!("{err}"),
        }
    }

    /// Build a grid from rows, rejecting values that are not tiles.
    pub fn try_from_rows(rows: [Row; GRID_SIZE]) -> Result<Self, GridError> {
        for (row, cells) in rows.iter().enumerate() {
            for (col, &value) in cells.iter().enumerate() {
                if !is_valid_tile(value) {
                    return Err(GridError::InvalidTile { row, col, value });
                }
            }
        }
        Ok(Self { rows })
    }

    /// Rebuild from rows produced by a merge or rotation of a valid grid.
    ///
    /// Those operations only move or double tiles, so the invariant is
    /// re-checked in debug builds only.
    #[inline]
    pub(crate) fn from_rows_unchecked(rows: [Row; GRID_SIZE]) -> Self {
        debug_assert!(
            rows.iter().flatten().all(|&v| is_valid_tile(v)),
            "grid invariant broken: {rows:?}"
        );
        Self { rows }
    }

    pub fn rows(&self) -> &[Row; GRID_SIZE] {
        &self.rows
    }

    pub fn into_rows(self) -> [Row; GRID_SIZE] {
        self.rows
    }

    /// Get cell at `(row, col)`
    /// Returns None if out of bounds
    pub fn get(&self, row: usize, col: usize) -> Option<Tile> {
        self.rows.get(row).and_then(|r| r.get(col)).copied()
    }

    /// Set cell at `(row, col)`.
    ///
    /// # Panics
    ///
    /// Panics when out of bounds or when `value` is not a tile; only spawn
    /// logic writes single cells and it never does either.
    pub(crate) fn set(&mut self, row: usize, col: usize, value: Tile) {
        assert!(
            is_valid_tile(value),
            "refusing to write non-tile value {value} at ({row}, {col})"
        );
        self.rows[row][col] = value;
    }

    /// Apply `f` to every row, returning the resulting grid
    pub(crate) fn map_rows(&self, f: impl Fn(Row) -> Row) -> Self {
        let mut rows = self.rows;
        for row in &mut rows {
            *row = f(*row);
        }
        Self::from_rows_unchecked(rows)
    }

    /// Coordinates of all empty cells in row-major order
    pub fn empty_cells(&self) -> ArrayVec<(usize, usize), CELL_COUNT> {
        let mut out = ArrayVec::new();
        for (r, row) in self.rows.iter().enumerate() {
            for (c, &value) in row.iter().enumerate() {
                if value == 0 {
                    out.push((r, c));
                }
            }
        }
        out
    }

    pub fn is_full(&self) -> bool {
        self.cells().all(|v| v != 0)
    }

    pub fn is_empty(&self) -> bool {
        self.cells().all(|v| v == 0)
    }

    /// Number of nonzero cells
    pub fn tile_count(&self) -> usize {
        self.cells().filter(|&v| v != 0).count()
    }

    /// Sum of all tile values
    pub fn tile_sum(&self) -> u64 {
        self.cells().map(u64::from).sum()
    }

    /// Largest tile on the grid (0 for an empty grid)
    pub fn max_tile(&self) -> Tile {
        self.cells().max().unwrap_or(0)
    }

    pub fn contains(&self, value: Tile) -> bool {
        self.cells().any(|v| v == value)
    }

    /// All cells in row-major order
    pub fn cells(&self) -> impl Iterator<Item = Tile> + '_ {
        self.rows.iter().flatten().copied()
    }
}

impl TryFrom<[Row; GRID_SIZE]> for Grid {
    type Error = GridError;

    fn try_from(rows: [Row; GRID_SIZE]) -> Result<Self, Self::Error> {
        Self::try_from_rows(rows)
    }
}

impl From<Grid> for [Row; GRID_SIZE] {
    fn from(grid: Grid) -> Self {
        grid.rows
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.rows.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            for (j, &value) in row.iter().enumerate() {
                if j > 0 {
                    write!(f, " ")?;
                }
                if value == 0 {
                    write!(f, "{:>5}", ".")?;
                } else {
                    write!(f, "{value:>5}")?;
                }
            }
        }
        Ok(())
    }
}

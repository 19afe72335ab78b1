//! Spawn logic - place a new tile in a random empty cell
//!
//! Two draws are taken from the RNG per spawn: the cell (uniform over empty
//! cells, row-major order) and then the value (4 with [`SpawnOdds`]
//! probability, else 2). A full grid is left unchanged and consumes no draws.

use rand::Rng;

use crate::grid::Grid;
use crate::types::{Tile, SPAWN_FOUR_DENOMINATOR, SPAWN_FOUR_NUMERATOR, SPAWN_HIGH, SPAWN_LOW};

/// Probability of spawning a 4 instead of a 2, as `numerator / denominator`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpawnOdds {
    numerator: u32,
    denominator: u32,
}

impl SpawnOdds {
    /// 1 in 4 chance of a 4 (default)
    pub const CLASSIC: SpawnOdds = SpawnOdds {
        numerator: SPAWN_FOUR_NUMERATOR,
        denominator: SPAWN_FOUR_DENOMINATOR,
    };

    /// Even odds between 2 and 4
    pub const UNIFORM: SpawnOdds = SpawnOdds {
        numerator: 1,
        denominator: 2,
    };

    /// # Panics
    ///
    /// Panics if `denominator` is 0 or `numerator > denominator`.
    pub fn new(numerator: u32, denominator: u32) -> Self {
        assert!(
            denominator > 0 && numerator <= denominator,
            "invalid spawn odds {numerator}/{denominator}"
        );
        Self {
            numerator,
            denominator,
        }
    }

    /// Parse a policy name ("classic" or "uniform", case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "classic" => Some(Self::CLASSIC),
            "uniform" => Some(Self::UNIFORM),
            _ => None,
        }
    }
}

impl Default for SpawnOdds {
    fn default() -> Self {
        Self::CLASSIC
    }
}

/// A tile placed by [`spawn_tile`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SpawnedTile {
    pub row: usize,
    pub col: usize,
    pub value: Tile,
}

/// Draw a spawn for `grid` without applying it.
///
/// Returns `None` when the grid is full.
pub fn pick_spawn<R: Rng + ?Sized>(grid: &Grid, rng: &mut R, odds: SpawnOdds) -> Option<SpawnedTile> {
    let empty = grid.empty_cells();
    if empty.is_empty() {
        return None;
    }

    let (row, col) = empty[rng.random_range(0..empty.len())];
    let value = if rng.random_ratio(odds.numerator, odds.denominator) {
        SPAWN_HIGH
    } else {
        SPAWN_LOW
    };

    Some(SpawnedTile { row, col, value })
}

/// Return a copy of `grid` with one new tile, plus where it went.
///
/// A full grid comes back unchanged with `None`; that is an expected outcome,
/// not an error.
pub fn spawn_tile<R: Rng + ?Sized>(
    grid: &Grid,
    rng: &mut R,
    odds: SpawnOdds,
) -> (Grid, Option<SpawnedTile>) {
    let mut out = *grid;
    let spawned = pick_spawn(grid, rng, odds);
    if let Some(tile) = spawned {
        out.set(tile.row, tile.col, tile.value);
    }
    (out, spawned)
}

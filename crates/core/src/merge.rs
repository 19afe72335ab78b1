//! Row merge - collapses one row toward index 0
//!
//! This is the only slide/merge algorithm in the crate; every direction is
//! reduced to it by [`crate::transform`].
//!
//! Rules:
//! - zeros are skipped (compaction)
//! - two equal tiles that meet merge into one of double value
//! - a merged tile is closed for the rest of the move, so `[2, 2, 2, 2]`
//!   becomes `[4, 4, 0, 0]`, never `[8, 0, 0, 0]`
//! - tiles at `MAX_TILE` never merge, so a doubled value always fits

use crate::types::{Row, Tile, GRID_SIZE, MAX_TILE};

/// Whether two neighbouring tiles combine when they meet.
#[inline]
pub fn can_merge(a: Tile, b: Tile) -> bool {
    a != 0 && a == b && a < MAX_TILE
}

/// Slide and merge `row` toward index 0.
pub fn merge_row(row: Row) -> Row {
    let mut out = [0; GRID_SIZE];
    let mut cursor = 0usize;

    for tile in row.into_iter().filter(|&t| t != 0) {
        if out[cursor] == 0 {
            out[cursor] = tile;
        } else if can_merge(out[cursor], tile) {
            out[cursor] *= 2;
            cursor += 1;
        } else {
            cursor += 1;
            out[cursor] = tile;
        }
    }

    out
}

/// Slide and merge `row` toward the last index.
pub fn merge_row_reversed(row: Row) -> Row {
    let mut rev = row;
    rev.reverse();
    let mut out = merge_row(rev);
    out.reverse();
    out
}

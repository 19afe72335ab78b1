//! Error types for untrusted grid input.
//!
//! The core's own operations cannot fail: directions are a closed enum and
//! spawning on a full grid is a no-op. Grids built from outside data (tests,
//! hosts restoring a position) go through [`Grid::try_from_rows`], which
//! reports the first offending cell instead of panicking.
//!
//! [`Grid::try_from_rows`]: crate::grid::Grid::try_from_rows

use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridError {
    /// A nonzero cell that is not a power of two, is the value 1, or is
    /// larger than the biggest tile a 4x4 grid can build.
    #[error("invalid tile {value} at row {row}, column {col}: tiles must be 0 or a power of two from 2 to 131072")]
    InvalidTile { row: usize, col: usize, value: u32 },
}

//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the application.
//! All types are pure data structures with no external dependencies, making them
//! usable in any context (core logic, terminal rendering, TCP adapter).
//!
//! # Board Dimensions
//!
//! The playfield is a fixed 4x4 grid, indexed `(row, col)` with `(0, 0)` at the
//! top-left corner. Row 0 is the top edge, so [`Direction::Up`] slides tiles
//! toward row 0 and [`Direction::Left`] slides them toward column 0.
//!
//! # Spawn Odds
//!
//! After every committed move a tile is spawned in a random empty cell. Its
//! value is 4 with probability `SPAWN_FOUR_NUMERATOR / SPAWN_FOUR_DENOMINATOR`
//! and 2 otherwise:
//!
//! | Policy | P(4) | Notes |
//! |--------|------|-------|
//! | classic | 1/4 | default |
//! | uniform | 1/2 | even split between 2 and 4 |
//!
//! # Examples
//!
//! ```
//! use tui_2048_types::{Direction, GameAction, GameStatus, GRID_SIZE, DEFAULT_WIN_TILE};
//!
//! // Parse from string (case-insensitive)
//! let dir = Direction::from_str("Left").unwrap();
//! assert_eq!(dir, Direction::Left);
//! assert_eq!(dir.opposite(), Direction::Right);
//!
//! let action = GameAction::Move(dir);
//! assert_ne!(action, GameAction::Restart);
//!
//! assert!(!GameStatus::Active.is_terminal());
//! assert_eq!(GRID_SIZE, 4);
//! assert_eq!(DEFAULT_WIN_TILE, 2048);
//! ```

/// Grid width and height in cells (4x4)
pub const GRID_SIZE: usize = 4;

/// Total number of cells on the grid
pub const CELL_COUNT: usize = GRID_SIZE * GRID_SIZE;

/// Tile value that wins the game unless configured otherwise
pub const DEFAULT_WIN_TILE: u32 = 2048;

/// Number of tiles placed on an empty grid when a session starts
pub const INITIAL_TILES: usize = 2;

/// Value of the common spawned tile
pub const SPAWN_LOW: u32 = 2;

/// Value of the rare spawned tile
pub const SPAWN_HIGH: u32 = 4;

/// Largest tile a 4x4 grid can hold.
///
/// Sixteen cells can at best chain 4 + 4 + 8 + ... + 65536 into one tile,
/// so 2^17 is never exceeded and merges cannot overflow a `u32`.
pub const MAX_TILE: u32 = 1 << 17;

/// Classic odds of spawning a 4 (numerator)
pub const SPAWN_FOUR_NUMERATOR: u32 = 1;

/// Classic odds of spawning a 4 (denominator)
pub const SPAWN_FOUR_DENOMINATOR: u32 = 4;


/// The four move directions
///
/// - **Up**: slide toward row 0
/// - **Down**: slide toward row 3
/// - **Left**: slide toward column 0
/// - **Right**: slide toward column 3
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// All directions in a stable order (Up, Down, Left, Right)
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Parse direction from string (case-insensitive)
    ///
    /// Accepts the full names only: "up", "down", "left", "right".
    ///
    /// # Examples
    ///
    /// ```
    /// use tui_2048_types::Direction;
    ///
    /// assert_eq!(Direction::from_str("UP"), Some(Direction::Up));
    /// assert_eq!(Direction::from_str("Right"), Some(Direction::Right));
    /// assert_eq!(Direction::from_str("r"), None);
    /// assert_eq!(Direction::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "up" => Some(Direction::Up),
            "down" => Some(Direction::Down),
            "left" => Some(Direction::Left),
            "right" => Some(Direction::Right),
            _ => None,
        }
    }

    /// Convert to lowercase string
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }

    /// The direction pointing the other way
    pub fn opposite(&self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Position of this direction in [`Direction::ALL`]
    pub fn index(&self) -> usize {
        match self {
            Direction::Up => 0,
            Direction::Down => 1,
            Direction::Left => 2,
            Direction::Right => 3,
        }
    }
}

/// Session lifecycle state
///
/// `Won` and `Lost` are terminal: moves are ignored until the session restarts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GameStatus {
    #[default]
    Active,
    Won,
    Lost,
}

impl GameStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, GameStatus::Active)
    }

    /// Convert to lowercase string for the adapter protocol
    pub fn as_str(&self) -> &'static str {
        match self {
            GameStatus::Active => "active",
            GameStatus::Won => "won",
            GameStatus::Lost => "lost",
        }
    }
}

/// Actions a front-end or remote controller can request
///
/// Input layers translate raw events into these; the session only ever sees a
/// [`Direction`] or a restart request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameAction {
    /// Slide every tile in the given direction
    Move(Direction),
    /// Throw away the current grid and start a new episode
    Restart,
}

/// A single grid cell value
///
/// `0` is empty; any other value is a power of two from 2 to [`MAX_TILE`].
pub type Tile = u32;

/// One row (or column, after rotation) of the grid
pub type Row = [Tile; GRID_SIZE];

//! Core game logic module - pure, deterministic, and testable
//!
//! This module contains all the game rules, state management, and move logic.
//! It has **zero dependencies** on UI, networking, or I/O, making it:
//!
//! - **Deterministic**: Same seed produces identical games
//! - **Testable**: Every rule is a pure function over a `Copy` grid
//! - **Portable**: Can run in any environment (terminal, TCP adapter, headless)
//!
//! # Module Structure
//!
//! - [`grid`]: 4x4 tile matrix and its invariants
//! - [`merge`]: the single slide/merge algorithm, on one row
//! - [`transform`]: rotations that reduce all four directions to [`merge`]
//! - [`terminal`]: win and no-moves-left detection
//! - [`spawn`]: random tile placement with configurable 2/4 odds
//! - [`rng`]: seedable LCG used as the default random source
//! - [`session`]: the orchestrator that owns grid + RNG and applies moves
//! - [`snapshot`]: plain-data copy of a session for renderers and the adapter
//!
//! # Game Rules
//!
//! - Tiles slide as far as they can in the chosen direction
//! - Two equal tiles that meet merge once per move (`[2,2,2,2]` left is `[4,4,0,0]`)
//! - Tiles top out at `MAX_TILE` (2^17); two of them do not merge
//! - A move that changes nothing does not spawn a tile
//! - Reaching the win tile (2048 by default) wins; a full grid with no equal
//!   neighbours loses
//!
//! # Example
//!
//! ```
//! use tui_2048_core::{Grid, Session, SessionConfig, SimpleRng};
//! use tui_2048_types::{Direction, GameStatus};
//!
//! let grid = Grid::from_rows([[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]]);
//! let mut session = Session::from_grid(grid, SessionConfig::default(), SimpleRng::new(7));
//!
//! let result = session.apply_move(Direction::Left);
//! assert!(result.changed);
//! assert_eq!(result.grid.get(0, 0), Some(4));
//! assert_eq!(result.grid.tile_count(), 2); // merged tile + one spawn
//! assert_eq!(session.status(), GameStatus::Active);
//! ```

pub mod error;
pub mod grid;
pub mod merge;
pub mod rng;
pub mod session;
pub mod snapshot;
pub mod spawn;
pub mod terminal;
pub mod transform;

pub use tui_2048_types as types;

// Re-export commonly used types for convenience
pub use error::GridError;
pub use grid::{is_valid_tile, Grid};
pub use merge::{can_merge, merge_row, merge_row_reversed};
pub use rng::SimpleRng;
pub use session::{evaluate_status, new_session, MoveResult, Session, SessionConfig};
pub use snapshot::SessionSnapshot;
pub use spawn::{pick_spawn, spawn_tile, SpawnOdds, SpawnedTile};
pub use terminal::{can_move, has_won, is_move_legal, legal_moves};
pub use transform::{apply_direction, rotate, rotate_back};

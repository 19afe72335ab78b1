use crate::types::{Direction, GameStatus, Row, Tile, DEFAULT_WIN_TILE, GRID_SIZE};

/// Plain-data view of a session at one point in time.
///
/// Renderers and the adapter read this instead of borrowing the session, so
/// a shared session's lock is held only while the snapshot is copied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionSnapshot {
    pub grid: [Row; GRID_SIZE],
    pub status: GameStatus,
    pub episode_id: u32,
    pub moves: u32,
    pub max_tile: Tile,
    pub win_tile: Tile,
    /// Legality per direction, indexed like [`Direction::ALL`]
    pub legal: [bool; 4],
}

impl SessionSnapshot {
    pub fn clear(&mut self) {
        self.grid = [[0; GRID_SIZE]; GRID_SIZE];
        self.status = GameStatus::Active;
        self.episode_id = 0;
        self.moves = 0;
        self.max_tile = 0;
        self.win_tile = DEFAULT_WIN_TILE;
        self.legal = [false; 4];
    }

    pub fn is_legal(&self, direction: Direction) -> bool {
        self.legal[direction.index()]
    }
}

impl Default for SessionSnapshot {
    fn default() -> Self {
        let mut s = Self {
            grid: [[0; GRID_SIZE]; GRID_SIZE],
            status: GameStatus::Active,
            episode_id: 0,
            moves: 0,
            max_tile: 0,
            win_tile: DEFAULT_WIN_TILE,
            legal: [false; 4],
        };
        s.clear();
        s
    }
}

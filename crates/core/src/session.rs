//! Game session - owns the grid and the RNG and applies moves end to end
//!
//! A move runs transform → (no-op check) → commit → spawn → terminal check.
//! The session is the only place where the grid changes; everything it calls
//! is a pure function of its inputs.

use rand::Rng;
use tracing::{debug, info, instrument};

use crate::grid::{is_valid_tile, Grid};
use crate::rng::SimpleRng;
use crate::snapshot::SessionSnapshot;
use crate::spawn::{spawn_tile, SpawnOdds, SpawnedTile};
use crate::terminal::{can_move, has_won, legal_moves};
use crate::transform::apply_direction;
use crate::types::{
    Direction, GameAction, GameStatus, Tile, DEFAULT_WIN_TILE, INITIAL_TILES, MAX_TILE,
};

/// Rules a session plays by
///
/// Fields are private so every config comes from [`SessionConfig::default`]
/// and the checked `with_*` builders; a session can never start with a win
/// tile it already holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    win_tile: Tile,
    spawn_odds: SpawnOdds,
    spawn_on_noop: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            win_tile: DEFAULT_WIN_TILE,
            spawn_odds: SpawnOdds::CLASSIC,
            spawn_on_noop: false,
        }
    }
}

impl SessionConfig {
    /// Whether `win_tile` can serve as a goal: a tile value of at least 4
    /// (a 2 would be won before the first move).
    pub fn is_valid_win_tile(win_tile: Tile) -> bool {
        win_tile >= 4 && is_valid_tile(win_tile)
    }

    /// # Panics
    ///
    /// Panics unless [`SessionConfig::is_valid_win_tile`] accepts `win_tile`.
    pub fn with_win_tile(mut self, win_tile: Tile) -> Self {
        assert!(
            Self::is_valid_win_tile(win_tile),
            "win tile must be a power of two from 4 to {MAX_TILE}, got {win_tile}"
        );
        self.win_tile = win_tile;
        self
    }

    pub fn with_spawn_odds(mut self, spawn_odds: SpawnOdds) -> Self {
        self.spawn_odds = spawn_odds;
        self
    }

    /// Spawn a tile even when the move changed nothing.
    ///
    /// Off by default; turning it on spawns on every key press, even when
    /// nothing slid.
    pub fn with_spawn_on_noop(mut self, spawn_on_noop: bool) -> Self {
        self.spawn_on_noop = spawn_on_noop;
        self
    }

    /// Reaching this tile wins the game
    pub fn win_tile(&self) -> Tile {
        self.win_tile
    }

    /// Odds of a spawned tile being a 4
    pub fn spawn_odds(&self) -> SpawnOdds {
        self.spawn_odds
    }

    pub fn spawn_on_noop(&self) -> bool {
        self.spawn_on_noop
    }
}

/// Outcome of a single [`Session::apply_move`] call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveResult {
    pub direction: Direction,
    /// Grid after the move and any spawn
    pub grid: Grid,
    /// Whether sliding changed the grid (a spawn alone does not count)
    pub changed: bool,
    pub spawned: Option<SpawnedTile>,
    pub won: bool,
    pub lost: bool,
}

impl MoveResult {
    pub fn status(&self) -> GameStatus {
        if self.won {
            GameStatus::Won
        } else if self.lost {
            GameStatus::Lost
        } else {
            GameStatus::Active
        }
    }
}

/// Status implied by a grid under the given win tile
pub fn evaluate_status(grid: &Grid, win_tile: Tile) -> GameStatus {
    if has_won(grid, win_tile) {
        GameStatus::Won
    } else if !can_move(grid) {
        GameStatus::Lost
    } else {
        GameStatus::Active
    }
}

/// A single game in progress
///
/// Not synchronized: hosts that share a session between threads wrap it in a
/// mutex and hold the lock for each call.
#[derive(Debug, Clone)]
pub struct Session<R = SimpleRng> {
    grid: Grid,
    status: GameStatus,
    rng: R,
    config: SessionConfig,
    /// Monotonic episode id (increments on restart).
    episode_id: u32,
    /// Committed moves in the current episode.
    moves: u32,
}

/// Create a session with default rules, seeded from OS entropy.
pub fn new_session() -> Session {
    Session::with_rng(SessionConfig::default(), SimpleRng::from_entropy())
}

impl Session<SimpleRng> {
    /// Create a deterministic session with default rules
    pub fn new(seed: u32) -> Self {
        Self::with_config(seed, SessionConfig::default())
    }

    /// Create a deterministic session with custom rules
    pub fn with_config(seed: u32, config: SessionConfig) -> Self {
        Self::with_rng(config, SimpleRng::new(seed))
    }
}

impl<R: Rng> Session<R> {
    /// Create a session drawing from `rng`, seeded with two tiles
    pub fn with_rng(config: SessionConfig, rng: R) -> Self {
        let mut session = Self {
            grid: Grid::new(),
            status: GameStatus::Active,
            rng,
            config,
            episode_id: 0,
            moves: 0,
        };
        session.seed_grid();
        session
    }

    /// Resume from an explicit grid.
    ///
    /// The status is evaluated immediately, so a stuck grid starts out Lost.
    pub fn from_grid(grid: Grid, config: SessionConfig, rng: R) -> Self {
        let status = evaluate_status(&grid, config.win_tile);
        Self {
            grid,
            status,
            rng,
            config,
            episode_id: 0,
            moves: 0,
        }
    }

    fn seed_grid(&mut self) {
        self.grid = Grid::new();
        for _ in 0..INITIAL_TILES {
            let (grid, _) = spawn_tile(&self.grid, &mut self.rng, self.config.spawn_odds);
            self.grid = grid;
        }
        self.status = evaluate_status(&self.grid, self.config.win_tile);
    }

    /// Read-only copy of the grid
    pub fn current_grid(&self) -> Grid {
        self.grid
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn episode_id(&self) -> u32 {
        self.episode_id
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn legal_moves(&self) -> [bool; 4] {
        if self.status.is_terminal() {
            return [false; 4];
        }
        legal_moves(&self.grid)
    }

    /// Slide all tiles in `direction` and advance the game.
    ///
    /// A move that changes nothing spawns no tile (unless
    /// [`SessionConfig::spawn_on_noop`] is set). In a terminal state the call
    /// is ignored and reports `changed == false` with the current status.
    #[instrument(level = "debug", skip(self))]
    pub fn apply_move(&mut self, direction: Direction) -> MoveResult {
        if self.status.is_terminal() {
            debug!(status = self.status.as_str(), "move ignored in terminal state");
            return self.result(direction, false, None);
        }

        let next = apply_direction(&self.grid, direction);
        let changed = next != self.grid;

        if !changed && !self.config.spawn_on_noop {
            // Nothing slid; the only thing that can change is discovering the
            // grid is stuck.
            self.status = evaluate_status(&self.grid, self.config.win_tile);
            debug!(status = self.status.as_str(), "no-op move");
            return self.result(direction, false, None);
        }

        if changed {
            self.grid = next;
            self.moves += 1;
        }

        let (grid, spawned) = spawn_tile(&self.grid, &mut self.rng, self.config.spawn_odds);
        self.grid = grid;
        self.status = evaluate_status(&self.grid, self.config.win_tile);

        debug!(
            changed,
            moves = self.moves,
            status = self.status.as_str(),
            max_tile = self.grid.max_tile(),
            "move applied"
        );
        if self.status.is_terminal() {
            info!(
                episode = self.episode_id,
                moves = self.moves,
                status = self.status.as_str(),
                "game finished"
            );
        }

        self.result(direction, changed, spawned)
    }

    /// Apply a front-end action.
    ///
    /// Returns the move result for moves and `None` for a restart.
    pub fn apply_action(&mut self, action: GameAction) -> Option<MoveResult> {
        match action {
            GameAction::Move(direction) => Some(self.apply_move(direction)),
            GameAction::Restart => {
                self.restart();
                None
            }
        }
    }

    /// Start a new episode on a freshly seeded grid, keeping the RNG stream.
    #[instrument(level = "debug", skip(self))]
    pub fn restart(&mut self) {
        self.episode_id = self.episode_id.wrapping_add(1);
        self.moves = 0;
        self.seed_grid();
        info!(episode = self.episode_id, "session restarted");
    }

    /// Plain-data copy for renderers and the adapter
    pub fn snapshot(&self) -> SessionSnapshot {
        let mut snap = SessionSnapshot::default();
        self.snapshot_into(&mut snap);
        snap
    }

    /// Fill an existing snapshot in place.
    pub fn snapshot_into(&self, out: &mut SessionSnapshot) {
        out.grid = self.grid.into_rows();
        out.status = self.status;
        out.episode_id = self.episode_id;
        out.moves = self.moves;
        out.max_tile = self.grid.max_tile();
        out.win_tile = self.config.win_tile;
        out.legal = self.legal_moves();
    }

    fn result(&self, direction: Direction, changed: bool, spawned: Option<SpawnedTile>) -> MoveResult {
        MoveResult {
            direction,
            grid: self.grid,
            changed,
            spawned,
            won: self.status == GameStatus::Won,
            lost: self.status == GameStatus::Lost,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn locked() -> Grid {
        Grid::from_rows([[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2]])
    }

    #[test]
    fn test_new_session_has_two_tiles() {
        let session = Session::new(1);
        assert_eq!(session.current_grid().tile_count(), 2);
        assert_eq!(session.status(), GameStatus::Active);
        assert_eq!(session.moves(), 0);
        assert_eq!(session.episode_id(), 0);
        assert!(session.current_grid().cells().all(|v| v == 0 || v == 2 || v == 4));
    }

    #[test]
    fn test_entropy_session_starts_active_with_two_tiles() {
        for _ in 0..20 {
            let session = new_session();
            assert_eq!(session.current_grid().tile_count(), 2);
            assert_eq!(session.status(), GameStatus::Active);
            assert_eq!(session.config(), &SessionConfig::default());
        }
    }

    #[test]
    fn test_same_seed_same_game() {
        let mut a = Session::new(12345);
        let mut b = Session::new(12345);
        for dir in [Direction::Left, Direction::Up, Direction::Right, Direction::Down].repeat(10) {
            assert_eq!(a.apply_move(dir), b.apply_move(dir));
        }
        assert_eq!(a.current_grid(), b.current_grid());
    }

    #[test]
    fn test_valid_move_commits_and_spawns() {
        let grid = Grid::from_rows([[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]]);
        let mut session = Session::from_grid(grid, SessionConfig::default(), SimpleRng::new(5));

        let result = session.apply_move(Direction::Left);
        assert!(result.changed);
        assert_eq!(result.grid.get(0, 0), Some(4));
        assert_eq!(result.grid.tile_count(), 2);

        let spawned = result.spawned.expect("a tile should spawn");
        assert_ne!((spawned.row, spawned.col), (0, 0));
        assert_eq!(result.grid.get(spawned.row, spawned.col), Some(spawned.value));
        assert_eq!(session.moves(), 1);
        assert_eq!(result.status(), GameStatus::Active);
    }

    #[test]
    fn test_noop_move_does_not_spawn() {
        let grid = Grid::from_rows([[2, 4, 0, 0], [0; 4], [0; 4], [0; 4]]);
        let mut session = Session::from_grid(grid, SessionConfig::default(), SimpleRng::new(5));

        let result = session.apply_move(Direction::Left);
        assert!(!result.changed);
        assert_eq!(result.spawned, None);
        assert_eq!(session.current_grid(), grid);
        assert_eq!(session.moves(), 0);
        assert_eq!(session.status(), GameStatus::Active);
    }

    #[test]
    fn test_spawn_on_noop_spawns_without_slide() {
        let grid = Grid::from_rows([[2, 4, 0, 0], [0; 4], [0; 4], [0; 4]]);
        let config = SessionConfig::default().with_spawn_on_noop(true);
        let mut session = Session::from_grid(grid, config, SimpleRng::new(5));

        let result = session.apply_move(Direction::Left);
        assert!(!result.changed);
        assert!(result.spawned.is_some());
        assert_eq!(session.current_grid().tile_count(), 3);
        assert_eq!(session.moves(), 0);
    }

    #[test]
    fn test_reaching_win_tile_wins() {
        let grid = Grid::from_rows([[1024, 1024, 0, 0], [0; 4], [0; 4], [0; 4]]);
        let mut session = Session::from_grid(grid, SessionConfig::default(), SimpleRng::new(1));

        let result = session.apply_move(Direction::Right);
        assert!(result.won);
        assert!(!result.lost);
        assert_eq!(session.status(), GameStatus::Won);
        assert_eq!(result.grid.get(0, 3), Some(2048));
    }

    #[test]
    fn test_custom_win_tile() {
        let grid = Grid::from_rows([[32, 32, 0, 0], [0; 4], [0; 4], [0; 4]]);
        let config = SessionConfig::default().with_win_tile(64);
        let mut session = Session::from_grid(grid, config, SimpleRng::new(1));
        assert!(session.apply_move(Direction::Left).won);
    }

    #[test]
    #[should_panic(expected = "win tile must be a power of two")]
    fn test_win_tile_validation() {
        let _ = SessionConfig::default().with_win_tile(100);
    }

    #[test]
    #[should_panic(expected = "win tile must be a power of two")]
    fn test_zero_win_tile_is_refused() {
        let _ = SessionConfig::default().with_win_tile(0);
    }

    #[test]
    fn test_win_tile_range() {
        assert!(!SessionConfig::is_valid_win_tile(0));
        assert!(!SessionConfig::is_valid_win_tile(2));
        assert!(SessionConfig::is_valid_win_tile(4));
        assert!(SessionConfig::is_valid_win_tile(MAX_TILE));
        assert!(!SessionConfig::is_valid_win_tile(MAX_TILE << 1));
    }

    #[test]
    fn test_configured_session_starts_active() {
        for win_tile in [4, 8, DEFAULT_WIN_TILE, MAX_TILE] {
            let config = SessionConfig::default().with_win_tile(win_tile);
            assert_eq!(config.win_tile(), win_tile);
            for seed in 0..20 {
                let session = Session::with_config(seed, config);
                // Seeding only places 2s and 4s, so a goal of 4 may already be met.
                if win_tile > 4 {
                    assert_eq!(session.status(), GameStatus::Active, "{win_tile} seed {seed}");
                }
                assert_eq!(session.snapshot().win_tile, win_tile);
            }
        }
    }

    #[test]
    fn test_last_merge_filling_board_loses() {
        // Sliding row 0 left frees one cell; the spawn refills it and leaves
        // no pair in either case (2 or 4).
        let grid = Grid::from_rows([
            [0, 8, 16, 32],
            [64, 128, 256, 512],
            [8, 16, 32, 64],
            [128, 256, 512, 1024],
        ]);
        let mut session = Session::from_grid(grid, SessionConfig::default(), SimpleRng::new(3));

        let result = session.apply_move(Direction::Left);
        assert!(result.changed);
        assert_eq!(result.spawned.map(|s| (s.row, s.col)), Some((0, 3)));
        assert!(result.lost);
        assert_eq!(session.status(), GameStatus::Lost);
    }

    #[test]
    fn test_stuck_grid_is_lost_on_evaluation() {
        let session = Session::from_grid(locked(), SessionConfig::default(), SimpleRng::new(1));
        assert_eq!(session.status(), GameStatus::Lost);
        assert_eq!(session.legal_moves(), [false; 4]);
    }

    #[test]
    fn test_terminal_state_ignores_moves() {
        let mut session = Session::from_grid(locked(), SessionConfig::default(), SimpleRng::new(1));
        for dir in Direction::ALL {
            let result = session.apply_move(dir);
            assert!(!result.changed);
            assert!(result.lost);
            assert_eq!(result.spawned, None);
        }
        assert_eq!(session.current_grid(), locked());
    }

    #[test]
    fn test_won_session_ignores_moves() {
        let grid = Grid::from_rows([[2048, 2, 0, 0], [0; 4], [0; 4], [0; 4]]);
        let mut session = Session::from_grid(grid, SessionConfig::default(), SimpleRng::new(1));
        assert_eq!(session.status(), GameStatus::Won);

        let result = session.apply_move(Direction::Right);
        assert!(!result.changed);
        assert!(result.won);
        assert_eq!(session.current_grid(), grid);
    }

    #[test]
    fn test_restart_reseeds_and_bumps_episode() {
        let mut session = Session::from_grid(locked(), SessionConfig::default(), SimpleRng::new(1));
        assert!(session.apply_action(GameAction::Restart).is_none());

        assert_eq!(session.status(), GameStatus::Active);
        assert_eq!(session.episode_id(), 1);
        assert_eq!(session.moves(), 0);
        assert_eq!(session.current_grid().tile_count(), 2);
    }

    #[test]
    fn test_apply_action_moves() {
        let grid = Grid::from_rows([[0, 0, 0, 2], [0; 4], [0; 4], [0; 4]]);
        let mut session = Session::from_grid(grid, SessionConfig::default(), SimpleRng::new(1));
        let result = session
            .apply_action(GameAction::Move(Direction::Left))
            .unwrap();
        assert!(result.changed);
        assert_eq!(result.direction, Direction::Left);
        assert_eq!(result.grid.get(0, 0), Some(2));
    }

    #[test]
    fn test_random_play_keeps_invariants() {
        let mut session = Session::new(2048);
        let mut rng = SimpleRng::new(7);
        for _ in 0..5_000 {
            if session.status().is_terminal() {
                session.restart();
            }
            let dir = Direction::ALL[rng.next_range(4) as usize];
            let before = session.current_grid();
            let result = session.apply_move(dir);

            let spawned_value = result.spawned.map(|s| s.value as u64).unwrap_or(0);
            assert_eq!(result.grid.tile_sum(), before.tile_sum() + spawned_value);
            assert_eq!(result.changed, result.spawned.is_some());
            assert!(result.grid.cells().all(is_valid_tile));
        }
    }

    #[test]
    fn test_snapshot_mirrors_session() {
        let session = Session::new(9);
        let snap = session.snapshot();
        assert_eq!(snap.grid, session.current_grid().into_rows());
        assert_eq!(snap.status, GameStatus::Active);
        assert_eq!(snap.max_tile, session.current_grid().max_tile());
        assert_eq!(snap.win_tile, DEFAULT_WIN_TILE);
        assert_eq!(snap.legal, session.legal_moves());
    }
}

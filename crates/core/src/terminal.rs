//! Terminal state detection (win / no moves left)

use crate::grid::Grid;
use crate::merge::can_merge;
use crate::transform::apply_direction;
use crate::types::{Direction, Tile, GRID_SIZE};

/// Whether any move can still change the grid.
///
/// True if a cell is empty or two orthogonally adjacent cells hold the same
/// mergeable tile.
pub fn can_move(grid: &Grid) -> bool {
    let rows = grid.rows();

    if grid.cells().any(|v| v == 0) {
        return true;
    }

    for r in 0..GRID_SIZE {
        for c in 0..GRID_SIZE - 1 {
            // Horizontal pair in row r, vertical pair in column r.
            if can_merge(rows[r][c], rows[r][c + 1]) || can_merge(rows[c][r], rows[c + 1][r]) {
                return true;
            }
        }
    }

    false
}

/// Whether the win tile is anywhere on the grid.
pub fn has_won(grid: &Grid, win_tile: Tile) -> bool {
    grid.contains(win_tile)
}

/// Whether moving in `direction` would change the grid.
pub fn is_move_legal(grid: &Grid, direction: Direction) -> bool {
    apply_direction(grid, direction) != *grid
}

/// Legality of each direction, indexed like [`Direction::ALL`].
pub fn legal_moves(grid: &Grid) -> [bool; 4] {
    Direction::ALL.map(|dir| is_move_legal(grid, dir))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::SimpleRng;

    /// Full grid with no equal neighbours.
    fn locked() -> Grid {
        Grid::from_rows([
            [2, 4, 2, 4],
            [4, 2, 4, 2],
            [2, 4, 2, 4],
            [4, 2, 4, 2],
        ])
    }

    #[test]
    fn test_empty_cell_allows_move() {
        let mut rows = locked().into_rows();
        rows[3][3] = 0;
        assert!(can_move(&Grid::from_rows(rows)));
    }

    #[test]
    fn test_locked_grid_cannot_move() {
        assert!(!can_move(&locked()));
        assert_eq!(legal_moves(&locked()), [false; 4]);
    }

    #[test]
    fn test_horizontal_pair_allows_move() {
        let mut rows = locked().into_rows();
        rows[3][2] = 2; // [4, 2, 2, 2]
        let grid = Grid::from_rows(rows);
        assert!(can_move(&grid));
        assert!(is_move_legal(&grid, Direction::Left));
        assert!(is_move_legal(&grid, Direction::Right));
    }

    #[test]
    fn test_vertical_pair_allows_move() {
        let mut rows = locked().into_rows();
        rows[1][0] = 2; // column 0: [2, 2, 2, 4]
        let grid = Grid::from_rows(rows);
        assert!(can_move(&grid));
        assert!(is_move_legal(&grid, Direction::Up));
        assert!(is_move_legal(&grid, Direction::Down));
    }

    #[test]
    fn test_pair_in_last_row_and_column_detected() {
        let mut rows = locked().into_rows();
        rows[3][3] = 4; // bottom-right corner now equals its left neighbour
        assert!(can_move(&Grid::from_rows(rows)));

        let mut rows = locked().into_rows();
        rows[2][3] = 2; // right column [4, 2, 2, 2]
        assert!(can_move(&Grid::from_rows(rows)));
    }

    #[test]
    fn test_can_move_agrees_with_legal_moves() {
        let mut rng = SimpleRng::new(77);
        for _ in 0..3_000 {
            let mut rows = [[0; GRID_SIZE]; GRID_SIZE];
            for cell in rows.iter_mut().flatten() {
                // Mostly full grids so both outcomes show up.
                let exp = rng.next_range(9);
                *cell = if exp == 0 { 0 } else { 1 << exp };
            }
            let grid = Grid::from_rows(rows);
            assert_eq!(
                can_move(&grid),
                legal_moves(&grid).iter().any(|&l| l),
                "{grid}"
            );
        }
    }

    #[test]
    fn test_has_won_only_with_win_tile() {
        let mut rows = [[0; GRID_SIZE]; GRID_SIZE];
        rows[2][1] = 1024;
        assert!(!has_won(&Grid::from_rows(rows), 2048));
        assert!(has_won(&Grid::from_rows(rows), 1024));
        rows[0][0] = 2048;
        assert!(has_won(&Grid::from_rows(rows), 2048));
    }

    #[test]
    fn test_capped_pair_does_not_keep_grid_alive() {
        let mut rows = locked().into_rows();
        rows[0][0] = crate::types::MAX_TILE;
        rows[0][1] = crate::types::MAX_TILE;
        let grid = Grid::from_rows(rows);
        assert!(!can_move(&grid));
        assert_eq!(legal_moves(&grid), [false; 4]);
    }

    #[test]
    fn test_empty_grid_has_no_legal_move() {
        // Nothing to slide, even though can_move is true.
        assert!(can_move(&Grid::new()));
        assert_eq!(legal_moves(&Grid::new()), [false; 4]);
    }
}

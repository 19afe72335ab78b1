//! Direction transform - every move expressed through one row merge
//!
//! Left and Right work on rows directly. Up and Down rotate the grid a
//! quarter-turn counter-clockwise so that columns become rows (column `c`
//! becomes row `3 - c`, read top to bottom), merge, and rotate back.
//!
//! The quarter-turn has order four: [`rotate`] applied four times is the
//! identity, and [`rotate_back`] is exactly three applications of [`rotate`].

use crate::grid::Grid;
use crate::merge::{merge_row, merge_row_reversed};
use crate::types::{Direction, GRID_SIZE};

/// Rotate a quarter-turn counter-clockwise (reverse each row, then transpose).
pub fn rotate(grid: &Grid) -> Grid {
    let src = grid.rows();
    let mut rows = [[0; GRID_SIZE]; GRID_SIZE];
    for (r, row) in rows.iter_mut().enumerate() {
        for (c, cell) in row.iter_mut().enumerate() {
            *cell = src[c][GRID_SIZE - 1 - r];
        }
    }
    Grid::from_rows_unchecked(rows)
}

/// Inverse of [`rotate`] (a quarter-turn clockwise).
pub fn rotate_back(grid: &Grid) -> Grid {
    let src = grid.rows();
    let mut rows = [[0; GRID_SIZE]; GRID_SIZE];
    for (r, row) in rows.iter_mut().enumerate() {
        for (c, cell) in row.iter_mut().enumerate() {
            *cell = src[GRID_SIZE - 1 - c][r];
        }
    }
    Grid::from_rows_unchecked(rows)
}

/// Compute the grid after sliding every tile in `direction`.
///
/// No tile is spawned; the input is left untouched.
pub fn apply_direction(grid: &Grid, direction: Direction) -> Grid {
    match direction {
        Direction::Left => grid.map_rows(merge_row),
        Direction::Right => grid.map_rows(merge_row_reversed),
        Direction::Up => rotate_back(&rotate(grid).map_rows(merge_row)),
        Direction::Down => rotate_back(&rotate(grid).map_rows(merge_row_reversed)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::SimpleRng;

    fn random_grid(rng: &mut SimpleRng) -> Grid {
        let mut rows = [[0; GRID_SIZE]; GRID_SIZE];
        for cell in rows.iter_mut().flatten() {
            let exp = rng.next_range(5);
            *cell = if exp == 0 { 0 } else { 1 << exp };
        }
        Grid::from_rows(rows)
    }

    #[test]
    fn test_rotate_is_counter_clockwise() {
        let grid = Grid::from_rows([[2, 4, 8, 16], [0; 4], [0; 4], [0; 4]]);
        // Top row ends up as the left column, read bottom to top.
        let expected = Grid::from_rows([[16, 0, 0, 0], [8, 0, 0, 0], [4, 0, 0, 0], [2, 0, 0, 0]]);
        assert_eq!(rotate(&grid), expected);
    }

    #[test]
    fn test_four_rotations_are_identity() {
        let mut rng = SimpleRng::new(4);
        for _ in 0..1_000 {
            let grid = random_grid(&mut rng);
            let turned = rotate(&rotate(&rotate(&rotate(&grid))));
            assert_eq!(turned, grid);
        }
    }

    #[test]
    fn test_rotate_back_is_three_rotations() {
        let mut rng = SimpleRng::new(44);
        for _ in 0..1_000 {
            let grid = random_grid(&mut rng);
            assert_eq!(rotate_back(&grid), rotate(&rotate(&rotate(&grid))));
            assert_eq!(rotate_back(&rotate(&grid)), grid);
        }
    }

    #[test]
    fn test_each_direction_moves_toward_its_edge() {
        let grid = Grid::from_rows([[0, 0, 0, 0], [0, 2, 0, 0], [0, 0, 0, 0], [0, 2, 0, 4]]);

        assert_eq!(
            apply_direction(&grid, Direction::Up),
            Grid::from_rows([[0, 4, 0, 4], [0; 4], [0; 4], [0; 4]])
        );
        assert_eq!(
            apply_direction(&grid, Direction::Down),
            Grid::from_rows([[0; 4], [0; 4], [0; 4], [0, 4, 0, 4]])
        );
        assert_eq!(
            apply_direction(&grid, Direction::Left),
            Grid::from_rows([[0; 4], [2, 0, 0, 0], [0; 4], [2, 4, 0, 0]])
        );
        assert_eq!(
            apply_direction(&grid, Direction::Right),
            Grid::from_rows([[0; 4], [0, 0, 0, 2], [0; 4], [0, 0, 2, 4]])
        );
    }

    #[test]
    fn test_vertical_merge_order_follows_direction() {
        // Column 0 top to bottom: 2, 2, 2, 0
        let grid = Grid::from_rows([[2, 0, 0, 0], [2, 0, 0, 0], [2, 0, 0, 0], [0; 4]]);
        assert_eq!(
            apply_direction(&grid, Direction::Up),
            Grid::from_rows([[4, 0, 0, 0], [2, 0, 0, 0], [0; 4], [0; 4]])
        );
        assert_eq!(
            apply_direction(&grid, Direction::Down),
            Grid::from_rows([[0; 4], [0; 4], [2, 0, 0, 0], [4, 0, 0, 0]])
        );
    }

    #[test]
    fn test_left_twice_is_idempotent_without_new_pairs() {
        let mut rng = SimpleRng::new(8);
        let mut checked = 0;
        for _ in 0..2_000 {
            let grid = random_grid(&mut rng);
            let once = apply_direction(&grid, Direction::Left);
            let has_pair = once
                .rows()
                .iter()
                .any(|row| row.windows(2).any(|w| w[0] != 0 && w[0] == w[1]));
            if has_pair {
                continue;
            }
            assert_eq!(apply_direction(&once, Direction::Left), once);
            checked += 1;
        }
        assert!(checked > 20);
    }

    #[test]
    fn test_directions_preserve_tile_sum() {
        let mut rng = SimpleRng::new(16);
        for _ in 0..1_000 {
            let grid = random_grid(&mut rng);
            for dir in Direction::ALL {
                assert_eq!(apply_direction(&grid, dir).tile_sum(), grid.tile_sum());
            }
        }
    }

    #[test]
    fn test_input_grid_is_not_mutated() {
        let grid = Grid::from_rows([[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]]);
        let copy = grid;
        let _ = apply_direction(&grid, Direction::Left);
        assert_eq!(grid, copy);
    }
}

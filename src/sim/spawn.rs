//! Food and obstacle placement
//!
//! Uniform rejection sampling over the grid. Draws are bounded; when the
//! budget runs out the remaining free cells are enumerated once, and only a
//! grid with no free cell at all reports `GridSaturated`.

use std::collections::BTreeSet;

use rand::Rng;

use super::grid::{Cell, Grid};
use super::state::Snake;
use crate::consts::MAX_PLACEMENT_ATTEMPTS;
use crate::error::SnakeError;

/// Obstacle cells, ordered for stable iteration
pub type ObstacleSet = BTreeSet<Cell>;

/// Draw a random cell that `is_taken` rejects; bounded
fn sample_free<R: Rng>(
    rng: &mut R,
    grid: &Grid,
    is_taken: impl Fn(Cell) -> bool,
) -> Result<Cell, SnakeError> {
    for _ in 0..MAX_PLACEMENT_ATTEMPTS {
        let candidate = Cell::new(
            rng.random_range(0..grid.cols) as i32,
            rng.random_range(0..grid.rows) as i32,
        );
        if !is_taken(candidate) {
            return Ok(candidate);
        }
    }

    let free: Vec<Cell> = grid.cells().filter(|c| !is_taken(*c)).collect();
    if free.is_empty() {
        return Err(SnakeError::GridSaturated {
            free_needed: 1,
            attempts: MAX_PLACEMENT_ATTEMPTS,
        });
    }
    log::debug!(
        "Rejection sampling exhausted, picking among {} free cells",
        free.len()
    );
    Ok(free[rng.random_range(0..free.len())])
}

/// Place food on a cell free of snake and obstacles
pub fn place_food<R: Rng>(
    rng: &mut R,
    grid: &Grid,
    snake: &Snake,
    obstacles: &ObstacleSet,
) -> Result<Cell, SnakeError> {
    sample_free(rng, grid, |c| snake.contains(c) || obstacles.contains(&c))
}

/// Obstacle count preserving the level's density on a differently sized grid
///
/// `floor(total_cells * level_count / level_area)`
pub fn scaled_obstacle_count(grid: &Grid, level_count: u32, level_area: u32) -> usize {
    if level_area == 0 {
        return 0;
    }
    (grid.total_cells() as u64 * level_count as u64 / level_area as u64) as usize
}

/// Place `count` distinct obstacles avoiding snake, food and each other
pub fn place_obstacles<R: Rng>(
    rng: &mut R,
    grid: &Grid,
    snake: &Snake,
    food: Option<Cell>,
    count: usize,
) -> Result<ObstacleSet, SnakeError> {
    let mut obstacles = ObstacleSet::new();
    for placed in 0..count {
        let cell = sample_free(rng, grid, |c| {
            snake.contains(c) || food == Some(c) || obstacles.contains(&c)
        })
        .map_err(|_| SnakeError::GridSaturated {
            free_needed: count - placed,
            attempts: MAX_PLACEMENT_ATTEMPTS,
        })?;
        obstacles.insert(cell);
    }
    Ok(obstacles)
}

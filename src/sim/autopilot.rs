//! Idle/demo mode steering
//!
//! Greedy: head for the food along safe cells, preferring moves that keep
//! more exits open. Good enough for attract mode and headless runs.

use super::grid::Cell;
use super::state::{Direction, GameState};

/// A next cell is safe if the tick would not end the session there
fn is_safe(state: &GameState, cell: Cell) -> bool {
    state.grid.in_bounds(cell) && !state.snake.contains(cell) && !state.obstacles.contains(&cell)
}

/// Free neighbors around a cell (one-step lookahead)
fn exits(state: &GameState, cell: Cell) -> usize {
    Direction::ALL
        .iter()
        .filter(|d| is_safe(state, d.step(cell)))
        .count()
}

/// Pick a direction for the next tick, or `None` when every move is fatal
pub fn suggest_direction(state: &GameState) -> Option<Direction> {
    let head = state.snake.head();
    let target = state.food;

    Direction::ALL
        .iter()
        .copied()
        .filter(|d| *d != state.direction.opposite())
        .map(|d| (d, d.step(head)))
        .filter(|(_, cell)| is_safe(state, *cell))
        .min_by_key(|(d, cell)| {
            let distance = target.map(|f| cell.manhattan(f)).unwrap_or(0);
            // Dead ends rank last, then distance, then keep heading
            let trapped = exits(state, *cell) == 0;
            (trapped, distance, *d != state.direction)
        })
        .map(|(d, _)| d)
}

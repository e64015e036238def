//! Discrete simulation tick
//!
//! Advances the snake by exactly one cell. Collisions end the session; they
//! are reported through the outcome, never as errors.

use super::grid::Cell;
use super::state::{EndReason, GamePhase, GameState};
use crate::consts::POINTS_PER_FOOD;

/// What a single tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not running, or no snake body; nothing changed
    Skipped,
    /// Head advanced, tail vacated
    Moved,
    /// Head advanced onto food; snake grew and food moved to `next_food`
    Ate { next_food: Cell },
    /// Session ended on this tick
    Ended(EndReason),
}

/// Advance the game state by one tick
pub fn tick(state: &mut GameState) -> TickOutcome {
    if state.phase != GamePhase::Running || state.snake.is_empty() {
        return TickOutcome::Skipped;
    }

    state.time_ticks += 1;
    state.direction = state.pending_direction;

    let head = state.direction.step(state.snake.head());

    // Checked against the pre-move body, tail cell included
    let collision = if !state.grid.in_bounds(head) {
        Some(EndReason::WallCollision)
    } else if state.snake.contains(head) {
        Some(EndReason::SelfCollision)
    } else if state.obstacles.contains(&head) {
        Some(EndReason::ObstacleCollision)
    } else {
        None
    };

    if let Some(reason) = collision {
        state.end(reason);
        log::info!(
            "Snake hit {:?} at ({}, {}) after {} ticks",
            reason,
            head.x,
            head.y,
            state.time_ticks
        );
        return TickOutcome::Ended(reason);
    }

    state.snake.push_head(head);

    if state.food != Some(head) {
        state.snake.pop_tail();
        return TickOutcome::Moved;
    }

    state.score += POINTS_PER_FOOD;
    state.food_eaten += 1;

    match state.respawn_food() {
        Ok(next_food) => TickOutcome::Ate { next_food },
        Err(err) => {
            log::warn!("No room left for food: {}", err);
            state.end(EndReason::BoardFull);
            TickOutcome::Ended(EndReason::BoardFull)
        }
    }
}

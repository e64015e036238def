//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One discrete step per tick
//! - Seeded RNG only
//! - Stable iteration order (obstacles kept sorted)
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod grid;
pub mod spawn;
pub mod state;
pub mod tick;

pub use grid::{Cell, Grid, GridLayout};
pub use spawn::{ObstacleSet, place_food, place_obstacles, scaled_obstacle_count};
pub use state::{Direction, EndReason, GamePhase, GameState, Snake};
pub use tick::{TickOutcome, tick};

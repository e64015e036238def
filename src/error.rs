//! Error types
//!
//! Collisions are not errors; they end the session through `GamePhase::Ended`.
//! Only configuration faults and collaborator failures show up here.

use thiserror::Error;

/// Failures raised while setting up or running a session
#[derive(Debug, Error)]
pub enum SnakeError {
    /// Placement could not find a free cell within the retry budget
    #[error("grid saturated: no free cell found after {attempts} attempts ({free_needed} cells requested)")]
    GridSaturated { free_needed: usize, attempts: u32 },

    /// The fitted grid cannot hold the starting snake
    #[error("grid {cols}x{rows} is too small for the starting snake")]
    GridTooSmall { cols: u32, rows: u32 },

    /// An explicit snake body shorter than the starting length
    #[error("snake of length {len} is shorter than the minimum {min}")]
    SnakeTooShort { len: usize, min: usize },

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Failures reported by the account/level/result collaborators
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("player not found")]
    PlayerNotFound,

    #[error("level not found")]
    LevelNotFound,

    #[error("game session not found")]
    SessionNotFound,

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("transport failure: {0}")]
    Transport(String),
}

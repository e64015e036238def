//! Snake Grid - A grid-based Snake arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (grid, spawning, snake state machine)
//! - `input`: Key events to buffered directions and session commands
//! - `renderer`: Raster painting + WebGPU upload
//! - `session`: Tick scheduling, result reporting, backend contracts
//! - `leaderboard`: Player rankings and local personal bests

pub mod error;
pub mod input;
pub mod leaderboard;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;

pub use error::{ApiError, SnakeError};
pub use leaderboard::PersonalBests;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Desired cell edge in surface pixels before fitting
    pub const DEFAULT_CELL_SIZE: u32 = 20;
    /// Cells never shrink below this edge
    pub const MIN_CELL_SIZE: u32 = 15;

    /// Snake length at session creation
    pub const INITIAL_SNAKE_LENGTH: usize = 3;
    /// Score awarded per food eaten
    pub const POINTS_PER_FOOD: u64 = 10;

    /// Rejection sampling gives up after this many draws per entity
    pub const MAX_PLACEMENT_ATTEMPTS: u32 = 10_000;

    /// Wall-clock timer period for elapsed seconds
    pub const ELAPSED_TIMER_MS: u64 = 1000;

    /// Gap between adjacent painted cells (pixels)
    pub const CELL_GAP: f32 = 2.0;
}

//! Session lifecycle and the collaborators it talks to

pub mod api;
pub mod coordinator;
pub mod memory;
pub mod scheduler;

pub use api::{GameApi, GameResult, Level, LevelId, Player, PlayerId, SessionId, default_levels};
pub use coordinator::{ReportStatus, SessionContext, SessionCoordinator, SessionSummary, WinCondition};
pub use memory::InMemoryApi;
pub use scheduler::{Scheduler, TaskId};

//! Collaborator contracts: players, level catalog, result reporting, rankings
//!
//! The transport is not part of the game. DTOs keep the backend's JSON field
//! names so any HTTP client can (de)serialize them directly.

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::leaderboard::LeaderboardEntry;

pub type PlayerId = u32;
pub type LevelId = u32;
pub type SessionId = u32;

/// A registered player
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub username: String,
    pub email: String,
}

/// A catalog level
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Level {
    pub id: LevelId,
    pub level_number: u32,
    pub name: String,
    /// Tick interval in milliseconds (lower = faster)
    #[serde(rename = "speed")]
    pub tick_interval_ms: u64,
    /// Obstacle count on the nominal square grid
    #[serde(rename = "obstacles_count")]
    pub obstacle_count: u32,
    /// Edge of the nominal square grid
    #[serde(rename = "grid_size")]
    pub nominal_grid_size: u32,
}

impl Level {
    /// Cell count of the nominal grid, used for density scaling
    pub fn nominal_area(&self) -> u32 {
        self.nominal_grid_size * self.nominal_grid_size
    }
}

/// Final numbers for one session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameResult {
    pub score: u64,
    pub food_eaten: u32,
    #[serde(rename = "duration_seconds")]
    pub elapsed_secs: u32,
    pub completed: bool,
}

/// Operations the game core calls at fixed lifecycle points
pub trait GameApi {
    /// Register a new player
    fn create_player(&mut self, username: &str, email: &str) -> Result<Player, ApiError>;

    /// Look up an existing player by username (login)
    fn find_player(&self, username: &str) -> Result<Player, ApiError>;

    /// Levels ordered by level number
    fn fetch_level_catalog(&self) -> Result<Vec<Level>, ApiError>;

    /// Called once per session, before the board is built
    fn create_session(&mut self, player_id: PlayerId, level_id: LevelId)
    -> Result<SessionId, ApiError>;

    /// Called exactly once, when the session ends
    fn report_result(&mut self, session_id: SessionId, result: &GameResult) -> Result<(), ApiError>;

    /// Top players by total score; `limit` is clamped by the backend
    fn leaderboard(&self, limit: usize) -> Result<Vec<LeaderboardEntry>, ApiError>;
}

impl<T: GameApi + ?Sized> GameApi for &mut T {
    fn create_player(&mut self, username: &str, email: &str) -> Result<Player, ApiError> {
        (**self).create_player(username, email)
    }

    fn find_player(&self, username: &str) -> Result<Player, ApiError> {
        (**self).find_player(username)
    }

    fn fetch_level_catalog(&self) -> Result<Vec<Level>, ApiError> {
        (**self).fetch_level_catalog()
    }

    fn create_session(
        &mut self,
        player_id: PlayerId,
        level_id: LevelId,
    ) -> Result<SessionId, ApiError> {
        (**self).create_session(player_id, level_id)
    }

    fn report_result(&mut self, session_id: SessionId, result: &GameResult) -> Result<(), ApiError> {
        (**self).report_result(session_id, result)
    }

    fn leaderboard(&self, limit: usize) -> Result<Vec<LeaderboardEntry>, ApiError> {
        (**self).leaderboard(limit)
    }
}

/// Shared handle, for event-loop code that keeps the backend between sessions
impl<T: GameApi> GameApi for Rc<RefCell<T>> {
    fn create_player(&mut self, username: &str, email: &str) -> Result<Player, ApiError> {
        self.borrow_mut().create_player(username, email)
    }

    fn find_player(&self, username: &str) -> Result<Player, ApiError> {
        self.borrow().find_player(username)
    }

    fn fetch_level_catalog(&self) -> Result<Vec<Level>, ApiError> {
        self.borrow().fetch_level_catalog()
    }

    fn create_session(
        &mut self,
        player_id: PlayerId,
        level_id: LevelId,
    ) -> Result<SessionId, ApiError> {
        self.borrow_mut().create_session(player_id, level_id)
    }

    fn report_result(&mut self, session_id: SessionId, result: &GameResult) -> Result<(), ApiError> {
        self.borrow_mut().report_result(session_id, result)
    }

    fn leaderboard(&self, limit: usize) -> Result<Vec<LeaderboardEntry>, ApiError> {
        self.borrow().leaderboard(limit)
    }
}

/// The stock ten-level catalog
pub fn default_levels() -> Vec<Level> {
    const LEVELS: [(&str, u64, u32, u32); 10] = [
        ("Beginner", 200, 0, 20),
        ("Easy", 180, 2, 20),
        ("Novice", 160, 4, 22),
        ("Intermediate", 140, 6, 22),
        ("Skilled", 120, 8, 25),
        ("Advanced", 100, 10, 25),
        ("Expert", 90, 12, 28),
        ("Master", 80, 15, 30),
        ("Insane", 70, 18, 32),
        ("Impossible", 60, 20, 35),
    ];

    LEVELS
        .iter()
        .zip(1u32..)
        .map(|(&(name, speed, obstacles, grid), n)| Level {
            id: n,
            level_number: n,
            name: name.to_string(),
            tick_interval_ms: speed,
            obstacle_count: obstacles,
            nominal_grid_size: grid,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_levels_get_faster() {
        let levels = default_levels();
        assert_eq!(levels.len(), 10);
        assert_eq!(levels[0].name, "Beginner");
        assert_eq!(levels[9].tick_interval_ms, 60);
        assert!(
            levels
                .windows(2)
                .all(|w| w[1].tick_interval_ms < w[0].tick_interval_ms)
        );
        assert_eq!(levels[5].nominal_area(), 625);
    }

    #[test]
    fn test_level_wire_format() {
        let json = r#"{"id":6,"level_number":6,"name":"Advanced","speed":100,"obstacles_count":10,"grid_size":25}"#;
        let level: Level = serde_json::from_str(json).unwrap();
        assert_eq!(level, default_levels()[5]);
    }

    #[test]
    fn test_result_wire_format() {
        let result = GameResult {
            score: 30,
            food_eaten: 3,
            elapsed_secs: 12,
            completed: false,
        };
        let value = serde_json::to_value(result).unwrap();
        assert_eq!(value["duration_seconds"], 12);
        assert_eq!(value["food_eaten"], 3);
    }
}

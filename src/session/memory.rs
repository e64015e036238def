//! In-memory backend
//!
//! Implements every collaborator operation without a transport. Used by the
//! web build (offline play), the native demo and tests.

use super::api::{GameApi, GameResult, Level, LevelId, Player, PlayerId, SessionId, default_levels};
use crate::error::ApiError;
use crate::leaderboard::{LeaderboardEntry, PlayedGame, rank_players};

/// A stored game session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameRecord {
    pub id: SessionId,
    pub player_id: PlayerId,
    pub level_id: LevelId,
    pub result: GameResult,
}

/// Backend state held in memory
#[derive(Debug, Clone)]
pub struct InMemoryApi {
    players: Vec<Player>,
    levels: Vec<Level>,
    games: Vec<GameRecord>,
    /// Reporting fails while set
    fail_reports: bool,
}

impl Default for InMemoryApi {
    fn default() -> Self {
        Self::new(default_levels())
    }
}

impl InMemoryApi {
    pub fn new(mut levels: Vec<Level>) -> Self {
        levels.sort_by_key(|l| l.level_number);
        Self {
            players: Vec::new(),
            levels,
            games: Vec::new(),
            fail_reports: false,
        }
    }

    /// Make `report_result` fail with a transport error
    pub fn set_fail_reports(&mut self, fail: bool) {
        self.fail_reports = fail;
    }

    pub fn game(&self, id: SessionId) -> Option<&GameRecord> {
        self.games.iter().find(|g| g.id == id)
    }

    /// Games for one player, most recent first
    pub fn player_games(&self, player_id: PlayerId) -> Vec<&GameRecord> {
        self.games
            .iter()
            .rev()
            .filter(|g| g.player_id == player_id)
            .collect()
    }

    pub fn level(&self, id: LevelId) -> Option<&Level> {
        self.levels.iter().find(|l| l.id == id)
    }
}

impl GameApi for InMemoryApi {
    fn create_player(&mut self, username: &str, email: &str) -> Result<Player, ApiError> {
        let username = username.trim();
        let email = email.trim();
        if !(3..=50).contains(&username.chars().count()) {
            return Err(ApiError::InvalidInput(
                "username must be 3-50 characters".to_string(),
            ));
        }
        if !email.contains('@') {
            return Err(ApiError::InvalidInput("email is not valid".to_string()));
        }
        if self.players.iter().any(|p| p.username == username) {
            return Err(ApiError::Conflict("username already registered".to_string()));
        }
        if self.players.iter().any(|p| p.email == email) {
            return Err(ApiError::Conflict("email already registered".to_string()));
        }

        let player = Player {
            id: self.players.len() as PlayerId + 1,
            username: username.to_string(),
            email: email.to_string(),
        };
        log::info!("Registered player {} ({})", player.username, player.id);
        self.players.push(player.clone());
        Ok(player)
    }

    fn find_player(&self, username: &str) -> Result<Player, ApiError> {
        self.players
            .iter()
            .find(|p| p.username == username.trim())
            .cloned()
            .ok_or(ApiError::PlayerNotFound)
    }

    fn fetch_level_catalog(&self) -> Result<Vec<Level>, ApiError> {
        Ok(self.levels.clone())
    }

    fn create_session(
        &mut self,
        player_id: PlayerId,
        level_id: LevelId,
    ) -> Result<SessionId, ApiError> {
        if !self.players.iter().any(|p| p.id == player_id) {
            return Err(ApiError::PlayerNotFound);
        }
        if self.level(level_id).is_none() {
            return Err(ApiError::LevelNotFound);
        }

        let id = self.games.len() as SessionId + 1;
        self.games.push(GameRecord {
            id,
            player_id,
            level_id,
            result: GameResult {
                score: 0,
                food_eaten: 0,
                elapsed_secs: 0,
                completed: false,
            },
        });
        Ok(id)
    }

    fn report_result(&mut self, session_id: SessionId, result: &GameResult) -> Result<(), ApiError> {
        if self.fail_reports {
            return Err(ApiError::Transport("backend unavailable".to_string()));
        }
        let game = self
            .games
            .iter_mut()
            .find(|g| g.id == session_id)
            .ok_or(ApiError::SessionNotFound)?;
        game.result = *result;
        Ok(())
    }

    fn leaderboard(&self, limit: usize) -> Result<Vec<LeaderboardEntry>, ApiError> {
        let games = self.games.iter().filter_map(|g| {
            self.level(g.level_id).map(|level| PlayedGame {
                player_id: g.player_id,
                level_number: level.level_number,
                score: g.result.score,
            })
        });
        Ok(rank_players(&self.players, games, limit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_login() {
        let mut api = InMemoryApi::default();
        let player = api.create_player("alice", "alice@example.com").unwrap();
        assert_eq!(player.id, 1);
        assert_eq!(api.find_player("alice").unwrap(), player);
        assert_eq!(api.find_player("bob"), Err(ApiError::PlayerNotFound));
    }

    #[test]
    fn test_register_rejects_duplicates_and_bad_input() {
        let mut api = InMemoryApi::default();
        api.create_player("alice", "alice@example.com").unwrap();

        assert!(matches!(
            api.create_player("alice", "other@example.com"),
            Err(ApiError::Conflict(_))
        ));
        assert!(matches!(
            api.create_player("alicia", "alice@example.com"),
            Err(ApiError::Conflict(_))
        ));
        assert!(matches!(
            api.create_player("al", "al@example.com"),
            Err(ApiError::InvalidInput(_))
        ));
        assert!(matches!(
            api.create_player("albert", "nope"),
            Err(ApiError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_session_lifecycle() {
        let mut api = InMemoryApi::default();
        let player = api.create_player("alice", "alice@example.com").unwrap();

        assert_eq!(api.create_session(99, 1), Err(ApiError::PlayerNotFound));
        assert_eq!(api.create_session(player.id, 99), Err(ApiError::LevelNotFound));

        let session = api.create_session(player.id, 3).unwrap();
        let result = GameResult {
            score: 40,
            food_eaten: 4,
            elapsed_secs: 21,
            completed: false,
        };
        api.report_result(session, &result).unwrap();
        assert_eq!(api.game(session).map(|g| g.result), Some(result));
        assert_eq!(api.report_result(77, &result), Err(ApiError::SessionNotFound));
    }

    #[test]
    fn test_failed_report_leaves_record_untouched() {
        let mut api = InMemoryApi::default();
        let player = api.create_player("alice", "alice@example.com").unwrap();
        let session = api.create_session(player.id, 1).unwrap();

        api.set_fail_reports(true);
        let result = GameResult {
            score: 10,
            food_eaten: 1,
            elapsed_secs: 3,
            completed: false,
        };
        assert!(matches!(
            api.report_result(session, &result),
            Err(ApiError::Transport(_))
        ));
        assert_eq!(api.game(session).map(|g| g.result.score), Some(0));
    }

    #[test]
    fn test_leaderboard_uses_level_numbers() {
        let mut api = InMemoryApi::default();
        let alice = api.create_player("alice", "alice@example.com").unwrap();
        let bob = api.create_player("bob", "bob@example.com").unwrap();

        for (player, level, score) in [(alice.id, 2, 30), (bob.id, 7, 20), (alice.id, 4, 10)] {
            let id = api.create_session(player, level).unwrap();
            let result = GameResult {
                score,
                food_eaten: (score / 10) as u32,
                elapsed_secs: 5,
                completed: false,
            };
            api.report_result(id, &result).unwrap();
        }

        let board = api.leaderboard(10).unwrap();
        assert_eq!(board[0].username, "alice");
        assert_eq!(board[0].total_score, 40);
        assert_eq!(board[0].highest_level, 4);
        assert_eq!(board[1].highest_level, 7);
        assert_eq!(api.player_games(alice.id).len(), 2);
    }
}

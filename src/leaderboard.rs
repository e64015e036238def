//! Rankings
//!
//! - `rank_players`: global board aggregated per player (total score, games,
//!   highest level reached)
//! - `PersonalBests`: local top 10 runs, persisted to LocalStorage

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::session::api::{Player, PlayerId};

/// Rows returned when no limit is given
pub const DEFAULT_LEADERBOARD_LIMIT: usize = 10;
/// Requests above this are clamped
pub const MAX_LEADERBOARD_LIMIT: usize = 100;

/// One row of the global leaderboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    /// 1-indexed
    pub rank: usize,
    pub username: String,
    pub total_score: u64,
    pub games_played: u32,
    pub highest_level: u32,
}

/// A played game as seen by the ranking
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayedGame {
    pub player_id: PlayerId,
    pub level_number: u32,
    pub score: u64,
}

/// Aggregate games per player and rank by total score (ties by username)
///
/// Players without games are left out.
pub fn rank_players(
    players: &[Player],
    games: impl IntoIterator<Item = PlayedGame>,
    limit: usize,
) -> Vec<LeaderboardEntry> {
    let limit = limit.min(MAX_LEADERBOARD_LIMIT);

    let mut totals: BTreeMap<PlayerId, (u64, u32, u32)> = BTreeMap::new();
    for game in games {
        let entry = totals.entry(game.player_id).or_default();
        entry.0 += game.score;
        entry.1 += 1;
        entry.2 = entry.2.max(game.level_number);
    }

    let mut rows: Vec<(&Player, (u64, u32, u32))> = players
        .iter()
        .filter_map(|p| totals.get(&p.id).map(|t| (p, *t)))
        .collect();
    rows.sort_by(|a, b| b.1.0.cmp(&a.1.0).then_with(|| a.0.username.cmp(&b.0.username)));

    rows.into_iter()
        .take(limit)
        .enumerate()
        .map(|(i, (player, (total_score, games_played, highest_level)))| LeaderboardEntry {
            rank: i + 1,
            username: player.username.clone(),
            total_score,
            games_played,
            highest_level,
        })
        .collect()
}

/// Maximum number of personal bests to keep
pub const MAX_PERSONAL_BESTS: usize = 10;

/// A single personal best
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonalBestEntry {
    pub score: u64,
    pub level_number: u32,
    pub food_eaten: u32,
    /// Unix timestamp (ms) when achieved
    pub timestamp: f64,
}

/// Local personal-best table, highest first
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PersonalBests {
    pub entries: Vec<PersonalBestEntry>,
}

impl PersonalBests {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "snake_grid_personal_bests";

    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a score makes the table
    pub fn qualifies(&self, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_PERSONAL_BESTS {
            return true;
        }
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Rank a score would get (1-indexed), None if it doesn't qualify
    pub fn potential_rank(&self, score: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let rank = self.entries.iter().position(|e| score > e.score);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Insert a run; returns the rank achieved or None
    pub fn add_score(
        &mut self,
        score: u64,
        level_number: u32,
        food_eaten: u32,
        timestamp: f64,
    ) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }

        let entry = PersonalBestEntry {
            score,
            level_number,
            food_eaten,
            timestamp,
        };

        let rank = match self.entries.iter().position(|e| score > e.score) {
            Some(i) => {
                self.entries.insert(i, entry);
                i + 1
            }
            None => {
                self.entries.push(entry);
                self.entries.len()
            }
        };

        self.entries.truncate(MAX_PERSONAL_BESTS);

        Some(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// Load from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(bests) = serde_json::from_str::<PersonalBests>(&json) {
                    log::info!("Loaded {} personal bests", bests.entries.len());
                    return bests;
                }
            }
        }

        log::info!("No personal bests found, starting fresh");
        Self::new()
    }

    /// Save to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Personal bests saved ({} entries)", self.entries.len());
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::new()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player(id: PlayerId, name: &str) -> Player {
        Player {
            id,
            username: name.to_string(),
            email: format!("{}@example.com", name),
        }
    }

    fn game(player_id: PlayerId, level_number: u32, score: u64) -> PlayedGame {
        PlayedGame {
            player_id,
            level_number,
            score,
        }
    }

    #[test]
    fn test_rank_players_aggregates() {
        let players = [player(1, "alice"), player(2, "bob"), player(3, "carol")];
        let games = [game(1, 1, 50), game(2, 3, 40), game(1, 2, 30), game(2, 5, 60)];

        let board = rank_players(&players, games, DEFAULT_LEADERBOARD_LIMIT);
        assert_eq!(board.len(), 2);
        assert_eq!(board[0].username, "bob");
        assert_eq!(board[0].total_score, 100);
        assert_eq!(board[0].highest_level, 5);
        assert_eq!(board[1].rank, 2);
        assert_eq!(board[1].games_played, 2);
    }

    #[test]
    fn test_rank_players_limit_and_ties() {
        let players: Vec<_> = (1..=5).map(|i| player(i, &format!("p{}", 6 - i))).collect();
        let games = (1..=5).map(|i| game(i, 1, 10));

        let board = rank_players(&players, games, 3);
        let names: Vec<_> = board.iter().map(|e| e.username.as_str()).collect();
        assert_eq!(names, vec!["p1", "p2", "p3"]);
    }

    #[test]
    fn test_personal_bests_ordering() {
        let mut bests = PersonalBests::new();
        assert!(!bests.qualifies(0));
        assert_eq!(bests.add_score(30, 1, 3, 0.0), Some(1));
        assert_eq!(bests.add_score(50, 2, 5, 1.0), Some(1));
        assert_eq!(bests.add_score(40, 1, 4, 2.0), Some(2));
        assert_eq!(bests.top_score(), Some(50));
        assert_eq!(bests.potential_rank(35), Some(3));
    }

    #[test]
    fn test_personal_bests_truncates() {
        let mut bests = PersonalBests::new();
        for i in 1..=MAX_PERSONAL_BESTS as u64 {
            bests.add_score(i * 10, 1, i as u32, 0.0);
        }
        assert!(!bests.qualifies(10));
        assert_eq!(bests.add_score(15, 1, 1, 0.0), Some(10));
        assert_eq!(bests.entries.len(), MAX_PERSONAL_BESTS);
        assert_eq!(bests.entries.last().map(|e| e.score), Some(15));
    }
}

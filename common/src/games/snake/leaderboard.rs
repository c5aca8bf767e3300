use serde::{Deserialize, Serialize};

use crate::log;
use crate::storage::{KeyValueStore, StorageError};

pub const LEADERBOARD_KEY: &str = "leaderboard";
pub const HIGHEST_SCORE_KEY: &str = "highestScore";
pub const LEADERBOARD_DISPLAY_SIZE: usize = 5;
const DISPLAY_NAME_MAX_CHARS: usize = 8;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub name: String,
    pub score: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LeaderboardUpdate {
    pub best_for_player: u32,
    pub highest_score: u32,
    pub new_high_score: bool,
}

/// Append-only score history plus the all-time best. Entries stay sorted by
/// descending score; equal scores keep the order they were recorded in.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Leaderboard {
    entries: Vec<LeaderboardEntry>,
    highest_score: u32,
}

impl Leaderboard {
    pub fn new(mut entries: Vec<LeaderboardEntry>, highest_score: u32) -> Self {
        entries.sort_by(|a, b| b.score.cmp(&a.score));
        Self {
            entries,
            highest_score,
        }
    }

    /// Reads both keys; anything missing or unreadable falls back to empty.
    pub fn load(store: &impl KeyValueStore) -> Self {
        let entries = match store.get(LEADERBOARD_KEY) {
            Ok(Some(content)) => serde_yaml_ng::from_str::<Vec<LeaderboardEntry>>(&content)
                .unwrap_or_else(|e| {
                    log!("Ignoring malformed leaderboard: {}", e);
                    Vec::new()
                }),
            Ok(None) => Vec::new(),
            Err(e) => {
                log!("Failed to read leaderboard: {}", e);
                Vec::new()
            }
        };

        let highest_score = match store.get(HIGHEST_SCORE_KEY) {
            Ok(Some(content)) => serde_yaml_ng::from_str::<u32>(&content).unwrap_or_else(|e| {
                log!("Ignoring malformed highest score: {}", e);
                0
            }),
            Ok(None) => 0,
            Err(e) => {
                log!("Failed to read highest score: {}", e);
                0
            }
        };

        Self::new(entries, highest_score)
    }

    /// Writes the full list, and the highest score when it has just risen.
    pub fn save(
        &self,
        store: &impl KeyValueStore,
        highest_score_changed: bool,
    ) -> Result<(), StorageError> {
        let content = serde_yaml_ng::to_string(&self.entries)?;
        store.set(LEADERBOARD_KEY, &content)?;

        if highest_score_changed {
            let content = serde_yaml_ng::to_string(&self.highest_score)?;
            store.set(HIGHEST_SCORE_KEY, &content)?;
        }
        Ok(())
    }

    pub fn record_game(&mut self, player_name: &str, score: u32) -> LeaderboardUpdate {
        let previous_best = self.best_for_player(player_name);
        let best_for_player = previous_best.map_or(score, |best| best.max(score));
        let highest_score = self.highest_score.max(best_for_player);
        let new_high_score = highest_score > self.highest_score;

        self.entries.push(LeaderboardEntry {
            name: player_name.to_string(),
            score,
        });
        self.entries.sort_by(|a, b| b.score.cmp(&a.score));
        self.highest_score = highest_score;

        LeaderboardUpdate {
            best_for_player,
            highest_score,
            new_high_score,
        }
    }

    pub fn best_for_player(&self, player_name: &str) -> Option<u32> {
        self.entries
            .iter()
            .filter(|entry| entry.name == player_name)
            .map(|entry| entry.score)
            .max()
    }

    pub fn entries(&self) -> &[LeaderboardEntry] {
        &self.entries
    }

    pub fn top(&self, count: usize) -> &[LeaderboardEntry] {
        &self.entries[..count.min(self.entries.len())]
    }

    pub fn highest_score(&self) -> u32 {
        self.highest_score
    }
}

pub fn ordinal_label(index: usize) -> String {
    match index {
        0 => "1st".to_string(),
        1 => "2nd".to_string(),
        2 => "3rd".to_string(),
        _ => format!("{}th", index + 1),
    }
}

pub fn display_name(name: &str) -> String {
    if name.chars().count() > DISPLAY_NAME_MAX_CHARS {
        let short: String = name.chars().take(DISPLAY_NAME_MAX_CHARS).collect();
        format!("{}...", short)
    } else {
        name.to_string()
    }
}

//! High score leaderboard system
//!
//! Tracks the top 10 sessions. `HighScores` is the in-memory board,
//! `JsonScoreStore` keeps one on disk.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// Where finished sessions go and where the menu reads the board from
pub trait ScoreStore {
    /// Submit a finished session. Returns the rank achieved (1-indexed) or
    /// None if it didn't make the board.
    fn submit_score(&mut self, points: u64, currency: u32, name: &str) -> Result<Option<usize>>;

    /// Best entries first, at most `limit`. Empty when nothing was ever stored.
    fn top_scores(&self, limit: usize) -> Vec<HighScoreEntry>;
}

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub points: u64,
    /// Coins the live runs banked
    pub currency: u32,
    pub name: String,
    /// Unix timestamp (ms) when achieved
    pub timestamp: f64,
}

/// High score leaderboard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
    /// Submissions banking more coins than this are rejected
    #[serde(skip, default = "default_currency_cap")]
    currency_cap: u32,
}

fn default_currency_cap() -> u32 {
    crate::GameConfig::default().max_plausible_currency()
}

impl Default for HighScores {
    fn default() -> Self {
        Self::new()
    }
}

impl HighScores {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            currency_cap: default_currency_cap(),
        }
    }

    /// Use a different plausibility cap (see [`crate::GameConfig::max_plausible_currency`])
    pub fn with_currency_cap(mut self, cap: u32) -> Self {
        self.currency_cap = cap;
        self
    }

    /// Reject sessions that banked more coins than a session can hold
    pub fn validate(&self, currency: u32) -> Result<()> {
        if currency > self.currency_cap {
            return Err(Error::ImplausibleCurrency {
                currency,
                limit: self.currency_cap,
            });
        }
        Ok(())
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, points: u64) -> bool {
        if points == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        // Check if score beats the lowest entry
        self.entries.last().is_none_or(|e| points > e.points)
    }

    /// Add a new score to the leaderboard (if it qualifies)
    /// Returns the rank achieved (1-indexed) or None if didn't qualify
    pub fn add_score(&mut self, entry: HighScoreEntry) -> Option<usize> {
        if !self.qualifies(entry.points) {
            return None;
        }

        // Find insertion point (sorted descending, ties keep the older entry first)
        let pos = self.entries.iter().position(|e| entry.points > e.points);
        let rank = match pos {
            Some(i) => {
                self.entries.insert(i, entry);
                i + 1
            }
            None => {
                self.entries.push(entry);
                self.entries.len()
            }
        };

        self.entries.truncate(MAX_HIGH_SCORES);
        Some(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.points)
    }
}

impl ScoreStore for HighScores {
    fn submit_score(&mut self, points: u64, currency: u32, name: &str) -> Result<Option<usize>> {
        self.validate(currency)?;
        let rank = self.add_score(HighScoreEntry {
            points,
            currency,
            name: name.to_string(),
            timestamp: now_ms(),
        });
        match rank {
            Some(rank) => log::info!("{name} scored {points} (rank {rank})"),
            None => log::info!("{name} scored {points}, not on the board"),
        }
        Ok(rank)
    }

    fn top_scores(&self, limit: usize) -> Vec<HighScoreEntry> {
        self.entries.iter().take(limit).cloned().collect()
    }
}

/// Leaderboard persisted as a JSON file, rewritten on every accepted score
#[derive(Debug)]
pub struct JsonScoreStore {
    path: PathBuf,
    scores: HighScores,
}

impl JsonScoreStore {
    /// Open the store at `path`. A missing or unreadable file starts a fresh board.
    pub fn open(path: impl Into<PathBuf>, currency_cap: u32) -> Self {
        let path = path.into();
        let scores = match Self::read(&path) {
            Ok(scores) => {
                log::info!("Loaded {} high scores", scores.entries.len());
                scores
            }
            Err(Error::Io { source, .. }) if source.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No high scores found, starting fresh");
                HighScores::new()
            }
            Err(e) => {
                log::warn!("Discarding high scores: {e}");
                HighScores::new()
            }
        };
        Self {
            path,
            scores: scores.with_currency_cap(currency_cap),
        }
    }

    fn read(path: &Path) -> Result<HighScores> {
        let json = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        serde_json::from_str(&json).map_err(|e| Error::json(path, e))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the board to disk
    pub fn save(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.scores).map_err(|e| Error::json(&self.path, e))?;
        std::fs::write(&self.path, json).map_err(|e| Error::io(&self.path, e))?;
        log::info!("High scores saved ({} entries)", self.scores.entries.len());
        Ok(())
    }
}

impl ScoreStore for JsonScoreStore {
    fn submit_score(&mut self, points: u64, currency: u32, name: &str) -> Result<Option<usize>> {
        let rank = self.scores.submit_score(points, currency, name)?;
        if rank.is_some() {
            self.save()?;
        }
        Ok(rank)
    }

    fn top_scores(&self, limit: usize) -> Vec<HighScoreEntry> {
        self.scores.top_scores(limit)
    }
}

fn now_ms() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}
